//! Tree-walking evaluator.
//!
//! Dispatches directly on the AST variant over a parent-linked `Scope`.
//! `return` propagates as a `Value::Return` wrapper that every
//! block-evaluating function checks for and re-propagates unexamined; only
//! `eval_call` (and top-level `eval_program`) unwrap it.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Block, Expression, InfixOp, PrefixOp, Program, Statement};
use crate::builtins;
use crate::error::{AntheError, ArityError, NameError, RangeError, TypeError};
use crate::scope::Scope;
use crate::token::Position;
use crate::value::{FunctionValue, Value};

pub fn eval_program(program: &Program, scope: &Scope) -> Result<Value, AntheError> {
    let mut result = Value::Void;
    for statement in &program.statements {
        result = eval_statement(statement, scope)?;
        if let Value::Return(inner) = result {
            return Ok(*inner);
        }
    }
    Ok(result)
}

fn eval_statement(statement: &Statement, scope: &Scope) -> Result<Value, AntheError> {
    match statement {
        Statement::Let {
            name, value, position, ..
        } => {
            let value = eval_expression(value, scope)?;
            scope.define_variable(name, value, *position)?;
            Ok(Value::Void)
        }
        Statement::Const {
            name, value, position, ..
        } => {
            let value = eval_expression(value, scope)?;
            scope.define_constant(name, value, *position)?;
            Ok(Value::Void)
        }
        Statement::Return { value, position } => {
            let value = match value {
                Some(expr) => eval_expression(expr, scope)?,
                None => Value::Void,
            };
            let _ = position;
            Ok(Value::Return(Box::new(value)))
        }
        Statement::NamedFunctionDecl {
            name,
            params,
            body,
            position,
            ..
        } => {
            let function = Value::Function(Rc::new(FunctionValue {
                params: params.clone(),
                body: body.clone(),
                env: scope.clone(),
            }));
            scope.define_variable(name, function, *position)?;
            Ok(Value::Void)
        }
        Statement::Expression { value, .. } => eval_expression(value, scope),
    }
}

fn eval_block(block: &Block, scope: &Scope) -> Result<Value, AntheError> {
    let mut result = Value::Void;
    for statement in &block.statements {
        result = eval_statement(statement, scope)?;
        if matches!(result, Value::Return(_)) {
            return Ok(result);
        }
    }
    Ok(result)
}

fn eval_expression(expression: &Expression, scope: &Scope) -> Result<Value, AntheError> {
    match expression {
        Expression::IntegerLiteral { value, .. } => Ok(Value::Integer(*value)),
        Expression::FloatLiteral { value, .. } => Ok(Value::Float(*value)),
        Expression::BooleanLiteral { value, .. } => Ok(Value::Boolean(*value)),
        Expression::StringLiteral { value, .. } => Ok(Value::string(value.clone())),
        Expression::NullLiteral { .. } => Ok(Value::Null),
        Expression::Identifier { name, position } => eval_identifier(name, *position, scope),
        Expression::ArrayLiteral { elements, .. } => {
            let mut values = Vec::with_capacity(elements.len());
            for element in elements {
                values.push(eval_expression(element, scope)?);
            }
            Ok(Value::array(values))
        }
        Expression::HashLiteral { pairs, position } => eval_hash_literal(pairs, *position, scope),
        Expression::FunctionLiteral { params, body, .. } => Ok(Value::Function(Rc::new(FunctionValue {
            params: params.clone(),
            body: body.clone(),
            env: scope.clone(),
        }))),
        Expression::Prefix {
            operator,
            right,
            position,
        } => {
            let right = eval_expression(right, scope)?;
            eval_prefix(*operator, right, *position)
        }
        Expression::Infix {
            operator,
            left,
            right,
            position,
        } => {
            let left = eval_expression(left, scope)?;
            let right = eval_expression(right, scope)?;
            eval_infix(*operator, left, right, *position)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let condition = eval_expression(condition, scope)?;
            if condition.is_truthy() {
                eval_block(consequence, &scope.child())
            } else if let Some(alternative) = alternative {
                eval_block(alternative, &scope.child())
            } else {
                Ok(Value::Void)
            }
        }
        Expression::Call {
            function,
            arguments,
            position,
        } => {
            let function = eval_expression(function, scope)?;
            let mut args = Vec::with_capacity(arguments.len());
            for argument in arguments {
                args.push(eval_expression(argument, scope)?);
            }
            eval_call(function, args, *position)
        }
        Expression::Index {
            collection,
            index,
            position,
        } => {
            let collection = eval_expression(collection, scope)?;
            let index = eval_expression(index, scope)?;
            eval_index(collection, index, *position)
        }
        Expression::Assignment {
            target,
            value,
            position,
        } => eval_assignment(target, value, *position, scope),
    }
}

fn eval_identifier(name: &str, position: Position, scope: &Scope) -> Result<Value, AntheError> {
    if let Some(value) = scope.lookup(name) {
        return Ok(value);
    }
    if let Some(builtin) = builtins::lookup(name) {
        return Ok(builtin);
    }
    Err(AntheError::Name(NameError::new(
        format!("identifier `{name}` is not defined"),
        position,
    )))
}

fn eval_hash_literal(
    pairs: &[(Expression, Expression)],
    position: Position,
    scope: &Scope,
) -> Result<Value, AntheError> {
    let mut map = HashMap::new();
    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, scope)?;
        let value = eval_expression(value_expr, scope)?;
        let hash_key = key.hash_key().ok_or_else(|| {
            AntheError::Type(TypeError::new(
                format!("value of type `{}` is not hashable", key.type_name()),
                position,
            ))
        })?;
        map.insert(hash_key, (key, value));
    }
    Ok(Value::hash(map))
}

fn eval_prefix(operator: PrefixOp, right: Value, position: Position) -> Result<Value, AntheError> {
    match (operator, &right) {
        (PrefixOp::Not, _) => Ok(Value::Boolean(!right.is_truthy())),
        (PrefixOp::Negate, Value::Integer(i)) => Ok(Value::Integer(-i)),
        (PrefixOp::Negate, other) => Err(AntheError::Type(TypeError::new(
            format!("unary `-` is not defined for {}", other.type_name()),
            position,
        ))),
    }
}

/// Integer arithmetic and comparison is the only infix case with defined
/// semantics beyond equality; `==`/`!=` compare any two operands by value
/// identity. Anything else is a type mismatch if the operand types differ,
/// or an unknown operator if they match but the type has no infix
/// semantics of its own.
fn eval_infix(operator: InfixOp, left: Value, right: Value, position: Position) -> Result<Value, AntheError> {
    use InfixOp::*;
    match (operator, &left, &right) {
        (Eq, _, _) => Ok(Value::Boolean(left.identity_eq(&right))),
        (NotEq, _, _) => Ok(Value::Boolean(!left.identity_eq(&right))),
        (_, Value::Integer(a), Value::Integer(b)) => eval_integer_infix(operator, *a, *b, position),
        _ if left.type_name() != right.type_name() => Err(AntheError::Type(TypeError::new(
            format!(
                "type mismatch: {} {:?} {}",
                left.type_name(),
                operator,
                right.type_name()
            ),
            position,
        ))),
        _ => Err(AntheError::Type(TypeError::new(
            format!("unknown operator: {:?} for {}", operator, left.type_name()),
            position,
        ))),
    }
}

fn eval_integer_infix(operator: InfixOp, a: i64, b: i64, position: Position) -> Result<Value, AntheError> {
    use InfixOp::*;
    match operator {
        Add => Ok(Value::Integer(a.wrapping_add(b))),
        Sub => Ok(Value::Integer(a.wrapping_sub(b))),
        Mul => Ok(Value::Integer(a.wrapping_mul(b))),
        Div => {
            if b == 0 {
                Err(AntheError::Range(RangeError::new("division by zero", position)))
            } else {
                Ok(Value::Integer(a.wrapping_div(b)))
            }
        }
        Lt => Ok(Value::Boolean(a < b)),
        Gt => Ok(Value::Boolean(a > b)),
        Le => Ok(Value::Boolean(a <= b)),
        Ge => Ok(Value::Boolean(a >= b)),
        Eq | NotEq => unreachable!("handled before numeric dispatch"),
    }
}

fn eval_call(function: Value, args: Vec<Value>, position: Position) -> Result<Value, AntheError> {
    match function {
        Value::Function(f) => {
            if args.len() != f.params.len() {
                return Err(AntheError::Arity(ArityError::new(
                    format!("expected {} argument(s), got {}", f.params.len(), args.len()),
                    position,
                )));
            }
            let call_scope = f.env.child();
            for (param, arg) in f.params.iter().zip(args.into_iter()) {
                call_scope.define_variable(&param.name, arg, position)?;
            }
            let result = eval_block(&f.body, &call_scope)?;
            Ok(match result {
                Value::Return(inner) => *inner,
                other => other,
            })
        }
        Value::Builtin(b) => (b.func)(&args).map_err(AntheError::Arity),
        other => Err(AntheError::Type(TypeError::new(
            format!("{} is not callable", other.type_name()),
            position,
        ))),
    }
}

fn eval_index(collection: Value, index: Value, position: Position) -> Result<Value, AntheError> {
    match (&collection, &index) {
        (Value::Array(items), Value::Integer(i)) => {
            let items = items.borrow();
            let i = *i;
            if i < 0 || i as usize >= items.len() {
                return Err(AntheError::Range(RangeError::new(
                    format!("index {i} out of bounds for array of length {}", items.len()),
                    position,
                )));
            }
            Ok(items[i as usize].clone())
        }
        (Value::Hash(pairs), key) => {
            let Some(hash_key) = key.hash_key() else {
                return Err(AntheError::Type(TypeError::new(
                    format!("value of type `{}` is not hashable", key.type_name()),
                    position,
                )));
            };
            Ok(pairs
                .borrow()
                .get(&hash_key)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Null))
        }
        (other, _) => Err(AntheError::Type(TypeError::new(
            format!("{} is not indexable", other.type_name()),
            position,
        ))),
    }
}

fn eval_assignment(
    target: &Expression,
    value: &Expression,
    position: Position,
    scope: &Scope,
) -> Result<Value, AntheError> {
    let Expression::Identifier { name, .. } = target else {
        return Err(AntheError::Name(NameError::new(
            "left-hand side of an assignment must be an identifier",
            position,
        )));
    };
    let value = eval_expression(value, scope)?;
    scope.assign(name, value, position)?;
    Ok(Value::Void)
}
