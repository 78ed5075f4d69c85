//! Experimental SSA-style IR lowerer.
//!
//! A nested symbol table scoped per function, an instruction enum, a
//! block/function/module hierarchy, and a `Display` impl rendering one
//! instruction per line. The downstream native toolchain that would
//! consume this text is out of scope; this renderer exists only so
//! `lower_program` returns something comparable by structural equality.

mod instruction;
mod scope;

pub use instruction::{Instruction, Operand};
pub use scope::{Symbol, SymbolScope};

use std::fmt::{self, Display};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::ast::{Block, Expression, InfixOp, Param, Program, Statement};
use crate::error::IrError;
use crate::token::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub functions: Vec<Function>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub blocks: Vec<BasicBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub name: String,
    pub instructions: Vec<Instruction>,
}

impl Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for function in &self.functions {
            writeln!(f, "{function}")?;
        }
        Ok(())
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| format!("%{}", p.name)).collect();
        writeln!(f, "define @{}({}) {{", self.name, params.join(", "))?;
        for block in &self.blocks {
            write!(f, "{block}")?;
        }
        writeln!(f, "}}")
    }
}

impl Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        for instruction in &self.instructions {
            writeln!(f, "  {instruction}")?;
        }
        Ok(())
    }
}

/// Generates synthetic block names with a random 12-character alphanumeric
/// suffix, so merge/then/else blocks across nested `if`s never collide.
fn fresh_block_name(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("{prefix}.{suffix}")
}

struct Lowerer {
    next_value: u32,
    blocks: Vec<BasicBlock>,
    current: usize,
}

impl Lowerer {
    fn new() -> Self {
        Self {
            next_value: 0,
            blocks: vec![],
            current: 0,
        }
    }

    fn fresh_value(&mut self) -> String {
        let name = format!("%t{}", self.next_value);
        self.next_value += 1;
        name
    }

    fn push(&mut self, instruction: Instruction) {
        self.blocks[self.current].instructions.push(instruction);
    }

    fn new_block(&mut self, prefix: &str) -> usize {
        self.blocks.push(BasicBlock {
            name: fresh_block_name(prefix),
            instructions: vec![],
        });
        self.blocks.len() - 1
    }

    fn block_name(&self, index: usize) -> String {
        self.blocks[index].name.clone()
    }
}

/// A function literally named `main` keeps that name; every other
/// function is prefixed with `_an__` so a lowered module's symbol names
/// never collide with the emitted entry point.
fn lowered_name(name: &str) -> String {
    if name == "main" {
        name.to_string()
    } else {
        format!("_an__{name}")
    }
}

/// Each `NamedFunctionDecl` becomes its own `Function` entry in the
/// module; top-level statements collect into an implicit entry function,
/// unless the program declared its own `main`.
pub fn lower_program(program: &Program) -> Result<Module, IrError> {
    let mut functions = vec![];
    let mut top_level = vec![];
    let mut has_explicit_main = false;

    for statement in &program.statements {
        match statement {
            Statement::NamedFunctionDecl {
                name, params, body, ..
            } => {
                has_explicit_main |= name == "main";
                functions.push(lower_function(&lowered_name(name), params, body)?);
            }
            other => top_level.push(other.clone()),
        }
    }

    // Top-level statements outside any function declaration form an
    // implicit entry point, unless the program already declared its own
    // `main`, in which case that declaration is the sole entry point and
    // stray top-level statements are not separately wrapped.
    if !has_explicit_main {
        let mut entry_body = Block {
            statements: top_level,
            position: Position::default(),
        };
        if !matches!(entry_body.statements.last(), Some(Statement::Return { .. })) {
            entry_body.statements.push(Statement::Return {
                value: None,
                position: Position::default(),
            });
        }
        functions.push(lower_function("main", &[], &entry_body)?);
    }

    Ok(Module { functions })
}

fn lower_function(name: &str, params: &[Param], body: &Block) -> Result<Function, IrError> {
    let mut lowerer = Lowerer::new();
    let mut scope = SymbolScope::new();

    let entry = lowerer.new_block("entry");
    lowerer.current = entry;

    for param in params {
        // A parameter binding stores the parameter value directly rather
        // than an `alloca` slot; referencing it later is a direct use of
        // `%name`, not a `load`.
        scope.define(&param.name, Symbol::parameter(format!("%{}", param.name)));
    }

    lower_block(&mut lowerer, &mut scope, body)?;

    Ok(Function {
        name: name.to_string(),
        params: params.to_vec(),
        blocks: lowerer.blocks,
    })
}

fn lower_block(lowerer: &mut Lowerer, scope: &mut SymbolScope, block: &Block) -> Result<(), IrError> {
    let mut inner = scope.child();
    for statement in &block.statements {
        lower_statement(lowerer, &mut inner, statement)?;
    }
    Ok(())
}

fn lower_statement(lowerer: &mut Lowerer, scope: &mut SymbolScope, statement: &Statement) -> Result<(), IrError> {
    match statement {
        Statement::Let { name, value, .. } | Statement::Const { name, value, .. } => {
            let operand = lower_expression(lowerer, scope, value)?;
            let slot = format!("%{name}");
            lowerer.push(Instruction::Alloca { dest: slot.clone() });
            lowerer.push(Instruction::Store {
                dest: slot.clone(),
                value: operand,
            });
            scope.define(name, Symbol::local(slot));
            Ok(())
        }
        Statement::Return { value, .. } => {
            let operand = match value {
                Some(expr) => Some(lower_expression(lowerer, scope, expr)?),
                None => None,
            };
            lowerer.push(Instruction::Ret { value: operand });
            Ok(())
        }
        Statement::Expression { value, .. } => {
            lower_expression(lowerer, scope, value)?;
            Ok(())
        }
        Statement::NamedFunctionDecl { position, .. } => Err(IrError::new(
            "nested function declarations cannot be lowered",
            *position,
        )),
    }
}

fn lower_expression(lowerer: &mut Lowerer, scope: &mut SymbolScope, expression: &Expression) -> Result<Operand, IrError> {
    match expression {
        Expression::IntegerLiteral { value, .. } => Ok(Operand::Integer(*value)),
        Expression::BooleanLiteral { value, .. } => Ok(Operand::Integer(*value as i64)),
        Expression::Identifier { name, position } => {
            let symbol = scope.lookup(name).ok_or_else(|| {
                IrError::new(format!("undefined name `{name}` during lowering"), *position)
            })?;
            if symbol.is_parameter {
                return Ok(Operand::Name(symbol.slot));
            }
            let dest = lowerer.fresh_value();
            lowerer.push(Instruction::Load {
                dest: dest.clone(),
                src: symbol.slot,
            });
            Ok(Operand::Name(dest))
        }
        Expression::Prefix { operator, right, position } => {
            let right = lower_expression(lowerer, scope, right)?;
            let dest = lowerer.fresh_value();
            match operator {
                crate::ast::PrefixOp::Negate => {
                    lowerer.push(Instruction::Sub {
                        dest: dest.clone(),
                        lhs: Operand::Integer(0),
                        rhs: right,
                    });
                    Ok(Operand::Name(dest))
                }
                crate::ast::PrefixOp::Not => Err(IrError::new(
                    "boolean negation is not yet lowerable",
                    *position,
                )),
            }
        }
        Expression::Infix {
            operator,
            left,
            right,
            position,
        } => lower_infix(lowerer, scope, *operator, left, right, *position),
        Expression::Call {
            function,
            arguments,
            position,
        } => {
            let Expression::Identifier { name, .. } = function.as_ref() else {
                return Err(IrError::new("only direct calls can be lowered", *position));
            };
            let mut args = vec![];
            for argument in arguments {
                args.push(lower_expression(lowerer, scope, argument)?);
            }
            let dest = lowerer.fresh_value();
            lowerer.push(Instruction::Call {
                dest: dest.clone(),
                callee: lowered_name(name),
                args,
            });
            Ok(Operand::Name(dest))
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            position,
        } => lower_if(lowerer, scope, condition, consequence, alternative.as_ref(), *position),
        other => Err(IrError::new(
            format!("{other:?} cannot be lowered to IR yet"),
            other.position(),
        )),
    }
}

fn lower_infix(
    lowerer: &mut Lowerer,
    scope: &mut SymbolScope,
    operator: InfixOp,
    left: &Expression,
    right: &Expression,
    position: Position,
) -> Result<Operand, IrError> {
    let lhs = lower_expression(lowerer, scope, left)?;
    let rhs = lower_expression(lowerer, scope, right)?;
    let dest = lowerer.fresh_value();

    let instruction = match operator {
        InfixOp::Add => Instruction::Add { dest: dest.clone(), lhs, rhs },
        InfixOp::Sub => Instruction::Sub { dest: dest.clone(), lhs, rhs },
        InfixOp::Mul => Instruction::Mul { dest: dest.clone(), lhs, rhs },
        InfixOp::Div => Instruction::Sdiv { dest: dest.clone(), lhs, rhs },
        InfixOp::Lt => Instruction::Icmp { dest: dest.clone(), op: "slt", lhs, rhs },
        InfixOp::Gt => Instruction::Icmp { dest: dest.clone(), op: "sgt", lhs, rhs },
        InfixOp::Le => Instruction::Icmp { dest: dest.clone(), op: "sle", lhs, rhs },
        InfixOp::Ge => Instruction::Icmp { dest: dest.clone(), op: "sge", lhs, rhs },
        InfixOp::Eq => Instruction::Icmp { dest: dest.clone(), op: "eq", lhs, rhs },
        InfixOp::NotEq => Instruction::Icmp { dest: dest.clone(), op: "ne", lhs, rhs },
    };
    let _ = position;
    lowerer.push(instruction);
    Ok(Operand::Name(dest))
}

/// Lowers `if`/`else` into then/else/merge blocks and a `condbr`. The merge
/// block is left live and un-terminated, becoming the lowerer's new
/// insertion point once both arms have run.
fn lower_if(
    lowerer: &mut Lowerer,
    scope: &mut SymbolScope,
    condition: &Expression,
    consequence: &Block,
    alternative: Option<&Block>,
    position: Position,
) -> Result<Operand, IrError> {
    let _ = position;
    let cond = lower_expression(lowerer, scope, condition)?;

    let then_block = lowerer.new_block("then");
    let else_block = lowerer.new_block("else");
    let merge_block = lowerer.new_block("merge");

    lowerer.push(Instruction::CondBr {
        cond,
        then_label: lowerer.block_name(then_block),
        else_label: lowerer.block_name(else_block),
    });

    lowerer.current = then_block;
    lower_block(lowerer, scope, consequence)?;
    lowerer.push(Instruction::Br {
        label: lowerer.block_name(merge_block),
    });

    lowerer.current = else_block;
    if let Some(alternative) = alternative {
        lower_block(lowerer, scope, alternative)?;
    }
    lowerer.push(Instruction::Br {
        label: lowerer.block_name(merge_block),
    });

    lowerer.current = merge_block;
    Ok(Operand::Integer(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn lower(source: &str) -> Module {
        let program = parse(source);
        assert!(program.is_ok(), "{:?}", program.errors);
        lower_program(&program).expect("lowering should succeed")
    }

    #[test]
    fn lowers_arithmetic_into_ssa_instructions() {
        let module = lower("1 + 2 * 3;");
        let text = module.to_string();
        assert!(text.contains("mul"));
        assert!(text.contains("add"));
    }

    #[test]
    fn named_function_becomes_its_own_function_entry() {
        let module = lower("func add(a: int, b: int): int { return a + b; }");
        assert!(module.functions.iter().any(|f| f.name == "_an__add"));
        assert!(module.functions.iter().any(|f| f.name == "main"));
    }

    #[test]
    fn explicit_main_is_not_prefixed_and_not_duplicated() {
        let module = lower("func main() { let x = 2 + 3; return x; }");
        assert_eq!(module.functions.iter().filter(|f| f.name == "main").count(), 1);
        let main = &module.functions[0];
        let text = main.to_string();
        assert!(text.contains("alloca"));
        assert!(text.contains("store"));
        assert!(text.contains("load"));
        assert!(text.contains("add"));
        assert!(text.contains("ret"));
    }

    #[test]
    fn if_lowering_leaves_merge_block_live() {
        let module = lower("if (1 < 2) { 1; } else { 2; }");
        let main = module.functions.iter().find(|f| f.name == "main").unwrap();
        // merge block must exist and not itself contain a `ret` emitted as
        // part of the if-lowering (the entry function's trailing `ret` is
        // appended separately, after the if returns control to `main`'s
        // own block list).
        let merge = main.blocks.iter().find(|b| b.name.starts_with("merge")).unwrap();
        assert!(!merge.instructions.iter().any(|i| matches!(i, Instruction::Ret { .. })));
    }

    #[test]
    fn call_lowers_to_call_instruction() {
        let module = lower("func f(x: int): int { return x; } f(1);");
        let main = module.functions.iter().find(|f| f.name == "main").unwrap();
        let has_call = main
            .blocks
            .iter()
            .flat_map(|b| &b.instructions)
            .any(|i| matches!(i, Instruction::Call { .. }));
        assert!(has_call);
    }
}
