//! Runtime value model for the tree-walking evaluator.
//!
//! A tagged union over every value shape the evaluator produces, plus a
//! `Return` marker used to propagate `return` out of nested blocks up to a
//! call boundary.

mod hash;

pub use hash::HashKey;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::ast::{Block, Param};
use crate::scope::Scope;

pub type Builtin = fn(&[Value]) -> Result<Value, crate::error::ArityError>;

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(Rc<String>),
    Null,
    Void,
    Array(Rc<RefCell<Vec<Value>>>),
    Hash(Rc<RefCell<HashMap<HashKey, (Value, Value)>>>),
    Function(Rc<FunctionValue>),
    Builtin(Rc<BuiltinValue>),
    /// Not a first-class value a user can hold onto: propagates a `return`
    /// up through block evaluation until a call boundary unwraps it.
    Return(Box<Value>),
}

#[derive(Debug)]
pub struct FunctionValue {
    pub params: Vec<Param>,
    pub body: Block,
    pub env: Scope,
}

#[derive(Debug)]
pub struct BuiltinValue {
    pub name: &'static str,
    pub func: Builtin,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Rc::new(s.into()))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn hash(pairs: HashMap<HashKey, (Value, Value)>) -> Self {
        Value::Hash(Rc::new(RefCell::new(pairs)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Boolean(_) => "bool",
            Value::String(_) => "string",
            Value::Null => "null",
            Value::Void => "void",
            Value::Array(_) => "array",
            Value::Hash(_) => "hash",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin",
            Value::Return(inner) => inner.type_name(),
        }
    }

    /// A nonzero integer is falsy and zero is truthy. Reads backwards but
    /// is kept deliberately, not a bug.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i == 0,
            Value::Null | Value::Void => false,
            _ => true,
        }
    }

    /// Hashable-protocol key, used for `Hash` value storage and lookup.
    pub fn hash_key(&self) -> Option<HashKey> {
        hash::hash_key(self)
    }

    pub fn is_hashable(&self) -> bool {
        matches!(
            self,
            Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::String(_)
        )
    }

    /// `Null`/`Void` compare equal to themselves unconditionally,
    /// `Boolean`/`Integer`/`Float` compare structurally, and every
    /// heap-backed variant compares by `Rc` pointer identity. Backs the
    /// evaluator's `==`/`!=`.
    pub fn identity_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) | (Void, Void) => true,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (String(a), String(b)) => Rc::ptr_eq(a, b),
            (Array(a), Array(b)) => Rc::ptr_eq(a, b),
            (Hash(a), Hash(b)) => Rc::ptr_eq(a, b),
            (Function(a), Function(b)) => Rc::ptr_eq(a, b),
            (Builtin(a), Builtin(b)) => Rc::ptr_eq(a, b),
            (Return(a), Return(b)) => a.identity_eq(b),
            _ => false,
        }
    }

    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            // `Display` drops the fractional part for whole-number floats
            // (`3.0.to_string() == "3"`); `Debug` always keeps the point.
            Value::Float(f) => format!("{f:?}"),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.as_str().to_string(),
            Value::Null => "null".to_string(),
            Value::Void => "void".to_string(),
            Value::Array(items) => {
                let items = items.borrow();
                let rendered: Vec<String> = items.iter().map(|v| v.inspect()).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                let pairs = pairs.borrow();
                let rendered: Vec<String> = pairs
                    .values()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Function(_) => "<function>".to_string(),
            Value::Builtin(b) => format!("<builtin {}>", b.name),
            Value::Return(inner) => inner.inspect(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}
