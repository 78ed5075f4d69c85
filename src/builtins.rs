//! Built-in functions available in every scope without an explicit import.
//!
//! `print` and `type` are the baseline; `len` rounds out the table with a
//! common, low-risk addition over arrays, strings and hashes.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::ArityError;
use crate::token::Position;
use crate::value::{BuiltinValue, Value};

fn arity_error(name: &str, expected: usize, got: usize) -> ArityError {
    ArityError::new(
        format!("`{name}` expects {expected} argument(s), got {got}"),
        Position::default(),
    )
}

/// Prints each argument's `inspect` form on its own line.
fn builtin_print(args: &[Value]) -> Result<Value, ArityError> {
    for arg in args {
        println!("{}", arg.inspect());
    }
    Ok(Value::Void)
}

/// Prints the argument's `inspect` form and type tag.
fn builtin_type(args: &[Value]) -> Result<Value, ArityError> {
    if args.len() != 1 {
        return Err(arity_error("type", 1, args.len()));
    }
    println!("{} {}", args[0].inspect(), args[0].type_name());
    Ok(Value::Void)
}

fn builtin_len(args: &[Value]) -> Result<Value, ArityError> {
    if args.len() != 1 {
        return Err(arity_error("len", 1, args.len()));
    }
    let length = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.borrow().len(),
        Value::Hash(pairs) => pairs.borrow().len(),
        other => {
            return Err(ArityError::new(
                format!("`len` is not defined for {}", other.type_name()),
                Position::default(),
            ))
        }
    };
    Ok(Value::Integer(length as i64))
}

static BUILTINS: Lazy<HashMap<&'static str, &'static BuiltinValue>> = Lazy::new(|| {
    let entries: &'static [BuiltinValue] = Box::leak(Box::new([
        BuiltinValue {
            name: "print",
            func: builtin_print,
        },
        BuiltinValue {
            name: "type",
            func: builtin_type,
        },
        BuiltinValue {
            name: "len",
            func: builtin_len,
        },
    ]));

    entries.iter().map(|b| (b.name, b)).collect()
});

pub fn lookup(name: &str) -> Option<Value> {
    BUILTINS
        .get(name)
        .map(|b| Value::Builtin(std::rc::Rc::new(BuiltinValue { name: b.name, func: b.func })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_of_array() {
        let v = builtin_len(&[Value::array(vec![Value::Integer(1), Value::Integer(2)])]).unwrap();
        assert!(matches!(v, Value::Integer(2)));
    }

    #[test]
    fn len_of_string() {
        let v = builtin_len(&[Value::string("hello")]).unwrap();
        assert!(matches!(v, Value::Integer(5)));
    }

    #[test]
    fn type_builtin_returns_void() {
        let v = builtin_type(&[Value::Integer(1)]).unwrap();
        assert!(matches!(v, Value::Void));
    }

    #[test]
    fn type_builtin_wrong_arity_is_an_error() {
        assert!(builtin_type(&[]).is_err());
    }

    #[test]
    fn unknown_builtin_is_absent() {
        assert!(lookup("does_not_exist").is_none());
    }
}
