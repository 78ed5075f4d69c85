//! Lexically scoped, parent-linked environment shared by the evaluator.
//!
//! Each scope holds its own bindings in an `Rc<RefCell<_>>` frame and
//! keeps a handle to its parent, so a closure can keep its defining scope
//! alive after the call that created it returns.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::NameError;
use crate::token::Position;
use crate::value::Value;

#[derive(Debug)]
struct ScopeInner {
    variables: HashMap<String, Value>,
    constants: std::collections::HashSet<String>,
    parent: Option<Scope>,
}

#[derive(Debug, Clone)]
pub struct Scope(Rc<RefCell<ScopeInner>>);

impl Scope {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ScopeInner {
            variables: HashMap::new(),
            constants: std::collections::HashSet::new(),
            parent: None,
        })))
    }

    /// Create a child scope whose lookups fall back to `self` when a name
    /// isn't defined locally. Used both for block scoping and for capturing
    /// a function literal's defining environment.
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(ScopeInner {
            variables: HashMap::new(),
            constants: std::collections::HashSet::new(),
            parent: Some(self.clone()),
        })))
    }

    pub fn define_variable(&self, name: &str, value: Value, position: Position) -> Result<(), NameError> {
        self.define(name, value, position, false)
    }

    pub fn define_constant(&self, name: &str, value: Value, position: Position) -> Result<(), NameError> {
        self.define(name, value, position, true)
    }

    fn define(&self, name: &str, value: Value, position: Position, as_const: bool) -> Result<(), NameError> {
        let mut inner = self.0.borrow_mut();
        if inner.variables.contains_key(name) {
            return Err(NameError::new(
                format!("identifier `{name}` is already declared in this scope"),
                position,
            ));
        }
        inner.variables.insert(name.to_string(), value);
        if as_const {
            inner.constants.insert(name.to_string());
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let inner = self.0.borrow();
        if let Some(value) = inner.variables.get(name) {
            return Some(value.clone());
        }
        inner.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Assign to an already-declared binding, walking up the parent chain
    /// to find the scope that owns it. Fails if the name is undeclared
    /// anywhere in the chain, or if it names a constant.
    pub fn assign(&self, name: &str, value: Value, position: Position) -> Result<(), NameError> {
        let mut inner = self.0.borrow_mut();
        if inner.variables.contains_key(name) {
            if inner.constants.contains(name) {
                return Err(NameError::new(
                    format!("cannot assign to constant `{name}`"),
                    position,
                ));
            }
            inner.variables.insert(name.to_string(), value);
            return Ok(());
        }
        match inner.parent.clone() {
            Some(parent) => {
                drop(inner);
                parent.assign(name, value, position)
            }
            None => Err(NameError::new(
                format!("identifier `{name}` is not defined"),
                position,
            )),
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Position;

    fn pos() -> Position {
        Position::new(1, 1)
    }

    #[test]
    fn child_scope_sees_parent_bindings() {
        let parent = Scope::new();
        parent.define_variable("x", Value::Integer(1), pos()).unwrap();
        let child = parent.child();
        assert!(matches!(child.lookup("x"), Some(Value::Integer(1))));
    }

    #[test]
    fn redeclaring_in_the_same_scope_fails() {
        let scope = Scope::new();
        scope.define_variable("x", Value::Integer(1), pos()).unwrap();
        assert!(scope.define_variable("x", Value::Integer(2), pos()).is_err());
    }

    #[test]
    fn assigning_to_a_constant_fails() {
        let scope = Scope::new();
        scope.define_constant("x", Value::Integer(1), pos()).unwrap();
        assert!(scope.assign("x", Value::Integer(2), pos()).is_err());
    }

    #[test]
    fn assignment_reaches_through_to_defining_scope() {
        let parent = Scope::new();
        parent.define_variable("x", Value::Integer(1), pos()).unwrap();
        let child = parent.child();
        child.assign("x", Value::Integer(99), pos()).unwrap();
        assert!(matches!(parent.lookup("x"), Some(Value::Integer(99))));
    }

    #[test]
    fn assigning_undefined_name_fails() {
        let scope = Scope::new();
        assert!(scope.assign("nope", Value::Integer(1), pos()).is_err());
    }

    #[test]
    fn closures_keep_their_defining_scope_alive() {
        let outer_value;
        {
            let outer = Scope::new();
            outer.define_variable("captured", Value::Integer(7), pos()).unwrap();
            let closure_env = outer.child();
            outer_value = closure_env.lookup("captured");
        }
        assert!(matches!(outer_value, Some(Value::Integer(7))));
    }
}
