//! Parent-linked scope for the type checker, holding `Type` bindings.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::Type;

#[derive(Debug)]
struct Frame {
    bindings: HashMap<String, Type>,
    parent: Option<TypeScope>,
}

#[derive(Debug, Clone)]
pub struct TypeScope(Rc<RefCell<Frame>>);

impl TypeScope {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: None,
        })))
    }

    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    pub fn define(&self, name: &str, ty: Type) {
        self.0.borrow_mut().bindings.insert(name.to_string(), ty);
    }

    pub fn lookup(&self, name: &str) -> Option<Type> {
        let frame = self.0.borrow();
        if let Some(ty) = frame.bindings.get(name) {
            return Some(*ty);
        }
        frame.parent.as_ref().and_then(|p| p.lookup(name))
    }
}

impl Default for TypeScope {
    fn default() -> Self {
        Self::new()
    }
}
