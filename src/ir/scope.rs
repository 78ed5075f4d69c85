//! Nested symbol table for the IR lowerer.
//!
//! A stack of symbol maps tracking each binding's storage slot and
//! whether it's a parameter. Lowering only ever walks one branch of the
//! AST at a time, so a child scope clones its parent's frame stack and
//! pushes a fresh frame on top.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Symbol {
    pub slot: String,
    pub is_parameter: bool,
}

impl Symbol {
    pub fn local(slot: String) -> Self {
        Self {
            slot,
            is_parameter: false,
        }
    }

    pub fn parameter(slot: String) -> Self {
        Self {
            slot,
            is_parameter: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolScope {
    frames: Vec<HashMap<String, Symbol>>,
}

impl SymbolScope {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    pub fn child(&self) -> Self {
        let mut frames = self.frames.clone();
        frames.push(HashMap::new());
        Self { frames }
    }

    pub fn define(&mut self, name: &str, symbol: Symbol) {
        self.frames
            .last_mut()
            .expect("scope always has at least one frame")
            .insert(name.to_string(), symbol);
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .cloned()
    }
}

impl Default for SymbolScope {
    fn default() -> Self {
        Self::new()
    }
}
