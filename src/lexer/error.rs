use std::fmt::{self, Display};

use crate::token::Position;

/// A malformed character sequence encountered while scanning. The lexer
/// itself never produces one directly (illegal characters surface as
/// `TokenKind::Illegal` tokens instead); this type is for callers (the
/// parser, the REPL) that want to turn such a token into a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lex error at {}: {}", self.position, self.message)
    }
}

impl std::error::Error for LexError {}
