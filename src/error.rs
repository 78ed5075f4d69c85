//! Crate-wide diagnostic types for the evaluator/type-checker/IR passes.
//!
//! Each is a plain `{message, position}` struct with a manual `Display`
//! and `std::error::Error` impl. `LexError`/`ParseError` live beside
//! their producing modules; the rest live here since no single
//! downstream module owns all of them.

use std::fmt::{self, Display};

use crate::token::Position;

macro_rules! position_error {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub message: String,
            pub position: Position,
        }

        impl $name {
            pub fn new(message: impl Into<String>, position: Position) -> Self {
                Self {
                    message: message.into(),
                    position,
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}: {} at {}", stringify!($name), self.message, self.position)
            }
        }

        impl std::error::Error for $name {}
    };
}

position_error!(NameError, "Unbound identifier, or assignment to an undeclared/constant name.");
position_error!(TypeError, "A value or expression did not match the type the checker expected.");
position_error!(ArityError, "A call was made with the wrong number of arguments.");
position_error!(RangeError, "An index or key lookup fell outside the collection's bounds.");
position_error!(IrError, "The IR lowerer encountered a construct it cannot lower.");

/// The union of every evaluator-facing error kind, for call sites (e.g. the
/// REPL) that want to report any of them uniformly without matching on
/// which pass produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum AntheError {
    Lex(crate::lexer::LexError),
    Parse(crate::parser::ParseError),
    Name(NameError),
    Type(TypeError),
    Arity(ArityError),
    Range(RangeError),
    Ir(IrError),
}

impl Display for AntheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AntheError::Lex(e) => write!(f, "{e}"),
            AntheError::Parse(e) => write!(f, "{e}"),
            AntheError::Name(e) => write!(f, "{e}"),
            AntheError::Type(e) => write!(f, "{e}"),
            AntheError::Arity(e) => write!(f, "{e}"),
            AntheError::Range(e) => write!(f, "{e}"),
            AntheError::Ir(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AntheError {}

impl From<NameError> for AntheError {
    fn from(e: NameError) -> Self {
        AntheError::Name(e)
    }
}

impl From<TypeError> for AntheError {
    fn from(e: TypeError) -> Self {
        AntheError::Type(e)
    }
}

impl From<ArityError> for AntheError {
    fn from(e: ArityError) -> Self {
        AntheError::Arity(e)
    }
}

impl From<RangeError> for AntheError {
    fn from(e: RangeError) -> Self {
        AntheError::Range(e)
    }
}

impl From<IrError> for AntheError {
    fn from(e: IrError) -> Self {
        AntheError::Ir(e)
    }
}
