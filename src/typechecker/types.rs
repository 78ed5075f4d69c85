//! Inferred type representation for the experimental checker.
//!
//! Limited to primitives plus an `Unknown` escape hatch; array, function
//! and struct shapes are not tracked.

use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    /// Anything the checker doesn't attempt to pin down; always accepted
    /// against any annotation.
    Unknown,
}

impl Type {
    pub fn accepts(&self, other: &Type) -> bool {
        *self == *other || *self == Type::Unknown || *other == Type::Unknown
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}
