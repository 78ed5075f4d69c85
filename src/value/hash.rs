//! Hashable-protocol key used for `Hash` value storage.
//!
//! `Integer`, `Boolean`, `String` and `Float` are hashable. A float hashes
//! by lossy truncation to its integer part, so `1.0` and `1.9` collide as
//! hash keys; that cast lives only here.

use std::fmt::{self, Display};

use super::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub type_tag: u8,
    pub value: u64,
}

const TAG_INTEGER: u8 = 0;
const TAG_BOOLEAN: u8 = 1;
const TAG_STRING: u8 = 2;
const TAG_FLOAT: u8 = 3;

/// FNV-1a/64.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

pub fn hash_key(value: &Value) -> Option<HashKey> {
    let key = match value {
        Value::Integer(i) => HashKey {
            type_tag: TAG_INTEGER,
            value: *i as u64,
        },
        Value::Boolean(b) => HashKey {
            type_tag: TAG_BOOLEAN,
            value: *b as u64,
        },
        Value::String(s) => HashKey {
            type_tag: TAG_STRING,
            value: fnv1a(s.as_bytes()),
        },
        // Deliberately lossy: truncate towards zero, then reinterpret as an
        // unsigned 64-bit pattern the same way the integer branch does.
        Value::Float(f) => HashKey {
            type_tag: TAG_FLOAT,
            value: (*f as i64) as u64,
        },
        _ => return None,
    };
    Some(key)
}

impl HashKey {
    pub fn inspect(&self) -> String {
        format!("{self}")
    }
}

impl Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}:{}>", self.type_tag, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_hashing_truncates_lossily() {
        let a = hash_key(&Value::Float(1.0)).unwrap();
        let b = hash_key(&Value::Float(1.9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn string_hashing_is_deterministic() {
        let a = hash_key(&Value::string("hi")).unwrap();
        let b = hash_key(&Value::string("hi")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_hashable_values_return_none() {
        assert!(hash_key(&Value::Null).is_none());
        assert!(hash_key(&Value::array(vec![])).is_none());
    }

    #[test]
    fn integer_and_boolean_do_not_collide_across_types() {
        let int_zero = hash_key(&Value::Integer(0)).unwrap();
        let bool_false = hash_key(&Value::Boolean(false)).unwrap();
        assert_ne!(int_zero, bool_false);
    }
}
