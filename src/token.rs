//! Token model for the Anthe lexer and parser.
//!
//! A token is a `{kind, literal}` pair plus the position it was scanned at.
//! Keywords and built-in type names are recognised only when the lexeme
//! matches a fixed table; anything else lexing as a run of
//! letters/underscores is an `Ident`.

use std::collections::HashMap;
use std::fmt::{self, Display};

use once_cell::sync::Lazy;

/// Line/column position of a token within its source. Both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Illegal,

    Ident,
    Int,
    Float,
    Str,

    // keywords
    Func,
    Return,
    Let,
    Const,
    If,
    Else,
    True,
    False,
    Null,
    Void,
    Struct,

    // built-in type names
    TypeInt,
    TypeString,
    TypeFloat,
    TypeBool,
    TypeArray,
    TypeSet,
    TypeMap,
    TypeObject,
    TypeOptional,
    TypeResult,
    TypeAny,
    TypeAnyObject,

    // operators
    Assign,
    Bang,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    NotEq,

    // delimiters
    Comma,
    Semicolon,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Question,
}

/// Table of fixed keyword/built-in-type lexemes, consulted after an
/// identifier has been fully scanned.
static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    let mut m = HashMap::new();
    m.insert("func", Func);
    m.insert("return", Return);
    m.insert("let", Let);
    m.insert("const", Const);
    m.insert("if", If);
    m.insert("else", Else);
    m.insert("true", True);
    m.insert("false", False);
    m.insert("null", Null);
    m.insert("void", Void);
    m.insert("struct", Struct);
    m.insert("int", TypeInt);
    m.insert("string", TypeString);
    m.insert("float", TypeFloat);
    m.insert("bool", TypeBool);
    m.insert("array", TypeArray);
    m.insert("set", TypeSet);
    m.insert("map", TypeMap);
    m.insert("object", TypeObject);
    m.insert("optional", TypeOptional);
    m.insert("result", TypeResult);
    m.insert("any", TypeAny);
    m.insert("any_object", TypeAnyObject);
    m
});

/// Look up a scanned word in the keyword/built-in-type table. Returns
/// `None` (i.e. "treat it as an identifier") when the word is not a fixed
/// lexeme.
pub fn lookup_word(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word).copied()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            literal: literal.into(),
            position,
        }
    }

    pub fn eof(position: Position) -> Self {
        Self::new(TokenKind::Eof, "", position)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_recognised() {
        assert_eq!(lookup_word("func"), Some(TokenKind::Func));
        assert_eq!(lookup_word("optional"), Some(TokenKind::TypeOptional));
        assert_eq!(lookup_word("any_object"), Some(TokenKind::TypeAnyObject));
    }

    #[test]
    fn unknown_word_is_not_a_keyword() {
        assert_eq!(lookup_word("foobar"), None);
    }
}
