//! Rune-oriented lexer for Anthe source.
//!
//! The lexer owns a `Peekable<Chars>` and a cursor, and hands back one
//! token per call, repeating `Eof` forever once the source is exhausted.

mod error;

pub use error::LexError;

use std::iter::Peekable;
use std::str::Chars;

use crate::token::{lookup_word, Position, Token, TokenKind};

const BOM: char = '\u{feff}';

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
    consumed_bom: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            col: 1,
            consumed_bom: false,
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek2(&self) -> Option<char> {
        let mut clone = self.chars.clone();
        clone.next();
        clone.next()
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.chars.next()?;
        match next {
            '\n' => {
                self.line += 1;
                self.col = 1;
            }
            _ => self.col += 1,
        }
        Some(next)
    }

    fn eat_bom(&mut self) {
        if !self.consumed_bom {
            self.consumed_bom = true;
            if self.peek() == Some(BOM) {
                self.bump();
            }
        }
    }

    fn eat_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c == ' ' || c == '\t' || c == '\r' || c == '\n') {
            self.bump();
        }
    }

    /// Advance and return the next token. Returns an `Eof` token
    /// repeatedly once the source is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.eat_bom();
        self.eat_whitespace();

        let position = self.position();

        let Some(c) = self.peek() else {
            return Token::eof(position);
        };

        match c {
            'a'..='z' | 'A'..='Z' | '_' => self.lex_ident(position),
            '0'..='9' => self.lex_number(position),
            '"' | '\'' => self.lex_string(position, c),
            _ => self.lex_symbol(position),
        }
    }

    fn lex_ident(&mut self, position: Position) -> Token {
        let mut lexeme = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            lexeme.push(self.bump().expect("peeked"));
        }

        let kind = lookup_word(&lexeme).unwrap_or(TokenKind::Ident);
        Token::new(kind, lexeme, position)
    }

    fn lex_number(&mut self, position: Position) -> Token {
        let mut lexeme = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            lexeme.push(self.bump().expect("peeked"));
        }

        // A `.` only starts a fractional part when followed by a digit;
        // otherwise it belongs to whatever comes next (e.g. a field access
        // or a standalone `.` token).
        if self.peek() == Some('.') && matches!(self.peek2(), Some(d) if d.is_ascii_digit()) {
            lexeme.push(self.bump().expect("peeked")); // '.'
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                lexeme.push(self.bump().expect("peeked"));
            }
            return Token::new(TokenKind::Float, lexeme, position);
        }

        Token::new(TokenKind::Int, lexeme, position)
    }

    fn lex_string(&mut self, position: Position, quote: char) -> Token {
        self.bump(); // opening quote
        let mut lexeme = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.bump();
                    return Token::new(TokenKind::Str, lexeme, position);
                }
                Some(_) => lexeme.push(self.bump().expect("peeked")),
                None => {
                    // unterminated string: surface as illegal, carrying what
                    // was read so far as the diagnostic literal.
                    return Token::new(TokenKind::Illegal, lexeme, position);
                }
            }
        }
    }

    fn lex_symbol(&mut self, position: Position) -> Token {
        let c = self.bump().expect("peeked");

        macro_rules! two_char {
            ($second:literal, $wide:expr, $narrow:expr) => {
                if self.peek() == Some($second) {
                    self.bump();
                    Token::new($wide, format!("{c}{}", $second), position)
                } else {
                    Token::new($narrow, c.to_string(), position)
                }
            };
        }

        use TokenKind::*;
        match c {
            '=' => two_char!('=', Eq, Assign),
            '!' => two_char!('=', NotEq, Bang),
            '<' => two_char!('=', Le, Lt),
            '>' => two_char!('=', Ge, Gt),
            '+' => Token::new(Plus, c.to_string(), position),
            '-' => Token::new(Minus, c.to_string(), position),
            '*' => Token::new(Asterisk, c.to_string(), position),
            '/' => Token::new(Slash, c.to_string(), position),
            ',' => Token::new(Comma, c.to_string(), position),
            ';' => Token::new(Semicolon, c.to_string(), position),
            ':' => Token::new(Colon, c.to_string(), position),
            '(' => Token::new(LParen, c.to_string(), position),
            ')' => Token::new(RParen, c.to_string(), position),
            '{' => Token::new(LBrace, c.to_string(), position),
            '}' => Token::new(RBrace, c.to_string(), position),
            '[' => Token::new(LBracket, c.to_string(), position),
            ']' => Token::new(RBracket, c.to_string(), position),
            '?' => Token::new(Question, c.to_string(), position),
            other => Token::new(Illegal, other.to_string(), position),
        }
    }

    /// Lex the whole source eagerly, stopping at (and including) the first
    /// `Eof` token. Convenience used by the parser and by tests; the lazy
    /// `next_token` contract above remains the primary interface.
    pub fn lex_all(mut self) -> Vec<Token> {
        let mut tokens = vec![];
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }
}
