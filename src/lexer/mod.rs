// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::io::{self, Read};

mod scanner;
mod source;
mod tokenizer;

pub use source::{CharSource, ReaderSource, StrSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // --- special ---
    Eof,
    Illegal,
    Comment,

    // --- structure ---
    LBrace,
    RBrace,
    Equals,
    Semicolon,
    Period,

    // --- symbols ---
    Minus,
    Dollar,

    // --- literals ---
    Identifier,
    Boolean,
    Integer,
    Float,
    String,
    Null,

    // --- keywords ---
    Include,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Comment => "COMMENT",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Equals => "EQUALS",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Period => "PERIOD",
            TokenKind::Minus => "MINUS",
            TokenKind::Dollar => "DOLLAR",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::String => "STRING",
            TokenKind::Null => "NULL",
            TokenKind::Include => "INCLUDE",
        };
        f.write_str(name)
    }
}

/// A single lexeme with the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Pull-based tokenizer over any [`CharSource`].
///
/// Keeps two characters of lookahead and never buffers the rest of the input.
/// Once the source is exhausted every call returns an `Eof` token.
pub struct Lexer<'a> {
    source: Box<dyn CharSource + 'a>,
    peek: Option<char>,
    peek2: Option<char>,
    exhausted: bool,
    failure: Option<io::Error>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::from_source(Box::new(StrSource::new(input)))
    }

    pub fn from_reader<R: Read + 'a>(reader: R) -> Self {
        Self::from_source(Box::new(ReaderSource::new(reader)))
    }

    pub fn from_source(source: Box<dyn CharSource + 'a>) -> Self {
        let mut lexer = Lexer {
            source,
            peek: None,
            peek2: None,
            exhausted: false,
            failure: None,
            line: 1,
            column: 1,
        };
        lexer.peek = scanner::pull(&mut lexer);
        lexer.peek2 = scanner::pull(&mut lexer);
        lexer
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Produce the next token. Unrecognized input becomes an `Illegal` token.
    pub fn next_token(&mut self) -> Token {
        tokenizer::next_token(self)
    }

    /// The read error that cut the input short, if any.
    ///
    /// A failing source looks like end of input to the tokenizer; callers that
    /// reach `Eof` check here to tell the two apart.
    pub fn take_failure(&mut self) -> Option<io::Error> {
        self.failure.take()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.is(TokenKind::Eof) { None } else { Some(token) }
    }
}
