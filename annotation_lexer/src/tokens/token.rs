//! Annotation token types
//!
//! A token is an immutable (type, normalized value, byte offset) triple. The
//! value is already normalized by the grammar: integers lose leading zeros,
//! strings lose their quotes and doubled-quote escapes.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token types produced by the annotation lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Unclassified lexeme (malformed number, captured punctuation)
    None,
    Integer,
    Float,
    String,
    Identifier,
    True,
    False,
    /// End of input marker
    Eof,
}

impl TokenType {
    /// Every token type, in declaration order
    pub const ALL: [TokenType; 8] = [
        TokenType::None,
        TokenType::Integer,
        TokenType::Float,
        TokenType::String,
        TokenType::Identifier,
        TokenType::True,
        TokenType::False,
        TokenType::Eof,
    ];

    /// Stable literal name of this token type
    pub fn literal(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::Identifier => "IDENTIFIER",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Eof => "EOF",
        }
    }

    /// Look up a token type by its literal name (case-insensitive)
    pub fn from_literal(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.literal().eq_ignore_ascii_case(name))
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Float | Self::String | Self::True | Self::False
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::True | Self::False)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// A classified lexeme and the byte offset where it starts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenType,
    /// Normalized value
    pub value: String,
    /// Byte offset of the first character in the source
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenType, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }

    /// End of input marker placed at `position` (the input length)
    pub fn eof(position: usize) -> Self {
        Self::new(TokenType::Eof, String::new(), position)
    }

    pub fn is(&self, kind: TokenType) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenType::Eof
    }

    pub fn is_literal(&self) -> bool {
        self.kind.is_literal()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }

    /// Integer value, if this is an integer token that fits in an `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self.kind {
            TokenType::Integer => self.value.parse().ok(),
            _ => None,
        }
    }

    /// Numeric value of an integer or float token
    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            TokenType::Integer | TokenType::Float => self.value.parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            TokenType::True => Some(true),
            TokenType::False => Some(false),
            _ => None,
        }
    }

    /// String contents, if this is a string token
    pub fn as_str(&self) -> Option<&str> {
        match self.kind {
            TokenType::String => Some(&self.value),
            _ => None,
        }
    }

    /// The token as it would be written in a docblock
    pub fn as_source_string(&self) -> String {
        match self.kind {
            TokenType::String => format!("\"{}\"", self.value.replace('"', "\"\"")),
            TokenType::Eof => "<EOF>".to_string(),
            _ => self.value.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_source_string())
    }
}
