//! Token system for annotation lexical analysis
//!
//! The lexer turns a docblock into a flat list of [`Token`] values, each
//! tagged with a [`TokenType`]. Whitespace and the `*` gutter of a docblock
//! never become tokens; the list always ends with a single `Eof` token.
//!
//! ## Token Types
//!
//! - **Literals**: `Integer`, `Float`, `String`, `True`, `False`
//! - **Names**: `Identifier`, including namespace-qualified names such as
//!   `Doctrine\ORM\Mapping\Column`
//! - **Fallback**: `None` for lexemes that match a pattern but classify as
//!   nothing (for example `1.2.3`), and for captured punctuation
//! - **Sentinel**: `Eof`, positioned at the input length

pub mod token;

pub use token::{Token, TokenType};

// Re-export span types from utils
pub use crate::utils::{Position, SourceMap, Span};
