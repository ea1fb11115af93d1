//! Annotation grammar: pattern table, literal classification and keywords
//!
//! Identifiers may contain `\` so that namespace-qualified class names lex as
//! a single token. The numeric pattern accepts any number of `.digits` groups;
//! a lexeme such as `1.2.3` therefore matches as one unit and is classified as
//! `None` because it is not a valid number.

use super::tokenizer::{PatternTable, Tokenizer};
use crate::logging::{codes, safe_log_critical};
use crate::tokens::TokenType;
use std::sync::OnceLock;

/// Patterns whose matches become tokens, in priority order
pub const CATCHABLE_PATTERNS: [&str; 3] = [
    r"[A-Za-z_][A-Za-z0-9_\\]*",
    r"[0-9]+(?:\.[0-9]+)*(?:[eE][+-]?[0-9]+)?",
    r#""(?:[^"]|"")*""#,
];

/// Whitespace runs and the `*` gutter of a docblock
pub const IGNORABLE_PATTERNS: [&str; 2] = [r"\s+", r"\*+"];

/// Upper-cased identifier text that maps to a dedicated token type
static KEYWORDS: [(&str, TokenType); 2] = [("TRUE", TokenType::True), ("FALSE", TokenType::False)];

static ANNOTATION_TOKENIZER: OnceLock<Tokenizer<TokenType>> = OnceLock::new();

/// The process-wide tokenizer for annotation text
pub fn annotation_tokenizer() -> &'static Tokenizer<TokenType> {
    ANNOTATION_TOKENIZER.get_or_init(|| {
        let table = PatternTable::new(&CATCHABLE_PATTERNS, &IGNORABLE_PATTERNS);
        match Tokenizer::new(&table, classify, TokenType::None) {
            Ok(tokenizer) => tokenizer,
            Err(error) => {
                let message = format!("Built-in annotation grammar failed to compile: {}", error);
                safe_log_critical(codes::system::INTERNAL_ERROR, &message);
                panic!("{}", message);
            }
        }
    })
}

/// Classify a lexeme and normalize its value
pub fn classify(lexeme: &str) -> (TokenType, String) {
    if is_valid_number(lexeme) {
        let kind = if lexeme.contains(['.', 'e', 'E']) {
            TokenType::Float
        } else {
            TokenType::Integer
        };
        let value = match kind {
            TokenType::Integer => normalize_integer(lexeme),
            _ => lexeme.to_string(),
        };
        return (kind, value);
    }

    match lexeme.chars().next() {
        Some('"') => (TokenType::String, unescape_string(lexeme)),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            (keyword_type(lexeme), lexeme.to_string())
        }
        _ => (TokenType::None, lexeme.to_string()),
    }
}

/// Token type for an identifier: a keyword type or `Identifier`
pub fn keyword_type(identifier: &str) -> TokenType {
    KEYWORDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(identifier))
        .map(|(_, kind)| *kind)
        .unwrap_or(TokenType::Identifier)
}

/// Digits, an optional single fraction, and an optional exponent
pub fn is_valid_number(text: &str) -> bool {
    fn digits(bytes: &[u8], mut i: usize) -> usize {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    }

    let bytes = text.as_bytes();
    let mut i = digits(bytes, 0);
    if i == 0 {
        return false;
    }

    if i < bytes.len() && bytes[i] == b'.' {
        let end = digits(bytes, i + 1);
        if end == i + 1 {
            return false;
        }
        i = end;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let end = digits(bytes, i);
        if end == i {
            return false;
        }
        i = end;
    }

    i == bytes.len()
}

/// Strip leading zeros; an all-zero run becomes `"0"`
pub fn normalize_integer(digits: &str) -> String {
    match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        rest => rest.to_string(),
    }
}

/// Drop the surrounding quotes and collapse every `""` to `"`
pub fn unescape_string(raw: &str) -> String {
    let inner = raw.strip_prefix('"').unwrap_or(raw);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    inner.replace("\"\"", "\"")
}
