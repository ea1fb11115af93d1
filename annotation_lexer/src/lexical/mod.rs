//! Lexical analysis of docblock annotations
//!
//! [`Lexer`] is the session type a parser drives. [`tokenizer`] holds the
//! generic pattern-driven scanner and [`grammar`] instantiates it for
//! annotation text.

pub mod analyzer;
pub mod grammar;
pub mod tokenizer;

use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::Token;

pub use analyzer::{Lexer, LexerError, LexicalMetrics};
pub use tokenizer::{
    Classifier, Lexeme, PatternTable, Scan, Tokenizer, TokenizerError, UnmatchedPolicy,
};

/// Scan `input` with default preferences; the result ends with `Eof`
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokens().to_vec()
}

/// Create a lexer with default preferences
pub fn create_lexer(input: &str) -> Lexer {
    Lexer::new(input)
}

/// Create a lexer with custom runtime preferences
pub fn create_lexer_with_preferences(input: &str, preferences: LexicalPreferences) -> Lexer {
    Lexer::with_preferences(input, preferences)
}

/// Compile the annotation grammar and check its diagnostic codes (for system startup)
pub fn init_lexical_analysis() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::UNALIGNED_POSITION,
        codes::tokenizer::INVALID_PATTERN,
        codes::tokenizer::EMPTY_PATTERN_TABLE,
    ];

    for code in &lexical_codes {
        if code.info().is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    let tokenizer = grammar::annotation_tokenizer();
    crate::log_debug!("Annotation grammar ready",
        "pattern" => tokenizer.pattern()
    );

    Ok(())
}

/// Token distribution over a slice of tokens. `Eof` is not counted.
pub fn get_token_counts(tokens: &[Token]) -> LexicalMetrics {
    LexicalMetrics::from_tokens(tokens)
}
