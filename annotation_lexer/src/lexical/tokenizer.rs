//! Pattern-driven scanning engine
//!
//! A [`Tokenizer`] compiles a [`PatternTable`] into one alternation:
//!
//! ```text
//! (?P<catchable>(?:c1)|(?:c2)|...)|(?:i1)|(?:i2)|...|(?P<unmatched>.)
//! ```
//!
//! The first alternative that matches at a scan position wins. Catchable
//! matches are handed to the classification callback; ignorable matches are
//! skipped; anything else falls through to the single-character catch-all and
//! is either discarded or captured, depending on the [`UnmatchedPolicy`].
//! Scanning is total: every byte of input is consumed by some alternative.

use crate::config::compile_time::lexical::TOKEN_CAPACITY_HINT;
use crate::logging::{codes, Code};
use crate::{log_error, log_success};
use regex::{Regex, RegexBuilder};

const CATCHABLE_GROUP: &str = "catchable";
const UNMATCHED_GROUP: &str = "unmatched";

/// Errors raised while compiling a pattern table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizerError {
    #[error("Invalid tokenizer pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Tokenizer requires at least one catchable pattern")]
    EmptyPatternTable,
}

impl TokenizerError {
    pub fn error_code(&self) -> Code {
        match self {
            TokenizerError::InvalidPattern { .. } => codes::tokenizer::INVALID_PATTERN,
            TokenizerError::EmptyPatternTable => codes::tokenizer::EMPTY_PATTERN_TABLE,
        }
    }
}

/// Ordered catchable and ignorable patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternTable {
    /// Patterns whose matches become lexemes, in priority order
    pub catchable: Vec<String>,
    /// Patterns whose matches are skipped
    pub ignorable: Vec<String>,
    /// Compile every pattern with the `i` flag
    pub case_insensitive: bool,
}

impl PatternTable {
    pub fn new(catchable: &[&str], ignorable: &[&str]) -> Self {
        Self {
            catchable: catchable.iter().map(|p| p.to_string()).collect(),
            ignorable: ignorable.iter().map(|p| p.to_string()).collect(),
            case_insensitive: false,
        }
    }

    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    fn alternation(&self) -> String {
        let catchable = self
            .catchable
            .iter()
            .map(|p| format!("(?:{})", p))
            .collect::<Vec<_>>()
            .join("|");

        let mut pattern = format!("(?P<{}>{})", CATCHABLE_GROUP, catchable);
        for ignorable in &self.ignorable {
            pattern.push_str(&format!("|(?:{})", ignorable));
        }
        pattern.push_str(&format!("|(?P<{}>(?s:.))", UNMATCHED_GROUP));
        pattern
    }
}

/// What happens to characters no pattern matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedPolicy {
    #[default]
    Discard,
    /// Emit each character as a lexeme of the tokenizer's unmatched kind
    Capture,
}

/// Maps a catchable match to its kind and normalized value
pub type Classifier<K> = fn(&str) -> (K, String);

/// A classified match and the byte offset where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme<K> {
    pub kind: K,
    pub value: String,
    pub position: usize,
}

/// Result of one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan<K> {
    pub lexemes: Vec<Lexeme<K>>,
    /// Characters that reached the catch-all, whether discarded or captured
    pub unmatched: usize,
}

/// Compiled pattern table plus classification callback
#[derive(Clone)]
pub struct Tokenizer<K> {
    regex: Regex,
    classify: Classifier<K>,
    unmatched_kind: K,
}

impl<K: std::fmt::Debug> std::fmt::Debug for Tokenizer<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("pattern", &self.regex.as_str())
            .field("unmatched_kind", &self.unmatched_kind)
            .finish()
    }
}

impl<K: Copy> Tokenizer<K> {
    /// Compile a pattern table. `unmatched_kind` tags captured catch-all characters.
    pub fn new(
        table: &PatternTable,
        classify: Classifier<K>,
        unmatched_kind: K,
    ) -> Result<Self, TokenizerError> {
        match Self::compile(table) {
            Ok(regex) => {
                log_success!(codes::success::TOKENIZER_COMPILED, "Tokenizer compiled",
                    "catchable" => table.catchable.len(),
                    "ignorable" => table.ignorable.len()
                );
                Ok(Self {
                    regex,
                    classify,
                    unmatched_kind,
                })
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    "catchable" => table.catchable.len(),
                    "ignorable" => table.ignorable.len()
                );
                Err(error)
            }
        }
    }

    fn compile(table: &PatternTable) -> Result<Regex, TokenizerError> {
        if table.catchable.is_empty() {
            return Err(TokenizerError::EmptyPatternTable);
        }

        // Check each pattern on its own so the error names the culprit
        for pattern in table.catchable.iter().chain(&table.ignorable) {
            Regex::new(pattern).map_err(|e| TokenizerError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        }

        let alternation = table.alternation();
        RegexBuilder::new(&alternation)
            .case_insensitive(table.case_insensitive)
            .build()
            .map_err(|e| TokenizerError::InvalidPattern {
                pattern: alternation.clone(),
                message: e.to_string(),
            })
    }

    /// The combined pattern this tokenizer runs
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Source length in bytes of the lexeme `scan` finds at `position`
    pub fn lexeme_len_at(&self, input: &str, position: usize) -> usize {
        if !input.is_char_boundary(position) {
            return 0;
        }
        self.regex
            .find_at(input, position)
            .filter(|m| m.start() == position)
            .map_or(0, |m| m.len())
    }

    /// Split `input` into classified lexemes
    pub fn scan(&self, input: &str, policy: UnmatchedPolicy) -> Scan<K> {
        let mut lexemes = Vec::with_capacity(TOKEN_CAPACITY_HINT.min(input.len()));
        let mut unmatched = 0;

        for captures in self.regex.captures_iter(input) {
            if let Some(m) = captures.name(CATCHABLE_GROUP) {
                if m.as_str().is_empty() {
                    continue;
                }
                let (kind, value) = (self.classify)(m.as_str());
                lexemes.push(Lexeme {
                    kind,
                    value,
                    position: m.start(),
                });
            } else if let Some(m) = captures.name(UNMATCHED_GROUP) {
                unmatched += 1;
                if policy == UnmatchedPolicy::Capture {
                    lexemes.push(Lexeme {
                        kind: self.unmatched_kind,
                        value: m.as_str().to_string(),
                        position: m.start(),
                    });
                }
            }
        }

        Scan { lexemes, unmatched }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Word,
        Number,
        Other,
    }

    fn classify(lexeme: &str) -> (Kind, String) {
        if lexeme.chars().all(|c| c.is_ascii_digit()) {
            (Kind::Number, lexeme.to_string())
        } else {
            (Kind::Word, lexeme.to_lowercase())
        }
    }

    fn word_tokenizer() -> Tokenizer<Kind> {
        let table = PatternTable::new(&["[a-z]+", "[0-9]+"], &[r"\s+"]).case_insensitive(true);
        Tokenizer::new(&table, classify, Kind::Other).unwrap()
    }

    #[test]
    fn test_scan_classifies_catchable_matches() {
        let scan = word_tokenizer().scan("Hello 42 world", UnmatchedPolicy::Discard);

        let summary: Vec<(Kind, &str, usize)> = scan
            .lexemes
            .iter()
            .map(|l| (l.kind, l.value.as_str(), l.position))
            .collect();
        assert_eq!(
            summary,
            [
                (Kind::Word, "hello", 0),
                (Kind::Number, "42", 6),
                (Kind::Word, "world", 9)
            ]
        );
        assert_eq!(scan.unmatched, 0);
    }

    #[test]
    fn test_unmatched_characters_follow_policy() {
        let tokenizer = word_tokenizer();

        let discarded = tokenizer.scan("a+b", UnmatchedPolicy::Discard);
        assert_eq!(discarded.lexemes.len(), 2);
        assert_eq!(discarded.unmatched, 1);

        let captured = tokenizer.scan("a+b", UnmatchedPolicy::Capture);
        assert_eq!(captured.lexemes.len(), 3);
        assert_eq!(
            captured.lexemes[1],
            Lexeme {
                kind: Kind::Other,
                value: "+".to_string(),
                position: 1
            }
        );
    }

    #[test]
    fn test_catch_all_consumes_multibyte_characters() {
        let scan = word_tokenizer().scan("a→\nb", UnmatchedPolicy::Capture);
        assert_eq!(scan.unmatched, 1);
        assert_eq!(scan.lexemes[1].value, "→");
        assert_eq!(scan.lexemes[2].position, "a→\n".len());
    }

    #[test]
    fn test_first_pattern_wins() {
        let table = PatternTable::new(&["[a-z]+", "[a-z]+[0-9]+", "[0-9]+"], &[]);
        let tokenizer = Tokenizer::new(&table, classify, Kind::Other).unwrap();

        let scan = tokenizer.scan("abc123", UnmatchedPolicy::Discard);
        assert_eq!(scan.lexemes.len(), 2);
        assert_eq!(scan.lexemes[0].value, "abc");
    }

    #[test]
    fn test_empty_pattern_table_is_rejected() {
        let table = PatternTable::new(&[], &[r"\s+"]);
        let result = Tokenizer::new(&table, classify, Kind::Other);
        assert_matches!(result, Err(TokenizerError::EmptyPatternTable));
    }

    #[test]
    fn test_invalid_pattern_is_named() {
        let table = PatternTable::new(&["[a-z]+", "(unclosed"], &[]);
        let result = Tokenizer::new(&table, classify, Kind::Other);

        assert_matches!(result, Err(TokenizerError::InvalidPattern { ref pattern, .. }) if pattern == "(unclosed");
        assert_eq!(
            result.unwrap_err().error_code(),
            codes::tokenizer::INVALID_PATTERN
        );
    }

    #[test]
    fn test_pattern_exposes_alternation() {
        let tokenizer = word_tokenizer();
        assert!(tokenizer.pattern().starts_with("(?P<catchable>(?:[a-z]+)|(?:[0-9]+))"));
        assert!(tokenizer.pattern().ends_with("|(?P<unmatched>(?s:.))"));
    }
}
