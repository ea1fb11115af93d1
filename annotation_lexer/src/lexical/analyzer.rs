//! Annotation lexer session
//!
//! The input is scanned once, eagerly, into a token list ending in `Eof`.
//! The session then walks that list with three cursors: the consumed
//! `current` token, the `lookahead` token, and a secondary peek cursor for
//! looking further ahead without consuming anything.

use super::grammar;
use super::tokenizer::UnmatchedPolicy;
use crate::config::compile_time::lexical::MAX_LOGGED_LEXEME_LENGTH;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{Token, TokenType};
use crate::utils::{Position, SourceMap, Span};
use crate::{log_debug, log_error, log_success};
use std::sync::OnceLock;

/// Lexer session errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Offset {offset} is not the start of a scanned token")]
    UnalignedPosition { offset: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::UnalignedPosition { .. } => codes::lexical::UNALIGNED_POSITION,
        }
    }
}

/// Per-session token statistics. `Eof` is not counted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub identifier_tokens: usize,
    pub integer_tokens: usize,
    pub float_tokens: usize,
    pub string_tokens: usize,
    pub boolean_tokens: usize,
    pub none_tokens: usize,
    /// Characters matched by no pattern, whether dropped or captured
    pub unmatched_chars: usize,
    /// Longest unescaped string literal, in bytes
    pub max_string_length: usize,
}

impl LexicalMetrics {
    /// Counters for an already scanned slice; `unmatched_chars` stays 0
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut metrics = Self::default();
        for token in tokens {
            metrics.record_token(token);
        }
        metrics
    }

    pub(crate) fn record_token(&mut self, token: &Token) {
        match token.kind {
            TokenType::Identifier => self.identifier_tokens += 1,
            TokenType::Integer => self.integer_tokens += 1,
            TokenType::Float => self.float_tokens += 1,
            TokenType::String => {
                self.string_tokens += 1;
                self.max_string_length = self.max_string_length.max(token.value.len());
            }
            TokenType::True | TokenType::False => self.boolean_tokens += 1,
            TokenType::None => self.none_tokens += 1,
            TokenType::Eof => return,
        }
        self.total_tokens += 1;
    }

    pub(crate) fn record_unmatched(&mut self, count: usize) {
        self.unmatched_chars += count;
    }

    pub fn numeric_tokens(&self) -> usize {
        self.integer_tokens + self.float_tokens
    }

    pub fn literal_tokens(&self) -> usize {
        self.numeric_tokens() + self.string_tokens + self.boolean_tokens
    }

    /// Whether anything besides unclassified lexemes was found
    pub fn has_content(&self) -> bool {
        self.total_tokens > self.none_tokens
    }
}

/// A lexing session over one annotation string
#[derive(Debug, Clone)]
pub struct Lexer {
    input: String,
    tokens: Vec<Token>,
    /// Index of the consumed token
    current: Option<usize>,
    /// Index of the next token
    lookahead: Option<usize>,
    /// Index of the token after the lookahead
    position: usize,
    /// Offset from `position` for `peek_ahead`
    peek: usize,
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
    source_map: OnceLock<SourceMap>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self::with_preferences(input, LexicalPreferences::default())
    }

    pub fn with_preferences(input: &str, preferences: LexicalPreferences) -> Self {
        let policy = if preferences.capture_unmatched {
            UnmatchedPolicy::Capture
        } else {
            UnmatchedPolicy::Discard
        };

        let scan = grammar::annotation_tokenizer().scan(input, policy);

        let mut tokens = Vec::with_capacity(scan.lexemes.len() + 1);
        tokens.extend(
            scan.lexemes
                .into_iter()
                .map(|lexeme| Token::new(lexeme.kind, lexeme.value, lexeme.position)),
        );
        tokens.push(Token::eof(input.len()));

        let mut metrics = LexicalMetrics::default();
        if preferences.collect_metrics {
            metrics = LexicalMetrics::from_tokens(&tokens);
            metrics.record_unmatched(scan.unmatched);
        }

        for token in tokens.iter().filter(|t| t.kind == TokenType::None) {
            log_debug!("Unclassified lexeme",
                "lexeme" => truncate_lexeme(&token.value),
                "offset" => token.position
            );
        }

        log_debug!("Created annotation lexer",
            "input_length" => input.len(),
            "tokens" => tokens.len(),
            "unmatched" => scan.unmatched,
            "capture_unmatched" => preferences.capture_unmatched
        );

        if preferences.log_scan_summary {
            log_success!(codes::success::TOKENIZATION_COMPLETE, "Annotation scan complete",
                "tokens" => tokens.len() - 1,
                "identifiers" => metrics.identifier_tokens,
                "literals" => metrics.literal_tokens(),
                "unclassified" => metrics.none_tokens,
                "unmatched" => scan.unmatched
            );
        }

        Self {
            input: input.to_string(),
            tokens,
            current: None,
            lookahead: None,
            position: 0,
            peek: 0,
            preferences,
            metrics,
            source_map: OnceLock::new(),
        }
    }

    /// Rewind to the start; the next `move_next` yields the first token again
    pub fn reset(&mut self) {
        self.current = None;
        self.lookahead = None;
        self.position = 0;
        self.peek = 0;
    }

    /// Reset the `peek_ahead` cursor to the token after the lookahead
    pub fn reset_peek(&mut self) {
        self.peek = 0;
    }

    /// Make the token starting at byte `offset` the lookahead again
    pub fn reset_position(&mut self, offset: usize) -> Result<(), LexerError> {
        match self.tokens.binary_search_by_key(&offset, |t| t.position) {
            Ok(index) => {
                self.current = index.checked_sub(1);
                self.lookahead = Some(index);
                self.position = index + 1;
                self.peek = 0;
                Ok(())
            }
            Err(_) => {
                let error = LexerError::UnalignedPosition { offset };
                log_error!(error.error_code(), &error.to_string(),
                    "offset" => offset,
                    "input_length" => self.input.len(),
                    "token_count" => self.tokens.len()
                );
                Err(error)
            }
        }
    }

    /// Consume the lookahead. Returns `false` once the `Eof` token is consumed.
    pub fn move_next(&mut self) -> bool {
        self.peek = 0;

        // Exhausted sessions stay on Eof
        if self.lookahead.is_none() && self.current.is_some() {
            return false;
        }

        self.current = self.lookahead.take();
        if self.position < self.tokens.len() {
            self.lookahead = Some(self.position);
            self.position += 1;
        }
        self.lookahead.is_some()
    }

    /// Advance until the lookahead has type `kind` or the session is exhausted
    pub fn skip_until(&mut self, kind: TokenType) {
        while let Some(token) = self.lookahead() {
            if token.kind == kind {
                break;
            }
            self.move_next();
        }
    }

    /// The lookahead token, without consuming it
    pub fn peek(&self) -> Option<&Token> {
        self.lookahead()
    }

    /// Each call returns the token after the previous `peek_ahead` result,
    /// starting with the token after the lookahead
    pub fn peek_ahead(&mut self) -> Option<&Token> {
        let index = self.position + self.peek;
        if index < self.tokens.len() {
            self.peek += 1;
        }
        self.tokens.get(index)
    }

    /// What `peek_ahead` would return, then reset the peek cursor
    pub fn glimpse(&mut self) -> Option<&Token> {
        let index = self.position + self.peek;
        self.peek = 0;
        self.tokens.get(index)
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.map(|i| &self.tokens[i])
    }

    pub fn lookahead(&self) -> Option<&Token> {
        self.lookahead.map(|i| &self.tokens[i])
    }

    pub fn is_next_token(&self, kind: TokenType) -> bool {
        self.lookahead().is_some_and(|t| t.kind == kind)
    }

    pub fn is_next_token_any(&self, kinds: &[TokenType]) -> bool {
        self.lookahead().is_some_and(|t| kinds.contains(&t.kind))
    }

    /// Whether `value` would classify as `kind`
    pub fn is_a(value: &str, kind: TokenType) -> bool {
        grammar::classify(value).0 == kind
    }

    /// Every scanned token, ending with `Eof`
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn source_map(&self) -> &SourceMap {
        self.source_map
            .get_or_init(|| SourceMap::new(self.input.as_str()))
    }

    /// Line and column where `token` starts
    pub fn location_of(&self, token: &Token) -> Position {
        self.source_map().position_at(token.position)
    }

    /// The source text `token` was scanned from, as a span. `Eof` is empty.
    pub fn span_of(&self, token: &Token) -> Span {
        let len = if token.is_eof() {
            0
        } else {
            grammar::annotation_tokenizer().lexeme_len_at(&self.input, token.position)
        };
        self.source_map().span_at(token.position, len)
    }

    /// `message` followed by the docblock line holding `token`, underlined
    pub fn render_diagnostic(&self, token: &Token, message: &str) -> String {
        self.source_map().format_error(&self.span_of(token), message)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }
}

fn truncate_lexeme(lexeme: &str) -> &str {
    match lexeme.char_indices().nth(MAX_LOGGED_LEXEME_LENGTH) {
        Some((cut, _)) => &lexeme[..cut],
        None => lexeme,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn preferences(capture_unmatched: bool) -> LexicalPreferences {
        LexicalPreferences {
            capture_unmatched,
            collect_metrics: true,
            log_scan_summary: false,
        }
    }

    fn kinds(lexer: &Lexer) -> Vec<TokenType> {
        lexer.tokens().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_move_next_walks_to_eof() {
        let mut lexer = Lexer::with_preferences("Foo", preferences(false));
        assert!(lexer.current().is_none());
        assert!(lexer.lookahead().is_none());

        assert!(lexer.move_next());
        assert!(lexer.current().is_none());
        assert_eq!(lexer.lookahead().map(|t| t.value.as_str()), Some("Foo"));

        assert!(lexer.move_next());
        assert_eq!(lexer.current().map(|t| t.value.as_str()), Some("Foo"));
        assert!(lexer.is_next_token(TokenType::Eof));

        assert!(!lexer.move_next());
        assert!(lexer.current().is_some_and(|t| t.is_eof()));
        assert!(lexer.lookahead().is_none());

        assert!(!lexer.move_next());
        assert!(lexer.current().is_some_and(|t| t.is_eof()));
    }

    #[test]
    fn test_empty_input_yields_only_eof() {
        let mut lexer = Lexer::with_preferences("", preferences(false));
        assert_eq!(kinds(&lexer), [TokenType::Eof]);

        assert!(lexer.move_next());
        assert!(lexer.is_next_token(TokenType::Eof));
        assert!(!lexer.move_next());
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut lexer = Lexer::with_preferences("a b", preferences(false));
        lexer.move_next();

        let first = lexer.peek().cloned();
        let second = lexer.peek().cloned();
        assert_eq!(first, second);
        assert_eq!(first.map(|t| t.value), Some("a".to_string()));
    }

    #[test]
    fn test_peek_ahead_and_glimpse() {
        let mut lexer = Lexer::with_preferences("a b c", preferences(false));
        lexer.move_next();

        assert_eq!(lexer.peek_ahead().map(|t| t.value.clone()), Some("b".into()));
        assert_eq!(lexer.peek_ahead().map(|t| t.value.clone()), Some("c".into()));
        assert!(lexer.peek_ahead().is_some_and(|t| t.is_eof()));
        assert!(lexer.peek_ahead().is_none());

        // Lookahead is untouched by peeking
        assert_eq!(lexer.peek().map(|t| t.value.as_str()), Some("a"));

        lexer.reset_peek();
        assert_eq!(lexer.glimpse().map(|t| t.value.clone()), Some("b".into()));
        assert_eq!(lexer.glimpse().map(|t| t.value.clone()), Some("b".into()));
    }

    #[test]
    fn test_move_next_resets_peek_cursor() {
        let mut lexer = Lexer::with_preferences("a b c", preferences(false));
        lexer.move_next();
        lexer.peek_ahead();
        lexer.peek_ahead();

        lexer.move_next();
        assert_eq!(lexer.peek_ahead().map(|t| t.value.clone()), Some("c".into()));
    }

    #[test]
    fn test_reset_position_rewinds_to_token() {
        let mut lexer = Lexer::with_preferences("Foo(bar=1)", preferences(false));
        while lexer.move_next() {}

        assert!(lexer.reset_position(4).is_ok());
        assert_eq!(lexer.lookahead().map(|t| t.value.as_str()), Some("bar"));
        assert_eq!(lexer.current().map(|t| t.value.as_str()), Some("Foo"));

        assert!(lexer.move_next());
        assert_eq!(lexer.current().map(|t| t.value.as_str()), Some("bar"));
        assert!(lexer.is_next_token(TokenType::Integer));
    }

    #[test]
    fn test_reset_position_to_first_token_and_eof() {
        let mut lexer = Lexer::with_preferences("  Foo", preferences(false));
        lexer.move_next();
        lexer.move_next();

        lexer.reset_position(2).unwrap();
        assert!(lexer.current().is_none());
        assert!(lexer.is_next_token(TokenType::Identifier));

        lexer.reset_position(5).unwrap();
        assert!(lexer.is_next_token(TokenType::Eof));
        assert_eq!(lexer.current().map(|t| t.value.as_str()), Some("Foo"));
    }

    #[test]
    fn test_unaligned_reset_position_leaves_session_unchanged() {
        let mut lexer = Lexer::with_preferences("Foo bar", preferences(false));
        lexer.move_next();
        lexer.move_next();

        let result = lexer.reset_position(1);
        assert_matches!(result, Err(LexerError::UnalignedPosition { offset: 1 }));
        assert_eq!(
            result.unwrap_err().error_code(),
            codes::lexical::UNALIGNED_POSITION
        );

        assert_eq!(lexer.current().map(|t| t.value.as_str()), Some("Foo"));
        assert_eq!(lexer.lookahead().map(|t| t.value.as_str()), Some("bar"));
        assert_matches!(lexer.reset_position(99), Err(LexerError::UnalignedPosition { .. }));
    }

    #[test]
    fn test_skip_until() {
        let mut lexer = Lexer::with_preferences("a b 3 c", preferences(false));
        lexer.move_next();

        lexer.skip_until(TokenType::Integer);
        assert_eq!(lexer.lookahead().map(|t| t.value.as_str()), Some("3"));

        lexer.skip_until(TokenType::String);
        assert!(lexer.lookahead().is_none());
        assert!(lexer.current().is_some_and(|t| t.is_eof()));
    }

    #[test]
    fn test_is_next_token_any() {
        let mut lexer = Lexer::with_preferences("true", preferences(false));
        assert!(!lexer.is_next_token_any(&[TokenType::True]));

        lexer.move_next();
        assert!(lexer.is_next_token_any(&[TokenType::False, TokenType::True]));
        assert!(!lexer.is_next_token_any(&[]));
    }

    #[test]
    fn test_is_a() {
        assert!(Lexer::is_a("TRUE", TokenType::True));
        assert!(Lexer::is_a("42", TokenType::Integer));
        assert!(Lexer::is_a("4.2", TokenType::Float));
        assert!(Lexer::is_a("Foo", TokenType::Identifier));
        assert!(!Lexer::is_a("Foo", TokenType::String));
    }

    #[test]
    fn test_capture_mode_keeps_punctuation() {
        let lexer = Lexer::with_preferences("@Id()", preferences(true));
        let values: Vec<&str> = lexer.tokens().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, ["@", "Id", "(", ")", ""]);
        assert_eq!(
            kinds(&lexer),
            [
                TokenType::None,
                TokenType::Identifier,
                TokenType::None,
                TokenType::None,
                TokenType::Eof
            ]
        );

        let dropped = Lexer::with_preferences("@Id()", preferences(false));
        assert_eq!(kinds(&dropped), [TokenType::Identifier, TokenType::Eof]);
    }

    #[test]
    fn test_metrics() {
        let lexer = Lexer::with_preferences(
            r#"@Column(name="user_name", length=50, scale=1.5, nullable=true) 1.2.3"#,
            preferences(false),
        );
        let metrics = lexer.metrics();

        assert_eq!(metrics.identifier_tokens, 5);
        assert_eq!(metrics.string_tokens, 1);
        assert_eq!(metrics.integer_tokens, 1);
        assert_eq!(metrics.float_tokens, 1);
        assert_eq!(metrics.boolean_tokens, 1);
        assert_eq!(metrics.none_tokens, 1);
        assert_eq!(metrics.total_tokens, 10);
        assert_eq!(metrics.max_string_length, "user_name".len());
        // @ ( = , = , = , = )
        assert_eq!(metrics.unmatched_chars, 10);
    }

    #[test]
    fn test_metrics_can_be_disabled() {
        let prefs = LexicalPreferences {
            collect_metrics: false,
            ..preferences(false)
        };
        let lexer = Lexer::with_preferences("Foo 1", prefs);
        assert_eq!(lexer.metrics(), &LexicalMetrics::default());
    }

    #[test]
    fn test_location_of() {
        let lexer = Lexer::with_preferences("/**\n * @Table(name=\"users\")\n */", preferences(false));
        let table = &lexer.tokens()[0];
        assert_eq!(table.value, "Table");

        let location = lexer.location_of(table);
        assert_eq!((location.line, location.column), (2, 5));
    }

    #[test]
    fn test_span_of_covers_source_text() {
        let input = "@Table(name=\"a \"\"b\"\"\", size=007)";
        let lexer = Lexer::with_preferences(input, preferences(false));
        let slices: Vec<&str> = lexer
            .tokens()
            .iter()
            .map(|t| lexer.span_of(t).slice(input))
            .collect();

        assert_eq!(
            slices,
            ["Table", "name", "\"a \"\"b\"\"\"", "size", "007", ""]
        );
        assert_eq!(lexer.tokens()[4].value, "7");
    }

    #[test]
    fn test_render_diagnostic() {
        let lexer = Lexer::with_preferences("/**\n * @Table(name=\"users\")\n */", preferences(false));
        let users = &lexer.tokens()[2];

        let rendered = lexer.render_diagnostic(users, "unknown table");
        assert!(rendered.contains("Error: unknown table"));
        assert!(rendered.contains("--> 2:16"));
        assert!(rendered.contains(" * @Table(name=\"users\")"));
        assert!(rendered.contains("^^^^^^^"));
    }

    #[test]
    fn test_truncate_lexeme() {
        let long = "x".repeat(MAX_LOGGED_LEXEME_LENGTH + 5);
        assert_eq!(truncate_lexeme(&long).len(), MAX_LOGGED_LEXEME_LENGTH);
        assert_eq!(truncate_lexeme("short"), "short");
    }

    #[test]
    fn test_lexer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Lexer>();
    }
}
