//! Lexical analysis for docblock annotations such as
//! `@Column(type="string", length=50)`.
//!
//! ```no_run
//! use annotation_lexer::{Lexer, TokenType};
//!
//! let mut lexer = Lexer::new(r#"@Column(type="string", length=50)"#);
//! while lexer.move_next() {
//!     if lexer.is_next_token(TokenType::Integer) {
//!         break;
//!     }
//! }
//! ```

// Internal modules
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use config::{LexicalPreferences, RuntimeConfig};
pub use lexical::{tokenize, Lexer, LexerError, LexicalMetrics, TokenizerError};
pub use tokens::{Token, TokenType};
