//! RML Lexer
//!
//! Turns RML document text into a stream of positioned tokens.
//! Handles tag markers, attribute syntax, quoted strings with escape
//! sequences, paste regions with their segment and hint sub-grammar,
//! processing instructions, and comments, tracking line, column, and
//! absolute offset throughout.
//!
//! # Example
//!
//! ```
//! use rml_lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("<doc>");
//! let token = scanner.next().unwrap();
//! assert_eq!(token.kind, TokenKind::TagOpen("doc".into()));
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Position, Span, Token, TokenKind};

/// Lexer error with position information.
///
/// Unterminated constructs report the position of their opening marker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Lex error at {position}: {message}")]
pub struct LexError {
    pub message: String,
    pub position: Position,
}
