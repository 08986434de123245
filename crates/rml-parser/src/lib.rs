//! RML Parser
//!
//! Streaming event parser for RML documents. A single synchronous pass
//! over the source drives an [`EventSink`] with six hooks (processing
//! instructions, start and end tags, text data, paste segments, string
//! literals) in document order, with no tree retained. Errors carry a
//! kind, a message, and the exact line, column, and offset of the first
//! failure.
//!
//! # Example
//!
//! ```
//! use rml_parser::{parse, Attribute, EventSink, Flow};
//!
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! impl EventSink for Names {
//!     fn start_tag(&mut self, name: &str, _attributes: &[Attribute]) -> Flow {
//!         self.0.push(name.to_string());
//!         Flow::Continue
//!     }
//! }
//!
//! let mut sink = Names::default();
//! parse("<a><b/></a>", &mut sink).unwrap();
//! assert_eq!(sink.0, ["a", "b"]);
//! ```

pub mod event;
pub mod handle;
pub mod parser;
mod paste;

pub use event::{Attribute, EventSink, Flow, Fragment, FragmentPart};
pub use handle::{ParseResult, RmlParser};
pub use parser::parse;
pub use rml_lexer::Position;

use rml_lexer::LexError;
use std::fmt;

/// Classification of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The scanner could not tokenize the input.
    Lex,
    /// The token stream does not form a well-formed document.
    Syntax,
    /// A sink hook requested cancellation.
    CallbackAbort,
    /// The handle was used after `close`.
    UseAfterClose,
    /// The handle was reused without `reset`.
    Busy,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lex => "Lex error",
            ErrorKind::Syntax => "Syntax error",
            ErrorKind::CallbackAbort => "Callback abort",
            ErrorKind::UseAfterClose => "Use after close",
            ErrorKind::Busy => "Parser busy",
        };
        write!(f, "{name}")
    }
}

/// A parse failure, positioned at the point where the document is
/// provably invalid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at {position}: {message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Position,
}

impl ParseError {
    pub(crate) fn syntax(message: impl Into<String>, position: Position) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            message: message.into(),
            position,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            kind: ErrorKind::Lex,
            message: err.message,
            position: err.position,
        }
    }
}
