//! Reusable parser handle with an explicit lifecycle.
//!
//! A handle owns its sink and moves through Fresh -> Parsing -> Finished;
//! `reset` returns it to Fresh, `close` retires it permanently. Each state
//! transition is checked so misuse (reuse without reset, use after close)
//! surfaces as a distinct error outcome instead of silently corrupt state.

use crate::{ErrorKind, EventSink, ParseError};
use rml_lexer::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
    Fresh,
    Parsing,
    Finished,
    Closed,
}

/// The outcome of one parse call: either success, or the error kind,
/// message, and position of the first failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub ok: bool,
    pub kind: Option<ErrorKind>,
    pub message: Option<String>,
    pub position: Option<Position>,
}

impl ParseResult {
    fn success() -> Self {
        Self {
            ok: true,
            kind: None,
            message: None,
            position: None,
        }
    }

    fn failure(kind: ErrorKind, message: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            ok: false,
            kind: Some(kind),
            message: Some(message.into()),
            position,
        }
    }

    /// 1-based line of the failure, if any.
    pub fn line(&self) -> Option<usize> {
        self.position.map(|p| p.line)
    }

    /// 1-based column of the failure, if any.
    pub fn column(&self) -> Option<usize> {
        self.position.map(|p| p.column)
    }

    /// 0-based character offset of the failure, if any.
    pub fn offset(&self) -> Option<usize> {
        self.position.map(|p| p.offset)
    }
}

impl From<Result<(), ParseError>> for ParseResult {
    fn from(result: Result<(), ParseError>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(err) => Self::failure(err.kind, err.message, Some(err.position)),
        }
    }
}

/// A parser bound to one sink, reusable across documents.
#[derive(Debug)]
pub struct RmlParser<S> {
    sink: S,
    state: HandleState,
}

impl<S: EventSink> RmlParser<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            state: HandleState::Fresh,
        }
    }

    /// Parse one document, driving the sink. The handle must be fresh:
    /// after a completed parse (success or failure alike) it must be
    /// `reset` before the next call.
    pub fn parse(&mut self, document: &str) -> ParseResult {
        match self.state {
            HandleState::Closed => {
                return ParseResult::failure(
                    ErrorKind::UseAfterClose,
                    "Parser handle is closed",
                    None,
                );
            }
            HandleState::Parsing => {
                return ParseResult::failure(ErrorKind::Busy, "Parse already in progress", None);
            }
            HandleState::Finished => {
                return ParseResult::failure(
                    ErrorKind::Busy,
                    "Parser handle must be reset before reuse",
                    None,
                );
            }
            HandleState::Fresh => {}
        }

        self.state = HandleState::Parsing;
        let outcome = crate::parser::parse(document, &mut self.sink);
        self.state = HandleState::Finished;
        outcome.into()
    }

    /// Return the handle to the fresh state so it can parse again. Has no
    /// effect on a closed handle.
    pub fn reset(&mut self) {
        if self.state != HandleState::Closed {
            self.state = HandleState::Fresh;
        }
    }

    /// Retire the handle. Idempotent; every later `parse` reports
    /// `UseAfterClose`.
    pub fn close(&mut self) {
        self.state = HandleState::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == HandleState::Closed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Flow;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Counter {
        starts: usize,
    }

    impl EventSink for Counter {
        fn start_tag(&mut self, _name: &str, _attributes: &[crate::Attribute]) -> Flow {
            self.starts += 1;
            Flow::Continue
        }
    }

    #[test]
    fn test_parse_success() {
        let mut parser = RmlParser::new(Counter::default());
        let result = parser.parse("<a><b/></a>");
        assert!(result.ok);
        assert_eq!(result.kind, None);
        assert_eq!(parser.sink().starts, 2);
    }

    #[test]
    fn test_failure_carries_position() {
        let mut parser = RmlParser::new(Counter::default());
        let result = parser.parse("<a>hi</b>");
        assert!(!result.ok);
        assert_eq!(result.kind, Some(ErrorKind::Syntax));
        assert_eq!(result.line(), Some(1));
        assert_eq!(result.column(), Some(6));
        assert_eq!(result.offset(), Some(5));
    }

    #[test]
    fn test_reuse_without_reset_is_rejected() {
        let mut parser = RmlParser::new(Counter::default());
        assert!(parser.parse("<a/>").ok);
        let result = parser.parse("<b/>");
        assert_eq!(result.kind, Some(ErrorKind::Busy));
        // The sink was not driven again.
        assert_eq!(parser.sink().starts, 1);
    }

    #[test]
    fn test_reset_allows_reuse() {
        let mut parser = RmlParser::new(Counter::default());
        assert!(parser.parse("<a/>").ok);
        parser.reset();
        assert!(parser.parse("<b/>").ok);
        assert_eq!(parser.sink().starts, 2);
    }

    #[test]
    fn test_reset_after_failure() {
        let mut parser = RmlParser::new(Counter::default());
        assert!(!parser.parse("</a>").ok);
        parser.reset();
        assert!(parser.parse("<a/>").ok);
    }

    #[test]
    fn test_use_after_close() {
        let mut parser = RmlParser::new(Counter::default());
        parser.close();
        let result = parser.parse("<a/>");
        assert_eq!(result.kind, Some(ErrorKind::UseAfterClose));
        assert_eq!(result.position, None);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut parser = RmlParser::new(Counter::default());
        parser.close();
        parser.close();
        assert!(parser.is_closed());
    }

    #[test]
    fn test_reset_does_not_revive_closed_handle() {
        let mut parser = RmlParser::new(Counter::default());
        parser.close();
        parser.reset();
        assert_eq!(parser.parse("<a/>").kind, Some(ErrorKind::UseAfterClose));
    }

    #[test]
    fn test_into_sink() {
        let mut parser = RmlParser::new(Counter::default());
        parser.parse("<a/>");
        assert_eq!(parser.into_sink().starts, 1);
    }
}
