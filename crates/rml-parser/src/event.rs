//! Event sink contract and the attribute value model.

use std::fmt;

/// Signal returned by every sink hook: keep going, or abort the parse.
///
/// An abort is cooperative cancellation, not an error raised by the sink;
/// the parser stops immediately and reports a `CallbackAbort` outcome
/// without invoking any further hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

/// The six consumer hooks the parser drives, synchronously and in document
/// order.
///
/// Every hook is optional: the default implementations do nothing and
/// continue, so a sink implements only the events it cares about.
pub trait EventSink {
    /// A `<? ... ?>` processing instruction at the document level.
    fn spec(&mut self, _content: &str) -> Flow {
        Flow::Continue
    }

    /// An opening tag, with its fully assembled attribute list. For a
    /// self-closing tag this is followed immediately by [`end_tag`] with
    /// no intervening event.
    ///
    /// [`end_tag`]: EventSink::end_tag
    fn start_tag(&mut self, _name: &str, _attributes: &[Attribute]) -> Flow {
        Flow::Continue
    }

    /// A closing tag, always matching the most recent unclosed [`start_tag`].
    ///
    /// [`start_tag`]: EventSink::start_tag
    fn end_tag(&mut self, _name: &str) -> Flow {
        Flow::Continue
    }

    /// A run of plain text inside an element. Never empty.
    fn data(&mut self, _text: &str) -> Flow {
        Flow::Continue
    }

    /// One segment of a paste region. A multi-segment region produces a run
    /// of `seal = false` calls followed by exactly one `seal = true` call,
    /// with no other event in between; the consumer owns concatenation.
    fn paste(&mut self, _content: &str, _hint: Option<&str>, _seal: bool) -> Flow {
        Flow::Continue
    }

    /// A standalone quoted string literal in element content, with escape
    /// sequences decoded.
    fn string(&mut self, _text: &str) -> Flow {
        Flow::Continue
    }
}

/// One attribute of a start tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: Fragment,
}

/// An attribute value: an ordered mix of literal runs and paste parts.
///
/// Pastes embedded in attribute values are carried here rather than
/// delivered through the paste hook, so the start-tag event arrives with
/// its value structure intact.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub parts: Vec<FragmentPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FragmentPart {
    /// A literal run, escapes decoded.
    Literal(String),
    /// One paste segment with its effective hint.
    Paste {
        content: String,
        hint: Option<String>,
    },
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value as a plain string, when it contains no paste parts.
    pub fn as_literal(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [] => Some(""),
            [FragmentPart::Literal(text)] => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                FragmentPart::Literal(text) => write!(f, "{text}")?,
                FragmentPart::Paste {
                    content,
                    hint: Some(hint),
                } => write!(f, "{{{hint}: {content}}}")?,
                FragmentPart::Paste {
                    content,
                    hint: None,
                } => write!(f, "{{{content}}}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_literal_empty() {
        assert_eq!(Fragment::new().as_literal(), Some(""));
    }

    #[test]
    fn test_as_literal_single_run() {
        let fragment = Fragment {
            parts: vec![FragmentPart::Literal("abc".into())],
        };
        assert_eq!(fragment.as_literal(), Some("abc"));
    }

    #[test]
    fn test_as_literal_rejects_pastes() {
        let fragment = Fragment {
            parts: vec![FragmentPart::Paste {
                content: "x".into(),
                hint: None,
            }],
        };
        assert_eq!(fragment.as_literal(), None);
    }

    #[test]
    fn test_display_mixed_value() {
        let fragment = Fragment {
            parts: vec![
                FragmentPart::Literal("a".into()),
                FragmentPart::Paste {
                    content: "x".into(),
                    hint: Some("expr".into()),
                },
                FragmentPart::Literal("b".into()),
            ],
        };
        assert_eq!(fragment.to_string(), "a{expr: x}b");
    }
}
