use std::fmt;

/// A position in source text, tracking line, column, and absolute offset
/// for event reporting and diagnostics.
///
/// Lines and columns are 1-based; the offset is a 0-based character count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    /// The position of the first character of a document.
    pub fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The source extent of a token, from its first character to the position
/// just past its last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Token classification for RML source.
///
/// Data-carrying variants embed their value directly (no separate `value`
/// field on Token). Text-bearing variants carry decoded content: escape
/// sequences are resolved by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `<? ... ?>` processing instruction, inner text trimmed.
    Pi(String),
    /// `<!-- ... -->`, inner text verbatim.
    Comment(String),
    /// `<name`, carrying the tag name.
    TagOpen(String),
    /// `</name`, carrying the tag name.
    CloseTagOpen(String),
    /// `>` ending a tag.
    TagEnd,
    /// `/>` ending a self-closing tag.
    SelfClose,
    /// An attribute name inside a tag.
    AttrName(String),
    /// `=` between an attribute name and its value.
    Equals,
    /// Opening quote of an attribute value.
    QuoteOpen,
    /// Closing quote of an attribute value.
    QuoteClose,
    /// A standalone quoted string literal in element content.
    Str(String),
    /// A run of plain text (content or attribute-value chunk).
    Text(String),
    /// `{` opening a paste region.
    PasteOpen,
    /// One paste segment: decoded content plus its own hint, if written.
    PasteText { text: String, hint: Option<String> },
    /// `|` between paste segments.
    PasteSep,
    /// `}` closing a paste region.
    PasteClose,
    /// End of input.
    Eof,
}

/// A token produced by the RML scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
