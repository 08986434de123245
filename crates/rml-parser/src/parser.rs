//! Streaming RML document parser.
//!
//! Pulls tokens from the scanner, maintains the open-element stack for
//! well-formedness checking, assembles attribute values and paste regions,
//! and drives the event sink in document order. The first error wins: no
//! recovery or resynchronization is attempted, and no hook fires after a
//! failure or an abort.

use crate::event::{Attribute, EventSink, Flow, Fragment, FragmentPart};
use crate::paste::PasteAssembler;
use crate::{ErrorKind, ParseError};
use rml_lexer::{Position, Scanner, TokenKind};

/// Parse a document in one synchronous pass, driving `sink` with events as
/// constructs complete.
///
/// Returns `Ok(())` only for a well-formed document whose sink never
/// aborted. The error carries the kind, a message naming the offending
/// construct, and the position where the document is provably invalid.
pub fn parse<S: EventSink>(document: &str, sink: &mut S) -> Result<(), ParseError> {
    Parser {
        scanner: Scanner::new(document),
        stack: Vec::new(),
        sink,
    }
    .parse_document()
}

/// One open element awaiting its closing tag. `start` is the position of
/// the `<` that opened it.
#[derive(Debug)]
struct OpenElement {
    name: String,
    start: Position,
}

struct Parser<'s, S> {
    scanner: Scanner,
    stack: Vec<OpenElement>,
    sink: &'s mut S,
}

impl<S: EventSink> Parser<'_, S> {
    /// Top-level driver. Outside any element only markup, whitespace, and
    /// processing instructions are legal; inside, text, strings, and
    /// pastes flow to the sink.
    fn parse_document(&mut self) -> Result<(), ParseError> {
        loop {
            let token = self.scanner.next()?;
            let at = token.span.start;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Comment(_) => {}
                TokenKind::Pi(content) => {
                    if !self.stack.is_empty() {
                        return Err(ParseError::syntax(
                            "Processing instruction inside an element",
                            at,
                        ));
                    }
                    let flow = self.sink.spec(&content);
                    self.check(flow, at)?;
                }
                TokenKind::Text(text) => {
                    if self.stack.is_empty() {
                        if text.trim().is_empty() {
                            continue;
                        }
                        return Err(ParseError::syntax("Text outside of any element", at));
                    }
                    let flow = self.sink.data(&text);
                    self.check(flow, at)?;
                }
                TokenKind::Str(text) => {
                    if self.stack.is_empty() {
                        return Err(ParseError::syntax(
                            "String literal outside of any element",
                            at,
                        ));
                    }
                    let flow = self.sink.string(&text);
                    self.check(flow, at)?;
                }
                TokenKind::PasteOpen => {
                    if self.stack.is_empty() {
                        return Err(ParseError::syntax("Paste outside of any element", at));
                    }
                    self.parse_content_paste(at)?;
                }
                TokenKind::TagOpen(name) => self.parse_tag(name, at)?,
                TokenKind::CloseTagOpen(name) => self.parse_closing_tag(&name, at)?,
                other => {
                    return Err(ParseError::syntax(
                        format!("Unexpected token {other:?}"),
                        at,
                    ));
                }
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(ParseError {
                kind: ErrorKind::Lex,
                message: format!("Unterminated element <{}>", open.name),
                position: open.start,
            });
        }
        Ok(())
    }

    /// After `<name`: scan attributes until `>` or `/>`, then dispatch the
    /// start tag with its assembled attribute list. A self-closing tag
    /// dispatches its end tag immediately and never reaches the stack.
    fn parse_tag(&mut self, name: String, start: Position) -> Result<(), ParseError> {
        let mut attributes = Vec::new();

        loop {
            let token = self.scanner.next()?;
            match token.kind {
                TokenKind::AttrName(attr_name) => {
                    let eq = self.scanner.next()?;
                    if eq.kind != TokenKind::Equals {
                        return Err(ParseError::syntax(
                            format!("Expected '=' after attribute name '{attr_name}'"),
                            eq.span.start,
                        ));
                    }
                    let value = self.parse_attr_value()?;
                    attributes.push(Attribute {
                        name: attr_name,
                        value,
                    });
                }
                TokenKind::TagEnd => {
                    let flow = self.sink.start_tag(&name, &attributes);
                    self.check(flow, start)?;
                    self.stack.push(OpenElement { name, start });
                    return Ok(());
                }
                TokenKind::SelfClose => {
                    let flow = self.sink.start_tag(&name, &attributes);
                    self.check(flow, start)?;
                    let flow = self.sink.end_tag(&name);
                    self.check(flow, start)?;
                    return Ok(());
                }
                other => {
                    return Err(ParseError::syntax(
                        format!("Unexpected token in tag: {other:?}"),
                        token.span.start,
                    ));
                }
            }
        }
    }

    /// After `=`: a quoted value (literal chunks mixed with pastes) or a
    /// bare paste.
    fn parse_attr_value(&mut self) -> Result<Fragment, ParseError> {
        let token = self.scanner.next()?;
        let mut fragment = Fragment::new();
        match token.kind {
            TokenKind::QuoteOpen => loop {
                let piece = self.scanner.next()?;
                match piece.kind {
                    TokenKind::Text(text) => fragment.parts.push(FragmentPart::Literal(text)),
                    TokenKind::PasteOpen => self.collect_paste_parts(&mut fragment)?,
                    TokenKind::QuoteClose => return Ok(fragment),
                    other => {
                        return Err(ParseError::syntax(
                            format!("Unexpected token in attribute value: {other:?}"),
                            piece.span.start,
                        ));
                    }
                }
            },
            TokenKind::PasteOpen => {
                self.collect_paste_parts(&mut fragment)?;
                Ok(fragment)
            }
            other => Err(ParseError::syntax(
                format!("Expected attribute value, got {other:?}"),
                token.span.start,
            )),
        }
    }

    /// A paste region inside an attribute value: segments become fragment
    /// parts instead of paste events, so they travel with the start tag.
    fn collect_paste_parts(&mut self, fragment: &mut Fragment) -> Result<(), ParseError> {
        let mut assembler = PasteAssembler::new();
        loop {
            let token = self.scanner.next()?;
            match token.kind {
                TokenKind::PasteText { text, hint } => {
                    if let Some((content, hint)) = assembler.push(text, hint) {
                        fragment.parts.push(FragmentPart::Paste { content, hint });
                    }
                }
                TokenKind::PasteSep => {}
                TokenKind::PasteClose => {
                    let (content, hint) = assembler.finish();
                    fragment.parts.push(FragmentPart::Paste { content, hint });
                    return Ok(());
                }
                other => {
                    return Err(ParseError::syntax(
                        format!("Unexpected token in paste: {other:?}"),
                        token.span.start,
                    ));
                }
            }
        }
    }

    /// A paste region in element content: each segment is dispatched in
    /// document order, `seal = true` only on the final one.
    fn parse_content_paste(&mut self, start: Position) -> Result<(), ParseError> {
        let mut assembler = PasteAssembler::new();
        loop {
            let token = self.scanner.next()?;
            match token.kind {
                TokenKind::PasteText { text, hint } => {
                    if let Some((content, hint)) = assembler.push(text, hint) {
                        let flow = self.sink.paste(&content, hint.as_deref(), false);
                        self.check(flow, start)?;
                    }
                }
                TokenKind::PasteSep => {}
                TokenKind::PasteClose => {
                    let (content, hint) = assembler.finish();
                    let flow = self.sink.paste(&content, hint.as_deref(), true);
                    self.check(flow, start)?;
                    return Ok(());
                }
                other => {
                    return Err(ParseError::syntax(
                        format!("Unexpected token in paste: {other:?}"),
                        token.span.start,
                    ));
                }
            }
        }
    }

    /// After `</name`: the name must match the top of the open-element
    /// stack, and the tag must end with `>`. `start` is the position of
    /// the `</` marker, which is where mismatches are reported.
    fn parse_closing_tag(&mut self, name: &str, start: Position) -> Result<(), ParseError> {
        match self.stack.last() {
            None => {
                return Err(ParseError::syntax(
                    format!("Unexpected closing tag </{name}>, no element is open"),
                    start,
                ));
            }
            Some(open) if open.name != name => {
                return Err(ParseError::syntax(
                    format!(
                        "Mismatched closing tag: expected </{}>, found </{}>",
                        open.name, name
                    ),
                    start,
                ));
            }
            Some(_) => {}
        }

        let end = self.scanner.next()?;
        if end.kind != TokenKind::TagEnd {
            return Err(ParseError::syntax(
                format!("Expected '>' to end closing tag </{name}>"),
                end.span.start,
            ));
        }

        if let Some(open) = self.stack.pop() {
            let flow = self.sink.end_tag(&open.name);
            self.check(flow, start)?;
        }
        Ok(())
    }

    fn check(&self, flow: Flow, at: Position) -> Result<(), ParseError> {
        match flow {
            Flow::Continue => Ok(()),
            Flow::Abort => Err(ParseError {
                kind: ErrorKind::CallbackAbort,
                message: "Parse aborted by event sink".into(),
                position: at,
            }),
        }
    }
}
