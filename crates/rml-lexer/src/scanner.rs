use crate::token::{Position, Span, Token, TokenKind};
use crate::LexError;

/// Scanner mode determines how the next characters are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Element content (or top level): text runs, markup, strings, pastes.
    Content,
    /// Between `<name` and `>`: attribute names, `=`, values.
    Tag,
    /// Inside a quoted attribute value; literal chunks and pastes.
    Quoted(char),
    /// Inside a `{ ... }` paste region.
    Paste(PasteFrom),
}

/// Where a paste region was opened, so the scanner can return to the
/// enclosing mode when it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasteFrom {
    Content,
    Tag,
    Quoted(char),
}

/// RML source scanner.
///
/// Turns a document into a stream of positioned tokens, one `next()` call
/// at a time. Mode transitions are driven lexically: `<name` enters tag
/// scanning, a quote after `=` enters value scanning, `{` enters paste
/// scanning, and each construct returns to its surrounding mode when its
/// closing marker is consumed.
///
/// Position tracking is incremental: every consumed character advances the
/// offset and column by one, except a line terminator (`\n`, `\r\n` as a
/// single terminator, or a lone `\r`) which advances the line and resets
/// the column. Unterminated constructs report the position of their opening
/// marker, not end-of-input.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    mode: Mode,
    // Opening-marker positions for unterminated-construct diagnostics.
    tag_open: Option<Position>,
    value_open: Option<Position>,
    paste_open: Option<Position>,
    // In paste mode: a segment (possibly empty) is due before the next
    // separator or close marker.
    expect_segment: bool,
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            mode: Mode::Content,
            tag_open: None,
            value_open: None,
            paste_open: None,
            expect_segment: false,
        }
    }

    /// Scan the entire source into a vector of tokens, ending with `Eof`.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// The position of the next unconsumed character.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    /// Return the next token, or `Eof` once input is exhausted.
    pub fn next(&mut self) -> Result<Token, LexError> {
        match self.mode {
            Mode::Content => self.next_content(),
            Mode::Tag => self.next_tag(),
            Mode::Quoted(quote) => self.next_quoted(quote),
            Mode::Paste(from) => self.next_paste(from),
        }
    }

    // --- Content mode ---

    fn next_content(&mut self) -> Result<Token, LexError> {
        let start = self.position();
        let mut run = String::new();

        loop {
            if self.is_at_end() {
                if run.is_empty() {
                    return Ok(self.token(TokenKind::Eof, start));
                }
                return Ok(self.token(TokenKind::Text(run), start));
            }

            let c = self.peek();
            match c {
                '<' => {
                    if self.angle_is_markup() {
                        if !run.is_empty() {
                            return Ok(self.token(TokenKind::Text(run), start));
                        }
                        return self.scan_markup();
                    }
                    // Literal `<` inside text.
                    run.push('<');
                    self.advance();
                }
                '{' => {
                    if !run.is_empty() {
                        return Ok(self.token(TokenKind::Text(run), start));
                    }
                    return Ok(self.open_paste(PasteFrom::Content));
                }
                '"' | '\'' => {
                    // A quote starts a standalone string literal only at a
                    // content boundary; pending whitespace flushes first.
                    if run.trim().is_empty() {
                        if !run.is_empty() {
                            return Ok(self.token(TokenKind::Text(run), start));
                        }
                        return self.scan_string(c);
                    }
                    run.push(c);
                    self.advance();
                }
                '\\' => self.push_escape(&mut run, &['<', '>', '{', '}', '"', '\'']),
                _ => {
                    run.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Bounded lookahead: does `<` open markup here, or is it literal text?
    fn angle_is_markup(&self) -> bool {
        let next = self.peek_at(1);
        next == '?'
            || (next == '!' && self.peek_at(2) == '-' && self.peek_at(3) == '-')
            || (next == '/' && is_name_start(self.peek_at(2)))
            || is_name_start(next)
    }

    fn scan_markup(&mut self) -> Result<Token, LexError> {
        let start = self.position();
        match self.peek_at(1) {
            '?' => self.scan_pi(start),
            '!' => self.scan_comment(start),
            '/' => {
                self.advance(); // `<`
                self.advance(); // `/`
                let name = self.scan_name();
                self.tag_open = Some(start);
                self.mode = Mode::Tag;
                Ok(self.token(TokenKind::CloseTagOpen(name), start))
            }
            _ => {
                self.advance(); // `<`
                let name = self.scan_name();
                self.tag_open = Some(start);
                self.mode = Mode::Tag;
                Ok(self.token(TokenKind::TagOpen(name), start))
            }
        }
    }

    fn scan_pi(&mut self, start: Position) -> Result<Token, LexError> {
        self.advance(); // `<`
        self.advance(); // `?`

        let mut content = String::new();
        loop {
            if self.is_at_end() {
                return Err(LexError {
                    message: "Unterminated processing instruction".into(),
                    position: start,
                });
            }
            if self.peek() == '?' && self.peek_at(1) == '>' {
                self.advance();
                self.advance();
                break;
            }
            content.push(self.peek());
            self.advance();
        }

        Ok(self.token(TokenKind::Pi(content.trim().to_string()), start))
    }

    fn scan_comment(&mut self, start: Position) -> Result<Token, LexError> {
        for _ in 0..4 {
            self.advance(); // `<!--`
        }

        let mut content = String::new();
        loop {
            if self.is_at_end() {
                return Err(LexError {
                    message: "Unterminated comment".into(),
                    position: start,
                });
            }
            if self.peek() == '-' && self.peek_at(1) == '-' && self.peek_at(2) == '>' {
                self.advance();
                self.advance();
                self.advance();
                break;
            }
            content.push(self.peek());
            self.advance();
        }

        Ok(self.token(TokenKind::Comment(content), start))
    }

    /// Scan a standalone string literal in content.
    fn scan_string(&mut self, quote: char) -> Result<Token, LexError> {
        let start = self.position();
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            if self.is_at_end() {
                return Err(LexError {
                    message: "Unterminated string".into(),
                    position: start,
                });
            }
            let c = self.peek();
            if c == quote {
                self.advance();
                break;
            }
            if c == '\\' {
                self.push_escape(&mut value, &['{', '}', '"', '\'']);
            } else {
                value.push(c);
                self.advance();
            }
        }

        Ok(self.token(TokenKind::Str(value), start))
    }

    // --- Tag mode ---

    fn next_tag(&mut self) -> Result<Token, LexError> {
        while !self.is_at_end() && self.peek().is_whitespace() {
            self.advance();
        }
        if self.is_at_end() {
            return Err(self.unterminated("Unterminated tag", self.tag_open));
        }

        let start = self.position();
        let c = self.peek();
        match c {
            '>' => {
                self.advance();
                self.mode = Mode::Content;
                self.tag_open = None;
                Ok(self.token(TokenKind::TagEnd, start))
            }
            '/' => {
                if self.peek_at(1) == '>' {
                    self.advance();
                    self.advance();
                    self.mode = Mode::Content;
                    self.tag_open = None;
                    Ok(self.token(TokenKind::SelfClose, start))
                } else {
                    Err(LexError {
                        message: "Unexpected character '/' in tag".into(),
                        position: start,
                    })
                }
            }
            '=' => {
                self.advance();
                Ok(self.token(TokenKind::Equals, start))
            }
            '"' | '\'' => {
                self.value_open = Some(start);
                self.advance();
                self.mode = Mode::Quoted(c);
                Ok(self.token(TokenKind::QuoteOpen, start))
            }
            '{' => Ok(self.open_paste(PasteFrom::Tag)),
            c if is_name_start(c) => {
                let name = self.scan_name();
                Ok(Token::new(
                    TokenKind::AttrName(name),
                    Span::new(start, self.position()),
                ))
            }
            c => Err(LexError {
                message: format!("Unexpected character '{c}' in tag"),
                position: start,
            }),
        }
    }

    // --- Quoted value mode ---

    fn next_quoted(&mut self, quote: char) -> Result<Token, LexError> {
        let start = self.position();
        let mut chunk = String::new();

        loop {
            if self.is_at_end() {
                return Err(self.unterminated("Unterminated string", self.value_open));
            }
            let c = self.peek();
            if c == quote {
                if !chunk.is_empty() {
                    return Ok(self.token(TokenKind::Text(chunk), start));
                }
                self.advance();
                self.mode = Mode::Tag;
                self.value_open = None;
                return Ok(self.token(TokenKind::QuoteClose, start));
            }
            if c == '{' {
                if !chunk.is_empty() {
                    return Ok(self.token(TokenKind::Text(chunk), start));
                }
                return Ok(self.open_paste(PasteFrom::Quoted(quote)));
            }
            if c == '\\' {
                self.push_escape(&mut chunk, &['{', '}', quote]);
            } else {
                chunk.push(c);
                self.advance();
            }
        }
    }

    // --- Paste mode ---

    fn open_paste(&mut self, from: PasteFrom) -> Token {
        let open = self.position();
        self.advance(); // `{`
        self.paste_open = Some(open);
        self.mode = Mode::Paste(from);
        self.expect_segment = true;
        self.token(TokenKind::PasteOpen, open)
    }

    fn next_paste(&mut self, from: PasteFrom) -> Result<Token, LexError> {
        if self.expect_segment {
            self.expect_segment = false;
            return self.scan_paste_segment();
        }

        if self.is_at_end() {
            return Err(self.unterminated("Unterminated paste", self.paste_open));
        }

        let start = self.position();
        match self.peek() {
            '|' => {
                self.advance();
                self.expect_segment = true;
                Ok(self.token(TokenKind::PasteSep, start))
            }
            '}' => {
                self.advance();
                self.paste_open = None;
                self.mode = match from {
                    PasteFrom::Content => Mode::Content,
                    PasteFrom::Tag => Mode::Tag,
                    PasteFrom::Quoted(quote) => Mode::Quoted(quote),
                };
                Ok(self.token(TokenKind::PasteClose, start))
            }
            c => Err(LexError {
                message: format!("Unexpected character '{c}' in paste"),
                position: start,
            }),
        }
    }

    /// Scan one paste segment: an optional hint prefix, then content up to
    /// an unescaped `|` or `}` at brace depth zero.
    fn scan_paste_segment(&mut self) -> Result<Token, LexError> {
        let start = self.position();
        let hint = self.scan_paste_hint();

        let mut content = String::new();
        let mut depth = 0usize;
        loop {
            if self.is_at_end() {
                return Err(self.unterminated("Unterminated paste", self.paste_open));
            }
            let c = self.peek();
            match c {
                '|' | '}' if depth == 0 => break,
                '{' => {
                    depth += 1;
                    content.push(c);
                    self.advance();
                }
                '}' => {
                    depth -= 1;
                    content.push(c);
                    self.advance();
                }
                '\\' => self.push_escape(&mut content, &['|', '{', '}', ':']),
                _ => {
                    content.push(c);
                    self.advance();
                }
            }
        }

        Ok(Token::new(
            TokenKind::PasteText {
                text: content,
                hint,
            },
            Span::new(start, self.position()),
        ))
    }

    /// A hint is an identifier immediately followed by an unescaped `:` at
    /// the start of a segment (after optional whitespace, which is consumed
    /// only when the hint matches). One space after the `:` is swallowed.
    fn scan_paste_hint(&mut self) -> Option<String> {
        let mark = (self.pos, self.line, self.column);

        while !self.is_at_end() && self.peek().is_whitespace() {
            self.advance();
        }
        if self.is_at_end() || !is_name_start(self.peek()) {
            (self.pos, self.line, self.column) = mark;
            return None;
        }

        let name = self.scan_name();
        if !self.is_at_end() && self.peek() == ':' {
            self.advance(); // `:`
            if !self.is_at_end() && self.peek() == ' ' {
                self.advance();
            }
            return Some(name);
        }

        (self.pos, self.line, self.column) = mark;
        None
    }

    // --- Shared scanners ---

    /// Scan a tag or attribute name. The cursor is on a name-start
    /// character. Hyphens are allowed when followed by an alphanumeric.
    fn scan_name(&mut self) -> String {
        let mut name = String::new();
        name.push(self.peek());
        self.advance();

        while !self.is_at_end() {
            let c = self.peek();
            if c.is_alphanumeric()
                || c == '_'
                || (c == '-' && self.peek_at(1).is_alphanumeric())
            {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }

        name
    }

    /// Decode a backslash escape into `out`. The cursor is on the
    /// backslash. `\n`, `\t`, `\r`, and `\\` are always recognized; `extra`
    /// lists the context's additional escapable characters. Unknown escapes
    /// keep the backslash.
    fn push_escape(&mut self, out: &mut String, extra: &[char]) {
        self.advance(); // backslash
        if self.is_at_end() {
            out.push('\\');
            return;
        }
        let c = self.peek();
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            c if extra.contains(&c) => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
        self.advance();
    }

    // --- Helpers ---

    fn token(&self, kind: TokenKind, start: Position) -> Token {
        Token::new(kind, Span::new(start, self.position()))
    }

    fn unterminated(&self, what: &str, open: Option<Position>) -> LexError {
        LexError {
            message: what.into(),
            position: open.unwrap_or_else(|| self.position()),
        }
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.pos]
        }
    }

    fn peek_at(&self, n: usize) -> char {
        if self.pos + n >= self.chars.len() {
            '\0'
        } else {
            self.chars[self.pos + n]
        }
    }

    fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        let c = self.chars[self.pos];
        self.pos += 1;
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            // `\r\n` counts as one terminator, handled at the `\n`.
            '\r' if self.peek() != '\n' => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}
