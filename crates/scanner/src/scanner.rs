//! The YAML scanner.
//!
//! This is a libyaml-style scanner: it tracks a stack of block indentation
//! levels and a set of "possible simple keys", and emits the structural
//! tokens (`BLOCK-MAPPING-START`, `KEY`, `BLOCK-END`, ...) that a YAML parser
//! consumes. It follows the reference scanners closely, including the parts
//! a linter has to live with:
//!
//! - implicit `KEY` tokens are zero-length and inserted retroactively when the
//!   `:` after a key is found;
//! - a block sequence at the same column as its parent mapping key gets no
//!   `BLOCK-SEQUENCE-START` and no `BLOCK-END`;
//! - block scalars end at the start of the line after their content, plain
//!   scalars right after their last non-blank character.
//!
//! Comments are not tokens; they are collected on the side and available
//! through [`Scanner::comments`].

use std::collections::{BTreeMap, VecDeque};

use tracing::trace;

use crate::error::{Result, ScanError};
use crate::token::{Comment, Mark, ScalarStyle, Token, TokenKind};

/// Possible simple keys are forgotten after this many characters.
const MAX_SIMPLE_KEY_LENGTH: usize = 1024;

fn is_break(ch: char) -> bool {
    matches!(ch, '\r' | '\n' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn is_break_or_nul(ch: char) -> bool {
    ch == '\0' || is_break(ch)
}

fn is_blank_or_break_or_nul(ch: char) -> bool {
    ch == ' ' || ch == '\t' || is_break_or_nul(ch)
}

fn is_space_or_break_or_nul(ch: char) -> bool {
    ch == ' ' || is_break_or_nul(ch)
}

fn is_uri_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "-;/?:@&=+$,_.!~*'()[]%".contains(ch)
}

#[derive(Debug, Clone, Copy)]
struct SimpleKey {
    token_number: usize,
    required: bool,
    pointer: usize,
    line: usize,
    mark: Mark,
}

/// Streaming YAML scanner over a string.
///
/// Yields tokens in order, from `STREAM-START` to `STREAM-END`. After the first
/// error the iterator is exhausted.
///
/// ```rust
/// use yamlstyle_scanner::Scanner;
///
/// let kinds: Vec<&str> = Scanner::new("a: 1\n")
///     .map(|t| t.unwrap().kind.name())
///     .collect();
/// assert_eq!(
///     kinds,
///     ["STREAM-START", "BLOCK-MAPPING-START", "KEY", "SCALAR", "VALUE", "SCALAR", "BLOCK-END", "STREAM-END"]
/// );
/// ```
pub struct Scanner<'src> {
    source: &'src str,
    chars: Vec<char>,
    /// Byte offset of each char, plus one trailing entry for the end.
    offsets: Vec<usize>,
    pointer: usize,
    line: usize,
    column: usize,

    done: bool,
    failed: bool,
    flow_level: usize,
    tokens: VecDeque<Token>,
    tokens_taken: usize,
    indent: isize,
    indents: Vec<isize>,
    allow_simple_key: bool,
    possible_simple_keys: BTreeMap<usize, SimpleKey>,
    comments: Vec<Comment>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let mut offsets = Vec::with_capacity(source.len() + 1);
        for (offset, ch) in source.char_indices() {
            chars.push(ch);
            offsets.push(offset);
        }
        offsets.push(source.len());

        let mut scanner = Self {
            source,
            chars,
            offsets,
            pointer: 0,
            line: 0,
            column: 0,
            done: false,
            failed: false,
            flow_level: 0,
            tokens: VecDeque::new(),
            tokens_taken: 0,
            indent: -1,
            indents: Vec::new(),
            allow_simple_key: true,
            possible_simple_keys: BTreeMap::new(),
            comments: Vec::new(),
        };
        let mark = scanner.mark();
        scanner.tokens.push_back(Token::new(TokenKind::StreamStart, mark, mark));
        scanner
    }

    /// Comments seen so far.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn into_comments(self) -> Vec<Comment> {
        self.comments
    }

    // ------------------------------------------------------------------
    // Reader
    // ------------------------------------------------------------------

    fn peek(&self, n: usize) -> char {
        self.chars.get(self.pointer + n).copied().unwrap_or('\0')
    }

    fn prefix(&self, n: usize) -> String {
        let end = (self.pointer + n).min(self.chars.len());
        self.chars[self.pointer.min(end)..end].iter().collect()
    }

    fn forward(&mut self, n: usize) {
        for _ in 0..n {
            let Some(&ch) = self.chars.get(self.pointer) else {
                return;
            };
            self.pointer += 1;
            if matches!(ch, '\n' | '\u{85}' | '\u{2028}' | '\u{2029}')
                || (ch == '\r' && self.peek(0) != '\n')
            {
                self.line += 1;
                self.column = 0;
            } else if ch != '\u{feff}' {
                self.column += 1;
            }
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            index: self.offsets[self.pointer.min(self.chars.len())],
            line: self.line,
            column: self.column,
        }
    }

    fn error<T>(&self, problem: impl Into<String>) -> Result<T> {
        Err(ScanError::new(problem, self.mark()))
    }

    // ------------------------------------------------------------------
    // Token queue
    // ------------------------------------------------------------------

    fn next_token(&mut self) -> Result<Option<Token>> {
        while self.need_more_tokens()? {
            self.fetch_more_tokens()?;
        }
        let token = self.tokens.pop_front();
        if token.is_some() {
            self.tokens_taken += 1;
        }
        Ok(token)
    }

    fn need_more_tokens(&mut self) -> Result<bool> {
        if self.done {
            return Ok(false);
        }
        if self.tokens.is_empty() {
            return Ok(true);
        }
        // The current token may be a potential simple key, so we need to
        // look further.
        self.stale_possible_simple_keys()?;
        Ok(self.next_possible_simple_key() == Some(self.tokens_taken))
    }

    fn fetch_more_tokens(&mut self) -> Result<()> {
        self.scan_to_next_token();
        self.stale_possible_simple_keys()?;
        self.unwind_indent(self.column as isize);

        let ch = self.peek(0);
        match ch {
            '\0' if self.pointer >= self.chars.len() => self.fetch_stream_end(),
            '%' if self.check_directive() => self.fetch_directive(),
            '-' if self.check_document_indicator("---") => {
                self.fetch_document_indicator(TokenKind::DocumentStart)
            }
            '.' if self.check_document_indicator("...") => {
                self.fetch_document_indicator(TokenKind::DocumentEnd)
            }
            '[' => self.fetch_flow_collection_start(TokenKind::FlowSequenceStart),
            '{' => self.fetch_flow_collection_start(TokenKind::FlowMappingStart),
            ']' => self.fetch_flow_collection_end(TokenKind::FlowSequenceEnd),
            '}' => self.fetch_flow_collection_end(TokenKind::FlowMappingEnd),
            ',' => self.fetch_flow_entry(),
            '-' if self.check_block_entry() => self.fetch_block_entry(),
            '?' if self.check_key() => self.fetch_key(),
            ':' if self.check_value() => self.fetch_value(),
            '*' | '&' => self.fetch_anchor(ch == '*'),
            '!' => self.fetch_tag(),
            '|' if self.flow_level == 0 => self.fetch_block_scalar(ScalarStyle::Literal),
            '>' if self.flow_level == 0 => self.fetch_block_scalar(ScalarStyle::Folded),
            '\'' => self.fetch_flow_scalar(ScalarStyle::SingleQuoted),
            '"' => self.fetch_flow_scalar(ScalarStyle::DoubleQuoted),
            _ if self.check_plain() => self.fetch_plain(),
            _ => self.error(format!(
                "found character {:?} that cannot start any token",
                ch
            )),
        }
    }

    // ------------------------------------------------------------------
    // Simple keys
    // ------------------------------------------------------------------

    fn next_possible_simple_key(&self) -> Option<usize> {
        self.possible_simple_keys.values().map(|key| key.token_number).min()
    }

    fn stale_possible_simple_keys(&mut self) -> Result<()> {
        let mut stale = Vec::new();
        for (&level, key) in &self.possible_simple_keys {
            if key.line != self.line || self.pointer - key.pointer > MAX_SIMPLE_KEY_LENGTH {
                if key.required {
                    return Err(ScanError::new("could not find expected ':'", key.mark));
                }
                stale.push(level);
            }
        }
        for level in stale {
            self.possible_simple_keys.remove(&level);
        }
        Ok(())
    }

    fn save_possible_simple_key(&mut self) -> Result<()> {
        let required = self.flow_level == 0 && self.indent == self.column as isize;
        if self.allow_simple_key {
            self.remove_possible_simple_key()?;
            let key = SimpleKey {
                token_number: self.tokens_taken + self.tokens.len(),
                required,
                pointer: self.pointer,
                line: self.line,
                mark: self.mark(),
            };
            self.possible_simple_keys.insert(self.flow_level, key);
        }
        Ok(())
    }

    fn remove_possible_simple_key(&mut self) -> Result<()> {
        if let Some(key) = self.possible_simple_keys.remove(&self.flow_level) {
            if key.required {
                return Err(ScanError::new("could not find expected ':'", key.mark));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Indentation
    // ------------------------------------------------------------------

    fn unwind_indent(&mut self, column: isize) {
        // Indentation is ignored in the flow context.
        if self.flow_level > 0 {
            return;
        }
        while self.indent > column {
            let mark = self.mark();
            self.indent = self.indents.pop().unwrap_or(-1);
            self.tokens.push_back(Token::new(TokenKind::BlockEnd, mark, mark));
        }
    }

    fn add_indent(&mut self, column: isize) -> bool {
        if self.indent < column {
            self.indents.push(self.indent);
            self.indent = column;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Fetchers
    // ------------------------------------------------------------------

    fn push_simple(&mut self, kind: TokenKind, width: usize) {
        let start = self.mark();
        self.forward(width);
        let end = self.mark();
        self.tokens.push_back(Token::new(kind, start, end));
    }

    fn fetch_stream_end(&mut self) -> Result<()> {
        self.unwind_indent(-1);
        self.remove_possible_simple_key()?;
        self.allow_simple_key = false;
        self.possible_simple_keys.clear();
        let mark = self.mark();
        self.tokens.push_back(Token::new(TokenKind::StreamEnd, mark, mark));
        self.done = true;
        Ok(())
    }

    fn fetch_directive(&mut self) -> Result<()> {
        self.unwind_indent(-1);
        self.remove_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_directive()?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_document_indicator(&mut self, kind: TokenKind) -> Result<()> {
        self.unwind_indent(-1);
        self.remove_possible_simple_key()?;
        self.allow_simple_key = false;
        self.push_simple(kind, 3);
        Ok(())
    }

    fn fetch_flow_collection_start(&mut self, kind: TokenKind) -> Result<()> {
        // '[' and '{' may start a simple key.
        self.save_possible_simple_key()?;
        self.flow_level += 1;
        self.allow_simple_key = true;
        self.push_simple(kind, 1);
        Ok(())
    }

    fn fetch_flow_collection_end(&mut self, kind: TokenKind) -> Result<()> {
        self.remove_possible_simple_key()?;
        self.flow_level = self.flow_level.saturating_sub(1);
        self.allow_simple_key = false;
        self.push_simple(kind, 1);
        Ok(())
    }

    fn fetch_flow_entry(&mut self) -> Result<()> {
        self.allow_simple_key = true;
        self.remove_possible_simple_key()?;
        self.push_simple(TokenKind::FlowEntry, 1);
        Ok(())
    }

    fn fetch_block_entry(&mut self) -> Result<()> {
        if self.flow_level == 0 {
            if !self.allow_simple_key {
                return self.error("sequence entries are not allowed here");
            }
            if self.add_indent(self.column as isize) {
                let mark = self.mark();
                self.tokens.push_back(Token::new(TokenKind::BlockSequenceStart, mark, mark));
            }
        }
        self.allow_simple_key = true;
        self.remove_possible_simple_key()?;
        self.push_simple(TokenKind::BlockEntry, 1);
        Ok(())
    }

    fn fetch_key(&mut self) -> Result<()> {
        if self.flow_level == 0 {
            if !self.allow_simple_key {
                return self.error("mapping keys are not allowed here");
            }
            if self.add_indent(self.column as isize) {
                let mark = self.mark();
                self.tokens.push_back(Token::new(TokenKind::BlockMappingStart, mark, mark));
            }
        }
        self.allow_simple_key = self.flow_level == 0;
        self.remove_possible_simple_key()?;
        self.push_simple(TokenKind::Key, 1);
        Ok(())
    }

    fn fetch_value(&mut self) -> Result<()> {
        if let Some(key) = self.possible_simple_keys.remove(&self.flow_level) {
            // Insert the KEY (and maybe BLOCK-MAPPING-START) before the
            // tokens of the key itself.
            let position = key.token_number - self.tokens_taken;
            self.tokens.insert(position, Token::new(TokenKind::Key, key.mark, key.mark));
            if self.flow_level == 0 && self.add_indent(key.mark.column as isize) {
                self.tokens
                    .insert(position, Token::new(TokenKind::BlockMappingStart, key.mark, key.mark));
            }
            self.allow_simple_key = false;
        } else {
            if self.flow_level == 0 {
                if !self.allow_simple_key {
                    return self.error("mapping values are not allowed here");
                }
                if self.add_indent(self.column as isize) {
                    let mark = self.mark();
                    self.tokens.push_back(Token::new(TokenKind::BlockMappingStart, mark, mark));
                }
            }
            self.allow_simple_key = self.flow_level == 0;
            self.remove_possible_simple_key()?;
        }
        self.push_simple(TokenKind::Value, 1);
        Ok(())
    }

    fn fetch_anchor(&mut self, alias: bool) -> Result<()> {
        self.save_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_anchor(alias)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_tag(&mut self) -> Result<()> {
        self.save_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_tag()?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_block_scalar(&mut self, style: ScalarStyle) -> Result<()> {
        // A simple key may follow a block scalar.
        self.allow_simple_key = true;
        self.remove_possible_simple_key()?;
        let token = self.scan_block_scalar(style)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_flow_scalar(&mut self, style: ScalarStyle) -> Result<()> {
        self.save_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_flow_scalar(style)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_plain(&mut self) -> Result<()> {
        self.save_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_plain()?;
        self.tokens.push_back(token);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Checkers
    // ------------------------------------------------------------------

    fn check_directive(&self) -> bool {
        self.column == 0
    }

    fn check_document_indicator(&self, indicator: &str) -> bool {
        self.column == 0 && self.prefix(3) == indicator && is_blank_or_break_or_nul(self.peek(3))
    }

    fn check_block_entry(&self) -> bool {
        is_blank_or_break_or_nul(self.peek(1))
    }

    fn check_key(&self) -> bool {
        self.flow_level > 0 || is_blank_or_break_or_nul(self.peek(1))
    }

    fn check_value(&self) -> bool {
        self.flow_level > 0 || is_blank_or_break_or_nul(self.peek(1))
    }

    fn check_plain(&self) -> bool {
        let ch = self.peek(0);
        !(is_blank_or_break_or_nul(ch) || "-?:,[]{}#&*!|>'\"%@`".contains(ch))
            || (!is_blank_or_break_or_nul(self.peek(1))
                && (ch == '-' || (self.flow_level == 0 && (ch == '?' || ch == ':'))))
    }

    // ------------------------------------------------------------------
    // Scanners
    // ------------------------------------------------------------------

    fn scan_to_next_token(&mut self) {
        if self.pointer == 0 && self.peek(0) == '\u{feff}' {
            self.forward(1);
        }
        loop {
            while self.peek(0) == ' '
                || (self.peek(0) == '\t' && (self.flow_level > 0 || !self.allow_simple_key))
            {
                self.forward(1);
            }
            if self.peek(0) == '#' {
                self.scan_comment();
            }
            if self.scan_line_break().is_some() {
                if self.flow_level == 0 {
                    self.allow_simple_key = true;
                }
            } else {
                break;
            }
        }
    }

    fn scan_comment(&mut self) {
        let start = self.mark();
        let mut text = String::new();
        while !is_break_or_nul(self.peek(0)) {
            text.push(self.peek(0));
            self.forward(1);
        }
        let end = self.mark();
        let line_start = self.source[..start.index].rfind('\n').map_or(0, |p| p + 1);
        let inline = !self.source[line_start..start.index].trim().is_empty();
        self.comments.push(Comment { start, end, text, inline });
    }

    /// Consumes a line break, normalizing `\r\n`, `\r` and `\x85` to `\n`.
    fn scan_line_break(&mut self) -> Option<char> {
        match self.peek(0) {
            '\r' if self.peek(1) == '\n' => {
                self.forward(2);
                Some('\n')
            }
            '\r' | '\n' | '\u{85}' => {
                self.forward(1);
                Some('\n')
            }
            ch @ ('\u{2028}' | '\u{2029}') => {
                self.forward(1);
                Some(ch)
            }
            _ => None,
        }
    }

    fn scan_ignored_line(&mut self) -> Result<()> {
        while self.peek(0) == ' ' || self.peek(0) == '\t' {
            self.forward(1);
        }
        if self.peek(0) == '#' {
            self.scan_comment();
        }
        if !is_break_or_nul(self.peek(0)) {
            return self.error(format!(
                "expected a comment or a line break, but found {:?}",
                self.peek(0)
            ));
        }
        self.scan_line_break();
        Ok(())
    }

    fn scan_directive(&mut self) -> Result<Token> {
        let start = self.mark();
        self.forward(1);
        let mut length = 0;
        while self.peek(length).is_ascii_alphanumeric() || "-_".contains(self.peek(length)) {
            length += 1;
        }
        if length == 0 {
            return self.error("expected alphabetic or numeric character in directive name");
        }
        let name = self.prefix(length);
        self.forward(length);
        if !is_blank_or_break_or_nul(self.peek(0)) {
            return self.error(format!(
                "expected alphabetic or numeric character, but found {:?}",
                self.peek(0)
            ));
        }
        while self.peek(0) == ' ' || self.peek(0) == '\t' {
            self.forward(1);
        }
        let mut value = String::new();
        while !is_break_or_nul(self.peek(0)) && !(self.peek(0) == '#' && value.ends_with([' ', '\t'])) {
            value.push(self.peek(0));
            self.forward(1);
        }
        let value = value.trim_end().to_string();
        let end = self.mark();
        self.scan_ignored_line()?;
        Ok(Token::new(TokenKind::Directive { name, value }, start, end))
    }

    fn scan_anchor(&mut self, alias: bool) -> Result<Token> {
        let start = self.mark();
        self.forward(1);
        let mut length = 0;
        while !is_blank_or_break_or_nul(self.peek(length)) && !",[]{}".contains(self.peek(length)) {
            length += 1;
        }
        if length == 0 {
            let what = if alias { "alias" } else { "anchor" };
            return self.error(format!(
                "expected {what} name, but found {:?}",
                self.peek(0)
            ));
        }
        let name = self.prefix(length);
        self.forward(length);
        let end = self.mark();
        let kind = if alias { TokenKind::Alias(name) } else { TokenKind::Anchor(name) };
        Ok(Token::new(kind, start, end))
    }

    fn scan_tag(&mut self) -> Result<Token> {
        let start = self.mark();
        let ch = self.peek(1);
        let (handle, suffix) = if ch == '<' {
            self.forward(2);
            let suffix = self.scan_tag_uri()?;
            if self.peek(0) != '>' {
                return self.error(format!("expected '>', but found {:?}", self.peek(0)));
            }
            self.forward(1);
            (String::new(), suffix)
        } else if is_blank_or_break_or_nul(ch) {
            self.forward(1);
            (String::new(), "!".to_string())
        } else {
            let mut length = 1;
            let mut use_handle = false;
            let mut ch = ch;
            while !is_space_or_break_or_nul(ch) {
                if ch == '!' {
                    use_handle = true;
                    break;
                }
                length += 1;
                ch = self.peek(length);
            }
            let handle = if use_handle {
                self.scan_tag_handle()?
            } else {
                self.forward(1);
                "!".to_string()
            };
            (handle, self.scan_tag_uri()?)
        };
        if !is_space_or_break_or_nul(self.peek(0)) && !(self.flow_level > 0 && ",]}".contains(self.peek(0))) {
            return self.error(format!("expected ' ', but found {:?}", self.peek(0)));
        }
        let end = self.mark();
        Ok(Token::new(TokenKind::Tag { handle, suffix }, start, end))
    }

    fn scan_tag_handle(&mut self) -> Result<String> {
        let mut length = 1;
        while self.peek(length).is_ascii_alphanumeric() || "-_".contains(self.peek(length)) {
            length += 1;
        }
        if self.peek(length) != '!' {
            self.forward(length);
            return self.error(format!("expected '!', but found {:?}", self.peek(0)));
        }
        length += 1;
        let handle = self.prefix(length);
        self.forward(length);
        Ok(handle)
    }

    fn scan_tag_uri(&mut self) -> Result<String> {
        let mut length = 0;
        while is_uri_char(self.peek(length)) && !(self.flow_level > 0 && ",[]{}".contains(self.peek(length))) {
            length += 1;
        }
        if length == 0 {
            return self.error(format!("expected URI, but found {:?}", self.peek(0)));
        }
        let uri = self.prefix(length);
        self.forward(length);
        Ok(uri)
    }

    fn scan_block_scalar(&mut self, style: ScalarStyle) -> Result<Token> {
        let folded = style == ScalarStyle::Folded;
        let start = self.mark();
        self.forward(1);

        let (chomping, increment) = self.scan_block_scalar_indicators()?;
        self.scan_ignored_line()?;

        let min_indent = (self.indent + 1).max(1) as usize;
        let (mut breaks, mut end, indent) = match increment {
            None => {
                let (breaks, max_indent, end) = self.scan_block_scalar_indentation();
                (breaks, end, min_indent.max(max_indent))
            }
            Some(increment) => {
                let indent = min_indent + increment - 1;
                let (breaks, end) = self.scan_block_scalar_breaks(indent);
                (breaks, end, indent)
            }
        };

        let mut chunks = String::new();
        let mut line_break: Option<char> = None;
        while self.column == indent && self.peek(0) != '\0' {
            chunks.extend(breaks.drain(..));
            let leading_non_space = self.peek(0) != ' ' && self.peek(0) != '\t';
            while !is_break_or_nul(self.peek(0)) {
                chunks.push(self.peek(0));
                self.forward(1);
            }
            line_break = self.scan_line_break();
            let (next_breaks, next_end) = self.scan_block_scalar_breaks(indent);
            breaks = next_breaks;
            end = next_end;
            if self.column == indent && self.peek(0) != '\0' {
                if folded
                    && line_break == Some('\n')
                    && leading_non_space
                    && self.peek(0) != ' '
                    && self.peek(0) != '\t'
                {
                    if breaks.is_empty() {
                        chunks.push(' ');
                    }
                } else if let Some(lb) = line_break {
                    chunks.push(lb);
                }
            } else {
                break;
            }
        }

        // Chomping: `None` clips, `Some(false)` strips, `Some(true)` keeps.
        if chomping != Some(false) {
            if let Some(lb) = line_break {
                chunks.push(lb);
            }
        }
        if chomping == Some(true) {
            chunks.extend(breaks);
        }

        Ok(Token::new(TokenKind::Scalar { value: chunks, style }, start, end))
    }

    fn scan_block_scalar_indicators(&mut self) -> Result<(Option<bool>, Option<usize>)> {
        let mut chomping = None;
        let mut increment = None;
        let ch = self.peek(0);
        if ch == '+' || ch == '-' {
            chomping = Some(ch == '+');
            self.forward(1);
            if let Some(digit) = self.peek(0).to_digit(10) {
                if digit == 0 {
                    return self.error("expected indentation indicator in the range 1-9, but found 0");
                }
                increment = Some(digit as usize);
                self.forward(1);
            }
        } else if let Some(digit) = ch.to_digit(10) {
            if digit == 0 {
                return self.error("expected indentation indicator in the range 1-9, but found 0");
            }
            increment = Some(digit as usize);
            self.forward(1);
            let ch = self.peek(0);
            if ch == '+' || ch == '-' {
                chomping = Some(ch == '+');
                self.forward(1);
            }
        }
        if !is_blank_or_break_or_nul(self.peek(0)) {
            return self.error(format!(
                "expected chomping or indentation indicators, but found {:?}",
                self.peek(0)
            ));
        }
        Ok((chomping, increment))
    }

    fn scan_block_scalar_indentation(&mut self) -> (Vec<char>, usize, Mark) {
        let mut breaks = Vec::new();
        let mut max_indent = 0;
        let mut end = self.mark();
        while self.peek(0) == ' ' || is_break(self.peek(0)) {
            if self.peek(0) != ' ' {
                if let Some(lb) = self.scan_line_break() {
                    breaks.push(lb);
                }
                end = self.mark();
            } else {
                self.forward(1);
                max_indent = max_indent.max(self.column);
            }
        }
        (breaks, max_indent, end)
    }

    fn scan_block_scalar_breaks(&mut self, indent: usize) -> (Vec<char>, Mark) {
        let mut breaks = Vec::new();
        let mut end = self.mark();
        while self.column < indent && self.peek(0) == ' ' {
            self.forward(1);
        }
        while is_break(self.peek(0)) {
            if let Some(lb) = self.scan_line_break() {
                breaks.push(lb);
            }
            end = self.mark();
            while self.column < indent && self.peek(0) == ' ' {
                self.forward(1);
            }
        }
        (breaks, end)
    }

    fn scan_flow_scalar(&mut self, style: ScalarStyle) -> Result<Token> {
        let double = style == ScalarStyle::DoubleQuoted;
        let start = self.mark();
        let quote = self.peek(0);
        self.forward(1);
        let mut value = String::new();
        self.scan_flow_scalar_non_spaces(double, &mut value)?;
        while self.peek(0) != quote {
            self.scan_flow_scalar_spaces(&mut value)?;
            self.scan_flow_scalar_non_spaces(double, &mut value)?;
        }
        self.forward(1);
        let end = self.mark();
        Ok(Token::new(TokenKind::Scalar { value, style }, start, end))
    }

    fn scan_flow_scalar_non_spaces(&mut self, double: bool, value: &mut String) -> Result<()> {
        loop {
            while !is_blank_or_break_or_nul(self.peek(0)) && !"'\"\\".contains(self.peek(0)) {
                value.push(self.peek(0));
                self.forward(1);
            }
            let ch = self.peek(0);
            if !double && ch == '\'' && self.peek(1) == '\'' {
                value.push('\'');
                self.forward(2);
            } else if (double && ch == '\'') || (!double && (ch == '"' || ch == '\\')) {
                value.push(ch);
                self.forward(1);
            } else if double && ch == '\\' {
                self.forward(1);
                let ch = self.peek(0);
                if let Some(replacement) = escape_replacement(ch) {
                    value.push(replacement);
                    self.forward(1);
                } else if let Some(length) = escape_code_length(ch) {
                    self.forward(1);
                    let digits = self.prefix(length);
                    let code = u32::from_str_radix(&digits, 16)
                        .ok()
                        .filter(|_| digits.len() == length)
                        .and_then(char::from_u32);
                    match code {
                        Some(decoded) => value.push(decoded),
                        None => {
                            return self.error(format!(
                                "expected escape sequence of {length} hexadecimal numbers, but found {digits:?}"
                            ))
                        }
                    }
                    self.forward(length);
                } else if is_break(ch) {
                    self.scan_line_break();
                    self.scan_flow_scalar_breaks(value)?;
                } else {
                    return self.error(format!("found unknown escape character {ch:?}"));
                }
            } else {
                return Ok(());
            }
        }
    }

    fn scan_flow_scalar_spaces(&mut self, value: &mut String) -> Result<()> {
        let mut whitespaces = String::new();
        while self.peek(0) == ' ' || self.peek(0) == '\t' {
            whitespaces.push(self.peek(0));
            self.forward(1);
        }
        let ch = self.peek(0);
        if ch == '\0' {
            return self.error("found unexpected end of stream while scanning a quoted scalar");
        } else if is_break(ch) {
            let line_break = self.scan_line_break();
            let mut breaks = String::new();
            self.scan_flow_scalar_breaks(&mut breaks)?;
            if line_break != Some('\n') {
                value.extend(line_break);
            } else if breaks.is_empty() {
                value.push(' ');
            }
            value.push_str(&breaks);
        } else {
            value.push_str(&whitespaces);
        }
        Ok(())
    }

    fn scan_flow_scalar_breaks(&mut self, breaks: &mut String) -> Result<()> {
        loop {
            let prefix = self.prefix(3);
            if (prefix == "---" || prefix == "...") && is_blank_or_break_or_nul(self.peek(3)) && self.column == 0 {
                return self.error("found unexpected document separator while scanning a quoted scalar");
            }
            while self.peek(0) == ' ' || self.peek(0) == '\t' {
                self.forward(1);
            }
            if is_break(self.peek(0)) {
                breaks.extend(self.scan_line_break());
            } else {
                return Ok(());
            }
        }
    }

    fn scan_plain(&mut self) -> Result<Token> {
        let start = self.mark();
        let mut end = start;
        let indent = self.indent + 1;
        let mut value = String::new();
        let mut spaces = String::new();
        loop {
            if self.peek(0) == '#' {
                break;
            }
            let mut length = 0;
            loop {
                let ch = self.peek(length);
                if is_blank_or_break_or_nul(ch)
                    || (ch == ':'
                        && (is_blank_or_break_or_nul(self.peek(length + 1))
                            || (self.flow_level > 0 && ",[]{}".contains(self.peek(length + 1)))))
                    || (self.flow_level > 0 && ",?[]{}".contains(ch))
                {
                    break;
                }
                length += 1;
            }
            if length == 0 {
                break;
            }
            self.allow_simple_key = false;
            value.push_str(&spaces);
            value.push_str(&self.prefix(length));
            self.forward(length);
            end = self.mark();
            match self.scan_plain_spaces() {
                Some(next_spaces) if !next_spaces.is_empty() => spaces = next_spaces,
                _ => break,
            }
            if self.peek(0) == '#' || (self.flow_level == 0 && (self.column as isize) < indent) {
                break;
            }
        }
        Ok(Token::new(TokenKind::Scalar { value, style: ScalarStyle::Plain }, start, end))
    }

    /// Returns `None` when a document separator interrupts the scalar.
    fn scan_plain_spaces(&mut self) -> Option<String> {
        let mut whitespaces = String::new();
        while self.peek(0) == ' ' || self.peek(0) == '\t' {
            whitespaces.push(self.peek(0));
            self.forward(1);
        }
        if !is_break(self.peek(0)) {
            return Some(whitespaces);
        }
        let line_break = self.scan_line_break();
        self.allow_simple_key = true;
        if self.at_document_separator() {
            return None;
        }
        let mut breaks = String::new();
        while self.peek(0) == ' ' || is_break(self.peek(0)) {
            if self.peek(0) == ' ' {
                self.forward(1);
            } else {
                breaks.extend(self.scan_line_break());
                if self.at_document_separator() {
                    return None;
                }
            }
        }
        let mut chunks = String::new();
        if line_break != Some('\n') {
            chunks.extend(line_break);
        } else if breaks.is_empty() {
            chunks.push(' ');
        }
        chunks.push_str(&breaks);
        Some(chunks)
    }

    fn at_document_separator(&self) -> bool {
        let prefix = self.prefix(3);
        self.column == 0
            && (prefix == "---" || prefix == "...")
            && is_blank_or_break_or_nul(self.peek(3))
    }
}

fn escape_replacement(ch: char) -> Option<char> {
    Some(match ch {
        '0' => '\0',
        'a' => '\u{07}',
        'b' => '\u{08}',
        't' | '\t' => '\t',
        'n' => '\n',
        'v' => '\u{0B}',
        'f' => '\u{0C}',
        'r' => '\r',
        'e' => '\u{1B}',
        ' ' => ' ',
        '"' => '"',
        '/' => '/',
        '\\' => '\\',
        'N' => '\u{85}',
        '_' => '\u{A0}',
        'L' => '\u{2028}',
        'P' => '\u{2029}',
        _ => return None,
    })
}

fn escape_code_length(ch: char) -> Option<usize> {
    match ch {
        'x' => Some(2),
        'u' => Some(4),
        'U' => Some(8),
        _ => None,
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => {
                trace!(kind = token.kind.name(), line = token.start.line, column = token.start.column, "token");
                Some(Ok(token))
            }
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Everything a scanner produced for one input.
#[derive(Debug, Clone, Default)]
pub struct Tokenized {
    /// Tokens up to (excluding) the first error.
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub error: Option<ScanError>,
}

/// Scans a whole input, keeping the tokens produced before any error.
pub fn tokenize(source: &str) -> Tokenized {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    let mut error = None;
    for result in scanner.by_ref() {
        match result {
            Ok(token) => tokens.push(token),
            Err(err) => {
                error = Some(err);
                break;
            }
        }
    }
    Tokenized { tokens, comments: scanner.into_comments(), error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<&'static str> {
        let scanned = tokenize(source);
        assert!(scanned.error.is_none(), "unexpected error: {:?}", scanned.error);
        scanned.tokens.iter().map(|t| t.kind.name()).collect()
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(kinds(""), vec!["STREAM-START", "STREAM-END"]);
    }

    #[test]
    fn test_implicit_key_is_zero_length() {
        let scanned = tokenize("key: value\n");
        let key = &scanned.tokens[2];
        assert_eq!(key.kind, TokenKind::Key);
        assert_eq!(key.start, key.end);
        assert_eq!(key.start.column, 0);
    }

    #[test]
    fn test_explicit_key_spans_marker() {
        let scanned = tokenize("? key\n: value\n");
        let key = scanned.tokens.iter().find(|t| t.kind == TokenKind::Key).unwrap();
        assert_eq!(key.start.index, 0);
        assert_eq!(key.end.index, 1);
    }

    #[test]
    fn test_indentless_sequence_has_no_start() {
        assert_eq!(
            kinds("key:\n- a\n"),
            vec![
                "STREAM-START",
                "BLOCK-MAPPING-START",
                "KEY",
                "SCALAR",
                "VALUE",
                "BLOCK-ENTRY",
                "SCALAR",
                "BLOCK-END",
                "STREAM-END",
            ]
        );
    }

    #[test]
    fn test_indented_sequence_has_start() {
        assert_eq!(
            kinds("key:\n  - a\n"),
            vec![
                "STREAM-START",
                "BLOCK-MAPPING-START",
                "KEY",
                "SCALAR",
                "VALUE",
                "BLOCK-SEQUENCE-START",
                "BLOCK-ENTRY",
                "SCALAR",
                "BLOCK-END",
                "BLOCK-END",
                "STREAM-END",
            ]
        );
    }

    #[test]
    fn test_flow_collections() {
        assert_eq!(
            kinds("{a: [1, 2]}\n"),
            vec![
                "STREAM-START",
                "FLOW-MAPPING-START",
                "KEY",
                "SCALAR",
                "VALUE",
                "FLOW-SEQUENCE-START",
                "SCALAR",
                "FLOW-ENTRY",
                "SCALAR",
                "FLOW-SEQUENCE-END",
                "FLOW-MAPPING-END",
                "STREAM-END",
            ]
        );
    }

    #[test]
    fn test_plain_scalar_end_mark() {
        let scanned = tokenize("a: multi\n  line\n\nb: 1\n");
        let scalar = &scanned.tokens[5];
        assert_eq!(scalar.scalar_value(), Some("multi line"));
        assert_eq!(scalar.end.line, 1);
        assert_eq!(scalar.end.column, 6);
    }

    #[test]
    fn test_block_scalar_end_mark() {
        let scanned = tokenize("a: |\n  x\n  y\n\n\nb: 1\n");
        let scalar = &scanned.tokens[5];
        assert_eq!(scalar.scalar_value(), Some("x\ny\n"));
        assert_eq!(scalar.scalar_style(), Some(ScalarStyle::Literal));
        assert_eq!(scalar.end.line, 5);
        assert_eq!(scalar.end.column, 0);
    }

    #[test]
    fn test_folded_scalar_value() {
        let scanned = tokenize(">-\n  folded\n  text\n\n  para\n");
        let scalar = &scanned.tokens[1];
        assert_eq!(scalar.scalar_value(), Some("folded text\npara"));
    }

    #[test]
    fn test_quoted_scalars() {
        let scanned = tokenize("- 'it''s'\n- \"tab\\there \\x41\"\n");
        let values: Vec<_> = scanned.tokens.iter().filter_map(|t| t.scalar_value()).collect();
        assert_eq!(values, vec!["it's", "tab\there A"]);
    }

    #[test]
    fn test_anchor_alias_tag() {
        let scanned = tokenize("a: &x !!str v\nb: *x\n");
        let anchor = scanned.tokens.iter().find(|t| matches!(t.kind, TokenKind::Anchor(_))).unwrap();
        assert_eq!(anchor.kind, TokenKind::Anchor("x".into()));
        let tag = scanned.tokens.iter().find(|t| matches!(t.kind, TokenKind::Tag { .. })).unwrap();
        assert_eq!(tag.kind, TokenKind::Tag { handle: "!!".into(), suffix: "str".into() });
        assert!(scanned.tokens.iter().any(|t| t.kind == TokenKind::Alias("x".into())));
    }

    #[test]
    fn test_comments_are_collected() {
        let scanned = tokenize("# head\na: 1  # inline\n");
        assert_eq!(scanned.comments.len(), 2);
        assert_eq!(scanned.comments[0].text, "# head");
        assert!(!scanned.comments[0].inline);
        assert_eq!(scanned.comments[1].text, "# inline");
        assert!(scanned.comments[1].inline);
        assert_eq!(scanned.comments[1].start.column, 6);
    }

    #[test]
    fn test_documents_and_directives() {
        assert_eq!(
            kinds("%YAML 1.1\n---\na\n...\n"),
            vec![
                "STREAM-START",
                "DIRECTIVE",
                "DOCUMENT-START",
                "SCALAR",
                "DOCUMENT-END",
                "STREAM-END",
            ]
        );
    }

    #[test]
    fn test_error_keeps_previous_tokens() {
        let scanned = tokenize("a: 1\nb: c: d\n");
        let err = scanned.error.expect("expected a scan error");
        assert_eq!(err.problem, "mapping values are not allowed here");
        assert_eq!(err.line(), 2);
        assert!(scanned.tokens.len() > 3);
    }

    #[test]
    fn test_unterminated_quote() {
        let scanned = tokenize("a: 'open\n");
        assert!(scanned.error.is_some());
    }

    #[test]
    fn test_multibyte_columns_count_chars() {
        let scanned = tokenize("é: ü\n");
        let value = scanned.tokens.iter().filter(|t| t.scalar_value().is_some()).nth(1).unwrap();
        assert_eq!(value.start.column, 3);
        assert_eq!(value.start.index, 4);
    }
}
