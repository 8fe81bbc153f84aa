//! The `indentation` rule.
//!
//! The rule walks the token stream with a stack of [`Frame`]s, one per open
//! block or flow collection, sequence entry, mapping key and mapping value.
//! Each frame records the column at which its content is expected. Every token
//! that starts a line is compared against the indent of the frame on top of
//! the stack.
//!
//! The indentation width is either configured or detected from the first
//! nested construct (`spaces: consistent`). Whether block sequences nested in
//! a mapping are indented under their key is governed by
//! [`IndentSequences`].
//!
//! ```yaml
//! object:
//!   k1:
//!    - a    # wrong indentation: expected 4 but found 3
//! ```

use serde::Deserialize;
use tracing::{debug, warn};
use yamlstyle_scanner::{ScalarStyle, Token, TokenKind};

use super::{parse_options, DynTokenRule, RuleOptions, TokenRule, TokenWindow};
use crate::error::ConfigError;
use crate::problem::LintProblem;

pub const ID: &str = "indentation";

/// Width assumed for an unindented sequence under a key while the document
/// width is still unknown.
const BOOTSTRAP_WIDTH: i64 = 2;

/// Expected indentation width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawOption")]
pub enum Spaces {
    /// Detected from the first nested construct.
    #[default]
    Consistent,
    Fixed(u32),
}

/// Whether block sequences must be indented relative to their parent key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawOption")]
pub enum IndentSequences {
    /// Always indented.
    #[default]
    Always,
    /// Never indented.
    Never,
    /// Either is accepted.
    Whatever,
    /// Either is accepted, but the first sequence decides for the rest.
    Consistent,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl TryFrom<RawOption> for Spaces {
    type Error = String;

    fn try_from(raw: RawOption) -> Result<Self, Self::Error> {
        match raw {
            RawOption::Str(s) if s == "consistent" => Ok(Spaces::Consistent),
            RawOption::Int(n) if n > 0 && n <= i64::from(u32::MAX) => Ok(Spaces::Fixed(n as u32)),
            RawOption::Int(n) => Err(format!("spaces must be a positive integer, got {}", n)),
            _ => Err("spaces must be a positive integer or \"consistent\"".to_string()),
        }
    }
}

impl TryFrom<RawOption> for IndentSequences {
    type Error = String;

    fn try_from(raw: RawOption) -> Result<Self, Self::Error> {
        match raw {
            RawOption::Bool(true) => Ok(IndentSequences::Always),
            RawOption::Bool(false) => Ok(IndentSequences::Never),
            RawOption::Str(s) if s == "whatever" => Ok(IndentSequences::Whatever),
            RawOption::Str(s) if s == "consistent" => Ok(IndentSequences::Consistent),
            _ => Err(
                "indent-sequences must be true, false, \"whatever\" or \"consistent\"".to_string(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct IndentationConfig {
    pub spaces: Spaces,
    pub indent_sequences: IndentSequences,
    pub check_multi_line_strings: bool,
}

impl Default for IndentationConfig {
    fn default() -> Self {
        Self {
            spaces: Spaces::Consistent,
            indent_sequences: IndentSequences::Always,
            check_multi_line_strings: false,
        }
    }
}

/// A value that is either still to be decided or fixed for the rest of the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolved<T> {
    #[default]
    Pending,
    Fixed(T),
}

impl<T: Copy> Resolved<T> {
    pub fn get(&self) -> Option<T> {
        match *self {
            Resolved::Pending => None,
            Resolved::Fixed(value) => Some(value),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Resolved::Pending)
    }

    /// Returns the fixed value, fixing it to `f()` first if still pending.
    pub fn get_or_resolve(&mut self, f: impl FnOnce() -> T) -> T {
        match *self {
            Resolved::Fixed(value) => value,
            Resolved::Pending => {
                let value = f();
                *self = Resolved::Fixed(value);
                value
            }
        }
    }
}

/// One open construct on the indentation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Bottom of the stack, never popped.
    Root,
    BlockMap { indent: i64 },
    /// `line_indent` is the indent of the line holding the opening bracket;
    /// the closing bracket must sit there when it starts a line.
    FlowMap { indent: i64, line_indent: i64 },
    /// `implicit` marks a sequence with no BLOCK-SEQUENCE-START token, i.e.
    /// a sequence at the same column as its parent key.
    BlockSeq { indent: i64, implicit: bool },
    FlowSeq { indent: i64, line_indent: i64 },
    BlockEntry { indent: i64 },
    /// `explicit` marks a `? key`.
    Key { indent: i64, explicit: bool },
    Value { indent: i64 },
}

impl Frame {
    /// Column at which the content of this construct is expected.
    pub fn indent(&self) -> i64 {
        match *self {
            Frame::Root => 0,
            Frame::BlockMap { indent }
            | Frame::FlowMap { indent, .. }
            | Frame::BlockSeq { indent, .. }
            | Frame::FlowSeq { indent, .. }
            | Frame::BlockEntry { indent }
            | Frame::Key { indent, .. }
            | Frame::Value { indent } => indent,
        }
    }

    fn line_indent(&self) -> Option<i64> {
        match *self {
            Frame::FlowMap { line_indent, .. } | Frame::FlowSeq { line_indent, .. } => {
                Some(line_indent)
            }
            _ => None,
        }
    }

    fn is_implicit_block_seq(&self) -> bool {
        matches!(self, Frame::BlockSeq { implicit: true, .. })
    }

    fn is_explicit_key(&self) -> bool {
        matches!(self, Frame::Key { explicit: true, .. })
    }
}

/// The token stream did not have the shape the analysis relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UnexpectedToken;

type Step<T = ()> = Result<T, UnexpectedToken>;

fn ensure(condition: bool) -> Step {
    if condition {
        Ok(())
    } else {
        Err(UnexpectedToken)
    }
}

/// State of one pass of the rule over one input.
#[derive(Debug, Clone, Default)]
pub struct IndentationContext {
    stack: Vec<Frame>,
    spaces: Resolved<i64>,
    indent_sequences: IndentSequences,
    /// 1-based line on which the last visible token ended, -1 before any.
    current_line: i64,
    /// Indent of the first token of `current_line`.
    current_line_indent: i64,
}

impl IndentationContext {
    fn start(&mut self, config: &IndentationConfig) {
        self.stack = vec![Frame::Root];
        self.spaces = match config.spaces {
            Spaces::Consistent => Resolved::Pending,
            Spaces::Fixed(n) => Resolved::Fixed(i64::from(n)),
        };
        self.indent_sequences = config.indent_sequences;
        self.current_line = -1;
        self.current_line_indent = 0;
    }

    pub fn stack(&self) -> &[Frame] {
        &self.stack
    }

    /// The indentation width, once known.
    pub fn spaces(&self) -> Option<i64> {
        self.spaces.get()
    }

    /// The sequence policy in force; `Consistent` is replaced by the first
    /// observed choice.
    pub fn indent_sequences(&self) -> IndentSequences {
        self.indent_sequences
    }

    fn top(&self) -> Step<Frame> {
        self.stack.last().copied().ok_or(UnexpectedToken)
    }

    fn below_top(&self) -> Step<Frame> {
        self.stack
            .len()
            .checked_sub(2)
            .and_then(|i| self.stack.get(i))
            .copied()
            .ok_or(UnexpectedToken)
    }

    fn pop(&mut self) -> Step<Frame> {
        if self.stack.len() <= 1 {
            return Err(UnexpectedToken);
        }
        self.stack.pop().ok_or(UnexpectedToken)
    }

    /// Indent expected for content at `column` nested under `base`. The first
    /// call in a `consistent` pass fixes the width to `column - base`.
    fn detect_indent(&mut self, base: i64, column: i64) -> i64 {
        if self.spaces.is_pending() {
            debug!(width = column - base, "indentation width detected");
        }
        base + self.spaces.get_or_resolve(|| column - base)
    }
}

pub struct Indentation {
    config: IndentationConfig,
}

impl Indentation {
    pub fn new(config: IndentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndentationConfig {
        &self.config
    }
}

impl Default for Indentation {
    fn default() -> Self {
        Self::new(IndentationConfig::default())
    }
}

pub(crate) fn build(options: &RuleOptions) -> Result<Box<dyn DynTokenRule>, ConfigError> {
    let config: IndentationConfig = parse_options(ID, options)?;
    Ok(Box::new(Indentation::new(config)))
}

fn column(token: &Token) -> i64 {
    token.start.column as i64
}

fn wrong_indentation(line: usize, found: i64, expected: i64) -> LintProblem {
    LintProblem::new(
        line,
        found as usize + 1,
        format!("wrong indentation: expected {} but found {}", expected, found),
    )
}

/// Tokens that occupy a position on a line.
fn is_visible(token: &Token) -> bool {
    !matches!(token.kind, TokenKind::StreamStart | TokenKind::StreamEnd | TokenKind::BlockEnd)
        && token.scalar_value() != Some("")
}

fn is_anchor_or_tag(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Anchor(_) | TokenKind::Tag { .. })
}

fn is_explicit_key(source: &str, token: &Token) -> bool {
    token.start.index < token.end.index && source.as_bytes().get(token.start.index) == Some(&b'?')
}

/// 1-based line of the last non-blank character of a token. A scalar's end
/// mark can sit past trailing line breaks it consumed.
fn real_end_line(source: &str, token: &Token) -> i64 {
    let mut end_line = token.end.line as i64 + 1;
    if !matches!(token.kind, TokenKind::Scalar { .. }) {
        return end_line;
    }
    let bytes = source.as_bytes();
    let floor = token.start.index as i64 - 1;
    let mut pos = token.end.index as i64 - 1;
    while pos >= floor.max(0) {
        let byte = bytes[pos as usize];
        if !byte.is_ascii_whitespace() {
            break;
        }
        if byte == b'\n' {
            end_line -= 1;
        }
        pos -= 1;
    }
    end_line
}

impl TokenRule for Indentation {
    type Context = IndentationContext;

    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, window: &TokenWindow<'_>, cx: &mut IndentationContext) -> Vec<LintProblem> {
        let mut problems = Vec::new();
        if self.step(window, cx, &mut problems).is_err() {
            let token = window.token;
            warn!(
                kind = token.kind.name(),
                line = token.start.line + 1,
                column = token.start.column + 1,
                "cannot infer indentation"
            );
            problems.push(LintProblem::new(
                token.start.line + 1,
                token.start.column + 1,
                "cannot infer indentation: unexpected token",
            ));
        }
        problems
    }
}

impl Indentation {
    fn step(
        &self,
        window: &TokenWindow<'_>,
        cx: &mut IndentationContext,
        problems: &mut Vec<LintProblem>,
    ) -> Step {
        if cx.stack.is_empty() {
            cx.start(&self.config);
        }
        let token = window.token;
        let visible = is_visible(token);
        let first_in_line = visible && token.start.line as i64 + 1 > cx.current_line;

        let mut found = 0;
        if first_in_line {
            found = column(token);
            let top = cx.top()?;
            let expected = match token.kind {
                TokenKind::FlowMappingEnd | TokenKind::FlowSequenceEnd => {
                    top.line_indent().ok_or(UnexpectedToken)?
                }
                TokenKind::Value => top.indent(),
                _ if top.is_explicit_key() => cx.detect_indent(top.indent(), found),
                _ => top.indent(),
            };
            if found != expected {
                problems.push(wrong_indentation(token.start.line + 1, found, expected));
            }
        }

        if self.config.check_multi_line_strings && matches!(token.kind, TokenKind::Scalar { .. }) {
            self.check_scalar_indentation(window, cx, problems)?;
        }

        if visible {
            cx.current_line = real_end_line(window.source, token);
            if first_in_line {
                cx.current_line_indent = found;
            }
        }

        self.push_frames(window, cx)?;
        pop_frames(window, cx)
    }

    fn check_scalar_indentation(
        &self,
        window: &TokenWindow<'_>,
        cx: &mut IndentationContext,
        problems: &mut Vec<LintProblem>,
    ) -> Step {
        let token = window.token;
        if token.start.line == token.end.line {
            return Ok(());
        }
        let bytes = window.source.as_bytes();
        let limit = token.end.index.saturating_sub(1);
        let mut expected = None;
        let mut line_no = token.start.line + 1;
        let mut line_start = token.start.index;

        while let Some(pos) = bytes
            .get(line_start..limit)
            .and_then(|rest| rest.iter().position(|&b| b == b'\n'))
        {
            line_start += pos + 1;
            line_no += 1;

            let mut indent = 0;
            while bytes.get(line_start + indent) == Some(&b' ') {
                indent += 1;
            }
            if matches!(bytes.get(line_start + indent), None | Some(b'\n') | Some(b'\r')) {
                continue;
            }
            let indent = indent as i64;

            let expected_indent = match expected {
                Some(value) => value,
                None => {
                    let value = scalar_expected_indent(window, cx, indent)?;
                    expected = Some(value);
                    value
                }
            };
            if indent != expected_indent {
                problems.push(wrong_indentation(line_no, indent, expected_indent));
            }
        }
        Ok(())
    }

    fn push_frames(&self, window: &TokenWindow<'_>, cx: &mut IndentationContext) -> Step {
        let token = window.token;
        match token.kind {
            TokenKind::BlockMappingStart => {
                let next = window.next.ok_or(UnexpectedToken)?;
                ensure(next.kind == TokenKind::Key && next.start.line == token.start.line)?;
                cx.stack.push(Frame::BlockMap { indent: column(token) });
            }
            TokenKind::FlowMappingStart | TokenKind::FlowSequenceStart => {
                let next = window.next.ok_or(UnexpectedToken)?;
                let indent = if next.start.line == token.start.line {
                    column(next)
                } else {
                    cx.detect_indent(cx.current_line_indent, column(next))
                };
                let line_indent = cx.current_line_indent;
                cx.stack.push(if token.kind == TokenKind::FlowMappingStart {
                    Frame::FlowMap { indent, line_indent }
                } else {
                    Frame::FlowSeq { indent, line_indent }
                });
            }
            TokenKind::BlockSequenceStart => {
                let next = window.next.ok_or(UnexpectedToken)?;
                ensure(next.kind == TokenKind::BlockEntry && next.start.line == token.start.line)?;
                cx.stack.push(Frame::BlockSeq { indent: column(token), implicit: false });
            }
            TokenKind::BlockEntry
                if !matches!(
                    window.next.map(|t| &t.kind),
                    Some(TokenKind::BlockEntry | TokenKind::BlockEnd)
                ) =>
            {
                let next = window.next.ok_or(UnexpectedToken)?;
                if !matches!(cx.top()?, Frame::BlockSeq { .. }) {
                    cx.stack.push(Frame::BlockSeq { indent: column(token), implicit: true });
                }
                let indent = if next.start.line == token.end.line || column(next) == column(token) {
                    column(next)
                } else {
                    cx.detect_indent(column(token), column(next))
                };
                cx.stack.push(Frame::BlockEntry { indent });
            }
            TokenKind::Key => {
                let indent = cx.top()?.indent();
                let explicit = is_explicit_key(window.source, token);
                cx.stack.push(Frame::Key { indent, explicit });
            }
            TokenKind::Value => self.push_value(window, cx)?,
            _ => {}
        }
        Ok(())
    }

    fn push_value(&self, window: &TokenWindow<'_>, cx: &mut IndentationContext) -> Step {
        let Frame::Key { indent: key_indent, explicit } = cx.top()? else {
            return Err(UnexpectedToken);
        };
        let prev = window.prev.ok_or(UnexpectedToken)?;
        let mut next = window.next.ok_or(UnexpectedToken)?;

        // Properties alone on the key's line belong to the content below.
        if is_anchor_or_tag(next) {
            if let Some(next_next) = window.next_next {
                if next.start.line == prev.start.line && next.start.line < next_next.start.line {
                    next = next_next;
                }
            }
        }

        if matches!(
            next.kind,
            TokenKind::BlockEnd
                | TokenKind::FlowMappingEnd
                | TokenKind::FlowSequenceEnd
                | TokenKind::Key
        ) {
            return Ok(());
        }

        let indent = if explicit {
            cx.detect_indent(key_indent, column(next))
        } else if next.start.line == prev.start.line {
            column(next)
        } else if matches!(next.kind, TokenKind::BlockSequenceStart | TokenKind::BlockEntry) {
            self.sequence_indent(cx, key_indent, column(next))
        } else {
            cx.detect_indent(key_indent, column(next))
        };
        cx.stack.push(Frame::Value { indent });
        Ok(())
    }

    /// Indent expected for a block sequence starting at `column` under a key
    /// at `key_indent`.
    fn sequence_indent(&self, cx: &mut IndentationContext, key_indent: i64, column: i64) -> i64 {
        match cx.indent_sequences {
            IndentSequences::Never => key_indent,
            IndentSequences::Always => {
                if cx.spaces.is_pending() && column == key_indent {
                    key_indent + BOOTSTRAP_WIDTH
                } else {
                    cx.detect_indent(key_indent, column)
                }
            }
            policy @ (IndentSequences::Whatever | IndentSequences::Consistent) => {
                let indented = column != key_indent;
                if policy == IndentSequences::Consistent {
                    cx.indent_sequences =
                        if indented { IndentSequences::Always } else { IndentSequences::Never };
                    debug!(indented, "sequence indentation fixed");
                }
                if indented {
                    cx.detect_indent(key_indent, column)
                } else {
                    key_indent
                }
            }
        }
    }
}

fn scalar_expected_indent(
    window: &TokenWindow<'_>,
    cx: &mut IndentationContext,
    found: i64,
) -> Step<i64> {
    let token = window.token;
    let start = column(token);
    match token.scalar_style().ok_or(UnexpectedToken)? {
        ScalarStyle::Plain => Ok(start),
        ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => Ok(start + 1),
        ScalarStyle::Literal | ScalarStyle::Folded => match cx.top()? {
            Frame::BlockEntry { .. } => Ok(cx.detect_indent(start, found)),
            Frame::Key { explicit, .. } => {
                ensure(explicit)?;
                Ok(cx.detect_indent(start, found))
            }
            Frame::Value { indent } => {
                if token.start.line as i64 + 1 > cx.current_line {
                    Ok(cx.detect_indent(indent, found))
                } else {
                    let parent = cx.below_top()?;
                    if parent.is_explicit_key() {
                        Ok(cx.detect_indent(start, found))
                    } else {
                        Ok(cx.detect_indent(parent.indent(), found))
                    }
                }
            }
            other => Ok(cx.detect_indent(other.indent(), found)),
        },
    }
}

/// Closes every construct that ends with the current token.
fn pop_frames(window: &TokenWindow<'_>, cx: &mut IndentationContext) -> Step {
    let token = window.token;
    let next_kind = window.next.map(|t| &t.kind);
    let mut consumed = false;
    loop {
        match cx.top()? {
            Frame::FlowSeq { .. } if token.kind == TokenKind::FlowSequenceEnd && !consumed => {
                cx.pop()?;
                consumed = true;
            }
            Frame::FlowMap { .. } if token.kind == TokenKind::FlowMappingEnd && !consumed => {
                cx.pop()?;
                consumed = true;
            }
            Frame::BlockMap { .. } | Frame::BlockSeq { implicit: false, .. }
                if token.kind == TokenKind::BlockEnd && !consumed =>
            {
                cx.pop()?;
                consumed = true;
            }
            // An implicit sequence has no BLOCK-END; it closes with the
            // first token that is not part of its last entry.
            Frame::BlockEntry { .. }
                if token.kind != TokenKind::BlockEntry
                    && cx.below_top()?.is_implicit_block_seq()
                    && !is_anchor_or_tag(token)
                    && next_kind != Some(&TokenKind::BlockEntry) =>
            {
                cx.pop()?;
                cx.pop()?;
            }
            Frame::BlockEntry { .. }
                if matches!(next_kind, Some(TokenKind::BlockEntry | TokenKind::BlockEnd)) =>
            {
                cx.pop()?;
            }
            Frame::Value { .. }
                if !matches!(token.kind, TokenKind::Value) && !is_anchor_or_tag(token) =>
            {
                ensure(matches!(cx.below_top()?, Frame::Key { .. }))?;
                cx.pop()?;
                cx.pop()?;
            }
            Frame::Key { .. }
                if matches!(
                    next_kind,
                    Some(
                        TokenKind::BlockEnd
                            | TokenKind::FlowMappingEnd
                            | TokenKind::FlowSequenceEnd
                            | TokenKind::Key
                    )
                ) =>
            {
                cx.pop()?;
            }
            _ => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use yamlstyle_scanner::tokenize;

    /// Runs the rule over `source`, returning problems as `(line, column, desc)`
    /// and the final context.
    fn run(config: IndentationConfig, source: &str) -> (Vec<(usize, usize, String)>, IndentationContext) {
        let scanned = tokenize(source);
        assert!(scanned.error.is_none(), "scan error: {:?}", scanned.error);
        let rule = Indentation::new(config);
        let mut cx = IndentationContext::default();
        let mut problems = Vec::new();
        let tokens = &scanned.tokens;
        for (i, token) in tokens.iter().enumerate() {
            let window = TokenWindow {
                source,
                token,
                prev: i.checked_sub(1).map(|j| &tokens[j]),
                next: tokens.get(i + 1),
                next_next: tokens.get(i + 2),
            };
            problems.extend(
                rule.check(&window, &mut cx)
                    .into_iter()
                    .map(|p| (p.line, p.column, p.desc)),
            );
        }
        (problems, cx)
    }

    fn config(spaces: Spaces, indent_sequences: IndentSequences) -> IndentationConfig {
        IndentationConfig { spaces, indent_sequences, check_multi_line_strings: false }
    }

    fn wrong(line: usize, column: usize, expected: i64, found: i64) -> (usize, usize, String) {
        (line, column, format!("wrong indentation: expected {} but found {}", expected, found))
    }

    #[test]
    fn test_stack_returns_to_root() {
        let sources = [
            "a: 1\nb:\n  c: [1, 2]\n  d: {e: f}\n",
            "- a\n- - b\n  - c\n- d: e\n  f: g\n",
            "key:\n- x\n- y\nother: z\n",
            "? complex\n: value\n",
            "---\na: 1\n...\n---\n- b\n",
        ];
        for source in sources {
            let (problems, cx) = run(IndentationConfig::default(), source);
            assert_eq!(cx.stack(), &[Frame::Root], "stack after {:?}", source);
            assert!(
                problems.iter().all(|p| !p.2.starts_with("cannot infer")),
                "{:?}: {:?}",
                source,
                problems
            );
        }
    }

    #[test]
    fn test_consistent_width_detected_once() {
        let (problems, cx) =
            run(config(Spaces::Consistent, IndentSequences::Always), "a:\n   b: 1\nc:\n  d: 2\n");
        assert_eq!(cx.spaces(), Some(3));
        assert_eq!(problems, vec![wrong(4, 3, 3, 2)]);
    }

    #[test]
    fn test_fixed_width_never_changes() {
        let (problems, cx) = run(config(Spaces::Fixed(4), IndentSequences::Always), "a:\n  b: 1\n");
        assert_eq!(cx.spaces(), Some(4));
        assert_eq!(problems, vec![wrong(2, 3, 4, 2)]);
    }

    #[test]
    fn test_wrongly_indented_sequence_under_key() {
        let (problems, _) = run(
            config(Spaces::Fixed(2), IndentSequences::Consistent),
            "object:\n  k1:\n   - a\n",
        );
        assert_eq!(problems, vec![wrong(3, 4, 4, 3)]);
    }

    #[test]
    fn test_consistent_sequences_follow_first_choice() {
        let (problems, cx) = run(
            config(Spaces::Consistent, IndentSequences::Consistent),
            "list one:\n- 1\nlist two:\n    - a\n",
        );
        assert_eq!(cx.indent_sequences(), IndentSequences::Never);
        assert_eq!(problems, vec![wrong(4, 5, 0, 4)]);
    }

    #[test]
    fn test_whatever_accepts_both_styles() {
        let (problems, _) = run(
            config(Spaces::Consistent, IndentSequences::Whatever),
            "list one:\n- 1\nlist two:\n  - a\n",
        );
        assert_eq!(problems, vec![]);
    }

    #[test]
    fn test_never_rejects_indented_sequence() {
        let (problems, _) =
            run(config(Spaces::Fixed(2), IndentSequences::Never), "a:\n  - 1\n  - 2\n");
        // Later entries align with the sequence itself.
        assert_eq!(problems, vec![wrong(2, 3, 0, 2)]);
    }

    #[test]
    fn test_unindented_sequence_before_width_is_known() {
        // Reported against a width of 2, without fixing the width.
        let (problems, cx) = run(config(Spaces::Consistent, IndentSequences::Always), "a:\n- 1\n");
        assert_eq!(problems, vec![wrong(2, 1, 2, 0)]);
        assert_eq!(cx.spaces(), None);
    }

    #[test]
    fn test_empty_sequence_entry_under_key() {
        let (problems, cx) = run(config(Spaces::Fixed(2), IndentSequences::Always), "a:\n-\nb: c\n");
        assert_eq!(problems, vec![wrong(2, 1, 2, 0)]);
        assert_eq!(cx.stack(), &[Frame::Root]);
    }

    #[test]
    fn test_flow_closing_bracket_aligns_with_opening_line() {
        let source = "a: [\n    1,\n  ]\n";
        let (problems, _) = run(config(Spaces::Fixed(4), IndentSequences::Always), source);
        assert_eq!(problems, vec![wrong(3, 3, 0, 2)]);
    }

    #[test]
    fn test_multi_line_block_scalar_checked_on_request() {
        let source = ">\n  multi\n   line\n";
        let (problems, _) = run(IndentationConfig::default(), source);
        assert_eq!(problems, vec![]);

        let checked = IndentationConfig { check_multi_line_strings: true, ..Default::default() };
        let (problems, cx) = run(checked, source);
        assert_eq!(problems, vec![wrong(3, 4, 2, 3)]);
        assert_eq!(cx.spaces(), Some(2));
    }

    #[test]
    fn test_multi_line_plain_and_quoted_scalars() {
        let checked = IndentationConfig { check_multi_line_strings: true, ..Default::default() };
        let (problems, _) = run(checked, "a: plain\n   text\n");
        assert_eq!(problems, vec![]);

        let (problems, _) = run(checked, "a: \"quoted\n  text\"\n");
        assert_eq!(problems, vec![wrong(2, 3, 4, 2)]);
    }

    #[test]
    fn test_anchor_alone_on_key_line() {
        let (problems, cx) =
            run(config(Spaces::Fixed(2), IndentSequences::Always), "a: &x\n  b: 1\nc: *x\n");
        assert_eq!(problems, vec![]);
        assert_eq!(cx.stack(), &[Frame::Root]);
    }

    #[test]
    fn test_real_end_line_skips_trailing_breaks() {
        let source = "a: |\n  text\n\n\nb: 1\n";
        let scanned = tokenize(source);
        let literal = scanned
            .tokens
            .iter()
            .find(|t| t.scalar_style() == Some(ScalarStyle::Literal))
            .unwrap();
        assert_eq!(real_end_line(source, literal), 2);
    }

    #[test]
    fn test_options_deserialize() {
        let config: IndentationConfig = serde_json::from_str(
            r#"{"spaces": 4, "indent-sequences": "whatever", "check-multi-line-strings": true}"#,
        )
        .unwrap();
        assert_eq!(config.spaces, Spaces::Fixed(4));
        assert_eq!(config.indent_sequences, IndentSequences::Whatever);
        assert!(config.check_multi_line_strings);

        let config: IndentationConfig = serde_json::from_str(r#"{"indent-sequences": false}"#).unwrap();
        assert_eq!(config.spaces, Spaces::Consistent);
        assert_eq!(config.indent_sequences, IndentSequences::Never);
    }

    #[test]
    fn test_invalid_options_rejected() {
        assert!(serde_json::from_str::<IndentationConfig>(r#"{"spaces": 0}"#).is_err());
        assert!(serde_json::from_str::<IndentationConfig>(r#"{"spaces": "two"}"#).is_err());
        assert!(serde_json::from_str::<IndentationConfig>(r#"{"indent-sequences": 1}"#).is_err());
        assert!(serde_json::from_str::<IndentationConfig>(r#"{"tabs": 1}"#).is_err());
    }
}
