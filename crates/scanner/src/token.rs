//! Token types produced by the YAML scanner.
//!
//! Every token carries a start and an end [`Mark`]. Marks are what the lint
//! rules work with: the line/column pair locates a problem, and the byte
//! `index` gives random access into the source buffer for rules that need to
//! look at the raw text around a token (trailing blank lines after a block
//! scalar, leading spaces of continuation lines, ...).

use chumsky::span::SimpleSpan;
use serde::Serialize;

/// Byte range of a token in the source, half-open.
pub type Span = SimpleSpan<usize>;

/// A position in the source.
///
/// `line` and `column` are 0-based, `column` counts characters (not bytes).
/// `index` is the byte offset of the position in the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Mark {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

/// Presentation style of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|` block scalar.
    Literal,
    /// `>` block scalar.
    Folded,
}

impl ScalarStyle {
    pub fn is_quoted(self) -> bool {
        matches!(self, ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted)
    }

    pub fn is_block(self) -> bool {
        matches!(self, ScalarStyle::Literal | ScalarStyle::Folded)
    }
}

/// The kind of a token, with the data that only some kinds carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    StreamStart,
    StreamEnd,
    /// `%YAML 1.1`, `%TAG ! tag:example.com,2000:` or a reserved directive.
    Directive {
        name: String,
        value: String,
    },
    /// `---`
    DocumentStart,
    /// `...`
    DocumentEnd,
    BlockSequenceStart,
    BlockMappingStart,
    BlockEnd,
    /// `[`
    FlowSequenceStart,
    /// `]`
    FlowSequenceEnd,
    /// `{`
    FlowMappingStart,
    /// `}`
    FlowMappingEnd,
    /// `-`
    BlockEntry,
    /// `,`
    FlowEntry,
    /// `?`, or a zero-length marker before an implicit key.
    Key,
    /// `:`
    Value,
    /// `*name`
    Alias(String),
    /// `&name`
    Anchor(String),
    /// `!handle!suffix`, `!suffix` or `!<verbatim>`.
    Tag {
        handle: String,
        suffix: String,
    },
    Scalar {
        value: String,
        style: ScalarStyle,
    },
}

impl TokenKind {
    /// Short upper-case name, as used by the debug tools.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::StreamStart => "STREAM-START",
            TokenKind::StreamEnd => "STREAM-END",
            TokenKind::Directive { .. } => "DIRECTIVE",
            TokenKind::DocumentStart => "DOCUMENT-START",
            TokenKind::DocumentEnd => "DOCUMENT-END",
            TokenKind::BlockSequenceStart => "BLOCK-SEQUENCE-START",
            TokenKind::BlockMappingStart => "BLOCK-MAPPING-START",
            TokenKind::BlockEnd => "BLOCK-END",
            TokenKind::FlowSequenceStart => "FLOW-SEQUENCE-START",
            TokenKind::FlowSequenceEnd => "FLOW-SEQUENCE-END",
            TokenKind::FlowMappingStart => "FLOW-MAPPING-START",
            TokenKind::FlowMappingEnd => "FLOW-MAPPING-END",
            TokenKind::BlockEntry => "BLOCK-ENTRY",
            TokenKind::FlowEntry => "FLOW-ENTRY",
            TokenKind::Key => "KEY",
            TokenKind::Value => "VALUE",
            TokenKind::Alias(_) => "ALIAS",
            TokenKind::Anchor(_) => "ANCHOR",
            TokenKind::Tag { .. } => "TAG",
            TokenKind::Scalar { .. } => "SCALAR",
        }
    }
}

/// A token with its source marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub start: Mark,
    pub end: Mark,
}

impl Token {
    pub fn new(kind: TokenKind, start: Mark, end: Mark) -> Self {
        Self { kind, start, end }
    }

    /// Byte span of the token.
    pub fn span(&self) -> Span {
        use chumsky::span::Span as _;
        Span::new((), self.start.index..self.end.index)
    }

    /// The decoded value of a scalar token.
    pub fn scalar_value(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn scalar_style(&self) -> Option<ScalarStyle> {
        match &self.kind {
            TokenKind::Scalar { style, .. } => Some(*style),
            _ => None,
        }
    }

    pub fn is_plain_scalar(&self) -> bool {
        self.scalar_style() == Some(ScalarStyle::Plain)
    }
}

/// A `#` comment skipped by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub start: Mark,
    pub end: Mark,
    /// Comment text, including the leading `#`.
    pub text: String,
    /// True when something other than blanks precedes the `#` on its line.
    pub inline: bool,
}

impl Comment {
    pub fn span(&self) -> Span {
        use chumsky::span::Span as _;
        Span::new((), self.start.index..self.end.index)
    }

    /// Comment body without the `#` and surrounding blanks.
    pub fn body(&self) -> &str {
        self.text.trim_start_matches('#').trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(index: usize, line: usize, column: usize) -> Mark {
        Mark { index, line, column }
    }

    #[test]
    fn test_token_span() {
        let token = Token::new(
            TokenKind::Scalar { value: "abc".into(), style: ScalarStyle::Plain },
            mark(4, 1, 2),
            mark(7, 1, 5),
        );
        let span = token.span();
        assert_eq!(span.start, 4);
        assert_eq!(span.end, 7);
        assert_eq!(token.scalar_value(), Some("abc"));
        assert!(token.is_plain_scalar());
    }

    #[test]
    fn test_non_scalar_has_no_value() {
        let token = Token::new(TokenKind::Key, mark(0, 0, 0), mark(0, 0, 0));
        assert_eq!(token.scalar_value(), None);
        assert_eq!(token.scalar_style(), None);
        assert_eq!(token.kind.name(), "KEY");
    }

    #[test]
    fn test_comment_body() {
        let comment = Comment {
            start: mark(0, 0, 0),
            end: mark(12, 0, 12),
            text: "#  a comment".into(),
            inline: false,
        };
        assert_eq!(comment.body(), "a comment");
    }
}
