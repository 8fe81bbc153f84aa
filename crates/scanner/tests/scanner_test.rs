//! Token streams for the YAML constructs the indentation analysis cares about.

use pretty_assertions::assert_eq;
use yamlstyle_scanner::{tokenize, ScalarStyle, TokenKind};

fn kinds(source: &str) -> Vec<&'static str> {
    let scanned = tokenize(source);
    if let Some(err) = &scanned.error {
        panic!("scan error in {:?}: {}", source, err);
    }
    scanned.tokens.iter().map(|t| t.kind.name()).collect()
}

#[test]
fn test_nested_sequence_in_sequence() {
    assert_eq!(
        kinds("- - a\n  - b\n"),
        vec![
            "STREAM-START",
            "BLOCK-SEQUENCE-START",
            "BLOCK-ENTRY",
            "BLOCK-SEQUENCE-START",
            "BLOCK-ENTRY",
            "SCALAR",
            "BLOCK-ENTRY",
            "SCALAR",
            "BLOCK-END",
            "BLOCK-END",
            "STREAM-END",
        ]
    );
}

#[test]
fn test_mapping_in_sequence_entry() {
    assert_eq!(
        kinds("- a: 1\n  b: 2\n"),
        vec![
            "STREAM-START",
            "BLOCK-SEQUENCE-START",
            "BLOCK-ENTRY",
            "BLOCK-MAPPING-START",
            "KEY",
            "SCALAR",
            "VALUE",
            "SCALAR",
            "KEY",
            "SCALAR",
            "VALUE",
            "SCALAR",
            "BLOCK-END",
            "BLOCK-END",
            "STREAM-END",
        ]
    );
}

#[test]
fn test_empty_entry_is_followed_by_block_entry() {
    assert_eq!(
        kinds("a:\n-\nb: c\n"),
        vec![
            "STREAM-START",
            "BLOCK-MAPPING-START",
            "KEY",
            "SCALAR",
            "VALUE",
            "BLOCK-ENTRY",
            "KEY",
            "SCALAR",
            "VALUE",
            "SCALAR",
            "BLOCK-END",
            "STREAM-END",
        ]
    );
}

#[test]
fn test_multi_line_flow_mapping_marks() {
    let scanned = tokenize("a: {\n  x: 1\n}\n");
    assert!(scanned.error.is_none());
    let open = scanned
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::FlowMappingStart)
        .unwrap();
    let close = scanned
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::FlowMappingEnd)
        .unwrap();
    assert_eq!((open.start.line, open.start.column), (0, 3));
    assert_eq!((close.start.line, close.start.column), (2, 0));
}

#[test]
fn test_scalar_styles() {
    let scanned = tokenize("- plain\n- 'single'\n- \"double\"\n- |\n  lit\n- >\n  fold\n");
    let styles: Vec<ScalarStyle> = scanned.tokens.iter().filter_map(|t| t.scalar_style()).collect();
    assert_eq!(
        styles,
        vec![
            ScalarStyle::Plain,
            ScalarStyle::SingleQuoted,
            ScalarStyle::DoubleQuoted,
            ScalarStyle::Literal,
            ScalarStyle::Folded,
        ]
    );
}

#[test]
fn test_block_scalar_keep_and_indent_indicator() {
    let scanned = tokenize("a: |2+\n   x\n\nb: 1\n");
    assert!(scanned.error.is_none());
    let value = scanned.tokens.iter().filter_map(|t| t.scalar_value()).nth(1).unwrap();
    assert_eq!(value, " x\n\n");
}

#[test]
fn test_block_scalar_header_comment() {
    let scanned = tokenize("a: >  # folded\n  text\n");
    assert!(scanned.error.is_none());
    assert_eq!(scanned.comments.len(), 1);
    assert_eq!(scanned.comments[0].text, "# folded");
    assert!(scanned.comments[0].inline);
}

#[test]
fn test_multiple_documents() {
    assert_eq!(
        kinds("---\na: 1\n---\n- b\n"),
        vec![
            "STREAM-START",
            "DOCUMENT-START",
            "BLOCK-MAPPING-START",
            "KEY",
            "SCALAR",
            "VALUE",
            "SCALAR",
            "BLOCK-END",
            "DOCUMENT-START",
            "BLOCK-SEQUENCE-START",
            "BLOCK-ENTRY",
            "SCALAR",
            "BLOCK-END",
            "STREAM-END",
        ]
    );
}

#[test]
fn test_empty_scalar_not_emitted_for_empty_value() {
    // Like the reference scanners, an empty value produces no SCALAR token.
    assert_eq!(
        kinds("a:\nb: 1\n"),
        vec![
            "STREAM-START",
            "BLOCK-MAPPING-START",
            "KEY",
            "SCALAR",
            "VALUE",
            "KEY",
            "SCALAR",
            "VALUE",
            "SCALAR",
            "BLOCK-END",
            "STREAM-END",
        ]
    );
}

#[test]
fn test_tab_indentation_is_an_error() {
    let scanned = tokenize("a:\n\tb: 1\n");
    let err = scanned.error.expect("tabs cannot indent block content");
    assert_eq!(err.line(), 2);
}
