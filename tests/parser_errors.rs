//! Error codes surface at the offending token's exact position.

use rstest::rstest;
use statext::{parse, ErrorCode};

#[rstest]
#[case::empty("", ErrorCode::EmptyDocument, 1, 1)]
#[case::blank_only("\n\n", ErrorCode::EmptyDocument, 3, 1)]
#[case::container_eof("UL:", ErrorCode::EmptyContainer, 1, 4)]
#[case::container_newline_eof("UL:\n", ErrorCode::EmptyContainer, 2, 1)]
#[case::container_braces("UL:{}", ErrorCode::EmptyContainer, 1, 5)]
#[case::child_under_text("P: foo\n  P: bar", ErrorCode::InvalidChildUnderTextBlock, 2, 1)]
#[case::tab_indent("UL:\n\tLI: x", ErrorCode::TabsInIndentation, 2, 1)]
#[case::odd_indent("UL:\n   LI: x", ErrorCode::IndentationNotMultipleOfTwo, 2, 4)]
#[case::skipped_level("UL:\n    LI: x", ErrorCode::IndentationSkipsLevel, 2, 5)]
#[case::second_focus("P: a|b|", ErrorCode::MultipleFocus, 1, 7)]
#[case::second_anchor("P: ^a^b", ErrorCode::MultipleAnchor, 1, 6)]
#[case::unclosed_mark("P: [b:x", ErrorCode::UnbalancedBracket, 1, 8)]
#[case::stray_close_bracket("P: foo]", ErrorCode::UnbalancedBracket, 1, 7)]
#[case::unclosed_object("P: {img", ErrorCode::UnbalancedBrace, 1, 8)]
#[case::stray_close_brace("P: foo}", ErrorCode::UnbalancedBrace, 1, 7)]
#[case::mark_without_colon("P: [b]", ErrorCode::MissingColonInMark, 1, 6)]
#[case::mark_attr_without_equals("P: [b foo]", ErrorCode::MalformedAttribute, 1, 10)]
#[case::missing_space("P:foo", ErrorCode::MissingSpaceAfterColon, 1, 3)]
#[case::attr_without_value("P a=: x", ErrorCode::MalformedAttribute, 1, 5)]
#[case::attr_without_equals("P x: y", ErrorCode::MalformedAttribute, 1, 4)]
#[case::block_without_colon("P\n", ErrorCode::MalformedAttribute, 1, 2)]
#[case::unclosed_quote_eof("P t=\"x", ErrorCode::UnclosedQuote, 1, 7)]
#[case::unclosed_quote_newline("P t=\"a\nb\": x", ErrorCode::UnclosedQuote, 1, 7)]
#[case::bad_json("P d={\"a\": }: x", ErrorCode::InvalidJson, 1, 5)]
#[case::bad_escape("P: \\q", ErrorCode::InvalidEscapeSequence, 1, 4)]
#[case::digit_at_block_start("3P: x", ErrorCode::InvalidIdentifier, 1, 1)]
#[case::marker_before_named_block("^P: x", ErrorCode::InvalidIdentifier, 1, 2)]
#[case::reserved_boolean_name("true: x", ErrorCode::InvalidIdentifier, 1, 1)]
fn error_code_and_position(
    #[case] input: &str,
    #[case] code: ErrorCode,
    #[case] line: usize,
    #[case] column: usize,
) {
    let err = parse(input).expect_err("document should fail to parse");
    assert_eq!(err.code, code, "wrong code for {input:?}: {err}");
    assert_eq!(
        (err.line, err.column),
        (line, column),
        "wrong position for {input:?}: {err}"
    );
}

#[test]
fn errors_abort_at_the_first_offense() {
    // the second focus is reported before the tab on the next line is seen
    let err = parse("P: a|b|\n\tP: c").expect_err("should fail");
    assert_eq!(err.code, ErrorCode::MultipleFocus);
}

#[test]
fn json_error_carries_the_decoder_detail() {
    let err = parse("P d={\"a\": }: x").expect_err("should fail");
    assert_eq!(err.code, ErrorCode::InvalidJson);
    assert!(err.detail.is_some());
}

#[test]
fn a_document_without_markers_is_not_an_error() {
    assert!(parse("P: plain").unwrap().selection.is_none());
}
