//! Round-trip and canonical-form properties of the serializer.
//!
//! For every document that parses, re-parsing the serialization yields a
//! structurally identical tree and selection, in both output forms; and
//! serialization depends only on the parsed tree, so it is a fixpoint
//! after one pass.

use pretty_assertions::assert_eq;
use rstest::rstest;
use statext::{parse, serialize, SerializeOptions};

fn canonical(input: &str) -> String {
    serialize(&parse(input).expect("input should parse"), SerializeOptions::default())
}

/// parse -> serialize -> parse must reproduce the state exactly.
fn assert_round_trip(input: &str) {
    let state = parse(input).expect("input should parse");
    for single_line in [false, true] {
        let options = SerializeOptions { single_line };
        let rendered = serialize(&state, options);
        let reparsed = parse(&rendered)
            .unwrap_or_else(|e| panic!("serialized form should re-parse: {e}\n{rendered}"));
        assert_eq!(reparsed, state, "round-trip mismatch via {rendered:?}");
    }
}

#[rstest]
#[case("P: foo")]
#[case("P: ")]
#[case("P:   two  spaces")]
#[case("P: foo|")]
#[case("P: ^foo|")]
#[case("P: |foo^")]
#[case("P: fo^o")]
#[case("P level=2 title=\"Intro\" draft=true align=center: body")]
#[case("P d={\"b\": [1, {\"c\": null}], \"a\": 2}: x")]
#[case("{IMG src=\"pic\" width=640}")]
#[case("^{IMG}|")]
#[case("SECTION:\n  H: Title\n  UL:\n    LI: a\n    LI: [b:bo^ld] tail|")]
#[case("UL:{LI: a;;LI: b}")]
#[case("FIG:\n  {IMG}\n  P: caption")]
#[case("CODE!:\n  const arr = [1, 2, 3]|")]
#[case("CODE! lang=rust:\n  fn main() {\n      println!(\"hi\");\n  }")]
#[case("CODE!:\n  x\n\n  y")]
#[case("CODE!:\n  a\\|b\\^c")]
#[case("P: [@link href=\"https://example.com\":foo]|")]
#[case("P: [~comment id=1:y] [b:bold [i:both]]")]
#[case("P: a {img src=\"pic\"} b")]
#[case("P: {img}^x")]
#[case("P: a\\[b\\]\\{c\\}\\|d\\^\\;e\\\\f")]
#[case("P: say \"hi\"")]
#[case("P: a=b @c ~d e:f wow!")]
#[case("P: \u{1F600}|x")]
#[case("P: a;;P: b;;UL:{LI: c}")]
#[case("P: tab\\there\\nand newline")]
fn round_trips(#[case] input: &str) {
    assert_round_trip(input);
}

#[test]
fn canonical_form_is_a_fixpoint() {
    let noisy = "P: a\n\n\nUL:\n  LI: b\n\n  LI: c";
    let once = canonical(noisy);
    let twice = canonical(&once);
    assert_eq!(once, twice);
}

#[test]
fn semicolons_round_trip_escaped() {
    assert_eq!(canonical("P: foo\\;\\;bar|"), "P: foo\\;\\;bar|");
}

#[test]
fn attributes_are_emitted_in_sorted_key_order() {
    assert_eq!(canonical("P z=1 a=2 m=3: x"), "P a=2 m=3 z=1: x");
}

#[test]
fn json_attributes_are_emitted_compact_and_sorted() {
    assert_eq!(
        canonical("P d={\"b\": 1, \"a\": [1, 2]}: x"),
        "P d={\"a\":[1,2],\"b\":1}: x"
    );
}

#[test]
fn blank_lines_normalize_away() {
    assert_eq!(canonical("P: a\n\n\nP: b"), "P: a\nP: b");
}

#[test]
fn collapsed_selection_normalizes_to_a_bare_focus() {
    // an adjacent anchor+focus pair parses collapsed and is written as `|`
    assert_eq!(canonical("P: {img}^|x"), "P: {img}|x");
}

#[test]
fn single_line_form_joins_with_block_sep() {
    let state = parse("P: a\nUL:\n  LI: b").unwrap();
    assert_eq!(
        serialize(&state, SerializeOptions { single_line: true }),
        "P: a;;UL:{LI: b}"
    );
}

#[test]
fn raw_blocks_force_multiline_even_when_single_line_is_requested() {
    let state = parse("P: a\nCODE!:\n  x").unwrap();
    assert_eq!(
        serialize(&state, SerializeOptions { single_line: true }),
        "P: a\nCODE!:\n  x"
    );
}

#[test]
fn canonical_document_snapshot() {
    let input = "\
SECTION title=\"Intro\":\n\
\n\
  P: see [@link href=\"https://example.com\":the docs] for more\n\
  CODE! lang=js:\n\
    const x = [1, 2]\n\
  UL:\n\
    LI: one\n\
    LI: tw^o|\n";
    insta::assert_snapshot!(canonical(input), @r###"
    SECTION title="Intro":
      P: see [@link href="https://example.com":the docs] for more
      CODE! lang=js:
        const x = [1, 2]
      UL:
        LI: one
        LI: tw^o|
    "###);
}

#[test]
fn single_line_document_snapshot() {
    let state = parse("SECTION:\n  P: a\n  UL:\n    LI: b|").unwrap();
    insta::assert_snapshot!(
        serialize(&state, SerializeOptions { single_line: true }),
        @"SECTION:{P: a;;UL:{LI: b|}}"
    );
}
