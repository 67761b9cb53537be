// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Tests for per-token and per-line format evaluation.

use javastyle::error::Primitive;
use javastyle::evaluator::{BracePlacement, CodeEval, FormatEvaluator, TokenEval};
use javastyle::naming::LengthCheck;
use javastyle::{AnalysisError, NamingStyle, SourceFile, StyleConfig};

fn parse(source: &str) -> SourceFile {
    SourceFile::parse(source).unwrap()
}

fn find(file: &SourceFile, text: &str) -> usize {
    file.index().tokens().find(|t| t.text == text).unwrap().global_index
}

#[test]
fn test_each_primitive_is_evaluated_once() {
    let file = parse("class Sample { }\n");
    let config = StyleConfig::default();
    let mut evaluator = FormatEvaluator::new(file.index(), file.model(), &config);

    evaluator.evaluate_token(0).unwrap();
    assert!(matches!(
        evaluator.evaluate_token(0),
        Err(AnalysisError::AlreadyEvaluated(Primitive::Token(0)))
    ));

    evaluator.evaluate_line(1).unwrap();
    assert!(matches!(
        evaluator.evaluate_line(1),
        Err(AnalysisError::AlreadyEvaluated(Primitive::Line(1)))
    ));
}

#[test]
fn test_out_of_range_token() {
    let file = parse("class Sample { }\n");
    let config = StyleConfig::default();
    let mut evaluator = FormatEvaluator::new(file.index(), file.model(), &config);
    let count = file.index().count();
    assert!(matches!(
        evaluator.evaluate_token(count),
        Err(AnalysisError::OutOfRange { .. })
    ));
    assert!(evaluator.evaluate_line(0).is_err());
}

#[test]
fn test_identifier_evaluation() {
    let file = parse("class Sample {\n    static final int A = 0;\n    int badly_named_field;\n}\n");
    let config = StyleConfig::default();
    let mut evaluator = FormatEvaluator::new(file.index(), file.model(), &config);

    let short = evaluator.evaluate_token(find(&file, "A")).unwrap();
    let TokenEval::Code(CodeEval::Identifier(eval)) = &short.eval else {
        panic!("expected an identifier, got {:?}", short.eval);
    };
    assert_eq!(eval.length, LengthCheck::TooShort);
    assert_eq!(eval.detected, NamingStyle::UpperUnderscore);
    assert_eq!(eval.expected, NamingStyle::UpperUnderscore);
    assert!(eval.naming_correct());
    // Length is its own violation; the outcome follows the naming style
    assert!(short.meets_expectation);

    let long = evaluator.evaluate_token(find(&file, "badly_named_field")).unwrap();
    let TokenEval::Code(CodeEval::Identifier(eval)) = &long.eval else {
        panic!("expected an identifier, got {:?}", long.eval);
    };
    assert_eq!(eval.length, LengthCheck::TooLong);
    assert_eq!(eval.detected, NamingStyle::Other);
    assert_eq!(eval.expected, NamingStyle::Camel);
    assert!(!eval.naming_correct());
    assert!(!long.meets_expectation);
}

#[test]
fn test_one_line_brace_spacing() {
    let spaced = parse("class Sample { int value; }\n");
    let cramped = parse("class Sample {int value;}\n");
    let config = StyleConfig::default();

    for (file, expected) in [(&spaced, true), (&cramped, false)] {
        let mut evaluator = FormatEvaluator::new(file.index(), file.model(), &config);
        let open = evaluator.evaluate_token(find(file, "{")).unwrap();
        assert_eq!(open.eval, TokenEval::Code(CodeEval::OneLineBrace { spaced: expected }));
        let close = evaluator.evaluate_token(find(file, "}")).unwrap();
        assert_eq!(close.meets_expectation, expected);
    }
}

#[test]
fn test_brace_placement() {
    let config = StyleConfig::default();
    let cases = [
        ("class Sample{\n}\n", BracePlacement::StaysInOldLine),
        ("class Sample\n{\n}\n", BracePlacement::StaysInOldLine),
        ("class Sample {\n}\n", BracePlacement::Undetermined),
    ];
    for (source, expected) in cases {
        let file = parse(source);
        let mut evaluator = FormatEvaluator::new(file.index(), file.model(), &config);
        let open = evaluator.evaluate_token(find(&file, "{")).unwrap();
        assert_eq!(
            open.eval,
            TokenEval::Code(CodeEval::OpeningBrace { placement: expected }),
            "{source:?}"
        );
        // Placement alone never fails a brace
        assert!(open.meets_expectation);
    }
}

#[test]
fn test_operator_spacing() {
    let file = parse("class Sample {\n    int value = 1+2;\n}\n");
    let config = StyleConfig::default();
    let mut evaluator = FormatEvaluator::new(file.index(), file.model(), &config);

    let assign = evaluator.evaluate_token(find(&file, "=")).unwrap();
    assert_eq!(
        assign.eval,
        TokenEval::Code(CodeEval::LowPrecedenceOperator { spaced_before: true, spaced_after: true })
    );
    // `+` is not a low-precedence operator
    let plus = evaluator.evaluate_token(find(&file, "+")).unwrap();
    assert_eq!(plus.eval, TokenEval::Code(CodeEval::Unchecked));
    assert!(plus.meets_expectation);
}

#[test]
fn test_line_evaluation() {
    let file = parse("class Sample {  \n    int value;\n}\n");
    let config = StyleConfig { max_line_length: 10, ..StyleConfig::default() };
    let mut evaluator = FormatEvaluator::new(file.index(), file.model(), &config);

    let first = evaluator.evaluate_line(1).unwrap();
    assert!(first.trailing_whitespace);
    assert_eq!(first.width, 16);
    assert!(first.too_long);
    assert!(!first.meets_expectation);

    let last = evaluator.evaluate_line(3).unwrap();
    assert_eq!(last.width, 1);
    assert!(last.meets_expectation);
}

#[test]
fn test_doc_comment_evaluation() {
    let file = parse(
        "class Sample {\n    /**\n     * Adds.\n     * @param other what to add\n     */\n    int plus(int value) { return value; }\n}\n",
    );
    let config = StyleConfig::default();
    let mut evaluator = FormatEvaluator::new(file.index(), file.model(), &config);
    let doc = file.index().doc_comments()[0];
    let outcome = evaluator.evaluate_token(doc).unwrap();
    let TokenEval::DocComment(check) = &outcome.eval else {
        panic!("expected a doc comment, got {:?}", outcome.eval);
    };
    assert!(check.subject_matched);
    assert_eq!(check.unmatched_tags, vec!["@param other"]);
    assert_eq!(check.unmatched_syntax, vec!["value"]);
    assert!(check.return_not_provided);
    assert!(!outcome.meets_expectation);
}

#[test]
fn test_shift_run_is_checked_at_its_first_token() {
    let file = parse("class Sample {\n    int value = 64 >>> 2;\n}\n");
    let config = StyleConfig::default();
    let mut evaluator = FormatEvaluator::new(file.index(), file.model(), &config);

    let first = find(&file, ">");
    let outcome = evaluator.evaluate_token(first).unwrap();
    assert_eq!(
        outcome.eval,
        TokenEval::Code(CodeEval::LowPrecedenceOperator { spaced_before: true, spaced_after: true })
    );
    for rest in [first + 1, first + 2] {
        let outcome = evaluator.evaluate_token(rest).unwrap();
        assert_eq!(outcome.eval, TokenEval::Code(CodeEval::Unchecked));
        assert!(outcome.meets_expectation);
    }
}
