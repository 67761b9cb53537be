// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! End-to-end analysis of small Java files.

use javastyle::summary::Category;
use javastyle::{analyze_source, AnalysisError, Finding, StyleConfig};

const CLEAN: &str = r#"package demo;

import java.util.List;

/**
 * Greets people.
 */
public class Greeter {
    private static final String GREETING = "Hello";

    private int greeted;

    /**
     * Greets everyone.
     *
     * @param people who to greet
     * @return the greetings
     */
    public String greetAll(List<String> people) {
        String result = "";
        for (String person : people) {
            result += GREETING + ", " + person + "\n";
            greeted++;
        }
        return result;
    }

    /**
     * How many people were greeted.
     *
     * @return the count
     */
    public int count() {
        return greeted;
    }
}
"#;

const DIRTY: &str = "class Bad {\n    int badly_named_field;\n    void run(int a,int b) {\n        int total=a;//note\n    }\n}\n";

fn findings(source: &str) -> Vec<Finding> {
    analyze_source(source, &StyleConfig::default()).unwrap().findings()
}

fn rules(source: &str) -> Vec<&'static str> {
    findings(source).iter().map(|f| f.rule).collect()
}

#[test]
fn test_clean_file_passes() {
    let analysis = analyze_source(CLEAN, &StyleConfig::default()).unwrap();
    assert_eq!(analysis.findings(), Vec::<Finding>::new());
    assert!(analysis.passed());
    assert_eq!(analysis.verdict.violation_count(), 0);
    assert_eq!(analysis.verdict.doc_comment().doc_comments, 3);
    assert_eq!(analysis.verdict.comment().comments, 0);
}

#[test]
fn test_dirty_file_fails() {
    let analysis = analyze_source(DIRTY, &StyleConfig::default()).unwrap();
    assert!(!analysis.passed());

    let found = analysis.findings();
    let flagged: Vec<(&str, &'static str)> = found
        .iter()
        .filter(|f| f.category == Category::Code)
        .map(|f| (analysis_text(&analysis, f), f.rule))
        .collect();
    assert!(flagged.contains(&("Bad", "too-short")));
    assert!(flagged.contains(&("badly_named_field", "too-long")));
    assert!(flagged.contains(&("badly_named_field", "naming")));
    assert!(flagged.contains(&("run", "too-short")));
    assert!(flagged.contains(&("a", "too-short")));
    assert!(flagged.contains(&("b", "too-short")));
    assert!(flagged.contains(&(",", "comma-spacing")));
    assert!(flagged.contains(&("=", "operator-spacing")));
    assert!(!flagged.iter().any(|(text, _)| *text == "total"));

    let comment = found.iter().find(|f| f.category == Category::Comment).unwrap();
    assert_eq!(comment.rule, "comment-spacing");
    assert_eq!(comment.line, 4);
    assert_eq!(comment.column, 21);
}

/// Text of the token a code finding points at
fn analysis_text<'a>(analysis: &'a javastyle::Analysis, finding: &Finding) -> &'a str {
    analysis
        .source_file
        .index()
        .line_tokens(finding.line)
        .iter()
        .find(|t| t.column + 1 == finding.column)
        .map(|t| t.text.as_str())
        .unwrap()
}

#[test]
fn test_findings_come_in_category_order() {
    let source = "class Sample {\n\tint count; //x\n\tint zz;\n} \n";
    let found = findings(source);
    let categories: Vec<Category> = found.iter().map(|f| f.category).collect();
    assert_eq!(categories, vec![Category::Code, Category::Comment, Category::Line]);
    assert_eq!(rules(source), vec!["too-short", "comment-spacing", "trailing-whitespace"]);
    let lines: Vec<usize> = found.iter().map(|f| f.line).collect();
    assert_eq!(lines, vec![3, 2, 4]);
}

#[test]
fn test_one_line_block_spacing() {
    let spaced = "class Sample {\n    void work() { int value = 0; }\n}\n";
    assert!(rules(spaced).is_empty());

    let cramped = "class Sample {\n    void work() {int value=0;}\n}\n";
    assert_eq!(
        rules(cramped),
        vec!["brace-spacing", "operator-spacing", "semicolon-spacing", "brace-spacing"]
    );
}

#[test]
fn test_empty_one_line_block_is_exempt() {
    assert!(rules("class Sample {\n    void work() {}\n}\n").is_empty());
}

#[test]
fn test_semicolon_spacing() {
    let source = "class Sample {\n    void work() {\n        int value = 0;value++;\n    }\n}\n";
    assert_eq!(rules(source), vec!["semicolon-spacing"]);
}

#[test]
fn test_constants_need_upper_underscore() {
    assert!(rules("class Sample {\n    private static final int A_CONSTANT = 0;\n}\n").is_empty());

    let found = findings("class Sample {\n    static int lowerName = 0;\n}\n");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "naming");
    assert_eq!(found[0].message, "field name 'lowerName' should be UPPER_UNDERSCORE, found camelCase");
}

#[test]
fn test_short_constant_is_only_too_short() {
    let found = findings("class Sample {\n    static final int A = 0;\n}\n");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "too-short");
    assert_eq!(found[0].message, "'A' is too short");
}

#[test]
fn test_enum_constants_are_constants() {
    assert!(rules("enum Color {\n    RED_ONE, BLUE\n}\n").is_empty());
    assert_eq!(rules("enum Color {\n    Crimson\n}\n"), vec!["naming"]);
}

#[test]
fn test_generic_brackets_need_no_spaces() {
    let source = "class Sample {\n    java.util.Map<String, Integer> counts;\n}\n";
    assert!(rules(source).is_empty());
}

#[test]
fn test_casts_and_explicit_type_arguments_need_no_spaces() {
    let source = "class Sample {\n    Object pick(Object item) {\n        java.util.List<String> names = (java.util.List<String>) item;\n        names = java.util.Collections.<String>emptyList();\n        names = this.<String>copy(names);\n        return (Comparable<String> & java.io.Serializable) null;\n    }\n}\n";
    assert!(rules(source).is_empty(), "{:?}", findings(source));
}

#[test]
fn test_parenthesized_operands_are_not_casts() {
    let source = "class Sample {\n    int pick(int left) {\n        return (left) - 1 | (left)&2;\n    }\n}\n";
    let found = findings(source);
    assert_eq!(found.len(), 1, "{found:?}");
    assert_eq!(found[0].message, "operator '&' needs a space on both sides");
}

#[test]
fn test_shift_operators_are_one_operator() {
    let spaced = "class Sample {\n    long mask(long bits) {\n        return bits >>> 2 | bits >> 1 | bits << 3 | 0xFFFF_FFFFL;\n    }\n}\n";
    assert!(rules(spaced).is_empty(), "{:?}", findings(spaced));

    let cramped = "class Sample {\n    int mask(int bits) {\n        return bits>>2;\n    }\n}\n";
    let found = findings(cramped);
    assert_eq!(found.len(), 1, "{found:?}");
    assert_eq!(found[0].rule, "operator-spacing");
    assert_eq!(found[0].column, 20);
    assert_eq!(found[0].message, "operator '>>' needs a space on both sides");
}

#[test]
fn test_nested_type_arguments_close_without_spaces() {
    let source = "class Sample {\n    java.util.Map<String, java.util.List<String>> index;\n}\n";
    assert!(rules(source).is_empty());
}

#[test]
fn test_ternary_and_comparison_need_spaces() {
    let source = "class Sample {\n    int pick(int left) {\n        return left>0 ? left : 0;\n    }\n}\n";
    assert_eq!(rules(source), vec!["operator-spacing"]);
}

#[test]
fn test_switch_labels_are_not_operators() {
    let source = "class Sample {\n    int pick(int left) {\n        switch (left) {\n            case 1: return 2;\n            default: return 0;\n        }\n    }\n}\n";
    assert!(rules(source).is_empty());
}

#[test]
fn test_line_too_long() {
    let long_name = format!("    String value = \"{}\";", "x".repeat(90));
    let source = format!("class Sample {{\n{long_name}\n}}\n");
    let found = findings(&source);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "line-length");
    assert_eq!(found[0].line, 2);
    assert_eq!(found[0].column, 0);
    assert_eq!(found[0].message, format!("line is {} columns wide", long_name.len()));

    let config = StyleConfig { max_line_length: 120, ..StyleConfig::default() };
    assert!(analyze_source(&source, &config).unwrap().passed());
}

#[test]
fn test_mixed_indentation() {
    let source = "class Sample {\n\t    int count;\n}\n";
    assert_eq!(rules(source), vec!["mixed-indentation"]);
}

#[test]
fn test_config_changes_bounds() {
    let config = StyleConfig { min_identifier_length: 1, ..StyleConfig::default() };
    let analysis = analyze_source("class Ab {\n    int x;\n}\n", &config).unwrap();
    assert!(analysis.passed());
}

#[test]
fn test_malformed_source_gives_no_verdict() {
    let config = StyleConfig::default();
    let unterminated = analyze_source("class Sample {\n    String s = \"open;\n}\n", &config);
    assert!(matches!(unterminated, Err(AnalysisError::Lex { line: 2, .. })));

    let unbalanced = analyze_source("class Sample {\n    void work() {\n}\n", &config);
    assert!(matches!(unbalanced, Err(AnalysisError::Syntax { .. })));
    assert!(unbalanced.unwrap_err().is_front_end());
}

#[test]
fn test_empty_file_passes() {
    let analysis = analyze_source("", &StyleConfig::default()).unwrap();
    assert!(analysis.passed());
    assert_eq!(analysis.verdict.line().lines, 1);
}
