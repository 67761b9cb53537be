// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Tests for doc comments checked against the declarations they document.

use javastyle::summary::Category;
use javastyle::{analyze_source, Finding, StyleConfig};

fn doc_findings(source: &str) -> Vec<Finding> {
    analyze_source(source, &StyleConfig::default())
        .unwrap()
        .findings()
        .into_iter()
        .filter(|f| f.category == Category::DocComment)
        .collect()
}

fn in_class(members: &str) -> String {
    format!("class Sample {{\n{members}}}\n")
}

#[test]
fn test_documented_method_passes() {
    let source = in_class(
        "    /**\n     * Copies an item.\n     *\n     * @param <T> element type\n     * @param item the item\n     * @return the copy\n     * @throws IllegalStateException never\n     */\n    <T> T copy(T item) throws IllegalStateException {\n        return item;\n    }\n",
    );
    let analysis = analyze_source(&source, &StyleConfig::default()).unwrap();
    assert!(analysis.passed(), "{:?}", analysis.findings());
    assert_eq!(analysis.verdict.doc_comment().doc_comments, 1);
}

#[test]
fn test_method_tags_on_a_field() {
    let found = doc_findings(&in_class("    /** @param value nope */\n    int count;\n"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "doc-subject");
    assert_eq!(found[0].line, 2);
    assert_eq!(found[0].column, 5);
}

#[test]
fn test_doc_with_no_declaration() {
    let found = doc_findings("/** Package notes. */\npackage demo;\n");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "doc-subject");
}

#[test]
fn test_return_on_void_method() {
    let found = doc_findings(&in_class(
        "    /**\n     * Runs.\n     *\n     * @return nothing\n     */\n    void work() { }\n",
    ));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "doc-tags");
    assert_eq!(found[0].message, "doc comment refers to unknown @return");
}

#[test]
fn test_unknown_parameter_reported_before_missing_ones() {
    let found = doc_findings(&in_class(
        "    /**\n     * Adds.\n     *\n     * @param other what to add\n     * @return the sum\n     */\n    int plus(int value) {\n        return value;\n    }\n",
    ));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "doc comment refers to unknown @param other");
}

#[test]
fn test_undocumented_parameters() {
    let found = doc_findings(&in_class(
        "    /**\n     * Moves.\n     *\n     * @param left how far\n     */\n    void move(int left, int right) { }\n",
    ));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "doc-params");
    assert_eq!(found[0].message, "parameters without @param: right");
}

#[test]
fn test_missing_return_description() {
    let found = doc_findings(&in_class(
        "    /**\n     * Counts.\n     *\n     * @return\n     */\n    int total() {\n        return 0;\n    }\n",
    ));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "doc-return");
}

#[test]
fn test_inherit_doc_skips_parameter_checks() {
    let found = doc_findings(&in_class(
        "    /** {@inheritDoc} */\n    public int size(int limit) {\n        return limit;\n    }\n",
    ));
    assert!(found.is_empty());
}

#[test]
fn test_local_references_must_exist() {
    let source = in_class(
        "    /**\n     * Like {@link #work()} and {@link String#length()}.\n     *\n     * @see #missing()\n     */\n    void work() { }\n",
    );
    let found = doc_findings(&source);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "doc comment refers to unknown #missing");

    let qualified = in_class("    /** See {@link Sample#nowhere}. */\n    void work() { }\n");
    assert_eq!(doc_findings(&qualified)[0].message, "doc comment refers to unknown #nowhere");
}

#[test]
fn test_record_components() {
    let documented = "/**\n * A point.\n *\n * @param xpos across\n * @param ypos down\n */\nrecord Point(int xpos, int ypos) { }\n";
    assert!(doc_findings(documented).is_empty());

    let partial = "/**\n * A point.\n *\n * @param xpos across\n */\nrecord Point(int xpos, int ypos) { }\n";
    let found = doc_findings(partial);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "parameters without @param: ypos");
}

#[test]
fn test_class_doc_with_return_is_misplaced() {
    let found = doc_findings("/**\n * Holder.\n *\n * @return what\n */\nclass Holder { }\n");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "doc-subject");
}

#[test]
fn test_throws_tag_needs_a_throws_clause() {
    let found = doc_findings(&in_class(
        "    /**\n     * Reads.\n     *\n     * @throws java.io.IOException on failure\n     */\n    void load() { }\n",
    ));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rule, "doc-tags");
    assert_eq!(found[0].message, "doc comment refers to unknown @throws java.io.IOException");
}

#[test]
fn test_throws_tag_matching_the_clause() {
    let source = in_class(
        "    /**\n     * Reads.\n     *\n     * @throws IOException on failure\n     * @exception IllegalArgumentException when empty\n     */\n    void load() throws java.io.IOException { }\n",
    );
    assert!(doc_findings(&source).is_empty());
}

#[test]
fn test_throws_tag_without_exception_name() {
    let found = doc_findings(&in_class("    /**\n     * Reads.\n     *\n     * @throws\n     */\n    void load() { }\n"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "doc comment refers to unknown @throws");
}
