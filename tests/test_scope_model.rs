// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Tests for scopes, identifier roles and declarations.

use javastyle::scope::{DeclarationKind, ScopeKind, FILE_SCOPE};
use javastyle::token::{AccessModifiers, OtherModifiers, SemanticType};
use javastyle::SourceFile;

fn parse(source: &str) -> SourceFile {
    SourceFile::parse(source).unwrap()
}

/// Global index of the `nth` token spelled `text`
fn find(file: &SourceFile, text: &str, nth: usize) -> usize {
    file.index()
        .tokens()
        .filter(|t| t.text == text)
        .nth(nth)
        .unwrap()
        .global_index
}

fn role(file: &SourceFile, text: &str) -> SemanticType {
    let global = find(file, text, 0);
    file.model().classification(global).unwrap().semantic_type
}

#[test]
fn test_nested_scopes() {
    let file = parse(
        "class Outer {\n    void work() {\n        if (true) { int value = 1; }\n        {\n            int inner = 2;\n        }\n    }\n}\n",
    );
    let model = file.model();
    assert_eq!(model.scopes().len(), 5);
    assert_eq!(model.scope(FILE_SCOPE).unwrap().kind, ScopeKind::File);

    let value = model.scope_of(find(&file, "value", 0)).unwrap();
    assert_eq!(value.kind, ScopeKind::Block);
    assert_eq!(value.depth, 3);
    assert!(value.one_line);

    let inner = model.scope_of(find(&file, "inner", 0)).unwrap();
    assert_eq!(inner.depth, 3);
    assert!(!inner.one_line);
    assert_eq!(inner.parent, value.parent);

    let method = model.scope(inner.parent.unwrap()).unwrap();
    assert_eq!(method.depth, 2);
    let body = model.scope(method.parent.unwrap()).unwrap();
    assert_eq!(body.kind, ScopeKind::TypeBody);
    assert_eq!(body.parent, Some(FILE_SCOPE));
}

#[test]
fn test_scope_braces_and_emptiness() {
    let file = parse("class Outer {\n    void work() {}\n}\n");
    let model = file.model();
    let open = find(&file, "{", 1);
    let scope = model.scope_of(open).unwrap();
    assert_eq!(scope.open, Some(open));
    assert_eq!(scope.close, Some(find(&file, "}", 0)));
    assert!(scope.is_empty());
    assert!(!model.scope_of(find(&file, "{", 0)).unwrap().is_empty());
}

#[test]
fn test_context_of_line() {
    let file = parse("class Outer {\n    int count;\n\n}\n");
    let model = file.model();
    assert_eq!(model.context_of_line(1).unwrap().scope.id, FILE_SCOPE);
    let body = model.context_of_line(2).unwrap().scope;
    assert_eq!(body.kind, ScopeKind::TypeBody);
    assert_eq!(model.context_of_line(3).unwrap().scope.id, body.id);
    assert_eq!(model.context_of_line(4).unwrap().scope.id, body.id);
    assert!(model.context_of_line(0).is_none());
    assert!(model.context_of_line(99).is_none());

    let count = find(&file, "count", 0);
    assert_eq!(model.context_of(count).unwrap().scope.id, body.id);
}

#[test]
fn test_context_inside_method_body() {
    let file = parse(
        "class Outer {\n    int work() {\n        int total = 0;\n        return total;\n    }\n}\n",
    );
    let model = file.model();
    let total = find(&file, "total", 0);
    let body = model.context_of(total).unwrap().scope;
    assert_eq!(body.kind, ScopeKind::Block);
    assert_eq!(body.open, Some(find(&file, "{", 1)));
    assert_eq!(body.depth, model.context_of_line(2).unwrap().scope.depth + 1);
    assert_eq!(model.context_of_line(3).unwrap().scope.id, body.id);
    assert_eq!(model.context_of_line(4).unwrap().scope.id, body.id);
    assert_eq!(model.context_of(find(&file, "return", 0)).unwrap().scope.id, body.id);
}

#[test]
fn test_switch_and_array_scopes() {
    let file = parse(
        "class Outer {\n    int[] values = { 1, 2 };\n    void work(int code) {\n        switch (code) {\n            default: break;\n        }\n    }\n}\n",
    );
    let model = file.model();
    let array = model.scope_of(find(&file, "1", 0)).unwrap();
    assert_eq!(array.kind, ScopeKind::ArrayInitializer);
    let switch = model.scope_of(find(&file, "default", 0)).unwrap();
    assert_eq!(switch.kind, ScopeKind::SwitchBlock);
}

#[test]
fn test_identifier_roles() {
    let file = parse(
        "class Outer {\n\
         \x20   private int total;\n\
         \x20   Outer(int start) { total = start; }\n\
         \x20   void work(java.util.List<String> items) {\n\
         \x20       for (int index = 0; index < 2; index++) { }\n\
         \x20       for (String item : items) { }\n\
         \x20       int local = 0;\n\
         \x20       try { } catch (Exception error) { }\n\
         \x20       items.forEach(each -> { });\n\
         \x20   }\n\
         }\n",
    );
    assert_eq!(role(&file, "Outer"), SemanticType::ClassName);
    assert_eq!(role(&file, "total"), SemanticType::FieldName);
    let constructor = find(&file, "Outer", 1);
    assert_eq!(
        file.model().classification(constructor).unwrap().semantic_type,
        SemanticType::ConstructorName
    );
    assert_eq!(role(&file, "start"), SemanticType::ParameterName);
    assert_eq!(role(&file, "work"), SemanticType::MethodName);
    assert_eq!(role(&file, "items"), SemanticType::ParameterName);
    assert_eq!(role(&file, "index"), SemanticType::ForVariableName);
    assert_eq!(role(&file, "item"), SemanticType::ForVariableName);
    assert_eq!(role(&file, "local"), SemanticType::VariableName);
    assert_eq!(role(&file, "error"), SemanticType::ParameterName);
    assert_eq!(role(&file, "each"), SemanticType::ParameterName);
    // Uses keep the lexer's classification
    let use_of_total = find(&file, "total", 1);
    assert_eq!(
        file.model().classification(use_of_total).unwrap().semantic_type,
        SemanticType::IdentifierUnclassified
    );
    assert_eq!(role(&file, "String"), SemanticType::IdentifierUnclassified);
}

#[test]
fn test_modifiers_and_annotations_reach_the_name() {
    let file = parse(
        "class Outer {\n    @Deprecated\n    public static final int MAX_SIZE = 1;\n    void work() {\n        final int limit = 2;\n    }\n}\n",
    );
    let model = file.model();
    let max = model.classification(find(&file, "MAX_SIZE", 0)).unwrap();
    assert_eq!(max.semantic_type, SemanticType::FieldName);
    assert!(max.access.contains(AccessModifiers::PUBLIC));
    assert!(max.other.contains(OtherModifiers::STATIC | OtherModifiers::FINAL));
    assert_eq!(max.annotations, vec!["Deprecated".to_string()]);

    let limit = model.classification(find(&file, "limit", 0)).unwrap();
    assert_eq!(limit.semantic_type, SemanticType::VariableName);
    assert!(limit.other.contains(OtherModifiers::FINAL));
    assert!(!limit.other.contains(OtherModifiers::STATIC));

    let work = model.classification(find(&file, "work", 0)).unwrap();
    assert!(work.access.is_empty());
    assert!(work.annotations.is_empty());
}

#[test]
fn test_package_annotation_is_ignored() {
    let file = parse("@Deprecated\npackage demo;\n\nclass Outer { }\n");
    assert_eq!(role(&file, "Outer"), SemanticType::ClassName);
    assert!(file.model().classification(find(&file, "Outer", 0)).unwrap().annotations.is_empty());
}

#[test]
fn test_label_colons_are_not_operators() {
    let file = parse(
        "class Outer {\n    void work() {\n        outer:\n        for (;;) { break outer; }\n    }\n}\n",
    );
    assert_eq!(role(&file, ":"), SemanticType::Other);
}

#[test]
fn test_declarations_in_file_order() {
    let file = parse(
        "/** Doc. */\n\
         public class Outer {\n\
         \x20   int first, second;\n\
         \x20   /** Doc. */\n\
         \x20   Outer() { }\n\
         \x20   record Pair(int left, int right) { }\n\
         \x20   enum Mode { FAST, SLOW }\n\
         }\n",
    );
    let model = file.model();
    let summary: Vec<(DeclarationKind, &str)> = model
        .declarations()
        .iter()
        .map(|d| (d.kind, d.name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (DeclarationKind::Class, "Outer"),
            (DeclarationKind::Field, "first"),
            (DeclarationKind::Field, "second"),
            (DeclarationKind::Constructor, "Outer"),
            (DeclarationKind::Record, "Pair"),
            (DeclarationKind::Enum, "Mode"),
            (DeclarationKind::EnumConstant, "FAST"),
            (DeclarationKind::EnumConstant, "SLOW"),
        ]
    );

    let pair = &model.declarations()[4];
    assert_eq!(pair.record_components, vec!["left", "right"]);

    // The class starts at `public`, not at the doc comment
    let class = model.declaration_at(find(&file, "public", 0)).unwrap();
    assert_eq!(class.kind, DeclarationKind::Class);

    let members = model.member_names();
    assert!(members.contains("first"));
    assert!(members.contains("FAST"));
    assert!(!members.contains("Pair"));
}
