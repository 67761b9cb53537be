// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Doc comment parsing and matching against the documented declaration

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::scope::{Declaration, DeclarationKind, SyntaxModel};

static BLOCK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z]+)\s*(.*)$").expect("block tag pattern"));
static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{@(?:link|linkplain)\s+([^\s}]+)[^}]*\}").expect("inline link pattern")
});

/// One block tag such as `@param count the number of items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocTag {
    pub name: String,
    /// First word for tags that take one (`@param`, `@throws`, `@exception`, `@see`)
    pub argument: Option<String>,
    pub body: String,
}

impl DocTag {
    fn takes_argument(name: &str) -> bool {
        matches!(name, "param" | "throws" | "exception" | "see")
    }

    /// `@param <T>`
    pub fn is_type_param(&self) -> bool {
        self.name == "param"
            && self.argument.as_deref().is_some_and(|arg| arg.starts_with('<'))
    }

    /// Tags that only make sense on a method or constructor
    pub fn is_executable_only(&self) -> bool {
        match self.name.as_str() {
            "return" | "throws" | "exception" => true,
            "param" => !self.is_type_param(),
            _ => false,
        }
    }

    fn render(&self) -> String {
        match &self.argument {
            Some(argument) => format!("@{} {}", self.name, argument),
            None => format!("@{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocComment {
    pub description: String,
    pub tags: Vec<DocTag>,
    /// Targets of `{@link ...}` and `{@linkplain ...}`
    pub links: Vec<String>,
    pub inherit_doc: bool,
}

impl DocComment {
    /// Parse the raw text of a `/** ... */` comment
    pub fn parse(text: &str) -> DocComment {
        let inner = text.strip_prefix("/**").unwrap_or(text);
        let inner = inner.strip_suffix("*/").unwrap_or(inner);

        let mut doc = DocComment {
            inherit_doc: inner.contains("{@inheritDoc}"),
            links: INLINE_LINK
                .captures_iter(inner)
                .map(|caps| caps[1].to_string())
                .collect(),
            ..DocComment::default()
        };

        let mut description = Vec::new();
        for raw in inner.lines() {
            let line = raw.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line).trim();
            if let Some(caps) = BLOCK_TAG.captures(line) {
                let name = caps[1].to_string();
                let rest = caps[2].trim();
                let (argument, body) = if DocTag::takes_argument(&name) {
                    match rest.split_once(char::is_whitespace) {
                        Some((argument, body)) => (Some(argument.to_string()), body.trim().to_string()),
                        None if rest.is_empty() => (None, String::new()),
                        None => (Some(rest.to_string()), String::new()),
                    }
                } else {
                    (None, rest.to_string())
                };
                doc.tags.push(DocTag { name, argument, body });
            } else if let Some(tag) = doc.tags.last_mut() {
                if !line.is_empty() {
                    if !tag.body.is_empty() {
                        tag.body.push(' ');
                    }
                    tag.body.push_str(line);
                }
            } else if !line.is_empty() {
                description.push(line);
            }
        }
        doc.description = description.join(" ");
        doc
    }

    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocTag> + 'a {
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    /// `#member` references from `@see` and inline links
    fn references(&self) -> impl Iterator<Item = &str> {
        self.tags_named("see")
            .filter_map(|tag| tag.argument.as_deref())
            .chain(self.links.iter().map(String::as_str))
    }
}

/// How a doc comment lines up with the declaration after it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocCheck {
    pub subject_matched: bool,
    /// Tags naming something the declaration does not have
    pub unmatched_tags: Vec<String>,
    /// Parameters with no `@param`
    pub unmatched_syntax: Vec<String>,
    pub return_not_provided: bool,
}

impl DocCheck {
    pub fn is_bad(&self) -> bool {
        !self.subject_matched
            || !self.unmatched_tags.is_empty()
            || !self.unmatched_syntax.is_empty()
            || self.return_not_provided
    }
}

fn subject_matches(doc: &DocComment, declaration: &Declaration) -> bool {
    match declaration.kind {
        DeclarationKind::Constructor | DeclarationKind::Method => true,
        DeclarationKind::Field | DeclarationKind::EnumConstant => {
            !doc.tags.iter().any(DocTag::is_executable_only)
        }
        DeclarationKind::Record => !doc
            .tags
            .iter()
            .any(|tag| tag.is_executable_only() && tag.name != "param"),
        _ => !doc.tags.iter().any(DocTag::is_executable_only),
    }
}

/// Exceptions a method may throw without declaring them
const UNCHECKED: &[&str] = &[
    "RuntimeException",
    "IllegalArgumentException",
    "IllegalStateException",
    "NullPointerException",
    "IndexOutOfBoundsException",
    "ArrayIndexOutOfBoundsException",
    "StringIndexOutOfBoundsException",
    "UnsupportedOperationException",
    "ArithmeticException",
    "ClassCastException",
    "NumberFormatException",
    "ConcurrentModificationException",
    "NoSuchElementException",
    "SecurityException",
    "NegativeArraySizeException",
    "ArrayStoreException",
];

/// `java.io.IOException` -> `IOException`
fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// `@throws X` fits when `X` is unchecked or the throws clause names it.
/// Subclasses of a declared exception are not recognized.
fn throws_documented(argument: &str, declaration: &Declaration) -> bool {
    let name = simple_name(argument);
    name.ends_with("Error")
        || UNCHECKED.contains(&name)
        || declaration.throws.iter().any(|declared| {
            let declared = simple_name(declared);
            declared == name || declared == "Exception" || declared == "Throwable"
        })
}

/// `Outer#member(args)` -> (`Outer`, `member`)
fn split_reference(reference: &str) -> Option<(&str, &str)> {
    let (owner, member) = reference.split_once('#')?;
    let member = member.split('(').next().unwrap_or(member);
    Some((owner, member))
}

/// Match a parsed doc comment against the declaration that follows it
pub fn check(doc: &DocComment, declaration: Option<&Declaration>, model: &SyntaxModel) -> DocCheck {
    let Some(declaration) = declaration.filter(|d| subject_matches(doc, d)) else {
        return DocCheck::default();
    };
    let mut result = DocCheck { subject_matched: true, ..DocCheck::default() };

    for tag in doc.tags_named("param") {
        let Some(argument) = tag.argument.as_deref() else {
            result.unmatched_tags.push(tag.render());
            continue;
        };
        let known = match argument.strip_prefix('<').and_then(|a| a.strip_suffix('>')) {
            Some(type_param) => declaration.type_params.iter().any(|p| p == type_param),
            None => declaration
                .params
                .iter()
                .chain(&declaration.record_components)
                .any(|p| p == argument),
        };
        if !known {
            result.unmatched_tags.push(tag.render());
        }
    }

    let void_like = declaration.kind == DeclarationKind::Constructor || declaration.returns_void();
    if void_like {
        result
            .unmatched_tags
            .extend(doc.tags_named("return").map(DocTag::render));
    }

    if declaration.kind.is_executable() {
        for tag in doc.tags_named("throws").chain(doc.tags_named("exception")) {
            if !tag.argument.as_deref().is_some_and(|a| throws_documented(a, declaration)) {
                result.unmatched_tags.push(tag.render());
            }
        }
    }

    let members = model.member_names();
    let types: HashSet<&str> = model
        .declarations()
        .iter()
        .filter(|d| d.kind.is_type())
        .map(|d| d.name.as_str())
        .collect();
    for reference in doc.references() {
        if let Some((owner, member)) = split_reference(reference) {
            let local = owner.is_empty() || types.contains(owner);
            if local && !members.contains(member) {
                result.unmatched_tags.push(format!("#{member}"));
            }
        }
    }

    if !doc.inherit_doc {
        let documented: HashSet<&str> = doc
            .tags_named("param")
            .filter_map(|tag| tag.argument.as_deref())
            .collect();
        let params: &[String] = if declaration.kind == DeclarationKind::Record {
            &declaration.record_components
        } else {
            &declaration.params
        };
        result.unmatched_syntax = params
            .iter()
            .filter(|p| !documented.contains(p.as_str()))
            .cloned()
            .collect();

        if declaration.kind == DeclarationKind::Method && !declaration.returns_void() {
            result.return_not_provided = !doc.tags_named("return").any(|tag| !tag.body.is_empty());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_and_description() {
        let doc = DocComment::parse(
            "/**\n * Copies items.\n * See {@link #paste(int)}.\n *\n * @param count how many\n *        items\n * @param <T> element type\n * @return the copy\n * @throws IOException on failure\n */",
        );
        assert_eq!(doc.description, "Copies items. See {@link #paste(int)}.");
        assert_eq!(doc.tags.len(), 4);
        assert_eq!(doc.tags[0].argument.as_deref(), Some("count"));
        assert_eq!(doc.tags[0].body, "how many items");
        assert!(doc.tags[1].is_type_param());
        assert_eq!(doc.tags[2].name, "return");
        assert_eq!(doc.tags[2].body, "the copy");
        assert_eq!(doc.tags[3].argument.as_deref(), Some("IOException"));
        assert_eq!(doc.links, vec!["#paste(int)"]);
        assert!(!doc.inherit_doc);
    }

    #[test]
    fn test_single_line_doc() {
        let doc = DocComment::parse("/** {@inheritDoc} */");
        assert!(doc.inherit_doc);
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_empty_return_body() {
        let doc = DocComment::parse("/**\n * @return\n */");
        assert_eq!(doc.tags[0].name, "return");
        assert!(doc.tags[0].body.is_empty());
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("java.io.IOException"), "IOException");
        assert_eq!(simple_name("IOException"), "IOException");
    }

    #[test]
    fn test_split_reference() {
        assert_eq!(split_reference("#size()"), Some(("", "size")));
        assert_eq!(split_reference("List#add(Object)"), Some(("List", "add")));
        assert_eq!(split_reference("String"), None);
    }
}
