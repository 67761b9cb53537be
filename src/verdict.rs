// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Verdict of one analysis run

use serde::Serialize;

use crate::error::Primitive;
use crate::evaluator::{LineOutcome, TokenOutcome};
use crate::source_file::SourceFile;
use crate::token::Token;
use crate::token_index::TokenIndex;
use crate::summary::{
    Category, CodeSummary, CommentSummary, DocCommentSummary, LineSummary, Rule, Summary,
    Violation, WhitespaceSummary,
};

/// Collects evaluated tokens and lines until `finalize`
#[derive(Debug, Clone, Default)]
pub struct VerdictBuilder {
    code: CodeSummary,
    whitespace: WhitespaceSummary,
    comment: CommentSummary,
    doc_comment: DocCommentSummary,
    line: LineSummary,
}

impl VerdictBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_token(&mut self, outcome: &TokenOutcome) {
        self.code.include(outcome);
        self.whitespace.include(outcome);
        self.comment.include(outcome);
        self.doc_comment.include(outcome);
    }

    pub fn include_line(&mut self, outcome: &LineOutcome) {
        self.line.include(outcome);
    }

    pub fn finalize(self) -> Verdict {
        let violation_count = self.code.violations().len()
            + self.whitespace.violations().len()
            + self.comment.violations().len()
            + self.doc_comment.violations().len()
            + self.line.violations().len();
        Verdict {
            code: self.code,
            whitespace: self.whitespace,
            comment: self.comment,
            doc_comment: self.doc_comment,
            line: self.line,
            violation_count,
        }
    }
}

/// Immutable per-file result
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    code: CodeSummary,
    whitespace: WhitespaceSummary,
    comment: CommentSummary,
    doc_comment: DocCommentSummary,
    line: LineSummary,
    violation_count: usize,
}

/// One rendered violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub line: usize,
    /// 1-based; 0 for whole-line findings
    pub column: usize,
    pub category: Category,
    pub rule: &'static str,
    pub message: String,
}

fn join(items: &[String]) -> String {
    items.join(", ")
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.violation_count == 0
    }

    pub fn violation_count(&self) -> usize {
        self.violation_count
    }

    pub fn code(&self) -> &CodeSummary {
        &self.code
    }

    pub fn whitespace(&self) -> &WhitespaceSummary {
        &self.whitespace
    }

    pub fn comment(&self) -> &CommentSummary {
        &self.comment
    }

    pub fn doc_comment(&self) -> &DocCommentSummary {
        &self.doc_comment
    }

    pub fn line(&self) -> &LineSummary {
        &self.line
    }

    /// Every violation, category by category, each in evaluation order
    pub fn violations(&self) -> impl Iterator<Item = (Category, &Violation)> + '_ {
        [
            (Category::Code, self.code.violations()),
            (Category::Whitespace, self.whitespace.violations()),
            (Category::Comment, self.comment.violations()),
            (Category::DocComment, self.doc_comment.violations()),
            (Category::Line, self.line.violations()),
        ]
        .into_iter()
        .flat_map(|(category, list)| list.iter().map(move |v| (category, v)))
    }

    /// Render violations against the file they came from
    pub fn findings(&self, file: &SourceFile) -> Vec<Finding> {
        self.violations()
            .map(|(category, violation)| render(file, category, violation))
            .collect()
    }
}

/// The whole of `>>`, `>>>` or `<<` when `token` starts a run of touching `>` or `<`
fn shift_text(index: &TokenIndex, token: &Token) -> String {
    let mut text = token.text.clone();
    let mut last = token;
    while let Some(next) = index.next(last).filter(|next| {
        matches!(next.text.as_str(), ">" | "<")
            && next.text == token.text
            && next.global_index == last.global_index + 1
            && next.line == last.line
    }) {
        text.push_str(&next.text);
        last = next;
    }
    text
}

fn render(file: &SourceFile, category: Category, violation: &Violation) -> Finding {
    let rule = violation.rule.name();
    let global = match violation.primitive {
        Primitive::Token(global) => global,
        Primitive::Line(line) => {
            let message = match &violation.rule {
                Rule::LineTooLong { width } => format!("line is {width} columns wide"),
                _ => "trailing whitespace".to_string(),
            };
            return Finding { line, column: 0, category, rule, message };
        }
    };

    let Ok(token) = file.index().at(global) else {
        return Finding { line: 0, column: 0, category, rule, message: format!("token #{global}") };
    };
    let text = &token.text;
    let message = match &violation.rule {
        Rule::TooShort => format!("'{text}' is too short"),
        Rule::TooLong => format!("'{text}' is too long"),
        Rule::Naming { role, expected, detected } => format!(
            "{} '{text}' should be {expected}, found {detected}",
            role.describe()
        ),
        Rule::OneLineBraceSpacing if text == "{" => "one-line block needs a space after '{'".to_string(),
        Rule::OneLineBraceSpacing => "one-line block needs a space before '}'".to_string(),
        Rule::InconsistentBrace { expected, found } => format!(
            "'{{' placed {}, earlier braces are {} (placement is read from the token before '{{')",
            found.describe(),
            expected.describe()
        ),
        Rule::CommaSpacing => "missing space after ','".to_string(),
        Rule::SemicolonSpacing => "missing space or line break after ';'".to_string(),
        Rule::OperatorSpacing => {
            format!("operator '{}' needs a space on both sides", shift_text(file.index(), token))
        }
        Rule::MixedIndentation => "whitespace mixes tabs and spaces".to_string(),
        Rule::CommentSpacing => "comment text should start with a space".to_string(),
        Rule::DocSubject => "doc comment does not fit the declaration after it".to_string(),
        Rule::DocTags { tags } => format!("doc comment refers to unknown {}", join(tags)),
        Rule::DocUndocumented { params } => format!("parameters without @param: {}", join(params)),
        Rule::DocMissingReturn => "missing @return description".to_string(),
        Rule::LineTooLong { width } => format!("line is {width} columns wide"),
        Rule::TrailingWhitespace => "trailing whitespace".to_string(),
    };
    Finding { line: token.line, column: token.column + 1, category, rule, message }
}
