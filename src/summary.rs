// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Category summaries
//!
//! Each summary counts the evaluated items of one category and keeps its
//! violations in the order they were included.

use serde::Serialize;

use crate::config::NamingStyle;
use crate::error::Primitive;
use crate::evaluator::{BracePlacement, CodeEval, LineOutcome, TokenEval, TokenOutcome};
use crate::naming::LengthCheck;
use crate::token::SemanticType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Code,
    Whitespace,
    Comment,
    DocComment,
    Line,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Code => "code",
            Category::Whitespace => "whitespace",
            Category::Comment => "comment",
            Category::DocComment => "doc-comment",
            Category::Line => "line",
        }
    }
}

/// Which rule a violation broke, with what the finding message needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Rule {
    TooShort,
    TooLong,
    Naming { role: SemanticType, expected: NamingStyle, detected: NamingStyle },
    OneLineBraceSpacing,
    InconsistentBrace { expected: BracePlacement, found: BracePlacement },
    CommaSpacing,
    SemicolonSpacing,
    OperatorSpacing,
    MixedIndentation,
    CommentSpacing,
    DocSubject,
    DocTags { tags: Vec<String> },
    DocUndocumented { params: Vec<String> },
    DocMissingReturn,
    LineTooLong { width: usize },
    TrailingWhitespace,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::TooShort => "too-short",
            Rule::TooLong => "too-long",
            Rule::Naming { .. } => "naming",
            Rule::OneLineBraceSpacing => "brace-spacing",
            Rule::InconsistentBrace { .. } => "brace-placement",
            Rule::CommaSpacing => "comma-spacing",
            Rule::SemicolonSpacing => "semicolon-spacing",
            Rule::OperatorSpacing => "operator-spacing",
            Rule::MixedIndentation => "mixed-indentation",
            Rule::CommentSpacing => "comment-spacing",
            Rule::DocSubject => "doc-subject",
            Rule::DocTags { .. } => "doc-tags",
            Rule::DocUndocumented { .. } => "doc-params",
            Rule::DocMissingReturn => "doc-return",
            Rule::LineTooLong { .. } => "line-length",
            Rule::TrailingWhitespace => "trailing-whitespace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub primitive: Primitive,
    pub rule: Rule,
}

/// Observes evaluated items of one category
pub trait Summary {
    type Item;

    fn include(&mut self, item: &Self::Item);

    fn category(&self) -> Category;

    fn violations(&self) -> &[Violation];
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CodeSummary {
    pub tokens: usize,
    pub identifiers: usize,
    pub too_short: usize,
    pub too_long: usize,
    pub bad_naming: usize,
    pub spacing: usize,
    pub starts_new_line: usize,
    pub stays_in_old_line: usize,
    pub undetermined: usize,
    /// First determined placement; later braces are compared with it
    pub brace_style: Option<BracePlacement>,
    pub inconsistent_braces: usize,
    violations: Vec<Violation>,
}

impl CodeSummary {
    fn push(&mut self, token: usize, rule: Rule) {
        self.violations.push(Violation { primitive: Primitive::Token(token), rule });
    }
}

impl Summary for CodeSummary {
    type Item = TokenOutcome;

    fn include(&mut self, outcome: &TokenOutcome) {
        let TokenEval::Code(eval) = &outcome.eval else {
            return;
        };
        self.tokens += 1;
        let token = outcome.token;
        match eval {
            CodeEval::Identifier(identifier) => {
                self.identifiers += 1;
                match identifier.length {
                    LengthCheck::TooShort => {
                        self.too_short += 1;
                        self.push(token, Rule::TooShort);
                    }
                    LengthCheck::TooLong => {
                        self.too_long += 1;
                        self.push(token, Rule::TooLong);
                    }
                    LengthCheck::WithinBounds => {}
                }
                if !identifier.naming_correct() {
                    self.bad_naming += 1;
                    self.push(
                        token,
                        Rule::Naming {
                            role: identifier.role,
                            expected: identifier.expected,
                            detected: identifier.detected,
                        },
                    );
                }
            }
            CodeEval::OpeningBrace { placement } => {
                match placement {
                    BracePlacement::StartsNewLine => self.starts_new_line += 1,
                    BracePlacement::StaysInOldLine => self.stays_in_old_line += 1,
                    BracePlacement::Undetermined => {
                        self.undetermined += 1;
                        return;
                    }
                }
                match self.brace_style {
                    None => self.brace_style = Some(*placement),
                    Some(expected) if expected != *placement => {
                        self.inconsistent_braces += 1;
                        self.push(token, Rule::InconsistentBrace { expected, found: *placement });
                    }
                    Some(_) => {}
                }
            }
            _ if outcome.meets_expectation => {}
            CodeEval::OneLineBrace { .. } => {
                self.spacing += 1;
                self.push(token, Rule::OneLineBraceSpacing);
            }
            CodeEval::Comma { .. } => {
                self.spacing += 1;
                self.push(token, Rule::CommaSpacing);
            }
            CodeEval::Semicolon { .. } => {
                self.spacing += 1;
                self.push(token, Rule::SemicolonSpacing);
            }
            CodeEval::LowPrecedenceOperator { .. } => {
                self.spacing += 1;
                self.push(token, Rule::OperatorSpacing);
            }
            CodeEval::Unchecked => {}
        }
    }

    fn category(&self) -> Category {
        Category::Code
    }

    fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WhitespaceSummary {
    pub tokens: usize,
    pub mixed_indentation: usize,
    violations: Vec<Violation>,
}

impl Summary for WhitespaceSummary {
    type Item = TokenOutcome;

    fn include(&mut self, outcome: &TokenOutcome) {
        let TokenEval::Whitespace { mixed_indentation } = outcome.eval else {
            return;
        };
        self.tokens += 1;
        if mixed_indentation {
            self.mixed_indentation += 1;
            self.violations.push(Violation {
                primitive: Primitive::Token(outcome.token),
                rule: Rule::MixedIndentation,
            });
        }
    }

    fn category(&self) -> Category {
        Category::Whitespace
    }

    fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentSummary {
    pub comments: usize,
    pub unspaced: usize,
    violations: Vec<Violation>,
}

impl Summary for CommentSummary {
    type Item = TokenOutcome;

    fn include(&mut self, outcome: &TokenOutcome) {
        let TokenEval::Comment { spaced } = outcome.eval else {
            return;
        };
        self.comments += 1;
        if !spaced {
            self.unspaced += 1;
            self.violations.push(Violation {
                primitive: Primitive::Token(outcome.token),
                rule: Rule::CommentSpacing,
            });
        }
    }

    fn category(&self) -> Category {
        Category::Comment
    }

    fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocCommentSummary {
    pub doc_comments: usize,
    violations: Vec<Violation>,
}

impl Summary for DocCommentSummary {
    type Item = TokenOutcome;

    fn include(&mut self, outcome: &TokenOutcome) {
        let TokenEval::DocComment(check) = &outcome.eval else {
            return;
        };
        self.doc_comments += 1;
        // One violation per doc comment, the first that applies
        let rule = if !check.subject_matched {
            Rule::DocSubject
        } else if !check.unmatched_tags.is_empty() {
            Rule::DocTags { tags: check.unmatched_tags.clone() }
        } else if !check.unmatched_syntax.is_empty() {
            Rule::DocUndocumented { params: check.unmatched_syntax.clone() }
        } else if check.return_not_provided {
            Rule::DocMissingReturn
        } else {
            return;
        };
        self.violations.push(Violation { primitive: Primitive::Token(outcome.token), rule });
    }

    fn category(&self) -> Category {
        Category::DocComment
    }

    fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LineSummary {
    pub lines: usize,
    pub too_long: usize,
    pub trailing_whitespace: usize,
    violations: Vec<Violation>,
}

impl Summary for LineSummary {
    type Item = LineOutcome;

    fn include(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        let primitive = Primitive::Line(outcome.line);
        if outcome.too_long {
            self.too_long += 1;
            self.violations.push(Violation { primitive, rule: Rule::LineTooLong { width: outcome.width } });
        }
        if outcome.trailing_whitespace {
            self.trailing_whitespace += 1;
            self.violations.push(Violation { primitive, rule: Rule::TrailingWhitespace });
        }
    }

    fn category(&self) -> Category {
        Category::Line
    }

    fn violations(&self) -> &[Violation] {
        &self.violations
    }
}
