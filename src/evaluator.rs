// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Format evaluator
//!
//! Applies the fixed rule set to every token and line of a file. Each token and
//! each line can be evaluated once; a second evaluation is an error.

use serde::Serialize;

use crate::config::{NamingStyle, StyleConfig};
use crate::error::{AnalysisError, Primitive};
use crate::javadoc::{self, DocCheck, DocComment};
use crate::lexer::JavaToken;
use crate::naming::{check_length, detect_style, expected_style, LengthCheck};
use crate::scope::SyntaxModel;
use crate::token::{SemanticType, Token, TokenKind};
use crate::token_index::TokenIndex;

/// Where the `{` of a multi-line scope sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BracePlacement {
    StartsNewLine,
    StaysInOldLine,
    /// Whitespace before the brace with more tokens before that
    Undetermined,
}

impl BracePlacement {
    pub fn describe(&self) -> &'static str {
        match self {
            BracePlacement::StartsNewLine => "on its own line",
            BracePlacement::StaysInOldLine => "at the end of the line",
            BracePlacement::Undetermined => "undetermined",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierEval {
    pub role: SemanticType,
    pub length: LengthCheck,
    pub detected: NamingStyle,
    pub expected: NamingStyle,
}

impl IdentifierEval {
    pub fn naming_correct(&self) -> bool {
        self.detected == self.expected
    }
}

/// Outcome of the rule for one code token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CodeEval {
    Identifier(IdentifierEval),
    /// `{` or `}` of a one-line scope
    OneLineBrace { spaced: bool },
    /// `{` of a multi-line scope
    OpeningBrace { placement: BracePlacement },
    Comma { spaced_after: bool },
    Semicolon { spaced_after: bool },
    LowPrecedenceOperator { spaced_before: bool, spaced_after: bool },
    /// No rule applies
    Unchecked,
}

impl CodeEval {
    fn meets_expectation(&self) -> bool {
        match self {
            // Length is reported on its own
            CodeEval::Identifier(eval) => eval.naming_correct(),
            CodeEval::OneLineBrace { spaced } => *spaced,
            CodeEval::Comma { spaced_after } | CodeEval::Semicolon { spaced_after } => *spaced_after,
            CodeEval::LowPrecedenceOperator { spaced_before, spaced_after } => {
                *spaced_before && *spaced_after
            }
            CodeEval::OpeningBrace { .. } | CodeEval::Unchecked => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenEval {
    Whitespace { mixed_indentation: bool },
    Code(CodeEval),
    Comment { spaced: bool },
    DocComment(DocCheck),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenOutcome {
    pub token: usize,
    pub eval: TokenEval,
    pub meets_expectation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineOutcome {
    pub line: usize,
    pub width: usize,
    pub too_long: bool,
    pub trailing_whitespace: bool,
    pub meets_expectation: bool,
}

/// Whitespace mixing tabs and spaces
fn is_mixed_indentation(text: &str) -> bool {
    text.contains('\t') && text.contains(' ')
}

/// Comment text after its marker is empty or starts with whitespace
fn is_comment_spaced(text: &str) -> bool {
    let body = if let Some(rest) = text.strip_prefix("//") {
        rest.trim_start_matches('/')
    } else if let Some(rest) = text.strip_prefix("/*") {
        rest.strip_suffix("*/").unwrap_or(rest).trim_start_matches('*')
    } else {
        text
    };
    body.chars().next().map_or(true, char::is_whitespace)
}

/// True when `neighbor` is whitespace or absent
fn spaced(neighbor: Option<&Token>) -> bool {
    neighbor.map_or(true, Token::is_whitespace)
}

pub struct FormatEvaluator<'a> {
    index: &'a TokenIndex,
    model: &'a SyntaxModel,
    config: &'a StyleConfig,
    tokens_done: Vec<bool>,
    lines_done: Vec<bool>,
}

impl<'a> FormatEvaluator<'a> {
    pub fn new(index: &'a TokenIndex, model: &'a SyntaxModel, config: &'a StyleConfig) -> Self {
        FormatEvaluator {
            index,
            model,
            config,
            tokens_done: vec![false; index.count()],
            lines_done: vec![false; index.lines().len()],
        }
    }

    fn mark(&mut self, primitive: Primitive) -> Result<(), AnalysisError> {
        let slot = match primitive {
            Primitive::Token(global) => self.tokens_done.get_mut(global).ok_or(
                AnalysisError::OutOfRange { index: global, count: self.index.count() },
            )?,
            Primitive::Line(number) => number
                .checked_sub(1)
                .and_then(|slot| self.lines_done.get_mut(slot))
                .ok_or_else(|| AnalysisError::Invariant(format!("no line {number}")))?,
        };
        if *slot {
            return Err(AnalysisError::AlreadyEvaluated(primitive));
        }
        *slot = true;
        Ok(())
    }

    pub fn evaluate_token(&mut self, global: usize) -> Result<TokenOutcome, AnalysisError> {
        self.mark(Primitive::Token(global))?;
        let token = self.index.at(global)?;
        let eval = match &token.kind {
            TokenKind::Whitespace => TokenEval::Whitespace {
                mixed_indentation: is_mixed_indentation(&token.text),
            },
            TokenKind::Comment => TokenEval::Comment { spaced: is_comment_spaced(&token.text) },
            TokenKind::DocComment => TokenEval::DocComment(self.evaluate_doc_comment(token)),
            TokenKind::Code(_) => TokenEval::Code(self.evaluate_code(token)?),
        };
        let meets_expectation = match &eval {
            TokenEval::Whitespace { mixed_indentation } => !mixed_indentation,
            TokenEval::Comment { spaced } => *spaced,
            TokenEval::DocComment(check) => !check.is_bad(),
            TokenEval::Code(code) => code.meets_expectation(),
        };
        Ok(TokenOutcome { token: global, eval, meets_expectation })
    }

    fn evaluate_doc_comment(&self, token: &Token) -> DocCheck {
        let doc = DocComment::parse(&token.text);
        let declaration = self
            .index
            .next_code_after(token.global_index)
            .and_then(|next| self.model.declaration_at(next.global_index));
        javadoc::check(&doc, declaration, self.model)
    }

    fn evaluate_code(&self, token: &Token) -> Result<CodeEval, AnalysisError> {
        let classification = self.model.classification(token.global_index)?;
        let semantic_type = classification.semantic_type;

        if semantic_type.is_identifier_role() {
            let expected = expected_style(classification, self.config).ok_or_else(|| {
                AnalysisError::Invariant(format!("no naming rule for {semantic_type:?}"))
            })?;
            return Ok(CodeEval::Identifier(IdentifierEval {
                role: semantic_type,
                length: check_length(&token.text, self.config),
                detected: detect_style(&token.text),
                expected,
            }));
        }

        let eval = match semantic_type {
            SemanticType::LBrace => self.evaluate_open_brace(token)?,
            SemanticType::RBrace => self.evaluate_close_brace(token)?,
            SemanticType::Comma => CodeEval::Comma { spaced_after: spaced(self.index.next(token)) },
            SemanticType::Semicolon => {
                let next = self.index.next(token);
                CodeEval::Semicolon {
                    spaced_after: spaced(next) || next.is_some_and(|n| n.line > token.line),
                }
            }
            SemanticType::LowPrecedenceOperator => self.evaluate_operator(token),
            _ => CodeEval::Unchecked,
        };
        Ok(eval)
    }

    /// `>>`, `>>>` and `<<` arrive as runs of touching `>` or `<` tokens. The
    /// first token of a run stands for the whole operator.
    fn evaluate_operator(&self, token: &Token) -> CodeEval {
        let prev = self.index.prev(token);
        if prev.is_some_and(|prev| self.continues_shift(prev, token)) {
            return CodeEval::Unchecked;
        }
        let mut last = token;
        while let Some(next) = self.index.next(last).filter(|next| self.continues_shift(last, next)) {
            last = next;
        }
        CodeEval::LowPrecedenceOperator {
            spaced_before: spaced(prev),
            spaced_after: spaced(self.index.next(last)),
        }
    }

    fn continues_shift(&self, left: &Token, right: &Token) -> bool {
        let operator = |token: &Token| {
            self.model
                .classification(token.global_index)
                .is_ok_and(|c| c.semantic_type == SemanticType::LowPrecedenceOperator)
        };
        right.global_index == left.global_index + 1
            && right.line == left.line
            && matches!(left.lexer_type(), Some(JavaToken::Gt | JavaToken::Lt))
            && left.lexer_type() == right.lexer_type()
            && operator(left)
            && operator(right)
    }

    fn evaluate_open_brace(&self, token: &Token) -> Result<CodeEval, AnalysisError> {
        let scope = self.model.context_of(token.global_index)?.scope;
        if scope.open != Some(token.global_index) {
            return Ok(CodeEval::Unchecked);
        }
        if scope.one_line {
            let spaced = scope.is_empty() || self.index.next(token).is_some_and(Token::is_whitespace);
            return Ok(CodeEval::OneLineBrace { spaced });
        }
        let placement = match self.index.prev(token) {
            None => BracePlacement::StartsNewLine,
            Some(prev) if !prev.is_whitespace() => BracePlacement::StaysInOldLine,
            Some(prev) => match self.index.prev(prev) {
                None => BracePlacement::StartsNewLine,
                Some(_) => BracePlacement::Undetermined,
            },
        };
        Ok(CodeEval::OpeningBrace { placement })
    }

    fn evaluate_close_brace(&self, token: &Token) -> Result<CodeEval, AnalysisError> {
        let scope = self.model.context_of(token.global_index)?.scope;
        if scope.close != Some(token.global_index) || !scope.one_line {
            return Ok(CodeEval::Unchecked);
        }
        let spaced = scope.is_empty() || self.index.prev(token).is_some_and(Token::is_whitespace);
        Ok(CodeEval::OneLineBrace { spaced })
    }

    pub fn evaluate_line(&mut self, number: usize) -> Result<LineOutcome, AnalysisError> {
        self.mark(Primitive::Line(number))?;
        let width = self.index.line_width(number);
        let too_long = width > self.config.max_line_length;
        let trailing_whitespace = self
            .index
            .line_tokens(number)
            .last()
            .is_some_and(Token::is_whitespace);
        Ok(LineOutcome {
            line: number,
            width,
            too_long,
            trailing_whitespace,
            meets_expectation: !too_long && !trailing_whitespace,
        })
    }
}
