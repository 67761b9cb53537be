// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! One loaded Java file and its analysis pipeline

use crate::config::StyleConfig;
use crate::error::AnalysisError;
use crate::evaluator::FormatEvaluator;
use crate::lexer::tokenize;
use crate::parser::parse_file;
use crate::scope::SyntaxModel;
use crate::token_index::TokenIndex;
use crate::verdict::{Verdict, VerdictBuilder};

/// Token index and scope model of a parsed file.
///
/// The syntax tree is dropped once the scope model is built, so a
/// `SourceFile` can move between threads.
#[derive(Debug, Clone)]
pub struct SourceFile {
    index: TokenIndex,
    model: SyntaxModel,
}

impl SourceFile {
    /// Lex, parse and walk the tree. Lex and syntax errors end the analysis.
    pub fn parse(source: &str) -> Result<SourceFile, AnalysisError> {
        let lexemes = tokenize(source)?;
        let index = TokenIndex::build(&lexemes);
        let tree = parse_file(&lexemes)?;
        let model = SyntaxModel::build(&index, &tree)?;
        Ok(SourceFile { index, model })
    }

    /// Evaluate every token, then every line, and finalize the verdict
    pub fn analyze(&self, config: &StyleConfig) -> Result<Verdict, AnalysisError> {
        let mut evaluator = FormatEvaluator::new(&self.index, &self.model, config);
        let mut builder = VerdictBuilder::new();
        for global in 0..self.index.count() {
            builder.include_token(&evaluator.evaluate_token(global)?);
        }
        for line in self.index.lines() {
            builder.include_line(&evaluator.evaluate_line(line.number)?);
        }
        Ok(builder.finalize())
    }

    pub fn index(&self) -> &TokenIndex {
        &self.index
    }

    pub fn model(&self) -> &SyntaxModel {
        &self.model
    }
}
