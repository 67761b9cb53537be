// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Token index
//!
//! Tokens grouped by line with random access by global index. `prev` and
//! `next` walk across line boundaries and skip lines that hold no tokens, so
//! callers never see an empty line.

use std::ops::Range;

use crate::error::AnalysisError;
use crate::lexer::{count_line_breaks, Lexeme};
use crate::token::{visual_length, Token, TokenKind};

/// One source line and the global indices of its tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based
    pub number: usize,
    pub tokens: Range<usize>,
}

impl Line {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    lines: Vec<Vec<Token>>,
    /// global index -> (line slot, index in line)
    table: Vec<(usize, usize)>,
    line_records: Vec<Line>,
    doc_comments: Vec<usize>,
    /// lexeme index -> global index; `None` for line terminators
    by_lexeme: Vec<Option<usize>>,
    /// Per line, the columns already taken by a multi-line token ending on it
    carried: Vec<usize>,
}

impl TokenIndex {
    /// Append every channel lexeme in file order
    pub fn build(lexemes: &[Lexeme]) -> TokenIndex {
        let mut index = TokenIndex::default();
        let mut current: Vec<Token> = Vec::new();
        let mut current_line = 1;
        let mut column = 0;
        let mut line_start = 0;
        // (line, column) where the last multi-line token ends
        let mut resume = None;

        for lexeme in lexemes {
            let Some(channel) = lexeme.channel().filter(|_| !lexeme.text.is_empty()) else {
                index.by_lexeme.push(None);
                continue;
            };
            // Lines with no tokens still get a slot
            while current_line < lexeme.line {
                index.lines.push(std::mem::take(&mut current));
                index.carried.push(line_start);
                current_line += 1;
                column = match resume {
                    Some((line, end)) if line == current_line => end,
                    _ => 0,
                };
                line_start = column;
            }
            let global = index.table.len();
            let Some(token) = Token::from_lexeme(lexeme, column, current.len(), global) else {
                index.by_lexeme.push(None);
                continue;
            };
            column = token.end_column();
            let breaks = count_line_breaks(&lexeme.text);
            if breaks > 0 {
                let last_line = lexeme.text.rsplit(['\n', '\r']).next().unwrap_or_default();
                resume = Some((lexeme.line + breaks, visual_length(last_line, channel, 0)));
            }
            if matches!(token.kind, TokenKind::DocComment) {
                index.doc_comments.push(global);
            }
            index.table.push((index.lines.len(), current.len()));
            index.by_lexeme.push(Some(global));
            current.push(token);
        }
        index.lines.push(current);
        index.carried.push(line_start);

        let mut start = 0;
        for (slot, tokens) in index.lines.iter().enumerate() {
            index.line_records.push(Line { number: slot + 1, tokens: start..start + tokens.len() });
            start += tokens.len();
        }
        index
    }

    pub fn count(&self) -> usize {
        self.table.len()
    }

    pub fn at(&self, global: usize) -> Result<&Token, AnalysisError> {
        let &(slot, offset) = self
            .table
            .get(global)
            .ok_or(AnalysisError::OutOfRange { index: global, count: self.count() })?;
        Ok(&self.lines[slot][offset])
    }

    pub fn at_position(&self, line: usize, index_in_line: usize) -> Option<&Token> {
        self.lines.get(line.checked_sub(1)?)?.get(index_in_line)
    }

    /// The token before `token`, looking back over empty lines
    pub fn prev(&self, token: &Token) -> Option<&Token> {
        let slot = token.line.checked_sub(1)?;
        if token.index_in_line > 0 {
            return self.lines.get(slot)?.get(token.index_in_line - 1);
        }
        self.lines.get(..slot)?.iter().rev().find_map(|line| line.last())
    }

    /// The token after `token`, looking ahead over empty lines
    pub fn next(&self, token: &Token) -> Option<&Token> {
        let slot = token.line.checked_sub(1)?;
        if let Some(next) = self.lines.get(slot)?.get(token.index_in_line + 1) {
            return Some(next);
        }
        self.lines.get(slot + 1..)?.iter().find_map(|line| line.first())
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.lines.iter().flatten()
    }

    pub fn lines(&self) -> &[Line] {
        &self.line_records
    }

    pub fn line(&self, number: usize) -> Option<&Line> {
        self.line_records.get(number.checked_sub(1)?)
    }

    pub fn line_tokens(&self, number: usize) -> &[Token] {
        number
            .checked_sub(1)
            .and_then(|slot| self.lines.get(slot))
            .map_or(&[], |tokens| tokens.as_slice())
    }

    /// Visual width of a line, counting the tail of a token that started
    /// on an earlier line
    pub fn line_width(&self, number: usize) -> usize {
        match self.line_tokens(number).last() {
            Some(last) => last.end_column(),
            None => number
                .checked_sub(1)
                .and_then(|slot| self.carried.get(slot))
                .copied()
                .unwrap_or(0),
        }
    }

    pub fn doc_comments(&self) -> &[usize] {
        &self.doc_comments
    }

    /// Global index of the token made from the `n`th lexeme
    pub fn token_for_lexeme(&self, n: usize) -> Option<usize> {
        self.by_lexeme.get(n).copied().flatten()
    }

    /// First code token after `global`, skipping other channels
    pub fn next_code_after(&self, global: usize) -> Option<&Token> {
        (global + 1..self.count())
            .filter_map(|i| self.at(i).ok())
            .find(|token| token.code().is_some())
    }
}
