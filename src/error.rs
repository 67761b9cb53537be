// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Errors raised while analyzing one source file
//!
//! Front-end failures (`Lex`, `Syntax`) and broken internal invariants abort the
//! analysis of the whole file. Style rule outcomes are never errors.

use serde::Serialize;
use thiserror::Error;

/// Which evaluable primitive an invariant refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Primitive {
    Token(usize),
    Line(usize),
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::Token(index) => write!(f, "token #{index}"),
            Primitive::Line(number) => write!(f, "line {number}"),
        }
    }
}

/// Terminal failure for a single file
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The lexer could not tokenize the input
    #[error("lexical error at line {line}: {message}")]
    Lex { line: usize, message: String },

    /// The parser rejected the token stream
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Random access outside `[0, count)`
    #[error("token index {index} out of range (file has {count} tokens)")]
    OutOfRange { index: usize, count: usize },

    /// A primitive was evaluated twice
    #[error("{0} has already been evaluated")]
    AlreadyEvaluated(Primitive),

    /// Rule tables and front end disagree
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl AnalysisError {
    /// True for failures reported by the front end (bad input, not a bug)
    pub fn is_front_end(&self) -> bool {
        matches!(self, AnalysisError::Lex { .. } | AnalysisError::Syntax { .. })
    }
}
