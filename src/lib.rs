// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! javastyle - Java source style review
//!
//! Lexes and parses one Java file, builds a scope model over the syntax tree,
//! then checks identifier naming, spacing, brace placement, comments, doc
//! comments and line layout. The result is a `Verdict` per file.

pub mod args;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod javadoc;
pub mod lexer;
pub mod naming;
pub mod parser;
pub mod scope;
pub mod source_file;
pub mod summary;
pub mod syntax;
pub mod token;
pub mod token_index;
pub mod verdict;

use anyhow::{Context, Result};
use std::path::Path;

// Re-export commonly used items
pub use args::{find_java_files, format_number, StandardArgs};
pub use config::{NamingStyle, StyleConfig};
pub use error::AnalysisError;
pub use parser::{parse_file, parse_source};
pub use source_file::SourceFile;
pub use verdict::{Finding, Verdict};

/// A parsed file and its verdict
#[derive(Debug, Clone)]
pub struct Analysis {
    pub source_file: SourceFile,
    pub verdict: Verdict,
}

impl Analysis {
    pub fn passed(&self) -> bool {
        self.verdict.passed()
    }

    pub fn findings(&self) -> Vec<Finding> {
        self.verdict.findings(&self.source_file)
    }
}

/// Analyze Java source text
pub fn analyze_source(source: &str, config: &StyleConfig) -> Result<Analysis, AnalysisError> {
    let source_file = SourceFile::parse(source)?;
    let verdict = source_file.analyze(config)?;
    Ok(Analysis { source_file, verdict })
}

/// Read and analyze a Java file
pub fn analyze_file(path: &Path, config: &StyleConfig) -> Result<Analysis> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    analyze_source(&source, config).with_context(|| format!("Failed to analyze {}", path.display()))
}
