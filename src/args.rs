// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Command-line arguments and Java file discovery

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::StyleConfig;

/// Arguments of the review tool
#[derive(Debug, Clone, Parser)]
#[command(name = "javastyle-review")]
#[command(about = "Review Java source files for naming, spacing, brace and doc comment style")]
pub struct StandardArgs {
    /// Files or directories to review
    pub paths: Vec<PathBuf>,

    /// Review a single file
    #[arg(short, long)]
    pub file: Vec<PathBuf>,

    /// Review every .java file under a directory
    #[arg(short, long)]
    pub dir: Vec<PathBuf>,

    /// Skip paths containing this text (repeatable)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// JSON style configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum identifier length
    #[arg(long)]
    pub min_length: Option<usize>,

    /// Maximum identifier length
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Maximum line width in columns
    #[arg(long)]
    pub max_line_length: Option<usize>,

    /// Print one JSON report per file instead of compile-mode lines
    #[arg(long)]
    pub json: bool,

    /// Only print findings and the summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl StandardArgs {
    /// Every path given, positional or flagged. The current directory when none.
    pub fn roots(&self) -> Result<Vec<PathBuf>> {
        let mut roots = Vec::new();
        for path in &self.file {
            if !path.is_file() {
                return Err(anyhow::anyhow!("Not a file: {}", path.display()));
            }
            roots.push(path.clone());
        }
        for path in &self.dir {
            if !path.is_dir() {
                return Err(anyhow::anyhow!("Not a directory: {}", path.display()));
            }
            roots.push(path.clone());
        }
        for path in &self.paths {
            if !path.exists() {
                return Err(anyhow::anyhow!("Path not found: {}", path.display()));
            }
            roots.push(path.clone());
        }
        if roots.is_empty() {
            roots.push(std::env::current_dir()?);
        }
        Ok(roots)
    }

    /// Directory the log goes under: the first root, or its parent if it is a file
    pub fn base_dir(&self) -> Result<PathBuf> {
        let roots = self.roots()?;
        let first = &roots[0];
        Ok(if first.is_file() {
            first.parent().unwrap_or(first).to_path_buf()
        } else {
            first.clone()
        })
    }

    /// Configuration file, then command-line overrides
    pub fn style_config(&self) -> Result<StyleConfig> {
        let mut config = match &self.config {
            Some(path) => StyleConfig::from_file(path)?,
            None => StyleConfig::default(),
        };
        if let Some(min) = self.min_length {
            config.min_identifier_length = min;
        }
        if let Some(max) = self.max_length {
            config.max_identifier_length = max;
        }
        if let Some(width) = self.max_line_length {
            config.max_line_length = width;
        }
        config.validate().context("Invalid style options")?;
        Ok(config)
    }
}

/// Format a number with comma separators: 1234 -> "1,234"
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

fn is_java(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}

/// Every `.java` file under the roots, sorted, skipping build and VCS directories
pub fn find_java_files(roots: &[PathBuf], exclude: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            if is_java(root) {
                files.push(root.clone());
            }
            continue;
        }
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            let path_str = path.to_string_lossy();
            let excluded = exclude.iter().any(|ex| path_str.contains(ex.as_str()))
                || path_str.contains("/target/")
                || path_str.contains("/build/")
                || path_str.contains("/.git/");
            if !excluded && path.is_file() && is_java(path) {
                files.push(path.to_path_buf());
            }
        }
    }
    // Deterministic output order
    files.sort();
    files.dedup();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1000000), "1,000,000");
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = StandardArgs::parse_from(["javastyle-review", "--min-length", "2", "--json"]);
        let config = args.style_config().unwrap();
        assert_eq!(config.min_identifier_length, 2);
        assert_eq!(config.max_identifier_length, 15);
        assert!(args.json);
    }

    #[test]
    fn test_inverted_flags_rejected() {
        let args = StandardArgs::parse_from(["javastyle-review", "--min-length", "20"]);
        assert!(args.style_config().is_err());
    }
}
