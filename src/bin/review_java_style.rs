// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Review Java source files for style compliance
//!
//! Checks identifier naming and length, spacing around commas, semicolons,
//! operators and one-line braces, brace placement consistency, comment spacing,
//! doc comments against the declarations they document, and line layout.
//!
//! Output is in emacs compile mode format: file:line: message
//!
//! Usage:
//!   javastyle-review <path>...             # Files or directories
//!   javastyle-review -d src -e generated   # Skip paths containing "generated"
//!   javastyle-review --json Foo.java       # One JSON report per file
//!
//! Binary: javastyle-review
//!
//! Logs to: analyses/javastyle-review.log

use anyhow::Result;
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use javastyle::{analyze_file, find_java_files, format_number, Analysis, Finding, StandardArgs, Verdict};

thread_local! {
    static LOG_FILE_PATH: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

fn init_logging(base_dir: &Path) -> PathBuf {
    let analyses_dir = base_dir.join("analyses");
    let _ = std::fs::create_dir_all(&analyses_dir);
    let log_path = analyses_dir.join("javastyle-review.log");
    let _ = std::fs::write(&log_path, "");
    LOG_FILE_PATH.with(|p| {
        *p.borrow_mut() = Some(log_path.clone());
    });
    log_path
}

fn append_to_log(msg: &str) {
    use std::io::Write;
    LOG_FILE_PATH.with(|p| {
        if let Some(ref log_path) = *p.borrow() {
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
            {
                let _ = writeln!(file, "{}", msg);
            }
        }
    });
}

macro_rules! log {
    () => {{
        println!();
        append_to_log("");
    }};
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        println!("{}", msg);
        append_to_log(&msg);
    }};
}

/// Emacs compile-mode compatible output
macro_rules! emit {
    ($file:expr, $line:expr, $($arg:tt)*) => {{
        let msg = format!("{}:{}: {}", $file, $line, format!($($arg)*));
        println!("{}", msg);
        append_to_log(&msg);
    }};
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    passed: bool,
    findings: &'a [Finding],
    verdict: &'a Verdict,
}

fn report_findings(file_str: &str, analysis: &Analysis, json: bool) -> Result<()> {
    let mut findings = analysis.findings();
    // Category order within a line, line order across the file
    findings.sort_by_key(|f| (f.line, f.column));

    if json {
        let report = FileReport {
            file: file_str.to_string(),
            passed: analysis.passed(),
            findings: &findings,
            verdict: &analysis.verdict,
        };
        log!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    for finding in &findings {
        emit!(
            file_str,
            finding.line.max(1),
            "warning: [{}/{}] {}",
            finding.category.name(),
            finding.rule,
            finding.message
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = StandardArgs::parse();
    let config = args.style_config()?;
    let roots = args.roots()?;

    let log_path = init_logging(&args.base_dir()?);

    if !args.quiet && !args.json {
        log!("Java Style Review");
        log!("=================");
        log!();
        log!("Started: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z"));
        for root in &roots {
            log!("Path: {}", root.display());
        }
        if !args.exclude.is_empty() {
            log!("Excluding: {:?}", args.exclude);
        }
        log!(
            "Identifier length: {}..={}, line width: {}",
            config.min_identifier_length,
            config.max_identifier_length,
            config.max_line_length
        );
        log!("Logging to: {}", log_path.display());
        log!();
    }

    let files = find_java_files(&roots, &args.exclude);
    if !args.quiet && !args.json {
        log!("Checking {} files...", format_number(files.len()));
        log!();
    }

    // Files are independent; results come back in input order
    let results: Vec<(PathBuf, Result<Analysis>)> = files
        .par_iter()
        .map(|file| (file.clone(), analyze_file(file, &config)))
        .collect();

    let mut total_findings = 0;
    let mut files_failed = 0;
    let mut files_errored = 0;

    for (file, result) in &results {
        let file_str = file.display().to_string();
        match result {
            Ok(analysis) => {
                total_findings += analysis.verdict.violation_count();
                if !analysis.passed() {
                    files_failed += 1;
                }
                report_findings(&file_str, analysis, args.json)?;
            }
            Err(e) => {
                files_errored += 1;
                emit!(file_str, 1, "error: {:#}", e);
            }
        }
    }

    if !args.json {
        log!();
        log!("════════════════════════════════════════════════════════════════");
        log!(
            "Summary: {} findings, {} files failed, {} files not analyzed (checked {} files)",
            format_number(total_findings),
            format_number(files_failed),
            format_number(files_errored),
            format_number(results.len())
        );
        log!("════════════════════════════════════════════════════════════════");
    }

    if files_failed > 0 || files_errored > 0 {
        std::process::exit(1);
    }
    Ok(())
}
