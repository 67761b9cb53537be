// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Style configuration
//!
//! One `StyleConfig` value is passed into every analysis run. Defaults follow
//! the Oracle Java code conventions. A config can be loaded from a JSON file;
//! missing keys keep their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How an identifier is spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// `FooBar`: every word capitalized
    Pascal,
    /// `fooBar`: every word but the first capitalized
    Camel,
    /// `FOO_BAR`: upper case words joined by underscores
    UpperUnderscore,
    /// None of the above
    Other,
}

impl NamingStyle {
    pub fn name(&self) -> &'static str {
        match self {
            NamingStyle::Pascal => "PascalCase",
            NamingStyle::Camel => "camelCase",
            NamingStyle::UpperUnderscore => "UPPER_UNDERSCORE",
            NamingStyle::Other => "other",
        }
    }
}

impl std::fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for NamingStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "pascal" | "pascalcase" => Ok(NamingStyle::Pascal),
            "camel" | "camelcase" => Ok(NamingStyle::Camel),
            "upperunderscore" | "upper" | "screaming" => Ok(NamingStyle::UpperUnderscore),
            "other" => Ok(NamingStyle::Other),
            _ => Err(anyhow::anyhow!("Unknown naming style: {s}")),
        }
    }
}

/// Tunable limits and expected naming styles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Identifiers shorter than this are too short
    pub min_identifier_length: usize,
    /// Identifiers longer than this are too long
    pub max_identifier_length: usize,
    /// Classes, interfaces, enums, records, annotation types
    pub class_naming: NamingStyle,
    /// Methods and constructors
    pub method_naming: NamingStyle,
    /// Fields, locals, parameters, loop variables
    pub variable_naming: NamingStyle,
    /// Fields and locals declared `static` or `final`
    pub constant_naming: NamingStyle,
    /// Widest allowed line, in visual columns
    pub max_line_length: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            min_identifier_length: 4,
            max_identifier_length: 15,
            class_naming: NamingStyle::Pascal,
            method_naming: NamingStyle::Camel,
            variable_naming: NamingStyle::Camel,
            constant_naming: NamingStyle::UpperUnderscore,
            max_line_length: 100,
        }
    }
}

impl StyleConfig {
    /// Load a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits that make every identifier fail
    pub fn validate(&self) -> Result<()> {
        if self.min_identifier_length > self.max_identifier_length {
            return Err(anyhow::anyhow!(
                "min_identifier_length ({}) exceeds max_identifier_length ({})",
                self.min_identifier_length,
                self.max_identifier_length
            ));
        }
        if self.max_line_length == 0 {
            return Err(anyhow::anyhow!("max_line_length must be positive"));
        }
        Ok(())
    }
}
