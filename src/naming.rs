// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Naming style detection and the expected style of each identifier role

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::{NamingStyle, StyleConfig};
use crate::token::{Classification, SemanticType};

static PASCAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][\da-z]*([\dA-Z][\da-z]*)*$").expect("pascal pattern"));
static CAMEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][\da-z]*([\dA-Z][\da-z]*)*$").expect("camel pattern"));
static UPPER_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z\d]+(_[A-Z\d]+)*$").expect("upper pattern"));

/// Classify how `text` is spelled.
///
/// An all-caps word such as `ABC` matches both the Pascal and upper-underscore
/// patterns; it is always upper-underscore.
pub fn detect_style(text: &str) -> NamingStyle {
    let Some(first) = text.chars().next() else {
        return NamingStyle::Other;
    };
    if first.is_uppercase() {
        if UPPER_UNDERSCORE.is_match(text) {
            NamingStyle::UpperUnderscore
        } else if PASCAL.is_match(text) {
            NamingStyle::Pascal
        } else {
            NamingStyle::Other
        }
    } else if first.is_lowercase() && CAMEL.is_match(text) {
        NamingStyle::Camel
    } else {
        NamingStyle::Other
    }
}

/// Style an identifier with this classification should have; `None` for
/// tokens that are not declared names
pub fn expected_style(classification: &Classification, config: &StyleConfig) -> Option<NamingStyle> {
    let semantic_type = classification.semantic_type;
    let style = match semantic_type {
        _ if semantic_type.is_type_name() => config.class_naming,
        SemanticType::ConstructorName | SemanticType::MethodName => config.method_naming,
        SemanticType::FieldName | SemanticType::VariableName => {
            if classification.is_static_or_final() {
                config.constant_naming
            } else {
                config.variable_naming
            }
        }
        SemanticType::ParameterName | SemanticType::ForVariableName => config.variable_naming,
        _ => return None,
    };
    Some(style)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LengthCheck {
    TooShort,
    TooLong,
    WithinBounds,
}

/// Length in characters against the configured bounds
pub fn check_length(text: &str, config: &StyleConfig) -> LengthCheck {
    let length = text.chars().count();
    if length < config.min_identifier_length {
        LengthCheck::TooShort
    } else if length > config.max_identifier_length {
        LengthCheck::TooLong
    } else {
        LengthCheck::WithinBounds
    }
}
