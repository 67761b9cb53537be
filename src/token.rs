// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Token model
//!
//! A `Token` is one lexeme of the whitespace, code, comment or doc-comment
//! channel, placed on a line with its visual geometry. Code tokens carry a
//! coarse semantic type from the lexer; the final `Classification` comes from
//! the scope model.

use bitflags::bitflags;
use serde::Serialize;

use crate::lexer::{Channel, JavaToken, Keyword, Lexeme};

/// Columns between tab stops
pub const TAB_WIDTH: usize = 4;

/// Closed set of semantic token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SemanticType {
    Keyword,
    StringLiteral,
    NumberLiteral,
    BoolLiteral,
    NullLiteral,
    Semicolon,
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    IdentifierUnclassified,
    ClassName,
    InterfaceName,
    EnumName,
    RecordName,
    AnnotationName,
    ConstructorName,
    MethodName,
    FieldName,
    ForVariableName,
    VariableName,
    ParameterName,
    LowPrecedenceOperator,
    OtherOperator,
    #[default]
    Other,
}

impl SemanticType {
    /// Stage-one type, derived from the lexer alone
    pub fn from_lexer(kind: JavaToken) -> SemanticType {
        use JavaToken as T;
        match kind {
            T::Keyword(_) => SemanticType::Keyword,
            T::Identifier => SemanticType::IdentifierUnclassified,
            T::StringLiteral | T::CharLiteral | T::TextBlock => SemanticType::StringLiteral,
            T::DecimalLiteral
            | T::HexLiteral
            | T::OctLiteral
            | T::BinaryLiteral
            | T::FloatLiteral
            | T::HexFloatLiteral => SemanticType::NumberLiteral,
            T::BoolLiteral => SemanticType::BoolLiteral,
            T::NullLiteral => SemanticType::NullLiteral,
            T::Semi => SemanticType::Semicolon,
            T::Comma => SemanticType::Comma,
            T::Dot => SemanticType::Dot,
            T::LParen => SemanticType::LParen,
            T::RParen => SemanticType::RParen,
            T::LBrack => SemanticType::LBracket,
            T::RBrack => SemanticType::RBracket,
            T::LBrace => SemanticType::LBrace,
            T::RBrace => SemanticType::RBrace,
            // Lowest precedence first: assignment, ternary, logical, bitwise,
            // equality and relational
            T::Assign
            | T::AddAssign
            | T::SubAssign
            | T::MulAssign
            | T::DivAssign
            | T::AndAssign
            | T::OrAssign
            | T::XorAssign
            | T::ModAssign
            | T::LShiftAssign
            | T::RShiftAssign
            | T::URShiftAssign
            | T::Question
            | T::Colon
            | T::And
            | T::Or
            | T::BitAnd
            | T::BitOr
            | T::Caret
            | T::Equal
            | T::NotEqual
            | T::Gt
            | T::Lt
            | T::Le
            | T::Ge => SemanticType::LowPrecedenceOperator,
            T::Bang
            | T::Tilde
            | T::Inc
            | T::Dec
            | T::Add
            | T::Sub
            | T::Mul
            | T::Div
            | T::Mod => SemanticType::OtherOperator,
            T::Arrow | T::ColonColon | T::At | T::Ellipsis => SemanticType::Other,
            T::Whitespace | T::Newline | T::LineComment | T::BlockComment | T::DocComment => {
                SemanticType::Other
            }
        }
    }

    /// Identifier roles assigned by the scope model
    pub fn is_identifier_role(&self) -> bool {
        matches!(
            self,
            SemanticType::ClassName
                | SemanticType::InterfaceName
                | SemanticType::EnumName
                | SemanticType::RecordName
                | SemanticType::AnnotationName
                | SemanticType::ConstructorName
                | SemanticType::MethodName
                | SemanticType::FieldName
                | SemanticType::ForVariableName
                | SemanticType::VariableName
                | SemanticType::ParameterName
        )
    }

    pub fn is_type_name(&self) -> bool {
        matches!(
            self,
            SemanticType::ClassName
                | SemanticType::InterfaceName
                | SemanticType::EnumName
                | SemanticType::RecordName
                | SemanticType::AnnotationName
        )
    }

    /// Human-readable role, used in findings
    pub fn describe(&self) -> &'static str {
        match self {
            SemanticType::ClassName => "class name",
            SemanticType::InterfaceName => "interface name",
            SemanticType::EnumName => "enum name",
            SemanticType::RecordName => "record name",
            SemanticType::AnnotationName => "annotation type name",
            SemanticType::ConstructorName => "constructor name",
            SemanticType::MethodName => "method name",
            SemanticType::FieldName => "field name",
            SemanticType::ForVariableName => "loop variable name",
            SemanticType::VariableName => "variable name",
            SemanticType::ParameterName => "parameter name",
            SemanticType::LowPrecedenceOperator => "operator",
            SemanticType::OtherOperator => "operator",
            SemanticType::Keyword => "keyword",
            _ => "token",
        }
    }
}

bitflags! {
    /// Access and inheritance modifiers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AccessModifiers: u8 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const DEFAULT = 1 << 3;
        const ABSTRACT = 1 << 4;
        const SEALED = 1 << 5;
        const NON_SEALED = 1 << 6;
    }
}

bitflags! {
    /// Every other declaration modifier
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OtherModifiers: u8 {
        const FINAL = 1 << 0;
        const STATIC = 1 << 1;
        const STRICTFP = 1 << 2;
        const NATIVE = 1 << 3;
        const SYNCHRONIZED = 1 << 4;
        const TRANSIENT = 1 << 5;
        const VOLATILE = 1 << 6;
    }
}

/// Keyword spelling of a flag name: `NON_SEALED` -> `non-sealed`
fn keyword_spelling(flag: &str) -> String {
    flag.to_ascii_lowercase().replace('_', "-")
}

impl AccessModifiers {
    /// Keyword spellings of the set members, in declaration order
    pub fn words(&self) -> Vec<String> {
        self.iter_names().map(|(flag, _)| keyword_spelling(flag)).collect()
    }
}

impl OtherModifiers {
    /// Keyword spellings of the set members, in declaration order
    pub fn words(&self) -> Vec<String> {
        self.iter_names().map(|(flag, _)| keyword_spelling(flag)).collect()
    }
}

// Reports list modifiers as Java keywords
impl Serialize for AccessModifiers {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.words())
    }
}

impl Serialize for OtherModifiers {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.words())
    }
}

/// Record a modifier keyword in the matching set; false if `kw` is not one
pub fn apply_modifier(kw: Keyword, access: &mut AccessModifiers, other: &mut OtherModifiers) -> bool {
    match kw {
        Keyword::Public => access.insert(AccessModifiers::PUBLIC),
        Keyword::Protected => access.insert(AccessModifiers::PROTECTED),
        Keyword::Private => access.insert(AccessModifiers::PRIVATE),
        Keyword::Default => access.insert(AccessModifiers::DEFAULT),
        Keyword::Abstract => access.insert(AccessModifiers::ABSTRACT),
        Keyword::Sealed => access.insert(AccessModifiers::SEALED),
        Keyword::NonSealed => access.insert(AccessModifiers::NON_SEALED),
        Keyword::Final => other.insert(OtherModifiers::FINAL),
        Keyword::Static => other.insert(OtherModifiers::STATIC),
        Keyword::Strictfp => other.insert(OtherModifiers::STRICTFP),
        Keyword::Native => other.insert(OtherModifiers::NATIVE),
        Keyword::Synchronized => other.insert(OtherModifiers::SYNCHRONIZED),
        Keyword::Transient => other.insert(OtherModifiers::TRANSIENT),
        Keyword::Volatile => other.insert(OtherModifiers::VOLATILE),
        _ => return false,
    }
    true
}

/// Final classification of a code token
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Classification {
    pub semantic_type: SemanticType,
    pub access: AccessModifiers,
    pub other: OtherModifiers,
    pub annotations: Vec<String>,
}

impl Classification {
    pub fn coarse(semantic_type: SemanticType) -> Self {
        Classification { semantic_type, ..Default::default() }
    }

    pub fn is_static_or_final(&self) -> bool {
        self.other.contains(OtherModifiers::STATIC) || self.other.contains(OtherModifiers::FINAL)
    }
}

/// Code-channel payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeToken {
    pub lexer_type: JavaToken,
    /// Stage-one classification
    pub coarse: SemanticType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Code(CodeToken),
    Comment,
    DocComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// 1-based line of the first character
    pub line: usize,
    /// Visual column where the token starts
    pub column: usize,
    /// 0-based position among the tokens of its line
    pub index_in_line: usize,
    pub visual_length: usize,
    /// 0-based position in the whole file
    pub global_index: usize,
    pub kind: TokenKind,
}

impl Token {
    /// Wrap a lexeme; line terminators have no token
    pub fn from_lexeme(
        lexeme: &Lexeme,
        column: usize,
        index_in_line: usize,
        global_index: usize,
    ) -> Option<Token> {
        let channel = lexeme.channel()?;
        let kind = match channel {
            Channel::Whitespace => TokenKind::Whitespace,
            Channel::Comment => TokenKind::Comment,
            Channel::DocComment => TokenKind::DocComment,
            Channel::Code => TokenKind::Code(CodeToken {
                lexer_type: lexeme.kind,
                coarse: SemanticType::from_lexer(lexeme.kind),
            }),
        };
        Some(Token {
            visual_length: visual_length(&lexeme.text, channel, column),
            text: lexeme.text.clone(),
            line: lexeme.line,
            column,
            index_in_line,
            global_index,
            kind,
        })
    }

    pub fn channel(&self) -> Channel {
        match self.kind {
            TokenKind::Whitespace => Channel::Whitespace,
            TokenKind::Code(_) => Channel::Code,
            TokenKind::Comment => Channel::Comment,
            TokenKind::DocComment => Channel::DocComment,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace)
    }

    pub fn code(&self) -> Option<&CodeToken> {
        match &self.kind {
            TokenKind::Code(code) => Some(code),
            _ => None,
        }
    }

    pub fn lexer_type(&self) -> Option<JavaToken> {
        self.code().map(|code| code.lexer_type)
    }

    /// Column just past the token
    pub fn end_column(&self) -> usize {
        self.column + self.visual_length
    }
}

/// Columns a token occupies when it starts at `column`.
///
/// Whitespace: a space is one column, a tab advances to the next multiple of
/// [`TAB_WIDTH`], anything else (form feed) takes no room. Other tokens count
/// characters up to their first line break, expanding tabs the same way.
pub fn visual_length(text: &str, channel: Channel, column: usize) -> usize {
    let mut length = 0;
    for c in text.chars() {
        match c {
            '\n' | '\r' => break,
            ' ' => length += 1,
            '\t' => length += TAB_WIDTH - (column + length) % TAB_WIDTH,
            '\x0C' => {}
            _ if channel == Channel::Whitespace => {}
            _ => length += 1,
        }
    }
    length
}
