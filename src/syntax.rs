// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Syntax kinds and the rowan language binding for Java trees

use crate::lexer::JavaToken;

/// Token and node kinds of the Java syntax tree
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    WHITESPACE = 0,
    NEWLINE,
    COMMENT,
    DOC_COMMENT,
    IDENT,
    KEYWORD,
    LITERAL,
    L_CURLY,
    R_CURLY,
    L_PAREN,
    R_PAREN,
    L_BRACK,
    R_BRACK,
    SEMICOLON,
    COMMA,
    DOT,
    AT,
    OPERATOR,
    PUNCT,

    // Nodes
    SOURCE_FILE,
    PACKAGE_DECL,
    IMPORT_DECL,
    MODULE_DECL,
    MODULE_BODY,
    MODIFIERS,
    ANNOTATION,
    CLASS_DECL,
    INTERFACE_DECL,
    ENUM_DECL,
    RECORD_DECL,
    ANNOTATION_TYPE_DECL,
    CLASS_BODY,
    ENUM_BODY,
    ENUM_CONSTANT,
    TYPE_PARAMS,
    TYPE_PARAM,
    TYPE,
    TYPE_ARGS,
    FIELD_DECL,
    VARIABLE_DECLARATOR,
    METHOD_DECL,
    CONSTRUCTOR_DECL,
    PARAM_LIST,
    PARAM,
    THROWS_CLAUSE,
    INITIALIZER,
    BLOCK,
    STATEMENT,
    LOCAL_VAR_DECL,
    FOR_STMT,
    FOR_INIT,
    RESOURCE_LIST,
    RESOURCE,
    CATCH_CLAUSE,
    SWITCH_BLOCK,
    SWITCH_LABEL,
    EXPR,
    LAMBDA_PARAMS,
    PATTERN_BINDING,
    ARRAY_INIT,
    NAME,
    CAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    const ALL: &'static [SyntaxKind] = &[
        WHITESPACE, NEWLINE, COMMENT, DOC_COMMENT, IDENT, KEYWORD, LITERAL, L_CURLY, R_CURLY,
        L_PAREN, R_PAREN, L_BRACK, R_BRACK, SEMICOLON, COMMA, DOT, AT, OPERATOR, PUNCT,
        SOURCE_FILE, PACKAGE_DECL, IMPORT_DECL, MODULE_DECL, MODULE_BODY, MODIFIERS, ANNOTATION,
        CLASS_DECL, INTERFACE_DECL, ENUM_DECL, RECORD_DECL, ANNOTATION_TYPE_DECL, CLASS_BODY,
        ENUM_BODY, ENUM_CONSTANT, TYPE_PARAMS, TYPE_PARAM, TYPE, TYPE_ARGS, FIELD_DECL,
        VARIABLE_DECLARATOR, METHOD_DECL, CONSTRUCTOR_DECL, PARAM_LIST, PARAM, THROWS_CLAUSE,
        INITIALIZER, BLOCK, STATEMENT, LOCAL_VAR_DECL, FOR_STMT, FOR_INIT, RESOURCE_LIST,
        RESOURCE, CATCH_CLAUSE, SWITCH_BLOCK, SWITCH_LABEL, EXPR, LAMBDA_PARAMS,
        PATTERN_BINDING, ARRAY_INIT, NAME, CAST,
    ];

    /// Tree token kind for a lexeme
    pub fn from_token(token: JavaToken) -> SyntaxKind {
        match token {
            JavaToken::Whitespace => WHITESPACE,
            JavaToken::Newline => NEWLINE,
            JavaToken::LineComment | JavaToken::BlockComment => COMMENT,
            JavaToken::DocComment => DOC_COMMENT,
            JavaToken::Identifier => IDENT,
            JavaToken::Keyword(_) => KEYWORD,
            JavaToken::DecimalLiteral
            | JavaToken::HexLiteral
            | JavaToken::OctLiteral
            | JavaToken::BinaryLiteral
            | JavaToken::FloatLiteral
            | JavaToken::HexFloatLiteral
            | JavaToken::CharLiteral
            | JavaToken::StringLiteral
            | JavaToken::TextBlock
            | JavaToken::BoolLiteral
            | JavaToken::NullLiteral => LITERAL,
            JavaToken::LBrace => L_CURLY,
            JavaToken::RBrace => R_CURLY,
            JavaToken::LParen => L_PAREN,
            JavaToken::RParen => R_PAREN,
            JavaToken::LBrack => L_BRACK,
            JavaToken::RBrack => R_BRACK,
            JavaToken::Semi => SEMICOLON,
            JavaToken::Comma => COMMA,
            JavaToken::Dot => DOT,
            JavaToken::At => AT,
            JavaToken::Ellipsis | JavaToken::ColonColon | JavaToken::Arrow => PUNCT,
            _ => OPERATOR,
        }
    }

    /// Nodes delimited by a `{ ... }` pair
    pub fn is_braced(&self) -> bool {
        matches!(
            self,
            CLASS_BODY | ENUM_BODY | BLOCK | SWITCH_BLOCK | ARRAY_INIT | MODULE_BODY
        )
    }

    pub fn is_type_declaration(&self) -> bool {
        matches!(
            self,
            CLASS_DECL | INTERFACE_DECL | ENUM_DECL | RECORD_DECL | ANNOTATION_TYPE_DECL
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaLanguage {}

impl rowan::Language for JavaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::ALL[raw.0 as usize]
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<JavaLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<JavaLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<JavaLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip_covers_every_kind() {
        for (index, kind) in SyntaxKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
            let raw: rowan::SyntaxKind = (*kind).into();
            assert_eq!(<JavaLanguage as rowan::Language>::kind_from_raw(raw), *kind);
        }
    }
}
