// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Java lexer
//!
//! Splits source text into a lossless sequence of lexemes with a `logos`
//! generated DFA. Every byte of the input belongs to exactly one lexeme, so
//! concatenating lexeme texts gives the input back. Line terminators are
//! lexemes too, but they carry no channel and never reach the token index.
//!
//! Comments, quoted literals, text blocks and numbers are matched by their
//! opening characters and finished by callbacks.

use logos::{Lexer, Logos};
use thiserror::Error;

use crate::error::AnalysisError;

/// Which stream a lexeme belongs to once line terminators are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Code,
    Whitespace,
    Comment,
    DocComment,
}

/// Reserved and contextual Java keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    Final,
    Finally,
    Float,
    For,
    Goto,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    Package,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    Try,
    Void,
    Volatile,
    While,
    // Module declarations
    Module,
    Open,
    Requires,
    Exports,
    Opens,
    To,
    Uses,
    Provides,
    With,
    Transitive,
    // Contextual
    Var,
    Yield,
    Record,
    Sealed,
    Permits,
    NonSealed,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Keyword> {
        let kw = match word {
            "abstract" => Keyword::Abstract,
            "assert" => Keyword::Assert,
            "boolean" => Keyword::Boolean,
            "break" => Keyword::Break,
            "byte" => Keyword::Byte,
            "case" => Keyword::Case,
            "catch" => Keyword::Catch,
            "char" => Keyword::Char,
            "class" => Keyword::Class,
            "const" => Keyword::Const,
            "continue" => Keyword::Continue,
            "default" => Keyword::Default,
            "do" => Keyword::Do,
            "double" => Keyword::Double,
            "else" => Keyword::Else,
            "enum" => Keyword::Enum,
            "extends" => Keyword::Extends,
            "final" => Keyword::Final,
            "finally" => Keyword::Finally,
            "float" => Keyword::Float,
            "for" => Keyword::For,
            "goto" => Keyword::Goto,
            "if" => Keyword::If,
            "implements" => Keyword::Implements,
            "import" => Keyword::Import,
            "instanceof" => Keyword::Instanceof,
            "int" => Keyword::Int,
            "interface" => Keyword::Interface,
            "long" => Keyword::Long,
            "native" => Keyword::Native,
            "new" => Keyword::New,
            "package" => Keyword::Package,
            "private" => Keyword::Private,
            "protected" => Keyword::Protected,
            "public" => Keyword::Public,
            "return" => Keyword::Return,
            "short" => Keyword::Short,
            "static" => Keyword::Static,
            "strictfp" => Keyword::Strictfp,
            "super" => Keyword::Super,
            "switch" => Keyword::Switch,
            "synchronized" => Keyword::Synchronized,
            "this" => Keyword::This,
            "throw" => Keyword::Throw,
            "throws" => Keyword::Throws,
            "transient" => Keyword::Transient,
            "try" => Keyword::Try,
            "void" => Keyword::Void,
            "volatile" => Keyword::Volatile,
            "while" => Keyword::While,
            "module" => Keyword::Module,
            "open" => Keyword::Open,
            "requires" => Keyword::Requires,
            "exports" => Keyword::Exports,
            "opens" => Keyword::Opens,
            "to" => Keyword::To,
            "uses" => Keyword::Uses,
            "provides" => Keyword::Provides,
            "with" => Keyword::With,
            "transitive" => Keyword::Transitive,
            "var" => Keyword::Var,
            "yield" => Keyword::Yield,
            "record" => Keyword::Record,
            "sealed" => Keyword::Sealed,
            "permits" => Keyword::Permits,
            "non-sealed" => Keyword::NonSealed,
            _ => return None,
        };
        Some(kw)
    }

    /// Words that only act as keywords in particular positions and are
    /// otherwise ordinary identifiers
    pub fn is_contextual(&self) -> bool {
        matches!(
            self,
            Keyword::Module
                | Keyword::Open
                | Keyword::Requires
                | Keyword::Exports
                | Keyword::Opens
                | Keyword::To
                | Keyword::Uses
                | Keyword::Provides
                | Keyword::With
                | Keyword::Transitive
                | Keyword::Var
                | Keyword::Yield
                | Keyword::Record
                | Keyword::Sealed
                | Keyword::Permits
        )
    }

    pub fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            Keyword::Boolean
                | Keyword::Byte
                | Keyword::Char
                | Keyword::Short
                | Keyword::Int
                | Keyword::Long
                | Keyword::Float
                | Keyword::Double
        )
    }

    /// Keywords that may appear in a declaration's modifier list
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Keyword::Public
                | Keyword::Protected
                | Keyword::Private
                | Keyword::Abstract
                | Keyword::Static
                | Keyword::Final
                | Keyword::Strictfp
                | Keyword::Native
                | Keyword::Synchronized
                | Keyword::Transient
                | Keyword::Volatile
                | Keyword::Default
                | Keyword::Sealed
                | Keyword::NonSealed
        )
    }
}

/// Why the input could not be tokenized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
pub enum LexError {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("unterminated text block")]
    UnterminatedTextBlock,
    #[error("text block opening delimiter must end its line")]
    TextBlockOpening,
}

impl LexError {
    fn at(self, line: usize, text: &str) -> AnalysisError {
        let message = match (self, text.chars().next()) {
            (LexError::UnexpectedCharacter, Some(c)) => {
                format!("unexpected character '{}'", c.escape_debug())
            }
            _ => self.to_string(),
        };
        AnalysisError::Lex { line, message }
    }
}

/// State shared with the scanning callbacks
#[derive(Debug, Clone, Copy)]
pub struct LexExtras {
    /// Kind of the last numeric literal
    number: JavaToken,
}

impl Default for LexExtras {
    fn default() -> Self {
        LexExtras { number: JavaToken::DecimalLiteral }
    }
}

/// Lexical token type
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(error = LexError)]
#[logos(extras = LexExtras)]
#[rustfmt::skip]
pub enum JavaToken {
    #[token("non-sealed", |_| Keyword::NonSealed)]
    Keyword(Keyword),
    /// Keywords, `true`, `false` and `null` are split off in `word_kind`
    #[regex(r"[_$\p{L}][_$\p{L}\p{Nd}]*")]
    Identifier,

    // Literals. Every number matches as `DecimalLiteral`; `number` leaves the
    // real kind in the extras.
    #[regex(r"[0-9]|\.[0-9]", number)]
    DecimalLiteral,
    HexLiteral,
    OctLiteral,
    BinaryLiteral,
    FloatLiteral,
    HexFloatLiteral,
    #[token("'", |lex| quoted(lex, '\'', LexError::UnterminatedChar))]
    CharLiteral,
    #[token("\"", |lex| quoted(lex, '"', LexError::UnterminatedString))]
    StringLiteral,
    #[token("\"\"\"", text_block)]
    TextBlock,
    BoolLiteral,
    NullLiteral,

    // Separators
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token(";")] Semi,
    #[token(",")] Comma,
    #[token(".")] Dot,
    #[token("...")] Ellipsis,
    #[token("@")] At,
    #[token("::")] ColonColon,

    // Operators. There is no `>>` or `>>>`: nested type arguments close one
    // `>` at a time.
    #[token("=")] Assign,
    #[token(">")] Gt,
    #[token("<")] Lt,
    #[token("!")] Bang,
    #[token("~")] Tilde,
    #[token("?")] Question,
    #[token(":")] Colon,
    #[token("->")] Arrow,
    #[token("==")] Equal,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("!=")] NotEqual,
    #[token("&&")] And,
    #[token("||")] Or,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token("+")] Add,
    #[token("-")] Sub,
    #[token("*")] Mul,
    #[token("/")] Div,
    #[token("&")] BitAnd,
    #[token("|")] BitOr,
    #[token("^")] Caret,
    #[token("%")] Mod,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("%=")] ModAssign,
    #[token("<<=")] LShiftAssign,
    #[token(">>=")] RShiftAssign,
    #[token(">>>=")] URShiftAssign,

    // Trivia
    #[regex(r"[ \t\x0C]+")]
    Whitespace,
    #[regex(r"\r\n|\n|\r")]
    Newline,
    #[token("//", line_comment)]
    LineComment,
    /// `/**/` is an empty block comment, not a doc comment
    #[token("/*", block_comment)]
    #[token("/**/")]
    BlockComment,
    #[token("/**", block_comment)]
    DocComment,
}

impl JavaToken {
    /// `None` for line terminators, which the format core never sees
    pub fn channel(&self) -> Option<Channel> {
        match self {
            JavaToken::Whitespace => Some(Channel::Whitespace),
            JavaToken::Newline => None,
            JavaToken::LineComment | JavaToken::BlockComment => Some(Channel::Comment),
            JavaToken::DocComment => Some(Channel::DocComment),
            _ => Some(Channel::Code),
        }
    }

    pub fn is_trivia(&self) -> bool {
        self.channel() != Some(Channel::Code)
    }
}

/// One lexeme of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: JavaToken,
    pub text: String,
    /// Byte offset of the first character
    pub offset: usize,
    /// 1-based line of the first character
    pub line: usize,
}

impl Lexeme {
    pub fn channel(&self) -> Option<Channel> {
        self.kind.channel()
    }
}

/// Tokenize a whole Java source file
pub fn tokenize(source: &str) -> Result<Vec<Lexeme>, AnalysisError> {
    let mut lexer = JavaToken::lexer(source);
    let mut lexemes = Vec::new();
    let mut line = 1;
    while let Some(next) = lexer.next() {
        let text = lexer.slice();
        let kind = match next {
            Ok(JavaToken::Identifier) => word_kind(text),
            Ok(JavaToken::DecimalLiteral) => lexer.extras.number,
            Ok(kind) => kind,
            Err(err) => return Err(err.at(line, text)),
        };
        lexemes.push(Lexeme {
            kind,
            text: text.to_string(),
            offset: lexer.span().start,
            line,
        });
        line += count_line_breaks(text);
    }
    Ok(lexemes)
}

/// Keyword, boolean or null literal, or a plain identifier
fn word_kind(word: &str) -> JavaToken {
    match word {
        "true" | "false" => JavaToken::BoolLiteral,
        "null" => JavaToken::NullLiteral,
        _ => Keyword::from_word(word).map_or(JavaToken::Identifier, JavaToken::Keyword),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn line_comment(lex: &mut Lexer<'_, JavaToken>) {
    let rest = lex.remainder();
    lex.bump(rest.find(['\n', '\r']).unwrap_or(rest.len()));
}

fn block_comment(lex: &mut Lexer<'_, JavaToken>) -> Result<(), LexError> {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(rest.len());
            Err(LexError::UnterminatedComment)
        }
    }
}

/// String or character literal; neither may span lines
fn quoted(lex: &mut Lexer<'_, JavaToken>, quote: char, unterminated: LexError) -> Result<(), LexError> {
    let rest = lex.remainder();
    let mut chars = rest.char_indices();
    while let Some((at, c)) = chars.next() {
        match c {
            '\n' | '\r' => break,
            '\\' => match chars.next() {
                None | Some((_, '\n' | '\r')) => break,
                Some(_) => {}
            },
            c if c == quote => {
                lex.bump(at + c.len_utf8());
                return Ok(());
            }
            _ => {}
        }
    }
    Err(unterminated)
}

fn text_block(lex: &mut Lexer<'_, JavaToken>) -> Result<(), LexError> {
    let rest = lex.remainder();
    let after_opening = rest.trim_start_matches([' ', '\t', '\x0C']);
    if !after_opening.starts_with(['\n', '\r']) {
        return Err(LexError::TextBlockOpening);
    }
    let mut chars = rest.char_indices();
    while let Some((at, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' if rest[at..].starts_with("\"\"\"") => {
                lex.bump(at + 3);
                return Ok(());
            }
            _ => {}
        }
    }
    Err(LexError::UnterminatedTextBlock)
}

fn number(lex: &mut Lexer<'_, JavaToken>) {
    let start = lex.span().start;
    let mut scan = NumberScan { text: &lex.source()[start..], pos: 0 };
    let kind = scan.literal();
    lex.bump((start + scan.pos).saturating_sub(lex.span().end));
    lex.extras.number = kind;
}

/// Cursor over a numeric literal, starting at its first character
struct NumberScan<'a> {
    text: &'a str,
    pos: usize,
}

impl NumberScan<'_> {
    fn peek(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek(0) {
            self.pos += c.len_utf8();
        }
    }

    fn eat_digits(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek(0).is_some_and(|c| pred(c) || c == '_') {
            self.bump();
        }
    }

    fn eat_suffix(&mut self, suffixes: &[char]) -> bool {
        if self.peek(0).is_some_and(|c| suffixes.contains(&c)) {
            self.bump();
            return true;
        }
        false
    }

    fn eat_exponent(&mut self, markers: [char; 2]) -> bool {
        if !self.peek(0).is_some_and(|c| markers.contains(&c)) {
            return false;
        }
        let signed = matches!(self.peek(1), Some('+' | '-'));
        let digit_at = if signed { 2 } else { 1 };
        if !self.peek(digit_at).is_some_and(|c| c.is_ascii_digit()) {
            return false;
        }
        self.bump();
        if signed {
            self.bump();
        }
        self.eat_digits(|c| c.is_ascii_digit());
        true
    }

    fn literal(&mut self) -> JavaToken {
        let first = self.peek(0);
        let second = self.peek(1);

        if first == Some('0') && matches!(second, Some('x' | 'X')) {
            self.pos += 2;
            self.eat_digits(|c| c.is_ascii_hexdigit());
            let mut is_float = false;
            if self.peek(0) == Some('.') {
                self.bump();
                self.eat_digits(|c| c.is_ascii_hexdigit());
                is_float = true;
            }
            if self.eat_exponent(['p', 'P']) {
                is_float = true;
            }
            if is_float {
                self.eat_suffix(&['f', 'F', 'd', 'D']);
                return JavaToken::HexFloatLiteral;
            }
            self.eat_suffix(&['l', 'L']);
            return JavaToken::HexLiteral;
        }

        if first == Some('0') && matches!(second, Some('b' | 'B')) {
            self.pos += 2;
            self.eat_digits(|c| c == '0' || c == '1');
            self.eat_suffix(&['l', 'L']);
            return JavaToken::BinaryLiteral;
        }

        self.eat_digits(|c| c.is_ascii_digit());
        let mut is_float = false;
        if self.peek(0) == Some('.') {
            let after = self.peek(1);
            if after.is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                self.eat_digits(|c| c.is_ascii_digit());
                is_float = true;
            } else if !after.is_some_and(|c| is_ident_start(c) || c == '.') {
                // `1.` is a complete literal
                self.bump();
                is_float = true;
            }
        }
        if self.eat_exponent(['e', 'E']) {
            is_float = true;
        }
        if self.eat_suffix(&['f', 'F', 'd', 'D']) {
            return JavaToken::FloatLiteral;
        }
        if !is_float {
            self.eat_suffix(&['l', 'L']);
        }

        let digits = self.text[..self.pos].trim_end_matches(['l', 'L']);
        if is_float {
            JavaToken::FloatLiteral
        } else if first == Some('0') && digits.len() > 1 {
            JavaToken::OctLiteral
        } else {
            JavaToken::DecimalLiteral
        }
    }
}

/// Number of line terminators in `text`, counting `\r\n` once
pub fn count_line_breaks(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => count += 1,
            '\r' => {
                count += 1;
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            _ => {}
        }
    }
    count
}
