// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Parser module for handling Java source code parsing
//!
//! A recursive-descent parser over the lexer's output that builds a lossless
//! rowan tree: every lexeme, trivia included, ends up as a tree token in file
//! order. Expressions are only structured as far as the scope model needs:
//! lambdas, anonymous class bodies, array initializers, switch blocks and
//! pattern bindings get their own nodes, everything else is a flat `EXPR`.

use rowan::{Checkpoint, GreenNodeBuilder};

use crate::error::AnalysisError;
use crate::lexer::{count_line_breaks, tokenize, JavaToken as T, Keyword as K, Lexeme};
use crate::syntax::{SyntaxKind, SyntaxKind::*, SyntaxNode};

type Result<V> = std::result::Result<V, AnalysisError>;

const MAX_NESTING: usize = 256;

/// Parse a lexeme stream into a syntax tree
pub fn parse_file(lexemes: &[Lexeme]) -> Result<SyntaxNode> {
    let mut parser = Parser::new(lexemes);
    parser.compilation_unit()?;
    Ok(SyntaxNode::new_root(parser.builder.finish()))
}

/// Tokenize and parse Java source text
pub fn parse_source(source: &str) -> Result<SyntaxNode> {
    let lexemes = tokenize(source)?;
    parse_file(&lexemes)
}

/// Which tokens end an expression besides `;` and closing brackets
#[derive(Clone, Copy)]
struct Stops {
    comma: bool,
    colon: bool,
    arrow: bool,
}

impl Stops {
    const NONE: Stops = Stops { comma: false, colon: false, arrow: false };
    const LIST: Stops = Stops { comma: true, colon: false, arrow: false };
    const COLON: Stops = Stops { comma: false, colon: true, arrow: false };
    const LABEL: Stops = Stops { comma: true, colon: true, arrow: true };
}

struct Parser<'a> {
    lexemes: &'a [Lexeme],
    /// Indices of non-trivia lexemes
    significant: Vec<usize>,
    cursor: usize,
    /// Lexemes already pushed into the builder
    emitted: usize,
    depth: usize,
    builder: GreenNodeBuilder<'static>,
}

impl<'a> Parser<'a> {
    fn new(lexemes: &'a [Lexeme]) -> Self {
        let significant = lexemes
            .iter()
            .enumerate()
            .filter(|(_, lexeme)| !lexeme.kind.is_trivia())
            .map(|(index, _)| index)
            .collect();
        Parser {
            lexemes,
            significant,
            cursor: 0,
            emitted: 0,
            depth: 0,
            builder: GreenNodeBuilder::new(),
        }
    }

    // ---- cursor -------------------------------------------------------

    fn nth(&self, n: usize) -> Option<T> {
        self.significant.get(self.cursor + n).map(|&index| self.lexemes[index].kind)
    }

    fn current(&self) -> Option<T> {
        self.nth(0)
    }

    fn nth_at(&self, n: usize, kind: T) -> bool {
        self.nth(n) == Some(kind)
    }

    fn at(&self, kind: T) -> bool {
        self.nth_at(0, kind)
    }

    fn at_kw(&self, kw: K) -> bool {
        self.at(T::Keyword(kw))
    }

    fn at_eof(&self) -> bool {
        self.cursor >= self.significant.len()
    }

    /// Identifiers, plus contextual keywords used as names
    fn nth_is_ident(&self, n: usize) -> bool {
        match self.nth(n) {
            Some(T::Identifier) => true,
            Some(T::Keyword(kw)) => kw.is_contextual(),
            _ => false,
        }
    }

    // ---- tree building ------------------------------------------------

    fn push_lexeme(&mut self, index: usize) {
        let lexeme = &self.lexemes[index];
        self.builder.token(SyntaxKind::from_token(lexeme.kind).into(), &lexeme.text);
    }

    /// Emit trivia sitting before the current significant lexeme
    fn flush_trivia(&mut self) {
        let until = self
            .significant
            .get(self.cursor)
            .copied()
            .unwrap_or(self.lexemes.len());
        while self.emitted < until {
            self.push_lexeme(self.emitted);
            self.emitted += 1;
        }
    }

    fn bump(&mut self) {
        self.flush_trivia();
        if let Some(&index) = self.significant.get(self.cursor) {
            self.push_lexeme(index);
            self.emitted = index + 1;
            self.cursor += 1;
        }
    }

    fn eat(&mut self, kind: T) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_kw(&mut self, kw: K) -> bool {
        self.eat(T::Keyword(kw))
    }

    fn expect(&mut self, kind: T, what: &str) -> Result<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(what))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<()> {
        if self.nth_is_ident(0) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(what))
        }
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind.into());
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error_message("nesting too deep".to_string()));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn error(&self, expected: &str) -> AnalysisError {
        let found = match self.significant.get(self.cursor) {
            Some(&index) => format!("'{}'", self.lexemes[index].text),
            None => "end of file".to_string(),
        };
        self.error_message(format!("expected {expected}, found {found}"))
    }

    fn error_message(&self, message: String) -> AnalysisError {
        let line = match self.significant.get(self.cursor) {
            Some(&index) => self.lexemes[index].line,
            None => self
                .lexemes
                .last()
                .map_or(1, |last| last.line + count_line_breaks(&last.text)),
        };
        AnalysisError::Syntax { line, message }
    }

    // ---- declarations -------------------------------------------------

    fn compilation_unit(&mut self) -> Result<()> {
        self.builder.start_node(SOURCE_FILE.into());
        while !self.at_eof() {
            if self.eat(T::Semi) {
                continue;
            }
            if self.at_kw(K::Import) {
                self.import_decl()?;
                continue;
            }
            let cp = self.checkpoint();
            self.modifiers()?;
            if self.at_kw(K::Package) {
                self.package_decl(cp)?;
            } else if self.at_module_decl() {
                self.module_decl(cp)?;
            } else {
                self.type_decl(cp)?;
            }
        }
        self.flush_trivia();
        self.finish_node();
        Ok(())
    }

    fn package_decl(&mut self, cp: Checkpoint) -> Result<()> {
        self.start_node_at(cp, PACKAGE_DECL);
        self.bump();
        self.qualified_name("package name")?;
        self.expect(T::Semi, "';'")?;
        self.finish_node();
        Ok(())
    }

    fn import_decl(&mut self) -> Result<()> {
        self.start_node(IMPORT_DECL);
        self.bump();
        self.eat_kw(K::Static);
        self.qualified_name("import name")?;
        if self.eat(T::Dot) {
            self.expect(T::Mul, "'*'")?;
        }
        self.expect(T::Semi, "';'")?;
        self.finish_node();
        Ok(())
    }

    fn at_module_decl(&self) -> bool {
        (self.at_kw(K::Open) && self.nth_at(1, T::Keyword(K::Module)))
            || (self.at_kw(K::Module) && self.nth_is_ident(1))
    }

    fn module_decl(&mut self, cp: Checkpoint) -> Result<()> {
        self.start_node_at(cp, MODULE_DECL);
        self.eat_kw(K::Open);
        self.bump();
        self.qualified_name("module name")?;
        self.enter()?;
        self.start_node(MODULE_BODY);
        self.expect(T::LBrace, "'{'")?;
        while !self.at(T::RBrace) {
            while !self.at(T::Semi) {
                if self.at_eof() || self.at(T::LBrace) || self.at(T::RBrace) {
                    return Err(self.error("';'"));
                }
                self.bump();
            }
            self.bump();
        }
        self.bump();
        self.finish_node();
        self.leave();
        self.finish_node();
        Ok(())
    }

    fn qualified_name(&mut self, what: &str) -> Result<()> {
        self.expect_ident(what)?;
        while self.at(T::Dot) && self.nth_is_ident(1) {
            self.bump();
            self.bump();
        }
        Ok(())
    }

    /// A declared name, wrapped so the scope model can find it
    fn name(&mut self, what: &str) -> Result<()> {
        if !self.nth_is_ident(0) {
            return Err(self.error(what));
        }
        self.start_node(NAME);
        self.bump();
        self.finish_node();
        Ok(())
    }

    fn at_modifier(&self) -> bool {
        match self.current() {
            Some(T::At) => !self.nth_at(1, T::Keyword(K::Interface)),
            Some(T::Keyword(K::Sealed)) => matches!(
                self.nth(1),
                Some(T::Keyword(kw)) if kw.is_modifier()
                    || matches!(kw, K::Class | K::Interface)
            ) || self.nth_at(1, T::At),
            Some(T::Keyword(kw)) => kw.is_modifier(),
            _ => false,
        }
    }

    /// Modifiers allowed in front of local declarations
    fn at_local_modifier(&self) -> bool {
        match self.current() {
            Some(T::Keyword(K::Final | K::Abstract | K::Static | K::Strictfp | K::NonSealed)) => {
                true
            }
            Some(T::Keyword(K::Sealed)) | Some(T::At) => self.at_modifier(),
            _ => false,
        }
    }

    fn modifiers(&mut self) -> Result<()> {
        if !self.at_modifier() {
            return Ok(());
        }
        self.start_node(MODIFIERS);
        while self.at_modifier() {
            if self.at(T::At) {
                self.annotation()?;
            } else {
                self.bump();
            }
        }
        self.finish_node();
        Ok(())
    }

    fn annotation(&mut self) -> Result<()> {
        self.start_node(ANNOTATION);
        self.bump();
        self.qualified_name("annotation name")?;
        if self.at(T::LParen) {
            self.arguments()?;
        }
        self.finish_node();
        Ok(())
    }

    fn at_type_decl_start(&self) -> bool {
        match self.current() {
            Some(T::Keyword(K::Class | K::Interface | K::Enum)) => true,
            Some(T::Keyword(K::Record)) => {
                self.nth_is_ident(1) && matches!(self.nth(2), Some(T::LParen | T::Lt))
            }
            Some(T::At) => self.nth_at(1, T::Keyword(K::Interface)),
            _ => false,
        }
    }

    fn type_decl(&mut self, cp: Checkpoint) -> Result<()> {
        let kind = match self.current() {
            Some(T::Keyword(K::Class)) => CLASS_DECL,
            Some(T::Keyword(K::Interface)) => INTERFACE_DECL,
            Some(T::Keyword(K::Enum)) => ENUM_DECL,
            Some(T::Keyword(K::Record)) if self.nth_is_ident(1) => RECORD_DECL,
            Some(T::At) if self.nth_at(1, T::Keyword(K::Interface)) => ANNOTATION_TYPE_DECL,
            _ => return Err(self.error("type declaration")),
        };
        self.start_node_at(cp, kind);
        if kind == ANNOTATION_TYPE_DECL {
            self.bump();
        }
        self.bump();
        self.name("type name")?;
        if self.at(T::Lt) {
            self.type_params()?;
        }
        if kind == RECORD_DECL {
            self.formal_params()?;
        }
        while matches!(
            self.current(),
            Some(T::Keyword(K::Extends | K::Implements | K::Permits))
        ) {
            self.bump();
            self.type_list()?;
        }
        if kind == ENUM_DECL {
            self.enum_body()?;
        } else {
            self.class_body()?;
        }
        self.finish_node();
        Ok(())
    }

    fn type_params(&mut self) -> Result<()> {
        self.start_node(TYPE_PARAMS);
        self.bump();
        loop {
            self.start_node(TYPE_PARAM);
            while self.at(T::At) {
                self.annotation()?;
            }
            self.name("type parameter")?;
            if self.eat_kw(K::Extends) {
                self.type_ref()?;
                while self.eat(T::BitAnd) {
                    self.type_ref()?;
                }
            }
            self.finish_node();
            if !self.eat(T::Comma) {
                break;
            }
        }
        self.expect(T::Gt, "'>'")?;
        self.finish_node();
        Ok(())
    }

    fn type_ref(&mut self) -> Result<()> {
        self.start_node(TYPE);
        self.type_core()?;
        self.dims();
        self.finish_node();
        Ok(())
    }

    /// A type without trailing array dimensions
    fn type_core(&mut self) -> Result<()> {
        while self.at(T::At) {
            self.annotation()?;
        }
        match self.current() {
            Some(T::Keyword(kw)) if kw.is_primitive_type() || kw == K::Void => self.bump(),
            _ if self.nth_is_ident(0) => {
                self.bump();
                loop {
                    if self.at(T::Lt) {
                        self.type_args()?;
                    }
                    if self.at(T::Dot) && (self.nth_is_ident(1) || self.nth_at(1, T::At)) {
                        self.bump();
                        while self.at(T::At) {
                            self.annotation()?;
                        }
                        self.expect_ident("type name")?;
                    } else {
                        break;
                    }
                }
            }
            _ => return Err(self.error("type")),
        }
        Ok(())
    }

    fn dims(&mut self) {
        while self.at(T::LBrack) && self.nth_at(1, T::RBrack) {
            self.bump();
            self.bump();
        }
    }

    fn type_args(&mut self) -> Result<()> {
        self.start_node(TYPE_ARGS);
        self.bump();
        if !self.at(T::Gt) {
            loop {
                while self.at(T::At) {
                    self.annotation()?;
                }
                if self.eat(T::Question) {
                    if self.at_kw(K::Extends) || self.at_kw(K::Super) {
                        self.bump();
                        self.type_ref()?;
                    }
                } else {
                    self.type_ref()?;
                }
                if !self.eat(T::Comma) {
                    break;
                }
            }
        }
        self.expect(T::Gt, "'>'")?;
        self.finish_node();
        Ok(())
    }

    fn type_list(&mut self) -> Result<()> {
        self.type_ref()?;
        while self.eat(T::Comma) {
            self.type_ref()?;
        }
        Ok(())
    }

    fn class_body(&mut self) -> Result<()> {
        self.enter()?;
        self.start_node(CLASS_BODY);
        self.expect(T::LBrace, "'{'")?;
        while !self.at(T::RBrace) {
            if self.at_eof() {
                return Err(self.error("'}'"));
            }
            self.member()?;
        }
        self.bump();
        self.finish_node();
        self.leave();
        Ok(())
    }

    fn at_enum_constant(&self) -> bool {
        self.at(T::At)
            || (self.nth_is_ident(0)
                && matches!(
                    self.nth(1),
                    Some(T::Comma | T::LParen | T::LBrace | T::Semi | T::RBrace)
                ))
    }

    fn enum_body(&mut self) -> Result<()> {
        self.enter()?;
        self.start_node(ENUM_BODY);
        self.expect(T::LBrace, "'{'")?;
        while self.at_enum_constant() {
            self.start_node(ENUM_CONSTANT);
            self.modifiers()?;
            self.name("enum constant")?;
            if self.at(T::LParen) {
                self.arguments()?;
            }
            if self.at(T::LBrace) {
                self.class_body()?;
            }
            self.finish_node();
            if !self.eat(T::Comma) {
                break;
            }
        }
        self.eat(T::Semi);
        while !self.at(T::RBrace) {
            if self.at_eof() {
                return Err(self.error("'}'"));
            }
            self.member()?;
        }
        self.bump();
        self.finish_node();
        self.leave();
        Ok(())
    }

    fn member(&mut self) -> Result<()> {
        if self.eat(T::Semi) {
            return Ok(());
        }
        if self.at(T::LBrace) || (self.at_kw(K::Static) && self.nth_at(1, T::LBrace)) {
            self.start_node(INITIALIZER);
            self.eat_kw(K::Static);
            self.block()?;
            self.finish_node();
            return Ok(());
        }

        let cp = self.checkpoint();
        self.modifiers()?;
        if self.at_type_decl_start() {
            return self.type_decl(cp);
        }
        if self.at(T::Lt) {
            self.type_params()?;
        }

        // Constructors, including compact record constructors
        if self.nth_is_ident(0) && matches!(self.nth(1), Some(T::LParen | T::LBrace)) {
            self.start_node_at(cp, CONSTRUCTOR_DECL);
            self.name("constructor name")?;
            if self.at(T::LParen) {
                self.formal_params()?;
                self.throws()?;
            }
            self.block()?;
            self.finish_node();
            return Ok(());
        }

        self.type_ref()?;
        if self.nth_is_ident(0) && self.nth_at(1, T::LParen) {
            self.start_node_at(cp, METHOD_DECL);
            self.name("method name")?;
            self.formal_params()?;
            self.dims();
            self.throws()?;
            if self.eat_kw(K::Default) {
                self.element_value()?;
            }
            if !self.eat(T::Semi) {
                self.block()?;
            }
        } else {
            self.start_node_at(cp, FIELD_DECL);
            self.declarators()?;
            self.expect(T::Semi, "';'")?;
        }
        self.finish_node();
        Ok(())
    }

    fn throws(&mut self) -> Result<()> {
        if self.at_kw(K::Throws) {
            self.start_node(THROWS_CLAUSE);
            self.bump();
            self.type_list()?;
            self.finish_node();
        }
        Ok(())
    }

    fn element_value(&mut self) -> Result<()> {
        if self.at(T::LBrace) {
            self.array_init()
        } else {
            self.expression(Stops::NONE)
        }
    }

    fn formal_params(&mut self) -> Result<()> {
        self.start_node(PARAM_LIST);
        self.expect(T::LParen, "'('")?;
        if !self.at(T::RParen) {
            loop {
                self.param()?;
                if !self.eat(T::Comma) {
                    break;
                }
            }
        }
        self.expect(T::RParen, "')'")?;
        self.finish_node();
        Ok(())
    }

    fn param(&mut self) -> Result<()> {
        self.start_node(PARAM);
        self.modifiers()?;
        self.type_ref()?;
        while self.at(T::At) {
            self.annotation()?;
        }
        self.eat(T::Ellipsis);
        if self.eat_kw(K::This) {
            // receiver parameter
        } else if self.nth_is_ident(0) && self.nth_at(1, T::Dot) {
            self.bump();
            self.bump();
            self.expect(T::Keyword(K::This), "'this'")?;
        } else {
            self.name("parameter name")?;
            self.dims();
        }
        self.finish_node();
        Ok(())
    }

    fn declarators(&mut self) -> Result<()> {
        loop {
            self.start_node(VARIABLE_DECLARATOR);
            self.name("variable name")?;
            self.dims();
            if self.eat(T::Assign) {
                if self.at(T::LBrace) {
                    self.array_init()?;
                } else {
                    self.expression(Stops::LIST)?;
                }
            }
            self.finish_node();
            if !self.eat(T::Comma) {
                break;
            }
        }
        Ok(())
    }

    // ---- statements ---------------------------------------------------

    fn block(&mut self) -> Result<()> {
        self.enter()?;
        self.start_node(BLOCK);
        self.expect(T::LBrace, "'{'")?;
        while !self.at(T::RBrace) {
            if self.at_eof() {
                return Err(self.error("'}'"));
            }
            self.block_statement()?;
        }
        self.bump();
        self.finish_node();
        self.leave();
        Ok(())
    }

    /// Offset just past a type starting `n` tokens ahead, if one is there
    fn scan_type(&self, mut n: usize) -> Option<usize> {
        match self.nth(n)? {
            T::Keyword(kw) if kw.is_primitive_type() || kw == K::Var => n += 1,
            T::Identifier => {
                n += 1;
                loop {
                    if self.nth_at(n, T::Lt) {
                        n = self.scan_type_args(n)?;
                    }
                    if self.nth_at(n, T::Dot) && self.nth_at(n + 1, T::Identifier) {
                        n += 2;
                    } else {
                        break;
                    }
                }
            }
            _ => return None,
        }
        while self.nth_at(n, T::LBrack) && self.nth_at(n + 1, T::RBrack) {
            n += 2;
        }
        Some(n)
    }

    fn scan_type_args(&self, mut n: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            match self.nth(n)? {
                T::Lt => depth += 1,
                T::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(n + 1);
                    }
                }
                T::Identifier
                | T::Comma
                | T::Dot
                | T::Question
                | T::LBrack
                | T::RBrack
                | T::BitAnd
                | T::At => {}
                T::Keyword(kw)
                    if kw.is_primitive_type()
                        || kw.is_contextual()
                        || matches!(kw, K::Extends | K::Super) => {}
                _ => return None,
            }
            n += 1;
        }
    }

    fn at_local_var_decl(&self) -> bool {
        match self.scan_type(0) {
            Some(n) => {
                self.nth_is_ident(n)
                    && matches!(
                        self.nth(n + 1),
                        Some(T::Assign | T::Comma | T::Semi | T::Colon | T::LBrack)
                    )
            }
            None => false,
        }
    }

    fn block_statement(&mut self) -> Result<()> {
        if self.at_local_modifier() || self.at_type_decl_start() {
            let cp = self.checkpoint();
            self.modifiers()?;
            if self.at_type_decl_start() {
                return self.type_decl(cp);
            }
            self.start_node_at(cp, LOCAL_VAR_DECL);
            self.local_var_rest()?;
            self.finish_node();
            return Ok(());
        }
        if self.at_local_var_decl() {
            self.start_node(LOCAL_VAR_DECL);
            self.local_var_rest()?;
            self.finish_node();
            return Ok(());
        }
        self.statement()
    }

    fn local_var_rest(&mut self) -> Result<()> {
        self.type_ref()?;
        self.declarators()?;
        self.expect(T::Semi, "';'")
    }

    fn at_yield_statement(&self) -> bool {
        self.at_kw(K::Yield)
            && !matches!(
                self.nth(1),
                Some(T::Assign | T::Dot | T::LBrack | T::Inc | T::Dec | T::Semi)
            )
    }

    fn statement(&mut self) -> Result<()> {
        if self.at(T::LBrace) {
            return self.block();
        }
        if self.at_kw(K::For) {
            return self.for_statement();
        }
        self.enter()?;
        self.start_node(STATEMENT);
        match self.current() {
            Some(T::Semi) => self.bump(),
            Some(T::Keyword(K::If)) => {
                self.bump();
                self.paren_expression()?;
                self.statement()?;
                if self.eat_kw(K::Else) {
                    self.statement()?;
                }
            }
            Some(T::Keyword(K::While)) => {
                self.bump();
                self.paren_expression()?;
                self.statement()?;
            }
            Some(T::Keyword(K::Do)) => {
                self.bump();
                self.statement()?;
                self.expect(T::Keyword(K::While), "'while'")?;
                self.paren_expression()?;
                self.expect(T::Semi, "';'")?;
            }
            Some(T::Keyword(K::Try)) => self.try_statement()?,
            Some(T::Keyword(K::Switch)) => {
                self.bump();
                self.paren_expression()?;
                self.switch_block()?;
            }
            Some(T::Keyword(K::Synchronized)) => {
                self.bump();
                self.paren_expression()?;
                self.block()?;
            }
            Some(T::Keyword(K::Return | K::Throw)) => {
                self.bump();
                if !self.at(T::Semi) {
                    self.expression(Stops::NONE)?;
                }
                self.expect(T::Semi, "';'")?;
            }
            Some(T::Keyword(K::Break | K::Continue)) => {
                self.bump();
                if self.nth_is_ident(0) {
                    self.bump();
                }
                self.expect(T::Semi, "';'")?;
            }
            Some(T::Keyword(K::Assert)) => {
                self.bump();
                self.expression(Stops::COLON)?;
                if self.eat(T::Colon) {
                    self.expression(Stops::NONE)?;
                }
                self.expect(T::Semi, "';'")?;
            }
            Some(T::Keyword(K::Yield)) if self.at_yield_statement() => {
                self.bump();
                self.expression(Stops::NONE)?;
                self.expect(T::Semi, "';'")?;
            }
            _ if self.nth_is_ident(0) && self.nth_at(1, T::Colon) => {
                self.bump();
                self.bump();
                self.statement()?;
            }
            _ => {
                self.expression(Stops::NONE)?;
                self.expect(T::Semi, "';'")?;
            }
        }
        self.finish_node();
        self.leave();
        Ok(())
    }

    fn paren_expression(&mut self) -> Result<()> {
        self.expect(T::LParen, "'('")?;
        self.expression(Stops::NONE)?;
        self.expect(T::RParen, "')'")
    }

    fn expression_list(&mut self) -> Result<()> {
        loop {
            self.expression(Stops::LIST)?;
            if !self.eat(T::Comma) {
                return Ok(());
            }
        }
    }

    fn for_statement(&mut self) -> Result<()> {
        self.enter()?;
        self.start_node(FOR_STMT);
        self.bump();
        self.expect(T::LParen, "'('")?;
        if self.at_local_modifier() || self.at_local_var_decl() {
            self.start_node(FOR_INIT);
            self.modifiers()?;
            self.type_ref()?;
            self.declarators()?;
            self.finish_node();
        } else if !self.at(T::Semi) {
            self.expression_list()?;
        }
        if self.eat(T::Colon) {
            self.expression(Stops::NONE)?;
        } else {
            self.expect(T::Semi, "';'")?;
            if !self.at(T::Semi) {
                self.expression(Stops::NONE)?;
            }
            self.expect(T::Semi, "';'")?;
            if !self.at(T::RParen) {
                self.expression_list()?;
            }
        }
        self.expect(T::RParen, "')'")?;
        self.statement()?;
        self.finish_node();
        self.leave();
        Ok(())
    }

    fn at_resource_decl(&self) -> bool {
        matches!(self.scan_type(0), Some(n) if self.nth_is_ident(n) && self.nth_at(n + 1, T::Assign))
    }

    fn try_statement(&mut self) -> Result<()> {
        self.bump();
        if self.at(T::LParen) {
            self.start_node(RESOURCE_LIST);
            self.bump();
            while !self.at(T::RParen) {
                if self.at_local_modifier() || self.at_resource_decl() {
                    self.start_node(RESOURCE);
                    self.modifiers()?;
                    self.type_ref()?;
                    self.name("resource name")?;
                    self.expect(T::Assign, "'='")?;
                    self.expression(Stops::NONE)?;
                    self.finish_node();
                } else {
                    self.expression(Stops::NONE)?;
                }
                if !self.eat(T::Semi) {
                    break;
                }
            }
            self.expect(T::RParen, "')'")?;
            self.finish_node();
        }
        self.block()?;
        while self.at_kw(K::Catch) {
            self.start_node(CATCH_CLAUSE);
            self.bump();
            self.expect(T::LParen, "'('")?;
            self.start_node(PARAM);
            self.modifiers()?;
            self.type_ref()?;
            while self.eat(T::BitOr) {
                self.type_ref()?;
            }
            self.name("exception parameter")?;
            self.finish_node();
            self.expect(T::RParen, "')'")?;
            self.block()?;
            self.finish_node();
        }
        if self.eat_kw(K::Finally) {
            self.block()?;
        }
        Ok(())
    }

    fn switch_block(&mut self) -> Result<()> {
        self.enter()?;
        self.start_node(SWITCH_BLOCK);
        self.expect(T::LBrace, "'{'")?;
        while !self.at(T::RBrace) {
            if self.at_eof() {
                return Err(self.error("'}'"));
            }
            let at_default_label =
                self.at_kw(K::Default) && matches!(self.nth(1), Some(T::Colon | T::Arrow));
            if !self.at_kw(K::Case) && !at_default_label {
                self.block_statement()?;
                continue;
            }
            self.start_node(SWITCH_LABEL);
            if self.eat_kw(K::Case) {
                loop {
                    self.expression(Stops::LABEL)?;
                    if !self.eat(T::Comma) {
                        break;
                    }
                }
            } else {
                self.bump();
            }
            let is_rule = self.eat(T::Arrow);
            if !is_rule {
                self.expect(T::Colon, "':' or '->'")?;
            }
            self.finish_node();
            if is_rule {
                if self.at(T::LBrace) || self.at_kw(K::Throw) {
                    self.statement()?;
                } else {
                    self.start_node(STATEMENT);
                    self.expression(Stops::NONE)?;
                    self.expect(T::Semi, "';'")?;
                    self.finish_node();
                }
            }
        }
        self.bump();
        self.finish_node();
        self.leave();
        Ok(())
    }

    // ---- expressions --------------------------------------------------

    fn expression(&mut self, stops: Stops) -> Result<()> {
        self.enter()?;
        self.start_node(EXPR);
        let mut consumed = 0usize;
        let mut open_ternaries = 0usize;
        let mut previous = None;
        while let Some(token) = self.current() {
            match token {
                T::Semi | T::RParen | T::RBrack | T::RBrace => break,
                T::Comma if stops.comma => break,
                T::Arrow if stops.arrow => break,
                T::Colon if open_ternaries > 0 => {
                    open_ternaries -= 1;
                    self.bump();
                }
                T::Colon if stops.colon => break,
                T::Question => {
                    open_ternaries += 1;
                    self.bump();
                }
                T::Arrow => {
                    self.bump();
                    if self.at(T::LBrace) {
                        self.block()?;
                    }
                }
                T::LParen if !stops.arrow && self.at_lambda_params() => self.lambda_params()?,
                T::LParen if self.at_cast(previous) => self.cast()?,
                T::LParen => self.arguments()?,
                // Explicit type arguments: `Collections.<String>emptyList()`
                T::Dot | T::ColonColon if self.nth_at(1, T::Lt) => {
                    self.bump();
                    self.type_args()?;
                }
                T::LBrack => {
                    self.bump();
                    if !self.at(T::RBrack) {
                        self.expression(Stops::NONE)?;
                    }
                    self.expect(T::RBrack, "']'")?;
                }
                T::LBrace => self.array_init()?,
                T::At => self.annotation()?,
                T::Identifier if !stops.arrow && self.nth_at(1, T::Arrow) => {
                    self.start_node(LAMBDA_PARAMS);
                    self.start_node(PARAM);
                    self.name("lambda parameter")?;
                    self.finish_node();
                    self.finish_node();
                }
                T::Keyword(K::New) if previous != Some(T::ColonColon) => self.creator()?,
                T::Keyword(K::Switch) => {
                    self.bump();
                    self.paren_expression()?;
                    self.switch_block()?;
                }
                T::Keyword(K::Instanceof) => {
                    self.bump();
                    self.eat_kw(K::Final);
                    self.type_ref()?;
                    if self.nth_is_ident(0) {
                        self.start_node(PATTERN_BINDING);
                        self.name("pattern variable")?;
                        self.finish_node();
                    }
                }
                T::Keyword(
                    K::If
                    | K::Else
                    | K::For
                    | K::While
                    | K::Do
                    | K::Try
                    | K::Catch
                    | K::Finally
                    | K::Return
                    | K::Break
                    | K::Continue
                    | K::Throw
                    | K::Throws
                    | K::Import
                    | K::Package
                    | K::Implements,
                ) => return Err(self.error("expression")),
                _ => self.bump(),
            }
            previous = Some(token);
            consumed += 1;
        }
        if consumed == 0 {
            return Err(self.error("expression"));
        }
        self.finish_node();
        self.leave();
        Ok(())
    }

    /// Parenthesized argument list or grouping
    fn arguments(&mut self) -> Result<()> {
        self.expect(T::LParen, "'('")?;
        if !self.at(T::RParen) {
            self.expression_list()?;
        }
        self.expect(T::RParen, "')'")
    }

    /// True when the `(` at the cursor opens a cast: a type, optional `& Bound`
    /// intersections, `)` and then the start of an operand
    fn at_cast(&self, previous: Option<T>) -> bool {
        if matches!(previous, Some(T::Identifier | T::RParen | T::RBrack | T::Keyword(_))) {
            return false;
        }
        let primitive = matches!(self.nth(1), Some(T::Keyword(kw)) if kw.is_primitive_type());
        let Some(mut n) = self.scan_type(1) else {
            return false;
        };
        while self.nth_at(n, T::BitAnd) {
            match self.scan_type(n + 1) {
                Some(end) => n = end,
                None => return false,
            }
        }
        if !self.nth_at(n, T::RParen) {
            return false;
        }
        match self.nth(n + 1) {
            Some(T::Identifier | T::LParen | T::Bang | T::Tilde) => true,
            Some(T::Keyword(kw)) => kw != K::Instanceof,
            Some(T::Add | T::Sub | T::Inc | T::Dec) => primitive,
            Some(kind) => SyntaxKind::from_token(kind) == LITERAL,
            None => false,
        }
    }

    fn cast(&mut self) -> Result<()> {
        self.start_node(CAST);
        self.bump();
        self.type_ref()?;
        while self.eat(T::BitAnd) {
            self.type_ref()?;
        }
        self.expect(T::RParen, "')'")?;
        self.finish_node();
        Ok(())
    }

    /// True when the `(` at the cursor opens a lambda parameter list
    fn at_lambda_params(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            match self.nth(n) {
                None => return false,
                Some(T::LParen) => depth += 1,
                Some(T::RParen) => {
                    depth -= 1;
                    if depth == 0 {
                        return self.nth_at(n + 1, T::Arrow);
                    }
                }
                _ => {}
            }
            n += 1;
        }
    }

    fn lambda_params(&mut self) -> Result<()> {
        self.start_node(LAMBDA_PARAMS);
        self.bump();
        if !self.at(T::RParen) {
            loop {
                if self.nth_is_ident(0) && matches!(self.nth(1), Some(T::Comma | T::RParen)) {
                    self.start_node(PARAM);
                    self.name("lambda parameter")?;
                    self.finish_node();
                } else {
                    self.param()?;
                }
                if !self.eat(T::Comma) {
                    break;
                }
            }
        }
        self.expect(T::RParen, "')'")?;
        self.finish_node();
        Ok(())
    }

    fn creator(&mut self) -> Result<()> {
        self.bump();
        if self.at(T::Lt) {
            self.type_args()?;
        }
        self.start_node(TYPE);
        self.type_core()?;
        self.finish_node();
        if self.at(T::LBrack) {
            while self.at(T::LBrack) {
                self.bump();
                if !self.at(T::RBrack) {
                    self.expression(Stops::NONE)?;
                }
                self.expect(T::RBrack, "']'")?;
            }
            if self.at(T::LBrace) {
                self.array_init()?;
            }
        } else {
            self.arguments()?;
            if self.at(T::LBrace) {
                self.class_body()?;
            }
        }
        Ok(())
    }

    fn array_init(&mut self) -> Result<()> {
        self.enter()?;
        self.start_node(ARRAY_INIT);
        self.bump();
        while !self.at(T::RBrace) {
            if self.at_eof() {
                return Err(self.error("'}'"));
            }
            self.expression(Stops::LIST)?;
            if !self.eat(T::Comma) {
                break;
            }
        }
        self.expect(T::RBrace, "'}'")?;
        self.finish_node();
        self.leave();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(root: &SyntaxNode) -> Vec<SyntaxKind> {
        root.descendants().map(|node| node.kind()).collect()
    }

    fn names_under(root: &SyntaxNode, parent: SyntaxKind) -> Vec<String> {
        root.descendants()
            .filter(|node| node.kind() == NAME)
            .filter(|node| node.parent().is_some_and(|p| p.kind() == parent))
            .map(|node| node.text().to_string())
            .collect()
    }

    #[test]
    fn test_tree_is_lossless() {
        let source = "package a.b;\n\nimport java.util.*;\n\n/** Doc */\npublic class A {\n\tint x = 1; // c\n}\n";
        let root = parse_source(source).unwrap();
        assert_eq!(root.text().to_string(), source);
    }

    #[test]
    fn test_class_members() {
        let root = parse_source(
            "class Foo<T> { private int count; Foo(int c) { count = c; } int get() { return count; } }",
        )
        .unwrap();
        assert_eq!(names_under(&root, CLASS_DECL), vec!["Foo"]);
        assert_eq!(names_under(&root, CONSTRUCTOR_DECL), vec!["Foo"]);
        assert_eq!(names_under(&root, METHOD_DECL), vec!["get"]);
        assert_eq!(names_under(&root, VARIABLE_DECLARATOR), vec!["count"]);
        assert_eq!(names_under(&root, TYPE_PARAM), vec!["T"]);
    }

    #[test]
    fn test_lambda_parameters() {
        let root = parse_source(
            "class A { void f() { run((a, b) -> a + b); each(item -> { use(item); }); } }",
        )
        .unwrap();
        let params = names_under(&root, PARAM);
        assert_eq!(params, vec!["a", "b", "item"]);
        assert_eq!(kinds(&root).iter().filter(|k| **k == LAMBDA_PARAMS).count(), 2);
    }

    #[test]
    fn test_locals_loops_and_patterns() {
        let root = parse_source(
            "class A { void f(Object o) {\n\
             int total = 0;\n\
             for (int index = 0; index < 3; index++) { total += index; }\n\
             for (String word : words) { }\n\
             if (o instanceof String text) { }\n\
             try (Reader input = open()) { } catch (IOException | RuntimeException error) { }\n\
             } }",
        )
        .unwrap();
        let locals = names_under(&root, VARIABLE_DECLARATOR);
        assert_eq!(locals, vec!["total", "index", "word"]);
        assert_eq!(names_under(&root, PATTERN_BINDING), vec!["text"]);
        assert_eq!(names_under(&root, RESOURCE), vec!["input"]);
        assert!(names_under(&root, PARAM).contains(&"error".to_string()));
    }

    #[test]
    fn test_enum_record_and_annotation_types() {
        let root = parse_source(
            "enum Color { RED, GREEN(1) { }, BLUE; int code; }\n\
             record Point(int x, int y) { Point { } }\n\
             @interface Marker { String value() default \"\"; }",
        )
        .unwrap();
        assert_eq!(names_under(&root, ENUM_CONSTANT), vec!["RED", "GREEN", "BLUE"]);
        assert_eq!(names_under(&root, RECORD_DECL), vec!["Point"]);
        assert_eq!(names_under(&root, CONSTRUCTOR_DECL), vec!["Point"]);
        assert_eq!(names_under(&root, ANNOTATION_TYPE_DECL), vec!["Marker"]);
        assert_eq!(names_under(&root, METHOD_DECL), vec!["value"]);
    }

    #[test]
    fn test_switch_forms() {
        let root = parse_source(
            "class A { int f(int k) {\n\
             switch (k) { case 1: return 1; default: break; }\n\
             return switch (k) { case 1, 2 -> 3; default -> { yield 4; } };\n\
             } }",
        )
        .unwrap();
        assert_eq!(kinds(&root).iter().filter(|k| **k == SWITCH_BLOCK).count(), 2);
        assert_eq!(kinds(&root).iter().filter(|k| **k == SWITCH_LABEL).count(), 4);
    }

    #[test]
    fn test_anonymous_class_and_array_init() {
        let root = parse_source(
            "class A { Runnable r = new Runnable() { public void run() { } }; int[] xs = {1, 2}; int[][] m = new int[][] {{1}, {2}}; }",
        )
        .unwrap();
        let kinds = kinds(&root);
        assert_eq!(kinds.iter().filter(|k| **k == CLASS_BODY).count(), 2);
        assert_eq!(kinds.iter().filter(|k| **k == ARRAY_INIT).count(), 4);
    }

    #[test]
    fn test_generics_close_with_single_gt() {
        let root = parse_source("class A { Map<String, List<Integer>> m = new HashMap<>(); }").unwrap();
        assert_eq!(names_under(&root, VARIABLE_DECLARATOR), vec!["m"]);
    }

    #[test]
    fn test_missing_close_brace() {
        let err = parse_source("class A {\n  void f() {\n  }\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Syntax { .. }));
    }

    #[test]
    fn test_extra_close_brace() {
        let err = parse_source("class A { }\n}\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_lex_error_passes_through() {
        let err = parse_source("class A { String s = \"open; }").unwrap_err();
        assert!(matches!(err, AnalysisError::Lex { .. }));
    }

    #[test]
    fn test_deep_nesting_is_an_error_not_a_crash() {
        let source = format!("class A {{ int x = {}1{}; }}", "(".repeat(400), ")".repeat(400));
        assert!(parse_source(&source).is_err());
    }
}
