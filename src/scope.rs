// Copyright (c) 2025 Brian G. Milnes
// SPDX-License-Identifier: MIT

//! Syntax scope model
//!
//! Built by a single preorder walk over the syntax tree. The walk opens a
//! scope for every brace-delimited node, gives declared names their identifier
//! role, and collects each declaration's modifiers and annotations. Modifiers
//! are buffered per declaration node, keyed by the node itself, and flushed onto
//! the declared names when the walk leaves that node, so the order in which
//! names and modifiers are visited does not matter.
//!
//! `SyntaxModelBuilder::finish` hands out the immutable `SyntaxModel`; nothing
//! is observable before that.

use std::collections::{HashMap, HashSet};

use rowan::{NodeOrToken, WalkEvent};
use serde::Serialize;

use crate::error::AnalysisError;
use crate::lexer::JavaToken;
use crate::syntax::{SyntaxKind, SyntaxKind::*, SyntaxNode, SyntaxToken};
use crate::token::{
    apply_modifier, AccessModifiers, Classification, OtherModifiers, SemanticType,
};
use crate::token_index::TokenIndex;

pub type ScopeId = usize;

/// The implicit scope covering the whole file
pub const FILE_SCOPE: ScopeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScopeKind {
    File,
    TypeBody,
    Block,
    SwitchBlock,
    ArrayInitializer,
    ModuleBody,
}

impl ScopeKind {
    fn of(kind: SyntaxKind) -> ScopeKind {
        match kind {
            CLASS_BODY | ENUM_BODY => ScopeKind::TypeBody,
            SWITCH_BLOCK => ScopeKind::SwitchBlock,
            ARRAY_INIT => ScopeKind::ArrayInitializer,
            MODULE_BODY => ScopeKind::ModuleBody,
            _ => ScopeKind::Block,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub depth: usize,
    pub kind: ScopeKind,
    /// Global index of `{`
    pub open: Option<usize>,
    /// Global index of `}`
    pub close: Option<usize>,
    /// `{` and `}` sit on the same line
    pub one_line: bool,
}

impl Scope {
    /// `{}` with nothing between the braces
    pub fn is_empty(&self) -> bool {
        matches!((self.open, self.close), (Some(open), Some(close)) if close == open + 1)
    }
}

/// What the format rules need to know about where a token sits
#[derive(Debug, Clone, Copy)]
pub struct SyntaxContext<'a> {
    pub scope: &'a Scope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    Class,
    Interface,
    Enum,
    Record,
    AnnotationType,
    Constructor,
    Method,
    Field,
    EnumConstant,
}

impl DeclarationKind {
    fn of(kind: SyntaxKind) -> Option<DeclarationKind> {
        let kind = match kind {
            CLASS_DECL => DeclarationKind::Class,
            INTERFACE_DECL => DeclarationKind::Interface,
            ENUM_DECL => DeclarationKind::Enum,
            RECORD_DECL => DeclarationKind::Record,
            ANNOTATION_TYPE_DECL => DeclarationKind::AnnotationType,
            CONSTRUCTOR_DECL => DeclarationKind::Constructor,
            METHOD_DECL => DeclarationKind::Method,
            FIELD_DECL => DeclarationKind::Field,
            ENUM_CONSTANT => DeclarationKind::EnumConstant,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Class
                | DeclarationKind::Interface
                | DeclarationKind::Enum
                | DeclarationKind::Record
                | DeclarationKind::AnnotationType
        )
    }

    pub fn is_executable(&self) -> bool {
        matches!(self, DeclarationKind::Constructor | DeclarationKind::Method)
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, DeclarationKind::Field | DeclarationKind::EnumConstant)
    }
}

/// Facts recorded for a declared type or member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    pub name_token: usize,
    /// First code token of the declaration, modifiers included
    pub first_token: usize,
    pub params: Vec<String>,
    pub type_params: Vec<String>,
    /// Methods only
    pub return_type: Option<String>,
    pub throws: Vec<String>,
    pub record_components: Vec<String>,
}

impl Declaration {
    pub fn returns_void(&self) -> bool {
        self.return_type.as_deref() == Some("void")
    }
}

#[derive(Debug, Default)]
struct PendingDeclaration {
    first_token: Option<usize>,
    access: AccessModifiers,
    other: OtherModifiers,
    annotations: Vec<String>,
    names: Vec<(usize, SemanticType)>,
}

/// Nodes that own a pending buffer
fn is_declaration_node(kind: SyntaxKind) -> bool {
    kind.is_type_declaration()
        || matches!(
            kind,
            METHOD_DECL
                | CONSTRUCTOR_DECL
                | FIELD_DECL
                | ENUM_CONSTANT
                | PARAM
                | LOCAL_VAR_DECL
                | FOR_INIT
                | RESOURCE
                | PATTERN_BINDING
        )
}

/// Owning declaration node and role of a `NAME` node
fn name_role(name: &SyntaxNode) -> Option<(SyntaxNode, SemanticType)> {
    let parent = name.parent()?;
    let role = match parent.kind() {
        CLASS_DECL => SemanticType::ClassName,
        INTERFACE_DECL => SemanticType::InterfaceName,
        ENUM_DECL => SemanticType::EnumName,
        RECORD_DECL => SemanticType::RecordName,
        ANNOTATION_TYPE_DECL => SemanticType::AnnotationName,
        CONSTRUCTOR_DECL => SemanticType::ConstructorName,
        METHOD_DECL => SemanticType::MethodName,
        ENUM_CONSTANT => SemanticType::FieldName,
        PARAM => SemanticType::ParameterName,
        RESOURCE | PATTERN_BINDING => SemanticType::VariableName,
        VARIABLE_DECLARATOR => {
            let owner = parent.parent()?;
            let role = match owner.kind() {
                FIELD_DECL => SemanticType::FieldName,
                LOCAL_VAR_DECL => SemanticType::VariableName,
                FOR_INIT => SemanticType::ForVariableName,
                _ => return None,
            };
            return Some((owner, role));
        }
        // Type parameters get no role
        _ => return None,
    };
    Some((parent, role))
}

/// Enum constants and interface fields are implicitly `public static final`
fn is_implicit_constant(node: &SyntaxNode) -> bool {
    match node.kind() {
        ENUM_CONSTANT => true,
        FIELD_DECL => node
            .parent()
            .filter(|body| body.kind() == CLASS_BODY)
            .and_then(|body| body.parent())
            .is_some_and(|owner| matches!(owner.kind(), INTERFACE_DECL | ANNOTATION_TYPE_DECL)),
        _ => false,
    }
}

fn is_trivia(kind: SyntaxKind) -> bool {
    matches!(kind, WHITESPACE | NEWLINE | COMMENT | DOC_COMMENT)
}

/// Node text without trivia, e.g. `Map<K,V>`
fn compact_text(node: &SyntaxNode) -> String {
    node.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !is_trivia(token.kind()))
        .map(|token| token.text().to_string())
        .collect()
}

/// `@a.b.Name(...)` -> `a.b.Name`
fn annotation_name(node: &SyntaxNode) -> String {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !is_trivia(token.kind()) && token.kind() != AT)
        .take_while(|token| token.kind() != L_PAREN)
        .map(|token| token.text().to_string())
        .collect()
}

/// Declaration node whose modifier list holds `node`
fn modifiers_owner(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.parent()
        .filter(|parent| parent.kind() == MODIFIERS)
        .and_then(|modifiers| modifiers.parent())
}

/// A statement of the form `label: ...`
fn is_labeled_statement(node: &SyntaxNode) -> bool {
    node.kind() == STATEMENT
        && node
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| !is_trivia(token.kind()))
            .is_some_and(|token| token.kind() == IDENT)
}

/// Punctuation that the lexer types as an operator but the tree shows is not
fn refine_punctuation(lexer_type: JavaToken, parent: &SyntaxNode) -> Option<SemanticType> {
    match lexer_type {
        JavaToken::Lt | JavaToken::Gt | JavaToken::Question | JavaToken::BitAnd
            if matches!(parent.kind(), TYPE_ARGS | TYPE_PARAMS | TYPE_PARAM) =>
        {
            Some(SemanticType::Other)
        }
        JavaToken::BitAnd if parent.kind() == CAST => Some(SemanticType::Other),
        JavaToken::Colon if parent.kind() == SWITCH_LABEL || is_labeled_statement(parent) => {
            Some(SemanticType::Other)
        }
        _ => None,
    }
}

fn declaration_facts(
    node: &SyntaxNode,
    kind: DeclarationKind,
    name: String,
    name_token: usize,
    first_token: usize,
) -> Declaration {
    let child = |wanted: SyntaxKind| node.children().find(|c| c.kind() == wanted);
    let names_in = |list: Option<SyntaxNode>, item: SyntaxKind| -> Vec<String> {
        list.map(|list| {
            list.children()
                .filter(|c| c.kind() == item)
                .filter_map(|c| c.children().find(|n| n.kind() == NAME))
                .map(|n| n.text().to_string())
                .collect()
        })
        .unwrap_or_default()
    };

    let params = names_in(child(PARAM_LIST), PARAM);
    let (params, record_components) = if kind == DeclarationKind::Record {
        (Vec::new(), params)
    } else {
        (params, Vec::new())
    };
    let return_type = if kind == DeclarationKind::Method {
        child(TYPE).map(|t| compact_text(&t))
    } else {
        None
    };
    let throws = child(THROWS_CLAUSE)
        .map(|clause| {
            clause
                .children()
                .filter(|c| c.kind() == TYPE)
                .map(|c| compact_text(&c))
                .collect()
        })
        .unwrap_or_default();

    Declaration {
        kind,
        name,
        name_token,
        first_token,
        params,
        type_params: names_in(child(TYPE_PARAMS), TYPE_PARAM),
        return_type,
        throws,
        record_components,
    }
}

fn invariant(message: impl Into<String>) -> AnalysisError {
    AnalysisError::Invariant(message.into())
}

/// Walks a syntax tree once and collects the scope model
pub struct SyntaxModelBuilder<'a> {
    index: &'a TokenIndex,
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
    token_scopes: Vec<ScopeId>,
    classifications: Vec<Classification>,
    pending: HashMap<SyntaxNode, PendingDeclaration>,
    awaiting_declarations: Vec<SyntaxNode>,
    awaiting_scopes: Vec<ScopeId>,
    last_code: Option<usize>,
    declarations: Vec<Declaration>,
    walked: bool,
}

impl<'a> SyntaxModelBuilder<'a> {
    pub fn new(index: &'a TokenIndex) -> Self {
        let classifications = index
            .tokens()
            .map(|token| match token.code() {
                Some(code) => Classification::coarse(code.coarse),
                None => Classification::default(),
            })
            .collect();
        SyntaxModelBuilder {
            index,
            scopes: vec![Scope {
                id: FILE_SCOPE,
                parent: None,
                depth: 0,
                kind: ScopeKind::File,
                open: None,
                close: None,
                one_line: false,
            }],
            stack: vec![FILE_SCOPE],
            token_scopes: vec![FILE_SCOPE; index.count()],
            classifications,
            pending: HashMap::new(),
            awaiting_declarations: Vec::new(),
            awaiting_scopes: Vec::new(),
            last_code: None,
            declarations: Vec::new(),
            walked: false,
        }
    }

    fn current_scope(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(FILE_SCOPE)
    }

    /// The one walk over the tree
    pub fn walk(&mut self, root: &SyntaxNode) -> Result<(), AnalysisError> {
        if self.walked {
            return Err(invariant("syntax tree walked twice"));
        }
        self.walked = true;

        let mut lexeme = 0;
        for event in root.preorder_with_tokens() {
            match event {
                WalkEvent::Enter(NodeOrToken::Node(node)) => self.enter_node(node),
                WalkEvent::Leave(NodeOrToken::Node(node)) => self.leave_node(node)?,
                WalkEvent::Enter(NodeOrToken::Token(token)) => {
                    self.visit_token(&token, lexeme)?;
                    lexeme += 1;
                }
                WalkEvent::Leave(NodeOrToken::Token(_)) => {}
            }
        }
        if !self.pending.is_empty() {
            return Err(invariant("declarations left open after the walk"));
        }
        if self.stack.len() != 1 {
            return Err(invariant("scopes left open after the walk"));
        }
        Ok(())
    }

    fn pending_for(&mut self, owner: &SyntaxNode) -> Result<&mut PendingDeclaration, AnalysisError> {
        self.pending
            .get_mut(owner)
            .ok_or_else(|| invariant(format!("no declaration in progress for {:?}", owner.kind())))
    }

    fn enter_node(&mut self, node: SyntaxNode) {
        let kind = node.kind();
        if kind.is_braced() {
            let id = self.scopes.len();
            self.scopes.push(Scope {
                id,
                parent: Some(self.current_scope()),
                depth: self.stack.len(),
                kind: ScopeKind::of(kind),
                open: None,
                close: None,
                one_line: false,
            });
            self.stack.push(id);
            self.awaiting_scopes.push(id);
        }
        if kind == ANNOTATION {
            // Package and module annotations have no pending declaration
            if let Some(pending) = modifiers_owner(&node).and_then(|owner| self.pending.get_mut(&owner)) {
                pending.annotations.push(annotation_name(&node));
            }
        }
        if is_declaration_node(kind) {
            self.pending.insert(node.clone(), PendingDeclaration::default());
            self.awaiting_declarations.push(node);
        }
    }

    fn visit_token(&mut self, token: &SyntaxToken, lexeme: usize) -> Result<(), AnalysisError> {
        let index = self.index;
        let Some(global) = index.token_for_lexeme(lexeme) else {
            if token.kind() != NEWLINE && !token.text().is_empty() {
                return Err(invariant(format!("tree token '{}' has no index entry", token.text())));
            }
            return Ok(());
        };
        let indexed = index.at(global)?;
        if indexed.text != token.text() {
            return Err(invariant(format!(
                "tree token '{}' does not match indexed token '{}'",
                token.text(),
                indexed.text
            )));
        }
        self.token_scopes[global] = self.current_scope();

        let Some(code) = indexed.code() else {
            return Ok(());
        };
        for node in self.awaiting_declarations.drain(..) {
            if let Some(pending) = self.pending.get_mut(&node) {
                pending.first_token.get_or_insert(global);
            }
        }
        for id in self.awaiting_scopes.drain(..) {
            self.scopes[id].open = Some(global);
        }
        self.last_code = Some(global);

        let Some(parent) = token.parent() else {
            return Ok(());
        };
        match parent.kind() {
            NAME => {
                if let Some((owner, role)) = name_role(&parent) {
                    self.pending_for(&owner)?.names.push((global, role));
                }
            }
            MODIFIERS => {
                let owner = parent.parent();
                let pending = owner.and_then(|owner| self.pending.get_mut(&owner));
                if let (JavaToken::Keyword(kw), Some(pending)) = (code.lexer_type, pending) {
                    apply_modifier(kw, &mut pending.access, &mut pending.other);
                }
            }
            _ => {
                if let Some(refined) = refine_punctuation(code.lexer_type, &parent) {
                    self.classifications[global].semantic_type = refined;
                }
            }
        }
        Ok(())
    }

    fn leave_node(&mut self, node: SyntaxNode) -> Result<(), AnalysisError> {
        if let Some(pending) = self.pending.remove(&node) {
            self.flush(&node, pending)?;
        }
        if node.kind().is_braced() {
            let index = self.index;
            let id = match self.stack.pop() {
                Some(id) if id != FILE_SCOPE => id,
                _ => return Err(invariant("scope stack underflow")),
            };
            let scope = &mut self.scopes[id];
            scope.close = self.last_code;
            let (Some(open), Some(close)) = (scope.open, scope.close) else {
                return Err(invariant("brace scope without braces"));
            };
            scope.one_line = index.at(open)?.line == index.at(close)?.line;
        }
        Ok(())
    }

    /// Write the buffered modifiers onto the declared names
    fn flush(&mut self, node: &SyntaxNode, pending: PendingDeclaration) -> Result<(), AnalysisError> {
        let mut access = pending.access;
        let mut other = pending.other;
        if is_implicit_constant(node) {
            access.insert(AccessModifiers::PUBLIC);
            other.insert(OtherModifiers::STATIC | OtherModifiers::FINAL);
        }
        for &(global, role) in &pending.names {
            self.classifications[global] = Classification {
                semantic_type: role,
                access,
                other,
                annotations: pending.annotations.clone(),
            };
        }

        if let Some(kind) = DeclarationKind::of(node.kind()) {
            let first_token = pending
                .first_token
                .ok_or_else(|| invariant("declaration without tokens"))?;
            for &(name_token, _) in &pending.names {
                let name = self.index.at(name_token)?.text.clone();
                self.declarations
                    .push(declaration_facts(node, kind, name, name_token, first_token));
            }
        }
        Ok(())
    }

    /// Seal the model
    pub fn finish(mut self) -> Result<SyntaxModel, AnalysisError> {
        if !self.walked {
            return Err(invariant("scope model finished before the tree was walked"));
        }
        self.declarations.sort_by_key(|d| (d.first_token, d.name_token));

        let mut by_first_token = HashMap::new();
        for (position, declaration) in self.declarations.iter().enumerate() {
            by_first_token.entry(declaration.first_token).or_insert(position);
        }

        // An empty line belongs where the preceding token is
        let mut line_scopes = Vec::with_capacity(self.index.lines().len());
        let mut carried = FILE_SCOPE;
        for line in self.index.lines() {
            if let Some(first) = line.tokens.clone().next() {
                carried = self.token_scopes[first];
                line_scopes.push(carried);
                carried = self.token_scopes[line.tokens.end - 1];
            } else {
                line_scopes.push(carried);
            }
        }

        Ok(SyntaxModel {
            scopes: self.scopes,
            token_scopes: self.token_scopes,
            line_scopes,
            classifications: self.classifications,
            declarations: self.declarations,
            by_first_token,
        })
    }
}

/// Scopes, final classifications and declarations of one file
#[derive(Debug, Clone)]
pub struct SyntaxModel {
    scopes: Vec<Scope>,
    token_scopes: Vec<ScopeId>,
    line_scopes: Vec<ScopeId>,
    classifications: Vec<Classification>,
    declarations: Vec<Declaration>,
    by_first_token: HashMap<usize, usize>,
}

impl SyntaxModel {
    /// Walk `root` and build the model in one go
    pub fn build(index: &TokenIndex, root: &SyntaxNode) -> Result<SyntaxModel, AnalysisError> {
        let mut builder = SyntaxModelBuilder::new(index);
        builder.walk(root)?;
        builder.finish()
    }

    fn out_of_range(&self, index: usize) -> AnalysisError {
        AnalysisError::OutOfRange { index, count: self.token_scopes.len() }
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// Innermost scope holding a token
    pub fn scope_of(&self, global: usize) -> Result<&Scope, AnalysisError> {
        let id = *self.token_scopes.get(global).ok_or_else(|| self.out_of_range(global))?;
        Ok(&self.scopes[id])
    }

    pub fn context_of(&self, global: usize) -> Result<SyntaxContext<'_>, AnalysisError> {
        Ok(SyntaxContext { scope: self.scope_of(global)? })
    }

    pub fn context_of_line(&self, line: usize) -> Option<SyntaxContext<'_>> {
        let id = *self.line_scopes.get(line.checked_sub(1)?)?;
        Some(SyntaxContext { scope: &self.scopes[id] })
    }

    pub fn classification(&self, global: usize) -> Result<&Classification, AnalysisError> {
        self.classifications
            .get(global)
            .ok_or_else(|| self.out_of_range(global))
    }

    /// Declaration whose first token is `first_token`
    pub fn declaration_at(&self, first_token: usize) -> Option<&Declaration> {
        self.by_first_token
            .get(&first_token)
            .map(|&position| &self.declarations[position])
    }

    /// Every declaration, in file order
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Names of methods, constructors, fields and enum constants
    pub fn member_names(&self) -> HashSet<&str> {
        self.declarations
            .iter()
            .filter(|d| !d.kind.is_type())
            .map(|d| d.name.as_str())
            .collect()
    }
}
