//! Syntax tree nodes.
//!
//! Every node is a [`Construct`]: a [`ConstructKind`] plus the [`Span`] of the
//! source text it was parsed from. The set of kinds is closed; the evaluator
//! dispatches on it with a single `match`.
//!
//! String literals are unescaped once, when the node is built, so evaluation
//! never re-scans escape sequences.

#![allow(clippy::disallowed_types, reason = "Rc shares literal text and function bodies")]

use std::rc::Rc;

use crate::{unescape, AssignOp, BinaryOp, Name, Span, UnaryOp};

/// A syntax tree node.
#[derive(Clone, Debug)]
pub struct Construct {
    pub kind: ConstructKind,
    pub span: Span,
}

/// The closed set of node kinds.
#[derive(Clone, Debug)]
pub enum ConstructKind {
    Int(i64),
    Float(f64),
    /// Unescaped string literal text.
    Str(Rc<str>),
    None,
    Array(Vec<Construct>),
    Dict(Vec<(Construct, Construct)>),
    Identifier(Name),

    /// `target.member`
    Member {
        target: Box<Construct>,
        member: Name,
    },
    /// `target[index]`
    Subscript {
        target: Box<Construct>,
        index: Box<Construct>,
    },
    /// `target[start:end]`, either bound optional.
    Slice {
        target: Box<Construct>,
        start: Option<Box<Construct>>,
        end: Option<Box<Construct>>,
    },
    Call {
        callee: Box<Construct>,
        args: ExprList,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Construct>,
    },
    /// `first op1 e1 op2 e2 ...` at a single precedence level, applied left to right.
    BinaryChain {
        first: Box<Construct>,
        rest: Vec<(BinaryOp, Construct)>,
    },
    Assign(Box<Assignment>),

    Block(Vec<Construct>),
    If {
        cond: Box<Construct>,
        then_branch: Box<Construct>,
        else_branch: Option<Box<Construct>>,
    },
    While {
        cond: Box<Construct>,
        body: Box<Construct>,
    },
    Foreach(Box<Foreach>),
    Break,
    Continue,
    Return(Option<Box<Construct>>),
    Throw(Box<Construct>),
    /// Re-raise the error caught by the enclosing catch clause.
    Rethrow,
    TryCatch(Box<TryCatch>),
    FuncDecl(Rc<FuncDecl>),
}

/// Parenthesized argument list, with the span of the whole list.
#[derive(Clone, Debug, Default)]
pub struct ExprList {
    pub items: Vec<Construct>,
    pub span: Span,
}

impl ExprList {
    pub fn new(items: Vec<Construct>, span: Span) -> Self {
        ExprList { items, span }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Declaration keyword in front of an assignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Const,
}

/// `[var|const] t1, t2, ... op value`
///
/// More than one target destructures an array value; see the evaluator.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub decl: Option<DeclKind>,
    pub op: AssignOp,
    pub targets: Vec<Construct>,
    pub value: Construct,
}

/// `foreach ([var] [index,] ids... in container) body`
#[derive(Clone, Debug)]
pub struct Foreach {
    /// Identifiers are declared in a fresh loop scope instead of assigned.
    pub decl: bool,
    /// The first identifier receives the iteration index.
    pub indexed: bool,
    pub ids: Vec<Name>,
    pub container: Construct,
    pub body: Construct,
}

#[derive(Clone, Debug)]
pub struct TryCatch {
    pub body: Construct,
    pub catches: Vec<CatchClause>,
    pub finally: Option<Construct>,
}

/// `catch [(Ex1, Ex2 [as name])] body`
#[derive(Clone, Debug)]
pub struct CatchClause {
    /// Exception names this clause handles. Empty handles everything.
    pub filter: Vec<Name>,
    pub binding: Option<Name>,
    pub body: Construct,
    pub span: Span,
}

impl CatchClause {
    pub fn matches(&self, exception_name: &str) -> bool {
        self.filter.is_empty() || self.filter.iter().any(|n| n.as_str() == exception_name)
    }
}

/// `[pure] func [name] [[captures]] (params) body`
#[derive(Clone, Debug)]
pub struct FuncDecl {
    pub name: Option<Name>,
    pub params: Vec<Name>,
    /// Explicit capture list. `None` closes over the whole declaring scope chain.
    pub captures: Option<Vec<Name>>,
    pub body: Construct,
    pub is_pure: bool,
}

impl Construct {
    #[inline]
    pub fn new(kind: ConstructKind, span: Span) -> Self {
        Construct { kind, span }
    }

    /// String literal from its source text; escape sequences are resolved here.
    pub fn string_literal(raw: &str, span: Span) -> Self {
        Construct::new(ConstructKind::Str(Rc::from(unescape(raw))), span)
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn as_identifier(&self) -> Option<&Name> {
        match &self.kind {
            ConstructKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Node name used by [`Construct::dump`].
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ConstructKind::Int(_) => "Int",
            ConstructKind::Float(_) => "Float",
            ConstructKind::Str(_) => "Str",
            ConstructKind::None => "None",
            ConstructKind::Array(_) => "Array",
            ConstructKind::Dict(_) => "Dict",
            ConstructKind::Identifier(_) => "Id",
            ConstructKind::Member { .. } => "Member",
            ConstructKind::Subscript { .. } => "Subscript",
            ConstructKind::Slice { .. } => "Slice",
            ConstructKind::Call { .. } => "Call",
            ConstructKind::Unary { .. } => "Unary",
            ConstructKind::BinaryChain { .. } => "MultiOp",
            ConstructKind::Assign(_) => "Assign",
            ConstructKind::Block(_) => "Block",
            ConstructKind::If { .. } => "If",
            ConstructKind::While { .. } => "While",
            ConstructKind::Foreach(_) => "Foreach",
            ConstructKind::Break => "Break",
            ConstructKind::Continue => "Continue",
            ConstructKind::Return(_) => "Return",
            ConstructKind::Throw(_) => "Throw",
            ConstructKind::Rethrow => "Rethrow",
            ConstructKind::TryCatch(_) => "TryCatch",
            ConstructKind::FuncDecl(_) => "FuncDecl",
        }
    }
}
