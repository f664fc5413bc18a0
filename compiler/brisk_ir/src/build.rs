//! Constructors for syntax trees.
//!
//! Front-ends that already know the shape of a node, and tests that stand in
//! for a parser, build trees with these helpers instead of spelling out every
//! `Construct` literal. All nodes get [`Span::DUMMY`]; use
//! [`Construct::with_span`] where a location matters.

#![allow(clippy::disallowed_types, reason = "Rc wraps function declarations")]

use std::rc::Rc;

use crate::ast::{Assignment, CatchClause, Construct, ConstructKind, DeclKind, ExprList};
use crate::ast::{Foreach, FuncDecl, TryCatch};
use crate::{AssignOp, BinaryOp, Name, Span, UnaryOp};

fn node(kind: ConstructKind) -> Construct {
    Construct::new(kind, Span::DUMMY)
}

fn names(list: &[&str]) -> Vec<Name> {
    list.iter().map(|n| Name::new(n)).collect()
}

pub fn int(v: i64) -> Construct {
    node(ConstructKind::Int(v))
}

pub fn float(v: f64) -> Construct {
    node(ConstructKind::Float(v))
}

/// String literal from source text (escape sequences are resolved).
pub fn string(raw: &str) -> Construct {
    Construct::string_literal(raw, Span::DUMMY)
}

pub fn none() -> Construct {
    node(ConstructKind::None)
}

pub fn ident(name: &str) -> Construct {
    node(ConstructKind::Identifier(Name::new(name)))
}

pub fn array(items: Vec<Construct>) -> Construct {
    node(ConstructKind::Array(items))
}

pub fn dict(pairs: Vec<(Construct, Construct)>) -> Construct {
    node(ConstructKind::Dict(pairs))
}

pub fn member(target: Construct, name: &str) -> Construct {
    node(ConstructKind::Member {
        target: Box::new(target),
        member: Name::new(name),
    })
}

pub fn subscript(target: Construct, index: Construct) -> Construct {
    node(ConstructKind::Subscript {
        target: Box::new(target),
        index: Box::new(index),
    })
}

pub fn slice(target: Construct, start: Option<Construct>, end: Option<Construct>) -> Construct {
    node(ConstructKind::Slice {
        target: Box::new(target),
        start: start.map(Box::new),
        end: end.map(Box::new),
    })
}

/// Call of a named function or builtin.
pub fn call(name: &str, args: Vec<Construct>) -> Construct {
    call_expr(ident(name), args)
}

pub fn call_expr(callee: Construct, args: Vec<Construct>) -> Construct {
    node(ConstructKind::Call {
        callee: Box::new(callee),
        args: ExprList::new(args, Span::DUMMY),
    })
}

pub fn unary(op: UnaryOp, operand: Construct) -> Construct {
    node(ConstructKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn binary(first: Construct, rest: Vec<(BinaryOp, Construct)>) -> Construct {
    node(ConstructKind::BinaryChain {
        first: Box::new(first),
        rest,
    })
}

/// Two-operand chain.
pub fn bin(lhs: Construct, op: BinaryOp, rhs: Construct) -> Construct {
    binary(lhs, vec![(op, rhs)])
}

fn assignment(
    decl: Option<DeclKind>,
    op: AssignOp,
    targets: Vec<Construct>,
    value: Construct,
) -> Construct {
    node(ConstructKind::Assign(Box::new(Assignment {
        decl,
        op,
        targets,
        value,
    })))
}

/// `var name = value`
pub fn var(name: &str, value: Construct) -> Construct {
    assignment(Some(DeclKind::Var), AssignOp::Assign, vec![ident(name)], value)
}

/// `const name = value`
pub fn const_(name: &str, value: Construct) -> Construct {
    assignment(Some(DeclKind::Const), AssignOp::Assign, vec![ident(name)], value)
}

/// `var a, b, ... = value`
pub fn var_multi(names: &[&str], value: Construct) -> Construct {
    let targets = names.iter().map(|n| ident(n)).collect();
    assignment(Some(DeclKind::Var), AssignOp::Assign, targets, value)
}

/// `target = value`
pub fn assign(target: Construct, value: Construct) -> Construct {
    assignment(None, AssignOp::Assign, vec![target], value)
}

/// `target op= value`
pub fn assign_op(target: Construct, op: AssignOp, value: Construct) -> Construct {
    assignment(None, op, vec![target], value)
}

/// `t1, t2, ... = value`
pub fn assign_multi(targets: Vec<Construct>, value: Construct) -> Construct {
    assignment(None, AssignOp::Assign, targets, value)
}

pub fn block(stmts: Vec<Construct>) -> Construct {
    node(ConstructKind::Block(stmts))
}

pub fn if_(cond: Construct, then_branch: Construct, else_branch: Option<Construct>) -> Construct {
    node(ConstructKind::If {
        cond: Box::new(cond),
        then_branch: Box::new(then_branch),
        else_branch: else_branch.map(Box::new),
    })
}

pub fn while_(cond: Construct, body: Construct) -> Construct {
    node(ConstructKind::While {
        cond: Box::new(cond),
        body: Box::new(body),
    })
}

fn foreach_node(ids: &[&str], decl: bool, indexed: bool, container: Construct, body: Construct) -> Construct {
    node(ConstructKind::Foreach(Box::new(Foreach {
        decl,
        indexed,
        ids: names(ids),
        container,
        body,
    })))
}

/// `foreach (var ids... in container) body`
pub fn foreach(ids: &[&str], container: Construct, body: Construct) -> Construct {
    foreach_node(ids, true, false, container, body)
}

/// `foreach (var index, ids... in container) body`
pub fn foreach_indexed(ids: &[&str], container: Construct, body: Construct) -> Construct {
    foreach_node(ids, true, true, container, body)
}

/// `foreach (ids... in container) body`, assigning existing bindings.
pub fn foreach_assign(ids: &[&str], container: Construct, body: Construct) -> Construct {
    foreach_node(ids, false, false, container, body)
}

pub fn brk() -> Construct {
    node(ConstructKind::Break)
}

pub fn cont() -> Construct {
    node(ConstructKind::Continue)
}

pub fn ret(value: Construct) -> Construct {
    node(ConstructKind::Return(Some(Box::new(value))))
}

pub fn ret_none() -> Construct {
    node(ConstructKind::Return(None))
}

pub fn throw(value: Construct) -> Construct {
    node(ConstructKind::Throw(Box::new(value)))
}

pub fn rethrow() -> Construct {
    node(ConstructKind::Rethrow)
}

pub fn try_catch(body: Construct, catches: Vec<CatchClause>, finally: Option<Construct>) -> Construct {
    node(ConstructKind::TryCatch(Box::new(TryCatch {
        body,
        catches,
        finally,
    })))
}

/// `catch body`: handles everything, binds nothing.
pub fn catch_all(body: Construct) -> CatchClause {
    CatchClause {
        filter: Vec::new(),
        binding: None,
        body,
        span: Span::DUMMY,
    }
}

/// `catch (Ex1, Ex2) body`
pub fn catch(filter: &[&str], body: Construct) -> CatchClause {
    CatchClause {
        filter: names(filter),
        binding: None,
        body,
        span: Span::DUMMY,
    }
}

/// `catch (Ex1, Ex2 as name) body`
pub fn catch_as(filter: &[&str], binding: &str, body: Construct) -> CatchClause {
    CatchClause {
        filter: names(filter),
        binding: Some(Name::new(binding)),
        body,
        span: Span::DUMMY,
    }
}

fn func_node(
    name: Option<&str>,
    captures: Option<&[&str]>,
    params: &[&str],
    body: Construct,
    is_pure: bool,
) -> Construct {
    node(ConstructKind::FuncDecl(Rc::new(FuncDecl {
        name: name.map(Name::new),
        params: names(params),
        captures: captures.map(names),
        body,
        is_pure,
    })))
}

/// `func name(params) body`
pub fn func(name: &str, params: &[&str], body: Construct) -> Construct {
    func_node(Some(name), None, params, body, false)
}

/// `pure func name(params) body`
pub fn pure_func(name: &str, params: &[&str], body: Construct) -> Construct {
    func_node(Some(name), None, params, body, true)
}

/// Anonymous `func (params) body`.
pub fn lambda(params: &[&str], body: Construct) -> Construct {
    func_node(None, None, params, body, false)
}

/// Anonymous `func [captures] (params) body`.
pub fn capturing_lambda(captures: &[&str], params: &[&str], body: Construct) -> Construct {
    func_node(None, Some(captures), params, body, false)
}
