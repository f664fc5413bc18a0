//! Brisk IR: the syntax tree consumed by the evaluator.
//!
//! This crate contains:
//! - [`Span`] source locations carried by every node
//! - [`Name`] cheap, shareable identifiers
//! - [`Construct`], the closed tagged-variant syntax tree
//! - [`unescape`] for string literals, applied once at construction
//! - [`Construct::dump`], an indented tree dump for debugging
//! - [`build`], constructor helpers used by front-ends and tests
//!
//! The tree is produced by an external parser. Nodes own their children;
//! function declarations are reference counted so function values can keep
//! their body alive after the surrounding tree is dropped.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
pub mod build;
mod dump;
mod name;
mod ops;
mod span;
mod unescape;

pub use ast::{
    Assignment, CatchClause, Construct, ConstructKind, DeclKind, ExprList, Foreach, FuncDecl,
    TryCatch,
};
pub use name::Name;
pub use ops::{AssignOp, BinaryOp, UnaryOp};
pub use span::Span;
pub use unescape::{escape, unescape};
