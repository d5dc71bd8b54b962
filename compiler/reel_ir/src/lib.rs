//! Reel IR - Expression tree for the Reel evaluation core.
//!
//! This crate holds the data the parser produces and the evaluator walks:
//!
//! - `Expr`: the expression node variants (pure data, no behavior)
//! - `ExprArena`: flat contiguous storage, children referenced by `ExprId`
//! - `Name` / `StringInterner`: compact interned identifiers
//! - `BinaryOp` / `UnaryOp`: operator tags with source-level symbols
//!
//! Nodes are constructed once by the parser and never mutated; the arena
//! lives at least as long as the running script.

mod arena;
mod expr;
mod expr_id;
mod interner;
mod name;
mod operators;

pub use arena::ExprArena;
pub use expr::{CallArg, Expr};
pub use expr_id::{CallArgRange, ExprId};
pub use interner::StringInterner;
pub use name::Name;
pub use operators::{BinaryOp, UnaryOp};
