//! Tree-walking evaluator for Reel scripts.
//!
//! Walks the flat expression arena built by the front end and produces a
//! single [`Value`], usually the clip the script's pipeline ends on. All
//! mutable state during a run lives behind the [`Environment`] trait; the
//! evaluator itself holds only borrows of the arena and interner plus a
//! recursion counter.
//!
//! # Architecture
//!
//! - [`value`]: the runtime value model (`Value`, `Clip`, `Heap`)
//! - [`errors`]: `EvalError` with typed kinds, plus the `Control` signal
//!   enum that replaces unwinding for `break`/`return`
//! - [`operators`]: per-operator type rules and computation
//! - [`exec`]: the `Evaluator` and one evaluation rule per node
//! - [`environment`]: the host-side collaborator boundary
//!
//! ```text
//!  script text ──(front end)──▶ ExprArena ──▶ Evaluator::evaluate ──▶ Value
//!                                                  │
//!                                           dyn Environment
//!                                  (variables, functions, splicing)
//! ```

mod environment;
pub mod errors;
pub mod exec;
mod operators;
mod stack;
mod value;

pub use environment::{Environment, InvokeError};
pub use errors::{
    division_by_zero, host_fault, integer_overflow, invalid_arguments, no_such_function,
    recursion_limit, script_error, stray_break, type_error, unknown_name, Control, EvalError,
    EvalErrorKind, EvalOutcome, EvalResult,
};
pub use exec::{Evaluator, MAX_RECURSION_DEPTH};
pub use operators::{evaluate_binary, evaluate_unary};
pub use stack::ensure_sufficient_stack;
pub use value::{Clip, Heap, Value};

#[cfg(test)]
mod tests;
