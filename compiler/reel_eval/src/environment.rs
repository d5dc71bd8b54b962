//! The environment collaborator boundary.
//!
//! The environment is the single source of mutable state during
//! evaluation: variable scopes, the function registry, and the clip
//! splicing primitive all live behind this trait. The core never inspects
//! scope internals — name resolution and dispatch are pure functions of
//! (node, environment view), which is what keeps them testable against a
//! fake.

use reel_ir::Name;

use crate::{Clip, EvalError, Value};

/// Outcome of a failed `Environment::invoke`.
#[derive(Clone, Debug, PartialEq)]
pub enum InvokeError {
    /// No function named this matches this arity/signature.
    ///
    /// Drives calling-convention fallthrough in dispatch and is consumed
    /// there entirely; it is never surfaced to scripts.
    NotFound,
    /// The function was found and failed: argument-type mismatch, a user
    /// error, or a trapped host fault. Always a hard failure.
    Raised(EvalError),
}

/// Variable storage, function registry, and clip primitives.
///
/// One environment instance serves one evaluation session; the core
/// accesses it strictly sequentially and requires no internal locking.
pub trait Environment {
    /// Read a variable. `None` means unbound (not an error by itself).
    fn get_var(&self, name: Name) -> Option<Value>;

    /// Bind a variable in the current scope.
    fn set_var(&mut self, name: Name, value: Value);

    /// Bind a variable in the global scope.
    fn set_global_var(&mut self, name: Name, value: Value);

    /// Resolve and execute a function.
    ///
    /// `arg_names` runs parallel to `args`; `None` entries are positional.
    /// `InvokeError::NotFound` specifically means "no function named this
    /// matches this arity" — any other failure is `Raised`.
    fn invoke(
        &mut self,
        name: Name,
        args: &[Value],
        arg_names: &[Option<Name>],
    ) -> Result<Value, InvokeError>;

    /// Whether any function of this name is registered, under any arity.
    ///
    /// Used only to pick between "invalid arguments" and "no such
    /// function" when every calling convention has failed.
    fn function_exists(&self, name: Name) -> bool;

    /// Concatenate two clips: frame-aligned when `aligned`, plain stream
    /// concatenation otherwise.
    fn splice(&mut self, a: &Clip, b: &Clip, aligned: bool) -> Result<Clip, EvalError>;
}
