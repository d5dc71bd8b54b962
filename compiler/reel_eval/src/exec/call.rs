//! Name resolution and function-call dispatch.
//!
//! Bare identifiers and calls resolve against the environment through an
//! ordered set of calling-convention rewrites. Each convention is attempted
//! by invoking the environment's dispatcher with a specific argument slice;
//! only a "no function of this name/arity" outcome advances to the next
//! convention — an error raised by an attempted invocation is a hard
//! failure.

use reel_ir::{CallArg, CallArgRange, Name};
use smallvec::{smallvec, SmallVec};
use tracing::debug;

use super::{eval_value, Evaluator};
use crate::{
    invalid_arguments, no_such_function, unknown_name, Control, Environment, EvalError,
    EvalOutcome, InvokeError, Value,
};

/// One-shot cache for the `last` binding.
///
/// `last` is read lazily and at most once per call: if the first read
/// fails it is never retried within the same call, so every convention
/// that wants `last` sees the same answer (and callers see a stable error
/// message).
enum LastLookup {
    Unread,
    Present(Value),
    Missing,
}

impl LastLookup {
    fn read(&mut self, env: &dyn Environment) -> Option<&Value> {
        if let LastLookup::Unread = self {
            *self = match env.get_var(Name::LAST) {
                Some(value) => LastLookup::Present(value),
                None => LastLookup::Missing,
            };
        }
        match self {
            LastLookup::Present(value) => Some(value),
            _ => None,
        }
    }
}

/// Attempt one calling convention.
///
/// `Ok(None)` means the dispatcher found no function of this name/arity
/// and the ladder should fall through; any raised error stops dispatch.
fn try_invoke(
    env: &mut dyn Environment,
    name: Name,
    args: &[Value],
    arg_names: &[Option<Name>],
) -> Result<Option<Value>, EvalError> {
    match env.invoke(name, args, arg_names) {
        Ok(value) => Ok(Some(value)),
        Err(InvokeError::NotFound) => Ok(None),
        Err(InvokeError::Raised(error)) => Err(error),
    }
}

impl Evaluator<'_> {
    /// Resolve a bare identifier.
    ///
    /// Order: a plain variable binding; an argument-less function; a
    /// single-argument function taking the current `last`; and, in a
    /// per-frame context, a two-argument `(frame, last)` function. First
    /// match wins.
    pub(super) fn eval_variable(
        &mut self,
        name: Name,
        frame: i32,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        // A genuine variable always shadows functions of the same name.
        if let Some(value) = env.get_var(name) {
            return Ok(Control::Value(value));
        }

        if let Some(value) = try_invoke(env, name, &[], &[])? {
            return Ok(Control::Value(value));
        }

        if let Some(last) = env.get_var(Name::LAST) {
            debug!(name = self.interner.lookup(name), "resolving identifier against implicit last");
            if let Some(value) = try_invoke(env, name, &[last.clone()], &[None])? {
                return Ok(Control::Value(value));
            }

            if frame >= 0 {
                let args = [Value::Int(i64::from(frame)), last];
                if let Some(value) = try_invoke(env, name, &args, &[None, None])? {
                    return Ok(Control::Value(value));
                }
            }
        }

        Err(unknown_name(self.interner.lookup(name)))
    }

    /// Evaluate a function call through the calling-convention ladder.
    ///
    /// Explicit arguments are evaluated left-to-right exactly once, into a
    /// buffer with two reserved leading slots for the implicit
    /// `current_frame` and `last` values. Keyword names ride along
    /// unchanged; the implicit slots never carry names.
    pub(super) fn eval_call(
        &mut self,
        name: Name,
        args: CallArgRange,
        oop: bool,
        frame: i32,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        let arg_list: SmallVec<[CallArg; 8]> =
            self.arena.get_call_args(args).iter().copied().collect();
        let explicit_count = arg_list.len();

        let mut values: SmallVec<[Value; 10]> = smallvec![Value::Undefined, Value::Undefined];
        let mut names: SmallVec<[Option<Name>; 10]> = smallvec![None, None];
        for arg in &arg_list {
            let value = eval_value!(self, arg.expr, env);
            values.push(value);
            names.push(arg.keyword());
        }

        let mut last = LastLookup::Unread;

        // Per-frame conventions first.
        if frame >= 0 {
            // name(frame, args...) when the first explicit arg is a clip.
            if explicit_count > 0 && values[2].is_clip() {
                debug!(name = self.interner.lookup(name), "call: trying (frame, args...)");
                values[1] = Value::Int(i64::from(frame));
                if let Some(value) = try_invoke(env, name, &values[1..], &names[1..])? {
                    return Ok(Control::Value(value));
                }
            }

            // name(frame, last, args...), unless receiver-dot notation
            // already supplied the clip.
            if !oop {
                if let Some(last_value) = last.read(env) {
                    values[1] = last_value.clone();
                    values[0] = Value::Int(i64::from(frame));
                    debug!(name = self.interner.lookup(name), "call: trying (frame, last, args...)");
                    if let Some(value) = try_invoke(env, name, &values[..], &names[..])? {
                        return Ok(Control::Value(value));
                    }
                }
            }
        }

        // name(args...)
        debug!(name = self.interner.lookup(name), "call: trying (args...)");
        if let Some(value) = try_invoke(env, name, &values[2..], &names[2..])? {
            return Ok(Control::Value(value));
        }

        // name(last, args...), unless receiver-dot notation.
        if !oop {
            if let Some(last_value) = last.read(env) {
                values[1] = last_value.clone();
                debug!(name = self.interner.lookup(name), "call: trying (last, args...)");
                if let Some(value) = try_invoke(env, name, &values[1..], &names[1..])? {
                    return Ok(Control::Value(value));
                }
            }
        }

        let name_text = self.interner.lookup(name);
        if env.function_exists(name) {
            Err(invalid_arguments(name_text))
        } else {
            Err(no_such_function(name_text))
        }
    }
}
