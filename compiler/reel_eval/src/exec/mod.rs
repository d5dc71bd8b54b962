//! The recursive tree-walking engine.
//!
//! Evaluation logic is organized by category:
//!
//! - `mod.rs`: the `Evaluator`, node dispatch, literals and operators
//! - `control`: statement-level nodes (sequencing, conditionals, loops,
//!   try/catch, assignment)
//! - `call`: bare-identifier resolution and function-call dispatch
//!
//! One evaluation rule exists per node variant. The outcome of a rule is a
//! `Control` signal, not just a value, so early-exit control flow is an
//! ordinary propagating result instead of an unwinding exception.

pub mod call;
pub mod control;

use reel_ir::{BinaryOp, Expr, ExprArena, ExprId, StringInterner};
use tracing::trace;

use crate::stack::ensure_sufficient_stack;
use crate::{
    recursion_limit, script_error, stray_break, type_error, Control, Environment, EvalOutcome,
    EvalResult, Value,
};

/// Hard cap on evaluation depth.
///
/// The stack itself is grown on demand (see `stack`), so this bounds how
/// deep a pathological tree may nest before failing with a clean
/// `RecursionLimit` error instead of consuming memory without end.
pub const MAX_RECURSION_DEPTH: usize = 2048;

/// Evaluate a node to a plain value, forwarding `Break`/`Return` signals
/// to the caller unchanged.
macro_rules! eval_value {
    ($self:ident, $id:expr, $env:ident) => {
        match $self.eval($id, $env)?.into_value() {
            Ok(value) => value,
            Err(signal) => return Ok(signal),
        }
    };
}
pub(crate) use eval_value;

/// The tree-walking evaluator.
///
/// Borrows the expression arena and interner for the lifetime of one
/// evaluation session; all mutable state lives in the `Environment`
/// passed to each call, so the evaluator itself is reusable.
pub struct Evaluator<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over a parsed script.
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        Evaluator {
            arena,
            interner,
            depth: 0,
        }
    }

    /// Evaluate a whole script.
    ///
    /// Consumes a `Return` signal into the final value; a bare `Break`
    /// escaping to the root is reported as an internal error. Never
    /// returns a partial result.
    pub fn evaluate(&mut self, root: ExprId, env: &mut dyn Environment) -> EvalResult {
        match self.eval_translated(root, env)? {
            Control::Value(value) | Control::Return(value) => Ok(value),
            Control::Break => Err(stray_break()),
        }
    }

    /// Evaluate one node.
    pub(crate) fn eval(&mut self, id: ExprId, env: &mut dyn Environment) -> EvalOutcome {
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(recursion_limit(MAX_RECURSION_DEPTH));
        }
        self.depth += 1;
        let outcome = ensure_sufficient_stack(|| self.eval_node(id, env));
        self.depth -= 1;
        outcome
    }

    /// Evaluate through the error-translation path.
    ///
    /// Converts a trapped host fault into a plain script error so it never
    /// crosses a try/catch boundary or reaches the host in raw form.
    /// Control signals and already-typed language errors pass through
    /// untouched.
    pub(crate) fn eval_translated(
        &mut self,
        id: ExprId,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        match self.eval(id, env) {
            Err(error) if error.is_host_fault() => Err(script_error(format!(
                "Evaluate: system exception - {}",
                error.message
            ))),
            outcome => outcome,
        }
    }

    fn eval_node(&mut self, id: ExprId, env: &mut dyn Environment) -> EvalOutcome {
        let expr = self.arena.get(id);
        trace!(node = ?expr, depth = self.depth, "eval");
        match expr {
            // Literals
            Expr::Undefined => Ok(Control::Value(Value::Undefined)),
            Expr::Bool(b) => Ok(Control::Value(Value::Bool(b))),
            Expr::Int(n) => Ok(Control::Value(Value::Int(n))),
            Expr::Float(bits) => Ok(Control::Value(Value::Float(f64::from_bits(bits)))),
            Expr::Str(name) => Ok(Control::Value(Value::string(self.interner.lookup(name)))),

            // Statements and control flow
            Expr::Sequence { first, second } => self.eval_sequence(first, second, env),
            Expr::Conditional {
                cond,
                then_branch,
                else_branch,
            } => self.eval_conditional(cond, then_branch, else_branch, env),
            Expr::BlockIf {
                cond,
                then_branch,
                else_branch,
            } => self.eval_block_if(cond, then_branch, else_branch, env),
            Expr::While { cond, body } => self.eval_while(cond, body, env),
            Expr::For {
                var,
                init,
                limit,
                step,
                body,
            } => self.eval_for(var, init, limit, step, body, env),
            Expr::Break => Ok(Control::Break),
            Expr::Return { value } => {
                let value = eval_value!(self, value, env);
                Ok(Control::Return(value))
            }
            Expr::TryCatch { var, body, catch } => self.eval_try_catch(var, body, catch, env),
            Expr::Line { file, line, inner } => self.eval_line(file, line, inner, env),
            Expr::Root { body } => self.eval_root(body, env),
            Expr::Assign { name, value } => self.eval_assign(name, value, false, env),
            Expr::GlobalAssign { name, value } => self.eval_assign(name, value, true, env),

            // Names and calls
            Expr::Var { name, frame } => self.eval_variable(name, frame, env),
            Expr::Call {
                name,
                args,
                oop,
                frame,
            } => self.eval_call(name, args, oop, frame, env),

            // Operators
            Expr::Binary { op, left, right } if op.is_short_circuit() => {
                self.eval_logical(op, left, right, env)
            }
            Expr::Binary { op, left, right } => {
                let lhs = eval_value!(self, left, env);
                let rhs = eval_value!(self, right, env);
                crate::evaluate_binary(env, lhs, rhs, op).map(Control::Value)
            }
            Expr::Unary { op, operand } => {
                let operand = eval_value!(self, operand, env);
                crate::evaluate_unary(operand, op).map(Control::Value)
            }
        }
    }

    /// `||` and `&&`: short-circuit, but both operands must independently
    /// be boolean at the point they are evaluated.
    fn eval_logical(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        let lhs = eval_value!(self, left, env);
        let Some(lhs_flag) = lhs.as_bool() else {
            return Err(type_error(match op {
                BinaryOp::Or => "Evaluate: left operand of '||' must be boolean (true/false)",
                _ => "Evaluate: left operand of '&&' must be boolean (true/false)",
            }));
        };
        let decided = match op {
            BinaryOp::Or => lhs_flag,
            _ => !lhs_flag,
        };
        if decided {
            return Ok(Control::Value(lhs));
        }
        let rhs = eval_value!(self, right, env);
        if rhs.as_bool().is_none() {
            return Err(type_error(match op {
                BinaryOp::Or => "Evaluate: right operand of '||' must be boolean (true/false)",
                _ => "Evaluate: right operand of '&&' must be boolean (true/false)",
            }));
        }
        Ok(Control::Value(rhs))
    }
}
