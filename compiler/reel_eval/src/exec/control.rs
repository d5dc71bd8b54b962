//! Statement-level evaluation rules.
//!
//! The `last` convention threads through everything here: sequencing and
//! the statement-form conditional/loops rebind `last` whenever a step
//! produces a clip, so the next filter in a pipeline can pick it up
//! implicitly. Signals propagate before `last` is touched.

use reel_ir::{ExprId, Name};

use super::{eval_value, Evaluator};
use crate::{
    integer_overflow, stray_break, type_error, unknown_name, Control, Environment, EvalOutcome,
    Value,
};

impl Evaluator<'_> {
    /// Evaluate `first`, rebind `last` if it produced a clip, then
    /// evaluate `second`. Any non-value signal from `first`
    /// short-circuits.
    pub(super) fn eval_sequence(
        &mut self,
        first: ExprId,
        second: ExprId,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        let value = eval_value!(self, first, env);
        if value.is_clip() {
            env.set_var(Name::LAST, value);
        }
        self.eval(second, env)
    }

    /// Ternary expression: exactly one branch runs; `last` is untouched.
    pub(super) fn eval_conditional(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        let cond = eval_value!(self, cond, env);
        let Some(flag) = cond.as_bool() else {
            return Err(type_error(
                "Evaluate: left of '?' must be boolean (true/false)",
            ));
        };
        self.eval(if flag { then_branch } else { else_branch }, env)
    }

    /// If/else statement form: the current `last` is the default result,
    /// a missing branch leaves it unchanged, and a clip result rebinds
    /// `last`.
    pub(super) fn eval_block_if(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        let mut result = env.get_var(Name::LAST).unwrap_or(Value::Undefined);

        let cond = eval_value!(self, cond, env);
        let Some(flag) = cond.as_bool() else {
            return Err(type_error("if: condition must be boolean (true/false)"));
        };
        if flag {
            if then_branch.is_present() {
                result = eval_value!(self, then_branch, env);
            }
        } else if else_branch.is_present() {
            result = eval_value!(self, else_branch, env);
        }

        if result.is_clip() {
            env.set_var(Name::LAST, result.clone());
        }
        Ok(Control::Value(result))
    }

    /// While loop.
    ///
    /// The loop result starts as the pre-loop `last` and tracks the most
    /// recent clip-bearing body result; `Break` ends the loop keeping the
    /// prior result, `Return` propagates immediately. Unbounded except by
    /// the condition and `break`.
    pub(super) fn eval_while(
        &mut self,
        cond: ExprId,
        body: ExprId,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        let mut result = env.get_var(Name::LAST).unwrap_or(Value::Undefined);

        loop {
            let cond = eval_value!(self, cond, env);
            let Some(flag) = cond.as_bool() else {
                return Err(type_error("while: condition must be boolean (true/false)"));
            };
            if !flag {
                break;
            }
            if body.is_present() {
                match self.eval(body, env)? {
                    Control::Break => break,
                    signal @ Control::Return(_) => return Ok(signal),
                    Control::Value(value) => {
                        if value.is_clip() {
                            env.set_var(Name::LAST, value.clone());
                            result = value;
                        }
                    }
                }
            }
        }
        Ok(Control::Value(result))
    }

    /// For loop over an integer induction variable.
    ///
    /// The loop variable is re-read from the environment after every body
    /// run: body code may reassign it to change where the next iteration
    /// starts. A non-int reassignment fails at the next boundary check.
    pub(super) fn eval_for(
        &mut self,
        var: Name,
        init: ExprId,
        limit: ExprId,
        step: ExprId,
        body: ExprId,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        let init = eval_value!(self, init, env);
        let limit = eval_value!(self, limit, env);
        let step = eval_value!(self, step, env);

        let Some(mut i) = init.as_int() else {
            return Err(type_error("for: initial value must be int"));
        };
        let Some(limit) = limit.as_int() else {
            return Err(type_error("for: final value must be int"));
        };
        let Some(step) = step.as_int() else {
            return Err(type_error("for: step value must be int"));
        };
        if step == 0 {
            return Err(type_error("for: step value must be non-zero"));
        }

        let mut result = env.get_var(Name::LAST).unwrap_or(Value::Undefined);

        env.set_var(var, Value::Int(i));
        while if step > 0 { i <= limit } else { i >= limit } {
            if body.is_present() {
                match self.eval(body, env)? {
                    Control::Break => break,
                    signal @ Control::Return(_) => return Ok(signal),
                    Control::Value(value) => {
                        if value.is_clip() {
                            env.set_var(Name::LAST, value.clone());
                            result = value;
                        }
                    }
                }
            }

            // Body code may have reassigned the loop variable.
            let current = env
                .get_var(var)
                .ok_or_else(|| unknown_name(self.interner.lookup(var)))?;
            let Some(value) = current.as_int() else {
                return Err(type_error(format!(
                    "for: loop variable '{}' has been assigned a non-int value",
                    self.interner.lookup(var)
                )));
            };
            i = value
                .checked_add(step)
                .ok_or_else(|| integer_overflow("for loop step"))?;
            env.set_var(var, Value::Int(i));
        }
        Ok(Control::Value(result))
    }

    /// Try/catch: a language error from the body binds its message to
    /// `var` and runs the catch block. Control signals are not errors and
    /// are never caught.
    pub(super) fn eval_try_catch(
        &mut self,
        var: Name,
        body: ExprId,
        catch: ExprId,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        match self.eval_translated(body, env) {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                env.set_var(var, Value::string(error.message));
                self.eval(catch, env)
            }
        }
    }

    /// Source-position annotation: re-raise an escaping language error
    /// with `"(file, line N)"` appended, kind unchanged.
    pub(super) fn eval_line(
        &mut self,
        file: Name,
        line: u32,
        inner: ExprId,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        match self.eval_translated(inner, env) {
            Err(error) => {
                let file = self.interner.lookup(file).to_owned();
                Err(error.with_location(&file, line))
            }
            outcome => outcome,
        }
    }

    /// Script root: `Return` and ordinary completion both yield the final
    /// value; a bare `Break` here means the tree was malformed.
    pub(super) fn eval_root(&mut self, body: ExprId, env: &mut dyn Environment) -> EvalOutcome {
        match self.eval_translated(body, env)? {
            Control::Value(value) | Control::Return(value) => Ok(Control::Value(value)),
            Control::Break => Err(stray_break()),
        }
    }

    /// Assignment: bind in the current scope (or the global scope) and
    /// yield `Undefined`.
    pub(super) fn eval_assign(
        &mut self,
        name: Name,
        value: ExprId,
        global: bool,
        env: &mut dyn Environment,
    ) -> EvalOutcome {
        let value = eval_value!(self, value, env);
        if global {
            env.set_global_var(name, value);
        } else {
            env.set_var(name, value);
        }
        Ok(Control::Value(Value::Undefined))
    }
}
