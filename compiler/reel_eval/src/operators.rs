//! Per-operator type checking and computation.
//!
//! Direct enum-based dispatch: the value set is fixed, so pattern matching
//! gives exhaustiveness checking for free. Each operator admits exactly the
//! operand pairs in its rule and fails with a specific type error for
//! everything else — no implicit widening between `Int` and `Float`
//! anywhere.
//!
//! `||` and `&&` short-circuit, so they are evaluated by the interpreter
//! (which controls when the right operand runs), not here.

use std::cmp::Ordering;

use reel_ir::BinaryOp;
use reel_ir::UnaryOp;

use crate::{
    division_by_zero, integer_overflow, type_error, Environment, EvalResult, Value,
};

/// Evaluate a strict (non-short-circuit) binary operation.
///
/// The environment is needed only for clip splicing (`+`/`++` on clips);
/// every other rule is pure.
pub fn evaluate_binary(
    env: &mut dyn Environment,
    left: Value,
    right: Value,
    op: BinaryOp,
) -> EvalResult {
    match op {
        BinaryOp::Eq => eval_equality(&left, &right).map(Value::Bool),
        BinaryOp::NotEq => eval_equality(&left, &right).map(|eq| Value::Bool(!eq)),
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => {
            eval_ordering(&left, &right, op)
        }
        BinaryOp::Add => eval_add(env, &left, &right),
        BinaryOp::AlignedSplice => eval_aligned_splice(env, &left, &right),
        BinaryOp::Sub => eval_sub(&left, &right),
        BinaryOp::Mul => eval_mul(&left, &right),
        BinaryOp::Div => eval_div(&left, &right),
        BinaryOp::Mod => eval_mod(&left, &right),
        BinaryOp::Or | BinaryOp::And => {
            unreachable!("short-circuit operators are evaluated by the interpreter")
        }
    }
}

/// Evaluate a unary operation.
pub fn evaluate_unary(operand: Value, op: UnaryOp) -> EvalResult {
    match op {
        UnaryOp::Neg => match operand {
            Value::Int(n) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| integer_overflow("negation")),
            Value::Float(f) => Ok(Value::Float(-f)),
            _ => Err(type_error(
                "Evaluate: unary minus can only be used with numbers",
            )),
        },
        UnaryOp::Not => match operand {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            _ => Err(type_error(
                "Evaluate: operand of '!' must be boolean (true/false)",
            )),
        },
    }
}

/// Equality, defined pairwise per matching variant.
///
/// Strings compare ASCII case-insensitively; clips compare by handle
/// identity. Any other pairing (including mismatched variants) is a type
/// error rather than `false`.
fn eval_equality(left: &Value, right: &Value) -> Result<bool, crate::EvalError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Float(a), Value::Float(b)) => Ok(a == b),
        (Value::Clip(a), Value::Clip(b)) => Ok(a.ptr_eq(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.eq_ignore_ascii_case(b)),
        _ => Err(type_error(
            "Evaluate: operands of '==' and '!=' must be comparable",
        )),
    }
}

/// Ordering, defined only for Int/Int, Float/Float, and Str/Str.
///
/// `<` is the primitive; the remaining comparisons derive from the same
/// ordering. String ordering is case-insensitive lexicographic.
fn eval_ordering(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => match a.partial_cmp(b) {
            Some(ordering) => ordering,
            // IEEE: every ordered comparison involving NaN is false.
            None => return Ok(Value::Bool(false)),
        },
        (Value::Str(a), Value::Str(b)) => cmp_ignore_ascii_case(a, b),
        _ => {
            return Err(type_error(
                "Evaluate: operands of '<' and friends must be string or numeric",
            ));
        }
    };
    let result = match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => unreachable!("eval_ordering called with non-ordering operator"),
    };
    Ok(Value::Bool(result))
}

/// Case-insensitive lexicographic comparison over ASCII.
fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    let lhs = a.bytes().map(|c| c.to_ascii_lowercase());
    let rhs = b.bytes().map(|c| c.to_ascii_lowercase());
    lhs.cmp(rhs)
}

/// `+`: unaligned clip splice, numeric sum, or string concatenation.
fn eval_add(env: &mut dyn Environment, left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Clip(a), Value::Clip(b)) => env.splice(a, b, false).map(Value::Clip),
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(*b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("addition")),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Str(a), Value::Str(b)) => Ok(Value::string(format!("{}{}", **a, **b))),
        _ => Err(type_error(
            "Evaluate: operands of '+' must both be numbers, strings, or clips",
        )),
    }
}

/// `++`: frame-aligned clip splice, clips only.
fn eval_aligned_splice(env: &mut dyn Environment, left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Clip(a), Value::Clip(b)) => env.splice(a, b, true).map(Value::Clip),
        _ => Err(type_error("Evaluate: operands of '++' must be clips")),
    }
}

fn eval_sub(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_sub(*b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("subtraction")),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        _ => Err(type_error("Evaluate: operands of '-' must be numeric")),
    }
}

fn eval_mul(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_mul(*b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("multiplication")),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        _ => Err(type_error("Evaluate: operands of '*' must be numeric")),
    }
}

/// `/`: integer division checks for zero; float division follows IEEE and
/// produces an infinity or NaN instead of failing.
fn eval_div(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            if *b == 0 {
                return Err(division_by_zero());
            }
            a.checked_div(*b)
                .map(Value::Int)
                .ok_or_else(|| integer_overflow("division"))
        }
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
        _ => Err(type_error("Evaluate: operands of '/' must be numeric")),
    }
}

/// `%`: integers only, nonzero divisor.
fn eval_mod(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            if *b == 0 {
                return Err(division_by_zero());
            }
            a.checked_rem(*b)
                .map(Value::Int)
                .ok_or_else(|| integer_overflow("remainder"))
        }
        _ => Err(type_error("Evaluate: operands of '%' must be integers")),
    }
}
