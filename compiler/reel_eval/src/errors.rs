//! Error types and control signals for evaluation.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` provides typed categories so callers can match on the
//! failure mode instead of parsing strings. Factory functions (e.g.
//! `division_by_zero()`) are the only way errors are constructed outside
//! this module; they populate both `kind` and `message`.
//!
//! Message texts keep the language's established wording: catch blocks
//! observe them as plain strings, so the exact phrasing is part of the
//! language surface.

use std::fmt;

use crate::Value;

/// Result of evaluating a whole script.
pub type EvalResult = Result<Value, EvalError>;

/// Outcome of evaluating a single node: a value or a control signal.
pub type EvalOutcome = Result<Control, EvalError>;

/// Non-local control signals.
///
/// Every consumer of an evaluation step must handle or forward each
/// outcome kind: a loop consumes `Break`, the script root consumes
/// `Return`, and everything in between propagates them unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    /// Ordinary completion with a value.
    Value(Value),
    /// Break out of the innermost enclosing loop. Never carries a value.
    Break,
    /// Early return; propagates unaltered to the script root.
    Return(Value),
}

impl Control {
    /// Split into a plain value or a propagating signal.
    ///
    /// `Err` carries `Break`/`Return` back for the caller to forward.
    #[inline]
    pub fn into_value(self) -> Result<Value, Control> {
        match self {
            Control::Value(value) => Ok(value),
            signal => Err(signal),
        }
    }
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// An operand or condition has the wrong variant.
    TypeError { message: String },
    /// Integer division or modulo by zero.
    DivisionByZero,
    /// Checked integer arithmetic overflowed.
    IntegerOverflow { operation: String },
    /// A bare identifier resolved to nothing.
    UnknownName { name: String },
    /// No function of this name exists under any arity.
    NoSuchFunction { name: String },
    /// A function of this name exists, but no signature matched.
    InvalidArguments { name: String },
    /// A trapped host-level fault. Always translated to `Script` before it
    /// can cross a try/catch boundary.
    HostFault { message: String },
    /// The evaluator's recursion guard tripped.
    RecursionLimit { limit: usize },
    /// Generic script error: user-raised, host-raised, or re-raised with
    /// position info.
    Script { message: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeError { message } | Self::Script { message } => write!(f, "{message}"),
            Self::DivisionByZero => write!(f, "Evaluate: division by zero"),
            Self::IntegerOverflow { operation } => {
                write!(f, "Evaluate: integer overflow in {operation}")
            }
            Self::UnknownName { name } => write!(f, "I don't know what '{name}' means."),
            Self::NoSuchFunction { name } => {
                write!(f, "Script error: there is no function named '{name}'.")
            }
            Self::InvalidArguments { name } => {
                write!(f, "Script error: invalid arguments to function '{name}'.")
            }
            Self::HostFault { message } => write!(f, "{message}"),
            Self::RecursionLimit { limit } => {
                write!(f, "Evaluate: maximum recursion depth exceeded (limit: {limit})")
            }
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// Structured category.
    pub kind: EvalErrorKind,
    /// Human-readable message. Equals `kind.to_string()` at construction;
    /// position annotation appends to it without changing the kind.
    pub message: String,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError { kind, message }
    }

    /// Append a source position to the message, keeping the kind.
    ///
    /// Used by line-annotation nodes to enrich otherwise position-less
    /// errors.
    pub fn with_location(mut self, file: &str, line: u32) -> Self {
        self.message = format!("{}\n({file}, line {line})", self.message);
        self
    }

    /// Whether this is a trapped host fault awaiting translation.
    #[inline]
    pub fn is_host_fault(&self) -> bool {
        matches!(self.kind, EvalErrorKind::HostFault { .. })
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

// Factory functions

/// An operand or condition has the wrong variant.
pub fn type_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeError {
        message: message.into(),
    })
}

/// Integer division or modulo by zero.
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

/// Checked integer arithmetic overflowed.
pub fn integer_overflow(operation: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.into(),
    })
}

/// A bare identifier resolved to nothing.
pub fn unknown_name(name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownName { name: name.into() })
}

/// No function of this name exists under any arity.
pub fn no_such_function(name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchFunction { name: name.into() })
}

/// A function of this name exists, but no signature matched.
pub fn invalid_arguments(name: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArguments { name: name.into() })
}

/// A trapped host-level fault.
///
/// Raw host faults never cross a try/catch boundary; the evaluator's
/// translation path converts them to `Script` errors first.
pub fn host_fault(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::HostFault {
        message: message.into(),
    })
}

/// Generic script error.
pub fn script_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Script {
        message: message.into(),
    })
}

/// The evaluator's recursion guard tripped.
pub fn recursion_limit(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { limit })
}

/// A `Break` signal escaped to the script root.
///
/// Loops consume their own breaks; a stray break reaching the root means
/// the tree was malformed, so this is an internal error rather than a
/// normal script failure.
pub fn stray_break() -> EvalError {
    script_error("Evaluate: internal error - break signal escaped to the script root")
}
