//! Expression node variants.
//!
//! Each node carries only the data needed to evaluate it: operand indices,
//! interned identifiers, literal values, and (for `Line` nodes) the source
//! position used to enrich error messages. Nodes are immutable once built.

use crate::{BinaryOp, CallArgRange, ExprId, Name, UnaryOp};

/// Expression node.
///
/// All children are `ExprId` indices into the owning `ExprArena`.
/// `ExprId::INVALID` marks an absent optional child.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Expr {
    // Literals
    /// The no-value literal, produced by empty constructs.
    Undefined,
    /// Boolean literal: `true`, `false`
    Bool(bool),
    /// Integer literal: `42`
    Int(i64),
    /// Float literal, stored as bits so nodes stay `Eq`/`Hash`.
    Float(u64),
    /// String literal (interned).
    Str(Name),

    /// Statement sequencing: evaluate `first`, then `second`.
    ///
    /// A clip-valued `first` rebinds `last` before `second` runs.
    Sequence { first: ExprId, second: ExprId },

    /// Ternary expression: `cond ? then : else`.
    ///
    /// Both branches are always present; acts as an expression and never
    /// touches `last`.
    Conditional {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },

    /// If/else statement form.
    ///
    /// Either branch may be `ExprId::INVALID` (empty block); a missing
    /// branch leaves the current `last` as the result.
    BlockIf {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },

    /// While loop. `body` may be `ExprId::INVALID`.
    While { cond: ExprId, body: ExprId },

    /// For loop over an integer induction variable.
    ///
    /// `body` may be `ExprId::INVALID`. The loop variable is re-read from
    /// the environment after each body run; body code may reassign it.
    For {
        var: Name,
        init: ExprId,
        limit: ExprId,
        step: ExprId,
        body: ExprId,
    },

    /// Break out of the innermost enclosing loop.
    Break,

    /// Early return with a value.
    Return { value: ExprId },

    /// Try/catch: on a language error in `body`, bind the error message
    /// string to `var` and evaluate `catch` instead.
    TryCatch {
        var: Name,
        body: ExprId,
        catch: ExprId,
    },

    /// Source-position annotation wrapped around a statement.
    ///
    /// A language error escaping `inner` is re-raised with
    /// `"(file, line N)"` appended to its message.
    Line {
        file: Name,
        line: u32,
        inner: ExprId,
    },

    /// Script root: consumes a `Return` signal into the final value.
    Root { body: ExprId },

    /// Assignment in the current scope. Yields `Undefined`.
    Assign { name: Name, value: ExprId },

    /// Assignment in the global scope. Yields `Undefined`.
    GlobalAssign { name: Name, value: ExprId },

    /// Bare identifier reference.
    ///
    /// `frame >= 0` marks a per-frame evaluation context, which unlocks the
    /// `(frame, last)` resolution fallback.
    Var { name: Name, frame: i32 },

    /// Function call.
    ///
    /// `oop` records receiver-dot notation (`clip.Name(..)`), which
    /// suppresses the implicit-`last` calling conventions. `frame >= 0`
    /// marks a per-frame context.
    Call {
        name: Name,
        args: CallArgRange,
        oop: bool,
        frame: i32,
    },

    /// Binary operation: `left op right`.
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// Unary operation: `op operand`.
    Unary { op: UnaryOp, operand: ExprId },
}

impl Expr {
    /// Build a float literal from an `f64` value.
    #[inline]
    pub fn float(value: f64) -> Self {
        Expr::Float(value.to_bits())
    }
}

/// A single explicit call argument.
///
/// `name` is `Name::EMPTY` for positional arguments and the keyword for
/// named ones. Keyword names pass through dispatch unchanged.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CallArg {
    pub name: Name,
    pub expr: ExprId,
}

impl CallArg {
    /// Positional argument.
    #[inline]
    pub const fn positional(expr: ExprId) -> Self {
        CallArg {
            name: Name::EMPTY,
            expr,
        }
    }

    /// Keyword argument.
    #[inline]
    pub const fn named(name: Name, expr: ExprId) -> Self {
        CallArg { name, expr }
    }

    /// The keyword, if any.
    #[inline]
    pub fn keyword(&self) -> Option<Name> {
        if self.name.is_empty() {
            None
        } else {
            Some(self.name)
        }
    }
}
