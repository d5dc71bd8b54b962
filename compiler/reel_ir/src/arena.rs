//! Arena storage for the flat expression tree.
//!
//! All expressions live in one contiguous `Vec`; child references are
//! `ExprId` indices and argument lists are ranges into a flattened
//! `Vec<CallArg>`. The whole tree is torn down in one deallocation.

use crate::{CallArg, CallArgRange, Expr, ExprId};

/// Contiguous storage for all expressions of one script.
#[derive(Clone, Default, Debug)]
pub struct ExprArena {
    /// All expressions (indexed by `ExprId`).
    exprs: Vec<Expr>,
    /// Flattened call-argument lists.
    call_args: Vec<CallArg>,
}

impl ExprArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with estimated capacity based on source size.
    /// Heuristic: roughly one expression per 20 bytes of source.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated = source_len / 20;
        ExprArena {
            exprs: Vec::with_capacity(estimated),
            call_args: Vec::with_capacity(estimated / 4),
        }
    }

    /// Allocate an expression, returning its ID.
    #[inline]
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(u32::try_from(self.exprs.len()).unwrap_or(u32::MAX));
        self.exprs.push(expr);
        id
    }

    /// Get an expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is `INVALID` or out of bounds.
    #[inline]
    #[track_caller]
    pub fn get(&self, id: ExprId) -> Expr {
        self.exprs[id.index()]
    }

    /// Number of expressions.
    #[inline]
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    /// Whether the arena is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Allocate a call-argument list, returning its range.
    pub fn alloc_call_args(&mut self, args: impl IntoIterator<Item = CallArg>) -> CallArgRange {
        let start = u32::try_from(self.call_args.len()).unwrap_or(u32::MAX);
        self.call_args.extend(args);
        let len = u16::try_from(self.call_args.len() - start as usize).unwrap_or(u16::MAX);
        CallArgRange::new(start, len)
    }

    /// Get a call-argument list by range.
    #[inline]
    pub fn get_call_args(&self, range: CallArgRange) -> &[CallArg] {
        let start = range.start as usize;
        &self.call_args[start..start + range.len()]
    }
}
