//! Binary and unary operator tags.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Logical (short-circuit; the evaluator handles these directly)
    Or,
    And,

    // Equality
    Eq,
    NotEq,

    // Ordering
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Arithmetic / concatenation / unaligned splice
    Add,
    /// `++`: frame-aligned clip splice.
    AlignedSplice,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::AlignedSplice => "++",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }

    /// Whether this operator short-circuits and must evaluate its own
    /// right operand lazily.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::Or | Self::And)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Numeric negation: `-x`
    Neg,
    /// Boolean negation: `!x`
    Not,
}

impl UnaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}
