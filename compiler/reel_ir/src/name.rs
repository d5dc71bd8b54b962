//! Interned string identifier.

use std::fmt;

/// Interned string identifier.
///
/// A `Name` is an index into the `StringInterner` that produced it. Equality
/// and hashing are O(1) integer operations; the text is recovered through
/// the interner.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string. Doubles as "no keyword" for call
    /// arguments that are positional.
    pub const EMPTY: Name = Name(0);

    /// Pre-interned `"last"`, the implicit-clip binding convention.
    pub const LAST: Name = Name(1);

    /// Create from a raw u32 index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get the raw u32 index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index into the interner's storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is the pre-interned empty string.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
