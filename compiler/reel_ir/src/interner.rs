//! String interner for identifier storage.
//!
//! Single-threaded by design: interning happens while the parser builds the
//! tree, lookup happens while the evaluator walks it. Evaluation never
//! interns, so the evaluator only needs a shared reference.

use rustc_hash::FxHashMap;

use crate::Name;

/// String interner mapping identifier text to compact `Name` indices.
///
/// `""` and `"last"` are pre-interned at fixed indices (`Name::EMPTY`,
/// `Name::LAST`) so the evaluator's `last`-clip convention needs no lookup.
pub struct StringInterner {
    map: FxHashMap<String, Name>,
    strings: Vec<String>,
}

impl StringInterner {
    /// Create a new interner with the well-known names pre-interned.
    pub fn new() -> Self {
        let mut interner = StringInterner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        let empty = interner.intern("");
        debug_assert_eq!(empty, Name::EMPTY);
        let last = interner.intern("last");
        debug_assert_eq!(last, Name::LAST);
        interner
    }

    /// Intern a string, returning its `Name`.
    ///
    /// Repeated interning of the same text returns the same `Name`.
    pub fn intern(&mut self, text: &str) -> Name {
        if let Some(&name) = self.map.get(text) {
            return name;
        }
        let name = Name::from_raw(u32::try_from(self.strings.len()).unwrap_or(u32::MAX));
        self.strings.push(text.to_owned());
        self.map.insert(text.to_owned(), name);
        name
    }

    /// Look up the text of an interned name.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    #[inline]
    #[track_caller]
    pub fn lookup(&self, name: Name) -> &str {
        &self.strings[name.index()]
    }

    /// Look up a name by text without interning.
    pub fn get(&self, text: &str) -> Option<Name> {
        self.map.get(text).copied()
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether only the pre-interned names are present.
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 2
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
