//! Identifier interning.
//!
//! The binder keys its scopes by interned names so that symbol lookups
//! compare integers instead of strings.

use lasso::{Rodeo, Spur};
use std::fmt;

/// A lightweight handle to an interned string.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternedString({:?})", self.0)
    }
}

/// Stores one copy of each unique identifier.
#[derive(Default)]
pub struct StringInterner {
    rodeo: Rodeo,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning the existing handle if already present.
    #[inline]
    pub fn intern(&mut self, s: &str) -> InternedString {
        InternedString(self.rodeo.get_or_intern(s))
    }

    #[inline]
    pub fn intern_static(&mut self, s: &'static str) -> InternedString {
        InternedString(self.rodeo.get_or_intern_static(s))
    }

    /// Look up an already-interned string without interning it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<InternedString> {
        self.rodeo.get(s).map(InternedString)
    }

    #[inline]
    pub fn resolve(&self, key: InternedString) -> &str {
        self.rodeo.resolve(&key.0)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
