//! Arena that owns the syntax tree of one compilation unit.
//!
//! Syntax nodes hold `&'a` references into the arena; dropping the arena
//! frees the whole tree at once.

use bumpalo::Bump;

pub struct SyntaxArena {
    bump: Bump,
}

impl SyntaxArena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Create an arena with the specified initial capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// The allocator handed to the parser.
    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for SyntaxArena {
    fn default() -> Self {
        Self::new()
    }
}
