//! slang_core: Core utilities shared by every stage of the slang pipeline.
//!
//! Provides the source text wrapper with line mapping, text spans,
//! string interning, the syntax arena and stack growth for deep recursion.

pub mod arena;
pub mod intern;
pub mod stack;
pub mod text;

// Re-export commonly used types
pub use arena::SyntaxArena;
pub use intern::{InternedString, StringInterner};
pub use stack::ensure_sufficient_stack;
pub use text::{LinePosition, SourceText, TextPos, TextSpan};
