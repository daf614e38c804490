//! slang_ast: Tokens and syntax tree definitions for slang.
//!
//! Syntax nodes are closed enums whose children are references into the
//! parser's arena. Nodes are never mutated after construction.

pub mod node;
pub mod printer;
pub mod syntax_kind;
pub mod token;

// Re-export key types
pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use token::{LiteralValue, Token};
