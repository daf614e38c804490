//! slang_parser: Recursive descent parser for slang.
//!
//! Parses the token stream of the lexer into an arena-allocated syntax tree.
//! Malformed input never aborts parsing: problems become diagnostics and
//! `Invalid` nodes, and the rest of the input is parsed best-effort.

mod parser;
mod precedence;

pub use parser::{parse, Parser};
pub use precedence::OperatorPrecedence;
