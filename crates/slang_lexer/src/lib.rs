//! slang_lexer: Converts source text into a stream of tokens.
//!
//! The lexer is error tolerant: unknown characters, unterminated strings and
//! unterminated comments are reported as diagnostics and lexing carries on,
//! so the token stream always ends with a single end-of-file token.

mod char_codes;
mod lexer;

pub use lexer::{lex, Lexer};
