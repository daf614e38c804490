//! slang_interpreter: Runs a bound slang program.
//!
//! The interpreter walks the [`slang_binder::BoundTree`] directly. Program
//! output and input go through an injected [`Io`], and the first runtime
//! failure ends the run as a [`RuntimeError`].

mod env;
mod error;
mod interpreter;
mod io;
mod operators;
mod value;

pub use env::{Environment, FrameKind};
pub use error::{Location, RuntimeError, RuntimeResult};
pub use interpreter::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use io::{BufferIo, Io, SeededRandom, StdIo};
pub use operators::{convert, evaluate_binary, evaluate_unary, Fault};
pub use value::{format_double, parse_bool, parse_double, parse_int, unescape, RuntimeValue};
