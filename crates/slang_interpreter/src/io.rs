//! Program input and output.
//!
//! The interpreter never touches the process streams itself. `print`,
//! `input` and `rndi` go through an [`Io`] handed in by the caller:
//! - [`StdIo`]: the process's stdin and stdout, randomly seeded
//! - [`BufferIo`]: scripted input lines, captured output and a fixed seed,
//!   for tests

use std::collections::hash_map::RandomState;
use std::collections::VecDeque;
use std::hash::{BuildHasher, Hasher};
use std::io::{self, BufRead, Write};

/// Where `print` writes, `input` reads and `rndi` draws from.
pub trait Io {
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    /// The next input line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// A uniformly distributed number in `0..bound`. `bound` is positive.
    fn random_below(&mut self, bound: u64) -> u64;
}

/// xorshift64* generator. Reproducible from its seed, not unpredictable.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        // The all-zero state is a fixed point.
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    /// Seeded from the process's hash randomization keys.
    pub fn from_entropy() -> Self {
        Self::new(RandomState::new().build_hasher().finish())
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform in `0..bound` by rejection, so small bounds carry no modulo bias.
    pub fn below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0);
        let zone = u64::MAX - u64::MAX % bound;
        loop {
            let value = self.next_u64();
            if value < zone {
                return value % bound;
            }
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Standard input and output.
#[derive(Debug)]
pub struct StdIo {
    random: SeededRandom,
}

impl StdIo {
    pub fn new() -> Self {
        Self {
            random: SeededRandom::from_entropy(),
        }
    }

    /// Same streams, but `rndi` repeats the sequence of `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            random: SeededRandom::new(seed),
        }
    }
}

impl Default for StdIo {
    fn default() -> Self {
        Self::new()
    }
}

impl Io for StdIo {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        // A prompt printed without a newline must show before `input()` blocks.
        stdout.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_terminator(line)))
    }

    fn random_below(&mut self, bound: u64) -> u64 {
        self.random.below(bound)
    }
}

fn strip_line_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Input lines queued up front, output collected into a string. Random
/// numbers come from a fixed seed unless [`BufferIo::with_seed`] sets one.
#[derive(Debug, Default, Clone)]
pub struct BufferIo {
    input: VecDeque<String>,
    output: String,
    random: SeededRandom,
}

impl BufferIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random = SeededRandom::new(seed);
        self
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl Io for BufferIo {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn random_below(&mut self, bound: u64) -> u64 {
        self.random.below(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_buffer_io() {
        let mut io = BufferIo::with_input(["first", "second"]);
        io.write_str("a").unwrap();
        io.write_str("b\n").unwrap();
        assert_eq!(io.output(), "ab\n");
        assert_eq!(io.read_line().unwrap().as_deref(), Some("first"));
        assert_eq!(io.read_line().unwrap().as_deref(), Some("second"));
        assert_eq!(io.read_line().unwrap(), None);
        assert_eq!(io.take_output(), "ab\n");
        assert_eq!(io.output(), "");
    }

    #[test]
    fn test_random_stays_below_bound() {
        let mut random = SeededRandom::new(7);
        for bound in [1, 2, 3, 10, 1000] {
            for _ in 0..200 {
                assert!(random.below(bound) < bound);
            }
        }
        assert_eq!(random.below(1), 0);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let draw = |seed| {
            let mut io = BufferIo::new().with_seed(seed);
            (0..8).map(|_| io.random_below(100)).collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
        assert_ne!(draw(42), draw(43));
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut random = SeededRandom::new(0);
        let first = random.next_u64();
        assert_ne!(first, 0);
        assert_ne!(random.next_u64(), first);
    }

    #[test]
    fn test_strip_line_terminator() {
        assert_eq!(strip_line_terminator("x\r\n".to_string()), "x");
        assert_eq!(strip_line_terminator("x\n".to_string()), "x");
        assert_eq!(strip_line_terminator("x".to_string()), "x");
    }
}
