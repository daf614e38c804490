//! Stack growth for recursion whose depth follows the input.
//!
//! Long operator chains such as `1 + 1 + ... + 1` nest one level per
//! operator, so binding and evaluating them recurse as deep as the chain is
//! long. [`ensure_sufficient_stack`] moves such recursion onto a fresh
//! segment when the current one runs low.

/// If less stack than this remains, the stack is grown.
const RED_ZONE: usize = 128 * 1024;

/// Size of each stack extension.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn depth(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
    }

    #[test]
    fn test_returns_the_closure_result() {
        assert_eq!(ensure_sufficient_stack(|| 42), 42);
    }

    #[test]
    fn test_deep_recursion_completes() {
        assert_eq!(depth(200_000), 200_000);
    }
}
