//! The runtime environment: a stack of frames mirroring the binder's scopes.
//!
//! Symbols are unique across a bound tree, so frames are keyed by
//! [`SymbolId`] and shadowing needs no special handling. A call frame hides
//! everything below it except the global frame.

use rustc_hash::FxHashMap;
use slang_binder::SymbolId;

use crate::value::RuntimeValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Global,
    Call,
    Block,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    values: FxHashMap<SymbolId, RuntimeValue>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            values: FxHashMap::default(),
        }
    }
}

#[derive(Debug)]
pub struct Environment {
    /// `frames[0]` is the global frame.
    frames: Vec<Frame>,
}

impl Environment {
    /// An environment whose global frame holds `globals`.
    pub fn new(globals: impl IntoIterator<Item = (SymbolId, RuntimeValue)>) -> Self {
        let mut global = Frame::new(FrameKind::Global);
        global.values.extend(globals);
        Self {
            frames: vec![global],
        }
    }

    pub fn push(&mut self, kind: FrameKind) {
        debug_assert!(kind != FrameKind::Global);
        self.frames.push(Frame::new(kind));
    }

    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1, "the global frame is never popped");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of frames, the global one included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind `symbol` in the innermost frame.
    pub fn declare(&mut self, symbol: SymbolId, value: RuntimeValue) {
        if let Some(frame) = self.frames.last_mut() {
            frame.values.insert(symbol, value);
        }
    }

    pub fn get(&self, symbol: SymbolId) -> Option<&RuntimeValue> {
        self.visible_frames()
            .find_map(|index| self.frames[index].values.get(&symbol))
    }

    /// Overwrite the visible binding of `symbol`. Returns `false` when it has
    /// no binding yet.
    pub fn assign(&mut self, symbol: SymbolId, value: RuntimeValue) -> bool {
        let frame = self
            .visible_frames()
            .find(|&index| self.frames[index].values.contains_key(&symbol));
        match frame {
            Some(index) => {
                self.frames[index].values.insert(symbol, value);
                true
            }
            None => false,
        }
    }

    /// Indices of the frames visible from the innermost one: everything up
    /// to the nearest call frame, then the global frame.
    fn visible_frames(&self) -> impl Iterator<Item = usize> + '_ {
        let call = self
            .frames
            .iter()
            .rposition(|frame| frame.kind == FrameKind::Call);
        let lowest = call.unwrap_or(0);
        let global = call.map(|_| 0);
        (lowest..self.frames.len()).rev().chain(global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> SymbolId {
        SymbolId::from_index(index)
    }

    #[test]
    fn test_blocks_see_enclosing_frames() {
        let mut env = Environment::new([(id(0), RuntimeValue::Int(1))]);
        env.push(FrameKind::Block);
        env.declare(id(1), RuntimeValue::Int(2));
        assert_eq!(env.get(id(0)), Some(&RuntimeValue::Int(1)));
        assert_eq!(env.get(id(1)), Some(&RuntimeValue::Int(2)));

        assert!(env.assign(id(0), RuntimeValue::Int(10)));
        env.pop();
        assert_eq!(env.get(id(0)), Some(&RuntimeValue::Int(10)));
        assert_eq!(env.get(id(1)), None);
    }

    #[test]
    fn test_call_frames_hide_the_caller() {
        let mut env = Environment::new([(id(0), RuntimeValue::Int(1))]);
        env.push(FrameKind::Block);
        env.declare(id(1), RuntimeValue::Int(2));
        env.push(FrameKind::Call);
        env.declare(id(2), RuntimeValue::Int(3));

        assert_eq!(env.get(id(0)), Some(&RuntimeValue::Int(1)));
        assert_eq!(env.get(id(1)), None);
        assert_eq!(env.get(id(2)), Some(&RuntimeValue::Int(3)));
        assert!(!env.assign(id(1), RuntimeValue::Int(0)));

        env.pop();
        assert_eq!(env.get(id(1)), Some(&RuntimeValue::Int(2)));
        assert_eq!(env.depth(), 2);
    }

    #[test]
    fn test_assign_without_binding() {
        let mut env = Environment::new(std::iter::empty());
        assert!(!env.assign(id(5), RuntimeValue::Bool(true)));
        assert_eq!(env.get(id(5)), None);
    }
}
