//! Scope management for the binder.
//!
//! Scopes live in an arena and point at their parent by index, so lookup is
//! a walk up the parent chain.

use rustc_hash::FxHashMap;
use slang_core::intern::InternedString;

use crate::symbol::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Globals and global statements.
    Root,
    /// Parameters and the outermost statements of a function body.
    Function,
    Block,
}

/// Variables and labels live in separate namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKeyKind {
    Variable,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolKey {
    pub kind: SymbolKeyKind,
    pub name: InternedString,
}

impl SymbolKey {
    pub fn variable(name: InternedString) -> Self {
        Self {
            kind: SymbolKeyKind::Variable,
            name,
        }
    }

    pub fn label(name: InternedString) -> Self {
        Self {
            kind: SymbolKeyKind::Label,
            name,
        }
    }
}

#[derive(Debug)]
pub struct ScopeData {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    pub symbols: FxHashMap<SymbolKey, SymbolId>,
}

#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<ScopeData>,
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeArena {
    /// An arena holding only the root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeData {
                parent: None,
                kind: ScopeKind::Root,
                symbols: FxHashMap::default(),
            }],
        }
    }

    #[inline]
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn push(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            parent: Some(parent),
            kind,
            symbols: FxHashMap::default(),
        });
        id
    }

    pub fn get(&self, scope: ScopeId) -> &ScopeData {
        &self.scopes[scope.index()]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Declare `key` in `scope`. On a clash the existing symbol is returned
    /// and the scope is left unchanged.
    pub fn declare(&mut self, scope: ScopeId, key: SymbolKey, symbol: SymbolId) -> Result<(), SymbolId> {
        let symbols = &mut self.scopes[scope.index()].symbols;
        if let Some(&existing) = symbols.get(&key) {
            return Err(existing);
        }
        symbols.insert(key, symbol);
        Ok(())
    }

    pub fn lookup_local(&self, scope: ScopeId, key: SymbolKey) -> Option<SymbolId> {
        self.get(scope).symbols.get(&key).copied()
    }

    /// Walk from `scope` to the root.
    pub fn lookup(&self, scope: ScopeId, key: SymbolKey) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = self.get(id);
            if let Some(&symbol) = data.symbols.get(&key) {
                return Some(symbol);
            }
            current = data.parent;
        }
        None
    }

    /// Like [`lookup`](Self::lookup), but a label never resolves across a
    /// function boundary.
    pub fn lookup_label(&self, scope: ScopeId, name: InternedString) -> Option<SymbolId> {
        let key = SymbolKey::label(name);
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = self.get(id);
            if let Some(&symbol) = data.symbols.get(&key) {
                return Some(symbol);
            }
            if data.kind == ScopeKind::Function {
                return None;
            }
            current = data.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{LabelSymbol, Symbol, SymbolTable};
    use slang_core::intern::StringInterner;

    #[test]
    fn test_lookup_walks_parents_and_shadows() {
        let mut interner = StringInterner::default();
        let mut symbols = SymbolTable::new();
        let x = interner.intern("x");
        let outer = symbols.add(Symbol::Label(LabelSymbol { name: x }));
        let inner = symbols.add(Symbol::Label(LabelSymbol { name: x }));

        let mut scopes = ScopeArena::new();
        let root = scopes.root();
        let block = scopes.push(root, ScopeKind::Block);
        let nested = scopes.push(block, ScopeKind::Block);

        assert_eq!(scopes.declare(root, SymbolKey::variable(x), outer), Ok(()));
        assert_eq!(scopes.lookup(nested, SymbolKey::variable(x)), Some(outer));
        assert_eq!(scopes.declare(block, SymbolKey::variable(x), inner), Ok(()));
        assert_eq!(scopes.lookup(nested, SymbolKey::variable(x)), Some(inner));
        assert_eq!(scopes.lookup(root, SymbolKey::variable(x)), Some(outer));
        assert_eq!(scopes.declare(block, SymbolKey::variable(x), outer), Err(inner));
    }

    #[test]
    fn test_variables_and_labels_do_not_clash() {
        let mut interner = StringInterner::default();
        let mut symbols = SymbolTable::new();
        let name = interner.intern("top");
        let a = symbols.add(Symbol::Label(LabelSymbol { name }));
        let b = symbols.add(Symbol::Label(LabelSymbol { name }));
        let mut scopes = ScopeArena::new();
        let root = scopes.root();
        assert!(scopes.declare(root, SymbolKey::variable(name), a).is_ok());
        assert!(scopes.declare(root, SymbolKey::label(name), b).is_ok());
    }

    #[test]
    fn test_labels_stop_at_function_boundary() {
        let mut interner = StringInterner::default();
        let mut symbols = SymbolTable::new();
        let name = interner.intern("top");
        let label = symbols.add(Symbol::Label(LabelSymbol { name }));
        let mut scopes = ScopeArena::new();
        let root = scopes.root();
        scopes.declare(root, SymbolKey::label(name), label).expect("declare");
        let block = scopes.push(root, ScopeKind::Block);
        let function = scopes.push(root, ScopeKind::Function);
        let body_block = scopes.push(function, ScopeKind::Block);
        assert_eq!(scopes.lookup_label(block, name), Some(label));
        assert_eq!(scopes.lookup_label(body_block, name), None);
    }
}
