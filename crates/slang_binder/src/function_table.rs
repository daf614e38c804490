//! Overload sets, collected while declaring and frozen before any body binds.

use indexmap::IndexMap;
use slang_core::intern::InternedString;

use crate::symbol::{FunctionSymbol, Symbol, SymbolId, SymbolTable};

/// Accumulates function declarations during the declaration phase.
#[derive(Debug, Default)]
pub struct FunctionTableBuilder {
    overloads: IndexMap<InternedString, Vec<SymbolId>>,
}

impl FunctionTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `function` to its overload set. An identical signature under the
    /// same name is rejected and the already declared overload is returned.
    pub fn declare(
        &mut self,
        symbols: &mut SymbolTable,
        function: FunctionSymbol,
    ) -> Result<SymbolId, SymbolId> {
        let set = self.overloads.entry(function.name).or_default();
        let clash = set.iter().copied().find(|&id| {
            symbols[id]
                .as_function()
                .map_or(false, |existing| existing.has_same_signature(&function))
        });
        if let Some(existing) = clash {
            return Err(existing);
        }
        let id = symbols.add(Symbol::Function(function));
        set.push(id);
        Ok(id)
    }

    pub fn freeze(self) -> FunctionTable {
        FunctionTable {
            overloads: self.overloads,
        }
    }
}

/// The immutable overload sets of a program, in declaration order.
#[derive(Debug, Default)]
pub struct FunctionTable {
    overloads: IndexMap<InternedString, Vec<SymbolId>>,
}

impl FunctionTable {
    /// The overloads of `name`, earliest declaration first.
    pub fn overloads(&self, name: InternedString) -> &[SymbolId] {
        self.overloads.get(&name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: InternedString) -> bool {
        self.overloads.contains_key(&name)
    }

    /// Every function, grouped by name in first-declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.overloads.values().flatten().copied()
    }
}
