//! Symbol and symbol table definitions.

use slang_core::intern::InternedString;

use crate::types::TypeSymbol;

/// Index of a symbol in the [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub fn from_index(index: u32) -> Self {
        SymbolId(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A runtime-library function the interpreter implements natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `print(string)`: writes the text and a newline.
    PrintLine,
    /// `print(string, bool)`: writes the text, and a newline when the flag is set.
    Print,
    /// `input(): string`: reads one line.
    Input,
    /// `rndi(max: int): int`: a random integer in `0..max`.
    Rndi,
}

#[derive(Debug, Clone)]
pub struct VariableSymbol {
    pub name: InternedString,
    pub is_read_only: bool,
    pub ty: TypeSymbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub name: InternedString,
    pub ty: TypeSymbol,
}

#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub name: InternedString,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: TypeSymbol,
    pub builtin: Option<Builtin>,
}

impl FunctionSymbol {
    /// Whether `other` has exactly the same parameter types.
    pub fn has_same_signature(&self, other: &FunctionSymbol) -> bool {
        self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.ty == b.ty)
    }

    /// The parameter types as written in messages: `int, string`.
    pub fn signature_text(&self) -> String {
        type_list(self.parameters.iter().map(|p| p.ty))
    }
}

#[derive(Debug, Clone)]
pub struct LabelSymbol {
    pub name: InternedString,
}

/// A named entity of a program.
#[derive(Debug, Clone)]
pub enum Symbol {
    GlobalVariable(VariableSymbol),
    LocalVariable(VariableSymbol),
    Function(FunctionSymbol),
    Label(LabelSymbol),
}

impl Symbol {
    pub fn name(&self) -> InternedString {
        match self {
            Symbol::GlobalVariable(v) | Symbol::LocalVariable(v) => v.name,
            Symbol::Function(f) => f.name,
            Symbol::Label(l) => l.name,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableSymbol> {
        match self {
            Symbol::GlobalVariable(v) | Symbol::LocalVariable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match self {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }

    /// How the symbol is described in "already declared" messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Symbol::GlobalVariable(_) | Symbol::LocalVariable(_) => "Variable",
            Symbol::Function(_) => "Function",
            Symbol::Label(_) => "Label",
        }
    }
}

/// Owns every symbol of one binding run.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    pub fn add(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }
}

impl std::ops::Index<SymbolId> for SymbolTable {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        self.get(id)
    }
}

/// Types joined as in a parameter list.
pub fn type_list(types: impl Iterator<Item = TypeSymbol>) -> String {
    types.map(TypeSymbol::name).collect::<Vec<_>>().join(", ")
}
