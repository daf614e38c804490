//! slang_binder: Name resolution and type checking.
//!
//! The binder turns a syntax tree into a [`BoundTree`]: every name is
//! resolved to a symbol, every expression carries a type, implicit
//! conversions are made explicit in the tree and overloaded calls are
//! resolved to one function.

mod binder;
mod bound_tree;
mod conversion;
mod function_table;
mod operators;
mod scope;
mod symbol;
mod types;

pub use binder::Binder;
pub use bound_tree::{
    BoundBlock, BoundExpression, BoundExpressionKind, BoundStatement, BoundTree,
    FunctionDefinition,
};
pub use conversion::Conversion;
pub use function_table::{FunctionTable, FunctionTableBuilder};
pub use operators::{
    BoundBinaryOperator, BoundBinaryOperatorKind, BoundUnaryOperator, BoundUnaryOperatorKind,
};
pub use scope::{ScopeArena, ScopeData, ScopeId, ScopeKind, SymbolKey, SymbolKeyKind};
pub use symbol::{
    type_list, Builtin, FunctionSymbol, LabelSymbol, ParameterSymbol, Symbol, SymbolId,
    SymbolTable, VariableSymbol,
};
pub use types::TypeSymbol;
