//! The bound tree: the syntax tree with every name resolved and every
//! expression typed, ready for the interpreter.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use slang_ast::token::{LiteralValue, Token};
use slang_core::intern::StringInterner;

use crate::conversion::Conversion;
use crate::function_table::FunctionTable;
use crate::operators::{BoundBinaryOperator, BoundUnaryOperator};
use crate::scope::{ScopeArena, ScopeId};
use crate::symbol::{Symbol, SymbolId, SymbolTable};
use crate::types::TypeSymbol;

/// The result of binding one compilation unit.
#[derive(Debug)]
pub struct BoundTree<'a> {
    pub interner: StringInterner,
    pub scopes: ScopeArena,
    pub symbols: SymbolTable,
    pub functions: FunctionTable,
    /// Bodies of user-declared functions, keyed by their symbol.
    pub definitions: IndexMap<SymbolId, FunctionDefinition<'a>>,
    /// Every global variable in declaration order.
    pub globals: Vec<SymbolId>,
    /// The global statements, in source order.
    pub statements: BoundBlock<'a>,
}

impl<'a> BoundTree<'a> {
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    pub fn name_of(&self, id: SymbolId) -> &str {
        self.interner.resolve(self.symbols[id].name())
    }

    pub fn definition(&self, function: SymbolId) -> Option<&FunctionDefinition<'a>> {
        self.definitions.get(&function)
    }
}

#[derive(Debug)]
pub struct FunctionDefinition<'a> {
    pub symbol: SymbolId,
    /// The parameter variables, in order.
    pub parameters: Vec<SymbolId>,
    pub body: BoundBlock<'a>,
    /// Closing brace of the body, where a missing return is reported.
    pub end_token: Token<'a>,
}

/// A statement list with its own scope. Labels declared directly in the list
/// map to the index of their statement, so `goto` can resume there.
#[derive(Debug)]
pub struct BoundBlock<'a> {
    pub scope: ScopeId,
    pub statements: Vec<BoundStatement<'a>>,
    pub labels: FxHashMap<SymbolId, usize>,
}

#[derive(Debug)]
pub enum BoundStatement<'a> {
    Block(BoundBlock<'a>),
    If {
        condition: BoundExpression<'a>,
        then_statement: Box<BoundStatement<'a>>,
        else_statement: Option<Box<BoundStatement<'a>>>,
    },
    Expression(BoundExpression<'a>),
    VariableDeclaration {
        variable: SymbolId,
        initializer: Option<BoundExpression<'a>>,
    },
    Return {
        token: Token<'a>,
        value: Option<BoundExpression<'a>>,
    },
    Goto {
        token: Token<'a>,
        label: SymbolId,
    },
    Label(SymbolId),
    /// Empty statements and statements that failed to parse.
    Empty,
}

#[derive(Debug)]
pub struct BoundExpression<'a> {
    pub kind: BoundExpressionKind<'a>,
    pub ty: TypeSymbol,
    /// The token runtime failures in this expression are reported at.
    pub token: Token<'a>,
}

#[derive(Debug)]
pub enum BoundExpressionKind<'a> {
    Literal(LiteralValue<'a>),
    Variable(SymbolId),
    Assignment {
        variable: SymbolId,
        value: Box<BoundExpression<'a>>,
    },
    Unary {
        operator: BoundUnaryOperator,
        operand: Box<BoundExpression<'a>>,
    },
    Binary {
        left: Box<BoundExpression<'a>>,
        operator: BoundBinaryOperator,
        right: Box<BoundExpression<'a>>,
    },
    Call {
        function: SymbolId,
        arguments: Vec<BoundExpression<'a>>,
    },
    /// Conversion of `operand` to the expression's type.
    Conversion {
        conversion: Conversion,
        operand: Box<BoundExpression<'a>>,
    },
    /// An expression that failed to bind. Its type is `Error`.
    Error,
}

impl<'a> BoundExpression<'a> {
    pub fn new(kind: BoundExpressionKind<'a>, ty: TypeSymbol, token: Token<'a>) -> Self {
        Self { kind, ty, token }
    }

    pub fn error(token: Token<'a>) -> Self {
        Self::new(BoundExpressionKind::Error, TypeSymbol::Error, token)
    }

    pub fn has_errors(&self) -> bool {
        self.ty.is_error()
    }
}

impl Drop for BoundExpression<'_> {
    /// Operator chains nest one box per operator, so the operands are
    /// detached onto a worklist instead of dropping recursively.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_operands(&mut self.kind, &mut pending);
        while let Some(mut expression) = pending.pop() {
            detach_operands(&mut expression.kind, &mut pending);
        }
    }
}

fn detach_operands<'a>(kind: &mut BoundExpressionKind<'a>, pending: &mut Vec<BoundExpression<'a>>) {
    match std::mem::replace(kind, BoundExpressionKind::Error) {
        BoundExpressionKind::Assignment { value: operand, .. }
        | BoundExpressionKind::Unary { operand, .. }
        | BoundExpressionKind::Conversion { operand, .. } => pending.push(*operand),
        BoundExpressionKind::Binary { left, right, .. } => {
            pending.push(*left);
            pending.push(*right);
        }
        BoundExpressionKind::Call { arguments, .. } => pending.extend(arguments),
        BoundExpressionKind::Literal(_)
        | BoundExpressionKind::Variable(_)
        | BoundExpressionKind::Error => {}
    }
}
