//! Syntax tree node definitions.
//!
//! Nodes reference their children through `&'a` references into the parser's
//! arena, and tokens borrow their text from the source, so one lifetime covers
//! the whole tree.

use slang_core::text::TextSpan;

use crate::syntax_kind::SyntaxKind;
use crate::token::Token;

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

// ============================================================================
// Compilation unit and members
// ============================================================================

#[derive(Debug)]
pub struct CompilationUnit<'a> {
    pub members: NodeList<'a, Member<'a>>,
    pub end_of_file_token: Token<'a>,
}

#[derive(Debug)]
pub enum Member<'a> {
    Function(FunctionDeclaration<'a>),
    GlobalStatement(GlobalStatement<'a>),
}

#[derive(Debug)]
pub struct GlobalStatement<'a> {
    pub statement: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub fun_keyword: Token<'a>,
    pub name: Token<'a>,
    pub open_paren_token: Token<'a>,
    pub parameters: NodeList<'a, Parameter<'a>>,
    pub close_paren_token: Token<'a>,
    /// Absent means the function returns `void`.
    pub return_type: Option<TypeClause<'a>>,
    pub body: &'a Block<'a>,
}

#[derive(Debug)]
pub struct Parameter<'a> {
    pub name: Token<'a>,
    pub type_clause: TypeClause<'a>,
}

/// `: name` after a parameter, a variable or a parameter list.
#[derive(Debug, Clone, Copy)]
pub struct TypeClause<'a> {
    pub colon_token: Token<'a>,
    pub type_name: Token<'a>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    Block(Block<'a>),
    If(IfStatement<'a>),
    Expression(ExpressionStatement<'a>),
    Empty(EmptyStatement<'a>),
    VariableDeclaration(VariableDeclaration<'a>),
    Return(ReturnStatement<'a>),
    Goto(GotoStatement<'a>),
    Label(LabelStatement<'a>),
    /// Placeholder for a statement that could not be parsed.
    Invalid(InvalidStatement<'a>),
}

#[derive(Debug)]
pub struct Block<'a> {
    pub open_brace_token: Token<'a>,
    pub statements: NodeList<'a, Statement<'a>>,
    pub close_brace_token: Token<'a>,
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub if_keyword: Token<'a>,
    pub condition: &'a Expression<'a>,
    pub then_statement: &'a Statement<'a>,
    pub else_clause: Option<ElseClause<'a>>,
}

#[derive(Debug)]
pub struct ElseClause<'a> {
    pub else_keyword: Token<'a>,
    pub statement: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub expression: &'a Expression<'a>,
    pub semicolon_token: Token<'a>,
}

#[derive(Debug)]
pub struct EmptyStatement<'a> {
    pub semicolon_token: Token<'a>,
}

#[derive(Debug)]
pub struct VariableDeclaration<'a> {
    /// `var` or `const`.
    pub keyword: Token<'a>,
    pub name: Token<'a>,
    pub type_clause: Option<TypeClause<'a>>,
    pub initializer: Option<&'a Expression<'a>>,
    pub semicolon_token: Token<'a>,
}

impl VariableDeclaration<'_> {
    pub fn is_read_only(&self) -> bool {
        self.keyword.kind == SyntaxKind::ConstKeyword
    }
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub return_keyword: Token<'a>,
    pub value: Option<&'a Expression<'a>>,
    pub semicolon_token: Token<'a>,
}

#[derive(Debug)]
pub struct GotoStatement<'a> {
    pub goto_keyword: Token<'a>,
    pub label: Token<'a>,
    pub semicolon_token: Token<'a>,
}

#[derive(Debug)]
pub struct LabelStatement<'a> {
    pub label: Token<'a>,
    pub colon_token: Token<'a>,
}

#[derive(Debug)]
pub struct InvalidStatement<'a> {
    pub token: Token<'a>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expression<'a> {
    Literal(LiteralExpression<'a>),
    Name(NameExpression<'a>),
    Unary(UnaryExpression<'a>),
    Binary(BinaryExpression<'a>),
    Assignment(AssignmentExpression<'a>),
    Call(CallExpression<'a>),
    Parenthesized(ParenthesizedExpression<'a>),
    /// Placeholder for an expression that could not be parsed.
    Invalid(InvalidExpression<'a>),
}

/// Integer, double, string, `true` or `false`.
#[derive(Debug)]
pub struct LiteralExpression<'a> {
    pub token: Token<'a>,
}

#[derive(Debug)]
pub struct NameExpression<'a> {
    pub identifier: Token<'a>,
}

#[derive(Debug)]
pub struct UnaryExpression<'a> {
    pub operator_token: Token<'a>,
    pub operand: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub left: &'a Expression<'a>,
    pub operator_token: Token<'a>,
    pub right: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct AssignmentExpression<'a> {
    pub identifier: Token<'a>,
    pub equals_token: Token<'a>,
    pub value: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct CallExpression<'a> {
    pub identifier: Token<'a>,
    pub open_paren_token: Token<'a>,
    pub arguments: NodeList<'a, Expression<'a>>,
    pub close_paren_token: Token<'a>,
}

#[derive(Debug)]
pub struct ParenthesizedExpression<'a> {
    pub open_paren_token: Token<'a>,
    pub expression: &'a Expression<'a>,
    pub close_paren_token: Token<'a>,
}

#[derive(Debug)]
pub struct InvalidExpression<'a> {
    pub token: Token<'a>,
}

// ============================================================================
// Kind and main token
// ============================================================================

impl<'a> Member<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Member::Function(_) => SyntaxKind::FunctionDeclaration,
            Member::GlobalStatement(_) => SyntaxKind::GlobalStatement,
        }
    }

    pub fn main_token(&self) -> Token<'a> {
        match self {
            Member::Function(f) => f.name,
            Member::GlobalStatement(g) => g.statement.main_token(),
        }
    }
}

impl<'a> Statement<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Statement::Block(_) => SyntaxKind::Block,
            Statement::If(_) => SyntaxKind::IfStatement,
            Statement::Expression(_) => SyntaxKind::ExpressionStatement,
            Statement::Empty(_) => SyntaxKind::EmptyStatement,
            Statement::VariableDeclaration(_) => SyntaxKind::VariableDeclaration,
            Statement::Return(_) => SyntaxKind::ReturnStatement,
            Statement::Goto(_) => SyntaxKind::GotoStatement,
            Statement::Label(_) => SyntaxKind::LabelStatement,
            Statement::Invalid(_) => SyntaxKind::InvalidStatement,
        }
    }

    /// The most representative token, used to position diagnostics.
    pub fn main_token(&self) -> Token<'a> {
        match self {
            Statement::Block(b) => b.open_brace_token,
            Statement::If(s) => s.if_keyword,
            Statement::Expression(s) => s.expression.main_token(),
            Statement::Empty(s) => s.semicolon_token,
            Statement::VariableDeclaration(s) => s.name,
            Statement::Return(s) => s.return_keyword,
            Statement::Goto(s) => s.label,
            Statement::Label(s) => s.label,
            Statement::Invalid(s) => s.token,
        }
    }
}

impl<'a> Expression<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Expression::Literal(_) => SyntaxKind::LiteralExpression,
            Expression::Name(_) => SyntaxKind::NameExpression,
            Expression::Unary(_) => SyntaxKind::UnaryExpression,
            Expression::Binary(_) => SyntaxKind::BinaryExpression,
            Expression::Assignment(_) => SyntaxKind::AssignmentExpression,
            Expression::Call(_) => SyntaxKind::CallExpression,
            Expression::Parenthesized(_) => SyntaxKind::ParenthesizedExpression,
            Expression::Invalid(_) => SyntaxKind::InvalidExpression,
        }
    }

    pub fn main_token(&self) -> Token<'a> {
        match self {
            Expression::Literal(e) => e.token,
            Expression::Name(e) => e.identifier,
            Expression::Unary(e) => e.operator_token,
            Expression::Binary(e) => e.operator_token,
            Expression::Assignment(e) => e.identifier,
            Expression::Call(e) => e.identifier,
            Expression::Parenthesized(e) => e.open_paren_token,
            Expression::Invalid(e) => e.token,
        }
    }

    /// Source span from the first to the last token of the expression.
    pub fn span(&self) -> TextSpan {
        self.first_token_span().union(&self.last_token_span())
    }

    /// Operator chains nest on the left, so this walks down instead of
    /// recursing.
    fn first_token_span(&self) -> TextSpan {
        let mut expression = self;
        loop {
            match expression {
                Expression::Binary(e) => expression = e.left,
                Expression::Literal(e) => return e.token.span,
                Expression::Name(e) => return e.identifier.span,
                Expression::Unary(e) => return e.operator_token.span,
                Expression::Assignment(e) => return e.identifier.span,
                Expression::Call(e) => return e.identifier.span,
                Expression::Parenthesized(e) => return e.open_paren_token.span,
                Expression::Invalid(e) => return e.token.span,
            }
        }
    }

    fn last_token_span(&self) -> TextSpan {
        let mut expression = self;
        loop {
            match expression {
                Expression::Binary(e) => expression = e.right,
                Expression::Unary(e) => expression = e.operand,
                Expression::Assignment(e) => expression = e.value,
                Expression::Literal(e) => return e.token.span,
                Expression::Name(e) => return e.identifier.span,
                Expression::Call(e) => return e.close_paren_token.span,
                Expression::Parenthesized(e) => return e.close_paren_token.span,
                Expression::Invalid(e) => return e.token.span,
            }
        }
    }
}

// ============================================================================
// Generic traversal
// ============================================================================

/// A reference to any node of the tree.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'a> {
    CompilationUnit(&'a CompilationUnit<'a>),
    Member(&'a Member<'a>),
    Parameter(&'a Parameter<'a>),
    Block(&'a Block<'a>),
    Statement(&'a Statement<'a>),
    Expression(&'a Expression<'a>),
}

impl<'a> SyntaxNode<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxNode::CompilationUnit(_) => SyntaxKind::CompilationUnit,
            SyntaxNode::Member(m) => m.kind(),
            SyntaxNode::Parameter(_) => SyntaxKind::Parameter,
            SyntaxNode::Block(_) => SyntaxKind::Block,
            SyntaxNode::Statement(s) => s.kind(),
            SyntaxNode::Expression(e) => e.kind(),
        }
    }

    pub fn main_token(&self) -> Token<'a> {
        match self {
            SyntaxNode::CompilationUnit(u) => match u.members.first() {
                Some(member) => member.main_token(),
                None => u.end_of_file_token,
            },
            SyntaxNode::Member(m) => m.main_token(),
            SyntaxNode::Parameter(p) => p.name,
            SyntaxNode::Block(b) => b.open_brace_token,
            SyntaxNode::Statement(s) => s.main_token(),
            SyntaxNode::Expression(e) => e.main_token(),
        }
    }

    /// The ordered child nodes. Tokens are not included.
    pub fn children(&self) -> Vec<SyntaxNode<'a>> {
        let mut children = Vec::new();
        match *self {
            SyntaxNode::CompilationUnit(u) => {
                children.extend(u.members.iter().map(SyntaxNode::Member));
            }
            SyntaxNode::Member(Member::Function(f)) => {
                children.extend(f.parameters.iter().map(SyntaxNode::Parameter));
                children.push(SyntaxNode::Block(f.body));
            }
            SyntaxNode::Member(Member::GlobalStatement(g)) => {
                children.push(SyntaxNode::Statement(g.statement));
            }
            SyntaxNode::Parameter(_) => {}
            SyntaxNode::Block(b) => {
                children.extend(b.statements.iter().map(SyntaxNode::Statement));
            }
            SyntaxNode::Statement(s) => match s {
                Statement::Block(b) => {
                    children.extend(b.statements.iter().map(SyntaxNode::Statement));
                }
                Statement::If(s) => {
                    children.push(SyntaxNode::Expression(s.condition));
                    children.push(SyntaxNode::Statement(s.then_statement));
                    if let Some(ref else_clause) = s.else_clause {
                        children.push(SyntaxNode::Statement(else_clause.statement));
                    }
                }
                Statement::Expression(s) => children.push(SyntaxNode::Expression(s.expression)),
                Statement::VariableDeclaration(s) => {
                    if let Some(initializer) = s.initializer {
                        children.push(SyntaxNode::Expression(initializer));
                    }
                }
                Statement::Return(s) => {
                    if let Some(value) = s.value {
                        children.push(SyntaxNode::Expression(value));
                    }
                }
                Statement::Empty(_)
                | Statement::Goto(_)
                | Statement::Label(_)
                | Statement::Invalid(_) => {}
            },
            SyntaxNode::Expression(e) => match e {
                Expression::Unary(e) => children.push(SyntaxNode::Expression(e.operand)),
                Expression::Binary(e) => {
                    children.push(SyntaxNode::Expression(e.left));
                    children.push(SyntaxNode::Expression(e.right));
                }
                Expression::Assignment(e) => children.push(SyntaxNode::Expression(e.value)),
                Expression::Call(e) => {
                    children.extend(e.arguments.iter().map(SyntaxNode::Expression));
                }
                Expression::Parenthesized(e) => {
                    children.push(SyntaxNode::Expression(e.expression));
                }
                Expression::Literal(_) | Expression::Name(_) | Expression::Invalid(_) => {}
            },
        }
        children
    }

    /// This node and all of its descendants, in pre-order.
    pub fn descendants(&self) -> Vec<SyntaxNode<'a>> {
        let mut out = Vec::new();
        let mut stack = vec![*self];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children = node.children();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}
