//! The slang parser implementation.
//!
//! A recursive descent parser with precedence climbing for binary
//! expressions. It reads the token stream of the lexer (with string quotes
//! dropped as trivia) and builds an arena-allocated syntax tree.

use bumpalo::Bump;
use slang_ast::node::*;
use slang_ast::syntax_kind::SyntaxKind;
use slang_ast::token::Token;
use slang_core::text::{SourceText, TextPos};
use slang_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use slang_lexer::Lexer;
use tracing::debug;

use crate::precedence::{
    get_binary_operator_precedence, get_unary_operator_precedence, OperatorPrecedence,
};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
const MAX_RECURSION_DEPTH: u32 = 128;

/// Allocate a Vec into the arena as a slice.
fn alloc_vec_in<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    if vec.is_empty() {
        return &[];
    }
    arena.alloc_slice_fill_iter(vec)
}

/// Parse a whole source, reporting lexical and syntax diagnostics into `diagnostics`.
#[tracing::instrument(level = "debug", skip_all, fields(file = source.name()))]
pub fn parse<'a>(
    arena: &'a Bump,
    source: &'a SourceText,
    diagnostics: &mut DiagnosticCollection,
) -> &'a CompilationUnit<'a> {
    let mut parser = Parser::new(arena, source);
    let unit = parser.parse_compilation_unit();
    diagnostics.extend(parser.take_diagnostics());
    unit
}

/// The parser produces a CompilationUnit from slang source text.
pub struct Parser<'a> {
    arena: &'a Bump,
    source: &'a SourceText,
    /// Non-trivia tokens; always ends with the end-of-file token.
    tokens: Vec<Token<'a>>,
    position: usize,
    diagnostics: DiagnosticCollection,
    /// Start of the last token an error was reported at, so one bad token
    /// does not produce a cascade of errors at the same place.
    last_error_pos: Option<TextPos>,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Bump, source: &'a SourceText) -> Self {
        let mut lexer = Lexer::new(source);
        let tokens: Vec<Token<'a>> = lexer.by_ref().filter(|t| !t.kind.is_trivia()).collect();
        let diagnostics = lexer.take_diagnostics();
        debug!(tokens = tokens.len(), lexer_diagnostics = diagnostics.len(), "lexed");
        Self {
            arena,
            source,
            tokens,
            position: 0,
            diagnostics,
            last_error_pos: None,
            recursion_depth: 0,
        }
    }

    pub fn parse_compilation_unit(&mut self) -> &'a CompilationUnit<'a> {
        let members = self.parse_members();
        let end_of_file_token = self.expect_token(SyntaxKind::EndOfFileToken);
        debug!(members = members.len(), errors = self.diagnostics.error_count(), "parsed");
        self.arena.alloc(CompilationUnit {
            members,
            end_of_file_token,
        })
    }

    /// Lexer diagnostics followed by parser diagnostics.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn peek(&self, offset: usize) -> Token<'a> {
        let index = (self.position + offset).min(self.tokens.len() - 1);
        self.tokens[index]
    }

    #[inline]
    fn current(&self) -> Token<'a> {
        self.peek(0)
    }

    #[inline]
    fn current_kind(&self) -> SyntaxKind {
        self.current().kind
    }

    /// Return the current token and move past it. The end-of-file token is
    /// never moved past.
    fn next_token(&mut self) -> Token<'a> {
        let token = self.current();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> Token<'a> {
        if self.current_kind() == kind {
            return self.next_token();
        }
        self.report_unexpected(&kind.describe());
        let current = self.current();
        Token::missing(kind, current.span, current.position)
    }

    fn optional_token(&mut self, kind: SyntaxKind) -> Option<Token<'a>> {
        if self.current_kind() == kind {
            Some(self.next_token())
        } else {
            None
        }
    }

    fn error_at(&mut self, token: Token<'a>, msg: &DiagnosticMessage, args: &[&str]) {
        if self.last_error_pos == Some(token.span.start) {
            return;
        }
        self.last_error_pos = Some(token.span.start);
        self.diagnostics
            .add(Diagnostic::with_source(self.source, token.span, msg, args));
    }

    /// Report the current token as unexpected. Invalid tokens were already
    /// reported by the lexer.
    fn report_unexpected(&mut self, expected: &str) {
        let token = self.current();
        if token.kind == SyntaxKind::InvalidToken {
            return;
        }
        let text = if token.kind == SyntaxKind::EndOfFileToken {
            "<end of file>".into()
        } else {
            token.sanitized_text()
        };
        let kind = token.kind.to_string();
        self.error_at(token, &messages::UNEXPECTED_TOKEN, &[&text, &kind, expected]);
    }

    /// Enter one level of nesting. On overflow the remaining input is
    /// abandoned, so every enclosing construct completes with missing tokens.
    fn enter_nested(&mut self) -> bool {
        self.recursion_depth += 1;
        if self.recursion_depth <= MAX_RECURSION_DEPTH {
            return true;
        }
        self.recursion_depth -= 1;
        let token = self.current();
        self.error_at(token, &messages::NESTED_TOO_DEEPLY, &[]);
        self.position = self.tokens.len() - 1;
        // Later errors at end of file would only repeat this one.
        self.last_error_pos = Some(self.current().span.start);
        false
    }

    #[inline]
    fn leave_nested(&mut self) {
        self.recursion_depth -= 1;
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn parse_members(&mut self) -> NodeList<'a, Member<'a>> {
        let mut members = Vec::new();
        while self.current_kind() != SyntaxKind::EndOfFileToken {
            let member = if self.current_kind() == SyntaxKind::FunKeyword {
                Member::Function(self.parse_function_declaration())
            } else {
                let statement = self.parse_statement();
                Member::GlobalStatement(GlobalStatement {
                    statement: self.arena.alloc(statement),
                })
            };
            members.push(member);
        }
        alloc_vec_in(self.arena, members)
    }

    fn parse_function_declaration(&mut self) -> FunctionDeclaration<'a> {
        let fun_keyword = self.expect_token(SyntaxKind::FunKeyword);
        let name = self.expect_token(SyntaxKind::Identifier);
        let open_paren_token = self.expect_token(SyntaxKind::OpenParenToken);

        let mut parameters = Vec::new();
        if self.current_kind() != SyntaxKind::CloseParenToken {
            loop {
                parameters.push(self.parse_parameter());
                if self.optional_token(SyntaxKind::CommaToken).is_none() {
                    break;
                }
            }
        }
        let parameters = alloc_vec_in(self.arena, parameters);

        let close_paren_token = self.expect_token(SyntaxKind::CloseParenToken);
        let return_type = if self.current_kind() == SyntaxKind::ColonToken {
            Some(self.parse_type_clause())
        } else {
            None
        };
        let body = self.parse_block();
        FunctionDeclaration {
            fun_keyword,
            name,
            open_paren_token,
            parameters,
            close_paren_token,
            return_type,
            body: self.arena.alloc(body),
        }
    }

    fn parse_parameter(&mut self) -> Parameter<'a> {
        let name = self.expect_token(SyntaxKind::Identifier);
        let type_clause = self.parse_type_clause();
        Parameter { name, type_clause }
    }

    fn parse_type_clause(&mut self) -> TypeClause<'a> {
        let colon_token = self.expect_token(SyntaxKind::ColonToken);
        let type_name = self.expect_token(SyntaxKind::Identifier);
        TypeClause {
            colon_token,
            type_name,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement(&mut self) -> Statement<'a> {
        if !self.enter_nested() {
            return Statement::Invalid(InvalidStatement {
                token: self.current(),
            });
        }
        let statement = match self.current_kind() {
            SyntaxKind::OpenBraceToken => Statement::Block(self.parse_block()),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => self.parse_variable_declaration(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::GotoKeyword => self.parse_goto_statement(),
            SyntaxKind::SemicolonToken => Statement::Empty(EmptyStatement {
                semicolon_token: self.next_token(),
            }),
            SyntaxKind::Identifier if self.peek(1).kind == SyntaxKind::ColonToken => {
                let label = self.next_token();
                let colon_token = self.next_token();
                Statement::Label(LabelStatement { label, colon_token })
            }
            SyntaxKind::FunKeyword => {
                // Functions are only declared at the top level.
                self.report_unexpected("statement");
                Statement::Invalid(InvalidStatement {
                    token: self.next_token(),
                })
            }
            _ => self.parse_expression_statement(),
        };
        self.leave_nested();
        statement
    }

    fn parse_block(&mut self) -> Block<'a> {
        let open_brace_token = self.expect_token(SyntaxKind::OpenBraceToken);
        let mut statements = Vec::new();
        while !matches!(
            self.current_kind(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            statements.push(self.parse_statement());
        }
        let close_brace_token = self.expect_token(SyntaxKind::CloseBraceToken);
        Block {
            open_brace_token,
            statements: alloc_vec_in(self.arena, statements),
            close_brace_token,
        }
    }

    fn parse_if_statement(&mut self) -> Statement<'a> {
        let if_keyword = self.expect_token(SyntaxKind::IfKeyword);
        self.expect_token(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression_and_alloc();
        self.expect_token(SyntaxKind::CloseParenToken);
        let then_statement = self.parse_statement();
        let then_statement = &*self.arena.alloc(then_statement);
        // The innermost `if` takes the `else`: the recursive call above has
        // already consumed any `else` belonging to a nested `if`.
        let else_clause = match self.optional_token(SyntaxKind::ElseKeyword) {
            Some(else_keyword) => {
                let statement = self.parse_statement();
                Some(ElseClause {
                    else_keyword,
                    statement: self.arena.alloc(statement),
                })
            }
            None => None,
        };
        Statement::If(IfStatement {
            if_keyword,
            condition,
            then_statement,
            else_clause,
        })
    }

    fn parse_variable_declaration(&mut self) -> Statement<'a> {
        let keyword = self.next_token();
        let name = self.expect_token(SyntaxKind::Identifier);
        let type_clause = if self.current_kind() == SyntaxKind::ColonToken {
            Some(self.parse_type_clause())
        } else {
            None
        };
        let initializer = if self.optional_token(SyntaxKind::EqualsToken).is_some() {
            Some(self.parse_expression_and_alloc())
        } else {
            None
        };
        let semicolon_token = self.expect_token(SyntaxKind::SemicolonToken);
        Statement::VariableDeclaration(VariableDeclaration {
            keyword,
            name,
            type_clause,
            initializer,
            semicolon_token,
        })
    }

    fn parse_return_statement(&mut self) -> Statement<'a> {
        let return_keyword = self.expect_token(SyntaxKind::ReturnKeyword);
        let value = if matches!(
            self.current_kind(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            None
        } else {
            Some(self.parse_expression_and_alloc())
        };
        let semicolon_token = self.expect_token(SyntaxKind::SemicolonToken);
        Statement::Return(ReturnStatement {
            return_keyword,
            value,
            semicolon_token,
        })
    }

    fn parse_goto_statement(&mut self) -> Statement<'a> {
        let goto_keyword = self.expect_token(SyntaxKind::GotoKeyword);
        let label = self.expect_token(SyntaxKind::Identifier);
        let semicolon_token = self.expect_token(SyntaxKind::SemicolonToken);
        Statement::Goto(GotoStatement {
            goto_keyword,
            label,
            semicolon_token,
        })
    }

    fn parse_expression_statement(&mut self) -> Statement<'a> {
        let expression = self.parse_expression_and_alloc();
        let semicolon_token = self.expect_token(SyntaxKind::SemicolonToken);
        Statement::Expression(ExpressionStatement {
            expression,
            semicolon_token,
        })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression_and_alloc(&mut self) -> &'a Expression<'a> {
        let expr = self.parse_expression();
        self.arena.alloc(expr)
    }

    fn parse_expression(&mut self) -> Expression<'a> {
        if !self.enter_nested() {
            return Expression::Invalid(InvalidExpression {
                token: self.current(),
            });
        }
        let expr = if self.current_kind() == SyntaxKind::Identifier
            && self.peek(1).kind == SyntaxKind::EqualsToken
        {
            self.parse_assignment_expression()
        } else {
            self.parse_binary_expression(OperatorPrecedence::Lowest)
        };
        self.leave_nested();
        expr
    }

    /// `name = value`, right-associative through `parse_expression`.
    fn parse_assignment_expression(&mut self) -> Expression<'a> {
        let identifier = self.next_token();
        let equals_token = self.next_token();
        let value = self.parse_expression_and_alloc();
        Expression::Assignment(AssignmentExpression {
            identifier,
            equals_token,
            value,
        })
    }

    fn parse_binary_expression(&mut self, parent_precedence: OperatorPrecedence) -> Expression<'a> {
        let unary_precedence = get_unary_operator_precedence(self.current_kind());
        let mut left = if unary_precedence != OperatorPrecedence::Invalid
            && unary_precedence >= parent_precedence
        {
            self.parse_unary_expression(unary_precedence)
        } else {
            self.parse_primary_expression()
        };

        loop {
            let precedence = get_binary_operator_precedence(self.current_kind());
            if precedence == OperatorPrecedence::Invalid || precedence <= parent_precedence {
                break;
            }
            let operator_token = self.next_token();
            let right = self.parse_binary_expression(precedence);
            let left_ref = self.arena.alloc(left);
            let right_ref = self.arena.alloc(right);
            left = Expression::Binary(BinaryExpression {
                left: left_ref,
                operator_token,
                right: right_ref,
            });
        }

        left
    }

    fn parse_unary_expression(&mut self, precedence: OperatorPrecedence) -> Expression<'a> {
        if !self.enter_nested() {
            return Expression::Invalid(InvalidExpression {
                token: self.current(),
            });
        }
        let operator_token = self.next_token();
        let operand = self.parse_binary_expression(precedence);
        self.leave_nested();
        Expression::Unary(UnaryExpression {
            operator_token,
            operand: self.arena.alloc(operand),
        })
    }

    fn parse_primary_expression(&mut self) -> Expression<'a> {
        match self.current_kind() {
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::IntLiteral
            | SyntaxKind::DoubleLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => Expression::Literal(LiteralExpression {
                token: self.next_token(),
            }),
            SyntaxKind::Identifier if self.peek(1).kind == SyntaxKind::OpenParenToken => {
                self.parse_call_expression()
            }
            SyntaxKind::Identifier => Expression::Name(NameExpression {
                identifier: self.next_token(),
            }),
            _ => self.parse_invalid_expression(),
        }
    }

    fn parse_invalid_expression(&mut self) -> Expression<'a> {
        self.report_unexpected("expression");
        // Consume the offending token so the caller always makes progress.
        // At end of file there is nothing left to consume.
        Expression::Invalid(InvalidExpression {
            token: self.next_token(),
        })
    }

    fn parse_parenthesized_expression(&mut self) -> Expression<'a> {
        let open_paren_token = self.expect_token(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression_and_alloc();
        let close_paren_token = self.expect_token(SyntaxKind::CloseParenToken);
        Expression::Parenthesized(ParenthesizedExpression {
            open_paren_token,
            expression,
            close_paren_token,
        })
    }

    fn parse_call_expression(&mut self) -> Expression<'a> {
        let identifier = self.expect_token(SyntaxKind::Identifier);
        let open_paren_token = self.expect_token(SyntaxKind::OpenParenToken);
        let arguments = self.parse_argument_list();
        let close_paren_token = self.expect_token(SyntaxKind::CloseParenToken);
        Expression::Call(CallExpression {
            identifier,
            open_paren_token,
            arguments,
            close_paren_token,
        })
    }

    fn parse_argument_list(&mut self) -> NodeList<'a, Expression<'a>> {
        let mut arguments = Vec::new();
        if !matches!(
            self.current_kind(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            loop {
                arguments.push(self.parse_expression());
                if self.optional_token(SyntaxKind::CommaToken).is_none() {
                    break;
                }
            }
        }
        alloc_vec_in(self.arena, arguments)
    }
}
