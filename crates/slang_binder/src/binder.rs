//! The binder implementation.
//!
//! Walks the syntax tree and produces a [`BoundTree`]:
//! - Builtins and function signatures are declared first and frozen into
//!   the [`FunctionTable`], so calls resolve regardless of declaration order
//! - Global statements bind next, in source order, in the root scope
//! - Function bodies bind last, each in its own scope under the root
//!
//! Binding never stops at an error. A construct that fails to bind gets the
//! `Error` type, and `Error` operands are never reported again.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use slang_ast::node::*;
use slang_ast::syntax_kind::SyntaxKind;
use slang_ast::token::Token;
use slang_core::intern::StringInterner;
use slang_core::stack::ensure_sufficient_stack;
use slang_core::text::{SourceText, TextSpan};
use slang_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use tracing::{debug, trace};

use crate::bound_tree::*;
use crate::conversion::Conversion;
use crate::function_table::{FunctionTable, FunctionTableBuilder};
use crate::operators::{BoundBinaryOperator, BoundUnaryOperator};
use crate::scope::{ScopeArena, ScopeId, ScopeKind, SymbolKey};
use crate::symbol::*;
use crate::types::TypeSymbol;

/// The binder resolves names and types of one compilation unit.
pub struct Binder<'a, 'd> {
    source: &'a SourceText,
    diagnostics: &'d mut DiagnosticCollection,
    interner: StringInterner,
    scopes: ScopeArena,
    symbols: SymbolTable,
    functions: FunctionTable,
    globals: Vec<SymbolId>,
    /// The scope new declarations go into.
    scope: ScopeId,
    /// The function whose body is being bound.
    function: Option<SymbolId>,
}

impl<'a, 'd> Binder<'a, 'd> {
    /// Bind a compilation unit, reporting into `diagnostics`.
    #[tracing::instrument(level = "debug", skip_all, fields(file = source.name()))]
    pub fn bind(
        unit: &'a CompilationUnit<'a>,
        source: &'a SourceText,
        diagnostics: &'d mut DiagnosticCollection,
    ) -> BoundTree<'a> {
        let scopes = ScopeArena::new();
        let root = scopes.root();
        let mut binder = Binder {
            source,
            diagnostics,
            interner: StringInterner::new(),
            scopes,
            symbols: SymbolTable::new(),
            functions: FunctionTable::default(),
            globals: Vec::new(),
            scope: root,
            function: None,
        };

        // Declaration phase: build, then freeze.
        let mut builder = FunctionTableBuilder::new();
        binder.declare_builtins(&mut builder);
        let mut declared = Vec::new();
        for member in unit.members {
            if let Member::Function(declaration) = member {
                let (id, registered) = binder.declare_function(&mut builder, declaration);
                declared.push((declaration, id, registered));
            }
        }
        binder.functions = builder.freeze();

        let global_statements: Vec<&'a Statement<'a>> = unit
            .members
            .iter()
            .filter_map(|member| match member {
                Member::GlobalStatement(global) => Some(global.statement),
                Member::Function(_) => None,
            })
            .collect();
        let statements = binder.bind_statement_list(root, &global_statements);

        let mut definitions = IndexMap::new();
        for (declaration, id, registered) in declared {
            let definition = binder.bind_function_body(declaration, id);
            // Bodies of rejected duplicates are bound for their diagnostics only.
            if registered {
                definitions.insert(id, definition);
            }
        }

        debug!(
            symbols = binder.symbols.len(),
            scopes = binder.scopes.len(),
            functions = definitions.len(),
            globals = binder.globals.len(),
            "bound"
        );

        BoundTree {
            interner: binder.interner,
            scopes: binder.scopes,
            symbols: binder.symbols,
            functions: binder.functions,
            definitions,
            globals: binder.globals,
            statements,
        }
    }

    fn report(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics
            .add(Diagnostic::with_source(self.source, span, message, args));
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn declare_builtins(&mut self, builder: &mut FunctionTableBuilder) {
        let print = self.interner.intern_static("print");
        let input = self.interner.intern_static("input");
        let text = self.interner.intern_static("text");
        let newline = self.interner.intern_static("newline");
        let rndi = self.interner.intern_static("rndi");
        let max = self.interner.intern_static("max");
        let builtins = [
            FunctionSymbol {
                name: print,
                parameters: vec![ParameterSymbol { name: text, ty: TypeSymbol::String }],
                return_type: TypeSymbol::Void,
                builtin: Some(Builtin::PrintLine),
            },
            FunctionSymbol {
                name: print,
                parameters: vec![
                    ParameterSymbol { name: text, ty: TypeSymbol::String },
                    ParameterSymbol { name: newline, ty: TypeSymbol::Bool },
                ],
                return_type: TypeSymbol::Void,
                builtin: Some(Builtin::Print),
            },
            FunctionSymbol {
                name: input,
                parameters: Vec::new(),
                return_type: TypeSymbol::String,
                builtin: Some(Builtin::Input),
            },
            FunctionSymbol {
                name: rndi,
                parameters: vec![ParameterSymbol { name: max, ty: TypeSymbol::Int }],
                return_type: TypeSymbol::Int,
                builtin: Some(Builtin::Rndi),
            },
        ];
        for builtin in builtins {
            let declared = builder.declare(&mut self.symbols, builtin);
            debug_assert!(declared.is_ok());
        }
    }

    /// Declare a function's signature. Returns its symbol and whether it
    /// joined the overload set.
    fn declare_function(
        &mut self,
        builder: &mut FunctionTableBuilder,
        declaration: &'a FunctionDeclaration<'a>,
    ) -> (SymbolId, bool) {
        let mut parameters = Vec::with_capacity(declaration.parameters.len());
        let mut seen = FxHashSet::default();
        for parameter in declaration.parameters {
            let name = self.interner.intern(parameter.name.text);
            let mut ty = self.bind_type_clause(parameter.type_clause);
            if ty == TypeSymbol::Void {
                self.report(parameter.name.span, &messages::VOID_VARIABLE, &[parameter.name.text]);
                ty = TypeSymbol::Error;
            }
            if !parameter.name.is_missing() && !seen.insert(name) {
                self.report(
                    parameter.name.span,
                    &messages::PARAMETER_ALREADY_DECLARED,
                    &[parameter.name.text],
                );
            }
            parameters.push(ParameterSymbol { name, ty });
        }
        let return_type = match declaration.return_type {
            Some(clause) => self.bind_type_clause(clause),
            None => TypeSymbol::Void,
        };

        let function = FunctionSymbol {
            name: self.interner.intern(declaration.name.text),
            parameters,
            return_type,
            builtin: None,
        };
        if declaration.name.is_missing() {
            return (self.symbols.add(Symbol::Function(function)), false);
        }
        match builder.declare(&mut self.symbols, function.clone()) {
            Ok(id) => (id, true),
            Err(_) => {
                let signature = function.signature_text();
                self.report(
                    declaration.name.span,
                    &messages::DUPLICATE_OVERLOAD,
                    &[declaration.name.text, &signature],
                );
                (self.symbols.add(Symbol::Function(function)), false)
            }
        }
    }

    fn bind_type_clause(&mut self, clause: TypeClause<'a>) -> TypeSymbol {
        let type_name = clause.type_name;
        if type_name.is_missing() {
            return TypeSymbol::Error;
        }
        match TypeSymbol::lookup(type_name.text) {
            Some(ty) => ty,
            None => {
                self.report(type_name.span, &messages::UNDEFINED_TYPE, &[type_name.text]);
                TypeSymbol::Error
            }
        }
    }

    fn bind_function_body(
        &mut self,
        declaration: &'a FunctionDeclaration<'a>,
        function: SymbolId,
    ) -> FunctionDefinition<'a> {
        let signature = self.symbols[function]
            .as_function()
            .map(|f| f.parameters.clone())
            .unwrap_or_default();

        let scope = self.scopes.push(self.scopes.root(), ScopeKind::Function);
        let mut parameters = Vec::with_capacity(signature.len());
        for parameter in signature {
            let variable = self.symbols.add(Symbol::LocalVariable(VariableSymbol {
                name: parameter.name,
                is_read_only: false,
                ty: parameter.ty,
            }));
            // A clash was reported with the signature.
            let _ = self
                .scopes
                .declare(scope, SymbolKey::variable(parameter.name), variable);
            parameters.push(variable);
        }

        self.function = Some(function);
        let statements: Vec<&'a Statement<'a>> = declaration.body.statements.iter().collect();
        let body = self.bind_statement_list(scope, &statements);
        self.function = None;

        FunctionDefinition {
            symbol: function,
            parameters,
            body,
            end_token: declaration.body.close_brace_token,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Bind `statements` in `scope`. Labels are declared up front so a
    /// `goto` may jump forward.
    fn bind_statement_list(
        &mut self,
        scope: ScopeId,
        statements: &[&'a Statement<'a>],
    ) -> BoundBlock<'a> {
        let saved = std::mem::replace(&mut self.scope, scope);

        let mut labels = FxHashMap::default();
        for (index, statement) in statements.iter().enumerate() {
            if let Statement::Label(label) = statement {
                if label.label.is_missing() {
                    continue;
                }
                let name = self.interner.intern(label.label.text);
                let id = self.symbols.add(Symbol::Label(LabelSymbol { name }));
                match self.scopes.declare(scope, SymbolKey::label(name), id) {
                    Ok(()) => {
                        labels.insert(id, index);
                    }
                    Err(_) => self.report(
                        label.label.span,
                        &messages::ALREADY_DECLARED,
                        &["Label", label.label.text],
                    ),
                }
            }
        }

        let mut bound = Vec::with_capacity(statements.len());
        for statement in statements {
            bound.push(self.bind_statement(statement));
        }

        self.scope = saved;
        BoundBlock {
            scope,
            statements: bound,
            labels,
        }
    }

    fn bind_statement(&mut self, statement: &'a Statement<'a>) -> BoundStatement<'a> {
        match statement {
            Statement::Block(block) => {
                let scope = self.scopes.push(self.scope, ScopeKind::Block);
                let statements: Vec<&'a Statement<'a>> = block.statements.iter().collect();
                BoundStatement::Block(self.bind_statement_list(scope, &statements))
            }
            Statement::If(s) => {
                let condition = self.bind_condition(s.condition);
                let then_statement = Box::new(self.bind_embedded_statement(s.then_statement));
                let else_statement = s
                    .else_clause
                    .as_ref()
                    .map(|clause| Box::new(self.bind_embedded_statement(clause.statement)));
                BoundStatement::If {
                    condition,
                    then_statement,
                    else_statement,
                }
            }
            Statement::Expression(s) => self.bind_expression_statement(s),
            Statement::VariableDeclaration(d) => self.bind_variable_declaration(d),
            Statement::Return(s) => self.bind_return_statement(s),
            Statement::Goto(s) => self.bind_goto_statement(s),
            Statement::Label(s) => {
                let name = self.interner.intern(s.label.text);
                match self.scopes.lookup_local(self.scope, SymbolKey::label(name)) {
                    Some(label) => BoundStatement::Label(label),
                    None => BoundStatement::Empty,
                }
            }
            Statement::Empty(_) | Statement::Invalid(_) => BoundStatement::Empty,
        }
    }

    /// The branch of an `if`. Declarations and labels there get a scope of
    /// their own, as if the branch were a block.
    fn bind_embedded_statement(&mut self, statement: &'a Statement<'a>) -> BoundStatement<'a> {
        match statement {
            Statement::Label(_) | Statement::VariableDeclaration(_) => {
                let scope = self.scopes.push(self.scope, ScopeKind::Block);
                BoundStatement::Block(self.bind_statement_list(scope, &[statement]))
            }
            _ => self.bind_statement(statement),
        }
    }

    fn bind_expression_statement(&mut self, s: &'a ExpressionStatement<'a>) -> BoundStatement<'a> {
        let expression = self.bind_expression(s.expression);
        let has_effect = matches!(
            expression.kind,
            BoundExpressionKind::Call { .. }
                | BoundExpressionKind::Assignment { .. }
                | BoundExpressionKind::Error
        );
        if !has_effect {
            self.report(s.expression.span(), &messages::UNUSED_EXPRESSION_VALUE, &[]);
        }
        BoundStatement::Expression(expression)
    }

    fn bind_variable_declaration(&mut self, d: &'a VariableDeclaration<'a>) -> BoundStatement<'a> {
        let name_token = d.name;
        let declared_type = d.type_clause.map(|clause| self.bind_type_clause(clause));
        let initializer = d
            .initializer
            .map(|expression| self.bind_expression_with_value(expression));

        if d.is_read_only() && initializer.is_none() {
            self.report(
                name_token.span,
                &messages::CONSTANT_REQUIRES_INITIALIZER,
                &[name_token.text],
            );
        }

        let ty = match (declared_type, &initializer) {
            (Some(TypeSymbol::Void), _) => {
                self.report(name_token.span, &messages::VOID_VARIABLE, &[name_token.text]);
                TypeSymbol::Error
            }
            (Some(ty), _) => ty,
            (None, Some(initializer)) => initializer.ty,
            (None, None) => {
                if !d.is_read_only() {
                    self.report(
                        name_token.span,
                        &messages::VARIABLE_REQUIRES_TYPE,
                        &[name_token.text],
                    );
                }
                TypeSymbol::Error
            }
        };

        let initializer = match (initializer, d.initializer) {
            (Some(bound), Some(syntax)) => Some(self.bind_conversion(bound, ty, false, syntax.span())),
            _ => None,
        };

        let name = self.interner.intern(name_token.text);
        let variable = VariableSymbol {
            name,
            is_read_only: d.is_read_only(),
            ty,
        };
        let is_global = self.scope == self.scopes.root();
        let variable = self.symbols.add(if is_global {
            Symbol::GlobalVariable(variable)
        } else {
            Symbol::LocalVariable(variable)
        });
        if is_global {
            self.globals.push(variable);
        }
        if !name_token.is_missing()
            && self
                .scopes
                .declare(self.scope, SymbolKey::variable(name), variable)
                .is_err()
        {
            self.report(
                name_token.span,
                &messages::ALREADY_DECLARED,
                &["Variable", name_token.text],
            );
        }

        BoundStatement::VariableDeclaration {
            variable,
            initializer,
        }
    }

    fn bind_return_statement(&mut self, s: &'a ReturnStatement<'a>) -> BoundStatement<'a> {
        let token = s.return_keyword;
        let Some(function) = self.function else {
            self.report(token.span, &messages::RETURN_OUTSIDE_FUNCTION, &[]);
            if let Some(value) = s.value {
                self.bind_expression(value);
            }
            return BoundStatement::Empty;
        };
        let (name, return_type) = match self.symbols[function].as_function() {
            Some(f) => (f.name, f.return_type),
            None => return BoundStatement::Empty,
        };
        let name = self.interner.resolve(name).to_string();

        let value = match (s.value, return_type) {
            (None, TypeSymbol::Void) => None,
            (None, ty) => {
                if !ty.is_error() {
                    self.report(
                        token.span,
                        &messages::RETURN_VALUE_EXPECTED,
                        &[&name, ty.name()],
                    );
                }
                None
            }
            (Some(value), TypeSymbol::Void) => {
                self.bind_expression(value);
                self.report(value.span(), &messages::RETURN_VALUE_UNEXPECTED, &[&name]);
                None
            }
            (Some(value), ty) => {
                let bound = self.bind_expression_with_value(value);
                Some(self.bind_conversion(bound, ty, false, value.span()))
            }
        };
        BoundStatement::Return { token, value }
    }

    fn bind_goto_statement(&mut self, s: &'a GotoStatement<'a>) -> BoundStatement<'a> {
        if s.label.is_missing() {
            return BoundStatement::Empty;
        }
        let name = self.interner.intern(s.label.text);
        match self.scopes.lookup_label(self.scope, name) {
            Some(label) => BoundStatement::Goto {
                token: s.label,
                label,
            },
            None => {
                self.report(s.label.span, &messages::UNDEFINED_LABEL, &[s.label.text]);
                BoundStatement::Empty
            }
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn bind_condition(&mut self, condition: &'a Expression<'a>) -> BoundExpression<'a> {
        let bound = self.bind_expression_with_value(condition);
        self.bind_conversion(bound, TypeSymbol::Bool, false, condition.span())
    }

    /// Bind an expression whose value is used. A `void` call is reported.
    fn bind_expression_with_value(&mut self, expression: &'a Expression<'a>) -> BoundExpression<'a> {
        let bound = self.bind_expression(expression);
        if bound.ty == TypeSymbol::Void {
            self.report(expression.span(), &messages::EXPRESSION_MUST_HAVE_VALUE, &[]);
            return BoundExpression::error(bound.token);
        }
        bound
    }

    fn bind_expression(&mut self, expression: &'a Expression<'a>) -> BoundExpression<'a> {
        ensure_sufficient_stack(|| match expression {
            Expression::Literal(e) => self.bind_literal(e.token),
            Expression::Name(e) => self.bind_name(e.identifier),
            Expression::Unary(e) => self.bind_unary(e),
            Expression::Binary(e) => self.bind_binary(e),
            Expression::Assignment(e) => self.bind_assignment(e),
            Expression::Call(e) => self.bind_call(e),
            Expression::Parenthesized(e) => self.bind_expression(e.expression),
            Expression::Invalid(e) => BoundExpression::error(e.token),
        })
    }

    fn bind_literal(&mut self, token: Token<'a>) -> BoundExpression<'a> {
        let ty = match token.kind {
            SyntaxKind::IntLiteral => TypeSymbol::Int,
            SyntaxKind::DoubleLiteral => TypeSymbol::Double,
            SyntaxKind::StringLiteral => TypeSymbol::String,
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => TypeSymbol::Bool,
            _ => TypeSymbol::Error,
        };
        match token.value {
            Some(value) if !ty.is_error() => {
                BoundExpression::new(BoundExpressionKind::Literal(value), ty, token)
            }
            _ => BoundExpression::error(token),
        }
    }

    fn bind_name(&mut self, identifier: Token<'a>) -> BoundExpression<'a> {
        if identifier.is_missing() {
            return BoundExpression::error(identifier);
        }
        let Some((variable, ty)) = self.lookup_variable(identifier) else {
            self.report(identifier.span, &messages::UNDEFINED_VARIABLE, &[identifier.text]);
            return BoundExpression::error(identifier);
        };
        BoundExpression::new(BoundExpressionKind::Variable(variable), ty, identifier)
    }

    fn lookup_variable(&mut self, identifier: Token<'a>) -> Option<(SymbolId, TypeSymbol)> {
        let name = self.interner.intern(identifier.text);
        let id = self.scopes.lookup(self.scope, SymbolKey::variable(name))?;
        let variable = self.symbols[id].as_variable()?;
        Some((id, variable.ty))
    }

    fn bind_assignment(&mut self, e: &'a AssignmentExpression<'a>) -> BoundExpression<'a> {
        let value = self.bind_expression_with_value(e.value);
        let identifier = e.identifier;
        let Some((variable, ty)) = self.lookup_variable(identifier) else {
            self.report(identifier.span, &messages::UNDEFINED_VARIABLE, &[identifier.text]);
            return BoundExpression::error(identifier);
        };
        let is_read_only = self.symbols[variable]
            .as_variable()
            .map_or(false, |v| v.is_read_only);
        if is_read_only {
            self.report(identifier.span, &messages::CANNOT_ASSIGN_READ_ONLY, &[identifier.text]);
            return BoundExpression::error(identifier);
        }
        let value = self.bind_conversion(value, ty, false, e.value.span());
        if value.has_errors() && !ty.is_error() {
            return BoundExpression::error(identifier);
        }
        BoundExpression::new(
            BoundExpressionKind::Assignment {
                variable,
                value: Box::new(value),
            },
            ty,
            identifier,
        )
    }

    fn bind_unary(&mut self, e: &'a UnaryExpression<'a>) -> BoundExpression<'a> {
        let operand = self.bind_expression_with_value(e.operand);
        let token = e.operator_token;
        if operand.has_errors() {
            return BoundExpression::error(token);
        }
        match BoundUnaryOperator::bind(token.kind, operand.ty) {
            Some(operator) => BoundExpression::new(
                BoundExpressionKind::Unary {
                    operator,
                    operand: Box::new(operand),
                },
                operator.result_type,
                token,
            ),
            None => {
                self.report(
                    token.span,
                    &messages::NO_APPLICABLE_UNARY_OPERATOR,
                    &[token.text, operand.ty.name()],
                );
                BoundExpression::error(token)
            }
        }
    }

    fn bind_binary(&mut self, e: &'a BinaryExpression<'a>) -> BoundExpression<'a> {
        let left = self.bind_expression_with_value(e.left);
        let right = self.bind_expression_with_value(e.right);
        let token = e.operator_token;
        if left.has_errors() || right.has_errors() {
            return BoundExpression::error(token);
        }
        let Some(operator) = BoundBinaryOperator::bind(token.kind, left.ty, right.ty) else {
            self.report(
                token.span,
                &messages::NO_APPLICABLE_BINARY_OPERATOR,
                &[token.text, left.ty.name(), right.ty.name()],
            );
            return BoundExpression::error(token);
        };
        // Widen an int operand when the other one is a double.
        let left = self.bind_conversion(left, operator.operand_type, false, e.left.span());
        let right = self.bind_conversion(right, operator.operand_type, false, e.right.span());
        BoundExpression::new(
            BoundExpressionKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            operator.result_type,
            token,
        )
    }

    fn bind_call(&mut self, e: &'a CallExpression<'a>) -> BoundExpression<'a> {
        let identifier = e.identifier;
        if let Some(ty) = TypeSymbol::lookup(identifier.text).filter(|ty| ty.is_value_type()) {
            return self.bind_explicit_conversion(e, ty);
        }

        let mut arguments = Vec::with_capacity(e.arguments.len());
        for argument in e.arguments {
            arguments.push(self.bind_expression_with_value(argument));
        }
        if identifier.is_missing() || arguments.iter().any(BoundExpression::has_errors) {
            return BoundExpression::error(identifier);
        }

        let name = self.interner.intern(identifier.text);
        let overloads = self.functions.overloads(name).to_vec();
        if overloads.is_empty() {
            self.report(identifier.span, &messages::UNDEFINED_FUNCTION, &[identifier.text]);
            return BoundExpression::error(identifier);
        }

        let Some((function, return_type, parameter_types)) = self.resolve_overload(&overloads, &arguments)
        else {
            let argument_types = type_list(arguments.iter().map(|a| a.ty));
            self.report(
                identifier.span,
                &messages::NO_MATCHING_OVERLOAD,
                &[identifier.text, &argument_types],
            );
            return BoundExpression::error(identifier);
        };

        let arguments = arguments
            .into_iter()
            .zip(parameter_types)
            .zip(e.arguments)
            .map(|((argument, ty), syntax)| self.bind_conversion(argument, ty, true, syntax.span()))
            .collect();
        BoundExpression::new(
            BoundExpressionKind::Call {
                function,
                arguments,
            },
            return_type,
            identifier,
        )
    }

    /// Pick the overload for `arguments`. A candidate ranks by its costliest
    /// argument conversion: exact matches beat implicit ones, which beat
    /// explicit ones. Ties go to the earliest declaration.
    fn resolve_overload(
        &self,
        overloads: &[SymbolId],
        arguments: &[BoundExpression<'a>],
    ) -> Option<(SymbolId, TypeSymbol, Vec<TypeSymbol>)> {
        let mut best: Option<(SymbolId, u8)> = None;
        for &candidate in overloads {
            let Some(function) = self.symbols[candidate].as_function() else {
                continue;
            };
            if function.parameters.len() != arguments.len() {
                continue;
            }
            let mut rank = 0;
            let mut applicable = true;
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                if parameter.ty.is_error() {
                    continue;
                }
                match Conversion::classify(argument.ty, parameter.ty).cost() {
                    Some(cost) => rank = rank.max(cost),
                    None => {
                        applicable = false;
                        break;
                    }
                }
            }
            if !applicable {
                continue;
            }
            trace!(candidate = candidate.index(), rank, "applicable overload");
            if best.map_or(true, |(_, best_rank)| rank < best_rank) {
                best = Some((candidate, rank));
            }
        }

        let (id, _) = best?;
        let function = self.symbols[id].as_function()?;
        let parameter_types = function.parameters.iter().map(|p| p.ty).collect();
        Some((id, function.return_type, parameter_types))
    }

    /// `int(x)`, `double(x)`, `bool(x)` and `string(x)`.
    fn bind_explicit_conversion(
        &mut self,
        e: &'a CallExpression<'a>,
        ty: TypeSymbol,
    ) -> BoundExpression<'a> {
        if e.arguments.len() != 1 {
            for argument in e.arguments {
                self.bind_expression(argument);
            }
            self.report(
                e.identifier.span,
                &messages::CONVERSION_TAKES_ONE_ARGUMENT,
                &[ty.name()],
            );
            return BoundExpression::error(e.identifier);
        }
        let syntax = &e.arguments[0];
        let argument = self.bind_expression_with_value(syntax);
        self.bind_conversion(argument, ty, true, syntax.span())
    }

    /// Convert `expression` to `to`, reporting when that is not allowed.
    /// Identity leaves the expression as it is.
    fn bind_conversion(
        &mut self,
        expression: BoundExpression<'a>,
        to: TypeSymbol,
        allow_explicit: bool,
        span: TextSpan,
    ) -> BoundExpression<'a> {
        if expression.has_errors() || to.is_error() {
            return expression;
        }
        let conversion = Conversion::classify(expression.ty, to);
        match conversion {
            Conversion::Identity => expression,
            Conversion::Implicit => wrap_conversion(expression, conversion, to),
            Conversion::Explicit if allow_explicit => wrap_conversion(expression, conversion, to),
            Conversion::Explicit => {
                self.report(
                    span,
                    &messages::EXPLICIT_CONVERSION_REQUIRED,
                    &[expression.ty.name(), to.name()],
                );
                BoundExpression::error(expression.token)
            }
            Conversion::None => {
                self.report(
                    span,
                    &messages::CANNOT_CONVERT,
                    &[expression.ty.name(), to.name()],
                );
                BoundExpression::error(expression.token)
            }
        }
    }
}

/// The conversion keeps the operand's token, so a failed runtime conversion
/// points at the value being converted.
fn wrap_conversion<'a>(
    operand: BoundExpression<'a>,
    conversion: Conversion,
    to: TypeSymbol,
) -> BoundExpression<'a> {
    let token = operand.token;
    BoundExpression::new(
        BoundExpressionKind::Conversion {
            conversion,
            operand: Box::new(operand),
        },
        to,
        token,
    )
}

