//! The tree-walking interpreter.
//!
//! Executes the global statements of a [`BoundTree`] in source order. Control
//! transfer out of a statement is a [`Flow`] value: a `goto` travels outward
//! until it reaches the block that holds its label, and a `return` travels
//! to the enclosing call.

use slang_ast::token::{LiteralValue, Token};
use slang_binder::{
    BoundBinaryOperator, BoundBinaryOperatorKind, BoundBlock, BoundExpression,
    BoundExpressionKind, BoundStatement, BoundTree, Builtin, SymbolId, TypeSymbol,
};
use slang_core::stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use crate::env::{Environment, FrameKind};
use crate::error::{Location, RuntimeError, RuntimeResult};
use crate::io::Io;
use crate::operators::{self, Fault};
use crate::value::{unescape, RuntimeValue};

/// Default limit on nested calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// How a statement finished.
#[derive(Debug)]
enum Flow {
    Normal,
    Return(RuntimeValue),
    Goto(SymbolId),
}

pub struct Interpreter<'t, 'a> {
    tree: &'t BoundTree<'a>,
    io: &'t mut dyn Io,
    env: Environment,
    call_depth: usize,
    max_call_depth: usize,
}

impl<'t, 'a> Interpreter<'t, 'a> {
    pub fn new(tree: &'t BoundTree<'a>, io: &'t mut dyn Io) -> Self {
        let globals = tree.globals.iter().map(|&id| {
            let ty = tree
                .symbol(id)
                .as_variable()
                .map_or(TypeSymbol::Error, |variable| variable.ty);
            (id, RuntimeValue::default_for(ty))
        });
        Self {
            tree,
            io,
            env: Environment::new(globals),
            call_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_max_call_depth(mut self, limit: usize) -> Self {
        self.max_call_depth = limit;
        self
    }

    /// Run the program. The first runtime failure ends the run.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(mut self) -> RuntimeResult<()> {
        let tree = self.tree;
        let flow = self.execute_block(&tree.statements)?;
        debug!(?flow, "program finished");
        Ok(())
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn execute_block(&mut self, block: &'t BoundBlock<'a>) -> RuntimeResult<Flow> {
        let mut index = 0;
        while let Some(statement) = block.statements.get(index) {
            match self.execute_statement(statement)? {
                Flow::Normal => index += 1,
                Flow::Goto(label) => match block.labels.get(&label) {
                    Some(&target) => {
                        trace!(target, "goto");
                        index = target;
                    }
                    None => return Ok(Flow::Goto(label)),
                },
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn execute_statement(&mut self, statement: &'t BoundStatement<'a>) -> RuntimeResult<Flow> {
        match statement {
            BoundStatement::Block(block) => {
                self.env.push(FrameKind::Block);
                let flow = self.execute_block(block);
                self.env.pop();
                flow
            }
            BoundStatement::If {
                condition,
                then_statement,
                else_statement,
            } => {
                if self.evaluate_bool(condition)? {
                    self.execute_statement(then_statement)
                } else if let Some(else_statement) = else_statement {
                    self.execute_statement(else_statement)
                } else {
                    Ok(Flow::Normal)
                }
            }
            BoundStatement::Expression(expression) => {
                self.evaluate(expression)?;
                Ok(Flow::Normal)
            }
            BoundStatement::VariableDeclaration {
                variable,
                initializer,
            } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => {
                        let ty = self
                            .tree
                            .symbol(*variable)
                            .as_variable()
                            .map_or(TypeSymbol::Error, |v| v.ty);
                        RuntimeValue::default_for(ty)
                    }
                };
                self.env.declare(*variable, value);
                Ok(Flow::Normal)
            }
            BoundStatement::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => RuntimeValue::Unit,
                };
                Ok(Flow::Return(value))
            }
            BoundStatement::Goto { label, .. } => Ok(Flow::Goto(*label)),
            BoundStatement::Label(_) | BoundStatement::Empty => Ok(Flow::Normal),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn evaluate(&mut self, expression: &'t BoundExpression<'a>) -> RuntimeResult<RuntimeValue> {
        ensure_sufficient_stack(|| self.evaluate_inner(expression))
    }

    fn evaluate_inner(&mut self, expression: &'t BoundExpression<'a>) -> RuntimeResult<RuntimeValue> {
        let token = &expression.token;
        match &expression.kind {
            BoundExpressionKind::Literal(value) => Ok(match value {
                LiteralValue::Int(value) => RuntimeValue::Int(*value),
                LiteralValue::Double(value) => RuntimeValue::Double(*value),
                LiteralValue::Bool(value) => RuntimeValue::Bool(*value),
                LiteralValue::Str(value) => RuntimeValue::string(value),
            }),
            BoundExpressionKind::Variable(variable) => match self.env.get(*variable) {
                Some(value) => Ok(value.clone()),
                None => Err(self.uninitialized(*variable, token)),
            },
            BoundExpressionKind::Assignment { variable, value } => {
                let value = self.evaluate(value)?;
                if self.env.assign(*variable, value.clone()) {
                    Ok(value)
                } else {
                    Err(self.uninitialized(*variable, token))
                }
            }
            BoundExpressionKind::Unary { operator, operand } => {
                let operand = self.evaluate(operand)?;
                operators::evaluate_unary(operator.kind, operand)
                    .map_err(|fault| self.fault(fault, token, expression.ty))
            }
            BoundExpressionKind::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, *operator, right, token),
            BoundExpressionKind::Call {
                function,
                arguments,
            } => self.call(*function, arguments, token),
            BoundExpressionKind::Conversion { operand, .. } => {
                let value = self.evaluate(operand)?;
                let rendered = value.to_string();
                operators::convert(value, expression.ty).map_err(|fault| match fault {
                    Fault::InvalidConversion => RuntimeError::InvalidConversion {
                        value: slang_ast::token::sanitize(&rendered).into_owned(),
                        target: expression.ty.name(),
                        at: Location::of(token),
                    },
                    other => self.fault(other, token, expression.ty),
                })
            }
            // Only bound when the program had binding errors, and such a
            // program never runs.
            BoundExpressionKind::Error => Ok(RuntimeValue::Unit),
        }
    }

    fn evaluate_bool(&mut self, expression: &'t BoundExpression<'a>) -> RuntimeResult<bool> {
        match self.evaluate(expression)? {
            RuntimeValue::Bool(value) => Ok(value),
            other => Err(RuntimeError::OperandMismatch {
                operator: expression.token.sanitized_text().into_owned(),
                found: other.type_name(),
                at: Location::of(&expression.token),
            }),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &'t BoundExpression<'a>,
        operator: BoundBinaryOperator,
        right: &'t BoundExpression<'a>,
        token: &Token<'a>,
    ) -> RuntimeResult<RuntimeValue> {
        match operator.kind {
            BoundBinaryOperatorKind::LogicalAnd => {
                let value = self.evaluate_bool(left)? && self.evaluate_bool(right)?;
                Ok(RuntimeValue::Bool(value))
            }
            BoundBinaryOperatorKind::LogicalOr => {
                let value = self.evaluate_bool(left)? || self.evaluate_bool(right)?;
                Ok(RuntimeValue::Bool(value))
            }
            kind => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                operators::evaluate_binary(kind, &left, &right)
                    .map_err(|fault| self.fault(fault, token, operator.result_type))
            }
        }
    }

    fn fault(&self, fault: Fault, token: &Token<'a>, target: TypeSymbol) -> RuntimeError {
        let at = Location::of(token);
        match fault {
            Fault::DivisionByZero => RuntimeError::DivisionByZero { at },
            Fault::IntegerOverflow => RuntimeError::IntegerOverflow { at },
            Fault::InvalidConversion => RuntimeError::InvalidConversion {
                value: at.text.clone(),
                target: target.name(),
                at,
            },
            Fault::Mismatch(found) => RuntimeError::OperandMismatch {
                operator: at.text.clone(),
                found,
                at,
            },
        }
    }

    fn uninitialized(&self, variable: SymbolId, token: &Token<'a>) -> RuntimeError {
        RuntimeError::UninitializedVariable {
            name: self.tree.name_of(variable).to_string(),
            at: Location::of(token),
        }
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn call(
        &mut self,
        function: SymbolId,
        arguments: &'t [BoundExpression<'a>],
        token: &Token<'a>,
    ) -> RuntimeResult<RuntimeValue> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate(argument)?);
        }

        let tree = self.tree;
        let Some(symbol) = tree.symbol(function).as_function() else {
            return Ok(RuntimeValue::Unit);
        };
        if let Some(builtin) = symbol.builtin {
            return self.call_builtin(builtin, values, token);
        }
        let Some(definition) = tree.definition(function) else {
            return Ok(RuntimeValue::Unit);
        };

        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                limit: self.max_call_depth,
                at: Location::of(token),
            });
        }
        trace!(function = tree.name_of(function), depth = self.call_depth, "call");

        self.call_depth += 1;
        self.env.push(FrameKind::Call);
        for (&parameter, value) in definition.parameters.iter().zip(values) {
            self.env.declare(parameter, value);
        }
        let flow = ensure_sufficient_stack(|| self.execute_block(&definition.body));
        self.env.pop();
        self.call_depth -= 1;

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal | Flow::Goto(_) if symbol.return_type == TypeSymbol::Void => {
                Ok(RuntimeValue::Unit)
            }
            Flow::Normal | Flow::Goto(_) => Err(RuntimeError::MissingReturn {
                function: tree.name_of(function).to_string(),
                at: Location::of(&definition.end_token),
            }),
        }
    }

    fn call_builtin(
        &mut self,
        builtin: Builtin,
        arguments: Vec<RuntimeValue>,
        token: &Token<'a>,
    ) -> RuntimeResult<RuntimeValue> {
        let io_failure = |source| RuntimeError::Io {
            source,
            at: Location::of(token),
        };
        match builtin {
            Builtin::PrintLine | Builtin::Print => {
                let mut arguments = arguments.into_iter();
                let text = arguments.next().map(|value| value.to_string()).unwrap_or_default();
                let newline = match builtin {
                    Builtin::PrintLine => true,
                    _ => matches!(arguments.next(), Some(RuntimeValue::Bool(true))),
                };
                self.io.write_str(&unescape(&text)).map_err(io_failure)?;
                if newline {
                    self.io.write_str("\n").map_err(io_failure)?;
                }
                Ok(RuntimeValue::Unit)
            }
            Builtin::Input => {
                let line = self.io.read_line().map_err(io_failure)?;
                Ok(RuntimeValue::string(line.as_deref().unwrap_or("")))
            }
            Builtin::Rndi => match arguments.first() {
                Some(&RuntimeValue::Int(max)) if max > 0 => {
                    Ok(RuntimeValue::Int(self.io.random_below(max as u64) as i64))
                }
                // An empty range yields 0.
                _ => Ok(RuntimeValue::Int(0)),
            },
        }
    }
}
