use crate::ast::{BinaryOp, BlockStatement, Expression, Program, Statement, UnaryOp};
use crate::config::Config;
use crate::error::{RuntimeError, Span};
use crate::value::{Value, NULL};

/// Hands a `return` signal produced by an operand straight to the caller, so
/// operators and conditions only ever see plain values.
macro_rules! pass_return {
    ($value:expr) => {
        match $value {
            signal @ Value::Return(_) => return Ok(signal),
            value => value,
        }
    };
}

/// Tree-walking evaluator.
///
/// Holds no state between calls apart from its configuration: bindings are
/// not stored, so every program is evaluated in isolation.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    strict: bool,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            strict: config.strict,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Evaluates every statement in order.
    ///
    /// Returns `None` when there is nothing to show: an empty program, or one
    /// whose last statement is a binding. A `return` stops evaluation and its
    /// value becomes the program's value.
    pub fn eval_program(&self, program: &Program) -> Result<Option<Value>, RuntimeError> {
        let mut result = None;

        for stmt in &program.statements {
            match self.eval_statement(stmt)? {
                Some(Value::Return(inner)) => return Ok(Some(*inner)),
                other => result = other,
            }
        }

        Ok(result)
    }

    /// Like [`Evaluator::eval_program`], but a `return` signal is passed up
    /// still wrapped so enclosing blocks stop too.
    pub fn eval_block(&self, block: &BlockStatement) -> Result<Option<Value>, RuntimeError> {
        let mut result = None;

        for stmt in &block.statements {
            result = self.eval_statement(stmt)?;

            if matches!(result, Some(Value::Return(_))) {
                return Ok(result);
            }
        }

        Ok(result)
    }

    pub fn eval_statement(&self, stmt: &Statement) -> Result<Option<Value>, RuntimeError> {
        match stmt {
            Statement::Expression { expr, .. } => self.eval_expression(expr).map(Some),
            Statement::Return { value, .. } => {
                // A nested `return` already carries the signal.
                match self.eval_expression(value)? {
                    signal @ Value::Return(_) => Ok(Some(signal)),
                    value => Ok(Some(Value::Return(Box::new(value)))),
                }
            }
            Statement::Block(block) => self.eval_block(block),
            Statement::Let { span, .. } | Statement::Const { span, .. } => {
                self.unsupported("binding", *span)?;
                Ok(None)
            }
        }
    }

    pub fn eval_expression(&self, expr: &Expression) -> Result<Value, RuntimeError> {
        match expr {
            Expression::IntegerLiteral { value, .. } => Ok(Value::Integer(*value)),
            Expression::BooleanLiteral { value, .. } => Ok(Value::from(*value)),
            Expression::Prefix {
                operator,
                operand,
                span,
            } => {
                let operand = pass_return!(self.eval_expression(operand)?);
                self.eval_prefix(*operator, operand, *span)
            }
            Expression::Infix {
                left,
                operator,
                right,
                span,
            } => {
                let left = pass_return!(self.eval_expression(left)?);
                let right = pass_return!(self.eval_expression(right)?);
                self.eval_infix(*operator, left, right, *span)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                let condition = pass_return!(self.eval_expression(condition)?);
                let branch = if condition.is_truthy() {
                    Some(consequence)
                } else {
                    alternative.as_ref()
                };

                match branch {
                    Some(block) => Ok(self.eval_block(block)?.unwrap_or(NULL)),
                    None => Ok(NULL),
                }
            }
            Expression::Identifier(ident) => self.unsupported("identifier lookup", ident.span),
            Expression::FunctionLiteral { span, .. } => self.unsupported("function literal", *span),
            Expression::Call { span, .. } => self.unsupported("function call", *span),
        }
    }

    fn eval_prefix(&self, operator: UnaryOp, operand: Value, span: Span) -> Result<Value, RuntimeError> {
        match operator {
            UnaryOp::Not => Ok(Value::from(!operand.is_truthy())),
            UnaryOp::Negate => match operand {
                Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
                other => self.fallback(RuntimeError::UnknownPrefixOperator {
                    operator: operator.as_str().to_string(),
                    operand: other.type_name(),
                    span,
                }),
            },
        }
    }

    fn eval_infix(
        &self,
        operator: BinaryOp,
        left: Value,
        right: Value,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        match (left, right) {
            (Value::Integer(l), Value::Integer(r)) => self.eval_integer_infix(operator, l, r, span),
            (left, right) => match operator {
                BinaryOp::Equal => Ok(Value::from(left == right)),
                BinaryOp::NotEqual => Ok(Value::from(left != right)),
                _ if left.type_name() != right.type_name() => {
                    self.fallback(RuntimeError::TypeMismatch {
                        left: left.type_name(),
                        operator: operator.as_str().to_string(),
                        right: right.type_name(),
                        span,
                    })
                }
                _ => self.fallback(RuntimeError::UnknownInfixOperator {
                    left: left.type_name(),
                    operator: operator.as_str().to_string(),
                    right: right.type_name(),
                    span,
                }),
            },
        }
    }

    fn eval_integer_infix(
        &self,
        operator: BinaryOp,
        l: i64,
        r: i64,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        // Arithmetic wraps like native 64-bit signed integers.
        let value = match operator {
            BinaryOp::Add => Value::Integer(l.wrapping_add(r)),
            BinaryOp::Subtract => Value::Integer(l.wrapping_sub(r)),
            BinaryOp::Multiply => Value::Integer(l.wrapping_mul(r)),
            BinaryOp::Divide => {
                if r == 0 {
                    tracing::debug!(dividend = l, "division by zero");
                    return Err(RuntimeError::DivisionByZero { span });
                }
                Value::Integer(l.wrapping_div(r))
            }
            BinaryOp::Less => Value::from(l < r),
            BinaryOp::Greater => Value::from(l > r),
            BinaryOp::Equal => Value::from(l == r),
            BinaryOp::NotEqual => Value::from(l != r),
        };
        Ok(value)
    }

    /// `null` in the default mode, the error itself in strict mode.
    fn fallback(&self, error: RuntimeError) -> Result<Value, RuntimeError> {
        if self.strict {
            tracing::debug!("strict evaluation error: {}", error);
            Err(error)
        } else {
            tracing::trace!("evaluating to null: {}", error);
            Ok(NULL)
        }
    }

    fn unsupported(&self, what: &'static str, span: Span) -> Result<Value, RuntimeError> {
        self.fallback(RuntimeError::Unsupported { what, span })
    }
}
