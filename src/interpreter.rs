use thiserror::Error;
use tracing::trace;

use crate::ast::*;
use crate::scanner::Token;
use crate::value::Value;


#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}\n[line {}]", .token.line)]
pub struct RuntimeError<'a> {
    pub token: Token<'a>,
    pub message: &'static str,
}

type EvalResult<'a> = Result<Value, RuntimeError<'a>>;

fn fail<'a, T>(token: &Token<'a>, message: &'static str) -> Result<T, RuntimeError<'a>> {
    Err(RuntimeError { token: token.clone(), message })
}

fn number_operand<'a>(token: &Token<'a>, v: &Value) -> Result<f64, RuntimeError<'a>> {
    match *v {
        Value::Number(n) => Ok(n),
        _ => fail(token, "Operand must be a number."),
    }
}

fn number_operands<'a>(token: &Token<'a>, l: &Value, r: &Value) -> Result<(f64, f64), RuntimeError<'a>> {
    match (l, r) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => fail(token, "Operands must be numbers."),
    }
}

struct Interpreter;

impl<'a> Visitor<'a> for Interpreter {
    type Output = EvalResult<'a>;

    fn visit_literal(&mut self, value: &Value) -> EvalResult<'a> {
        Ok(value.clone())
    }

    fn visit_grouping(&mut self, inner: &Expr<'a>) -> EvalResult<'a> {
        inner.accept(self)
    }

    fn visit_unary(&mut self, op: UnaryOp, token: &Token<'a>, operand: &Expr<'a>) -> EvalResult<'a> {
        let v = operand.accept(self)?;
        match op {
            UnaryOp::Neg => Ok(Value::Number(-number_operand(token, &v)?)),
            UnaryOp::Not => Ok(Value::Bool(!v.is_truthy())),
        }
    }

    fn visit_binary(
        &mut self,
        op: BinOp,
        token: &Token<'a>,
        left: &Expr<'a>,
        right: &Expr<'a>,
    ) -> EvalResult<'a> {
        let l = left.accept(self)?;
        let r = right.accept(self)?;
        trace!(op = ?op, left = l.type_name(), right = r.type_name(), "binary");

        let v = match op {
            BinOp::Plus => match (l, r) {
                (Value::Number(l), Value::Number(r)) => Value::Number(l + r),
                (Value::Str(l), Value::Str(r)) => Value::Str(l + &r),
                _ => return fail(token, "Operands must be two numbers or two strings."),
            },
            BinOp::Minus => {
                let (l, r) = number_operands(token, &l, &r)?;
                Value::Number(l - r)
            }
            BinOp::Times => {
                let (l, r) = number_operands(token, &l, &r)?;
                Value::Number(l * r)
            }
            BinOp::Div => {
                let (l, r) = number_operands(token, &l, &r)?;
                if r == 0.0 {
                    return fail(token, "Division by zero.");
                }
                Value::Number(l / r)
            }
            BinOp::Gt => {
                let (l, r) = number_operands(token, &l, &r)?;
                Value::Bool(l > r)
            }
            BinOp::Gte => {
                let (l, r) = number_operands(token, &l, &r)?;
                Value::Bool(l >= r)
            }
            BinOp::Lt => {
                let (l, r) = number_operands(token, &l, &r)?;
                Value::Bool(l < r)
            }
            BinOp::Lte => {
                let (l, r) = number_operands(token, &l, &r)?;
                Value::Bool(l <= r)
            }
            BinOp::Eq => Value::Bool(l == r),
            BinOp::NotEq => Value::Bool(l != r),
        };
        Ok(v)
    }
}

/// Evaluates an expression tree. The first runtime error aborts the whole
/// evaluation; operands are evaluated left to right.
pub fn evaluate<'a>(e: &Expr<'a>) -> EvalResult<'a> {
    e.accept(&mut Interpreter)
}
