use crate::scanner::{Token, TokenClass};
use crate::value::Value;


#[derive(Debug, PartialEq, Copy, Clone)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn from_class(class: TokenClass) -> Option<UnaryOp> {
        match class {
            TokenClass::Minus => Some(UnaryOp::Neg),
            TokenClass::Bang => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum BinOp {
    Plus,
    Minus,
    Times,
    Div,
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    NotEq,
}

impl BinOp {
    pub fn from_class(class: TokenClass) -> Option<BinOp> {
        let op = match class {
            TokenClass::Plus => BinOp::Plus,
            TokenClass::Minus => BinOp::Minus,
            TokenClass::Star => BinOp::Times,
            TokenClass::Slash => BinOp::Div,
            TokenClass::Greater => BinOp::Gt,
            TokenClass::GreaterEqual => BinOp::Gte,
            TokenClass::Less => BinOp::Lt,
            TokenClass::LessEqual => BinOp::Lte,
            TokenClass::EqualEqual => BinOp::Eq,
            TokenClass::BangEqual => BinOp::NotEq,
            _ => return None,
        };
        Some(op)
    }
}

/// Expression tree. Operator nodes keep the token they were parsed from so
/// later stages can point diagnostics at a source line.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr<'a> {
    Literal(Value),
    Grouping(Box<Expr<'a>>),
    Unary(UnaryOp, Token<'a>, Box<Expr<'a>>),
    Binary(BinOp, Token<'a>, Box<Expr<'a>>, Box<Expr<'a>>),
}

impl<'a> Expr<'a> {
    pub fn literal(v: Value) -> Expr<'a> {
        Expr::Literal(v)
    }
    pub fn number(n: f64) -> Expr<'a> {
        Expr::Literal(Value::Number(n))
    }
    pub fn grouping(inner: Expr<'a>) -> Expr<'a> {
        Expr::Grouping(Box::new(inner))
    }
    pub fn unary(op: UnaryOp, token: Token<'a>, operand: Expr<'a>) -> Expr<'a> {
        Expr::Unary(op, token, Box::new(operand))
    }
    pub fn binary(op: BinOp, token: Token<'a>, l: Expr<'a>, r: Expr<'a>) -> Expr<'a> {
        Expr::Binary(op, token, Box::new(l), Box::new(r))
    }

    pub fn accept<V: Visitor<'a>>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Literal(v) => visitor.visit_literal(v),
            Expr::Grouping(inner) => visitor.visit_grouping(inner),
            Expr::Unary(op, token, operand) => visitor.visit_unary(*op, token, operand),
            Expr::Binary(op, token, l, r) => visitor.visit_binary(*op, token, l, r),
        }
    }
}

/// One method per node kind. Consumers of the tree (evaluation, printing)
/// implement this instead of matching on `Expr` themselves.
pub trait Visitor<'a> {
    type Output;

    fn visit_literal(&mut self, value: &Value) -> Self::Output;
    fn visit_grouping(&mut self, inner: &Expr<'a>) -> Self::Output;
    fn visit_unary(&mut self, op: UnaryOp, token: &Token<'a>, operand: &Expr<'a>) -> Self::Output;
    fn visit_binary(
        &mut self,
        op: BinOp,
        token: &Token<'a>,
        left: &Expr<'a>,
        right: &Expr<'a>,
    ) -> Self::Output;
}
