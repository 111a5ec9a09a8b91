use crate::ast::*;
use crate::scanner::Token;
use crate::value::Value;


struct AstPrinter;

impl AstPrinter {
    fn parenthesize<'a>(&mut self, name: &str, exprs: &[&Expr<'a>]) -> String {
        let mut out = format!("({}", name);
        for e in exprs {
            out.push(' ');
            out.push_str(&e.accept(self));
        }
        out.push(')');
        out
    }
}

impl<'a> Visitor<'a> for AstPrinter {
    type Output = String;

    fn visit_literal(&mut self, value: &Value) -> String {
        value.to_string()
    }

    fn visit_grouping(&mut self, inner: &Expr<'a>) -> String {
        self.parenthesize("group", &[inner])
    }

    fn visit_unary(&mut self, _: UnaryOp, token: &Token<'a>, operand: &Expr<'a>) -> String {
        self.parenthesize(token.lexeme, &[operand])
    }

    fn visit_binary(&mut self, _: BinOp, token: &Token<'a>, l: &Expr<'a>, r: &Expr<'a>) -> String {
        self.parenthesize(token.lexeme, &[l, r])
    }
}

/// Renders a tree in prefix form with every operator application and
/// grouping in explicit parentheses, e.g. `(* (- 123) (group 45.67))`.
pub fn print(e: &Expr) -> String {
    e.accept(&mut AstPrinter)
}
