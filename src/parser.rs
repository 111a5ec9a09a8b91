use thiserror::Error;

use crate::scanner::*;
use crate::ast::*;
use crate::value::Value;

// Grammar:
// expression  -> equality
// equality    -> comparison ( ( != | == ) comparison )*
// comparison  -> term ( ( > | >= | < | <= ) term )*
// term        -> factor ( ( - | + ) factor )*
// factor      -> unary ( ( / | * ) unary )*
// unary       -> ( ! | - ) unary | primary
// primary     -> number | string | true | false | nil | ( expression )

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {}] Error{}: {message}", .token.line, location(.token))]
pub struct ParseError<'a> {
    pub token: Token<'a>,
    pub message: &'static str,
}

fn location(token: &Token) -> String {
    if token.is_eof() {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// The parser's cursor is the slice of tokens not consumed yet. Every
/// production hands back what it built together with the remaining tokens.
type ParseResult<'t, 'a, T> = Result<(T, &'t [Token<'a>]), ParseError<'a>>;

fn error<'t, 'a, T>(ts: &'t [Token<'a>], message: &'static str) -> ParseResult<'t, 'a, T> {
    Err(ParseError { token: peek(ts).clone(), message })
}

// The scanner always terminates the stream with EOF, and no production
// consumes it, so `ts` is never empty here.
fn peek<'t, 'a>(ts: &'t [Token<'a>]) -> &'t Token<'a> {
    &ts[0]
}

fn advance<'t, 'a>(ts: &'t [Token<'a>]) -> &'t [Token<'a>] {
    if peek(ts).is_eof() { ts } else { &ts[1..] }
}

/// Consumes the next token if its class is one of `classes`.
fn any_of<'t, 'a>(ts: &'t [Token<'a>], classes: &[TokenClass]) -> Option<(&'t Token<'a>, &'t [Token<'a>])> {
    let tok = peek(ts);
    if classes.contains(&tok.class) {
        Some((tok, advance(ts)))
    } else {
        None
    }
}

fn token<'t, 'a>(ts: &'t [Token<'a>], expected: TokenClass, message: &'static str) -> ParseResult<'t, 'a, &'t Token<'a>> {
    match any_of(ts, &[expected]) {
        Some(found) => Ok(found),
        None => error(ts, message),
    }
}

/// Deepest tree the parser builds. Evaluation, printing and dropping all
/// recurse once per level, so this also bounds their stack use.
pub const MAX_DEPTH: usize = 256;

/// An expression together with the height of its tree.
type Tree<'a> = (Expr<'a>, usize);

type Production<'t, 'a> = fn(&'t [Token<'a>], usize) -> ParseResult<'t, 'a, Tree<'a>>;

/// Enters one more level of `(` or unary nesting.
fn deeper<'t, 'a>(ts: &'t [Token<'a>], depth: usize) -> Result<usize, ParseError<'a>> {
    if depth >= MAX_DEPTH {
        return Err(ParseError { token: peek(ts).clone(), message: "Too much nesting." });
    }
    Ok(depth + 1)
}

fn node<'a>(tok: &Token<'a>, expr: Expr<'a>, height: usize) -> Result<Tree<'a>, ParseError<'a>> {
    if height > MAX_DEPTH {
        return Err(ParseError { token: tok.clone(), message: "Too much nesting." });
    }
    Ok((expr, height))
}

/// One left-associative precedence level: `operand (op operand)*`.
fn binary<'t, 'a>(
    ts: &'t [Token<'a>],
    depth: usize,
    ops: &[TokenClass],
    operand: Production<'t, 'a>,
) -> ParseResult<'t, 'a, Tree<'a>> {
    let ((mut expr, mut height), mut rest) = operand(ts, depth)?;

    while let Some((tok, after_op)) = any_of(rest, ops) {
        let ((right, right_height), after_right) = operand(after_op, depth)?;
        let op = match BinOp::from_class(tok.class) {
            Some(op) => op,
            None => return error(rest, "Expect binary operator."),
        };
        let joined = Expr::binary(op, tok.clone(), expr, right);
        let (joined, joined_height) = node(tok, joined, height.max(right_height) + 1)?;
        expr = joined;
        height = joined_height;
        rest = after_right;
    }

    Ok(((expr, height), rest))
}

fn expression<'t, 'a>(ts: &'t [Token<'a>], depth: usize) -> ParseResult<'t, 'a, Tree<'a>> {
    equality(ts, depth)
}

fn equality<'t, 'a>(ts: &'t [Token<'a>], depth: usize) -> ParseResult<'t, 'a, Tree<'a>> {
    binary(ts, depth, &[TokenClass::BangEqual, TokenClass::EqualEqual], comparison)
}

fn comparison<'t, 'a>(ts: &'t [Token<'a>], depth: usize) -> ParseResult<'t, 'a, Tree<'a>> {
    binary(ts, depth, &[
        TokenClass::Greater,
        TokenClass::GreaterEqual,
        TokenClass::Less,
        TokenClass::LessEqual,
    ], term)
}

fn term<'t, 'a>(ts: &'t [Token<'a>], depth: usize) -> ParseResult<'t, 'a, Tree<'a>> {
    binary(ts, depth, &[TokenClass::Minus, TokenClass::Plus], factor)
}

fn factor<'t, 'a>(ts: &'t [Token<'a>], depth: usize) -> ParseResult<'t, 'a, Tree<'a>> {
    binary(ts, depth, &[TokenClass::Slash, TokenClass::Star], unary)
}

fn unary<'t, 'a>(ts: &'t [Token<'a>], depth: usize) -> ParseResult<'t, 'a, Tree<'a>> {
    match any_of(ts, &[TokenClass::Bang, TokenClass::Minus]) {
        Some((tok, rest)) => {
            let depth = deeper(ts, depth)?;
            let ((operand, height), rest) = unary(rest, depth)?;
            match UnaryOp::from_class(tok.class) {
                Some(op) => Ok((node(tok, Expr::unary(op, tok.clone(), operand), height + 1)?, rest)),
                None => error(ts, "Expect unary operator."),
            }
        }
        None => primary(ts, depth),
    }
}

fn primary<'t, 'a>(ts: &'t [Token<'a>], depth: usize) -> ParseResult<'t, 'a, Tree<'a>> {
    let tok = peek(ts);
    let value = match (tok.class, tok.literal) {
        (TokenClass::False, _) => Value::Bool(false),
        (TokenClass::True, _) => Value::Bool(true),
        (TokenClass::Nil, _) => Value::Nil,
        (TokenClass::Number, Some(Literal::Number(n))) => Value::Number(n),
        (TokenClass::String, Some(Literal::Str(s))) => Value::Str(s.to_string()),
        (TokenClass::LeftParen, _) => {
            let depth = deeper(ts, depth)?;
            let ((inner, height), rest) = expression(advance(ts), depth)?;
            let (_, rest) = token(rest, TokenClass::RightParen, "Expect ')' after expression.")?;
            return Ok((node(tok, Expr::grouping(inner), height + 1)?, rest));
        }
        _ => return error(ts, "Expect expression."),
    };
    Ok(((Expr::literal(value), 1), advance(ts)))
}

/// Discards tokens until a likely statement boundary: just past a `;`, or
/// right before a keyword that starts a statement. Returns the tokens from
/// which parsing can resume.
pub fn synchronize<'t, 'a>(ts: &'t [Token<'a>]) -> &'t [Token<'a>] {
    use TokenClass::*;

    let mut rest = ts;
    while rest.first().map_or(false, |t| !t.is_eof()) {
        let tok = peek(rest);
        rest = advance(rest);
        if tok.class == Semicolon {
            return rest;
        }
        if let Some(next) = rest.first() {
            match next.class {
                Class | Fun | Var | For | If | While | Print | Return => return rest,
                _ => {}
            }
        }
    }
    rest
}

/// Parses a whole token stream, as produced by `scan`, as a single
/// expression. The first error abandons the input: no partial tree is
/// returned. Trees deeper than `MAX_DEPTH` are rejected.
pub fn parse<'t, 'a>(ts: &'t [Token<'a>]) -> Result<Expr<'a>, Vec<ParseError<'a>>> {
    match ts.last() {
        Some(last) if last.is_eof() => {}
        last => {
            let line = last.map_or(1, |t| t.line);
            let eof = Token::new(TokenClass::EOF, "", line);
            return Err(vec![ParseError { token: eof, message: "Expect end of input." }]);
        }
    }

    let ((expr, _), rest) = expression(ts, 0).map_err(|e| vec![e])?;
    if !peek(rest).is_eof() {
        return Err(vec![ParseError { token: peek(rest).clone(), message: "Expect end of expression." }]);
    }
    Ok(expr)
}


#[cfg(test)]
mod test {
    use crate::scanner::{scan, Token, TokenClass};
    use crate::ast::{Expr, BinOp, UnaryOp};
    use crate::value::Value;
    use super::{parse, synchronize, ParseError, MAX_DEPTH};

    fn op(class: TokenClass, lexeme: &'static str) -> Token<'static> {
        Token::new(class, lexeme, 1)
    }

    fn parse_str(s: &str) -> Expr<'_> {
        let (toks, errors) = scan(s);
        assert!(errors.is_empty());
        parse(&toks).unwrap()
    }

    fn parse_err(s: &'static str) -> Vec<ParseError<'static>> {
        let (toks, _) = scan(s);
        parse(&toks).unwrap_err()
    }

    #[test]
    fn precedence() {
        assert_eq!(parse_str("1 + 2 * 3"), Expr::binary(
            BinOp::Plus,
            op(TokenClass::Plus, "+"),
            Expr::number(1.0),
            Expr::binary(
                BinOp::Times,
                op(TokenClass::Star, "*"),
                Expr::number(2.0),
                Expr::number(3.0))));

        assert_eq!(parse_str("(1 + 2) * 3"), Expr::binary(
            BinOp::Times,
            op(TokenClass::Star, "*"),
            Expr::grouping(Expr::binary(
                BinOp::Plus,
                op(TokenClass::Plus, "+"),
                Expr::number(1.0),
                Expr::number(2.0))),
            Expr::number(3.0)));

        assert_eq!(parse_str("1 < 2 == true"), Expr::binary(
            BinOp::Eq,
            op(TokenClass::EqualEqual, "=="),
            Expr::binary(
                BinOp::Lt,
                op(TokenClass::Less, "<"),
                Expr::number(1.0),
                Expr::number(2.0)),
            Expr::literal(Value::Bool(true))));
    }

    #[test]
    fn left_associative() {
        assert_eq!(parse_str("1 - 2 - 3"), Expr::binary(
            BinOp::Minus,
            op(TokenClass::Minus, "-"),
            Expr::binary(
                BinOp::Minus,
                op(TokenClass::Minus, "-"),
                Expr::number(1.0),
                Expr::number(2.0)),
            Expr::number(3.0)));

        assert_eq!(parse_str("8 / 4 * 2"), Expr::binary(
            BinOp::Times,
            op(TokenClass::Star, "*"),
            Expr::binary(
                BinOp::Div,
                op(TokenClass::Slash, "/"),
                Expr::number(8.0),
                Expr::number(4.0)),
            Expr::number(2.0)));
    }

    #[test]
    fn unary_nests_to_the_right() {
        assert_eq!(parse_str("!-nil"), Expr::unary(
            UnaryOp::Not,
            op(TokenClass::Bang, "!"),
            Expr::unary(
                UnaryOp::Neg,
                op(TokenClass::Minus, "-"),
                Expr::literal(Value::Nil))));
    }

    #[test]
    fn literals() {
        assert_eq!(parse_str("\"hi\""), Expr::literal(Value::Str("hi".to_string())));
        assert_eq!(parse_str("false"), Expr::literal(Value::Bool(false)));
        assert_eq!(parse_str("45.67"), Expr::number(45.67));
    }

    #[test]
    fn missing_paren() {
        let errors = parse_err("(1 + 2");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Expect ')' after expression.");
        assert_eq!(errors[0].token.class, TokenClass::EOF);
        assert_eq!(errors[0].to_string(), "[line 1] Error at end: Expect ')' after expression.");
    }

    #[test]
    fn missing_operand() {
        let errors = parse_err("1 +\n*");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "[line 2] Error at '*': Expect expression.");

        let errors = parse_err("");
        assert_eq!(errors[0].to_string(), "[line 1] Error at end: Expect expression.");
    }

    #[test]
    fn trailing_tokens() {
        let errors = parse_err("1 2");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "[line 1] Error at '2': Expect end of expression.");
    }

    #[test]
    fn requires_eof_marker() {
        let toks = [Token::new(TokenClass::Nil, "nil", 4)];
        let errors = parse(&toks).unwrap_err();
        assert_eq!(errors[0].to_string(), "[line 4] Error at end: Expect end of input.");
        let empty: [Token; 0] = [];
        assert_eq!(parse(&empty).unwrap_err()[0].token.line, 1);
    }

    #[test]
    fn synchronize_stops_at_statement_boundaries() {
        let (toks, _) = scan("1 + ; 2");
        let rest = synchronize(&toks);
        assert_eq!(rest[0].lexeme, "2");

        let (toks, _) = scan("1 + 2 print 3");
        let rest = synchronize(&toks);
        assert_eq!(rest[0].class, TokenClass::Print);

        let (toks, _) = scan("1 + 2");
        let rest = synchronize(&toks);
        assert!(rest[0].is_eof());
    }

    #[test]
    fn nesting_within_the_limit() {
        let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        let mut expr = &parse_str(&source);
        for _ in 0..100 {
            match expr {
                Expr::Grouping(inner) => expr = &**inner,
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(*expr, Expr::number(1.0));
    }

    #[test]
    fn too_much_nesting() {
        let source = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
        let (toks, _) = scan(&source);
        let errors = parse(&toks).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "[line 1] Error at '(': Too much nesting.");

        let source = format!("{}1", "-".repeat(200_000));
        let (toks, _) = scan(&source);
        let errors = parse(&toks).unwrap_err();
        assert_eq!(errors[0].to_string(), "[line 1] Error at '-': Too much nesting.");
        assert_eq!(errors[0].token.class, TokenClass::Minus);

        parse_str(&format!("{}nil", "!".repeat(MAX_DEPTH - 1)));
        let source = format!("{}nil", "!".repeat(MAX_DEPTH + 1));
        let (toks, _) = scan(&source);
        assert_eq!(parse(&toks).unwrap_err()[0].message, "Too much nesting.");
    }

    #[test]
    fn long_operator_chains_are_bounded() {
        let source = format!("1{}", " + 1".repeat(MAX_DEPTH - 1));
        let (toks, _) = scan(&source);
        assert!(parse(&toks).is_ok());

        let source = format!("1{}", " + 1".repeat(10_000));
        let (toks, _) = scan(&source);
        let errors = parse(&toks).unwrap_err();
        assert_eq!(errors[0].to_string(), "[line 1] Error at '+': Too much nesting.");
    }

    #[test]
    fn reparsing_is_stable() {
        assert_eq!(parse_str("-(1 >= 2) != !\"x\""), parse_str("-(1 >= 2) != !\"x\""));
    }
}
