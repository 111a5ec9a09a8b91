#![deny(warnings)]

pub mod scanner;
pub mod ast;
pub mod value;
pub mod parser;
pub mod interpreter;
pub mod printer;
pub mod config;

use std::fmt::Display;

use thiserror::Error;
use tracing::debug;

use crate::ast::Expr;
use crate::parser::ParseError;
use crate::interpreter::RuntimeError;
use crate::scanner::LexError;
use crate::value::Value;


/// Exit status for a source file with lexical or syntax errors.
pub const EXIT_STATIC_ERROR: i32 = 65;
/// Exit status for a source file whose evaluation failed.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(Debug, Error)]
pub enum Error<'a> {
    #[error("{}", lines(.0))]
    Lex(Vec<LexError>),
    #[error("{}", lines(.0))]
    Parse(Vec<ParseError<'a>>),
    #[error("{0}")]
    Runtime(RuntimeError<'a>),
}

impl<'a> From<RuntimeError<'a>> for Error<'a> {
    fn from(e: RuntimeError<'a>) -> Error<'a> {
        Error::Runtime(e)
    }
}

fn lines<T: Display>(errors: &[T]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
}

impl<'a> Error<'a> {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Lex(_) | Error::Parse(_) => EXIT_STATIC_ERROR,
            Error::Runtime(_) => EXIT_RUNTIME_ERROR,
        }
    }
}

/// Scans and parses `source`. Lexical errors stop the pipeline before the
/// parser runs.
pub fn parse_source(source: &str) -> Result<Expr<'_>, Error<'_>> {
    let (tokens, lex_errors) = scanner::scan(source);
    debug!(tokens = tokens.len(), errors = lex_errors.len(), "scanned");
    if !lex_errors.is_empty() {
        return Err(Error::Lex(lex_errors));
    }

    // the tree borrows lexemes from `source`, not from the token buffer
    let expr = parser::parse(&tokens).map_err(Error::Parse)?;
    debug!(ast = %printer::print(&expr), "parsed");
    Ok(expr)
}

pub fn run(source: &str) -> Result<Value, Error<'_>> {
    let expr = parse_source(source)?;
    let value = interpreter::evaluate(&expr)?;
    debug!(value = %value, kind = value.type_name(), "evaluated");
    Ok(value)
}
