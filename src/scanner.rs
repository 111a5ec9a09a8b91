use std::fmt;

use thiserror::Error;


#[derive(Clone, Copy, Hash, Debug, Eq, PartialEq)]
pub enum TokenClass {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    Identifier,
    String,
    Number,

    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    EOF,
}

impl TokenClass {
    fn name(self) -> &'static str {
        use TokenClass::*;

        match self {
            LeftParen => "LEFT_PAREN",
            RightParen => "RIGHT_PAREN",
            LeftBrace => "LEFT_BRACE",
            RightBrace => "RIGHT_BRACE",
            Comma => "COMMA",
            Dot => "DOT",
            Minus => "MINUS",
            Plus => "PLUS",
            Semicolon => "SEMICOLON",
            Slash => "SLASH",
            Star => "STAR",
            Bang => "BANG",
            BangEqual => "BANG_EQUAL",
            Equal => "EQUAL",
            EqualEqual => "EQUAL_EQUAL",
            Greater => "GREATER",
            GreaterEqual => "GREATER_EQUAL",
            Less => "LESS",
            LessEqual => "LESS_EQUAL",
            Identifier => "IDENTIFIER",
            String => "STRING",
            Number => "NUMBER",
            And => "AND",
            Class => "CLASS",
            Else => "ELSE",
            False => "FALSE",
            Fun => "FUN",
            For => "FOR",
            If => "IF",
            Nil => "NIL",
            Or => "OR",
            Print => "PRINT",
            Return => "RETURN",
            Super => "SUPER",
            This => "THIS",
            True => "TRUE",
            Var => "VAR",
            While => "WHILE",
            EOF => "EOF",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn keyword(word: &str) -> Option<TokenClass> {
    use TokenClass::*;

    let class = match word {
        "and" => And,
        "class" => Class,
        "else" => Else,
        "false" => False,
        "for" => For,
        "fun" => Fun,
        "if" => If,
        "nil" => Nil,
        "or" => Or,
        "print" => Print,
        "return" => Return,
        "super" => Super,
        "this" => This,
        "true" => True,
        "var" => Var,
        "while" => While,
        _ => return None,
    };
    Some(class)
}

/// Decoded payload of a literal token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Number(f64),
    Str(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub class: TokenClass,
    pub lexeme: &'a str,
    pub literal: Option<Literal<'a>>,
    pub line: usize,
}

impl<'a> Token<'a> {
    pub fn new(class: TokenClass, lexeme: &'a str, line: usize) -> Token<'a> {
        Token { class, lexeme, literal: None, line }
    }

    pub fn is_eof(&self) -> bool {
        self.class == TokenClass::EOF
    }
}

/// One line of the `tokens` listing: `<CLASS> <lexeme> <literal>`.
impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.class, self.lexeme)?;
        match self.literal {
            None => write!(f, "null"),
            Some(Literal::Str(s)) => write!(f, "{}", s),
            Some(Literal::Number(n)) if n.fract() == 0.0 => write!(f, "{:.1}", n),
            Some(Literal::Number(n)) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("[line {line}] Error: Unexpected character: {chr}")]
    UnexpectedCharacter { chr: char, line: usize },
    #[error("[line {line}] Error: Unterminated string.")]
    UnterminatedString { line: usize },
    #[error("[line {line}] Error: Invalid number '{lexeme}'.")]
    InvalidNumber { lexeme: String, line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match *self {
            LexError::UnexpectedCharacter { line, .. } => line,
            LexError::UnterminatedString { line } => line,
            LexError::InvalidNumber { line, .. } => line,
        }
    }
}


struct Cursor<'a> {
    input: &'a str,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Cursor<'a> {
        Cursor { input, start: 0, current: 0, line: 1 }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut rest = self.input[self.current..].chars();
        rest.next();
        rest.next()
    }

    fn advance(&mut self) -> Option<char> {
        let chr = self.peek()?;
        self.current += chr.len_utf8();
        Some(chr)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_while<P: Fn(char) -> bool>(&mut self, pred: P) {
        while self.peek().map_or(false, &pred) {
            self.advance();
        }
    }

    fn lexeme(&self) -> &'a str {
        &self.input[self.start..self.current]
    }

    fn token(&self, class: TokenClass) -> Token<'a> {
        Token::new(class, self.lexeme(), self.line)
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

fn string<'a>(cur: &mut Cursor<'a>) -> Result<Token<'a>, LexError> {
    while let Some(c) = cur.peek() {
        if c == '"' {
            break;
        }
        if c == '\n' {
            cur.line += 1;
        }
        cur.advance();
    }

    if !cur.eat('"') {
        return Err(LexError::UnterminatedString { line: cur.line });
    }

    let contents = &cur.input[cur.start + 1..cur.current - 1];
    let mut tok = cur.token(TokenClass::String);
    tok.literal = Some(Literal::Str(contents));
    Ok(tok)
}

fn number<'a>(cur: &mut Cursor<'a>) -> Result<Token<'a>, LexError> {
    cur.eat_while(|c| c.is_ascii_digit());

    // a trailing '.' is left for the next token
    if cur.peek() == Some('.') && cur.peek_next().map_or(false, |c| c.is_ascii_digit()) {
        cur.advance();
        cur.eat_while(|c| c.is_ascii_digit());
    }

    let lexeme = cur.lexeme();
    match lexeme.parse::<f64>() {
        Ok(n) => {
            let mut tok = cur.token(TokenClass::Number);
            tok.literal = Some(Literal::Number(n));
            Ok(tok)
        }
        Err(_) => Err(LexError::InvalidNumber { lexeme: lexeme.to_string(), line: cur.line }),
    }
}

fn identifier<'a>(cur: &mut Cursor<'a>) -> Token<'a> {
    cur.eat_while(is_alphanumeric);
    let class = keyword(cur.lexeme()).unwrap_or(TokenClass::Identifier);
    cur.token(class)
}

fn either<'a>(cur: &mut Cursor<'a>, next: char, matched: TokenClass, single: TokenClass) -> Token<'a> {
    let class = if cur.eat(next) { matched } else { single };
    cur.token(class)
}

/// Scans the next token starting at `cur.start`. `Ok(None)` means the
/// characters consumed produce no token (whitespace, comments).
fn scan_token<'a>(cur: &mut Cursor<'a>, c: char) -> Result<Option<Token<'a>>, LexError> {
    use TokenClass::*;

    let tok = match c {
        '(' => cur.token(LeftParen),
        ')' => cur.token(RightParen),
        '{' => cur.token(LeftBrace),
        '}' => cur.token(RightBrace),
        ',' => cur.token(Comma),
        '.' => cur.token(Dot),
        '-' => cur.token(Minus),
        '+' => cur.token(Plus),
        ';' => cur.token(Semicolon),
        '*' => cur.token(Star),

        '!' => either(cur, '=', BangEqual, Bang),
        '=' => either(cur, '=', EqualEqual, Equal),
        '<' => either(cur, '=', LessEqual, Less),
        '>' => either(cur, '=', GreaterEqual, Greater),

        '/' => {
            if cur.eat('/') {
                cur.eat_while(|c| c != '\n');
                return Ok(None);
            }
            cur.token(Slash)
        }

        ' ' | '\r' | '\t' => return Ok(None),
        '\n' => {
            cur.line += 1;
            return Ok(None);
        }

        '"' => string(cur)?,
        c if c.is_ascii_digit() => number(cur)?,
        c if is_alpha(c) => identifier(cur),

        chr => return Err(LexError::UnexpectedCharacter { chr, line: cur.line }),
    };
    Ok(Some(tok))
}

/// Splits `input` into tokens. Lexical errors do not stop the scan: the
/// offending character or lexeme is dropped, the error is recorded and
/// scanning resumes right after it. The token list always ends with `EOF`.
pub fn scan(input: &str) -> (Vec<Token<'_>>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut cur = Cursor::new(input);

    while !cur.is_at_end() {
        cur.start = cur.current;
        let c = match cur.advance() {
            Some(c) => c,
            None => break,
        };
        match scan_token(&mut cur, c) {
            Ok(Some(tok)) => tokens.push(tok),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    tokens.push(Token::new(TokenClass::EOF, "", cur.line));
    (tokens, errors)
}
