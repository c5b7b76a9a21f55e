// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tokenizer for UI scripts.
//!
//! Newlines end statements, so they are emitted as tokens, except inside
//! parentheses where argument lists may span several lines. `;` is an
//! explicit statement separator and `#` starts a comment.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Let,
    If,
    Else,
    For,
    In,
    Init,
    True,
    False,
    Nil,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Dot,
    DotDot,
    Assign,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AndAnd,
    OrOr,
    Newline,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Str(s) => write!(f, "string \"{}\"", s),
            Token::Ident(name) => write!(f, "'{}'", name),
            Token::Newline => write!(f, "end of line"),
            Token::Eof => write!(f, "end of file"),
            other => {
                let text = match other {
                    Token::Let => "let",
                    Token::If => "if",
                    Token::Else => "else",
                    Token::For => "for",
                    Token::In => "in",
                    Token::Init => "init",
                    Token::True => "true",
                    Token::False => "false",
                    Token::Nil => "nil",
                    Token::LParen => "(",
                    Token::RParen => ")",
                    Token::LBrace => "{",
                    Token::RBrace => "}",
                    Token::Comma => ",",
                    Token::Dot => ".",
                    Token::DotDot => "..",
                    Token::Assign => "=",
                    Token::Eq => "==",
                    Token::NotEq => "!=",
                    Token::Lt => "<",
                    Token::LtEq => "<=",
                    Token::Gt => ">",
                    Token::GtEq => ">=",
                    Token::Plus => "+",
                    Token::Minus => "-",
                    Token::Star => "*",
                    Token::Slash => "/",
                    Token::Percent => "%",
                    Token::Bang => "!",
                    Token::AndAnd => "&&",
                    Token::OrOr => "||",
                    _ => "?",
                };
                write!(f, "'{}'", text)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

struct Lexer<'s> {
    chars: std::iter::Peekable<std::str::Chars<'s>>,
    line: usize,
    column: usize,
    paren_depth: usize,
    tokens: Vec<Spanned>,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let mut lexer = Lexer {
        chars: source.chars().peekable(),
        line: 1,
        column: 1,
        paren_depth: 0,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_if(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn push(&mut self, token: Token, line: usize, column: usize) {
        self.tokens.push(Spanned {
            token,
            line,
            column,
        });
    }

    fn run(&mut self) -> Result<(), SyntaxError> {
        while let Some(&c) = self.chars.peek() {
            let (line, column) = (self.line, self.column);
            match c {
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '#' => {
                    while matches!(self.chars.peek(), Some(c) if *c != '\n') {
                        self.bump();
                    }
                }
                '\n' | ';' => {
                    self.bump();
                    if self.paren_depth == 0 {
                        self.push(Token::Newline, line, column);
                    }
                }
                '0'..='9' => {
                    let number = self.number(line, column)?;
                    self.push(Token::Number(number), line, column);
                }
                '"' => {
                    let text = self.string(line, column)?;
                    self.push(Token::Str(text), line, column);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let word = self.word();
                    self.push(keyword(word), line, column);
                }
                _ => {
                    self.bump();
                    let token = match c {
                        '(' => {
                            self.paren_depth += 1;
                            Token::LParen
                        }
                        ')' => {
                            self.paren_depth = self.paren_depth.saturating_sub(1);
                            Token::RParen
                        }
                        '{' => Token::LBrace,
                        '}' => Token::RBrace,
                        ',' => Token::Comma,
                        '.' if self.bump_if('.') => Token::DotDot,
                        '.' => Token::Dot,
                        '=' if self.bump_if('=') => Token::Eq,
                        '=' => Token::Assign,
                        '!' if self.bump_if('=') => Token::NotEq,
                        '!' => Token::Bang,
                        '<' if self.bump_if('=') => Token::LtEq,
                        '<' => Token::Lt,
                        '>' if self.bump_if('=') => Token::GtEq,
                        '>' => Token::Gt,
                        '+' => Token::Plus,
                        '-' => Token::Minus,
                        '*' => Token::Star,
                        '/' => Token::Slash,
                        '%' => Token::Percent,
                        '&' if self.bump_if('&') => Token::AndAnd,
                        '|' if self.bump_if('|') => Token::OrOr,
                        other => {
                            return Err(SyntaxError::new(
                                line,
                                column,
                                format!("unexpected character '{}'", other),
                            ))
                        }
                    };
                    self.push(token, line, column);
                }
            }
        }
        let (line, column) = (self.line, self.column);
        self.push(Token::Newline, line, column);
        self.push(Token::Eof, line, column);
        Ok(())
    }

    fn number(&mut self, line: usize, column: usize) -> Result<f64, SyntaxError> {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.bump();
                if c != '_' {
                    text.push(c);
                }
            } else if c == '.' && !text.contains('.') && self.next_is_digit() {
                self.bump();
                text.push('.');
            } else {
                break;
            }
        }
        text.parse()
            .map_err(|_| SyntaxError::new(line, column, format!("invalid number '{}'", text)))
    }

    /// Whether the character after the peeked one is a digit, so `1.5` is a
    /// number while `0..10` is a range.
    fn next_is_digit(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        matches!(ahead.next(), Some(c) if c.is_ascii_digit())
    }

    fn string(&mut self, line: usize, column: usize) -> Result<String, SyntaxError> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some(other) => {
                        return Err(SyntaxError::new(
                            self.line,
                            self.column,
                            format!("unknown escape '\\{}'", other),
                        ))
                    }
                    None => break,
                },
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(SyntaxError::new(line, column, "unterminated string"))
    }

    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        word
    }
}

fn keyword(word: String) -> Token {
    match word.as_str() {
        "let" => Token::Let,
        "if" => Token::If,
        "else" => Token::Else,
        "for" => Token::For,
        "in" => Token::In,
        "init" => Token::Init,
        "true" => Token::True,
        "false" => Token::False,
        "nil" => Token::Nil,
        _ => Token::Ident(word),
    }
}
