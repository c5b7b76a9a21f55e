// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recursive-descent parser producing a [`Program`].
//!
//! Binding strength, loosest first: `||`, `&&`, `==`/`!=`, comparisons,
//! `+`/`-`, `*`/`/`/`%`, unary `-`/`!`, then calls and method chains.
//! A method chain may continue on the next line when that line starts
//! with `.`.
//!
//! Blocks, parentheses, arguments and unary operators may nest at most
//! [`MAX_NESTING`] levels, and no expression may be deeper than that, so a
//! hostile file fails to parse instead of exhausting the stack.

use super::ast::{BinaryOp, Expr, ExprKind, Program, Stmt, StmtKind, UnaryOp};
use super::lexer::{tokenize, Spanned, SyntaxError, Token};
use super::value::Value;

/// Deepest nesting a script may use.
pub(crate) const MAX_NESTING: usize = 64;

pub(crate) fn parse(source: &str) -> Result<Program, SyntaxError> {
    let tokens = tokenize(source)?;
    Parser {
        tokens,
        pos: 0,
        nesting: 0,
    }
    .program()
}

fn deepest(exprs: &[Expr]) -> usize {
    exprs.iter().map(|expr| expr.depth).max().unwrap_or(0)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    nesting: usize,
}

type ParseResult<T> = Result<T, SyntaxError>;

impl Parser {
    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn current(&self) -> &Spanned {
        // The lexer always terminates the stream with Eof.
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn line(&self) -> usize {
        self.current().line
    }

    fn advance(&mut self) -> Token {
        let token = self.current().token.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        let current = self.current();
        SyntaxError::new(current.line, current.column, message)
    }

    fn expect(&mut self, token: Token, context: &str) -> ParseResult<()> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {} {}, found {}",
                token,
                context,
                self.peek()
            )))
        }
    }

    fn ident(&mut self, context: &str) -> ParseResult<String> {
        match self.peek().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!("expected a name {}, found {}", context, other))),
        }
    }

    fn too_deep(&self) -> SyntaxError {
        self.error(format!("nesting exceeds {} levels", MAX_NESTING))
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.nesting >= MAX_NESTING {
            return Err(self.too_deep());
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    /// Builds an expression node, rejecting it if it nests too deep.
    fn node(&self, kind: ExprKind, line: usize) -> ParseResult<Expr> {
        let depth = 1 + match &kind {
            ExprKind::Literal(_) | ExprKind::Var(_) => 0,
            ExprKind::Unary(_, operand) => operand.depth,
            ExprKind::Binary(_, left, right) => left.depth.max(right.depth),
            ExprKind::Call { args, .. } => deepest(args),
            ExprKind::Method { receiver, args, .. } => receiver.depth.max(deepest(args)),
        };
        if depth > MAX_NESTING {
            return Err(self.too_deep());
        }
        Ok(Expr { kind, line, depth })
    }

    fn skip_newlines(&mut self) {
        while self.eat(&Token::Newline) {}
    }

    /// True if the next non-newline token is `token`; the newlines are left in place.
    fn next_significant_is(&self, token: &Token) -> bool {
        self.tokens[self.pos..]
            .iter()
            .find(|spanned| spanned.token != Token::Newline)
            .is_some_and(|spanned| spanned.token == *token)
    }

    fn program(mut self) -> ParseResult<Program> {
        let mut program = Program::default();
        let mut seen_init = false;
        self.skip_newlines();
        while !self.check(&Token::Eof) {
            if self.check(&Token::Init) {
                if seen_init {
                    return Err(self.error("only one init block is allowed"));
                }
                seen_init = true;
                self.advance();
                program.init = self.block()?;
            } else {
                let stmt = self.statement()?;
                program.body.push(stmt);
            }
            self.terminator()?;
            self.skip_newlines();
        }
        Ok(program)
    }

    fn terminator(&mut self) -> ParseResult<()> {
        match self.peek() {
            Token::Newline => {
                self.advance();
                Ok(())
            }
            Token::Eof | Token::RBrace => Ok(()),
            other => Err(self.error(format!("expected end of line, found {}", other))),
        }
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.nested(Self::block_body)
    }

    fn block_body(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(Token::LBrace, "to open a block")?;
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.check(&Token::RBrace) {
            if self.check(&Token::Eof) {
                return Err(self.error("missing '}' before end of file"));
            }
            if self.check(&Token::Init) {
                return Err(self.error("init is only allowed at the top level"));
            }
            stmts.push(self.statement()?);
            self.terminator()?;
            self.skip_newlines();
        }
        self.advance();
        Ok(stmts)
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        let kind = match self.peek().clone() {
            Token::Let => {
                self.advance();
                let name = self.ident("after 'let'")?;
                self.expect(Token::Assign, "after variable name")?;
                StmtKind::Let(name, self.expression()?)
            }
            Token::If => {
                self.advance();
                self.if_chain()?
            }
            Token::For => {
                self.advance();
                let var = self.ident("after 'for'")?;
                self.expect(Token::In, "after loop variable")?;
                let start = self.expression()?;
                self.expect(Token::DotDot, "in loop range")?;
                let end = self.expression()?;
                let body = self.block()?;
                StmtKind::For {
                    var,
                    start,
                    end,
                    body,
                }
            }
            Token::Ident(name)
                if self
                    .tokens
                    .get(self.pos + 1)
                    .is_some_and(|next| next.token == Token::Assign) =>
            {
                self.advance();
                self.advance();
                StmtKind::Assign(name, self.expression()?)
            }
            _ => StmtKind::Expr(self.expression()?),
        };
        Ok(Stmt { kind, line })
    }

    /// Parses everything after `if`, including any `else if` / `else` arms.
    fn if_chain(&mut self) -> ParseResult<StmtKind> {
        let cond = self.expression()?;
        let then = self.block()?;
        let mut otherwise = Vec::new();
        if self.next_significant_is(&Token::Else) {
            self.skip_newlines();
            self.advance();
            if self.check(&Token::If) {
                let line = self.line();
                self.advance();
                let kind = self.nested(Self::if_chain)?;
                otherwise.push(Stmt { kind, line });
            } else {
                otherwise = self.block()?;
            }
        }
        Ok(StmtKind::If {
            cond,
            then,
            otherwise,
        })
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.nested(|parser| parser.binary_level(0))
    }

    fn binary_level(&mut self, level: usize) -> ParseResult<Expr> {
        const LEVELS: &[&[(Token, BinaryOp)]] = &[
            &[(Token::OrOr, BinaryOp::Or)],
            &[(Token::AndAnd, BinaryOp::And)],
            &[(Token::Eq, BinaryOp::Eq), (Token::NotEq, BinaryOp::NotEq)],
            &[
                (Token::Lt, BinaryOp::Lt),
                (Token::LtEq, BinaryOp::LtEq),
                (Token::Gt, BinaryOp::Gt),
                (Token::GtEq, BinaryOp::GtEq),
            ],
            &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)],
            &[
                (Token::Star, BinaryOp::Mul),
                (Token::Slash, BinaryOp::Div),
                (Token::Percent, BinaryOp::Rem),
            ],
        ];

        let Some(ops) = LEVELS.get(level) else {
            return self.unary();
        };
        let mut left = self.binary_level(level + 1)?;
        loop {
            let Some(op) = ops
                .iter()
                .find(|(token, _)| self.check(token))
                .map(|(_, op)| *op)
            else {
                return Ok(left);
            };
            let line = self.line();
            self.advance();
            let right = self.binary_level(level + 1)?;
            left = self.node(ExprKind::Binary(op, Box::new(left), Box::new(right)), line)?;
        }
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        let line = self.line();
        let op = match self.peek() {
            Token::Minus => UnaryOp::Neg,
            Token::Bang => UnaryOp::Not,
            _ => return self.postfix(),
        };
        self.advance();
        let operand = self.nested(Self::unary)?;
        self.node(ExprKind::Unary(op, Box::new(operand)), line)
    }

    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        while self.next_significant_is(&Token::Dot) {
            self.skip_newlines();
            let line = self.line();
            self.advance();
            let name = self.ident("after '.'")?;
            let args = self.arguments(&name)?;
            expr = self.node(
                ExprKind::Method {
                    receiver: Box::new(expr),
                    name,
                    args,
                },
                line,
            )?;
        }
        Ok(expr)
    }

    fn arguments(&mut self, name: &str) -> ParseResult<Vec<Expr>> {
        self.expect(Token::LParen, &format!("after '{}'", name))?;
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&Token::RParen) {
                return Ok(args);
            }
            self.expect(Token::Comma, "between arguments")?;
        }
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let line = self.line();
        let kind = match self.peek().clone() {
            Token::Number(n) => {
                self.advance();
                ExprKind::Literal(Value::Number(n))
            }
            Token::Str(s) => {
                self.advance();
                ExprKind::Literal(Value::Str(s))
            }
            Token::True => {
                self.advance();
                ExprKind::Literal(Value::Bool(true))
            }
            Token::False => {
                self.advance();
                ExprKind::Literal(Value::Bool(false))
            }
            Token::Nil => {
                self.advance();
                ExprKind::Literal(Value::Nil)
            }
            Token::Ident(name) => {
                self.advance();
                if self.check(&Token::LParen) {
                    let args = self.arguments(&name)?;
                    ExprKind::Call { name, args }
                } else {
                    ExprKind::Var(name)
                }
            }
            Token::LParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect(Token::RParen, "to close '('")?;
                return Ok(inner);
            }
            other => return Err(self.error(format!("expected an expression, found {}", other))),
        };
        self.node(kind, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_block_is_split_from_body() {
        let program = parse("init {\n let taps = 0\n}\ncolumn()\nend()\n").unwrap();
        assert_eq!(program.init.len(), 1);
        assert_eq!(program.body.len(), 2);
        assert!(matches!(program.init[0].kind, StmtKind::Let(ref name, _) if name == "taps"));
    }

    #[test]
    fn test_method_chain_continues_on_next_line() {
        let program = parse("text(\"hi\")\n  .font_size(20)\n  .color(rgb(1, 1, 1))\nend()").unwrap();
        assert_eq!(program.body.len(), 2);
        let StmtKind::Expr(ref expr) = program.body[0].kind else {
            panic!("expected an expression statement");
        };
        let ExprKind::Method { ref name, .. } = expr.kind else {
            panic!("expected a method call");
        };
        assert_eq!(name, "color");
    }

    #[test]
    fn test_precedence_multiplication_binds_tighter() {
        let program = parse("let x = 1 + 2 * 3").unwrap();
        let StmtKind::Let(_, ref expr) = program.body[0].kind else {
            panic!("expected let");
        };
        let ExprKind::Binary(op, _, ref right) = expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(right.kind, ExprKind::Binary(BinaryOp::Mul, _, _)));
    }

    #[test]
    fn test_else_if_chain_and_else_on_next_line() {
        let source = "if a { x = 1 }\nelse if b { x = 2 } else {\n x = 3\n}\n";
        let program = parse(source).unwrap();
        assert_eq!(program.body.len(), 1);
        let StmtKind::If { ref otherwise, .. } = program.body[0].kind else {
            panic!("expected if");
        };
        assert_eq!(otherwise.len(), 1);
        assert!(matches!(otherwise[0].kind, StmtKind::If { ref otherwise, .. } if otherwise.len() == 1));
    }

    #[test]
    fn test_for_loop_range() {
        let program = parse("for i in 0..3 {\n text(str(i))\n}").unwrap();
        assert!(matches!(program.body[0].kind, StmtKind::For { ref body, .. } if body.len() == 1));
    }

    #[test]
    fn test_syntax_errors_carry_position() {
        let err = parse("column()\ntext(\"a\" \"b\")\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("between arguments"), "{}", err.message);

        let err = parse("if x {\n text(\"a\")\n").unwrap_err();
        assert!(err.message.contains("missing '}'"));

        let err = parse("init {}\ninit {}").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_two_statements_on_one_line_need_a_separator() {
        assert!(parse("column() end()").is_err());
        assert!(parse("column(); end()").is_ok());
    }

    fn assert_too_deep(source: &str) {
        let err = parse(source).unwrap_err();
        assert!(err.message.contains("nesting exceeds"), "{}", err.message);
    }

    #[test]
    fn test_deep_parentheses_are_a_syntax_error() {
        let depth = 3_000;
        let source = format!(
            "column()\ntext(str({}1{}))\nend()\n",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        assert_too_deep(&source);
    }

    #[test]
    fn test_long_operator_chains_are_a_syntax_error() {
        assert_too_deep(&format!("let x = 1{}", " + 1".repeat(5_000)));
        assert_too_deep(&format!("column(){}", ".padding(1)".repeat(5_000)));
        assert_too_deep(&format!("let x = {}1", "-".repeat(5_000)));
    }

    #[test]
    fn test_deep_blocks_are_a_syntax_error() {
        assert_too_deep(&format!("{}{}", "if true {\n".repeat(500), "}\n".repeat(500)));
        assert_too_deep(&format!("if a {{ }}{}", " else if a { }".repeat(500)));
    }

    #[test]
    fn test_reasonable_nesting_still_parses() {
        let parens = format!("text(str({}1{}))", "(".repeat(40), ")".repeat(40));
        let program = parse(&parens).unwrap();
        // grouping adds no nodes: text(str(1)) is three deep
        assert!(matches!(program.body[0].kind, StmtKind::Expr(ref expr) if expr.depth == 3));

        let chain = format!("let x = 1{}", " + 1".repeat(50));
        assert!(parse(&chain).is_ok());

        let blocks = format!("{}{}", "if true {\n".repeat(20), "}\n".repeat(20));
        assert!(parse(&blocks).is_ok());
    }
}
