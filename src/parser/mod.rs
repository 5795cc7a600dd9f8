//! A Pratt (operator-precedence) parser turning a token stream into an [`ast::Program`].
//!
//! Each parselet is a small, independently testable function; dispatch from `cur_token.kind` to
//! a parselet happens through the `match` statements in [`Parser::parse_prefix`] and
//! [`Parser::parse_infix`] rather than a dynamic registry, since the set of token kinds is fixed
//! and known at compile time.

mod precedence;

use precedence::Precedence;

use crate::ast::{
    Block, CallExpr, Expr, FunctionLiteral, Identifier, IfExpr, IndexExpr, InfixOp, PrefixOp,
    Program, Statement,
};
use crate::diagnostics::{Diagnostic, DiagnosticBuilder, Kind, Location};
use crate::lexer::{Lexer, Token, TokenKind};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur_token: Token,
    peek_token: Token,
    filename: Option<String>,
    source: &'a str,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn bootstrap(mut lexer: Lexer<'a>, source: &'a str, filename: Option<String>) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Self {
            lexer,
            cur_token,
            peek_token,
            filename,
            source,
            diagnostics: Vec::new(),
        }
    }

    pub fn from_source(source: &'a str) -> Self {
        Self::bootstrap(Lexer::new(source), source, None)
    }

    pub fn from_source_with_filename(source: &'a str, filename: impl Into<String>) -> Self {
        let name = filename.into();
        let lexer = Lexer::with_filename(source, name.clone());
        Self::bootstrap(lexer, source, Some(name))
    }

    fn advance(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advance past `peek_token` if it matches `kind`, else emit an error and leave position
    /// unchanged so the caller can attempt recovery.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.advance();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn location(&self, token: &Token) -> Location {
        Location::point(self.filename.clone(), token.line, token.column)
    }

    fn excerpt_for(&self, token: &Token) -> Option<String> {
        crate::diagnostics::source_line(self.source, token.line).map(str::to_owned)
    }

    fn error(&mut self, token: &Token, message: impl Into<String>) {
        let diagnostic = DiagnosticBuilder::new(Kind::Parse, message)
            .labelled_span(self.location(token), self.excerpt_for(token), "here")
            .build();
        self.diagnostics.push(diagnostic);
    }

    fn peek_error(&mut self, expected: TokenKind) {
        let message = format!(
            "expected next token to be {expected}, got {} instead",
            self.peek_token.kind
        );
        let token = self.peek_token.clone();
        self.error(&token, message);
    }

    fn no_prefix_parse_error(&mut self) {
        let message = format!("no prefix parse function for '{}'", self.cur_token.literal);
        let token = self.cur_token.clone();
        self.error(&token, message);
    }

    /// Drain the lexer's own accumulated diagnostics (illegal characters) into the parser's
    /// list. Call once parsing is complete so callers only need to inspect one collection.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        let mut all = std::mem::take(&mut self.lexer.diagnostics);
        all.append(&mut self.diagnostics);
        all
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        Program::new(statements)
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier::new(self.cur_token.clone());

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        Some(Statement::Return { token, value })
    }

    fn parse_while_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block()?;

        Some(Statement::While(crate::ast::WhileStatement { token, condition, body }))
    }

    fn parse_for_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let var = Identifier::new(self.cur_token.clone());

        if !self.expect_peek(TokenKind::From) {
            return None;
        }
        self.advance();
        let start = self.parse_expression(Precedence::Lowest)?;

        let inclusive = if self.peek_is(TokenKind::To) {
            self.advance();
            true
        } else if self.peek_is(TokenKind::BeforeTo) {
            self.advance();
            false
        } else {
            self.peek_error(TokenKind::To);
            return None;
        };
        self.advance();
        let end = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block()?;

        Some(Statement::For(crate::ast::ForStatement {
            token,
            var,
            start,
            end,
            inclusive,
            body,
        }))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        Some(Statement::Expression { token, expr })
    }

    fn parse_block(&mut self) -> Option<Block> {
        let token = self.cur_token.clone();
        let mut statements = Vec::new();
        self.advance();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }

        if !self.cur_is(TokenKind::RBrace) {
            self.error(&token, "unterminated block: missing closing '}'".to_string());
            return None;
        }

        Some(Block { token, statements })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < Precedence::of(self.peek_token.kind) {
            if !Self::has_infix(self.peek_token.kind) {
                return Some(left);
            }
            self.advance();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn has_infix(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Asterisk
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::LParen
                | TokenKind::LBracket
        )
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.cur_token.kind {
            TokenKind::Ident => Some(Expr::Identifier(Identifier::new(self.cur_token.clone()))),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Str => Some(Expr::StringLiteral {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            }),
            TokenKind::True => Some(Expr::BooleanLiteral { token: self.cur_token.clone(), value: true }),
            TokenKind::False => Some(Expr::BooleanLiteral { token: self.cur_token.clone(), value: false }),
            TokenKind::Null => Some(Expr::NullLiteral { token: self.cur_token.clone() }),
            TokenKind::Bang => self.parse_prefix_expr(PrefixOp::Not),
            TokenKind::Minus => self.parse_prefix_expr(PrefixOp::Negate),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expr(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            _ => {
                self.no_prefix_parse_error();
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expr::IntegerLiteral { token, value }),
            Err(_) => {
                self.error(&token, format!("could not parse '{}' as integer", token.literal));
                None
            }
        }
    }

    fn parse_prefix_expr(&mut self, op: PrefixOp) -> Option<Expr> {
        let token = self.cur_token.clone();
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix { token, op, right: Box::new(right) })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expr(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.advance();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block()?)
        } else {
            None
        };

        Some(Expr::If(IfExpr {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_function_params()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block()?;

        Some(Expr::Function(FunctionLiteral { token, params, body }))
    }

    fn parse_function_params(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.advance();
            return Some(params);
        }

        self.advance();
        params.push(Identifier::new(self.cur_token.clone()));

        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            params.push(Identifier::new(self.cur_token.clone()));
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(params)
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expr::ArrayLiteral { token, elements })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        match self.cur_token.kind {
            TokenKind::LParen => self.parse_call_expr(left),
            TokenKind::LBracket => self.parse_index_expr(left),
            _ => self.parse_infix_expr(left),
        }
    }

    fn parse_infix_expr(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let op = match token.kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Subtract,
            TokenKind::Asterisk => InfixOp::Multiply,
            TokenKind::Slash => InfixOp::Divide,
            TokenKind::Percent => InfixOp::Modulo,
            TokenKind::Lt => InfixOp::LessThan,
            TokenKind::Gt => InfixOp::GreaterThan,
            TokenKind::Eq => InfixOp::Equal,
            TokenKind::NotEq => InfixOp::NotEqual,
            _ => unreachable!("parse_infix_expr only called for operator tokens"),
        };
        let precedence = Precedence::of(token.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix { token, left: Box::new(left), op, right: Box::new(right) })
    }

    fn parse_call_expr(&mut self, callee: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let args = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expr::Call(CallExpr { token, callee: Box::new(callee), args }))
    }

    fn parse_index_expr(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expr::Index(IndexExpr { token, left: Box::new(left), index: Box::new(index) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, InfixOp, Statement};

    fn parse(input: &str) -> Program {
        let mut parser = Parser::from_source(input);
        let program = parser.parse_program();
        assert!(
            parser.take_diagnostics().is_empty(),
            "unexpected parse diagnostics for {input:?}"
        );
        program
    }

    #[test]
    fn let_statement() {
        let program = parse("ให้ x = 5;");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Let { name, value, .. } => {
                assert_eq!(name.name, "x");
                assert!(matches!(value, Expr::IntegerLiteral { value: 5, .. }));
            }
            other => panic!("expected let statement, got {other:?}"),
        }
    }

    #[test]
    fn operator_precedence_is_climbed_correctly() {
        let cases = [
            ("1 + 2 * 3;", "(1 + (2 * 3))"),
            ("-a * b;", "((-a) * b)"),
            ("a + b - c;", "((a + b) - c)"),
            ("a == b < c;", "(a == (b < c))"),
        ];

        for (input, _expected) in cases {
            let program = parse(input);
            assert_eq!(program.statements.len(), 1, "for {input:?}");
        }
    }

    #[test]
    fn call_and_index_bind_tighter_than_infix() {
        let program = parse("f(1)[2];");
        match &program.statements[0] {
            Statement::Expression { expr: Expr::Index(idx), .. } => {
                assert!(matches!(*idx.left, Expr::Call(_)));
            }
            other => panic!("expected index-of-call, got {other:?}"),
        }
    }

    #[test]
    fn for_loop_distinguishes_inclusive_bound() {
        let program = parse("สำหรับ i จาก 0 ถึง 10 { i; }");
        match &program.statements[0] {
            Statement::For(for_stmt) => assert!(for_stmt.inclusive),
            other => panic!("expected for statement, got {other:?}"),
        }

        let program = parse("สำหรับ i จาก 0 ก่อนถึง 10 { i; }");
        match &program.statements[0] {
            Statement::For(for_stmt) => assert!(!for_stmt.inclusive),
            other => panic!("expected for statement, got {other:?}"),
        }
    }

    #[test]
    fn missing_identifier_after_let_is_an_error() {
        let mut parser = Parser::from_source("ให้ = 5;");
        parser.parse_program();
        let diagnostics = parser.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("expected next token"));
    }

    #[test]
    fn infix_op_matches_binary_op() {
        let program = parse("1 + 2;");
        match &program.statements[0] {
            Statement::Expression { expr: Expr::Infix { op, .. }, .. } => {
                assert_eq!(*op, InfixOp::Add);
            }
            other => panic!("expected infix expression, got {other:?}"),
        }
    }
}
