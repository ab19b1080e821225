//! Parser implementation
//!
//! This module implements a recursive-descent parser for NahualScript. The
//! parser stops at the first grammar violation; only the lexer accumulates
//! several errors.

use crate::error::{NahualError, NahualResult};
use crate::lexer::{Keyword, Lexer, Token, TokenType};
use crate::stack::ensure_sufficient_stack;
use crate::types::Kind;
use super::ast::*;

/// Parser for NahualScript source code
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Create a new parser from tokens
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let ends_with_eof = matches!(tokens.last(), Some(token) if token.token_type == TokenType::Eof);
        if !ends_with_eof {
            let location = tokens
                .last()
                .map(|t| t.location.clone())
                .unwrap_or_else(|| crate::error::SourceLocation::at(1, 1));
            tokens.push(Token::new(TokenType::Eof, String::new(), location));
        }
        Self { tokens, current: 0 }
    }

    /// Tokenize and parse a whole program.
    ///
    /// Lexical errors are reported as one batch before any parsing happens.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_source(source: &str, filename: Option<&str>) -> NahualResult<Program> {
        let mut lexer = Lexer::new(source, filename);
        let tokens = lexer.tokenize();
        lexer.into_errors().into_result()?;
        tracing::debug!(count = tokens.len(), "tokenization complete");
        Parser::new(tokens).parse()
    }

    /// Parse tokens into a program
    pub fn parse(&mut self) -> NahualResult<Program> {
        let location = self.peek().location.clone();
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            declarations.push(self.declaration()?);
        }

        Ok(Program {
            declarations,
            location,
        })
    }

    // ===== Declarations =====

    fn declaration(&mut self) -> NahualResult<Stmt> {
        ensure_sufficient_stack(|| self.declaration_inner())
    }

    fn declaration_inner(&mut self) -> NahualResult<Stmt> {
        if let Some(type_name) = self.match_type() {
            self.var_declaration(type_name)
        } else if self.match_keyword(Keyword::Function) {
            self.function_declaration()
        } else if self.match_keyword(Keyword::While) {
            self.while_statement()
        } else if self.match_keyword(Keyword::If) {
            self.if_statement()
        } else if self.match_keyword(Keyword::Print) {
            self.print_statement()
        } else if self.match_keyword(Keyword::Return) {
            self.return_statement()
        } else if self.check(TokenType::LeftBrace) {
            Ok(Stmt::Block(self.block("expected '{'")?))
        } else if self.check(TokenType::Identifier) && self.check_next(TokenType::Assign) {
            self.assignment()
        } else {
            self.expression_statement()
        }
    }

    fn var_declaration(&mut self, type_name: Kind) -> NahualResult<Stmt> {
        let location = self.previous().location.clone();
        let name = self.consume_identifier("expected variable name after type")?;
        self.consume(TokenType::Assign, "expected ':=' after variable name")?;
        let initializer = self.expression()?;
        self.consume(TokenType::Semicolon, "expected ';' after variable declaration")?;

        Ok(Stmt::VarDecl {
            type_name,
            name,
            initializer,
            location,
        })
    }

    fn function_declaration(&mut self) -> NahualResult<Stmt> {
        let location = self.previous().location.clone();
        let name = self.consume_identifier("expected function name after 'sabiduria'")?;

        self.consume(TokenType::LeftParen, "expected '(' after function name")?;

        let mut params = Vec::new();
        if !self.check(TokenType::RightParen) {
            loop {
                let type_name = self
                    .match_type()
                    .ok_or_else(|| self.error_at_current("expected parameter type"))?;
                let name = self.consume_identifier("expected parameter name")?;
                params.push(Parameter { type_name, name });

                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenType::RightParen, "expected ')' after parameters")?;
        let body = self.block("expected '{' before function body")?;

        Ok(Stmt::FunctionDecl {
            name,
            params,
            body,
            location,
        })
    }

    // ===== Statements =====

    fn if_statement(&mut self) -> NahualResult<Stmt> {
        let location = self.previous().location.clone();
        let condition = self.expression()?;
        let then_branch = self.block("expected '{' after vision condition")?;

        let else_branch = if self.match_keyword(Keyword::Else) {
            if self.match_keyword(Keyword::If) {
                // sino vision
                let nested = self.if_statement()?;
                let location = nested.location().clone();
                Some(Block {
                    statements: vec![nested],
                    location,
                })
            } else {
                Some(self.block("expected '{' after 'sino'")?)
            }
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location,
        })
    }

    fn while_statement(&mut self) -> NahualResult<Stmt> {
        let location = self.previous().location.clone();
        let condition = self.expression()?;
        let body = self.block("expected '{' after ritual condition")?;

        Ok(Stmt::While {
            condition,
            body,
            location,
        })
    }

    /// `invocar a, b;` or `invocar(a, b);`
    fn print_statement(&mut self) -> NahualResult<Stmt> {
        let location = self.previous().location.clone();

        let checkpoint = self.current;
        let arguments = match self.parenthesized_print_arguments() {
            Some(arguments) => arguments,
            None => {
                self.current = checkpoint;
                let mut arguments = Vec::new();
                if !self.check(TokenType::Semicolon) {
                    loop {
                        arguments.push(self.expression()?);
                        if !self.match_token(TokenType::Comma) {
                            break;
                        }
                    }
                }
                arguments
            }
        };

        self.consume(TokenType::Semicolon, "expected ';' after invocar")?;

        Ok(Stmt::Expression {
            expr: Expr::SystemCall {
                function: SystemFunction::Print,
                arguments,
                location: location.clone(),
            },
            location,
        })
    }

    /// Try `( args ) ;`; the caller backtracks on `None`.
    fn parenthesized_print_arguments(&mut self) -> Option<Vec<Expr>> {
        if !self.match_token(TokenType::LeftParen) {
            return None;
        }
        let arguments = self.finish_arguments().ok()?;
        if self.check(TokenType::Semicolon) {
            Some(arguments)
        } else {
            None
        }
    }

    fn return_statement(&mut self) -> NahualResult<Stmt> {
        let location = self.previous().location.clone();

        let value = if !self.check(TokenType::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::Semicolon, "expected ';' after return value")?;
        Ok(Stmt::Return { value, location })
    }

    fn assignment(&mut self) -> NahualResult<Stmt> {
        let name = self.advance().lexeme.clone();
        let location = self.previous().location.clone();
        self.advance(); // ':='

        let value = self.expression()?;
        self.consume(TokenType::Semicolon, "expected ';' after assignment")?;

        Ok(Stmt::Assign {
            name,
            value,
            location,
        })
    }

    fn expression_statement(&mut self) -> NahualResult<Stmt> {
        let expr = self.expression()?;
        let location = expr.location().clone();
        self.consume(TokenType::Semicolon, "expected ';' after expression")?;
        Ok(Stmt::Expression { expr, location })
    }

    fn block(&mut self, message: &str) -> NahualResult<Block> {
        self.consume(TokenType::LeftBrace, message)?;
        let location = self.previous().location.clone();
        let mut statements = Vec::new();

        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.consume(TokenType::RightBrace, "expected '}' after block")?;
        Ok(Block {
            statements,
            location,
        })
    }

    // ===== Expressions =====

    fn expression(&mut self) -> NahualResult<Expr> {
        ensure_sufficient_stack(|| self.logical_or())
    }

    fn logical_or(&mut self) -> NahualResult<Expr> {
        let mut expr = self.logical_and()?;

        while self.match_token(TokenType::Or) {
            let right = Box::new(self.logical_and()?);
            let location = expr.location().clone();
            expr = Expr::Logical {
                left: Box::new(expr),
                operator: LogicalOp::Or,
                right,
                location,
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> NahualResult<Expr> {
        let mut expr = self.logical_not()?;

        while self.match_token(TokenType::And) {
            let right = Box::new(self.logical_not()?);
            let location = expr.location().clone();
            expr = Expr::Logical {
                left: Box::new(expr),
                operator: LogicalOp::And,
                right,
                location,
            };
        }

        Ok(expr)
    }

    fn logical_not(&mut self) -> NahualResult<Expr> {
        if self.match_token(TokenType::Not) {
            let location = self.previous().location.clone();
            let operand = Box::new(ensure_sufficient_stack(|| self.logical_not())?);
            return Ok(Expr::Unary {
                operator: UnaryOp::Not,
                operand,
                location,
            });
        }

        self.equality()
    }

    fn equality(&mut self) -> NahualResult<Expr> {
        let mut expr = self.comparison()?;

        while self.match_token(TokenType::Equal) {
            let right = Box::new(self.comparison()?);
            expr = binary(expr, BinaryOp::Equal, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> NahualResult<Expr> {
        let mut expr = self.term()?;

        while self.match_tokens(&[
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::LessEqual,
        ]) {
            let operator = match &self.previous().token_type {
                TokenType::Greater => BinaryOp::Greater,
                TokenType::GreaterEqual => BinaryOp::GreaterEqual,
                TokenType::Less => BinaryOp::Less,
                TokenType::LessEqual => BinaryOp::LessEqual,
                _ => unreachable!(),
            };
            let right = Box::new(self.term()?);
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn term(&mut self) -> NahualResult<Expr> {
        let mut expr = self.factor()?;

        while self.match_tokens(&[TokenType::Plus, TokenType::Minus]) {
            let operator = match &self.previous().token_type {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Subtract,
                _ => unreachable!(),
            };
            let right = Box::new(self.factor()?);
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn factor(&mut self) -> NahualResult<Expr> {
        let mut expr = self.unary()?;

        while self.match_tokens(&[TokenType::Star, TokenType::Slash, TokenType::Percent]) {
            let operator = match &self.previous().token_type {
                TokenType::Star => BinaryOp::Multiply,
                TokenType::Slash => BinaryOp::Divide,
                TokenType::Percent => BinaryOp::Modulo,
                _ => unreachable!(),
            };
            let right = Box::new(self.unary()?);
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> NahualResult<Expr> {
        if self.match_token(TokenType::Minus) {
            let location = self.previous().location.clone();
            let operand = Box::new(ensure_sufficient_stack(|| self.unary())?);
            return Ok(Expr::Unary {
                operator: UnaryOp::Negate,
                operand,
                location,
            });
        }

        self.postfix()
    }

    fn postfix(&mut self) -> NahualResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.match_token(TokenType::LeftBracket) {
                let index = Box::new(self.expression()?);
                self.consume(TokenType::RightBracket, "expected ']' after list index")?;
                let location = expr.location().clone();
                expr = Expr::Index {
                    target: Box::new(expr),
                    index,
                    location,
                };
            } else if self.match_token(TokenType::Dot) {
                let method = self.consume_method_name()?;
                self.consume(TokenType::LeftParen, "expected '(' after method name")?;
                let arguments = self.finish_arguments()?;
                let location = expr.location().clone();
                expr = Expr::MethodCall {
                    receiver: Box::new(expr),
                    method,
                    arguments,
                    location,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Comma-separated arguments after an already consumed '('
    fn finish_arguments(&mut self) -> NahualResult<Vec<Expr>> {
        let mut arguments = Vec::new();

        if !self.check(TokenType::RightParen) {
            loop {
                arguments.push(self.expression()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenType::RightParen, "expected ')' after arguments")?;
        Ok(arguments)
    }

    fn primary(&mut self) -> NahualResult<Expr> {
        let location = self.peek().location.clone();

        // Literals
        if let TokenType::Literal(value) = &self.peek().token_type {
            let value = value.clone();
            self.advance();
            return Ok(Expr::Literal { value, location });
        }

        // Identifiers and calls
        if self.check(TokenType::Identifier) {
            let name = self.advance().lexeme.clone();
            if self.match_token(TokenType::LeftParen) {
                let arguments = self.finish_arguments()?;
                return Ok(Expr::Call {
                    name,
                    arguments,
                    location,
                });
            }
            return Ok(Expr::Variable { name, location });
        }

        // Parenthesized expression
        if self.match_token(TokenType::LeftParen) {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen, "expected ')' after expression")?;
            return Ok(expr);
        }

        // List literal
        if self.match_token(TokenType::LeftBracket) {
            let mut elements = Vec::new();
            if !self.check(TokenType::RightBracket) {
                loop {
                    elements.push(self.expression()?);
                    if !self.match_token(TokenType::Comma) {
                        break;
                    }
                }
            }
            self.consume(TokenType::RightBracket, "expected ']' after list elements")?;
            return Ok(Expr::List { elements, location });
        }

        // Built-ins spelled with reserved words
        if self.match_keyword(Keyword::Read) {
            self.consume(TokenType::LeftParen, "expected '(' after 'percibir'")?;
            let arguments = self.finish_arguments()?;
            if arguments.len() > 1 {
                return Err(NahualError::syntax(
                    "percibir takes at most one prompt",
                    "percibir",
                    location,
                ));
            }
            return Ok(Expr::SystemCall {
                function: SystemFunction::Read,
                arguments,
                location,
            });
        }

        if self.match_keyword(Keyword::Convert) {
            self.consume(TokenType::LeftParen, "expected '(' after 'convertir'")?;
            let value = self.expression()?;
            self.consume(TokenType::Comma, "expected ',' between value and target type")?;
            let target = self.expression()?;
            self.consume(TokenType::RightParen, "expected ')' after target type")?;
            return Ok(Expr::SystemCall {
                function: SystemFunction::Convert,
                arguments: vec![value, target],
                location,
            });
        }

        if self.match_keyword(Keyword::Print) {
            self.consume(TokenType::LeftParen, "expected '(' after 'invocar' in an expression")?;
            let arguments = self.finish_arguments()?;
            return Ok(Expr::SystemCall {
                function: SystemFunction::Print,
                arguments,
                location,
            });
        }

        if self.match_keyword(Keyword::Length) {
            self.consume(TokenType::LeftParen, "expected '(' after 'longitud'")?;
            let arguments = self.finish_arguments()?;
            return Ok(Expr::Call {
                name: Keyword::Length.as_str().to_string(),
                arguments,
                location,
            });
        }

        Err(self.error_at_current("expected expression"))
    }

    // ===== Helper Methods =====

    /// Consume a type keyword and return the kind it names
    fn match_type(&mut self) -> Option<Kind> {
        let kind = match &self.peek().token_type {
            TokenType::Keyword(keyword) => keyword.type_kind(),
            _ => None,
        }?;
        self.advance();
        Some(kind)
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_tokens(&mut self, types: &[TokenType]) -> bool {
        for t in types {
            if self.check(t.clone()) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            std::mem::discriminant(&self.peek().token_type) == std::mem::discriminant(&token_type)
        }
    }

    fn check_next(&self, token_type: TokenType) -> bool {
        match self.tokens.get(self.current + 1) {
            Some(token) => {
                std::mem::discriminant(&token.token_type) == std::mem::discriminant(&token_type)
            }
            None => false,
        }
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        if self.is_at_end() {
            false
        } else {
            matches!(&self.peek().token_type, TokenType::Keyword(k) if k == &keyword)
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> NahualResult<&Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(message))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> NahualResult<String> {
        if self.check(TokenType::Identifier) {
            Ok(self.advance().lexeme.clone())
        } else {
            Err(self.error_at_current(message))
        }
    }

    /// Method names are identifiers, except `longitud` which is reserved
    fn consume_method_name(&mut self) -> NahualResult<String> {
        if self.check(TokenType::Identifier) || self.check_keyword(Keyword::Length) {
            Ok(self.advance().lexeme.clone())
        } else {
            Err(self.error_at_current("expected method name after '.'"))
        }
    }

    /// Syntax error at the current token, or end-of-input if there is none
    fn error_at_current(&self, message: &str) -> NahualError {
        let token = self.peek();
        if token.token_type == TokenType::Eof {
            NahualError::unexpected_eof(
                format!("unexpected end of input: {}", message),
                token.location.clone(),
            )
        } else {
            NahualError::syntax(
                format!("{} near '{}'", message, token.lexeme),
                token.lexeme.clone(),
                token.location.clone(),
            )
        }
    }
}

fn binary(left: Expr, operator: BinaryOp, right: Box<Expr>) -> Expr {
    let location = left.location().clone();
    Expr::Binary {
        left: Box::new(left),
        operator,
        right,
        location,
    }
}
