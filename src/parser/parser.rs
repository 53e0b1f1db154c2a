use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use std::fmt;

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the C subset
///
/// One token of lookahead, plus a forward scan in two places: after
/// `type name` to tell a function definition from a variable declaration,
/// and at the start of a statement to tell an assignment from a call.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Build a parser over an already lexed token stream
    ///
    /// The stream is expected to end with [`Token::Eof`]; one is appended if
    /// missing.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token::Eof(_))) {
            let loc = tokens
                .last()
                .map(Token::location)
                .unwrap_or(SourceLocation::new(1, 1));
            tokens.push(Token::Eof(loc));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let decl = self.parse_top_level_declaration()?;
            program.nodes.push(decl);
        }

        Ok(program)
    }

    /// Parse a top-level declaration (function definition or global variable)
    fn parse_top_level_declaration(&mut self) -> Result<AstNode, ParseError> {
        if !self.is_type_keyword() {
            return Err(ParseError {
                message: format!("Expected declaration at top level, found {}", self.peek()),
                location: self.current_location(),
            });
        }

        let decl_type = self.parse_type()?;
        let loc = self.current_location();
        let name = self.expect_identifier()?;

        if self.check(&Token::LParen(loc)) {
            self.parse_function_definition(decl_type, name, loc)
        } else {
            self.parse_variable_declaration_rest(decl_type, name, loc)
        }
    }

    /// Parse the rest of a function definition: (params) { body }
    fn parse_function_definition(
        &mut self,
        return_type: Type,
        name: String,
        location: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        self.expect_token(&Token::LParen(self.current_location()), "Expected '(' after function name")?;

        let params = self.parse_parameter_list()?;

        self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after parameters")?;
        self.expect_token(&Token::LBrace(self.current_location()), "Expected '{' before function body")?;

        let body = self.parse_block_statements()?;

        self.expect_token(&Token::RBrace(self.current_location()), "Expected '}' after function body")?;

        Ok(AstNode::FunctionDef(FunctionDef {
            name,
            params,
            body,
            return_type,
            location,
        }))
    }

    /// Parse parameter list: type name, type name, ...
    ///
    /// Only `int` and `char` are accepted. Pointer stars are consumed but
    /// not kept: every parameter is bound as a 4-byte int.
    fn parse_parameter_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(params);
        }

        loop {
            if !matches!(self.peek(), Token::Int(_) | Token::Char(_)) {
                return Err(ParseError {
                    message: format!("Parameter type must be 'int' or 'char', found {}", self.peek()),
                    location: self.current_location(),
                });
            }
            self.advance();
            while self.match_token(&Token::Star(self.current_location())) {}

            let location = self.current_location();
            let name = self.expect_identifier()?;
            params.push(Param { name, location });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse type: base_type [*]*
    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let base = if self.match_token(&Token::Int(self.current_location())) {
            BaseType::Int
        } else if self.match_token(&Token::Char(self.current_location())) {
            BaseType::Char
        } else if self.match_token(&Token::Void(self.current_location())) {
            BaseType::Void
        } else {
            return Err(ParseError {
                message: format!("Expected type, found {}", self.peek()),
                location: self.current_location(),
            });
        };

        let mut var_type = Type::new(base);
        while self.match_token(&Token::Star(self.current_location())) {
            var_type = var_type.with_pointer();
        }

        Ok(var_type)
    }

    /// Parse block statements (inside braces, excluding the braces themselves)
    fn parse_block_statements(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse `{ statements }`
    fn parse_braced_block(&mut self, context: &str) -> Result<Vec<AstNode>, ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' to open {}", context),
        )?;
        let statements = self.parse_block_statements()?;
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' to close {}", context),
        )?;
        Ok(statements)
    }

    /// Parse a statement
    fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        if self.is_type_keyword() {
            let var_type = self.parse_type()?;
            let name_loc = self.current_location();
            let name = self.expect_identifier()?;
            return self.parse_variable_declaration_rest(var_type, name, name_loc);
        }

        if self.is_assignment_ahead() {
            return self.parse_assignment();
        }

        if self.match_token(&Token::Print(loc)) {
            self.expect_token(&Token::LParen(self.current_location()), "Expected '(' after 'print'")?;
            let expr = Box::new(self.parse_expression()?);
            self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after print argument")?;
            self.expect_token(&Token::Semicolon(self.current_location()), "Expected ';' after print")?;
            return Ok(AstNode::Print { expr, location: loc });
        }

        if self.match_token(&Token::Debug(loc)) {
            self.expect_token(&Token::Semicolon(self.current_location()), "Expected ';' after 'debug'")?;
            return Ok(AstNode::Debug { location: loc });
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement();
        }

        if self.match_token(&Token::Return(loc)) {
            let expr = Box::new(self.parse_expression()?);
            self.expect_token(&Token::Semicolon(self.current_location()), "Expected ';' after return")?;
            return Ok(AstNode::Return { expr, location: loc });
        }

        if matches!(self.peek(), Token::Ident(..))
            && matches!(self.peek_ahead(1), Some(Token::LParen(_)))
        {
            let call = self.parse_function_call()?;
            self.expect_token(&Token::Semicolon(self.current_location()), "Expected ';' after function call")?;
            return Ok(call);
        }

        Err(ParseError {
            message: format!("Unexpected {} at start of statement", self.peek()),
            location: loc,
        })
    }

    /// Parse `[= init] ;` after `type name`
    fn parse_variable_declaration_rest(
        &mut self,
        var_type: Type,
        name: String,
        location: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        let init = if self.match_token(&Token::Eq(self.current_location())) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        self.expect_token(&Token::Semicolon(self.current_location()), "Expected ';' after variable declaration")?;

        Ok(AstNode::VarDecl {
            name,
            var_type,
            init,
            location,
        })
    }

    /// Scan past leading `*` for `identifier =`
    fn is_assignment_ahead(&self) -> bool {
        let mut offset = 0;
        while matches!(self.peek_ahead(offset), Some(Token::Star(_))) {
            offset += 1;
        }
        matches!(self.peek_ahead(offset), Some(Token::Ident(..)))
            && matches!(self.peek_ahead(offset + 1), Some(Token::Eq(_)))
    }

    /// Parse assignment: lvalue = expr ;
    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let lhs = Box::new(self.parse_unary()?);
        let loc = self.current_location();
        self.expect_token(&Token::Eq(loc), "Expected '=' in assignment")?;
        let rhs = Box::new(self.parse_expression()?);
        self.expect_token(&Token::Semicolon(self.current_location()), "Expected ';' after assignment")?;

        Ok(AstNode::Assignment {
            lhs,
            rhs,
            location: loc,
        })
    }

    /// Parse if statement; `if` is already consumed
    fn parse_if_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_token(&Token::LParen(self.current_location()), "Expected '(' after 'if'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after if condition")?;

        let then_branch = self.parse_braced_block("if body")?;

        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            Some(self.parse_braced_block("else body")?)
        } else {
            None
        };

        Ok(AstNode::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse function call: name ( args )
    fn parse_function_call(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        let name = self.expect_identifier()?;
        self.expect_token(&Token::LParen(self.current_location()), "Expected '(' after function name")?;
        let args = self.parse_argument_list()?;
        self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after function arguments")?;

        Ok(AstNode::FunctionCall {
            name,
            args,
            location: loc,
        })
    }

    /// Parse argument list: expr, expr, ...
    fn parse_argument_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut args = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(args)
    }

    // ===== Expressions =====

    /// Parse expression (lowest precedence: comparison)
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_comparison()
    }

    /// Parse comparison (== != < >)
    fn parse_comparison(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::EqEq(_) => BinOp::Eq,
                Token::NotEq(_) => BinOp::Ne,
                Token::Lt(_) => BinOp::Lt,
                Token::Gt(_) => BinOp::Gt,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* /)
    fn parse_multiplicative(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse unary (& *)
    fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Amp(loc)) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(AstNode::UnaryOp {
                op: UnOp::AddrOf,
                operand,
                location: loc,
            });
        }

        if self.match_token(&Token::Star(loc)) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(AstNode::UnaryOp {
                op: UnOp::Deref,
                operand,
                location: loc,
            });
        }

        self.parse_primary()
    }

    /// Parse primary (literals, variables, calls, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        match self.peek().clone() {
            Token::IntLiteral(n, loc) => {
                self.advance();
                Ok(AstNode::IntLiteral(n, loc))
            }
            Token::StringLiteral(s, loc) => {
                self.advance();
                Ok(AstNode::StringLiteral(s, loc))
            }
            Token::Ident(name, loc) => {
                if matches!(self.peek_ahead(1), Some(Token::LParen(_))) {
                    return self.parse_function_call();
                }
                self.advance();
                Ok(AstNode::Variable(name, loc))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after expression")?;
                Ok(expr)
            }
            other => Err(ParseError {
                message: format!("Unexpected token: {}", other),
                location: loc,
            }),
        }
    }

    // ===== Helper methods =====

    fn is_type_keyword(&self) -> bool {
        matches!(self.peek(), Token::Int(_) | Token::Char(_) | Token::Void(_))
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(ParseError {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }
}
