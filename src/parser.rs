use crate::ast::{BinaryOp, BlockStatement, Expression, Identifier, Program, Statement, UnaryOp};
use crate::error::{NexusError, Span};
use crate::lexer::{Lexer, Token, TokenType};
use std::num::IntErrorKind;

/// Binding power of operators, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    pub fn of(token_type: TokenType) -> Self {
        match token_type {
            TokenType::Eq | TokenType::NotEq => Precedence::Equals,
            TokenType::Lt | TokenType::Gt => Precedence::LessGreater,
            TokenType::Plus | TokenType::Minus => Precedence::Sum,
            TokenType::Star | TokenType::Slash => Precedence::Product,
            TokenType::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

type PrefixRule = fn(&mut Parser) -> Option<Expression>;
type InfixRule = fn(&mut Parser, Expression) -> Option<Expression>;

/// Pratt parser over a [`Lexer`].
///
/// Errors never abort parsing: each one is recorded as a diagnostic and the
/// parser resumes with the next statement. A `None` returned by any parse
/// routine always comes with at least one recorded diagnostic.
pub struct Parser {
    lexer: Lexer,
    current: Token,
    peek: Token,
    errors: Vec<NexusError>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[NexusError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<NexusError> {
        self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.token_type {
            TokenType::Let | TokenType::Const => self.parse_binding_statement(),
            TokenType::Return => self.parse_return_statement(),
            TokenType::LBrace => Some(Statement::Block(self.parse_block_statement())),
            _ => self.parse_expression_statement(),
        }
    }

    /// `let name = value;` and `const name = value;`
    fn parse_binding_statement(&mut self) -> Option<Statement> {
        let keyword = self.current.clone();

        self.expect_peek(TokenType::Ident)?;
        let name = Identifier::new(self.current.lexeme.clone(), self.current.span);

        self.expect_peek(TokenType::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest);
        self.skip_to_semicolon();
        let value = value?;

        let span = keyword.span.to(self.current.span);
        match keyword.token_type {
            TokenType::Const => Some(Statement::Const { name, value, span }),
            _ => Some(Statement::Let { name, value, span }),
        }
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let start = self.current.span;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest);
        self.skip_to_semicolon();
        let value = value?;

        Some(Statement::Return {
            value,
            span: start.to(self.current.span),
        })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        let span = expr.span();

        // Semicolons are optional statement terminators.
        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(Statement::Expression { expr, span })
    }

    /// Parses statements up to the closing `}`; starts on the `{`.
    fn parse_block_statement(&mut self) -> BlockStatement {
        let start = self.current.span;
        let mut statements = Vec::new();
        self.next_token();

        while !self.current_is(TokenType::RBrace) && !self.current_is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        if self.current_is(TokenType::Eof) {
            self.record_error(NexusError::parse_error_with_help(
                self.current.span,
                format!(
                    "expected token to be {}, got {} instead",
                    TokenType::RBrace,
                    TokenType::Eof
                ),
                "Blocks must be closed with '}' after the opening '{'.".to_string(),
            ));
        }

        BlockStatement {
            statements,
            span: start.to(self.current.span),
        }
    }

    pub fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let Some(prefix) = prefix_rule(self.current.token_type) else {
            self.no_prefix_rule_error();
            return None;
        };
        let mut left = prefix(self)?;

        while !self.peek_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            let Some(infix) = infix_rule(self.peek.token_type) else {
                return Some(left);
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier::new(
            self.current.lexeme.clone(),
            self.current.span,
        )))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let literal = self.current.lexeme.clone();
        let span = self.current.span;

        let value = match literal.parse::<i64>() {
            Ok(value) => value,
            Err(e) => {
                self.record_error(NexusError::parse_error_with_help(
                    span,
                    format!("could not parse {:?} as integer", literal),
                    format!(
                        "Integer literals must lie between {} and {}.",
                        i64::MIN,
                        i64::MAX
                    ),
                ));
                // Keep the node so parsing can continue; the value saturates on overflow.
                match e.kind() {
                    IntErrorKind::PosOverflow => i64::MAX,
                    _ => 0,
                }
            }
        };

        Some(Expression::IntegerLiteral {
            value,
            literal,
            span,
        })
    }

    fn parse_boolean(&mut self) -> Option<Expression> {
        Some(Expression::BooleanLiteral {
            value: self.current_is(TokenType::True),
            span: self.current.span,
        })
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let start = self.current.span;
        let operator = match self.current.token_type {
            TokenType::Bang => UnaryOp::Not,
            _ => UnaryOp::Negate,
        };

        self.next_token();
        let operand = self.parse_expression(Precedence::Prefix)?;
        let span = start.to(operand.span());

        Some(Expression::Prefix {
            operator,
            operand: Box::new(operand),
            span,
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = binary_op(self.current.token_type)?;
        // Parsing the right side at the operator's own precedence makes
        // same-precedence operators associate to the left.
        let precedence = self.current_precedence();

        self.next_token();
        let right = self.parse_expression(precedence)?;
        let span = left.span().to(right.span());

        Some(Expression::Infix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span,
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RParen)?;
        Some(expr)
    }

    /// `if (condition) { ... } else { ... }`
    fn parse_if_expression(&mut self) -> Option<Expression> {
        let start = self.current.span;

        self.expect_peek(TokenType::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RParen)?;

        self.expect_peek(TokenType::LBrace)?;
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenType::Else) {
            self.next_token();
            self.expect_peek(TokenType::LBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
            span: start.to(self.current.span),
        })
    }

    /// `fn(a, b) { ... }`
    fn parse_function_literal(&mut self) -> Option<Expression> {
        let start = self.current.span;

        self.expect_peek(TokenType::LParen)?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(TokenType::LBrace)?;
        let body = self.parse_block_statement();

        Some(Expression::FunctionLiteral {
            parameters,
            body,
            span: start.to(self.current.span),
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenType::RParen) {
            self.next_token();
            return Some(parameters);
        }

        self.expect_peek(TokenType::Ident)?;
        parameters.push(Identifier::new(self.current.lexeme.clone(), self.current.span));

        while self.peek_is(TokenType::Comma) {
            self.next_token();
            self.expect_peek(TokenType::Ident)?;
            parameters.push(Identifier::new(self.current.lexeme.clone(), self.current.span));
        }

        self.expect_peek(TokenType::RParen)?;
        Some(parameters)
    }

    fn parse_call_expression(&mut self, callee: Expression) -> Option<Expression> {
        let arguments = self.parse_call_arguments()?;
        let span = callee.span().to(self.current.span);

        Some(Expression::Call {
            callee: Box::new(callee),
            arguments,
            span,
        })
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut arguments = Vec::new();

        if self.peek_is(TokenType::RParen) {
            self.next_token();
            return Some(arguments);
        }

        self.next_token();
        arguments.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(TokenType::RParen)?;
        Some(arguments)
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn current_is(&self, token_type: TokenType) -> bool {
        self.current.token_type == token_type
    }

    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek.token_type == token_type
    }

    fn current_precedence(&self) -> Precedence {
        Precedence::of(self.current.token_type)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.token_type)
    }

    /// Advances when the next token has the expected type, otherwise records a diagnostic.
    fn expect_peek(&mut self, token_type: TokenType) -> Option<()> {
        if self.peek_is(token_type) {
            self.next_token();
            Some(())
        } else {
            self.peek_error(token_type);
            None
        }
    }

    fn skip_to_semicolon(&mut self) {
        while !self.current_is(TokenType::Semicolon) && !self.current_is(TokenType::Eof) {
            self.next_token();
        }
    }

    fn peek_error(&mut self, expected: TokenType) {
        let message = format!(
            "expected token to be {}, got {} instead",
            expected, self.peek.token_type
        );
        let help = match expected {
            TokenType::Ident => Some("Expected a name here, e.g. `let x = 5;` or `fn(a, b) { ... }`."),
            TokenType::Assign => Some("Bindings take the form `let name = value;`."),
            TokenType::RParen => {
                Some("Every opening parenthesis '(' must have a matching closing parenthesis ')'.")
            }
            TokenType::LParen => Some("Conditions and parameter lists are wrapped in parentheses: `if (x) { ... }`."),
            TokenType::LBrace => Some("Bodies of `if`, `else` and `fn` are blocks wrapped in braces."),
            _ => None,
        };

        let error = match help {
            Some(help) => NexusError::parse_error_with_help(self.peek.span, message, help.to_string()),
            None => NexusError::parse_error(self.peek.span, message),
        };
        self.record_error(error);
    }

    fn no_prefix_rule_error(&mut self) {
        let token_type = self.current.token_type;
        let message = format!("no prefix parse rule for token kind {}", token_type);
        let help = match token_type {
            TokenType::RParen => "Found ')' without matching '('. Check for unbalanced parentheses.".to_string(),
            TokenType::RBrace => "Found '}' without matching '{'. Check for unbalanced braces.".to_string(),
            TokenType::Eof => "Reached end of input while expecting an expression.".to_string(),
            TokenType::Illegal => format!("'{}' is not a valid character here.", self.current.lexeme),
            _ => "Expected a literal, identifier, prefix operator or parenthesized expression here."
                .to_string(),
        };

        self.record_error(NexusError::parse_error_with_help(
            self.current.span,
            message,
            help,
        ));
    }

    fn record_error(&mut self, error: NexusError) {
        tracing::debug!(start = error.span.start, end = error.span.end, "parse error: {}", error.message);
        self.errors.push(error);
    }
}

fn prefix_rule(token_type: TokenType) -> Option<PrefixRule> {
    match token_type {
        TokenType::Ident => Some(Parser::parse_identifier),
        TokenType::Int => Some(Parser::parse_integer_literal),
        TokenType::True | TokenType::False => Some(Parser::parse_boolean),
        TokenType::Bang | TokenType::Minus => Some(Parser::parse_prefix_expression),
        TokenType::LParen => Some(Parser::parse_grouped_expression),
        TokenType::If => Some(Parser::parse_if_expression),
        TokenType::Function => Some(Parser::parse_function_literal),
        _ => None,
    }
}

fn infix_rule(token_type: TokenType) -> Option<InfixRule> {
    match token_type {
        TokenType::Plus
        | TokenType::Minus
        | TokenType::Star
        | TokenType::Slash
        | TokenType::Eq
        | TokenType::NotEq
        | TokenType::Lt
        | TokenType::Gt => Some(Parser::parse_infix_expression),
        TokenType::LParen => Some(Parser::parse_call_expression),
        _ => None,
    }
}

fn binary_op(token_type: TokenType) -> Option<BinaryOp> {
    match token_type {
        TokenType::Plus => Some(BinaryOp::Add),
        TokenType::Minus => Some(BinaryOp::Subtract),
        TokenType::Star => Some(BinaryOp::Multiply),
        TokenType::Slash => Some(BinaryOp::Divide),
        TokenType::Eq => Some(BinaryOp::Equal),
        TokenType::NotEq => Some(BinaryOp::NotEqual),
        TokenType::Lt => Some(BinaryOp::Less),
        TokenType::Gt => Some(BinaryOp::Greater),
        _ => None,
    }
}

/// Lexes and parses `source`, returning the program and its diagnostics.
pub fn parse(source: &str) -> (Program, Vec<NexusError>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    (program, parser.into_errors())
}
