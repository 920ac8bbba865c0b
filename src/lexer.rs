use crate::error::Span;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Special
    Illegal,
    Eof,

    // Literals
    Ident,
    Int,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Eq,
    NotEq,
    Lt,
    Gt,

    // Delimiters
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // Keywords
    Function,
    Let,
    Const,
    Return,
    If,
    Else,
    True,
    False,
}

impl TokenType {
    /// Canonical name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Illegal => "ILLEGAL",
            TokenType::Eof => "EOF",
            TokenType::Ident => "IDENT",
            TokenType::Int => "INT",
            TokenType::Assign => "=",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Star => "*",
            TokenType::Slash => "/",
            TokenType::Bang => "!",
            TokenType::Eq => "==",
            TokenType::NotEq => "!=",
            TokenType::Lt => "<",
            TokenType::Gt => ">",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::LParen => "(",
            TokenType::RParen => ")",
            TokenType::LBrace => "{",
            TokenType::RBrace => "}",
            TokenType::Function => "FUNCTION",
            TokenType::Let => "LET",
            TokenType::Const => "CONST",
            TokenType::Return => "RETURN",
            TokenType::If => "IF",
            TokenType::Else => "ELSE",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, span: Span) -> Self {
        Self {
            token_type,
            lexeme,
            span,
        }
    }
}

/// Pull-based lexer: every call to [`Lexer::next_token`] scans one token.
///
/// Once the input is exhausted it keeps returning `EOF` tokens with an
/// empty lexeme.
pub struct Lexer {
    source: Vec<char>,
    start: usize,
    current: usize,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("fn", TokenType::Function);
        keywords.insert("let", TokenType::Let);
        keywords.insert("const", TokenType::Const);
        keywords.insert("return", TokenType::Return);
        keywords.insert("if", TokenType::If);
        keywords.insert("else", TokenType::Else);
        keywords.insert("true", TokenType::True);
        keywords.insert("false", TokenType::False);

        Self {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            keywords,
        }
    }

    /// Collects every token up to and including the first `EOF`.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.token_type == TokenType::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.current;

        // A NUL character terminates the input just like its real end.
        if self.is_at_end() || self.peek() == '\0' {
            return Token::new(TokenType::Eof, String::new(), Span::single(self.current));
        }

        let c = self.advance();

        match c {
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            '+' => self.make_token(TokenType::Plus),
            '-' => self.make_token(TokenType::Minus),
            '*' => self.make_token(TokenType::Star),
            '/' => self.make_token(TokenType::Slash),
            '<' => self.make_token(TokenType::Lt),
            '>' => self.make_token(TokenType::Gt),
            '=' => {
                let token_type = if self.match_char('=') {
                    TokenType::Eq
                } else {
                    TokenType::Assign
                };
                self.make_token(token_type)
            }
            '!' => {
                let token_type = if self.match_char('=') {
                    TokenType::NotEq
                } else {
                    TokenType::Bang
                };
                self.make_token(token_type)
            }
            c if c.is_ascii_digit() => self.number(),
            c if is_identifier_start(c) => self.identifier(),
            _ => {
                tracing::trace!(character = %c, offset = self.start, "illegal character");
                self.make_token(TokenType::Illegal)
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\n' | '\r') {
            self.advance();
        }
    }

    fn advance(&mut self) -> char {
        match self.source.get(self.current) {
            Some(&c) => {
                self.current += 1;
                c
            }
            None => '\0',
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn number(&mut self) -> Token {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        self.make_token(TokenType::Int)
    }

    fn identifier(&mut self) -> Token {
        while is_identifier_char(self.peek()) {
            self.advance();
        }

        let text = self.lexeme();
        let token_type = self
            .keywords
            .get(text.as_str())
            .copied()
            .unwrap_or(TokenType::Ident);

        Token::new(token_type, text, Span::new(self.start, self.current))
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token::new(token_type, self.lexeme(), Span::new(self.start, self.current))
    }
}

/// Yields tokens until the input is exhausted; the trailing `EOF` is not yielded.
impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.token_type == TokenType::Eof {
            None
        } else {
            Some(token)
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
