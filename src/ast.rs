use crate::error::Span;
use std::fmt;

/// Root of a parsed source: the top-level statements in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|stmt| stmt.token_literal())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: String, span: Span) -> Self {
        Self { name, span }
    }
}

/// `{ statement* }`, used by `if` branches, function bodies and bare blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        name: Identifier,
        value: Expression,
        span: Span,
    },
    Const {
        name: Identifier,
        value: Expression,
        span: Span,
    },
    Return {
        value: Expression,
        span: Span,
    },
    Expression {
        expr: Expression,
        span: Span,
    },
    Block(BlockStatement),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Let { span, .. } => *span,
            Statement::Const { span, .. } => *span,
            Statement::Return { span, .. } => *span,
            Statement::Expression { span, .. } => *span,
            Statement::Block(block) => block.span,
        }
    }

    /// Literal of the token the statement was parsed from.
    pub fn token_literal(&self) -> &str {
        match self {
            Statement::Let { .. } => "let",
            Statement::Const { .. } => "const",
            Statement::Return { .. } => "return",
            Statement::Expression { expr, .. } => expr.token_literal(),
            Statement::Block(_) => "{",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        value: i64,
        literal: String,
        span: Span,
    },
    BooleanLiteral {
        value: bool,
        span: Span,
    },
    Prefix {
        operator: UnaryOp,
        operand: Box<Expression>,
        span: Span,
    },
    Infix {
        left: Box<Expression>,
        operator: BinaryOp,
        right: Box<Expression>,
        span: Span,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
        span: Span,
    },
    FunctionLiteral {
        parameters: Vec<Identifier>,
        body: BlockStatement,
        span: Span,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(ident) => ident.span,
            Expression::IntegerLiteral { span, .. } => *span,
            Expression::BooleanLiteral { span, .. } => *span,
            Expression::Prefix { span, .. } => *span,
            Expression::Infix { span, .. } => *span,
            Expression::If { span, .. } => *span,
            Expression::FunctionLiteral { span, .. } => *span,
            Expression::Call { span, .. } => *span,
        }
    }

    pub fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(ident) => &ident.name,
            Expression::IntegerLiteral { literal, .. } => literal,
            Expression::BooleanLiteral { value: true, .. } => "true",
            Expression::BooleanLiteral { value: false, .. } => "false",
            Expression::Prefix { operator, .. } => operator.as_str(),
            Expression::Infix { operator, .. } => operator.as_str(),
            Expression::If { .. } => "if",
            Expression::FunctionLiteral { .. } => "fn",
            Expression::Call { .. } => "(",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    Greater,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Canonical rendering. Operator expressions are fully parenthesized so the
// rendered text shows how the parser grouped them.

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Let { name, value, .. } => write!(f, "let {} = {};", name, value),
            Statement::Const { name, value, .. } => write!(f, "const {} = {};", name, value),
            Statement::Return { value, .. } => write!(f, "return {};", value),
            Statement::Expression { expr, .. } => write!(f, "{}", expr),
            Statement::Block(block) => write!(f, "{}", block),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::IntegerLiteral { literal, .. } => f.write_str(literal),
            Expression::BooleanLiteral { value, .. } => write!(f, "{}", value),
            Expression::Prefix {
                operator, operand, ..
            } => write!(f, "({}{})", operator, operand),
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral {
                parameters, body, ..
            } => {
                let params: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
                write!(f, "fn({}) {}", params.join(", "), body)
            }
            Expression::Call {
                callee, arguments, ..
            } => {
                let args: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", callee, args.join(", "))
            }
        }
    }
}
