use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use thiserror::Error;

/// Character offsets into the source, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ParseError,
    RuntimeError,
}

/// A diagnostic ready to be shown to the user.
#[derive(Debug, Clone)]
pub struct NexusError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl NexusError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn parse_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::ParseError, span, message)
    }

    pub fn parse_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::ParseError, span, message, help)
    }

    pub fn runtime_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::RuntimeError, span, message)
    }

    pub fn runtime_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::RuntimeError, span, message, help)
    }

    /// Renders the diagnostic against `source` on stderr.
    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let color = match self.kind {
            ErrorKind::ParseError => Color::Yellow,
            ErrorKind::RuntimeError => Color::Magenta,
        };

        let kind_str = match self.kind {
            ErrorKind::ParseError => "Parse Error",
            ErrorKind::RuntimeError => "Runtime Error",
        };

        // Spans past the end of input (EOF tokens) are clamped so ariadne can label them.
        let len = source.chars().count();
        let start = self.span.start.min(len);
        let end = self.span.end.min(len).max(start);

        let mut report_builder = Report::build(ReportKind::Error, filename, start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        if let Err(e) = report_builder
            .finish()
            .eprint((filename, Source::from(source)))
        {
            tracing::warn!("failed to render diagnostic: {}", e);
            eprintln!("{}: {}", kind_str, self.message);
        }
    }
}

impl fmt::Display for NexusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for NexusError {}

/// Failures raised while evaluating a program.
///
/// Only `DivisionByZero` is raised in the default mode; the other variants
/// replace the silent `null` fallbacks when strict evaluation is enabled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Integer division with a zero divisor, e.g. `10 / 0`.
    #[error("division by zero")]
    DivisionByZero { span: Span },

    /// Infix operands of different types, e.g. `1 + true`.
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: &'static str,
        operator: String,
        right: &'static str,
        span: Span,
    },

    /// Prefix operator with no meaning for its operand, e.g. `-true`.
    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: String,
        operand: &'static str,
        span: Span,
    },

    /// Infix operator with no meaning for its operand types, e.g. `true + false`.
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operator: String,
        right: &'static str,
        span: Span,
    },

    /// Construct that parses but has no evaluation rule.
    #[error("unsupported: {what} cannot be evaluated")]
    Unsupported { what: &'static str, span: Span },
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::DivisionByZero { span } => *span,
            RuntimeError::TypeMismatch { span, .. } => *span,
            RuntimeError::UnknownPrefixOperator { span, .. } => *span,
            RuntimeError::UnknownInfixOperator { span, .. } => *span,
            RuntimeError::Unsupported { span, .. } => *span,
        }
    }

    fn help(&self) -> Option<String> {
        match self {
            RuntimeError::DivisionByZero { .. } => {
                Some("Check the divisor before dividing integers.".to_string())
            }
            RuntimeError::Unsupported { .. } => Some(
                "Variable bindings and function calls are parsed but not evaluated.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<RuntimeError> for NexusError {
    fn from(error: RuntimeError) -> Self {
        let span = error.span();
        match error.help() {
            Some(help) => NexusError::runtime_error_with_help(span, error.to_string(), help),
            None => NexusError::runtime_error(span, error.to_string()),
        }
    }
}
