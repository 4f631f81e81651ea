use std::fmt::{self, Display, Formatter};

use crate::common::span::Span;

/// The stable external error-code contract exposed to embedders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unexpected token during `eat`/`consume`.
    Syntax = 1001,
    /// Square brackets enclosing something other than a pair, e.g. `[a,b,c]`.
    IntervalBracket = 1002,
    /// Characters remained after a complete top-level expression.
    TrailingInput = 1003,
    /// An unrecognized character was encountered while scanning.
    Lexical = 1004,
    /// A thousands separator was not positioned at exactly three digits.
    NumberFormat = 1005,
    /// Reached `primary` with no recognized start token.
    UnexpectedExpression = 1006,
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u32)
    }
}

/// A fatal error raised while scanning or parsing. Parser errors are fatal to
/// the current parse: no partial tree is ever returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> ParseError {
        ParseError { code, message: message.into(), span }
    }

    pub fn syntax(expected: &str, found: &str, span: Span) -> ParseError {
        ParseError::new(
            ErrorCode::Syntax,
            format!("expected {}, found {}", expected, found),
            span,
        )
    }

    pub fn interval_bracket(span: Span) -> ParseError {
        ParseError::new(
            ErrorCode::IntervalBracket,
            "square brackets must enclose exactly a pair",
            span,
        )
    }

    pub fn trailing_input(lexeme: &str, span: Span) -> ParseError {
        ParseError::new(
            ErrorCode::TrailingInput,
            format!("unexpected trailing input '{}'", lexeme),
            span,
        )
    }

    pub fn lexical(ch: char, span: Span) -> ParseError {
        ParseError::new(
            ErrorCode::Lexical,
            format!("invalid character '{}'", ch),
            span,
        )
    }

    pub fn number_format(lexeme: &str, span: Span) -> ParseError {
        ParseError::new(
            ErrorCode::NumberFormat,
            format!("misplaced thousands separator in '{}'", lexeme),
            span,
        )
    }

    pub fn unexpected_expression(found: &str, span: Span) -> ParseError {
        ParseError::new(
            ErrorCode::UnexpectedExpression,
            format!("expected an expression, found {}", found),
            span,
        )
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.span.is_empty() {
            writeln!(f, "{}", self.span)?;
        }
        write!(f, "error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A programmer error: a malformed node reached the pool or model-dispatch
/// machinery. These are not part of the recoverable error taxonomy — the
/// pool and model panic with a descriptive message instead.
#[derive(Debug)]
pub struct ImplementationError {
    pub message: String,
}

impl ImplementationError {
    pub fn new(message: impl Into<String>) -> ImplementationError {
        ImplementationError { message: message.into() }
    }
}

impl Display for ImplementationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invariant violation: {}", self.message)
    }
}

impl std::error::Error for ImplementationError {}
