//! Parse error type.

use std::fmt;

use super::lexer::Token;

/// Parse error with the source line it was raised on.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Human-readable error message
    pub message: String,
    /// 1-based source line
    pub line: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(expected: &Token, found: Option<&Token>, line: usize) -> Self {
        let message = match found {
            Some(token) => format!("expected {}, found {}", expected, token),
            None => format!("expected {}, found end of input", expected),
        };
        Self::new(message, line)
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(found: Option<&Token>, context: &str, line: usize) -> Self {
        let message = match found {
            Some(token) => format!("unexpected {} {}", token, context),
            None => format!("unexpected end of input {}", context),
        };
        Self::new(message, line)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on line {}", self.message, self.line)
    }
}

impl std::error::Error for ParseError {}
