//! Token stream wrapper for the hand-written parser.

use super::error::ParseError;
use super::lexer::{SpannedToken, Token};

/// Token stream with lookahead and line tracking.
pub struct TokenStream<'src> {
    tokens: &'src [SpannedToken],
    pos: usize,
    depth: usize,
}

/// Deepest expression nesting accepted before parsing gives up
pub const MAX_NESTING: usize = 256;

impl<'src> TokenStream<'src> {
    pub fn new(tokens: &'src [SpannedToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&'src Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek at the nth token ahead without consuming.
    pub fn peek_nth(&self, n: usize) -> Option<&'src Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    /// Advance to the next token and return the current one.
    pub fn advance(&mut self) -> Option<&'src Token> {
        let token = self.tokens.get(self.pos).map(|t| &t.token);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token has the same kind as `expected`.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Consume the current token if it has the same kind as `expected`.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Expect a specific token kind and advance if it matches.
    pub fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(ParseError::expected_token(&expected, self.peek(), self.line()))
        }
    }

    /// Enter one level of expression nesting.
    pub fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(
                format!("expression nested deeper than {} levels", MAX_NESTING),
                self.line(),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level of expression nesting.
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Line of the current token, or of the last token at end of input.
    pub fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::lex;

    #[test]
    fn test_lookahead_and_expect() {
        let tokens = lex("<?php T:\n$x;").unwrap();
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(stream.peek(), Some(&Token::OpenTag));
        assert_eq!(stream.peek_nth(2), Some(&Token::Colon));
        stream.advance();
        assert!(stream.check(&Token::Name(String::new())));
        stream.advance();
        assert!(stream.expect(Token::Colon).is_ok());
        assert_eq!(stream.line(), 2);
        let err = stream.expect(Token::Semicolon).unwrap_err();
        assert!(err.message.contains("expected `;`"));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_nesting_limit() {
        let tokens = lex("<?php\n$x").unwrap();
        let mut stream = TokenStream::new(&tokens);
        for _ in 0..MAX_NESTING {
            stream.enter().unwrap();
        }
        let err = stream.enter().unwrap_err();
        assert!(err.message.contains("nested deeper"));
        stream.leave();
        assert!(stream.enter().is_ok());
    }

    #[test]
    fn test_line_at_end_of_input() {
        let tokens = lex("<?php\n\n$x").unwrap();
        let mut stream = TokenStream::new(&tokens);
        stream.advance();
        stream.advance();
        assert!(stream.at_end());
        assert_eq!(stream.line(), 3);
    }
}
