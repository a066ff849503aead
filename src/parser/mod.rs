//! Hand-written recursive descent parser for definition files.
//!
//! ## Architecture
//!
//! - `lexer`: logos tokenizer for the PHP subset
//! - `stream`: TokenStream wrapper with lookahead
//! - `ast`: statement tree consumed by the scanner and walker
//!
//! Statements and expressions the compiler does not inspect are skipped with
//! bracket balancing and kept as opaque `Other` nodes, so that unrelated code
//! in a definition file still separates labels from match expressions.

pub mod ast;
mod error;
pub mod lexer;
mod stream;

pub use ast::{ArrayItem, Expr, ExprKind, MatchArm, MatchExpr, Stmt, StmtKind, UseItem};
pub use error::ParseError;

use lexer::Token;
use stream::TokenStream;

/// Leading words of statements that are never definitions
const STATEMENT_KEYWORDS: &[&str] = &[
    "abstract", "break", "class", "const", "continue", "declare", "do", "echo", "else", "elseif",
    "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile", "enum", "final", "for",
    "foreach", "function", "global", "goto", "if", "interface", "readonly", "return", "static",
    "switch", "throw", "trait", "try", "unset", "while",
];

/// Words that keep a braced statement going after its closing brace
const BLOCK_CONTINUATIONS: &[&str] = &["else", "elseif", "catch", "finally", "while"];

/// Parse a definition file into its top-level statements.
///
/// # Errors
/// Returns a [`ParseError`] carrying the offending line when the source
/// cannot be tokenized or a recognised construct is malformed.
pub fn parse(source: &str) -> Result<Vec<Stmt>, ParseError> {
    let tokens = lexer::lex(source)?;
    let mut stream = TokenStream::new(&tokens);
    parse_statements(&mut stream, Until::EndOfFile)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Until {
    EndOfFile,
    ClosingBrace,
    NextNamespace,
}

fn parse_statements(stream: &mut TokenStream<'_>, until: Until) -> Result<Vec<Stmt>, ParseError> {
    let mut statements = Vec::new();

    while let Some(token) = stream.peek() {
        match token {
            Token::RBrace if until == Until::ClosingBrace => break,
            Token::Namespace if until == Until::NextNamespace => break,
            Token::RBrace => {
                return Err(ParseError::unexpected_token(
                    Some(token),
                    "outside of a block",
                    stream.line(),
                ));
            }
            Token::OpenTag | Token::CloseTag | Token::Semicolon => {
                stream.advance();
            }
            Token::Namespace => statements.push(parse_namespace(stream)?),
            Token::Use => statements.push(parse_use(stream)?),
            _ => statements.push(parse_statement(stream)?),
        }
    }

    Ok(statements)
}

fn parse_namespace(stream: &mut TokenStream<'_>) -> Result<Stmt, ParseError> {
    let line = stream.line();
    stream.advance();

    let name = match stream.peek() {
        Some(Token::Name(name)) => {
            stream.advance();
            name.trim_start_matches('\\').to_string()
        }
        _ => String::new(),
    };

    let body = if stream.eat(&Token::LBrace) {
        let body = parse_statements(stream, Until::ClosingBrace)?;
        stream.expect(Token::RBrace)?;
        body
    } else {
        stream.expect(Token::Semicolon)?;
        parse_statements(stream, Until::NextNamespace)?
    };

    Ok(Stmt {
        kind: StmtKind::Namespace { name, body },
        line,
    })
}

fn parse_use(stream: &mut TokenStream<'_>) -> Result<Stmt, ParseError> {
    let line = stream.line();
    stream.advance();

    // `use function` / `use const` do not import classes
    if stream.peek().is_some_and(|t| t.is_word("function") || t.is_word("const")) {
        skip_statement(stream);
        return Ok(Stmt { kind: StmtKind::Other, line });
    }

    let mut items = Vec::new();
    loop {
        let name = expect_name(stream, "in use statement")?;
        if stream.eat(&Token::Backslash) {
            stream.expect(Token::LBrace)?;
            while !stream.check(&Token::RBrace) {
                let member = expect_name(stream, "in grouped use statement")?;
                let alias = parse_alias(stream)?;
                items.push(UseItem {
                    name: format!("{}\\{}", name, member),
                    alias,
                });
                if !stream.eat(&Token::Comma) {
                    break;
                }
            }
            stream.expect(Token::RBrace)?;
        } else {
            let alias = parse_alias(stream)?;
            items.push(UseItem { name, alias });
        }

        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    end_statement(stream)?;

    Ok(Stmt {
        kind: StmtKind::Use { items },
        line,
    })
}

fn parse_alias(stream: &mut TokenStream<'_>) -> Result<Option<String>, ParseError> {
    if !stream.eat(&Token::As) {
        return Ok(None);
    }
    match stream.peek().and_then(Token::as_identifier) {
        Some(alias) => {
            stream.advance();
            Ok(Some(alias.to_string()))
        }
        None => Err(ParseError::unexpected_token(
            stream.peek(),
            "as import alias",
            stream.line(),
        )),
    }
}

fn expect_name(stream: &mut TokenStream<'_>, context: &str) -> Result<String, ParseError> {
    match stream.peek() {
        Some(Token::Name(name)) => {
            stream.advance();
            Ok(name.trim_start_matches('\\').to_string())
        }
        found => Err(ParseError::unexpected_token(found, context, stream.line())),
    }
}

fn parse_statement(stream: &mut TokenStream<'_>) -> Result<Stmt, ParseError> {
    let line = stream.line();

    if let Some(Token::Name(name)) = stream.peek() {
        if is_statement_keyword(name) {
            skip_statement(stream);
            return Ok(Stmt { kind: StmtKind::Other, line });
        }
        if !name.contains('\\') && matches!(stream.peek_nth(1), Some(Token::Colon)) {
            let name = name.clone();
            stream.advance();
            stream.advance();
            return Ok(Stmt {
                kind: StmtKind::Label { name },
                line,
            });
        }
    }

    if stream.check(&Token::LBrace) {
        skip_statement(stream);
        return Ok(Stmt { kind: StmtKind::Other, line });
    }

    let expr = parse_expr(stream)?;
    // `=>` and `,` only end an opaque expression inside arms and arrays;
    // at statement level (`$f = fn($x) => $x;`) the statement goes on.
    if expr.kind == ExprKind::Other && (stream.check(&Token::FatArrow) || stream.check(&Token::Comma)) {
        skip_statement(stream);
    } else {
        end_statement(stream)?;
    }
    Ok(Stmt {
        kind: StmtKind::Expression { expr },
        line,
    })
}

fn is_statement_keyword(word: &str) -> bool {
    STATEMENT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// A statement ends at `;`, at `?>` or at end of input.
fn end_statement(stream: &mut TokenStream<'_>) -> Result<(), ParseError> {
    if stream.eat(&Token::Semicolon) || stream.at_end() || stream.check(&Token::CloseTag) {
        Ok(())
    } else {
        Err(ParseError::expected_token(&Token::Semicolon, stream.peek(), stream.line()))
    }
}

fn parse_expr(stream: &mut TokenStream<'_>) -> Result<Expr, ParseError> {
    stream.enter()?;
    let expr = parse_nested_expr(stream);
    stream.leave();
    expr
}

fn parse_nested_expr(stream: &mut TokenStream<'_>) -> Result<Expr, ParseError> {
    let line = stream.line();

    let primary = match stream.peek() {
        Some(Token::Match) => Some(parse_match(stream)?),
        Some(Token::LBracket) => {
            stream.advance();
            Some(parse_array_items(stream, Token::RBracket, line)?)
        }
        Some(Token::Array) if matches!(stream.peek_nth(1), Some(Token::LParen)) => {
            stream.advance();
            stream.advance();
            Some(parse_array_items(stream, Token::RParen, line)?)
        }
        Some(Token::Array) if is_class_fetch(stream, 1) => {
            consume(stream, 3);
            Some(Expr::new(ExprKind::ClassConst { class: "array".to_string() }, line))
        }
        Some(Token::Name(name)) if is_class_fetch(stream, 1) => {
            let class = name.clone();
            consume(stream, 3);
            Some(Expr::new(ExprKind::ClassConst { class }, line))
        }
        Some(Token::Variable(name)) => {
            let name = name.clone();
            stream.advance();
            Some(Expr::new(ExprKind::Variable { name }, line))
        }
        _ => None,
    };

    match primary {
        Some(expr) if at_expression_end(stream) => Ok(expr),
        Some(_) if !continues_expression(stream) => Err(ParseError::unexpected_token(
            stream.peek(),
            "after expression",
            stream.line(),
        )),
        _ => {
            skip_expression(stream);
            Ok(Expr::new(ExprKind::Other, line))
        }
    }
}

/// Operators, calls, indexing and ternaries extend a primary expression.
fn continues_expression(stream: &TokenStream<'_>) -> bool {
    matches!(
        stream.peek(),
        Some(Token::Operator(_) | Token::LParen | Token::LBracket | Token::DoubleColon | Token::Colon)
    )
}

fn is_class_fetch(stream: &TokenStream<'_>, offset: usize) -> bool {
    matches!(stream.peek_nth(offset), Some(Token::DoubleColon))
        && stream.peek_nth(offset + 1).is_some_and(|t| t.is_word("class"))
}

fn consume(stream: &mut TokenStream<'_>, count: usize) {
    for _ in 0..count {
        stream.advance();
    }
}

fn at_expression_end(stream: &TokenStream<'_>) -> bool {
    matches!(
        stream.peek(),
        None | Some(
            Token::Comma
                | Token::Semicolon
                | Token::FatArrow
                | Token::RBracket
                | Token::RParen
                | Token::RBrace
                | Token::CloseTag
        )
    )
}

fn parse_match(stream: &mut TokenStream<'_>) -> Result<Expr, ParseError> {
    let line = stream.line();
    stream.advance();

    stream.expect(Token::LParen)?;
    let subject = parse_expr(stream)?;
    stream.expect(Token::RParen)?;
    stream.expect(Token::LBrace)?;

    let mut arms = Vec::new();
    while !stream.check(&Token::RBrace) {
        let arm_line = stream.line();
        let mut conditions = Vec::new();

        let is_default = stream.peek().is_some_and(|t| t.is_word("default"))
            && matches!(stream.peek_nth(1), Some(Token::FatArrow));
        if is_default {
            stream.advance();
        } else {
            loop {
                conditions.push(parse_expr(stream)?);
                if stream.check(&Token::Comma) && !matches!(stream.peek_nth(1), Some(Token::FatArrow)) {
                    stream.advance();
                    continue;
                }
                stream.eat(&Token::Comma);
                break;
            }
        }

        stream.expect(Token::FatArrow)?;
        let body = parse_expr(stream)?;
        arms.push(MatchArm {
            conditions,
            body,
            line: arm_line,
        });

        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect(Token::RBrace)?;

    Ok(Expr::new(
        ExprKind::Match(MatchExpr {
            subject: Box::new(subject),
            arms,
        }),
        line,
    ))
}

fn parse_array_items(
    stream: &mut TokenStream<'_>,
    close: Token,
    line: usize,
) -> Result<Expr, ParseError> {
    let mut items = Vec::new();
    loop {
        if stream.check(&close) {
            break;
        }
        if stream.eat(&Token::Comma) {
            continue;
        }
        let first = parse_expr(stream)?;
        let item = if stream.eat(&Token::FatArrow) {
            let value = parse_expr(stream)?;
            ArrayItem { key: Some(first), value }
        } else {
            ArrayItem { key: None, value: first }
        };
        items.push(item);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect(close)?;

    Ok(Expr::new(ExprKind::Array { items }, line))
}

/// Skip the rest of an expression, stopping before its terminator.
fn skip_expression(stream: &mut TokenStream<'_>) {
    let mut depth = 0usize;
    while let Some(token) = stream.peek() {
        match token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => {
                if depth == 0 {
                    return;
                }
                depth -= 1;
            }
            Token::Comma | Token::Semicolon | Token::FatArrow | Token::CloseTag if depth == 0 => {
                return
            }
            _ => {}
        }
        stream.advance();
    }
}

/// Skip a whole statement, including a trailing braced body.
fn skip_statement(stream: &mut TokenStream<'_>) {
    let mut depth = 0usize;
    while let Some(token) = stream.peek() {
        match token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket => depth = depth.saturating_sub(1),
            Token::RBrace => {
                if depth == 0 {
                    return;
                }
                depth -= 1;
                if depth == 0 {
                    stream.advance();
                    match stream.peek() {
                        Some(Token::Semicolon) => {
                            stream.advance();
                            return;
                        }
                        Some(next) if BLOCK_CONTINUATIONS.iter().any(|w| next.is_word(w)) => continue,
                        _ => return,
                    }
                }
            }
            Token::Semicolon if depth == 0 => {
                stream.advance();
                return;
            }
            Token::CloseTag if depth == 0 => return,
            _ => {}
        }
        stream.advance();
    }
}
