//! Lexical analysis for definition files.
//!
//! Definition files are PHP, so only the `<?php ... ?>` regions are
//! tokenized; everything outside them is inline HTML and yields nothing.
//! Comments and whitespace are stripped by logos.

use logos::Logos;
use std::fmt;

use super::error::ParseError;

/// Token of the PHP subset understood by the definition parser.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    // === Tags ===
    #[regex(r"<\?(?i:php)")]
    OpenTag,
    #[token("?>")]
    CloseTag,

    // === Keywords (case-insensitive, like PHP) ===
    #[regex("(?i:namespace)")]
    Namespace,
    #[regex("(?i:use)")]
    Use,
    #[regex("(?i:as)")]
    As,
    #[regex("(?i:match)")]
    Match,
    #[regex("(?i:array)")]
    Array,

    // === Punctuation ===
    #[token("::")]
    DoubleColon,
    #[token(":")]
    Colon,
    #[token("=>")]
    FatArrow,
    #[token("\\")]
    Backslash,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // === Data ===
    /// `$name`, stored without the sigil
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Variable(String),

    /// Plain, qualified or fully-qualified name (`Foo`, `App\Foo`, `\App\Foo`)
    #[regex(r"\\?[a-zA-Z_][a-zA-Z0-9_]*(\\[a-zA-Z_][a-zA-Z0-9_]*)*", |lex| lex.slice().to_string())]
    Name(String),

    #[regex(r#""([^"\\]|\\(.|\n))*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'([^'\\]|\\(.|\n))*'", |lex| unquote(lex.slice()))]
    String(String),

    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    /// Any other run of operator characters (`=`, `->`, `===`, ...)
    #[regex(r"[-+*/%=!<>&|^~?.@]+", |lex| lex.slice().to_string())]
    Operator(String),
}

fn unquote(literal: &str) -> String {
    literal[1..literal.len() - 1].to_string()
}

impl Token {
    /// Name token that is a single unqualified identifier
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Token::Name(name) if !name.contains('\\') => Some(name),
            _ => None,
        }
    }

    /// True for a name token spelling `word`, compared case-insensitively
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Name(name) if name.eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenTag => write!(f, "`<?php`"),
            Token::CloseTag => write!(f, "`?>`"),
            Token::Namespace => write!(f, "`namespace`"),
            Token::Use => write!(f, "`use`"),
            Token::As => write!(f, "`as`"),
            Token::Match => write!(f, "`match`"),
            Token::Array => write!(f, "`array`"),
            Token::DoubleColon => write!(f, "`::`"),
            Token::Colon => write!(f, "`:`"),
            Token::FatArrow => write!(f, "`=>`"),
            Token::Backslash => write!(f, "`\\`"),
            Token::Comma => write!(f, "`,`"),
            Token::Semicolon => write!(f, "`;`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
            Token::LBrace => write!(f, "`{{`"),
            Token::RBrace => write!(f, "`}}`"),
            Token::LBracket => write!(f, "`[`"),
            Token::RBracket => write!(f, "`]`"),
            Token::Variable(name) => write!(f, "variable `${}`", name),
            Token::Name(name) => write!(f, "name `{}`", name),
            Token::String(_) => write!(f, "string literal"),
            Token::Number(value) => write!(f, "number `{}`", value),
            Token::Operator(op) => write!(f, "`{}`", op),
        }
    }
}

/// Token with the 1-based line it starts on
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Byte offset → line lookup
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

/// Byte offset of the first `<?php` tag, in any letter case
fn find_open_tag(source: &str) -> Option<usize> {
    source
        .as_bytes()
        .windows(OPEN_TAG.len())
        .position(|window| window.eq_ignore_ascii_case(OPEN_TAG))
}

const OPEN_TAG: &[u8] = b"<?php";

/// Tokenize every `<?php ... ?>` region of `source`.
pub fn lex(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while let Some(found) = find_open_tag(&source[cursor..]) {
        let region_start = cursor + found;
        let mut lexer = Token::lexer(&source[region_start..]);
        let mut region_end = None;

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let line = lines.line_of(region_start + span.start);
            match result {
                Ok(Token::CloseTag) => {
                    tokens.push(SpannedToken { token: Token::CloseTag, line });
                    region_end = Some(region_start + span.end);
                    break;
                }
                Ok(token) => tokens.push(SpannedToken { token, line }),
                Err(()) => {
                    return Err(ParseError::new(
                        format!("unexpected character sequence `{}`", lexer.slice()),
                        line,
                    ));
                }
            }
        }

        match region_end {
            Some(end) => cursor = end,
            None => break,
        }
    }

    Ok(tokens)
}
