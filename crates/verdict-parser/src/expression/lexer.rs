//! FEEL tokenizer

use crate::error::{ParseError, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    And,
    Or,
    Not,
    In,
    True,
    False,
    Null,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    DotDot,
    Question,
    Eof,
}

impl TokenKind {
    /// Short text for error messages
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => n.to_string(),
            TokenKind::Str(s) => format!("\"{}\"", s),
            TokenKind::Ident(name) => format!("'{}'", name),
            TokenKind::Eof => "end of expression".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::In => "in",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Eq => "=",
            TokenKind::Neq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Lte => "<=",
            TokenKind::Gt => ">",
            TokenKind::Gte => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::Question => "?",
            TokenKind::Number(_) | TokenKind::Str(_) | TokenKind::Ident(_) | TokenKind::Eof => "",
        }
    }
}

/// A token and its byte offset in the source text
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Split `input` into tokens, always terminated by `Eof`
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let kind = match c {
            b'0'..=b'9' => {
                let (number, end) = lex_number(input, pos)?;
                pos = end;
                TokenKind::Number(number)
            }
            b'"' => {
                let (text, end) = lex_string(input, pos)?;
                pos = end;
                TokenKind::Str(text)
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let end = scan_while(bytes, pos, |b| b.is_ascii_alphanumeric() || b == b'_');
                let word = &input[pos..end];
                pos = end;
                keyword(word).unwrap_or_else(|| TokenKind::Ident(word.to_string()))
            }
            _ => {
                let next = bytes.get(pos + 1).copied();
                let (kind, len) = match (c, next) {
                    (b'=', Some(b'=')) => (TokenKind::Eq, 2),
                    (b'=', _) => (TokenKind::Eq, 1),
                    (b'!', Some(b'=')) => (TokenKind::Neq, 2),
                    (b'<', Some(b'=')) => (TokenKind::Lte, 2),
                    (b'<', _) => (TokenKind::Lt, 1),
                    (b'>', Some(b'=')) => (TokenKind::Gte, 2),
                    (b'>', _) => (TokenKind::Gt, 1),
                    (b'.', Some(b'.')) => (TokenKind::DotDot, 2),
                    (b'.', _) => (TokenKind::Dot, 1),
                    (b'+', _) => (TokenKind::Plus, 1),
                    (b'-', _) => (TokenKind::Minus, 1),
                    (b'*', _) => (TokenKind::Star, 1),
                    (b'/', _) => (TokenKind::Slash, 1),
                    (b'(', _) => (TokenKind::LParen, 1),
                    (b')', _) => (TokenKind::RParen, 1),
                    (b'[', _) => (TokenKind::LBracket, 1),
                    (b']', _) => (TokenKind::RBracket, 1),
                    (b',', _) => (TokenKind::Comma, 1),
                    (b'?', _) => (TokenKind::Question, 1),
                    _ => {
                        let found = input[pos..].chars().next().unwrap_or('?');
                        return Err(ParseError::syntax(
                            input,
                            pos,
                            format!("unexpected character '{}'", found),
                        ));
                    }
                };
                pos += len;
                kind
            }
        };
        tokens.push(Token {
            kind,
            position: start,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: input.len(),
    });
    Ok(tokens)
}

fn keyword(word: &str) -> Option<TokenKind> {
    match word {
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        "not" => Some(TokenKind::Not),
        "in" => Some(TokenKind::In),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "null" => Some(TokenKind::Null),
        _ => None,
    }
}

fn scan_while(bytes: &[u8], mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    while pos < bytes.len() && pred(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Digits with an optional fraction; `1..5` stops before the `..`
fn lex_number(input: &str, start: usize) -> Result<(f64, usize)> {
    let bytes = input.as_bytes();
    let mut end = scan_while(bytes, start, |b| b.is_ascii_digit());
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end = scan_while(bytes, end + 1, |b| b.is_ascii_digit());
    }
    input[start..end]
        .parse::<f64>()
        .map(|n| (n, end))
        .map_err(|e| ParseError::syntax(input, start, format!("invalid number: {}", e)))
}

fn lex_string(input: &str, start: usize) -> Result<(String, usize)> {
    let mut text = String::new();
    let mut chars = input[start + 1..].char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '"' => return Ok((text, start + 1 + offset + 1)),
            '\\' => match chars.next() {
                Some((_, '"')) => text.push('"'),
                Some((_, '\\')) => text.push('\\'),
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((escape_offset, other)) => {
                    return Err(ParseError::syntax(
                        input,
                        start + 1 + escape_offset,
                        format!("unknown escape '\\{}'", other),
                    ))
                }
                None => break,
            },
            other => text.push(other),
        }
    }

    Err(ParseError::syntax(input, start, "unterminated string literal"))
}
