//! Tokenizer for the supported Java subset.

use jsym_core::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    TextBlock,
    /// Operator or separator; the text identifies which.
    Punct,
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) range: TextRange,
    /// Index into [`Lexed::docs`] of a `/** */` comment directly preceding this token.
    pub(crate) doc: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    pub range: TextRange,
    pub text: String,
}

pub(crate) struct Lexed {
    pub(crate) tokens: Vec<Token>,
    pub(crate) docs: Vec<DocComment>,
}

#[derive(Debug)]
pub(crate) struct LexError {
    pub(crate) offset: usize,
    pub(crate) message: &'static str,
}

// `>` is always lexed alone so nested generics close cleanly; the parser
// glues `>>`, `>=` and friends back together from adjacent tokens.
const PUNCTUATION: &[&str] = &[
    "<<=", "...", "->", "::", "++", "--", "&&", "||", "==", "!=", "<=", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "<<", "(", ")", "{", "}", "[", "]", ";", ",", ".", "@", "=", ">",
    "<", "!", "~", "?", ":", "+", "-", "*", "/", "&", "|", "^", "%",
];

pub(crate) fn lex(text: &str) -> Result<Lexed, LexError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut docs = Vec::new();
    let mut pending_doc = None;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if text[i..].starts_with("//") {
            i = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
            continue;
        }
        if text[i..].starts_with("/*") {
            let end = text[i + 2..]
                .find("*/")
                .map(|n| i + 2 + n + 2)
                .ok_or(LexError {
                    offset: i,
                    message: "unterminated comment",
                })?;
            if text[i..].starts_with("/**") && end - i > 4 {
                docs.push(DocComment {
                    range: range(i, end),
                    text: text[i..end].to_string(),
                });
                pending_doc = Some(docs.len() - 1);
            }
            i = end;
            continue;
        }

        let start = i;
        let kind = if c == b'_' || c == b'$' || c.is_ascii_alphabetic() || c >= 0x80 {
            let rest = &text[i..];
            let len = rest
                .find(|ch: char| !(ch == '_' || ch == '$' || ch.is_alphanumeric()))
                .unwrap_or(rest.len());
            i += len;
            TokenKind::Ident
        } else if c.is_ascii_digit()
            || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
        {
            let (kind, len) = lex_number(&text[i..]);
            i += len;
            kind
        } else if text[i..].starts_with("\"\"\"") {
            let end = text[i + 3..].find("\"\"\"").ok_or(LexError {
                offset: i,
                message: "unterminated text block",
            })?;
            i += 3 + end + 3;
            TokenKind::TextBlock
        } else if c == b'"' || c == b'\'' {
            i = quoted_end(bytes, i, c).ok_or(LexError {
                offset: i,
                message: "unterminated literal",
            })?;
            if c == b'"' {
                TokenKind::String
            } else {
                TokenKind::Char
            }
        } else {
            let punct = PUNCTUATION
                .iter()
                .find(|p| text[i..].starts_with(**p))
                .ok_or(LexError {
                    offset: i,
                    message: "unexpected character",
                })?;
            i += punct.len();
            TokenKind::Punct
        };

        tokens.push(Token {
            kind,
            range: range(start, i),
            doc: pending_doc.take(),
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        range: range(bytes.len(), bytes.len()),
        doc: None,
    });
    Ok(Lexed { tokens, docs })
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

fn quoted_end(bytes: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return None,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn lex_number(text: &str) -> (TokenKind, usize) {
    let bytes = text.as_bytes();
    let is_radix = text.len() > 1
        && bytes[0] == b'0'
        && matches!(bytes[1], b'x' | b'X' | b'b' | b'B');
    let mut i = if is_radix { 2 } else { 0 };
    let mut floating = false;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_hexdigit() && (is_radix || b.is_ascii_digit()) || b == b'_' {
            i += 1;
        } else if !is_radix && b == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            floating = true;
            i += 1;
        } else if !is_radix && b == b'.' && !floating {
            // `1.` is a double literal unless a member access follows.
            if bytes.get(i + 1).is_some_and(|n| n.is_ascii_alphabetic() || *n == b'_') {
                break;
            }
            floating = true;
            i += 1;
        } else if !is_radix && matches!(b, b'e' | b'E') {
            floating = true;
            i += 1;
            if matches!(bytes.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
        } else {
            break;
        }
    }

    match bytes.get(i) {
        Some(b'l' | b'L') => (TokenKind::Long, i + 1),
        Some(b'f' | b'F') if !is_radix => (TokenKind::Float, i + 1),
        Some(b'd' | b'D') if !is_radix => (TokenKind::Double, i + 1),
        _ if floating => (TokenKind::Double, i),
        _ => (TokenKind::Int, i),
    }
}
