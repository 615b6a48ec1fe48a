//! A few teeny-tiny helpers used frequently throughout the parser.
//! They don't fit anywhere else so they are in tidbits.rs

use crate::syntax::errors::SyntaxError;
use crate::syntax::lexer::{BinOp, LogicalOp, SourceLoc, Token, TokenKind, UnOp};

use super::Return;

/// Binding power of unary operators
pub(crate) const UNARY_PRIORITY: u8 = 12;

/// Either an arithmetic/comparison operator or a short-circuit one
pub(crate) enum InfixOp {
    Binary(BinOp),
    Logical(LogicalOp),
}

impl TokenKind {
    pub(crate) fn to_unop(&self) -> Option<UnOp> {
        match self {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::KwNot => Some(UnOp::Not),
            TokenKind::Hash => Some(UnOp::Len),
            TokenKind::Tilde => Some(UnOp::BitNot),
            _ => None,
        }
    }

    pub(crate) fn to_infix(&self) -> Option<InfixOp> {
        let op = match self {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::DoubleSlash => BinOp::FloorDiv,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::Caret => BinOp::Pow,
            TokenKind::DoubleDot => BinOp::Concat,
            TokenKind::DoubleEq => BinOp::Eq,
            TokenKind::TildeEq => BinOp::NotEq,
            TokenKind::Less => BinOp::Less,
            TokenKind::LessEq => BinOp::LessEq,
            TokenKind::Greater => BinOp::Greater,
            TokenKind::GreaterEq => BinOp::GreaterEq,
            TokenKind::Ampersand => BinOp::BitAnd,
            TokenKind::Pipe => BinOp::BitOr,
            TokenKind::Tilde => BinOp::BitXor,
            TokenKind::Shl => BinOp::Shl,
            TokenKind::Shr => BinOp::Shr,
            TokenKind::KwAnd => return Some(InfixOp::Logical(LogicalOp::And)),
            TokenKind::KwOr => return Some(InfixOp::Logical(LogicalOp::Or)),
            _ => return None,
        };
        Some(InfixOp::Binary(op))
    }

    /// Left and right binding power of a binary operator. Right-associative
    /// operators bind less tightly on their right side.
    pub(crate) fn binary_priority(&self) -> Option<(u8, u8)> {
        match self {
            TokenKind::KwOr => Some((1, 1)),
            TokenKind::KwAnd => Some((2, 2)),
            TokenKind::Less
            | TokenKind::LessEq
            | TokenKind::Greater
            | TokenKind::GreaterEq
            | TokenKind::DoubleEq
            | TokenKind::TildeEq => Some((3, 3)),
            TokenKind::Pipe => Some((4, 4)),
            TokenKind::Tilde => Some((5, 5)),
            TokenKind::Ampersand => Some((6, 6)),
            TokenKind::Shl | TokenKind::Shr => Some((7, 7)),
            TokenKind::DoubleDot => Some((9, 8)),
            TokenKind::Plus | TokenKind::Minus => Some((10, 10)),
            TokenKind::Star | TokenKind::Slash | TokenKind::DoubleSlash | TokenKind::Percent => {
                Some((11, 11))
            }
            TokenKind::Caret => Some((14, 13)),

            // Not a binary operator
            _ => None,
        }
    }
}

pub(crate) fn parse_number(token: &Token) -> Return<f64> {
    let malformed = || SyntaxError::MalformedNumber {
        text: token.literal.to_string(),
        location: token.location,
    };

    match token.kind {
        TokenKind::HexNumber => i64::from_str_radix(&token.literal[2..], 16)
            .map(|n| n as f64)
            .map_err(|_| malformed()),
        _ => token.literal.parse::<f64>().map_err(|_| malformed()),
    }
}

/// Number of `=` in a long bracket opener such as `[==[`
fn bracket_level(open: &str) -> usize {
    open.bytes().skip(1).take_while(|&b| b == b'=').count()
}

/// Content of a `[[...]]` string. A newline right after the opener is dropped.
pub(crate) fn long_string_value(literal: &str) -> &str {
    let level = bracket_level(literal);
    let inner = &literal[level + 2..literal.len() - (level + 2)];
    inner
        .strip_prefix("\r\n")
        .or_else(|| inner.strip_prefix('\n'))
        .unwrap_or(inner)
}

/// Text of a comment without its `--` / `--[[ ]]` markers
pub(crate) fn comment_value(raw: &str) -> &str {
    let body = &raw[2..];
    if let Some(rest) = body.strip_prefix('[') {
        let level = rest.bytes().take_while(|&b| b == b'=').count();
        // The lexer only produces a long comment once its closing bracket was found
        if rest[level..].starts_with('[') {
            let open = level + 2;
            return &body[open..body.len() - open];
        }
    }
    body
}

/// Decode the escapes of a quoted string literal
pub(crate) fn unescape(literal: &str, location: SourceLoc) -> Return<String> {
    let invalid = || SyntaxError::InvalidEscape { location };
    let inner = &literal[1..literal.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next().ok_or_else(invalid)? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\n' => out.push('\n'),
            'z' => {
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
            }
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                let code = u8::from_str_radix(&hex, 16).map_err(|_| invalid())?;
                out.push(char::from(code));
            }
            'u' => {
                if chars.next() != Some('{') {
                    return Err(invalid());
                }
                let hex: String = chars.by_ref().take_while(|&c| c != '}').collect();
                let code = u32::from_str_radix(&hex, 16).map_err(|_| invalid())?;
                out.push(char::from_u32(code).ok_or_else(invalid)?);
            }
            d if d.is_ascii_digit() => {
                let mut digits = d.to_string();
                while digits.len() < 3 {
                    match chars.next_if(|c| c.is_ascii_digit()) {
                        Some(d) => digits.push(d),
                        None => break,
                    }
                }
                let code: u8 = digits.parse().map_err(|_| invalid())?;
                out.push(char::from(code));
            }
            _ => return Err(invalid()),
        }
    }

    Ok(out)
}
