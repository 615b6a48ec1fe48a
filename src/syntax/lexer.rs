//! Lexical analysis pass using `logos` crate
use core::fmt;

use logos::{Lexer, Logos};
use serde::{Deserialize, Serialize};

use super::errors::SyntaxError;

/// A line/column pair. Lines start at 1, columns at 0.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Report locations in the source code: the byte range `[start, end)` plus
/// the line/column of both ends.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLoc {
    pub start: usize,
    pub end: usize,

    pub start_pos: Position,
    pub end_pos: Position,
}

impl SourceLoc {
    /// Location covering `self` through the end of `other`
    pub fn to(&self, other: &SourceLoc) -> SourceLoc {
        SourceLoc {
            start: self.start,
            end: other.end,
            start_pos: self.start_pos,
            end_pos: other.end_pos,
        }
    }

    pub fn encloses(&self, other: &SourceLoc) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.start_pos.line, self.start_pos.column)
    }
}

fn long_bracket_level(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('[')?;
    let level = rest.bytes().take_while(|&b| b == b'=').count();
    rest[level..].starts_with('[').then_some(level)
}

/// Length of `s` up to and including the closing bracket `]==]` of the given level
fn long_bracket_close(s: &str, level: usize) -> Option<usize> {
    let close = format!("]{}]", "=".repeat(level));
    s.find(&close).map(|i| i + close.len())
}

fn lex_comment(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    match long_bracket_level(rest) {
        Some(level) => {
            let open = level + 2;
            match long_bracket_close(&rest[open..], level) {
                Some(len) => {
                    lex.bump(open + len);
                    true
                }
                None => false,
            }
        }
        None => {
            let len = rest.find('\n').unwrap_or(rest.len());
            lex.bump(len);
            true
        }
    }
}

fn lex_long_string(lex: &mut Lexer<TokenKind>) -> bool {
    let level = lex.slice().len() - 2;
    match long_bracket_close(lex.remainder(), level) {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("//")]
    DoubleSlash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("#")]
    Hash,
    #[token("&")]
    Ampersand,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("==")]
    DoubleEq,
    #[token("~=")]
    TildeEq,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEq,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEq,
    #[token("=")]
    Equal,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LCurly,
    #[token("}")]
    RCurly,
    #[token("[")]
    LSquare,
    #[token("]")]
    RSquare,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("..")]
    DoubleDot,
    #[token("...")]
    Ellipsis,

    // Keywords
    #[token("and")]
    KwAnd,
    #[token("break")]
    KwBreak,
    #[token("do")]
    KwDo,
    #[token("else")]
    KwElse,
    #[token("elseif")]
    KwElseif,
    #[token("end")]
    KwEnd,
    #[token("false")]
    KwFalse,
    #[token("for")]
    KwFor,
    #[token("function")]
    KwFunction,
    #[token("goto")]
    KwGoto,
    #[token("if")]
    KwIf,
    #[token("in")]
    KwIn,
    #[token("local")]
    KwLocal,
    #[token("nil")]
    KwNil,
    #[token("not")]
    KwNot,
    #[token("or")]
    KwOr,
    #[token("repeat")]
    KwRepeat,
    #[token("return")]
    KwReturn,
    #[token("then")]
    KwThen,
    #[token("true")]
    KwTrue,
    #[token("until")]
    KwUntil,
    #[token("while")]
    KwWhile,

    // Literals
    #[regex(r"[_a-zA-Z][_0-9a-zA-Z]*")]
    Name,
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,
    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexNumber,
    #[regex(r#""(\\(.|\n)|[^"\\\n])*""#)]
    #[regex(r#"'(\\(.|\n)|[^'\\\n])*'"#)]
    String,
    #[regex(r"\[=*\[", lex_long_string)]
    LongString,

    #[token("--", lex_comment)]
    Comment,
}

impl TokenKind {
    pub fn is_block_end(&self) -> bool {
        matches!(
            self,
            TokenKind::KwEnd | TokenKind::KwElse | TokenKind::KwElseif | TokenKind::KwUntil
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Concat,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinOp {
    pub fn to_str(&self) -> &str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
            BinOp::Concat => "..",
            BinOp::Eq => "==",
            BinOp::NotEq => "~=",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "~",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
    Len,
    BitNot,
}

impl UnOp {
    pub fn to_str(&self) -> &str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "not",
            UnOp::Len => "#",
            UnOp::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub location: SourceLoc,
    pub literal: &'a str,
}

/// Byte offsets of every line start, so positions are computed with a binary
/// search instead of rescanning the source for each token.
struct LineIndex<'a> {
    src: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(src: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex { src, line_starts }
    }

    fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = self.src[self.line_starts[line]..offset].chars().count();
        Position {
            line: line + 1,
            column,
        }
    }

    fn location(&self, span: std::ops::Range<usize>) -> SourceLoc {
        SourceLoc {
            start: span.start,
            end: span.end,
            start_pos: self.position(span.start),
            end_pos: self.position(span.end),
        }
    }
}

/// Tokenize the whole source string, comments included
pub fn lex_tokens(src: &str) -> Result<Vec<Token<'_>>, SyntaxError> {
    let index = LineIndex::new(src);
    let mut tokens = Vec::new();

    for (kind, span) in TokenKind::lexer(src).spanned() {
        let location = index.location(span.clone());
        match kind {
            Ok(kind) => tokens.push(Token {
                kind,
                location,
                literal: &src[span],
            }),
            Err(()) => {
                return Err(SyntaxError::UnrecognizedToken {
                    text: src[span].to_string(),
                    location,
                })
            }
        }
    }

    Ok(tokens)
}

/// Location pointing just past the last byte of the source
pub fn eof_location(src: &str) -> SourceLoc {
    let index = LineIndex::new(src);
    index.location(src.len()..src.len())
}

#[cfg(test)]
mod lexer_tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex_tokens(src)
            .expect("Failed to lex")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn operators_prefer_longest_match() {
        assert_eq!(
            kinds("a ~= b .. c ... //"),
            vec![
                TokenKind::Name,
                TokenKind::TildeEq,
                TokenKind::Name,
                TokenKind::DoubleDot,
                TokenKind::Name,
                TokenKind::Ellipsis,
                TokenKind::DoubleSlash,
            ]
        );
    }

    #[test]
    fn keywords_are_not_names() {
        assert_eq!(
            kinds("local function elseif ends"),
            vec![
                TokenKind::KwLocal,
                TokenKind::KwFunction,
                TokenKind::KwElseif,
                TokenKind::Name,
            ]
        );
    }

    #[test]
    fn line_and_long_comments() {
        let tokens = lex_tokens("-- one\nx = 1 --[[ two\nlines ]] y = 2").unwrap();
        let comments: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Comment)
            .map(|t| t.literal)
            .collect();

        assert_eq!(comments, vec!["-- one", "--[[ two\nlines ]]"]);
    }

    #[test]
    fn long_strings_with_levels() {
        let tokens = lex_tokens("s = [==[a]]b]==]").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::LongString);
        assert_eq!(tokens[2].literal, "[==[a]]b]==]");
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("1 1.5 .5 3e10 0xFF"),
            vec![
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::HexNumber,
            ]
        );
    }

    #[test]
    fn locations_track_lines_and_columns() {
        let tokens = lex_tokens("a\n  bb").unwrap();
        let bb = &tokens[1];

        assert_eq!(bb.location.start, 4);
        assert_eq!(bb.location.end, 6);
        assert_eq!(bb.location.start_pos, Position { line: 2, column: 2 });
        assert_eq!(bb.location.end_pos, Position { line: 2, column: 4 });
    }

    #[test]
    fn unrecognized_input_is_an_error() {
        assert!(matches!(
            lex_tokens("a = $"),
            Err(SyntaxError::UnrecognizedToken { .. })
        ));
    }
}
