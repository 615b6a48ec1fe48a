//! Recursive-descent parser for Lua source.
//!
//! Statements live in `stmt.rs`, expressions in `expr.rs`, and the small
//! token helpers in `tidbits.rs`. Comments never reach the statement parsers:
//! they are split off the token stream up front and stored on the `Chunk`.

use tracing::debug;

use crate::syntax::ast::{Chunk, Comment};
use crate::syntax::errors::SyntaxError;
use crate::syntax::lexer::{eof_location, lex_tokens, SourceLoc, Token, TokenKind};

mod expr;
mod stmt;
mod tidbits;


/// Result type for parsing
pub(crate) type Return<T> = Result<T, SyntaxError>;

pub struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    comments: Vec<Comment>,
    pos: usize,
    eof: SourceLoc,
}

impl<'src> Parser<'src> {
    pub fn new(src: &'src str) -> Return<Self> {
        let (comment_tokens, tokens): (Vec<_>, Vec<_>) = lex_tokens(src)?
            .into_iter()
            .partition(|t| t.kind == TokenKind::Comment);

        let comments = comment_tokens
            .iter()
            .map(|t| Comment {
                value: tidbits::comment_value(t.literal).to_string(),
                raw: t.literal.to_string(),
                location: t.location,
            })
            .collect();

        Ok(Parser {
            tokens,
            comments,
            pos: 0,
            eof: eof_location(src),
        })
    }

    /// Peek at the next token
    pub fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Peek `n` tokens past the next one
    pub fn peek_nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    /// Advance the parser by one token
    pub fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the next token is of the expected kind without advancing
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Consume the next token only if it is of the given kind
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.check(kind) {
            self.advance()
        } else {
            None
        }
    }

    /// Consume the next token and return it if it matches the expected kind
    pub fn expect(&mut self, kind: TokenKind) -> Return<Token<'src>> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(vec![kind])),
        }
    }

    /// Build an error for whatever token is next
    pub(crate) fn unexpected(&self, expected_any: Vec<TokenKind>) -> SyntaxError {
        match self.peek() {
            Some(token) => SyntaxError::UnexpectedToken {
                token: token.kind,
                expected_any,
                location: token.location,
            },
            None => SyntaxError::UnexpectedEof,
        }
    }

    /// Location of the next token, or end of file
    pub(crate) fn next_location(&self) -> SourceLoc {
        self.peek().map(|t| t.location).unwrap_or(self.eof)
    }

    /// Location of the most recently consumed token
    pub(crate) fn prev_location(&self) -> SourceLoc {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.location,
            None => self.eof,
        }
    }

    /// Location spanning from `start` through the most recently consumed token
    pub(crate) fn finish(&self, start: &SourceLoc) -> SourceLoc {
        start.to(&self.prev_location())
    }

    pub fn parse(src: &'src str) -> Return<Chunk> {
        let mut parser = Parser::new(src)?;
        let body = parser.parse_block(0)?;

        // A block only stops early at a block terminator, which is stray at the top level
        if parser.peek().is_some() {
            return Err(parser.unexpected(vec![]));
        }

        debug!(
            statements = body.stmts.len(),
            comments = parser.comments.len(),
            "parsed chunk"
        );

        Ok(Chunk {
            body,
            comments: parser.comments,
        })
    }
}
