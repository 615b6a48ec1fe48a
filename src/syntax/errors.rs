use crate::syntax::lexer::{SourceLoc, TokenKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("{location} Unrecognized input '{text}'")]
    UnrecognizedToken { text: String, location: SourceLoc },

    #[error("{location} Unexpected token {token:?}, expected one of {expected_any:?}")]
    UnexpectedToken {
        token: TokenKind,
        expected_any: Vec<TokenKind>,
        location: SourceLoc,
    },

    #[error("Unexpected end of file")]
    UnexpectedEof,

    #[error("{location} Expected an expression, found {found:?}")]
    ExpectedExpr { found: TokenKind, location: SourceLoc },

    #[error("{location} Expected a statement, found {found:?}")]
    ExpectedStmt { found: TokenKind, location: SourceLoc },

    #[error("{location} Syntax error: only a function call can be used as a statement")]
    ExpectedCall { location: SourceLoc },

    #[error("{location} Cannot assign to this expression")]
    InvalidAssignmentTarget { location: SourceLoc },

    #[error("{location} 'return' must be the last statement of its block")]
    ReturnNotLast { location: SourceLoc },

    #[error("{location} Malformed number '{text}'")]
    MalformedNumber { text: String, location: SourceLoc },

    #[error("{location} Invalid escape sequence in string literal")]
    InvalidEscape { location: SourceLoc },
}
