use crate::{backend::ts_ast::TypeNode, syntax::lexer::SourceLoc};
use thiserror::Error;

/// An error found by checking the generated TypeScript against its annotations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("{location} Type '{found}' is not assignable to type '{expected}'.")]
    TypeMismatch {
        expected: TypeNode,
        found: TypeNode,
        location: SourceLoc,
    },
}
