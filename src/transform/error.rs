use crate::syntax::lexer::SourceLoc;
use thiserror::Error;

/// A construct the transformer has no mapping for. Any of these aborts the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("{location} Unknown statement type: {kind}")]
    UnknownStatement {
        kind: &'static str,
        location: SourceLoc,
    },

    #[error("{location} Unknown operator '{op}'")]
    UnknownOperator { op: String, location: SourceLoc },

    #[error("{location} Function declarations must be named by an identifier or a member path")]
    UnsupportedDeclarationTarget { location: SourceLoc },

    #[error("{location} Only identifiers, member and index expressions can be assigned to")]
    UnsupportedAssignmentTarget { location: SourceLoc },

    #[error("{location} Cannot use table keys and values together")]
    MixedTableConstructor { location: SourceLoc },

    #[error("{location} Unknown type '{name}'")]
    UnknownType { name: String, location: SourceLoc },

    #[error("{location} Cannot export {reason}")]
    NotExportable {
        reason: &'static str,
        location: SourceLoc,
    },

    #[error("{location} Generic for loops take a single iterator expression, found {count}")]
    MultipleIterators { count: usize, location: SourceLoc },
}
