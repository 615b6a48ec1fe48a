//! Semantic checks over the generated TypeScript tree.
//!
//! A single pass runs here, after the transformation:
//! 1. Type checking of annotated variables, assignments and returns
//!
//! Findings are reported, never fatal. Only what can be inferred locally is
//! checked, so an unknown type never produces an error.

use crate::backend::ts_ast::{Provenance, TsStmt};

pub mod sema_error;
pub mod typecheck;

#[cfg(test)]
mod typecheck_tests;

use sema_error::SemanticError;
use typecheck::Typechecker;

/// Check a whole program, with locations taken from `provenance`
pub fn check(statements: &[TsStmt], provenance: &Provenance) -> Vec<SemanticError> {
    let mut checker = Typechecker::new(provenance);
    checker.check_block(statements);
    checker.finish()
}
