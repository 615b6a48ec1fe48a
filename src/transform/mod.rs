//! The Lua to TypeScript transformation pass.
//!
//! `transform_chunk` walks a parsed chunk and builds the TypeScript tree:
//! 1. Block rewriting (module and class detection)
//! 2. Statement and expression transformation
//! 3. Doc tag lookup for parameter, return and variable types
//!
//! Unsupported constructs abort the run with a `TransformError`. Missing or
//! ambiguous parameter types only produce diagnostics.

use serde::Deserialize;
use tracing::debug;

use crate::backend::ts_ast::{Node, NodeId, Provenance, TsStmt};
use crate::syntax::ast::{Block, Chunk, Comment, Stmt};
use crate::syntax::lexer::SourceLoc;
use crate::utils::Spanned;

pub mod comments;
pub mod error;
mod expr;
mod rewrite;
mod stmt;
pub mod tags;
pub mod types;

#[cfg(test)]
mod transform_tests;

use comments::associated_comments;
use error::TransformError;
use tags::{resolve_tags, DocTag};

/// Result type for the transformer
pub(crate) type Return<T> = Result<T, TransformError>;

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TransformOptions {
    /// Lift the functions of a `@module` block into exported functions
    pub module: bool,
    /// Turn a `@classmod` block into a class declaration
    pub classmod: bool,
}

/// The block being transformed and how deeply it is nested
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    /// 1 for the chunk body
    pub depth: usize,
    pub comments: &'a [Comment],
    pub block: &'a Block,
}

impl<'a> Scope<'a> {
    pub fn nested(&self, block: &'a Block) -> Scope<'a> {
        Scope {
            depth: self.depth + 1,
            comments: self.comments,
            block,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.depth == 1
    }

    /// Doc tags of the comments preceding `stmt`, which must be in this block
    pub fn tags_of(&self, stmt: &Spanned<Stmt>) -> Vec<DocTag> {
        resolve_tags(associated_comments(
            self.comments,
            &self.block.stmts,
            self.block.start,
            stmt,
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transformer {
    options: TransformOptions,
    diagnostics: Vec<String>,
    provenance: Provenance,
    next_id: u32,
}

impl Transformer {
    pub fn new(options: TransformOptions) -> Self {
        Transformer {
            options,
            ..Default::default()
        }
    }

    /// Warnings from the last run, in source order
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Source locations of the nodes built by the last run
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn transform_chunk(&mut self, chunk: &Chunk) -> Return<Vec<TsStmt>> {
        self.diagnostics.clear();
        self.provenance.clear();
        self.next_id = 0;

        let scope = Scope {
            depth: 1,
            comments: &chunk.comments,
            block: &chunk.body,
        };
        let stmts = self.transform_block(scope)?;

        debug!(
            statements = stmts.len(),
            diagnostics = self.diagnostics.len(),
            "transformed chunk"
        );

        Ok(stmts)
    }

    /// Build an output node and remember where it came from
    pub(crate) fn node<T>(&mut self, kind: T, location: SourceLoc) -> Node<T> {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.provenance.record(id, location);
        Node { id, kind }
    }

    pub(crate) fn diagnose(&mut self, location: SourceLoc, message: String) {
        self.diagnostics.push(format!("{location} {message}"));
    }
}
