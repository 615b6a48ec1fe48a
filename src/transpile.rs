//! Driver for a whole run: parse, transform, check and print.
//!
//! ```text
//! source --Parser--> Chunk --Transformer--> [TsStmt] --Printer--> TypeScript
//!                                               |
//!                                               +--sema::check--> diagnostics
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::backend::pretty_print::{LineMapping, Printer};
use crate::backend::ts_ast::TsStmt;
use crate::config::TranspileOptions;
use crate::sema;
use crate::syntax::errors::SyntaxError;
use crate::syntax::parser::Parser;
use crate::transform::error::TransformError;
use crate::transform::Transformer;

/// A failure that stops the transpilation of a file
#[derive(Error, Debug)]
pub enum TranspileError {
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid configuration in '{path}': {source}")]
    Config {
        path: String,
        source: serde_yml::Error,
    },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

#[derive(Debug, Clone)]
pub struct TranspiledFile {
    pub code: String,
    /// Transformer diagnostics, then the type checker's when enabled
    pub diagnostics: Vec<String>,
    pub source_map: Option<Vec<LineMapping>>,
    pub statements: Vec<TsStmt>,
}

pub fn transpile_source(
    src: &str,
    options: &TranspileOptions,
) -> Result<TranspiledFile, TranspileError> {
    let chunk = Parser::parse(src)?;
    let mut transformer = Transformer::new(options.transform_options());
    let statements = transformer.transform_chunk(&chunk)?;

    let mut diagnostics = transformer.diagnostics().to_vec();
    if options.semantic_diagnostics {
        let errors = sema::check(&statements, transformer.provenance());
        diagnostics.extend(errors.iter().map(ToString::to_string));
    }

    let provenance = options.source_map.then_some(transformer.provenance());
    let printed = Printer::print(&statements, provenance);

    Ok(TranspiledFile {
        code: printed.code,
        diagnostics,
        source_map: options.source_map.then_some(printed.mappings),
        statements,
    })
}

pub fn transpile_file(path: &Path, options: &TranspileOptions) -> Result<TranspiledFile, TranspileError> {
    let src = std::fs::read_to_string(path).map_err(|source| TranspileError::Io {
        path: path.display().to_string(),
        source,
    })?;

    debug!(path = %path.display(), "transpiling");
    transpile_source(&src, options)
}

/// Transpile every file in order. Files that do not exist are skipped with
/// a warning, any other failure is reported for its file only.
pub fn transpile_files<P: AsRef<Path>>(
    paths: &[P],
    options: &TranspileOptions,
) -> Vec<(PathBuf, Result<TranspiledFile, TranspileError>)> {
    paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                warn!(path = %path.display(), "file does not exist, skipping");
            }
            exists
        })
        .map(|path| (path.to_path_buf(), transpile_file(path, options)))
        .collect()
}
