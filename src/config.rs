//! Options of a transpilation run, read from a YAML file.
//!
//! ```yaml
//! module: true
//! classmod: false
//! semantic_diagnostics: true
//! source_map: false
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::transform::TransformOptions;
use crate::transpile::TranspileError;

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TranspileOptions {
    /// Lift the functions of a `@module` block into exported functions
    pub module: bool,
    /// Turn a `@classmod` block into a class declaration
    pub classmod: bool,
    /// Run the type checker over the output and report its findings
    pub semantic_diagnostics: bool,
    /// Produce a line mapping from the output back to the Lua source
    pub source_map: bool,
}

impl TranspileOptions {
    pub fn from_yaml(src: &str) -> Result<Self, serde_yml::Error> {
        // An empty document means every option keeps its default
        if src.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(src)
    }

    pub fn load(path: &Path) -> Result<Self, TranspileError> {
        let src = std::fs::read_to_string(path).map_err(|source| TranspileError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let options = Self::from_yaml(&src).map_err(|source| TranspileError::Config {
            path: path.display().to_string(),
            source,
        })?;

        debug!(?options, path = %path.display(), "loaded configuration");
        Ok(options)
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            module: self.module,
            classmod: self.classmod,
        }
    }
}
