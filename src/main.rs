use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser as Clap, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use luats::config::TranspileOptions;
use luats::transpile::{transpile_files, TranspiledFile};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Emit {
    /// TypeScript source
    Ts,
    /// The TypeScript tree as YAML
    Ast,
}

/// Transpile annotated Lua into TypeScript
#[derive(clap::Parser, Debug)]
#[command(version)]
struct Args {
    /// Lua files to transpile
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Export the functions of a `@module` block
    #[arg(long)]
    module: bool,

    /// Turn a `@classmod` block into a class
    #[arg(long)]
    classmod: bool,

    /// Type check the output and report mismatches
    #[arg(long)]
    check: bool,

    /// Write a line mapping next to each output file
    #[arg(long)]
    source_map: bool,

    #[arg(long, value_enum, default_value_t = Emit::Ts)]
    emit: Emit,

    /// Write outputs here instead of printing them
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// YAML file with default options, overridden by the flags above
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> anyhow::Result<TranspileOptions> {
        let mut options = match &self.config {
            Some(path) => TranspileOptions::load(path)?,
            None => TranspileOptions::default(),
        };

        options.module |= self.module;
        options.classmod |= self.classmod;
        options.semantic_diagnostics |= self.check;
        options.source_map |= self.source_map;

        Ok(options)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match drive(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("E: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_diagnostics(file: &Path, diagnostics: &[String]) {
    diagnostics
        .iter()
        .for_each(|d| eprintln!("W: {}: {}", file.display(), d));
}

/// Returns whether every file was transpiled
fn drive(args: &Args) -> anyhow::Result<bool> {
    let options = args.options()?;
    debug!(?options, "starting");

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
    }

    let mut succeeded = true;
    for (path, result) in transpile_files(&args.files, &options) {
        match result {
            Ok(file) => {
                print_diagnostics(&path, &file.diagnostics);
                emit(args, &path, &file)?;
            }
            Err(e) => {
                error!(path = %path.display(), "transpilation failed");
                eprintln!("E: {}: {}", path.display(), e);
                succeeded = false;
            }
        }
    }

    Ok(succeeded)
}

fn emit(args: &Args, path: &Path, file: &TranspiledFile) -> anyhow::Result<()> {
    let (output, extension) = match args.emit {
        Emit::Ts => (file.code.clone(), "ts"),
        Emit::Ast => (
            serde_yml::to_string(&file.statements).context("Cannot serialize the output tree")?,
            "ts.yml",
        ),
    };

    let Some(dir) = &args.out_dir else {
        print!("{output}");
        return Ok(());
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());

    let target = dir.join(format!("{stem}.{extension}"));
    std::fs::write(&target, output)
        .with_context(|| format!("Cannot write '{}'", target.display()))?;
    debug!(target = %target.display(), "wrote output");

    if let Some(mappings) = &file.source_map {
        let target = dir.join(format!("{stem}.ts.map.yml"));
        let yaml = serde_yml::to_string(mappings).context("Cannot serialize the source map")?;
        std::fs::write(&target, yaml)
            .with_context(|| format!("Cannot write '{}'", target.display()))?;
    }

    Ok(())
}
