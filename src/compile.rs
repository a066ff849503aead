//! Compilation driver
//!
//! Clears and prepares the output root, loads every Definition under the
//! input path, emits the class files and writes them.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codegen::{ClassEmitter, EmitOptions, GeneratedFile, NamespacePrefix};
use crate::config::DefgenConfig;
use crate::error::Result;
use crate::loader::{Loader, DEFAULT_SUFFIX};

/// Parameters of one compilation run
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Definition file or directory
    pub input: PathBuf,
    /// Output root
    pub output: PathBuf,
    /// Delete the output root before writing
    pub clear: bool,
    /// Raw namespace prefix, normalized when the run starts
    pub namespace_prefix: String,
    /// Definition file suffix
    pub suffix: String,
    /// Generated file extension, without the dot
    pub extension: String,
    pub readonly: bool,
}

impl CompileOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let defaults = EmitOptions::default();
        Self {
            input: input.into(),
            output: output.into(),
            clear: false,
            namespace_prefix: String::new(),
            suffix: DEFAULT_SUFFIX.to_string(),
            extension: defaults.extension,
            readonly: defaults.readonly,
        }
    }

    /// Options seeded from a loaded configuration
    pub fn from_config(input: impl Into<PathBuf>, output: impl Into<PathBuf>, config: &DefgenConfig) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            clear: config.output.clear,
            namespace_prefix: config.output.namespace_prefix.clone(),
            suffix: config.input.suffix.clone(),
            extension: config.output.extension.clone(),
            readonly: config.output.readonly,
        }
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn with_namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = prefix.into();
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }
}

/// Outcome of a compilation run
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    /// Top-level definitions found
    pub definitions: usize,
    /// Written files, absolute, in write order
    pub files: Vec<PathBuf>,
}

/// Compile every definition under `options.input` into `options.output`.
///
/// Any error aborts the run. Files written before the error stay on disk.
pub fn compile(options: &CompileOptions) -> Result<CompileReport> {
    let prefix = NamespacePrefix::new(&options.namespace_prefix);

    if options.clear && options.output.is_dir() {
        debug!(output = %options.output.display(), "clearing output directory");
        fs::remove_dir_all(&options.output)?;
    }
    fs::create_dir_all(&options.output)?;

    let input = absolute(&options.input)?;
    let output = fs::canonicalize(&options.output)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        prefix = %prefix.as_str(),
        "compiling definitions"
    );

    let definitions = Loader::new(&options.suffix).load(&input)?;

    let emitter = ClassEmitter::new(
        prefix,
        EmitOptions {
            extension: options.extension.clone(),
            readonly: options.readonly,
        },
    );
    let generated: Vec<GeneratedFile> = definitions
        .iter()
        .flat_map(|definition| emitter.emit_definition(definition).into_files())
        .collect();

    let mut report = CompileReport {
        definitions: definitions.len(),
        files: Vec::with_capacity(generated.len()),
    };
    for file in &generated {
        report.files.push(write_file(&output, file)?);
    }

    info!(
        definitions = report.definitions,
        files = report.files.len(),
        "compilation finished"
    );
    Ok(report)
}

fn write_file(root: &Path, file: &GeneratedFile) -> Result<PathBuf> {
    let path = root.join(file.relative_path());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &file.source_text)?;
    debug!(path = %path.display(), "wrote class");
    Ok(path)
}

/// Canonical form of `path`, or `path` itself when it does not exist
fn absolute(path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(path) => Ok(path),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e.into()),
    }
}
