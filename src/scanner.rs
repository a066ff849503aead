//! Definition Scanner
//!
//! Pairs labels with the match expression that follows them. A pair is only
//! formed by a label immediately followed by an expression statement; `use`
//! statements and unrelated code in between break the pair.

use tracing::trace;

use crate::error::{Result, SchemaError};
use crate::imports::ImportRegistry;
use crate::parser::{Stmt, StmtKind};
use crate::schema::Definition;
use crate::walker::{walk, WalkContext};

/// Scans the statements of one file, with the file's own import table
pub struct FileScanner {
    file: String,
    imports: ImportRegistry,
}

impl FileScanner {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            imports: ImportRegistry::new(),
        }
    }

    pub fn imports(&self) -> &ImportRegistry {
        &self.imports
    }

    /// Collect the definitions of `statements`, declared in `namespace`.
    ///
    /// Namespace blocks are scanned recursively and their definitions are
    /// appended in source order.
    pub fn scan(&mut self, statements: &[Stmt], namespace: &str) -> Result<Vec<Definition>> {
        let mut definitions = Vec::new();
        let mut label = false;

        for statement in statements {
            match &statement.kind {
                StmtKind::Namespace { name, body } => {
                    definitions.extend(self.scan(body, name)?);
                }
                StmtKind::Label { name } => {
                    if label {
                        return Err(SchemaError::structure(
                            &self.file,
                            statement.line,
                            "Cannot declare two labels in a row, each label must be followed by a match expression",
                        ));
                    }
                    trace!(label = %name, line = statement.line, "found label");
                    label = true;
                }
                StmtKind::Expression { expr } => {
                    if !label {
                        return Err(SchemaError::structure(
                            &self.file,
                            statement.line,
                            "The match expression must be preceded by a label, typically named \"T\"",
                        ));
                    }
                    let mut ctx = WalkContext {
                        file: &self.file,
                        namespace,
                        imports: &mut self.imports,
                    };
                    definitions.push(walk(&mut ctx, expr)?);
                    label = false;
                }
                StmtKind::Use { items } => {
                    for item in items {
                        self.imports.import(item);
                    }
                    label = false;
                }
                StmtKind::Other => label = false,
            }
        }

        Ok(definitions)
    }
}

/// Scan a whole parsed file from the root namespace
pub fn scan_file(file: &str, statements: &[Stmt]) -> Result<Vec<Definition>> {
    FileScanner::new(file).scan(statements, "")
}
