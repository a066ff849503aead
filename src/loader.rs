//! Definition Loading
//!
//! Finds definition files under a root path and turns each one into
//! [`Definition`]s: read → parse → scan.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, SchemaError};
use crate::parser;
use crate::scanner::scan_file;
use crate::schema::Definition;

/// Suffix of definition files
pub const DEFAULT_SUFFIX: &str = ".d.php";

/// Loads definitions from a file or a directory tree
#[derive(Debug, Clone)]
pub struct Loader {
    suffix: String,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX)
    }
}

impl Loader {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    /// Load every definition reachable from `path`.
    ///
    /// A directory is walked recursively in file-name order and only files
    /// ending in the suffix are read. A single file is read whatever its
    /// name. Anything else yields no definitions.
    pub fn load(&self, path: &Path) -> Result<Vec<Definition>> {
        let mut definitions = Vec::new();

        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                if !entry.file_type().is_file() || !self.matches(entry.path()) {
                    continue;
                }
                definitions.extend(self.load_file(entry.path())?);
            }
        } else if path.is_file() {
            definitions.extend(self.load_file(path)?);
        } else {
            debug!(path = %path.display(), "nothing to load");
        }

        Ok(definitions)
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().ends_with(&self.suffix))
            .unwrap_or(false)
    }

    fn load_file(&self, path: &Path) -> Result<Vec<Definition>> {
        let source = fs::read_to_string(path)?;
        let definitions = parse_definitions(&path.display().to_string(), &source)?;
        debug!(
            file = %path.display(),
            definitions = definitions.len(),
            "scanned definition file"
        );
        Ok(definitions)
    }
}

/// Parse and scan the source text of one definition file
pub fn parse_definitions(file: &str, source: &str) -> Result<Vec<Definition>> {
    let statements = parser::parse(source).map_err(|e| SchemaError::Parse {
        file: file.to_string(),
        line: e.line,
        message: e.message,
    })?;
    scan_file(file, &statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const USER: &str = "<?php\nT:match (User::class) { $name => string::class };\n";
    const TAG: &str = "<?php\nT:match (Tag::class) { $label => string::class };\n";

    fn type_names(definitions: &[Definition]) -> Vec<&str> {
        definitions.iter().map(|d| d.type_name.as_str()).collect()
    }

    #[test]
    fn test_load_directory_filters_by_suffix() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.d.php"), USER).unwrap();
        fs::write(dir.path().join("nested/a.d.php"), TAG).unwrap();
        fs::write(dir.path().join("ignored.php"), "<?php T:match (Nope::class) {};").unwrap();
        fs::write(dir.path().join("notes.txt"), "not php").unwrap();

        let definitions = Loader::default().load(dir.path()).unwrap();
        assert_eq!(type_names(&definitions), vec!["User", "Tag"]);
    }

    #[test]
    fn test_load_single_file_ignores_suffix() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("user.php");
        fs::write(&file, USER).unwrap();
        let definitions = Loader::default().load(&file).unwrap();
        assert_eq!(type_names(&definitions), vec!["User"]);
    }

    #[test]
    fn test_missing_path_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let definitions = Loader::default().load(&dir.path().join("missing")).unwrap();
        assert!(definitions.is_empty());
    }

    #[test]
    fn test_custom_suffix() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("user.def"), USER).unwrap();
        fs::write(dir.path().join("tag.d.php"), TAG).unwrap();
        let definitions = Loader::new(".def").load(dir.path()).unwrap();
        assert_eq!(type_names(&definitions), vec!["User"]);
    }

    #[test]
    fn test_tags_and_keywords_in_any_case() {
        for source in [
            "<?PHP\nT:match (User::class) { $id => int::class };",
            "<?php\nT:MATCH (User::class) { $id => int::class };",
            "<?Php\nNAMESPACE App;\nT:Match (User::class) { $id => int::class };",
        ] {
            let definitions = parse_definitions("a.d.php", source).unwrap();
            assert_eq!(type_names(&definitions), vec!["User"], "{}", source);
        }
    }

    #[test]
    fn test_arrow_function_statement_reaches_the_scanner() {
        let err = parse_definitions("a.d.php", "<?php\n$f = fn($x) => $x;\nT:match (User::class) {};").unwrap_err();
        // The statement parses; an unlabelled expression is then rejected by the scanner
        assert!(matches!(err, SchemaError::Structure { line: 2, .. }));
    }

    #[test]
    fn test_parse_errors_carry_the_file_name() {
        let err = parse_definitions("broken.d.php", "<?php\n}\n").unwrap_err();
        match err {
            SchemaError::Parse { file, line, .. } => {
                assert_eq!(file, "broken.d.php");
                assert_eq!(line, 2);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
