//! Code Generation
//!
//! Turns [`Definition`] trees into PHP class files.
//!
//! Architecture:
//! - NamespacePrefix: normalized prefix applied to every emitted namespace
//! - ClassEmitter: walks one Definition tree, promoting every nested
//!   Definition to its own file
//! - php: renders the source text of a single class
//!
//! Output paths mirror the Definition's own namespace; the prefix only
//! changes the `namespace` declaration and type references.

pub mod php;

use std::path::PathBuf;

use tracing::debug;

use crate::schema::{Definition, PropertyTarget, NAMESPACE_SEPARATOR};

// =============================================================================
// Namespace prefix
// =============================================================================

/// Prefix prepended to every emitted namespace.
///
/// Normalized on construction: surrounding whitespace is trimmed, a lone
/// separator collapses to empty, and a non-empty prefix always ends in a
/// separator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespacePrefix(String);

impl NamespacePrefix {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "\\" {
            return Self(String::new());
        }
        if trimmed.ends_with(NAMESPACE_SEPARATOR) {
            Self(trimmed.to_string())
        } else {
            Self(format!("{}{}", trimmed, NAMESPACE_SEPARATOR))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prefixed namespace with leading and trailing separators stripped
    pub fn qualify(&self, namespace: &str) -> String {
        format!("{}{}", self.0, namespace)
            .trim()
            .trim_matches(NAMESPACE_SEPARATOR)
            .to_string()
    }

    /// Fully-qualified class reference (`\App\Models\User`, or `\User`)
    pub fn class_reference(&self, definition: &Definition) -> String {
        let namespace = self.qualify(&definition.namespace);
        if namespace.is_empty() {
            format!("{}{}", NAMESPACE_SEPARATOR, definition.type_name)
        } else {
            format!(
                "{sep}{}{sep}{}",
                namespace,
                definition.type_name,
                sep = NAMESPACE_SEPARATOR
            )
        }
    }
}

// =============================================================================
// Generated files
// =============================================================================

/// One emitted source file
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    /// Slash-separated directory under the output root, empty for the root
    pub directory_path: String,
    /// File name including the extension
    pub file_name: String,
    pub source_text: String,
}

impl GeneratedFile {
    /// Path relative to the output root
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.directory_path.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(&self.file_name);
        path
    }
}

/// Files produced by one top-level Definition
#[derive(Debug, Clone)]
pub struct Emission {
    pub primary: GeneratedFile,
    /// Every nested Definition, depth-first with inner classes before outer
    pub nested: Vec<GeneratedFile>,
}

impl Emission {
    pub fn file_count(&self) -> usize {
        1 + self.nested.len()
    }

    /// Primary file first, then the nested ones
    pub fn into_files(self) -> Vec<GeneratedFile> {
        let mut files = Vec::with_capacity(self.file_count());
        files.push(self.primary);
        files.extend(self.nested);
        files
    }
}

// =============================================================================
// Class emitter
// =============================================================================

/// Rendering options
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Generated file extension, without the dot
    pub extension: String,
    /// Declare promoted properties `readonly`
    pub readonly: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            extension: "php".to_string(),
            readonly: true,
        }
    }
}

pub struct ClassEmitter {
    prefix: NamespacePrefix,
    options: EmitOptions,
}

impl ClassEmitter {
    pub fn new(prefix: NamespacePrefix, options: EmitOptions) -> Self {
        Self { prefix, options }
    }

    /// Emit `definition` at `path` (slash-separated, without extension) and
    /// every nested Definition at the path of its own namespace and name.
    pub fn emit(&self, path: &str, definition: &Definition) -> Emission {
        let mut nested = Vec::new();
        let primary = self.emit_into(path, definition, &mut nested);
        Emission { primary, nested }
    }

    /// Emit `definition` at the path derived from its namespace and name
    pub fn emit_definition(&self, definition: &Definition) -> Emission {
        self.emit(&definition.relative_path(), definition)
    }

    fn emit_into(&self, path: &str, definition: &Definition, nested: &mut Vec<GeneratedFile>) -> GeneratedFile {
        let mut parameters = Vec::with_capacity(definition.properties.len());

        for (name, property) in &definition.properties {
            let type_name = match &property.target {
                PropertyTarget::TypeName(type_name) => type_name.clone(),
                PropertyTarget::Nested(child) => {
                    let file = self.emit_into(&child.relative_path(), child, nested);
                    nested.push(file);
                    self.prefix.class_reference(child)
                }
            };
            parameters.push(php::Parameter {
                name: name.clone(),
                type_name,
                is_array: property.is_array,
            });
        }

        let namespace = self.prefix.qualify(&definition.namespace);
        let class = php::ClassSource {
            namespace: &namespace,
            class_name: &definition.type_name,
            parameters: &parameters,
            readonly: self.options.readonly,
        };

        let (directory_path, file_stem) = match path.rsplit_once('/') {
            Some((directory, stem)) => (directory.to_string(), stem),
            None => (String::new(), path),
        };
        let file = GeneratedFile {
            directory_path,
            file_name: format!("{}.{}", file_stem, self.options.extension),
            source_text: class.render(),
        };
        debug!(path = %file.relative_path().display(), "generated class");
        file
    }
}
