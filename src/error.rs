//! Error types for the definition compiler

use thiserror::Error;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Definition compiler errors
///
/// Every variant is fatal to a compilation run.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{message} ({file}:{line})")]
    Structure {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Cyclic definition of {type_name} in {file}:{line}: {chain}")]
    CyclicDefinition {
        file: String,
        line: usize,
        type_name: String,
        chain: String,
    },

    #[error("Parse error in {file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl SchemaError {
    /// Structural violation of the definition syntax
    pub fn structure(file: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Structure {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Source line the error points at, if it came from a definition file
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Structure { line, .. }
            | Self::CyclicDefinition { line, .. }
            | Self::Parse { line, .. } => Some(*line),
            Self::Io(_) | Self::Walk(_) => None,
        }
    }

    /// Definition file the error came from
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Structure { file, .. }
            | Self::CyclicDefinition { file, .. }
            | Self::Parse { file, .. } => Some(file),
            Self::Io(_) | Self::Walk(_) => None,
        }
    }
}
