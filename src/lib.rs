//! PHP Definition Compiler
//!
//! Compiles match-based PHP definition files into immutable PHP data
//! classes, one class per declared type.
//!
//! ## Definition files
//!
//! ```text
//! <?php
//! namespace App\Models;
//!
//! use App\Media\Tag;
//!
//! T:match (User::class) {
//!     $name    => string::class,
//!     $tags    => [Tag::class],
//!     $picture => match (Picture::class) {
//!         $contents => string::class,
//!     },
//! };
//! ```
//!
//! Every labelled `match` declares one class. Nested matches declare their
//! own class in the same namespace and are written to their own file.
//!
//! ## Pipeline
//!
//! ```text
//! *.d.php ─► parser ─► scanner ─► walker ─► Definition ─► codegen ─► *.php
//!                         └── imports (per file)
//! ```
//!
//! Output files land at `<output>/<namespace as path>/<Type>.php`.

pub mod codegen;
pub mod compile;
pub mod config;
pub mod error;
pub mod imports;
pub mod loader;
pub mod parser;
pub mod scanner;
pub mod schema;
pub mod walker;

pub use codegen::{ClassEmitter, EmitOptions, Emission, GeneratedFile, NamespacePrefix};
pub use compile::{compile, CompileOptions, CompileReport};
pub use config::DefgenConfig;
pub use error::{Result, SchemaError};
pub use imports::ImportRegistry;
pub use loader::{parse_definitions, Loader};
pub use scanner::{scan_file, FileScanner};
pub use schema::{Definition, PropertyRef, PropertyTarget};
pub use walker::{walk, WalkContext};
