//! Configuration management for the definition compiler
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (defgen.toml)
//! - Environment variables (DEFGEN__*)
//!
//! ## Example config file (defgen.toml):
//! ```toml
//! [input]
//! suffix = ".d.php"
//!
//! [output]
//! extension = "php"
//! namespace_prefix = "App"
//! clear = false
//! readonly = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::DEFAULT_SUFFIX;

/// Main configuration for the definition compiler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefgenConfig {
    /// Definition file discovery
    #[serde(default)]
    pub input: InputConfig,

    /// Generated class settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File name suffix of definition files
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Extension of generated files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Prefix prepended to every generated namespace
    #[serde(default)]
    pub namespace_prefix: String,

    /// Delete the output directory before writing
    #[serde(default)]
    pub clear: bool,

    /// Declare generated properties readonly
    #[serde(default = "default_true")]
    pub readonly: bool,
}

// Default value functions
fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

fn default_extension() -> String {
    "php".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            namespace_prefix: String::new(),
            clear: false,
            readonly: true,
        }
    }
}

/// `defgen.toml` in the per-user configuration directory
pub fn user_config_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "php-defgen", "defgen")
        .map(|dirs| dirs.config_dir().join("defgen.toml"))
}

impl DefgenConfig {
    /// Load configuration from the default locations, with `config_path`
    /// taking precedence over them
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["defgen.toml", ".defgen.toml", "config/defgen.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(xdg_config) = user_config_file() {
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (DEFGEN__OUTPUT__CLEAR=true)
        builder = builder.add_source(
            Environment::with_prefix("DEFGEN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DefgenConfig::default();
        assert_eq!(config.input.suffix, ".d.php");
        assert_eq!(config.output.extension, "php");
        assert!(config.output.namespace_prefix.is_empty());
        assert!(!config.output.clear);
        assert!(config.output.readonly);
    }

    #[test]
    fn test_serialize_config() {
        let config = DefgenConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_load_explicit_file_with_partial_sections() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[output]\nnamespace_prefix = \"App\"\nreadonly = false\n").unwrap();

        let config = DefgenConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.output.namespace_prefix, "App");
        assert!(!config.output.readonly);
        assert_eq!(config.output.extension, "php");
        assert_eq!(config.input.suffix, ".d.php");
    }

    #[test]
    fn test_user_config_file_location() {
        // No home directory means no per-user location
        if let Some(path) = user_config_file() {
            assert!(path.ends_with("defgen.toml"));
            assert!(path.to_string_lossy().contains("defgen"));
            assert!(!path.to_string_lossy().contains("familiar"));
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("defgen.toml");
        let mut config = DefgenConfig::default();
        config.input.suffix = ".def.php".to_string();
        config.output.clear = true;
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = DefgenConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.input.suffix, ".def.php");
        assert!(loaded.output.clear);
    }
}
