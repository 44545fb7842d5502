//! Configuration types for the photo importer

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How a file gets into the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    /// Move files into the library (works across file systems)
    #[default]
    Move,
    /// Copy files into the library, leaving the originals in place
    Copy,
}

/// Configuration for an import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the photo library (must already exist)
    pub library_dir: PathBuf,

    /// Directory scanned recursively for files to import
    pub import_dir: PathBuf,

    /// File operation mode
    #[serde(default)]
    pub operation: FileOperation,

    /// Number of threads for parallel processing (0 = auto)
    #[serde(default)]
    pub threads: usize,

    /// Dry run mode - plan every import but don't move anything
    #[serde(default)]
    pub dry_run: bool,

    /// Verbose output
    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_dir: PathBuf::new(),
            import_dir: PathBuf::new(),
            operation: FileOperation::default(),
            threads: 0, // Auto-detect
            dry_run: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Check that both directories are set and usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing("library_dir"));
        }
        if self.import_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing("import_dir"));
        }
        if !self.import_dir.is_dir() {
            return Err(ConfigError::NotADirectory(self.import_dir.clone()));
        }
        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# pic-import configuration file
# This file uses TOML format (https://toml.io)

# Root of the photo library. Its immediate subdirectories are named by date,
# e.g. "2016-02-20" or "2016-02-20 - birthday".
library_dir = "D:/Pictures/Library"

# Directory to import from (scanned recursively)
import_dir = "D:/Pictures/Incoming"

# File operation: "move" or "copy"
operation = "move"

# Number of threads for parallel processing (0 = auto-detect)
threads = 0

# Dry run mode - show what would be done without actually doing it
dry_run = false

# Verbose output - show detailed processing information
verbose = false
"#
        .to_string()
    }
}

/// Errors that can occur when loading or validating configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// A required setting was not given on the command line or in the file
    Missing(&'static str),
    /// The import directory does not exist
    NotADirectory(PathBuf),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::Missing(key) => write!(f, "Missing required setting '{}'", key),
            ConfigError::NotADirectory(path) => {
                write!(f, "Import directory does not exist: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::Missing(_) | ConfigError::NotADirectory(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::sample_config()).unwrap();
        assert_eq!(config.operation, FileOperation::Move);
        assert_eq!(config.library_dir, PathBuf::from("D:/Pictures/Library"));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_load_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.toml");
        fs::write(&path, "library_dir = \"lib\"\nimport_dir = \"in\"\noperation = \"copy\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.operation, FileOperation::Copy);
        assert_eq!(config.threads, 0);
        assert!(!config.verbose);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = Config::load_from_file(dir.path().join("none.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::ReadError { .. }));

        let path = dir.path().join("bad.toml");
        fs::write(&path, "library_dir = ").unwrap();
        let bad = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(bad, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_validate() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("library_dir"))));

        config.library_dir = dir.path().to_path_buf();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("import_dir"))));

        config.import_dir = dir.path().join("nowhere");
        assert!(matches!(config.validate(), Err(ConfigError::NotADirectory(_))));

        config.import_dir = dir.path().to_path_buf();
        assert!(config.validate().is_ok());
    }
}
