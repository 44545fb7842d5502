//! CLI argument parsing with clap

use crate::config::{Config, FileOperation};
use clap::Parser;
use std::path::PathBuf;

/// pic-import - sort photos into a library of dated folders
///
/// Every file under the import directory is dated from its name or, failing
/// that, its EXIF data, and moved into the library folder for that date.
/// Existing folders such as "2016-02-20 - birthday" are reused.
#[derive(Parser, Debug)]
#[command(name = "pic-import")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// CLI arguments override settings from the file.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Root directory of the photo library
    #[arg(short, long, env = "PIC_IMPORT_LIBRARY")]
    pub library_dir: Option<PathBuf>,

    /// Directory to import photos from (scanned recursively)
    #[arg(short, long)]
    pub import_dir: Option<PathBuf>,

    /// File operation mode
    #[arg(short = 'O', long, value_enum)]
    pub operation: Option<FileOperation>,

    /// Number of threads for parallel processing (0 = auto)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Dry run mode - show what would be done without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref library_dir) = self.library_dir {
            config.library_dir = library_dir.clone();
        }
        if let Some(ref import_dir) = self.import_dir {
            config.import_dir = import_dir.clone();
        }
        if let Some(operation) = self.operation {
            config.operation = operation;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["pic-import", "-l", "lib", "-i", "in", "-O", "copy", "-n"]).unwrap();
        let config = cli.to_config();

        assert_eq!(config.library_dir, PathBuf::from("lib"));
        assert_eq!(config.import_dir, PathBuf::from("in"));
        assert_eq!(config.operation, FileOperation::Copy);
        assert!(config.dry_run);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file_config = Config {
            library_dir: PathBuf::from("from-file"),
            import_dir: PathBuf::from("incoming"),
            threads: 4,
            ..Config::default()
        };
        let cli = Cli::try_parse_from(["pic-import", "--library-dir", "from-cli"]).unwrap();
        let config = cli.merge_with_config(file_config);

        assert_eq!(config.library_dir, PathBuf::from("from-cli"));
        assert_eq!(config.import_dir, PathBuf::from("incoming"));
        assert_eq!(config.threads, 4);
        assert_eq!(config.operation, FileOperation::Move);
    }
}
