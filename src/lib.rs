//! pic-import - organizes photos into a library of dated folders
//!
//! This library provides:
//! - Date stamps parsed from file names or EXIF metadata
//! - An index of the existing `YYYY-MM-DD...` folders of a library root
//! - Import planning that reuses annotated folders and leaves files that
//!   are already in place untouched
//! - Parallel batch import with Rayon

pub mod cli;
pub mod config;
pub mod datestamp;
pub mod error;
pub mod extract;
pub mod fsops;
pub mod library;
pub mod process;

pub use cli::Cli;
pub use config::{Config, ConfigError, FileOperation};
pub use datestamp::Datestamp;
pub use error::{Error, MetadataError, Result};
pub use extract::{ExifReader, MetadataReader, TimeSource};
pub use fsops::Destination;
pub use library::{ImportOutcome, LibraryIndex, PhotoLibrary, PlacementDecision};
pub use process::{FileResult, Importer, ProcessingStatus};
