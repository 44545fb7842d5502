//! Batch import driver
//!
//! Handles:
//! - Scanning the import directory
//! - Importing every file into the library in parallel
//! - Tallying results

use crate::config::Config;
use crate::error::Result;
use crate::extract::TimeSource;
use crate::fsops::is_hidden;
use crate::library::{ImportOutcome, PhotoLibrary, PlacementDecision};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Level, debug, error, info, span};
use walkdir::WalkDir;

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source file path
    pub source: PathBuf,
    /// Destination file path (if successful)
    pub destination: Option<PathBuf>,
    /// Resolved date, as `YYYY-MM-DD`
    pub date: Option<String>,
    /// Where the date came from
    pub time_source: Option<TimeSource>,
    /// Processing status
    pub status: ProcessingStatus,
    /// Error message (if failed)
    pub error: Option<String>,
}

/// Status of file processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    /// File was moved or copied into the library
    Imported,
    /// File already sat in the right folder
    AlreadyInPlace,
    /// Processing failed
    Failed,
    /// Dry run - would have imported
    DryRun,
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub total_files: AtomicUsize,
    pub imported: AtomicUsize,
    pub in_place: AtomicUsize,
    pub created_dirs: AtomicUsize,
    pub failed: AtomicUsize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Imported: {}, Already in place: {}, New folders: {}, Failed: {}",
            self.total_files.load(Ordering::Relaxed),
            self.imported.load(Ordering::Relaxed),
            self.in_place.load(Ordering::Relaxed),
            self.created_dirs.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed)
        )
    }
}

/// Imports the contents of a directory into a photo library
pub struct Importer {
    config: Config,
    library: PhotoLibrary,
    stats: ProcessingStats,
}

impl Importer {
    /// Open the library named by `config`
    pub fn new(config: Config) -> Result<Self> {
        // Configure Rayon thread pool
        if config.threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .build_global()
                .ok(); // Ignore if already initialized
        }

        let library = PhotoLibrary::open(&config.library_dir)?.with_operation(config.operation);
        Ok(Self::with_library(config, library))
    }

    /// Use an already opened library
    pub fn with_library(config: Config, library: PhotoLibrary) -> Self {
        Self {
            config,
            library,
            stats: ProcessingStats::new(),
        }
    }

    pub fn library(&self) -> &PhotoLibrary {
        &self.library
    }

    /// Run the import pipeline
    pub fn run(&self) -> Result<Vec<FileResult>> {
        let _span = span!(Level::INFO, "import_run").entered();

        info!(import_dir = %self.config.import_dir.display(), "Scanning import directory...");
        let files = collect_files(&self.config.import_dir)?;
        info!(count = files.len(), "Found files");

        if files.is_empty() {
            info!("No files to import");
            return Ok(Vec::new());
        }

        self.stats.total_files.store(files.len(), Ordering::Relaxed);

        let results: Vec<FileResult> = if self.config.dry_run {
            files.par_iter().map(|file| self.dry_run_file(file)).collect()
        } else {
            files
                .par_iter()
                .map(|file| self.import_file(file))
                .collect()
        };

        info!(
            count = self.stats.imported.load(Ordering::Relaxed),
            "Imported files"
        );
        info!("{}", self.stats.summary());

        Ok(results)
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    fn import_file(&self, file: &Path) -> FileResult {
        match self.library.import(file) {
            Ok(outcome) => {
                let status = match outcome.decision {
                    PlacementDecision::AlreadyInPlace => {
                        self.stats.in_place.fetch_add(1, Ordering::Relaxed);
                        ProcessingStatus::AlreadyInPlace
                    }
                    PlacementDecision::CreateThenMove(_) => {
                        self.stats.created_dirs.fetch_add(1, Ordering::Relaxed);
                        self.stats.imported.fetch_add(1, Ordering::Relaxed);
                        ProcessingStatus::Imported
                    }
                    PlacementDecision::MoveToExisting(_) => {
                        self.stats.imported.fetch_add(1, Ordering::Relaxed);
                        ProcessingStatus::Imported
                    }
                };
                if status == ProcessingStatus::Imported {
                    info!(
                        source = ?outcome.source,
                        destination = ?outcome.destination,
                        time_source = ?outcome.time_source,
                        date = %outcome.date,
                        "Imported file"
                    );
                }
                success(outcome, status)
            }
            Err(e) => {
                error!(path = ?file, error = %e, "Failed to import file");
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                failure(file, e)
            }
        }
    }

    fn dry_run_file(&self, file: &Path) -> FileResult {
        let planned = self.library.plan(file).and_then(|plan| {
            let destination = plan.destination.resolve(file)?;
            Ok((plan, destination))
        });

        match planned {
            Ok((plan, destination)) => {
                let date = plan.date();
                let status = if plan.decision == PlacementDecision::AlreadyInPlace {
                    self.stats.in_place.fetch_add(1, Ordering::Relaxed);
                    ProcessingStatus::AlreadyInPlace
                } else {
                    ProcessingStatus::DryRun
                };
                info!(
                    source = ?file,
                    destination = ?destination,
                    decision = ?plan.decision,
                    %date,
                    "Would import file"
                );
                FileResult {
                    source: file.to_path_buf(),
                    destination: Some(destination),
                    date: Some(date.to_string()),
                    time_source: Some(plan.resolved.source),
                    status,
                    error: None,
                }
            }
            Err(e) => {
                error!(path = ?file, error = %e, "Failed to plan import");
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                failure(file, e)
            }
        }
    }
}

/// Collect every regular, non-hidden file under `dir`, sorted by path
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(count = files.len(), ?dir, "Collected files");

    Ok(files)
}

fn success(outcome: ImportOutcome, status: ProcessingStatus) -> FileResult {
    FileResult {
        source: outcome.source,
        destination: Some(outcome.destination),
        date: Some(outcome.date.to_string()),
        time_source: Some(outcome.time_source),
        status,
        error: None,
    }
}

fn failure(file: &Path, e: crate::error::Error) -> FileResult {
    FileResult {
        source: file.to_path_buf(),
        destination: None,
        date: None,
        time_source: None,
        status: ProcessingStatus::Failed,
        error: Some(e.to_string()),
    }
}
