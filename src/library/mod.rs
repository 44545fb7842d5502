//! Photo library sessions
//!
//! A [`PhotoLibrary`] is opened on a root directory whose immediate children
//! are date-named folders. Opening scans those folders once; importing a
//! file then either leaves it where it is, moves it into the folder already
//! holding its date, or creates a `YYYY-MM-DD` folder for it.

pub mod index;
pub mod planner;

pub use index::{LibraryIndex, parse_dir_date};
pub use planner::{Plan, PlacementDecision};

use crate::config::FileOperation;
use crate::datestamp::Datestamp;
use crate::error::{Error, Result};
use crate::extract::{ExifReader, MetadataReader, TimeSource};
use crate::fsops::{self, Destination};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, debug, info, span};

/// Result of importing one file
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Where the file was
    pub source: PathBuf,
    /// Where the file is now
    pub destination: PathBuf,
    pub date: Datestamp,
    pub time_source: TimeSource,
    /// What was actually done
    pub decision: PlacementDecision,
}

/// An open photo library
pub struct PhotoLibrary {
    root: PathBuf,
    index: LibraryIndex,
    reader: Arc<dyn MetadataReader>,
    operation: FileOperation,
}

impl std::fmt::Debug for PhotoLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoLibrary")
            .field("root", &self.root)
            .field("index", &self.index)
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

impl PhotoLibrary {
    /// Open the library rooted at `root` and index its dated folders.
    ///
    /// Fails with [`Error::InvalidLibraryRoot`] if `root` is not an
    /// existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::InvalidLibraryRoot { path: root });
        }

        let index = LibraryIndex::build(&root)?;
        info!(root = %root.display(), dated_dirs = index.len(), "Opened photo library");

        Ok(Self {
            root,
            index,
            reader: Arc::new(ExifReader),
            operation: FileOperation::default(),
        })
    }

    /// Use `reader` instead of EXIF for files without a date in their name
    pub fn with_metadata_reader(mut self, reader: Arc<dyn MetadataReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Copy instead of move, or vice versa
    pub fn with_operation(mut self, operation: FileOperation) -> Self {
        self.operation = operation;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &LibraryIndex {
        &self.index
    }

    pub fn operation(&self) -> FileOperation {
        self.operation
    }

    /// Work out what importing `file` would do, without changing anything
    pub fn plan(&self, file: &Path) -> Result<Plan> {
        planner::plan(&self.root, &self.index, self.reader.as_ref(), file)
    }

    /// Import `file` into the library
    pub fn import(&self, file: &Path) -> Result<ImportOutcome> {
        let _span = span!(Level::DEBUG, "import", ?file).entered();

        let plan = self.plan(file)?;
        let date = plan.date();

        let (destination, decision) = match plan.decision {
            PlacementDecision::AlreadyInPlace => {
                debug!(?file, "File is already in place");
                (file.to_path_buf(), PlacementDecision::AlreadyInPlace)
            }
            PlacementDecision::MoveToExisting(dir) => {
                let dest = self.transfer(file, &plan.destination)?;
                (dest, PlacementDecision::MoveToExisting(dir))
            }
            PlacementDecision::CreateThenMove(new_dir) => {
                let (dir, created) = self.index.get_or_register(date, || {
                    fsops::ensure_dir(&new_dir)?;
                    Ok(new_dir.clone())
                })?;

                if created {
                    info!(dir = %dir.display(), "Created dated directory");
                    let dest = self.transfer(file, &Destination::Directory(dir.clone()))?;
                    (dest, PlacementDecision::CreateThenMove(dir))
                } else if planner::is_inside(file, &dir) {
                    // Another import registered the date first
                    (file.to_path_buf(), PlacementDecision::AlreadyInPlace)
                } else {
                    let dest = self.transfer(file, &Destination::Directory(dir.clone()))?;
                    (dest, PlacementDecision::MoveToExisting(dir))
                }
            }
        };

        Ok(ImportOutcome {
            source: file.to_path_buf(),
            destination,
            date,
            time_source: plan.resolved.source,
            decision,
        })
    }

    /// Import every file on the rayon pool.
    ///
    /// Each file succeeds or fails on its own; results come back in input
    /// order.
    pub fn import_all(&self, files: &[PathBuf]) -> Vec<Result<ImportOutcome>> {
        files.par_iter().map(|file| self.import(file)).collect()
    }

    fn transfer(&self, file: &Path, dest: &Destination) -> Result<PathBuf> {
        match self.operation {
            FileOperation::Move => fsops::move_file(file, dest),
            FileOperation::Copy => fsops::copy_file(file, dest),
        }
    }
}
