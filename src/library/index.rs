//! Date to directory index of a library root

use crate::datestamp::Datestamp;
use crate::error::Result;
use crate::fsops::list_subdirectories;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};
use tracing::{debug, warn};

/// Pattern: YYYY-MM-DD or YYYY_MM_DD (the month/day boundary may also be `.`)
static PATTERN_DATED_DIR: OnceLock<Regex> = OnceLock::new();

fn dated_dir_pattern() -> &'static Regex {
    PATTERN_DATED_DIR.get_or_init(|| Regex::new(r"(\d{4})[-_](\d{2})[-_.](\d{2})").unwrap())
}

/// Find the date stamp in a directory name.
///
/// The stamp may be surrounded by other text, e.g. `2016-02-20 - event A`.
pub fn parse_dir_date(name: &str) -> Option<Datestamp> {
    let caps = dated_dir_pattern().captures(name)?;
    Datestamp::from_captures(
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str(),
        caps.get(3)?.as_str(),
    )
}

/// Maps each date to the one directory that holds files for it.
///
/// Reads take a shared lock; registrations are serialized, so imports
/// running on several threads see a consistent view.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    dirs: RwLock<HashMap<Datestamp, PathBuf>>,
}

impl LibraryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the immediate subdirectories of `root` for date-named folders.
    ///
    /// Directories are visited in name order. When several carry the same
    /// date the lexicographically smallest name wins and the rest are
    /// ignored.
    pub fn build(root: &Path) -> Result<Self> {
        let mut dirs: HashMap<Datestamp, PathBuf> = HashMap::new();

        for subdir in list_subdirectories(root)? {
            let Some(name) = subdir.file_name() else {
                continue;
            };
            // Annotations may not be UTF-8; the date prefix always is.
            let Some(date) = parse_dir_date(&name.to_string_lossy()) else {
                continue;
            };

            if let Some(existing) = dirs.get(&date) {
                warn!(
                    %date,
                    kept = %existing.display(),
                    ignored = %subdir.display(),
                    "Multiple directories for the same date"
                );
                continue;
            }

            debug!(%date, dir = %subdir.display(), "Indexed dated directory");
            dirs.insert(date, subdir);
        }

        Ok(Self {
            dirs: RwLock::new(dirs),
        })
    }

    /// Directory currently holding files for `date`
    pub fn lookup(&self, date: &Datestamp) -> Option<PathBuf> {
        self.read().get(date).cloned()
    }

    /// Associate `dir` with `date`, replacing any previous entry
    pub fn register(&self, date: Datestamp, dir: PathBuf) {
        debug!(%date, dir = %dir.display(), "Registered dated directory");
        self.write().insert(date, dir);
    }

    /// Return the directory for `date`, calling `create` to make one if none
    /// is registered.
    ///
    /// The check, the creation and the registration happen under one write
    /// lock, so concurrent callers for the same date get the same directory.
    /// The boolean is true when this call created the entry.
    pub fn get_or_register<F>(&self, date: Datestamp, create: F) -> Result<(PathBuf, bool)>
    where
        F: FnOnce() -> Result<PathBuf>,
    {
        let mut dirs = self.write();
        if let Some(dir) = dirs.get(&date) {
            return Ok((dir.clone(), false));
        }

        let dir = create()?;
        debug!(%date, dir = %dir.display(), "Registered dated directory");
        dirs.insert(date, dir.clone());
        Ok((dir, true))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of all entries, ordered by date
    pub fn entries(&self) -> Vec<(Datestamp, PathBuf)> {
        let mut entries: Vec<_> = self
            .read()
            .iter()
            .map(|(date, dir)| (*date, dir.clone()))
            .collect();
        entries.sort();
        entries
    }

    // A panic while holding the lock cannot leave the map half-updated, so
    // poisoning is ignored.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Datestamp, PathBuf>> {
        self.dirs.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Datestamp, PathBuf>> {
        self.dirs.write().unwrap_or_else(|e| e.into_inner())
    }
}
