//! Placement decisions for imported files

use crate::datestamp::Datestamp;
use crate::error::{Error, Result};
use crate::extract::{MetadataReader, ResolvedDate, resolve_date};
use crate::fsops::Destination;
use crate::library::index::LibraryIndex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What importing a file amounts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementDecision {
    /// The file already sits in the directory for its date
    AlreadyInPlace,
    /// Move into a directory that is already in the index
    MoveToExisting(PathBuf),
    /// Create this directory, then move into it
    CreateThenMove(PathBuf),
}

/// A planned import: the resolved date and what to do with the file
#[derive(Debug, Clone)]
pub struct Plan {
    pub resolved: ResolvedDate,
    pub decision: PlacementDecision,
    /// Where the file ends up. An exact path when the date is indexed,
    /// otherwise the directory still to be created.
    pub destination: Destination,
}

impl Plan {
    pub fn date(&self) -> Datestamp {
        self.resolved.date
    }
}

/// Decide where `file` belongs without touching the file system beyond
/// reading it.
pub fn plan(
    root: &Path,
    index: &LibraryIndex,
    reader: &dyn MetadataReader,
    file: &Path,
) -> Result<Plan> {
    if !file.is_file() {
        return Err(Error::FileNotFound {
            path: file.to_path_buf(),
        });
    }

    let resolved = resolve_date(file, reader)?;
    let date = resolved.date;

    let (decision, destination) = match index.lookup(&date) {
        Some(dir) => {
            let target = Destination::Directory(dir.clone()).resolve(file)?;
            let decision = if same_path(file, &target) {
                PlacementDecision::AlreadyInPlace
            } else {
                PlacementDecision::MoveToExisting(dir)
            };
            (decision, Destination::File(target))
        }
        None => {
            let dir = root.join(date.to_string());
            (
                PlacementDecision::CreateThenMove(dir.clone()),
                Destination::Directory(dir),
            )
        }
    };
    debug!(?file, %date, ?decision, "Planned placement");

    Ok(Plan {
        resolved,
        decision,
        destination,
    })
}

/// Whether `file` is already at `dir/<file name>`
pub(crate) fn is_inside(file: &Path, dir: &Path) -> bool {
    let Some(name) = file.file_name() else {
        return false;
    };
    same_path(file, &dir.join(name))
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use tempfile::tempdir;

    struct NoMetadata;

    impl MetadataReader for NoMetadata {
        fn read_create_date(&self, path: &Path) -> std::result::Result<String, MetadataError> {
            Err(MetadataError::MissingDate {
                path: path.to_path_buf(),
            })
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let index = LibraryIndex::new();
        let err = plan(dir.path(), &index, &NoMetadata, &dir.path().join("2015-01-01.jpg"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_unresolvable_date() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("IMG_0001.jpg");
        fs::write(&file, "x").unwrap();

        let err = plan(dir.path(), &LibraryIndex::new(), &NoMetadata, &file).unwrap_err();
        assert!(matches!(err, Error::DateResolution { .. }));
    }

    #[test]
    fn test_create_when_not_indexed() {
        let lib = tempdir().unwrap();
        let src = tempdir().unwrap();
        let file = src.path().join("2015-12-30 beach.jpg");
        fs::write(&file, "x").unwrap();

        let plan = plan(lib.path(), &LibraryIndex::new(), &NoMetadata, &file).unwrap();

        assert_eq!(plan.date().to_string(), "2015-12-30");
        assert_eq!(
            plan.decision,
            PlacementDecision::CreateThenMove(lib.path().join("2015-12-30"))
        );
        assert_eq!(
            plan.destination,
            Destination::Directory(lib.path().join("2015-12-30"))
        );
        assert!(!lib.path().join("2015-12-30").exists());
    }

    #[test]
    fn test_move_to_existing() {
        let lib = tempdir().unwrap();
        let src = tempdir().unwrap();
        let existing = lib.path().join("2015-12-30 - eventB");
        fs::create_dir(&existing).unwrap();
        let file = src.path().join("2015-12-30.jpg");
        fs::write(&file, "x").unwrap();

        let index = LibraryIndex::build(lib.path()).unwrap();
        let plan = plan(lib.path(), &index, &NoMetadata, &file).unwrap();

        assert_eq!(
            plan.destination,
            Destination::File(existing.join("2015-12-30.jpg"))
        );
        assert_eq!(plan.decision, PlacementDecision::MoveToExisting(existing));
    }

    #[test]
    fn test_already_in_place() {
        let lib = tempdir().unwrap();
        let existing = lib.path().join("2015-12-30 - eventB");
        fs::create_dir(&existing).unwrap();
        let file = existing.join("2015-12-30.jpg");
        fs::write(&file, "x").unwrap();

        let index = LibraryIndex::build(lib.path()).unwrap();
        let plan = plan(lib.path(), &index, &NoMetadata, &file).unwrap();

        assert_eq!(plan.decision, PlacementDecision::AlreadyInPlace);
    }

    #[test]
    fn test_already_in_place_through_relative_components() {
        let lib = tempdir().unwrap();
        let existing = lib.path().join("2015-12-30");
        fs::create_dir(&existing).unwrap();
        fs::write(existing.join("2015-12-30.jpg"), "x").unwrap();
        let roundabout = existing.join("..").join("2015-12-30").join("2015-12-30.jpg");

        let index = LibraryIndex::build(lib.path()).unwrap();
        let plan = plan(lib.path(), &index, &NoMetadata, &roundabout).unwrap();

        assert_eq!(plan.decision, PlacementDecision::AlreadyInPlace);
    }
}
