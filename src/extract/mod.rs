//! Capture date extraction
//!
//! A file's date is taken from a `YYYY-MM-DD` stamp in its name when one is
//! present. Otherwise the embedded EXIF metadata is read.

pub mod exif;
pub mod filename;

pub use self::exif::{ExifReader, MetadataReader, extract_exif_date, parse_exif_date};
pub use self::filename::parse_filename_date;

use crate::datestamp::Datestamp;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Where a resolved date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Parsed from the file name
    Filename,
    /// Read from embedded image metadata
    Metadata,
}

/// Result of date resolution
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDate {
    pub date: Datestamp,
    pub source: TimeSource,
}

/// Resolve the capture date of `path`, trying the file name first.
///
/// Only the final path component is inspected for a date stamp. Parent
/// directories are never matched, so a file sitting in a dated folder is
/// still dated by its own name or metadata rather than by the folder. Names
/// that are not valid UTF-8 are matched lossily; the stamp itself is ASCII.
/// A metadata failure is reported as [`Error::DateResolution`] with the
/// underlying cause attached.
pub fn resolve_date(path: &Path, reader: &dyn MetadataReader) -> Result<ResolvedDate> {
    if let Some(name) = path.file_name()
        && let Some(date) = parse_filename_date(&name.to_string_lossy())
    {
        debug!(?path, %date, "Extracted date from filename");
        return Ok(ResolvedDate {
            date,
            source: TimeSource::Filename,
        });
    }

    debug!(?path, "No date in filename, reading metadata");
    let date = extract_exif_date(reader, path).map_err(|source| Error::DateResolution {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(?path, %date, "Extracted date from metadata");

    Ok(ResolvedDate {
        date,
        source: TimeSource::Metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingReader {
        calls: AtomicUsize,
    }

    impl MetadataReader for CountingReader {
        fn read_create_date(&self, _path: &Path) -> std::result::Result<String, MetadataError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok("2011:11:11 11:11:11".to_string())
        }
    }

    struct FailingReader;

    impl MetadataReader for FailingReader {
        fn read_create_date(&self, path: &Path) -> std::result::Result<String, MetadataError> {
            Err(MetadataError::MissingDate {
                path: path.to_path_buf(),
            })
        }
    }

    #[test]
    fn test_filename_wins_without_reading_metadata() {
        let reader = CountingReader::default();
        let resolved = resolve_date(Path::new("/in/2015-03-11 09.05.32.jpg"), &reader).unwrap();

        assert_eq!(resolved.date.to_string(), "2015-03-11");
        assert_eq!(resolved.source, TimeSource::Filename);
        assert_eq!(reader.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_falls_back_to_metadata() {
        let reader = CountingReader::default();
        let resolved = resolve_date(Path::new("/in/IMG_8718-canon.JPG"), &reader).unwrap();

        assert_eq!(resolved.date.to_string(), "2011-11-11");
        assert_eq!(resolved.source, TimeSource::Metadata);
        assert_eq!(reader.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_parent_directory_date_is_ignored() {
        let reader = CountingReader::default();
        let resolved = resolve_date(Path::new("/lib/2016-02-20/IMG_1.jpg"), &reader).unwrap();
        assert_eq!(resolved.source, TimeSource::Metadata);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_filename_still_dated_by_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/in").join(OsStr::from_bytes(b"2016-02-20 caf\xe9.jpg"));
        let resolved = resolve_date(&path, &FailingReader).unwrap();

        assert_eq!(resolved.date.to_string(), "2016-02-20");
        assert_eq!(resolved.source, TimeSource::Filename);
    }

    #[test]
    fn test_metadata_failure_is_wrapped() {
        let err = resolve_date(Path::new("/in/P1040165.JPG"), &FailingReader).unwrap_err();
        match err {
            Error::DateResolution { path, source } => {
                assert_eq!(path, Path::new("/in/P1040165.JPG"));
                assert!(matches!(source, MetadataError::MissingDate { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
