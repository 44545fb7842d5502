//! EXIF capture date extraction for images

use crate::datestamp::Datestamp;
use crate::error::MetadataError;
use exif::{In, Reader, Tag, Value};
use regex::Regex;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::OnceLock;
use tracing::trace;

/// EXIF tags to try for date extraction, in priority order
const DATE_TAGS: &[Tag] = &[
    Tag::DateTimeOriginal,  // When the original image was taken
    Tag::DateTimeDigitized, // When the image was digitized
    Tag::DateTime,          // File modification date/time
];

/// Pattern: "YYYY:MM:DD", optionally followed by a time
static PATTERN_EXIF_DATE: OnceLock<Regex> = OnceLock::new();

fn exif_date_pattern() -> &'static Regex {
    PATTERN_EXIF_DATE.get_or_init(|| Regex::new(r"(\d{4}):(\d{2}):(\d{2})").unwrap())
}

/// Source of raw capture-date strings embedded in image files.
///
/// The importer only needs one field from the metadata, so readers return
/// the raw value and leave parsing to [`parse_exif_date`].
pub trait MetadataReader: Send + Sync {
    fn read_create_date(&self, path: &Path) -> Result<String, MetadataError>;
}

/// Reads the capture date with kamadak-exif
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifReader;

impl MetadataReader for ExifReader {
    fn read_create_date(&self, path: &Path) -> Result<String, MetadataError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let exif = Reader::new()
            .read_from_container(&mut reader)
            .map_err(|e| MetadataError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        for tag in DATE_TAGS {
            // display_value() reformats dates with dashes, so read the raw ASCII
            if let Some(field) = exif.get_field(*tag, In::PRIMARY)
                && let Value::Ascii(ref parts) = field.value
                && let Some(raw) = parts.first()
            {
                let value = String::from_utf8_lossy(raw).into_owned();
                trace!(?path, ?tag, %value, "Found EXIF date");
                return Ok(value);
            }
        }

        Err(MetadataError::MissingDate {
            path: path.to_path_buf(),
        })
    }
}

/// Parse the date part of an EXIF datetime string ("2015:03:11 09:05:32")
pub fn parse_exif_date(value: &str) -> Option<Datestamp> {
    let value = value.trim().trim_matches('"');
    let caps = exif_date_pattern().captures(value)?;
    Datestamp::from_captures(
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str(),
        caps.get(3)?.as_str(),
    )
}

/// Read and parse the capture date of `path` through `reader`
pub fn extract_exif_date(reader: &dyn MetadataReader, path: &Path) -> Result<Datestamp, MetadataError> {
    let value = reader.read_create_date(path)?;
    parse_exif_date(&value).ok_or_else(|| MetadataError::MalformedDate {
        path: path.to_path_buf(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_exif_date() {
        let ds = parse_exif_date("2015:03:11 09:05:32").unwrap();
        assert_eq!(ds.to_string(), "2015-03-11");

        // With quotes
        let ds = parse_exif_date("\"2016:01:22 00:00:00\"").unwrap();
        assert_eq!(ds.to_string(), "2016-01-22");

        // Date only
        assert_eq!(parse_exif_date("2016:01:22").unwrap().to_string(), "2016-01-22");

        assert!(parse_exif_date("invalid").is_none());
        assert!(parse_exif_date("2015/03/11").is_none());
    }

    #[test]
    fn test_exif_reader_rejects_non_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let err = ExifReader.read_create_date(&path).unwrap_err();
        assert!(matches!(err, MetadataError::Read { .. }));
    }

    #[test]
    fn test_exif_reader_missing_file() {
        let dir = tempdir().unwrap();
        let err = ExifReader
            .read_create_date(&dir.path().join("missing.jpg"))
            .unwrap_err();
        assert!(matches!(err, MetadataError::Io(_)));
    }

    struct Fixed(&'static str);

    impl MetadataReader for Fixed {
        fn read_create_date(&self, _path: &Path) -> Result<String, MetadataError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_extract_malformed_value() {
        let err = extract_exif_date(&Fixed("yesterday"), Path::new("a.jpg")).unwrap_err();
        assert!(matches!(err, MetadataError::MalformedDate { value, .. } if value == "yesterday"));

        let ds = extract_exif_date(&Fixed("2014:07:04 12:00:00"), Path::new("a.jpg")).unwrap();
        assert_eq!(ds.to_string(), "2014-07-04");
    }
}
