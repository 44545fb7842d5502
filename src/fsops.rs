//! File system operations used by the importer
//!
//! Moves and copies overwrite whatever already sits at the destination.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Target of a move or copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Keep the file name and place the file inside this directory
    Directory(PathBuf),
    /// Use this exact path
    File(PathBuf),
}

impl Destination {
    /// The full path the file ends up at
    pub fn resolve(&self, source: &Path) -> Result<PathBuf> {
        match self {
            Destination::File(path) => Ok(path.clone()),
            Destination::Directory(dir) => {
                let name = source
                    .file_name()
                    .ok_or_else(|| Error::Config(format!("Invalid source filename: {}", source.display())))?;
                Ok(dir.join(name))
            }
        }
    }
}

/// List the immediate subdirectories of `dir`, sorted by name
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            subdirs.push(entry.path());
        }
    }
    subdirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(subdirs)
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreation {
        path: dir.to_path_buf(),
        source,
    })
}

/// Move `source` to `dest`, replacing any existing file there.
///
/// Falls back to copy + delete only when the rename crosses file systems.
/// Any other rename failure is returned as [`Error::Move`] untouched.
pub fn move_file(source: &Path, dest: &Destination) -> Result<PathBuf> {
    let target = dest.resolve(source)?;
    if let Some(parent) = target.parent() {
        ensure_dir(parent)?;
    }

    match fs::rename(source, &target) {
        Ok(()) => trace!(?source, ?target, "Renamed file"),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(?source, ?target, error = %e, "Rename crosses devices, copying instead");
            copy_contents(source, &target).map_err(|e| move_error(e, source, &target))?;
            fs::remove_file(source).map_err(|e| move_error(e.into(), source, &target))?;
        }
        Err(e) => {
            return Err(Error::Move {
                from: source.to_path_buf(),
                to: target,
                source: e,
            });
        }
    }

    Ok(target)
}

/// Copy `source` to `dest`, replacing any existing file there
pub fn copy_file(source: &Path, dest: &Destination) -> Result<PathBuf> {
    let target = dest.resolve(source)?;
    if let Some(parent) = target.parent() {
        ensure_dir(parent)?;
    }
    copy_contents(source, &target).map_err(|e| move_error(e, source, &target))?;
    Ok(target)
}

fn move_error(e: Error, from: &Path, to: &Path) -> Error {
    match e {
        Error::Io(source) => Error::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        },
        other => other,
    }
}

/// Copy file with buffered I/O, keeping the modification time
fn copy_contents(source: &Path, dest: &Path) -> Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(256 * 1024, src_file);
    let mut writer = BufWriter::with_capacity(256 * 1024, dest_file);

    let mut buffer = vec![0u8; 256 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }
    writer.flush()?;

    if let Ok(metadata) = fs::metadata(source)
        && let Ok(mtime) = metadata.modified()
        && let Err(e) = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime))
    {
        debug!(?dest, error = %e, "Failed to preserve modification time");
    }

    Ok(())
}

/// Whether a file name is hidden (dot-prefixed)
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}
