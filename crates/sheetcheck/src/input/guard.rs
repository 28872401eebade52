//! Pre-decode checks on uploaded files.

use std::fs;
use std::path::Path;

use crate::error::{InputRejection, Result, SheetError};

use super::source::{RawFile, file_extension};

/// Default ceiling on upload size: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Extensions accepted by the decoder.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".csv", ".xlsx", ".xls"];

/// Check a file before decoding.
///
/// Checks run in a fixed order: presence, emptiness, size ceiling, then
/// extension. The first failing check wins.
pub fn check_input(file: Option<&RawFile>, max_size: u64) -> std::result::Result<(), InputRejection> {
    let file = file.ok_or(InputRejection::Missing)?;
    check_attributes(file.size(), &file.extension(), max_size)
}

/// Check a file on disk from its metadata alone, without reading it.
///
/// Applies the same checks as [`check_input`] and returns the file size.
pub fn check_path(path: impl AsRef<Path>, max_size: u64) -> Result<u64> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| SheetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let name = path.file_name().map(|s| s.to_string_lossy()).unwrap_or_default();
    check_attributes(metadata.len(), &file_extension(&name), max_size)?;

    Ok(metadata.len())
}

fn check_attributes(size: u64, extension: &str, max_size: u64) -> std::result::Result<(), InputRejection> {
    if size == 0 {
        return Err(InputRejection::Empty);
    }
    if size > max_size {
        return Err(InputRejection::TooLarge { size, max: max_size });
    }
    if !ALLOWED_EXTENSIONS.contains(&extension) {
        return Err(InputRejection::UnsupportedExtension {
            extension: extension.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn check_size(file: &RawFile, max_size: u64) -> std::result::Result<(), InputRejection> {
    if file.size() > max_size {
        return Err(InputRejection::TooLarge {
            size: file.size(),
            max: max_size,
        });
    }
    Ok(())
}
