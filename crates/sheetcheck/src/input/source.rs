//! Raw input files and decoded cell values.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InputRejection, Result, SheetError};

/// File formats the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Comma-delimited text (`.csv`).
    DelimitedText,
    /// Excel workbook (`.xlsx`, `.xls`).
    Spreadsheet,
}

impl FileFormat {
    /// Map a lowercase, dot-prefixed extension to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            ".csv" => Some(FileFormat::DelimitedText),
            ".xlsx" | ".xls" => Some(FileFormat::Spreadsheet),
            _ => None,
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::DelimitedText => "CSV",
            FileFormat::Spreadsheet => "Excel",
        }
    }
}

/// An uploaded file: its name and full contents.
///
/// The file is owned by the caller; decoding borrows it and never keeps a
/// reference past the returned rows.
#[derive(Debug, Clone)]
pub struct RawFile {
    /// File name as supplied by the uploader (may include a path).
    pub name: String,
    /// File contents.
    pub content: Vec<u8>,
}

impl RawFile {
    /// Wrap in-memory contents.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a whole file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|e| io_error(path, e))?;

        Ok(Self {
            name: display_name(path),
            content,
        })
    }

    /// Read a file from disk, refusing anything larger than `max_size` bytes.
    ///
    /// The size is taken from metadata before reading, and the read itself
    /// stops one byte past the limit, so a file that grows in between is
    /// still refused.
    pub fn open_with_limit(path: impl AsRef<Path>, max_size: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| io_error(path, e))?;

        let size = file.metadata().map_err(|e| io_error(path, e))?.len();
        if size > max_size {
            return Err(InputRejection::TooLarge { size, max: max_size }.into());
        }

        let mut content = Vec::with_capacity(size as usize);
        file.take(max_size.saturating_add(1))
            .read_to_end(&mut content)
            .map_err(|e| io_error(path, e))?;
        if content.len() as u64 > max_size {
            return Err(InputRejection::TooLarge {
                size: content.len() as u64,
                max: max_size,
            }
            .into());
        }

        Ok(Self {
            name: display_name(path),
            content,
        })
    }

    /// Size of the contents in bytes.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Lowercase extension including the leading dot, or `""` when absent.
    pub fn extension(&self) -> String {
        file_extension(&self.name)
    }

    /// Format implied by the extension.
    pub fn format(&self) -> Option<FileFormat> {
        FileFormat::from_extension(&self.extension())
    }

    /// MIME type implied by the extension.
    pub fn content_type(&self) -> Option<&'static str> {
        match self.extension().as_str() {
            ".csv" => Some("text/csv"),
            ".xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            ".xls" => Some("application/vnd.ms-excel"),
            _ => None,
        }
    }
}

fn io_error(path: &Path, source: io::Error) -> SheetError {
    SheetError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extract the last dot-segment of a file name, lowercased, with its dot.
///
/// A trailing dot, a dot inside a directory component, or no dot at all
/// yields an empty string.
pub fn file_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains('/') => {
            format!(".{}", ext.to_lowercase())
        }
        _ => String::new(),
    }
}

/// One cell of a decoded row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// A numeric spreadsheet cell.
    Number(f64),
    /// Literal text. Delimited text only ever produces this variant.
    Text(String),
    /// No cell at this position.
    Empty,
}

impl Cell {
    /// Coerce the cell to text the way rules see it.
    ///
    /// Integral numbers print without a fractional part; `Empty` is `""`.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Empty => Cow::Borrowed(""),
        }
    }

    /// Returns true for `Empty` only; an empty string is still present.
    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// A decoded row, addressed by 0-based column index.
pub type ParsedRow = Vec<Cell>;

/// Read a cell by column index, yielding `Empty` past the end of the row.
pub fn cell_at(row: &[Cell], column: usize) -> &Cell {
    static ABSENT: Cell = Cell::Empty;
    row.get(column).unwrap_or(&ABSENT)
}

/// Build a row of text cells. Convenient for callers that already hold strings.
pub fn text_row<I, S>(values: I) -> ParsedRow
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(|v| Cell::Text(v.into())).collect()
}
