//! Decoding of CSV text and Excel workbooks into rows.

use std::cmp::Reverse;
use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use tracing::{debug, warn};

use crate::error::{InputRejection, Result, SheetError};

use super::guard::{DEFAULT_MAX_FILE_SIZE, check_size};
use super::source::{Cell, FileFormat, ParsedRow, RawFile};

/// Delimiters to try when auto-detecting, in tie-break order.
const DELIMITERS: &[u8] = &[b',', b'\t', b';', b'|'];

/// Non-blank lines sampled when auto-detecting.
const DETECT_SAMPLE_LINES: usize = 10;

/// UTF-8 byte order mark.
const BOM: char = '\u{feff}';

/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Largest file, in bytes, that will be decoded.
    pub max_file_size: u64,
    /// Field delimiter for delimited text.
    pub delimiter: u8,
    /// Guess the delimiter from the first lines instead of using `delimiter`.
    pub detect_delimiter: bool,
    /// Quote character.
    pub quote: u8,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            delimiter: b',',
            detect_delimiter: false,
            quote: b'"',
        }
    }
}

/// Decodes uploaded files into rows of cells.
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    /// Create a decoder with default options.
    pub fn new() -> Self {
        Self {
            options: DecodeOptions::default(),
        }
    }

    /// Create a decoder with custom options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Get the decoder options.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode a file, choosing the format by extension.
    ///
    /// The size ceiling and extension are checked again here so that an
    /// unchecked file can never reach a format decoder.
    pub fn decode(&self, file: &RawFile) -> Result<Vec<ParsedRow>> {
        check_size(file, self.options.max_file_size)?;
        let format = file
            .format()
            .ok_or_else(|| InputRejection::UnsupportedExtension {
                extension: file.extension(),
            })?;

        let result = match format {
            FileFormat::DelimitedText => {
                let text = String::from_utf8_lossy(&file.content);
                self.decode_text(&text)
            }
            FileFormat::Spreadsheet => decode_spreadsheet(&file.content),
        };

        match &result {
            Ok(rows) => debug!(file = %file.name, format = format.label(), rows = rows.len(), "decoded file"),
            Err(e) => warn!(file = %file.name, error = %e, "failed to decode file"),
        }

        result
    }

    /// Decode delimited text. Every cell is the literal field text.
    pub fn decode_text(&self, content: &str) -> Result<Vec<ParsedRow>> {
        let content = content.strip_prefix(BOM).unwrap_or(content);

        let delimiter = if self.options.detect_delimiter {
            detect_delimiter(content, self.options.quote).unwrap_or(self.options.delimiter)
        } else {
            self.options.delimiter
        };

        check_quoting(content, delimiter, self.options.quote)?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.options.quote)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| SheetError::csv(e.to_string()))?;
            rows.push(record.iter().map(|field| Cell::Text(field.to_string())).collect());
        }

        Ok(rows)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a file with the given options.
pub fn decode(file: &RawFile, options: &DecodeOptions) -> Result<Vec<ParsedRow>> {
    Decoder::with_options(options.clone()).decode(file)
}

/// Decode comma-delimited text with default options.
pub fn decode_delimited_text(content: &str) -> Result<Vec<ParsedRow>> {
    Decoder::new().decode_text(content)
}

/// Decode the first sheet of an Excel workbook (`.xlsx` or `.xls`).
///
/// Rows and columns are counted from the top-left cell of the sheet's used
/// range, so row 0 is its first non-empty row. The grid is rectangular: cells
/// with no value are empty strings.
pub fn decode_spreadsheet(bytes: &[u8]) -> Result<Vec<ParsedRow>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| SheetError::excel(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| SheetError::excel(e.to_string()))?,
        None => return Err(SheetError::excel("No sheets found in Excel file")),
    };

    Ok(grid_rows(&range))
}

fn grid_rows(range: &Range<Data>) -> Vec<ParsedRow> {
    range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect()
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Empty => Cell::Text(String::new()),
        other => Cell::Text(other.to_string()),
    }
}

/// Reject text whose quoted fields are structurally broken.
///
/// The csv reader accepts these silently, so they are caught up front.
fn check_quoting(content: &str, delimiter: u8, quote: u8) -> Result<()> {
    let delimiter = delimiter as char;
    let quote = quote as char;

    let mut line = 1;
    let mut at_field_start = true;
    let mut in_quotes = false;
    let mut after_closing_quote = false;
    let mut quote_opened_on = 0;

    let mut chars = content.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == quote {
                if chars.peek() == Some(&quote) {
                    chars.next();
                } else {
                    in_quotes = false;
                    after_closing_quote = true;
                }
            } else if ch == '\n' {
                line += 1;
            }
            continue;
        }

        if after_closing_quote {
            match ch {
                c if c == delimiter => {
                    after_closing_quote = false;
                    at_field_start = true;
                }
                '\r' => {}
                '\n' => {
                    after_closing_quote = false;
                    at_field_start = true;
                    line += 1;
                }
                _ => {
                    return Err(SheetError::csv(format!(
                        "Trailing quote on quoted field is malformed (line {})",
                        line
                    )));
                }
            }
            continue;
        }

        match ch {
            c if c == quote && at_field_start => {
                in_quotes = true;
                at_field_start = false;
                quote_opened_on = line;
            }
            c if c == delimiter => at_field_start = true,
            '\n' => {
                at_field_start = true;
                line += 1;
            }
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(SheetError::csv(format!(
            "Quoted field unterminated (line {})",
            quote_opened_on
        )));
    }

    Ok(())
}

/// Guess the delimiter from the first non-blank lines.
///
/// A candidate qualifies only if it occurs, outside quotes, the same nonzero
/// number of times on every sampled line. The most frequent one wins.
fn detect_delimiter(content: &str, quote: u8) -> Option<u8> {
    let sample: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(DETECT_SAMPLE_LINES)
        .collect();

    DELIMITERS
        .iter()
        .enumerate()
        .filter_map(|(rank, &delimiter)| {
            let mut counts = sample.iter().map(|line| unquoted_count(line, delimiter, quote));
            let first = counts.next()?;
            (first > 0 && counts.all(|count| count == first)).then_some((rank, delimiter, first))
        })
        .max_by_key(|&(rank, _, count)| (count, Reverse(rank)))
        .map(|(_, delimiter, _)| delimiter)
}

fn unquoted_count(line: &str, delimiter: u8, quote: u8) -> usize {
    let mut in_quotes = false;
    line.bytes()
        .filter(|&b| {
            if b == quote {
                in_quotes = !in_quotes;
            }
            b == delimiter && !in_quotes
        })
        .count()
}
