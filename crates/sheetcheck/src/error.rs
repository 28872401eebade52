//! Error types for the sheetcheck library.

use std::path::PathBuf;
use thiserror::Error;

/// Bytes in one mebibyte, used when reporting size limits.
const MIB: f64 = 1024.0 * 1024.0;

/// Main error type for sheetcheck operations.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The file was refused before any decoding was attempted.
    #[error("{0}")]
    InputRejected(#[from] InputRejection),

    /// Malformed delimited text or spreadsheet content.
    #[error("{format} Parse Error: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    /// Error reading a file from disk.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No built-in rule is registered under this name.
    #[error("Unknown rule: {0}. Use: aadhaar, phone, pinCode, email, required, or numeric.")]
    UnknownRule(String),

    /// A `<column>=<rule>` spec could not be parsed.
    #[error("Invalid column spec: {0}")]
    InvalidColumnSpec(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SheetError {
    /// Build a decode error for the delimited-text path.
    pub(crate) fn csv(message: impl Into<String>) -> Self {
        SheetError::Decode {
            format: "CSV",
            message: message.into(),
        }
    }

    /// Build a decode error for the spreadsheet path.
    pub(crate) fn excel(message: impl Into<String>) -> Self {
        SheetError::Decode {
            format: "Excel",
            message: message.into(),
        }
    }

    /// Returns true if this error came from the input guard.
    pub fn is_input_rejected(&self) -> bool {
        matches!(self, SheetError::InputRejected(_))
    }

    /// Returns true if this error came from the decode stage.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, SheetError::Decode { .. })
    }
}

/// Reasons the input guard refuses a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputRejection {
    /// No file was supplied.
    #[error("No file provided")]
    Missing,

    /// The file has zero bytes.
    #[error("File is empty")]
    Empty,

    /// The file is larger than the configured ceiling.
    #[error("File exceeds maximum size of {}MB", mebibytes(.max))]
    TooLarge { size: u64, max: u64 },

    /// The extension is not one of the accepted formats.
    #[error("Unsupported file type: {extension}. Allowed: .csv, .xlsx, .xls")]
    UnsupportedExtension { extension: String },
}

fn mebibytes(bytes: &u64) -> u64 {
    (*bytes as f64 / MIB).round() as u64
}

/// Result type alias for sheetcheck operations.
pub type Result<T> = std::result::Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(InputRejection::Missing.to_string(), "No file provided");
        assert_eq!(InputRejection::Empty.to_string(), "File is empty");
        assert_eq!(
            InputRejection::TooLarge {
                size: 6 * 1024 * 1024,
                max: 5 * 1024 * 1024
            }
            .to_string(),
            "File exceeds maximum size of 5MB"
        );
        assert_eq!(
            InputRejection::UnsupportedExtension {
                extension: ".txt".to_string()
            }
            .to_string(),
            "Unsupported file type: .txt. Allowed: .csv, .xlsx, .xls"
        );
    }

    #[test]
    fn test_size_rounds_to_nearest_mebibyte() {
        let err = InputRejection::TooLarge {
            size: 10,
            max: 1536 * 1024,
        };
        assert_eq!(err.to_string(), "File exceeds maximum size of 2MB");
    }

    #[test]
    fn test_decode_error_display() {
        let err = SheetError::csv("Quoted field unterminated (line 3)");
        assert_eq!(
            err.to_string(),
            "CSV Parse Error: Quoted field unterminated (line 3)"
        );
        assert!(err.is_decode_failure());

        let err = SheetError::excel("No sheets found in Excel file");
        assert_eq!(err.to_string(), "Excel Parse Error: No sheets found in Excel file");
    }

    #[test]
    fn test_rejection_converts_into_sheet_error() {
        let err: SheetError = InputRejection::Empty.into();
        assert!(err.is_input_rejected());
        assert_eq!(err.to_string(), "File is empty");
    }
}
