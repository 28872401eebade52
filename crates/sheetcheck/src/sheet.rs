//! Main SheetValidator struct: check, decode, and validate one file.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::input::{DecodeOptions, Decoder, RawFile, check_input, check_path};
use crate::validation::{ValidationResult, ValidatorConfig, validate_sheet};

/// Configuration for a SheetValidator.
#[derive(Debug, Clone)]
pub struct SheetValidatorConfig {
    /// Decoder options, including the upload size ceiling.
    pub decode: DecodeOptions,
    /// Treat the first decoded row as a header and leave it unchecked.
    pub skip_header_row: bool,
}

impl Default for SheetValidatorConfig {
    fn default() -> Self {
        Self {
            decode: DecodeOptions::default(),
            skip_header_row: true,
        }
    }
}

/// Runs the full pipeline for uploaded files.
///
/// Input rejections and decode failures are returned as errors and stop the
/// pipeline. Cells that fail their rules are reported in the returned
/// [`ValidationResult`] instead.
pub struct SheetValidator {
    config: SheetValidatorConfig,
    decoder: Decoder,
}

impl SheetValidator {
    /// Create a SheetValidator with default configuration.
    pub fn new() -> Self {
        Self::with_config(SheetValidatorConfig::default())
    }

    /// Create a SheetValidator with custom configuration.
    pub fn with_config(config: SheetValidatorConfig) -> Self {
        let decoder = Decoder::with_options(config.decode.clone());
        Self { config, decoder }
    }

    /// Set the upload size ceiling in bytes.
    pub fn with_max_file_size(self, max_file_size: u64) -> Self {
        let mut config = self.config;
        config.decode.max_file_size = max_file_size;
        Self::with_config(config)
    }

    /// Choose whether the first row is skipped as a header.
    pub fn with_skip_header_row(mut self, skip: bool) -> Self {
        self.config.skip_header_row = skip;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &SheetValidatorConfig {
        &self.config
    }

    /// Check, decode, and validate an in-memory file.
    pub fn validate_file(&self, file: &RawFile, rules: &ValidatorConfig) -> Result<ValidationResult> {
        if let Err(rejection) = check_input(Some(file), self.config.decode.max_file_size) {
            warn!(file = %file.name, reason = %rejection, "input rejected");
            return Err(rejection.into());
        }

        let rows = self.decoder.decode(file)?;
        let result = validate_sheet(&rows, rules, self.config.skip_header_row);

        debug!(
            file = %file.name,
            total_rows = result.total_rows,
            invalid_rows = result.invalid_rows,
            success = result.success,
            "validated file"
        );

        Ok(result)
    }

    /// Check a file on disk, then read, decode, and validate it.
    ///
    /// The size ceiling is applied to the file's metadata before any byte is
    /// read, and the read is capped at the ceiling.
    pub fn validate_path(&self, path: impl AsRef<Path>, rules: &ValidatorConfig) -> Result<ValidationResult> {
        let path = path.as_ref();
        let max_size = self.config.decode.max_file_size;

        if let Err(e) = check_path(path, max_size) {
            if e.is_input_rejected() {
                warn!(path = %path.display(), reason = %e, "input rejected");
            }
            return Err(e);
        }

        let file = RawFile::open_with_limit(path, max_size)?;
        self.validate_file(&file, rules)
    }
}

impl Default for SheetValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InputRejection, SheetError};
    use crate::validation::BuiltinRule;
    use std::io::Write;
    use tempfile::Builder;

    fn contact_rules() -> ValidatorConfig {
        ValidatorConfig::new()
            .column(0, BuiltinRule::Aadhaar)
            .column(1, BuiltinRule::Phone)
            .column(2, BuiltinRule::Email)
    }

    #[test]
    fn test_validate_clean_csv() {
        let file = RawFile::new(
            "contacts.csv",
            "aadhaar,phone,email\n234567890123,9876543210,a@b.com\n",
        );

        let result = SheetValidator::new().validate_file(&file, &contact_rules()).unwrap();

        assert!(result.success);
        assert_eq!(result.total_rows, 2);
    }

    #[test]
    fn test_validate_csv_with_issues() {
        let file = RawFile::new(
            "contacts.csv",
            "aadhaar,phone,email\n123456789012,9876543210,a@b\n234567890123,9876543210,ok@x.in\n",
        );

        let result = SheetValidator::new().validate_file(&file, &contact_rules()).unwrap();

        assert!(!result.success);
        assert_eq!(result.invalid_rows, 1);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.summary.by_column.len(), 2);
    }

    #[test]
    fn test_rejected_file_is_not_decoded() {
        let validator = SheetValidator::new().with_max_file_size(8);
        // Malformed content would fail decoding; the size check must win.
        let file = RawFile::new("big.csv", "\"unterminated,1,2,3");

        let err = validator.validate_file(&file, &contact_rules()).unwrap_err();

        assert!(matches!(
            err,
            SheetError::InputRejected(InputRejection::TooLarge { max: 8, .. })
        ));
    }

    #[test]
    fn test_decode_failure_surfaces() {
        let file = RawFile::new("bad.csv", "a,b\n\"open");
        let err = SheetValidator::new().validate_file(&file, &contact_rules()).unwrap_err();
        assert!(err.is_decode_failure());
    }

    #[test]
    fn test_header_row_validated_when_requested() {
        let file = RawFile::new("c.csv", "234567890123,9876543210,a@b.com\n");
        let validator = SheetValidator::new().with_skip_header_row(false);

        let result = validator.validate_file(&file, &contact_rules()).unwrap();

        assert!(result.success);
        assert_eq!(result.total_rows, 1);
    }

    #[test]
    fn test_validate_path() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"pin\n560001\n5600\n").unwrap();

        let rules = ValidatorConfig::new().column(0, BuiltinRule::PinCode);
        let result = SheetValidator::new().validate_path(file.path(), &rules).unwrap();

        assert_eq!(result.invalid_rows, 1);
        assert_eq!(result.errors[0].row, 3);
    }

    #[test]
    fn test_validate_missing_path() {
        let err = SheetValidator::new()
            .validate_path("/nonexistent/dir/file.csv", &contact_rules())
            .unwrap_err();
        assert!(matches!(err, SheetError::Io { .. }));
    }

    #[test]
    fn test_validate_path_rejects_oversized_file_from_metadata() {
        let file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.as_file().set_len(1024 * 1024 * 1024).unwrap();

        let err = SheetValidator::new()
            .validate_path(file.path(), &contact_rules())
            .unwrap_err();

        assert!(matches!(
            err,
            SheetError::InputRejected(InputRejection::TooLarge { size: 1_073_741_824, .. })
        ));
        assert_eq!(err.to_string(), "File exceeds maximum size of 5MB");
    }

    #[test]
    fn test_validate_path_rejects_empty_and_unsupported_files() {
        let empty = Builder::new().suffix(".csv").tempfile().unwrap();
        let err = SheetValidator::new()
            .validate_path(empty.path(), &contact_rules())
            .unwrap_err();
        assert!(matches!(err, SheetError::InputRejected(InputRejection::Empty)));

        let mut notes = Builder::new().suffix(".json").tempfile().unwrap();
        notes.write_all(b"{}").unwrap();
        let err = SheetValidator::new()
            .validate_path(notes.path(), &contact_rules())
            .unwrap_err();
        assert!(matches!(
            err,
            SheetError::InputRejected(InputRejection::UnsupportedExtension { .. })
        ));
    }
}
