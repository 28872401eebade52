//! Check command - run the input guard only.

use std::path::{Path, PathBuf};

use colored::Colorize;
use sheetcheck::{FileFormat, check_path};
use sheetcheck::input::file_extension;

use crate::cli::ByteSize;

pub fn run(file: PathBuf, max_size: ByteSize, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let size = check_path(&file, max_size.0)?;

    println!(
        "{} {} ({} bytes, {})",
        "Accepted".green().bold(),
        file.display().to_string().white(),
        size,
        format_label(&file)
    );

    if verbose {
        println!("  size limit: {}", max_size);
    }

    Ok(())
}

fn format_label(path: &Path) -> &'static str {
    let name = path.file_name().map(|s| s.to_string_lossy()).unwrap_or_default();
    FileFormat::from_extension(&file_extension(&name))
        .map(|format| format.label())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(Path::new("/tmp/kyc.CSV")), "CSV");
        assert_eq!(format_label(Path::new("book.xls")), "Excel");
        assert_eq!(format_label(Path::new("notes")), "unknown");
    }

    #[test]
    fn test_check_rejects_oversized_file_without_reading() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.as_file().set_len(10 * 1024 * 1024).unwrap();

        let err = run(file.path().to_path_buf(), ByteSize(1024), false).unwrap_err();

        assert_eq!(err.to_string(), "File exceeds maximum size of 0MB");
    }
}
