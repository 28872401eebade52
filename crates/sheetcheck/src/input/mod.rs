//! Input checks, raw files, and decoding into rows.

mod guard;
mod parser;
mod source;

pub use guard::{ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE, check_input, check_path};
pub use parser::{DecodeOptions, Decoder, decode, decode_delimited_text, decode_spreadsheet};
pub use source::{Cell, FileFormat, ParsedRow, RawFile, cell_at, file_extension, text_row};
