//! Input validation and sanitization.

pub mod sanitize;

pub use sanitize::{
    file_stem, sanitize_file_name, sanitize_text_field, truncate_to_char_boundary,
    MAX_FILE_NAME_BYTES,
};
