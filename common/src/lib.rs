pub mod file_format;
pub mod test_utils;

pub use file_format::{
    FileExtensionError, FileFormatResult, SerdeFormat, SerdeFormatError, SerdeFormatResult,
    deserialize, get_file_extension, serialize,
};

pub const EPSILON: f64 = 1e-6;
