use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating elements or assembling a container.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Key `{0}` is not unique, or another case-variant of it exists.")]
    DuplicateKey(String),

    #[error("Table contains invalid names:\n{0}")]
    InvalidTableKeys(String),

    #[error("Raster '{name}': {reason}")]
    Raster { name: String, reason: String },

    #[error("Geometry {index}: {reason}")]
    Geometry { index: usize, reason: String },

    #[error("Shapes: {0}")]
    Shapes(String),

    #[error("Points: {0}")]
    Points(String),

    #[error("Table: {0}")]
    Table(String),

    #[error(
        "Mismatch(es) found between regions in region column in obs and target element: {0}"
    )]
    RegionMismatch(String),

    #[error("Container: {0}")]
    Container(String),
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Errors raised while generating fixture data.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported config file '{path}': {source}")]
    ConfigExtension {
        path: PathBuf,
        source: common::FileExtensionError,
    },

    #[error("Malformed config '{path}': {source}")]
    ConfigFormat {
        path: PathBuf,
        source: common::SerdeFormatError,
    },
}

pub type FixtureResult<T> = std::result::Result<T, FixtureError>;
