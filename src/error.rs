use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed cell address, column letters or row number
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Remote locator without a bucket or key
    #[error("Invalid S3 URI: {0}. Expected format: s3://bucket-name/path/to/file.xlsx")]
    InvalidLocator(String),

    #[error("Excel file not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    #[error("Sheet '{name}' not found. Available sheets: {available:?}")]
    SheetNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Unable to parse Excel file {}: {reason}", .path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Remote object or bucket missing, or the fetch failed
    #[error("S3 resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("AWS credentials not found: {0}")]
    CredentialsMissing(String),

    /// Remote storage support was compiled out
    #[error("{0} support is not available in this build")]
    DependencyMissing(&'static str),

    #[error("Reader has been closed")]
    AccessorClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
