//! Error types for the format crate

use realmsave_core::SaveError;

/// Format-specific error types
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// File could not be opened
    #[error("File not found or not accessible: {0}")]
    NotFound(String),

    /// Magic signature mismatch
    #[error("Bad magic signature: {0}")]
    BadMagic(String),

    /// Version outside the supported range
    #[error("Unsupported version {found} (supported: {min}..={max})")]
    UnsupportedVersion { found: u16, min: u16, max: u16 },

    /// Stream or frame validation failure - the bytes cannot be trusted
    #[error("Corrupted data: {0}")]
    Corrupted(String),

    /// Write-side stream failure
    #[error("Write error: {0}")]
    WriteFailed(String),
}

impl From<FormatError> for SaveError {
    fn from(err: FormatError) -> Self {
        SaveError::Format(err.to_string())
    }
}

/// Result type for format operations
pub type Result<T> = std::result::Result<T, FormatError>;
