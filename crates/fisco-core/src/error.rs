//! Error types for the fisco-core library.

use thiserror::Error;

/// Main error type for the fisco-core library.
#[derive(Error, Debug)]
pub enum FiscoError {
    /// CUIT validation error.
    #[error("CUIT error: {0}")]
    Cuit(#[from] CuitError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised at the CUIT validator boundary.
///
/// The contextual scanner catches these and treats the offending substring
/// as "no candidate here"; they never escape an extraction call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CuitError {
    /// Input is not an 11-digit identifier once separators are stripped.
    #[error("invalid CUIT format: {0:?}")]
    InvalidFormat(String),

    /// The 11th digit does not match the computed check digit.
    #[error("CUIT checksum mismatch: {0}")]
    ChecksumMismatch(String),
}

/// Errors related to document field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No text was provided at all. The only hard error of the core:
    /// short-but-present text yields a zero-confidence result instead.
    #[error("no text provided")]
    EmptyInput,

    /// The document-type table is unusable (empty or inconsistent).
    #[error("invalid document type table: {0}")]
    InvalidTypeTable(String),
}

/// Result type for the fisco-core library.
pub type Result<T> = std::result::Result<T, FiscoError>;
