//! Error types for the reconciliation engine.

use thiserror::Error;

/// Main error type for the fisco-recon library.
#[derive(Error, Debug)]
pub enum ReconError {
    /// Catalog/storage failure.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The extraction result carries no validated CUIT, so there is
    /// nothing to reconcile against.
    #[error("document has no validated CUIT")]
    MissingCuit,
}

/// Errors surfaced by [`crate::catalog::ExpectedCatalog`] implementations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Underlying storage failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for the fisco-recon library.
pub type Result<T> = std::result::Result<T, ReconError>;
