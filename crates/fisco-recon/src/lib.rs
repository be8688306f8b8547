//! Reconciliation engine for expected-invoice catalogs.
//!
//! Matches extracted receipt fields against the catalog of invoices the
//! organization was notified to expect:
//! - exact lookup by the identifying 4-tuple (CUIT, letter, point of sale,
//!   sequence)
//! - weighted partial scoring with configurable tolerances
//! - a narrow catalog trait so any persistence layer can back the engine
//!
//! Extraction lives in `fisco-core`; this crate consumes its output.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod models;

pub use catalog::{ExpectedCatalog, MemoryCatalog};
pub use engine::{MatchConfig, MatchWeights, ReconciliationEngine};
pub use error::{CatalogError, ReconError, Result};
pub use models::{
    DocumentFields, ExpectedInvoiceRecord, ExpectedKey, ExpectedStatus, MatchCandidate,
    MatchField, MatchScore, Outcome,
};
