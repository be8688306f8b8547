//! Core library for Argentine fiscal document intake.
//!
//! This crate provides:
//! - CUIT validation, normalization, and contextual extraction
//! - Document-type classification from the AFIP/ARCA code table
//! - Rule-based field extraction (issue date, document number, total)
//!   over plain text, with per-candidate scoring
//! - Confidence aggregation for routing documents to manual review
//!
//! The crate consumes already-produced plain text; reading documents and
//! running OCR belong to the caller.

pub mod cuit;
pub mod doctype;
pub mod error;
pub mod extract;
pub mod models;

pub use cuit::{validate_cuit, Cuit, HolderKind};
pub use doctype::{
    ClassificationMethod, DocKind, DocType, DocTypeMatch, DocTypeTable, Letter,
};
pub use error::{CuitError, ExtractionError, FiscoError, Result};
pub use extract::{
    aggregate_confidence, ContextRule, CuitContextRules, DocumentExtractor, ExtractedField,
    FieldExtractor,
};
pub use models::{ExtractionResult, ScoreProfile, TextProfile};
