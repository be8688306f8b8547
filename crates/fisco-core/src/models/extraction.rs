//! Per-document extraction output.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cuit::Cuit;
use crate::doctype::{DocType, Letter};
use crate::models::config::TextProfile;

/// Number of required fields counted by the confidence aggregator:
/// CUIT, issue date, document type, point of sale, sequence number.
pub const REQUIRED_FIELD_COUNT: u8 = 5;

/// The per-document extraction output.
///
/// Created fresh per document and never mutated after the extraction call
/// returns; the reconciliation engine consumes it read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Issuer tax identifier.
    pub cuit: Option<Cuit>,

    /// Issue date.
    pub issue_date: Option<NaiveDate>,

    /// Classified document type.
    pub doc_type: Option<DocType>,

    /// Issuing terminal/branch number.
    pub point_of_sale: Option<u32>,

    /// Per-point-of-sale invoice counter.
    pub sequence_number: Option<u64>,

    /// Monetary total (optional; raises the confidence ceiling).
    pub total: Option<Decimal>,

    /// Overall confidence in [0, 100].
    pub confidence: f32,

    /// Whether the confidence cleared the acceptance threshold.
    pub success: bool,

    /// One human-readable entry per required field that stayed empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<String>,

    /// Text profile the document was processed under.
    pub profile: TextProfile,
}

impl ExtractionResult {
    /// An empty result for text too short to attempt extraction.
    pub fn insufficient(profile: TextProfile) -> Self {
        Self {
            cuit: None,
            issue_date: None,
            doc_type: None,
            point_of_sale: None,
            sequence_number: None,
            total: None,
            confidence: 0.0,
            success: false,
            field_errors: vec!["text too short to attempt extraction".to_string()],
            profile,
        }
    }

    /// The receipt letter, when a document type was classified.
    pub fn letter(&self) -> Option<Letter> {
        self.doc_type.as_ref().map(|t| t.letter)
    }

    /// How many of the five required fields are present.
    pub fn required_present(&self) -> u8 {
        [
            self.cuit.is_some(),
            self.issue_date.is_some(),
            self.doc_type.is_some(),
            self.point_of_sale.is_some(),
            self.sequence_number.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count() as u8
    }

    /// Whether every required field is present.
    pub fn is_complete(&self) -> bool {
        self.required_present() == REQUIRED_FIELD_COUNT
    }
}
