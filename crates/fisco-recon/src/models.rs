//! Data models for expected invoices and match results.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fisco_core::{Cuit, ExtractionResult, Letter};

use crate::error::ReconError;

/// Lifecycle status of an expected-invoice record.
///
/// The engine only ever drives `Pending -> Matched`; the remaining states
/// are reached by human disposition in the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedStatus {
    Pending,
    Matched,
    Discrepancy,
    Manual,
    Ignored,
}

/// The identifying 4-tuple of an expected invoice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpectedKey {
    pub cuit: Cuit,
    pub letter: Letter,
    pub point_of_sale: u32,
    pub sequence: u64,
}

/// One row of the expected-invoice catalog, imported from the tax
/// authority's export. Read-only here except for the `Pending -> Matched`
/// transition performed through the catalog trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedInvoiceRecord {
    pub id: i64,
    pub cuit: Cuit,
    pub letter: Letter,
    pub point_of_sale: u32,
    pub sequence: u64,
    pub issue_date: NaiveDate,
    pub total: Decimal,
    pub status: ExpectedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_document_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_invoice_id: Option<i64>,
}

impl ExpectedInvoiceRecord {
    /// The identifying 4-tuple.
    pub fn key(&self) -> ExpectedKey {
        ExpectedKey {
            cuit: self.cuit.clone(),
            letter: self.letter,
            point_of_sale: self.point_of_sale,
            sequence: self.sequence,
        }
    }
}

/// A field that agreed between an extraction and a candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    Cuit,
    IssueDate,
    Total,
    Letter,
    PointOfSale,
    Sequence,
}

/// Partial-match score for one candidate record.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    /// Normalized to 0-100.
    pub score: f32,
    pub matched_fields: Vec<MatchField>,
}

/// A ranked candidate; transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub record: ExpectedInvoiceRecord,
    pub score: f32,
    pub matched_fields: Vec<MatchField>,
}

/// The engine's verdict for one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Exact key match; always accepted.
    Matched(ExpectedInvoiceRecord),
    /// Best partial candidate cleared the suggestion threshold.
    Suggestion {
        best: MatchCandidate,
        others: Vec<MatchCandidate>,
    },
    /// Candidates exist but none is strong enough; human disposition.
    Manual(Vec<MatchCandidate>),
    /// Zero candidates. A valid terminal outcome, not an error.
    NoMatch,
}

/// The extracted fields the engine consumes, detached from the extraction
/// pipeline's scoring detail.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFields {
    pub cuit: Cuit,
    pub letter: Option<Letter>,
    pub point_of_sale: Option<u32>,
    pub sequence: Option<u64>,
    pub issue_date: Option<NaiveDate>,
    pub total: Option<Decimal>,
}

impl DocumentFields {
    /// The exact-match key, when every key field was extracted.
    pub fn key(&self) -> Option<ExpectedKey> {
        Some(ExpectedKey {
            cuit: self.cuit.clone(),
            letter: self.letter?,
            point_of_sale: self.point_of_sale?,
            sequence: self.sequence?,
        })
    }
}

impl TryFrom<&ExtractionResult> for DocumentFields {
    type Error = ReconError;

    fn try_from(result: &ExtractionResult) -> Result<Self, Self::Error> {
        Ok(Self {
            cuit: result.cuit.clone().ok_or(ReconError::MissingCuit)?,
            letter: result.letter(),
            point_of_sale: result.point_of_sale,
            sequence: result.sequence_number,
            issue_date: result.issue_date,
            total: result.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fisco_core::{DocumentExtractor, TextProfile};

    #[test]
    fn test_document_fields_from_extraction() {
        let text = "\
            FACTURA B\n\
            B 00001 - 00000124\n\
            CUIT: 30-71057829-6\n\
            Fecha de Emisión: 15/01/2024\n";

        let result = DocumentExtractor::new()
            .extract(text, TextProfile::Digital)
            .unwrap();
        let fields = DocumentFields::try_from(&result).unwrap();

        assert_eq!(fields.cuit.as_str(), "30-71057829-6");
        assert_eq!(fields.key().unwrap().sequence, 124);
    }

    #[test]
    fn test_missing_cuit_is_rejected() {
        let result = DocumentExtractor::new()
            .extract("Remito interno sin datos fiscales del emisor", TextProfile::Digital)
            .unwrap();
        assert!(matches!(
            DocumentFields::try_from(&result),
            Err(ReconError::MissingCuit)
        ));
    }

    #[test]
    fn test_key_requires_all_fields() {
        let fields = DocumentFields {
            cuit: Cuit::parse("30-71057829-6").unwrap(),
            letter: Some(Letter::B),
            point_of_sale: Some(1),
            sequence: None,
            issue_date: None,
            total: None,
        };
        assert!(fields.key().is_none());

        let fields = DocumentFields {
            sequence: Some(124),
            ..fields
        };
        let key = fields.key().unwrap();
        assert_eq!(key.sequence, 124);
        assert_eq!(key.letter, Letter::B);
    }
}
