//! The per-document extraction pipeline.
//!
//! One parametrized pipeline serves both text profiles; the profile only
//! selects a weight table, never a different algorithm.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::doctype::DocTypeTable;
use crate::error::ExtractionError;
use crate::models::config::{ScoreProfile, TextProfile};
use crate::models::extraction::ExtractionResult;

use super::confidence::aggregate_confidence;
use super::rules::{CuitContextRules, CuitScanner, DateScanner, DocNumScanner, FieldExtractor, TotalScanner};

/// Minimum trimmed length worth scanning; anything shorter yields a
/// zero-confidence result.
const MIN_TEXT_LEN: usize = 25;

/// Field candidate extractor over one document's plain text.
pub struct DocumentExtractor {
    table: DocTypeTable,
    cuit_rules: CuitContextRules,
    digital: ScoreProfile,
    scanned: ScoreProfile,
    today: NaiveDate,
}

impl DocumentExtractor {
    /// Create an extractor with the production tables.
    pub fn new() -> Self {
        Self {
            table: DocTypeTable::default(),
            cuit_rules: CuitContextRules::default(),
            digital: ScoreProfile::digital(),
            scanned: ScoreProfile::scanned(),
            today: chrono::Utc::now().date_naive(),
        }
    }

    /// Substitute the document-type code table.
    pub fn with_table(mut self, table: DocTypeTable) -> Self {
        self.table = table;
        self
    }

    /// Substitute the CUIT context rule table.
    pub fn with_cuit_rules(mut self, rules: CuitContextRules) -> Self {
        self.cuit_rules = rules;
        self
    }

    /// Substitute the weight table for one profile.
    pub fn with_score_profile(mut self, profile: TextProfile, weights: ScoreProfile) -> Self {
        match profile {
            TextProfile::Digital => self.digital = weights,
            TextProfile::Scanned => self.scanned = weights,
        }
        self
    }

    /// Pin the processing date (tests; date staleness scoring).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Extract all fields from one document's plain text.
    ///
    /// Never fails on content: ambiguity resolves through scoring and
    /// missing fields land in `field_errors`. The only hard error is being
    /// handed no text at all.
    pub fn extract(
        &self,
        text: &str,
        profile: TextProfile,
    ) -> Result<ExtractionResult, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        if text.trim().len() < MIN_TEXT_LEN {
            debug!("text of {} chars is below the attempt threshold", text.trim().len());
            return Ok(ExtractionResult::insufficient(profile));
        }

        let weights = match profile {
            TextProfile::Digital => &self.digital,
            TextProfile::Scanned => &self.scanned,
        };

        info!("extracting fields from {} characters of text", text.len());
        let mut field_errors = Vec::new();

        let cuit = CuitScanner::with_rules(self.cuit_rules.clone())
            .extract(text)
            .map(|f| {
                debug!("CUIT {} scored {} [{}]", f.value, f.score, f.rationale.join("; "));
                f.value
            });
        if cuit.is_none() {
            field_errors.push("could not extract a valid CUIT".to_string());
        }

        let doc_type = self.table.extract_with_fallback(text).map(|m| {
            debug!("document type {} via {:?}", m.doc_type.short, m.method);
            m.doc_type
        });
        if doc_type.is_none() {
            field_errors.push("could not classify the document type".to_string());
        }

        let issue_date = DateScanner::new(&weights.dates, self.today)
            .extract(text)
            .map(|f| {
                debug!("issue date {} scored {} [{}]", f.value, f.score, f.rationale.join("; "));
                f.value
            });
        if issue_date.is_none() {
            field_errors.push("could not extract an issue date".to_string());
        }

        let number = DocNumScanner::new().extract(text);
        let (point_of_sale, sequence_number) = match &number {
            Some(f) => {
                if let (Some(found), Some(classified)) = (f.value.letter, doc_type.as_ref()) {
                    if found != classified.letter {
                        // The classifier is the authority on the letter; only
                        // the numeric parts are taken from this match.
                        debug!(
                            "document number letter {} conflicts with classified {}; keeping {}",
                            found, classified.letter, classified.letter
                        );
                    }
                }
                (Some(f.value.point_of_sale), Some(f.value.sequence))
            }
            None => (None, None),
        };
        if point_of_sale.is_none() {
            field_errors.push("could not extract a point of sale".to_string());
        }
        if sequence_number.is_none() {
            field_errors.push("could not extract a sequence number".to_string());
        }

        let total = TotalScanner::new(&weights.amounts).extract(text).map(|f| {
            debug!("total {} scored {} [{}]", f.value, f.score, f.rationale.join("; "));
            f.value
        });

        let mut result = ExtractionResult {
            cuit,
            issue_date,
            doc_type,
            point_of_sale,
            sequence_number,
            total,
            confidence: 0.0,
            success: false,
            field_errors,
            profile,
        };

        let (confidence, success) =
            aggregate_confidence(result.required_present(), result.total.is_some(), &weights.confidence);
        result.confidence = confidence;
        result.success = success;

        info!(
            "extraction finished: {}/5 required fields, confidence {:.1}, success {}",
            result.required_present(),
            result.confidence,
            result.success
        );

        Ok(result)
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}
