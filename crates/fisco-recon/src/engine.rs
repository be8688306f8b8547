//! The reconciliation engine: exact key matching and weighted partial
//! scoring against the expected-invoice catalog.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use fisco_core::Cuit;

use crate::catalog::ExpectedCatalog;
use crate::error::Result;
use crate::models::{
    DocumentFields, ExpectedInvoiceRecord, ExpectedKey, ExpectedStatus, MatchCandidate,
    MatchField, MatchScore, Outcome,
};

/// Contribution of each agreeing field to the partial-match score.
///
/// The weights sum to 100, so a raw matched sum reads directly as the
/// normalized score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchWeights {
    pub cuit: u32,
    pub sequence: u32,
    pub point_of_sale: u32,
    pub issue_date: u32,
    pub letter: u32,
    pub total: u32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            cuit: 30,
            sequence: 20,
            point_of_sale: 15,
            issue_date: 15,
            letter: 10,
            total: 10,
        }
    }
}

impl MatchWeights {
    fn sum(&self) -> u32 {
        self.cuit + self.sequence + self.point_of_sale + self.issue_date + self.letter + self.total
    }
}

/// Thresholds and tolerances for partial matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum score at which the best candidate is offered as a
    /// suggestion; below it the ranked list defers to manual disposition.
    pub suggest_threshold: f32,

    /// Issue dates within this many days count as agreeing.
    pub date_tolerance_days: i64,

    /// Totals within this fraction of the expected total count as agreeing.
    pub total_tolerance_ratio: Decimal,

    /// Absolute floor for the total tolerance, for small invoices.
    pub total_epsilon: Decimal,

    pub weights: MatchWeights,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            suggest_threshold: 75.0,
            date_tolerance_days: 7,
            total_tolerance_ratio: Decimal::new(10, 2), // 0.10
            total_epsilon: Decimal::new(100, 2),        // 1.00
            weights: MatchWeights::default(),
        }
    }
}

/// Reconciliation engine over a catalog implementation.
pub struct ReconciliationEngine<C: ExpectedCatalog> {
    catalog: C,
    config: MatchConfig,
}

impl<C: ExpectedCatalog> ReconciliationEngine<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            config: MatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Single lookup by the identifying 4-tuple among `Pending` records.
    ///
    /// The catalog is expected to be key-unique among pending records; when
    /// that invariant is broken the anomaly is logged loudly and the lowest
    /// record id wins, deterministically.
    pub fn find_exact_match(&self, key: &ExpectedKey) -> Result<Option<ExpectedInvoiceRecord>> {
        let mut hits = self
            .catalog
            .find_by_key(key, &[ExpectedStatus::Pending])?;

        if hits.len() > 1 {
            warn!(
                "{} pending records share key {:?}; resolving to lowest id",
                hits.len(),
                key
            );
        }

        hits.sort_by_key(|r| r.id);
        Ok(hits.into_iter().next())
    }

    /// Candidate records for a CUIT, optionally windowed, ordered by issue
    /// date descending. Defaults to `Pending` records.
    pub fn find_candidates(
        &self,
        cuit: &Cuit,
        date_window: Option<(NaiveDate, NaiveDate)>,
        total_window: Option<(Decimal, Decimal)>,
        statuses: Option<&[ExpectedStatus]>,
    ) -> Result<Vec<ExpectedInvoiceRecord>> {
        let statuses = statuses.unwrap_or(&[ExpectedStatus::Pending]);
        Ok(self
            .catalog
            .find_by_cuit(cuit, date_window, total_window, statuses)?)
    }

    /// Weighted agreement between extracted fields and one candidate,
    /// normalized to 0-100.
    pub fn score_partial_match(
        &self,
        fields: &DocumentFields,
        record: &ExpectedInvoiceRecord,
    ) -> MatchScore {
        let w = &self.config.weights;
        let mut matched = Vec::new();
        let mut points = 0u32;

        if fields.cuit == record.cuit {
            matched.push(MatchField::Cuit);
            points += w.cuit;
        }

        if fields.sequence == Some(record.sequence) {
            matched.push(MatchField::Sequence);
            points += w.sequence;
        }

        if fields.point_of_sale == Some(record.point_of_sale) {
            matched.push(MatchField::PointOfSale);
            points += w.point_of_sale;
        }

        if let Some(date) = fields.issue_date {
            let delta = (date - record.issue_date).num_days().abs();
            if delta <= self.config.date_tolerance_days {
                matched.push(MatchField::IssueDate);
                points += w.issue_date;
            }
        }

        if fields.letter == Some(record.letter) {
            matched.push(MatchField::Letter);
            points += w.letter;
        }

        if let Some(total) = fields.total {
            let tolerance = (record.total.abs() * self.config.total_tolerance_ratio)
                .max(self.config.total_epsilon);
            if (total - record.total).abs() <= tolerance {
                matched.push(MatchField::Total);
                points += w.total;
            }
        }

        MatchScore {
            score: points as f32 / w.sum() as f32 * 100.0,
            matched_fields: matched,
        }
    }

    /// Full decision for one document: exact match, suggestion, manual, or
    /// no match.
    ///
    /// The returned `Matched`/`Suggestion` is a verdict only; persisting the
    /// link goes through [`Self::claim`], which re-checks the record is
    /// still pending.
    pub fn reconcile(&self, fields: &DocumentFields) -> Result<Outcome> {
        if let Some(key) = fields.key() {
            if let Some(record) = self.find_exact_match(&key)? {
                info!("exact match against expected invoice {}", record.id);
                return Ok(Outcome::Matched(record));
            }
        }

        let candidates = self.find_candidates(&fields.cuit, None, None, None)?;
        if candidates.is_empty() {
            debug!("no pending expected invoices for {}", fields.cuit);
            return Ok(Outcome::NoMatch);
        }

        let mut ranked: Vec<MatchCandidate> = candidates
            .into_iter()
            .map(|record| {
                let MatchScore { score, matched_fields } = self.score_partial_match(fields, &record);
                MatchCandidate {
                    record,
                    score,
                    matched_fields,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.record.id.cmp(&b.record.id))
        });

        let best_score = ranked[0].score;
        debug!(
            "{} candidate(s) for {}; best score {:.1}",
            ranked.len(),
            fields.cuit,
            best_score
        );

        if best_score >= self.config.suggest_threshold {
            let best = ranked.remove(0);
            Ok(Outcome::Suggestion { best, others: ranked })
        } else {
            Ok(Outcome::Manual(ranked))
        }
    }

    /// Persist a verdict: transition the record to `Matched` with linkage.
    ///
    /// Returns `false` when a concurrent document claimed the record first;
    /// the caller should re-run reconciliation in that case.
    pub fn claim(&self, record_id: i64, document_id: i64, invoice_id: Option<i64>) -> Result<bool> {
        let claimed = self.catalog.mark_matched(record_id, document_id, invoice_id)?;
        if !claimed {
            warn!(
                "expected invoice {} was no longer pending when claiming for document {}",
                record_id, document_id
            );
        }
        Ok(claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use fisco_core::Letter;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn cuit() -> Cuit {
        Cuit::parse("30-71057829-6").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(id: i64, letter: Letter, pos: u32, sequence: u64) -> ExpectedInvoiceRecord {
        ExpectedInvoiceRecord {
            id,
            cuit: cuit(),
            letter,
            point_of_sale: pos,
            sequence,
            issue_date: date(2024, 1, 15),
            total: dec("1500.00"),
            status: ExpectedStatus::Pending,
            matched_document_id: None,
            matched_invoice_id: None,
        }
    }

    fn fields() -> DocumentFields {
        DocumentFields {
            cuit: cuit(),
            letter: Some(Letter::B),
            point_of_sale: Some(1),
            sequence: Some(124),
            issue_date: Some(date(2024, 1, 15)),
            total: Some(dec("1500.00")),
        }
    }

    #[test]
    fn test_exact_match_accepted_and_claimed() {
        let catalog = MemoryCatalog::new();
        catalog.insert(record(10, Letter::B, 1, 124));
        let engine = ReconciliationEngine::new(catalog);

        let outcome = engine.reconcile(&fields()).unwrap();
        let Outcome::Matched(matched) = outcome else {
            panic!("expected exact match, got {:?}", outcome);
        };
        assert_eq!(matched.id, 10);

        assert!(engine.claim(10, 900, Some(77)).unwrap());
        let stored = engine.catalog().get(10).unwrap();
        assert_eq!(stored.status, ExpectedStatus::Matched);
        assert_eq!(stored.matched_document_id, Some(900));
    }

    #[test]
    fn test_exact_match_is_deterministic() {
        let catalog = MemoryCatalog::new();
        catalog.insert(record(10, Letter::B, 1, 124));
        let engine = ReconciliationEngine::new(catalog);

        let key = fields().key().unwrap();
        let first = engine.find_exact_match(&key).unwrap().unwrap();
        let second = engine.find_exact_match(&key).unwrap().unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_duplicate_exact_matches_resolve_to_lowest_id() {
        let catalog = MemoryCatalog::new();
        catalog.insert(record(9, Letter::B, 1, 124));
        catalog.insert(record(5, Letter::B, 1, 124));
        let engine = ReconciliationEngine::new(catalog);

        let matched = engine
            .find_exact_match(&fields().key().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(matched.id, 5);
    }

    #[test]
    fn test_partial_below_threshold_defers_to_manual() {
        // CUIT and date match, but the total is off by 15% and the
        // sequence differs: no exact match, score below 75.
        let catalog = MemoryCatalog::new();
        catalog.insert(record(3, Letter::B, 1, 124));
        let engine = ReconciliationEngine::new(catalog);

        let document = DocumentFields {
            sequence: Some(123),
            total: Some(dec("1725.00")),
            ..fields()
        };

        assert!(engine
            .find_exact_match(&document.key().unwrap())
            .unwrap()
            .is_none());

        let outcome = engine.reconcile(&document).unwrap();
        let Outcome::Manual(candidates) = outcome else {
            panic!("expected manual disposition, got {:?}", outcome);
        };
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].score < 75.0);
        assert!(!candidates[0].matched_fields.contains(&MatchField::Total));
        assert!(!candidates[0].matched_fields.contains(&MatchField::Sequence));
    }

    #[test]
    fn test_score_of_exactly_75_is_suggested() {
        // Letter and date disagree; cuit + total + pos + sequence = 75.
        let catalog = MemoryCatalog::new();
        catalog.insert(record(4, Letter::A, 1, 124));
        let engine = ReconciliationEngine::new(catalog);

        let document = DocumentFields {
            issue_date: Some(date(2024, 3, 1)),
            ..fields()
        };

        let outcome = engine.reconcile(&document).unwrap();
        let Outcome::Suggestion { best, others } = outcome else {
            panic!("expected suggestion, got {:?}", outcome);
        };
        assert_eq!(best.score, 75.0);
        assert_eq!(best.record.id, 4);
        assert!(others.is_empty());
    }

    #[test]
    fn test_score_of_74_defers_to_manual() {
        // Same agreement set as the 75 case, under a weight table that
        // prices it one point lower.
        let config = MatchConfig {
            weights: MatchWeights {
                cuit: 29,
                sequence: 20,
                point_of_sale: 15,
                issue_date: 16,
                letter: 10,
                total: 10,
            },
            ..MatchConfig::default()
        };

        let catalog = MemoryCatalog::new();
        catalog.insert(record(4, Letter::A, 1, 124));
        let engine = ReconciliationEngine::new(catalog).with_config(config);

        let document = DocumentFields {
            issue_date: Some(date(2024, 3, 1)),
            ..fields()
        };

        let outcome = engine.reconcile(&document).unwrap();
        let Outcome::Manual(candidates) = outcome else {
            panic!("expected manual disposition, got {:?}", outcome);
        };
        assert_eq!(candidates[0].score, 74.0);
    }

    #[test]
    fn test_zero_candidates_is_no_match() {
        let engine = ReconciliationEngine::new(MemoryCatalog::new());
        let outcome = engine.reconcile(&fields()).unwrap();
        assert_eq!(outcome, Outcome::NoMatch);
    }

    #[test]
    fn test_date_and_total_tolerances() {
        let catalog = MemoryCatalog::new();
        catalog.insert(record(1, Letter::B, 1, 124));
        let engine = ReconciliationEngine::new(catalog);

        // Within +/-7 days and +/-10%: both fields agree.
        let near = DocumentFields {
            issue_date: Some(date(2024, 1, 20)),
            total: Some(dec("1600.00")),
            ..fields()
        };
        let score = engine.score_partial_match(&near, &record(1, Letter::B, 1, 124));
        assert!(score.matched_fields.contains(&MatchField::IssueDate));
        assert!(score.matched_fields.contains(&MatchField::Total));
        assert_eq!(score.score, 100.0);

        // Just outside both tolerances.
        let far = DocumentFields {
            issue_date: Some(date(2024, 1, 23)),
            total: Some(dec("1651.00")),
            ..fields()
        };
        let score = engine.score_partial_match(&far, &record(1, Letter::B, 1, 124));
        assert!(!score.matched_fields.contains(&MatchField::IssueDate));
        assert!(!score.matched_fields.contains(&MatchField::Total));
    }

    #[test]
    fn test_claim_race_reports_false() {
        let catalog = MemoryCatalog::new();
        catalog.insert(record(10, Letter::B, 1, 124));
        catalog.mark_matched(10, 111, None).unwrap();

        let engine = ReconciliationEngine::new(catalog);
        assert!(!engine.claim(10, 222, None).unwrap());
    }
}
