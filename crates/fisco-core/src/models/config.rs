//! Weight and threshold profiles for the extraction pipeline.
//!
//! Digital text and OCR text run the same algorithm with different
//! constants; everything that differs between the two lives here, as plain
//! data, so the tables are independently testable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of text a document produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextProfile {
    /// Text layer read directly from a digitally-generated document.
    #[default]
    Digital,
    /// OCR output from a scanned document.
    Scanned,
}

/// Full weight/threshold table for one [`TextProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreProfile {
    pub dates: DateWeights,
    pub amounts: AmountWeights,
    pub confidence: ConfidenceWeights,
}

impl ScoreProfile {
    /// The production table for a given text profile.
    pub fn for_profile(profile: TextProfile) -> Self {
        match profile {
            TextProfile::Digital => Self::digital(),
            TextProfile::Scanned => Self::scanned(),
        }
    }

    /// Weights tuned for clean digital text.
    pub fn digital() -> Self {
        Self {
            dates: DateWeights {
                base: 10,
                labeled_issue_bonus: 60,
                labeled_generic_bonus: 25,
                month_name_bonus: 15,
                repeat_bonus: 8,
                near_number_bonus: 10,
                due_penalty: -70,
                stale_penalty: -20,
                stale_after_days: 900,
                context_window: 60,
            },
            amounts: AmountWeights {
                min_total: Decimal::new(1000, 2), // 10.00
                tail_fraction: 0.7,
                tail_bonus: 15,
                vocab_line_bonus: 30,
                largest_bonus: 20,
                magnitude_bonus: 2,
            },
            confidence: ConfidenceWeights {
                max_with_total: 100.0,
                max_without_total: 90.0,
                success_threshold: 60.0,
            },
        }
    }

    /// Weights tuned for noisier OCR text: labels are trusted less,
    /// repetition more, and the attainable confidence ceiling is lower.
    pub fn scanned() -> Self {
        Self {
            dates: DateWeights {
                base: 10,
                labeled_issue_bonus: 45,
                labeled_generic_bonus: 18,
                month_name_bonus: 12,
                repeat_bonus: 10,
                near_number_bonus: 8,
                due_penalty: -55,
                stale_penalty: -15,
                stale_after_days: 900,
                context_window: 80,
            },
            amounts: AmountWeights {
                min_total: Decimal::new(1000, 2),
                tail_fraction: 0.65,
                tail_bonus: 12,
                vocab_line_bonus: 25,
                largest_bonus: 22,
                magnitude_bonus: 2,
            },
            confidence: ConfidenceWeights {
                max_with_total: 85.0,
                max_without_total: 70.0,
                success_threshold: 60.0,
            },
        }
    }
}

/// Scoring weights for issue-date candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateWeights {
    /// Base score every parseable date candidate starts with.
    pub base: i32,

    /// An explicit issuance label ("Fecha de Emisión") next to the date.
    pub labeled_issue_bonus: i32,

    /// A generic "Fecha:" label next to the date.
    pub labeled_generic_bonus: i32,

    /// The date is written with a natural-language month name.
    pub month_name_bonus: i32,

    /// Per extra occurrence of the exact same date elsewhere.
    pub repeat_bonus: i32,

    /// A document-number marker close to the date.
    pub near_number_bonus: i32,

    /// Due-date / CAE-expiration / period vocabulary in the window.
    pub due_penalty: i32,

    /// The date is older than `stale_after_days` relative to processing
    /// time; such dates are usually registration dates.
    pub stale_penalty: i32,
    pub stale_after_days: i64,

    /// Context window in bytes on each side of the match.
    pub context_window: usize,
}

/// Scoring weights for total-amount candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountWeights {
    /// Values below this are never considered a plausible total.
    pub min_total: Decimal,

    /// Start of the document tail, as a fraction of total length.
    pub tail_fraction: f32,

    /// The candidate sits in the document tail.
    pub tail_bonus: i32,

    /// Total-ish vocabulary on the same line (OCR-substitution tolerant).
    pub vocab_line_bonus: i32,

    /// The candidate is the single largest qualifying value.
    pub largest_bonus: i32,

    /// Per order of magnitude of the value.
    pub magnitude_bonus: i32,
}

/// Confidence ceiling and acceptance threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    /// Attainable confidence when a total was found.
    pub max_with_total: f32,

    /// Attainable confidence without a total.
    pub max_without_total: f32,

    /// Minimum confidence for `success = true`; downstream gates manual
    /// review on this flag.
    pub success_threshold: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanned_ceiling_below_digital() {
        let digital = ScoreProfile::digital();
        let scanned = ScoreProfile::scanned();

        assert!(scanned.confidence.max_with_total < digital.confidence.max_with_total);
        assert!(scanned.confidence.max_without_total < digital.confidence.max_without_total);
    }

    #[test]
    fn test_total_raises_ceiling() {
        for profile in [ScoreProfile::digital(), ScoreProfile::scanned()] {
            assert!(profile.confidence.max_with_total > profile.confidence.max_without_total);
        }
    }
}
