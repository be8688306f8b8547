//! Confidence aggregation over extracted fields.

use crate::models::config::ConfidenceWeights;
use crate::models::extraction::REQUIRED_FIELD_COUNT;

/// Combine required-field presence into one confidence number and a
/// success flag.
///
/// `confidence = present/5 × ceiling`, where the ceiling depends on the
/// text profile and on whether a total was found. Downstream uses the flag
/// to gate manual review.
pub fn aggregate_confidence(
    present_required: u8,
    has_total: bool,
    weights: &ConfidenceWeights,
) -> (f32, bool) {
    let ceiling = if has_total {
        weights.max_with_total
    } else {
        weights.max_without_total
    };

    let confidence = f32::from(present_required.min(REQUIRED_FIELD_COUNT))
        / f32::from(REQUIRED_FIELD_COUNT)
        * ceiling;

    (confidence, confidence >= weights.success_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ScoreProfile;

    #[test]
    fn test_full_digital_extraction_scores_100() {
        let weights = ScoreProfile::digital().confidence;
        let (confidence, success) = aggregate_confidence(5, true, &weights);
        assert_eq!(confidence, 100.0);
        assert!(success);
    }

    #[test]
    fn test_scanned_ceiling_is_lower() {
        let weights = ScoreProfile::scanned().confidence;
        let (confidence, success) = aggregate_confidence(5, true, &weights);
        assert_eq!(confidence, 85.0);
        assert!(success);
    }

    #[test]
    fn test_missing_total_lowers_ceiling() {
        let weights = ScoreProfile::digital().confidence;
        let (with_total, _) = aggregate_confidence(4, true, &weights);
        let (without_total, _) = aggregate_confidence(4, false, &weights);
        assert!(without_total < with_total);
    }

    #[test]
    fn test_threshold_gates_success() {
        let weights = ScoreProfile::digital().confidence;

        // 3/5 without total: 54.0, below the 60.0 threshold.
        let (confidence, success) = aggregate_confidence(3, false, &weights);
        assert_eq!(confidence, 54.0);
        assert!(!success);

        // 4/5 without total: 72.0, above it.
        let (_, success) = aggregate_confidence(4, false, &weights);
        assert!(success);
    }

    #[test]
    fn test_zero_fields_zero_confidence() {
        let weights = ScoreProfile::scanned().confidence;
        let (confidence, success) = aggregate_confidence(0, false, &weights);
        assert_eq!(confidence, 0.0);
        assert!(!success);
    }
}
