//! Rule-based field extractors for Argentine receipts.

pub mod amounts;
pub mod cuit;
pub mod dates;
pub mod docnum;
pub mod patterns;

pub use amounts::{parse_amount_ar, TotalScanner};
pub use cuit::{CuitContextRules, CuitScanner};
pub use dates::DateScanner;
pub use docnum::{DocNumScanner, DocNumber};

use serde::{Deserialize, Serialize};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the best candidate from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all candidates, best first.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A scored field candidate.
///
/// Multiple candidates of the same field coexist while scanning; exactly one
/// winner survives per document. The rationale records every scoring
/// decision for later audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedField<T> {
    /// Extracted value.
    pub value: T,
    /// Numeric score; higher wins.
    pub score: i32,
    /// Byte span in the source text.
    pub span: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
    /// Human-readable scoring rationale, one entry per applied rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rationale: Vec<String>,
}

impl<T> ExtractedField<T> {
    pub fn new(value: T, score: i32, source: impl Into<String>) -> Self {
        Self {
            value,
            score,
            span: None,
            source: source.into(),
            rationale: Vec::new(),
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }

    /// Apply a score delta and record why.
    pub fn adjust(&mut self, delta: i32, reason: impl Into<String>) {
        self.score += delta;
        self.rationale.push(format!("{:+}: {}", delta, reason.into()));
    }
}

/// One contextual scoring rule: keyword vocabulary, a score delta, and the
/// maximum distance at which it applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextRule {
    /// Short rule name, used in rationales.
    pub name: String,
    /// Keywords, matched case-insensitively.
    pub keywords: Vec<String>,
    /// Score delta when any keyword lands within range.
    pub delta: i32,
    /// Maximum distance in bytes between keyword and candidate.
    pub within: usize,
}

impl ContextRule {
    pub fn new(name: &str, keywords: &[&str], delta: i32, within: usize) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            delta,
            within,
        }
    }
}

/// Score a candidate from its surrounding window and a rule table.
///
/// Pure function of its inputs: for every rule, the nearest keyword
/// occurrence inside the window is measured against the candidate span and
/// the rule's delta applied when it is in range. Returns the total delta and
/// one rationale line per applied rule.
pub fn score_context(
    text: &str,
    span: (usize, usize),
    window: usize,
    rules: &[ContextRule],
) -> (i32, Vec<String>) {
    let win_start = floor_char_boundary(text, span.0.saturating_sub(window));
    let win_end = ceil_char_boundary(text, (span.1 + window).min(text.len()));
    let window_text = text[win_start..win_end].to_lowercase();

    // Candidate position relative to the window
    let cand_start = span.0 - win_start;
    let cand_end = span.1 - win_start;

    let mut total = 0;
    let mut rationale = Vec::new();

    for rule in rules {
        let mut nearest: Option<usize> = None;

        for keyword in &rule.keywords {
            let needle = keyword.to_lowercase();
            for (pos, matched) in window_text.match_indices(&needle) {
                let kw_end = pos + matched.len();
                let distance = if kw_end <= cand_start {
                    cand_start - kw_end
                } else if pos >= cand_end {
                    pos - cand_end
                } else {
                    0
                };
                nearest = Some(nearest.map_or(distance, |d| d.min(distance)));
            }
        }

        if let Some(distance) = nearest {
            if distance <= rule.within {
                total += rule.delta;
                rationale.push(format!(
                    "{:+}: {} ({} chars away)",
                    rule.delta, rule.name, distance
                ));
            }
        }
    }

    (total, rationale)
}

/// Snap a byte offset down to the nearest char boundary.
fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Snap a byte offset up to the nearest char boundary.
fn ceil_char_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_context_applies_rules_in_range() {
        let rules = vec![
            ContextRule::new("issuer vocab", &["ingresos brutos"], 25, 160),
            ContextRule::new("customer vocab", &["cliente"], -20, 80),
        ];

        let text = "Ingresos Brutos: 901-123 CUIT 30-71057829-6";
        let start = text.find("30-71057829-6").unwrap();
        let (delta, rationale) = score_context(text, (start, start + 13), 200, &rules);

        assert_eq!(delta, 25);
        assert_eq!(rationale.len(), 1);
        assert!(rationale[0].contains("issuer vocab"));
    }

    #[test]
    fn test_score_context_out_of_range_keyword_ignored() {
        let rules = vec![ContextRule::new("near only", &["total"], 10, 5)];

        let text = "total ............................ 123";
        let start = text.find("123").unwrap();
        let (delta, _) = score_context(text, (start, start + 3), 200, &rules);
        assert_eq!(delta, 0);
    }

    #[test]
    fn test_score_context_nearest_occurrence_wins() {
        let rules = vec![ContextRule::new("kw", &["cliente"], -20, 10)];

        // Two occurrences; only the near one is in range.
        let text = "cliente .................... cliente X";
        let start = text.find('X').unwrap();
        let (delta, _) = score_context(text, (start, start + 1), 200, &rules);
        assert_eq!(delta, -20);
    }

    #[test]
    fn test_adjust_records_rationale() {
        let mut field = ExtractedField::new(42u32, 10, "42");
        field.adjust(5, "repeated elsewhere");
        field.adjust(-3, "stale");

        assert_eq!(field.score, 12);
        assert_eq!(field.rationale.len(), 2);
        assert!(field.rationale[0].starts_with("+5"));
    }
}
