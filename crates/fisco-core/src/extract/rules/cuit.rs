//! Contextual CUIT extraction.
//!
//! A receipt routinely carries two valid CUITs (issuer and counterparty);
//! without layout information the only robust discriminator is the
//! vocabulary surrounding each match, so every checksum-valid candidate is
//! scored against an injected rule table.

use tracing::debug;

use crate::cuit::Cuit;

use super::patterns::{CUIT_BARE, CUIT_LABEL_BEFORE, CUIT_SEPARATED};
use super::{score_context, ContextRule, ExtractedField, FieldExtractor};

/// Rule table for CUIT context scoring.
#[derive(Debug, Clone)]
pub struct CuitContextRules {
    /// Keyword rules applied to the window around each candidate.
    pub rules: Vec<ContextRule>,
    /// Window size in bytes on each side of the match.
    pub window: usize,
    /// Bonus for an explicit "CUIT:" label immediately preceding the match.
    pub label_bonus: i32,
}

impl Default for CuitContextRules {
    fn default() -> Self {
        Self {
            rules: vec![
                // Issuer-ish vocabulary
                ContextRule::new("gross receipts registration", &["ingresos brutos", "iibb"], 25, 160),
                ContextRule::new(
                    "start of activities",
                    &["inicio de actividades", "inicio de actividad"],
                    25,
                    160,
                ),
                ContextRule::new("issuer marker", &["emisor"], 20, 50),
                // Recipient-ish vocabulary
                ContextRule::new("customer salutation", &["señor", "sres", "sr."], -20, 80),
                ContextRule::new(
                    "customer section",
                    &["cliente", "apellido y nombre"],
                    -25,
                    120,
                ),
                ContextRule::new("national id", &["dni"], -15, 60),
            ],
            window: 200,
            label_bonus: 40,
        }
    }
}

/// CUIT candidate scanner.
pub struct CuitScanner {
    rules: CuitContextRules,
}

impl CuitScanner {
    /// Create a scanner with the production rule table.
    pub fn new() -> Self {
        Self {
            rules: CuitContextRules::default(),
        }
    }

    /// Create a scanner with an explicit rule table.
    pub fn with_rules(rules: CuitContextRules) -> Self {
        Self { rules }
    }

    fn candidate_spans(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans: Vec<(usize, usize)> = CUIT_SEPARATED
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();

        for m in CUIT_BARE.find_iter(text) {
            // Separated matches never overlap bare ones, but keep the scan
            // defensive against future pattern edits.
            if !spans.iter().any(|(s, e)| m.start() < *e && *s < m.end()) {
                spans.push((m.start(), m.end()));
            }
        }

        spans.sort_by_key(|(s, _)| *s);
        spans
    }
}

impl Default for CuitScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CuitScanner {
    type Output = ExtractedField<Cuit>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// All checksum-valid candidates, sorted by score descending.
    ///
    /// The sort is stable, so equal scores keep first-seen document order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for (start, end) in self.candidate_spans(text) {
            let source = &text[start..end];

            let cuit = match Cuit::parse(source) {
                Ok(cuit) => cuit,
                Err(err) => {
                    debug!("discarding CUIT candidate {:?}: {}", source, err);
                    continue;
                }
            };

            let mut field = ExtractedField::new(cuit, 0, source).with_span(start, end);

            let (delta, rationale) = score_context(text, (start, end), self.rules.window, &self.rules.rules);
            field.score += delta;
            field.rationale.extend(rationale);

            if CUIT_LABEL_BEFORE.is_match(&text[..start]) {
                field.adjust(self.rules.label_bonus, "explicit CUIT label");
            }

            results.push(field);
        }

        results.sort_by_key(|f| -f.score);
        results
    }
}
