//! Monetary total extraction.
//!
//! Amounts use the es-AR locale: `.` as thousands separator, `,` as decimal
//! separator (`1.965.244,64`).

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::config::AmountWeights;

use super::patterns::{
    AMOUNT_AR, IMPORTE_TOTAL_LABELED, TOTAL_A_PAGAR_LABELED, TOTAL_LABELED, TOTAL_VOCAB_LINE,
};
use super::ExtractedField;

/// Parse an es-AR formatted amount (`"1.965.244,64"` -> `1965244.64`).
pub fn parse_amount_ar(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = cleaned.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Total-amount scanner, parametrized by a weight table.
pub struct TotalScanner<'a> {
    weights: &'a AmountWeights,
}

impl<'a> TotalScanner<'a> {
    pub fn new(weights: &'a AmountWeights) -> Self {
        Self { weights }
    }

    /// The winning total candidate.
    ///
    /// Labeled patterns are tried first in priority order; the heuristic
    /// whole-document scan only runs when no label matched.
    pub fn extract(&self, text: &str) -> Option<ExtractedField<Decimal>> {
        self.labeled(text).or_else(|| self.heuristic(text))
    }

    fn labeled(&self, text: &str) -> Option<ExtractedField<Decimal>> {
        let labels: [(&Regex, &str); 3] = [
            (&IMPORTE_TOTAL_LABELED, "importe total label"),
            (&TOTAL_A_PAGAR_LABELED, "total a pagar label"),
            (&TOTAL_LABELED, "total label"),
        ];

        for (pattern, name) in labels {
            for caps in pattern.captures_iter(text) {
                let Some(value) = parse_amount_ar(&caps[1]) else {
                    continue;
                };
                if value < self.weights.min_total {
                    continue;
                }

                let m = caps.get(0).unwrap();
                let mut field =
                    ExtractedField::new(value, 0, m.as_str()).with_span(m.start(), m.end());
                field.adjust(self.weights.vocab_line_bonus, name);
                return Some(field);
            }
        }

        None
    }

    /// Score every qualifying amount in the document.
    fn heuristic(&self, text: &str) -> Option<ExtractedField<Decimal>> {
        let w = self.weights;
        let tail_start = (text.len() as f32 * w.tail_fraction) as usize;

        let mut candidates: Vec<ExtractedField<Decimal>> = Vec::new();

        for m in AMOUNT_AR.find_iter(text) {
            let Some(value) = parse_amount_ar(m.as_str()) else {
                continue;
            };
            if value < w.min_total {
                continue;
            }

            let mut field =
                ExtractedField::new(value, 0, m.as_str()).with_span(m.start(), m.end());

            if m.start() >= tail_start {
                field.adjust(w.tail_bonus, "in document tail");
            }

            if TOTAL_VOCAB_LINE.is_match(line_of(text, m.start())) {
                field.adjust(w.vocab_line_bonus, "total vocabulary on line");
            }

            let digits = value.trunc().to_string().len() as i32;
            field.adjust(w.magnitude_bonus * digits, "order of magnitude");

            candidates.push(field);
        }

        if candidates.is_empty() {
            return None;
        }

        // Bonus for being the single largest qualifying value.
        let max_value = candidates.iter().map(|c| c.value).max().unwrap_or_default();
        if candidates.iter().filter(|c| c.value == max_value).count() == 1 {
            if let Some(field) = candidates.iter_mut().find(|c| c.value == max_value) {
                field.adjust(w.largest_bonus, "largest value in document");
            }
        }

        candidates.sort_by_key(|c| -c.score);
        candidates.into_iter().next()
    }
}

/// The line containing byte offset `pos`.
fn line_of(text: &str, pos: usize) -> &str {
    let start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);
    &text[start..end]
}
