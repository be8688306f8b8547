//! Issue-date extraction.
//!
//! Receipts carry several dates (issue, CAE expiration, due date, billing
//! period, registration dates); every mention is collected as a candidate
//! and scored, and the best one wins.

use chrono::NaiveDate;

use crate::models::config::DateWeights;

use super::patterns::{
    DATE_LABEL_BEFORE, DATE_LONG_ES, DATE_NUMERIC, DOCNUM_MARKER, DUE_VOCAB, ISSUE_LABEL_BEFORE,
};
use super::ExtractedField;

/// Date candidate scanner, parametrized by a weight table and the
/// processing date (injected so scoring is a pure function of its inputs).
pub struct DateScanner<'a> {
    weights: &'a DateWeights,
    today: NaiveDate,
}

impl<'a> DateScanner<'a> {
    pub fn new(weights: &'a DateWeights, today: NaiveDate) -> Self {
        Self { weights, today }
    }

    /// The winning issue-date candidate, if any date was found.
    ///
    /// Ties prefer the most recent date.
    pub fn extract(&self, text: &str) -> Option<ExtractedField<NaiveDate>> {
        let mut candidates = self.collect(text);
        if candidates.is_empty() {
            return None;
        }

        // Repetition bonus: the issue date tends to be printed more than
        // once (header and CAE block), unlike due dates.
        let dates: Vec<NaiveDate> = candidates.iter().map(|c| c.value).collect();
        for candidate in &mut candidates {
            let repeats = dates.iter().filter(|d| **d == candidate.value).count() - 1;
            if repeats > 0 {
                candidate.adjust(
                    self.weights.repeat_bonus * repeats as i32,
                    format!("repeated {} more time(s)", repeats),
                );
            }
        }

        candidates.sort_by(|a, b| b.score.cmp(&a.score).then(b.value.cmp(&a.value)));
        candidates.into_iter().next()
    }

    /// All date candidates with their base and context scores.
    pub fn collect(&self, text: &str) -> Vec<ExtractedField<NaiveDate>> {
        let mut results = Vec::new();

        for caps in DATE_NUMERIC.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let m = caps.get(0).unwrap();
                results.push(self.scored(text, date, m.start(), m.end(), false));
            }
        }

        for caps in DATE_LONG_ES.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = spanish_month_to_number(&caps[2]);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let m = caps.get(0).unwrap();
                results.push(self.scored(text, date, m.start(), m.end(), true));
            }
        }

        results
    }

    fn scored(
        &self,
        text: &str,
        date: NaiveDate,
        start: usize,
        end: usize,
        month_name: bool,
    ) -> ExtractedField<NaiveDate> {
        let w = self.weights;
        let mut field =
            ExtractedField::new(date, w.base, &text[start..end]).with_span(start, end);

        if month_name {
            field.adjust(w.month_name_bonus, "natural-language month");
        }

        let before = &text[..start];
        if ISSUE_LABEL_BEFORE.is_match(before) {
            field.adjust(w.labeled_issue_bonus, "issuance label");
        } else if DATE_LABEL_BEFORE.is_match(before) {
            field.adjust(w.labeled_generic_bonus, "generic date label");
        }

        let window = self.window(text, start, end);
        if DUE_VOCAB.is_match(window) {
            field.adjust(w.due_penalty, "due/expiration/period vocabulary nearby");
        }
        if DOCNUM_MARKER.is_match(window) {
            field.adjust(w.near_number_bonus, "document number marker nearby");
        }

        let age_days = (self.today - date).num_days();
        if age_days > w.stale_after_days {
            field.adjust(w.stale_penalty, format!("{} days old", age_days));
        }

        field
    }

    fn window<'t>(&self, text: &'t str, start: usize, end: usize) -> &'t str {
        let mut s = start.saturating_sub(self.weights.context_window);
        while s > 0 && !text.is_char_boundary(s) {
            s -= 1;
        }
        let mut e = (end + self.weights.context_window).min(text.len());
        while e < text.len() && !text.is_char_boundary(e) {
            e += 1;
        }
        &text[s..e]
    }
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn spanish_month_to_number(month: &str) -> u32 {
    match month.to_lowercase().as_str() {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => 0,
    }
}
