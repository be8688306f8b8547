//! Document number extraction: (letter, point of sale, sequence).

use crate::doctype::Letter;

use super::patterns::{DOCNUM_LABELED, DOCNUM_LETTERED, POS_LABELED, SEQ_LABELED};
use super::ExtractedField;

/// A parsed document number.
///
/// The letter is whatever was printed next to the number; the classifier's
/// independently-determined type takes precedence when they disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocNumber {
    pub letter: Option<Letter>,
    pub point_of_sale: u32,
    pub sequence: u64,
}

/// Document number scanner.
///
/// Patterns are tried in priority order and the first match wins; the
/// shapes tolerate inconsistent separators and OCR-inserted spaces.
pub struct DocNumScanner;

impl DocNumScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Option<ExtractedField<DocNumber>> {
        // Full lettered form: "A-00001-00000123", "B 0001-00001234"
        if let Some(caps) = DOCNUM_LETTERED.captures(text) {
            let letter = Letter::from_char(caps[1].chars().next()?);
            let number = DocNumber {
                letter,
                point_of_sale: caps[2].parse().ok()?,
                sequence: caps[3].parse().ok()?,
            };
            let m = caps.get(0).unwrap();
            let mut field =
                ExtractedField::new(number, 0, m.as_str()).with_span(m.start(), m.end());
            field.adjust(30, "lettered number pattern");
            return Some(field);
        }

        // Labeled pair: "Comp. Nro: 00001-00000123"
        if let Some(caps) = DOCNUM_LABELED.captures(text) {
            let number = DocNumber {
                letter: None,
                point_of_sale: caps[1].parse().ok()?,
                sequence: caps[2].parse().ok()?,
            };
            let m = caps.get(0).unwrap();
            let mut field =
                ExtractedField::new(number, 0, m.as_str()).with_span(m.start(), m.end());
            field.adjust(20, "labeled number pattern");
            return Some(field);
        }

        // Separate labels: "Punto de Venta: 00001 ... Comp. Nro: 00000123"
        if let (Some(pos), Some(seq)) = (POS_LABELED.captures(text), SEQ_LABELED.captures(text)) {
            let number = DocNumber {
                letter: None,
                point_of_sale: pos[1].parse().ok()?,
                sequence: seq[1].parse().ok()?,
            };
            let m = pos.get(0).unwrap();
            let mut field =
                ExtractedField::new(number, 0, m.as_str()).with_span(m.start(), m.end());
            field.adjust(15, "separate point-of-sale and sequence labels");
            return Some(field);
        }

        None
    }
}

impl Default for DocNumScanner {
    fn default() -> Self {
        Self::new()
    }
}
