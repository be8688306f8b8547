//! Document type classification for Argentine fiscal receipts.
//!
//! Maps the government-assigned numeric code (AFIP/ARCA) to a
//! (letter, kind) pair, with a textual fallback for documents where no
//! numeric code survived OCR.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, FiscoError};

lazy_static! {
    // "Cód. 01", "CODIGO N° 006"
    static ref TYPE_CODE_LABELED: Regex = Regex::new(
        r"(?i)c[oó]d(?:igo)?\.?\s*(?:n[°ºo]?\.?\s*)?0*(\d{1,3})\b"
    ).unwrap();

    // "11 - Factura C", "08 – Nota de Crédito B"
    static ref TYPE_CODE_DASHED: Regex = Regex::new(
        r"(?i)\b0*(\d{1,3})\s*[-–]\s*(?:factura|nota\s+de\s+cr[eé]dito|nota\s+de\s+d[eé]bito)"
    ).unwrap();

    // Letter following the type wording
    static ref PHRASE_INVOICE: Regex = Regex::new(
        r#"(?i)factura\s*[:"]?\s*([ABCEM])\b"#
    ).unwrap();
    static ref PHRASE_CREDIT: Regex = Regex::new(
        r"(?i)nota\s+de\s+cr[eé]dito\s*[:]?\s*([ABCEM])\b"
    ).unwrap();
    static ref PHRASE_DEBIT: Regex = Regex::new(
        r"(?i)nota\s+de\s+d[eé]bito\s*[:]?\s*([ABCEM])\b"
    ).unwrap();

    // OCR noise: a letter glued to a zero-padded code ("01A", "006B")
    static ref GLUED_CODE_LETTER: Regex = Regex::new(
        r"\b0+(\d{1,2})([ABCEM])\b"
    ).unwrap();
}

/// Receipt letter printed on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    E,
    M,
}

impl Letter {
    /// Parse from a single character, case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'E' => Some(Letter::E),
            'M' => Some(Letter::M),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::E => 'E',
            Letter::M => 'M',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Coarse kind of fiscal document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    /// Factura.
    Invoice,
    /// Nota de crédito.
    CreditNote,
    /// Nota de débito.
    DebitNote,
}

/// One row of the code table: a government code and what it denotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocType {
    /// Government-assigned numeric code.
    pub code: u16,
    /// Receipt letter.
    pub letter: Letter,
    /// Document kind.
    pub kind: DocKind,
    /// Short display code (e.g. "FC-A").
    pub short: String,
}

/// How a document type was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// From a numeric code found in the text (preferred).
    Code,
    /// From a textual phrase pattern (fallback).
    Text,
}

/// A classified document type plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTypeMatch {
    pub doc_type: DocType,
    pub method: ClassificationMethod,
}

/// The code table, supplied as configuration data.
///
/// New codes are data additions; nothing in the classifier is derived from
/// the code values themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocTypeTable {
    rows: Vec<DocType>,
}

impl Default for DocTypeTable {
    fn default() -> Self {
        let row = |code, letter, kind, short: &str| DocType {
            code,
            letter,
            kind,
            short: short.to_string(),
        };

        Self {
            rows: vec![
                row(1, Letter::A, DocKind::Invoice, "FC-A"),
                row(2, Letter::A, DocKind::DebitNote, "ND-A"),
                row(3, Letter::A, DocKind::CreditNote, "NC-A"),
                row(6, Letter::B, DocKind::Invoice, "FC-B"),
                row(7, Letter::B, DocKind::DebitNote, "ND-B"),
                row(8, Letter::B, DocKind::CreditNote, "NC-B"),
                row(11, Letter::C, DocKind::Invoice, "FC-C"),
                row(12, Letter::C, DocKind::DebitNote, "ND-C"),
                row(13, Letter::C, DocKind::CreditNote, "NC-C"),
                row(19, Letter::E, DocKind::Invoice, "FC-E"),
                row(20, Letter::E, DocKind::DebitNote, "ND-E"),
                row(21, Letter::E, DocKind::CreditNote, "NC-E"),
                row(51, Letter::M, DocKind::Invoice, "FC-M"),
                row(52, Letter::M, DocKind::DebitNote, "ND-M"),
                row(53, Letter::M, DocKind::CreditNote, "NC-M"),
            ],
        }
    }
}

impl DocTypeTable {
    /// Build a table from explicit rows.
    pub fn from_rows(rows: Vec<DocType>) -> Result<Self, FiscoError> {
        if rows.is_empty() {
            return Err(ExtractionError::InvalidTypeTable("empty table".to_string()).into());
        }
        Ok(Self { rows })
    }

    /// Load a table from its JSON representation (an array of rows).
    pub fn from_json(json: &str) -> Result<Self, FiscoError> {
        let rows: Vec<DocType> =
            serde_json::from_str(json).map_err(|e| FiscoError::Config(e.to_string()))?;
        Self::from_rows(rows)
    }

    /// Exact lookup by numeric code.
    pub fn by_code(&self, code: u16) -> Option<&DocType> {
        self.rows.iter().find(|r| r.code == code)
    }

    /// Lookup by a raw textual code, normalizing away leading zeros.
    pub fn from_code(&self, raw: &str) -> Option<&DocType> {
        let trimmed = raw.trim().trim_start_matches('0');
        let code: u16 = if trimmed.is_empty() {
            0
        } else {
            trimmed.parse().ok()?
        };
        self.by_code(code)
    }

    /// Reverse lookup from (letter, kind) to the code row.
    pub fn by_letter_kind(&self, letter: Letter, kind: DocKind) -> Option<&DocType> {
        self.rows.iter().find(|r| r.letter == letter && r.kind == kind)
    }

    /// Classify from textual phrase patterns, in priority order.
    pub fn from_text(&self, text: &str) -> Option<&DocType> {
        let phrase_patterns: [(&Regex, DocKind); 3] = [
            (&PHRASE_CREDIT, DocKind::CreditNote),
            (&PHRASE_DEBIT, DocKind::DebitNote),
            (&PHRASE_INVOICE, DocKind::Invoice),
        ];

        for (pattern, kind) in phrase_patterns {
            if let Some(caps) = pattern.captures(text) {
                let letter = Letter::from_char(caps[1].chars().next()?)?;
                if let Some(row) = self.by_letter_kind(letter, kind) {
                    return Some(row);
                }
            }
        }

        // OCR noise: letter glued to a zero-padded code prefix. The code
        // prefix decides the kind; the glued letter picks the row.
        if let Some(caps) = GLUED_CODE_LETTER.captures(text) {
            let letter = Letter::from_char(caps[2].chars().next()?)?;
            if let Some(by_code) = self.from_code(&caps[1]) {
                if by_code.letter == letter {
                    return Some(by_code);
                }
                return self.by_letter_kind(letter, by_code.kind);
            }
        }

        None
    }

    /// Classify a document, preferring numeric codes over letters.
    ///
    /// Numeric codes are issued by the tax authority and survive OCR better
    /// than a stylized letter, so when both are present and disagree the
    /// code wins.
    pub fn extract_with_fallback(&self, text: &str) -> Option<DocTypeMatch> {
        for pattern in [&*TYPE_CODE_LABELED, &*TYPE_CODE_DASHED] {
            if let Some(caps) = pattern.captures(text) {
                if let Some(row) = self.from_code(&caps[1]) {
                    return Some(DocTypeMatch {
                        doc_type: row.clone(),
                        method: ClassificationMethod::Code,
                    });
                }
            }
        }

        self.from_text(text).map(|row| DocTypeMatch {
            doc_type: row.clone(),
            method: ClassificationMethod::Text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_exact() {
        let table = DocTypeTable::default();

        let row = table.from_code("1").unwrap();
        assert_eq!(row.letter, Letter::A);
        assert_eq!(row.kind, DocKind::Invoice);

        let row = table.from_code("011").unwrap();
        assert_eq!(row.letter, Letter::C);
        assert_eq!(row.kind, DocKind::Invoice);

        assert!(table.from_code("99").is_none());
        assert!(table.from_code("000").is_none());
    }

    #[test]
    fn test_from_text_phrases() {
        let table = DocTypeTable::default();

        let row = table.from_text("FACTURA B").unwrap();
        assert_eq!(row.code, 6);

        let row = table.from_text("Nota de Crédito A").unwrap();
        assert_eq!(row.code, 3);

        let row = table.from_text("NOTA DE DEBITO C").unwrap();
        assert_eq!(row.code, 12);

        assert!(table.from_text("Recibo X").is_none());
    }

    #[test]
    fn test_from_text_glued_code() {
        let table = DocTypeTable::default();

        // "006B" -> code 6, letter B
        let row = table.from_text("COMPROBANTE 006B ORIGINAL").unwrap();
        assert_eq!(row.code, 6);
    }

    #[test]
    fn test_code_wins_over_conflicting_letter() {
        let table = DocTypeTable::default();

        // Numeric code 11 (Factura C) and a bare "A" elsewhere: code wins.
        let text = "ORIGINAL\n11 - Factura C\nDuplicado A entregado";
        let m = table.extract_with_fallback(text).unwrap();
        assert_eq!(m.doc_type.letter, Letter::C);
        assert_eq!(m.method, ClassificationMethod::Code);

        // Labeled code beats the phrase letter outright.
        let text = "Cód. 06\nFACTURA A";
        let m = table.extract_with_fallback(text).unwrap();
        assert_eq!(m.doc_type.letter, Letter::B);
        assert_eq!(m.method, ClassificationMethod::Code);
    }

    #[test]
    fn test_fallback_to_text() {
        let table = DocTypeTable::default();

        let m = table.extract_with_fallback("FACTURA A N° 0001-00001234").unwrap();
        assert_eq!(m.doc_type.code, 1);
        assert_eq!(m.method, ClassificationMethod::Text);
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"[
            {"code": 1, "letter": "A", "kind": "invoice", "short": "FC-A"},
            {"code": 99, "letter": "C", "kind": "credit_note", "short": "NC-X"}
        ]"#;

        let table = DocTypeTable::from_json(json).unwrap();
        assert_eq!(table.by_code(99).unwrap().letter, Letter::C);

        assert!(DocTypeTable::from_json("[]").is_err());
    }
}
