//! Common regex patterns for Argentine receipt extraction.
//!
//! Only fixed syntactic shapes live here; keyword rule tables are injected
//! configuration (see [`super::cuit::CuitContextRules`]).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CUIT shapes (separated and bare 11-digit)
    pub static ref CUIT_SEPARATED: Regex = Regex::new(
        r"\b(\d{2})[\s.\-]{1,2}(\d{8})[\s.\-]{1,2}(\d)\b"
    ).unwrap();

    pub static ref CUIT_BARE: Regex = Regex::new(
        r"\b\d{11}\b"
    ).unwrap();

    // Label immediately preceding a match; applied to the tail of the text
    // before the candidate.
    pub static ref CUIT_LABEL_BEFORE: Regex = Regex::new(
        r"(?i)c\.?u\.?i\.?t\.?\s*(?:n[°ºo]\.?\s*)?[:.]?\s*$"
    ).unwrap();

    // Date shapes
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_LONG_ES: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+de\s+(enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre)\s+(?:de\s+)?(\d{4})\b"
    ).unwrap();

    pub static ref ISSUE_LABEL_BEFORE: Regex = Regex::new(
        r"(?i)fecha\s+de\s+emisi[oó]n\s*[:.]?\s*$"
    ).unwrap();

    pub static ref DATE_LABEL_BEFORE: Regex = Regex::new(
        r"(?i)fecha\s*[:.]\s*$"
    ).unwrap();

    // Vocabulary that marks a date as NOT the issue date: payment due dates,
    // CAE expiration, billing periods, validity ranges.
    pub static ref DUE_VOCAB: Regex = Regex::new(
        r"(?i)vencimiento|vto\.?|\bcae\b|per[ií]odo|desde|hasta|v[aá]lid[oa]"
    ).unwrap();

    // Document/invoice number markers (date proximity bonus)
    pub static ref DOCNUM_MARKER: Regex = Regex::new(
        r"(?i)comp(?:robante)?\.|factura|nro\.?|n[°º]"
    ).unwrap();

    // Amount shapes (es-AR: '.' thousands separator, ',' decimal separator)
    pub static ref AMOUNT_AR: Regex = Regex::new(
        r"(\d{1,3}(?:\.\d{3})+|\d+),(\d{2})\b"
    ).unwrap();

    // Labeled totals, in priority order
    pub static ref IMPORTE_TOTAL_LABELED: Regex = Regex::new(
        r"(?i)\bimporte\s+total\s*[:=]?\s*\$?\s*((?:\d{1,3}(?:\.\d{3})+|\d+),\d{2})\b"
    ).unwrap();

    pub static ref TOTAL_A_PAGAR_LABELED: Regex = Regex::new(
        r"(?i)\btotal\s+a\s+pagar\s*[:=]?\s*\$?\s*((?:\d{1,3}(?:\.\d{3})+|\d+),\d{2})\b"
    ).unwrap();

    pub static ref TOTAL_LABELED: Regex = Regex::new(
        r"(?i)\btotal\s*[:=]?\s*\$?\s*((?:\d{1,3}(?:\.\d{3})+|\d+),\d{2})\b"
    ).unwrap();

    // Total-ish vocabulary, tolerant of common OCR letter substitution
    pub static ref TOTAL_VOCAB_LINE: Regex = Regex::new(
        r"(?i)t[o0]tal|imp[o0]rte|sald[o0]"
    ).unwrap();

    // Document number shapes: (letter, point of sale, sequence)
    pub static ref DOCNUM_LETTERED: Regex = Regex::new(
        r"\b([ABCEM])\s*[-–]?\s*(\d{4,5})\s*[-–]\s*(\d{6,8})\b"
    ).unwrap();

    pub static ref DOCNUM_LABELED: Regex = Regex::new(
        r"(?i)(?:comp(?:robante)?\.?\s*(?:nro|n[°ºo])\.?|nro\.?|n[°ºo]\.?)\s*[:.]?\s*(\d{4,5})\s*[-–]\s*(\d{6,8})\b"
    ).unwrap();

    pub static ref POS_LABELED: Regex = Regex::new(
        r"(?i)punto\s+de\s+venta\s*[:.]?\s*(\d{1,5})\b"
    ).unwrap();

    pub static ref SEQ_LABELED: Regex = Regex::new(
        r"(?i)comp(?:robante)?\.?\s*(?:nro|n[°ºo])\.?\s*[:.]?\s*(\d{1,8})\b"
    ).unwrap();
}
