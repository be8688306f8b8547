//! CUIT (Argentine tax identifier) validation and normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CuitError;

/// Per-position multipliers for the modulo-11 check digit, applied to the
/// first 10 digits.
const CHECK_WEIGHTS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

/// Two-digit prefixes assigned to natural persons.
const NATURAL_PREFIXES: [u32; 4] = [20, 23, 24, 27];

/// Two-digit prefixes assigned to legal persons.
const LEGAL_PREFIXES: [u32; 3] = [30, 33, 34];

/// Kind of taxpayer the CUIT prefix identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderKind {
    /// Natural person (prefixes 20, 23, 24, 27).
    Natural,
    /// Legal person (prefixes 30, 33, 34).
    Legal,
    /// Prefix outside the known sets.
    Unknown,
}

/// A checksum-validated CUIT in canonical hyphenated form (`PP-DDDDDDDD-C`).
///
/// Values can only be constructed through [`Cuit::parse`], so holding a
/// `Cuit` is proof the checksum held at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cuit(String);

impl Cuit {
    /// Parse and normalize a raw CUIT.
    ///
    /// Accepts any separator style (hyphens, dots, spaces, none). Fails with
    /// [`CuitError::InvalidFormat`] when the input is not 11 digits once
    /// separators are stripped, and [`CuitError::ChecksumMismatch`] when the
    /// check digit does not match.
    pub fn parse(raw: &str) -> Result<Self, CuitError> {
        let digits = collect_digits(raw).ok_or_else(|| CuitError::InvalidFormat(raw.to_string()))?;

        if digits[10] != check_digit(&digits[..10]) {
            return Err(CuitError::ChecksumMismatch(raw.to_string()));
        }

        let flat: String = digits.iter().map(|d| char::from(b'0' + *d as u8)).collect();
        Ok(Self(format!("{}-{}-{}", &flat[0..2], &flat[2..10], &flat[10..11])))
    }

    /// Canonical hyphenated representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-digit holder prefix.
    pub fn prefix(&self) -> u32 {
        self.0[0..2].parse().unwrap_or(0)
    }

    /// Classify the holder from the prefix alone.
    pub fn holder_kind(&self) -> HolderKind {
        let prefix = self.prefix();
        if NATURAL_PREFIXES.contains(&prefix) {
            HolderKind::Natural
        } else if LEGAL_PREFIXES.contains(&prefix) {
            HolderKind::Legal
        } else {
            HolderKind::Unknown
        }
    }
}

impl fmt::Display for Cuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cuit {
    type Err = CuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cuit {
    type Error = CuitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Cuit> for String {
    fn from(cuit: Cuit) -> Self {
        cuit.0
    }
}

/// Validate a raw CUIT using the modulo-11 checksum.
pub fn validate_cuit(raw: &str) -> bool {
    collect_digits(raw).is_some_and(|d| d[10] == check_digit(&d[..10]))
}

/// Strip separators and collect exactly 11 digits, rejecting any other
/// character.
fn collect_digits(raw: &str) -> Option<Vec<u32>> {
    let mut digits = Vec::with_capacity(11);

    for c in raw.chars() {
        if c.is_ascii_digit() {
            digits.push(c.to_digit(10).unwrap_or(0));
        } else if !c.is_whitespace() && !matches!(c, '-' | '.') {
            return None;
        }
    }

    (digits.len() == 11).then_some(digits)
}

/// Compute the expected check digit over the first 10 digits.
///
/// `sum = Σ digit[i]·weight[i]`, `rem = sum mod 11`; the check digit is 0
/// when the remainder is 0, 9 when it is 1, and `11 - rem` otherwise.
fn check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip(CHECK_WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();

    match sum % 11 {
        0 => 0,
        1 => 9,
        rem => 11 - rem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cuit_valid() {
        assert!(validate_cuit("30-71057829-6"));
        assert!(validate_cuit("30710578296")); // No separators
        assert!(validate_cuit("30 71057829 6")); // With spaces
        assert!(validate_cuit("30.71057829.6")); // With dots
    }

    #[test]
    fn test_validate_cuit_invalid() {
        assert!(!validate_cuit("30-71057829-5")); // Wrong check digit
        assert!(!validate_cuit("3071057829")); // Too short
        assert!(!validate_cuit("307105782966")); // Too long
        assert!(!validate_cuit("30-7105782x-6")); // Non-digit
        assert!(!validate_cuit(""));
    }

    #[test]
    fn test_check_digit_remainder_edge_cases() {
        // sum % 11 == 0 -> check digit 0
        assert!(validate_cuit("27-12345678-0"));
        // sum % 11 == 1 -> check digit 9
        assert!(validate_cuit("20-00000001-9"));
    }

    #[test]
    fn test_parse_normalizes() {
        let cuit = Cuit::parse("30710578296").unwrap();
        assert_eq!(cuit.as_str(), "30-71057829-6");

        let cuit = Cuit::parse("30 71057829 6").unwrap();
        assert_eq!(cuit.as_str(), "30-71057829-6");
    }

    #[test]
    fn test_parse_idempotent() {
        let first = Cuit::parse("20.12345678.6").unwrap();
        let second = Cuit::parse(first.as_str()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Cuit::parse("12345"),
            Err(CuitError::InvalidFormat(_))
        ));
        assert!(matches!(
            Cuit::parse("30-71057829-5"),
            Err(CuitError::ChecksumMismatch(_))
        ));
    }

    #[test]
    fn test_holder_kind() {
        assert_eq!(
            Cuit::parse("20-12345678-6").unwrap().holder_kind(),
            HolderKind::Natural
        );
        assert_eq!(
            Cuit::parse("27-12345678-0").unwrap().holder_kind(),
            HolderKind::Natural
        );
        assert_eq!(
            Cuit::parse("30-71057829-6").unwrap().holder_kind(),
            HolderKind::Legal
        );
        assert_eq!(
            Cuit::parse("50-12345678-2").unwrap().holder_kind(),
            HolderKind::Unknown
        );
    }
}
