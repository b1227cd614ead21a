#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Prefix prepended to the first nine NPI digits before the check digit is
/// computed (the ISO card issuer prefix for US health identifiers).
pub const NPI_CHECK_PREFIX: &str = "80840";

/// Luhn check digit over `80840` followed by `first_nine`.
///
/// Digits at odd positions counted from the right (1-based) are doubled,
/// with 9 subtracted from doubled values above 9.
///
/// Returns `None` when `first_nine` is not exactly nine ASCII digits.
pub fn npi_check_digit(first_nine: &str) -> Option<u8> {
    if first_nine.len() != 9 || !first_nine.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(luhn_check(first_nine.bytes().map(|b| b - b'0')))
}

fn luhn_check(first_nine: impl Iterator<Item = u8>) -> u8 {
    let digits: Vec<u8> = NPI_CHECK_PREFIX
        .bytes()
        .map(|b| b - b'0')
        .chain(first_nine)
        .collect();
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(offset, &digit)| {
            let digit = u32::from(digit);
            if offset % 2 == 0 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

/// National Provider Identifier: ten digits, the last being the check digit.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Npi(String);

impl Npi {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(ModelError::InvalidNpi(value))
        }
    }

    /// Build an NPI from its first nine digits by appending the check digit.
    pub fn from_first_nine(first_nine: &str) -> Result<Self, ModelError> {
        let check = npi_check_digit(first_nine)
            .ok_or_else(|| ModelError::InvalidNpi(first_nine.to_string()))?;
        Ok(Self(format!("{first_nine}{check}")))
    }

    /// Build an NPI from nine digit values (each reduced modulo 10).
    pub fn from_digits(first_nine: [u8; 9]) -> Self {
        let digits = first_nine.map(|d| d % 10);
        let check = luhn_check(digits.into_iter());
        let value = digits
            .into_iter()
            .chain(std::iter::once(check))
            .map(|d| char::from(b'0' + d))
            .collect();
        Self(value)
    }

    pub fn is_valid(value: &str) -> bool {
        if value.len() != 10 {
            return false;
        }
        let (first_nine, last) = value.split_at(9);
        match (npi_check_digit(first_nine), last.parse::<u8>()) {
            (Some(expected), Ok(actual)) => expected == actual,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Npi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Npi {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Npi> for String {
    fn from(value: Npi) -> Self {
        value.0
    }
}

/// Box 24E diagnosis pointer: a letter `A..=F` naming one box 21 entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DiagnosisPointer(u8);

impl DiagnosisPointer {
    /// Highest pointer letter the service-line column can carry.
    pub const MAX_LETTERS: u8 = 6;

    pub fn from_index(index: u8) -> Result<Self, ModelError> {
        if index < Self::MAX_LETTERS {
            Ok(Self(index))
        } else {
            Err(ModelError::PointerIndex(index))
        }
    }

    /// Pointer for `index`, saturating at the last letter.
    pub fn saturating(index: usize) -> Self {
        let last = usize::from(Self::MAX_LETTERS - 1);
        Self(index.min(last) as u8)
    }

    /// Zero-based position in the diagnosis list.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn letter(self) -> char {
        char::from(b'A' + self.0)
    }
}

impl fmt::Display for DiagnosisPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl TryFrom<u8> for DiagnosisPointer {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<DiagnosisPointer> for u8 {
    fn from(value: DiagnosisPointer) -> Self {
        value.0
    }
}

/// Whole-dollar amount. Charges on generated claims never carry cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Dollars(pub u32);

impl Dollars {
    pub fn amount(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Dollars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.00", self.0)
    }
}

impl std::iter::Sum for Dollars {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Dollars(iter.map(|d| d.0).sum())
    }
}
