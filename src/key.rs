//! Decoder for the packed `reputation_key` field.
//!
//! A key is a run of `<letter><integer>` segments such as `A29B0C10000D8`. Each
//! letter `A`..`K` names one sub-score; segment order does not matter.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("reputation key segment {letter} has non-integer value {value:?}")]
    InvalidValue { letter: char, value: String },
    #[error("reputation key segment {letter} value {value} does not fit in an unsigned 64-bit integer")]
    Overflow { letter: char, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyField {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
}

impl KeyField {
    pub const ALL: [KeyField; 11] = [
        KeyField::A,
        KeyField::B,
        KeyField::C,
        KeyField::D,
        KeyField::E,
        KeyField::F,
        KeyField::G,
        KeyField::H,
        KeyField::I,
        KeyField::J,
        KeyField::K,
    ];

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'A'..='K' => Some(Self::ALL[(c as u8 - b'A') as usize]),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Output column name (`field_a` .. `field_k`)
    pub fn column(self) -> &'static str {
        match self {
            KeyField::A => "field_a",
            KeyField::B => "field_b",
            KeyField::C => "field_c",
            KeyField::D => "field_d",
            KeyField::E => "field_e",
            KeyField::F => "field_f",
            KeyField::G => "field_g",
            KeyField::H => "field_h",
            KeyField::I => "field_i",
            KeyField::J => "field_j",
            KeyField::K => "field_k",
        }
    }
}

/// Decoded sub-scores of a reputation key. Unset letters are `None`.
///
/// Values are unsigned: a segment must be one or more ASCII digits, so a sign
/// is a format error like any other non-digit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReputationKey {
    values: [Option<u64>; 11],
}

impl ReputationKey {
    /// Single left-to-right scan. Text before the first letter is dropped and a
    /// repeated letter overwrites the earlier value.
    pub fn decode(key: &str) -> Result<Self, KeyError> {
        let mut decoded = Self::default();
        let mut current: Option<KeyField> = None;
        let mut digits = String::new();

        for c in key.chars() {
            if let Some(field) = KeyField::from_letter(c) {
                if let Some(active) = current {
                    decoded.close(active, &digits)?;
                    digits.clear();
                }
                current = Some(field);
            } else if current.is_some() {
                digits.push(c);
            }
        }

        if let Some(active) = current {
            decoded.close(active, &digits)?;
        }

        Ok(decoded)
    }

    fn close(&mut self, field: KeyField, digits: &str) -> Result<(), KeyError> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(KeyError::InvalidValue {
                letter: field.letter(),
                value: digits.to_string(),
            });
        }
        // only overflow is left to fail
        let value = digits.parse::<u64>().map_err(|_| KeyError::Overflow {
            letter: field.letter(),
            value: digits.to_string(),
        })?;
        self.set(field, value);
        Ok(())
    }

    pub fn get(&self, field: KeyField) -> Option<u64> {
        self.values[field as usize]
    }

    fn set(&mut self, field: KeyField, value: u64) {
        self.values[field as usize] = Some(value);
    }

    /// Set fields in `A`..`K` order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyField, u64)> + '_ {
        KeyField::ALL
            .iter()
            .filter_map(|&field| self.get(field).map(|value| (field, value)))
    }
}

impl FromStr for ReputationKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Re-encodes the set fields, e.g. `A10B20`.
impl fmt::Display for ReputationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, value) in self.iter() {
            write!(f, "{}{}", field.letter(), value)?;
        }
        Ok(())
    }
}
