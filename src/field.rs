//! Fixed-width field slicing and padding.
//!
//! Positions follow the NACHA layout tables: 1-based and inclusive, so the
//! record type code of every record lives at `(1, 1)`.

use crate::error::FormatError;
use std::str::FromStr;

/// Every ACH record is exactly this many characters.
pub const RECORD_LENGTH: usize = 94;

/// Read-only view over one 94-character record.
pub(crate) struct Fields<'a> {
    line: &'a str,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(line: &'a str) -> Result<Self, FormatError> {
        if !line.is_ascii() {
            return Err(FormatError::NonAscii);
        }
        if line.len() != RECORD_LENGTH {
            return Err(FormatError::WrongLength(line.len()));
        }
        Ok(Fields { line })
    }

    pub(crate) fn raw(&self, start: usize, end: usize) -> &'a str {
        &self.line[start - 1..end]
    }

    /// Alphanumeric field with its right-hand space padding removed.
    pub(crate) fn alpha(&self, start: usize, end: usize) -> String {
        self.raw(start, end).trim_end_matches(' ').to_string()
    }

    /// Field that is right-justified with leading spaces.
    pub(crate) fn justified(&self, start: usize, end: usize) -> String {
        self.raw(start, end).trim_start_matches(' ').to_string()
    }

    /// Mandatory numeric field; every position must be a digit.
    pub(crate) fn number<T: FromStr>(
        &self,
        field: &'static str,
        start: usize,
        end: usize,
    ) -> Result<T, FormatError> {
        let raw = self.raw(start, end);
        let not_numeric = || FormatError::NotNumeric {
            field,
            value: raw.to_string(),
        };
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(not_numeric());
        }
        raw.parse::<T>().map_err(|_| not_numeric())
    }
}

/// Right-pads with spaces, truncating anything past `width`.
pub(crate) fn alpha(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

/// Left-pads with spaces, truncating anything past `width`.
pub(crate) fn justified(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{:>width$}", truncated, width = width)
}

/// Left-pads with zeros. Values wider than the field keep their rightmost digits.
pub(crate) fn numeric(value: u64, width: usize) -> String {
    let s = format!("{:0width$}", value, width = width);
    s[s.len() - width..].to_string()
}

/// Digit string left-padded with zeros, truncated to its leftmost `width` characters.
pub(crate) fn digits(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{:0>width$}", truncated, width = width)
}

pub(crate) fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
