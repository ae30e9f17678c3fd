//! Error types for the ACH engine.

use std::fmt;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, AchError>;

/// Errors that can occur while reading, building, validating or segmenting a file.
#[derive(Error, Debug)]
pub enum AchError {
    /// Failed to read from or write to the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed bytes; decoding of the whole file stops here
    #[error("line {line}: {source}")]
    Format {
        line: usize,
        #[source]
        source: FormatError,
    },

    /// First semantic rule violated by a file, batch or entry
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Unsupported combination detected while finalizing
    #[error("cannot finalize: {reason}")]
    Construction { reason: String },

    /// File cannot be split into credit and debit files
    #[error("cannot segment file: {reason}")]
    Segmentation { reason: String },
}

impl AchError {
    pub(crate) fn construction(reason: impl Into<String>) -> Self {
        AchError::Construction {
            reason: reason.into(),
        }
    }

    pub(crate) fn segmentation(reason: impl Into<String>) -> Self {
        AchError::Segmentation {
            reason: reason.into(),
        }
    }
}

/// Reasons a single 94-character line fails to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Line is not exactly 94 bytes long
    #[error("record must be 94 characters, found {0}")]
    WrongLength(usize),

    /// Line holds bytes outside ASCII, or bytes that are not UTF-8 at all
    #[error("record contains non-ASCII characters")]
    NonAscii,

    /// Leading type code (or addenda type) is not one the engine knows
    #[error("unrecognized record type code {0:?}")]
    UnknownRecordType(String),

    /// Mandatory numeric field holds something other than digits
    #[error("field {field} must be numeric, found {value:?}")]
    NotNumeric { field: &'static str, value: String },

    /// Well-formed record in a position the file layout does not allow
    #[error("unexpected {found} record: {context}")]
    UnexpectedRecord {
        found: &'static str,
        context: &'static str,
    },

    /// Input ended while a required record was still missing
    #[error("file ended before {0}")]
    Truncated(&'static str),
}

/// The rule a field broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Mandatory field is blank
    Required,
    /// Field must contain only digits
    Numeric,
    /// Field holds characters outside printable ASCII
    Alphanumeric,
    /// Leading or trailing spaces would be lost to the field padding
    Padding,
    /// Routing number check digit does not match
    RoutingChecksum,
    /// Value is outside the enumerated set of known codes
    UnknownCode(String),
    /// Date or time field is not a real YYMMDD / HHMM value
    InvalidDate(String),
    /// Value is outside its allowed range
    OutOfRange(String),
    /// Stored derived value disagrees with the recomputed one
    Mismatch { expected: String, found: String },
    /// Code combination not allowed for this batch
    NotPermitted(String),
    /// Trace number appears twice in one batch
    Duplicate(String),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "is required"),
            Rule::Numeric => write!(f, "must be numeric"),
            Rule::Alphanumeric => write!(f, "must be printable ASCII"),
            Rule::Padding => write!(f, "has leading or trailing spaces"),
            Rule::RoutingChecksum => write!(f, "has an invalid routing check digit"),
            Rule::UnknownCode(code) => write!(f, "has unknown code {:?}", code),
            Rule::InvalidDate(value) => write!(f, "has invalid date/time {:?}", value),
            Rule::OutOfRange(detail) => write!(f, "is out of range: {}", detail),
            Rule::Mismatch { expected, found } => {
                write!(f, "expected {} but found {}", expected, found)
            }
            Rule::NotPermitted(detail) => write!(f, "is not permitted: {}", detail),
            Rule::Duplicate(value) => write!(f, "duplicates {}", value),
        }
    }
}

/// A single violated rule, identified by the field that broke it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} {rule}")]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: Rule,
}

impl ValidationError {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        ValidationError { field, rule }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message_names_field() {
        let err = ValidationError::new("RDFIIdentification", Rule::RoutingChecksum);
        assert_eq!(
            err.to_string(),
            "RDFIIdentification has an invalid routing check digit"
        );
    }

    #[test]
    fn test_format_error_carries_line() {
        let err = AchError::Format {
            line: 3,
            source: FormatError::WrongLength(80),
        };
        assert_eq!(
            err.to_string(),
            "line 3: record must be 94 characters, found 80"
        );
    }
}
