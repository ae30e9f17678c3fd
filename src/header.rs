//! File Header (`1`) and Batch Header (`5`) records.

use crate::codes::{SecCode, ServiceClassCode};
use crate::error::FormatError;
use crate::field::{self, Fields};
use serde::{Deserialize, Serialize};

/// File Header record: identifies sender, receiver and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub priority_code: u8,

    /// Routing number of the receiving point, usually 9 digits
    pub immediate_destination: String,

    /// Routing number of the sending point, usually 9 digits
    pub immediate_origin: String,

    /// YYMMDD
    pub file_creation_date: String,

    /// HHMM, may be blank
    pub file_creation_time: String,

    /// Distinguishes files created on the same date, `A`-`Z` or `0`-`9`
    pub file_id_modifier: String,

    pub record_size: u16,
    pub blocking_factor: u8,
    pub format_code: u8,
    pub immediate_destination_name: String,
    pub immediate_origin_name: String,
    pub reference_code: String,
}

impl FileHeader {
    /// Creates a header with the fixed NACHA constants filled in.
    pub fn new() -> Self {
        FileHeader {
            priority_code: 1,
            immediate_destination: String::new(),
            immediate_origin: String::new(),
            file_creation_date: String::new(),
            file_creation_time: String::new(),
            file_id_modifier: "A".to_string(),
            record_size: 94,
            blocking_factor: 10,
            format_code: 1,
            immediate_destination_name: String::new(),
            immediate_origin_name: String::new(),
            reference_code: String::new(),
        }
    }

    pub(crate) fn parse(f: &Fields<'_>) -> Result<Self, FormatError> {
        Ok(FileHeader {
            priority_code: f.number("PriorityCode", 2, 3)?,
            immediate_destination: f.justified(4, 13),
            immediate_origin: f.justified(14, 23),
            file_creation_date: f.alpha(24, 29),
            file_creation_time: f.alpha(30, 33),
            file_id_modifier: f.alpha(34, 34),
            record_size: f.number("RecordSize", 35, 37)?,
            blocking_factor: f.number("BlockingFactor", 38, 39)?,
            format_code: f.number("FormatCode", 40, 40)?,
            immediate_destination_name: f.alpha(41, 63),
            immediate_origin_name: f.alpha(64, 86),
            reference_code: f.alpha(87, 94),
        })
    }

    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(field::RECORD_LENGTH);
        line.push('1');
        line.push_str(&field::numeric(self.priority_code.into(), 2));
        line.push_str(&field::justified(&self.immediate_destination, 10));
        line.push_str(&field::justified(&self.immediate_origin, 10));
        line.push_str(&field::alpha(&self.file_creation_date, 6));
        line.push_str(&field::alpha(&self.file_creation_time, 4));
        line.push_str(&field::alpha(&self.file_id_modifier, 1));
        line.push_str(&field::numeric(self.record_size.into(), 3));
        line.push_str(&field::numeric(self.blocking_factor.into(), 2));
        line.push_str(&field::numeric(self.format_code.into(), 1));
        line.push_str(&field::alpha(&self.immediate_destination_name, 23));
        line.push_str(&field::alpha(&self.immediate_origin_name, 23));
        line.push_str(&field::alpha(&self.reference_code, 8));
        line
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Batch Header record: originator and payment type shared by every entry in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchHeader {
    pub service_class_code: ServiceClassCode,
    pub company_name: String,
    pub company_discretionary_data: String,
    pub company_identification: String,
    pub standard_entry_class_code: SecCode,
    pub company_entry_description: String,
    pub company_descriptive_date: String,

    /// YYMMDD date the originator wants the entries to settle
    pub effective_entry_date: String,

    /// Julian day, filled in by the ACH operator; blank on origination
    pub settlement_date: String,

    pub originator_status_code: String,

    /// Originating DFI routing number; only the first 8 digits are written
    pub odfi_identification: String,

    /// Assigned by `File::finalize` when left at 0
    pub batch_number: u32,
}

impl BatchHeader {
    pub fn new() -> Self {
        BatchHeader {
            service_class_code: ServiceClassCode::MIXED_DEBITS_AND_CREDITS,
            company_name: String::new(),
            company_discretionary_data: String::new(),
            company_identification: String::new(),
            standard_entry_class_code: SecCode::Ppd,
            company_entry_description: String::new(),
            company_descriptive_date: String::new(),
            effective_entry_date: String::new(),
            settlement_date: String::new(),
            originator_status_code: "1".to_string(),
            odfi_identification: String::new(),
            batch_number: 0,
        }
    }

    /// The 8-digit ODFI prefix used in trace numbers and control records.
    pub fn odfi_prefix(&self) -> String {
        field::digits(&self.odfi_identification, 8)
    }

    pub(crate) fn parse(f: &Fields<'_>) -> Result<Self, FormatError> {
        Ok(BatchHeader {
            service_class_code: ServiceClassCode(f.number("ServiceClassCode", 2, 4)?),
            company_name: f.alpha(5, 20),
            company_discretionary_data: f.alpha(21, 40),
            company_identification: f.alpha(41, 50),
            standard_entry_class_code: SecCode::from(f.alpha(51, 53)),
            company_entry_description: f.alpha(54, 63),
            company_descriptive_date: f.alpha(64, 69),
            effective_entry_date: f.alpha(70, 75),
            settlement_date: f.alpha(76, 78),
            originator_status_code: f.alpha(79, 79),
            odfi_identification: f.alpha(80, 87),
            batch_number: f.number("BatchNumber", 88, 94)?,
        })
    }

    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(field::RECORD_LENGTH);
        line.push('5');
        line.push_str(&field::numeric(self.service_class_code.0.into(), 3));
        line.push_str(&field::alpha(&self.company_name, 16));
        line.push_str(&field::alpha(&self.company_discretionary_data, 20));
        line.push_str(&field::alpha(&self.company_identification, 10));
        line.push_str(&field::alpha(self.standard_entry_class_code.as_str(), 3));
        line.push_str(&field::alpha(&self.company_entry_description, 10));
        line.push_str(&field::alpha(&self.company_descriptive_date, 6));
        line.push_str(&field::alpha(&self.effective_entry_date, 6));
        line.push_str(&field::alpha(&self.settlement_date, 3));
        line.push_str(&field::alpha(&self.originator_status_code, 1));
        line.push_str(&self.odfi_prefix());
        line.push_str(&field::numeric(self.batch_number.into(), 7));
        line
    }
}

impl Default for BatchHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_HEADER: &str = "101 231380104 1210428822610191200A094101Federal Reserve Bank   My Bank Name           12345678";
    const BATCH_HEADER: &str = "5200Your Company                        121042882 PPDTrans. Des      261020   1121042880000001";

    #[test]
    fn test_file_header_layout() {
        let mut header = FileHeader::new();
        header.immediate_destination = "231380104".to_string();
        header.immediate_origin = "121042882".to_string();
        header.file_creation_date = "261019".to_string();
        header.file_creation_time = "1200".to_string();
        header.immediate_destination_name = "Federal Reserve Bank".to_string();
        header.immediate_origin_name = "My Bank Name".to_string();
        header.reference_code = "12345678".to_string();

        assert_eq!(header.to_line(), FILE_HEADER);
        assert_eq!(header.to_line().len(), 94);
    }

    #[test]
    fn test_file_header_parse_trims_padding() {
        let fields = Fields::new(FILE_HEADER).unwrap();
        let header = FileHeader::parse(&fields).unwrap();
        assert_eq!(header.immediate_destination, "231380104");
        assert_eq!(header.immediate_origin_name, "My Bank Name");
        assert_eq!(header.record_size, 94);
        assert_eq!(header.to_line(), FILE_HEADER);
    }

    #[test]
    fn test_batch_header_truncates_odfi_to_eight_digits() {
        let mut header = BatchHeader::new();
        header.company_name = "Your Company".to_string();
        header.company_identification = "121042882".to_string();
        header.company_entry_description = "Trans. Description".to_string();
        header.effective_entry_date = "261020".to_string();
        header.odfi_identification = "121042882".to_string();
        header.batch_number = 1;

        assert_eq!(header.to_line(), BATCH_HEADER);
        assert_eq!(header.odfi_prefix(), "12104288");
    }

    #[test]
    fn test_batch_header_rejects_non_numeric_service_class() {
        let line = BATCH_HEADER.replacen("5200", "52X0", 1);
        let fields = Fields::new(&line).unwrap();
        assert!(matches!(
            BatchHeader::parse(&fields),
            Err(FormatError::NotNumeric {
                field: "ServiceClassCode",
                ..
            })
        ));
    }
}
