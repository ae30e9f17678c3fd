//! Batch Control (`8`) and File Control (`9`) records.

use crate::amount;
use crate::codes::ServiceClassCode;
use crate::error::FormatError;
use crate::field::{self, Fields};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entry hashes are summed modulo this value to fit the 10-digit field.
pub const ENTRY_HASH_MODULUS: u64 = 10_000_000_000;

/// Batch Control record: totals over the entries of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchControl {
    pub service_class_code: ServiceClassCode,

    /// Entries plus addenda records
    pub entry_addenda_count: u32,

    /// Sum of RDFI identifications, mod 10^10
    pub entry_hash: u64,

    /// Cents
    pub total_debit: i64,

    /// Cents
    pub total_credit: i64,

    pub company_identification: String,
    pub message_authentication_code: String,
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl BatchControl {
    pub(crate) fn parse(f: &Fields<'_>) -> Result<Self, FormatError> {
        Ok(BatchControl {
            service_class_code: ServiceClassCode(f.number("ServiceClassCode", 2, 4)?),
            entry_addenda_count: f.number("EntryAddendaCount", 5, 10)?,
            entry_hash: f.number("EntryHash", 11, 20)?,
            total_debit: f.number("TotalDebitEntryDollarAmount", 21, 32)?,
            total_credit: f.number("TotalCreditEntryDollarAmount", 33, 44)?,
            company_identification: f.alpha(45, 54),
            message_authentication_code: f.alpha(55, 73),
            odfi_identification: f.alpha(80, 87),
            batch_number: f.number("BatchNumber", 88, 94)?,
        })
    }

    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(field::RECORD_LENGTH);
        line.push('8');
        line.push_str(&field::numeric(self.service_class_code.0.into(), 3));
        line.push_str(&field::numeric(self.entry_addenda_count.into(), 6));
        line.push_str(&field::numeric(self.entry_hash, 10));
        line.push_str(&field::numeric(cents(self.total_debit), 12));
        line.push_str(&field::numeric(cents(self.total_credit), 12));
        line.push_str(&field::alpha(&self.company_identification, 10));
        line.push_str(&field::alpha(&self.message_authentication_code, 19));
        line.push_str(&field::alpha("", 6));
        line.push_str(&field::digits(&self.odfi_identification, 8));
        line.push_str(&field::numeric(self.batch_number.into(), 7));
        line
    }
}

/// File Control record: totals over every batch in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileControl {
    pub batch_count: u32,

    /// Number of 10-record blocks, filler included
    pub block_count: u32,

    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit: i64,
    pub total_credit: i64,
}

impl FileControl {
    pub fn total_debit_dollars(&self) -> Decimal {
        amount::to_dollars(self.total_debit)
    }

    pub fn total_credit_dollars(&self) -> Decimal {
        amount::to_dollars(self.total_credit)
    }

    pub(crate) fn parse(f: &Fields<'_>) -> Result<Self, FormatError> {
        Ok(FileControl {
            batch_count: f.number("BatchCount", 2, 7)?,
            block_count: f.number("BlockCount", 8, 13)?,
            entry_addenda_count: f.number("EntryAddendaCount", 14, 21)?,
            entry_hash: f.number("EntryHash", 22, 31)?,
            total_debit: f.number("TotalDebitEntryDollarAmountInFile", 32, 43)?,
            total_credit: f.number("TotalCreditEntryDollarAmountInFile", 44, 55)?,
        })
    }

    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(field::RECORD_LENGTH);
        line.push('9');
        line.push_str(&field::numeric(self.batch_count.into(), 6));
        line.push_str(&field::numeric(self.block_count.into(), 6));
        line.push_str(&field::numeric(self.entry_addenda_count.into(), 8));
        line.push_str(&field::numeric(self.entry_hash, 10));
        line.push_str(&field::numeric(cents(self.total_debit), 12));
        line.push_str(&field::numeric(cents(self.total_credit), 12));
        line.push_str(&field::alpha("", 39));
        line
    }
}

fn cents(amount: i64) -> u64 {
    u64::try_from(amount).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_control_layout() {
        let control = BatchControl {
            service_class_code: ServiceClassCode::CREDITS_ONLY,
            entry_addenda_count: 2,
            entry_hash: 23_138_010,
            total_debit: 0,
            total_credit: 1_000_000,
            company_identification: "121042882".to_string(),
            message_authentication_code: String::new(),
            odfi_identification: "12104288".to_string(),
            batch_number: 1,
        };
        let line = control.to_line();
        assert_eq!(line.len(), 94);
        assert!(line.starts_with("82200000020023138010000000000000000001000000121042882 "));
        assert!(line.ends_with("121042880000001"));

        let parsed = BatchControl::parse(&Fields::new(&line).unwrap()).unwrap();
        assert_eq!(parsed, control);
    }

    #[test]
    fn test_file_control_layout() {
        let control = FileControl {
            batch_count: 2,
            block_count: 1,
            entry_addenda_count: 4,
            entry_hash: 46_276_020,
            total_debit: 799,
            total_credit: 1_000_000,
        };
        let line = control.to_line();
        assert_eq!(line.len(), 94);
        assert!(line.starts_with("9000002000001000000040046276020000000000799000001000000"));
        assert_eq!(control.total_debit_dollars().to_string(), "7.99");
    }
}
