//! Entry Detail (`6`) record and its addenda.

use crate::addenda::{Addenda, Addenda02, Addenda05, Addenda99};
use crate::amount;
use crate::codes::{Category, Flavor, TransactionCode};
use crate::error::{self, FormatError};
use crate::field::{self, Fields};
use crate::header::BatchHeader;
use crate::validate::{self, ValidateOpts};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single payment instruction to or from one receiver account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub transaction_code: TransactionCode,

    /// First 8 digits of the receiving DFI routing number
    pub rdfi_identification: String,

    /// Ninth digit of the receiving DFI routing number
    pub check_digit: String,

    pub dfi_account_number: String,

    /// Integer cents
    pub amount: i64,

    pub identification_number: String,
    pub individual_name: String,
    pub discretionary_data: String,

    /// 1 when addenda follow this entry, set by `Batch::finalize`
    pub addenda_record_indicator: u8,

    /// 8-digit ODFI prefix followed by a 7-digit sequence
    pub trace_number: String,

    pub addenda: Vec<Addenda>,

    /// Not part of the record layout; derived from the addenda on read
    pub category: Category,
}

impl EntryDetail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a 9-digit routing number into identification and check digit.
    pub fn set_rdfi(&mut self, routing_number: &str) {
        let digits = field::digits(routing_number, 9);
        self.rdfi_identification = digits.chars().take(8).collect();
        self.check_digit = digits.chars().skip(8).collect();
    }

    /// Full 9-digit receiving DFI routing number.
    pub fn rdfi(&self) -> String {
        format!("{}{}", self.rdfi_identification, self.check_digit)
    }

    /// Builds the trace number from the first 8 digits of `odfi` and `sequence`.
    pub fn set_trace_number(&mut self, odfi: &str, sequence: u32) {
        self.trace_number = format!(
            "{}{}",
            field::digits(odfi, 8),
            field::numeric(sequence.into(), 7)
        );
    }

    /// Last seven digits of the trace number, or 0 when it is not numeric.
    pub fn trace_sequence(&self) -> u32 {
        let len = self.trace_number.len();
        self.trace_number
            .get(len.saturating_sub(7)..)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    pub fn flavor(&self) -> Option<Flavor> {
        self.transaction_code.flavor()
    }

    pub fn amount_dollars(&self) -> Decimal {
        amount::to_dollars(self.amount)
    }

    pub fn add_addenda05(&mut self, addenda: Addenda05) {
        self.addenda.push(Addenda::PaymentRelated(addenda));
    }

    /// Replaces any terminal addenda already present.
    pub fn set_addenda02(&mut self, addenda: Addenda02) {
        self.addenda.retain(|a| !matches!(a, Addenda::Terminal(_)));
        self.addenda.insert(0, Addenda::Terminal(addenda));
    }

    /// Attaches a return addenda and marks the entry as a return.
    pub fn set_addenda99(&mut self, addenda: Addenda99) {
        self.addenda.retain(|a| !matches!(a, Addenda::Return(_)));
        self.addenda.push(Addenda::Return(addenda));
        self.category = Category::Return;
    }

    pub fn addenda02(&self) -> Option<&Addenda02> {
        self.addenda.iter().find_map(|a| match a {
            Addenda::Terminal(a) => Some(a),
            _ => None,
        })
    }

    pub fn addenda05(&self) -> impl Iterator<Item = &Addenda05> {
        self.addenda.iter().filter_map(|a| match a {
            Addenda::PaymentRelated(a) => Some(a),
            _ => None,
        })
    }

    /// Checks this entry against the header of the batch it belongs to.
    ///
    /// Trace uniqueness and control totals are batch-level checks and are not covered here.
    pub fn validate(&self, header: &BatchHeader, opts: &ValidateOpts) -> error::Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        validate::entry(self, header, opts)?;
        Ok(())
    }

    pub fn addenda99(&self) -> Option<&Addenda99> {
        self.addenda.iter().find_map(|a| match a {
            Addenda::Return(a) => Some(a),
            _ => None,
        })
    }

    /// Points every addenda at this entry's trace number and renumbers type 05 records.
    pub(crate) fn sequence_addenda(&mut self) {
        let trace = self.trace_number.clone();
        let entry_sequence = self.trace_sequence();
        let mut next = 1u16;
        for addenda in &mut self.addenda {
            match addenda {
                Addenda::Terminal(a) => a.trace_number = trace.clone(),
                Addenda::Return(a) => a.trace_number = trace.clone(),
                Addenda::PaymentRelated(a) => {
                    a.addenda_sequence_number = next;
                    a.entry_detail_sequence_number = entry_sequence;
                    next = next.saturating_add(1);
                }
            }
        }
        self.addenda_record_indicator = u8::from(!self.addenda.is_empty());
    }

    pub(crate) fn parse(f: &Fields<'_>) -> Result<Self, FormatError> {
        Ok(EntryDetail {
            transaction_code: TransactionCode(f.number("TransactionCode", 2, 3)?),
            rdfi_identification: f.alpha(4, 11),
            check_digit: f.alpha(12, 12),
            dfi_account_number: f.alpha(13, 29),
            amount: f.number("Amount", 30, 39)?,
            identification_number: f.alpha(40, 54),
            individual_name: f.alpha(55, 76),
            discretionary_data: f.alpha(77, 78),
            addenda_record_indicator: f.number("AddendaRecordIndicator", 79, 79)?,
            trace_number: f.alpha(80, 94),
            addenda: Vec::new(),
            category: Category::Forward,
        })
    }

    /// Encodes the entry line only; addenda are written as their own records.
    ///
    /// Negative amounts are not representable and encode as zero.
    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(field::RECORD_LENGTH);
        line.push('6');
        line.push_str(&field::numeric(self.transaction_code.0.into(), 2));
        line.push_str(&field::digits(&self.rdfi_identification, 8));
        line.push_str(&field::digits(&self.check_digit, 1));
        line.push_str(&field::alpha(&self.dfi_account_number, 17));
        line.push_str(&field::numeric(
            u64::try_from(self.amount).unwrap_or_default(),
            10,
        ));
        line.push_str(&field::alpha(&self.identification_number, 15));
        line.push_str(&field::alpha(&self.individual_name, 22));
        line.push_str(&field::alpha(&self.discretionary_data, 2));
        line.push_str(&field::numeric(self.addenda_record_indicator.into(), 1));
        line.push_str(&field::digits(&self.trace_number, 15));
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREDIT_ENTRY: &str = "62223138010481967038518      0001000000ABC##jvkdjfuiwnWade Arnold             1123456780000001";

    fn credit_entry() -> EntryDetail {
        let mut entry = EntryDetail::new();
        entry.transaction_code = TransactionCode::CHECKING_CREDIT;
        entry.set_rdfi("231380104");
        entry.dfi_account_number = "81967038518".to_string();
        entry.amount = 1_000_000;
        entry.individual_name = "Wade Arnold".to_string();
        entry.identification_number = "ABC##jvkdjfuiwn".to_string();
        entry.set_trace_number("12345678", 1);
        entry.addenda_record_indicator = 1;
        entry
    }

    #[test]
    fn test_entry_layout() {
        let line = credit_entry().to_line();
        assert_eq!(line, CREDIT_ENTRY);
        assert_eq!(line.len(), 94);
    }

    #[test]
    fn test_entry_parse_matches_builder() {
        let parsed = EntryDetail::parse(&Fields::new(CREDIT_ENTRY).unwrap()).unwrap();
        assert_eq!(parsed, credit_entry());
        assert_eq!(parsed.rdfi(), "231380104");
        assert_eq!(parsed.amount_dollars().to_string(), "10000.00");
    }

    #[test]
    fn test_set_rdfi_splits_by_character() {
        let mut entry = credit_entry();
        entry.set_rdfi("2313801é4");
        assert_eq!(entry.rdfi_identification, "2313801é");
        assert_eq!(entry.check_digit, "4");
        assert!(entry.validate(&BatchHeader::new(), &ValidateOpts::default()).is_err());

        entry.set_rdfi("12345");
        assert_eq!(entry.rdfi(), "000012345");
    }

    #[test]
    fn test_set_trace_number_pads_sequence() {
        let mut entry = EntryDetail::new();
        entry.set_trace_number("121042882", 1);
        assert_eq!(entry.trace_number, "121042880000001");
        assert_eq!(entry.trace_sequence(), 1);
    }

    #[test]
    fn test_validate_against_batch_header() {
        let mut header = BatchHeader::new();
        header.odfi_identification = "12345678".to_string();
        let entry = credit_entry();
        assert!(entry.validate(&header, &ValidateOpts::default()).is_err());

        let mut entry = entry;
        entry.addenda_record_indicator = 0;
        assert!(entry.validate(&header, &ValidateOpts::default()).is_ok());
    }

    #[test]
    fn test_sequence_addenda_sets_indicator_and_numbers() {
        let mut entry = credit_entry();
        entry.addenda_record_indicator = 0;
        entry.add_addenda05(Addenda05::new());
        entry.add_addenda05(Addenda05::new());
        entry.sequence_addenda();

        assert_eq!(entry.addenda_record_indicator, 1);
        let numbers: Vec<_> = entry
            .addenda05()
            .map(|a| (a.addenda_sequence_number, a.entry_detail_sequence_number))
            .collect();
        assert_eq!(numbers, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn test_set_addenda99_marks_return() {
        let mut entry = credit_entry();
        entry.set_addenda99(Addenda99 {
            return_code: "R01".to_string(),
            ..Addenda99::new()
        });
        assert_eq!(entry.category, Category::Return);
        assert_eq!(entry.addenda99().map(|a| a.return_code.as_str()), Some("R01"));
    }
}
