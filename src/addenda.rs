//! Addenda (`7`) records attached to an entry.

use crate::error::FormatError;
use crate::field::{self, Fields};
use serde::{Deserialize, Serialize};

/// Any addenda record, tagged by its two-digit type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Addenda {
    /// Type 02: point-of-sale terminal information
    Terminal(Addenda02),
    /// Type 05: free-form payment related information
    PaymentRelated(Addenda05),
    /// Type 99: return of a prior entry
    Return(Addenda99),
}

impl Addenda {
    pub fn type_code(&self) -> &'static str {
        match self {
            Addenda::Terminal(_) => "02",
            Addenda::PaymentRelated(_) => "05",
            Addenda::Return(_) => "99",
        }
    }

    pub(crate) fn parse(f: &Fields<'_>) -> Result<Self, FormatError> {
        match f.raw(2, 3) {
            "02" => Ok(Addenda::Terminal(Addenda02::parse(f)?)),
            "05" => Ok(Addenda::PaymentRelated(Addenda05::parse(f)?)),
            "99" => Ok(Addenda::Return(Addenda99::parse(f)?)),
            other => Err(FormatError::UnknownRecordType(format!("7{}", other))),
        }
    }

    pub fn to_line(&self) -> String {
        match self {
            Addenda::Terminal(a) => a.to_line(),
            Addenda::PaymentRelated(a) => a.to_line(),
            Addenda::Return(a) => a.to_line(),
        }
    }
}

/// Terminal identification for POS, MTE and SHR entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda02 {
    pub reference_information_one: String,
    pub reference_information_two: String,
    pub terminal_identification_code: String,
    pub transaction_serial_number: String,

    /// MMDD
    pub transaction_date: String,

    pub authorization_code_or_expire_date: String,
    pub terminal_location: String,
    pub terminal_city: String,
    pub terminal_state: String,

    /// Copied from the owning entry at finalize
    pub trace_number: String,
}

impl Addenda02 {
    pub fn new() -> Self {
        Self::default()
    }

    fn parse(f: &Fields<'_>) -> Result<Self, FormatError> {
        Ok(Addenda02 {
            reference_information_one: f.alpha(4, 10),
            reference_information_two: f.alpha(11, 13),
            terminal_identification_code: f.alpha(14, 19),
            transaction_serial_number: f.alpha(20, 25),
            transaction_date: f.alpha(26, 29),
            authorization_code_or_expire_date: f.alpha(30, 35),
            terminal_location: f.alpha(36, 62),
            terminal_city: f.alpha(63, 77),
            terminal_state: f.alpha(78, 79),
            trace_number: f.alpha(80, 94),
        })
    }

    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(field::RECORD_LENGTH);
        line.push_str("702");
        line.push_str(&field::alpha(&self.reference_information_one, 7));
        line.push_str(&field::alpha(&self.reference_information_two, 3));
        line.push_str(&field::alpha(&self.terminal_identification_code, 6));
        line.push_str(&field::alpha(&self.transaction_serial_number, 6));
        line.push_str(&field::alpha(&self.transaction_date, 4));
        line.push_str(&field::alpha(&self.authorization_code_or_expire_date, 6));
        line.push_str(&field::alpha(&self.terminal_location, 27));
        line.push_str(&field::alpha(&self.terminal_city, 15));
        line.push_str(&field::alpha(&self.terminal_state, 2));
        line.push_str(&field::digits(&self.trace_number, 15));
        line
    }
}

/// Payment related information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda05 {
    pub payment_related_information: String,

    /// Position of this addenda under its entry, starting at 1
    pub addenda_sequence_number: u16,

    /// Last seven digits of the owning entry's trace number
    pub entry_detail_sequence_number: u32,
}

impl Addenda05 {
    pub fn new() -> Self {
        Self::default()
    }

    fn parse(f: &Fields<'_>) -> Result<Self, FormatError> {
        Ok(Addenda05 {
            payment_related_information: f.alpha(4, 83),
            addenda_sequence_number: f.number("AddendaSequenceNumber", 84, 87)?,
            entry_detail_sequence_number: f.number("EntryDetailSequenceNumber", 88, 94)?,
        })
    }

    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(field::RECORD_LENGTH);
        line.push_str("705");
        line.push_str(&field::alpha(&self.payment_related_information, 80));
        line.push_str(&field::numeric(self.addenda_sequence_number.into(), 4));
        line.push_str(&field::numeric(self.entry_detail_sequence_number.into(), 7));
        line
    }
}

/// Return addenda explaining why a prior entry came back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addenda99 {
    /// `R01`, `R02`, ...
    pub return_code: String,
    pub original_trace: String,
    pub date_of_death: String,
    pub original_dfi: String,
    pub addenda_information: String,
    pub trace_number: String,
}

impl Addenda99 {
    pub fn new() -> Self {
        Self::default()
    }

    fn parse(f: &Fields<'_>) -> Result<Self, FormatError> {
        Ok(Addenda99 {
            return_code: f.alpha(4, 6),
            original_trace: f.alpha(7, 21),
            date_of_death: f.alpha(22, 27),
            original_dfi: f.alpha(28, 35),
            addenda_information: f.alpha(36, 79),
            trace_number: f.alpha(80, 94),
        })
    }

    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(field::RECORD_LENGTH);
        line.push_str("799");
        line.push_str(&field::alpha(&self.return_code, 3));
        line.push_str(&field::digits(&self.original_trace, 15));
        line.push_str(&field::alpha(&self.date_of_death, 6));
        line.push_str(&field::digits(&self.original_dfi, 8));
        line.push_str(&field::alpha(&self.addenda_information, 44));
        line.push_str(&field::digits(&self.trace_number, 15));
        line
    }
}
