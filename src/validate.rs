//! Read-only field and structural checks.
//!
//! Every check returns the first rule broken; nothing here mutates a record.

use crate::addenda::{Addenda, Addenda02, Addenda05, Addenda99};
use crate::codes::Category;
use crate::control::{BatchControl, FileControl};
use crate::entry::EntryDetail;
use crate::error::{Rule, ValidationError};
use crate::field::is_numeric;
use crate::header::{BatchHeader, FileHeader};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

type Check = std::result::Result<(), ValidationError>;

/// Largest amount the 10-digit entry field can carry, in cents.
pub const MAX_ENTRY_AMOUNT: i64 = 9_999_999_999;

/// Largest total the 12-digit control fields can carry, in cents.
pub const MAX_TOTAL_AMOUNT: i64 = 999_999_999_999;

/// Switches for relaxing validation, e.g. for sandbox or test files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOpts {
    /// Disable every check
    pub skip_all: bool,

    /// Skip the immediate origin checksum and the trace-number-matches-ODFI check
    pub bypass_origin_validation: bool,

    /// Skip the immediate destination checksum
    pub bypass_destination_validation: bool,
}

/// Check digit for the first 8 digits of a routing number (weights 3, 7, 1).
///
/// ```
/// assert_eq!(ach_engine::routing_check_digit("23138010"), Some(4));
/// ```
pub fn routing_check_digit(first_eight: &str) -> Option<u8> {
    if first_eight.len() != 8 || !is_numeric(first_eight) {
        return None;
    }
    let sum: u32 = first_eight
        .bytes()
        .zip([3u32, 7, 1].iter().cycle())
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();
    u8::try_from((10 - sum % 10) % 10).ok()
}

/// Whether a 9-digit routing number carries a correct check digit.
pub fn is_valid_routing_number(routing: &str) -> bool {
    routing.len() == 9
        && is_numeric(routing)
        && routing_check_digit(&routing[..8]) == Some(routing.as_bytes()[8] - b'0')
}

fn fail(field: &'static str, rule: Rule) -> Check {
    Err(ValidationError::new(field, rule))
}

fn required(field: &'static str, value: &str) -> Check {
    if value.trim().is_empty() {
        return fail(field, Rule::Required);
    }
    Ok(())
}

fn numeric(field: &'static str, value: &str) -> Check {
    if !is_numeric(value) {
        return fail(field, Rule::Numeric);
    }
    Ok(())
}

fn routing(field: &'static str, value: &str) -> Check {
    if !is_valid_routing_number(value) {
        return fail(field, Rule::RoutingChecksum);
    }
    Ok(())
}

/// YYMMDD with a real month and day.
fn date(field: &'static str, value: &str) -> Check {
    if value.len() != 6
        || !is_numeric(value)
        || NaiveDate::parse_from_str(value, "%y%m%d").is_err()
    {
        return fail(field, Rule::InvalidDate(value.to_string()));
    }
    Ok(())
}

/// Blank or HHMM.
fn time(field: &'static str, value: &str) -> Check {
    if value.is_empty() {
        return Ok(());
    }
    if value.len() != 4 || !is_numeric(value) || NaiveTime::parse_from_str(value, "%H%M").is_err() {
        return fail(field, Rule::InvalidDate(value.to_string()));
    }
    Ok(())
}

fn printable(field: &'static str, value: &str, width: usize) -> Check {
    if !value.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
        return fail(field, Rule::Alphanumeric);
    }
    if value.len() > width {
        return fail(
            field,
            Rule::OutOfRange(format!("wider than {} characters", width)),
        );
    }
    Ok(())
}

/// Left-aligned alphanumeric field; trailing spaces are stripped on decode.
fn text(field: &'static str, value: &str, width: usize) -> Check {
    printable(field, value, width)?;
    if value.ends_with(' ') {
        return fail(field, Rule::Padding);
    }
    Ok(())
}

/// Right-aligned field; leading spaces are stripped on decode.
fn justified_text(field: &'static str, value: &str, width: usize) -> Check {
    printable(field, value, width)?;
    if value.starts_with(' ') {
        return fail(field, Rule::Padding);
    }
    Ok(())
}

/// Exactly `width` digits.
fn fixed_digits(field: &'static str, value: &str, width: usize) -> Check {
    numeric(field, value)?;
    if value.len() != width {
        return fail(field, Rule::OutOfRange(format!("must be {} digits", width)));
    }
    Ok(())
}

fn at_most(field: &'static str, value: u64, max: u64) -> Check {
    if value > max {
        return fail(field, Rule::OutOfRange(format!("{} exceeds {}", value, max)));
    }
    Ok(())
}

fn total(field: &'static str, value: i64) -> Check {
    if !(0..=MAX_TOTAL_AMOUNT).contains(&value) {
        return fail(
            field,
            Rule::OutOfRange(format!("{} is not within 0..={}", value, MAX_TOTAL_AMOUNT)),
        );
    }
    Ok(())
}

pub(crate) fn mismatch(field: &'static str, expected: impl ToString, found: impl ToString) -> Check {
    let expected = expected.to_string();
    let found = found.to_string();
    if expected != found {
        return fail(field, Rule::Mismatch { expected, found });
    }
    Ok(())
}

pub(crate) fn file_header(header: &FileHeader, opts: &ValidateOpts) -> Check {
    justified_text("ImmediateDestination", &header.immediate_destination, 10)?;
    justified_text("ImmediateOrigin", &header.immediate_origin, 10)?;
    if !opts.bypass_destination_validation {
        routing("ImmediateDestination", &header.immediate_destination)?;
    }
    if !opts.bypass_origin_validation {
        routing("ImmediateOrigin", &header.immediate_origin)?;
    }
    date("FileCreationDate", &header.file_creation_date)?;
    time("FileCreationTime", &header.file_creation_time)?;
    let modifier = header.file_id_modifier.as_bytes();
    if modifier.len() != 1 || !(modifier[0].is_ascii_uppercase() || modifier[0].is_ascii_digit()) {
        return fail(
            "FileIDModifier",
            Rule::OutOfRange(format!("{:?} is not A-Z or 0-9", header.file_id_modifier)),
        );
    }
    mismatch("RecordSize", 94, header.record_size)?;
    mismatch("BlockingFactor", 10, header.blocking_factor)?;
    mismatch("FormatCode", 1, header.format_code)?;
    text("ImmediateDestinationName", &header.immediate_destination_name, 23)?;
    text("ImmediateOriginName", &header.immediate_origin_name, 23)?;
    text("ReferenceCode", &header.reference_code, 8)?;
    Ok(())
}

pub(crate) fn batch_header(header: &BatchHeader) -> Check {
    if !header.service_class_code.is_known() {
        return fail(
            "ServiceClassCode",
            Rule::UnknownCode(header.service_class_code.to_string()),
        );
    }
    if !header.standard_entry_class_code.is_known() {
        return fail(
            "StandardEntryClassCode",
            Rule::UnknownCode(header.standard_entry_class_code.to_string()),
        );
    }
    required("CompanyName", &header.company_name)?;
    required("CompanyIdentification", &header.company_identification)?;
    required("CompanyEntryDescription", &header.company_entry_description)?;
    text("CompanyName", &header.company_name, 16)?;
    text("CompanyDiscretionaryData", &header.company_discretionary_data, 20)?;
    text("CompanyIdentification", &header.company_identification, 10)?;
    text("CompanyEntryDescription", &header.company_entry_description, 10)?;
    text("CompanyDescriptiveDate", &header.company_descriptive_date, 6)?;
    date("EffectiveEntryDate", &header.effective_entry_date)?;
    text("SettlementDate", &header.settlement_date, 3)?;
    text("OriginatorStatusCode", &header.originator_status_code, 1)?;
    numeric("ODFIIdentification", &header.odfi_identification)?;
    Ok(())
}

pub(crate) fn entry(entry: &EntryDetail, header: &BatchHeader, opts: &ValidateOpts) -> Check {
    let code = entry.transaction_code;
    let Some(flavor) = code.flavor() else {
        return fail("TransactionCode", Rule::UnknownCode(code.to_string()));
    };
    if !header.service_class_code.permits(flavor) {
        return fail(
            "TransactionCode",
            Rule::NotPermitted(format!(
                "{:?} entry {} under service class {}",
                flavor, code, header.service_class_code
            )),
        );
    }

    if entry.rdfi_identification.len() != 8 {
        return fail(
            "RDFIIdentification",
            Rule::OutOfRange("must be 8 digits".to_string()),
        );
    }
    numeric("RDFIIdentification", &entry.rdfi_identification)?;
    routing("CheckDigit", &entry.rdfi())?;
    required("DFIAccountNumber", &entry.dfi_account_number)?;
    text("DFIAccountNumber", &entry.dfi_account_number, 17)?;
    text("IdentificationNumber", &entry.identification_number, 15)?;
    text("IndividualName", &entry.individual_name, 22)?;
    text("DiscretionaryData", &entry.discretionary_data, 2)?;

    if !(0..=MAX_ENTRY_AMOUNT).contains(&entry.amount) {
        return fail(
            "Amount",
            Rule::OutOfRange(format!("{} is not within 0..={}", entry.amount, MAX_ENTRY_AMOUNT)),
        );
    }
    if (code.is_prenote() || code.is_zero_dollar()) && entry.amount != 0 {
        return fail(
            "Amount",
            Rule::NotPermitted(format!("transaction code {} must carry a zero amount", code)),
        );
    }

    if entry.trace_number.len() != 15 || !is_numeric(&entry.trace_number) {
        return fail("TraceNumber", Rule::OutOfRange("must be 15 digits".to_string()));
    }
    if !opts.bypass_origin_validation {
        mismatch("TraceNumber", header.odfi_prefix(), &entry.trace_number[..8])?;
    }

    let has_addenda = u8::from(!entry.addenda.is_empty());
    mismatch("AddendaRecordIndicator", has_addenda, entry.addenda_record_indicator)?;
    addenda(entry, header)
}

fn addenda(entry: &EntryDetail, header: &BatchHeader) -> Check {
    let sec = &header.standard_entry_class_code;
    let mut payment_related = 0usize;
    let mut entry_sequence = 0u32;
    for addenda in &entry.addenda {
        match addenda {
            Addenda::Terminal(a) => {
                if !sec.uses_terminal_addenda() {
                    return fail(
                        "Addenda02",
                        Rule::NotPermitted(format!("terminal addenda under SEC code {}", sec)),
                    );
                }
                addenda02_fields(a)?;
                mismatch("Addenda02.TraceNumber", &entry.trace_number, &a.trace_number)?;
            }
            Addenda::PaymentRelated(a) => {
                payment_related += 1;
                addenda05_fields(a)?;
                mismatch("Addenda05.AddendaSequenceNumber", payment_related, a.addenda_sequence_number)?;
                entry_sequence = a.entry_detail_sequence_number;
            }
            Addenda::Return(a) => {
                if entry.category != Category::Return {
                    return fail(
                        "Addenda99",
                        Rule::NotPermitted("return addenda on a forward entry".to_string()),
                    );
                }
                required("Addenda99.ReturnCode", &a.return_code)?;
                addenda99_fields(a)?;
                mismatch("Addenda99.TraceNumber", &entry.trace_number, &a.trace_number)?;
            }
        }
    }
    if payment_related > 0 {
        mismatch(
            "Addenda05.EntryDetailSequenceNumber",
            entry.trace_sequence(),
            entry_sequence,
        )?;
    }
    if payment_related > sec.max_payment_addenda() {
        return fail(
            "Addenda05",
            Rule::NotPermitted(format!(
                "{} payment addenda under SEC code {} (max {})",
                payment_related,
                sec,
                sec.max_payment_addenda()
            )),
        );
    }
    Ok(())
}

fn addenda02_fields(a: &Addenda02) -> Check {
    text("Addenda02.ReferenceInformationOne", &a.reference_information_one, 7)?;
    text("Addenda02.ReferenceInformationTwo", &a.reference_information_two, 3)?;
    text("Addenda02.TerminalIdentificationCode", &a.terminal_identification_code, 6)?;
    text("Addenda02.TransactionSerialNumber", &a.transaction_serial_number, 6)?;
    text("Addenda02.TransactionDate", &a.transaction_date, 4)?;
    text("Addenda02.AuthorizationCodeOrExpireDate", &a.authorization_code_or_expire_date, 6)?;
    text("Addenda02.TerminalLocation", &a.terminal_location, 27)?;
    text("Addenda02.TerminalCity", &a.terminal_city, 15)?;
    text("Addenda02.TerminalState", &a.terminal_state, 2)
}

fn addenda05_fields(a: &Addenda05) -> Check {
    text("Addenda05.PaymentRelatedInformation", &a.payment_related_information, 80)?;
    at_most("Addenda05.AddendaSequenceNumber", a.addenda_sequence_number.into(), 9_999)?;
    at_most("Addenda05.EntryDetailSequenceNumber", a.entry_detail_sequence_number.into(), 9_999_999)
}

fn addenda99_fields(a: &Addenda99) -> Check {
    text("Addenda99.ReturnCode", &a.return_code, 3)?;
    fixed_digits("Addenda99.OriginalTrace", &a.original_trace, 15)?;
    text("Addenda99.DateOfDeath", &a.date_of_death, 6)?;
    fixed_digits("Addenda99.OriginalDFI", &a.original_dfi, 8)?;
    text("Addenda99.AddendaInformation", &a.addenda_information, 44)
}

/// Every count and total fits its fixed-width control field.
pub(crate) fn batch_control_fits(control: &BatchControl) -> Check {
    at_most("BatchControl.EntryAddendaCount", control.entry_addenda_count.into(), 999_999)?;
    total("BatchControl.TotalDebitEntryDollarAmount", control.total_debit)?;
    total("BatchControl.TotalCreditEntryDollarAmount", control.total_credit)?;
    at_most("BatchControl.BatchNumber", control.batch_number.into(), 9_999_999)
}

pub(crate) fn file_control_fits(control: &FileControl) -> Check {
    at_most("FileControl.BatchCount", control.batch_count.into(), 999_999)?;
    at_most("FileControl.BlockCount", control.block_count.into(), 999_999)?;
    at_most("FileControl.EntryAddendaCount", control.entry_addenda_count.into(), 99_999_999)?;
    total("FileControl.TotalDebitEntryDollarAmountInFile", control.total_debit)?;
    total("FileControl.TotalCreditEntryDollarAmountInFile", control.total_credit)
}

/// Trace numbers must be unique inside one batch.
pub(crate) fn unique_traces<'a>(entries: impl IntoIterator<Item = &'a EntryDetail>) -> Check {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.trace_number.as_str()) {
            return fail("TraceNumber", Rule::Duplicate(entry.trace_number.clone()));
        }
    }
    Ok(())
}
