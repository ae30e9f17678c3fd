//! One decoded line of an ACH file.

use crate::addenda::Addenda;
use crate::control::{BatchControl, FileControl};
use crate::entry::EntryDetail;
use crate::error::FormatError;
use crate::field::{Fields, RECORD_LENGTH};
use crate::header::{BatchHeader, FileHeader};

/// Any of the fixed-width record types, keyed by the leading type code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    FileHeader(FileHeader),
    BatchHeader(BatchHeader),
    EntryDetail(EntryDetail),
    Addenda(Addenda),
    BatchControl(BatchControl),
    FileControl(FileControl),
    /// A line of all `9`s padding the file to a full block
    Filler,
}

impl Record {
    /// Decodes exactly one 94-character line.
    ///
    /// A decoded entry carries no addenda; those arrive as separate records.
    pub fn decode(line: &str) -> Result<Record, FormatError> {
        let fields = Fields::new(line)?;
        if line.bytes().all(|b| b == b'9') {
            return Ok(Record::Filler);
        }
        match fields.raw(1, 1) {
            "1" => Ok(Record::FileHeader(FileHeader::parse(&fields)?)),
            "5" => Ok(Record::BatchHeader(BatchHeader::parse(&fields)?)),
            "6" => Ok(Record::EntryDetail(EntryDetail::parse(&fields)?)),
            "7" => Ok(Record::Addenda(Addenda::parse(&fields)?)),
            "8" => Ok(Record::BatchControl(BatchControl::parse(&fields)?)),
            "9" => Ok(Record::FileControl(FileControl::parse(&fields)?)),
            _ => Err(FormatError::UnknownRecordType(fields.raw(1, 2).to_string())),
        }
    }

    /// Encodes back to a 94-character line without a terminator.
    pub fn encode(&self) -> String {
        match self {
            Record::FileHeader(r) => r.to_line(),
            Record::BatchHeader(r) => r.to_line(),
            Record::EntryDetail(r) => r.to_line(),
            Record::Addenda(r) => r.to_line(),
            Record::BatchControl(r) => r.to_line(),
            Record::FileControl(r) => r.to_line(),
            Record::Filler => "9".repeat(RECORD_LENGTH),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Record::FileHeader(_) => "file header",
            Record::BatchHeader(_) => "batch header",
            Record::EntryDetail(_) => "entry detail",
            Record::Addenda(_) => "addenda",
            Record::BatchControl(_) => "batch control",
            Record::FileControl(_) => "file control",
            Record::Filler => "filler",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addenda::{Addenda02, Addenda05, Addenda99};
    use crate::codes::{SecCode, ServiceClassCode, TransactionCode};
    use crate::control::ENTRY_HASH_MODULUS;
    use crate::error::ValidationError;
    use crate::validate::{ValidateOpts, MAX_TOTAL_AMOUNT};

    const LINES: &[&str] = &[
        "101 231380104 1210428822610191200A094101Federal Reserve Bank   My Bank Name           12345678",
        "5200Your Company                        121042882 PPDTrans. Des      261020   1121042880000001",
        "62223138010481967038518      0001000000ABC##jvkdjfuiwnWade Arnold             1123456780000001",
        "705bonus pay for amazing work on #OSS                                              00010000001",
        "82200000020023138010000000000000000001000000121042882                          121042880000001",
        "9000001000001000000020023138010000000000000000001000000                                       ",
    ];

    #[test]
    fn test_decode_then_encode_is_identity() {
        for line in LINES {
            let record = Record::decode(line).unwrap();
            assert_eq!(&record.encode(), line, "{}", record.name());
        }
    }

    #[test]
    fn test_decode_selects_record_type() {
        let kinds: Vec<_> = LINES
            .iter()
            .map(|l| Record::decode(l).unwrap().name())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "file header",
                "batch header",
                "entry detail",
                "addenda",
                "batch control",
                "file control"
            ]
        );
    }

    #[test]
    fn test_unrecognized_type_code_is_format_error() {
        let line = format!("{:<94}", "3X0000");
        assert_eq!(
            Record::decode(&line),
            Err(FormatError::UnknownRecordType("3X".to_string()))
        );
    }

    #[test]
    fn test_filler_line() {
        let filler = "9".repeat(94);
        assert_eq!(Record::decode(&filler), Ok(Record::Filler));
        assert_eq!(Record::Filler.encode(), filler);
    }

    #[test]
    fn test_short_line_is_format_error() {
        assert_eq!(
            Record::decode("6221"),
            Err(FormatError::WrongLength(4))
        );
    }

    fn round_trip(record: Record) {
        let line = record.encode();
        assert_eq!(line.len(), RECORD_LENGTH, "{}", record.name());
        assert_eq!(Record::decode(&line), Ok(record));
    }

    #[test]
    fn test_headers_round_trip_at_full_width() {
        let mut file_header = FileHeader::new();
        file_header.immediate_destination = "1231380104".to_string();
        file_header.immediate_origin = "121042882".to_string();
        file_header.file_creation_date = "261019".to_string();
        file_header.file_creation_time = "2359".to_string();
        file_header.file_id_modifier = "Z".to_string();
        file_header.immediate_destination_name = "Federal Reserve Bank NY".to_string();
        file_header.immediate_origin_name = "My Bank Name Incorporat".to_string();
        file_header.reference_code = "ABCDEFGH".to_string();
        round_trip(Record::FileHeader(file_header));

        let mut batch_header = BatchHeader::new();
        batch_header.service_class_code = ServiceClassCode::DEBITS_ONLY;
        batch_header.company_name = "Your Company Inc".to_string();
        batch_header.company_discretionary_data = "Discretionary Data 1".to_string();
        batch_header.company_identification = "1121042882".to_string();
        batch_header.standard_entry_class_code = SecCode::Web;
        batch_header.company_entry_description = "PAYROLL JN".to_string();
        batch_header.company_descriptive_date = "SEP 26".to_string();
        batch_header.effective_entry_date = "261020".to_string();
        batch_header.settlement_date = "293".to_string();
        batch_header.odfi_identification = "12104288".to_string();
        batch_header.batch_number = 9_999_999;
        round_trip(Record::BatchHeader(batch_header));
    }

    #[test]
    fn test_entry_and_addenda_round_trip_at_full_width() {
        let mut entry = EntryDetail::new();
        entry.transaction_code = TransactionCode::CHECKING_DEBIT;
        entry.set_rdfi("231380104");
        entry.dfi_account_number = "744-5678-99-12345".to_string();
        entry.amount = 9_999_999_999;
        entry.identification_number = "ABC##jvkdjfuiwn".to_string();
        entry.individual_name = "Wade Arnold Jr Esquire".to_string();
        entry.discretionary_data = "R1".to_string();
        entry.addenda_record_indicator = 1;
        entry.trace_number = "121042889999999".to_string();
        round_trip(Record::EntryDetail(entry));

        round_trip(Record::Addenda(Addenda::Terminal(Addenda02 {
            reference_information_one: "REF 001".to_string(),
            reference_information_two: "R02".to_string(),
            terminal_identification_code: "200509".to_string(),
            transaction_serial_number: "321321".to_string(),
            transaction_date: "0614".to_string(),
            authorization_code_or_expire_date: "123456".to_string(),
            terminal_location: "321 East Market Street Ste5".to_string(),
            terminal_city: "ANYTOWN VILLAGE".to_string(),
            terminal_state: "VA".to_string(),
            trace_number: "121042889999999".to_string(),
        })));

        round_trip(Record::Addenda(Addenda::PaymentRelated(Addenda05 {
            payment_related_information:
                "Payment related information for invoice 4711 and credit memo 0815, paid in full."
                    .to_string(),
            addenda_sequence_number: 9_999,
            entry_detail_sequence_number: 9_999_999,
        })));

        round_trip(Record::Addenda(Addenda::Return(Addenda99 {
            return_code: "R01".to_string(),
            original_trace: "121042880000001".to_string(),
            date_of_death: "261019".to_string(),
            original_dfi: "23138010".to_string(),
            addenda_information: "Date of death appended to the return addenda".to_string(),
            trace_number: "231380100000001".to_string(),
        })));
    }

    #[test]
    fn test_controls_round_trip_at_field_limits() {
        round_trip(Record::BatchControl(BatchControl {
            service_class_code: ServiceClassCode::MIXED_DEBITS_AND_CREDITS,
            entry_addenda_count: 999_999,
            entry_hash: ENTRY_HASH_MODULUS - 1,
            total_debit: MAX_TOTAL_AMOUNT,
            total_credit: MAX_TOTAL_AMOUNT,
            company_identification: "1121042882".to_string(),
            message_authentication_code: "Message Auth Code 1".to_string(),
            odfi_identification: "12104288".to_string(),
            batch_number: 9_999_999,
        }));
        round_trip(Record::FileControl(FileControl {
            batch_count: 999_999,
            block_count: 999_999,
            entry_addenda_count: 99_999_999,
            entry_hash: ENTRY_HASH_MODULUS - 1,
            total_debit: MAX_TOTAL_AMOUNT,
            total_credit: 0,
        }));
    }

    #[test]
    fn test_overlong_value_is_truncated_on_encode() {
        let mut entry = EntryDetail::new();
        entry.transaction_code = TransactionCode::CHECKING_CREDIT;
        entry.individual_name = "Wade Arnold of the Ozarks".to_string();
        let Ok(Record::EntryDetail(decoded)) = Record::decode(&entry.to_line()) else {
            panic!("entry line did not decode as an entry");
        };
        assert_eq!(decoded.individual_name, "Wade Arnold of the Oza");
    }

    #[test]
    fn test_blank_trace_number_encodes_as_zeros_and_fails_validation() {
        let mut entry = EntryDetail::new();
        entry.transaction_code = TransactionCode::CHECKING_CREDIT;
        entry.set_rdfi("231380104");
        entry.dfi_account_number = "81967038518".to_string();
        assert!(entry.trace_number.is_empty());

        let line = entry.to_line();
        assert!(line.ends_with("0000000000000000"));
        let Ok(Record::EntryDetail(decoded)) = Record::decode(&line) else {
            panic!("entry line did not decode as an entry");
        };
        assert_eq!(decoded.trace_number, "000000000000000");

        let err = entry
            .validate(&BatchHeader::new(), &ValidateOpts::default())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::AchError::Validation(ValidationError {
                field: "TraceNumber",
                ..
            })
        ));
    }
}
