//! Integration tests for splitting mixed files into credit and debit files.

use ach_engine::{
    Addenda05, Batch, BatchHeader, EntryDetail, File, FileHeader, SecCode, SegmentOptions,
    ServiceClassCode, TransactionCode, ValidateOpts,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn file_header() -> FileHeader {
    let mut header = FileHeader::new();
    header.immediate_destination = "231380104".to_string();
    header.immediate_origin = "121042882".to_string();
    header.file_creation_date = "261019".to_string();
    header.immediate_destination_name = "Federal Reserve Bank".to_string();
    header.immediate_origin_name = "My Bank Name".to_string();
    header
}

fn batch_header(service_class: ServiceClassCode, sec: SecCode) -> BatchHeader {
    let mut header = BatchHeader::new();
    header.service_class_code = service_class;
    header.company_name = "Your Company".to_string();
    header.company_identification = "121042882".to_string();
    header.standard_entry_class_code = sec;
    header.company_entry_description = "Trans. Des".to_string();
    header.effective_entry_date = "261020".to_string();
    header.odfi_identification = "121042882".to_string();
    header
}

fn entry(code: TransactionCode, amount: i64, note: &str) -> EntryDetail {
    let mut entry = EntryDetail::new();
    entry.transaction_code = code;
    entry.set_rdfi("231380104");
    entry.dfi_account_number = "81967038518".to_string();
    entry.amount = amount;
    entry.identification_number = "#83738AB#".to_string();
    entry.individual_name = "Wade Arnold".to_string();

    let mut addenda = Addenda05::new();
    addenda.payment_related_information = note.to_string();
    entry.add_addenda05(addenda);
    entry
}

/// A mixed PPD credit batch followed by a WEB debit batch, both carrying
/// explicit trace numbers from another ODFI.
fn two_batch_file() -> File {
    let mut credit = entry(TransactionCode::CHECKING_CREDIT, 1_000_000, "bonus pay");
    credit.set_trace_number("12345678", 1);
    let mut credit_batch = Batch::new(batch_header(
        ServiceClassCode::MIXED_DEBITS_AND_CREDITS,
        SecCode::Ppd,
    ));
    credit_batch.set_validation(Some(ValidateOpts {
        bypass_origin_validation: true,
        ..ValidateOpts::default()
    }));
    credit_batch.add_entry(credit);

    let mut debit = entry(TransactionCode::CHECKING_DEBIT, 799, "subscription");
    debit.set_trace_number("87654321", 2);
    debit.discretionary_data = "R".to_string();
    let mut debit_batch = Batch::new(batch_header(ServiceClassCode::DEBITS_ONLY, SecCode::Web));
    debit_batch.set_validation(Some(ValidateOpts {
        bypass_origin_validation: true,
        ..ValidateOpts::default()
    }));
    debit_batch.add_entry(debit);

    let mut file = File::new(file_header());
    file.add_batch(credit_batch);
    file.add_batch(debit_batch);
    file.finalize().unwrap();
    file
}

#[test]
fn test_segment_keeps_explicit_trace_numbers() {
    init_logging();
    let file = two_batch_file();
    let (credit, debit) = file.segment(&SegmentOptions::default()).unwrap();

    assert_eq!(credit.batches().len(), 1);
    assert_eq!(debit.batches().len(), 1);
    assert_eq!(credit.batches()[0].entries()[0].trace_number, "123456780000001");
    assert_eq!(debit.batches()[0].entries()[0].trace_number, "876543210000002");

    // The addenda follow the entry into the output batch.
    let addenda: Vec<_> = debit.batches()[0].entries()[0].addenda05().collect();
    assert_eq!(addenda.len(), 1);
    assert_eq!(addenda[0].payment_related_information, "subscription");
    assert_eq!(addenda[0].entry_detail_sequence_number, 2);
}

#[test]
fn test_segment_assigns_blank_trace_numbers_from_odfi() {
    init_logging();
    let mut file = two_batch_file();
    for batch in file.batches_mut() {
        batch.set_validation(None);
        for entry in batch.entries_mut() {
            entry.trace_number.clear();
        }
    }
    file.finalize().unwrap();

    let (credit, debit) = file.segment(&SegmentOptions::default()).unwrap();
    assert_eq!(credit.batches()[0].entries()[0].trace_number, "121042880000001");
    assert_eq!(debit.batches()[0].entries()[0].trace_number, "121042880000001");

    assert!(credit.validate().is_ok());
    assert!(debit.validate().is_ok());
}

#[test]
fn test_segment_partitions_every_entry() {
    let file = two_batch_file();
    let (credit, debit) = file.segment(&SegmentOptions::default()).unwrap();

    assert!(credit.is_finalized());
    assert!(debit.is_finalized());
    assert_eq!(
        credit.control().entry_addenda_count + debit.control().entry_addenda_count,
        file.control().entry_addenda_count
    );
    assert_eq!(credit.control().total_credit, file.control().total_credit);
    assert_eq!(debit.control().total_debit, file.control().total_debit);
    assert_eq!(credit.control().total_debit, 0);
    assert_eq!(debit.control().total_credit, 0);

    for batch in credit.batches() {
        assert_eq!(batch.header().service_class_code, ServiceClassCode::CREDITS_ONLY);
        assert!(batch.entries().iter().all(|e| e.transaction_code.is_credit()));
    }
    for batch in debit.batches() {
        assert_eq!(batch.header().service_class_code, ServiceClassCode::DEBITS_ONLY);
        assert!(batch.entries().iter().all(|e| e.transaction_code.is_debit()));
    }

    // Source is untouched.
    assert!(file.is_finalized());
    assert_eq!(file.batches().len(), 2);
}

#[test]
fn test_segmented_outputs_write_and_read_back() {
    let file = two_batch_file();
    let (credit, debit) = file.segment(&SegmentOptions::default()).unwrap();

    for output in [&credit, &debit] {
        let mut bytes = Vec::new();
        output.write_to(&mut bytes).unwrap();
        let reread = File::read_from(bytes.as_slice()).unwrap();
        assert_eq!(reread.control(), output.control());
        assert_eq!(reread.batches()[0].entries(), output.batches()[0].entries());
    }
}
