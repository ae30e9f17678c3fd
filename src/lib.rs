//! # ACH Engine
//!
//! Reads, builds, validates and writes NACHA ACH files, and splits them into
//! credit-only and debit-only files.
//!
//! ## Design Principles
//!
//! - **Bit-exact records**: every record is 94 fixed-width ASCII characters;
//!   decoding then encoding a well-formed line reproduces it exactly
//! - **Explicit lifecycle**: populate, `finalize` (derived fields), then
//!   `validate` (read-only, fail-fast)
//! - **Owned values**: a file owns its batches, a batch its entries, an entry
//!   its addenda; there is no shared state between files
//! - **Integer cents**: amounts are `i64` cents, converted to `rust_decimal`
//!   dollars only for reporting
//!
//! ## Example
//!
//! ```
//! use ach_engine::{
//!     Batch, BatchHeader, EntryDetail, File, FileHeader, SecCode, SegmentOptions,
//!     TransactionCode,
//! };
//!
//! let mut header = FileHeader::new();
//! header.immediate_destination = "231380104".to_string();
//! header.immediate_origin = "121042882".to_string();
//! header.file_creation_date = "261019".to_string();
//! let mut file = File::new(header);
//!
//! let mut bh = BatchHeader::new();
//! bh.company_name = "Your Company".to_string();
//! bh.company_identification = "121042882".to_string();
//! bh.standard_entry_class_code = SecCode::Ppd;
//! bh.company_entry_description = "Payroll".to_string();
//! bh.effective_entry_date = "261020".to_string();
//! bh.odfi_identification = "121042882".to_string();
//!
//! let mut entry = EntryDetail::new();
//! entry.transaction_code = TransactionCode::CHECKING_CREDIT;
//! entry.set_rdfi("231380104");
//! entry.dfi_account_number = "81967038518".to_string();
//! entry.amount = 1_000_000;
//!
//! let mut batch = Batch::new(bh);
//! batch.add_entry(entry);
//! file.add_batch(batch);
//!
//! file.finalize().unwrap();
//! file.validate().unwrap();
//!
//! let (credits, debits) = file.segment(&SegmentOptions::default()).unwrap();
//! assert_eq!(credits.batches().len(), 1);
//! assert!(debits.batches().is_empty());
//!
//! let mut out = Vec::new();
//! file.write_to(&mut out).unwrap();
//! assert_eq!(out.len(), 10 * 95);
//! ```

pub mod addenda;
pub mod amount;
pub mod batch;
pub mod codes;
pub mod control;
pub mod entry;
pub mod error;
mod field;
pub mod file;
pub mod header;
pub mod reader;
pub mod record;
pub mod segment;
pub mod trace;
pub mod validate;
pub mod writer;

pub use addenda::{Addenda, Addenda02, Addenda05, Addenda99};
pub use batch::Batch;
pub use codes::{Category, Flavor, SecCode, ServiceClassCode, TransactionCode};
pub use control::{BatchControl, FileControl};
pub use entry::EntryDetail;
pub use error::{AchError, FormatError, Result, Rule, ValidationError};
pub use field::RECORD_LENGTH;
pub use file::File;
pub use header::{BatchHeader, FileHeader};
pub use reader::Reader;
pub use record::Record;
pub use segment::SegmentOptions;
pub use trace::TraceNumbers;
pub use validate::{is_valid_routing_number, routing_check_digit, ValidateOpts};
pub use writer::Writer;
