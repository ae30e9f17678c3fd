//! The ACH file: header, ordered batches and file-level control totals.

use crate::batch::Batch;
use crate::control::{FileControl, ENTRY_HASH_MODULUS};
use crate::error::{AchError, Result, Rule, ValidationError};
use crate::header::FileHeader;
use crate::reader::Reader;
use crate::validate::{self, ValidateOpts};
use crate::writer::Writer;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// Records per block; files are padded to a whole number of blocks.
pub const BLOCKING_FACTOR: usize = 10;

/// A complete ACH file.
///
/// Batches keep their insertion order. [`File::finalize`] numbers and
/// finalizes every batch and computes the file control, and
/// [`File::validate`] checks the result without changing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    header: FileHeader,
    batches: Vec<Batch>,
    control: FileControl,

    #[serde(default)]
    validation: Option<ValidateOpts>,

    #[serde(skip)]
    finalized: bool,
}

impl File {
    pub fn new(header: FileHeader) -> Self {
        File {
            header,
            batches: Vec::new(),
            control: FileControl::default(),
            validation: None,
            finalized: false,
        }
    }

    pub(crate) fn from_parts(header: FileHeader, batches: Vec<Batch>, control: FileControl) -> Self {
        File {
            header,
            batches,
            control,
            validation: None,
            finalized: false,
        }
    }

    /// Reads a whole file from any buffered byte source.
    pub fn read_from<R: BufRead>(reader: R) -> Result<File> {
        Reader::new(reader).read()
    }

    /// Writes the file, block padding included.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        Writer::new(writer).write(self)
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut FileHeader {
        self.finalized = false;
        &mut self.header
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batches_mut(&mut self) -> &mut Vec<Batch> {
        self.finalized = false;
        &mut self.batches
    }

    pub fn add_batch(&mut self, batch: Batch) {
        self.finalized = false;
        self.batches.push(batch);
    }

    pub fn control(&self) -> &FileControl {
        &self.control
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized && self.batches.iter().all(Batch::is_finalized)
    }

    pub fn set_validation(&mut self, opts: Option<ValidateOpts>) {
        self.validation = opts;
    }

    pub fn validation(&self) -> Option<&ValidateOpts> {
        self.validation.as_ref()
    }

    /// Records in the file before block padding.
    pub fn line_count(&self) -> usize {
        2 + self.batches.iter().map(Batch::line_count).sum::<usize>()
    }

    /// Numbers unnumbered batches, finalizes every batch and computes the file control.
    ///
    /// All or nothing: if any batch fails, the file is left as it was.
    pub fn finalize(&mut self) -> Result<()> {
        if self.batches.is_empty() {
            return Err(AchError::construction("file has no batches"));
        }

        let mut batches = self.batches.clone();
        for (idx, batch) in batches.iter_mut().enumerate() {
            if batch.header().batch_number == 0 {
                batch.header_mut().batch_number = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            }
            batch.finalize()?;
        }
        let control = aggregate(&batches);
        validate::file_control_fits(&control)
            .map_err(|e| AchError::construction(e.to_string()))?;
        self.batches = batches;
        self.control = control;
        self.finalized = true;

        debug!(
            "File finalized: {} batches, {} entry/addenda records, {} blocks",
            self.control.batch_count, self.control.entry_addenda_count, self.control.block_count
        );
        Ok(())
    }

    /// File control aggregated from the batch controls currently stored.
    pub fn compute_control(&self) -> FileControl {
        aggregate(&self.batches)
    }

    /// Checks the header, every batch and the file control; stops at the first violation.
    pub fn validate(&self) -> Result<()> {
        let opts = self.validation.unwrap_or_default();
        if opts.skip_all {
            return Ok(());
        }

        validate::file_header(&self.header, &opts)?;
        if self.batches.is_empty() {
            return Err(ValidationError::new("Batches", Rule::Required).into());
        }
        for batch in &self.batches {
            batch.validate_with(self.validation.as_ref())?;
        }
        self.validate_control()?;
        Ok(())
    }

    fn validate_control(&self) -> std::result::Result<(), ValidationError> {
        let expected = self.compute_control();
        let found = &self.control;
        validate::file_control_fits(&expected)?;
        validate::mismatch("FileControl.BatchCount", expected.batch_count, found.batch_count)?;
        validate::mismatch("FileControl.BlockCount", expected.block_count, found.block_count)?;
        validate::mismatch(
            "FileControl.EntryAddendaCount",
            expected.entry_addenda_count,
            found.entry_addenda_count,
        )?;
        validate::mismatch("FileControl.EntryHash", expected.entry_hash, found.entry_hash)?;
        validate::mismatch(
            "FileControl.TotalDebitEntryDollarAmountInFile",
            expected.total_debit,
            found.total_debit,
        )?;
        validate::mismatch(
            "FileControl.TotalCreditEntryDollarAmountInFile",
            expected.total_credit,
            found.total_credit,
        )?;
        Ok(())
    }
}

fn aggregate(batches: &[Batch]) -> FileControl {
    let lines = 2 + batches.iter().map(Batch::line_count).sum::<usize>();
    let mut control = FileControl {
        batch_count: u32::try_from(batches.len()).unwrap_or(u32::MAX),
        block_count: u32::try_from(lines.div_ceil(BLOCKING_FACTOR)).unwrap_or(u32::MAX),
        ..FileControl::default()
    };
    for batch in batches {
        let bc = batch.control();
        control.entry_addenda_count = control.entry_addenda_count.saturating_add(bc.entry_addenda_count);
        control.entry_hash = (control.entry_hash + bc.entry_hash) % ENTRY_HASH_MODULUS;
        control.total_debit = control.total_debit.saturating_add(bc.total_debit);
        control.total_credit = control.total_credit.saturating_add(bc.total_credit);
    }
    control
}
