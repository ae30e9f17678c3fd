//! Splitting a file into a credit-only file and a debit-only file.

use crate::batch::Batch;
use crate::codes::{Flavor, ServiceClassCode};
use crate::error::{AchError, Result};
use crate::file::File;
use log::debug;
use serde::{Deserialize, Serialize};

/// Options for [`File::segment`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    /// Blank every trace number so each output batch is renumbered from 1
    pub reassign_trace_numbers: bool,
}

impl File {
    /// Splits this file into `(credit_file, debit_file)`.
    ///
    /// Each source batch contributes at most one batch to each output, with
    /// the same header except for the service class. Entry order is kept.
    /// Both outputs are finalized but not validated.
    ///
    /// Fails when this file is not finalized, or when an entry's transaction
    /// code is neither a credit nor a debit.
    pub fn segment(&self, opts: &SegmentOptions) -> Result<(File, File)> {
        if !self.is_finalized() {
            return Err(AchError::segmentation("file must be finalized first"));
        }

        let mut credit_file = self.empty_copy();
        let mut debit_file = self.empty_copy();

        for batch in self.batches() {
            let mut credit = split_batch(batch, ServiceClassCode::CREDITS_ONLY);
            let mut debit = split_batch(batch, ServiceClassCode::DEBITS_ONLY);

            for entry in batch.entries() {
                let mut entry = entry.clone();
                if opts.reassign_trace_numbers {
                    entry.trace_number.clear();
                }
                match entry.flavor() {
                    Some(Flavor::Credit) => credit.add_entry(entry),
                    Some(Flavor::Debit) => debit.add_entry(entry),
                    None => {
                        return Err(AchError::segmentation(format!(
                            "entry {} has transaction code {} which is neither credit nor debit",
                            entry.trace_number, entry.transaction_code
                        )))
                    }
                }
            }

            if !credit.entries().is_empty() {
                credit_file.add_batch(credit);
            }
            if !debit.entries().is_empty() {
                debit_file.add_batch(debit);
            }
        }

        debug!(
            "Segmented {} batches into {} credit and {} debit batches",
            self.batches().len(),
            credit_file.batches().len(),
            debit_file.batches().len()
        );

        for output in [&mut credit_file, &mut debit_file] {
            if !output.batches().is_empty() {
                output.finalize()?;
            }
        }
        Ok((credit_file, debit_file))
    }

    fn empty_copy(&self) -> File {
        let mut file = File::new(self.header().clone());
        file.set_validation(self.validation().copied());
        file
    }
}

fn split_batch(source: &Batch, service_class: ServiceClassCode) -> Batch {
    let mut header = source.header().clone();
    header.service_class_code = service_class;
    let mut batch = Batch::new(header);
    batch.set_validation(source.validation().copied());
    batch
}
