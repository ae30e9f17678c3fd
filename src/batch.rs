//! A batch of entries sharing one header, and its finalize/validate lifecycle.

use crate::codes::Flavor;
use crate::control::{BatchControl, ENTRY_HASH_MODULUS};
use crate::entry::EntryDetail;
use crate::error::{AchError, Result, Rule, ValidationError};
use crate::header::BatchHeader;
use crate::trace;
use crate::validate::{self, ValidateOpts};
use log::debug;
use serde::{Deserialize, Serialize};

/// Ordered entries under one Batch Header, closed by a Batch Control.
///
/// # Lifecycle
///
/// Populate the header and entries, call [`Batch::finalize`] to fill in
/// trace numbers and the control record, then [`Batch::validate`]. Any
/// mutable access marks the batch as no longer finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    header: BatchHeader,
    entries: Vec<EntryDetail>,
    control: BatchControl,

    #[serde(default)]
    validation: Option<ValidateOpts>,

    #[serde(skip)]
    finalized: bool,
}

impl Batch {
    pub fn new(header: BatchHeader) -> Self {
        Batch {
            header,
            entries: Vec::new(),
            control: BatchControl::default(),
            validation: None,
            finalized: false,
        }
    }

    /// Rebuilds a batch exactly as it was read, control record included.
    pub(crate) fn from_parts(
        header: BatchHeader,
        entries: Vec<EntryDetail>,
        control: BatchControl,
    ) -> Self {
        Batch {
            header,
            entries,
            control,
            validation: None,
            finalized: false,
        }
    }

    pub fn header(&self) -> &BatchHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut BatchHeader {
        self.finalized = false;
        &mut self.header
    }

    pub fn entries(&self) -> &[EntryDetail] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<EntryDetail> {
        self.finalized = false;
        &mut self.entries
    }

    pub fn add_entry(&mut self, entry: EntryDetail) {
        self.finalized = false;
        self.entries.push(entry);
    }

    pub fn control(&self) -> &BatchControl {
        &self.control
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Overrides the file-level options for this batch; `None` falls back to them.
    pub fn set_validation(&mut self, opts: Option<ValidateOpts>) {
        self.validation = opts;
    }

    pub fn validation(&self) -> Option<&ValidateOpts> {
        self.validation.as_ref()
    }

    /// Entry records plus addenda records.
    pub fn entry_addenda_count(&self) -> usize {
        self.entries.iter().map(|e| 1 + e.addenda.len()).sum()
    }

    /// Number of lines this batch occupies, header and control included.
    pub fn line_count(&self) -> usize {
        2 + self.entry_addenda_count()
    }

    /// Computes derived fields: trace numbers, addenda sequencing and the control record.
    ///
    /// Fails without modifying the batch when it has no entries, when the
    /// SEC code or service class does not support an entry's transaction code,
    /// or when a count or total would not fit its control field.
    pub fn finalize(&mut self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(ValidationError::new("Entries", Rule::Required).into());
        }
        self.check_transaction_codes()?;
        let control = self.compute_control();
        validate::batch_control_fits(&control)
            .map_err(|e| AchError::construction(e.to_string()))?;
        let planned = trace::plan(&self.header.odfi_identification, &self.entries)?;

        for (idx, trace_number) in planned {
            self.entries[idx].trace_number = trace_number;
        }
        for entry in &mut self.entries {
            entry.sequence_addenda();
        }
        self.control = control;
        self.finalized = true;

        debug!(
            "Batch {}: finalized {} entries, debit {} credit {}",
            self.header.batch_number,
            self.entries.len(),
            self.control.total_debit,
            self.control.total_credit
        );
        Ok(())
    }

    fn check_transaction_codes(&self) -> Result<()> {
        let sec = &self.header.standard_entry_class_code;
        let service_class = self.header.service_class_code;
        for entry in &self.entries {
            let code = entry.transaction_code;
            let flavor = entry.flavor().ok_or_else(|| {
                AchError::construction(format!("transaction code {} is not an ACH code", code))
            })?;
            if !sec.permits(flavor) {
                return Err(AchError::construction(format!(
                    "SEC code {} does not support {:?} transaction code {}",
                    sec, flavor, code
                )));
            }
            if !service_class.permits(flavor) {
                return Err(AchError::construction(format!(
                    "service class {} does not support {:?} transaction code {}",
                    service_class, flavor, code
                )));
            }
        }
        Ok(())
    }

    /// Control record recomputed from the current header and entries.
    ///
    /// Totals saturate instead of overflowing; out-of-range totals are caught
    /// by `finalize` and `validate`.
    pub fn compute_control(&self) -> BatchControl {
        let mut control = BatchControl {
            service_class_code: self.header.service_class_code,
            entry_addenda_count: u32::try_from(self.entry_addenda_count()).unwrap_or(u32::MAX),
            company_identification: self.header.company_identification.clone(),
            message_authentication_code: self.control.message_authentication_code.clone(),
            odfi_identification: self.header.odfi_prefix(),
            batch_number: self.header.batch_number,
            ..BatchControl::default()
        };
        for entry in &self.entries {
            let rdfi: u64 = entry.rdfi_identification.parse().unwrap_or(0);
            control.entry_hash = (control.entry_hash + rdfi) % ENTRY_HASH_MODULUS;
            match entry.flavor() {
                Some(Flavor::Credit) => {
                    control.total_credit = control.total_credit.saturating_add(entry.amount)
                }
                Some(Flavor::Debit) => {
                    control.total_debit = control.total_debit.saturating_add(entry.amount)
                }
                None => {}
            }
        }
        control
    }

    /// Validates with this batch's own options, or the defaults when none are set.
    pub fn validate(&self) -> Result<()> {
        self.validate_with(None)
    }

    /// Validates with this batch's own options, else `fallback`, else the defaults.
    pub(crate) fn validate_with(&self, fallback: Option<&ValidateOpts>) -> Result<()> {
        let opts = self
            .validation
            .as_ref()
            .or(fallback)
            .copied()
            .unwrap_or_default();
        if opts.skip_all {
            return Ok(());
        }

        validate::batch_header(&self.header)?;
        if self.entries.is_empty() {
            return Err(ValidationError::new("Entries", Rule::Required).into());
        }
        for entry in &self.entries {
            validate::entry(entry, &self.header, &opts)?;
            let flavor = entry.flavor();
            if let Some(flavor) = flavor.filter(|f| !self.header.standard_entry_class_code.permits(*f)) {
                return Err(ValidationError::new(
                    "TransactionCode",
                    Rule::NotPermitted(format!(
                        "{:?} entry under SEC code {}",
                        flavor, self.header.standard_entry_class_code
                    )),
                )
                .into());
            }
        }
        validate::unique_traces(&self.entries)?;
        self.validate_control()?;
        Ok(())
    }

    fn validate_control(&self) -> std::result::Result<(), ValidationError> {
        let expected = self.compute_control();
        let found = &self.control;
        validate::batch_control_fits(&expected)?;
        validate::mismatch(
            "BatchControl.ServiceClassCode",
            expected.service_class_code,
            found.service_class_code,
        )?;
        validate::mismatch(
            "BatchControl.EntryAddendaCount",
            expected.entry_addenda_count,
            found.entry_addenda_count,
        )?;
        validate::mismatch("BatchControl.EntryHash", expected.entry_hash, found.entry_hash)?;
        validate::mismatch(
            "BatchControl.TotalDebitEntryDollarAmount",
            expected.total_debit,
            found.total_debit,
        )?;
        validate::mismatch(
            "BatchControl.TotalCreditEntryDollarAmount",
            expected.total_credit,
            found.total_credit,
        )?;
        validate::mismatch(
            "BatchControl.CompanyIdentification",
            &expected.company_identification,
            &found.company_identification,
        )?;
        validate::mismatch(
            "BatchControl.ODFIIdentification",
            &expected.odfi_identification,
            &found.odfi_identification,
        )?;
        validate::mismatch("BatchControl.BatchNumber", expected.batch_number, found.batch_number)?;
        Ok(())
    }
}
