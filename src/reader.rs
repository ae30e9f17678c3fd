//! Whole-file decoding from a byte stream.

use crate::batch::Batch;
use crate::codes::Category;
use crate::control::FileControl;
use crate::entry::EntryDetail;
use crate::error::{AchError, FormatError, Result};
use crate::field::RECORD_LENGTH;
use crate::file::File;
use crate::header::{BatchHeader, FileHeader};
use crate::record::Record;
use log::{debug, warn};
use std::io::BufRead;

/// Reads an ACH file record by record, enforcing record order.
///
/// Lines may end in `\n` or `\r\n`. A line that is a whole multiple of 94
/// characters long is treated as several records written without newlines.
/// Errors carry the 1-based record number they occurred at; bytes that are
/// not UTF-8 are reported as non-ASCII at the record they appear in.
pub struct Reader<R> {
    inner: R,
    record: usize,
    header: Option<FileHeader>,
    batches: Vec<Batch>,
    open_batch: Option<(BatchHeader, Vec<EntryDetail>)>,
    control: Option<FileControl>,
}

impl<R: BufRead> Reader<R> {
    pub fn new(inner: R) -> Self {
        Reader {
            inner,
            record: 0,
            header: None,
            batches: Vec::new(),
            open_batch: None,
            control: None,
        }
    }

    /// Consumes the stream and returns the file exactly as written.
    ///
    /// Controls are taken from the input, not recomputed, and the file is
    /// not finalized.
    pub fn read(mut self) -> Result<File> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if self.inner.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let Ok(text) = std::str::from_utf8(&buf) else {
                self.record += 1;
                return Err(self.error(FormatError::NonAscii));
            };
            let line = text.trim_end_matches(&['\n', '\r'][..]);
            if line.trim().is_empty() {
                warn!("Skipping blank line after record {}", self.record);
                continue;
            }
            if line.is_ascii() && line.len() > RECORD_LENGTH && line.len() % RECORD_LENGTH == 0 {
                for start in (0..line.len()).step_by(RECORD_LENGTH) {
                    self.accept(&line[start..start + RECORD_LENGTH])?;
                }
            } else {
                self.accept(line)?;
            }
        }
        self.finish()
    }

    fn accept(&mut self, line: &str) -> Result<()> {
        self.record += 1;
        let record = Record::decode(line).map_err(|source| self.error(source))?;
        self.apply(record).map_err(|source| self.error(source))
    }

    fn error(&self, source: FormatError) -> AchError {
        AchError::Format {
            line: self.record,
            source,
        }
    }

    fn apply(&mut self, record: Record) -> std::result::Result<(), FormatError> {
        let unexpected = |found: &'static str, context: &'static str| {
            Err(FormatError::UnexpectedRecord { found, context })
        };

        if self.control.is_some() {
            if record == Record::Filler {
                debug!("Record {}: skipping block filler", self.record);
                return Ok(());
            }
            return unexpected(record.name(), "after file control");
        }
        if self.header.is_none() && !matches!(record, Record::FileHeader(_)) {
            return unexpected(record.name(), "before file header");
        }

        match record {
            Record::FileHeader(header) => {
                if self.header.is_some() {
                    return unexpected("file header", "file already has a header");
                }
                self.header = Some(header);
            }
            Record::BatchHeader(header) => {
                if self.open_batch.is_some() {
                    return unexpected("batch header", "previous batch has no batch control");
                }
                self.open_batch = Some((header, Vec::new()));
            }
            Record::EntryDetail(entry) => match self.open_batch.as_mut() {
                Some((_, entries)) => entries.push(entry),
                None => return unexpected("entry detail", "outside a batch"),
            },
            Record::Addenda(addenda) => {
                let Some(entry) = self
                    .open_batch
                    .as_mut()
                    .and_then(|(_, entries)| entries.last_mut())
                else {
                    return unexpected("addenda", "no entry detail precedes it");
                };
                if matches!(addenda, crate::addenda::Addenda::Return(_)) {
                    entry.category = Category::Return;
                }
                entry.addenda.push(addenda);
            }
            Record::BatchControl(control) => {
                let Some((header, entries)) = self.open_batch.take() else {
                    return unexpected("batch control", "outside a batch");
                };
                debug!(
                    "Record {}: closed batch {} with {} entries",
                    self.record,
                    header.batch_number,
                    entries.len()
                );
                self.batches.push(Batch::from_parts(header, entries, control));
            }
            Record::FileControl(control) => {
                if self.open_batch.is_some() {
                    return unexpected("file control", "a batch is still open");
                }
                self.control = Some(control);
            }
            Record::Filler => return unexpected("filler", "before file control"),
        }
        Ok(())
    }

    fn finish(self) -> Result<File> {
        let truncated = |what| AchError::Format {
            line: self.record,
            source: FormatError::Truncated(what),
        };
        let header = self.header.ok_or_else(|| truncated("file header"))?;
        if self.open_batch.is_some() {
            return Err(truncated("batch control"));
        }
        let control = self.control.ok_or_else(|| truncated("file control"))?;
        Ok(File::from_parts(header, self.batches, control))
    }
}
