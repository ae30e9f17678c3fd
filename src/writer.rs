//! Whole-file encoding to a byte stream.

use crate::error::{AchError, FormatError, Result};
use crate::field::RECORD_LENGTH;
use crate::file::{File, BLOCKING_FACTOR};
use log::debug;
use std::io::Write;

/// Writes an ACH file as `\n`-terminated records padded to a full block.
///
/// Controls are written as stored; finalize the file first so they match
/// the entries. A record that does not encode to exactly 94 ASCII bytes
/// stops the write with a format error naming its line; validate the file
/// first to catch such values by field.
pub struct Writer<W> {
    inner: W,
    record: usize,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Writer { inner, record: 0 }
    }

    pub fn write(&mut self, file: &File) -> Result<()> {
        self.line(&file.header().to_line())?;
        for batch in file.batches() {
            self.line(&batch.header().to_line())?;
            for entry in batch.entries() {
                self.line(&entry.to_line())?;
                for addenda in &entry.addenda {
                    self.line(&addenda.to_line())?;
                }
            }
            self.line(&batch.control().to_line())?;
        }
        self.line(&file.control().to_line())?;

        let lines = file.line_count();
        let filler_lines = lines.next_multiple_of(BLOCKING_FACTOR) - lines;
        let filler = "9".repeat(RECORD_LENGTH);
        for _ in 0..filler_lines {
            self.line(&filler)?;
        }
        debug!("Wrote {} records and {} filler lines", lines, filler_lines);

        self.inner.flush()?;
        Ok(())
    }

    fn line(&mut self, record: &str) -> Result<()> {
        self.record += 1;
        let invalid = if !record.is_ascii() {
            Some(FormatError::NonAscii)
        } else if record.len() != RECORD_LENGTH {
            Some(FormatError::WrongLength(record.len()))
        } else {
            None
        };
        if let Some(source) = invalid {
            return Err(AchError::Format {
                line: self.record,
                source,
            });
        }
        self.inner.write_all(record.as_bytes())?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }
}
