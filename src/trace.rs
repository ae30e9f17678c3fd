//! Sequential trace number assignment.

use crate::entry::EntryDetail;
use crate::error::{AchError, Result};
use crate::field;
use log::debug;
use std::collections::HashSet;

/// Largest value of the 7-digit sequence part of a trace number.
pub const MAX_SEQUENCE: u32 = 9_999_999;

/// Yields `odfi[..8] + sequence` trace numbers, starting at sequence 1.
///
/// Trace numbers passed to [`TraceNumbers::reserve`] are skipped.
///
/// ```
/// use ach_engine::TraceNumbers;
///
/// let mut traces = TraceNumbers::new("121042882");
/// assert_eq!(traces.next().as_deref(), Some("121042880000001"));
/// assert_eq!(traces.next().as_deref(), Some("121042880000002"));
/// ```
#[derive(Debug, Clone)]
pub struct TraceNumbers {
    prefix: String,
    sequence: u32,
    taken: HashSet<String>,
}

impl TraceNumbers {
    pub fn new(odfi: &str) -> Self {
        TraceNumbers {
            prefix: field::digits(odfi, 8),
            sequence: 0,
            taken: HashSet::new(),
        }
    }

    pub fn reserve(&mut self, trace_number: &str) {
        self.taken.insert(trace_number.to_string());
    }
}

impl Iterator for TraceNumbers {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.sequence < MAX_SEQUENCE {
            self.sequence += 1;
            let candidate = format!("{}{}", self.prefix, field::numeric(self.sequence.into(), 7));
            if !self.taken.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Plans trace numbers for every entry whose trace number is blank.
///
/// Returns one `(entry index, trace number)` pair per blank entry without
/// touching the entries, so callers can bail out before mutating anything.
pub(crate) fn plan(odfi: &str, entries: &[EntryDetail]) -> Result<Vec<(usize, String)>> {
    let mut traces = TraceNumbers::new(odfi);
    for entry in entries.iter().filter(|e| !e.trace_number.is_empty()) {
        traces.reserve(&entry.trace_number);
    }

    let mut planned = Vec::new();
    for (idx, _) in entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.trace_number.is_empty())
    {
        let trace = traces.next().ok_or_else(|| {
            AchError::construction(format!(
                "trace number sequence exhausted for ODFI {}",
                odfi
            ))
        })?;
        debug!("Entry {}: assigned trace number {}", idx + 1, trace);
        planned.push((idx, trace));
    }

    Ok(planned)
}
