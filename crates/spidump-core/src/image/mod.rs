//! Sparse flash image
//!
//! A capture rarely reads the whole chip. [`SparseImage`] keeps only the
//! bytes that were actually seen on the bus, as a sorted map of maximal
//! contiguous runs, and writes them out with seeks so the gaps stay holes in
//! the output file.

mod stats;

pub use stats::CoverageStats;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::Path;

use crate::decoder::Transaction;
use crate::error::DecodeError;

/// Flash contents recovered from a capture
///
/// Runs never overlap or touch: any write that overlaps or abuts existing
/// runs merges them into one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseImage {
    /// Run start offset -> run bytes
    runs: BTreeMap<u64, Vec<u8>>,
}

impl SparseImage {
    /// Create an empty image
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `data` at `offset`, overwriting anything already there
    pub fn add_data(&mut self, offset: u64, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let end = offset + data.len() as u64;

        // Runs are disjoint, so their ends are sorted like their starts:
        // walking back from the last run starting at or before `end`, stop at
        // the first one that ends before `offset`.
        let touching: Vec<u64> = self
            .runs
            .range(..=end)
            .rev()
            .take_while(|&(&start, bytes)| start + bytes.len() as u64 >= offset)
            .map(|(&start, _)| start)
            .collect();

        let start = touching.last().map_or(offset, |&s| s.min(offset));
        let mut merged_end = end;
        let mut merged = Vec::new();
        for run_start in touching.iter().rev() {
            if let Some(bytes) = self.runs.remove(run_start) {
                merged_end = merged_end.max(run_start + bytes.len() as u64);
                let at = (run_start - start) as usize;
                if merged.len() < at {
                    merged.resize(at, 0);
                }
                merged.truncate(at);
                merged.extend_from_slice(&bytes);
            }
        }
        merged.resize((merged_end - start) as usize, 0);

        let at = (offset - start) as usize;
        merged[at..at + data.len()].copy_from_slice(data);
        log::trace!("Image run 0x{:X}..0x{:X}", start, merged_end);
        self.runs.insert(start, merged);
    }

    /// Place a finished transaction into the image
    ///
    /// Only offset-addressed reads carry flash contents; everything else is
    /// ignored. Returns the range written, if any.
    ///
    /// A Fast Read Dual I/O transaction that enables continuous read mode is
    /// still placed (its own data is valid) before the error is returned,
    /// since no later transaction can be framed.
    pub fn record(&mut self, txn: &Transaction) -> Result<Option<Range<u64>>, DecodeError> {
        let placed = match txn.placement() {
            Some((addr, data)) => {
                let start = u64::from(addr);
                self.add_data(start, data);
                Some(start..start + data.len() as u64)
            }
            None => None,
        };
        if txn.command().is_offset_addressed() && txn.missing_args() > 0 {
            log::warn!(
                "{} ({}) ended after {} of {} argument bytes{}",
                txn.command().name(),
                txn.command(),
                txn.args().len(),
                txn.command().framing().args,
                if placed.is_none() { ", data not placed" } else { "" }
            );
        }
        txn.check_continuation()?;
        Ok(placed)
    }

    /// Returns true if no byte has been written
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// One past the highest populated offset, 0 for an empty image
    pub fn extent(&self) -> u64 {
        self.runs
            .iter()
            .next_back()
            .map_or(0, |(&start, bytes)| start + bytes.len() as u64)
    }

    /// Number of populated bytes
    pub fn populated(&self) -> u64 {
        self.runs.values().map(|bytes| bytes.len() as u64).sum()
    }

    /// Byte at `offset`, or `None` for a hole
    pub fn get(&self, offset: u64) -> Option<u8> {
        let (&start, bytes) = self.runs.range(..=offset).next_back()?;
        bytes.get((offset - start) as usize).copied()
    }

    /// Maximal populated ranges with their bytes, in offset order
    pub fn ranges(&self) -> impl Iterator<Item = (Range<u64>, &[u8])> + '_ {
        self.runs
            .iter()
            .map(|(&start, bytes)| (start..start + bytes.len() as u64, bytes.as_slice()))
    }

    /// Coverage statistics of the image
    pub fn stats(&self) -> CoverageStats {
        CoverageStats {
            ranges: self.ranges().map(|(range, _)| range).collect(),
            populated: self.populated(),
            extent: self.extent(),
        }
    }

    /// Write every populated range at its offset, leaving holes unwritten
    pub fn write_to<W: Write + Seek>(&self, out: &mut W) -> std::io::Result<()> {
        for (range, bytes) in self.ranges() {
            out.seek(SeekFrom::Start(range.start))?;
            out.write_all(bytes)?;
        }
        out.flush()
    }

    /// Create (or truncate) `path` and write the image to it as a sparse file
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = File::create(path.as_ref())?;
        self.write_to(&mut file)?;
        log::debug!(
            "Wrote {} ranges to {}",
            self.runs.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}
