//! Coverage statistics

use core::fmt;
use std::ops::Range;

/// How much of the image extent a capture populated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageStats {
    /// Maximal populated ranges, half-open, in offset order
    pub ranges: Vec<Range<u64>>,
    /// Total populated bytes
    pub populated: u64,
    /// One past the highest populated offset
    pub extent: u64,
}

impl CoverageStats {
    /// Populated bytes as a percentage of the extent, in `[0, 100]`
    pub fn percentage(&self) -> f64 {
        if self.extent == 0 {
            0.0
        } else {
            self.populated as f64 * 100.0 / self.extent as f64
        }
    }

    /// Unpopulated bytes below the extent
    pub fn holes(&self) -> u64 {
        self.extent - self.populated
    }
}

impl fmt::Display for CoverageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image extent: 0x{:X}", self.extent)?;
        for range in &self.ranges {
            writeln!(f, "Range of data: 0x{:X} to 0x{:X}", range.start, range.end)?;
        }
        writeln!(
            f,
            "Total bytes of data: 0x{:X} ({:.2}%)",
            self.populated,
            self.percentage()
        )?;
        write!(f, "Unread bytes: 0x{:X}", self.holes())
    }
}
