//! Logic analyzer capture reader
//!
//! Reads a CSV export with one row per sample:
//!
//! ```text
//! Time[s], CS, CLK, MOSI, MISO
//! 0.000000000, 1, 1, 0, 0
//! 0.000000120, 0, 0, 1, 1
//! ```
//!
//! Columns are looked up by name in the header (surrounding whitespace is
//! ignored), so extra columns and any column order are fine.

use std::io::BufRead;

use crate::config::CaptureConfig;
use crate::error::CaptureError;

/// One sample of the four bus lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Capture time in seconds
    pub time: f64,
    /// Chip-select asserted (polarity already applied)
    pub selected: bool,
    /// Clock level
    pub clk: bool,
    /// MOSI level (host to flash)
    pub mosi: bool,
    /// MISO level (flash to host)
    pub miso: bool,
}

/// Column positions resolved from the header
#[derive(Debug, Clone)]
struct Columns {
    time: usize,
    cs: usize,
    clk: usize,
    mosi: usize,
    miso: usize,
    names: [String; 4],
}

impl Columns {
    fn resolve(header: &str, config: &CaptureConfig) -> Result<Self, CaptureError> {
        let cells: Vec<&str> = header
            .trim_start_matches('\u{feff}')
            .split(',')
            .map(str::trim)
            .collect();
        let find = |name: &str| {
            let name = name.trim();
            cells
                .iter()
                .position(|&cell| cell == name)
                .ok_or_else(|| CaptureError::MissingColumn(name.to_string()))
        };

        let names = &config.columns;
        Ok(Self {
            time: find(&names.time)?,
            cs: find(&names.cs)?,
            clk: find(&names.clk)?,
            mosi: find(&names.mosi)?,
            miso: find(&names.miso)?,
            names: [
                names.cs.trim().to_string(),
                names.clk.trim().to_string(),
                names.mosi.trim().to_string(),
                names.miso.trim().to_string(),
            ],
        })
    }

    fn width(&self) -> usize {
        [self.time, self.cs, self.clk, self.mosi, self.miso]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Iterator over the samples of a CSV capture
pub struct CaptureReader<R> {
    lines: std::io::Lines<R>,
    line: usize,
    columns: Columns,
    cs_active_high: bool,
}

impl<R: BufRead> CaptureReader<R> {
    /// Read the header and resolve the configured columns
    pub fn new(reader: R, config: &CaptureConfig) -> Result<Self, CaptureError> {
        let mut lines = reader.lines();
        let header = lines.next().ok_or(CaptureError::EmptyCapture)??;
        let columns = Columns::resolve(&header, config)?;
        log::debug!(
            "Capture columns: time={} cs={} clk={} mosi={} miso={}",
            columns.time,
            columns.cs,
            columns.clk,
            columns.mosi,
            columns.miso
        );

        Ok(Self {
            lines,
            line: 1,
            columns,
            cs_active_high: config.cs_active_high,
        })
    }

    fn parse_row(&self, row: &str) -> Result<Sample, CaptureError> {
        let cells: Vec<&str> = row.split(',').map(str::trim).collect();
        let width = self.columns.width();
        if cells.len() < width {
            return Err(CaptureError::ShortRow {
                line: self.line,
                expected: width,
                found: cells.len(),
            });
        }

        let time_cell = cells[self.columns.time];
        let time = time_cell
            .parse::<f64>()
            .map_err(|_| CaptureError::InvalidTimestamp {
                line: self.line,
                value: time_cell.to_string(),
            })?;

        let level = |index: usize, name: &str| match cells[index] {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(CaptureError::InvalidLevel {
                line: self.line,
                column: name.to_string(),
                value: other.to_string(),
            }),
        };
        let [cs_name, clk_name, mosi_name, miso_name] = &self.columns.names;
        let cs = level(self.columns.cs, cs_name)?;

        Ok(Sample {
            time,
            selected: cs == self.cs_active_high,
            clk: level(self.columns.clk, clk_name)?,
            mosi: level(self.columns.mosi, mosi_name)?,
            miso: level(self.columns.miso, miso_name)?,
        })
    }
}

impl<R: BufRead> Iterator for CaptureReader<R> {
    type Item = Result<Sample, CaptureError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.lines.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            if row.trim().is_empty() {
                continue;
            }
            return Some(self.parse_row(&row));
        }
    }
}
