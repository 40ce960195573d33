//! Bit accumulation on the two data lines

use heapless::Vec;

use crate::spi::IoMode;

/// A byte assembled from the bus, as seen on each line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusByte {
    /// Byte clocked on MOSI (host to flash)
    pub mosi: u8,
    /// Byte clocked on MISO (flash to host)
    pub miso: u8,
}

/// Collects one bit per line on every rising clock edge until a byte is
/// complete
#[derive(Debug, Default)]
pub struct BitAccumulator {
    mosi: Vec<bool, 8>,
    miso: Vec<bool, 8>,
}

impl BitAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sampled bit pair, returning the byte once it is complete
    ///
    /// In single mode each line carries its own byte. In dual I/O mode both
    /// lines carry halves of the same byte: for each of the four clocks MISO
    /// holds the higher bit of the pair and MOSI the lower one. The combined
    /// byte is reported on both lines.
    pub fn push(&mut self, mosi: bool, miso: bool, mode: IoMode) -> Option<BusByte> {
        // A byte is taken out as soon as it completes, so neither line ever
        // holds more than 8 bits.
        let _ = self.mosi.push(mosi);
        let _ = self.miso.push(miso);

        if self.mosi.len() < mode.clocks_per_byte() {
            return None;
        }

        let byte = match mode {
            IoMode::Single => BusByte {
                mosi: pack(&self.mosi),
                miso: pack(&self.miso),
            },
            IoMode::DualIo => {
                let value = self
                    .miso
                    .iter()
                    .zip(self.mosi.iter())
                    .fold(0u8, |acc, (&hi, &lo)| (acc << 2) | (u8::from(hi) << 1) | u8::from(lo));
                BusByte {
                    mosi: value,
                    miso: value,
                }
            }
        };
        self.clear();
        Some(byte)
    }

    /// Returns true if no bits are pending
    pub fn is_empty(&self) -> bool {
        self.mosi.is_empty()
    }

    /// Drop any pending bits
    pub fn clear(&mut self) {
        self.mosi.clear();
        self.miso.clear();
    }

    /// Pending bits as `0`/`1` strings, MOSI first
    pub fn pending(&self) -> (String, String) {
        (bit_string(&self.mosi), bit_string(&self.miso))
    }
}

/// Pack bits MSB first
fn pack(bits: &[bool]) -> u8 {
    bits.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit))
}

fn bit_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}
