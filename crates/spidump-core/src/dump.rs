//! Capture to image pipeline

use std::io::BufRead;

use crate::capture::CaptureReader;
use crate::config::DecoderConfig;
use crate::decoder::{Decoder, Transaction};
use crate::error::Result;
use crate::image::SparseImage;

/// Counters collected while decoding a capture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Samples read from the capture
    pub samples: usize,
    /// Transactions decoded
    pub transactions: usize,
    /// Transactions whose data was placed in the image
    pub placed: usize,
}

/// Decode a whole capture into `image`
///
/// `report` is called with every finished transaction before its data is
/// placed. Decoding stops at the first error; everything placed up to that
/// point stays in `image`, so callers can still write out a partial dump.
pub fn dump<R, F>(
    capture: CaptureReader<R>,
    config: &DecoderConfig,
    image: &mut SparseImage,
    mut report: F,
) -> Result<DumpSummary>
where
    R: BufRead,
    F: FnMut(&Transaction),
{
    let mut decoder = Decoder::new(config.dummy_cycles());
    let mut summary = DumpSummary::default();

    for sample in capture {
        let sample = sample?;
        summary.samples += 1;

        if let Some(txn) = decoder.feed(&sample)? {
            summary.transactions += 1;
            report(&txn);
            if let Some(range) = image.record(&txn)? {
                log::debug!("Placed 0x{:X}..0x{:X}", range.start, range.end);
                summary.placed += 1;
            }
        }
    }

    decoder.finish();
    log::info!(
        "Decoded {} transactions from {} samples",
        summary.transactions,
        summary.samples
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{DecodeError, Error};
    use crate::spi::FlashCommand;
    use std::io::Cursor;

    /// Renders bus traffic as a CSV capture with an active-low chip-select
    struct Csv {
        text: String,
        time: f64,
    }

    impl Csv {
        fn new() -> Self {
            let mut csv = Self {
                text: "Time[s], CS, CLK, MOSI, MISO\n".into(),
                time: 0.0,
            };
            csv.idle();
            csv
        }

        fn row(&mut self, cs: u8, clk: u8, mosi: u8, miso: u8) {
            self.time += 1e-7;
            self.text += &format!("{:.9}, {}, {}, {}, {}\n", self.time, cs, clk, mosi, miso);
        }

        fn idle(&mut self) {
            self.row(1, 0, 0, 0);
        }

        fn byte(&mut self, mosi: u8, miso: u8) {
            for i in (0..8).rev() {
                let (o, m) = ((mosi >> i) & 1, (miso >> i) & 1);
                self.row(0, 0, o, m);
                self.row(0, 1, o, m);
            }
        }

        /// One byte in dual I/O: for each clock MISO carries the high bit,
        /// MOSI the low
        fn dual(&mut self, value: u8) {
            for pair in 0..4 {
                let hi = 7 - 2 * pair;
                let (o, m) = ((value >> (hi - 1)) & 1, (value >> hi) & 1);
                self.row(0, 0, o, m);
                self.row(0, 1, o, m);
            }
        }

        fn read_data(&mut self, addr: u32, data: &[u8]) {
            let [_, a2, a1, a0] = addr.to_be_bytes();
            for cmd in [0x03, a2, a1, a0] {
                self.byte(cmd, 0xFF);
            }
            for &b in data {
                self.byte(0x00, b);
            }
            self.idle();
        }

        fn transaction(&mut self, mosi: &[u8]) {
            for &b in mosi {
                self.byte(b, 0xFF);
            }
            self.idle();
        }
    }

    fn run(csv: &Csv, image: &mut SparseImage) -> (Vec<Transaction>, Result<DumpSummary>) {
        let config = Config::default();
        let capture =
            CaptureReader::new(Cursor::new(csv.text.as_bytes()), &config.capture).unwrap();
        let mut seen = Vec::new();
        let result = dump(capture, &config.decoder, image, |txn| seen.push(txn.clone()));
        (seen, result)
    }

    #[test]
    fn test_single_read() {
        let mut csv = Csv::new();
        csv.read_data(0x10, &[0xAA, 0xBB, 0xCC]);

        let mut image = SparseImage::new();
        let (txns, result) = run(&csv, &mut image);
        let summary = result.unwrap();

        assert_eq!(summary.transactions, 1);
        assert_eq!(summary.placed, 1);
        assert_eq!(txns[0].command(), FlashCommand::ReadData);
        assert_eq!(image.stats().ranges, [0x10..0x13]);

        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out).unwrap();
        assert_eq!(&out.get_ref()[0x10..], &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_write_enable_only() {
        let mut csv = Csv::new();
        csv.transaction(&[0x06]);

        let mut image = SparseImage::new();
        let (txns, result) = run(&csv, &mut image);
        assert_eq!(result.unwrap().transactions, 1);
        assert_eq!(txns[0].command(), FlashCommand::WriteEnable);
        assert!(image.is_empty());
        assert!(image.stats().ranges.is_empty());
    }

    #[test]
    fn test_two_reads_leave_gap() {
        let mut csv = Csv::new();
        csv.read_data(0x000, &[1, 2, 3, 4]);
        csv.transaction(&[0x05, 0x00]);
        csv.read_data(0x100, &[5, 6]);

        let mut image = SparseImage::new();
        let (_, result) = run(&csv, &mut image);
        assert_eq!(result.unwrap().placed, 2);

        let stats = image.stats();
        assert_eq!(stats.ranges, [0x000..0x004, 0x100..0x102]);
        assert_eq!(stats.populated, 6);
        assert_eq!(stats.extent, 0x102);
    }

    #[test]
    fn test_unknown_command_stops_decoding() {
        let mut csv = Csv::new();
        csv.read_data(0x20, &[0x11]);
        csv.transaction(&[0xFF]);
        csv.read_data(0x40, &[0x22]);

        let mut image = SparseImage::new();
        let (txns, result) = run(&csv, &mut image);

        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::UnknownCommand { opcode: 0xFF }))
        ));
        assert_eq!(txns.len(), 1);
        assert_eq!(image.stats().ranges, [0x20..0x21]);
        assert_eq!(image.get(0x40), None);
    }

    #[test]
    fn test_continuation_mode_keeps_data() {
        let mut csv = Csv::new();
        csv.byte(0xBB, 0xFF);
        for value in [0x00, 0x00, 0x80, 0xA0, 0x5A] {
            csv.dual(value);
        }
        csv.idle();
        csv.read_data(0, &[1]);

        let mut image = SparseImage::new();
        let (txns, result) = run(&csv, &mut image);

        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::UnsupportedContinuation { mode: 0xA0, .. }))
        ));
        assert_eq!(txns.len(), 1);
        assert_eq!(image.get(0x80), Some(0x5A));
        assert_eq!(image.get(0), None);
    }

    #[test]
    fn test_dual_read_without_mode_byte() {
        let mut csv = Csv::new();
        csv.byte(0xBB, 0xFF);
        for value in [0x00, 0x00, 0x10] {
            csv.dual(value);
        }
        csv.idle();
        csv.read_data(0x20, &[0x33]);

        let mut image = SparseImage::new();
        let (txns, result) = run(&csv, &mut image);
        let summary = result.unwrap();

        assert_eq!(summary.transactions, 2);
        assert_eq!(summary.placed, 1);
        assert_eq!(txns[0].command(), FlashCommand::FastReadDualIo);
        assert_eq!(txns[0].address(), Some(0x10));
        assert_eq!(txns[0].missing_args(), 1);
        assert_eq!(image.stats().ranges, [0x20..0x21]);
    }

    #[test]
    fn test_truncated_transaction_reported() {
        let mut csv = Csv::new();
        csv.read_data(0, &[0x42]);
        csv.row(0, 0, 1, 1);
        csv.row(0, 1, 1, 1);
        csv.idle();

        let mut image = SparseImage::new();
        let (_, result) = run(&csv, &mut image);
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::TruncatedTransaction { .. }))
        ));
        assert_eq!(image.get(0), Some(0x42));
    }
}
