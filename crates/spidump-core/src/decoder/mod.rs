//! SPI transaction decoder
//!
//! The [`Decoder`] is fed one [`Sample`] at a time. On every rising clock
//! edge while chip-select is asserted it samples MOSI and MISO; whenever a
//! byte is complete it advances the command state machine:
//!
//! ```text
//!   AwaitingCommand --command byte--> AwaitingArguments --args done--> ReceivingData
//!          |                                                              ^
//!          +------------------- no arguments ----------------------------+
//! ```
//!
//! Releasing chip-select finalizes the current [`Transaction`] and resets the
//! state machine.

mod bits;
mod transaction;

pub use bits::{BitAccumulator, BusByte};
pub use transaction::Transaction;

use crate::capture::Sample;
use crate::error::DecodeError;
use crate::spi::{DataDirection, FlashCommand, IoMode};

/// How dummy cycles after the arguments are handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DummyCycles {
    /// Dummy bytes are counted but never satisfy the dummy phase, so a
    /// command with dummy cycles keeps its trailing bytes out of the data
    /// phase for the whole transaction
    #[default]
    Held,
    /// Each dummy byte counts down the dummy phase; the data phase starts
    /// once it is exhausted
    Counted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    AwaitingCommand,
    AwaitingArguments,
    ReceivingData,
}

/// Per-sample SPI flash transaction decoder
#[derive(Debug)]
pub struct Decoder {
    dummy_cycles: DummyCycles,
    bits: BitAccumulator,
    prev_clk: bool,
    selected: bool,
    state: State,
    io_mode: IoMode,
    args_remaining: usize,
    dummy_remaining: usize,
    current: Option<Transaction>,
}

impl Decoder {
    /// Create a decoder with the given dummy cycle policy
    pub fn new(dummy_cycles: DummyCycles) -> Self {
        Self {
            dummy_cycles,
            bits: BitAccumulator::new(),
            // A capture starting with the clock low must not count its first
            // high sample as an edge only because there is no history.
            prev_clk: true,
            selected: false,
            state: State::AwaitingCommand,
            io_mode: IoMode::Single,
            args_remaining: 0,
            dummy_remaining: 0,
            current: None,
        }
    }

    /// Feed one sample
    ///
    /// Returns a transaction when one is finished: either chip-select was
    /// released, or a new command byte followed a command without any
    /// arguments or data within the same chip-select window.
    pub fn feed(&mut self, sample: &Sample) -> Result<Option<Transaction>, DecodeError> {
        let rising = !self.prev_clk && sample.clk;
        self.prev_clk = sample.clk;

        if !sample.selected {
            return self.release(sample.time);
        }

        self.selected = true;
        if !rising {
            return Ok(None);
        }

        log::trace!(
            "{:.9}: MOSI={} MISO={}",
            sample.time,
            u8::from(sample.mosi),
            u8::from(sample.miso)
        );
        match self.bits.push(sample.mosi, sample.miso, self.io_mode) {
            Some(byte) => self.commit(byte),
            None => Ok(None),
        }
    }

    /// Finish decoding at the end of a capture
    ///
    /// A transaction still open at this point never saw chip-select released
    /// and is dropped.
    pub fn finish(self) {
        if !self.selected || self.is_idle() {
            return;
        }
        if let Some(txn) = &self.current {
            log::warn!(
                "Capture ended with chip-select asserted, dropping {} ({}) transaction",
                txn.command().name(),
                txn.command()
            );
        } else if !self.bits.is_empty() {
            log::warn!("Capture ended with chip-select asserted mid-byte");
        }
    }

    /// Returns true if no transaction is in progress
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.bits.is_empty()
    }

    fn release(&mut self, time: f64) -> Result<Option<Transaction>, DecodeError> {
        if !self.bits.is_empty() {
            let (mosi, miso) = self.bits.pending();
            return Err(DecodeError::TruncatedTransaction { mosi, miso });
        }

        self.selected = false;
        let finished = self.current.take().map(|mut txn| {
            txn.end_time = Some(time);
            txn
        });
        self.reset();
        Ok(finished)
    }

    fn reset(&mut self) {
        self.bits.clear();
        self.state = State::AwaitingCommand;
        self.io_mode = IoMode::Single;
        self.args_remaining = 0;
        self.dummy_remaining = 0;
        self.current = None;
    }

    fn commit(&mut self, byte: BusByte) -> Result<Option<Transaction>, DecodeError> {
        log::debug!("Byte MOSI={:02X} MISO={:02X}", byte.mosi, byte.miso);

        match self.state {
            State::AwaitingCommand => {
                let command = FlashCommand::try_from(byte.mosi)?;
                if let Some(txn) = self.current.as_mut() {
                    if command == FlashCommand::Nop && txn.command() == FlashCommand::Nop {
                        txn.repeats += 1;
                        return Ok(None);
                    }
                }
                // Only a command without arguments or data leaves us here
                // with a transaction open; the new command byte closes it.
                let finished = self.current.take();
                self.begin(command);
                return Ok(finished);
            }
            State::AwaitingArguments => {
                if let Some(txn) = self.current.as_mut() {
                    if self.args_remaining > 0 {
                        txn.args.push(byte.mosi);
                        self.args_remaining -= 1;
                    } else if self.dummy_remaining > 0 {
                        txn.dummy_bytes += 1;
                        if self.dummy_cycles == DummyCycles::Counted {
                            self.dummy_remaining -= 1;
                        }
                    }
                }
                if self.args_remaining == 0 && self.dummy_remaining == 0 {
                    self.state = State::ReceivingData;
                }
            }
            State::ReceivingData => {
                if let Some(txn) = self.current.as_mut() {
                    match txn.direction() {
                        DataDirection::Read => txn.data.push(byte.miso),
                        DataDirection::Write => txn.data.push(byte.mosi),
                        DataDirection::None => {}
                    }
                }
            }
        }
        Ok(None)
    }

    fn begin(&mut self, command: FlashCommand) {
        let framing = command.framing();
        log::debug!(
            "Command {} ({}){}",
            command.name(),
            command,
            if framing.io_mode.is_multi_io() { ", dual I/O" } else { "" }
        );

        self.io_mode = framing.io_mode;
        self.args_remaining = framing.args;
        self.dummy_remaining = framing.dummy;
        self.state = if framing.direction == DataDirection::None {
            State::AwaitingCommand
        } else if framing.args > 0 || framing.dummy > 0 {
            State::AwaitingArguments
        } else {
            State::ReceivingData
        };
        self.current = Some(Transaction::new(command));
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(DummyCycles::default())
    }
}
