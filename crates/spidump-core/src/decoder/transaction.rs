//! Decoded SPI transactions

use core::fmt;

use crate::error::DecodeError;
use crate::spi::{opcodes, DataDirection, FlashCommand, IoMode};

/// Number of data bytes per row in the diagnostic listing
const BYTES_PER_ROW: usize = 8;

/// One chip-select window worth of decoded bus traffic
///
/// The command is fixed when the transaction is created; arguments and data
/// only ever grow.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    command: FlashCommand,
    pub(super) args: Vec<u8>,
    pub(super) dummy_bytes: usize,
    pub(super) data: Vec<u8>,
    pub(super) end_time: Option<f64>,
    pub(super) repeats: usize,
}

impl Transaction {
    pub(super) fn new(command: FlashCommand) -> Self {
        Self {
            command,
            args: Vec::new(),
            dummy_bytes: 0,
            data: Vec::new(),
            end_time: None,
            repeats: 1,
        }
    }

    /// The command byte
    pub fn command(&self) -> FlashCommand {
        self.command
    }

    /// Argument bytes in bus order
    pub fn args(&self) -> &[u8] {
        &self.args
    }

    /// Number of bytes clocked during dummy cycles
    pub fn dummy_bytes(&self) -> usize {
        self.dummy_bytes
    }

    /// Data phase bytes in bus order
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Capture time of the sample that released chip-select
    ///
    /// `None` for a no-phase command that was closed by the next command
    /// byte within the same chip-select window.
    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    /// Number of back-to-back command bytes merged into this transaction
    ///
    /// Only idle `00` bytes are merged; everything else is 1.
    pub fn repeats(&self) -> usize {
        self.repeats
    }

    /// Direction of the data phase
    pub fn direction(&self) -> DataDirection {
        self.command.framing().direction
    }

    /// Returns true if the address and data phases used dual I/O
    pub fn is_dual(&self) -> bool {
        self.command.framing().io_mode == IoMode::DualIo
    }

    /// Flash offset of an offset-addressed read
    ///
    /// The first three arguments form a big-endian 24-bit address. Returns
    /// `None` for other commands, or if chip-select was released before the
    /// address was complete.
    pub fn address(&self) -> Option<u32> {
        if !self.command.is_offset_addressed() {
            return None;
        }
        match self.args.as_slice() {
            [a2, a1, a0, ..] => Some(u32::from_be_bytes([0, *a2, *a1, *a0])),
            _ => None,
        }
    }

    /// Number of argument bytes the command expects but chip-select was
    /// released before they arrived
    pub fn missing_args(&self) -> usize {
        self.command.framing().args.saturating_sub(self.args.len())
    }

    /// Where this transaction's data belongs in the flash image, if anywhere
    pub fn placement(&self) -> Option<(u32, &[u8])> {
        if self.data.is_empty() {
            return None;
        }
        self.address().map(|addr| (addr, self.data.as_slice()))
    }

    /// Reject Fast Read Dual I/O transactions that leave continuous read
    /// mode enabled
    ///
    /// With continuous read mode on, the next transaction starts with an
    /// address instead of a command byte, which this decoder cannot frame.
    pub fn check_continuation(&self) -> Result<(), DecodeError> {
        if self.command != FlashCommand::FastReadDualIo {
            return Ok(());
        }
        match self.args.get(3) {
            Some(&mode) if mode != opcodes::DIOR_MODE_NO_CONTINUE => {
                Err(DecodeError::UnsupportedContinuation {
                    mode,
                    expected: opcodes::DIOR_MODE_NO_CONTINUE,
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(time) = self.end_time {
            write!(f, "{:.4} ", time)?;
        }
        write!(f, "Command: {} ({})", self.command.name(), self.command)?;
        if self.repeats > 1 {
            write!(f, " x{}", self.repeats)?;
        }
        if !self.args.is_empty() {
            write!(f, "\nArguments: {}", hex_row(&self.args))?;
        }
        for row in self.data.chunks(BYTES_PER_ROW) {
            write!(f, "\n{}", hex_row(row))?;
        }
        Ok(())
    }
}

fn hex_row(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(command: FlashCommand, args: &[u8], data: &[u8]) -> Transaction {
        let mut t = Transaction::new(command);
        t.args = args.to_vec();
        t.data = data.to_vec();
        t
    }

    #[test]
    fn test_address_is_big_endian() {
        let t = txn(FlashCommand::ReadData, &[0x12, 0x34, 0x56], &[0xAA]);
        assert_eq!(t.address(), Some(0x123456));
        assert_eq!(t.placement(), Some((0x123456, &[0xAA][..])));
    }

    #[test]
    fn test_dual_read_address_ignores_mode_byte() {
        let t = txn(FlashCommand::FastReadDualIo, &[0x00, 0x10, 0x00, 0x05], &[1]);
        assert_eq!(t.address(), Some(0x1000));
        assert!(t.is_dual());
        assert_eq!(t.check_continuation(), Ok(()));
    }

    #[test]
    fn test_no_placement_without_data_or_address() {
        assert_eq!(txn(FlashCommand::ReadData, &[0, 0, 0x10], &[]).placement(), None);
        assert_eq!(txn(FlashCommand::ReadData, &[0, 0], &[1, 2]).placement(), None);
        // Page program carries an address but it is not a read
        assert_eq!(txn(FlashCommand::PageProgram, &[0, 0, 0], &[1]).placement(), None);
    }

    #[test]
    fn test_missing_args() {
        assert_eq!(txn(FlashCommand::ReadData, &[0, 0, 0x10], &[]).missing_args(), 0);
        assert_eq!(txn(FlashCommand::ReadData, &[0], &[]).missing_args(), 2);
        // Address complete but no mode byte
        let t = txn(FlashCommand::FastReadDualIo, &[0, 0, 0x10], &[]);
        assert_eq!(t.address(), Some(0x10));
        assert_eq!(t.missing_args(), 1);
        assert_eq!(txn(FlashCommand::WriteEnable, &[], &[]).missing_args(), 0);
    }

    #[test]
    fn test_continuation_mode_rejected() {
        let t = txn(FlashCommand::FastReadDualIo, &[0, 0, 0, 0xA5], &[]);
        assert_eq!(
            t.check_continuation(),
            Err(DecodeError::UnsupportedContinuation {
                mode: 0xA5,
                expected: 0x05
            })
        );
        // Other commands never carry a mode byte
        assert_eq!(txn(FlashCommand::ReadData, &[0, 0, 0], &[]).check_continuation(), Ok(()));
    }

    #[test]
    fn test_display_listing() {
        let mut t = txn(
            FlashCommand::ReadData,
            &[0x00, 0x00, 0x10],
            &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
        );
        t.end_time = Some(1.5);
        assert_eq!(
            t.to_string(),
            "1.5000 Command: Read Data (03)\n\
             Arguments: 00 00 10\n\
             00 01 02 03 04 05 06 07\n\
             08 09"
        );
    }

    #[test]
    fn test_display_without_time_or_args() {
        let t = txn(FlashCommand::WriteEnable, &[], &[]);
        assert_eq!(t.to_string(), "Command: Write Enable (06)");
    }

    #[test]
    fn test_display_repeated_nop() {
        let mut t = txn(FlashCommand::Nop, &[], &[]);
        t.repeats = 12;
        assert_eq!(t.to_string(), "Command: ***Unknown*** (00) x12");
    }
}
