//! Flash commands and their framing

use core::fmt;

use super::{opcodes, IoMode};
use crate::error::DecodeError;

/// Which line carries the data phase of a transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataDirection {
    /// The command has no data phase
    None,
    /// Flash to host, sampled on MISO
    Read,
    /// Host to flash, sampled on MOSI
    Write,
}

/// Fixed framing of a command: what follows the command byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Framing {
    /// Number of argument (address/mode) bytes
    pub args: usize,
    /// Number of dummy bytes after the arguments
    pub dummy: usize,
    /// Direction of the data phase
    pub direction: DataDirection,
    /// I/O mode of everything after the command byte
    pub io_mode: IoMode,
}

impl Framing {
    const fn new(args: usize, dummy: usize, direction: DataDirection, io_mode: IoMode) -> Self {
        Self {
            args,
            dummy,
            direction,
            io_mode,
        }
    }
}

/// A flash command the decoder can frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlashCommand {
    /// Read SFDP Register (0x5A)
    ReadSfdp,
    /// Read Data (0x03)
    ReadData,
    /// Fast Read Dual I/O (0xBB)
    FastReadDualIo,
    /// JEDEC ID (0x9F)
    ReadJedecId,
    /// Read Status Register-1 (0x05)
    ReadStatus1,
    /// Read Status Register-2 (0x35)
    ReadStatus2,
    /// Write Enable (0x06)
    WriteEnable,
    /// Page Program (0x02)
    PageProgram,
    /// Read Manufacturer/Device ID (0x90)
    ReadManufacturerId,
    /// Release Powerdown/ID (0xAB)
    ReleasePowerDown,
    /// Idle all-zero byte (0x00)
    Nop,
}

impl FlashCommand {
    /// Every supported command
    pub const ALL: [FlashCommand; 11] = [
        Self::ReadSfdp,
        Self::ReadData,
        Self::FastReadDualIo,
        Self::ReadJedecId,
        Self::ReadStatus1,
        Self::ReadStatus2,
        Self::WriteEnable,
        Self::PageProgram,
        Self::ReadManufacturerId,
        Self::ReleasePowerDown,
        Self::Nop,
    ];

    /// Look up a command by opcode
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        Some(match opcode {
            opcodes::RDSFDP => Self::ReadSfdp,
            opcodes::READ => Self::ReadData,
            opcodes::DIOR => Self::FastReadDualIo,
            opcodes::RDID => Self::ReadJedecId,
            opcodes::RDSR => Self::ReadStatus1,
            opcodes::RDSR2 => Self::ReadStatus2,
            opcodes::WREN => Self::WriteEnable,
            opcodes::PP => Self::PageProgram,
            opcodes::REMS => Self::ReadManufacturerId,
            opcodes::RES => Self::ReleasePowerDown,
            opcodes::NOP => Self::Nop,
            _ => return None,
        })
    }

    /// The opcode byte of this command
    pub const fn opcode(self) -> u8 {
        match self {
            Self::ReadSfdp => opcodes::RDSFDP,
            Self::ReadData => opcodes::READ,
            Self::FastReadDualIo => opcodes::DIOR,
            Self::ReadJedecId => opcodes::RDID,
            Self::ReadStatus1 => opcodes::RDSR,
            Self::ReadStatus2 => opcodes::RDSR2,
            Self::WriteEnable => opcodes::WREN,
            Self::PageProgram => opcodes::PP,
            Self::ReadManufacturerId => opcodes::REMS,
            Self::ReleasePowerDown => opcodes::RES,
            Self::Nop => opcodes::NOP,
        }
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReadSfdp => "Read SFDP Register",
            Self::ReadData => "Read Data",
            Self::FastReadDualIo => "Fast Read Dual I/O",
            Self::ReadJedecId => "JEDEC ID",
            Self::ReadStatus1 => "Read Status Register-1",
            Self::ReadStatus2 => "Read Status Register-2",
            Self::WriteEnable => "Write Enable",
            Self::PageProgram => "Page Program",
            Self::ReadManufacturerId => "Read Manufacturer/Device ID",
            Self::ReleasePowerDown => "Release Powerdown/ID",
            Self::Nop => "***Unknown***",
        }
    }

    /// Framing of the bytes that follow the command byte
    pub const fn framing(self) -> Framing {
        use DataDirection::{Read, Write};
        use IoMode::{DualIo, Single};

        match self {
            Self::ReadSfdp => Framing::new(3, 1, Read, Single),
            Self::ReadData => Framing::new(3, 0, Read, Single),
            Self::FastReadDualIo => Framing::new(4, 0, Read, DualIo),
            Self::ReadJedecId | Self::ReadStatus1 | Self::ReadStatus2 => {
                Framing::new(0, 0, Read, Single)
            }
            Self::WriteEnable | Self::Nop => Framing::new(0, 0, DataDirection::None, Single),
            Self::PageProgram => Framing::new(3, 0, Write, Single),
            Self::ReadManufacturerId => Framing::new(3, 0, Read, Single),
            Self::ReleasePowerDown => Framing::new(0, 3, Read, Single),
        }
    }

    /// Returns true if the first three arguments are a flash offset whose
    /// data belongs in the image
    pub const fn is_offset_addressed(self) -> bool {
        matches!(self, Self::ReadData | Self::FastReadDualIo)
    }
}

impl TryFrom<u8> for FlashCommand {
    type Error = DecodeError;

    fn try_from(opcode: u8) -> Result<Self, Self::Error> {
        Self::from_opcode(opcode).ok_or(DecodeError::UnknownCommand { opcode })
    }
}

impl fmt::Display for FlashCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.opcode())
    }
}
