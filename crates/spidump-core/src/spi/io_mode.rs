//! SPI I/O modes

/// I/O mode of the address and data phases of a transaction
///
/// The command byte itself is always clocked on a single line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IoMode {
    /// Standard SPI: 1-1-1 (cmd, addr, data all on single line)
    #[default]
    Single,
    /// Dual I/O: 1-2-2 (addr and data on 2 lines)
    DualIo,
}

impl IoMode {
    /// Returns the number of data lines used after the command byte
    pub const fn data_lines(&self) -> u8 {
        match self {
            Self::Single => 1,
            Self::DualIo => 2,
        }
    }

    /// Returns the number of clock edges needed to move one byte
    pub const fn clocks_per_byte(&self) -> usize {
        8 / self.data_lines() as usize
    }

    /// Returns true if this mode uses multiple data lines
    pub const fn is_multi_io(&self) -> bool {
        !matches!(self, Self::Single)
    }
}
