//! SPI flash opcodes seen on the bus
//!
//! Only the opcodes the decoder frames are listed here. Anything else on the
//! bus is rejected as an unknown command.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - required before any write/erase operation
pub const WREN: u8 = 0x06;

// ============================================================================
// Status register operations
// ============================================================================

/// Read Status Register 1
pub const RDSR: u8 = 0x05;
/// Read Status Register 2
pub const RDSR2: u8 = 0x35;

// ============================================================================
// Identification
// ============================================================================

/// Read JEDEC ID (manufacturer + device ID)
pub const RDID: u8 = 0x9F;
/// Read Electronic Manufacturer & Device ID (legacy)
pub const REMS: u8 = 0x90;
/// Read Electronic Signature / Release from Deep Power Down
pub const RES: u8 = 0xAB;

// ============================================================================
// Read commands - 3-byte address
// ============================================================================

/// Read Data (up to ~33 MHz)
pub const READ: u8 = 0x03;
/// Dual I/O Read (1-2-2)
pub const DIOR: u8 = 0xBB;

/// Mode byte sent after a Dual I/O Read address that keeps continuous read
/// mode off, so the next transaction starts with a command byte again
pub const DIOR_MODE_NO_CONTINUE: u8 = 0x05;

// ============================================================================
// Page Program
// ============================================================================

/// Page Program with 3-byte address
pub const PP: u8 = 0x02;

// ============================================================================
// SFDP (Serial Flash Discoverable Parameters)
// ============================================================================

/// Read SFDP (JEDEC JESD216)
pub const RDSFDP: u8 = 0x5A;

// ============================================================================
// Bus idle
// ============================================================================

/// All-zero byte, clocked by some hosts while the bus is otherwise idle
pub const NOP: u8 = 0x00;
