//! Error types for spidump-core
//!
//! Each stage of the pipeline has its own error enum. [`Error`] wraps all of
//! them so callers driving the whole pipeline only deal with one type.

use thiserror::Error;

/// Protocol errors raised while decoding the bus
///
/// All of these are fatal: a capture that trips one of them was either taken
/// with a command set this decoder does not know, or is corrupted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The command byte is not in the supported command set
    #[error("unknown command received: {opcode:02X}")]
    UnknownCommand {
        /// The opcode that was clocked in
        opcode: u8,
    },

    /// Fast Read Dual I/O was issued with continuous read mode enabled
    #[error(
        "Fast Read Dual I/O mode byte is {mode:02X}, expected {expected:02X} \
         (continuous read mode is not supported)"
    )]
    UnsupportedContinuation {
        /// The mode byte sent after the address
        mode: u8,
        /// The mode byte that disables continuous reads
        expected: u8,
    },

    /// Chip-select was released in the middle of a byte
    #[error("remaining data after chip-select deasserted (MOSI: {mosi}, MISO: {miso})")]
    TruncatedTransaction {
        /// Leftover MOSI bits, oldest first
        mosi: String,
        /// Leftover MISO bits, oldest first
        miso: String,
    },
}

/// Errors raised while reading a capture file
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The capture has no header line
    #[error("capture is empty (no header line)")]
    EmptyCapture,

    /// A configured column is not present in the header
    #[error("capture has no column named {0:?}")]
    MissingColumn(String),

    /// A row has fewer cells than the header requires
    #[error("line {line}: expected at least {expected} columns, found {found}")]
    ShortRow {
        /// 1-based line number
        line: usize,
        /// Number of cells needed to reach every configured column
        expected: usize,
        /// Number of cells actually present
        found: usize,
    },

    /// A signal cell is not `0` or `1`
    #[error("line {line}: invalid signal level {value:?} in column {column:?}")]
    InvalidLevel {
        /// 1-based line number
        line: usize,
        /// Column name
        column: String,
        /// Offending cell
        value: String,
    },

    /// The time cell is not a number
    #[error("line {line}: invalid timestamp {value:?}")]
    InvalidTimestamp {
        /// 1-based line number
        line: usize,
        /// Offending cell
        value: String,
    },

    /// Reading the underlying file failed
    #[error("failed to read capture: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path of the config file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for the config schema
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Bus protocol error
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Capture file error
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing the output image failed
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the crate-level Error type
pub type Result<T> = core::result::Result<T, Error>;
