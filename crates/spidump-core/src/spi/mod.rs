//! SPI flash command set
//!
//! Opcodes, I/O modes and the framing of every command the decoder
//! understands.

mod command;
mod io_mode;
pub mod opcodes;

pub use command::{DataDirection, FlashCommand, Framing};
pub use io_mode::IoMode;
