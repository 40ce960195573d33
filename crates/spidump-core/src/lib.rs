//! spidump-core - Rebuild SPI flash images from bus captures
//!
//! This crate turns a logic analyzer capture of a four-wire SPI flash bus
//! (chip-select, clock, MOSI, MISO) back into the flash contents the host
//! read out of the chip.
//!
//! The pipeline has three stages:
//!
//! - [`capture`] reads CSV rows into [`capture::Sample`]s
//! - [`decoder`] clocks the samples into bytes and frames them into
//!   [`decoder::Transaction`]s according to the flash command set
//! - [`image`] places the data of read transactions at their flash offsets
//!   in a [`image::SparseImage`] and writes it out as a sparse file
//!
//! # Example
//!
//! ```ignore
//! use spidump_core::{capture::CaptureReader, config::Config, image::SparseImage};
//!
//! let config = Config::default();
//! let file = std::io::BufReader::new(std::fs::File::open("trace.csv")?);
//! let capture = CaptureReader::new(file, &config.capture)?;
//! let mut image = SparseImage::new();
//! spidump_core::dump(capture, &config.decoder, &mut image, |txn| println!("{}", txn))?;
//! image.write_file("flash.bin")?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod capture;
pub mod config;
pub mod decoder;
mod dump;
pub mod error;
pub mod image;
pub mod spi;

pub use dump::{dump, DumpSummary};
pub use error::{Error, Result};
