//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spidump")]
#[command(
    author,
    version,
    about = "Rebuild an SPI flash image from a logic analyzer capture",
    long_about = None
)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Let dummy bytes count down the dummy phase, so the data of commands
    /// with dummy cycles (SFDP, Release Powerdown/ID) is decoded
    #[arg(long)]
    pub count_dummy_cycles: bool,

    /// Don't list every decoded transaction
    #[arg(short, long)]
    pub quiet: bool,

    /// Don't show a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Capture file (CSV with Time[s], CS, CLK, MOSI and MISO columns)
    pub input: PathBuf,

    /// Output image file
    pub output: PathBuf,
}
