//! Dump command implementation

use indicatif::{ProgressBar, ProgressStyle};
use spidump_core::capture::CaptureReader;
use spidump_core::config::Config;
use spidump_core::image::SparseImage;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Output options for the dump command
#[derive(Debug, Clone, Copy)]
pub struct DumpOptions {
    /// Don't list every decoded transaction
    pub quiet: bool,
    /// Show a progress bar while reading the capture
    pub progress: bool,
}

/// Run the dump command
///
/// The image is written even if decoding stops on an error, so everything
/// recovered before the error is kept. The error is still returned.
pub fn run_dump(
    input: &Path,
    output: &Path,
    config: &Config,
    options: &DumpOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(input)?;
    let total_size = file.metadata()?.len();

    let pb = if options.progress {
        ProgressBar::new(total_size)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
            .progress_chars("#>-"),
    );

    let capture = CaptureReader::new(BufReader::new(pb.wrap_read(file)), &config.capture)?;
    let mut image = SparseImage::new();
    let result = spidump_core::dump(capture, &config.decoder, &mut image, |txn| {
        if !options.quiet {
            pb.suspend(|| println!("{}", txn));
        }
    });
    pb.finish_and_clear();

    if let Err(e) = &result {
        log::error!("Decoding stopped: {}", e);
    }

    println!("{}", image.stats());
    image.write_file(output)?;
    println!(
        "Wrote {} bytes in {} ranges to {:?}",
        image.populated(),
        image.ranges().count(),
        output
    );

    let summary = result?;
    log::debug!(
        "{} of {} transactions placed in the image",
        summary.placed,
        summary.transactions
    );
    Ok(())
}
