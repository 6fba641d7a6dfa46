//! Command-line interface for the Timestream-to-MDF converter.
//!
//! This binary converts one Timestream query result JSON file into one
//! ASAM MDF 4.10 measurement file.

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use std::path::Path;
use std::time::Instant;
use timestream_mdf::{MdfWriter, TimestreamReader};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert Timestream query results to MDF 4.10 measurement files",
    long_about = "Converts a Timestream query result (JSON row/column records) into an ASAM MDF 4.10\n\
                  measurement file, one channel per measure name.\n\n\
                  MDF files are the standard measurement container for automotive and test-equipment tooling."
)]
struct Args {
    /// Timestream query result JSON file
    #[arg(value_name = "TIMESTREAM_RESULT_JSON")]
    input: String,

    /// Output MDF file path (overwritten if it exists)
    #[arg(value_name = "OUTPUT_MDF")]
    output: String,
}

fn convert(input: &Path, output: &Path) -> Result<()> {
    info!("📄 Processing: {}", input.display());

    let start_time = Instant::now();

    let t0 = Instant::now();
    let reader = TimestreamReader::from_file(input)?;
    info!(
        "   ├─ Parsed {} row(s), {} column(s) in {:.2?}",
        reader.row_count(),
        reader.column_names().len(),
        t0.elapsed()
    );

    let table = reader.read_all()?;
    info!("   ├─ Found {} unique channel(s)", table.channel_count());

    let t1 = Instant::now();
    let stats = MdfWriter::new(output).write_with_stats(&table)?;

    info!("   ├─ Wrote MDF in {:.2?}", t1.elapsed());
    info!("   ├─ {}", stats.summary());
    info!("   └─ ✓ Total time: {:.2?}", start_time.elapsed());

    Ok(())
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    convert(Path::new(&args.input), Path::new(&args.output))
}
