//! High-level API for writing a pivoted sample table to an MDF file.

use crate::error::Result;
use crate::formats::mdf::Mdf4Formatter;
use crate::models::SampleTable;
use std::path::{Path, PathBuf};

/// Default 8-byte program identifier stamped into the MDF ID block.
pub const DEFAULT_PROGRAM_ID: &str = "tsmdf";

/// Writer for outputting a sample table as an ASAM MDF version 4.10 file.
///
/// Each distinct signal becomes one channel in the output container, sampled
/// at exactly the timestamps where that signal had a value. The output file
/// is fully overwritten if it already exists.
///
/// # Examples
///
/// ```no_run
/// use timestream_mdf::{MdfWriter, TimestreamReader};
///
/// let table = TimestreamReader::from_file("result.json")?.read_all()?;
///
/// MdfWriter::new("out.mf4").write(&table)?;
/// # Ok::<(), timestream_mdf::Error>(())
/// ```
pub struct MdfWriter {
    output_path: PathBuf,
    program_id: String,
}

impl MdfWriter {
    /// Create a new writer targeting `output_path`.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
            program_id: DEFAULT_PROGRAM_ID.to_string(),
        }
    }

    /// Set the program identifier written to the ID block.
    ///
    /// Longer identifiers are truncated to 8 bytes, shorter ones are
    /// space-padded.
    pub fn program_id(mut self, id: &str) -> Self {
        self.program_id = id.to_string();
        self
    }

    /// Write the table to the target path.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be
    /// written. No partial-output cleanup is attempted.
    pub fn write(self, table: &SampleTable) -> Result<()> {
        Mdf4Formatter::new(&self.program_id).write_to(&self.output_path, table)
    }

    /// Write the table and return statistics about the operation.
    pub fn write_with_stats(self, table: &SampleTable) -> Result<WriteStats> {
        let num_channels = table.channel_count();
        let num_samples = table.sample_count();

        self.write(table)?;

        Ok(WriteStats {
            num_channels,
            num_samples,
        })
    }
}

/// Statistics about an MDF write operation.
#[derive(Debug, Clone)]
pub struct WriteStats {
    /// Number of channels in the output container
    pub num_channels: usize,
    /// Total number of samples across all channels
    pub num_samples: usize,
}

impl WriteStats {
    /// Get a human-readable summary of the write operation.
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} sample(s) across {} channel(s)",
            self.num_samples, self.num_channels
        )
    }
}
