//! High-level API for reading Timestream query result files.

use crate::error::Result;
use crate::models::SampleTable;
use crate::pivot;
use crate::resultset::QueryResult;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A reader for Timestream query result documents that provides a high-level
/// API for pivoting them into a sample table.
///
/// # Examples
///
/// ```no_run
/// use timestream_mdf::TimestreamReader;
///
/// // Read from a file
/// let reader = TimestreamReader::from_file("result.json")?;
/// let table = reader.read_all()?;
/// # Ok::<(), timestream_mdf::Error>(())
/// ```
#[derive(Debug)]
pub struct TimestreamReader {
    result: QueryResult,
}

impl TimestreamReader {
    /// Create a new reader from a file path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the query result JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid query
    /// result document.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path.as_ref())?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Create a new reader from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid query result document.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let result = QueryResult::from_slice(data)?;
        Ok(Self { result })
    }

    /// Create a new reader from a JSON string.
    pub fn from_str(data: &str) -> Result<Self> {
        Self::from_bytes(data.as_bytes())
    }

    /// Column names declared in the document's `ColumnInfo` section, in
    /// declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.result
            .column_info
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Number of rows in the document.
    pub fn row_count(&self) -> usize {
        self.result.rows.len()
    }

    /// Pivot every row into a timestamp-indexed, signal-named sample table.
    ///
    /// Rows are processed in input order; a later row for the same
    /// (timestamp, signal) pair overwrites the earlier one. The table comes
    /// out sorted by timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is missing, a `time` value is
    /// null or unparseable, a `measure_name` is null, or a row carries
    /// neither a double nor a bigint value.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use timestream_mdf::TimestreamReader;
    ///
    /// let reader = TimestreamReader::from_file("result.json")?;
    /// let table = reader.read_all()?;
    ///
    /// println!(
    ///     "{} samples across {} channels",
    ///     table.sample_count(),
    ///     table.channel_count()
    /// );
    /// # Ok::<(), timestream_mdf::Error>(())
    /// ```
    pub fn read_all(self) -> Result<SampleTable> {
        pivot::build_table(&self.result)
    }

    /// Borrow the raw parsed document for custom processing.
    pub fn query_result(&self) -> &QueryResult {
        &self.result
    }
}
