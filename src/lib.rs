//! # Timestream → MDF Converter
//!
//! A Rust library for converting Amazon Timestream query result documents
//! (JSON row/column records) into ASAM MDF version 4.10 measurement files.
//!
//! ## Features
//!
//! - **Single-pass conversion**: load, pivot, sort and export in one run
//! - **Structured validation**: required columns are checked once at load
//!   time and surface as typed errors instead of scattered panics
//! - **Per-signal time bases**: each `measure_name` becomes an independent
//!   channel, sampled only where it has values
//! - **Deterministic output**: re-running on the same input produces a
//!   byte-identical file
//!
//! ## Quick Start
//!
//! ```no_run
//! use timestream_mdf::{MdfWriter, TimestreamReader};
//!
//! // Read a query result document
//! let reader = TimestreamReader::from_file("result.json")?;
//! let table = reader.read_all()?;
//!
//! println!("Pivoted {} samples", table.sample_count());
//!
//! // Write to MDF 4.10
//! MdfWriter::new("out.mf4").write(&table)?;
//! # Ok::<(), timestream_mdf::Error>(())
//! ```
//!
//! ## Input Format
//!
//! The input is the JSON shape Timestream's `Query` API returns: a
//! `ColumnInfo` array of named column descriptors and a `Rows` array whose
//! `Data` entries align positionally with the columns. Four columns are
//! consumed — `time`, `measure_name`, `measure_value::double` and
//! `measure_value::bigint` — everything else is ignored.
//!
//! When a row has no double value, the bigint value is used instead; a row
//! with neither fails the run.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, Error>`:
//!
//! ```no_run
//! use timestream_mdf::{Error, TimestreamReader};
//!
//! match TimestreamReader::from_file("result.json") {
//!     Ok(reader) => {
//!         // Process the document...
//!     }
//!     Err(Error::InvalidFormat(msg)) => {
//!         eprintln!("Not a query result document: {}", msg);
//!     }
//!     Err(Error::Io(err)) => {
//!         eprintln!("I/O error: {}", err);
//!     }
//!     Err(err) => {
//!         eprintln!("Error: {}", err);
//!     }
//! }
//! ```

// Public API modules
pub mod error;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use reader::TimestreamReader;
pub use writer::{MdfWriter, WriteStats};

// Re-export models for users who need them
pub use models::{Channel, Sample, SampleTable};

// Internal modules (public but not part of the high-level API)
pub mod formats;
pub mod models;
pub mod pivot;
pub mod resultset;
