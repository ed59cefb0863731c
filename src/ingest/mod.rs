//! Device export ingestion.
//!
//! The pipeline is strictly sequential:
//! - [`header`] finds the floating header row below the free-form preamble
//! - [`columns`] maps vendor labels onto canonical fields and value kinds
//! - [`coerce`] turns raw cells into typed values
//! - [`record`] decodes one CSV record into a [`Reading`](crate::models::reading::Reading)
//! - [`ingestor`] batches readings and flushes them into a [`ReadingSink`]
//!
//! ```no_run
//! use rglucologger::ingest::{IngestOptions, ingest, locate_header_in_file};
//! use rglucologger::models::reading::Reading;
//!
//! # fn main() -> rglucologger::errors::AppResult<()> {
//! let located = locate_header_in_file(std::path::Path::new("export.csv"), 20)?;
//! let header_line = located.header_line;
//! let mut readings: Vec<Reading> = Vec::new();
//! let options = IngestOptions::new(1_000, chrono_tz::Europe::Berlin);
//! let n = ingest(located.into_content(), header_line, "user-1", &options, &mut readings)?;
//! # Ok(())
//! # }
//! ```

pub mod coerce;
pub mod columns;
pub mod header;
pub mod ingestor;
pub mod record;
pub mod sink;

pub use columns::{COLUMNS, ColumnIndex, ColumnSpec, Field, ValueKind};
pub use header::{LocatedHeader, locate_header, locate_header_in_file};
pub use ingestor::{IngestOptions, ingest};
pub use sink::ReadingSink;
