//! tally-ingest: source adapter registry and statement normalization.
//!
//! Raw statement rows go in, canonical transactions come out. Nothing here
//! assigns categories; that is tally-finance's job.

pub mod adapters;
pub mod csv_rows;
pub mod normalize;

pub use adapters::{SourceAdapter, adapter_for, detect_source};
pub use csv_rows::{RawRow, read_csv_rows};
pub use normalize::{ImportOutcome, RowError, normalize};
