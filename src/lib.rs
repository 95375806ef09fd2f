//! repfeed: streaming XML reputation feed to sharded CSV converter
//!
//! Reads one (arbitrarily large) XML document of repeated `<reputation>` records
//! and writes them as flat CSV rows, split across numbered shard files:
//!
//! 1. **Estimate** -- Sample the first records to approximate the total record
//!    count for the progress display (advisory, never fatal)
//! 2. **Convert** -- Stream records one at a time, flatten each into a fixed
//!    22-column row (decoding the packed `reputation_key` into `field_a`..`field_k`)
//!    and append it to the current shard, rotating shards at a row cap
//!
//! # Architecture
//!
//! - **Streaming XML parsing** -- Event-based quick-xml reader; at most one record
//!   is held in memory and the event buffer is reused
//! - **Compressed input** -- `.gz` and `.bz2` feeds are decompressed on the fly
//! - **CSV sharding** -- `repfeed_1.csv`, `repfeed_2.csv`, ... each capped at a row
//!   count; the next shard opens as soon as the current one is full
//! - **Fail fast** -- Malformed XML or a bad key aborts the run; shards closed
//!   before the failure stay valid
//!
//! # Key Modules
//!
//! - [`parser`] -- Streaming feed reader with transparent decompression
//! - [`key`] -- Reputation key decoder
//! - [`extract`] -- Record to row flattening
//! - [`shard`] -- Row-capped CSV shard writer
//! - [`convert`] -- Conversion driver and progress display
//! - [`estimate`] -- Record count estimation
//! - [`models`] -- Record and row types
//! - [`stats`] -- Conversion results
//! - [`error`] -- Error taxonomy
//! - [`config`] -- Defaults and constants
//!
//! # Example Usage
//!
//! ```bash
//! # Convert with the default 5M rows per shard
//! repfeed -v convert -i repfeed_202308010700.xml -o repfeed_output/
//!
//! # Smaller shards from a compressed feed
//! repfeed convert -i repfeed.xml.gz -o out/ --max-rows 1000000
//!
//! # Print the advisory record count estimate
//! repfeed estimate -i repfeed_202308010700.xml
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod estimate;
pub mod extract;
pub mod key;
pub mod models;
pub mod parser;
pub mod shard;
pub mod stats;

pub use convert::{convert, run_conversion, ConvertConfig};
pub use error::{Error, Result};
pub use key::{KeyError, KeyField, ReputationKey};
