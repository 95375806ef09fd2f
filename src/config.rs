/// Element name of a single feed record
pub const RECORD_TAG: &[u8] = b"reputation";

/// Maximum data rows per CSV shard
pub const DEFAULT_SHARD_ROW_CAP: u64 = 5_000_000;

/// Number of leading records sampled for the size estimate
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Shard file name prefix (shard N is `repfeed_N.csv`)
pub const SHARD_FILE_PREFIX: &str = "repfeed";

/// Progress update interval (tick every N records)
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Buffer size for shard CSV writers
pub const CSV_BUFFER_SIZE: usize = 128 * 1024;

/// Buffer size for the (possibly decompressed) XML input
pub const INPUT_BUFFER_SIZE: usize = 256 * 1024;
