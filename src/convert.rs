use crate::config::{DEFAULT_SAMPLE_COUNT, DEFAULT_SHARD_ROW_CAP, PROGRESS_INTERVAL};
use crate::error::{Error, Result};
use crate::estimate::estimate_record_count;
use crate::extract::extract_row;
use crate::parser::FeedReader;
use crate::shard::ShardWriter;
use crate::stats::ConversionStats;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub shard_row_cap: u64,
    pub sample_count: usize,
    pub show_progress: bool,
}

impl ConvertConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            shard_row_cap: DEFAULT_SHARD_ROW_CAP,
            sample_count: DEFAULT_SAMPLE_COUNT,
            show_progress: false,
        }
    }
}

/// Converts `input` into `repfeed_N.csv` shards under `output_dir`.
pub fn convert(input: &Path, output_dir: &Path, shard_row_cap: u64) -> Result<ConversionStats> {
    run_conversion(&ConvertConfig {
        shard_row_cap,
        ..ConvertConfig::new(input, output_dir)
    })
}

pub fn run_conversion(config: &ConvertConfig) -> Result<ConversionStats> {
    if config.shard_row_cap == 0 {
        return Err(Error::InvalidConfig(
            "shard row cap must be at least 1".to_string(),
        ));
    }

    fs::create_dir_all(&config.output_dir).map_err(|e| Error::io(&config.output_dir, e))?;

    let estimate = match estimate_record_count(&config.input, config.sample_count) {
        Ok(estimate) => estimate.map(|e| e.records()),
        Err(e) => {
            warn!(
                error = %e,
                malformed = e.is_parse_error(),
                "Size estimate failed, total is unknown"
            );
            None
        }
    };
    match estimate {
        Some(total) => info!(estimated_records = total, "Estimated total <reputation> records"),
        None => info!("Estimated total <reputation> records: unknown"),
    }

    let reader = FeedReader::open(&config.input)?;
    let shards = ShardWriter::create(&config.output_dir, config.shard_row_cap)?;

    info!(
        input = %config.input.display(),
        output = %config.output_dir.display(),
        shard_row_cap = config.shard_row_cap,
        "Starting conversion"
    );

    let progress = progress_bar(estimate, config.show_progress);
    match convert_records(reader, shards, &progress) {
        Ok(mut stats) => {
            progress.finish_and_clear();
            stats.estimated_records = estimate;
            Ok(stats)
        }
        Err(e) => {
            progress.abandon();
            Err(e)
        }
    }
}

/// Streams every record from `reader` into `shards`, one record in memory at
/// a time, in document order.
pub fn convert_records<R: BufRead>(
    mut reader: FeedReader<R>,
    mut shards: ShardWriter,
    progress: &ProgressBar,
) -> Result<ConversionStats> {
    while let Some(record) = reader.next_record()? {
        let row = extract_row(record).map_err(|source| Error::Format {
            record: reader.records_read(),
            source,
        })?;
        shards.write_row(&row)?;

        if reader.records_read() % PROGRESS_INTERVAL == 0 {
            progress.set_position(reader.records_read());
        }
    }
    let records = reader.records_read();
    progress.set_position(records);
    debug!(buffer_bytes = reader.buffer_capacity(), "Event buffer size at end of feed");

    let shards = shards.finish()?;
    info!(records, shards = shards.len(), "Conversion complete");

    Ok(ConversionStats {
        records,
        shards,
        estimated_records: None,
    })
}

fn progress_bar(total: Option<u64>, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = match total {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {human_pos}/~{human_len} reputations ({per_sec})",
                    )
                    .expect("valid progress template")
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} [{elapsed_precise}] {human_pos} reputations (total unknown)")
                    .expect("valid spinner template"),
            );
            pb
        }
    };
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
