use crate::config::{CSV_BUFFER_SIZE, SHARD_FILE_PREFIX};
use crate::error::{Error, Result};
use crate::models::OutputRow;
use csv::{Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Path of the `index`th shard (1-based): `<output_dir>/repfeed_<index>.csv`
pub fn shard_path(output_dir: &Path, index: u32) -> PathBuf {
    output_dir.join(format!("{}_{}.csv", SHARD_FILE_PREFIX, index))
}

/// A finished shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSummary {
    pub index: u32,
    pub path: PathBuf,
    pub rows: u64,
}

struct OpenShard {
    index: u32,
    path: PathBuf,
    rows: u64,
    writer: Writer<BufWriter<File>>,
}

impl OpenShard {
    fn create(output_dir: &Path, index: u32) -> Result<Self> {
        let path = shard_path(output_dir, index);
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(BufWriter::with_capacity(CSV_BUFFER_SIZE, file));

        writer
            .write_record(OutputRow::HEADER)
            .map_err(|e| Error::csv(&path, e))?;

        debug!(shard = index, path = ?path, "Opened shard");

        Ok(Self {
            index,
            path,
            rows: 0,
            writer,
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| Error::io(&self.path, e))
    }

    fn summary(&self) -> ShardSummary {
        ShardSummary {
            index: self.index,
            path: self.path.clone(),
            rows: self.rows,
        }
    }
}

/// Writes rows into numbered CSV shards of at most `row_cap` rows each.
///
/// Shard 1 is created (with its header) up front. As soon as a shard reaches
/// the cap it is flushed and the next shard is opened with its header, so a
/// row count that is an exact multiple of the cap ends with a header-only shard.
pub struct ShardWriter {
    output_dir: PathBuf,
    row_cap: u64,
    current: OpenShard,
    closed: Vec<ShardSummary>,
}

impl ShardWriter {
    pub fn create(output_dir: &Path, row_cap: u64) -> Result<Self> {
        if row_cap == 0 {
            return Err(Error::InvalidConfig(
                "shard row cap must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            row_cap,
            current: OpenShard::create(output_dir, 1)?,
            closed: Vec::new(),
        })
    }

    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.current
            .writer
            .serialize(row)
            .map_err(|e| Error::csv(&self.current.path, e))?;
        self.current.rows += 1;

        if self.current.rows == self.row_cap {
            self.rotate()?;
        }
        Ok(())
    }

    fn rotate(&mut self) -> Result<()> {
        self.current.flush()?;
        let finished = self.current.summary();
        info!(
            shard = finished.index,
            rows = finished.rows,
            "Shard complete"
        );

        self.current = OpenShard::create(&self.output_dir, finished.index + 1)?;
        self.closed.push(finished);
        Ok(())
    }

    /// Flushes the open shard and returns every shard written, in order.
    pub fn finish(mut self) -> Result<Vec<ShardSummary>> {
        self.current.flush()?;
        let last = self.current.summary();
        info!(shard = last.index, rows = last.rows, "Shard complete");
        self.closed.push(last);
        Ok(self.closed)
    }
}
