use crate::config::RECORD_TAG;
use crate::error::{Error, Result};
use crate::parser::{open_input, Compression};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use std::fs;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

/// Serialized sizes of the leading records of a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordSample {
    pub records: usize,
    pub total_bytes: u64,
}

impl RecordSample {
    /// Integer average, `None` when nothing usable was sampled.
    pub fn average_bytes(&self) -> Option<u64> {
        if self.records == 0 {
            return None;
        }
        let average = self.total_bytes / self.records as u64;
        (average > 0).then_some(average)
    }
}

/// Record count estimate. Only built from a sample with a non-zero average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    file_bytes: u64,
    sampled_records: usize,
    average_record_bytes: u64,
}

impl SizeEstimate {
    pub fn from_sample(file_bytes: u64, sample: &RecordSample) -> Option<Self> {
        Some(Self {
            file_bytes,
            sampled_records: sample.records,
            average_record_bytes: sample.average_bytes()?,
        })
    }

    pub fn records(&self) -> u64 {
        self.file_bytes / self.average_record_bytes
    }

    pub fn file_bytes(&self) -> u64 {
        self.file_bytes
    }

    pub fn sampled_records(&self) -> usize {
        self.sampled_records
    }

    pub fn average_record_bytes(&self) -> u64 {
        self.average_record_bytes
    }
}

/// Approximates the number of records in a feed from its byte size and the
/// average size of the first `sample_count` records.
///
/// Advisory only. `Ok(None)` means the total is unknown: nothing was sampled,
/// or the input is compressed so its byte size says nothing about record size.
pub fn estimate_record_count(path: &Path, sample_count: usize) -> Result<Option<SizeEstimate>> {
    if sample_count == 0 {
        return Ok(None);
    }

    let compression = Compression::from_path(path);
    if compression != Compression::None {
        debug!(?compression, "Skipping size estimate for compressed input");
        return Ok(None);
    }

    let file_bytes = fs::metadata(path).map_err(|e| Error::io(path, e))?.len();
    let sample = sample_record_sizes(open_input(path)?, sample_count)?;

    let Some(estimate) = SizeEstimate::from_sample(file_bytes, &sample) else {
        debug!(sampled = sample.records, "No records to estimate from");
        return Ok(None);
    };

    info!(
        file_bytes,
        sampled = sample.records,
        average_record_bytes = estimate.average_record_bytes(),
        estimated_records = estimate.records(),
        "Estimated record count"
    );

    Ok(Some(estimate))
}

/// Re-serializes up to `sample_count` `<reputation>` subtrees and sums their
/// byte lengths. Stops reading as soon as enough records were seen.
pub fn sample_record_sizes<R: BufRead>(input: R, sample_count: usize) -> Result<RecordSample> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut writer = Writer::new(Vec::new());
    let mut sample = RecordSample::default();
    let mut in_record = false;
    let mut depth = 0usize;

    while sample.records < sample_count {
        let record_done = {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|source| Error::Xml {
                    position: reader.buffer_position(),
                    source,
                })?;

            let (keep, done) = match &event {
                Event::Eof => break,
                Event::Start(e) if !in_record && e.name().as_ref() == RECORD_TAG => {
                    in_record = true;
                    depth = 0;
                    (true, false)
                }
                Event::Empty(e) if !in_record && e.name().as_ref() == RECORD_TAG => (true, true),
                Event::Start(_) if in_record => {
                    depth += 1;
                    (true, false)
                }
                Event::End(_) if in_record => {
                    if depth == 0 {
                        in_record = false;
                        (true, true)
                    } else {
                        depth -= 1;
                        (true, false)
                    }
                }
                _ => (in_record, false),
            };

            if keep {
                writer.write_event(event).map_err(|source| Error::Xml {
                    position: reader.buffer_position(),
                    source,
                })?;
            }
            done
        };
        buf.clear();

        if record_done {
            sample.records += 1;
            sample.total_bytes += writer.get_ref().len() as u64;
            writer.get_mut().clear();
        }
    }

    Ok(sample)
}
