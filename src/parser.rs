use crate::config::{INPUT_BUFFER_SIZE, RECORD_TAG};
use crate::error::{Error, Result};
use crate::models::{RecordField, ReputationRecord};
use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Input compression, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Compression::Gzip,
            Some(ext) if ext.eq_ignore_ascii_case("bz2") => Compression::Bzip2,
            _ => Compression::None,
        }
    }
}

/// Opens a feed file, decompressing `.gz` and `.bz2` transparently.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader: Box<dyn BufRead> = match Compression::from_path(path) {
        Compression::None => Box::new(BufReader::with_capacity(INPUT_BUFFER_SIZE, file)),
        Compression::Gzip => Box::new(BufReader::with_capacity(
            INPUT_BUFFER_SIZE,
            MultiGzDecoder::new(file),
        )),
        Compression::Bzip2 => Box::new(BufReader::with_capacity(
            INPUT_BUFFER_SIZE,
            BzDecoder::new(file),
        )),
    };
    Ok(reader)
}

/// Forward-only reader yielding one `<reputation>` record at a time.
///
/// Records are returned by value and nothing about them is kept once they are
/// handed out; the event buffer is cleared after every event.
pub struct FeedReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    depth: usize,
    root_seen: bool,
    records_read: u64,
    done: bool,
}

enum Step {
    Record,
    EmptyRecord,
    Open,
    Leaf,
    Close,
    StrayText,
    Eof,
    Skip,
}

impl FeedReader<Box<dyn BufRead>> {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_reader(open_input(path)?))
    }
}

impl<R: BufRead> FeedReader<R> {
    pub fn from_reader(input: R) -> Self {
        Self {
            reader: Reader::from_reader(input),
            buf: Vec::new(),
            depth: 0,
            root_seen: false,
            records_read: 0,
            done: false,
        }
    }

    /// Records handed out so far; the 1-based number of the last one.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Capacity of the reusable event buffer. Bounded by the largest single
    /// XML event, not by the number of records.
    pub fn buffer_capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the next record, `Ok(None)` at the end of a well-formed
    /// document. After an error the reader is exhausted.
    pub fn next_record(&mut self) -> Result<Option<ReputationRecord>> {
        if self.done {
            return Ok(None);
        }

        loop {
            let step = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) if e.name().as_ref() == RECORD_TAG => Step::Record,
                Ok(Event::Empty(e)) if e.name().as_ref() == RECORD_TAG => Step::EmptyRecord,
                Ok(Event::Start(_)) => Step::Open,
                Ok(Event::Empty(_)) => Step::Leaf,
                Ok(Event::End(_)) => Step::Close,
                Ok(Event::Text(e)) if self.depth == 0 && !is_blank(&e) => Step::StrayText,
                Ok(Event::CData(_)) if self.depth == 0 => Step::StrayText,
                Ok(Event::Eof) => Step::Eof,
                Ok(_) => Step::Skip,
                Err(source) => {
                    self.done = true;
                    return Err(Error::Xml {
                        position: self.reader.buffer_position(),
                        source,
                    });
                }
            };
            self.buf.clear();

            if matches!(
                step,
                Step::Record | Step::EmptyRecord | Step::Open | Step::Leaf
            ) && self.depth == 0
            {
                if self.root_seen {
                    return Err(self.malformed("element after the root element"));
                }
                self.root_seen = true;
            }

            match step {
                Step::Record => {
                    return match self.read_record() {
                        Ok(record) => {
                            self.records_read += 1;
                            Ok(Some(record))
                        }
                        Err(e) => {
                            self.done = true;
                            Err(e)
                        }
                    };
                }
                Step::EmptyRecord => {
                    self.records_read += 1;
                    return Ok(Some(ReputationRecord::default()));
                }
                Step::Open => self.depth += 1,
                Step::Close => self.depth = self.depth.saturating_sub(1),
                Step::StrayText => return Err(self.malformed("text outside the root element")),
                Step::Eof => {
                    if self.depth > 0 {
                        return Err(self.malformed("document ended before the root element closed"));
                    }
                    if !self.root_seen {
                        return Err(self.malformed("document has no root element"));
                    }
                    self.done = true;
                    return Ok(None);
                }
                Step::Leaf | Step::Skip => {}
            }
        }
    }

    /// Reads the body of a `<reputation>` element whose start tag was just
    /// consumed. Only text directly inside a known child is kept; the first
    /// occurrence of a repeated child wins.
    fn read_record(&mut self) -> Result<ReputationRecord> {
        let mut record = ReputationRecord::default();
        let mut depth = 0usize;
        let mut current: Option<RecordField> = None;

        loop {
            let mut finished = false;
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => {
                    if depth == 0 {
                        current = claim(&mut record, e.name().as_ref());
                    }
                    depth += 1;
                }
                Ok(Event::Empty(e)) => {
                    if depth == 0 {
                        claim(&mut record, e.name().as_ref());
                    }
                }
                Ok(Event::Text(e)) if depth == 1 => {
                    if let Some(field) = current {
                        let text = e.unescape().map_err(|source| Error::Xml {
                            position: self.reader.buffer_position(),
                            source,
                        })?;
                        append(&mut record, field, &text);
                    }
                }
                Ok(Event::CData(e)) if depth == 1 => {
                    if let Some(field) = current {
                        let text = self.reader.decoder().decode(&e).map_err(|source| {
                            Error::Xml {
                                position: self.reader.buffer_position(),
                                source,
                            }
                        })?;
                        append(&mut record, field, &text);
                    }
                }
                Ok(Event::End(_)) => {
                    if depth == 0 {
                        finished = true;
                    } else {
                        depth -= 1;
                        if depth == 0 {
                            current = None;
                        }
                    }
                }
                Ok(Event::Eof) => {
                    return Err(Error::Malformed {
                        position: self.reader.buffer_position(),
                        reason: "document ended inside a <reputation> record",
                    });
                }
                Ok(_) => {}
                Err(source) => {
                    return Err(Error::Xml {
                        position: self.reader.buffer_position(),
                        source,
                    });
                }
            }
            self.buf.clear();

            if finished {
                return Ok(record);
            }
        }
    }

    fn malformed(&mut self, reason: &'static str) -> Error {
        self.done = true;
        Error::Malformed {
            position: self.reader.buffer_position(),
            reason,
        }
    }
}

impl<R: BufRead> Iterator for FeedReader<R> {
    type Item = Result<ReputationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

fn claim(record: &mut ReputationRecord, tag: &[u8]) -> Option<RecordField> {
    let field = RecordField::from_tag(tag)?;
    let slot = record.field_mut(field);
    if slot.is_some() {
        return None;
    }
    *slot = Some(String::new());
    Some(field)
}

fn append(record: &mut ReputationRecord, field: RecordField, text: &str) {
    if let Some(value) = record.field_mut(field) {
        value.push_str(text);
    }
}
