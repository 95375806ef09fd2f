use crate::key::KeyError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a feed or writing shards.
///
/// Every variant is fatal for a conversion run. `Xml` and `Malformed` are parse
/// errors, `Format` is a bad reputation key, `Io` and `Csv` are file errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("malformed XML at byte {position}: {reason}")]
    Malformed { position: usize, reason: &'static str },
    #[error("record {record}: {source}")]
    Format {
        record: u64,
        #[source]
        source: KeyError,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Error::Csv {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by input that is not well-formed XML.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Xml { .. } | Error::Malformed { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
