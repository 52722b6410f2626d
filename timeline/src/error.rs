use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("date range is inverted: start {start} is after end {end}")]
    InvertedRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("date range preset does not fit in the calendar")]
    RangeOutOfBounds,

    #[error("invalid layout config: {0}")]
    InvalidConfig(String),

    #[error("failed to read layout config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse layout config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
