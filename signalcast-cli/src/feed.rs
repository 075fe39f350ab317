//! CSV bar feed — the external collaborator that supplies bars.
//!
//! Columns: `timestamp,open,high,low,close,volume`, timestamp formatted
//! `YYYY-MM-DD HH:MM:SS`. Ordering is the feed's responsibility; the
//! pipeline drops any bar that fails to advance the clock.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use signalcast_core::domain::Bar;

pub const FEED_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("reading bar feed: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: bad timestamp '{text}': {source}")]
    BadTimestamp {
        row: usize,
        text: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Deserialize)]
struct BarRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub fn load_bars(path: &Path) -> Result<Vec<Bar>, FeedError> {
    read_bars(csv::Reader::from_path(path)?)
}

fn read_bars<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Bar>, FeedError> {
    let mut bars = Vec::new();
    for (row, record) in reader.deserialize::<BarRecord>().enumerate() {
        let record = record?;
        let timestamp = NaiveDateTime::parse_from_str(&record.timestamp, FEED_DATETIME_FORMAT)
            .map_err(|source| FeedError::BadTimestamp {
                row: row + 1,
                text: record.timestamp.clone(),
                source,
            })?;
        bars.push(Bar {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        });
    }
    Ok(bars)
}
