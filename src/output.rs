//! Output formatting and persistence for analysis results.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of buckets.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

use crate::analyzers::types::AggregateBucket;
use csv::WriterBuilder;
use std::fs::File;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes buckets to a CSV file with a header row, replacing any existing file.
pub fn write_buckets(path: &str, buckets: &[AggregateBucket]) -> Result<()> {
    debug!(path, rows = buckets.len(), "Writing bucket CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for bucket in buckets {
        writer.serialize(bucket)?;
    }
    writer.flush()?;

    Ok(())
}
