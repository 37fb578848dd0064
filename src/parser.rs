//! Tolerant CSV parser for optimizer power exports.
//!
//! Malformed rows are dropped and malformed power values become `0.0`; the
//! parser never fails on data.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::reading::Reading;

/// Accepted timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y/%m/%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses `timestamp,power[,...]` rows into readings, preserving input order.
///
/// Rows with fewer than two fields or an unrecognised timestamp are skipped,
/// which also drops a header line if one is present.
pub fn parse_readings(text: &str) -> Vec<Reading> {
    let mut readings = Vec::new();
    let mut skipped = 0usize;

    for record in records(text) {
        if record.len() < 2 {
            skipped += 1;
            continue;
        }

        let Some(timestamp) = parse_timestamp(&record[0]) else {
            skipped += 1;
            continue;
        };

        readings.push(Reading::new(timestamp, parse_power(&record[1])));
    }

    debug!(parsed = readings.len(), skipped, "Parsed power readings");
    readings
}

/// Parses a wide export with one column per panel.
///
/// The first row names the panels: `timestamp,<panel>,<panel>,...`. Each
/// following row holds one timestamp and a power cell per panel. Empty or
/// missing cells are skipped for that panel only. Every named panel is present
/// in the result, even if it ends up with no readings.
pub fn parse_panel_table(text: &str) -> BTreeMap<String, Vec<Reading>> {
    let mut panels: BTreeMap<String, Vec<Reading>> = BTreeMap::new();
    let mut rows = records(text);

    let Some(header) = rows.next() else {
        return panels;
    };

    let panel_ids: Vec<&str> = header.iter().skip(1).collect();
    for id in panel_ids.iter().filter(|id| !id.is_empty()) {
        panels.entry(id.to_string()).or_default();
    }

    let mut skipped = 0usize;
    for record in rows {
        let Some(timestamp) = record.get(0).and_then(parse_timestamp) else {
            skipped += 1;
            continue;
        };

        for (column, id) in panel_ids.iter().enumerate() {
            if id.is_empty() {
                continue;
            }
            let cell = match record.get(column + 1) {
                Some(cell) if !cell.is_empty() => cell,
                _ => continue,
            };
            if let Some(series) = panels.get_mut(*id) {
                series.push(Reading::new(timestamp, parse_power(cell)).with_device(id));
            }
        }
    }

    debug!(panels = panels.len(), skipped, "Parsed panel table");
    panels
}

/// Tries each accepted layout in turn; `None` if none match.
pub fn parse_timestamp(field: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(field.trim(), format).ok())
}

/// Reads a non-negative decimal numeral. Anything else yields `0.0`.
pub fn parse_power(field: &str) -> f64 {
    let field = field.trim();
    if !is_decimal_numeral(field) {
        return 0.0;
    }
    field.parse().unwrap_or(0.0)
}

fn is_decimal_numeral(field: &str) -> bool {
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in field.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

fn records(text: &str) -> impl Iterator<Item = StringRecord> + '_ {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
        .into_records()
        .filter_map(|result| match result {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable row");
                None
            }
        })
}
