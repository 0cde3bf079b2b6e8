use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use csv::StringRecord;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::data::Bar;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("input file contains no valid rows")]
    Empty,

    #[error("unable to infer timestamp from record: {0:?}")]
    Timestamp(StringRecord),

    #[error("failed to parse numeric field '{field}' from value '{value}'")]
    ParseNumber { field: &'static str, value: String },

    #[error("bar at {timestamp} has high {high} below low {low}")]
    InvertedBar {
        timestamp: String,
        high: Decimal,
        low: Decimal,
    },
}

/// Per-file parameters that are not carried in the CSV itself.
#[derive(Debug, Clone, Copy)]
pub struct BarFormat {
    pub timezone: Tz,
    pub tick_size: Decimal,
}

pub fn load_bars_from_csv<P: AsRef<Path>>(path: P, format: BarFormat) -> Result<Vec<Bar>> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("failed to open {:?}", path_ref))?;
    load_bars_from_reader(file, format)
}

pub fn load_bars_from_reader<R: Read>(reader: R, format: BarFormat) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if let Some(bar) = parse_record(&record, format)? {
            bars.push(bar);
        }
    }

    if bars.is_empty() {
        return Err(LoaderError::Empty.into());
    }

    bars.sort_by_key(|bar| bar.timestamp);
    Ok(bars)
}

fn parse_record(record: &StringRecord, format: BarFormat) -> Result<Option<Bar>> {
    // Header rows start with a column name rather than a date.
    if let Some(first) = record.get(0) {
        if is_header_field(first.trim()) {
            return Ok(None);
        }
    }

    let fields: Vec<&str> = record
        .iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() < 5 {
        return Ok(None);
    }

    // Either "date,time,o,h,l,c[,v]" or "datetime,o,h,l,c[,v]".
    let (datetime, offset) = match parse_datetime_string(fields[0]) {
        Some(dt) => (dt, 1),
        None if fields.len() >= 6 => (parse_datetime_pair(fields[0], fields[1])?, 2),
        None => return Err(anyhow!(LoaderError::Timestamp(record.clone()))),
    };

    let tz = format.timezone;
    let timestamp = match tz.from_local_datetime(&datetime) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None => tz.from_utc_datetime(&datetime),
    };

    let open = parse_number(fields.get(offset).copied(), "open")?;
    let high = parse_number(fields.get(offset + 1).copied(), "high")?;
    let low = parse_number(fields.get(offset + 2).copied(), "low")?;
    let close = parse_number(fields.get(offset + 3).copied(), "close")?;
    let volume = match fields.get(offset + 4).copied() {
        Some(value) => parse_number(Some(value), "volume")?,
        None => Decimal::ZERO,
    };

    Ok(Some(Bar {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
        tick_size: format.tick_size,
    }))
}

fn is_header_field(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(|c| c.is_ascii_digit())
}

fn parse_number(value: Option<&str>, field: &'static str) -> Result<Decimal> {
    let value = value.ok_or_else(|| LoaderError::ParseNumber {
        field,
        value: String::from("<missing>"),
    })?;
    let cleaned = value.replace(',', "");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| LoaderError::ParseNumber {
            field,
            value: value.to_string(),
        })
        .map_err(anyhow::Error::from)
}

fn parse_datetime_pair(date_str: &str, time_str: &str) -> Result<NaiveDateTime> {
    let date = parse_date(date_str)?;
    let time = parse_time(time_str)?;
    Ok(NaiveDateTime::new(date, time))
}

fn parse_datetime_string(value: &str) -> Option<NaiveDateTime> {
    let patterns = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    patterns
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    let patterns = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];
    patterns
        .iter()
        .find_map(|pattern| NaiveDate::parse_from_str(value, pattern).ok())
        .ok_or_else(|| LoaderError::Timestamp(StringRecord::from(vec![value.to_string()])).into())
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    let patterns = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M", "%H%M%S"];
    patterns
        .iter()
        .find_map(|pattern| NaiveTime::parse_from_str(value, pattern).ok())
        .ok_or_else(|| LoaderError::Timestamp(StringRecord::from(vec![value.to_string()])).into())
}

/// Check the ordering and shape guarantees the analysis relies on.
pub fn validate_series(bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        return Err(LoaderError::Empty.into());
    }

    for pair in bars.windows(2) {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(anyhow!("timestamps must be non-decreasing"));
        }
    }

    if let Some(bar) = bars.iter().find(|bar| bar.high < bar.low) {
        return Err(LoaderError::InvertedBar {
            timestamp: bar.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            high: bar.high,
            low: bar.low,
        }
        .into());
    }

    Ok(())
}
