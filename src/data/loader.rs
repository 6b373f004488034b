//! Trial CSV Loader Module
//! Parses trial bytes with Polars into a time-ordered table of fixed channels.

use super::timestamp::{format_minute, parse_timestamp};
use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Header of the time column.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column(s): {}", .0.join(", "))]
    SchemaError(Vec<String>),
    #[error("Dataset contains no rows with a valid timestamp")]
    EmptyDataset,
}

/// The numeric readings carried by every trial row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    ProcessTempSp,
    ProcessTemp,
    PressureSp,
    InletSteamPressure,
    OutletSteamPressure,
    SteamFlowRate,
    ValveOpeningPct,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::ProcessTempSp,
        Channel::ProcessTemp,
        Channel::PressureSp,
        Channel::InletSteamPressure,
        Channel::OutletSteamPressure,
        Channel::SteamFlowRate,
        Channel::ValveOpeningPct,
    ];

    /// Exact CSV header for this channel.
    pub fn header(self) -> &'static str {
        match self {
            Channel::ProcessTempSp => "Process Temp SP",
            Channel::ProcessTemp => "Process Temp",
            Channel::PressureSp => "Pressure SP",
            Channel::InletSteamPressure => "Inlet Steam Pressure",
            Channel::OutletSteamPressure => "Outlet Steam Pressure",
            Channel::SteamFlowRate => "Steam Flow Rate",
            Channel::ValveOpeningPct => "QualSteam Valve Opening",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Every header a trial file must carry.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    std::iter::once(TIMESTAMP_COLUMN).chain(Channel::ALL.iter().map(|c| c.header()))
}

/// One CSV row: a timestamp and the seven readings (absent when unparseable).
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    pub timestamp: NaiveDateTime,
    readings: [Option<f64>; 7],
}

impl TrialRecord {
    pub fn new(timestamp: NaiveDateTime, readings: [Option<f64>; 7]) -> Self {
        Self {
            timestamp,
            readings,
        }
    }

    pub fn reading(&self, channel: Channel) -> Option<f64> {
        self.readings[channel.index()]
    }
}

/// First/last timestamp of a table, formatted for the heading label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRange {
    pub min_date: String,
    pub max_date: String,
}

/// Non-empty, timestamp-ordered trial rows.
#[derive(Debug, Clone)]
pub struct TrialTable {
    records: Vec<TrialRecord>,
    dropped_rows: usize,
}

impl TrialTable {
    /// Build from rows in source order. Sorting is stable, so equal
    /// timestamps keep their relative order.
    pub fn from_records(
        mut records: Vec<TrialRecord>,
        dropped_rows: usize,
    ) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::EmptyDataset);
        }
        records.sort_by_key(|r| r.timestamp);
        Ok(Self {
            records,
            dropped_rows,
        })
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Rows excluded because their timestamp did not parse.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// `(timestamp, value)` pairs for one channel, in table order.
    pub fn channel_points(&self, channel: Channel) -> Vec<(NaiveDateTime, Option<f64>)> {
        self.records
            .iter()
            .map(|r| (r.timestamp, r.reading(channel)))
            .collect()
    }

    pub fn first_timestamp(&self) -> NaiveDateTime {
        self.records[0].timestamp
    }

    pub fn last_timestamp(&self) -> NaiveDateTime {
        self.records[self.records.len() - 1].timestamp
    }

    pub fn display_range(&self) -> DisplayRange {
        DisplayRange {
            min_date: format_minute(&self.first_timestamp()),
            max_date: format_minute(&self.last_timestamp()),
        }
    }
}

/// Parses trial bytes into a [`TrialTable`].
pub struct TrialLoader;

impl TrialLoader {
    /// Parse CSV bytes.
    ///
    /// Every column is read as text so that a stray non-numeric cell can only
    /// blank that one point instead of changing the inferred column type.
    pub fn load_bytes(bytes: Vec<u8>) -> Result<TrialTable, LoadError> {
        let df = match CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
        {
            Ok(df) => df,
            Err(PolarsError::NoData(_)) => return Err(LoadError::EmptyDataset),
            Err(e) => return Err(e.into()),
        };
        debug!(rows = df.height(), cols = df.width(), "csv parsed");

        Self::from_dataframe(&df)
    }

    /// Extract the fixed columns from an already-parsed frame.
    pub fn from_dataframe(df: &DataFrame) -> Result<TrialTable, LoadError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let missing: Vec<String> = required_columns()
            .filter(|name| !present.iter().any(|p| p == name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::SchemaError(missing));
        }

        if df.height() == 0 {
            return Err(LoadError::EmptyDataset);
        }

        let timestamps = Self::text_column(df, TIMESTAMP_COLUMN)?;
        let mut readings: Vec<Vec<Option<f64>>> = Vec::with_capacity(Channel::ALL.len());
        for channel in Channel::ALL {
            let cells = Self::text_column(df, channel.header())?;
            readings.push(cells.iter().map(|c| parse_reading(c.as_deref())).collect());
        }

        let mut records = Vec::with_capacity(df.height());
        let mut dropped = 0usize;
        for (row, raw_ts) in timestamps.iter().enumerate() {
            let Some(timestamp) = raw_ts.as_deref().and_then(parse_timestamp) else {
                dropped += 1;
                warn!(row = row + 1, value = ?raw_ts, "dropping row with unparseable timestamp");
                continue;
            };
            let mut values = [None; 7];
            for (slot, column) in values.iter_mut().zip(&readings) {
                *slot = column[row];
            }
            records.push(TrialRecord::new(timestamp, values));
        }

        let table = TrialTable::from_records(records, dropped)?;
        info!(rows = table.len(), dropped, "trial table loaded");
        Ok(table)
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoadError> {
        let column = df.column(name)?;
        let text = column.cast(&DataType::String)?;
        let ca = text.as_materialized_series().str()?;
        Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

/// Numeric cell policy: anything that is not a finite number is an absent point.
fn parse_reading(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
