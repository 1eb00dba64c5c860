//! Code for working with the simulation period and the timestamps written to output files.
use anyhow::{Context, Result, ensure};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// The format of timestamps in engine input files
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M";

/// A point in time as written to engine input files (e.g. `2020-01-01_00:00`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Midnight on the given day
    pub fn at_midnight(year: i32, month: u32, day: u32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .with_context(|| format!("Invalid date: {year}-{month}-{day}"))?;
        Ok(Self(date.and_time(chrono::NaiveTime::MIN)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// The years covered by a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationPeriod {
    start: Timestamp,
    end: Timestamp,
}

impl SimulationPeriod {
    /// Create a period from the first and last years of the simulation (inclusive).
    ///
    /// The period starts at the beginning of `start_year` and ends at midnight on the last day of
    /// `end_year`.
    pub fn new(start_year: i32, end_year: i32) -> Result<Self> {
        ensure!(
            start_year <= end_year,
            "End year ({end_year}) is before start year ({start_year})"
        );

        Ok(Self {
            start: Timestamp::at_midnight(start_year, 1, 1)?,
            end: Timestamp::at_midnight(end_year, 12, 31)?,
        })
    }

    /// The global start timestamp. All attribute values are anchored here.
    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    /// The end of the simulation
    pub fn end(&self) -> &Timestamp {
        &self.end
    }
}
