use chrono::{NaiveDateTime, Timelike};
use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::Row;
use crate::types::{Error, Result};

const TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.f";
const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Derives weekday, hour and duration columns from a pair of timestamp
/// columns of the form `YYYYMMDDThhmmss.ffffff`.  The weekday is the
/// 3-letter abbreviation of the enter time, the hour is the enter hour and
/// the duration is `leave - enter` in hours.
pub struct TravelTimeParts {
    enter: String,
    leave: String,
    weekday_out: String,
    hour_out: String,
    duration_out: String,
}

impl TravelTimeParts {
    pub fn new(
        enter: impl Into<String>,
        leave: impl Into<String>,
        weekday_out: impl Into<String>,
        hour_out: impl Into<String>,
        duration_out: impl Into<String>,
    ) -> Self {
        Self {
            enter: enter.into(),
            leave: leave.into(),
            weekday_out: weekday_out.into(),
            hour_out: hour_out.into(),
            duration_out: duration_out.into(),
        }
    }
}

fn parse_time(row: &Row, column: &str) -> Result<NaiveDateTime> {
    let text = row.str(column)?;
    NaiveDateTime::parse_from_str(text, TIME_FORMAT)
        .map_err(|err| Error::Type(format!("bad timestamp {text:?} in {column:?}: {err}")))
}

impl Mapper for TravelTimeParts {
    fn map(&self, mut row: Row) -> Result<Mapped> {
        let enter = parse_time(&row, &self.enter)?;
        let leave = parse_time(&row, &self.leave)?;
        let micros = (leave - enter).num_microseconds().ok_or_else(|| {
            Error::Type(format!(
                "duration between {:?} and {:?} overflows",
                self.enter, self.leave
            ))
        })?;
        row.set(self.weekday_out.as_str(), enter.format("%a").to_string());
        row.set(self.hour_out.as_str(), enter.hour() as i64);
        row.set(self.duration_out.as_str(), micros as f64 / MICROS_PER_HOUR);
        Ok(smallvec![row])
    }
}
