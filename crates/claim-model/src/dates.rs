//! Date helpers for the split `MM`/`DD`/`YY` boxes used throughout the form.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Two-digit month, day and year strings as printed in date boxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDate {
    pub month: String,
    pub day: String,
    pub year: String,
}

impl FormDate {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            month: format!("{:02}", date.month()),
            day: format!("{:02}", date.day()),
            year: format!("{:02}", date.year().rem_euclid(100)),
        }
    }

    /// `MM/DD/YY` rendering.
    pub fn slashed(&self) -> String {
        format!("{}/{}/{}", self.month, self.day, self.year)
    }
}

impl From<NaiveDate> for FormDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

/// Inclusive date range with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DateRangeRepr")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct DateRangeRepr {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<DateRangeRepr> for DateRange {
    type Error = ModelError;

    fn try_from(value: DateRangeRepr) -> Result<Self, Self::Error> {
        DateRange::new(value.start, value.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ModelError> {
        if end < start {
            return Err(ModelError::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering a single day.
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}
