//! Entry domain model.
//!
//! # Responsibility
//! - Define the typed answer union and the flat daily entry record.
//! - Enforce answer bounds and date shape at construction.
//!
//! # Invariants
//! - An `Answer::Ordinal` value is always in `1..=5`.
//! - An `Answer::Hours` value is always in `0.0..=24.0` and finite.
//! - An `EntryDate` always renders as `YYYY-MM-DD` and names a real
//!   calendar date.
//! - Entry field order follows schema traversal order; the store writes
//!   fields in exactly this order.

use crate::model::policy::InputPolicy;
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Column header under which the entry date is stored.
pub const DATE_COLUMN: &str = "Date";

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex is a literal"));

/// Error raised by answer and date constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValidationError {
    OrdinalOutOfRange(u8),
    HoursOutOfRange(f64),
    InvalidDate(String),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrdinalOutOfRange(value) => {
                write!(f, "ordinal answer {value} is outside 1..=5")
            }
            Self::HoursOutOfRange(value) => {
                write!(f, "hours answer {value} is outside 0.0..=24.0")
            }
            Self::InvalidDate(text) => {
                write!(f, "`{text}` is not a valid YYYY-MM-DD calendar date")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// One answered question: either a 1-5 score or a quantity of hours.
///
/// Constructors enforce the policy bounds, so a constructed answer is
/// always in range; clamping raw user input into range is the form
/// surface's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Ordinal(u8),
    Hours(f64),
}

impl Answer {
    /// Builds an ordinal score answer, rejecting values outside `1..=5`.
    pub fn ordinal(value: u8) -> Result<Self, EntryValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self::Ordinal(value))
        } else {
            Err(EntryValidationError::OrdinalOutOfRange(value))
        }
    }

    /// Builds an hours answer, rejecting non-finite values and values
    /// outside `0.0..=24.0`.
    pub fn hours(value: f64) -> Result<Self, EntryValidationError> {
        if value.is_finite() && (0.0..=24.0).contains(&value) {
            Ok(Self::Hours(value))
        } else {
            Err(EntryValidationError::HoursOutOfRange(value))
        }
    }

    /// The policy this answer satisfies.
    pub fn policy(&self) -> InputPolicy {
        match self {
            Self::Ordinal(_) => InputPolicy::Ordinal,
            Self::Hours(_) => InputPolicy::Hours,
        }
    }

    /// Renders the answer as a table cell.
    ///
    /// Ordinal scores render as bare integers; hours keep one decimal so
    /// `8` round-trips as `8.0` and half steps as `6.5`.
    pub fn to_cell(&self) -> String {
        match self {
            Self::Ordinal(value) => value.to_string(),
            Self::Hours(value) => {
                if (value * 2.0).fract() == 0.0 {
                    format!("{value:.1}")
                } else {
                    value.to_string()
                }
            }
        }
    }
}

/// A calendar date in the store's `YYYY-MM-DD` string encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryDate(String);

impl EntryDate {
    /// Parses a `YYYY-MM-DD` string, checking both the shape and that it
    /// names a real calendar date.
    pub fn parse(text: &str) -> Result<Self, EntryValidationError> {
        if !DATE_SHAPE.is_match(text) {
            return Err(EntryValidationError::InvalidDate(text.to_string()));
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| EntryValidationError::InvalidDate(text.to_string()))?;
        Ok(Self(text.to_string()))
    }

    /// Today according to the local clock.
    pub fn today() -> Self {
        Self(Local::now().format("%Y-%m-%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntryDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntryDate {
    type Error = EntryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntryDate> for String {
    fn from(value: EntryDate) -> Self {
        value.0
    }
}

/// One day's submitted answers plus the date, in schema traversal order.
///
/// Built by the entry service; building an entry never touches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    date: EntryDate,
    answers: Vec<(String, Answer)>,
}

impl Entry {
    pub(crate) fn new(date: EntryDate, answers: Vec<(String, Answer)>) -> Self {
        Self { date, answers }
    }

    pub fn date(&self) -> &EntryDate {
        &self.date
    }

    /// Answered questions in schema traversal order.
    pub fn answers(&self) -> &[(String, Answer)] {
        &self.answers
    }

    /// Column headers for this entry: `Date` first, then each question.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.answers.len() + 1);
        columns.push(DATE_COLUMN.to_string());
        columns.extend(self.answers.iter().map(|(question, _)| question.clone()));
        columns
    }

    /// Cell values matching [`Entry::columns`] positionally.
    pub fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(self.answers.len() + 1);
        cells.push(self.date.to_string());
        cells.extend(self.answers.iter().map(|(_, answer)| answer.to_cell()));
        cells
    }
}
