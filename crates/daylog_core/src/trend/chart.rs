//! Trend chart construction over the record store.
//!
//! # Responsibility
//! - Turn one selected question column into a date-keyed chart dataset.
//! - Apply the colored-bar axis policy: ordinal columns clamp the vertical
//!   axis to [0, 5.5], hours columns stay unclamped.
//!
//! # Invariants
//! - An empty store yields `Trend::Empty`, never an error.
//! - An unknown column yields a selection error, never a chart and never a
//!   panic.
//! - Missing or non-numeric cells become `None` points; schema drift is
//!   tolerated, not repaired.

use crate::model::entry::DATE_COLUMN;
use crate::model::policy::InputPolicy;
use crate::repo::entry_repo::EntryTable;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Vertical axis ceiling for ordinal columns; leaves headroom above the
/// maximum score of 5.
const ORDINAL_AXIS_MAX: f64 = 5.5;

pub type TrendResult<T> = Result<T, TrendError>;

/// Error raised by chart construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrendError {
    /// The selected column is not in the store's column set. Carries the
    /// available columns so the caller can report a useful message.
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },
}

impl Display for TrendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownColumn { column, available } => write!(
                f,
                "column `{column}` is not in the record store; available: {}",
                available.join(", ")
            ),
        }
    }
}

impl Error for TrendError {}

/// Chart kind accepted by rendering surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Bars colored on a low-to-high scale.
    ColoredBar,
}

/// A date-keyed dataset ready for a chart rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    /// The charted question, used as the chart title.
    pub column: String,
    pub kind: ChartKind,
    /// Horizontal axis: the `Date` cell of each row, empty when absent.
    pub dates: Vec<String>,
    /// Vertical axis: the selected column parsed as numbers; `None` for
    /// missing or non-numeric cells.
    pub values: Vec<Option<f64>>,
    /// Fixed vertical axis range, or `None` to scale to the data.
    pub y_axis: Option<(f64, f64)>,
}

/// Outcome of a trend request: either a chart or the informational
/// empty-store state.
#[derive(Debug, Clone, PartialEq)]
pub enum Trend {
    /// The store has no rows yet; callers display this as information, not
    /// as an error.
    Empty,
    Chart(TrendChart),
}

/// Builds the trend dataset for `column` against the `Date` column.
pub fn render_trend(table: &EntryTable, column: &str) -> TrendResult<Trend> {
    if table.is_empty() {
        info!("event=trend_render module=trend status=empty column={column}");
        return Ok(Trend::Empty);
    }

    let Some(index) = table.column_index(column) else {
        return Err(TrendError::UnknownColumn {
            column: column.to_string(),
            available: table.columns().to_vec(),
        });
    };
    let date_index = table.column_index(DATE_COLUMN);

    let mut dates = Vec::with_capacity(table.len());
    let mut values = Vec::with_capacity(table.len());
    for row in table.rows() {
        let date = date_index
            .and_then(|i| row.get(i))
            .and_then(|cell| cell.as_deref())
            .unwrap_or_default();
        dates.push(date.to_string());
        values.push(
            row.get(index)
                .and_then(|cell| cell.as_deref())
                .and_then(|cell| cell.trim().parse::<f64>().ok()),
        );
    }

    let y_axis = match InputPolicy::classify(column) {
        InputPolicy::Ordinal => Some((0.0, ORDINAL_AXIS_MAX)),
        InputPolicy::Hours => None,
    };

    info!(
        "event=trend_render module=trend status=ok column={column} points={}",
        values.len()
    );
    Ok(Trend::Chart(TrendChart {
        column: column.to_string(),
        kind: ChartKind::ColoredBar,
        dates,
        values,
        y_axis,
    }))
}

#[cfg(test)]
mod tests {
    use super::{render_trend, Trend, TrendError, ORDINAL_AXIS_MAX};
    use crate::repo::entry_repo::EntryTable;

    fn table(columns: &[&str], rows: &[&[Option<&str>]]) -> EntryTable {
        let mut table = EntryTable::empty(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(
                row.iter()
                    .map(|cell| cell.map(str::to_string))
                    .collect::<Vec<_>>(),
            );
        }
        table
    }

    #[test]
    fn empty_store_is_informational() {
        let empty = EntryTable::empty(vec!["Date".to_string(), "Did I read today?".to_string()]);
        assert_eq!(
            render_trend(&empty, "Did I read today?").unwrap(),
            Trend::Empty
        );
    }

    #[test]
    fn unknown_column_is_a_selection_error() {
        let store = table(
            &["Date", "Did I read today?"],
            &[&[Some("2024-01-01"), Some("4")]],
        );
        let err = render_trend(&store, "nonexistent").unwrap_err();
        match err {
            TrendError::UnknownColumn { column, available } => {
                assert_eq!(column, "nonexistent");
                assert_eq!(available, vec!["Date", "Did I read today?"]);
            }
        }
    }

    #[test]
    fn ordinal_columns_clamp_the_axis_and_hours_do_not() {
        let store = table(
            &["Date", "Did I enjoy work?", "How many hours did I work?"],
            &[&[Some("2024-01-01"), Some("4"), Some("8.0")]],
        );

        match render_trend(&store, "Did I enjoy work?").unwrap() {
            Trend::Chart(chart) => assert_eq!(chart.y_axis, Some((0.0, ORDINAL_AXIS_MAX))),
            Trend::Empty => panic!("expected a chart"),
        }
        match render_trend(&store, "How many hours did I work?").unwrap() {
            Trend::Chart(chart) => assert_eq!(chart.y_axis, None),
            Trend::Empty => panic!("expected a chart"),
        }
    }

    #[test]
    fn missing_and_non_numeric_cells_become_gaps() {
        let store = table(
            &["Date", "Did I read today?"],
            &[
                &[Some("2024-01-01"), Some("4")],
                &[Some("2024-01-02"), None],
                &[Some("2024-01-03"), Some("not a number")],
            ],
        );

        match render_trend(&store, "Did I read today?").unwrap() {
            Trend::Chart(chart) => {
                assert_eq!(chart.dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
                assert_eq!(chart.values, vec![Some(4.0), None, None]);
            }
            Trend::Empty => panic!("expected a chart"),
        }
    }
}
