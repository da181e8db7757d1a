//! Read-and-chart side of the store.
//!
//! # Responsibility
//! - Build chart-ready datasets from the full record table for one selected
//!   question column.

pub mod chart;
