//! Core domain logic for DayLog.
//! This crate is the single source of truth for the schema-driven daily
//! entry model, the append-only record store and the trend viewer.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod trend;

pub use logging::{init_logging, logging_status};
pub use model::entry::{Answer, Entry, EntryDate, EntryValidationError, DATE_COLUMN};
pub use model::policy::InputPolicy;
pub use model::schema::{Category, Schema, SchemaError, SchemaResult};
pub use repo::entry_repo::{
    CsvEntryRepository, EntryRepository, EntryTable, RepoError, RepoResult,
};
pub use service::entry_service::{AnswerProvider, EntryService, FormError, FormResult};
pub use trend::chart::{render_trend, ChartKind, Trend, TrendChart, TrendError, TrendResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
