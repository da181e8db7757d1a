//! Domain model for daily wellbeing entries.
//!
//! # Responsibility
//! - Define the schema registry, input policies and the typed entry record.
//! - Keep validation at construction so downstream layers handle only
//!   well-formed values.
//!
//! # Invariants
//! - The schema is fixed after load; entries are validated against it when
//!   built, never when stored.

pub mod entry;
pub mod policy;
pub mod schema;
