//! Record-store layer: contracts and file-backed implementation.
//!
//! # Responsibility
//! - Define the append-only entry-store contract used by services and the
//!   trend viewer.
//! - Isolate delimited-file details from business orchestration.
//!
//! # Invariants
//! - Reads are idempotent; appends grow the table by exactly one row.
//! - Repositories return semantic errors with a human-readable cause and
//!   never partially commit.

pub mod entry_repo;
