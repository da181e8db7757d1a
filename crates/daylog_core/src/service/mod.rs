//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate schema iteration and repository calls into use-case level
//!   APIs for form surfaces.
//! - Keep input surfaces decoupled from storage details.

pub mod entry_service;
