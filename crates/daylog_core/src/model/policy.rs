//! Input policy classification.
//!
//! # Responsibility
//! - Map a question's text to the input policy used to solicit its answer.
//! - Expose each policy's bounds, default and step for form surfaces.
//!
//! # Invariants
//! - Classification is pure and total: every question string maps to
//!   exactly one policy, with no error path.
//! - A question is `Hours` iff its lower-cased text contains `"hours"`.

use serde::{Deserialize, Serialize};

/// Input policy for one question.
///
/// `Ordinal` is a 1-5 score, `Hours` a continuous quantity of hours in a
/// day. The policy decides which input widget a form surface offers and
/// which [`crate::model::entry::Answer`] variant is legal for the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Integer score in `1..=5`, default 3.
    Ordinal,
    /// Hours in `0.0..=24.0`, step 0.5, default 0.0.
    Hours,
}

impl InputPolicy {
    /// Classifies a question by its text.
    ///
    /// Returns [`InputPolicy::Hours`] iff the lower-cased text contains the
    /// substring `"hours"`, otherwise [`InputPolicy::Ordinal`].
    pub fn classify(question: &str) -> Self {
        if question.to_lowercase().contains("hours") {
            Self::Hours
        } else {
            Self::Ordinal
        }
    }

    /// Smallest legal value.
    pub fn min(self) -> f64 {
        match self {
            Self::Ordinal => 1.0,
            Self::Hours => 0.0,
        }
    }

    /// Largest legal value.
    pub fn max(self) -> f64 {
        match self {
            Self::Ordinal => 5.0,
            Self::Hours => 24.0,
        }
    }

    /// Value a form surface should preselect.
    pub fn default_value(self) -> f64 {
        match self {
            Self::Ordinal => 3.0,
            Self::Hours => 0.0,
        }
    }

    /// Granularity of the input widget.
    pub fn step(self) -> f64 {
        match self {
            Self::Ordinal => 1.0,
            Self::Hours => 0.5,
        }
    }
}
