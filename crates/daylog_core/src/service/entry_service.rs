//! Entry form use-case service.
//!
//! # Responsibility
//! - Walk the schema in order, soliciting one answer per question from a
//!   caller-supplied provider.
//! - Hand completed entries to the record store on explicit submit.
//!
//! # Invariants
//! - `build_entry` never mutates the store; only `submit` does.
//! - A built entry's field set is exactly {Date} plus every schema
//!   question, in schema traversal order.
//! - A provider answer whose variant contradicts the question's
//!   classification is rejected, never written through.

use crate::model::entry::{Entry, EntryDate};
use crate::model::policy::InputPolicy;
use crate::model::schema::Schema;
use crate::repo::entry_repo::{EntryRepository, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FormResult<T> = Result<T, FormError>;

/// Error raised while building an entry from a provider.
#[derive(Debug)]
pub enum FormError {
    /// The provider could not produce an answer (e.g. its input surface
    /// failed); carries a human-readable cause.
    Provider { question: String, cause: String },
    /// The provider returned an answer of the wrong kind for the
    /// question's classified policy.
    PolicyMismatch {
        question: String,
        expected: InputPolicy,
    },
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider { question, cause } => {
                write!(f, "no answer for `{question}`: {cause}")
            }
            Self::PolicyMismatch { question, expected } => write!(
                f,
                "answer for `{question}` does not match its {expected:?} input policy"
            ),
        }
    }
}

impl Error for FormError {}

/// Capability that produces one answer per question.
///
/// Policy enforcement is the provider's contract: it clamps raw input to
/// the policy's bounds and step before constructing the answer through the
/// checked [`crate::model::entry::Answer`] constructors.
pub trait AnswerProvider {
    fn provide(
        &mut self,
        category: &str,
        question: &str,
        policy: InputPolicy,
    ) -> Result<crate::model::entry::Answer, String>;
}

/// Use-case service for building and submitting daily entries.
pub struct EntryService<R: EntryRepository> {
    schema: Schema,
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(schema: Schema, repo: R) -> Self {
        Self { schema, repo }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Builds one entry for `date` by iterating categories in schema order
    /// and questions in category order, classifying each question and
    /// requesting one answer.
    ///
    /// # Contract
    /// - Does not touch the store.
    /// - Field order follows schema traversal order.
    pub fn build_entry(
        &self,
        date: EntryDate,
        provider: &mut dyn AnswerProvider,
    ) -> FormResult<Entry> {
        let mut answers = Vec::with_capacity(self.schema.question_count());

        for category in self.schema.categories() {
            for question in &category.questions {
                let policy = InputPolicy::classify(question);
                let answer = provider
                    .provide(&category.name, question, policy)
                    .map_err(|cause| FormError::Provider {
                        question: question.clone(),
                        cause,
                    })?;
                if answer.policy() != policy {
                    return Err(FormError::PolicyMismatch {
                        question: question.clone(),
                        expected: policy,
                    });
                }
                answers.push((question.clone(), answer));
            }
        }

        Ok(Entry::new(date, answers))
    }

    /// Commits a built entry to the record store.
    pub fn submit(&self, entry: &Entry) -> RepoResult<()> {
        self.repo.append(entry)?;
        info!(
            "event=entry_submit module=service status=ok date={} fields={}",
            entry.date(),
            entry.answers().len()
        );
        Ok(())
    }

    /// Read-side passthrough for viewers.
    pub fn read_all(&self) -> RepoResult<crate::repo::entry_repo::EntryTable> {
        self.repo.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::{AnswerProvider, EntryService, FormError};
    use crate::model::entry::{Answer, EntryDate};
    use crate::model::policy::InputPolicy;
    use crate::model::schema::{Category, Schema};
    use crate::repo::entry_repo::{EntryRepository, EntryTable, RepoResult};

    struct NullRepo;

    impl EntryRepository for NullRepo {
        fn read_all(&self) -> RepoResult<EntryTable> {
            Ok(EntryTable::empty(vec!["Date".to_string()]))
        }

        fn append(&self, _entry: &crate::model::entry::Entry) -> RepoResult<()> {
            Ok(())
        }
    }

    struct DefaultProvider;

    impl AnswerProvider for DefaultProvider {
        fn provide(
            &mut self,
            _category: &str,
            _question: &str,
            policy: InputPolicy,
        ) -> Result<Answer, String> {
            Ok(match policy {
                InputPolicy::Ordinal => Answer::Ordinal(3),
                InputPolicy::Hours => Answer::Hours(0.0),
            })
        }
    }

    struct AlwaysOrdinalProvider;

    impl AnswerProvider for AlwaysOrdinalProvider {
        fn provide(
            &mut self,
            _category: &str,
            _question: &str,
            _policy: InputPolicy,
        ) -> Result<Answer, String> {
            Ok(Answer::Ordinal(3))
        }
    }

    fn work_schema() -> Schema {
        Schema::new(vec![Category {
            name: "Work".to_string(),
            questions: vec![
                "How many hours did I work?".to_string(),
                "Did I enjoy work?".to_string(),
            ],
        }])
        .unwrap()
    }

    #[test]
    fn field_set_is_date_plus_every_question_in_order() {
        let service = EntryService::new(work_schema(), NullRepo);
        let entry = service
            .build_entry(
                EntryDate::parse("2024-01-01").unwrap(),
                &mut DefaultProvider,
            )
            .unwrap();

        assert_eq!(
            entry.columns(),
            vec![
                "Date".to_string(),
                "How many hours did I work?".to_string(),
                "Did I enjoy work?".to_string(),
            ]
        );
    }

    #[test]
    fn wrong_answer_kind_is_rejected() {
        let service = EntryService::new(work_schema(), NullRepo);
        let err = service
            .build_entry(
                EntryDate::parse("2024-01-01").unwrap(),
                &mut AlwaysOrdinalProvider,
            )
            .unwrap_err();
        assert!(matches!(err, FormError::PolicyMismatch { .. }));
    }

    #[test]
    fn provider_failure_carries_the_question() {
        struct FailingProvider;
        impl AnswerProvider for FailingProvider {
            fn provide(
                &mut self,
                _category: &str,
                _question: &str,
                _policy: InputPolicy,
            ) -> Result<Answer, String> {
                Err("input closed".to_string())
            }
        }

        let service = EntryService::new(work_schema(), NullRepo);
        let err = service
            .build_entry(
                EntryDate::parse("2024-01-01").unwrap(),
                &mut FailingProvider,
            )
            .unwrap_err();
        match err {
            FormError::Provider { question, cause } => {
                assert_eq!(question, "How many hours did I work?");
                assert_eq!(cause, "input closed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
