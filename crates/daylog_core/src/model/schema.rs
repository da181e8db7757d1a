//! Schema registry: the ordered categories and questions an entry records.
//!
//! # Responsibility
//! - Define the schema shape and its load/validation path.
//! - Ship the built-in default question set for first runs.
//!
//! # Invariants
//! - Category and question order is stable and display-relevant.
//! - Question text is globally unique across the whole schema; duplicates
//!   would silently collapse to one stored column and are rejected at load.
//! - Question text is single-line printable text, since it becomes a column
//!   header in a line-oriented delimited file.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Error raised while loading or validating a schema.
#[derive(Debug)]
pub enum SchemaError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Empty,
    EmptyCategoryName,
    EmptyCategory(String),
    BlankQuestion(String),
    DuplicateQuestion(String),
    ControlCharacter(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read schema file `{path}`: {source}"),
            Self::Parse(err) => write!(f, "schema file is not valid JSON: {err}"),
            Self::Empty => write!(f, "schema has no categories"),
            Self::EmptyCategoryName => write!(f, "schema has a category with an empty name"),
            Self::EmptyCategory(name) => write!(f, "category `{name}` has no questions"),
            Self::BlankQuestion(category) => {
                write!(f, "category `{category}` has a blank question")
            }
            Self::DuplicateQuestion(question) => write!(
                f,
                "question `{question}` appears more than once; duplicate text would \
                 collapse to a single stored column"
            ),
            Self::ControlCharacter(question) => write!(
                f,
                "question `{question}` contains control characters and cannot be \
                 used as a column header"
            ),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// One named group of questions, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub questions: Vec<String>,
}

/// The ordered mapping of categories to questions.
///
/// Fixed for the lifetime of a process; loaded from a JSON config file or
/// taken from [`Schema::builtin`]. Never mutated after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    categories: Vec<Category>,
}

impl Schema {
    /// Builds a schema from explicit categories, validating it.
    pub fn new(categories: Vec<Category>) -> SchemaResult<Self> {
        let schema = Self { categories };
        schema.validate()?;
        Ok(schema)
    }

    /// Parses and validates a schema from its JSON form.
    ///
    /// Expected shape:
    /// `{"categories": [{"name": "...", "questions": ["...", ...]}, ...]}`
    pub fn from_json(text: &str) -> SchemaResult<Self> {
        let schema: Self = serde_json::from_str(text)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Reads and validates a schema config file.
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// The default wellbeing question set used when no schema file is
    /// configured.
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, questions)| Category {
                name: (*name).to_string(),
                questions: questions.iter().map(|q| (*q).to_string()).collect(),
            })
            .collect();
        // Static data, covered by the builtin_schema_is_valid test.
        Self { categories }
    }

    /// Categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All questions flattened in schema traversal order (category order,
    /// then question order within each category).
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|category| category.questions.iter().map(String::as_str))
    }

    /// Total number of questions across all categories.
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    /// Whether `question` is part of this schema.
    pub fn contains_question(&self, question: &str) -> bool {
        self.questions().any(|q| q == question)
    }

    fn validate(&self) -> SchemaResult<()> {
        if self.categories.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.question_count());
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(SchemaError::EmptyCategoryName);
            }
            if category.questions.is_empty() {
                return Err(SchemaError::EmptyCategory(category.name.clone()));
            }
            for question in &category.questions {
                if question.trim().is_empty() {
                    return Err(SchemaError::BlankQuestion(category.name.clone()));
                }
                if question.chars().any(char::is_control) {
                    return Err(SchemaError::ControlCharacter(question.clone()));
                }
                if seen.contains(&question.as_str()) {
                    return Err(SchemaError::DuplicateQuestion(question.clone()));
                }
                seen.push(question);
            }
        }
        Ok(())
    }
}

const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Overall wellbeing & actions",
        &[
            "What was my overall wellbeing?",
            "Was I the person I want to be?",
        ],
    ),
    (
        "Relationships & community",
        &[
            "Did I love my partner well?",
            "Did I spend quality time with family?",
            "Did I love my friends well?",
            "Did I contribute to society / the community?",
        ],
    ),
    (
        "Mental health",
        &[
            "How did I handle stress?",
            "Did I spend 5+ minutes on mental health?",
        ],
    ),
    (
        "Physical health",
        &[
            "How did I feel physically?",
            "How many hours of sleep did I get?",
            "What was the quality of my sleep?",
            "Did I eat healthy?",
            "Did I work out?",
        ],
    ),
    (
        "Work",
        &[
            "Did I enjoy work?",
            "How many hours did I work?",
            "Was I wise financially?",
        ],
    ),
    (
        "Purpose & engagement",
        &[
            "Did I experience meaning?",
            "Did I experience positive emotions?",
            "Did I feel engaged by what I was doing?",
        ],
    ),
    (
        "Achievement & growth",
        &[
            "Did I have a sense of achievement?",
            "Was my mind stimulated / did I learn?",
            "Did I achieve my daily goals?",
        ],
    ),
    (
        "Character & virtue",
        &[
            "Did I practice the virtues (kindness, patience) I am working on?",
            "Was I of service or generous to others?",
            "Did I practice gratitude today?",
        ],
    ),
    ("Entertainment", &["Did I read today?"]),
];

#[cfg(test)]
mod tests {
    use super::{Category, Schema, SchemaError};

    fn category(name: &str, questions: &[&str]) -> Category {
        Category {
            name: name.to_string(),
            questions: questions.iter().map(|q| q.to_string()).collect(),
        }
    }

    #[test]
    fn builtin_schema_is_valid() {
        let schema = Schema::builtin();
        assert!(schema.validate().is_ok());
        assert!(schema.contains_question("How many hours did I work?"));
    }

    #[test]
    fn questions_iterate_in_schema_order() {
        let schema = Schema::new(vec![
            category("Work", &["How many hours did I work?", "Did I enjoy work?"]),
            category("Rest", &["Did I read today?"]),
        ])
        .unwrap();

        let flattened: Vec<&str> = schema.questions().collect();
        assert_eq!(
            flattened,
            vec![
                "How many hours did I work?",
                "Did I enjoy work?",
                "Did I read today?",
            ]
        );
        assert_eq!(schema.question_count(), 3);
    }

    #[test]
    fn duplicate_question_across_categories_is_rejected() {
        let err = Schema::new(vec![
            category("Work", &["Did I read today?"]),
            category("Rest", &["Did I read today?"]),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateQuestion(_)));
    }

    #[test]
    fn empty_and_blank_shapes_are_rejected() {
        assert!(matches!(Schema::new(vec![]), Err(SchemaError::Empty)));
        assert!(matches!(
            Schema::new(vec![category("Work", &[])]),
            Err(SchemaError::EmptyCategory(_))
        ));
        assert!(matches!(
            Schema::new(vec![category("  ", &["q"])]),
            Err(SchemaError::EmptyCategoryName)
        ));
        assert!(matches!(
            Schema::new(vec![category("Work", &["   "])]),
            Err(SchemaError::BlankQuestion(_))
        ));
        assert!(matches!(
            Schema::new(vec![category("Work", &["line\nbreak"])]),
            Err(SchemaError::ControlCharacter(_))
        ));
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let json = r#"{
            "categories": [
                {"name": "Work", "questions": ["How many hours did I work?"]},
                {"name": "Rest", "questions": ["Did I read today?"]}
            ]
        }"#;
        let schema = Schema::from_json(json).unwrap();
        assert_eq!(schema.categories()[0].name, "Work");
        assert_eq!(schema.categories()[1].name, "Rest");
    }
}
