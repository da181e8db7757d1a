use daylog_core::{Schema, SchemaError};
use tempfile::TempDir;

#[test]
fn schema_file_loads_in_declared_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.json");
    std::fs::write(
        &path,
        r#"{
            "categories": [
                {"name": "Work", "questions": ["How many hours did I work?", "Did I enjoy work?"]},
                {"name": "Entertainment", "questions": ["Did I read today?"]}
            ]
        }"#,
    )
    .unwrap();

    let schema = Schema::from_file(&path).unwrap();
    let questions: Vec<&str> = schema.questions().collect();
    assert_eq!(
        questions,
        vec![
            "How many hours did I work?",
            "Did I enjoy work?",
            "Did I read today?",
        ]
    );
}

#[test]
fn missing_schema_file_is_an_io_error_with_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let err = Schema::from_file(&path).unwrap_err();
    match err {
        SchemaError::Io { path: reported, .. } => {
            assert!(reported.ends_with("absent.json"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_json_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(
        Schema::from_file(&path),
        Err(SchemaError::Parse(_))
    ));
}

#[test]
fn duplicate_question_in_a_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.json");
    std::fs::write(
        &path,
        r#"{
            "categories": [
                {"name": "Work", "questions": ["Did I read today?"]},
                {"name": "Entertainment", "questions": ["Did I read today?"]}
            ]
        }"#,
    )
    .unwrap();
    assert!(matches!(
        Schema::from_file(&path),
        Err(SchemaError::DuplicateQuestion(_))
    ));
}
