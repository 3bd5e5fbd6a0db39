use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{require_file, ExamError, Result};

// ── Records ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub option: String,
    pub text: String,
}

/// One extracted exam question. `id` and `category` are only set by the
/// categorized extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub question: String,
    #[serde(default)]
    pub answers: Vec<AnswerOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub correct_option: String,
}

// ── Reading ──

pub fn read_text(path: &Path) -> Result<String> {
    require_file(path)?;
    fs::read_to_string(path).map_err(|e| ExamError::io(path, e))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).map_err(|e| ExamError::json(path, e))
}

pub fn read_questions(path: &Path) -> Result<Vec<Question>> {
    read_json(path)
}

// ── Writing ──

/// Pretty-print `value` (2-space indent, non-ASCII kept as-is) and overwrite `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut body = serde_json::to_string_pretty(value).map_err(|e| ExamError::json(path, e))?;
    body.push('\n');
    write_text(path, &body)
}

pub fn write_text(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExamError::io(parent, e))?;
    }
    fs::write(path, body).map_err(|e| ExamError::io(path, e))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Question> {
        vec![Question {
            id: Some(1),
            number: "134".into(),
            category: Some("REGULAMINY I PODSTAWOWE TERMINY".into()),
            question: "Jaki symbol został ustalony przez IMO\ndla transpondera AIS SART?".into(),
            answers: vec![
                AnswerOption { option: "A".into(), text: "okrąg z krzyżykiem".into() },
                AnswerOption { option: "B".into(), text: "Да — żółty trójkąt".into() },
            ],
        }]
    }

    #[test]
    fn json_round_trip_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/questions.json");
        let questions = sample();
        write_json(&path, &questions).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("okrąg z krzyżykiem"), "non-ASCII must not be escaped");
        assert!(raw.contains("\n  {"), "expected 2-space indentation");

        let back = read_questions(&path).unwrap();
        assert_eq!(back, questions);
    }

    #[test]
    fn flat_questions_omit_id_and_category() {
        let q = Question {
            id: None,
            number: "7".into(),
            category: None,
            question: "Pytanie".into(),
            answers: vec![AnswerOption { option: "A".into(), text: "Tak".into() }],
        };
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(
            json,
            r#"{"number":"7","question":"Pytanie","answers":[{"option":"A","text":"Tak"}]}"#
        );
    }

    #[test]
    fn categorized_field_order() {
        let json = serde_json::to_string(&sample()[0]).unwrap();
        let id = json.find("\"id\"").unwrap();
        let number = json.find("\"number\"").unwrap();
        let category = json.find("\"category\"").unwrap();
        let question = json.find("\"question\"").unwrap();
        assert!(id < number && number < category && category < question);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_questions(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ExamError::MissingFile(_)));
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[{").unwrap();
        assert!(matches!(read_questions(&path), Err(ExamError::Json { .. })));
    }
}
