use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_FILE: &str = "exam.toml";
pub const ENV_PREFIX: &str = "EXAM";

/// Every path the commands touch. CLI arguments win over these values;
/// these come from `exam.toml` and `EXAM_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub questions_output: PathBuf,
    pub categorized_output: PathBuf,
    pub answer_key_output: PathBuf,
    pub translations_csv: PathBuf,
    pub translations_json: PathBuf,
    pub translation_template: PathBuf,
    /// HTML template; the built-in one is used when unset.
    pub template: Option<PathBuf>,
    pub app_output: PathBuf,
    pub version_file: PathBuf,
    pub serve_dir: PathBuf,
    pub port: u16,
    pub normalize_translation_keys: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            questions_output: "exam_questions.json".into(),
            categorized_output: "exam_questions_with_categories.json".into(),
            answer_key_output: "correct_answers.json".into(),
            translations_csv: "translations.csv".into(),
            translations_json: "translations.json".into(),
            translation_template: "translation_template.csv".into(),
            template: None,
            app_output: "exam_app.html".into(),
            version_file: "version.json".into(),
            serve_dir: ".".into(),
            port: 8000,
            normalize_translation_keys: true,
        }
    }
}

impl Settings {
    /// Load settings. An explicitly given file must exist; the default
    /// `exam.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let settings = Config::builder()
            .add_source(File::from(file).required(path.is_some()))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overrides_defaults() {
        let s = Settings::load(Some(Path::new("tests/fixtures/exam.toml"))).unwrap();
        assert_eq!(s.port, 8123);
        assert_eq!(s.app_output, PathBuf::from("build/exam_app.html"));
        // Fields missing from the file keep their defaults.
        assert_eq!(s.questions_output, PathBuf::from("exam_questions.json"));
        assert!(s.normalize_translation_keys);
        assert!(s.template.is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("tests/fixtures/nope.toml"))).is_err());
    }

    #[test]
    fn builtin_defaults() {
        let s = Settings::default();
        assert_eq!(s.port, 8000);
        assert_eq!(s.serve_dir, PathBuf::from("."));
        assert_eq!(s.categorized_output, PathBuf::from("exam_questions_with_categories.json"));
    }
}
