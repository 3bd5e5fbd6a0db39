//! Stamp extracted data into a self-contained HTML page.
//!
//! Templates carry three kinds of slots:
//!
//! - data slots: `// This will be replaced with the actual JSON data` followed
//!   by a sample JSON array. A sample mentioning `"correct_option"` receives the
//!   answer key, any other sample receives the questions.
//! - the translation slot: a placeholder `translateToRussian` function that
//!   starts with `// Translation function (placeholder` and ends with
//!   `return "[RU] " + text;` and a closing brace.
//! - `{{APP_VERSION}}` and `{{GENERATED_AT}}` tokens.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde::Serialize;
use tracing::{debug, warn};

use crate::store::{AnswerKeyEntry, Question};
use crate::translations::TranslationMap;

pub const DATA_MARKER: &str = "// This will be replaced with the actual JSON data";
pub const VERSION_TOKEN: &str = "{{APP_VERSION}}";
pub const GENERATED_AT_TOKEN: &str = "{{GENERATED_AT}}";

pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/exam.html");

static TRANSLATION_SLOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)// Translation function \(placeholder.*?return "\[RU\] " \+ text;\s+\}"#).unwrap()
});

pub struct AppData<'a> {
    pub questions: &'a [Question],
    pub answer_key: Option<&'a [AnswerKeyEntry]>,
    pub translations: Option<&'a TranslationMap>,
    pub version: &'a str,
    pub generated_at: &'a str,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub question_slots: usize,
    pub answer_slots: usize,
    pub translations_applied: bool,
}

pub fn render(template: &str, data: &AppData) -> serde_json::Result<(String, RenderReport)> {
    let mut report = RenderReport::default();

    let questions_json = script_json(data.questions)?;
    let answers_json = match data.answer_key {
        Some(key) => script_json(key)?,
        None => "[]".to_string(),
    };

    let mut html = String::with_capacity(template.len() + questions_json.len());
    let mut rest = template;
    while let Some(slot) = find_data_slot(rest) {
        html.push_str(&rest[..slot.start]);
        if slot.is_answer_key {
            if data.answer_key.is_none() {
                warn!("template has an answer-key slot but no answer key was given");
            }
            html.push_str(&answers_json);
            report.answer_slots += 1;
        } else {
            html.push_str(&questions_json);
            report.question_slots += 1;
        }
        rest = &rest[slot.end..];
    }
    html.push_str(rest);

    if let Some(translations) = data.translations {
        if TRANSLATION_SLOT_RE.is_match(&html) {
            let function = translation_function(translations)?;
            html = TRANSLATION_SLOT_RE
                .replace_all(&html, NoExpand(&function))
                .into_owned();
            report.translations_applied = true;
        } else {
            warn!("template has no translation placeholder, translations not applied");
        }
    }

    let html = html
        .replace(VERSION_TOKEN, data.version)
        .replace(GENERATED_AT_TOKEN, data.generated_at);

    debug!(?report, "template rendered");
    Ok((html, report))
}

/// Compact JSON that is safe inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn translation_function(translations: &TranslationMap) -> serde_json::Result<String> {
    let table = serde_json::to_string_pretty(&translations.page_table())?.replace("</", "<\\/");
    if !translations.normalizes() {
        return Ok(format!(
            "// Translation function with actual translations from CSV
        function translateToRussian(text) {{
            // Dictionary of translations from CSV file
            const translations = {};

            // Return the translation if available, otherwise return the original text
            return translations[text] || text;
        }}",
            table
        ));
    }
    // Keys were collapsed to single lines, so try the collapsed text first.
    Ok(format!(
        r#"// Translation function with actual translations from CSV
        function translateToRussian(text) {{
            // Dictionary of translations from CSV file
            const translations = {};

            const normalizedText = text.replace(/\r?\n/g, ' ');
            if (translations[normalizedText]) {{
                return translations[normalizedText];
            }}
            return translations[text] || text;
        }}"#,
        table
    ))
}

#[derive(Debug, PartialEq, Eq)]
struct DataSlot {
    /// Byte range covering the marker comment and the sample array.
    start: usize,
    end: usize,
    is_answer_key: bool,
}

fn find_data_slot(html: &str) -> Option<DataSlot> {
    let mut from = 0;
    while let Some(pos) = html[from..].find(DATA_MARKER) {
        let start = from + pos;
        let after_marker = start + DATA_MARKER.len();
        let literal_start = after_marker + (html[after_marker..].len() - html[after_marker..].trim_start().len());

        if html[literal_start..].starts_with('[') {
            if let Some(len) = json_array_len(&html[literal_start..]) {
                let literal = &html[literal_start..literal_start + len];
                return Some(DataSlot {
                    start,
                    end: literal_start + len,
                    is_answer_key: literal.contains("\"correct_option\""),
                });
            }
        }
        warn!(offset = start, "data marker not followed by a JSON array, left in place");
        from = after_marker;
    }
    None
}

/// Byte length of the JSON array at the start of `s`, honouring strings and
/// escapes. `None` when the brackets never balance.
fn json_array_len(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

// ── Tests ──
