use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{require_file, ExamError, Result};
use crate::store::Question;

pub const TEMPLATE_HEADER: [&str; 2] = ["Original Text", "Russian Translation"];

/// Exact-match lookup from original text to its translation.
///
/// Keys are trimmed. With `normalize` on, embedded newlines are turned into
/// spaces on both the stored keys and the queries.
#[derive(Debug, Clone, Default)]
pub struct TranslationMap {
    entries: BTreeMap<String, String>,
    normalized: HashMap<String, String>,
    normalize: bool,
}

impl TranslationMap {
    pub fn new(normalize: bool) -> Self {
        TranslationMap {
            normalize,
            ..Default::default()
        }
    }

    /// Later inserts of the same key win.
    pub fn insert(&mut self, original: &str, translation: &str) {
        let key = original.trim().to_string();
        if self.normalize {
            self.normalized.insert(normalize_newlines(&key), key.clone());
        }
        self.entries.insert(key, translation.to_string());
    }

    /// Translation of `text`, or `text` itself when there is none.
    pub fn lookup<'a>(&'a self, text: &'a str) -> &'a str {
        let key = text.trim();
        let found = if self.normalize {
            self.normalized
                .get(&normalize_newlines(key))
                .and_then(|orig| self.entries.get(orig))
        } else {
            self.entries.get(key)
        };
        found.map_or(text, String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn normalizes(&self) -> bool {
        self.normalize
    }

    /// Table as embedded in a page. With `normalize` on, keys have their
    /// newlines collapsed to match the page's normalised lookup.
    pub fn page_table(&self) -> BTreeMap<String, &str> {
        self.entries
            .iter()
            .map(|(k, v)| {
                let key = if self.normalize { normalize_newlines(k) } else { k.clone() };
                (key, v.as_str())
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Two-column CSV with a header row. Short rows and rows with an empty
    /// original or translation are skipped.
    pub fn from_csv_reader<R: Read>(reader: R, normalize: bool) -> csv::Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut map = TranslationMap::new(normalize);
        let mut skipped = 0usize;
        for record in rdr.records() {
            let record = record?;
            let (Some(original), Some(translation)) = (record.get(0), record.get(1)) else {
                skipped += 1;
                continue;
            };
            let (original, translation) = (original.trim(), translation.trim());
            if original.is_empty() || translation.is_empty() {
                skipped += 1;
                continue;
            }
            map.insert(original, translation);
        }
        debug!(loaded = map.len(), skipped, "translations parsed");
        Ok(map)
    }

    pub fn load_csv(path: &Path, normalize: bool) -> Result<Self> {
        require_file(path)?;
        let file = std::fs::File::open(path).map_err(|e| ExamError::io(path, e))?;
        Self::from_csv_reader(file, normalize).map_err(|e| ExamError::csv(path, e))
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', " ")
}

// ── Translation template ──

/// Every unique text a translator needs to see: each line of every category,
/// every question and every answer. Sorted for stable output.
pub fn collect_texts(questions: &[Question]) -> Vec<String> {
    let mut texts = BTreeSet::new();

    for q in questions {
        if let Some(category) = q.category.as_deref() {
            for line in category.split('\n') {
                let line = line.trim();
                if !line.is_empty() {
                    texts.insert(line.to_string());
                }
            }
        }
    }
    for q in questions {
        if !q.question.is_empty() {
            texts.insert(q.question.clone());
        }
    }
    for q in questions {
        for a in &q.answers {
            if !a.text.is_empty() {
                texts.insert(a.text.clone());
            }
        }
    }

    texts.into_iter().collect()
}

/// Write `texts` as a CSV with an empty translation column. Returns the row count.
pub fn write_template(path: &Path, texts: &[String]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ExamError::io(parent, e))?;
    }
    let mut wtr = csv::Writer::from_path(path).map_err(|e| ExamError::csv(path, e))?;
    wtr.write_record(TEMPLATE_HEADER)
        .map_err(|e| ExamError::csv(path, e))?;
    for text in texts {
        wtr.write_record([text.as_str(), ""])
            .map_err(|e| ExamError::csv(path, e))?;
    }
    wtr.flush().map_err(|e| ExamError::io(path, e))?;
    Ok(texts.len())
}

// ── Tests ──
