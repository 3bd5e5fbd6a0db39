use std::sync::LazyLock;

use regex::Regex;

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.(?:\s+(.*))?$").unwrap());
static ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-C])\.(?:\s+(.*))?$").unwrap());
static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());
static LETTERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-C]\.").unwrap());
static CAPS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-ZŻŹĆŃÓŁĘĄŚ\s]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// Only uppercase letters (A–Z plus Polish diacritics) and spaces.
    Caps,
    /// `12. text` or a bare `12.`
    Question { number: &'a str, text: &'a str },
    /// `B. text` or a bare `B.`
    Answer { option: &'a str, text: &'a str },
    /// Starts with `<digits>.` but is not a question start (e.g. `3.5 m`).
    Numbered,
    /// Starts with `A.`–`C.` but is not an answer start.
    Lettered,
    Text,
}

impl LineKind<'_> {
    /// Lines that end a question block: any line starting with `<digits>.`.
    pub fn is_numbered(&self) -> bool {
        matches!(self, LineKind::Question { .. } | LineKind::Numbered)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    /// Byte offset of the line start within the classified text.
    pub offset: usize,
    pub raw: &'a str,
    pub kind: LineKind<'a>,
}

/// Split `text` on `\n` and classify every physical line. Offsets index into `text`.
pub fn classify_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in text.split('\n') {
        lines.push(Line {
            offset,
            raw,
            kind: classify(raw),
        });
        offset += raw.len() + 1;
    }
    lines
}

fn classify(raw: &str) -> LineKind<'_> {
    if raw.trim().is_empty() {
        return LineKind::Blank;
    }

    if let Some(caps) = QUESTION_RE.captures(raw) {
        return LineKind::Question {
            number: caps.get(1).map_or("", |m| m.as_str()),
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if let Some(caps) = ANSWER_RE.captures(raw) {
        return LineKind::Answer {
            option: caps.get(1).map_or("", |m| m.as_str()),
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if NUMBERED_RE.is_match(raw) {
        return LineKind::Numbered;
    }
    if LETTERED_RE.is_match(raw) {
        return LineKind::Lettered;
    }
    if CAPS_RE.is_match(raw) {
        return LineKind::Caps;
    }
    LineKind::Text
}
