use super::lines::{classify_lines, Line, LineKind};

/// Headings of this many characters or fewer are treated as stray matches.
pub const MIN_HEADING_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySection {
    pub name: String,
    /// Byte offset of the heading within the document text.
    pub start: usize,
    /// Document text from the heading up to the next heading (or the end).
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Heading {
    name: String,
    start: usize,
}

/// Split document text into category sections, one per all-caps heading that
/// sits directly above a numbered line.
pub fn segment(text: &str) -> Vec<CategorySection> {
    let lines = classify_lines(text);
    let headings = find_headings(&lines);

    headings
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let end = headings.get(i + 1).map_or(text.len(), |next| next.start);
            CategorySection {
                name: h.name.clone(),
                start: h.start,
                body: text[h.start..end].to_string(),
            }
        })
        .collect()
}

fn find_headings(lines: &[Line]) -> Vec<Heading> {
    let mut headings = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !line.kind.is_numbered() {
            continue;
        }
        let run_start = caps_run_start(lines, i);
        if run_start == i {
            continue;
        }
        let run = &lines[run_start..i];
        let joined = run.iter().map(|l| l.raw).collect::<Vec<_>>().join("\n");
        let name = joined.trim();
        if name.chars().count() <= MIN_HEADING_CHARS {
            continue;
        }

        // The name starts at the first non-blank character of the run.
        let Some(first) = run.iter().find(|l| l.kind != LineKind::Blank) else {
            continue;
        };
        let indent = first.raw.len() - first.raw.trim_start().len();
        headings.push(Heading {
            name: name.to_string(),
            start: first.offset + indent,
        });
    }

    headings
}

/// Walk back from `idx` over consecutive caps/blank lines; returns the index
/// of the first line of that run (== `idx` when there is none).
fn caps_run_start(lines: &[Line], idx: usize) -> usize {
    let mut start = idx;
    while start > 0 && matches!(lines[start - 1].kind, LineKind::Caps | LineKind::Blank) {
        start -= 1;
    }
    start
}

// ── Tests ──
