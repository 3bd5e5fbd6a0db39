//! Page text source: one plain-text blob per PDF page.
//!
//! PDF parsing is left to [`pdf_extract`]. That crate can panic on malformed
//! input, so calls are wrapped in `catch_unwind`. Any failure inside the
//! extraction library degrades to "no pages"; only a missing input file is
//! reported to the caller.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{require_file, Result};

pub fn read_pages(path: &Path) -> Result<Vec<String>> {
    require_file(path)?;

    let data = match fs::read(path) {
        Ok(d) => d,
        Err(e) => {
            warn!("Error reading PDF {}: {}", path.display(), e);
            return Ok(Vec::new());
        }
    };

    let pages = extract_pages(&data);
    debug!(pages = pages.len(), path = %path.display(), "pdf text extracted");
    Ok(pages)
}

fn extract_pages(data: &[u8]) -> Vec<String> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));
    match result {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            warn!("Error reading PDF: {}", e);
            Vec::new()
        }
        Err(_) => {
            warn!("Error reading PDF: extraction panicked (malformed document)");
            Vec::new()
        }
    }
}

/// Join pages in order with `\n`. Page boundaries are not kept past this point.
pub fn document_text(pages: &[String]) -> String {
    pages
        .iter()
        .map(|p| p.replace("\r\n", "\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `max` characters of `text`, with `...` appended when cut.
pub fn sample(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}
