use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store;

pub const INITIAL_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize)]
struct VersionFile {
    version: String,
}

/// `1.2.3` → `1.2.4`. `None` unless the input is three dot-separated numbers.
pub fn bump_patch(version: &str) -> Option<String> {
    let parts: Vec<&str> = version.trim().split('.').collect();
    let [major, minor, patch] = parts.as_slice() else {
        return None;
    };
    let major: u64 = major.parse().ok()?;
    let minor: u64 = minor.parse().ok()?;
    let patch: u64 = patch.parse().ok()?;
    Some(format!("{}.{}.{}", major, minor, patch.checked_add(1)?))
}

/// Read the version file, bump its patch number and write it back.
/// A missing or unreadable file starts over at [`INITIAL_VERSION`].
pub fn next_version(path: &Path) -> String {
    let version = if path.exists() {
        match store::read_json::<VersionFile>(path) {
            Ok(file) => bump_patch(&file.version).unwrap_or_else(|| {
                warn!(version = %file.version, "unrecognised app version, starting over");
                INITIAL_VERSION.to_string()
            }),
            Err(e) => {
                warn!("Error handling version: {}", e);
                INITIAL_VERSION.to_string()
            }
        }
    } else {
        INITIAL_VERSION.to_string()
    };

    let file = VersionFile {
        version: version.clone(),
    };
    if let Err(e) = store::write_json(path, &file) {
        warn!("Error saving version: {}", e);
    }
    version
}
