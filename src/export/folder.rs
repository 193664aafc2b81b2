use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%H-%M %d-%m-%Y";

/// Folder name used when none is configured, e.g. `14-05 19-10-2026`.
pub fn default_folder_name(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// `root/base`, or `root/base (n)` with the smallest `n >= 1` that does not exist yet.
pub fn unique_folder(root: &Path, base: &str) -> PathBuf {
    let candidate = root.join(base);
    if !candidate.exists() {
        return candidate;
    }

    (1..)
        .map(|n| root.join(format!("{} ({})", base, n)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
