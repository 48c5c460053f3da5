//! Sorted directory listings.

use std::path::{Path, PathBuf};

use tracing::debug;
use trialsort_core::Result;

fn list(dir: &Path, keep: impl Fn(&std::fs::FileType, &str) -> bool) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non-UTF-8 name in {}", dir.display());
            continue;
        };
        if keep(&file_type, &name) {
            entries.push((name, entry.path()));
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Subdirectories of `dir`, sorted by name.
pub fn list_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    list(dir, |t, _| t.is_dir())
}

/// `*.csv` files directly in `dir`, sorted by name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    list(dir, |t, name| t.is_file() && name.ends_with(".csv"))
}
