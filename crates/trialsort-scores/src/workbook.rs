//! Locating and reading a subject's score workbook.

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use tracing::debug;
use trialsort_core::{Error, Result};

use crate::sheet::{Cell, Sheet};
use crate::table::ScoreTable;

/// Fragment every score workbook name contains.
pub const SCORE_FILE_MARKER: &str = "FMA_SCORE";

/// First `*FMA_SCORE*.xlsx` in `subject_dir`, in name order.
pub fn find_score_workbook(subject_dir: &Path) -> Result<PathBuf> {
    let mut names: Vec<String> = std::fs::read_dir(subject_dir)?
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| {
            // "~$" prefixes are Office lock files
            name.ends_with(".xlsx") && name.contains(SCORE_FILE_MARKER) && !name.starts_with("~$")
        })
        .collect();
    names.sort();

    names
        .into_iter()
        .next()
        .map(|name| subject_dir.join(name))
        .ok_or_else(|| {
            Error::NotFound(format!(
                "No *{}*.xlsx in {}",
                SCORE_FILE_MARKER,
                subject_dir.display()
            ))
        })
}

/// Read the first worksheet into a [`Sheet`] with absolute coordinates.
pub fn read_first_sheet(path: &Path) -> Result<Sheet> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| {
        Error::Spreadsheet(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Spreadsheet(format!("No worksheet in {}", path.display())))?
        .map_err(|e| Error::Spreadsheet(format!("Failed to read {}: {}", path.display(), e)))?;

    let mut sheet = Sheet::new();
    if let Some((row0, col0)) = range.start() {
        for (row, col, data) in range.used_cells() {
            let cell = match data {
                Data::Empty => continue,
                Data::Int(i) => Cell::Number(*i as f64),
                Data::Float(f) => Cell::Number(*f),
                Data::String(s) => Cell::Text(s.clone()),
                other => Cell::Text(other.to_string()),
            };
            sheet.set(row0 + row as u32, col0 + col as u32, cell);
        }
    }
    if sheet.is_empty() {
        return Err(Error::Spreadsheet(format!(
            "First worksheet of {} is empty",
            path.display()
        )));
    }
    debug!("Read {} cells from {}", sheet.len(), path.display());
    Ok(sheet)
}

/// Locate, read, and interpret the score workbook of one subject.
pub fn load_score_table(subject_dir: &Path) -> Result<ScoreTable> {
    let path = find_score_workbook(subject_dir)?;
    let sheet = read_first_sheet(&path)?;
    ScoreTable::from_sheet(&sheet)
}
