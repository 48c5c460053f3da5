//! Trialsort Scores — per-subject score tables for the patient cohort.
//!
//! Each patient directory holds one `*FMA_SCORE*.xlsx` workbook. Its first
//! sheet names the hand recorded in the first score column and lists one
//! score pair per task.

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixture;
pub mod sheet;
pub mod table;
pub mod workbook;

pub use sheet::{Cell, Sheet};
pub use table::{HandSide, ScorePair, ScoreTable};
pub use workbook::{find_score_workbook, load_score_table, read_first_sheet};
