//! Score table: task code -> (left, right) score.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;
use trialsort_core::{Error, Result};
use trialsort_naming::{Score, TaskCode};

use crate::sheet::Sheet;

/// Cell naming the hand whose scores sit in the first score column.
pub const SIDE_CELL: (u32, u32) = (4, 1);
/// Sheet rows holding one task each.
pub const SCORE_ROWS: std::ops::RangeInclusive<u32> = 29..=35;
pub const LABEL_COL: u32 = 0;
pub const FIRST_SCORE_COL: u32 = 1;
pub const SECOND_SCORE_COL: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    /// Parse the side cell (`Left` / `Right`).
    pub fn from_cell(text: &str) -> Option<Self> {
        match text {
            "Left" => Some(Self::Left),
            "Right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for HandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScorePair {
    pub left: Score,
    pub right: Score,
}

impl ScorePair {
    pub fn get(&self, side: HandSide) -> Score {
        match side {
            HandSide::Left => self.left,
            HandSide::Right => self.right,
        }
    }

    fn set(&mut self, side: HandSide, score: Score) {
        match side {
            HandSide::Left => self.left = score,
            HandSide::Right => self.right = score,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    entries: BTreeMap<TaskCode, ScorePair>,
}

impl ScoreTable {
    /// Build the table from a subject's score sheet.
    ///
    /// Fails when the side cell is neither `Left` nor `Right`. Rows whose
    /// label does not start with a task code are ignored.
    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        let (side_row, side_col) = SIDE_CELL;
        let first_side = sheet
            .text(side_row, side_col)
            .and_then(HandSide::from_cell)
            .ok_or_else(|| {
                Error::Spreadsheet(format!(
                    "Side cell (row {}, col {}) is not Left/Right: {:?}",
                    side_row,
                    side_col,
                    sheet.get(side_row, side_col)
                ))
            })?;

        let mut table = ScoreTable::default();
        for row in SCORE_ROWS {
            let Some(label) = sheet.text(row, LABEL_COL) else {
                continue;
            };
            let key: String = label.chars().take(5).collect();
            let Some(task) = TaskCode::parse(&key) else {
                debug!("Ignoring score row {} with label {:?}", row, label);
                continue;
            };

            let first = sheet.get(row, FIRST_SCORE_COL).and_then(|c| c.as_score());
            let second = sheet.get(row, SECOND_SCORE_COL).and_then(|c| c.as_score());
            let mut pair = ScorePair::default();
            pair.set(first_side, first);
            pair.set(first_side.other(), second);
            table.entries.insert(task, pair);
        }
        Ok(table)
    }

    pub fn insert(&mut self, task: TaskCode, pair: ScorePair) {
        self.entries.insert(task, pair);
    }

    /// Score for a task on one hand. Unknown tasks are unresolved.
    pub fn score(&self, task: TaskCode, side: HandSide) -> Score {
        self.entries.get(&task).and_then(|pair| pair.get(side))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
