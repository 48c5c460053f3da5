//! Organizer types.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// The two experiment cohorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortKind {
    /// Healthy subjects, tendency data.
    Healthy,
    /// Stroke patients.
    Patient,
}

impl CohortKind {
    pub fn all() -> &'static [CohortKind] {
        &[Self::Healthy, Self::Patient]
    }

    /// Directory under the destination root holding this cohort.
    pub fn output_dir(&self) -> &'static str {
        match self {
            Self::Healthy => "HS_data",
            Self::Patient => "SP_data",
        }
    }
}

impl fmt::Display for CohortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => f.write_str("HS"),
            Self::Patient => f.write_str("SP"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "error")]
pub enum CopyOutcome {
    Copied,
    /// Destination existed and overwrite was off.
    SkippedExisting,
    /// Dry run.
    Planned,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyRecord {
    pub cohort: CohortKind,
    pub subject: String,
    pub task: String,
    pub trial: u32,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub outcome: CopyOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedSubject {
    pub cohort: CohortKind,
    pub subject: String,
    pub reason: String,
}

/// Result of one organizer run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizeReport {
    #[serde(rename = "subjectsProcessed")]
    pub subjects_processed: usize,
    #[serde(rename = "subjectsSkipped")]
    pub subjects_skipped: Vec<SkippedSubject>,
    pub copied: usize,
    #[serde(rename = "skippedExisting")]
    pub skipped_existing: usize,
    pub planned: usize,
    pub failed: usize,
    #[serde(rename = "excludedNoTimestamp")]
    pub excluded_no_timestamp: usize,
    #[serde(rename = "excludedTask")]
    pub excluded_task: usize,
    #[serde(rename = "unresolvedScores")]
    pub unresolved_scores: usize,
    pub copies: Vec<CopyRecord>,
}

impl OrganizeReport {
    pub fn record(&mut self, record: CopyRecord) {
        match record.outcome {
            CopyOutcome::Copied => self.copied += 1,
            CopyOutcome::SkippedExisting => self.skipped_existing += 1,
            CopyOutcome::Planned => self.planned += 1,
            CopyOutcome::Failed(_) => self.failed += 1,
        }
        self.copies.push(record);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
