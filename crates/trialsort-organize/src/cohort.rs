//! Cohort layouts: what differs between the healthy and patient trees.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use trialsort_core::{Error, Result};
use trialsort_naming::{Label, NameTemplate, Score, TaskCode};
use trialsort_scores::{load_score_table, HandSide, ScoreTable};

use crate::scan::list_dirs;
use crate::types::CohortKind;

/// Characters of a healthy-subject directory name that form the subject id.
pub const HEALTHY_SUBJECT_ID_LEN: usize = 2;

/// How a batch of recordings gets its score.
#[derive(Debug, Clone)]
pub enum ScoreResolver {
    /// Same score for every task.
    Fixed(Score),
    /// Looked up per task for one hand.
    Table { table: ScoreTable, side: HandSide },
}

impl ScoreResolver {
    pub fn resolve(&self, task: TaskCode) -> Score {
        match self {
            Self::Fixed(score) => *score,
            Self::Table { table, side } => table.score(task, *side),
        }
    }
}

/// A directory of recordings sharing label and score policy.
#[derive(Debug, Clone)]
pub struct RecordingBatch {
    pub dir: PathBuf,
    pub label: Label,
    pub scores: ScoreResolver,
}

/// Set of recordings that trial numbers are counted over, per task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialScope {
    /// All batches of a subject together.
    Subject,
    /// Each batch on its own.
    Batch,
}

pub trait CohortLayout {
    fn kind(&self) -> CohortKind;

    /// Subject id for a directory under the cohort source.
    fn subject_id(&self, dir_name: &str) -> String;

    fn template(&self) -> &'static NameTemplate;

    fn trial_scope(&self) -> TrialScope;

    /// Recording batches of one subject, in listing order.
    ///
    /// An error means the subject cannot be processed and is skipped.
    fn batches(&self, subject_dir: &Path, subject_id: &str) -> Result<Vec<RecordingBatch>>;
}

pub fn layout_for(kind: CohortKind) -> Box<dyn CohortLayout> {
    match kind {
        CohortKind::Healthy => Box::new(HealthyLayout),
        CohortKind::Patient => Box::new(PatientLayout),
    }
}

/// `source/subject/scoreDir/*.csv`, score taken from the score dir name.
pub struct HealthyLayout;

impl CohortLayout for HealthyLayout {
    fn kind(&self) -> CohortKind {
        CohortKind::Healthy
    }

    fn subject_id(&self, dir_name: &str) -> String {
        dir_name.chars().take(HEALTHY_SUBJECT_ID_LEN).collect()
    }

    fn template(&self) -> &'static NameTemplate {
        &NameTemplate::HEALTHY
    }

    fn trial_scope(&self) -> TrialScope {
        TrialScope::Subject
    }

    fn batches(&self, subject_dir: &Path, _subject_id: &str) -> Result<Vec<RecordingBatch>> {
        Ok(list_dirs(subject_dir)?
            .into_iter()
            .map(|(name, dir)| RecordingBatch {
                dir,
                label: Label::Tendency,
                scores: ScoreResolver::Fixed(score_from_dir_name(&name)),
            })
            .collect())
    }
}

/// `source/subject/{subject}_FMA_HAND/{subject}_FMA_VR_HAND/handDir/*.csv`,
/// scores from the subject's score workbook.
pub struct PatientLayout;

impl PatientLayout {
    pub fn hand_root(subject_dir: &Path, subject_id: &str) -> PathBuf {
        subject_dir
            .join(format!("{}_FMA_HAND", subject_id))
            .join(format!("{}_FMA_VR_HAND", subject_id))
    }
}

impl CohortLayout for PatientLayout {
    fn kind(&self) -> CohortKind {
        CohortKind::Patient
    }

    fn subject_id(&self, dir_name: &str) -> String {
        dir_name.to_string()
    }

    fn template(&self) -> &'static NameTemplate {
        &NameTemplate::PATIENT
    }

    fn trial_scope(&self) -> TrialScope {
        TrialScope::Batch
    }

    fn batches(&self, subject_dir: &Path, subject_id: &str) -> Result<Vec<RecordingBatch>> {
        let hand_root = Self::hand_root(subject_dir, subject_id);
        if !hand_root.is_dir() {
            return Err(Error::NotFound(format!(
                "Hand recordings directory {}",
                hand_root.display()
            )));
        }
        let table = load_score_table(subject_dir)?;
        if table.is_empty() {
            warn!("Score workbook of {} lists no task scores", subject_id);
        } else {
            debug!("Loaded {} task scores for {}", table.len(), subject_id);
        }

        let mut batches = Vec::new();
        for (name, dir) in list_dirs(&hand_root)? {
            let Some(side) = hand_side_from_dir(&name) else {
                warn!("No LeftHand/RightHand token in {}, skipping", dir.display());
                continue;
            };
            batches.push(RecordingBatch {
                dir,
                label: affection_from_dir(&name),
                scores: ScoreResolver::Table {
                    table: table.clone(),
                    side,
                },
            });
        }
        Ok(batches)
    }
}

/// Value of the last run of ASCII digits in a directory name.
pub fn score_from_dir_name(name: &str) -> Score {
    name.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .last()
        .and_then(|run| run.parse().ok())
}

/// `Affected` if any `_` token is exactly `Affected`, else `Unaffected`.
pub fn affection_from_dir(name: &str) -> Label {
    if name.split('_').any(|t| t == "Affected") {
        Label::Affected
    } else {
        Label::Unaffected
    }
}

pub fn hand_side_from_dir(name: &str) -> Option<HandSide> {
    name.split('_').find_map(|t| match t {
        "LeftHand" => Some(HandSide::Left),
        "RightHand" => Some(HandSide::Right),
        _ => None,
    })
}
