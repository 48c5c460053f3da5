//! Organizer pipeline: select subjects, derive names, number trials, copy.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};
use trialsort_core::{CohortConfig, Error, OrganizerConfig, Result};
use trialsort_naming::{
    assign_trials, Label, Numbered, Score, SeverityTag, SourceName, TaskCode, Timestamped,
    TrialName,
};

use crate::cohort::{layout_for, CohortLayout, RecordingBatch, TrialScope};
use crate::scan::{list_csv_files, list_dirs};
use crate::types::*;

/// A recording that passed every filter and awaits its trial number.
#[derive(Debug, Clone)]
struct Recording {
    path: PathBuf,
    name: SourceName,
    label: Label,
    score: Score,
}

impl Timestamped for Recording {
    fn task(&self) -> TaskCode {
        self.name.task
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.name.timestamp
    }
}

/// Runs both cohorts against one configuration.
pub struct Organizer {
    config: OrganizerConfig,
    tasks: BTreeSet<TaskCode>,
}

impl Organizer {
    /// Fails if the task selection names an invalid task code.
    pub fn new(config: OrganizerConfig) -> Result<Self> {
        for code in config.tasks.include.iter().chain(config.tasks.skip.iter()) {
            code.parse::<TaskCode>()?;
        }
        let tasks = TaskCode::all()
            .filter(|t| config.tasks.admits(&t.to_string()))
            .collect();
        Ok(Self { config, tasks })
    }

    pub fn enabled_tasks(&self) -> impl Iterator<Item = TaskCode> + '_ {
        self.tasks.iter().copied()
    }

    /// Process every enabled cohort.
    pub fn run(&self) -> Result<OrganizeReport> {
        let mut report = OrganizeReport::default();
        for &kind in CohortKind::all() {
            let cohort = match kind {
                CohortKind::Healthy => self.config.healthy.as_ref(),
                CohortKind::Patient => self.config.patient.as_ref(),
            };
            if let Some(cohort) = cohort {
                self.run_cohort(layout_for(kind).as_ref(), cohort, &mut report)?;
            }
        }

        info!(
            "Organizer finished: subjects={}, skipped={}, copied={}, existing={}, planned={}, failed={}",
            report.subjects_processed,
            report.subjects_skipped.len(),
            report.copied,
            report.skipped_existing,
            report.planned,
            report.failed
        );
        Ok(report)
    }

    fn run_cohort(
        &self,
        layout: &dyn CohortLayout,
        cohort: &CohortConfig,
        report: &mut OrganizeReport,
    ) -> Result<()> {
        let kind = layout.kind();
        if !cohort.source.is_dir() {
            return Err(Error::Config(format!(
                "{} source is not a directory: {}",
                kind,
                cohort.source.display()
            )));
        }
        let cohort_root = self.config.destination.join(kind.output_dir());
        info!("Organizing {} cohort from {}", kind, cohort.source.display());

        // directories sharing a subject id are one subject
        let mut subjects: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for (dir_name, subject_dir) in list_dirs(&cohort.source)? {
            let subject = layout.subject_id(&dir_name);
            if !cohort.subjects.admits(&subject) {
                debug!("Subject {} not selected", subject);
                continue;
            }
            subjects.entry(subject).or_default().push(subject_dir);
        }

        for (subject, subject_dirs) in subjects {
            if subject_dirs.len() > 1 {
                debug!("Subject {} spans {} directories", subject, subject_dirs.len());
            }
            match self.process_subject(layout, &cohort_root, &subject_dirs, &subject, report) {
                Ok(()) => report.subjects_processed += 1,
                Err(e) => {
                    warn!("Skipping {} subject {}: {}", kind, subject, e);
                    report.subjects_skipped.push(SkippedSubject {
                        cohort: kind,
                        subject,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn process_subject(
        &self,
        layout: &dyn CohortLayout,
        cohort_root: &Path,
        subject_dirs: &[PathBuf],
        subject: &str,
        report: &mut OrganizeReport,
    ) -> Result<()> {
        let mut batches = Vec::new();
        for subject_dir in subject_dirs {
            batches.extend(layout.batches(subject_dir, subject)?);
        }
        let subject_root = cohort_root.join(subject);
        self.ensure_task_dirs(&subject_root)?;

        let unresolved_before = report.unresolved_scores;
        let mut groups: Vec<Vec<Recording>> = Vec::new();
        for batch in &batches {
            let recordings = self.collect(batch, report)?;
            match layout.trial_scope() {
                TrialScope::Batch => groups.push(recordings),
                TrialScope::Subject => {
                    if groups.is_empty() {
                        groups.push(Vec::new());
                    }
                    groups[0].extend(recordings);
                }
            }
        }

        let copies_before = report.copies.len();
        for group in groups {
            for numbered in assign_trials(group) {
                self.place(layout, subject, &subject_root, numbered, report);
            }
        }

        let unresolved = report.unresolved_scores - unresolved_before;
        if unresolved > 0 {
            warn!("{} recordings of {} have no resolved score", unresolved, subject);
        }
        info!(
            "Subject {} ({}): {} recordings",
            subject,
            layout.kind(),
            report.copies.len() - copies_before
        );
        Ok(())
    }

    /// Create `subject/FMAxx` for every enabled task. Nothing in a dry run.
    fn ensure_task_dirs(&self, subject_root: &Path) -> Result<()> {
        if self.config.dry_run {
            return Ok(());
        }
        for task in &self.tasks {
            std::fs::create_dir_all(subject_root.join(task.to_string()))?;
        }
        Ok(())
    }

    /// Recordings of one batch that carry an enabled task and a timestamp.
    fn collect(&self, batch: &RecordingBatch, report: &mut OrganizeReport) -> Result<Vec<Recording>> {
        let mut recordings = Vec::new();
        for (file_name, path) in list_csv_files(&batch.dir)? {
            match TaskCode::from_file_name(&file_name) {
                Some(task) if self.tasks.contains(&task) => {}
                _ => {
                    debug!("Excluded (task): {}", path.display());
                    report.excluded_task += 1;
                    continue;
                }
            }
            let Some(name) = SourceName::parse(&file_name) else {
                debug!("Excluded (no timestamp): {}", path.display());
                report.excluded_no_timestamp += 1;
                continue;
            };

            let score = batch.scores.resolve(name.task);
            if score.is_none() {
                debug!("Unresolved score: {}", path.display());
                report.unresolved_scores += 1;
            }
            recordings.push(Recording {
                path,
                name,
                label: batch.label,
                score,
            });
        }
        Ok(recordings)
    }

    fn place(
        &self,
        layout: &dyn CohortLayout,
        subject: &str,
        subject_root: &Path,
        numbered: Numbered<Recording>,
        report: &mut OrganizeReport,
    ) {
        let Numbered { trial, item } = numbered;
        let task = item.name.task;
        let trial_name = TrialName {
            subject: subject.to_string(),
            label: item.label,
            severity: SeverityTag::new(task, item.score),
            trial,
            source: item.name,
        };
        let destination = subject_root
            .join(task.to_string())
            .join(trial_name.render(layout.template()));

        let outcome = if self.config.dry_run {
            CopyOutcome::Planned
        } else if !self.config.overwrite && destination.exists() {
            debug!("Exists, not overwriting: {}", destination.display());
            CopyOutcome::SkippedExisting
        } else {
            match std::fs::copy(&item.path, &destination) {
                Ok(_) => CopyOutcome::Copied,
                Err(e) => {
                    warn!(
                        "Failed to copy {} -> {}: {}",
                        item.path.display(),
                        destination.display(),
                        e
                    );
                    CopyOutcome::Failed(e.to_string())
                }
            }
        };

        report.record(CopyRecord {
            cohort: layout.kind(),
            subject: subject.to_string(),
            task: task.to_string(),
            trial,
            source: item.path,
            destination,
            outcome,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialsort_core::Selection;

    fn write(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, path.file_name().unwrap().to_str().unwrap()).unwrap();
    }

    fn healthy_config(source: &Path, dest: &Path) -> OrganizerConfig {
        let mut config = OrganizerConfig::new(dest);
        config.healthy = Some(CohortConfig::new(source));
        config
    }

    #[test]
    fn test_invalid_task_selection() {
        let mut config = OrganizerConfig::new("/out");
        config.tasks = Selection::skip(&["FMA99"]);
        assert!(matches!(Organizer::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_enabled_tasks() {
        let mut config = OrganizerConfig::new("/out");
        config.tasks = Selection::skip(&["FMA17", "FMA23"]);
        let organizer = Organizer::new(config).unwrap();
        let tasks: Vec<String> = organizer.enabled_tasks().map(|t| t.to_string()).collect();
        assert_eq!(tasks, vec!["FMA18", "FMA19", "FMA20", "FMA21", "FMA22"]);

        let mut config = OrganizerConfig::new("/out");
        config.tasks = Selection::include(&["FMA20"]);
        let organizer = Organizer::new(config).unwrap();
        assert_eq!(organizer.enabled_tasks().count(), 1);
    }

    #[test]
    fn test_missing_source_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = healthy_config(&dir.path().join("nope"), &dir.path().join("out"));
        let err = Organizer::new(config).unwrap().run().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_healthy_trials_span_score_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("hs");
        let dest = dir.path().join("out");
        write(&src.join("VV_subject/Score2/FMA17_VR_03_15_2024_10_30_00.csv"));
        write(&src.join("VV_subject/Score1/FMA17_VR_03_15_2024_11_00_00.csv"));

        let report = Organizer::new(healthy_config(&src, &dest)).unwrap().run().unwrap();
        assert_eq!(report.copied, 2);

        let task_dir = dest.join("HS_data/VV/FMA17");
        assert!(task_dir
            .join("VV_FMA17_VR_Tendency_FT24=S2_Trial1_03_15_2024_10_30_00.csv")
            .exists());
        assert!(task_dir
            .join("VV_FMA17_VR_Tendency_FT24=S1_Trial2_03_15_2024_11_00_00.csv")
            .exists());
    }

    #[test]
    fn test_subject_dirs_with_same_id_share_trials() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("hs");
        let dest = dir.path().join("out");
        write(&src.join("VV_day1/Score2/FMA17_VR_03_15_2024_10_30_00.csv"));
        write(&src.join("VV_day2/Score2/FMA17_VR_03_16_2024_10_30_00.csv"));
        write(&src.join("VV_day2/Score2/FMA17_VR_03_14_2024_10_30_00.csv"));

        let report = Organizer::new(healthy_config(&src, &dest)).unwrap().run().unwrap();
        assert_eq!(report.subjects_processed, 1);
        assert_eq!(report.copied, 3);

        let task_dir = dest.join("HS_data/VV/FMA17");
        for (trial, day) in [(1, 14), (2, 15), (3, 16)] {
            let name = format!(
                "VV_FMA17_VR_Tendency_FT24=S2_Trial{}_03_{}_2024_10_30_00.csv",
                trial, day
            );
            assert!(task_dir.join(&name).exists(), "missing {}", name);
        }
    }

    #[test]
    fn test_exclusions_counted() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("hs");
        let dest = dir.path().join("out");
        write(&src.join("VV/Score1/FMA17_VR_03_15_2024_10_30_00.csv"));
        write(&src.join("VV/Score1/FMA17_VR_no_time.csv"));
        write(&src.join("VV/Score1/FMA24_VR_03_15_2024_10_30_00.csv"));
        write(&src.join("VV/Score1/FMA23_VR_03_15_2024_10_30_00.csv"));
        write(&src.join("VV/Score1/calibration.csv"));

        let mut config = healthy_config(&src, &dest);
        config.tasks = Selection::skip(&["FMA23"]);
        let report = Organizer::new(config).unwrap().run().unwrap();

        assert_eq!(report.copied, 1);
        assert_eq!(report.excluded_no_timestamp, 1);
        assert_eq!(report.excluded_task, 3);
        assert!(!dest.join("HS_data/VV/FMA23").exists());
        assert!(dest.join("HS_data/VV/FMA22").is_dir());
    }

    #[test]
    fn test_unresolved_score() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("hs");
        let dest = dir.path().join("out");
        write(&src.join("VV/NoScore/FMA18_VR_03_15_2024_10_30_00.csv"));

        let report = Organizer::new(healthy_config(&src, &dest)).unwrap().run().unwrap();
        assert_eq!(report.unresolved_scores, 1);
        assert!(dest
            .join("HS_data/VV/FMA18/VV_FMA18_VR_Tendency_FT25=SNone_Trial1_03_15_2024_10_30_00.csv")
            .exists());
    }

    #[test]
    fn test_overwrite_flag() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("hs");
        let dest = dir.path().join("out");
        let file = src.join("VV/Score1/FMA17_VR_03_15_2024_10_30_00.csv");
        write(&file);

        let report = Organizer::new(healthy_config(&src, &dest)).unwrap().run().unwrap();
        assert_eq!(report.copied, 1);
        let out = report.copies[0].destination.clone();
        std::fs::write(&out, b"edited").unwrap();

        let report = Organizer::new(healthy_config(&src, &dest)).unwrap().run().unwrap();
        assert_eq!(report.copied, 0);
        assert_eq!(report.skipped_existing, 1);
        assert_eq!(std::fs::read(&out).unwrap(), b"edited");

        let mut config = healthy_config(&src, &dest);
        config.overwrite = true;
        let report = Organizer::new(config).unwrap().run().unwrap();
        assert_eq!(report.copied, 1);
        assert_eq!(std::fs::read(&out).unwrap(), std::fs::read(&file).unwrap());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("hs");
        let dest = dir.path().join("out");
        write(&src.join("VV/Score1/FMA17_VR_03_15_2024_10_30_00.csv"));

        let mut config = healthy_config(&src, &dest);
        config.dry_run = true;
        let report = Organizer::new(config).unwrap().run().unwrap();
        assert_eq!(report.planned, 1);
        assert_eq!(report.copies[0].outcome, CopyOutcome::Planned);
        assert!(!dest.exists());
    }
}
