//! Run configuration: cohort sources, subject/task selection, destination.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Error, Result};

pub const ENV_DESTINATION: &str = "TRIALSORT_DESTINATION";
pub const ENV_OVERWRITE: &str = "TRIALSORT_OVERWRITE";

/// Include/skip list pair. A non-empty include list wins over the skip list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub skip: Vec<String>,
}

impl Selection {
    pub fn include(keys: &[&str]) -> Self {
        Self {
            include: keys.iter().map(|k| k.to_string()).collect(),
            skip: Vec::new(),
        }
    }

    pub fn skip(keys: &[&str]) -> Self {
        Self {
            include: Vec::new(),
            skip: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Whether `key` passes this selection.
    pub fn admits(&self, key: &str) -> bool {
        if !self.include.is_empty() {
            return self.include.iter().any(|k| k == key);
        }
        !self.skip.iter().any(|k| k == key)
    }
}

/// Source tree and subject selection for one cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Root directory holding one directory per subject.
    pub source: PathBuf,
    #[serde(default)]
    pub subjects: Selection,
}

impl CohortConfig {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            subjects: Selection::default(),
        }
    }
}

/// Top-level organizer configuration.
///
/// A cohort without a section is disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Root of the normalized output tree.
    pub destination: PathBuf,
    /// Healthy-subject (tendency) cohort.
    #[serde(default)]
    pub healthy: Option<CohortConfig>,
    /// Stroke-patient cohort.
    #[serde(default)]
    pub patient: Option<CohortConfig>,
    /// Task codes (`FMA17`..`FMA23`) to process.
    #[serde(default)]
    pub tasks: Selection,
    /// Replace files that already exist at the destination.
    #[serde(default)]
    pub overwrite: bool,
    /// Derive every destination but touch nothing on disk.
    #[serde(default)]
    pub dry_run: bool,
}

impl OrganizerConfig {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            healthy: None,
            patient: None,
            tasks: Selection::default(),
            overwrite: false,
            dry_run: false,
        }
    }

    /// Load a JSON config file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config: OrganizerConfig = serde_json::from_str(&raw)?;
        config.apply_overrides(lookup);
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `TRIALSORT_*` overrides from `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dest) = lookup(ENV_DESTINATION).filter(|d| !d.is_empty()) {
            self.destination = PathBuf::from(dest);
        }
        if let Some(flag) = lookup(ENV_OVERWRITE) {
            self.overwrite = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    /// Check that every enabled cohort points at an existing directory.
    pub fn validate(&self) -> Result<()> {
        if self.healthy.is_none() && self.patient.is_none() {
            return Err(Error::Config("No cohort enabled".into()));
        }
        for cohort in self.healthy.iter().chain(self.patient.iter()) {
            if !cohort.source.is_dir() {
                return Err(Error::Config(format!(
                    "Cohort source is not a directory: {}",
                    cohort.source.display()
                )));
            }
        }
        Ok(())
    }
}
