//! Trialsort Naming — task codes, timestamp extraction, trial numbering,
//! and the canonical filename template.

pub mod name;
pub mod task;
pub mod timestamp;
pub mod trials;

pub use name::{NameTemplate, Slot, SourceName, TrialName};
pub use task::{Label, Score, SeverityTag, TaskCode};
pub use timestamp::{extract_timestamp, locate_timestamp};
pub use trials::{assign_trials, Numbered, Timestamped};
