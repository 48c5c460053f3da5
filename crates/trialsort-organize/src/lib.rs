//! Trialsort Organize — copies per-trial recordings of both cohorts into the
//! `destination/{HS_data|SP_data}/subject/task/` tree.
//!
//! One pipeline serves both cohorts; a [`CohortLayout`] supplies what differs
//! between them: subject ids, where recordings live, how they are labeled and
//! scored, how trials are grouped, and the filename template.

pub mod cohort;
pub mod pipeline;
pub mod scan;
pub mod types;

pub use cohort::{
    layout_for, CohortLayout, HealthyLayout, PatientLayout, RecordingBatch, ScoreResolver,
    TrialScope,
};
pub use pipeline::Organizer;
pub use types::*;
