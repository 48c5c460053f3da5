//! Trialsort Core — error type and run configuration.

pub mod config;
pub mod error;

pub use config::{CohortConfig, OrganizerConfig, Selection};
pub use error::{Error, Result};
