//! Canonical recording names.
//!
//! A source name is split into the tokens before its timestamp (`lead`) and
//! the timestamp tokens plus whatever follows (`stamp`). The canonical name
//! is rendered from those parts and the derived metadata through an explicit
//! slot template, so a name with fewer lead tokens than usual loses nothing
//! and shifts nothing.

use chrono::NaiveDateTime;

use crate::task::{Label, SeverityTag, TaskCode};
use crate::timestamp::locate_timestamp;

/// A recording filename that carries a valid task code and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceName {
    pub file_name: String,
    pub task: TaskCode,
    pub timestamp: NaiveDateTime,
    /// `_`-delimited tokens before the one where the timestamp starts.
    pub lead: Vec<String>,
    /// Timestamp tokens and everything after them, extension included.
    pub stamp: Vec<String>,
}

impl SourceName {
    /// Returns `None` when the name has no task code or no valid timestamp.
    pub fn parse(file_name: &str) -> Option<Self> {
        let task = TaskCode::from_file_name(file_name)?;
        let (offset, timestamp) = locate_timestamp(file_name)?;

        let split_at = file_name[..offset].matches('_').count();
        let tokens: Vec<String> = file_name.split('_').map(str::to_string).collect();
        let (lead, stamp) = tokens.split_at(split_at);

        Some(Self {
            file_name: file_name.to_string(),
            task,
            timestamp,
            lead: lead.to_vec(),
            stamp: stamp.to_vec(),
        })
    }
}

/// One position in a [`NameTemplate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Subject,
    Label,
    Severity,
    Trial,
    /// A single lead token, omitted if absent.
    Lead(usize),
    /// All lead tokens from the index on.
    LeadFrom(usize),
    Stamp,
}

/// Ordered slot list used to render a [`TrialName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameTemplate {
    pub slots: &'static [Slot],
}

impl NameTemplate {
    /// `VV_FMA17_VR_Tendency_FT24=S3_Trial1_03_15_2024_10_30_00.csv`
    pub const HEALTHY: NameTemplate = NameTemplate {
        slots: &[
            Slot::Subject,
            Slot::Lead(0),
            Slot::Lead(1),
            Slot::Label,
            Slot::Severity,
            Slot::Trial,
            Slot::LeadFrom(2),
            Slot::Stamp,
        ],
    };

    /// `ID12_FMA20_Affected_VR_FT27=S1_Trial1_03_15_2024_10_30_00.csv`
    pub const PATIENT: NameTemplate = NameTemplate {
        slots: &[
            Slot::Subject,
            Slot::Lead(0),
            Slot::Label,
            Slot::Lead(1),
            Slot::Severity,
            Slot::LeadFrom(2),
            Slot::Trial,
            Slot::Stamp,
        ],
    };
}

/// Everything that goes into a canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialName {
    pub subject: String,
    pub label: Label,
    pub severity: SeverityTag,
    pub trial: u32,
    pub source: SourceName,
}

impl TrialName {
    pub fn render(&self, template: &NameTemplate) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.source.lead.len() + 8);
        for slot in template.slots {
            match *slot {
                Slot::Subject => parts.push(self.subject.clone()),
                Slot::Label => parts.push(self.label.to_string()),
                Slot::Severity => parts.push(self.severity.to_string()),
                Slot::Trial => parts.push(format!("Trial{}", self.trial)),
                Slot::Lead(i) => {
                    if let Some(token) = self.source.lead.get(i) {
                        parts.push(token.clone());
                    }
                }
                Slot::LeadFrom(i) => {
                    parts.extend(self.source.lead.iter().skip(i).cloned());
                }
                Slot::Stamp => parts.extend(self.source.stamp.iter().cloned()),
            }
        }
        parts.join("_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial_name(file: &str, subject: &str, label: Label, score: Option<u32>) -> TrialName {
        let source = SourceName::parse(file).unwrap();
        TrialName {
            subject: subject.into(),
            label,
            severity: SeverityTag::new(source.task, score),
            trial: 1,
            source,
        }
    }

    #[test]
    fn test_parse_splits_at_timestamp() {
        let name = SourceName::parse("FMA17_VR_03_15_2024_10_30_00.csv").unwrap();
        assert_eq!(name.task.to_string(), "FMA17");
        assert_eq!(name.lead, vec!["FMA17", "VR"]);
        assert_eq!(name.stamp, vec!["03", "15", "2024", "10", "30", "00.csv"]);
    }

    #[test]
    fn test_parse_rejects() {
        assert!(SourceName::parse("FMA17_VR_notime.csv").is_none());
        assert!(SourceName::parse("FMA30_03_15_2024_10_30_00.csv").is_none());
        assert!(SourceName::parse("calib_03_15_2024_10_30_00.csv").is_none());
    }

    #[test]
    fn test_render_healthy() {
        let name = trial_name("FMA17_VR_03_15_2024_10_30_00.csv", "VV", Label::Tendency, Some(3));
        assert_eq!(
            name.render(&NameTemplate::HEALTHY),
            "VV_FMA17_VR_Tendency_FT24=S3_Trial1_03_15_2024_10_30_00.csv"
        );
    }

    #[test]
    fn test_render_patient() {
        let mut name = trial_name(
            "FMA20_VR_03_15_2024_10_30_00.csv",
            "ID12-DBML-E250212",
            Label::Affected,
            Some(1),
        );
        name.trial = 4;
        assert_eq!(
            name.render(&NameTemplate::PATIENT),
            "ID12-DBML-E250212_FMA20_Affected_VR_FT27=S1_Trial4_03_15_2024_10_30_00.csv"
        );
    }

    #[test]
    fn test_render_extra_lead_tokens() {
        let hs = trial_name("FMA18_VR_L_x_03_15_2024_10_30_00.csv", "VV", Label::Tendency, None);
        assert_eq!(
            hs.render(&NameTemplate::HEALTHY),
            "VV_FMA18_VR_Tendency_FT25=SNone_Trial1_L_x_03_15_2024_10_30_00.csv"
        );
        let sp = trial_name("FMA18_VR_L_x_03_15_2024_10_30_00.csv", "ID1", Label::Unaffected, Some(2));
        assert_eq!(
            sp.render(&NameTemplate::PATIENT),
            "ID1_FMA18_Unaffected_VR_FT25=S2_L_x_Trial1_03_15_2024_10_30_00.csv"
        );
    }

    #[test]
    fn test_render_short_lead_does_not_shift() {
        let name = trial_name("FMA17_03_15_2024_10_30_00.csv", "VV", Label::Tendency, Some(0));
        assert_eq!(name.source.lead, vec!["FMA17"]);
        assert_eq!(
            name.render(&NameTemplate::HEALTHY),
            "VV_FMA17_Tendency_FT24=S0_Trial1_03_15_2024_10_30_00.csv"
        );
        assert_eq!(
            name.render(&NameTemplate::PATIENT),
            "VV_FMA17_Tendency_FT24=S0_Trial1_03_15_2024_10_30_00.csv"
        );
    }
}
