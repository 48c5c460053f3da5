//! Task codes, labels, and the severity tag derived from them.

use std::fmt;
use std::str::FromStr;

use trialsort_core::Error;

/// Resolved score. `None` means no score could be determined.
pub type Score = Option<u32>;

/// One of the seven hand tasks, `FMA17` through `FMA23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskCode(u8);

impl TaskCode {
    pub const FIRST: u8 = 17;
    pub const LAST: u8 = 23;

    /// Offset between task numbers and the severity scale (17..23 -> 24..30).
    pub const SEVERITY_OFFSET: u8 = 7;

    pub fn new(number: u8) -> Option<Self> {
        (Self::FIRST..=Self::LAST)
            .contains(&number)
            .then_some(Self(number))
    }

    /// Parse an exact code such as `FMA19`.
    pub fn parse(code: &str) -> Option<Self> {
        let digits = code.strip_prefix("FMA")?;
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(digits.parse().ok()?)
    }

    /// Task code carried by the first five characters of a recording's name.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let first = file_name.split('_').next()?;
        Self::parse(first.get(0..5)?)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn severity_number(self) -> u8 {
        self.0 + Self::SEVERITY_OFFSET
    }

    pub fn all() -> impl Iterator<Item = TaskCode> {
        (Self::FIRST..=Self::LAST).map(TaskCode)
    }
}

impl fmt::Display for TaskCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FMA{:02}", self.0)
    }
}

impl FromStr for TaskCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            Error::Config(format!(
                "Invalid task code '{}' (expected FMA{}..FMA{})",
                s,
                Self::FIRST,
                Self::LAST
            ))
        })
    }
}

/// Classification embedded after the subject in each name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Tendency,
    Affected,
    Unaffected,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tendency => "Tendency",
            Self::Affected => "Affected",
            Self::Unaffected => "Unaffected",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `FT<task + 7>=S<score>`, with `None` for an unresolved score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityTag {
    pub task: TaskCode,
    pub score: Score,
}

impl SeverityTag {
    pub fn new(task: TaskCode, score: Score) -> Self {
        Self { task, score }
    }
}

impl fmt::Display for SeverityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FT{}=S", self.task.severity_number())?;
        match self.score {
            Some(score) => write!(f, "{}", score),
            None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(TaskCode::parse("FMA17").map(TaskCode::number), Some(17));
        assert_eq!(TaskCode::parse("FMA23").map(TaskCode::number), Some(23));
        assert!(TaskCode::parse("FMA16").is_none());
        assert!(TaskCode::parse("FMA24").is_none());
        assert!(TaskCode::parse("FMA1x").is_none());
        assert!(TaskCode::parse("FMB17").is_none());
        assert!(TaskCode::parse("FMA170").is_none());
    }

    #[test]
    fn test_from_file_name() {
        let code = TaskCode::from_file_name("FMA20_VR_03_15_2024_10_30_00.csv");
        assert_eq!(code.map(|c| c.to_string()), Some("FMA20".to_string()));
        assert_eq!(
            TaskCode::from_file_name("FMA21a_03_15_2024_10_30_00.csv"),
            TaskCode::new(21)
        );
        assert!(TaskCode::from_file_name("notes.csv").is_none());
        assert!(TaskCode::from_file_name("FMA9_03_15_2024_10_30_00.csv").is_none());
    }

    #[test]
    fn test_from_str_error() {
        assert!("FMA18".parse::<TaskCode>().is_ok());
        assert!(matches!("FMA30".parse::<TaskCode>(), Err(Error::Config(_))));
    }

    #[test]
    fn test_all_codes() {
        let codes: Vec<String> = TaskCode::all().map(|c| c.to_string()).collect();
        assert_eq!(codes.len(), 7);
        assert_eq!(codes.first().unwrap(), "FMA17");
        assert_eq!(codes.last().unwrap(), "FMA23");
    }

    #[test]
    fn test_severity_tag() {
        let task = TaskCode::parse("FMA19").unwrap();
        assert_eq!(task.severity_number(), 26);
        assert_eq!(SeverityTag::new(task, Some(2)).to_string(), "FT26=S2");
        assert_eq!(SeverityTag::new(task, None).to_string(), "FT26=SNone");

        let first = TaskCode::parse("FMA17").unwrap();
        let last = TaskCode::parse("FMA23").unwrap();
        assert_eq!(SeverityTag::new(first, Some(0)).to_string(), "FT24=S0");
        assert_eq!(SeverityTag::new(last, Some(1)).to_string(), "FT30=S1");
    }
}
