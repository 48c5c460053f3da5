//! Recording timestamps embedded in filenames as `MM_DD_YYYY_hh_mm_ss`.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{2})_([0-9]{2})_([0-9]{4})_([0-9]{2})_([0-9]{2})_([0-9]{2})").unwrap()
});

/// Find the first timestamp in `file_name`.
///
/// Returns the byte offset where the match starts together with the parsed
/// value. Only the first match is considered; if its fields do not form a
/// valid date and time the name has no timestamp.
pub fn locate_timestamp(file_name: &str) -> Option<(usize, NaiveDateTime)> {
    let caps = TIMESTAMP_RE.captures(file_name)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let month = field(1)?;
    let day = field(2)?;
    let year = i32::try_from(field(3)?).ok()?;
    let hour = field(4)?;
    let minute = field(5)?;
    let second = field(6)?;

    let value = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    Some((caps.get(0)?.start(), value))
}

/// Parse the recording timestamp out of a filename.
pub fn extract_timestamp(file_name: &str) -> Option<NaiveDateTime> {
    locate_timestamp(file_name).map(|(_, ts)| ts)
}
