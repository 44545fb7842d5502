//! Filename date stamp parsing

use crate::datestamp::Datestamp;
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

/// Pattern: YYYY?MM?DD where each separator is one of `-`, `_` or `.`
static PATTERN_DATESTAMP: OnceLock<Regex> = OnceLock::new();

fn datestamp_pattern() -> &'static Regex {
    PATTERN_DATESTAMP.get_or_init(|| Regex::new(r"(\d{4})[-_.](\d{2})[-_.](\d{2})").unwrap())
}

/// Parse a date stamp anywhere in a file name.
///
/// The separators do not have to match each other, so `2015.12-30` is
/// accepted. Returns `None` when the name carries no date stamp.
pub fn parse_filename_date(name: &str) -> Option<Datestamp> {
    let caps = datestamp_pattern().captures(name)?;
    let date = Datestamp::from_captures(
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str(),
        caps.get(3)?.as_str(),
    )?;
    trace!(name, %date, "Matched filename date stamp");
    Some(date)
}
