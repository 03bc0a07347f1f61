//! Functions for parsing and formatting the timestamps in diff file headers.
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

/// Error parsing a header date.
#[derive(Debug, PartialEq, Eq)]
pub enum ParsePatchDateError {
    /// The date string is invalid.
    InvalidDate(String),

    /// The date string is missing a timezone offset.
    MissingTimezoneOffset(String),

    /// The timezone offset is invalid.
    InvalidTimezoneOffset(String),
}

impl std::fmt::Display for ParsePatchDateError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidDate(s) => write!(f, "Invalid date: {}", s),
            Self::MissingTimezoneOffset(s) => write!(f, "Missing timezone offset: {}", s),
            Self::InvalidTimezoneOffset(s) => write!(f, "Invalid timezone offset: {}", s),
        }
    }
}

impl std::error::Error for ParsePatchDateError {}

/// Format a date the way `diff -u` writes it in file headers.
pub fn format_patch_date(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S%.9f %z").to_string()
}

/// Parse a header date such as `2005-09-23 16:23:20.000000000 -0500`.
///
/// Fractional seconds are optional; the timezone offset is not.
pub fn parse_patch_date(date_str: &str) -> Result<DateTime<FixedOffset>, ParsePatchDateError> {
    // Groups: 1 = %Y-%m-%d; 2 = %H:%M:%S[.%f]; 3 = sign; 4 = %H; 5 = %M
    let re = lazy_regex::regex!(
        r"^(\d+-\d+-\d+)\s+(\d+:\d+:\d+(?:\.\d+)?)\s*([+-])(\d\d)(\d\d)$"
    );
    let re_no_offset = lazy_regex::regex!(r"^\d+-\d+-\d+\s+\d+:\d+:\d+(?:\.\d+)?$");

    let date_str = date_str.trim();
    let m = match re.captures(date_str) {
        Some(m) => m,
        None if re_no_offset.is_match(date_str) => {
            return Err(ParsePatchDateError::MissingTimezoneOffset(
                date_str.to_string(),
            ));
        }
        None => return Err(ParsePatchDateError::InvalidDate(date_str.to_string())),
    };

    let invalid_offset = || ParsePatchDateError::InvalidTimezoneOffset(date_str.to_string());
    let offset_hours = m[4].parse::<i32>().map_err(|_| invalid_offset())?;
    let offset_minutes = m[5].parse::<i32>().map_err(|_| invalid_offset())?;
    if offset_hours >= 24 || offset_minutes >= 60 {
        return Err(invalid_offset());
    }
    let mut offset = offset_hours * 3600 + offset_minutes * 60;
    if &m[3] == "-" {
        offset = -offset;
    }
    let offset = FixedOffset::east_opt(offset).ok_or_else(invalid_offset)?;

    let local = NaiveDateTime::parse_from_str(
        &format!("{} {}", &m[1], &m[2]),
        "%Y-%m-%d %H:%M:%S%.f",
    )
    .map_err(|_| ParsePatchDateError::InvalidDate(date_str.to_string()))?;

    offset
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| ParsePatchDateError::InvalidDate(date_str.to_string()))
}
