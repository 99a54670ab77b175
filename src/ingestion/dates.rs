//! Calendar-date parsing shared by the text-based readers.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Days between 0001-01-01 (day 1 of the common era) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parse a calendar date from text.
///
/// Accepts plain dates (`2023-01-31`, `31/01/2023`, `2023/01/31`) and timestamps whose time of
/// day is discarded (`2023-01-31 00:00:00`, `2023-01-31T08:15:00`).
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let s = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err("expected date (YYYY-MM-DD, DD/MM/YYYY or YYYY-MM-DD HH:MM:SS)".to_string())
}

/// Convert a count of days since 1970-01-01 (Parquet `DATE`) into a calendar date.
pub fn date_from_unix_days(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}
