//! Current year from the system clock.
//!
//! The footer only shows the year, so there is no need for a datetime crate.

use std::time::{SystemTime, UNIX_EPOCH};

/// Civil UTC year containing `secs` seconds after the Unix epoch.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn year_from_unix(secs: u64) -> u16 {
    let days = (secs / 86_400) as i64;

    // Days-to-civil over 400-year eras (proleptic Gregorian).
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    // Year starts in March; January and February belong to the next one
    let march_based_month = (5 * doy + 2) / 153;
    (yoe + era * 400 + i64::from(march_based_month >= 10)) as u16
}

/// The real current year, as shown in the page footer.
///
/// A clock set before the epoch reads as 1970.
pub fn current_year() -> u16 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    year_from_unix(secs)
}
