use chrono::{DateTime, TimeDelta, Timelike, Utc};
use chrono_tz::Tz;

/// Truncate the instant to the top of its hour, as seen in the timezone.
///
/// The truncation works on the local minute-second-nanosecond components, so that zones with
/// non-whole-hour offsets (for example, `Asia/Kolkata`) land on their own hour boundaries.
#[must_use]
pub fn top_of_hour(instant: DateTime<Utc>, timezone: Tz) -> DateTime<Utc> {
    let local = instant.with_timezone(&timezone);
    instant
        - TimeDelta::minutes(i64::from(local.minute()))
        - TimeDelta::seconds(i64::from(local.second()))
        - TimeDelta::nanoseconds(i64::from(local.nanosecond()))
}

#[must_use]
pub fn is_top_of_hour(instant: DateTime<Utc>, timezone: Tz) -> bool {
    top_of_hour(instant, timezone) == instant
}
