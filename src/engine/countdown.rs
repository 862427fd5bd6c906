use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Below this many hours on the last day the countdown is flagged urgent.
const URGENT_HOURS: i64 = 6;

/// Time left until a deadline, split into display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownBreakdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_urgent: bool,
}

impl CountdownBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

/// Break `deadline - now` down into days, hours, minutes and seconds.
///
/// A deadline at or before `now` gives the all-zero, non-urgent breakdown.
/// Sub-second remainders are truncated.
pub fn countdown(deadline: DateTime<Utc>, now: DateTime<Utc>) -> CountdownBreakdown {
    let difference = deadline - now;
    if difference <= chrono::TimeDelta::zero() {
        return CountdownBreakdown::zero();
    }

    let total = difference.num_seconds();
    let days = total / SECONDS_PER_DAY;
    let hours = (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total % SECONDS_PER_MINUTE;

    CountdownBreakdown {
        days,
        hours,
        minutes,
        seconds,
        is_urgent: days == 0 && hours < URGENT_HOURS,
    }
}
