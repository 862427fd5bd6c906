use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an assignment at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Pending,
    Active,
    Expired,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Active => "active",
            AssignmentStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything carrying an availability window.
///
/// `deadline` is the due time shown to students; only `available_from` and
/// `expires_at` decide the status.
pub trait TimeWindow {
    fn available_from(&self) -> DateTime<Utc>;
    fn deadline(&self) -> DateTime<Utc>;
    fn expires_at(&self) -> DateTime<Utc>;
}

/// Classify `window` at `now`.
///
/// The active window is the closed interval `[available_from, expires_at]`.
/// Expiry is checked first, so a window with `available_from > expires_at`
/// reads as `Expired` once `now` passes `expires_at` and `Pending` before.
pub fn classify<W: TimeWindow + ?Sized>(window: &W, now: DateTime<Utc>) -> AssignmentStatus {
    if now > window.expires_at() {
        AssignmentStatus::Expired
    } else if window.available_from() <= now {
        AssignmentStatus::Active
    } else {
        AssignmentStatus::Pending
    }
}
