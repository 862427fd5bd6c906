use chrono::{DateTime, Utc};
use serde::Serialize;

use super::status::{AssignmentStatus, TimeWindow, classify};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub total: usize,
    pub active_count: usize,
}

/// Count all assignments and the ones active at `now`.
pub fn summarize<'a, W, I>(assignments: I, now: DateTime<Utc>) -> AssignmentSummary
where
    W: TimeWindow + 'a,
    I: IntoIterator<Item = &'a W>,
{
    assignments
        .into_iter()
        .fold(AssignmentSummary::default(), |mut acc, a| {
            acc.total += 1;
            if classify(a, now) == AssignmentStatus::Active {
                acc.active_count += 1;
            }
            acc
        })
}
