use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{AssignmentStatus, CountdownBreakdown, TimeWindow, classify, countdown};
use crate::error::AppError;

/// Reference to an uploaded file held by the external file service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub filename: String,
    pub original_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub class_id: String,
    pub title: String,
    pub subject: String,
    pub description: String,
    pub submission_instructions: Option<String>,
    pub teacher_notes: Option<String>,
    pub file: Option<FileRef>,
    pub available_from: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TimeWindow for Assignment {
    fn available_from(&self) -> DateTime<Utc> {
        self.available_from
    }

    fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignmentRequest {
    pub class_id: String,
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub submission_instructions: Option<String>,
    #[serde(default)]
    pub teacher_notes: Option<String>,
    #[serde(default)]
    pub file: Option<FileRef>,
    pub available_from: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewAssignmentRequest {
    /// Sanity rules for stored windows. The engine tolerates anything, but
    /// new records must be ordered `available_from <= deadline <= expires_at`.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Title is required".to_string()));
        }
        if self.deadline < self.available_from {
            return Err(AppError::BadRequest(
                "Deadline must not be before availableFrom".to_string(),
            ));
        }
        if self.expires_at < self.deadline {
            return Err(AppError::BadRequest(
                "expiresAt must not be before the deadline".to_string(),
            ));
        }
        Ok(())
    }
}

/// An assignment as rendered for a reader at a given instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub status: AssignmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<CountdownBreakdown>,
}

impl AssignmentView {
    /// The countdown is only attached while the assignment has not expired.
    pub fn at(assignment: Assignment, now: DateTime<Utc>) -> Self {
        let status = classify(&assignment, now);
        let countdown = match status {
            AssignmentStatus::Expired => None,
            _ => Some(countdown(assignment.deadline, now)),
        };
        Self {
            assignment,
            status,
            countdown,
        }
    }

    /// Drop the fields only the teacher may read.
    pub fn for_student(mut self) -> Self {
        self.assignment.teacher_notes = None;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownResponse {
    pub assignment_id: String,
    pub now: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub countdown: CountdownBreakdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_classes: usize,
    pub total_assignments: usize,
    pub active_assignments: usize,
    pub recent_assignments: Vec<AssignmentView>,
}
