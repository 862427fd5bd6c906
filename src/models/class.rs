use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::engine::AssignmentSummary;
use crate::error::AppError;
use crate::models::assignment::AssignmentView;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub passcode: String,
    pub teacher_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClassRequest {
    pub name: String,
    pub subject: String,
    pub passcode: String,
    #[serde(default)]
    pub teacher_name: Option<String>,
}

impl NewClassRequest {
    /// Trim the text fields and check the required ones.
    /// The passcode is checked separately by [`crate::passcode::validate`].
    pub fn normalized(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        self.subject = self.subject.trim().to_string();
        self.teacher_name = self
            .teacher_name
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if self.name.is_empty() {
            return Err(AppError::BadRequest("Class name is required".to_string()));
        }
        if self.subject.is_empty() {
            return Err(AppError::BadRequest("Subject is required".to_string()));
        }
        Ok(self)
    }
}

/// A class together with its assignment counts, as listed on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    #[serde(flatten)]
    pub class: Class,
    pub summary: AssignmentSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetail {
    #[serde(flatten)]
    pub class: ClassView,
    pub assignments: Vec<AssignmentView>,
}

/// What a student sees after entering a passcode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentClassView {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub teacher_name: Option<String>,
    pub summary: AssignmentSummary,
    pub assignments: Vec<AssignmentView>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedPasscode {
    pub passcode: String,
}
