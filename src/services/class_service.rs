use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::db::repository;
use crate::engine::{AssignmentStatus, summarize};
use crate::error::AppError;
use crate::models::{
    Assignment, AssignmentView, Class, ClassDetail, ClassView, DashboardStats, StudentClassView,
};

/// Read side of classes and assignments.
///
/// Every call samples the clock once, so all statuses in a result agree on
/// the same instant.
pub struct ClassService {
    db: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl ClassService {
    pub fn new(db: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn list_classes(&self) -> Result<Vec<ClassView>, AppError> {
        let now = self.clock.now();
        let classes = repository::fetch_classes(&self.db).await?;
        let assignments = repository::fetch_assignments(&self.db).await?;

        Ok(classes
            .into_iter()
            .map(|class| class_view(class, &assignments, now))
            .collect())
    }

    pub async fn class_detail(&self, id: &str) -> Result<ClassDetail, AppError> {
        let now = self.clock.now();
        let class = repository::find_class_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)?;
        let assignments = repository::fetch_assignments_by_class(&self.db, &class.id).await?;

        let summary = summarize(&assignments, now);
        let views = assignments
            .into_iter()
            .map(|a| AssignmentView::at(a, now))
            .collect();

        Ok(ClassDetail {
            class: ClassView { class, summary },
            assignments: views,
        })
    }

    /// Student access by passcode. Teacher notes are stripped and only
    /// assignments that have opened are listed.
    pub async fn student_view(&self, passcode: &str) -> Result<StudentClassView, AppError> {
        let now = self.clock.now();
        let passcode = passcode.trim();
        let class = match repository::find_class_by_passcode(&self.db, passcode).await? {
            Some(c) => c,
            None => {
                info!("passcode lookup failed");
                return Err(AppError::NotFound);
            }
        };
        let assignments = repository::fetch_assignments_by_class(&self.db, &class.id).await?;

        let summary = summarize(&assignments, now);
        let views: Vec<AssignmentView> = assignments
            .into_iter()
            .map(|a| AssignmentView::at(a, now).for_student())
            .filter(|v| v.status != AssignmentStatus::Pending)
            .collect();
        debug!("student view of class {}: {} assignments", class.id, views.len());

        Ok(StudentClassView {
            id: class.id,
            name: class.name,
            subject: class.subject,
            teacher_name: class.teacher_name,
            summary,
            assignments: views,
        })
    }

    pub async fn list_assignments(&self) -> Result<Vec<AssignmentView>, AppError> {
        let now = self.clock.now();
        let assignments = repository::fetch_assignments(&self.db).await?;
        Ok(assignments
            .into_iter()
            .map(|a| AssignmentView::at(a, now))
            .collect())
    }

    pub async fn assignment(&self, id: &str) -> Result<AssignmentView, AppError> {
        let now = self.clock.now();
        let assignment = repository::find_assignment_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(AssignmentView::at(assignment, now))
    }

    pub async fn dashboard(&self, recent: usize) -> Result<DashboardStats, AppError> {
        let now = self.clock.now();
        let total_classes = repository::fetch_classes(&self.db).await?.len();
        let assignments = repository::fetch_assignments(&self.db).await?;

        let summary = summarize(&assignments, now);
        let recent_assignments = assignments
            .into_iter()
            .take(recent)
            .map(|a| AssignmentView::at(a, now))
            .collect();

        Ok(DashboardStats {
            total_classes,
            total_assignments: summary.total,
            active_assignments: summary.active_count,
            recent_assignments,
        })
    }
}

fn class_view(class: Class, assignments: &[Assignment], now: DateTime<Utc>) -> ClassView {
    let summary = summarize(assignments.iter().filter(|a| a.class_id == class.id), now);
    ClassView { class, summary }
}
