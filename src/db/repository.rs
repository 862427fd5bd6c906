use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::models::{Assignment, Class, FileRef, NewAssignmentRequest, NewClassRequest};

const CLASS_COLUMNS: &str = "id, name, subject, passcode, teacher_name, created_at";

const ASSIGNMENT_COLUMNS: &str = "id, class_id, title, subject, description, \
    submission_instructions, teacher_notes, file_name, file_original_name, \
    available_from, deadline, expires_at, created_at";

#[derive(Debug, FromRow)]
struct AssignmentRow {
    id: String,
    class_id: String,
    title: String,
    subject: String,
    description: String,
    submission_instructions: Option<String>,
    teacher_notes: Option<String>,
    file_name: Option<String>,
    file_original_name: Option<String>,
    available_from: DateTime<Utc>,
    deadline: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        let file = match (row.file_name, row.file_original_name) {
            (Some(filename), original_name) => Some(FileRef {
                original_name: original_name.unwrap_or_else(|| filename.clone()),
                filename,
            }),
            (None, _) => None,
        };

        Assignment {
            id: row.id,
            class_id: row.class_id,
            title: row.title,
            subject: row.subject,
            description: row.description,
            submission_instructions: row.submission_instructions,
            teacher_notes: row.teacher_notes,
            file,
            available_from: row.available_from,
            deadline: row.deadline,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

pub async fn fetch_classes(db: &SqlitePool) -> Result<Vec<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "SELECT {CLASS_COLUMNS} FROM classes ORDER BY created_at DESC, rowid DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn find_class_by_id(db: &SqlitePool, id: &str) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_class_by_passcode(
    db: &SqlitePool,
    passcode: &str,
) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "SELECT {CLASS_COLUMNS} FROM classes WHERE passcode = ?"
    ))
    .bind(passcode)
    .fetch_optional(db)
    .await
}

pub async fn passcode_exists(db: &SqlitePool, passcode: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes WHERE passcode = ?")
        .bind(passcode)
        .fetch_one(db)
        .await?;
    Ok(count > 0)
}

/// `req.passcode` is expected to be validated already.
pub async fn insert_class(
    db: &SqlitePool,
    req: NewClassRequest,
    now: DateTime<Utc>,
) -> Result<Class, sqlx::Error> {
    let class = Class {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        subject: req.subject,
        passcode: req.passcode,
        teacher_name: req.teacher_name,
        created_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO classes (id, name, subject, passcode, teacher_name, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&class.id)
    .bind(&class.name)
    .bind(&class.subject)
    .bind(&class.passcode)
    .bind(&class.teacher_name)
    .bind(class.created_at)
    .execute(db)
    .await?;

    Ok(class)
}

pub async fn delete_class(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM classes WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_assignments(db: &SqlitePool) -> Result<Vec<Assignment>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AssignmentRow>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments ORDER BY created_at DESC, rowid DESC"
    ))
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Assignment::from).collect())
}

pub async fn fetch_assignments_by_class(
    db: &SqlitePool,
    class_id: &str,
) -> Result<Vec<Assignment>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AssignmentRow>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE class_id = ? \
         ORDER BY created_at DESC, rowid DESC"
    ))
    .bind(class_id)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Assignment::from).collect())
}

pub async fn find_assignment_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Assignment>, sqlx::Error> {
    let row = sqlx::query_as::<_, AssignmentRow>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Assignment::from))
}

pub async fn insert_assignment(
    db: &SqlitePool,
    req: NewAssignmentRequest,
    now: DateTime<Utc>,
) -> Result<Assignment, sqlx::Error> {
    let assignment = Assignment {
        id: Uuid::new_v4().to_string(),
        class_id: req.class_id,
        title: req.title.trim().to_string(),
        subject: req.subject,
        description: req.description,
        submission_instructions: req.submission_instructions,
        teacher_notes: req.teacher_notes,
        file: req.file,
        available_from: req.available_from,
        deadline: req.deadline,
        expires_at: req.expires_at,
        created_at: now,
    };

    let (file_name, file_original_name) = match &assignment.file {
        Some(f) => (Some(f.filename.as_str()), Some(f.original_name.as_str())),
        None => (None, None),
    };

    sqlx::query(
        r#"
        INSERT INTO assignments
            (id, class_id, title, subject, description, submission_instructions,
            teacher_notes, file_name, file_original_name,
            available_from, deadline, expires_at, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(&assignment.id)
    .bind(&assignment.class_id)
    .bind(&assignment.title)
    .bind(&assignment.subject)
    .bind(&assignment.description)
    .bind(&assignment.submission_instructions)
    .bind(&assignment.teacher_notes)
    .bind(file_name)
    .bind(file_original_name)
    .bind(assignment.available_from)
    .bind(assignment.deadline)
    .bind(assignment.expires_at)
    .bind(assignment.created_at)
    .execute(db)
    .await?;

    Ok(assignment)
}

pub async fn delete_assignment(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
