use axum::Json;
use axum::extract::Path;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use tracing::info;

use crate::db::repository;
use crate::engine::{classify, countdown};
use crate::error::AppError;
use crate::models::*;
use crate::passcode;
use crate::services::ClassService;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/classes", get(list_classes).post(create_class))
        .route("/api/classes/generate-passcode", post(generate_passcode))
        .route("/api/classes/access/{passcode}", get(access_class))
        .route("/api/classes/{id}", get(get_class).delete(delete_class))
        .route("/api/assignments", get(list_assignments).post(create_assignment))
        .route(
            "/api/assignments/{id}",
            get(get_assignment).delete(delete_assignment),
        )
        .route("/api/assignments/{id}/countdown", get(assignment_countdown))
        .route("/api/dashboard", get(dashboard))
        .with_state(state)
}

fn class_service(state: &AppState) -> ClassService {
    ClassService::new(state.db.clone(), state.clock.clone())
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<ClassView>>, AppError> {
    let classes = class_service(&state).list_classes().await?;
    Ok(Json(classes))
}

async fn create_class(
    State(state): State<AppState>,
    Json(req): Json<NewClassRequest>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    let mut req = req.normalized()?;
    req.passcode = passcode::validate(&req.passcode)?;

    if repository::passcode_exists(&state.db, &req.passcode).await? {
        return Err(AppError::Conflict("Passcode is already in use".to_string()));
    }

    let class = match repository::insert_class(&state.db, req, state.clock.now()).await {
        Ok(class) => class,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::Conflict("Passcode is already in use".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    info!("created class {} ({})", class.id, class.name);
    Ok((StatusCode::CREATED, Json(class)))
}

async fn generate_passcode(
    State(state): State<AppState>,
) -> Result<Json<GeneratedPasscode>, AppError> {
    let passcode = passcode::generate_unique(&state.db, state.config.passcode_length).await?;
    Ok(Json(GeneratedPasscode { passcode }))
}

async fn access_class(
    State(state): State<AppState>,
    Path(passcode): Path<String>,
) -> Result<Json<StudentClassView>, AppError> {
    let view = class_service(&state).student_view(&passcode).await?;
    Ok(Json(view))
}

async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClassDetail>, AppError> {
    let detail = class_service(&state).class_detail(&id).await?;
    Ok(Json(detail))
}

async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_class(&state.db, &id).await?;
    if ok {
        info!("deleted class {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentView>>, AppError> {
    let assignments = class_service(&state).list_assignments().await?;
    Ok(Json(assignments))
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(req): Json<NewAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentView>), AppError> {
    req.validate()?;

    if repository::find_class_by_id(&state.db, &req.class_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }

    let now = state.clock.now();
    let assignment = repository::insert_assignment(&state.db, req, now).await?;
    info!(
        "created assignment {} in class {}",
        assignment.id, assignment.class_id
    );
    Ok((StatusCode::CREATED, Json(AssignmentView::at(assignment, now))))
}

async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AssignmentView>, AppError> {
    let view = class_service(&state).assignment(&id).await?;
    Ok(Json(view))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_assignment(&state.db, &id).await?;
    if ok {
        info!("deleted assignment {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn assignment_countdown(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CountdownResponse>, AppError> {
    let assignment = repository::find_assignment_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let now = state.clock.now();
    Ok(Json(CountdownResponse {
        status: classify(&assignment, now),
        countdown: countdown(assignment.deadline, now),
        assignment_id: assignment.id,
        now,
        deadline: assignment.deadline,
    }))
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let stats = class_service(&state)
        .dashboard(state.config.recent_assignments)
        .await?;
    Ok(Json(stats))
}
