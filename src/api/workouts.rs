//! Workout CRUD handlers, scoped to the authenticated caller.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::error::Result;
use crate::models::{MessageResponse, WorkoutPayload, WorkoutResponse};
use crate::services::WorkoutService;
use crate::AppState;

#[tracing::instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<WorkoutResponse>>> {
    let workouts = WorkoutService::new(state.db.clone())
        .list_workouts(user.0.id)
        .await?;
    Ok(Json(workouts))
}

#[tracing::instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn get_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(workout_id): Path<i64>,
) -> Result<Json<WorkoutResponse>> {
    let workout = WorkoutService::new(state.db.clone())
        .get_workout(user.0.id, workout_id)
        .await?;
    Ok(Json(workout))
}

#[tracing::instrument(skip(state, user, payload), fields(user_id = user.0.id))]
pub async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<WorkoutPayload>,
) -> Result<(StatusCode, Json<WorkoutResponse>)> {
    let workout = WorkoutService::new(state.db.clone())
        .create_workout(user.0.id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

#[tracing::instrument(skip(state, user, payload), fields(user_id = user.0.id))]
pub async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(workout_id): Path<i64>,
    Json(payload): Json<WorkoutPayload>,
) -> Result<Json<WorkoutResponse>> {
    let workout = WorkoutService::new(state.db.clone())
        .update_workout(user.0.id, workout_id, payload)
        .await?;
    Ok(Json(workout))
}

#[tracing::instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(workout_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    WorkoutService::new(state.db.clone())
        .delete_workout(user.0.id, workout_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Workout deleted".to_string(),
    }))
}
