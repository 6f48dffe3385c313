//! Workout CRUD, always scoped to the owning user.
//!
//! Every query filters on the caller's user id, so a workout owned by
//! someone else is indistinguishable from one that does not exist. Each
//! create/update/delete runs the parent and child writes in a single
//! transaction.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::{ApiError, Result};
use crate::models::{
    Exercise, ExerciseSpec, Workout, WorkoutPayload, WorkoutResponse, DEFAULT_EXERCISE_DURATION,
    DEFAULT_EXERCISE_NAME,
};

pub struct WorkoutService {
    db: SqlitePool,
}

impl WorkoutService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// All workouts owned by the user, exercises in position order.
    pub async fn list_workouts(&self, user_id: i64) -> Result<Vec<WorkoutResponse>> {
        let workouts = sqlx::query_as::<_, Workout>(
            "SELECT id, name, spotify_url, circuits, user_id
             FROM workouts WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let mut responses = Vec::with_capacity(workouts.len());
        for workout in workouts {
            let exercises = self.fetch_exercises(workout.id).await?;
            responses.push(WorkoutResponse::from_rows(workout, exercises));
        }

        Ok(responses)
    }

    /// One workout, if it exists and the user owns it.
    pub async fn get_workout(&self, user_id: i64, workout_id: i64) -> Result<WorkoutResponse> {
        let workout = sqlx::query_as::<_, Workout>(
            "SELECT id, name, spotify_url, circuits, user_id
             FROM workouts WHERE id = ? AND user_id = ?",
        )
        .bind(workout_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound)?;

        let exercises = self.fetch_exercises(workout.id).await?;

        Ok(WorkoutResponse::from_rows(workout, exercises))
    }

    /// Create a workout with its exercises in one transaction.
    pub async fn create_workout(
        &self,
        user_id: i64,
        payload: WorkoutPayload,
    ) -> Result<WorkoutResponse> {
        let name = validate_name(&payload)?;

        let mut tx = self.db.begin().await?;

        let workout = sqlx::query_as::<_, Workout>(
            "INSERT INTO workouts (name, spotify_url, circuits, user_id)
             VALUES (?, ?, ?, ?)
             RETURNING id, name, spotify_url, circuits, user_id",
        )
        .bind(&name)
        .bind(&payload.spotify_url)
        .bind(payload.circuits)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let exercises =
            insert_exercises(&mut tx, workout.id, payload.exercises.unwrap_or_default()).await?;

        tx.commit().await?;

        tracing::info!(user_id, workout_id = workout.id, "Created workout");

        Ok(WorkoutResponse::from_rows(workout, exercises))
    }

    /// Full replace of a workout: scalar fields are overwritten with the
    /// submitted values (missing optionals become NULL) and the entire
    /// exercise list is deleted and re-inserted, all in one transaction.
    pub async fn update_workout(
        &self,
        user_id: i64,
        workout_id: i64,
        payload: WorkoutPayload,
    ) -> Result<WorkoutResponse> {
        let name = validate_name(&payload)?;

        let mut tx = self.db.begin().await?;

        let workout = sqlx::query_as::<_, Workout>(
            "UPDATE workouts SET name = ?, spotify_url = ?, circuits = ?
             WHERE id = ? AND user_id = ?
             RETURNING id, name, spotify_url, circuits, user_id",
        )
        .bind(&name)
        .bind(&payload.spotify_url)
        .bind(payload.circuits)
        .bind(workout_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound)?;

        sqlx::query("DELETE FROM exercises WHERE workout_id = ?")
            .bind(workout.id)
            .execute(&mut *tx)
            .await?;

        let exercises =
            insert_exercises(&mut tx, workout.id, payload.exercises.unwrap_or_default()).await?;

        tx.commit().await?;

        Ok(WorkoutResponse::from_rows(workout, exercises))
    }

    /// Delete a workout and its exercises in one transaction.
    pub async fn delete_workout(&self, user_id: i64, workout_id: i64) -> Result<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM exercises WHERE workout_id IN
                     (SELECT id FROM workouts WHERE id = ? AND user_id = ?)")
            .bind(workout_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM workouts WHERE id = ? AND user_id = ?")
            .bind(workout_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the exercise delete.
            return Err(ApiError::NotFound);
        }

        tx.commit().await?;

        tracing::info!(user_id, workout_id, "Deleted workout");

        Ok(())
    }

    async fn fetch_exercises(&self, workout_id: i64) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, workout_id, name, duration, position
             FROM exercises WHERE workout_id = ? ORDER BY position",
        )
        .bind(workout_id)
        .fetch_all(&self.db)
        .await?;

        Ok(exercises)
    }
}

/// `name` is the only required field; absent or empty fails validation.
fn validate_name(payload: &WorkoutPayload) -> Result<String> {
    match &payload.name {
        Some(name) if !name.trim().is_empty() => Ok(name.clone()),
        _ => Err(ApiError::Validation("Name is required".to_string())),
    }
}

/// Insert the submitted exercise list, assigning position from the array
/// index and filling in defaults for omitted fields.
async fn insert_exercises(
    tx: &mut Transaction<'_, Sqlite>,
    workout_id: i64,
    specs: Vec<ExerciseSpec>,
) -> Result<Vec<Exercise>> {
    let mut exercises = Vec::with_capacity(specs.len());
    for (index, spec) in specs.into_iter().enumerate() {
        let exercise = sqlx::query_as::<_, Exercise>(
            "INSERT INTO exercises (workout_id, name, duration, position)
             VALUES (?, ?, ?, ?)
             RETURNING id, workout_id, name, duration, position",
        )
        .bind(workout_id)
        .bind(spec.name.unwrap_or_else(|| DEFAULT_EXERCISE_NAME.to_string()))
        .bind(spec.duration.unwrap_or(DEFAULT_EXERCISE_DURATION))
        .bind(index as i64)
        .fetch_one(&mut **tx)
        .await?;
        exercises.push(exercise);
    }

    Ok(exercises)
}
