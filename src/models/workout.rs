use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default exercise name when the client omits one.
pub const DEFAULT_EXERCISE_NAME: &str = "Exercise";
/// Default exercise duration in seconds when the client omits one.
pub const DEFAULT_EXERCISE_DURATION: i64 = 30;

/// Workout row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct Workout {
    pub id: i64,
    pub name: String,
    pub spotify_url: Option<String>,
    pub circuits: Option<i64>,
    pub user_id: i64,
}

/// Exercise row as stored. `position` is the zero-based slot within the
/// parent workout, serialized as `order` on the wire.
#[derive(Debug, Clone, FromRow)]
pub struct Exercise {
    pub id: i64,
    pub workout_id: i64,
    pub name: String,
    pub duration: i64,
    pub position: i64,
}

/// Request body for creating or updating a workout. Update is a full
/// replace: omitted optional fields clear the stored values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
    #[serde(default)]
    pub circuits: Option<i64>,
    #[serde(default)]
    pub exercises: Option<Vec<ExerciseSpec>>,
}

/// One submitted exercise. Missing fields take the documented defaults;
/// order comes from the array index, never from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
}

/// Workout JSON shape returned by every workout endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResponse {
    pub id: i64,
    pub name: String,
    pub spotify_url: Option<String>,
    pub exercises: Vec<ExerciseResponse>,
    pub circuits: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseResponse {
    pub id: i64,
    pub name: String,
    pub duration: i64,
    pub order: i64,
}

impl WorkoutResponse {
    pub fn from_rows(workout: Workout, exercises: Vec<Exercise>) -> Self {
        WorkoutResponse {
            id: workout.id,
            name: workout.name,
            spotify_url: workout.spotify_url,
            exercises: exercises
                .into_iter()
                .map(|ex| ExerciseResponse {
                    id: ex.id,
                    name: ex.name,
                    duration: ex.duration,
                    order: ex.position,
                })
                .collect(),
            circuits: workout.circuits,
        }
    }
}

/// Confirmation body for `DELETE /api/workouts/:id`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
