//! Workout CRUD contract tests, run in anonymous single-user mode.

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{anonymous_app, send, test_pool};

#[tokio::test]
async fn create_applies_exercise_defaults_and_ordering() {
    let app = anonymous_app(test_pool().await);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({
            "name": "Leg Day",
            "circuits": 3,
            "exercises": [
                {"name": "Squats", "duration": 45},
                {"duration": 30}
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Leg Day");
    assert_eq!(body["circuits"], 3);
    assert_eq!(body["spotifyUrl"], json!(null));

    let exercises = body["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["name"], "Squats");
    assert_eq!(exercises[0]["duration"], 45);
    assert_eq!(exercises[0]["order"], 0);
    assert_eq!(exercises[1]["name"], "Exercise");
    assert_eq!(exercises[1]["duration"], 30);
    assert_eq!(exercises[1]["order"], 1);
}

#[tokio::test]
async fn get_after_create_round_trips() {
    let app = anonymous_app(test_pool().await);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({
            "name": "Morning Run",
            "spotifyUrl": "https://open.spotify.com/playlist/abc",
            "exercises": [{"name": "Warmup", "duration": 120}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/workouts/{id}"),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_without_name_is_rejected_and_persists_nothing() {
    let app = anonymous_app(test_pool().await);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({"exercises": [{"name": "Squats"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({"name": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, list) = send(&app, Method::GET, "/api/workouts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn update_replaces_exercises_wholesale() {
    let app = anonymous_app(test_pool().await);

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({
            "name": "Circuit A",
            "spotifyUrl": "https://open.spotify.com/playlist/xyz",
            "circuits": 2,
            "exercises": [
                {"name": "Burpees", "duration": 60},
                {"name": "Plank", "duration": 90}
            ]
        })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // Full replace: no spotifyUrl or circuits submitted means they are
    // cleared, and the old exercise rows must not survive.
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/workouts/{id}"),
        None,
        Some(json!({
            "name": "Circuit B",
            "exercises": [{"name": "Lunges", "duration": 40}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Circuit B");
    assert_eq!(updated["spotifyUrl"], json!(null));
    assert_eq!(updated["circuits"], json!(null));

    let exercises = updated["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0]["name"], "Lunges");
    assert_eq!(exercises[0]["duration"], 40);
    assert_eq!(exercises[0]["order"], 0);

    let (_, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/workouts/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_requires_name() {
    let app = anonymous_app(test_pool().await);

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({"name": "Keep Me", "circuits": 1})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/workouts/{id}"),
        None,
        Some(json!({"circuits": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Failed validation must not have touched the row.
    let (_, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/workouts/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(fetched["name"], "Keep Me");
    assert_eq!(fetched["circuits"], 1);
}

#[tokio::test]
async fn update_unknown_workout_is_not_found() {
    let app = anonymous_app(test_pool().await);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/workouts/999",
        None,
        Some(json!({"name": "Ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = anonymous_app(test_pool().await);

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/workouts",
        None,
        Some(json!({
            "name": "Short Lived",
            "exercises": [{"name": "Jumping Jacks", "duration": 30}]
        })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/workouts/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Workout deleted");

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/workouts/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/workouts/{id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_all_workouts_in_id_order() {
    let app = anonymous_app(test_pool().await);

    for name in ["First", "Second", "Third"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/workouts",
            None,
            Some(json!({"name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/workouts", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn anonymous_mode_has_no_user_endpoint() {
    let app = anonymous_app(test_pool().await);

    // The single-user variant exposes no profile; only the workout
    // endpoints exist under /api.
    let (status, _) = send(&app, Method::GET, "/api/user", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_check_is_public() {
    let app = anonymous_app(test_pool().await);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
