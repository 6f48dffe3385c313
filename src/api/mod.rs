// API routes and handlers

pub mod auth;
pub mod routes;
pub mod workouts;
