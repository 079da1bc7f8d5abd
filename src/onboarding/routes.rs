//! REST endpoints that let a client drive the onboarding flow.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;

use crate::error::StepError;

use super::assessment::QUESTIONS;
use super::coordinator::Advance;
use super::manager::{CredentialsUpdate, OnboardingManager};
use super::model::MemoryPreference;
use super::state::AuthMode;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingManager>,
}

#[derive(Debug, Deserialize)]
struct CredentialsRequest {
    email: Option<String>,
    password: Option<SecretString>,
    password_confirmation: Option<SecretString>,
    mode: Option<AuthMode>,
}

#[derive(Debug, Deserialize)]
struct RatingRequest {
    // Any JSON integer; the range is checked in `put_rating`.
    rating: i64,
}

#[derive(Debug, Deserialize)]
struct MemoryRequest {
    preference: MemoryPreference,
}

#[derive(Debug, Deserialize)]
struct ConsentRequest {
    privacy_accepted: Option<bool>,
    allows_notifications: Option<bool>,
}

/// 422 with the failing requirement, so the client can highlight it.
fn step_error_response(err: StepError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": err.to_string(), "code": err.code() })),
    )
        .into_response()
}

/// 204 on success, otherwise the step error body.
fn no_content(result: Result<(), StepError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => step_error_response(e),
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "mindful-onboarding"
    }))
}

/// GET /api/onboarding/status
async fn get_status(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.manager.status().await)
}

/// GET /api/onboarding/questions
async fn get_questions() -> impl IntoResponse {
    Json(&QUESTIONS[..])
}

/// GET /api/onboarding/memory
///
/// The selectable retention options with their display text.
async fn get_memory_options() -> impl IntoResponse {
    let options: Vec<_> = MemoryPreference::ALL
        .iter()
        .map(|p| {
            json!({
                "value": p,
                "name": p.display_name(),
                "description": p.description(),
            })
        })
        .collect();
    Json(options)
}

/// POST /api/onboarding/advance
async fn advance(State(state): State<OnboardingRouteState>) -> Response {
    match state.manager.advance().await {
        Ok(Advance::Moved(step)) => Json(json!({ "outcome": "moved", "step": step })).into_response(),
        Ok(Advance::Completed) => Json(json!({ "outcome": "completed" })).into_response(),
        Err(e) => step_error_response(e),
    }
}

/// PUT /api/onboarding/credentials
async fn put_credentials(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<CredentialsRequest>,
) -> Response {
    let update = CredentialsUpdate {
        email: req.email,
        password: req.password,
        password_confirmation: req.password_confirmation,
        mode: req.mode,
    };
    no_content(state.manager.update_credentials(update).await)
}

/// PUT /api/onboarding/assessment/{index}
async fn put_rating(
    State(state): State<OnboardingRouteState>,
    Path(index): Path<usize>,
    Json(req): Json<RatingRequest>,
) -> Response {
    let rating = match u8::try_from(req.rating) {
        Ok(rating) => rating,
        Err(_) => return step_error_response(StepError::RatingOutOfRange { rating: req.rating }),
    };
    no_content(state.manager.set_response(index, rating).await)
}

/// POST /api/onboarding/assessment/skip
async fn skip_question(State(state): State<OnboardingRouteState>) -> Response {
    no_content(state.manager.skip_question().await)
}

/// POST /api/onboarding/assessment/next
async fn next_question(State(state): State<OnboardingRouteState>) -> Response {
    no_content(state.manager.next_question().await)
}

/// PUT /api/onboarding/memory
async fn put_memory(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<MemoryRequest>,
) -> Response {
    no_content(state.manager.set_memory_preference(req.preference).await)
}

/// PUT /api/onboarding/consent
async fn put_consent(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<ConsentRequest>,
) -> Response {
    no_content(
        state
            .manager
            .update_consent(req.privacy_accepted, req.allows_notifications)
            .await,
    )
}

/// POST /api/onboarding/reset
async fn reset(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    state.manager.reset().await;
    StatusCode::NO_CONTENT
}

/// GET /api/onboarding/profile/{email}
///
/// Returns a profile stored by a completed session, or 404.
async fn get_profile(
    State(state): State<OnboardingRouteState>,
    Path(email): Path<String>,
) -> Response {
    match state.manager.stored_profile(&email).await {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No profile stored for this email" })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load onboarding profile");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/onboarding/status", get(get_status))
        .route("/api/onboarding/questions", get(get_questions))
        .route("/api/onboarding/memory", get(get_memory_options).put(put_memory))
        .route("/api/onboarding/advance", post(advance))
        .route("/api/onboarding/credentials", put(put_credentials))
        .route("/api/onboarding/assessment/skip", post(skip_question))
        .route("/api/onboarding/assessment/next", post(next_question))
        .route("/api/onboarding/assessment/{index}", put(put_rating))
        .route("/api/onboarding/consent", put(put_consent))
        .route("/api/onboarding/reset", post(reset))
        .route("/api/onboarding/profile/{email}", get(get_profile))
        .with_state(state)
}
