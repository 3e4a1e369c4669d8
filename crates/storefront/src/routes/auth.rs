//! Authentication route handlers.
//!
//! Handles signup, login and logout against the local identity registry.

use axum::{Json, extract::State};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use shopfront_core::Identity;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::CurrentSession;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new identity and sign in as it.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn signup(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Json(body): Json<SignupRequest>,
) -> Result<Json<Identity>> {
    let identity = AuthService::new(state.store()).signup(
        &mut session,
        &body.name,
        &body.email,
        body.password.expose_secret(),
    )?;
    set_sentry_user(identity.email.as_str());
    Ok(Json(identity))
}

/// Sign in with email and password.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Identity>> {
    let identity = AuthService::new(state.store()).login(
        &mut session,
        &body.email,
        body.password.expose_secret(),
    )?;
    set_sentry_user(identity.email.as_str());
    Ok(Json(identity))
}

/// Sign out. Idempotent.
#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    mut session: CurrentSession,
) -> Result<Json<serde_json::Value>> {
    AuthService::new(state.store()).logout(&mut session)?;
    clear_sentry_user();
    Ok(Json(serde_json::json!({ "signed_in": false })))
}
