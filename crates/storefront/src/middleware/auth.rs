//! Session extractors.
//!
//! Provides extractors that hand route handlers the locked profile session.

use std::ops::{Deref, DerefMut};

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tokio::sync::OwnedMutexGuard;

use shopfront_core::Identity;

use crate::models::Session;
use crate::state::AppState;

/// Extractor for the profile session, signed in or not.
///
/// Holds the session lock until the handler returns.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(session: CurrentSession) -> impl IntoResponse {
///     match session.identity() {
///         Some(identity) => format!("Hello, {}!", identity.name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct CurrentSession(OwnedMutexGuard<Session>);

impl Deref for CurrentSession {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.0
    }
}

impl DerefMut for CurrentSession {
    fn deref_mut(&mut self) -> &mut Session {
        &mut self.0
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.session().await))
    }
}

/// Extractor that requires a signed-in identity.
///
/// Rejects with `401 Unauthorized` when nobody is signed in.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth { identity, .. }: RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", identity.name)
/// }
/// ```
pub struct RequireAuth {
    pub identity: Identity,
    pub session: CurrentSession,
}

/// Error returned when authentication is required but nobody is signed in.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Please log in to continue" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Ok(session) = CurrentSession::from_request_parts(parts, state).await;
        let identity = session.identity().cloned().ok_or(AuthRejection)?;
        Ok(Self { identity, session })
    }
}
