//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Session access is not a layer: handlers take the [`CurrentSession`] or
//! [`RequireAuth`] extractor, which lock the profile session.

pub mod auth;
pub mod request_id;

pub use auth::{AuthRejection, CurrentSession, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
