//! HTTP interface - axum router, handlers and the JSON error mapping.
//!
//! Finance actions answer with `{ "data": ..., "gamification": ... }` so the client can
//! render quest progress, XP and level-ups without a second round trip. Reads answer with
//! `{ "data": ... }`. The user is identified by the `X-User-Id` header.

/// `IntoResponse` for the crate error
pub mod error;
/// Request extractors
pub mod extract;
/// Route handlers
pub mod handlers;
/// Response envelopes
pub mod response;
/// Router and middleware stack
pub mod router;
/// Shared handler state
pub mod state;

pub use router::build_router;
pub use state::AppState;
