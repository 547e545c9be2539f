//! Core business logic - framework-agnostic finance and gamification operations.
//!
//! Nothing in here knows about HTTP or Discord; both front-ends call these functions
//! and format the structured results themselves.

/// Accounts and atomic balance updates
pub mod account;
/// Heart meter clamping
pub mod heart;
/// Level curve and level-up events
pub mod level;
/// Lazy profile creation and optimistic profile updates
pub mod profile;
/// Daily quest templates
pub mod quests;
/// Validated gamification settings
pub mod rules;
/// Pure streak transition
pub mod streak;
/// Quest progress and activity scoring
pub mod tracker;
/// Income, expense and transfer records
pub mod transaction;
