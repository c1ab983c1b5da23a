//! Core business logic for the application lifecycle engine.
//!
//! The modules here own the invariants the rest of the platform relies on:
//! the application state machine, the event capacity counter it drives, the
//! volunteer statistics it aggregates, and the achievement engine that reacts
//! to statistic changes. All functions are async, framework-agnostic, and
//! return `Result` types from the unified error taxonomy.

/// Application state machine - submit, approve, reject, withdraw, attendance
pub mod application;
/// Achievement engine - badge catalog, trigger evaluation, manual awards
pub mod badges;
/// Event capacity counter - atomic slot reservation and release
pub mod capacity;
/// Volunteer statistics aggregator - hours and participation counters
pub mod stats;

use crate::errors::Result;
use tracing::debug;

/// Runs an operation, retrying when it fails with the retriable `Conflict`
/// kind. The operation runs at most `attempts` times; a zero is treated as
/// one, so the operation always runs. Deterministic failures surface
/// immediately without further attempts.
///
/// This is the bounded-retry policy the invoking layer is expected to wrap
/// around state-machine transitions.
///
/// # Errors
/// Returns the final attempt's `Conflict` when every attempt loses its race,
/// or the first non-retriable error.
pub async fn with_conflict_retry<T, F, Fut>(attempts: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    for attempt in 1..attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retriable() => {
                debug!("conflict on attempt {attempt}/{attempts}: {err}");
            }
            Err(err) => return Err(err),
        }
    }
    op().await
}
