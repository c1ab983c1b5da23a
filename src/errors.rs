//! Unified error types and result handling for the volunteer engine.
//!
//! Every rejected operation is reported as a distinct, inspectable variant.
//! Guard violations and `NotFound` are deterministic and must not be retried;
//! `Conflict` is the only retriable kind (see [`Error::is_retriable`]).

use thiserror::Error;

/// Unified error type for all engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Which kind of record was looked up (e.g. `"event"`, `"application"`)
        entity: &'static str,
        /// The ID that failed to resolve
        id: i64,
    },

    /// A volunteer already has an application for this event.
    #[error("volunteer {volunteer_id} already applied to event {event_id}")]
    AlreadyApplied {
        /// The applying volunteer
        volunteer_id: i64,
        /// The targeted event
        event_id: i64,
    },

    /// Applications are only accepted against active events.
    #[error("event {event_id} is not active (status: {status})")]
    EventNotActive {
        /// The targeted event
        event_id: i64,
        /// The event's current status
        status: String,
    },

    /// Capacity reservation failed: the event has no free slots.
    #[error("event {event_id} is full")]
    EventFull {
        /// The full event
        event_id: i64,
    },

    /// Transition requires a PENDING application.
    #[error("application {application_id} is not pending (status: {status})")]
    NotPending {
        /// The application that failed the guard
        application_id: i64,
        /// Its actual status
        status: String,
    },

    /// Transition requires an ACCEPTED application.
    #[error("application {application_id} is not accepted (status: {status})")]
    NotAccepted {
        /// The application that failed the guard
        application_id: i64,
        /// Its actual status
        status: String,
    },

    /// The application cannot be withdrawn from its current state.
    #[error("application {application_id} cannot be withdrawn: {reason}")]
    NotWithdrawable {
        /// The application that failed the guard
        application_id: i64,
        /// Why withdrawal is not permitted
        reason: String,
    },

    /// Manual award against a (user, badge type) pair that already has a badge.
    #[error("user {user_id} already has badge {badge_type}")]
    AlreadyHasBadge {
        /// The badge subject
        user_id: i64,
        /// The duplicated badge type
        badge_type: String,
    },

    /// A concurrent writer modified the record mid-transition.
    /// The caller should retry the whole operation.
    #[error("concurrent modification of {entity} {id}, retry the operation")]
    Conflict {
        /// Which kind of record was contended
        entity: &'static str,
        /// The contended record's ID
        id: i64,
    },

    /// Attendance hours must be finite and non-negative.
    #[error("invalid hours value: {hours}")]
    InvalidHours {
        /// The rejected value
        hours: f64,
    },

    /// Configuration error with a descriptive message.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Whether the invoking layer should retry the failed operation.
    ///
    /// Only `Conflict` is retriable; every other kind is deterministic and
    /// will fail the same way again.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
