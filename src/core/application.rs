//! Application state machine - the lifecycle of a volunteer's application.
//!
//! States: PENDING (initial), ACCEPTED, REJECTED, ATTENDED, NO_SHOW,
//! WITHDRAWN. Every transition runs inside a single database transaction so
//! the status change and any capacity-counter change commit or roll back
//! together. Each status change is a *conditional* update filtered on the
//! expected prior status; zero affected rows after a clean guard read means a
//! concurrent writer won the race and the caller gets the retriable
//! `Conflict` error.
//!
//! Capacity is consumed on approval, not submission: PENDING applications may
//! queue against a full event and fail with `EventFull` only when approved.

use crate::{
    core::{capacity, stats},
    entities::{
        Application, Event, User, UserKind, application, application::ApplicationStatus, badge,
        event, event::EventStatus,
    },
    errors::{Error, Result},
};
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};
use tracing::info;

/// Minimum lead time before the event start for withdrawing an accepted
/// application.
const WITHDRAWAL_CUTOFF_HOURS: i64 = 24;

/// Retrieves an application by its unique ID, returning None if it does not exist.
pub async fn get_application_by_id<C>(
    db: &C,
    application_id: i64,
) -> Result<Option<application::Model>>
where
    C: ConnectionTrait,
{
    Application::find_by_id(application_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an event by its unique ID, returning None if it does not exist.
pub async fn get_event_by_id<C>(db: &C, event_id: i64) -> Result<Option<event::Model>>
where
    C: ConnectionTrait,
{
    Event::find_by_id(event_id).one(db).await.map_err(Into::into)
}

/// Finds the application a volunteer holds for an event, if any.
pub async fn find_by_volunteer_and_event<C>(
    db: &C,
    volunteer_id: i64,
    event_id: i64,
) -> Result<Option<application::Model>>
where
    C: ConnectionTrait,
{
    Application::find()
        .filter(application::Column::VolunteerId.eq(volunteer_id))
        .filter(application::Column::EventId.eq(event_id))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_application<C>(db: &C, application_id: i64) -> Result<application::Model>
where
    C: ConnectionTrait,
{
    get_application_by_id(db, application_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "application",
            id: application_id,
        })
}

/// Applies the status change as a conditional update filtered on the status
/// the guard just observed. Zero affected rows means a concurrent transition
/// got there first.
async fn transition_status<C>(
    db: &C,
    application_id: i64,
    from: ApplicationStatus,
    changes: application::ActiveModel,
) -> Result<application::Model>
where
    C: ConnectionTrait,
{
    let updated = Application::update_many()
        .set(changes)
        .filter(application::Column::Id.eq(application_id))
        .filter(application::Column::Status.eq(from))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::Conflict {
            entity: "application",
            id: application_id,
        });
    }

    require_application(db, application_id).await
}

/// Submits a new application, creating it in the PENDING state.
///
/// Capacity is deliberately not checked here; it is re-checked at approval
/// time so applications can queue against a full event.
///
/// # Errors
/// `NotFound` for a missing volunteer or event, `EventNotActive` when the
/// event is not accepting applications, `AlreadyApplied` for a duplicate
/// (volunteer, event) pair.
pub async fn submit(
    db: &DatabaseConnection,
    volunteer_id: i64,
    event_id: i64,
    message: Option<String>,
) -> Result<application::Model> {
    let txn = db.begin().await?;

    let volunteer = User::find_by_id(volunteer_id)
        .one(&txn)
        .await?
        .filter(|user| user.kind == UserKind::Volunteer)
        .ok_or(Error::NotFound {
            entity: "volunteer",
            id: volunteer_id,
        })?;

    let event = Event::find_by_id(event_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "event",
            id: event_id,
        })?;

    if event.status != EventStatus::Active {
        return Err(Error::EventNotActive {
            event_id,
            status: event.status.to_value(),
        });
    }

    if find_by_volunteer_and_event(&txn, volunteer_id, event_id)
        .await?
        .is_some()
    {
        return Err(Error::AlreadyApplied {
            volunteer_id,
            event_id,
        });
    }

    let model = application::ActiveModel {
        volunteer_id: Set(volunteer_id),
        event_id: Set(event_id),
        status: Set(ApplicationStatus::Pending),
        message: Set(message),
        applied_at: Set(Utc::now()),
        ..Default::default()
    };

    // The unique (volunteer_id, event_id) index backs the pre-check under
    // concurrent submissions.
    let result = model.insert(&txn).await.map_err(|err| {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            Error::AlreadyApplied {
                volunteer_id,
                event_id,
            }
        } else {
            err.into()
        }
    })?;

    txn.commit().await?;
    info!(
        application_id = result.id,
        volunteer_id = volunteer.id,
        event_id,
        "application submitted"
    );
    Ok(result)
}

/// Approves a PENDING application, reserving one capacity slot.
///
/// # Errors
/// `NotFound` for a missing application, `NotPending` when the application
/// left the PENDING state, `EventFull` when the reservation fails (the
/// application is left unchanged), `Conflict` on a lost concurrent race.
pub async fn approve(
    db: &DatabaseConnection,
    application_id: i64,
    organization_notes: Option<String>,
) -> Result<application::Model> {
    let txn = db.begin().await?;

    let app = require_application(&txn, application_id).await?;
    if app.status != ApplicationStatus::Pending {
        return Err(Error::NotPending {
            application_id,
            status: app.status.to_value(),
        });
    }

    // EventFull aborts here; the uncommitted transaction rolls back
    capacity::try_reserve_slot(&txn, app.event_id).await?;

    let result = transition_status(
        &txn,
        application_id,
        ApplicationStatus::Pending,
        application::ActiveModel {
            status: Set(ApplicationStatus::Accepted),
            responded_at: Set(Some(Utc::now())),
            organization_notes: Set(organization_notes),
            ..Default::default()
        },
    )
    .await?;

    txn.commit().await?;
    info!(application_id, event_id = app.event_id, "application approved");
    Ok(result)
}

/// Rejects a PENDING application. No capacity effect.
///
/// # Errors
/// `NotFound` for a missing application, `NotPending` when the application
/// left the PENDING state, `Conflict` on a lost concurrent race.
pub async fn reject(
    db: &DatabaseConnection,
    application_id: i64,
    organization_notes: Option<String>,
) -> Result<application::Model> {
    let txn = db.begin().await?;

    let app = require_application(&txn, application_id).await?;
    if app.status != ApplicationStatus::Pending {
        return Err(Error::NotPending {
            application_id,
            status: app.status.to_value(),
        });
    }

    let result = transition_status(
        &txn,
        application_id,
        ApplicationStatus::Pending,
        application::ActiveModel {
            status: Set(ApplicationStatus::Rejected),
            responded_at: Set(Some(Utc::now())),
            organization_notes: Set(organization_notes),
            ..Default::default()
        },
    )
    .await?;

    txn.commit().await?;
    info!(application_id, "application rejected");
    Ok(result)
}

/// Withdraws an application.
///
/// PENDING and REJECTED applications may always withdraw. An ACCEPTED
/// application may withdraw only while the event starts more than 24 hours
/// from now, releasing its capacity slot. Terminal states cannot withdraw.
///
/// # Errors
/// `NotFound` for a missing application or event, `NotWithdrawable` when the
/// current state or the 24-hour cutoff forbids it, `Conflict` on a lost
/// concurrent race.
pub async fn withdraw(db: &DatabaseConnection, application_id: i64) -> Result<application::Model> {
    let txn = db.begin().await?;

    let app = require_application(&txn, application_id).await?;
    match app.status {
        ApplicationStatus::Pending | ApplicationStatus::Rejected => {}
        ApplicationStatus::Accepted => {
            let event = Event::find_by_id(app.event_id)
                .one(&txn)
                .await?
                .ok_or(Error::NotFound {
                    entity: "event",
                    id: app.event_id,
                })?;
            let cutoff = Utc::now() + Duration::hours(WITHDRAWAL_CUTOFF_HOURS);
            if event.start_date <= cutoff {
                return Err(Error::NotWithdrawable {
                    application_id,
                    reason: format!(
                        "event starts within {WITHDRAWAL_CUTOFF_HOURS} hours"
                    ),
                });
            }
            capacity::release_slot(&txn, app.event_id).await?;
        }
        other => {
            return Err(Error::NotWithdrawable {
                application_id,
                reason: format!("status is {}", other.to_value()),
            });
        }
    }

    let result = transition_status(
        &txn,
        application_id,
        app.status,
        application::ActiveModel {
            status: Set(ApplicationStatus::Withdrawn),
            ..Default::default()
        },
    )
    .await?;

    txn.commit().await?;
    info!(application_id, "application withdrawn");
    Ok(result)
}

/// Marks an ACCEPTED application as attended, crediting `hours` to the
/// volunteer's statistics and running the achievement engine.
///
/// Returns the updated application together with any newly awarded badges.
/// The statistics update shares the transition's transaction, and the
/// ACCEPTED guard makes the operation idempotent at the application level: a
/// second call fails with `NotAccepted` and does not double-count.
///
/// # Errors
/// `InvalidHours` for a negative or non-finite hours value, `NotFound` for a
/// missing application, `NotAccepted` when the application is not ACCEPTED,
/// `Conflict` on a lost concurrent race.
pub async fn mark_attended(
    db: &DatabaseConnection,
    application_id: i64,
    hours: f64,
) -> Result<(application::Model, Vec<badge::Model>)> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(Error::InvalidHours { hours });
    }

    let txn = db.begin().await?;

    let app = require_application(&txn, application_id).await?;
    if app.status != ApplicationStatus::Accepted {
        return Err(Error::NotAccepted {
            application_id,
            status: app.status.to_value(),
        });
    }

    let result = transition_status(
        &txn,
        application_id,
        ApplicationStatus::Accepted,
        application::ActiveModel {
            status: Set(ApplicationStatus::Attended),
            hours_completed: Set(Some(hours)),
            completed_at: Set(Some(Utc::now())),
            ..Default::default()
        },
    )
    .await?;

    let new_badges = stats::record_attendance(&txn, app.volunteer_id, hours).await?;

    txn.commit().await?;
    info!(
        application_id,
        volunteer_id = app.volunteer_id,
        hours,
        badges = new_badges.len(),
        "attendance recorded"
    );
    Ok((result, new_badges))
}

/// Marks an ACCEPTED application as a no-show, releasing its capacity slot.
///
/// No statistics are credited or reversed: hours and participation are only
/// ever credited on the ATTENDED edge. `completed_at` likewise stays unset;
/// it records attendance, not the response to its absence.
///
/// # Errors
/// `NotFound` for a missing application, `NotAccepted` when the application
/// is not ACCEPTED, `Conflict` on a lost concurrent race.
pub async fn mark_no_show(
    db: &DatabaseConnection,
    application_id: i64,
) -> Result<application::Model> {
    let txn = db.begin().await?;

    let app = require_application(&txn, application_id).await?;
    if app.status != ApplicationStatus::Accepted {
        return Err(Error::NotAccepted {
            application_id,
            status: app.status.to_value(),
        });
    }

    capacity::release_slot(&txn, app.event_id).await?;

    let result = transition_status(
        &txn,
        application_id,
        ApplicationStatus::Accepted,
        application::ActiveModel {
            status: Set(ApplicationStatus::NoShow),
            ..Default::default()
        },
    )
    .await?;

    txn.commit().await?;
    info!(application_id, "no-show recorded");
    Ok(result)
}
