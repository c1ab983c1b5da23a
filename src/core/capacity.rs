//! Event capacity counter - atomic slot reservation and release.
//!
//! `current_volunteers` vs `max_volunteers` is the single source of truth for
//! "is this event full". Both operations here are expressed as one conditional
//! UPDATE against the persisted counter, so concurrent reservations for the
//! last slot serialize inside the database: exactly one passes the
//! `current_volunteers < max_volunteers` predicate. A separate read followed
//! by a write would lose updates under concurrent approvals.
//!
//! Both functions are generic over `ConnectionTrait` so the state machine can
//! run them inside its own transactions.

use crate::{
    entities::{Event, event},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::{debug, warn};

async fn get_event<C>(db: &C, event_id: i64) -> Result<event::Model>
where
    C: ConnectionTrait,
{
    Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "event",
            id: event_id,
        })
}

/// Reserves one capacity slot on the event, failing with `EventFull` when the
/// event has a finite capacity and no free slots.
///
/// The increment is a single conditional UPDATE:
/// `SET current_volunteers = current_volunteers + 1
///  WHERE id = ? AND (max_volunteers IS NULL OR current_volunteers < max_volunteers)`
///
/// # Errors
/// `NotFound` when the event does not exist, `EventFull` when capacity is
/// exhausted.
pub async fn try_reserve_slot<C>(db: &C, event_id: i64) -> Result<event::Model>
where
    C: ConnectionTrait,
{
    // Existence first, so a missing event reports NotFound rather than EventFull
    get_event(db, event_id).await?;

    let reserved = Event::update_many()
        .col_expr(
            event::Column::CurrentVolunteers,
            Expr::col(event::Column::CurrentVolunteers).add(1),
        )
        .filter(event::Column::Id.eq(event_id))
        .filter(
            Condition::any()
                .add(event::Column::MaxVolunteers.is_null())
                .add(
                    Expr::col(event::Column::CurrentVolunteers)
                        .lt(Expr::col(event::Column::MaxVolunteers)),
                ),
        )
        .exec(db)
        .await?;

    if reserved.rows_affected == 0 {
        return Err(Error::EventFull { event_id });
    }

    let event = get_event(db, event_id).await?;
    debug!(
        event_id,
        current = event.current_volunteers,
        "capacity slot reserved"
    );
    Ok(event)
}

/// Releases one capacity slot on the event, clamped at zero.
///
/// Releasing an already-empty counter is logged and treated as a no-op; the
/// counter never goes negative.
///
/// # Errors
/// `NotFound` when the event does not exist.
pub async fn release_slot<C>(db: &C, event_id: i64) -> Result<event::Model>
where
    C: ConnectionTrait,
{
    get_event(db, event_id).await?;

    let released = Event::update_many()
        .col_expr(
            event::Column::CurrentVolunteers,
            Expr::col(event::Column::CurrentVolunteers).sub(1),
        )
        .filter(event::Column::Id.eq(event_id))
        .filter(event::Column::CurrentVolunteers.gt(0))
        .exec(db)
        .await?;

    if released.rows_affected == 0 {
        warn!(event_id, "release on an empty counter, clamped at zero");
    }

    let event = get_event(db, event_id).await?;
    debug!(
        event_id,
        current = event.current_volunteers,
        "capacity slot released"
    );
    Ok(event)
}
