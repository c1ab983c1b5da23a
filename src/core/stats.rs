//! Volunteer statistics aggregator - cumulative hours and participation counters.
//!
//! Counter updates are atomic column-expression additions, never
//! read-modify-write. `record_attendance` is not idempotent by itself; it is
//! invoked exclusively from the ACCEPTED→ATTENDED transition, which each
//! application can traverse at most once, and shares that transition's
//! transaction.

use crate::{
    core::badges::{self, BadgeTrigger},
    entities::{User, UserKind, badge, user},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::info;

async fn require_user_of_kind<C>(db: &C, user_id: i64, kind: UserKind) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .filter(|user| user.kind == kind)
        .ok_or(Error::NotFound {
            entity: match kind {
                UserKind::Volunteer => "volunteer",
                UserKind::Organization => "organization",
            },
            id: user_id,
        })
}

/// Credits `hours` and one participated event to the volunteer, then runs the
/// achievement engine with `HoursUpdated` followed by `EventAttended`.
///
/// Returns the newly awarded badges in catalog order.
///
/// # Errors
/// `NotFound` when the user does not exist or is not a volunteer.
pub async fn record_attendance<C>(
    db: &C,
    volunteer_id: i64,
    hours: f64,
) -> Result<Vec<badge::Model>>
where
    C: ConnectionTrait,
{
    require_user_of_kind(db, volunteer_id, UserKind::Volunteer).await?;

    User::update_many()
        .col_expr(
            user::Column::TotalVolunteerHours,
            Expr::col(user::Column::TotalVolunteerHours).add(hours),
        )
        .col_expr(
            user::Column::EventsParticipated,
            Expr::col(user::Column::EventsParticipated).add(1),
        )
        .filter(user::Column::Id.eq(volunteer_id))
        .exec(db)
        .await?;

    info!(volunteer_id, hours, "volunteer statistics updated");

    let mut awarded = badges::evaluate(db, volunteer_id, BadgeTrigger::HoursUpdated).await?;
    awarded.extend(badges::evaluate(db, volunteer_id, BadgeTrigger::EventAttended).await?);
    Ok(awarded)
}

/// Credits one hosted event to the organization, then runs the achievement
/// engine with `EventHosted`. Invoked by event management when an event
/// completes.
///
/// # Errors
/// `NotFound` when the user does not exist or is not an organization.
pub async fn record_event_hosted<C>(db: &C, organization_id: i64) -> Result<Vec<badge::Model>>
where
    C: ConnectionTrait,
{
    require_user_of_kind(db, organization_id, UserKind::Organization).await?;

    User::update_many()
        .col_expr(
            user::Column::EventsHosted,
            Expr::col(user::Column::EventsHosted).add(1),
        )
        .filter(user::Column::Id.eq(organization_id))
        .exec(db)
        .await?;

    info!(organization_id, "hosted-event counter updated");

    badges::evaluate(db, organization_id, BadgeTrigger::EventHosted).await
}
