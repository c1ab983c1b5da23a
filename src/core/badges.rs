//! Achievement engine - threshold evaluation and badge awards.
//!
//! The catalog is a static data table: each entry names a badge type, the
//! threshold it requires, which kind of user it applies to, and the measure
//! it reads. Adding a badge is a new table row, not a new code path. Trigger
//! dispatch is likewise data-driven: a trigger selects the measures it can
//! move, and only catalog entries over those measures are re-evaluated.
//!
//! The per-(user, badge type) existence check plus insert is backed by a
//! unique index, so concurrent triggers for the same user cannot award
//! duplicates; the loser of such a race treats the unique violation as
//! already-awarded.

use crate::{
    entities::{Badge, BadgeType, User, UserKind, badge, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use tracing::{debug, info};

/// Window for the registration-recency measure.
const NEWCOMER_WINDOW_DAYS: i64 = 30;

/// Statistic-changing events that cause badge re-evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeTrigger {
    /// A volunteer's total hours changed
    HoursUpdated,
    /// A volunteer's participated-event count changed
    EventAttended,
    /// An organization's hosted-event count changed
    EventHosted,
    /// Profile fields changed (also covers registration recency)
    ProfileUpdated,
}

/// The aggregate quantity a catalog entry is measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Measure {
    /// Cumulative volunteer hours
    VolunteerHours,
    /// Number of events attended
    EventsParticipated,
    /// Number of events hosted to completion
    EventsHosted,
    /// Boolean: bio, location, and phone all filled in
    ProfileComplete,
    /// Boolean: registered within the last thirty days
    RecentRegistration,
}

impl Measure {
    /// Whether this measure can have moved as a result of the trigger.
    #[must_use]
    pub const fn moved_by(self, trigger: BadgeTrigger) -> bool {
        matches!(
            (self, trigger),
            (Self::VolunteerHours, BadgeTrigger::HoursUpdated)
                | (Self::EventsParticipated, BadgeTrigger::EventAttended)
                | (Self::EventsHosted, BadgeTrigger::EventHosted)
                | (
                    Self::ProfileComplete | Self::RecentRegistration,
                    BadgeTrigger::ProfileUpdated
                )
        )
    }

    /// Reads the current value of this measure for the user. Boolean measures
    /// report 1.0 when satisfied.
    #[must_use]
    pub fn value(self, user: &user::Model, now: DateTime<Utc>) -> f64 {
        match self {
            Self::VolunteerHours => user.total_volunteer_hours,
            Self::EventsParticipated => f64::from(user.events_participated),
            Self::EventsHosted => f64::from(user.events_hosted),
            Self::ProfileComplete => {
                if user.has_complete_profile() { 1.0 } else { 0.0 }
            }
            Self::RecentRegistration => {
                if now - user.registered_at <= Duration::days(NEWCOMER_WINDOW_DAYS) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// One row of the badge catalog.
#[derive(Clone, Copy, Debug)]
pub struct CatalogEntry {
    /// The badge this entry awards
    pub badge_type: BadgeType,
    /// The measure value required to earn it
    pub required_count: f64,
    /// Which kind of user can earn it
    pub applies_to: UserKind,
    /// The quantity checked against `required_count`
    pub measure: Measure,
}

/// The full badge catalog, evaluated in declaration order.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        badge_type: BadgeType::FirstSteps,
        required_count: 1.0,
        applies_to: UserKind::Volunteer,
        measure: Measure::EventsParticipated,
    },
    CatalogEntry {
        badge_type: BadgeType::HelpingHand,
        required_count: 5.0,
        applies_to: UserKind::Volunteer,
        measure: Measure::EventsParticipated,
    },
    CatalogEntry {
        badge_type: BadgeType::CommunityPillar,
        required_count: 20.0,
        applies_to: UserKind::Volunteer,
        measure: Measure::EventsParticipated,
    },
    CatalogEntry {
        badge_type: BadgeType::DedicatedVolunteer,
        required_count: 25.0,
        applies_to: UserKind::Volunteer,
        measure: Measure::VolunteerHours,
    },
    CatalogEntry {
        badge_type: BadgeType::CenturyVolunteer,
        required_count: 100.0,
        applies_to: UserKind::Volunteer,
        measure: Measure::VolunteerHours,
    },
    CatalogEntry {
        badge_type: BadgeType::EventHost,
        required_count: 1.0,
        applies_to: UserKind::Organization,
        measure: Measure::EventsHosted,
    },
    CatalogEntry {
        badge_type: BadgeType::SeasonedOrganizer,
        required_count: 10.0,
        applies_to: UserKind::Organization,
        measure: Measure::EventsHosted,
    },
    CatalogEntry {
        badge_type: BadgeType::CompleteProfile,
        required_count: 1.0,
        applies_to: UserKind::Volunteer,
        measure: Measure::ProfileComplete,
    },
    CatalogEntry {
        badge_type: BadgeType::Newcomer,
        required_count: 1.0,
        applies_to: UserKind::Volunteer,
        measure: Measure::RecentRegistration,
    },
];

/// Whether a badge already exists for the (user, badge type) pair.
pub async fn badge_exists<C>(db: &C, user_id: i64, badge_type: BadgeType) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(Badge::find()
        .filter(badge::Column::UserId.eq(user_id))
        .filter(badge::Column::BadgeType.eq(badge_type))
        .one(db)
        .await?
        .is_some())
}

async fn require_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "user",
            id: user_id,
        })
}

/// Evaluates the catalog for the user after a statistic-changing trigger, and
/// awards every badge whose threshold is now met.
///
/// One call can award more than one badge when several measures cross their
/// thresholds simultaneously; results come back in catalog order.
///
/// # Errors
/// `NotFound` when the user does not exist.
pub async fn evaluate<C>(
    db: &C,
    user_id: i64,
    trigger: BadgeTrigger,
) -> Result<Vec<badge::Model>>
where
    C: ConnectionTrait,
{
    let user = require_user(db, user_id).await?;
    let now = Utc::now();
    let mut awarded = Vec::new();

    for entry in CATALOG {
        if entry.applies_to != user.kind || !entry.measure.moved_by(trigger) {
            continue;
        }
        if badge_exists(db, user_id, entry.badge_type).await? {
            continue;
        }
        let value = entry.measure.value(&user, now);
        if value < entry.required_count {
            continue;
        }

        let model = badge::ActiveModel {
            user_id: Set(user_id),
            badge_type: Set(entry.badge_type),
            progress_value: Set(value),
            earned_at: Set(now),
            is_featured: Set(false),
            notes: Set(None),
            ..Default::default()
        };
        match model.insert(db).await {
            Ok(new_badge) => {
                info!(
                    user_id,
                    badge_type = new_badge.badge_type.to_value(),
                    progress = value,
                    "badge awarded"
                );
                awarded.push(new_badge);
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                // A concurrent trigger awarded it first
                debug!(
                    user_id,
                    badge_type = entry.badge_type.to_value(),
                    "badge already awarded concurrently"
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(awarded)
}

/// Administrator path: awards a badge directly, bypassing threshold
/// evaluation. The at-most-one-per-pair rule still holds.
///
/// `progress_value` snapshots the badge's catalog measure at award time.
///
/// # Errors
/// `NotFound` when the user does not exist, `AlreadyHasBadge` when the pair
/// already has a badge.
pub async fn award_manual<C>(
    db: &C,
    user_id: i64,
    badge_type: BadgeType,
    notes: Option<String>,
) -> Result<badge::Model>
where
    C: ConnectionTrait,
{
    let user = require_user(db, user_id).await?;
    if badge_exists(db, user_id, badge_type).await? {
        return Err(Error::AlreadyHasBadge {
            user_id,
            badge_type: badge_type.to_value(),
        });
    }

    let now = Utc::now();
    let value = CATALOG
        .iter()
        .find(|entry| entry.badge_type == badge_type)
        .map_or(0.0, |entry| entry.measure.value(&user, now));

    let model = badge::ActiveModel {
        user_id: Set(user_id),
        badge_type: Set(badge_type),
        progress_value: Set(value),
        earned_at: Set(now),
        is_featured: Set(false),
        notes: Set(notes),
        ..Default::default()
    };
    let result = model.insert(db).await.map_err(|err| {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            Error::AlreadyHasBadge {
                user_id,
                badge_type: badge_type.to_value(),
            }
        } else {
            err.into()
        }
    })?;

    info!(
        user_id,
        badge_type = result.badge_type.to_value(),
        "badge manually awarded"
    );
    Ok(result)
}

/// Toggles whether the subject features the badge on their profile.
///
/// # Errors
/// `NotFound` when the badge does not exist.
pub async fn set_featured<C>(db: &C, badge_id: i64, featured: bool) -> Result<badge::Model>
where
    C: ConnectionTrait,
{
    let badge = Badge::find_by_id(badge_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "badge",
            id: badge_id,
        })?;

    let mut active: badge::ActiveModel = badge.into();
    active.is_featured = Set(featured);
    active.update(db).await.map_err(Into::into)
}
