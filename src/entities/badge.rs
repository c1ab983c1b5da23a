//! Badge entity - A persistent record that a user crossed an achievement threshold.
//!
//! At most one badge exists per (`user_id`, `badge_type`) pair, enforced by a
//! unique index. Badges are created by [`crate::core::badges`] and never
//! deleted; only `is_featured` may change afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Badge database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "badges")]
pub struct Model {
    /// Unique identifier for the badge
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The user this badge was awarded to
    pub user_id: i64,
    /// Which achievement this badge represents
    pub badge_type: BadgeType,
    /// Snapshot of the measured value at award time
    pub progress_value: f64,
    /// When the badge was earned
    pub earned_at: DateTimeUtc,
    /// Whether the user features this badge on their profile
    pub is_featured: bool,
    /// Optional notes, e.g. the reason for a manual award
    pub notes: Option<String>,
}

/// Closed set of badge types.
///
/// Thresholds, applicability, and the measured quantity for each type live in
/// the catalog table in [`crate::core::badges`], so new badges are additive
/// data rather than new code paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum BadgeType {
    /// First event attended
    #[sea_orm(string_value = "first_steps")]
    FirstSteps,
    /// Five events attended
    #[sea_orm(string_value = "helping_hand")]
    HelpingHand,
    /// Twenty events attended
    #[sea_orm(string_value = "community_pillar")]
    CommunityPillar,
    /// Twenty-five volunteer hours
    #[sea_orm(string_value = "dedicated_volunteer")]
    DedicatedVolunteer,
    /// One hundred volunteer hours
    #[sea_orm(string_value = "century_volunteer")]
    CenturyVolunteer,
    /// First event hosted (organizations)
    #[sea_orm(string_value = "event_host")]
    EventHost,
    /// Ten events hosted (organizations)
    #[sea_orm(string_value = "seasoned_organizer")]
    SeasonedOrganizer,
    /// Bio, location, and phone all filled in
    #[sea_orm(string_value = "complete_profile")]
    CompleteProfile,
    /// Registered within the last thirty days
    #[sea_orm(string_value = "newcomer")]
    Newcomer,
}

/// Defines relationships between Badge and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each badge belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
