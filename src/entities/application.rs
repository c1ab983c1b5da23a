//! Application entity - A volunteer's request to join an event.
//!
//! The (`volunteer_id`, `event_id`) pair is unique: a volunteer holds at most
//! one application per event. `status` moves only through the transitions in
//! [`crate::core::application`]; `hours_completed` is non-null exactly when
//! the status is `attended`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    /// Unique identifier for the application
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The applying volunteer
    pub volunteer_id: i64,
    /// The targeted event
    pub event_id: i64,
    /// Current lifecycle state
    pub status: ApplicationStatus,
    /// Volunteer-supplied message to the organization
    pub message: Option<String>,
    /// Notes recorded by the organization on approval/rejection
    pub organization_notes: Option<String>,
    /// Hours credited on attendance, None unless status is `attended`
    pub hours_completed: Option<f64>,
    /// When the application was submitted
    pub applied_at: DateTimeUtc,
    /// When the organization approved or rejected, None while pending
    pub responded_at: Option<DateTimeUtc>,
    /// When attendance was recorded, None before then
    pub completed_at: Option<DateTimeUtc>,
}

/// Application lifecycle state.
///
/// `Pending` is the initial state; `Accepted` is the only non-terminal state
/// after a response (it can still move to `Attended` or `NoShow`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ApplicationStatus {
    /// Submitted, awaiting an organization response
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved by the organization, holds one capacity slot
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Rejected by the organization (terminal)
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// The volunteer attended the event (terminal)
    #[sea_orm(string_value = "attended")]
    Attended,
    /// The volunteer did not show up (terminal)
    #[sea_orm(string_value = "no_show")]
    NoShow,
    /// Withdrawn by the volunteer (terminal)
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

/// Defines relationships between Application and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each application belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
    /// Each application belongs to one volunteer
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::VolunteerId",
        to = "super::user::Column::Id"
    )]
    Volunteer,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Volunteer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
