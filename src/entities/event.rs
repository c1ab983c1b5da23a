//! Event entity - Represents a volunteering event hosted by an organization.
//!
//! `current_volunteers` vs `max_volunteers` is the capacity counter; it is
//! mutated exclusively by [`crate::core::capacity`] and is the single source
//! of truth for "is this event full". A `None` `max_volunteers` means
//! unlimited capacity. `completed`/`cancelled` status changes belong to event
//! management, outside this engine.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the organization hosting this event
    pub organization_id: i64,
    /// Human-readable event title
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Lifecycle status of the event itself (independent of applications)
    pub status: EventStatus,
    /// Maximum number of accepted volunteers, None for unlimited
    pub max_volunteers: Option<i32>,
    /// Number of currently reserved capacity slots, never negative
    pub current_volunteers: i32,
    /// When the event starts
    pub start_date: DateTimeUtc,
    /// When the event record was created
    pub created_at: DateTimeUtc,
}

/// Event lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EventStatus {
    /// Not yet published, accepts no applications
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Published and open for applications
    #[sea_orm(string_value = "active")]
    Active,
    /// All capacity slots are reserved
    #[sea_orm(string_value = "full")]
    Full,
    /// The event has taken place
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Cancelled by the organization
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One event has many applications
    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
    /// Each event is hosted by one organization
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OrganizationId",
        to = "super::user::Column::Id"
    )]
    Organization,
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
