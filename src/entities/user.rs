//! User entity - Represents volunteers and organizations.
//!
//! A user is either a volunteer or an organization (`kind`). The model carries
//! the denormalized aggregate counters (`total_volunteer_hours`,
//! `events_participated`, `events_hosted`) that the statistics aggregator
//! maintains and the achievement engine reads. Counters are mutated only
//! through atomic column-expression updates, never read-modify-write.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Contact email address
    pub email: String,
    /// Whether this user is a volunteer or an organization
    pub kind: UserKind,
    /// Free-text biography, None until the user fills it in
    pub bio: Option<String>,
    /// Home location, None until the user fills it in
    pub location: Option<String>,
    /// Contact phone number, None until the user fills it in
    pub phone: Option<String>,
    /// When the account was registered
    pub registered_at: DateTimeUtc,
    /// Cumulative volunteer hours across all attended events (volunteers only)
    pub total_volunteer_hours: f64,
    /// Number of events this volunteer has attended (volunteers only)
    pub events_participated: i32,
    /// Number of events this organization has hosted to completion (organizations only)
    pub events_hosted: i32,
}

/// Discriminates volunteers from organizations
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum UserKind {
    /// An individual who applies to events
    #[sea_orm(string_value = "volunteer")]
    Volunteer,
    /// An organization that hosts events
    #[sea_orm(string_value = "organization")]
    Organization,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One volunteer has many applications
    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
    /// One user has many badges
    #[sea_orm(has_many = "super::badge::Entity")]
    Badges,
    /// One organization hosts many events
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::badge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Badges.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the profile fields used by the complete-profile badge are all filled in.
    #[must_use]
    pub fn has_complete_profile(&self) -> bool {
        [&self.bio, &self.location, &self.phone]
            .iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}
