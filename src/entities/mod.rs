//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod application;
pub mod badge;
pub mod event;
pub mod user;

// Re-export specific types to avoid conflicts
pub use application::{
    ApplicationStatus, Column as ApplicationColumn, Entity as Application,
    Model as ApplicationModel,
};
pub use badge::{BadgeType, Column as BadgeColumn, Entity as Badge, Model as BadgeModel};
pub use event::{Column as EventColumn, Entity as Event, EventStatus, Model as EventModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserKind};
