//! Shared test utilities for the volunteer engine.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults. Events and users are
//! created directly through their entities because event and profile
//! management live outside this engine.

use crate::{
    config::database::create_tables,
    entities::{User, UserKind, application, event, event::EventStatus, user},
    errors::{Error, Result},
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

/// Creates an in-memory `SQLite` database with all tables and indexes.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database for tests that exercise real
/// connection-level concurrency. Each pool connection of an in-memory
/// database sees its own empty database, so contention tests need a shared
/// file. Returns the connection and the file path; the test should remove
/// the file when done.
pub async fn setup_file_test_db() -> Result<(DatabaseConnection, std::path::PathBuf)> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "volunteer_hub_test_{}_{n}.sqlite",
        std::process::id()
    ));
    // Stale file from an aborted run would already carry the schema
    let _ = std::fs::remove_file(&path);

    let url = format!("sqlite://{}?mode=rwc", path.display());
    let db = sea_orm::Database::connect(&url).await?;
    create_tables(&db).await?;
    Ok((db, path))
}

/// Creates a test volunteer with sensible defaults: freshly registered,
/// empty profile, zeroed aggregate counters.
pub async fn create_test_volunteer(db: &DatabaseConnection, name: &str) -> Result<user::Model> {
    create_test_user(db, name, UserKind::Volunteer).await
}

/// Creates a test organization with zeroed hosted-event counter.
pub async fn create_test_organization(db: &DatabaseConnection, name: &str) -> Result<user::Model> {
    create_test_user(db, name, UserKind::Organization).await
}

async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    kind: UserKind,
) -> Result<user::Model> {
    let model = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!("{}@example.org", name.to_lowercase())),
        kind: Set(kind),
        bio: Set(None),
        location: Set(None),
        phone: Set(None),
        registered_at: Set(Utc::now()),
        total_volunteer_hours: Set(0.0),
        events_participated: Set(0),
        events_hosted: Set(0),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates an active test event starting a week from now.
///
/// # Arguments
/// * `organization_id` - The hosting organization
/// * `max_volunteers` - Capacity cap, None for unlimited
pub async fn create_test_event(
    db: &DatabaseConnection,
    organization_id: i64,
    max_volunteers: Option<i32>,
) -> Result<event::Model> {
    create_event_starting_in(db, organization_id, max_volunteers, Duration::days(7)).await
}

/// Creates an active test event with a custom start offset from now.
/// Use this for withdrawal-cutoff tests.
pub async fn create_event_starting_in(
    db: &DatabaseConnection,
    organization_id: i64,
    max_volunteers: Option<i32>,
    starts_in: Duration,
) -> Result<event::Model> {
    let model = event::ActiveModel {
        organization_id: Set(organization_id),
        title: Set("Test Event".to_string()),
        description: Set(None),
        status: Set(EventStatus::Active),
        max_volunteers: Set(max_volunteers),
        current_volunteers: Set(0),
        start_date: Set(Utc::now() + starts_in),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a test event in a specific lifecycle status.
pub async fn create_event_with_status(
    db: &DatabaseConnection,
    organization_id: i64,
    status: EventStatus,
) -> Result<event::Model> {
    let model = event::ActiveModel {
        organization_id: Set(organization_id),
        title: Set("Test Event".to_string()),
        description: Set(None),
        status: Set(status),
        max_volunteers: Set(Some(10)),
        current_volunteers: Set(0),
        start_date: Set(Utc::now() + Duration::days(7)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Overwrites a volunteer's aggregate counters, simulating prior history.
pub async fn set_volunteer_stats(
    db: &DatabaseConnection,
    volunteer_id: i64,
    total_hours: f64,
    events_participated: i32,
) -> Result<user::Model> {
    let user = get_test_user(db, volunteer_id).await?;
    let mut active: user::ActiveModel = user.into();
    active.total_volunteer_hours = Set(total_hours);
    active.events_participated = Set(events_participated);
    active.update(db).await.map_err(Into::into)
}

/// Fills in the profile fields the complete-profile badge checks.
pub async fn fill_test_profile(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    let user = get_test_user(db, user_id).await?;
    let mut active: user::ActiveModel = user.into();
    active.bio = Set(Some("Long-time helper".to_string()));
    active.location = Set(Some("Springfield".to_string()));
    active.phone = Set(Some("555-0100".to_string()));
    active.update(db).await.map_err(Into::into)
}

/// Fetches a user, failing with `NotFound` when absent.
pub async fn get_test_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "user",
            id: user_id,
        })
}

/// Fetches an application by ID for assertions.
pub async fn get_test_application(
    db: &DatabaseConnection,
    application_id: i64,
) -> Result<application::Model> {
    crate::entities::Application::find_by_id(application_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "application",
            id: application_id,
        })
}

/// Sets up a complete test environment with a volunteer and an active event.
/// Returns (db, volunteer, event) for common state-machine scenarios.
pub async fn setup_with_event()
-> Result<(DatabaseConnection, user::Model, event::Model)> {
    let db = setup_test_db().await?;
    let org = create_test_organization(&db, "Helpers United").await?;
    let volunteer = create_test_volunteer(&db, "Ada").await?;
    let event = create_test_event(&db, org.id, Some(5)).await?;
    Ok((db, volunteer, event))
}
