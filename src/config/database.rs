//! Database configuration module for the volunteer engine.
//!
//! Handles `SQLite` connection setup and table creation using `SeaORM`. Table
//! schemas are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database always matches the Rust
//! structs without hand-written SQL. On top of the generated tables this
//! module creates the two unique indexes the engine's consistency rules rely
//! on: one application per (volunteer, event) pair and one badge per
//! (user, badge type) pair.

use crate::entities::{Application, Badge, Event, User, application, badge};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/volunteer_hub.sqlite".to_string())
}

/// Establishes a connection to the database.
///
/// # Errors
/// Returns a `Database` error when the URL is unreachable or malformed.
#[instrument(skip_all)]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at: {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables and unique indexes from the entity definitions.
///
/// Safe to call only against a fresh database; existing tables make the
/// create statements fail.
///
/// # Errors
/// Returns a `Database` error when any create statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_table = schema.create_table_from_entity(User);
    let event_table = schema.create_table_from_entity(Event);
    let application_table = schema.create_table_from_entity(Application);
    let badge_table = schema.create_table_from_entity(Badge);

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&event_table)).await?;
    db.execute(builder.build(&application_table)).await?;
    db.execute(builder.build(&badge_table)).await?;

    // A volunteer holds at most one application per event.
    let application_pair = Index::create()
        .name("idx_applications_volunteer_event")
        .table(Application)
        .col(application::Column::VolunteerId)
        .col(application::Column::EventId)
        .unique()
        .to_owned();
    db.execute(builder.build(&application_pair)).await?;

    // At most one badge per (user, badge type) pair.
    let badge_pair = Index::create()
        .name("idx_badges_user_badge_type")
        .table(Badge)
        .col(badge::Column::UserId)
        .col(badge::Column::BadgeType)
        .unique()
        .to_owned();
    db.execute(builder.build(&badge_pair)).await?;

    Ok(())
}

/// Connects to the database and ensures the schema exists.
///
/// # Errors
/// Returns a `Database` error when connecting or schema creation fails.
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection> {
    let db = create_connection(database_url).await?;
    create_tables(&db).await?;
    info!("Database schema ready");
    Ok(db)
}
