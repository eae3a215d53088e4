//! Diesel row models for the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{generations, profiles};

/// Row shape of the `profiles` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub credits: i64,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "maintained by a database trigger, never read")]
    pub updated_at: DateTime<Utc>,
}

/// Row shape of the `generations` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = generations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GenerationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable shape for new history records.
#[derive(Debug, Insertable)]
#[diesel(table_name = generations)]
pub struct NewGenerationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}
