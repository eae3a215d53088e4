//! PostgreSQL-backed `GenerationLog` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{GenerationLog, GenerationLogError};
use crate::domain::{GenerationRecord, UserId};

use super::models::{GenerationRow, NewGenerationRow};
use super::pool::{DbPool, PoolError};
use super::schema::generations;

/// Diesel-backed implementation of the `GenerationLog` port.
#[derive(Clone)]
pub struct DieselGenerationLog {
    pool: DbPool,
}

impl DieselGenerationLog {
    /// Create a new log with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain generation log errors.
fn map_pool_error(error: PoolError) -> GenerationLogError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            GenerationLogError::connection(message)
        }
    }
}

/// Map Diesel errors to domain generation log errors.
fn map_diesel_error(error: diesel::result::Error) -> GenerationLogError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            GenerationLogError::connection("database connection error")
        }
        _ => GenerationLogError::query("database error"),
    }
}

fn row_to_record(row: GenerationRow) -> GenerationRecord {
    GenerationRecord {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        image_url: row.image_url,
        label: row.label,
        created_at: row.created_at,
    }
}

#[async_trait]
impl GenerationLog for DieselGenerationLog {
    async fn append(&self, record: &GenerationRecord) -> Result<(), GenerationLogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewGenerationRow {
            id: record.id,
            user_id: *record.user_id.as_uuid(),
            image_url: record.image_url.clone(),
            label: record.label.clone(),
            created_at: record.created_at,
        };

        diesel::insert_into(generations::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<GenerationRecord>, GenerationLogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = generations::table
            .filter(generations::user_id.eq(user_id.as_uuid()))
            .order(generations::created_at.desc())
            .limit(limit)
            .select(GenerationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }
}
