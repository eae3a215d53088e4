//! PostgreSQL-backed `ProfileRepository` implementation using Diesel ORM.
//!
//! The credit debit is a single conditional `UPDATE ... WHERE credits >= cost`
//! so the balance can never go negative, even when concurrent uploads race
//! past the handler's pre-check.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{DebitOutcome, ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, UserId};

use super::models::ProfileRow;
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the `ProfileRepository` port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain profile repository errors.
fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ProfileRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain profile repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
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
            ProfileRepositoryError::connection("database connection error")
        }
        _ => ProfileRepositoryError::query("database error"),
    }
}

fn row_to_profile(row: ProfileRow) -> Profile {
    Profile {
        user_id: UserId::from_uuid(row.user_id),
        credits: row.credits,
        created_at: row.created_at,
    }
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = profiles::table
            .filter(profiles::user_id.eq(user_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_profile))
    }

    async fn debit(
        &self,
        user_id: &UserId,
        amount: u32,
    ) -> Result<DebitOutcome, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let amount = i64::from(amount);

        let remaining = diesel::update(
            profiles::table.filter(
                profiles::user_id
                    .eq(user_id.as_uuid())
                    .and(profiles::credits.ge(amount)),
            ),
        )
        .set(profiles::credits.eq(profiles::credits - amount))
        .returning(profiles::credits)
        .get_result::<i64>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(remaining) = remaining {
            return Ok(DebitOutcome::Applied { remaining });
        }

        // No row matched: either the balance fell short or the profile is
        // missing. Read the current balance to report what was available.
        let available = profiles::table
            .filter(profiles::user_id.eq(user_id.as_uuid()))
            .select(profiles::credits)
            .first::<i64>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .unwrap_or(0);

        Ok(DebitOutcome::InsufficientCredits { available })
    }
}
