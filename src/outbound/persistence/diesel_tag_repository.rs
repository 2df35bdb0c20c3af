//! PostgreSQL-backed `TagRepository` implementation using Diesel ORM.
//!
//! Get-or-create leans on the `(owner_id, name)` uniqueness constraint: a
//! single upsert-returning statement either inserts the tag or returns the
//! existing row, so concurrent callers converge without a check-then-insert
//! window.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{Tag, UserId};

use super::models::{NewTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::tags;

/// Diesel-backed implementation of the `TagRepository` port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain tag repository errors.
fn map_pool_error(error: PoolError) -> TagRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TagRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain tag repository errors.
fn map_diesel_error(error: diesel::result::Error) -> TagRepositoryError {
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
        DieselError::NotFound => TagRepositoryError::not_found(),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TagRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => TagRepositoryError::query("database error"),
        _ => TagRepositoryError::query("database error"),
    }
}

/// Convert a database row to a domain tag.
fn row_to_tag(row: TagRow) -> Tag {
    Tag {
        id: row.id,
        owner_id: UserId::from_uuid(row.owner_id),
        name: row.name,
    }
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn get_or_create(&self, owner: &UserId, name: &str) -> Result<Tag, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewTagRow {
            owner_id: *owner.as_uuid(),
            name,
        };

        // The no-op DO UPDATE makes the conflicting row visible to RETURNING,
        // where DO NOTHING would return zero rows for an existing tag.
        let row: TagRow = diesel::insert_into(tags::table)
            .values(&new_row)
            .on_conflict((tags::owner_id, tags::name))
            .do_update()
            .set(tags::name.eq(excluded(tags::name)))
            .returning(TagRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_tag(row))
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TagRow> = tags::table
            .filter(tags::owner_id.eq(owner.as_uuid()))
            .order(tags::name.desc())
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_tag).collect())
    }

    async fn rename(
        &self,
        id: i64,
        owner: &UserId,
        name: &str,
    ) -> Result<Tag, TagRepositoryError> {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TagRow> = diesel::update(
            tags::table.filter(tags::id.eq(id).and(tags::owner_id.eq(owner.as_uuid()))),
        )
        .set(tags::name.eq(name))
        .returning(TagRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|error| match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                TagRepositoryError::duplicate_name(name)
            }
            other => map_diesel_error(other),
        })?;

        row.map(row_to_tag).ok_or_else(TagRepositoryError::not_found)
    }

    async fn delete(&self, id: i64, owner: &UserId) -> Result<(), TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Attachment rows cascade away with the tag.
        let deleted = diesel::delete(
            tags::table.filter(tags::id.eq(id).and(tags::owner_id.eq(owner.as_uuid()))),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(TagRepositoryError::not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error and row mapping.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, TagRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn missing_row_maps_to_not_found() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(repo_err, TagRepositoryError::NotFound);
    }

    #[rstest]
    fn row_conversion_preserves_owner() {
        let owner = uuid::Uuid::new_v4();
        let tag = row_to_tag(TagRow {
            id: 3,
            owner_id: owner,
            name: "Dessert".to_owned(),
        });

        assert_eq!(tag.id, 3);
        assert_eq!(tag.owner_id.as_uuid(), &owner);
        assert_eq!(tag.name, "Dessert");
    }
}
