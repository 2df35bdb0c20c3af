//! Port for tag persistence.

use async_trait::async_trait;

use crate::domain::{Tag, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message } =>
            "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } =>
            "tag repository query failed: {message}",
        /// A rename collided with an existing `(owner, name)` pair.
        DuplicateName { name } =>
            "tag name already exists: {name}",
        /// No tag with this id belongs to the given owner.
        NotFound =>
            "tag not found",
    }
}

/// Port for owner-scoped tag storage.
///
/// # Ownership
///
/// Every operation is scoped by owner. A tag that exists but belongs to a
/// different owner behaves exactly like one that does not exist:
/// [`TagRepositoryError::NotFound`] in both cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Return the tag for `(owner, name)`, creating it when absent.
    ///
    /// Must be race-safe: two concurrent calls for the same pair converge on
    /// a single row. Adapters rely on the uniqueness constraint (a single
    /// upsert-returning statement, or equivalent) rather than an unguarded
    /// check-then-insert.
    async fn get_or_create(&self, owner: &UserId, name: &str) -> Result<Tag, TagRepositoryError>;

    /// All of `owner`'s tags, ordered by name descending.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Tag>, TagRepositoryError>;

    /// Rename an owned tag.
    async fn rename(
        &self,
        id: i64,
        owner: &UserId,
        name: &str,
    ) -> Result<Tag, TagRepositoryError>;

    /// Delete an owned tag, detaching it from any recipes.
    async fn delete(&self, id: i64, owner: &UserId) -> Result<(), TagRepositoryError>;
}

/// Fixture repository for code paths that run without a database.
///
/// Fabricates tags on get-or-create and reports every lookup as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTagRepository;

#[async_trait]
impl TagRepository for FixtureTagRepository {
    async fn get_or_create(&self, owner: &UserId, name: &str) -> Result<Tag, TagRepositoryError> {
        Ok(Tag {
            id: 1,
            owner_id: owner.clone(),
            name: name.to_owned(),
        })
    }

    async fn list_by_owner(&self, _owner: &UserId) -> Result<Vec<Tag>, TagRepositoryError> {
        Ok(Vec::new())
    }

    async fn rename(
        &self,
        _id: i64,
        _owner: &UserId,
        _name: &str,
    ) -> Result<Tag, TagRepositoryError> {
        Err(TagRepositoryError::not_found())
    }

    async fn delete(&self, _id: i64, _owner: &UserId) -> Result<(), TagRepositoryError> {
        Err(TagRepositoryError::not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_fabricates_owner_scoped_tags() {
        let owner = UserId::random();
        let tag = FixtureTagRepository
            .get_or_create(&owner, "Thai")
            .await
            .expect("fixture tag");
        assert_eq!(tag.owner_id, owner);
        assert_eq!(tag.name, "Thai");
    }

    #[tokio::test]
    async fn fixture_reports_missing_for_mutations() {
        let owner = UserId::random();
        let err = FixtureTagRepository
            .delete(7, &owner)
            .await
            .expect_err("fixture delete");
        assert_eq!(err, TagRepositoryError::NotFound);
    }
}
