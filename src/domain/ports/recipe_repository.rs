//! Port for recipe persistence.

use async_trait::async_trait;

use crate::domain::{Recipe, RecipeFieldChanges, RecipeFields, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message } =>
            "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } =>
            "recipe repository query failed: {message}",
        /// No recipe with this id belongs to the given owner.
        NotFound =>
            "recipe not found",
    }
}

/// Port for owner-scoped recipe storage.
///
/// # Ownership
///
/// `NotFound` covers both "no such id" and "owned by someone else"; callers
/// must not be able to tell the cases apart.
///
/// # Atomicity
///
/// `create` and `update` write the recipe row and its tag attachments in one
/// transaction, so a failure leaves no partially written recipe behind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Persist a new recipe for `owner` with the given resolved tag ids.
    async fn create(
        &self,
        owner: &UserId,
        fields: RecipeFields,
        tag_ids: Vec<i64>,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Fetch one owned recipe with its tags populated.
    async fn find(&self, id: i64, owner: &UserId) -> Result<Recipe, RecipeRepositoryError>;

    /// All of `owner`'s recipes ordered by id descending (newest first).
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    /// Apply field changes; when `tag_ids` is `Some`, replace the tag
    /// attachments with exactly that set.
    async fn update(
        &self,
        id: i64,
        owner: &UserId,
        changes: RecipeFieldChanges,
        tag_ids: Option<Vec<i64>>,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Remove an owned recipe and its tag attachments (never the tags), and
    /// return the deleted recipe so callers can release its stored image.
    async fn delete(&self, id: i64, owner: &UserId) -> Result<Recipe, RecipeRepositoryError>;

    /// Associate a stored image reference, returning the replaced reference
    /// if one was set.
    async fn set_image(
        &self,
        id: i64,
        owner: &UserId,
        image: &str,
    ) -> Result<Option<String>, RecipeRepositoryError>;
}

/// Fixture repository for code paths that run without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeRepository;

#[async_trait]
impl RecipeRepository for FixtureRecipeRepository {
    async fn create(
        &self,
        owner: &UserId,
        fields: RecipeFields,
        _tag_ids: Vec<i64>,
    ) -> Result<Recipe, RecipeRepositoryError> {
        Ok(Recipe {
            id: 1,
            owner_id: owner.clone(),
            title: fields.title,
            time_minutes: fields.time_minutes,
            price: fields.price,
            link: fields.link,
            description: fields.description,
            image: None,
            tags: Vec::new(),
        })
    }

    async fn find(&self, _id: i64, _owner: &UserId) -> Result<Recipe, RecipeRepositoryError> {
        Err(RecipeRepositoryError::not_found())
    }

    async fn list_by_owner(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(
        &self,
        _id: i64,
        _owner: &UserId,
        _changes: RecipeFieldChanges,
        _tag_ids: Option<Vec<i64>>,
    ) -> Result<Recipe, RecipeRepositoryError> {
        Err(RecipeRepositoryError::not_found())
    }

    async fn delete(&self, _id: i64, _owner: &UserId) -> Result<Recipe, RecipeRepositoryError> {
        Err(RecipeRepositoryError::not_found())
    }

    async fn set_image(
        &self,
        _id: i64,
        _owner: &UserId,
        _image: &str,
    ) -> Result<Option<String>, RecipeRepositoryError> {
        Err(RecipeRepositoryError::not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Price;

    fn fields() -> RecipeFields {
        RecipeFields {
            title: "Sample recipe".to_owned(),
            time_minutes: 22,
            price: Price::parse("5.25").expect("valid price"),
            link: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn fixture_echoes_created_fields() {
        let owner = UserId::random();
        let recipe = FixtureRecipeRepository
            .create(&owner, fields(), Vec::new())
            .await
            .expect("fixture create");
        assert_eq!(recipe.owner_id, owner);
        assert_eq!(recipe.title, "Sample recipe");
    }

    #[tokio::test]
    async fn fixture_reports_missing_for_lookups() {
        let owner = UserId::random();
        let err = FixtureRecipeRepository
            .find(1, &owner)
            .await
            .expect_err("fixture find");
        assert_eq!(err, RecipeRepositoryError::NotFound);
    }
}
