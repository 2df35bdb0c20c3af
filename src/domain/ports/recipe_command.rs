//! Driving port for recipe write operations.
//!
//! Inbound adapters use this port so handlers stay free of persistence
//! concerns and can be exercised with mocks.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeChanges, RecipeDraft, UserId};

/// Domain use-case port for creating, updating, and deleting recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Create a recipe, resolving embedded tag names to owner-scoped tags.
    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error>;

    /// Apply a partial update; `changes.tags` replaces attachments only when
    /// present.
    async fn update(
        &self,
        id: i64,
        owner: &UserId,
        changes: RecipeChanges,
    ) -> Result<Recipe, Error>;

    /// Delete an owned recipe and release its stored image.
    async fn delete(&self, id: i64, owner: &UserId) -> Result<(), Error>;
}

/// Fixture command that echoes drafts and reports mutations on missing rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeCommand;

#[async_trait]
impl RecipeCommand for FixtureRecipeCommand {
    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error> {
        let (fields, _tags) = draft.validate()?;
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

    async fn update(
        &self,
        _id: i64,
        _owner: &UserId,
        changes: RecipeChanges,
    ) -> Result<Recipe, Error> {
        changes.validate()?;
        Err(Error::not_found("recipe not found"))
    }

    async fn delete(&self, _id: i64, _owner: &UserId) -> Result<(), Error> {
        Err(Error::not_found("recipe not found"))
    }
}
