//! Driving port for recipe image uploads.

use async_trait::async_trait;

use crate::domain::{Error, ImageUpload, StoredRecipeImage, UserId};

/// Domain use-case port for attaching an uploaded image to a recipe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeImageCommand: Send + Sync {
    /// Validate, store, and associate an uploaded image, replacing any prior
    /// image on the recipe.
    async fn attach(
        &self,
        id: i64,
        owner: &UserId,
        upload: ImageUpload,
    ) -> Result<StoredRecipeImage, Error>;
}

/// Fixture command reporting every recipe as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeImageCommand;

#[async_trait]
impl RecipeImageCommand for FixtureRecipeImageCommand {
    async fn attach(
        &self,
        _id: i64,
        _owner: &UserId,
        _upload: ImageUpload,
    ) -> Result<StoredRecipeImage, Error> {
        Err(Error::not_found("recipe not found"))
    }
}
