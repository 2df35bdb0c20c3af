//! Driving port for recipe read operations.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, UserId};

/// Domain use-case port for fetching recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Fetch one owned recipe with tags populated.
    async fn get(&self, id: i64, owner: &UserId) -> Result<Recipe, Error>;

    /// List the owner's recipes, newest first.
    async fn list(&self, owner: &UserId) -> Result<Vec<Recipe>, Error>;
}

/// Fixture query with no recipes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeQuery;

#[async_trait]
impl RecipeQuery for FixtureRecipeQuery {
    async fn get(&self, _id: i64, _owner: &UserId) -> Result<Recipe, Error> {
        Err(Error::not_found("recipe not found"))
    }

    async fn list(&self, _owner: &UserId) -> Result<Vec<Recipe>, Error> {
        Ok(Vec::new())
    }
}
