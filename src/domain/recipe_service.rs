//! Recipe aggregate service.
//!
//! Turns write requests carrying embedded tag names into fully persisted
//! recipes with resolved, owner-scoped tag associations. Tag resolution is
//! idempotent (get-or-create against the uniqueness constraint) and runs
//! before the recipe write, so a failure part-way leaves at worst reusable
//! tag rows and never a partially created recipe.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    ImageStore, RecipeCommand, RecipeQuery, RecipeRepository, RecipeRepositoryError,
    TagRepository, TagRepositoryError,
};
use crate::domain::{Error, Recipe, RecipeChanges, RecipeDraft, Tag, UserId};

/// Recipe use-case service implementing the driving ports.
#[derive(Clone)]
pub struct RecipeService<R, T, S> {
    recipes: Arc<R>,
    tags: Arc<T>,
    images: Arc<S>,
}

impl<R, T, S> RecipeService<R, T, S> {
    /// Create a new service with the given adapters.
    pub fn new(recipes: Arc<R>, tags: Arc<T>, images: Arc<S>) -> Self {
        Self {
            recipes,
            tags,
            images,
        }
    }
}

pub(crate) fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::NotFound => Error::not_found("recipe not found"),
        RecipeRepositoryError::Connection { message } | RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

pub(crate) fn map_tag_error(error: TagRepositoryError) -> Error {
    match error {
        TagRepositoryError::NotFound => Error::not_found("tag not found"),
        TagRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("tag name already exists: {name}"))
        }
        TagRepositoryError::Connection { message } | TagRepositoryError::Query { message } => {
            Error::internal(format!("tag repository error: {message}"))
        }
    }
}

impl<R, T, S> RecipeService<R, T, S>
where
    R: RecipeRepository,
    T: TagRepository,
    S: ImageStore,
{
    /// Resolve embedded tag names to owner-scoped tags, in first-seen order.
    ///
    /// Duplicate names collapse onto one tag before resolution, so repeated
    /// entries in the payload attach a single row.
    async fn resolve_tags(&self, owner: &UserId, names: Vec<String>) -> Result<Vec<Tag>, Error> {
        let mut seen = HashSet::with_capacity(names.len());
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.clone()) {
                continue;
            }
            let tag = self
                .tags
                .get_or_create(owner, &name)
                .await
                .map_err(map_tag_error)?;
            resolved.push(tag);
        }
        Ok(resolved)
    }
}

#[async_trait]
impl<R, T, S> RecipeCommand for RecipeService<R, T, S>
where
    R: RecipeRepository,
    T: TagRepository,
    S: ImageStore,
{
    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error> {
        let (fields, tag_names) = draft.validate()?;
        let tags = self.resolve_tags(owner, tag_names).await?;
        let tag_ids = tags.iter().map(|tag| tag.id).collect();

        let recipe = self
            .recipes
            .create(owner, fields, tag_ids)
            .await
            .map_err(map_recipe_error)?;
        debug!(recipe_id = recipe.id, owner = %owner, tags = recipe.tags.len(), "recipe created");
        Ok(recipe)
    }

    async fn update(
        &self,
        id: i64,
        owner: &UserId,
        changes: RecipeChanges,
    ) -> Result<Recipe, Error> {
        let (field_changes, tag_names) = changes.validate()?;
        let tag_ids = match tag_names {
            Some(names) => {
                let tags = self.resolve_tags(owner, names).await?;
                Some(tags.into_iter().map(|tag| tag.id).collect())
            }
            None => None,
        };

        self.recipes
            .update(id, owner, field_changes, tag_ids)
            .await
            .map_err(map_recipe_error)
    }

    async fn delete(&self, id: i64, owner: &UserId) -> Result<(), Error> {
        let deleted = self
            .recipes
            .delete(id, owner)
            .await
            .map_err(map_recipe_error)?;
        if let Some(image) = deleted.image {
            // The row is gone either way; a stale file is worth a warning,
            // not a failed delete.
            if let Err(error) = self.images.remove(&image).await {
                warn!(recipe_id = id, %error, "failed to remove stored recipe image");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R, T, S> RecipeQuery for RecipeService<R, T, S>
where
    R: RecipeRepository,
    T: TagRepository,
    S: ImageStore,
{
    async fn get(&self, id: i64, owner: &UserId) -> Result<Recipe, Error> {
        self.recipes.find(id, owner).await.map_err(map_recipe_error)
    }

    async fn list(&self, owner: &UserId) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list_by_owner(owner)
            .await
            .map_err(map_recipe_error)
    }
}
