//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureRecipeCommand, FixtureRecipeImageCommand, FixtureRecipeQuery, FixtureTagCommand,
    FixtureTagQuery, RecipeCommand, RecipeImageCommand, RecipeQuery, TagCommand, TagQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub recipe_images: Arc<dyn RecipeImageCommand>,
    pub tags: Arc<dyn TagCommand>,
    pub tags_query: Arc<dyn TagQuery>,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(
        recipes: Arc<dyn RecipeCommand>,
        recipes_query: Arc<dyn RecipeQuery>,
        recipe_images: Arc<dyn RecipeImageCommand>,
        tags: Arc<dyn TagCommand>,
        tags_query: Arc<dyn TagQuery>,
    ) -> Self {
        Self {
            recipes,
            recipes_query,
            recipe_images,
            tags,
            tags_query,
        }
    }

    /// State wired to fixture ports, for smoke runs without a database.
    pub fn fixture() -> Self {
        Self::new(
            Arc::new(FixtureRecipeCommand),
            Arc::new(FixtureRecipeQuery),
            Arc::new(FixtureRecipeImageCommand),
            Arc::new(FixtureTagCommand),
            Arc::new(FixtureTagQuery),
        )
    }
}
