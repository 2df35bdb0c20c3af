//! Helpers selecting real or fixture port implementations.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{RecipeCommand, TagCommand};
use crate::domain::{RecipeImageService, RecipeService, TagService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{DieselRecipeRepository, DieselTagRepository};
use crate::outbound::storage::FsImageStore;
use crate::server::ServerConfig;

/// Build the HTTP handler state from configuration.
///
/// With a database pool the Diesel repositories and the filesystem image
/// store back the domain services. Without one the fixture ports are used,
/// which is only suitable for smoke runs and tests.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let Some(pool) = &config.db_pool else {
        return web::Data::new(HttpState::fixture());
    };

    let recipe_repo = Arc::new(DieselRecipeRepository::new(pool.clone()));
    let tag_repo = Arc::new(DieselTagRepository::new(pool.clone()));
    let image_store = Arc::new(FsImageStore::new(config.media_root.clone()));

    let recipes = Arc::new(RecipeService::new(
        Arc::clone(&recipe_repo),
        Arc::clone(&tag_repo),
        Arc::clone(&image_store),
    ));
    let images = Arc::new(RecipeImageService::new(recipe_repo, image_store));
    let tags = Arc::new(TagService::new(tag_repo));

    web::Data::new(HttpState::new(
        Arc::clone(&recipes) as Arc<dyn RecipeCommand>,
        recipes,
        images,
        Arc::clone(&tags) as Arc<dyn TagCommand>,
        tags,
    ))
}
