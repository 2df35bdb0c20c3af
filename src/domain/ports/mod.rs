//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod image_store;
mod recipe_command;
mod recipe_image_command;
mod recipe_query;
mod recipe_repository;
mod tag_command;
mod tag_query;
mod tag_repository;

#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{FixtureImageStore, ImageStore, ImageStoreError};
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::{FixtureRecipeCommand, RecipeCommand};
#[cfg(test)]
pub use recipe_image_command::MockRecipeImageCommand;
pub use recipe_image_command::{FixtureRecipeImageCommand, RecipeImageCommand};
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::{FixtureRecipeQuery, RecipeQuery};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{FixtureRecipeRepository, RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use tag_command::MockTagCommand;
pub use tag_command::{FixtureTagCommand, TagCommand};
#[cfg(test)]
pub use tag_query::MockTagQuery;
pub use tag_query::{FixtureTagQuery, TagQuery};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{FixtureTagRepository, TagRepository, TagRepositoryError};
