//! Domain entities, services, and ports.
//!
//! Types here are transport agnostic. Inbound adapters translate them to
//! HTTP payloads; outbound adapters persist them. Invariants are documented
//! on each type and enforced at construction where practical.

pub mod error;
pub mod image_service;
pub mod ports;
pub mod price;
pub mod recipe;
pub mod recipe_service;
pub mod tag;
pub mod tag_service;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::image_service::{ImageUpload, RecipeImageService, StoredRecipeImage};
pub use self::price::{Price, PriceParseError};
pub use self::recipe::{Recipe, RecipeChanges, RecipeDraft, RecipeFieldChanges, RecipeFields};
pub use self::recipe_service::RecipeService;
pub use self::tag::Tag;
pub use self::tag_service::TagService;
pub use self::user::{UserId, UserIdValidationError};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
