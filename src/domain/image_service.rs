//! Image attachment service.
//!
//! Validates uploaded bytes as a decodable image, stores them under a random
//! name, and records the reference on the owning recipe. Replacing an image
//! releases the previous file on a best-effort basis.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    ImageStore, ImageStoreError, RecipeImageCommand, RecipeRepository,
};
use crate::domain::recipe_service::map_recipe_error;
use crate::domain::{Error, UserId};

/// Raw bytes of an uploaded file plus the client-supplied name, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
}

/// Outcome of a successful image attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecipeImage {
    /// The recipe the image now belongs to.
    pub id: i64,
    /// Stored file reference, unique per upload.
    pub image: String,
}

/// Image use-case service implementing the driving port.
#[derive(Clone)]
pub struct RecipeImageService<R, S> {
    recipes: Arc<R>,
    store: Arc<S>,
}

impl<R, S> RecipeImageService<R, S> {
    /// Create a new service with the given adapters.
    pub fn new(recipes: Arc<R>, store: Arc<S>) -> Self {
        Self { recipes, store }
    }
}

fn map_store_error(error: ImageStoreError) -> Error {
    let ImageStoreError::Io { message } = error;
    Error::internal(format!("image store error: {message}"))
}

/// Pick a storage extension: the upload's own extension when it has one,
/// otherwise whatever the decoded format advertises.
fn storage_extension(upload: &ImageUpload) -> &str {
    let from_name = upload
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(char::is_alphanumeric));
    if let Some(ext) = from_name {
        return ext;
    }
    image::guess_format(&upload.bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("img")
}

#[async_trait]
impl<R, S> RecipeImageCommand for RecipeImageService<R, S>
where
    R: RecipeRepository,
    S: ImageStore,
{
    async fn attach(
        &self,
        id: i64,
        owner: &UserId,
        upload: ImageUpload,
    ) -> Result<StoredRecipeImage, Error> {
        // Ownership is checked before the payload, so a foreign recipe reads
        // as missing rather than leaking a validation response.
        self.recipes
            .find(id, owner)
            .await
            .map_err(map_recipe_error)?;

        if image::load_from_memory(&upload.bytes).is_err() {
            return Err(
                Error::invalid_request("uploaded file is not a decodable image").with_details(
                    serde_json::json!({
                        "fields": [{
                            "field": "image",
                            "code": "not_an_image",
                            "message": "file could not be decoded as an image",
                        }],
                    }),
                ),
            );
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), storage_extension(&upload));
        self.store
            .save(&file_name, &upload.bytes)
            .await
            .map_err(map_store_error)?;

        let previous = self
            .recipes
            .set_image(id, owner, &file_name)
            .await
            .map_err(map_recipe_error)?;
        if let Some(previous) = previous {
            if let Err(error) = self.store.remove(&previous).await {
                warn!(recipe_id = id, %error, "failed to remove replaced recipe image");
            }
        }

        Ok(StoredRecipeImage {
            id,
            image: file_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockImageStore, MockRecipeRepository, RecipeRepositoryError,
    };
    use crate::domain::{ErrorCode, Price, Recipe};

    /// Smallest valid 1x1 PNG.
    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        let image = image::RgbImage::new(1, 1);
        image::DynamicImage::ImageRgb8(image)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .expect("encode test png");
        bytes
    }

    fn owned_recipe(id: i64, owner: &UserId, image: Option<&str>) -> Recipe {
        Recipe {
            id,
            owner_id: owner.clone(),
            title: "Sample recipe".to_owned(),
            time_minutes: 10,
            price: Price::from_minor_units(500),
            link: None,
            description: None,
            image: image.map(str::to_owned),
            tags: Vec::new(),
        }
    }

    fn service(
        recipes: MockRecipeRepository,
        store: MockImageStore,
    ) -> RecipeImageService<MockRecipeRepository, MockImageStore> {
        RecipeImageService::new(Arc::new(recipes), Arc::new(store))
    }

    #[tokio::test]
    async fn attach_stores_and_records_reference() {
        let owner = UserId::random();
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find()
            .times(1)
            .return_once(|id, owner| Ok(owned_recipe(id, owner, None)));
        recipes
            .expect_set_image()
            .withf(|_, _, image| image.ends_with(".png"))
            .times(1)
            .return_once(|_, _, _| Ok(None));

        let mut store = MockImageStore::new();
        store
            .expect_save()
            .withf(|file_name, _| file_name.ends_with(".png"))
            .times(1)
            .return_once(|_, _| Ok(()));
        store.expect_remove().times(0);

        let stored = service(recipes, store)
            .attach(
                7,
                &owner,
                ImageUpload {
                    bytes: png_bytes(),
                    file_name: Some("photo.png".to_owned()),
                },
            )
            .await
            .expect("attach succeeds");
        assert_eq!(stored.id, 7);
        assert!(stored.image.ends_with(".png"));
    }

    #[tokio::test]
    async fn replacing_an_image_releases_the_previous_file() {
        let owner = UserId::random();
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find()
            .times(1)
            .return_once(|id, owner| Ok(owned_recipe(id, owner, Some("old.png"))));
        recipes
            .expect_set_image()
            .times(1)
            .return_once(|_, _, _| Ok(Some("old.png".to_owned())));

        let mut store = MockImageStore::new();
        store.expect_save().times(1).return_once(|_, _| Ok(()));
        store
            .expect_remove()
            .withf(|file_name| file_name == "old.png")
            .times(1)
            .return_once(|_| Ok(()));

        service(recipes, store)
            .attach(
                7,
                &owner,
                ImageUpload {
                    bytes: png_bytes(),
                    file_name: None,
                },
            )
            .await
            .expect("attach succeeds");
    }

    #[tokio::test]
    async fn non_image_bytes_are_rejected_after_ownership() {
        let owner = UserId::random();
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find()
            .times(1)
            .return_once(|id, owner| Ok(owned_recipe(id, owner, None)));
        recipes.expect_set_image().times(0);

        let mut store = MockImageStore::new();
        store.expect_save().times(0);

        let err = service(recipes, store)
            .attach(
                7,
                &owner,
                ImageUpload {
                    bytes: b"notanimage".to_vec(),
                    file_name: Some("notanimage.txt".to_owned()),
                },
            )
            .await
            .expect_err("garbage payload");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn foreign_recipe_reads_as_missing_before_validation() {
        let owner = UserId::random();
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find()
            .times(1)
            .return_once(|_, _| Err(RecipeRepositoryError::not_found()));

        let mut store = MockImageStore::new();
        store.expect_save().times(0);

        let err = service(recipes, store)
            .attach(
                7,
                &owner,
                ImageUpload {
                    bytes: b"notanimage".to_vec(),
                    file_name: None,
                },
            )
            .await
            .expect_err("foreign recipe");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn extension_falls_back_to_detected_format() {
        let upload = ImageUpload {
            bytes: png_bytes(),
            file_name: None,
        };
        assert_eq!(storage_extension(&upload), "png");
    }
}
