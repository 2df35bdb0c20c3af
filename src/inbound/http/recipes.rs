//! Recipe HTTP handlers.
//!
//! ```text
//! GET    /api/v1/recipes
//! POST   /api/v1/recipes
//! GET    /api/v1/recipes/{id}
//! PATCH  /api/v1/recipes/{id}
//! PUT    /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! POST   /api/v1/recipes/{id}/upload-image
//! ```
//!
//! Update payloads are filtered through an allow-list of mutable fields:
//! anything else, notably `owner`, is dropped before the domain ever sees
//! it, so ownership cannot be reassigned through a crafted payload.

use actix_multipart::Multipart;
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use futures_util::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, ImageUpload, Recipe, RecipeChanges, RecipeDraft, Tag};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Largest accepted image upload in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// A tag as it appears inside recipe payloads and responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagDto {
    pub id: i64,
    pub name: String,
}

impl From<Tag> for TagDto {
    fn from(value: Tag) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

/// An embedded tag reference in a write payload. Only the name matters;
/// resolution is by `(owner, name)`, never by a client-supplied id.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TagRef {
    pub name: String,
}

/// Price on the wire: either a JSON string (`"4.50"`) or a bare number.
/// Both arrive as raw text for the domain to validate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(serde_json::Number),
    Text(String),
}

impl utoipa::PartialSchema for PriceField {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        use utoipa::openapi::schema::{ObjectBuilder, OneOfBuilder, SchemaType, Type};

        OneOfBuilder::new()
            .item(ObjectBuilder::new().schema_type(SchemaType::Type(Type::Number)))
            .item(ObjectBuilder::new().schema_type(SchemaType::Type(Type::String)))
            .into()
    }
}

impl ToSchema for PriceField {}

impl PriceField {
    fn into_raw(self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// Request payload for creating a recipe. Unknown fields are ignored.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<PriceField>,
    pub link: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
}

/// Request payload for partially updating a recipe. Unknown fields, including
/// `owner`, are ignored.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<PriceField>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<TagRef>>,
}

/// List-view recipe payload. Descriptions are detail-only.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummaryDto {
    pub id: i64,
    pub title: String,
    pub time_minutes: u32,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub tags: Vec<TagDto>,
}

impl From<Recipe> for RecipeSummaryDto {
    fn from(value: Recipe) -> Self {
        Self {
            id: value.id,
            title: value.title,
            time_minutes: value.time_minutes,
            price: value.price.to_string(),
            link: value.link,
            tags: value.tags.into_iter().map(TagDto::from).collect(),
        }
    }
}

/// Detail-view recipe payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetailDto {
    pub id: i64,
    pub title: String,
    pub time_minutes: u32,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<TagDto>,
}

impl From<Recipe> for RecipeDetailDto {
    fn from(value: Recipe) -> Self {
        Self {
            id: value.id,
            title: value.title,
            time_minutes: value.time_minutes,
            price: value.price.to_string(),
            link: value.link,
            description: value.description,
            tags: value.tags.into_iter().map(TagDto::from).collect(),
        }
    }
}

/// Response payload for a successful image upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeImageDto {
    pub id: i64,
    pub image: String,
}

fn missing_fields_error(fields: &[&str]) -> Error {
    let details: Vec<_> = fields
        .iter()
        .map(|field| {
            json!({
                "field": field,
                "code": "missing",
                "message": "field is required",
            })
        })
        .collect();
    Error::invalid_request("required fields are missing").with_details(json!({
        "fields": details,
    }))
}

fn tag_names(tags: Vec<TagRef>) -> Vec<String> {
    tags.into_iter().map(|tag| tag.name).collect()
}

fn parse_create_request(payload: CreateRecipeRequest) -> Result<RecipeDraft, Error> {
    let mut missing = Vec::new();
    if payload.title.is_none() {
        missing.push("title");
    }
    if payload.time_minutes.is_none() {
        missing.push("timeMinutes");
    }
    if payload.price.is_none() {
        missing.push("price");
    }
    if !missing.is_empty() {
        return Err(missing_fields_error(&missing));
    }
    let (Some(title), Some(time_minutes), Some(price)) =
        (payload.title, payload.time_minutes, payload.price)
    else {
        return Err(Error::internal("required fields checked but absent"));
    };

    Ok(RecipeDraft {
        title,
        time_minutes,
        price: price.into_raw(),
        link: payload.link,
        description: payload.description,
        tags: tag_names(payload.tags),
    })
}

fn parse_update_request(payload: UpdateRecipeRequest) -> RecipeChanges {
    RecipeChanges {
        title: payload.title,
        time_minutes: payload.time_minutes,
        price: payload.price.map(PriceField::into_raw),
        link: payload.link,
        description: payload.description,
        tags: payload.tags.map(tag_names),
    }
}

/// List the authenticated user's recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    responses(
        (status = 200, description = "Recipes owned by the caller", body = [RecipeSummaryDto]),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<RecipeSummaryDto>>> {
    let recipes = state.recipes_query.list(&user.into_inner()).await?;
    Ok(web::Json(
        recipes.into_iter().map(RecipeSummaryDto::from).collect(),
    ))
}

/// Create a recipe, resolving embedded tag names per user.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Created recipe", body = RecipeDetailDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateRecipeRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_create_request(payload.into_inner())?;
    let recipe = state.recipes.create(&user.into_inner(), draft).await?;
    Ok(HttpResponse::Created().json(RecipeDetailDto::from(recipe)))
}

/// Fetch one owned recipe.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe detail", body = RecipeDetailDto),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found or not owned", body = ApiError)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDetailDto>> {
    let recipe = state
        .recipes_query
        .get(path.into_inner(), &user.into_inner())
        .await?;
    Ok(web::Json(RecipeDetailDto::from(recipe)))
}

async fn apply_update(
    state: &HttpState,
    user: CurrentUser,
    id: i64,
    payload: UpdateRecipeRequest,
) -> ApiResult<web::Json<RecipeDetailDto>> {
    let changes = parse_update_request(payload);
    let recipe = state
        .recipes
        .update(id, &user.into_inner(), changes)
        .await?;
    Ok(web::Json(RecipeDetailDto::from(recipe)))
}

/// Partially update an owned recipe.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetailDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found or not owned", body = ApiError)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<UpdateRecipeRequest>,
) -> ApiResult<web::Json<RecipeDetailDto>> {
    apply_update(&state, user, path.into_inner(), payload.into_inner()).await
}

/// Replace an owned recipe. Absent fields keep their stored values, matching
/// the PATCH semantics.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetailDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found or not owned", body = ApiError)
    ),
    tags = ["recipes"],
    operation_id = "replaceRecipe"
)]
#[put("/recipes/{id}")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<UpdateRecipeRequest>,
) -> ApiResult<web::Json<RecipeDetailDto>> {
    apply_update(&state, user, path.into_inner(), payload.into_inner()).await
}

/// Delete an owned recipe and release its stored image.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found or not owned", body = ApiError)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete(path.into_inner(), &user.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

fn multipart_error(error: actix_multipart::MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart payload: {error}"))
}

/// Pull the `image` field out of a multipart stream, bounded by
/// [`MAX_IMAGE_BYTES`].
async fn read_image_field(mut payload: Multipart) -> Result<ImageUpload, Error> {
    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let (name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(str::to_owned),
                cd.get_filename().map(str::to_owned),
            ),
            None => (None, None),
        };
        if name.as_deref() != Some("image") {
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(multipart_error)?;
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(Error::invalid_request("image exceeds the upload size limit"));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(ImageUpload { bytes, file_name });
    }

    Err(
        Error::invalid_request("multipart field 'image' is required").with_details(json!({
            "fields": [{
                "field": "image",
                "code": "missing",
                "message": "field is required",
            }],
        })),
    )
}

/// Attach an uploaded image to an owned recipe.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/upload-image",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored image reference", body = RecipeImageDto),
        (status = 400, description = "Payload is not a decodable image", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found or not owned", body = ApiError)
    ),
    tags = ["recipes"],
    operation_id = "uploadRecipeImage"
)]
#[post("/recipes/{id}/upload-image")]
pub async fn upload_recipe_image(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
    payload: Multipart,
) -> ApiResult<web::Json<RecipeImageDto>> {
    let upload = read_image_field(payload).await?;
    let stored = state
        .recipe_images
        .attach(path.into_inner(), &user.into_inner(), upload)
        .await?;
    Ok(web::Json(RecipeImageDto {
        id: stored.id,
        image: stored.image,
    }))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod handler_tests;
