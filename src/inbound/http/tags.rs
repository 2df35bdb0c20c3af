//! Tag HTTP handlers.
//!
//! ```text
//! GET    /api/v1/tags
//! PATCH  /api/v1/tags/{id}
//! DELETE /api/v1/tags/{id}
//! ```
//!
//! Tags have no create endpoint: they come into existence through recipe
//! writes that embed tag names.

use actix_web::{delete, get, patch, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::recipes::TagDto;
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for renaming a tag. Unknown fields are ignored.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
}

/// List the authenticated user's tags, name descending.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags owned by the caller", body = [TagDto]),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<TagDto>>> {
    let tags = state.tags_query.list(&user.into_inner()).await?;
    Ok(web::Json(tags.into_iter().map(TagDto::from).collect()))
}

/// Rename an owned tag.
#[utoipa::path(
    patch,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Renamed tag", body = TagDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found or not owned", body = ApiError),
        (status = 409, description = "Name already in use", body = ApiError)
    ),
    tags = ["tags"],
    operation_id = "updateTag"
)]
#[patch("/tags/{id}")]
pub async fn update_tag(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<UpdateTagRequest>,
) -> ApiResult<web::Json<TagDto>> {
    let name = payload.into_inner().name.ok_or_else(|| {
        Error::invalid_request("required fields are missing").with_details(json!({
            "fields": [{
                "field": "name",
                "code": "missing",
                "message": "field is required",
            }],
        }))
    })?;

    let tag = state
        .tags
        .rename(path.into_inner(), &user.into_inner(), name)
        .await?;
    Ok(web::Json(TagDto::from(tag)))
}

/// Delete an owned tag, detaching it from any recipes.
#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found or not owned", body = ApiError)
    ),
    tags = ["tags"],
    operation_id = "deleteTag"
)]
#[delete("/tags/{id}")]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .tags
        .delete(path.into_inner(), &user.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod handler_tests;
