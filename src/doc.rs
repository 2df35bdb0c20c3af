//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every recipe and tag endpoint, the request and
//! response schemas, and the session cookie security scheme. Debug builds
//! serve the generated document at `/api-docs/openapi.json`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ErrorCode;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::recipes::{
    CreateRecipeRequest, PriceField, RecipeDetailDto, RecipeImageDto, RecipeSummaryDto, TagDto,
    TagRef, UpdateRecipeRequest,
};
use crate::inbound::http::tags::UpdateTagRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie identifying the authenticated user.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe API",
        description = "HTTP interface for managing user-owned recipes, tags and recipe images."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::upload_recipe_image,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::update_tag,
        crate::inbound::http::tags::delete_tag,
    ),
    components(schemas(
        TagDto,
        TagRef,
        PriceField,
        CreateRecipeRequest,
        UpdateRecipeRequest,
        RecipeSummaryDto,
        RecipeDetailDto,
        RecipeImageDto,
        UpdateTagRequest,
        ApiError,
        ErrorCode,
    )),
    tags(
        (name = "recipes", description = "Operations on recipes and their images"),
        (name = "tags", description = "Operations on recipe tags")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::schema::Schema;
    use utoipa::openapi::RefOr;
    use utoipa::OpenApi;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/v1/recipes",
            "/api/v1/recipes/{id}",
            "/api/v1/recipes/{id}/upload-image",
            "/api/v1/tags",
            "/api/v1/tags/{id}",
        ] {
            assert!(paths.contains_key(path), "missing path '{path}'");
        }
    }

    #[test]
    fn detail_schema_exposes_wire_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let detail = schemas
            .get("RecipeDetailDto")
            .expect("RecipeDetailDto schema");

        assert_object_schema_has_field(detail, "timeMinutes");
        assert_object_schema_has_field(detail, "description");
    }

    #[test]
    fn error_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("ApiError").expect("ApiError schema");

        assert_object_schema_has_field(error, "code");
        assert_object_schema_has_field(error, "message");
    }
}
