//! Tests for tag HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App};
use serde_json::{json, Value};

use super::*;
use crate::domain::ports::{MockTagCommand, MockTagQuery};
use crate::domain::{Tag, UserId};
use crate::inbound::http::test_utils::{self, TEST_USER_ID};

fn app_with(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_utils::test_session_middleware())
        .route("/test-login", web::post().to(test_utils::test_login))
        .service(
            web::scope("/api/v1")
                .service(list_tags)
                .service(update_tag)
                .service(delete_tag),
        )
}

fn owned_tag(id: i64, name: &str) -> Tag {
    Tag {
        id,
        owner_id: UserId::new(TEST_USER_ID).expect("fixture user id"),
        name: name.to_owned(),
    }
}

#[actix_web::test]
async fn listing_requires_authentication() {
    let app = actix_test::init_service(app_with(HttpState::fixture())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/tags").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn list_returns_owned_tags_without_owner_field() {
    let mut query = MockTagQuery::new();
    query
        .expect_list()
        .withf(|owner| owner.as_ref() == TEST_USER_ID)
        .times(1)
        .return_once(|_| Ok(vec![owned_tag(2, "Vegan"), owned_tag(1, "Dessert")]));

    let mut state = HttpState::fixture();
    state.tags_query = Arc::new(query);
    let app = actix_test::init_service(app_with(state)).await;
    let cookie = test_utils::login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/tags")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let tags = body.as_array().expect("tag array");
    let names: Vec<_> = tags
        .iter()
        .filter_map(|t| t.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["Vegan", "Dessert"]);
    assert!(tags.iter().all(|t| t.get("owner").is_none()));
}

#[actix_web::test]
async fn rename_returns_updated_tag() {
    let mut command = MockTagCommand::new();
    command
        .expect_rename()
        .withf(|id, _, name| *id == 4 && name == "Dessert")
        .times(1)
        .return_once(|id, _, name| Ok(owned_tag(id, &name)));

    let mut state = HttpState::fixture();
    state.tags = Arc::new(command);
    let app = actix_test::init_service(app_with(state)).await;
    let cookie = test_utils::login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/tags/4")
            .cookie(cookie)
            .set_json(json!({ "name": "Dessert" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("name").and_then(Value::as_str), Some("Dessert"));
}

#[actix_web::test]
async fn rename_without_name_is_rejected() {
    let mut command = MockTagCommand::new();
    command.expect_rename().times(0);

    let mut state = HttpState::fixture();
    state.tags = Arc::new(command);
    let app = actix_test::init_service(app_with(state)).await;
    let cookie = test_utils::login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/tags/4")
            .cookie(cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn foreign_tag_deletion_is_not_found() {
    // The fixture command reports every tag as missing.
    let app = actix_test::init_service(app_with(HttpState::fixture())).await;
    let cookie = test_utils::login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/tags/9")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let mut command = MockTagCommand::new();
    command
        .expect_delete()
        .withf(|id, owner| *id == 9 && owner.as_ref() == TEST_USER_ID)
        .times(1)
        .return_once(|_, _| Ok(()));

    let mut state = HttpState::fixture();
    state.tags = Arc::new(command);
    let app = actix_test::init_service(app_with(state)).await;
    let cookie = test_utils::login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/tags/9")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
