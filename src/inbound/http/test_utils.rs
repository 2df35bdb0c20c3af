//! Test helpers for inbound HTTP components.

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::HttpResponse;

use crate::inbound::http::session::USER_ID_KEY;

/// Stable user id used across handler tests.
pub const TEST_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Test-only route handler that seeds the session with [`TEST_USER_ID`].
///
/// Identity is issued by an external collaborator in production, so tests
/// mount this in its place to obtain an authenticated cookie.
pub async fn test_login(session: Session) -> HttpResponse {
    match session.insert(USER_ID_KEY, TEST_USER_ID) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(error) => HttpResponse::InternalServerError().body(error.to_string()),
    }
}

/// Call the mounted test login route and return the session cookie.
pub async fn login_and_get_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> actix_web::cookie::Cookie<'static> {
    let login_req = actix_web::test::TestRequest::post()
        .uri("/test-login")
        .to_request();
    let login_res = actix_web::test::call_service(app, login_req).await;
    assert!(login_res.status().is_success());
    login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
