//! Authenticated-identity extraction from the session cookie.
//!
//! Token issuance lives in an external identity service; by the time a
//! request reaches this API the session cookie already carries the
//! authenticated user's id under [`USER_ID_KEY`]. Handlers declare a
//! [`CurrentUser`] argument and never touch the session themselves: a
//! request without a readable user id is rejected with `401 Unauthorized`
//! before the handler body runs.

use actix_session::{Session, SessionExt};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::domain::{Error, UserId};
use crate::inbound::http::error::ApiError;

/// Session key under which the identity service stores the user id.
pub(crate) const USER_ID_KEY: &str = "user_id";

/// The caller's identity, extracted from the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl CurrentUser {
    /// Unwrap into the domain [`UserId`].
    pub fn into_inner(self) -> UserId {
        self.0
    }
}

fn authenticated_user(session: &Session) -> Result<UserId, Error> {
    let raw = session
        .get::<String>(USER_ID_KEY)
        .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
        .ok_or_else(|| Error::unauthorized("login required"))?;
    UserId::new(&raw).map_err(|error| {
        // A cookie that deserialises but carries garbage was tampered with
        // or signed by a stale key; treat it the same as no cookie at all.
        tracing::warn!("invalid user id in session cookie: {error}");
        Error::unauthorized("login required")
    })
}

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.get_session();
        ready(
            authenticated_user(&session)
                .map(CurrentUser)
                .map_err(ApiError::from_domain),
        )
    }
}
