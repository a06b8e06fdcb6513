//! Authentication extractors.
//!
//! Identity verification happens upstream (the identity provider in front of
//! the service); by the time a request reaches a handler, authentication is
//! just "is there a user id in the session". These extractors read it.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use sterling_core::UserId;

/// Session key holding the signed-in user's id.
pub const CURRENT_USER_KEY: &str = "current_user";

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user_id): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {user_id}!")
/// }
/// ```
pub struct RequireUser(pub UserId);

/// Rejection for [`RequireUser`]: a 401 with the JSON error envelope.
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(Unauthorized)?;

        let user_id: UserId = session
            .get(CURRENT_USER_KEY)
            .await
            .ok()
            .flatten()
            .ok_or(Unauthorized)?;

        Ok(Self(user_id))
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Unlike [`RequireUser`], this never rejects; anonymous requests get `None`.
pub struct OptionalUser(pub Option<UserId>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = match parts.extensions.get::<Session>() {
            Some(session) => session.get::<UserId>(CURRENT_USER_KEY).await.ok().flatten(),
            None => None,
        };

        Ok(Self(user_id))
    }
}

/// Store the signed-in user in the session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn sign_in(session: &Session, user_id: &UserId) -> Result<(), tower_sessions::session::Error> {
    session.insert(CURRENT_USER_KEY, user_id).await
}

/// Remove the user from the session and invalidate it.
///
/// # Errors
///
/// Returns an error if the session store rejects the deletion.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
