//! `AuthUser` extractor: pulls the bearer token from the Authorization header and verifies it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use teamcollab_auth::VerifiedIdentity;
use teamcollab_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub VerifiedIdentity);

impl AuthUser {
    /// Returns the inner identity.
    pub fn identity(&self) -> &VerifiedIdentity {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = VerifiedIdentity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing or invalid Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .and_then(|rest| rest.split(' ').next())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing or invalid Authorization header"))?;

        let identity = state
            .verifier
            .verify(token)
            .await
            .map_err(|_| AppError::unauthorized("Invalid token"))?;

        Ok(AuthUser(identity))
    }
}
