//! JWT token creation.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use teamcollab_core::config::AuthConfig;
use teamcollab_core::error::AppError;
use teamcollab_core::types::UserId;
use teamcollab_entity::user::UserRole;

use super::claims::Claims;

/// Signs HS256 tokens in the same shape the external issuer produces.
///
/// Used by the CLI to mint local tokens and by tests.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token TTL in seconds.
    ttl_seconds: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_seconds: (config.token_ttl_hours as i64) * 3600,
        }
    }

    /// Issues a token valid for the configured TTL.
    pub fn issue(
        &self,
        user_id: &UserId,
        role: UserRole,
        email: Option<&str>,
    ) -> Result<String, AppError> {
        self.issue_with_expiry(user_id, role, email, self.ttl_seconds)
    }

    /// Issues a token expiring `ttl_seconds` from now (negative for already expired).
    pub fn issue_with_expiry(
        &self,
        user_id: &UserId,
        role: UserRole,
        email: Option<&str>,
        ttl_seconds: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            id: user_id.clone(),
            role,
            email: email.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
