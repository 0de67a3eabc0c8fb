//! JWT token validation.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use teamcollab_core::config::AuthConfig;
use teamcollab_core::error::AppError;
use teamcollab_core::result::AppResult;

use super::claims::Claims;
use crate::verifier::{TokenVerifier, VerifiedIdentity};

/// Validates HS256 JWT tokens signed with the shared secret.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        if token_data.claims.id.is_empty() {
            return Err(AppError::unauthorized("Token carries no user id"));
        }

        Ok(token_data.claims)
    }
}

#[async_trait]
impl TokenVerifier for JwtDecoder {
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity> {
        self.decode_token(token).map(VerifiedIdentity::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use teamcollab_core::error::ErrorKind;
    use teamcollab_core::types::UserId;
    use teamcollab_entity::user::UserRole;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[tokio::test]
    async fn test_round_trip_identity() {
        let cfg = config("s3cret");
        let token = JwtEncoder::new(&cfg)
            .issue(&UserId::new("u1"), UserRole::Admin, Some("a@b.c"))
            .unwrap();

        let identity = JwtDecoder::new(&cfg).verify(&token).await.unwrap();
        assert_eq!(identity.user_id, UserId::new("u1"));
        assert_eq!(identity.role, UserRole::Admin);
        assert_eq!(identity.email.as_deref(), Some("a@b.c"));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_unauthorized() {
        let token = JwtEncoder::new(&config("one"))
            .issue(&UserId::new("u1"), UserRole::User, None)
            .unwrap();

        let err = JwtDecoder::new(&config("two")).verify(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let cfg = config("s3cret");
        let token = JwtEncoder::new(&cfg)
            .issue_with_expiry(&UserId::new("u1"), UserRole::User, None, -3600)
            .unwrap();

        let err = JwtDecoder::new(&cfg).verify(&token).await.unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }

    #[tokio::test]
    async fn test_garbage_is_rejected() {
        let err = JwtDecoder::new(&config("s3cret"))
            .verify("not-a-jwt")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
