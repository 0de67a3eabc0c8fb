//! Connection gateway: authenticates the handshake before any session exists.

use std::sync::Arc;

use tracing::debug;

use teamcollab_auth::{TokenVerifier, VerifiedIdentity};
use teamcollab_core::error::AppError;

/// Reason given to every refused handshake.
pub const UNAUTHORIZED: &str = "Unauthorized";

/// Raw token sources offered by a connecting client.
#[derive(Debug, Clone, Default)]
pub struct HandshakeCredentials {
    /// Explicit auth field, usually `Bearer <token>`.
    pub auth_field: Option<String>,
    /// `Authorization` header value.
    pub authorization_header: Option<String>,
    /// Raw `token` query parameter.
    pub query_token: Option<String>,
}

impl HandshakeCredentials {
    /// Picks the bearer token from the first source present.
    ///
    /// The auth field wins over the header; the query parameter is only
    /// consulted when neither is present. An empty auth field counts as
    /// absent, but a header that is present always decides, even when
    /// empty. A `Bearer ` prefix is stripped from the first two sources,
    /// otherwise their value is taken as-is.
    pub fn token(&self) -> Option<String> {
        let explicit = self
            .auth_field
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(self.authorization_header.as_deref());

        let token = match explicit {
            Some(value) => match value.strip_prefix("Bearer ") {
                Some(rest) => rest.split(' ').next().unwrap_or_default().to_string(),
                None => value.to_string(),
            },
            None => self.query_token.clone().unwrap_or_default(),
        };

        (!token.is_empty()).then_some(token)
    }
}

/// Authenticates inbound connections through the external verifier.
#[derive(Clone)]
pub struct ConnectionGateway {
    verifier: Arc<dyn TokenVerifier>,
}

impl std::fmt::Debug for ConnectionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGateway").finish()
    }
}

impl ConnectionGateway {
    /// Creates a gateway around `verifier`.
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Verifies the handshake.
    ///
    /// Every failure, whether no token or a rejected one, yields an
    /// `Unauthorized` error whose message is exactly [`UNAUTHORIZED`].
    pub async fn authenticate(
        &self,
        credentials: &HandshakeCredentials,
    ) -> Result<VerifiedIdentity, AppError> {
        let Some(token) = credentials.token() else {
            debug!("Handshake carried no token");
            return Err(AppError::unauthorized(UNAUTHORIZED));
        };

        self.verifier.verify(&token).await.map_err(|e| {
            debug!(reason = %e.message, "Handshake token rejected");
            AppError::unauthorized(UNAUTHORIZED)
        })
    }
}
