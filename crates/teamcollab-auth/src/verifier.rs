//! Token verification seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use teamcollab_core::result::AppResult;
use teamcollab_core::types::UserId;
use teamcollab_entity::user::UserRole;

/// Identity recovered from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Authenticated user.
    pub user_id: UserId,
    /// Role at token issuance.
    pub role: UserRole,
    /// Email, when the issuer included one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Turns a raw bearer token into an identity.
///
/// Implementations return an `Unauthorized` error for any token they do
/// not accept.
#[async_trait]
pub trait TokenVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Verifies `token` and returns the identity it carries.
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity>;
}
