//! Caller identity and role-gated endpoints.

use axum::Json;

use teamcollab_core::error::AppError;

use crate::dto::response::{MeResponse, MessageResponse, UserInfo};
use crate::error::ApiError;
use crate::extractors::AuthUser;

/// GET /api/me
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: UserInfo {
            id: auth.user_id.clone(),
            role: auth.role,
            email: auth.email.clone(),
        },
    })
}

/// GET /api/admin
pub async fn admin(auth: AuthUser) -> Result<Json<MessageResponse>, ApiError> {
    if !auth.role.is_admin() {
        return Err(AppError::forbidden("Forbidden").into());
    }

    Ok(Json(MessageResponse {
        message: "Welcome, admin!".to_string(),
    }))
}
