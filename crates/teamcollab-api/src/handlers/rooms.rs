//! Room handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use teamcollab_entity::room::{CreateRoom, Room};

use crate::dto::request::{CreateRoomRequest, validate};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/rooms: rooms the caller belongs to.
pub async fn list_rooms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Room>>, ApiError> {
    Ok(Json(state.rooms.rooms_for_member(&auth.user_id).await?))
}

/// POST /api/rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    validate(&req)?;

    let room = state
        .rooms
        .create_room(CreateRoom {
            name: req.name,
            creator: auth.user_id.clone(),
            member_ids: req.member_ids,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(room)))
}
