//! Message history handler.

use axum::Json;
use axum::extract::{Query, State};

use teamcollab_entity::message::Message;
use teamcollab_store::HistoryQuery;

use crate::dto::request::HistoryParams;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/messages?withUserId=&roomId=&limit=&before=
///
/// Returns the newest `limit` matching messages, oldest first.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let query = HistoryQuery {
        requester: auth.user_id.clone(),
        with_user: params.with_user_id.filter(|u| !u.is_empty()),
        room: params.room_id.filter(|r| !r.is_empty()),
        before: params.before,
        limit: state.config.history.clamp(params.limit),
    };

    Ok(Json(state.messages.history(&query).await?))
}
