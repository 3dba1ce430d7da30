//! User handlers

use axum::{extract::State, Json};
use arogya_service::dto::CurrentUserResponse;
use arogya_service::AuthService;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Get current user
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = AuthService::new(state.service_context());
    let user = service.current_user(auth.user_id()).await?;
    Ok(Json(CurrentUserResponse::from(&user)))
}
