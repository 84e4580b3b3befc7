use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sentra_core::{AppError, UserId};

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the caller's user id, filled in by the session layer in
/// front of this service.
pub const USER_ID_HEADER: &str = "x-user-id";

pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let header = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let user_id = UserId::parse(header)?;
    let identity = state
        .user_repository
        .find_identity(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("unknown user '{user_id}'")))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
