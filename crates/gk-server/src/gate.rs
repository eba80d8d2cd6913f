//! Authentication gate middleware

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use gk_models::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The user the gate resolved for this request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Reject with 401/403 or attach the resolved user and continue
pub async fn auth_gate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    let decision = state.authenticator.authorize(&parts).await;
    if let Some(user) = decision.into_result()? {
        tracing::debug!(user_id = %user.id, path = parts.uri.path(), "Request authenticated");
        parts.extensions.insert(CurrentUser(user));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
