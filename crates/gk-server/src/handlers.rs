//! API v1 handlers

use std::sync::Arc;

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Form, Json};
use gk_db::UserFilter;
use gk_models::{NewUser, User};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::gate::CurrentUser;
use crate::state::AppState;

/// GET /api/v1/status
pub async fn status() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// GET /api/v1/unauthorized
pub async fn unauthorized() -> ApiError {
    ApiError::unauthorized("Unauthorized")
}

/// GET /api/v1/forbidden
pub async fn forbidden() -> ApiError {
    ApiError::forbidden("Forbidden")
}

/// Unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/auth_session/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<impl IntoResponse> {
    // An unreadable body carries no fields
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let email = form
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("email missing"))?;
    let password = form
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("password missing"))?;

    if !state.policy.uses_sessions() {
        return Err(ApiError::not_found("Not found"));
    }

    let matches = state
        .users
        .find_by(&UserFilter::email(email.as_str()))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let user = matches
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("no user found for this email"))?;

    if !user.check_password(&password) {
        tracing::debug!(user_id = %user.id, "Login rejected");
        return Err(ApiError::unauthorized("wrong password"));
    }

    let session_id = state
        .policy
        .create_session(&user.id)
        .await?
        .ok_or_else(|| ApiError::internal("session could not be created"))?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(([(header::SET_COOKIE, state.cookie.set_header(&session_id))], Json(user)))
}

/// DELETE /api/v1/auth_session/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> ApiResult<impl IntoResponse> {
    let (parts, _body) = request.into_parts();
    if !state.policy.destroy_session(Some(&parts)).await? {
        return Err(ApiError::not_found("Not found"));
    }
    Ok(([(header::SET_COOKIE, state.cookie.clear_header())], Json(json!({}))))
}

/// GET /api/v1/users
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<User>>> {
    let users = state
        .users
        .find_by(&UserFilter::default())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(users))
}

/// GET /api/v1/users/:user_id, where `me` is the authenticated user
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    current: Option<Extension<CurrentUser>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<User>> {
    if user_id == "me" {
        return current
            .map(|Extension(CurrentUser(user))| Json(user))
            .ok_or_else(|| ApiError::not_found("Not found"));
    }

    state
        .users
        .find_by_id(&user_id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Not found"))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateUserBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(body) = body.map_err(|_| ApiError::bad_request("Wrong format"))?;

    let new_user = NewUser {
        email: body
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ApiError::bad_request("email missing"))?,
        password: body
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::bad_request("password missing"))?,
        first_name: body.first_name,
        last_name: body.last_name,
    };
    new_user
        .validate()
        .map_err(|e| ApiError::bad_request(format!("Can't create User: {}", e)))?;

    let user = User::try_from(new_user).map_err(|e| ApiError::internal(e.to_string()))?;
    let user = state
        .users
        .create(user)
        .await
        .map_err(|e| ApiError::bad_request(format!("Can't create User: {}", e)))?;

    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}
