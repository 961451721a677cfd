use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{ApiResponse, LoginOut, LoginRequest, UserIn, UserOut},
        services::{login_user, register_user},
    },
    error::{AuthError, FieldError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/login", post(login))
}

fn body_error(rejection: JsonRejection) -> AuthError {
    AuthError::Validation(vec![FieldError::new("body", rejection.body_text())])
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserIn>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserOut>>), AuthError> {
    let Json(payload) = payload.map_err(body_error)?;
    let user = register_user(state.store.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED,
            "User created successfully",
            user,
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginOut>>, AuthError> {
    let Json(payload) = payload.map_err(body_error)?;
    let out = login_user(state.store.as_ref(), &state.config.jwt, payload).await?;
    Ok(Json(ApiResponse::new(
        StatusCode::OK,
        "Successfully logged in",
        out,
    )))
}
