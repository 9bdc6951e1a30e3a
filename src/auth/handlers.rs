use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{dto::AuthSession, jwt::JwtKeys, services},
    error::AppResult,
    extract::JsonBody,
    openapi::{AuthEnvelope, ErrorEnvelope, LoginRequest, RegisterRequest},
    response::ApiResponse,
    state::AppState,
    validation::auth::{validate_login, validate_register},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[utoipa::path(
    post, path = "/api/auth/register", tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthEnvelope),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 409, description = "Email already registered", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthSession>>)> {
    let input = validate_register(&body)?;
    let keys = JwtKeys::from_ref(&state);
    let session = services::register(state.users.as_ref(), &keys, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("User registered successfully", session)),
    ))
}

#[utoipa::path(
    post, path = "/api/auth/login", tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthEnvelope),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Invalid email or password", body = ErrorEnvelope)
    )
)]
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<AuthSession>>> {
    let input = validate_login(&body)?;
    let keys = JwtKeys::from_ref(&state);
    let session = services::login(state.users.as_ref(), &keys, input).await?;
    Ok(Json(ApiResponse::with_message("Login successful", session)))
}
