use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, TokenResponse, UpdatePasswordRequest},
        services,
    },
    error::{json_body, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/update-password", post(update_password))
}

#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<&'static str> {
    services::signup(state.users.as_ref(), json_body(body)?).await?;
    Ok("User created successfully")
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let token = services::login(state.users.as_ref(), &state.jwt, json_body(body)?).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state, body))]
pub async fn update_password(
    State(state): State<AppState>,
    body: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> AppResult<&'static str> {
    services::update_password(state.users.as_ref(), json_body(body)?).await?;
    Ok("Password updated successfully")
}
