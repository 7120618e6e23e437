//! Authentication endpoints.

use axum::{Router, extract::State, routing::post};
use lapor_common::AppResult;
use lapor_core::{AuthSession, SigninInput, SignupInput};
use lapor_db::entities::user;

use crate::{
    extractors::{AuthUser, BearerToken, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

/// Register a citizen account.
async fn signup(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignupInput>,
) -> AppResult<ApiResponse<user::Model>> {
    let user = state.user_service.signup(input).await?;
    Ok(ApiResponse::created(user).with_message("User registered"))
}

/// Sign in and receive a bearer token.
async fn signin(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SigninInput>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state.user_service.signin(input).await?;
    Ok(ApiResponse::ok(session))
}

/// Revoke the token used for this request.
async fn signout(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    BearerToken(token): BearerToken,
) -> AppResult<ApiResponse<()>> {
    state.user_service.signout(&token).await?;
    Ok(ApiResponse::message("Signed out"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
}
