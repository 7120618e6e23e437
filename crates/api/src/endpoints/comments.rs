//! Comment endpoints.

use axum::{Router, extract::State, routing::post};
use lapor_common::AppResult;
use lapor_core::CreateCommentInput;
use serde::Serialize;

use crate::{
    extractors::{AuthUser, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Serialize)]
pub struct CommentCreated {
    pub id: String,
}

async fn create(
    State(state): State<AppState>,
    AuthUser(author): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentCreated>> {
    let comment = state.comment_service.create(&author, input).await?;
    Ok(ApiResponse::created(CommentCreated { id: comment.id }).with_message("Comment added"))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create))
}
