use actix_web::{web, HttpResponse};

use crate::api::AppState;
use crate::models::CommentResponse;
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/comments",
    tag = "Comments",
    responses(
        (status = 200, description = "All comments, stored fields passed through", body = [CommentResponse])
    )
)]
pub async fn list_comments(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let comments = state.store.find_comments().await?;
    let comments: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();
    Ok(HttpResponse::Ok().json(comments))
}
