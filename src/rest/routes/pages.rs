//! Step registry endpoint.

use axum::{extract::State, Json};

use crate::rest::dto::PageResponse;
use crate::rest::state::ApiState;

/// List every step in navigation order
#[utoipa::path(
    get,
    path = "/api/v1/pages",
    tag = "Pages",
    responses(
        (status = 200, description = "Steps in navigation order", body = Vec<PageResponse>)
    )
)]
pub async fn list(State(state): State<ApiState>) -> Json<Vec<PageResponse>> {
    let pages = state
        .registry
        .pages()
        .iter()
        .enumerate()
        .map(|(index, page)| PageResponse::new(index, page))
        .collect();
    Json(pages)
}
