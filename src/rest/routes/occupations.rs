//! Occupation catalog endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::rest::dto::{OccupationQuery, OccupationResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// Rank catalog occupations against free text
#[utoipa::path(
    get,
    path = "/api/v1/occupations/search",
    tag = "Occupations",
    params(OccupationQuery),
    responses(
        (status = 200, description = "Matches, best first", body = Vec<OccupationResponse>)
    )
)]
pub async fn search(
    State(state): State<ApiState>,
    Query(query): Query<OccupationQuery>,
) -> Json<Vec<OccupationResponse>> {
    let cap = state.config.wizard.occupation_results;
    let limit = query.limit.map_or(cap, |limit| limit.min(cap));

    let results = state
        .catalog
        .search(&query.q)
        .into_iter()
        .take(limit)
        .map(OccupationResponse::from)
        .collect();
    Json(results)
}

/// Get a single occupation by SOC code
#[utoipa::path(
    get,
    path = "/api/v1/occupations/{code}",
    tag = "Occupations",
    params(
        ("code" = String, Path, description = "SOC code, e.g. 29-1141.00")
    ),
    responses(
        (status = 200, description = "Occupation details", body = OccupationResponse),
        (status = 404, description = "Unknown code", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(code): Path<String>,
) -> Result<Json<OccupationResponse>, ApiError> {
    let occupation = state
        .catalog
        .get(&code)
        .ok_or_else(|| ApiError::NotFound(format!("Occupation '{}' not found", code)))?;
    Ok(Json(OccupationResponse::from(occupation)))
}
