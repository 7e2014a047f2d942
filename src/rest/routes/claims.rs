//! Claim session endpoints: resume, validate and submit.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::pages::PageRegistry;
use crate::progress;
use crate::reconcile::{mirror_same_fields, reconcile};
use crate::rest::dto::{
    ResumeRequest, ResumeResponse, StepResponse, StepSubmission, ValidateRequest,
    ValidateResponse,
};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::segment::{self, Segment};

/// Reconcile identity with the saved partial claim and find the resume point
#[utoipa::path(
    post,
    path = "/api/v1/claims/{claimant_id}/resume",
    tag = "Claims",
    params(
        ("claimant_id" = String, Path, description = "Claimant identifier")
    ),
    request_body = ResumeRequest,
    responses(
        (status = 200, description = "Merged snapshot and resume path", body = ResumeResponse),
        (status = 400, description = "Invalid claimant id", body = ErrorResponse),
        (status = 500, description = "Saved claim could not be read", body = ErrorResponse)
    )
)]
pub async fn resume(
    State(state): State<ApiState>,
    Path(claimant_id): Path<String>,
    Json(request): Json<ResumeRequest>,
) -> Result<Json<ResumeResponse>, ApiError> {
    let partial = state.store.load_partial(&claimant_id).await?;
    let snapshot = reconcile(&state.registry, request.identity.as_ref(), partial.as_ref());
    let resolution = progress::resolve(
        &state.registry,
        &state.schema_context(),
        &snapshot,
        state.base_path(),
    );

    tracing::info!(
        claimant = %claimant_id,
        restored = partial.is_some(),
        path = %resolution.path,
        "Resumed claim"
    );
    Ok(Json(ResumeResponse::new(
        snapshot,
        resolution,
        partial.is_some(),
    )))
}

/// Validate one step or segment without saving
#[utoipa::path(
    post,
    path = "/api/v1/claims/validate",
    tag = "Claims",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Values satisfy the step", body = ValidateResponse),
        (status = 400, description = "Malformed segment", body = ErrorResponse),
        (status = 404, description = "Unknown step", body = ErrorResponse),
        (status = 422, description = "Field errors", body = ErrorResponse)
    )
)]
pub async fn validate(
    State(state): State<ApiState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let (_, page) = state.registry.find(&request.page)?;
    let segment = Segment::from_token(request.segment.as_deref())?;
    let snapshot = request.snapshot.into_snapshot();

    page.schema_for(&state.schema_context(), segment)
        .validate(&snapshot)?;
    Ok(Json(ValidateResponse { valid: true }))
}

/// Validate a step, compute navigation, and save the claim
#[utoipa::path(
    post,
    path = "/api/v1/claims/{claimant_id}/steps/{slug}",
    tag = "Claims",
    params(
        ("claimant_id" = String, Path, description = "Claimant identifier"),
        ("slug" = String, Path, description = "Step slug")
    ),
    request_body = StepSubmission,
    responses(
        (status = 200, description = "Accepted; next path and save outcome", body = StepResponse),
        (status = 400, description = "Malformed segment or claimant id", body = ErrorResponse),
        (status = 404, description = "Unknown step", body = ErrorResponse),
        (status = 422, description = "Field errors", body = ErrorResponse)
    )
)]
pub async fn submit_step(
    State(state): State<ApiState>,
    Path((claimant_id, slug)): Path<(String, String)>,
    Json(submission): Json<StepSubmission>,
) -> Result<Json<StepResponse>, ApiError> {
    let (index, page) = state.registry.find(&slug)?;
    let segment = Segment::from_token(submission.segment.as_deref())?;
    let mut snapshot = submission.snapshot.into_snapshot();
    let ctx = state.schema_context();

    page.schema_for(&ctx, segment).validate(&snapshot)?;
    mirror_same_fields(&mut snapshot);

    let base = state.base_path();
    let next_path = segment::next_path(&state.registry, base, index, segment, &snapshot);
    let previous_path = segment::previous_path(&state.registry, base, index, segment, &snapshot);
    let completed = reaches_end(&state.registry, base, &next_path)
        && progress::resolve(&state.registry, &ctx, &snapshot, base).is_complete();

    let persistence_error = match state
        .store
        .save(&claimant_id, snapshot.persisted(), completed)
        .await
    {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(claimant = %claimant_id, error = %e, "Failed to save claim");
            Some(e.to_string())
        }
    };

    Ok(Json(StepResponse {
        next_path,
        previous_path,
        completed,
        claim: snapshot.claim.into_value(),
        persistence_error,
    }))
}

fn reaches_end(registry: &PageRegistry, base: &str, path: &str) -> bool {
    path == registry.final_path(base)
}
