//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::rest::dto::{
    HealthResponse, OccupationResponse, PageResponse, ResumeRequest, ResumeResponse,
    SnapshotPayload, StepResponse, StepSubmission, ValidateRequest, ValidateResponse,
};
use crate::rest::error::{ErrorResponse, FieldErrorResponse};

/// OpenAPI documentation for the claimform REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "claimform API",
        description = "REST API for the unemployment claim wizard: step navigation, validation and occupation search.",
        license(name = "MIT")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        // Step endpoints
        crate::rest::routes::pages::list,
        // Claim endpoints
        crate::rest::routes::claims::resume,
        crate::rest::routes::claims::validate,
        crate::rest::routes::claims::submit_step,
        // Occupation endpoints
        crate::rest::routes::occupations::search,
        crate::rest::routes::occupations::get_one,
    ),
    components(
        schemas(
            // Response types
            HealthResponse,
            PageResponse,
            ResumeResponse,
            ValidateResponse,
            StepResponse,
            OccupationResponse,
            ErrorResponse,
            FieldErrorResponse,
            // Request types
            SnapshotPayload,
            ResumeRequest,
            ValidateRequest,
            StepSubmission,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Pages", description = "Wizard step listing"),
        (name = "Claims", description = "Resume, validate and submit claim steps"),
        (name = "Occupations", description = "Occupation catalog search"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }

    /// Generate the OpenAPI specification as a YAML string
    pub fn yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        assert!(spec.contains("claimform API"));
        assert!(spec.contains("/api/v1/health"));
        assert!(spec.contains("/api/v1/claims/{claimant_id}/steps/{slug}"));
        assert!(spec.contains("/api/v1/occupations/search"));
    }

    #[test]
    fn test_openapi_has_all_tags() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        for tag in ["\"Health\"", "\"Pages\"", "\"Claims\"", "\"Occupations\""] {
            assert!(spec.contains(tag), "missing tag {}", tag);
        }
    }

    #[test]
    fn test_yaml_output() {
        let spec = ApiDoc::yaml().expect("Failed to generate OpenAPI YAML");
        assert!(spec.contains("openapi:"));
    }
}
