//! REST API for the claim wizard.
//!
//! Exposes the step list, session resume, step validation and submission,
//! and occupation search over HTTP.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Default port for the REST API server
pub const DEFAULT_PORT: u16 = 7008;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        // Step endpoints
        .route("/api/v1/pages", get(routes::pages::list))
        // Claim endpoints
        .route(
            "/api/v1/claims/validate",
            post(routes::claims::validate),
        )
        .route(
            "/api/v1/claims/:claimant_id/resume",
            post(routes::claims::resume),
        )
        .route(
            "/api/v1/claims/:claimant_id/steps/:slug",
            post(routes::claims::submit_step),
        )
        // Occupation endpoints
        .route(
            "/api/v1/occupations/search",
            get(routes::occupations::search),
        )
        .route(
            "/api/v1/occupations/:code",
            get(routes::occupations::get_one),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server, stopping on Ctrl-C
pub async fn serve(state: ApiState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("REST API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down REST API");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pages::steps::fixtures::complete_claim;
    use crate::store::MemoryClaimStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = ApiState::with_store(Config::default(), Arc::new(MemoryClaimStore::new()))
            .with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        build_router(state)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_build_router() {
        let _router = test_router();
    }

    #[tokio::test]
    async fn test_health_route() {
        let request = Request::get("/api/v1/health").body(Body::empty()).unwrap();
        let (status, body) = send(test_router(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_pages_route_lists_every_step() {
        let request = Request::get("/api/v1/pages").body(Body::empty()).unwrap();
        let (status, body) = send(test_router(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 12);
        assert_eq!(body[0]["slug"], "personal");
    }

    #[tokio::test]
    async fn test_validate_route_returns_422_with_fields() {
        let request = post_json(
            "/api/v1/claims/validate",
            json!({"page": "identity", "snapshot": {"claim": {"ssn": "12"}}}),
        );
        let (status, body) = send(test_router(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["fields"][0]["path"], "ssn");
    }

    #[tokio::test]
    async fn test_unknown_step_is_404() {
        let request = post_json(
            "/api/v1/claims/c-1/steps/nope",
            json!({"snapshot": {"claim": {}}}),
        );
        let (status, _) = send(test_router(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_then_resume_lands_on_next_step() {
        let router = test_router();
        let mut claim = complete_claim();
        claim["other_pay"] = json!([]);

        let request = post_json(
            "/api/v1/claims/c-7/steps/personal",
            json!({"snapshot": {"claim": claim}}),
        );
        let (status, body) = send(router.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["next_path"], "/claim/contact/");
        assert_eq!(body["completed"], false);

        let request = post_json("/api/v1/claims/c-7/resume", json!({}));
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["restored"], true);
        assert_eq!(body["path"], "/claim/other-pay/");
    }

    #[tokio::test]
    async fn test_occupation_routes() {
        let request = Request::get("/api/v1/occupations/search?q=registered%20nurse")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(test_router(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["code"], "29-1141.00");

        let request = Request::get("/api/v1/occupations/29-1141.00")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(test_router(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "29-1141.00");
    }
}
