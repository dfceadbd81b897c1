use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;
use super::teammaker;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/teammaker", teammaker::create_teammaker_router())
        .with_state(state)
        // Last layer added runs first: the request id exists before tracing and logging
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::provider::mock::{MockChatProvider, MockSourceHost};
    use crate::infrastructure::catalog::InMemoryCatalog;
    use crate::infrastructure::event_bus::InMemoryEventPublisher;
    use crate::infrastructure::team::{InMemoryTeamStore, TeamMakerDependencies, TeamMakerService};

    fn test_router() -> Router {
        let catalog = Arc::new(InMemoryCatalog::new());
        let store = Arc::new(InMemoryTeamStore::new());
        let service = TeamMakerService::new(TeamMakerDependencies {
            cohorts: catalog.clone(),
            projects: catalog.clone(),
            students: catalog.clone(),
            teams: store.clone(),
            memberships: store.clone(),
            repositories: store,
            chat: Arc::new(MockChatProvider::new()),
            source_host: Arc::new(MockSourceHost::new()),
            events: Arc::new(InMemoryEventPublisher::new()),
        });

        create_router(AppState::new(Arc::new(service), catalog))
    }

    #[tokio::test]
    async fn test_health_check() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_check_reports_storage() {
        let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["checks"][0]["name"], "storage");
    }

    #[tokio::test]
    async fn test_live_check() {
        let request = Request::builder().uri("/live").body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let request = Request::builder().uri("/live").body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        let id = response.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let request = Request::builder()
            .uri("/live")
            .header("x-request-id", "caller-supplied")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "caller-supplied");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let request = Request::builder().uri("/v1/models").body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
