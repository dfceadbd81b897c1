//! Team maker endpoints

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get},
    Router,
};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, CohortParams, CreateTeamBody, Json, TeamResponse};

/// Header carrying the request token when the body has none
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

pub fn create_teammaker_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route("/reset", delete(reset_teams))
}

/// GET /teammaker?cohort=<id>
pub async fn list_teams(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    debug!(cohort = ?params.cohort, "Listing teams");

    let teams = state.team_maker.list(params.cohort.as_deref()).await?;

    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// POST /teammaker
pub async fn create_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateTeamBody>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let header_token = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let request = body.into_request(header_token);

    debug!(
        cohort_id = ?request.cohort,
        students = request.students.len(),
        group_project = ?request.group_project,
        "Creating team"
    );

    let details = state.team_maker.create(request).await?;

    info!(team_id = %details.team.id(), "Team create request completed");
    Ok((StatusCode::CREATED, Json(TeamResponse::from(&details))))
}

/// DELETE /teammaker/reset?cohort=<id>
pub async fn reset_teams(
    State(state): State<AppState>,
    Query(params): Query<CohortParams>,
) -> Result<StatusCode, ApiError> {
    debug!(cohort = ?params.cohort, "Resetting cohort teams");

    state.team_maker.reset(params.cohort.as_deref()).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::create_router;
    use crate::api::state::AppState;
    use crate::domain::provider::mock::{MockChatProvider, MockSourceHost};
    use crate::domain::team::mock::FailingTeamStore;
    use crate::domain::{Cohort, CohortId, Project, ProjectId, Student, StudentId};
    use crate::infrastructure::catalog::InMemoryCatalog;
    use crate::infrastructure::event_bus::InMemoryEventPublisher;
    use crate::domain::team::MembershipRepository;
    use crate::infrastructure::team::{InMemoryTeamStore, TeamMakerDependencies, TeamMakerService};

    use super::*;

    struct TestApp {
        router: Router,
        store: Arc<InMemoryTeamStore>,
        chat: Arc<MockChatProvider>,
        source_host: Arc<MockSourceHost>,
        events: Arc<InMemoryEventPublisher>,
    }

    fn catalog() -> Arc<InMemoryCatalog> {
        Arc::new(InMemoryCatalog::with_data(
            vec![Cohort::new(
                CohortId::new(3),
                "Day Cohort 50",
                "C0COHORT",
                "https://github.com/nss-50",
            )],
            vec![
                Project::new(
                    ProjectId::new(10),
                    "Test Group Project",
                    "https://github.com/templates/client-template",
                ),
                Project::new(
                    ProjectId::new(11),
                    "Full Stack",
                    "https://github.com/templates/client-template",
                )
                .with_api_template("https://github.com/templates/api-template"),
            ],
            vec![
                Student::new(StudentId::new(7), "Ada", "ada-gh", "U7"),
                Student::new(StudentId::new(8), "Grace", "grace-gh", "U8"),
                Student::new(StudentId::new(9), "Coach", "coach-gh", "U9").staff(),
            ],
        ))
    }

    fn test_app_with(chat: MockChatProvider, source_host: MockSourceHost) -> TestApp {
        let catalog = catalog();
        let store = Arc::new(InMemoryTeamStore::new());
        let chat = Arc::new(chat);
        let source_host = Arc::new(source_host);
        let events = Arc::new(InMemoryEventPublisher::new());

        let service = TeamMakerService::new(TeamMakerDependencies {
            cohorts: catalog.clone(),
            projects: catalog.clone(),
            students: catalog.clone(),
            teams: store.clone(),
            memberships: store.clone(),
            repositories: store.clone(),
            chat: chat.clone(),
            source_host: source_host.clone(),
            events: events.clone(),
        });

        TestApp {
            router: create_router(AppState::new(Arc::new(service), catalog)),
            store,
            chat,
            source_host,
            events,
        }
    }

    fn test_app() -> TestApp {
        test_app_with(MockChatProvider::new(), MockSourceHost::new())
    }

    async fn body_json(body: Body) -> Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/teammaker")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_without_project_returns_201() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(post_json(json!({
                "cohort": 3,
                "students": [7, 8, 9],
                "weeklyPrefix": "Capstone"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response.into_body()).await;

        assert_eq!(body["cohort"], 3);
        assert_eq!(body["sprint_team"], false);
        assert_eq!(body["slack_channel"], "C1");
        assert!(body["group_name"].as_str().unwrap().starts_with("capstone-50-"));
        assert_eq!(
            body["students"],
            json!([{"id": 7, "name": "Ada"}, {"id": 8, "name": "Grace"}])
        );
        assert_eq!(body["repositories"], json!([]));
        assert_eq!(app.store.membership_count().await, 3);
    }

    #[tokio::test]
    async fn test_create_with_project_records_repository() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(post_json(json!({
                "cohort": "3",
                "students": [7, 8],
                "groupProject": 10,
                "weeklyPrefix": "w3"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response.into_body()).await;

        assert_eq!(body["sprint_team"], true);
        let repositories = body["repositories"].as_array().unwrap();
        assert_eq!(repositories.len(), 1);
        assert_eq!(repositories[0]["project"], 10);
        assert!(repositories[0]["repository"]
            .as_str()
            .unwrap()
            .starts_with("https://github.com/nss-50/Test-Group-Project-client-"));
        assert_eq!(app.events.published().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_invalid_cohort_returns_400() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(post_json(json!({"cohort": 999, "students": [7]})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"message": "Invalid cohort ID"})
        );
        assert!(app.chat.created().is_empty());
        assert_eq!(app.store.team_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_with_unknown_project_returns_400() {
        let app = test_app();

        let response = app
            .router
            .clone()
            .oneshot(post_json(json!({"cohort": 3, "students": [7], "groupProject": 404})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"message": "Invalid project ID"})
        );
        assert_eq!(app.store.team_count().await, 1);
    }

    #[tokio::test]
    async fn test_secondary_repository_failure_returns_500() {
        let app = test_app_with(
            MockChatProvider::new(),
            MockSourceHost::new().with_statuses([201, 422]),
        );

        let response = app
            .router
            .clone()
            .oneshot(post_json(json!({"cohort": 3, "students": [7], "groupProject": 11})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"message": "Failed to create api repository"})
        );
        assert_eq!(app.store.repository_count().await, 1);
        assert_eq!(app.source_host.repositories().len(), 2);
        assert!(app.events.published().await.is_empty());
    }

    #[tokio::test]
    async fn test_channel_failure_returns_500() {
        let app = test_app_with(MockChatProvider::new().failing_create(), MockSourceHost::new());

        let response = app
            .router
            .clone()
            .oneshot(post_json(json!({"cohort": 3, "students": [7]})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.store.team_count().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_body_returns_400() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/teammaker")
            .header("content-type", "application/json")
            .body(Body::from("{\"cohort\": 3, \"students\": \"nope\"}"))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response.into_body()).await;
        assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON data"));
    }

    #[tokio::test]
    async fn test_idempotency_key_header_fixes_names() {
        let first = test_app();
        let second = test_app();

        let request = |key: &str| {
            Request::builder()
                .method("POST")
                .uri("/teammaker")
                .header("content-type", "application/json")
                .header(IDEMPOTENCY_KEY_HEADER, key)
                .body(Body::from(json!({"cohort": 3, "students": [7]}).to_string()))
                .unwrap()
        };

        let a = body_json(
            first.router.clone().oneshot(request("retry-1")).await.unwrap().into_body(),
        )
        .await;
        let b = body_json(
            second.router.clone().oneshot(request("retry-1")).await.unwrap().into_body(),
        )
        .await;

        assert_eq!(a["group_name"], b["group_name"]);
    }

    #[tokio::test]
    async fn test_list_returns_newest_first() {
        let app = test_app();

        for _ in 0..2 {
            let response = app
                .router
                .clone()
                .oneshot(post_json(json!({"cohort": 3, "students": [7]})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app.router.clone().oneshot(get("/teammaker?cohort=3")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_list_unknown_or_missing_cohort_returns_404() {
        let app = test_app();

        for uri in ["/teammaker?cohort=999", "/teammaker?cohort=abc", "/teammaker"] {
            let response = app.router.clone().oneshot(get(uri)).await.unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(
                body_json(response.into_body()).await,
                json!({"message": "Cohort matching query does not exist"})
            );
        }
    }

    #[tokio::test]
    async fn test_reset_removes_teams_and_channels() {
        let app = test_app();

        app.router
            .clone()
            .oneshot(post_json(json!({"cohort": 3, "students": [7, 8], "groupProject": 10})))
            .await
            .unwrap();

        let response = app
            .router
            .clone()
            .oneshot(delete("/teammaker/reset?cohort=3"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(app.chat.deleted(), vec!["C1".to_string()]);
        assert_eq!(app.store.team_count().await, 0);
        assert_eq!(app.store.membership_count().await, 0);
        assert_eq!(app.store.repository_count().await, 0);
    }

    #[tokio::test]
    async fn test_reset_status_codes() {
        let app = test_app();

        let missing = app.router.clone().oneshot(delete("/teammaker/reset")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(missing.into_body()).await,
            json!({"message": "No cohort ID provided"})
        );

        let unknown = app
            .router
            .clone()
            .oneshot(delete("/teammaker/reset?cohort=999"))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_retry_with_idempotency_key_resumes_team() {
        let app = test_app_with(
            MockChatProvider::new(),
            MockSourceHost::new().with_statuses([201, 422]),
        );
        let request = || {
            Request::builder()
                .method("POST")
                .uri("/teammaker")
                .header("content-type", "application/json")
                .header(IDEMPOTENCY_KEY_HEADER, "retry-1")
                .body(Body::from(
                    json!({"cohort": 3, "students": [7, 8], "groupProject": 11}).to_string(),
                ))
                .unwrap()
        };

        let failed = app.router.clone().oneshot(request()).await.unwrap();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let retried = app.router.clone().oneshot(request()).await.unwrap();
        assert_eq!(retried.status(), StatusCode::CREATED);

        let body = body_json(retried.into_body()).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["repositories"].as_array().unwrap().len(), 2);
        assert_eq!(app.store.team_count().await, 1);
        assert_eq!(app.chat.created().len(), 1);
        assert_eq!(app.events.published().await.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_storage_failure_returns_500() {
        let catalog = catalog();
        let store = Arc::new(InMemoryTeamStore::new());
        let chat = Arc::new(MockChatProvider::new());
        let service = |memberships: Arc<dyn MembershipRepository>| {
            TeamMakerService::new(TeamMakerDependencies {
                cohorts: catalog.clone(),
                projects: catalog.clone(),
                students: catalog.clone(),
                teams: store.clone(),
                memberships,
                repositories: store.clone(),
                chat: chat.clone(),
                source_host: Arc::new(MockSourceHost::new()),
                events: Arc::new(InMemoryEventPublisher::new()),
            })
        };

        let stored: Arc<dyn MembershipRepository> = store.clone();
        let seeded = create_router(AppState::new(Arc::new(service(stored)), catalog.clone()));
        let created = seeded
            .oneshot(post_json(json!({"cohort": 3, "students": [7, 8], "groupProject": 10})))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let failing_memberships: Arc<dyn MembershipRepository> = Arc::new(FailingTeamStore);
        let failing = create_router(AppState::new(
            Arc::new(service(failing_memberships)),
            catalog.clone(),
        ));
        let response = failing
            .oneshot(delete("/teammaker/reset?cohort=3"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"message": "Storage error: Mock store configured to fail"})
        );
        assert_eq!(store.team_count().await, 1);
        assert_eq!(store.membership_count().await, 2);
        assert_eq!(store.repository_count().await, 1);
    }
}
