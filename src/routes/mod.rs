use axum::{Extension, Json, Router, extract::State, routing::get};
use chirp_core::controller::Controller;
use chirp_core::db::DbStatus;

use crate::app::controller::{tweets::TweetsController, users::UsersController};
use crate::app::graphql;
use crate::app::response::HealthResponse;
use crate::app::state::AppState;

/// Assemble the full application router.
///
/// Registration order mirrors the bootstrap contract: greeting route,
/// authenticator installation, GraphQL endpoint, then the REST route groups.
pub fn routes(state: AppState) -> Router {
    let authenticator = state.authenticator.clone();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/graphql",
            get(graphql::graphql_get).post(graphql::graphql_handler),
        )
        .route("/api-docs/openapi.json", get(crate::docs::openapi_json))
        .nest("/api/users", UsersController::router())
        .nest("/api/tweets", TweetsController::router())
        .layer(Extension(authenticator))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "root",
    responses((status = 200, description = "Fixed greeting", body = String))
)]
pub(crate) async fn root() -> &'static str {
    "Hello World"
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Database readiness", body = HealthResponse))
)]
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = match state.db.status().await {
        DbStatus::Connecting => HealthResponse {
            database: "connecting".to_string(),
            message: None,
        },
        DbStatus::Ready => HealthResponse {
            database: "connected".to_string(),
            message: None,
        },
        DbStatus::Failed(reason) => HealthResponse {
            database: "error".to_string(),
            message: Some(reason),
        },
    };

    Json(response)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use chirp_core::auth::Authenticator;
    use chirp_core::db::DbHandle;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::app::entity::{tweet, user};
    use crate::app::middleware::auth::{AuthUser, JwtAuthenticator};

    fn test_state(graphiql: bool) -> AppState {
        let db = DbHandle::new();

        AppState {
            db: db.clone(),
            authenticator: JwtAuthenticator::new(db.clone(), "test-secret"),
            schema: graphql::build_schema(db),
            graphiql,
        }
    }

    fn sample_user(id: i32) -> user::Model {
        user::Model {
            id,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "stored-hash".to_string(),
            created_at: "2020-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    fn sample_tweet(id: i32) -> tweet::Model {
        tweet::Model {
            id,
            user_id: 7,
            text: "hello".to_string(),
            created_at: "2020-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_serves_the_fixed_greeting() {
        let response = routes(test_state(false))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Hello World");
    }

    #[tokio::test]
    async fn serving_continues_while_the_database_is_down() {
        let state = test_state(false);
        state.db.set_failed("connection refused").await;
        let app = routes(state);

        let greeting = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(greeting.status(), StatusCode::OK);

        let tweets = app
            .oneshot(Request::get("/api/tweets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(tweets.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_reports_the_connection_failure() {
        let state = test_state(false);
        state.db.set_failed("connection refused").await;

        let response = routes(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["database"], "error");
        assert_eq!(body["message"], "connection refused");
    }

    #[tokio::test]
    async fn health_reports_pending_connection() {
        let response = routes(test_state(false))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["database"], "connecting");
    }

    #[tokio::test]
    async fn register_request_is_forwarded_to_the_users_group() {
        let state = test_state(false);
        state.db.set_failed("connection refused").await;

        // A well-formed body reaches the handler, which then degrades on the
        // missing database.
        let response = routes(state)
            .oneshot(
                Request::post("/api/users/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"ada","email":"ada@example.com","password":"s3cret"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn malformed_json_never_reaches_the_handler() {
        let response = routes(test_state(false))
            .oneshot(
                Request::post("/api/users/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn incomplete_payload_is_unprocessable() {
        let response = routes(test_state(false))
            .oneshot(
                Request::post("/api/users/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"username":"ada"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn urlencoded_login_is_parsed_flat() {
        let state = test_state(false);
        state.db.set_failed("connection refused").await;

        // Flat form parsing: the payload deserializes (reserved-token key
        // `extra[k]` stays an ignored flat key) and the handler degrades on
        // the missing database instead of rejecting the body.
        let response = routes(state)
            .oneshot(
                Request::post("/api/users/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=ada&password=s3cret&extra[k]=v"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn register_returns_a_token_for_a_new_user() {
        let state = test_state(false);
        // First result set answers the uniqueness pre-check, the second the
        // inserted row.
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new(), vec![sample_user(1)]])
            .into_connection();
        state.db.set_ready(conn).await;

        let response = routes(state)
            .oneshot(
                Request::post("/api/users/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"ada","email":"ada@example.com","password":"s3cret"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(!body["token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_as_unprocessable() {
        let state = test_state(false);
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user(1)]])
            .into_connection();
        state.db.set_ready(conn).await;

        let response = routes(state)
            .oneshot(
                Request::post("/api/users/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"ada","email":"ada@example.com","password":"s3cret"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["message"], "username already taken");
    }

    #[tokio::test]
    async fn show_tweet_returns_the_record_or_404() {
        let state = test_state(false);
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_tweet(1)], Vec::<tweet::Model>::new()])
            .into_connection();
        state.db.set_ready(conn).await;
        let app = routes(state);

        let found = app
            .clone()
            .oneshot(Request::get("/api/tweets/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);
        let body = body_json(found).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["text"], "hello");

        let missing = app
            .oneshot(Request::get("/api/tweets/2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn current_user_requires_a_bearer_token() {
        let response = routes(test_state(false))
            .oneshot(
                Request::get("/api/users/current")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn current_user_echoes_the_verified_claims() {
        let state = test_state(false);
        let token = state
            .authenticator
            .generate_token(&AuthUser {
                id: 7,
                username: "ada".to_string(),
            })
            .unwrap();

        let response = routes(state)
            .oneshot(
                Request::get("/api/users/current")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["username"], "ada");
    }

    #[tokio::test]
    async fn creating_a_tweet_requires_authentication() {
        let response = routes(test_state(false))
            .oneshot(
                Request::post("/api/tweets")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn graphiql_is_hidden_unless_enabled() {
        let response = routes(test_state(false))
            .oneshot(Request::get("/graphql").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn graphiql_is_served_when_enabled() {
        let response = routes(test_state(true))
            .oneshot(Request::get("/graphql").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_graphql_query_executes_without_the_ui() {
        let state = test_state(false);
        state.db.set_failed("connection refused").await;

        // `{ tweets { id } }`, percent-encoded. The GET surface must execute
        // queries even with the UI disabled.
        let response = routes(state)
            .oneshot(
                Request::get("/graphql?query=%7B%20tweets%20%7B%20id%20%7D%20%7D")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["errors"][0]["message"]
            .as_str()
            .unwrap()
            .contains("database unavailable"));
    }

    #[tokio::test]
    async fn get_graphql_query_executes_with_real_data() {
        let state = test_state(true);
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_tweet(1)]])
            .into_connection();
        state.db.set_ready(conn).await;

        let response = routes(state)
            .oneshot(
                Request::get("/graphql?query=%7B%20tweets%20%7B%20id%20%7D%20%7D")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["tweets"][0]["id"], 1);
    }

    #[tokio::test]
    async fn graphql_queries_execute_even_while_degraded() {
        let state = test_state(false);
        state.db.set_failed("connection refused").await;

        let response = routes(state)
            .oneshot(
                Request::post("/graphql")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"query":"{ tweets { id } }"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        // GraphQL reports resolver failures in the response body, not the
        // HTTP status.
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["errors"][0]["message"]
            .as_str()
            .unwrap()
            .contains("database unavailable"));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = routes(test_state(false))
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/api/users/register"].is_object());
        assert!(body["paths"]["/api/tweets"].is_object());
    }
}
