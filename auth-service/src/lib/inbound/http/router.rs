use std::sync::Arc;
use std::time::Duration;

use auth::Role;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin::admin_ping;
use super::handlers::health::healthz;
use super::handlers::health::readyz;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_role;
use super::middleware::AllowedRoles;
use crate::authentication::ports::AuthServicePort;

const ADMIN_ONLY: AllowedRoles = AllowedRoles(&[Role::Admin]);

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
}

pub fn create_router(auth_service: Arc<dyn AuthServicePort>) -> Router {
    let state = AppState { auth_service };

    let public_routes = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/refresh", post(refresh));

    let admin_routes = Router::new()
        .route("/v1/auth/admin/ping", get(admin_ping))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_role));

    // The identity layer wraps the role gate, so it runs first
    let protected_routes = Router::new()
        .route("/v1/auth/logout", post(logout))
        .route("/v1/auth/me", get(me))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::Authenticator;
    use auth::PasswordHasher;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use mockall::mock;
    use serde_json::json;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::authentication::errors::AuthError;
    use crate::authentication::models::Identity;
    use crate::authentication::models::RegisterCommand;
    use crate::authentication::models::TokenPair;
    use crate::authentication::service::AuthService;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::UserId;
    use crate::domain::user::ports::UserRepository;
    use crate::outbound::repositories::InMemoryRefreshTokenRepository;
    use crate::outbound::repositories::InMemoryUserRepository;

    mock! {
        pub TestAuthService {}

        #[async_trait]
        impl AuthServicePort for TestAuthService {
            async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError>;
            async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError>;
            async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
            async fn logout(&self, user_id: UserId) -> Result<(), AuthError>;
            async fn verify_token(&self, token: &str) -> Result<Identity, AuthError>;
            async fn check_ready(&self) -> Result<(), AuthError>;
        }
    }

    fn app() -> (Router, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let service = AuthService::new(
            users.clone(),
            Arc::new(InMemoryRefreshTokenRepository::new()),
            Authenticator::new(
                b"router-test-secret-of-at-least-32-bytes",
                chrono::Duration::minutes(15),
                PasswordHasher::with_params(8, 1, 1).unwrap(),
            ),
            chrono::Duration::days(30),
        );
        (create_router(Arc::new(service)), users)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn register(app: &Router, email: &str, role: Option<&str>) -> Value {
        let (status, body) = send(
            app,
            post_json(
                "/v1/auth/register",
                json!({ "email": email, "password": "password123", "role": role }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }

    #[tokio::test]
    async fn test_healthz() {
        let (app, _) = app();

        let (status, body) = send(
            &app,
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "auth-service");
    }

    #[tokio::test]
    async fn test_readyz_reports_store_state() {
        let (app, _) = app();
        let ready = Request::builder().uri("/readyz").body(Body::empty()).unwrap();
        assert_eq!(send(&app, ready).await.0, StatusCode::OK);

        let mut failing = MockTestAuthService::new();
        failing
            .expect_check_ready()
            .times(1)
            .returning(|| Err(AuthError::Internal("pool closed".to_string())));
        let app = create_router(Arc::new(failing));

        let (status, body) = send(
            &app,
            Request::builder().uri("/readyz").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not_ready");
    }

    #[tokio::test]
    async fn test_register_then_me() {
        let (app, _) = app();

        let tokens = register(&app, "courier@example.com", Some("courier")).await;
        assert_eq!(tokens["token_type"], "Bearer");
        assert_eq!(tokens["expires_in"], 900);

        let access = tokens["access_token"].as_str().unwrap();
        let (status, body) = send(&app, get_with_token("/v1/auth/me", access)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["role"], "courier");
        assert_eq!(body["data"]["user_id"], 1);
    }

    #[tokio::test]
    async fn test_register_rejects_admin_and_bad_input() {
        let (app, _) = app();

        for body in [
            json!({ "email": "a@example.com", "password": "password123", "role": "admin" }),
            json!({ "email": "a@example.com", "password": "short" }),
            json!({ "email": "nope", "password": "password123" }),
        ] {
            let (status, body) = send(&app, post_json("/v1/auth/register", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["status_code"], 400);
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let (app, _) = app();
        register(&app, "dup@example.com", None).await;

        let (status, _) = send(
            &app,
            post_json(
                "/v1/auth/register",
                json!({ "email": "DUP@example.com", "password": "password123" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_match() {
        let (app, _) = app();
        register(&app, "alice@example.com", None).await;

        let wrong_password = send(
            &app,
            post_json(
                "/v1/auth/login",
                json!({ "email": "alice@example.com", "password": "incorrect" }),
            ),
        )
        .await;
        let unknown_email = send(
            &app,
            post_json(
                "/v1/auth/login",
                json!({ "email": "nobody@example.com", "password": "password123" }),
            ),
        )
        .await;

        assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let (app, _) = app();

        let missing = Request::builder()
            .uri("/v1/auth/me")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, missing).await.0, StatusCode::UNAUTHORIZED);

        let garbage = get_with_token("/v1/auth/me", "not-a-token");
        assert_eq!(send(&app, garbage).await.0, StatusCode::UNAUTHORIZED);

        let logout = Request::builder()
            .method("POST")
            .uri("/v1/auth/logout")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, logout).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_gate() {
        let (app, users) = app();

        let tokens = register(&app, "ops@example.com", None).await;
        let user_access = tokens["access_token"].as_str().unwrap().to_string();
        let (status, _) = send(&app, get_with_token("/v1/auth/admin/ping", &user_access)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        users
            .update_role(&EmailAddress::new("ops@example.com").unwrap(), Role::Admin)
            .await
            .unwrap();
        let (_, refreshed) = send(
            &app,
            post_json(
                "/v1/auth/refresh",
                json!({ "refresh_token": tokens["refresh_token"] }),
            ),
        )
        .await;
        let admin_access = refreshed["data"]["access_token"].as_str().unwrap();

        let (status, body) = send(&app, get_with_token("/v1/auth/admin/ping", admin_access)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "pong");
    }

    #[tokio::test]
    async fn test_logout_revokes_refresh_tokens() {
        let (app, _) = app();
        let tokens = register(&app, "bye@example.com", None).await;
        let access = tokens["access_token"].as_str().unwrap();

        let logout = Request::builder()
            .method("POST")
            .uri("/v1/auth/logout")
            .header("authorization", format!("Bearer {}", access))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, logout).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(
            &app,
            post_json(
                "/v1/auth/refresh",
                json!({ "refresh_token": tokens["refresh_token"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
