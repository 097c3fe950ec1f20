use std::sync::Arc;

use axum::{
    http::Method,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::db::SharedDb;
use crate::fragments::Fragments;
use crate::notify::NotificationHub;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::{staff, submissions, validation, ws};

#[derive(Clone)]
pub struct AppState {
    pub db: SharedDb,
    pub hub: NotificationHub,
    pub fragments: Arc<Fragments>,
    pub rate_limiter: RateLimiter,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    // Only the keystroke-driven routes are throttled.
    let validation_routes = Router::new()
        .route("/validate/:field", post(validation::validate_core))
        .route("/accounts/validate/:field", post(validation::validate_accounts))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/contact", post(submissions::submit_contact))
        .route("/newsletter/subscribe", post(submissions::subscribe_newsletter))
        .route("/api/pending-contacts-count", get(staff::pending_count))
        .route("/api/contacts", get(staff::list_contacts))
        .route("/api/contacts/:id/resolve", post(staff::resolve_contact))
        .route("/api/dashboard", get(staff::dashboard))
        .route("/ws/notifications", get(ws::notifications))
        .merge(validation_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use enquire_shared::protocol::ServerMessage;
    use enquire_store::{Database, NewUser};

    use super::*;
    use crate::auth::Actor;

    const ADMIN: &str = "test-admin-token";

    struct Harness {
        _dir: tempfile::TempDir,
        state: AppState,
    }

    fn harness() -> Harness {
        harness_with_limit(100.0, 100.0)
    }

    fn harness_with_limit(rate: f64, burst: f64) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("app.db")).unwrap();
        let config = ServerConfig {
            admin_token: Some(ADMIN.into()),
            ..ServerConfig::default()
        };
        let state = AppState {
            db: SharedDb::new(db),
            hub: NotificationHub::new(config.notify_buffer),
            fragments: Arc::new(Fragments::new().unwrap()),
            rate_limiter: RateLimiter::new(rate, burst),
            config: Arc::new(config),
        };
        Harness { _dir: dir, state }
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", "203.0.113.5")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, String) {
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness();
        let (status, body) = send(&h.state, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_blank_value_renders_nothing() {
        let h = harness();
        let (status, body) = send(&h.state, form_post("/validate/name", "name=%20%20")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        let (status, body) = send(&h.state, form_post("/accounts/validate/username", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[derive(Clone, Default)]
    struct LogCapture(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogCapture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn test_blank_value_is_not_logged() {
        let h = harness();
        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        send(&h.state, form_post("/validate/name", "name=%20")).await;
        assert!(!capture.contents().contains("validation attempt"));

        send(&h.state, form_post("/validate/name", "name=Ada+Lovelace")).await;
        let logs = capture.contents();
        assert!(logs.contains("validation attempt"));
        assert!(logs.contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_broken_store_degrades_to_error_fragment() {
        let h = harness();
        h.state
            .db
            .call(|db| Ok(db.conn().execute_batch("DROP TABLE sessions; DROP TABLE users;")?))
            .await
            .unwrap();

        let (status, body) = send(&h.state, form_post("/accounts/validate/username", "username=valid_user1")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("invalid-feedback"));
        assert!(body.contains("Validation failed"));

        // Blank input never reaches the store.
        let (status, body) = send(&h.state, form_post("/accounts/validate/username", "username=")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_body_renders_error_fragment() {
        let h = harness();
        let request = Request::post("/validate/name")
            .header("x-forwarded-for", "203.0.113.5")
            .body(Body::from("name=Ada"))
            .unwrap();
        let (status, body) = send(&h.state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Validation failed"));

        let (status, _) = send(&h.state, form_post("/validate/shoe-size", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validation_fragments() {
        let h = harness();

        let (_, body) = send(&h.state, form_post("/accounts/validate/username", "username=admin")).await;
        assert!(body.contains("invalid-feedback"));
        assert!(body.contains("reserved"));

        let (_, body) = send(&h.state, form_post("/accounts/validate/username", "username=valid_user1")).await;
        assert!(body.contains("valid-feedback"));

        let (_, body) = send(&h.state, form_post("/validate/phone-number", "phone_number=555-867-5309")).await;
        assert!(body.contains("valid-feedback"));

        let (_, body) = send(&h.state, form_post("/validate/email", "email=user%40example.com")).await;
        assert!(body.contains("invalid-feedback"));
    }

    #[tokio::test]
    async fn test_password_routes() {
        let h = harness();

        let (_, body) = send(&h.state, form_post("/accounts/validate/password1", "password1=password")).await;
        assert!(body.contains("password-strength"));
        assert!(body.contains("One uppercase letter"));

        let (_, body) = send(
            &h.state,
            form_post("/accounts/validate/password2", "password1=abc123&password2=abc124"),
        )
        .await;
        assert!(body.contains("Passwords do not match"));

        let (_, body) = send(&h.state, form_post("/accounts/validate/password2", "password2=xyz")).await;
        assert!(body.contains("warning-feedback"));
        assert!(body.contains("Enter password first"));
    }

    #[tokio::test]
    async fn test_unknown_field_is_not_found() {
        let h = harness();
        let (status, _) = send(&h.state, form_post("/validate/shoe-size", "shoe-size=42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validation_is_rate_limited() {
        let h = harness_with_limit(0.001, 2.0);
        for _ in 0..2 {
            let (status, _) = send(&h.state, form_post("/validate/name", "name=Ada")).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, _) = send(&h.state, form_post("/validate/name", "name=Ada")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

        // Other routes are not throttled.
        let (status, _) = send(&h.state, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_staff_api_requires_privilege() {
        let h = harness();

        let anonymous = Request::get("/api/pending-contacts-count").body(Body::empty()).unwrap();
        let (status, body) = send(&h.state, anonymous).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("\"error\""));

        let member = h
            .state
            .db
            .call(|db| {
                let user = db.insert_user(&NewUser {
                    username: "ada".into(),
                    email: "ada@analytical.org".into(),
                    ..Default::default()
                })?;
                db.create_session(user.id)
            })
            .await
            .unwrap();
        let request = Request::get("/api/contacts")
            .header(header::COOKIE, format!("session={}", member.token))
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&h.state, request).await.0, StatusCode::FORBIDDEN);

        let request = Request::get("/api/pending-contacts-count")
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"pending_count":0,"total_count":0}"#);
    }

    #[tokio::test]
    async fn test_anonymous_socket_is_refused() {
        let h = harness();
        let request = Request::get("/ws/notifications")
            .header(header::CONNECTION, "upgrade")
            .header(header::UPGRADE, "websocket")
            .header("sec-websocket-version", "13")
            .header("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ==")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&h.state, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(h.state.hub.listeners(), 0);
    }

    #[tokio::test]
    async fn test_contact_submission_notifies_staff() {
        let h = harness();
        let mut watcher = h.state.hub.subscribe(&Actor::Service).unwrap();

        let (status, body) = send(
            &h.state,
            form_post(
                "/contact",
                "name=Ada+Lovelace&email=ada%40analytical.org&subject=Engine+question\
                 &message=How+many+cards+does+the+engine+read%3F&category=support",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Reference ID: #1"));

        let Some(ServerMessage::NewContact { data }) = watcher.recv().await else {
            panic!("expected new_contact");
        };
        assert_eq!(data.category_label, "Technical Support");
        assert_eq!(data.pending_count, 1);
        assert!(matches!(
            watcher.recv().await,
            Some(ServerMessage::CountUpdate { .. })
        ));

        // Resolving broadcasts the refreshed counts.
        let request = Request::post("/api/contacts/1/resolve")
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"is_resolved\":true"));

        let Some(ServerMessage::CountUpdate { data }) = watcher.recv().await else {
            panic!("expected count_update");
        };
        assert_eq!((data.pending_count, data.total_count), (0, 1));
    }

    #[tokio::test]
    async fn test_invalid_contact_lists_errors() {
        let h = harness();
        let (status, body) = send(&h.state, form_post("/contact", "name=Ada+Lovelace&subject=Hi")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Please correct the errors below."));
        assert!(body.contains("<strong>Email:</strong>"));
        assert_eq!(h.state.db.call(|db| db.inquiry_counts()).await.unwrap().total_count, 0);
    }

    #[tokio::test]
    async fn test_newsletter_subscription() {
        let h = harness();
        let (_, body) = send(&h.state, form_post("/newsletter/subscribe", "email=reader%40lumiere.fr")).await;
        assert!(body.contains("Successfully subscribed"));

        let (_, body) = send(&h.state, form_post("/newsletter/subscribe", "email=reader%40lumiere.fr")).await;
        assert!(body.contains("already subscribed"));
    }
}
