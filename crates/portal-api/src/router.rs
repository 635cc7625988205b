// ============================================================================
// Portal API - Router
// File: crates/portal-api/src/router.rs
// ============================================================================

use axum::{
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{admin, auth, health, pages};
use crate::middleware::{render_error_pages, require_admin, require_session};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Open to everyone
    let public_routes = Router::new()
        .route("/", get(pages::index))
        .route("/signup", get(pages::signup_form))
        .route("/signupSubmit", post(auth::signup_submit))
        .route("/login", get(pages::login_form))
        .route("/loginSubmit", post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/health", get(health::health_check));

    // Authenticated sessions
    let member_routes = Router::new()
        .route("/members", get(pages::members))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    // Authenticated admin sessions (layers run bottom-up: session, then role)
    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_page))
        .route("/users", post(admin::change_role))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .nest_service(
            "/public",
            ServeDir::new(&state.public_dir).not_found_service(pages::not_found.into_service()),
        )
        .fallback(pages::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), render_error_pages))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{CONTENT_TYPE, COOKIE, LOCATION, RETRY_AFTER, SET_COOKIE},
            Request, StatusCode,
        },
        response::Response,
    };
    use tower::ServiceExt;

    use portal_core::domain::{Role, SessionRecord, User};
    use portal_core::error::DomainError;
    use portal_core::repositories::{SessionStore, UserRepository};
    use portal_core::services::{AuthService, SessionManager, UserService};
    use portal_infrastructure::{MemorySessionStore, MemoryUserRepository};
    use portal_security::{PasswordService, SessionSigner};

    use crate::state::CookieSettings;
    use crate::views::Views;

    const SECRET: &str = "router-test-secret";

    struct TestApp {
        router: Router,
        users: MemoryUserRepository,
    }

    impl TestApp {
        fn new() -> Self {
            Self::with_session_store(Arc::new(MemorySessionStore::new()))
        }

        fn with_session_store(store: Arc<dyn SessionStore>) -> Self {
            let users = MemoryUserRepository::new();
            let sessions = Arc::new(SessionManager::new(
                store,
                SessionSigner::new(SECRET).unwrap(),
                chrono::Duration::hours(24),
            ));
            let state = AppState {
                auth: Arc::new(AuthService::new(
                    Arc::new(users.clone()),
                    sessions.clone(),
                    PasswordService::new(4),
                )),
                users: Arc::new(UserService::new(Arc::new(users.clone()))),
                sessions,
                views: Arc::new(Views::new().unwrap()),
                cookie: CookieSettings {
                    name: "portal.sid".into(),
                    secure: false,
                    max_age_seconds: 86_400,
                },
                public_dir: PathBuf::from("public"),
                member_images: Arc::new(vec!["cat.svg".to_string()]),
            };
            Self {
                router: build_router(state),
                users,
            }
        }

        async fn seed(&self, name: &str, email: &str, password: &str, role: Role) {
            let hash = PasswordService::new(4).hash(password).unwrap();
            let mut user = User::new(name.into(), email.into(), hash);
            user.role = role;
            self.users.insert(&user).await.unwrap();
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
            let mut builder = Request::builder().uri(uri);
            if let Some(cookie) = cookie {
                builder = builder.header(COOKIE, cookie);
            }
            self.send(builder.body(Body::empty()).unwrap()).await
        }

        async fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response {
            let mut builder = Request::builder()
                .method("POST")
                .uri(uri)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            if let Some(cookie) = cookie {
                builder = builder.header(COOKIE, cookie);
            }
            self.send(builder.body(Body::from(form.to_string())).unwrap()).await
        }

        /// Log in and return the `name=value` cookie pair.
        async fn login(&self, email: &str, password: &str) -> String {
            let response = self
                .post_form("/loginSubmit", &format!("email={}&password={}", email, password), None)
                .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            cookie_pair(&response)
        }

        async fn signup(&self, name: &str, email: &str, password: &str) -> String {
            let response = self
                .post_form(
                    "/signupSubmit",
                    &format!("name={}&email={}&password={}", name, email, password),
                    None,
                )
                .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            cookie_pair(&response)
        }
    }

    fn cookie_pair(response: &Response) -> String {
        let header = response.headers()[SET_COOKIE].to_str().unwrap();
        header.split(';').next().unwrap().to_string()
    }

    fn location(response: &Response) -> &str {
        response.headers()[LOCATION].to_str().unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Session store whose backend is unreachable.
    struct UnreachableSessionStore;

    #[async_trait]
    impl SessionStore for UnreachableSessionStore {
        async fn save(&self, _: &str, _: &SessionRecord) -> Result<(), DomainError> {
            Err(DomainError::StoreUnavailable("connection refused".into()))
        }

        async fn load(&self, _: &str) -> Result<Option<SessionRecord>, DomainError> {
            Err(DomainError::StoreUnavailable("connection refused".into()))
        }

        async fn destroy(&self, _: &str) -> Result<(), DomainError> {
            Err(DomainError::StoreUnavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_signup_creates_user_and_redirects_to_members() {
        let app = TestApp::new();

        let response = app
            .post_form("/signupSubmit", "name=alice&email=alice@x.com&password=pw123", None)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/members");
        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
        assert!(set_cookie.starts_with("portal.sid="));
        assert!(set_cookie.contains("HttpOnly"));

        let stored = app.users.find_by_email("alice@x.com").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "alice");
        assert_eq!(stored[0].role, Role::User);

        let members = app.get("/members", Some(&cookie_pair(&response))).await;
        assert_eq!(members.status(), StatusCode::OK);
        let html = body_text(members).await;
        assert!(html.contains("Hello, alice."));
        assert!(html.contains("/public/cat.svg"));
    }

    #[tokio::test]
    async fn test_signup_presence_checked_first() {
        let app = TestApp::new();

        let response = app
            .post_form("/signupSubmit", "name=&email=not-an-email&password=pw123", None)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(SET_COOKIE).is_none());
        let html = body_text(response).await;
        assert!(html.contains("Name is required."));
        assert!(html.contains("href=\"/signup\""));
        assert!(app.users.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_names() {
        let app = TestApp::new();

        for name in ["abcdefghijklmnop", "al_ice", "al%20ice"] {
            let response = app
                .post_form(
                    "/signupSubmit",
                    &format!("name={}&email=alice@x.com&password=pw123", name),
                    None,
                )
                .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "name {}", name);
        }
        assert!(app.users.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_carries_stored_role() {
        let app = TestApp::new();
        app.seed("root", "root@x.com", "pw123", Role::Admin).await;

        let cookie = app.login("root@x.com", "pw123").await;
        let response = app.get("/admin", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(app.get("/", Some(&cookie)).await).await;
        assert!(html.contains("Hello, root!"));
        assert!(html.contains("href=\"/admin\""));
    }

    #[tokio::test]
    async fn test_login_wrong_password_sets_nothing() {
        let app = TestApp::new();
        app.seed("alice", "alice@x.com", "pw123", Role::User).await;

        let response = app
            .post_form("/loginSubmit", "email=alice@x.com&password=wrong", None)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
        let html = body_text(response).await;
        assert!(html.contains("Invalid email"));
        assert!(html.contains("href=\"/login\""));
    }

    #[tokio::test]
    async fn test_login_with_duplicate_email_is_refused() {
        let app = TestApp::new();
        app.signup("alice", "same@x.com", "pw123").await;
        app.signup("alice2", "same@x.com", "pw123").await;

        let response = app
            .post_form("/loginSubmit", "email=same@x.com&password=pw123", None)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_replaces_presented_session() {
        let app = TestApp::new();
        app.seed("alice", "alice@x.com", "pw123", Role::User).await;
        let first = app.login("alice@x.com", "pw123").await;

        let response = app
            .post_form("/loginSubmit", "email=alice@x.com&password=pw123", Some(&first))
            .await;
        let second = cookie_pair(&response);
        assert_ne!(first, second);

        let stale = app.get("/members", Some(&first)).await;
        assert_eq!(stale.status(), StatusCode::SEE_OTHER);
        let fresh = app.get("/members", Some(&second)).await;
        assert_eq!(fresh.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signup_replaces_presented_session() {
        let app = TestApp::new();
        app.seed("root", "root@x.com", "pw123", Role::Admin).await;
        let root = app.login("root@x.com", "pw123").await;

        let response = app
            .post_form("/signupSubmit", "name=bob&email=bob@x.com&password=pw123", Some(&root))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let bob = cookie_pair(&response);
        assert_ne!(root, bob);

        let stale = app.get("/admin", Some(&root)).await;
        assert_eq!(stale.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&stale), "/login");
        let html = body_text(app.get("/members", Some(&bob)).await).await;
        assert!(html.contains("Hello, bob."));
    }

    #[tokio::test]
    async fn test_members_requires_session() {
        let app = TestApp::new();

        let response = app.get("/members", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_tampered_token_is_anonymous() {
        let app = TestApp::new();
        let mut cookie = app.signup("alice", "alice@x.com", "pw123").await;

        let last = cookie.pop().unwrap();
        cookie.push(if last == '0' { '1' } else { '0' });

        let response = app.get("/members", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_logout_invalidates_old_token() {
        let app = TestApp::new();
        let cookie = app.signup("alice", "alice@x.com", "pw123").await;

        let response = app.get("/logout", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert!(response.headers()[SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));

        let response = app.get("/members", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        // Logging out without a session is harmless
        let response = app.get("/logout", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_admin_forbidden_for_user_role() {
        let app = TestApp::new();
        let cookie = app.signup("alice", "alice@x.com", "pw123").await;

        let response = app.get("/admin", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains("403 Forbidden"));

        let response = app
            .post_form("/users", "name=alice&action=promote", Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.users.list_all().await.unwrap()[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_admin_requires_session() {
        let app = TestApp::new();

        let response = app.get("/admin", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        let response = app.post_form("/users", "name=alice&action=promote", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_admin_lists_users() {
        let app = TestApp::new();
        app.seed("root", "root@x.com", "pw123", Role::Admin).await;
        app.signup("alice", "alice@x.com", "pw123").await;
        let cookie = app.login("root@x.com", "pw123").await;

        let response = app.get("/admin", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("alice@x.com"));
        assert!(html.contains("root@x.com"));
        assert!(html.contains("value=\"promote\""));
        assert!(html.contains("value=\"demote\""));
    }

    #[tokio::test]
    async fn test_promote_applies_at_next_login() {
        let app = TestApp::new();
        app.seed("root", "root@x.com", "pw123", Role::Admin).await;
        let alice = app.signup("alice", "alice@x.com", "pw123").await;
        let root = app.login("root@x.com", "pw123").await;

        let response = app
            .post_form("/users", "name=alice&action=promote", Some(&root))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin");
        let stored = app.users.find_by_email("alice@x.com").await.unwrap();
        assert_eq!(stored[0].role, Role::Admin);

        // Existing session keeps the role it was issued with
        assert_eq!(app.get("/admin", Some(&alice)).await.status(), StatusCode::FORBIDDEN);
        let alice = app.login("alice@x.com", "pw123").await;
        assert_eq!(app.get("/admin", Some(&alice)).await.status(), StatusCode::OK);

        app.post_form("/users", "name=alice&action=demote", Some(&root)).await;
        let stored = app.users.find_by_email("alice@x.com").await.unwrap();
        assert_eq!(stored[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_role_change_errors() {
        let app = TestApp::new();
        app.seed("root", "root@x.com", "pw123", Role::Admin).await;
        let root = app.login("root@x.com", "pw123").await;

        let response = app
            .post_form("/users", "name=nobody&action=promote", Some(&root))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("No user named nobody."));

        let response = app
            .post_form("/users", "name=root&action=delete", Some(&root))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unmatched_route_renders_404_view() {
        let app = TestApp::new();

        let response = app.get("/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(body_text(response).await.contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_missing_static_file_renders_404_view() {
        let app = TestApp::new();

        let response = app.get("/public/nope.png", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(body_text(response).await.contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_landing_page_for_anonymous() {
        let app = TestApp::new();

        let response = app.get("/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("href=\"/signup\""));
        assert!(html.contains("href=\"/login\""));
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new();

        let response = app.get("/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("healthy"));
    }

    #[tokio::test]
    async fn test_session_store_outage_is_503() {
        let app = TestApp::with_session_store(Arc::new(UnreachableSessionStore));
        let token = SessionSigner::new(SECRET)
            .unwrap()
            .sign(&SessionSigner::generate_id());

        let response = app
            .get("/members", Some(&format!("portal.sid={}", token)))
            .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[RETRY_AFTER], "5");
        let html = body_text(response).await;
        assert!(html.contains("503 Service Unavailable"));
        assert!(!html.contains("connection refused"));
    }
}
