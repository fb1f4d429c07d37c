//! Pipeline tests for the sal-web bootstrap.
//!
//! These exercise the assembled router end to end through `oneshot`:
//! - middleware chain ordering (CORS, security headers, SCSS, static files)
//! - the two mounted route groups
//! - convergence of every failure on the rendered error page
//!
//! No network listener and no live MongoDB: the state is built by hand the
//! same way `main` builds it, with data access left unconfigured.

use std::fs;
use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{middleware, Router};
use axum_helpers::auth::TokenAuth;
use axum_helpers::HttpError;
use core_config::server::ServerConfig;
use core_config::Environment;
use database::mongo::MongoConfig;
use http_body_util::BodyExt;
use sal_web::pipeline::render_error_pages;
use sal_web::{app, AppState, Config};
use tower::ServiceExt; // For oneshot()

fn seeded_public() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("stylesheets")).unwrap();
    fs::create_dir_all(dir.path().join("images")).unwrap();
    fs::write(
        dir.path().join("stylesheets/style.scss"),
        "$fg: #00b7ff;\na {\n  color: $fg;\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("images/sal.png"), b"\x89PNG\r\n\x1a\nstub").unwrap();
    fs::write(dir.path().join("robots.txt"), "User-agent: *\nAllow: /\n").unwrap();
    dir
}

fn test_state(environment: Environment, public_dir: &Path) -> AppState {
    AppState {
        config: Config {
            mongodb: MongoConfig::default(),
            server: ServerConfig::default(),
            environment,
            public_dir: public_dir.to_path_buf(),
        },
        db: None,
        auth: TokenAuth::new("pipeline-test-secret"),
    }
}

fn test_app(environment: Environment, public_dir: &Path) -> Router {
    app::build_router(test_state(environment, public_dir))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_get_nonexistent_renders_404_error_page() {
    let public = seeded_public();
    let app = test_app(Environment::Development, public.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = body_text(response).await;
    assert!(body.contains("Not Found"));
}

#[tokio::test]
async fn test_api_error_with_explicit_status_keeps_it() {
    // A handler under /api propagating an explicit 400 must surface as 400
    // with its message on the rendered page.
    let app = Router::new()
        .nest(
            "/api",
            Router::new().route("/fail", get(|| async { HttpError::bad_request("bad input") })),
        )
        .layer(middleware::from_fn_with_state(
            Environment::Development,
            render_error_pages,
        ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/fail")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("bad input"));
}

#[tokio::test]
async fn test_db_route_fails_alone_when_unconfigured() {
    let public = seeded_public();
    let app = test_app(Environment::Development, public.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/db/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_text(response).await.contains("Database is not configured"));
}

#[tokio::test]
async fn test_server_serves_non_db_routes_without_database() {
    let public = seeded_public();
    let app = test_app(Environment::Development, public.path());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Sal"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status: serde_json::Value =
        serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(status["status"], "ok");
    assert_eq!(status["database"], false);
}

#[tokio::test]
async fn test_malformed_json_body_fails_before_the_handler() {
    let public = seeded_public();
    let app = test_app(Environment::Development, public.path());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/echo")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    // The rejection converged on the error view like any other failure
    let body = body_text(response).await;
    assert!(body.contains("<h1>"));
}

#[tokio::test]
async fn test_well_formed_json_body_reaches_the_handler() {
    let public = seeded_public();
    let app = test_app(Environment::Development, public.path());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/echo")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"hello":"sal"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let echoed: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(echoed["hello"], "sal");
}

#[tokio::test]
async fn test_static_file_served_verbatim() {
    let public = seeded_public();
    let expected = fs::read(public.path().join("robots.txt")).unwrap();
    let app = test_app(Environment::Development, public.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/robots.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], &expected[..]);
}

#[tokio::test]
async fn test_scss_request_returns_compiled_css_and_map() {
    let public = seeded_public();
    let app = test_app(Environment::Development, public.path());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/stylesheets/style.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/css"));

    let css = body_text(response).await;
    assert!(css.contains("color: #00b7ff"));
    assert!(!css.contains("$fg"));
    assert!(css.contains("sourceMappingURL=style.css.map"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stylesheets/style.css.map")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let map: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(map["version"], 3);
    assert_eq!(map["sources"][0], "style.scss");
}

#[tokio::test]
async fn test_favicon_served_from_bundled_image() {
    let public = seeded_public();
    let app = test_app(Environment::Development, public.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/favicon.ico")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/png"
    );
}

#[tokio::test]
async fn test_cross_cutting_headers_present() {
    let public = seeded_public();
    let app = test_app(Environment::Development, public.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "https://anything.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    // Known placeholder policy: every origin is currently allowed
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn test_auth_guard_on_api_me() {
    let public = seeded_public();
    let state = test_state(Environment::Development, public.path());
    let token = state.auth.issue("user-7").unwrap();
    let app = app::build_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(me["subject"], "user-7");
}

#[tokio::test]
async fn test_concurrent_requests_do_not_mix_responses() {
    let public = seeded_public();
    let app = test_app(Environment::Development, public.path());

    let home = app.clone().oneshot(
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    );
    let status = app.oneshot(
        Request::builder()
            .uri("/api/status")
            .body(Body::empty())
            .unwrap(),
    );

    let (home, status) = tokio::join!(home, status);
    let home_body = body_text(home.unwrap()).await;
    let status_body = body_text(status.unwrap()).await;

    assert!(home_body.contains("<html"));
    assert!(!home_body.contains("\"status\""));
    assert!(status_body.starts_with('{'));
    assert!(!status_body.contains("<html"));
}
