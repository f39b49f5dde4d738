//! Router tests against an in-memory guest lookup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use guestlist_api::config::ServerConfig;
use guestlist_api::lookup::GuestLookup;
use guestlist_api::router::build_app_router;
use guestlist_api::state::AppState;
use guestlist_db::{Guest, MirrorError};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeLookup {
    guests: HashMap<String, Guest>,
    offline: bool,
}

#[async_trait]
impl GuestLookup for FakeLookup {
    async fn find(&self, id: &str) -> Result<Option<Guest>, MirrorError> {
        if self.offline {
            let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
            return Err(MirrorError::Connection(sqlx::Error::Io(io)));
        }
        Ok(self.guests.get(id).cloned())
    }
}

fn ana() -> Guest {
    Guest {
        id: "AB12CD".into(),
        sex: Some("F".into()),
        last_name: Some("GOMEZ".into()),
        first_name: Some("ANA".into()),
        party_size: Some("2".into()),
        table_number: Some("3".into()),
        phone: Some("987654321".into()),
        confirmed: Some("NULL".into()),
    }
}

fn app(lookup: FakeLookup) -> Router {
    build_app_router(AppState::new(Arc::new(lookup), ServerConfig::default()))
}

fn app_with_ana() -> Router {
    let mut lookup = FakeLookup::default();
    lookup.guests.insert("AB12CD".into(), ana());
    app(lookup)
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_version() {
    let response = get(app(FakeLookup::default()), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn known_code_returns_the_record() {
    let response = get(app_with_ana(), "/api/AB12CD").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ID"], "AB12CD");
    assert_eq!(json["APELLIDOS"], "GOMEZ");
    assert_eq!(json["NOMBRES"], "ANA");
    assert_eq!(json["CONFIRMADO"], "NULL");
}

#[tokio::test]
async fn lowercase_code_is_accepted() {
    let response = get(app_with_ana(), "/api/ab12cd").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_code_is_404_json() {
    let response = get(app_with_ana(), "/api/ZZZZZZ").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("ZZZZZZ"));
}

#[tokio::test]
async fn database_outage_is_503() {
    let lookup = FakeLookup {
        offline: true,
        ..FakeLookup::default()
    };
    let response = get(app(lookup), "/api/AB12CD").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["code"], "DATABASE_UNAVAILABLE");
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let request = Request::get("/api/AB12CD")
        .header("origin", "https://invitados.example")
        .body(Body::empty())
        .unwrap();
    let response = app_with_ana().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
