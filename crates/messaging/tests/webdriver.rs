//! `WebDriverClient` against an in-process mock WebDriver server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use guestlist_messaging::webdriver::{ELEMENT_KEY, ENTER_KEY};
use guestlist_messaging::{BrowserDriver, DriverError, Locator, WebDriverClient};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Mock {
    log: Arc<Mutex<Vec<String>>>,
    lookups: Arc<AtomicUsize>,
}

impl Mock {
    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

fn ok(value: Value) -> Response {
    Json(json!({ "value": value })).into_response()
}

fn no_such_element() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "value": {
            "error": "no such element",
            "message": "Unable to locate element",
            "stacktrace": "",
        }})),
    )
        .into_response()
}

async fn new_session(State(mock): State<Mock>, Json(body): Json<Value>) -> Response {
    let browser = body["capabilities"]["alwaysMatch"]["browserName"].clone();
    mock.push(format!("session {}", browser.as_str().unwrap_or("?")));
    ok(json!({ "sessionId": "s1", "capabilities": {} }))
}

async fn navigate(State(mock): State<Mock>, Json(body): Json<Value>) -> Response {
    mock.push(format!("url {}", body["url"].as_str().unwrap_or("?")));
    ok(Value::Null)
}

/// `//missing` never exists; anything else appears on the second lookup.
async fn find_element(State(mock): State<Mock>, Json(body): Json<Value>) -> Response {
    if body["value"] == "//missing" {
        return no_such_element();
    }
    if mock.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
        return no_such_element();
    }
    ok(json!({ ELEMENT_KEY: "e1" }))
}

async fn element_state(Path((_, _, _)): Path<(String, String, String)>) -> Response {
    ok(Value::Bool(true))
}

async fn execute(State(mock): State<Mock>, Json(body): Json<Value>) -> Response {
    let element = body["args"][0][ELEMENT_KEY].as_str().unwrap_or("?").to_string();
    let text = body["args"][1].as_str().unwrap_or("?").to_string();
    mock.push(format!("paste {element} {text}"));
    ok(Value::Null)
}

async fn send_keys(
    State(mock): State<Mock>,
    Path((_, element)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let enter = body["text"] == ENTER_KEY;
    mock.push(format!("keys {element} enter={enter}"));
    ok(Value::Null)
}

async fn delete_session(State(mock): State<Mock>, Path(id): Path<String>) -> Response {
    mock.push(format!("delete {id}"));
    ok(Value::Null)
}

async fn serve(mock: Mock) -> String {
    let app = Router::new()
        .route("/session", post(new_session))
        .route("/session/{id}", delete(delete_session))
        .route("/session/{id}/url", post(navigate))
        .route("/session/{id}/element", post(find_element))
        .route("/session/{id}/element/{element}/{state}", get(element_state))
        .route("/session/{id}/element/{element}/value", post(send_keys))
        .route("/session/{id}/execute/sync", post(execute))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client(mock: &Mock) -> WebDriverClient {
    let url = serve(mock.clone()).await;
    WebDriverClient::start(&url, WebDriverClient::chrome_capabilities(&["--lang=es"]))
        .await
        .unwrap()
        .with_poll_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn full_send_sequence() {
    let mock = Mock::default();
    let mut driver = client(&mock).await;
    assert_eq!(driver.session_id(), Some("s1"));

    let input = Locator::XPath("//footer//p".into());
    driver
        .navigate("https://web.whatsapp.com/send?phone=+51987654321")
        .await
        .unwrap();
    driver
        .wait_for_interactive(&input, Duration::from_secs(5))
        .await
        .unwrap();
    driver.inject_text(&input, "🎊 Querida *ANA*").await.unwrap();
    driver.submit(&input).await.unwrap();
    driver.quit().await.unwrap();
    driver.quit().await.unwrap();

    assert_eq!(
        mock.log(),
        [
            "session chrome",
            "url https://web.whatsapp.com/send?phone=+51987654321",
            "paste e1 🎊 Querida *ANA*",
            "keys e1 enter=true",
            "delete s1",
        ]
    );
    assert!(mock.lookups.load(Ordering::SeqCst) >= 2, "first lookup misses");
}

#[tokio::test]
async fn waiting_for_a_missing_element_times_out() {
    let mock = Mock::default();
    let mut driver = client(&mock).await;

    let err = driver
        .wait_for_interactive(
            &Locator::XPath("//missing".into()),
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
    assert_matches!(err, DriverError::Timeout { .. });
}

#[tokio::test]
async fn commands_after_quit_are_rejected() {
    let mock = Mock::default();
    let mut driver = client(&mock).await;
    driver.quit().await.unwrap();

    let err = driver.navigate("https://web.whatsapp.com/").await.unwrap_err();
    assert_matches!(err, DriverError::SessionClosed);
}

#[tokio::test]
async fn missing_element_error_surfaces_on_inject() {
    let mock = Mock::default();
    let mut driver = client(&mock).await;

    let err = driver
        .inject_text(&Locator::XPath("//missing".into()), "hola")
        .await
        .unwrap_err();
    assert!(err.is_missing_element());
}
