//! A minimal W3C WebDriver client.
//!
//! Covers the commands the sender needs: new session, navigation,
//! element lookup and state, synchronous script execution, key input and
//! session deletion. Talks to any W3C server (chromedriver, geckodriver,
//! a Selenium grid) using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::driver::{BrowserDriver, Locator};
use crate::error::DriverError;

/// Key under which W3C servers return element references.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// The WebDriver code point for the Enter key.
pub const ENTER_KEY: &str = "\u{E007}";

/// Dispatches a synthetic clipboard paste into `arguments[0]`.
///
/// Pasting keeps emoji and line breaks intact where typed keys would not.
/// The text arrives as a script argument, never spliced into the source.
const PASTE_SCRIPT: &str = r#"const [target, text] = arguments;
const data = new DataTransfer();
data.setData('text', text);
target.dispatchEvent(new ClipboardEvent('paste', { clipboardData: data, bubbles: true }));"#;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// W3C response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    value: Value,
}

/// HTTP client bound to one browser session.
pub struct WebDriverClient {
    client: reqwest::Client,
    server_url: String,
    session_id: Option<String>,
    poll_interval: Duration,
}

impl WebDriverClient {
    /// Start a new browser session on the WebDriver server at `server_url`.
    ///
    /// * `capabilities` - W3C `alwaysMatch` capabilities, e.g. from
    ///   [`chrome_capabilities`](Self::chrome_capabilities).
    pub async fn start(server_url: &str, capabilities: Value) -> Result<Self, DriverError> {
        Self::start_with_client(reqwest::Client::new(), server_url, capabilities).await
    }

    pub async fn start_with_client(
        client: reqwest::Client,
        server_url: &str,
        capabilities: Value,
    ) -> Result<Self, DriverError> {
        let server_url = server_url.trim_end_matches('/').to_string();
        let body = json!({ "capabilities": { "alwaysMatch": capabilities } });
        let response = client
            .post(format!("{server_url}/session"))
            .json(&body)
            .send()
            .await?;
        let value = Self::parse_response(response).await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| DriverError::Protocol(format!("no sessionId in {value}")))?
            .to_string();

        tracing::info!(session_id = %session_id, server = %server_url, "Browser session started");
        Ok(Self {
            client,
            server_url,
            session_id: Some(session_id),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Capabilities for a Chrome session with extra command-line `args`.
    pub fn chrome_capabilities(args: &[&str]) -> Value {
        json!({
            "browserName": "chrome",
            "goog:chromeOptions": { "args": args },
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    // ---- commands ----

    async fn find_element(&self, locator: &Locator) -> Result<String, DriverError> {
        let value = self
            .command(reqwest::Method::POST, "element", Some(locator_body(locator)))
            .await?;
        element_id(&value)
    }

    async fn element_state(&self, element: &str, state: &str) -> Result<bool, DriverError> {
        let value = self
            .command(reqwest::Method::GET, &format!("element/{element}/{state}"), None)
            .await?;
        value
            .as_bool()
            .ok_or_else(|| DriverError::Protocol(format!("{state} returned {value}")))
    }

    /// Find `locator` and report whether it is displayed and enabled.
    /// A missing element counts as not ready.
    async fn is_interactive(&self, locator: &Locator) -> Result<bool, DriverError> {
        let element = match self.find_element(locator).await {
            Ok(element) => element,
            Err(e) if e.is_missing_element() => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(self.element_state(&element, "displayed").await?
            && self.element_state(&element, "enabled").await?)
    }

    async fn command(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, DriverError> {
        let session_id = self.session_id.as_deref().ok_or(DriverError::SessionClosed)?;
        let url = format!("{}/session/{session_id}/{path}", self.server_url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        Self::parse_response(request.send().await?).await
    }

    // ---- private helpers ----

    /// Unwrap the `value` of a W3C response, turning error statuses into
    /// [`DriverError::WebDriver`].
    async fn parse_response(response: reqwest::Response) -> Result<Value, DriverError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &text));
        }
        let envelope: Envelope = serde_json::from_str(&text)
            .map_err(|e| DriverError::Protocol(format!("{e}: {text}")))?;
        Ok(envelope.value)
    }
}

#[async_trait]
impl BrowserDriver for WebDriverClient {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.command(reqwest::Method::POST, "url", Some(json!({ "url": url })))
            .await?;
        tracing::debug!(url, "Navigated");
        Ok(())
    }

    async fn wait_for_interactive(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let poll = async {
            loop {
                if self.is_interactive(locator).await? {
                    return Ok::<(), DriverError>(());
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };
        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(DriverError::Timeout {
                locator: locator.to_string(),
                waited: timeout,
            }),
        }
    }

    async fn inject_text(&mut self, locator: &Locator, text: &str) -> Result<(), DriverError> {
        let element = self.find_element(locator).await?;
        self.command(
            reqwest::Method::POST,
            "execute/sync",
            Some(paste_body(&element, text)),
        )
        .await?;
        Ok(())
    }

    async fn submit(&mut self, locator: &Locator) -> Result<(), DriverError> {
        let element = self.find_element(locator).await?;
        self.command(
            reqwest::Method::POST,
            &format!("element/{element}/value"),
            Some(json!({ "text": ENTER_KEY })),
        )
        .await?;
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), DriverError> {
        let Some(session_id) = self.session_id.take() else {
            return Ok(());
        };
        let response = self
            .client
            .delete(format!("{}/session/{session_id}", self.server_url))
            .send()
            .await?;
        Self::parse_response(response).await?;
        tracing::info!(session_id = %session_id, "Browser session closed");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request and response bodies
// ---------------------------------------------------------------------------

fn locator_body(locator: &Locator) -> Value {
    json!({ "using": locator.strategy(), "value": locator.selector() })
}

fn paste_body(element: &str, text: &str) -> Value {
    json!({
        "script": PASTE_SCRIPT,
        "args": [{ ELEMENT_KEY: element }, text],
    })
}

fn element_id(value: &Value) -> Result<String, DriverError> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DriverError::Protocol(format!("no element reference in {value}")))
}

fn parse_error(status: u16, body: &str) -> DriverError {
    let detail = serde_json::from_str::<Envelope>(body).ok().map(|e| e.value);
    let field = |name: &str| {
        detail
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    DriverError::WebDriver {
        status,
        error: field("error").unwrap_or_else(|| "unknown error".to_string()),
        message: field("message").unwrap_or_else(|| body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn xpath_locator_body() {
        let body = locator_body(&Locator::XPath("//footer//p".into()));
        assert_eq!(body, json!({ "using": "xpath", "value": "//footer//p" }));
    }

    #[test]
    fn paste_passes_text_as_argument() {
        let text = "🎊 Querida `ANA`";
        let body = paste_body("el-1", text);
        assert_eq!(body["args"][0][ELEMENT_KEY], "el-1");
        assert_eq!(body["args"][1], text);
        assert!(!body["script"].as_str().unwrap().contains("ANA"));
    }

    #[test]
    fn element_reference_is_extracted() {
        assert_eq!(element_id(&json!({ ELEMENT_KEY: "abc" })).unwrap(), "abc");
        assert_matches!(element_id(&json!({})), Err(DriverError::Protocol(_)));
    }

    #[test]
    fn w3c_error_body_is_decoded() {
        let err = parse_error(
            404,
            r#"{"value":{"error":"no such element","message":"Unable to locate element","stacktrace":""}}"#,
        );
        assert!(err.is_missing_element());
        assert_matches!(err, DriverError::WebDriver { status: 404, .. });
    }

    #[test]
    fn non_json_error_keeps_body() {
        let err = parse_error(502, "Bad Gateway");
        assert_matches!(
            err,
            DriverError::WebDriver { ref error, ref message, .. }
                if error == "unknown error" && message == "Bad Gateway"
        );
    }
}
