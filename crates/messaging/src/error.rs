use std::time::Duration;

use guestlist_core::message::TemplateError;
use guestlist_core::CoreError;

/// Errors from the browser automation layer.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("WebDriver request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The WebDriver server answered with a W3C error object.
    #[error("WebDriver error ({status}) {error}: {message}")]
    WebDriver {
        status: u16,
        /// W3C error code, e.g. `no such element`.
        error: String,
        message: String,
    },

    #[error("Unexpected WebDriver response: {0}")]
    Protocol(String),

    #[error("Element {locator} not interactive after {}s", .waited.as_secs())]
    Timeout { locator: String, waited: Duration },

    #[error("Browser session already closed")]
    SessionClosed,
}

impl DriverError {
    /// Whether the element is simply not on the page (yet).
    pub fn is_missing_element(&self) -> bool {
        matches!(
            self,
            Self::WebDriver { error, .. }
                if error == "no such element" || error == "stale element reference"
        )
    }
}

/// Errors that end a notification batch, as opposed to a single row.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Login was cancelled")]
    LoginCancelled,

    #[error("Login not confirmed within {0:?}")]
    LoginTimeout(Duration),

    #[error("Could not read login confirmation: {0}")]
    LoginInput(#[source] std::io::Error),

    #[error("Sending was cancelled")]
    Cancelled,

    #[error("Sender is {actual}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid messaging configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_timeout_keeps_sub_second_limits() {
        let err = MessagingError::LoginTimeout(Duration::from_millis(200));
        assert_eq!(err.to_string(), "Login not confirmed within 200ms");
    }
}
