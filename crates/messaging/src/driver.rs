//! The browser automation seam.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverError;

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    XPath(String),
    Css(String),
}

impl Locator {
    /// W3C location strategy name.
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::XPath(_) => "xpath",
            Self::Css(_) => "css selector",
        }
    }

    pub fn selector(&self) -> &str {
        match self {
            Self::XPath(s) | Self::Css(s) => s,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}", self.strategy(), self.selector())
    }
}

/// The browser operations the sender needs.
///
/// Elements are looked up by [`Locator`] on every call; chat pages
/// re-render their input box often enough that held references go stale.
#[async_trait]
pub trait BrowserDriver: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Wait until the element is present, displayed and enabled.
    async fn wait_for_interactive(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    /// Put `text` into the element as if pasted from the clipboard.
    async fn inject_text(&mut self, locator: &Locator, text: &str) -> Result<(), DriverError>;

    /// Press Enter in the element.
    async fn submit(&mut self, locator: &Locator) -> Result<(), DriverError>;

    /// End the browser session. Calling it again is a no-op.
    async fn quit(&mut self) -> Result<(), DriverError>;
}
