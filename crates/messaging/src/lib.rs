//! Invitation delivery over WhatsApp Web.
//!
//! A [`NotificationSender`] drives a browser through a [`BrowserDriver`]
//! (in production a [`WebDriverClient`] talking to chromedriver), waits
//! for the operator to log in through a [`LoginGate`], and sends each
//! guest row's invitation segments to every phone number on that row.

pub mod config;
pub mod driver;
pub mod error;
pub mod gate;
pub mod sender;
pub mod webdriver;

pub use config::{MessagingConfig, Pacing};
pub use driver::{BrowserDriver, Locator};
pub use error::{DriverError, MessagingError};
pub use gate::{LoginGate, StdinGate};
pub use sender::{BatchSummary, NotificationSender, RowStatus, SessionState};
pub use webdriver::WebDriverClient;
