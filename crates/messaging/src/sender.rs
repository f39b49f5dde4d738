//! The notification sender.
//!
//! ```text
//! Uninitialized --open--> SessionReady --send_row--> Sending --> SessionReady
//!        \                     |
//!         +------close---------+--> Closed
//! ```
//!
//! Row-level failures never escape [`NotificationSender::send_row`]; they
//! come back as a [`RowStatus`] and end up in the result column. Only
//! failing to open the session ends a batch early, and the session is
//! closed on every path out of [`NotificationSender::run_batch`].

use std::time::Duration;

use async_trait::async_trait;
use guestlist_core::guest::columns;
use guestlist_core::message::{GuestFields, MessageTemplate};
use guestlist_core::phone::parse_phone_targets;
use guestlist_core::{dispatch, Cell, Row, RowAction, Table};
use tokio_util::sync::CancellationToken;

use crate::config::{MessagingConfig, Pacing};
use crate::driver::{BrowserDriver, Locator};
use crate::error::MessagingError;
use crate::gate::LoginGate;

/// Default name of the delivery-status column.
pub const STATUS_COLUMN: &str = "send_invitation";

pub const STATUS_SENT: &str = "sent";
pub const STATUS_NO_PHONE: &str = "not sent - no phone number";
pub const STATUS_ERROR_PREFIX: &str = "not sent - error: ";

// ---------------------------------------------------------------------------
// States and outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    SessionReady,
    Sending,
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::SessionReady => "session ready",
            Self::Sending => "sending",
            Self::Closed => "closed",
        }
    }
}

/// Outcome of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    Sent,
    NoPhone,
    Failed(String),
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sent => f.write_str(STATUS_SENT),
            Self::NoPhone => f.write_str(STATUS_NO_PHONE),
            Self::Failed(detail) => write!(f, "{STATUS_ERROR_PREFIX}{detail}"),
        }
    }
}

/// Row counts of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub sent: usize,
    pub no_phone: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, status: &RowStatus) {
        match status {
            RowStatus::Sent => self.sent += 1,
            RowStatus::NoPhone => self.no_phone += 1,
            RowStatus::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.sent + self.no_phone + self.failed
    }
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

/// Sends one guest row's invitation to every number on the row.
pub struct NotificationSender<D, G, T> {
    driver: D,
    gate: G,
    template: T,
    endpoint: String,
    country_code: String,
    chat_input: Locator,
    warmup_segment: Option<String>,
    pacing: Pacing,
    login_timeout: Option<Duration>,
    column: String,
    cancel: CancellationToken,
    state: SessionState,
    summary: BatchSummary,
}

impl<D, G, T> NotificationSender<D, G, T>
where
    D: BrowserDriver,
    G: LoginGate,
    T: MessageTemplate,
{
    pub fn new(
        driver: D,
        gate: G,
        template: T,
        config: &MessagingConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            driver,
            gate,
            template,
            endpoint: config.whatsapp_url.clone(),
            country_code: config.country_code.clone(),
            chat_input: config.chat_input.clone(),
            warmup_segment: config.warmup_segment.clone(),
            pacing: config.pacing,
            login_timeout: config.login_timeout,
            column: STATUS_COLUMN.to_string(),
            cancel,
            state: SessionState::Uninitialized,
            summary: BatchSummary::default(),
        }
    }

    /// Store statuses in `column` instead of [`STATUS_COLUMN`].
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn summary(&self) -> BatchSummary {
        self.summary
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Navigate to the messaging endpoint and wait for login.
    pub async fn open(&mut self) -> Result<(), MessagingError> {
        self.expect_state(SessionState::Uninitialized)?;
        self.driver.navigate(&self.endpoint).await?;
        tracing::info!(endpoint = %self.endpoint, "Waiting for login confirmation");
        self.gate.confirm(&self.cancel, self.login_timeout).await?;
        self.state = SessionState::SessionReady;
        Ok(())
    }

    /// Send the invitation for one row. Never fails; the outcome is the
    /// returned status.
    pub async fn send_row(&mut self, row: Row<'_>) -> RowStatus {
        let status = self.try_send_row(row).await;
        self.summary.record(&status);
        status
    }

    async fn try_send_row(&mut self, row: Row<'_>) -> RowStatus {
        if self.cancel.is_cancelled() {
            return RowStatus::Failed(MessagingError::Cancelled.to_string());
        }
        if let Err(e) = self.expect_state(SessionState::SessionReady) {
            return RowStatus::Failed(e.to_string());
        }

        let phone = row.get(columns::PHONE).map(Cell::to_string);
        let targets = parse_phone_targets(phone.as_deref(), &self.country_code);
        let id = row.text(columns::ID).unwrap_or_default().to_string();
        if targets.is_empty() {
            tracing::info!(id = %id, "No phone number, invitation skipped");
            return RowStatus::NoPhone;
        }

        let segments = match self.segments(row) {
            Ok(segments) => segments,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Invitation could not be composed");
                return RowStatus::Failed(e.to_string());
            }
        };

        self.state = SessionState::Sending;
        let result = self.deliver(&targets, &segments).await;
        self.state = SessionState::SessionReady;

        match result {
            Ok(()) => RowStatus::Sent,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Invitation not sent");
                RowStatus::Failed(e.to_string())
            }
        }
    }

    /// End the browser session. Safe to call more than once.
    pub async fn close(&mut self) -> Result<(), MessagingError> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        self.driver.quit().await?;
        tracing::info!(
            sent = self.summary.sent,
            no_phone = self.summary.no_phone,
            failed = self.summary.failed,
            "Messaging session closed",
        );
        Ok(())
    }

    /// Open the session, send every row of `table` into the status column
    /// and close the session, whatever happened before.
    ///
    /// Once every row has a status, a failure to close the session is only
    /// logged: the statuses must still reach the caller.
    pub async fn run_batch(&mut self, table: &mut Table) -> Result<BatchSummary, MessagingError> {
        let outcome = match self.open().await {
            Ok(()) => dispatch(table, &mut *self).await.map_err(MessagingError::from),
            Err(e) => Err(e),
        };
        let closed = self.close().await;
        outcome?;
        if let Err(e) = closed {
            tracing::warn!(error = %e, "Browser session did not close cleanly");
        }
        Ok(self.summary)
    }

    // ---- private helpers ----

    fn segments(&self, row: Row<'_>) -> Result<Vec<String>, MessagingError> {
        let fields = GuestFields::from_row(row)?;
        let mut segments = Vec::new();
        if let Some(warmup) = &self.warmup_segment {
            segments.push(warmup.clone());
        }
        segments.extend(self.template.compose(&fields)?);
        Ok(segments)
    }

    async fn deliver(
        &mut self,
        targets: &[String],
        segments: &[String],
    ) -> Result<(), MessagingError> {
        pause(&self.cancel, self.pacing.settle_delay).await?;
        for number in targets {
            let url = format!("{}send?phone={number}", self.endpoint);
            self.driver.navigate(&url).await?;
            self.driver
                .wait_for_interactive(&self.chat_input, self.pacing.chat_ready_timeout)
                .await?;
            pause(&self.cancel, self.pacing.settle_delay).await?;

            for segment in segments {
                self.driver.inject_text(&self.chat_input, segment).await?;
                self.driver.submit(&self.chat_input).await?;
                pause(&self.cancel, self.pacing.segment_delay).await?;
            }
            tracing::info!(phone = %number, segments = segments.len(), "Invitation delivered");
        }
        Ok(())
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), MessagingError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(MessagingError::InvalidState {
                expected: expected.as_str(),
                actual: self.state.as_str(),
            })
        }
    }
}

/// Sleep for `delay` unless `cancel` fires first.
async fn pause(cancel: &CancellationToken, delay: Duration) -> Result<(), MessagingError> {
    if delay.is_zero() {
        return Ok(());
    }
    tokio::select! {
        _ = cancel.cancelled() => Err(MessagingError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

#[async_trait]
impl<D, G, T> RowAction for NotificationSender<D, G, T>
where
    D: BrowserDriver,
    G: LoginGate,
    T: MessageTemplate,
{
    fn name(&self) -> &str {
        &self.column
    }

    async fn apply(&mut self, row: Row<'_>) -> Cell {
        Cell::text(self.send_row(row).await.to_string())
    }
}
