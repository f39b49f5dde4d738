//! Manual login confirmation.
//!
//! WhatsApp Web needs a QR code scanned on a phone before any chat can be
//! opened. The sender blocks on a [`LoginGate`] until the operator says the
//! session is logged in.

use std::future::Future;
use std::io::{self, BufRead};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::MessagingError;

/// Blocks until the operator confirms the browser session is logged in.
#[async_trait]
pub trait LoginGate: Send + Sync {
    /// Resolve once login is confirmed. Fails with
    /// [`MessagingError::LoginCancelled`] when `cancel` fires first and
    /// [`MessagingError::LoginTimeout`] when `timeout` elapses first.
    async fn confirm(
        &self,
        cancel: &CancellationToken,
        timeout: Option<Duration>,
    ) -> Result<(), MessagingError>;
}

/// Race `confirmation` against `cancel` and the optional `timeout`.
pub async fn gated<F>(
    confirmation: F,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> Result<(), MessagingError>
where
    F: Future<Output = Result<(), MessagingError>>,
{
    let bounded = async {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, confirmation).await {
                Ok(result) => result,
                Err(_) => Err(MessagingError::LoginTimeout(limit)),
            },
            None => confirmation.await,
        }
    };

    tokio::select! {
        _ = cancel.cancelled() => Err(MessagingError::LoginCancelled),
        result = bounded => result,
    }
}

/// Prompts on stdout and waits for Enter on stdin.
#[derive(Debug, Clone)]
pub struct StdinGate {
    prompt: String,
}

impl StdinGate {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl Default for StdinGate {
    fn default() -> Self {
        Self::new("Scan the QR code in the browser, then press Enter")
    }
}

#[async_trait]
impl LoginGate for StdinGate {
    async fn confirm(
        &self,
        cancel: &CancellationToken,
        timeout: Option<Duration>,
    ) -> Result<(), MessagingError> {
        let confirmation = async {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(format!("{}\n", self.prompt).as_bytes())
                .await
                .map_err(MessagingError::LoginInput)?;
            stdout.flush().await.map_err(MessagingError::LoginInput)?;

            read_confirmation(|| io::stdin().lock()).await
        };

        gated(confirmation, cancel, timeout).await?;
        tracing::info!("Login confirmed");
        Ok(())
    }
}

/// Wait for one line from the reader `open` returns.
///
/// The read blocks a detached thread, so dropping the returned future
/// abandons it without holding up runtime shutdown. End of input is an
/// error, never a confirmation.
async fn read_confirmation<R, F>(open: F) -> Result<(), MessagingError>
where
    R: BufRead,
    F: FnOnce() -> R + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    std::thread::Builder::new()
        .name("login-gate".into())
        .spawn(move || {
            let mut line = String::new();
            let _ = tx.send(open().read_line(&mut line));
        })
        .map_err(MessagingError::LoginInput)?;

    match rx.await {
        Ok(Ok(0)) => Err(MessagingError::LoginInput(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before login was confirmed",
        ))),
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(MessagingError::LoginInput(e)),
        Err(_) => Err(MessagingError::LoginInput(io::Error::other(
            "login input reader stopped",
        ))),
    }
}
