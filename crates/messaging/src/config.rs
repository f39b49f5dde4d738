use std::path::PathBuf;
use std::time::Duration;

use guestlist_core::message::InvitationTemplate;
use guestlist_core::phone::DEFAULT_COUNTRY_CODE;

use crate::driver::Locator;
use crate::error::MessagingError;

/// Default chromedriver address.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

pub const DEFAULT_WHATSAPP_URL: &str = "https://web.whatsapp.com/";

/// The chat's message input box in WhatsApp Web.
pub const DEFAULT_CHAT_INPUT_XPATH: &str =
    "/html/body/div[1]/div/div/div[5]/div/footer/div[1]/div/span[2]/div/div[2]/div[1]/div/div[1]/p";

/// Segment sent first to every chat, before the invitation itself.
pub const DEFAULT_WARMUP_SEGMENT: &str = ".";

/// Waits between browser steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Upper bound on waiting for a chat's input box.
    pub chat_ready_timeout: Duration,
    /// Pause before each row and after each chat becomes ready.
    pub settle_delay: Duration,
    /// Pause after each submitted segment.
    pub segment_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            chat_ready_timeout: Duration::from_secs(600),
            settle_delay: Duration::from_secs(5),
            segment_delay: Duration::from_secs(2),
        }
    }
}

impl Pacing {
    /// No pauses at all; only the chat timeout remains.
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            segment_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Settings for a notification run.
#[derive(Debug, Clone)]
pub struct MessagingConfig {
    pub webdriver_url: String,
    /// Messaging endpoint; chats are opened at `<endpoint>send?phone=<n>`.
    pub whatsapp_url: String,
    pub country_code: String,
    pub chat_input: Locator,
    pub pacing: Pacing,
    /// `None` waits for the login confirmation indefinitely.
    pub login_timeout: Option<Duration>,
    pub warmup_segment: Option<String>,
    pub invitation_link: Option<String>,
    /// File whose contents replace the built-in venue details.
    pub venue_details_file: Option<PathBuf>,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.into(),
            whatsapp_url: DEFAULT_WHATSAPP_URL.into(),
            country_code: DEFAULT_COUNTRY_CODE.into(),
            chat_input: Locator::XPath(DEFAULT_CHAT_INPUT_XPATH.into()),
            pacing: Pacing::default(),
            login_timeout: None,
            warmup_segment: Some(DEFAULT_WARMUP_SEGMENT.into()),
            invitation_link: None,
            venue_details_file: None,
        }
    }
}

impl MessagingConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                      |
    /// |---------------------------|------------------------------|
    /// | `WEBDRIVER_URL`           | `http://localhost:9515`      |
    /// | `WHATSAPP_URL`            | `https://web.whatsapp.com/`  |
    /// | `COUNTRY_CODE`            | `+51`                        |
    /// | `CHAT_INPUT_XPATH`        | WhatsApp Web footer input    |
    /// | `CHAT_READY_TIMEOUT_SECS` | `600`                        |
    /// | `SETTLE_DELAY_SECS`       | `5`                          |
    /// | `SEGMENT_DELAY_SECS`      | `2`                          |
    /// | `LOGIN_TIMEOUT_SECS`      | unset                        |
    /// | `INVITATION_LINK`         | built-in link                |
    /// | `VENUE_DETAILS_FILE`      | unset                        |
    pub fn from_env() -> Result<Self, MessagingError> {
        let defaults = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut whatsapp_url = var("WHATSAPP_URL").unwrap_or(defaults.whatsapp_url);
        if !whatsapp_url.ends_with('/') {
            whatsapp_url.push('/');
        }

        let pacing = Pacing {
            chat_ready_timeout: secs_var("CHAT_READY_TIMEOUT_SECS")?
                .unwrap_or(defaults.pacing.chat_ready_timeout),
            settle_delay: secs_var("SETTLE_DELAY_SECS")?.unwrap_or(defaults.pacing.settle_delay),
            segment_delay: secs_var("SEGMENT_DELAY_SECS")?
                .unwrap_or(defaults.pacing.segment_delay),
        };

        Ok(Self {
            webdriver_url: var("WEBDRIVER_URL").unwrap_or(defaults.webdriver_url),
            whatsapp_url,
            country_code: var("COUNTRY_CODE").unwrap_or(defaults.country_code),
            chat_input: var("CHAT_INPUT_XPATH")
                .map(Locator::XPath)
                .unwrap_or(defaults.chat_input),
            pacing,
            login_timeout: secs_var("LOGIN_TIMEOUT_SECS")?,
            warmup_segment: defaults.warmup_segment,
            invitation_link: var("INVITATION_LINK"),
            venue_details_file: var("VENUE_DETAILS_FILE").map(PathBuf::from),
        })
    }

    /// The invitation template with the configured link and venue text.
    pub fn template(&self) -> Result<InvitationTemplate, MessagingError> {
        let mut template = InvitationTemplate::default();
        if let Some(link) = &self.invitation_link {
            template.link = link.clone();
        }
        if let Some(path) = &self.venue_details_file {
            template.venue_details = std::fs::read_to_string(path).map_err(|e| {
                MessagingError::Config(format!("cannot read {}: {e}", path.display()))
            })?;
        }
        Ok(template)
    }
}

fn secs_var(name: &str) -> Result<Option<Duration>, MessagingError> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| MessagingError::Config(format!("{name} must be whole seconds, got {raw:?}"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pacing_matches_manual_sending() {
        let pacing = Pacing::default();
        assert_eq!(pacing.chat_ready_timeout, Duration::from_secs(600));
        assert_eq!(pacing.settle_delay, Duration::from_secs(5));
        assert_eq!(pacing.segment_delay, Duration::from_secs(2));
    }

    #[test]
    fn immediate_pacing_keeps_the_timeout() {
        let pacing = Pacing::immediate();
        assert_eq!(pacing.settle_delay, Duration::ZERO);
        assert_eq!(pacing.chat_ready_timeout, Pacing::default().chat_ready_timeout);
    }

    #[test]
    fn template_reads_venue_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("venue.txt");
        std::fs::write(&file, "Mesa {table}").unwrap();

        let config = MessagingConfig {
            invitation_link: Some("https://boda.example/".into()),
            venue_details_file: Some(file),
            ..MessagingConfig::default()
        };
        let template = config.template().unwrap();
        assert_eq!(template.link, "https://boda.example/");
        assert_eq!(template.venue_details, "Mesa {table}");
    }

    #[test]
    fn missing_venue_file_is_a_config_error() {
        let config = MessagingConfig {
            venue_details_file: Some("/nonexistent/venue.txt".into()),
            ..MessagingConfig::default()
        };
        assert!(matches!(config.template(), Err(MessagingError::Config(_))));
    }
}
