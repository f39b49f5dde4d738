use std::str::FromStr;

use sqlx::mysql::MySqlConnectOptions;

use crate::error::MirrorError;

/// Canonical name of the mirrored guest table.
pub const DEFAULT_TABLE: &str = "Lista_de_invitados";

/// MySQL connection settings.
///
/// Either a full `DATABASE_URL` or the individual `DB_*` parts; the URL
/// wins when both are present.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Table the guest list is mirrored into.
    pub table: String,
}

impl DbConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default              |
    /// |-------------------|----------------------|
    /// | `DATABASE_URL`    | unset                |
    /// | `DB_HOST`         | `localhost`          |
    /// | `DB_PORT`         | `3306`               |
    /// | `DB_USER`         | `root`               |
    /// | `DB_PASSWORD`     | empty                |
    /// | `DB_NAME`         | `wedding`            |
    /// | `GUESTLIST_TABLE` | `Lista_de_invitados` |
    pub fn from_env() -> Result<Self, MirrorError> {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        let port = var("DB_PORT", "3306");
        let port: u16 = port
            .parse()
            .map_err(|_| MirrorError::Config(format!("DB_PORT must be a valid u16, got {port:?}")))?;

        Ok(Self {
            url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: var("DB_HOST", "localhost"),
            port,
            user: var("DB_USER", "root"),
            password: var("DB_PASSWORD", ""),
            database: var("DB_NAME", "wedding"),
            table: var("GUESTLIST_TABLE", DEFAULT_TABLE),
        })
    }

    pub fn connect_options(&self) -> Result<MySqlConnectOptions, MirrorError> {
        if let Some(url) = &self.url {
            return MySqlConnectOptions::from_str(url)
                .map_err(|e| MirrorError::Config(format!("Invalid DATABASE_URL: {e}")));
        }
        Ok(MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database))
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".into(),
            port: 3306,
            user: "root".into(),
            password: String::new(),
            database: "wedding".into(),
            table: DEFAULT_TABLE.into(),
        }
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("table", &self.table)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_credentials() {
        let config = DbConfig {
            url: Some("mysql://root:hunter2@db/wedding".into()),
            password: "hunter2".into(),
            ..DbConfig::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("Lista_de_invitados"));
    }

    #[test]
    fn url_is_parsed_into_options() {
        let config = DbConfig {
            url: Some("mysql://guest:pw@db.internal:3307/boda".into()),
            ..DbConfig::default()
        };
        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 3307);
        assert_eq!(options.get_username(), "guest");
        assert_eq!(options.get_database(), Some("boda"));
    }

    #[test]
    fn malformed_url_is_a_config_error() {
        let config = DbConfig {
            url: Some("not a url".into()),
            ..DbConfig::default()
        };
        assert!(matches!(
            config.connect_options(),
            Err(MirrorError::Config(msg)) if msg.contains("DATABASE_URL")
        ));
    }
}
