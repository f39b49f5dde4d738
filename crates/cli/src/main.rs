//! `guestlist` command-line entry point.
//!
//! ```bash
//! guestlist reconcile
//! guestlist sync --table Lista_de_invitados
//! guestlist notify [--from-guests] [--headless]
//! guestlist lookup AB12CD
//! ```

use clap::Parser;
use guestlist_db::DbConfig;
use guestlist_sheets::DataPaths;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Command};

const DEFAULT_LOG_FILTER: &str =
    "guestlist=info,guestlist_sheets=info,guestlist_db=info,guestlist_messaging=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let paths = DataPaths::new(cli.data_dir.clone());
    let db_config = || -> anyhow::Result<DbConfig> {
        let mut config = DbConfig::from_env()?;
        if let Some(table) = &cli.table {
            config.table = table.clone();
        }
        Ok(config)
    };

    match &cli.command {
        Command::Reconcile => commands::reconcile(&paths).map(|_| ()),
        Command::Sync => commands::sync(&paths, &db_config()?).await,
        Command::Notify {
            from_guests,
            headless,
        } => commands::notify(&paths, *from_guests, *headless).await,
        Command::Lookup { id } => commands::lookup(&db_config()?, id).await,
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
