use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Wedding guest list manager
#[derive(Parser, Debug)]
#[command(name = "guestlist", version)]
#[command(about = "Reconcile the guest list, mirror it to MySQL and send WhatsApp invitations")]
pub struct Cli {
    /// Directory holding guest.xlsx and to_wsp.xlsx
    #[arg(long, global = true, env = "GUESTLIST_DATA_DIR", default_value = "Data")]
    pub data_dir: PathBuf,

    /// Mirror table name (overrides GUESTLIST_TABLE)
    #[arg(long, global = true, value_name = "NAME")]
    pub table: Option<String>,

    /// Log as JSON lines instead of text
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fill missing guest IDs and normalize guest.xlsx in place
    Reconcile,

    /// Reconcile, then rebuild the MySQL mirror from the guest list
    Sync,

    /// Send WhatsApp invitations and save a delivery snapshot
    Notify {
        /// Send to the reconciled guest list instead of to_wsp.xlsx
        #[arg(long)]
        from_guests: bool,

        /// Run the browser without a window (login must already be cached)
        #[arg(long)]
        headless: bool,
    },

    /// Print one guest of the mirror as JSON
    Lookup {
        /// Invitation code
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_flags() {
        let cli = Cli::try_parse_from(["guestlist", "notify", "--from-guests"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Notify {
                from_guests: true,
                headless: false
            }
        );
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "guestlist",
            "sync",
            "--data-dir",
            "/srv/boda",
            "--table",
            "Invitados",
        ])
        .unwrap();
        assert_eq!(cli.command, Command::Sync);
        assert_eq!(cli.data_dir, PathBuf::from("/srv/boda"));
        assert_eq!(cli.table.as_deref(), Some("Invitados"));
    }

    #[test]
    fn lookup_requires_an_id() {
        assert!(Cli::try_parse_from(["guestlist", "lookup"]).is_err());
        let cli = Cli::try_parse_from(["guestlist", "lookup", "AB12CD"]).unwrap();
        assert_eq!(cli.command, Command::Lookup { id: "AB12CD".into() });
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
