//! CLI argument parsing for the dispatch-worker binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dispatch-worker", about = "Delivery dispatch backend worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Run database migrations and exit
    Migrate,
    /// Create or update a super admin user interactively
    CreateAdmin {
        /// Admin email address
        #[arg(long)]
        email: String,
        /// Display name for the admin user
        #[arg(long, default_value = "Administrator")]
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_migrate_command_parses() {
        let cli = Cli::parse_from(["dispatch-worker", "migrate"]);
        assert!(matches!(cli.command, Some(Command::Migrate)));
    }

    #[test]
    fn test_cli_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["dispatch-worker"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_create_admin_requires_email() {
        let result = Cli::try_parse_from(["dispatch-worker", "create-admin"]);
        assert!(result.is_err());

        let cli = Cli::parse_from(["dispatch-worker", "create-admin", "--email", "a@b.c"]);
        match cli.command {
            Some(Command::CreateAdmin { email, name }) => {
                assert_eq!(email, "a@b.c");
                assert_eq!(name, "Administrator");
            }
            _ => panic!("expected create-admin"),
        }
    }
}
