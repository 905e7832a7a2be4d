use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meetflow")]
#[command(about = "MeetFlow scheduling from the command line")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Base URL of the MeetFlow API
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Credential store location (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate and persist the session
    Login { email: String, password: String },

    /// Clear the persisted session
    Logout,

    /// Show the full account record for the active session
    Whoami,

    /// Show local session state without contacting the remote
    Status,

    /// Create a new account
    Register {
        name: String,
        email: String,
        password: String,
        /// Account role: client or professional
        #[arg(long, default_value = "client")]
        role: String,
    },

    /// Profile operations
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Service catalog operations
    Services {
        #[command(subcommand)]
        action: ServiceAction,
    },

    /// Booking-request operations
    Requests {
        #[command(subcommand)]
        action: RequestAction,
    },

    /// List confirmed appointments
    Schedule {
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Book an appointment for an accepted request
    Book {
        request_id: String,
        #[arg(long)]
        service: String,
        /// ISO-8601 start instant
        #[arg(long)]
        date: String,
        #[arg(long)]
        message: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Show the active user's profile
    Show,
    /// Update profile fields (optimistic; rolled back on rejection)
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        head_line: Option<String>,
    },
    /// Attach a profile photo by URL
    Photo { url: String },
}

#[derive(Subcommand, Debug)]
pub enum ServiceAction {
    /// List the active user's services
    List {
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Create a service
    Create {
        name: String,
        /// Duration in minutes
        #[arg(long)]
        duration: u32,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RequestAction {
    /// List pending booking requests
    List {
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Accept a request: books the appointment, then confirms the request
    Accept {
        request_id: String,
        #[arg(long)]
        service: String,
    },
    /// Decline a request
    Decline { request_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_login_with_global_flags() {
        let cli = Cli::try_parse_from([
            "meetflow",
            "--base-url",
            "http://localhost:3333",
            "-vv",
            "login",
            "a@b.com",
            "secret",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3333"));
        assert!(matches!(cli.command, Commands::Login { .. }));
    }

    #[test]
    fn parses_request_accept_with_service() {
        let cli = Cli::try_parse_from(["meetflow", "requests", "accept", "r9", "--service", "s1"]).unwrap();
        match cli.command {
            Commands::Requests { action: RequestAction::Accept { request_id, service } } => {
                assert_eq!(request_id, "r9");
                assert_eq!(service, "s1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
