use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use meetflow::{Config, MeetFlow};

use crate::notify::TerminalNotifier;

const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// Everything a command needs: the assembled client and output settings.
pub struct CommandContext {
    pub client: MeetFlow,
    pub json: bool,
}

impl CommandContext {
    pub fn new(base_url: Option<String>, credentials: Option<PathBuf>, json: bool) -> anyhow::Result<Self> {
        let base_url = base_url
            .or_else(|| std::env::var("MEETFLOW_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let credentials = match credentials {
            Some(path) => path,
            None => default_credentials_path().context("could not determine config directory")?,
        };

        let config = Config::new(base_url, credentials);
        let client = MeetFlow::with_notifier(config, Arc::new(TerminalNotifier))?;
        Ok(Self { client, json })
    }

    /// Prints a result value as pretty JSON or hands it to `render` for
    /// human output.
    pub fn print(&self, value: &serde_json::Value, render: impl FnOnce(&serde_json::Value)) {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));
        } else {
            render(value);
        }
    }
}

fn default_credentials_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("meetflow").join("credentials.json"))
}
