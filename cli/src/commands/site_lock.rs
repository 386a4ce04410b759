//! Site lock commands

use crate::{SiteLockCommands, output::OutputFormat};
use super::ApiClient;
use colored::Colorize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SiteLock {
    pub enabled: bool,
}

pub async fn handle(action: SiteLockCommands, client: &ApiClient, format: OutputFormat) -> Result<(), String> {
    let state: SiteLock = match action {
        SiteLockCommands::Status => client.get("/api/settings/site-lock").await?,
        SiteLockCommands::On => client.put("/api/settings/site-lock", &SiteLock { enabled: true }).await?,
        SiteLockCommands::Off => client.put("/api/settings/site-lock", &SiteLock { enabled: false }).await?,
    };

    match format {
        OutputFormat::Table if state.enabled => println!("{} site is locked (coming soon)", "●".yellow()),
        OutputFormat::Table => println!("{} site is public", "●".green()),
        _ => format.print(&state),
    }
    Ok(())
}
