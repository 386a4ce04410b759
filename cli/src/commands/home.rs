//! Home page section commands

use crate::{HomeCommands, HomeSection, output::OutputFormat};
use super::{ApiClient, read_document};
use colored::Colorize;
use serde_json::Value;

fn section_path(section: HomeSection) -> String {
    let name = match section {
        HomeSection::Hero => "hero",
        HomeSection::About => "about",
        HomeSection::Services => "services",
        HomeSection::Clients => "clients",
    };
    format!("/api/home/{name}")
}

pub async fn handle(action: HomeCommands, client: &ApiClient, format: OutputFormat) -> Result<(), String> {
    match action {
        HomeCommands::Get { section } => {
            let content: Value = client.get(&section_path(section)).await?;
            format.print(&content);
        }
        HomeCommands::Push { section, file } => {
            let raw = read_document(&file)?;
            let _: Value = client.put(&section_path(section), &raw).await?;
            println!("{} {:?} section saved", "✓".green(), section);
        }
    }
    Ok(())
}
