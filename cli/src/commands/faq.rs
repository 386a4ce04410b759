//! FAQ commands

use crate::{FaqCommands, output::OutputFormat};
use super::{ApiClient, read_document};
use colored::Colorize;
use essentia_forms::FaqConfig;
use tabled::Tabled;

#[derive(Tabled)]
struct FaqRow {
    id: String,
    category: String,
    question: String,
    cta: String,
}

pub async fn handle(action: FaqCommands, client: &ApiClient, format: OutputFormat) -> Result<(), String> {
    match action {
        FaqCommands::Get => {
            let faq: FaqConfig = client.get("/api/settings/faq").await?;
            let rows: Vec<FaqRow> = faq
                .items
                .iter()
                .map(|item| FaqRow {
                    id: item.id.clone(),
                    category: item.category.clone().unwrap_or_default(),
                    question: item.question.clone(),
                    cta: item.cta_label.clone().unwrap_or_default(),
                })
                .collect();
            format.print_rows(&faq, rows);
        }
        FaqCommands::Push { file } => {
            let raw = read_document(&file)?;
            let faq: FaqConfig = client.put("/api/settings/faq", &raw).await?;
            println!("{} FAQ saved with {} item(s)", "✓".green(), faq.items.len());
        }
    }
    Ok(())
}
