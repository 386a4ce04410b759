//! Output formatting

use clap::ValueEnum;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn print<T: Serialize>(&self, data: &T) {
        match self {
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
        }
    }

    /// Rows as a table, or the serialized data for the other formats.
    pub fn print_rows<T, R>(&self, data: &T, rows: Vec<R>)
    where
        T: Serialize,
        R: Tabled,
    {
        match self {
            OutputFormat::Table => println!("{}", Table::new(rows)),
            _ => self.print(data),
        }
    }
}
