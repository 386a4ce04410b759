//! Config commands

use crate::ConfigCommands;
use crate::config::{Config, DEFAULT_API_URL};

pub async fn handle(action: ConfigCommands) -> Result<(), String> {
    match action {
        ConfigCommands::Init => {
            let config = Config { api_url: Some(DEFAULT_API_URL.into()), ..Config::default() };
            let path = config.save()?;
            println!("Configuration initialized at {}", path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(None).unwrap_or_default();
            match key.as_str() {
                "token" => config.token = Some(value),
                "api_url" => config.api_url = Some(value),
                "default_format" => config.default_format = Some(value),
                _ => return Err(format!("Unknown config key: {}", key)),
            }
            config.save()?;
            println!("Set {} successfully", key);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load(None).unwrap_or_default();
            let value = match key.as_str() {
                "token" => config.masked_token(),
                "api_url" => config.api_url,
                "default_format" => config.default_format,
                _ => return Err(format!("Unknown config key: {}", key)),
            };
            println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
        }
        ConfigCommands::List => {
            let config = Config::load(None).unwrap_or_default();
            println!("api_url: {}", config.api_url.clone().unwrap_or_else(|| "(not set)".into()));
            println!("token: {}", config.masked_token().unwrap_or_else(|| "(not set)".into()));
            println!("default_format: {}", config.default_format.unwrap_or_else(|| "(not set)".into()));
        }
    }
    Ok(())
}
