//! Essentia CLI
//!
//! Command-line interface for the Essentia site service.
//!
//! # Usage
//!
//! ```bash
//! essentia forms lint -f join.yaml --form join
//! essentia forms push join -f join.yaml
//! essentia forms preview join --set role=Musician
//! essentia site-lock on
//! essentia faq get --format yaml
//! essentia home push services -f services.yaml
//! ```

use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "essentia")]
#[command(author = "Essentia")]
#[command(version = "0.1.0")]
#[command(about = "Essentia site Command Line Interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "ESSENTIA_API_URL")]
    api_url: Option<String>,

    /// Admin session token
    #[arg(long, env = "ESSENTIA_TOKEN")]
    token: Option<String>,

    /// Output format [default: table]
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage lead forms
    Forms {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Show or toggle the coming-soon lock
    SiteLock {
        #[command(subcommand)]
        action: SiteLockCommands,
    },
    /// Manage the FAQ page
    Faq {
        #[command(subcommand)]
        action: FaqCommands,
    },
    /// Manage the home page sections
    Home {
        #[command(subcommand)]
        action: HomeCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum FormCommands {
    /// Show the live configuration of a form
    Get { key: String },
    /// Check a configuration file without contacting the service
    Lint {
        #[arg(short, long)]
        file: String,
        /// Form the file is meant for
        #[arg(long, default_value = "enquire")]
        form: String,
    },
    /// Lint, then replace a form's configuration
    Push {
        key: String,
        #[arg(short, long)]
        file: String,
    },
    /// List the fields a visitor would see for the given answers
    Preview {
        key: String,
        /// Use a local file instead of the live configuration
        #[arg(short, long)]
        file: Option<String>,
        /// Answer as name=value; repeat a name for multi-valued fields
        #[arg(long = "set")]
        values: Vec<String>,
    },
}

#[derive(Subcommand)]
enum SiteLockCommands {
    /// Show whether the site is locked
    Status,
    /// Lock the site
    On,
    /// Unlock the site
    Off,
}

#[derive(Subcommand)]
enum FaqCommands {
    /// Show the FAQ page content
    Get,
    /// Replace the FAQ page content from a file
    Push {
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HomeSection {
    Hero,
    About,
    Services,
    Clients,
}

#[derive(Subcommand)]
enum HomeCommands {
    /// Show a section's content
    Get { section: HomeSection },
    /// Replace a section's content from a file
    Push {
        section: HomeSection,
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = config::Config::load(cli.profile.as_deref()).unwrap_or_default();
    let api_url = cli
        .api_url
        .or(config.api_url)
        .unwrap_or_else(|| config::DEFAULT_API_URL.to_string());
    let token = cli.token.or(config.token);
    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(|f| output::OutputFormat::from_str(f, true).ok())
        })
        .unwrap_or(output::OutputFormat::Table);

    let client = commands::ApiClient::new(&api_url, token.as_deref());

    let result = match cli.command {
        Commands::Forms { action } => commands::forms::handle(action, &client, format).await,
        Commands::SiteLock { action } => commands::site_lock::handle(action, &client, format).await,
        Commands::Faq { action } => commands::faq::handle(action, &client, format).await,
        Commands::Home { action } => commands::home::handle(action, &client, format).await,
        Commands::Config { action } => commands::config::handle(action).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
