pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "storefront-api")]
#[command(about = "Storefront API - multi-tenant storefront backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Use the in-process store instead of Postgres")]
        in_memory: bool,
    },

    #[command(about = "Apply database migrations")]
    Migrate,

    #[command(about = "Issue signed tokens for local testing")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Show the base store slug derived from a name")]
    Slug {
        #[arg(help = "Store name")]
        name: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve { port, in_memory } => commands::serve::handle(config, port, in_memory).await,
        Commands::Migrate => commands::migrate::handle(config, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, config, output_format),
        Commands::Slug { name } => commands::slug::handle(&name, output_format),
    }
}
