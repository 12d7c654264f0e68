use clap::Subcommand;
use uuid::Uuid;

use crate::auth::{Identity, TokenCodec};
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a seller token")]
    Seller {
        #[arg(help = "Seller user id")]
        user_id: Uuid,
    },

    #[command(about = "Sign a store customer token")]
    Customer {
        #[arg(help = "Customer id")]
        customer_id: Uuid,
        #[arg(help = "Store id")]
        store_id: Uuid,
        #[arg(help = "Store slug")]
        store_slug: String,
    },
}

pub fn handle(cmd: TokenCommands, config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let identity = match cmd {
        TokenCommands::Seller { user_id } => Identity::Seller { user_id },
        TokenCommands::Customer {
            customer_id,
            store_id,
            store_slug,
        } => Identity::Customer {
            customer_id,
            store_id,
            store_slug,
        },
    };

    let token = TokenCodec::from_config(&config.security).issue(identity)?;
    output_value(output_format, "token", &token)
}
