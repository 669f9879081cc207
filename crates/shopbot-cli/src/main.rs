mod bot;
mod shop;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::bot::BotCommands;
use crate::shop::ShopCommands;

#[derive(Debug, Parser)]
#[command(name = "shopbot")]
#[command(about = "Shop bot and storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Bot commands and the Discord relay
    Bot {
        #[command(subcommand)]
        command: BotCommands,
    },
    /// Browse products, manage the cart and check out
    Shop {
        #[command(subcommand)]
        command: ShopCommands,
    },
    /// Show the number of items in the cart and its total
    Cart,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parsing first keeps `--help` working with a broken environment.
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("shopbot ready; run `shopbot --help` for commands");
        return Ok(());
    };

    dotenvy::dotenv().ok();
    let config = shopbot_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Bot { command } => bot::run_bot(&config, command).await?,
        Commands::Shop { command } => shop::run_shop(&config, command).await?,
        Commands::Cart => shop::run_cart_badge(&config)?,
    }

    Ok(())
}
