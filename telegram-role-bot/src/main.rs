//! telegram-role-bot: entry point. Combines CLI, env config, and the persona relay bot.

use anyhow::Result;
use clap::Parser;
use telegram_role_bot::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let (telegram, inference) = load_config(token)?;
            run_bot(telegram, inference).await
        }
    }
}
