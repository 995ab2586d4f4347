//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use inference::InferenceConfig;
use rolebot_telegram::TelegramConfig;

#[derive(Parser)]
#[command(name = "telegram-role-bot")]
#[command(about = "Persona role-play relay bot for Telegram", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

/// Loads both configs from environment. If `token` is provided it overrides BOT_TOKEN.
/// Missing required credentials fail here, before any component starts.
pub fn load_config(token: Option<String>) -> Result<(TelegramConfig, InferenceConfig)> {
    let telegram = match token {
        Some(token) => {
            let mut config = TelegramConfig::with_token(token);
            config.telegram_api_url = std::env::var("TELEGRAM_API_URL").ok();
            config.log_file = std::env::var("LOG_FILE").ok();
            config
        }
        None => TelegramConfig::from_env()?,
    };
    let inference = InferenceConfig::from_env()?;
    Ok((telegram, inference))
}
