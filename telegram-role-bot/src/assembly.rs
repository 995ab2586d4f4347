//! Assembly: builds the one active inference client and the persona handler,
//! wires the handler chain, and starts the Telegram REPL.

use anyhow::Result;
use inference::InferenceConfig;
use role_handlers::PersonaChatHandler;
use rolebot_core::{init_tracing, HandlerChain};
use rolebot_telegram::{build_teloxide_bot, run_repl, TelegramBotAdapter, TelegramConfig};
use session::SessionStore;
use std::sync::Arc;
use tracing::info;

const DEFAULT_LOG_FILE: &str = "logs/telegram-role-bot.log";

/// Main entry: init logging, build components, run the REPL until shutdown.
pub async fn run_bot(telegram: TelegramConfig, inference: InferenceConfig) -> Result<()> {
    std::fs::create_dir_all("logs")?;
    let log_file = telegram
        .log_file
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    init_tracing(&log_file)?;

    info!(
        provider = ?inference.provider,
        model = %inference.model,
        "Initializing bot"
    );

    let teloxide_bot = build_teloxide_bot(&telegram);
    let bot_adapter: Arc<dyn rolebot_core::Bot> =
        Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    let handler = Arc::new(PersonaChatHandler::new(
        SessionStore::new(),
        inference.client(),
        inference.options(),
        bot_adapter,
    ));
    let handler_chain = HandlerChain::new().add_handler(handler);

    info!("Bot started successfully");

    run_repl(teloxide_bot, handler_chain).await
}
