//! REPL runner: converts teloxide messages to core::Message and passes them to
//! the HandlerChain via teloxide's REPL.

use crate::adapters::TelegramMessageWrapper;
use crate::config::TelegramConfig;
use anyhow::Result;
use rolebot_core::{HandlerChain, ToCoreMessage};
use teloxide::prelude::*;
use tracing::{error, info};

/// Builds the teloxide Bot from config, applying the API URL override when set
/// (e.g. a local mock server in tests).
pub fn build_teloxide_bot(config: &TelegramConfig) -> teloxide::Bot {
    let bot = teloxide::Bot::new(config.bot_token.clone());
    if let Some(ref url_str) = config.telegram_api_url {
        match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        }
    } else {
        bot
    }
}

/// Starts the REPL with the given teloxide Bot and HandlerChain.
///
/// Each text message is converted to core::Message and handled inline, so
/// messages are dispatched in arrival order; non-text updates are skipped.
/// Handler errors are logged and never stop the loop.
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    let chain = handler_chain;
    teloxide::repl(
        bot,
        move |_bot: Bot, msg: teloxide::types::Message| {
            let chain = chain.clone();

            async move {
                if msg.text().is_none() {
                    return Ok(());
                }

                let wrapper = TelegramMessageWrapper(&msg);
                let core_msg = wrapper.to_core();

                info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    message_id = %core_msg.id,
                    "Received message"
                );

                if let Err(e) = chain.handle(&core_msg).await {
                    error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                }

                Ok(())
            }
        },
    )
    .await;

    Ok(())
}
