//! # rolebot-telegram
//!
//! Telegram framework layer: adapters from teloxide types to core types, the
//! [`rolebot_core::Bot`] implementation, minimal config, and the REPL runner.
//! Handles only Telegram connectivity and handler-chain execution; no session
//! or inference logic.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::{build_teloxide_bot, run_repl};
