//! # telegram-role-bot
//!
//! Full integration and entry point: CLI parsing, config loading, and assembly
//! of session store, inference client, persona handler, and the Telegram REPL.

pub mod assembly;
pub mod cli;

pub use assembly::run_bot;
pub use cli::{load_config, Cli, Commands};
