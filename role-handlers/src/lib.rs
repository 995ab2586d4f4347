//! # Role handlers
//!
//! Command and message dispatch for the persona relay bot: `/start`, `/role`,
//! `/whoami`, `/clear`, and the plain-text path that calls the inference
//! backend. Runs inside the rolebot-core handler chain.

mod persona_chat_handler;

pub use persona_chat_handler::PersonaChatHandler;
