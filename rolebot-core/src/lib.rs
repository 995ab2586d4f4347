//! # rolebot-core
//!
//! Core types and traits for the relay bot: [`Bot`], [`Handler`], message and user types,
//! the handler chain, and tracing initialization. Transport-agnostic; used by
//! rolebot-telegram and role-handlers.

pub mod bot;
pub mod chain;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use chain::HandlerChain;
pub use error::{HandlerError, Result, RolebotError};
pub use logger::init_tracing;
pub use types::{
    Chat, Handler, HandlerResponse, Message, MessageDirection, ToCoreMessage, ToCoreUser, User,
};
