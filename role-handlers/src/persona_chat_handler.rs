//! Persona chat handler: runs in the handler chain, dispatches the four
//! commands and the plain-text inference path, sends the reply to the
//! transport, and returns `HandlerResponse::Reply(text)`.

use async_trait::async_trait;
use inference::{GenerateOptions, InferenceClient};
use prompt::build_prompt;
use rolebot_core::{Bot, Handler, HandlerResponse, Message, Result};
use session::{SessionError, SessionStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

// --- User-facing reply texts ---
const MSG_GREETING: &str =
    "Hi! Use /role <description> to define the persona I should play, then just send me a message.";
const MSG_ROLE_USAGE: &str = "Write the persona description after /role.";
const MSG_ROLE_REJECTED: &str = "Real people are not accepted. Define a fictional persona.";
const MSG_WHOAMI_UNSET: &str = "No persona set yet.";
const MSG_CLEARED: &str = "Persona cleared.";
const MSG_NEED_ROLE: &str = "Set a persona first with /role.";

/// Parsed inbound text: one of the known commands, an unknown command, or plain text (None).
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Start,
    Role(&'a str),
    WhoAmI,
    Clear,
    Unknown,
}

/// Splits off a leading `/command` (with optional `@botname` suffix) and its argument.
/// Returns None for plain text.
fn parse_command(text: &str) -> Option<Command<'_>> {
    if !text.starts_with('/') {
        return None;
    }
    let (head, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let name = head.split('@').next().unwrap_or(head);
    match name {
        "/start" => Some(Command::Start),
        "/role" => Some(Command::Role(rest.trim())),
        "/whoami" => Some(Command::WhoAmI),
        "/clear" => Some(Command::Clear),
        _ => Some(Command::Unknown),
    }
}

/// Handler for persona commands and role-play messages.
///
/// Holds the session store, the one active inference client, and the transport
/// bot. Per-user handling is linearized: a lock per user id is held across the
/// session access and the backend call, so `/clear` cannot race a concurrent
/// plain-text message from the same user. Different users run concurrently.
pub struct PersonaChatHandler {
    sessions: SessionStore,
    client: Arc<dyn InferenceClient>,
    options: GenerateOptions,
    bot: Arc<dyn Bot>,
    user_locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl PersonaChatHandler {
    pub fn new(
        sessions: SessionStore,
        client: Arc<dyn InferenceClient>,
        options: GenerateOptions,
        bot: Arc<dyn Bot>,
    ) -> Self {
        Self {
            sessions,
            client,
            options,
            bot,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn user_lock(&self, user_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn cmd_role(&self, user_id: i64, persona: &str) -> String {
        if persona.is_empty() {
            return MSG_ROLE_USAGE.to_string();
        }
        match self.sessions.set(user_id, persona).await {
            Ok(()) => format!("Persona saved:\n{}", persona),
            Err(SessionError::PersonaRejected(_)) => MSG_ROLE_REJECTED.to_string(),
        }
    }

    async fn cmd_whoami(&self, user_id: i64) -> String {
        match self.sessions.get(user_id).await {
            Some(persona) => format!("Current persona: {}", persona),
            None => MSG_WHOAMI_UNSET.to_string(),
        }
    }

    async fn cmd_clear(&self, user_id: i64) -> String {
        self.sessions.clear(user_id).await;
        MSG_CLEARED.to_string()
    }

    /// Plain-text path: with a persona set, builds the prompt and calls the
    /// backend once; without one, asks the user to run /role. Backend failures
    /// become an error reply, never a crash.
    async fn chat_reply(&self, user_id: i64, text: &str) -> String {
        let Some(persona) = self.sessions.get(user_id).await else {
            return MSG_NEED_ROLE.to_string();
        };

        let prompt = build_prompt(&persona, text);
        info!(user_id, prompt_len = prompt.len(), "step: relaying message to backend");

        match self.client.generate(&prompt, &self.options).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(user_id, error = %e, "Inference call failed");
                format!("Error from backend:\n{}", e)
            }
        }
    }
}

#[async_trait]
impl Handler for PersonaChatHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let text = message.content.trim();
        if text.is_empty() {
            return Ok(HandlerResponse::Ignore);
        }

        let user_id = message.user.id;
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let reply = match parse_command(text) {
            Some(Command::Start) => MSG_GREETING.to_string(),
            Some(Command::Role(persona)) => self.cmd_role(user_id, persona).await,
            Some(Command::WhoAmI) => self.cmd_whoami(user_id).await,
            Some(Command::Clear) => self.cmd_clear(user_id).await,
            // Commands this bot does not register are left to other handlers.
            Some(Command::Unknown) => return Ok(HandlerResponse::Ignore),
            None => self.chat_reply(user_id, text).await,
        };

        self.bot.reply_to(message, &reply).await?;
        Ok(HandlerResponse::Reply(reply))
    }
}
