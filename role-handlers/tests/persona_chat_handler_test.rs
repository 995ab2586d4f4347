//! Integration tests for `PersonaChatHandler`: full command/message dispatch
//! with a scripted inference client and a recording bot, no network.

use async_trait::async_trait;
use chrono::Utc;
use inference::{GenerateOptions, InferenceClient, InferenceError};
use role_handlers::PersonaChatHandler;
use rolebot_core::{
    Bot, Chat, Handler, HandlerResponse, Message, MessageDirection, Result, User,
};
use session::SessionStore;
use std::sync::{Arc, Mutex};

/// Inference client returning a fixed result and recording every prompt.
struct ScriptedClient {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for ScriptedClient {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerateOptions,
    ) -> std::result::Result<String, InferenceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(InferenceError::Backend(message.clone())),
        }
    }
}

/// Bot recording every reply text instead of hitting a transport.
#[derive(Default)]
struct RecordingBot {
    sent: Mutex<Vec<String>>,
}

impl RecordingBot {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }
}

fn message_from(user_id: i64, content: &str) -> Message {
    Message {
        id: "1".to_string(),
        user: User {
            id: user_id,
            username: Some("testuser".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: user_id,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
    }
}

fn handler_with(
    client: Arc<ScriptedClient>,
) -> (PersonaChatHandler, Arc<RecordingBot>) {
    let bot = Arc::new(RecordingBot::default());
    let handler = PersonaChatHandler::new(
        SessionStore::new(),
        client,
        GenerateOptions::default(),
        bot.clone(),
    );
    (handler, bot)
}

async fn reply_text(handler: &PersonaChatHandler, user_id: i64, content: &str) -> String {
    match handler.handle(&message_from(user_id, content)).await.unwrap() {
        HandlerResponse::Reply(text) => text,
        other => panic!("expected Reply, got {:?}", other),
    }
}

/// **Test: /start replies with the greeting describing /role usage.**
#[tokio::test]
async fn start_replies_with_greeting() {
    let client = ScriptedClient::replying("unused");
    let (handler, bot) = handler_with(client.clone());

    let reply = reply_text(&handler, 1, "/start").await;
    assert!(reply.contains("/role"));
    assert_eq!(bot.sent(), vec![reply]);
    assert!(client.prompts().is_empty());
}

/// **Test: accepted /role, then plain text: the prompt embeds persona and message, the backend reply is relayed verbatim.**
#[tokio::test]
async fn role_then_message_relays_backend_reply() {
    let client = ScriptedClient::replying("Arr, what be ye wantin'?");
    let (handler, bot) = handler_with(client.clone());

    let confirm = reply_text(&handler, 1, "/role a grumpy pirate").await;
    assert!(confirm.contains("a grumpy pirate"));

    let reply = reply_text(&handler, 1, "Ahoy!").await;
    assert_eq!(reply, "Arr, what be ye wantin'?");

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Persona description: a grumpy pirate"));
    assert!(prompts[0].contains("User message: Ahoy!"));

    assert_eq!(bot.sent().len(), 2);
    assert_eq!(bot.sent()[1], "Arr, what be ye wantin'?");
}

/// **Test: after /clear, plain text asks for a persona and makes no backend call.**
#[tokio::test]
async fn clear_disables_inference_path() {
    let client = ScriptedClient::replying("unused");
    let (handler, _bot) = handler_with(client.clone());

    reply_text(&handler, 1, "/role a grumpy pirate").await;
    let cleared = reply_text(&handler, 1, "/clear").await;
    assert_eq!(cleared, "Persona cleared.");

    let reply = reply_text(&handler, 1, "hi").await;
    assert_eq!(reply, "Set a persona first with /role.");
    assert!(client.prompts().is_empty());
}

/// **Test: deny-listed persona is rejected and /whoami still reports not set.**
#[tokio::test]
async fn denied_persona_is_rejected_and_not_stored() {
    let client = ScriptedClient::replying("unused");
    let (handler, _bot) = handler_with(client);

    let reply = reply_text(&handler, 1, "/role Donald the helper").await;
    assert_eq!(
        reply,
        "Real people are not accepted. Define a fictional persona."
    );

    let whoami = reply_text(&handler, 1, "/whoami").await;
    assert_eq!(whoami, "No persona set yet.");
}

/// **Test: /role without an argument replies with the usage hint and stores nothing.**
#[tokio::test]
async fn role_without_argument_replies_usage() {
    let client = ScriptedClient::replying("unused");
    let (handler, _bot) = handler_with(client);

    let reply = reply_text(&handler, 1, "/role").await;
    assert_eq!(reply, "Write the persona description after /role.");

    let whoami = reply_text(&handler, 1, "/whoami").await;
    assert_eq!(whoami, "No persona set yet.");
}

/// **Test: /whoami echoes the stored persona.**
#[tokio::test]
async fn whoami_reports_current_persona() {
    let client = ScriptedClient::replying("unused");
    let (handler, _bot) = handler_with(client);

    reply_text(&handler, 1, "/role a shy librarian").await;
    let whoami = reply_text(&handler, 1, "/whoami").await;
    assert_eq!(whoami, "Current persona: a shy librarian");
}

/// **Test: a backend failure becomes an error reply, not a handler error.**
#[tokio::test]
async fn backend_failure_becomes_error_reply() {
    let client = ScriptedClient::failing("rate limited");
    let (handler, bot) = handler_with(client);

    reply_text(&handler, 1, "/role a grumpy pirate").await;
    let reply = reply_text(&handler, 1, "Ahoy!").await;
    assert!(reply.starts_with("Error from backend:"));
    assert!(reply.contains("rate limited"));
    assert_eq!(bot.sent().len(), 2);
}

/// **Test: unknown commands are ignored: no reply sent, chain may continue.**
#[tokio::test]
async fn unknown_command_is_ignored() {
    let client = ScriptedClient::replying("unused");
    let (handler, bot) = handler_with(client.clone());

    let response = handler.handle(&message_from(1, "/help")).await.unwrap();
    assert_eq!(response, HandlerResponse::Ignore);
    assert!(bot.sent().is_empty());
    assert!(client.prompts().is_empty());
}

/// **Test: sessions are per user: one user's persona does not leak to another.**
#[tokio::test]
async fn sessions_are_independent_per_user() {
    let client = ScriptedClient::replying("in character");
    let (handler, _bot) = handler_with(client.clone());

    reply_text(&handler, 1, "/role a grumpy pirate").await;
    let other = reply_text(&handler, 2, "hello?").await;
    assert_eq!(other, "Set a persona first with /role.");
    assert!(client.prompts().is_empty());
}
