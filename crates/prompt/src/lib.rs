//! # Prompt
//!
//! Formats a persona description and a user message into a single role-play
//! prompt string for text-generation models.
//!
//! ## Format
//!
//! Four parts, in fixed order, separated by blank lines:
//!
//! - safety preamble ([`ROLE_PLAY_PREAMBLE`])
//! - `Persona description: {persona}`
//! - `User message: {message}`
//! - closing instruction ([`CLOSING_INSTRUCTION`])
//!
//! ## Usage
//!
//! Used by the `role-handlers` crate on the plain-text message path. Persona
//! validation happens at session-write time, not here; this module is pure
//! formatting.
//!
//! ## External interactions
//!
//! - **AI models**: output is sent verbatim to the configured inference backend.

/// Fixed safety preamble: consensual fictional role-play, never claim to be a
/// real person, never solicit sensitive or actionable information.
pub const ROLE_PLAY_PREAMBLE: &str = "You are engaging in a consensual role-play with the user. \
The user fully knows you are an AI model. \
Your only task is to simulate natural human-like behavior in conversation, \
based on the persona description below. \
Never claim to be a real person. \
Do not ask the user for sensitive or actionable info.";

/// Section prefix for the persona block.
pub const SECTION_PERSONA: &str = "Persona description: ";

/// Section prefix for the user message block.
pub const SECTION_USER_MESSAGE: &str = "User message: ";

/// Fixed closing instruction appended after the user message.
pub const CLOSING_INSTRUCTION: &str = "Reply naturally in style of the persona.";

/// Builds the role-play prompt from a persona description and a user message.
///
/// Deterministic, pure function: same inputs always produce the same output.
/// Persona and message are embedded verbatim; no filtering is applied here.
pub fn build_prompt(persona: &str, user_message: &str) -> String {
    let mut out = String::new();
    out.push_str(ROLE_PLAY_PREAMBLE);
    out.push_str("\n\n");
    out.push_str(SECTION_PERSONA);
    out.push_str(persona);
    out.push_str("\n\n");
    out.push_str(SECTION_USER_MESSAGE);
    out.push_str(user_message);
    out.push_str("\n\n");
    out.push_str(CLOSING_INSTRUCTION);
    out.push('\n');
    out
}
