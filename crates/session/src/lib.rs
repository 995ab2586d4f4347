//! # Session
//!
//! In-memory mapping from user id to an optional persona string. A session
//! with no persona is indistinguishable from one never created; nothing is
//! persisted across restarts.
//!
//! Persona writes are validated against [`REAL_PERSON_DENYLIST`]: any persona
//! whose lowercased text contains one of the listed substrings is rejected and
//! the store is left unchanged. The check is a literal substring match against
//! this fixed list, nothing stricter.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

/// Substrings identifying real public figures; matched case-insensitively
/// against persona text at write time.
pub const REAL_PERSON_DENYLIST: &[&str] = &[
    "donald",
    "elon",
    "musk",
    "president",
    "trump",
    "biden",
    "putin",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The persona text matched the real-person deny-list; the stored value is unchanged.
    #[error("persona matches real-person deny-list entry \"{0}\"")]
    PersonaRejected(String),
}

type PersonaMap = HashMap<i64, String>;

/// In-memory persona store, keyed by user id. Cheap to clone; clones share the map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    personas: Arc<RwLock<PersonaMap>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            personas: Arc::new(RwLock::new(PersonaMap::new())),
        }
    }

    /// Returns the deny-list entry contained in `persona` (lowercased), if any.
    fn denied_substring(persona: &str) -> Option<&'static str> {
        let lower = persona.to_lowercase();
        REAL_PERSON_DENYLIST
            .iter()
            .copied()
            .find(|name| lower.contains(name))
    }

    /// Returns the stored persona for the user, or None when not set. No side effects.
    pub async fn get(&self, user_id: i64) -> Option<String> {
        let personas = self.personas.read().await;
        personas.get(&user_id).cloned()
    }

    /// Stores or overwrites the persona for the user.
    ///
    /// Rejects persona text containing a deny-listed substring (case-insensitive);
    /// on rejection the previously stored value, if any, is kept.
    pub async fn set(&self, user_id: i64, persona: &str) -> Result<(), SessionError> {
        if let Some(name) = Self::denied_substring(persona) {
            info!(user_id, matched = name, "Persona rejected by deny-list");
            return Err(SessionError::PersonaRejected(name.to_string()));
        }
        let mut personas = self.personas.write().await;
        personas.insert(user_id, persona.to_string());
        info!(user_id, persona_len = persona.len(), "Persona stored");
        Ok(())
    }

    /// Removes the stored persona for the user. Clearing an unset session is not an error.
    pub async fn clear(&self, user_id: i64) {
        let mut personas = self.personas.write().await;
        personas.remove(&user_id);
        info!(user_id, "Persona cleared");
    }
}
