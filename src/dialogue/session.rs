//! Per-user dialogue sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::DialogueError;

use super::model::{BusinessProfile, ProfileDraft};
use super::prompts;
use super::state::DialoguePhase;

/// What the bot does after an answer is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Ask the next question.
    Ask(&'static str),
    /// All questions answered.
    Complete(BusinessProfile),
}

/// One user's progress through the questions.
#[derive(Debug, Clone)]
pub struct DialogueSession {
    pub id: Uuid,
    pub channel: String,
    pub user_id: String,
    phase: DialoguePhase,
    draft: ProfileDraft,
    pub started_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl DialogueSession {
    pub fn new(channel: impl Into<String>, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            channel: channel.into(),
            user_id: user_id.into(),
            phase: DialoguePhase::default(),
            draft: ProfileDraft::new(),
            started_at: now,
            last_active_at: now,
        }
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    /// Record the answer to the current question and move on.
    pub fn answer(&mut self, text: &str) -> Result<Step, DialogueError> {
        self.touch();
        let from = self.phase;
        let next = from
            .next()
            .ok_or(DialogueError::AlreadyFinished { phase: from })?;

        self.draft.record(from, text)?;
        self.transition(next)?;

        if next == DialoguePhase::Completed {
            let draft = std::mem::take(&mut self.draft);
            return Ok(Step::Complete(draft.finish()?));
        }

        let question = prompts::question(next)
            .ok_or(DialogueError::InvalidTransition { from, to: next })?;
        Ok(Step::Ask(question))
    }

    /// Abandon the dialogue.
    pub fn cancel(&mut self) -> Result<(), DialogueError> {
        self.touch();
        self.transition(DialoguePhase::Cancelled)
    }

    fn transition(&mut self, to: DialoguePhase) -> Result<(), DialogueError> {
        if !self.phase.can_transition_to(to) {
            return Err(DialogueError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        tracing::debug!(session = %self.id, from = %self.phase, to = %to, "Dialogue phase change");
        self.phase = to;
        Ok(())
    }

    fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    /// Whether the session has been idle for longer than `max_idle`.
    pub fn is_stale(&self, max_idle: Duration, now: DateTime<Utc>) -> bool {
        let idle = now.signed_duration_since(self.last_active_at);
        idle.to_std().map(|idle| idle > max_idle).unwrap_or(false)
    }
}

/// Sessions are keyed by channel and user so the same person on two
/// channels holds two independent dialogues.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SessionKey {
    channel: String,
    user_id: String,
}

impl SessionKey {
    fn new(channel: &str, user_id: &str) -> Self {
        Self {
            channel: channel.to_string(),
            user_id: user_id.to_string(),
        }
    }
}

/// Holds every active dialogue session.
#[derive(Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionKey, Arc<Mutex<DialogueSession>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh session, replacing any existing one for this user.
    pub async fn start(&self, channel: &str, user_id: &str) -> Arc<Mutex<DialogueSession>> {
        let session = Arc::new(Mutex::new(DialogueSession::new(channel, user_id)));
        let replaced = self
            .sessions
            .write()
            .await
            .insert(SessionKey::new(channel, user_id), Arc::clone(&session));
        if replaced.is_some() {
            tracing::debug!(channel, user_id, "Restarted dialogue session");
        }
        session
    }

    pub async fn get(&self, channel: &str, user_id: &str) -> Option<Arc<Mutex<DialogueSession>>> {
        self.sessions
            .read()
            .await
            .get(&SessionKey::new(channel, user_id))
            .cloned()
    }

    /// Drop the user's session. Returns whether one existed.
    pub async fn end(&self, channel: &str, user_id: &str) -> bool {
        self.sessions
            .write()
            .await
            .remove(&SessionKey::new(channel, user_id))
            .is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Remove sessions idle for longer than `max_idle`. Returns how many went.
    pub async fn prune_stale_sessions(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        let mut stale = Vec::new();
        for (key, session) in sessions.iter() {
            // A session locked by an in-flight turn is in use, not stale.
            let Ok(session) = session.try_lock() else {
                continue;
            };
            if session.is_stale(max_idle, now) {
                stale.push(key.clone());
            }
        }
        for key in &stale {
            sessions.remove(key);
        }

        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::info!(pruned, remaining = sessions.len(), "Pruned idle dialogue sessions");
        }
        pruned
    }
}
