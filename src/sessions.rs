//! Keyed session store
//!
//! Each session key owns a dedicated task holding the [`Session`] value.
//! Turns arrive over an mpsc channel and are answered over a oneshot, so
//! turns against one key are processed one at a time in arrival order
//! while distinct keys stay fully isolated. A turn either completes and
//! replies or fails outright; there is no mid-turn cancellation.

use crate::dialogue::{compose, take_turn, Session, TurnOutput};
use chrono::Local;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, RwLock};

/// Key used when the caller supplies none: the single implicit session
/// of the legacy one-conversation deployment.
const LEGACY_SESSION_KEY: &str = "legacy";

const TURN_QUEUE_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session worker for key '{0}' is gone")]
    WorkerGone(String),
}

struct TurnRequest {
    utterance: String,
    respond_to: oneshot::Sender<TurnOutput>,
}

struct SessionHandle {
    turn_tx: mpsc::Sender<TurnRequest>,
}

/// Manager for all live sessions.
pub struct SessionManager {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Process one utterance for the given key (or the implicit legacy
    /// session) and wait for its rendered reply.
    pub async fn dispatch(
        &self,
        session_key: Option<&str>,
        utterance: String,
    ) -> Result<TurnOutput, SessionError> {
        let key = session_key.unwrap_or(LEGACY_SESSION_KEY);
        let turn_tx = self.handle_for(key).await;

        let (respond_to, response_rx) = oneshot::channel();
        turn_tx
            .send(TurnRequest {
                utterance,
                respond_to,
            })
            .await
            .map_err(|_| SessionError::WorkerGone(key.to_string()))?;

        response_rx
            .await
            .map_err(|_| SessionError::WorkerGone(key.to_string()))
    }

    async fn handle_for(&self, key: &str) -> mpsc::Sender<TurnRequest> {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(key) {
                return handle.turn_tx.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        // Re-check under the write lock: another caller may have won.
        if let Some(handle) = sessions.get(key) {
            return handle.turn_tx.clone();
        }

        let (turn_tx, turn_rx) = mpsc::channel(TURN_QUEUE_DEPTH);
        tokio::spawn(run_session(key.to_string(), turn_rx));
        sessions.insert(
            key.to_string(),
            SessionHandle {
                turn_tx: turn_tx.clone(),
            },
        );
        turn_tx
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-session worker loop. Owns the session value; every turn swaps it
/// for the fresh value the turn function returns.
async fn run_session(key: String, mut turn_rx: mpsc::Receiver<TurnRequest>) {
    let mut session = Session::new();

    while let Some(request) = turn_rx.recv().await {
        let now = Local::now().naive_local();
        let result = take_turn(&session, &request.utterance, now);

        tracing::debug!(
            session_key = %key,
            from = ?session.stage,
            to = ?result.session.stage,
            "turn processed"
        );

        session = result.session;
        let output = compose(&result.reply);
        // A caller that hung up just drops its reply.
        let _ = request.respond_to.send(output);
    }

    tracing::debug!(session_key = %key, "session worker finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::TurnData;

    #[tokio::test]
    async fn turns_thread_through_one_session() {
        let manager = SessionManager::new();

        let out = manager
            .dispatch(Some("s1"), "from union station to cn tower".to_string())
            .await
            .unwrap();
        assert!(matches!(out.data, TurnData::AwaitingTransport { .. }));

        let out = manager
            .dispatch(Some("s1"), "bus".to_string())
            .await
            .unwrap();
        assert!(matches!(out.data, TurnData::AwaitingPreferences { .. }));
    }

    #[tokio::test]
    async fn sessions_are_isolated_by_key() {
        let manager = SessionManager::new();

        manager
            .dispatch(Some("a"), "from here to downtown".to_string())
            .await
            .unwrap();

        // Key "b" is still at the greeting stage.
        let out = manager
            .dispatch(Some("b"), "bus".to_string())
            .await
            .unwrap();
        assert!(matches!(out.data, TurnData::Intro { .. }));
    }

    #[tokio::test]
    async fn missing_key_uses_the_implicit_session() {
        let manager = SessionManager::new();

        manager
            .dispatch(None, "go to the airport".to_string())
            .await
            .unwrap();
        let out = manager.dispatch(None, "train".to_string()).await.unwrap();
        assert!(matches!(out.data, TurnData::AwaitingPreferences { .. }));
    }

    #[tokio::test]
    async fn concurrent_turns_on_one_key_all_answer() {
        let manager = std::sync::Arc::new(SessionManager::new());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move {
                    manager
                        .dispatch(Some("busy"), "init".to_string())
                        .await
                        .unwrap()
                })
            })
            .collect();

        for task in tasks {
            let out = task.await.unwrap();
            assert!(matches!(out.data, TurnData::Intro { environment: Some(_) }));
        }
    }
}
