//! HTTP API for greenroute

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::chat::ChatService;
use crate::climate::ClimateEngine;
use crate::intensity::IntensityStore;
use crate::sessions::SessionManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub climate: ClimateEngine,
    pub intensity: IntensityStore,
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(intensity: IntensityStore, chat: ChatService) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new()),
            climate: ClimateEngine::new(),
            intensity,
            chat: Arc::new(chat),
        }
    }
}
