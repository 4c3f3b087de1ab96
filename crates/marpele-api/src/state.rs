//! Shared application state.

use std::sync::{Arc, Mutex};

use marpele_core::clock::Clock;
use marpele_core::rng::DeterministicRng;
use marpele_rules::domain::board::Board;
use marpele_rules::domain::render::BoardRenderer;
use marpele_session::domain::registry::SessionRegistry;

use crate::config::GameSettings;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock stamped onto events.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Dice source, locked only for the duration of one roll.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Live sessions, one per context.
    pub registry: Arc<dyn SessionRegistry>,
    /// The board every game is played on.
    pub board: Arc<Board>,
    /// Draws the board for `GET /{context_id}/board`.
    pub renderer: Arc<dyn BoardRenderer>,
    /// Game tuning.
    pub settings: GameSettings,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        registry: Arc<dyn SessionRegistry>,
        board: Arc<Board>,
        renderer: Arc<dyn BoardRenderer>,
        settings: GameSettings,
    ) -> Self {
        Self {
            clock,
            rng,
            registry,
            board,
            renderer,
            settings,
        }
    }
}
