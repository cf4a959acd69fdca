use anyhow::anyhow;
use serde_json::Value;

use crate::agent::{Agent, AgentError};
use crate::game_interface::{Game, PlayerId};

/// Always plays the first offered legal move. Deterministic, which makes it
/// the baseline opponent for tests and smoke runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegalAgent;

impl FirstLegalAgent {
    /// Creates a first-legal agent.
    pub fn new() -> Self {
        Self
    }
}

impl Agent for FirstLegalAgent {
    fn name(&self) -> &str {
        "first-legal"
    }

    fn select_move(
        &mut self,
        _game: &dyn Game,
        _state: &Value,
        _player: PlayerId,
        legal_moves: &[Value],
    ) -> Result<Value, AgentError> {
        legal_moves
            .first()
            .cloned()
            .ok_or_else(|| AgentError::Failed(anyhow!("no legal moves offered")))
    }
}
