use anyhow::anyhow;
use rand::seq::SliceRandom;
use serde_json::Value;

use crate::agent::{Agent, AgentError};
use crate::game_interface::{Game, PlayerId};

/// Picks a uniformly random legal move.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAgent;

impl RandomAgent {
    /// Creates a random agent.
    pub fn new() -> Self {
        Self
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn select_move(
        &mut self,
        _game: &dyn Game,
        _state: &Value,
        _player: PlayerId,
        legal_moves: &[Value],
    ) -> Result<Value, AgentError> {
        legal_moves
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| AgentError::Failed(anyhow!("no legal moves offered")))
    }
}
