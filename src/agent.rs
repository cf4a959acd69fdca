//! Module defining the move-selecting capability that drives one seat

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::game_interface::{Game, PlayerId};

/// Why an agent failed to produce a move.
///
/// The engine converts both variants into forfeits rather than propagating
/// them: [`Timeout`](AgentError::Timeout) becomes a `"timeout"` verdict,
/// [`Failed`](AgentError::Failed) an `"agent_error"` one.
#[derive(Debug)]
pub enum AgentError {
    /// The per-turn deadline elapsed without a move.
    Timeout(Duration),
    /// The agent raised, its process died, or its reply was malformed.
    Failed(anyhow::Error),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Timeout(limit) => write!(f, "no move within {limit:?}"),
            AgentError::Failed(err) => write!(f, "{err:#}"),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::Timeout(_) => None,
            AgentError::Failed(err) => Some(err.as_ref()),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Failed(err)
    }
}

/// What a player should implement.
///
/// One instance serves one match seat. The engine acquires it at match start
/// and calls [`close`](Agent::close) on every exit path, so implementations
/// holding external resources (a child process, a connection) release them
/// there and must tolerate being closed twice.
pub trait Agent {
    /// Stable name used in logs.
    fn name(&self) -> &str;

    /// Chooses one of `legal_moves` for `player` at `state`.
    ///
    /// Synchronous from the engine's standpoint; may block internally up to
    /// the agent's own deadline. `legal_moves` is never empty.
    ///
    /// # Errors
    /// [`AgentError::Timeout`] when the deadline elapsed,
    /// [`AgentError::Failed`] for everything else.
    fn select_move(
        &mut self,
        game: &dyn Game,
        state: &Value,
        player: PlayerId,
        legal_moves: &[Value],
    ) -> Result<Value, AgentError>;

    /// Releases whatever the agent holds. Idempotent; the default does nothing.
    fn close(&mut self) {}

    /// Whether the engine may stop at an interactive operator prompt right
    /// after this agent moved. Transports with a background reader say no.
    fn allows_operator_pause(&self) -> bool {
        true
    }
}
