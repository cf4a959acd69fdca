//! Module defining the traits a rule set implements to plug into the arena

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Seat of a player inside one match, always 0 or 1. Player 0 moves first.
pub type PlayerId = u8;

/// Verdict returned by [`Game::terminal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    /// True when the game is over at the inspected state.
    pub is_terminal: bool,
    /// Winning seat, or `None` for a draw or an undecided game.
    pub winner: Option<PlayerId>,
    /// Short machine-readable tag such as `"win"` or `"draw"`; empty while undecided.
    pub reason: String,
}

impl Terminal {
    /// A decided game won by `winner`.
    pub fn won_by(winner: PlayerId, reason: impl Into<String>) -> Self {
        Self {
            is_terminal: true,
            winner: Some(winner),
            reason: reason.into(),
        }
    }

    /// A finished game without a winner.
    pub fn draw(reason: impl Into<String>) -> Self {
        Self {
            is_terminal: true,
            winner: None,
            reason: reason.into(),
        }
    }

    /// A state the rules do not consider over.
    pub fn ongoing() -> Self {
        Self {
            is_terminal: false,
            winner: None,
            reason: String::new(),
        }
    }
}

/// What a rule set should implement.
///
/// State and moves are opaque JSON values owned by the rule set. The arena
/// never inspects a state; it only compares moves structurally against the
/// list returned by [`legal_moves`](Game::legal_moves). All methods are pure:
/// `apply_move` returns a fresh successor and must leave its input untouched.
///
/// One instance serves one match; instances come from the zero-argument
/// factories held by the [`Registry`](crate::registry::Registry).
pub trait Game {
    /// Stable name used in logs and match results.
    fn name(&self) -> &str;

    /// The state before any move was played.
    fn initial_state(&self) -> Value;

    /// Every move `player` may play at `state`. Empty means the player cannot move.
    fn legal_moves(&self, state: &Value, player: PlayerId) -> Vec<Value>;

    /// Applies `mv` for `player` and returns the successor state.
    ///
    /// # Errors
    /// Returned when `mv` is malformed or not playable at `state`. The engine
    /// checks membership in [`legal_moves`](Game::legal_moves) before calling
    /// this, so an error here means the rule set disagrees with its own move
    /// list.
    fn apply_move(&self, state: &Value, player: PlayerId, mv: &Value) -> anyhow::Result<Value>;

    /// Verdict for `state`.
    fn terminal(&self, state: &Value) -> Terminal;

    /// Printable rendering of `state` for humans and match logs.
    fn render(&self, state: &Value) -> String;
}
