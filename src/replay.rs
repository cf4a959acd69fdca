//! Pure reconstruction of a match trajectory from its recorded move history
//!
//! No agents are constructed and no processes spawned here: replay is a fold
//! of [`Game::apply_move`] over the clean records of a history. A noted
//! (forfeit) record contributes one unchanged frame, so the offending move
//! can be shown, and ends the trajectory.

use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;

use crate::game_interface::{Game, PlayerId, Terminal};
use crate::match_runner::MoveRecord;

/// Reconstructed trajectory of one match.
///
/// `states[0]` is the initial state and `states[i + 1]` follows `moves[i]`.
#[derive(Debug, Clone)]
pub struct Replay {
    /// Name of the rule set that was replayed.
    pub game: String,
    /// The records the trajectory was built from.
    pub moves: Vec<MoveRecord>,
    /// Initial state plus one state per processed record.
    pub states: Vec<Value>,
    /// Verdict at the last state; engine-level for forfeits.
    pub terminal: Terminal,
}

/// Reads a match log document written by the engine back into JSON.
///
/// # Errors
/// Returned when the file cannot be read or does not contain JSON.
pub fn load_match_log(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading match log {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("decoding match log {}", path.display()))
}

/// Replays a move history against `game`.
///
/// Clean records are applied in order. The first noted record keeps the state
/// unchanged (the move was never applied) and stops the walk. The terminal
/// verdict is whatever the rules say about the last state; use
/// [`replay_from_log_payload`] when an engine-level verdict should win.
///
/// # Errors
/// Returned when the rule set rejects a recorded move, which means the
/// history does not belong to this game.
pub fn replay_from_move_history(
    game: &dyn Game,
    move_history: &[MoveRecord],
) -> anyhow::Result<Replay> {
    let mut current = game.initial_state();
    let mut states = vec![current.clone()];

    for record in move_history {
        if record.note.is_none() {
            current = game
                .apply_move(&current, record.player, &record.mv)
                .with_context(|| format!("replaying turn {}", record.turn))?;
            states.push(current.clone());
        } else {
            states.push(current.clone());
            break;
        }
    }

    let terminal = game.terminal(&current);
    Ok(Replay {
        game: game.name().to_owned(),
        moves: move_history.to_vec(),
        states,
        terminal,
    })
}

/// Replays a full engine log payload against `game`.
///
/// Prefer this over [`replay_from_move_history`] for logs read from disk:
/// forfeit verdicts (illegal move, timeout, agent error) are engine-level,
/// and the rules may not consider the final state terminal. When that
/// happens and the payload carries a non-empty reason, the payload's
/// `{winner, reason}` becomes the verdict.
///
/// # Errors
/// Returned when the payload has no `result`, its move history is not a
/// list of records, or a recorded move does not replay.
pub fn replay_from_log_payload(game: &dyn Game, payload: &Value) -> anyhow::Result<Replay> {
    let result = payload.get("result").context("log payload has no 'result'")?;
    let history = result.get("move_history").cloned().unwrap_or_else(|| Value::Array(vec![]));
    if !history.is_array() {
        bail!("'move_history' must be a list");
    }
    let move_history: Vec<MoveRecord> =
        serde_json::from_value(history).context("decoding move history")?;

    let mut replay = replay_from_move_history(game, &move_history)?;

    if !replay.terminal.is_terminal {
        let reason = result.get("reason").and_then(Value::as_str).unwrap_or("");
        if !reason.is_empty() {
            let winner: Option<PlayerId> = result
                .get("winner")
                .and_then(Value::as_u64)
                .and_then(|w| u8::try_from(w).ok())
                .filter(|w| *w <= 1);
            replay.terminal = Terminal {
                is_terminal: true,
                winner,
                reason: reason.to_owned(),
            };
        }
    }

    Ok(replay)
}
