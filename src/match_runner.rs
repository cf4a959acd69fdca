//! Single-match execution: the turn loop, forfeit policy, and the replayable log
//!
//! [`play_match`] drives one match to completion. Every decision is recorded
//! as a [`MoveRecord`] with wall-clock timing; agent failures never escape,
//! they are classified into forfeit verdicts instead:
//!
//! | `reason` | produced when |
//! |---|---|
//! | `illegal_move` | the returned move is not in the current legal set |
//! | `agent_error` | the agent failed or its process died |
//! | `timeout` | the per-turn deadline elapsed |
//! | `no_legal_moves` | the player to move has no moves at a non-terminal state |
//! | `max_turns` | the ply cap was reached without a rules verdict |
//!
//! Rules-side reasons (`win`, `draw`, …) pass through unchanged. When a log
//! path is configured, the terminating path writes one JSON document with
//! sorted keys, atomically, exactly once.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument, trace, warn};

use crate::agent::{Agent, AgentError};
use crate::game_interface::{Game, PlayerId};

/// One decision in a match.
///
/// A non-empty `note` means the move was NOT applied to the state and this
/// record closes the match; replaying stops there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based turn number.
    pub turn: u32,
    /// Seat that decided, alternating from 0.
    pub player: PlayerId,
    /// The move as returned by the agent; `null` when the agent produced none.
    #[serde(rename = "move")]
    pub mv: Value,
    /// Wall-clock milliseconds the decision took, when measured.
    pub ms: Option<f64>,
    /// Forfeit tag (`illegal_move`, `timeout`, `agent_error`) or `None` for an
    /// applied move.
    pub note: Option<String>,
}

/// Final record of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Name of the rule set that was played.
    pub game: String,
    /// Winning seat, or `None` for a draw or a `max_turns` stop.
    pub winner: Option<PlayerId>,
    /// Rules verdict or forfeit tag; see the module table.
    pub reason: String,
    /// Number of move records produced.
    pub turns: u32,
    /// Every decision, in playing order.
    pub move_history: Vec<MoveRecord>,
}

/// Knobs for [`play_match`].
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Hard ply cap; reaching it ends the match without a winner.
    pub max_turns: u32,
    /// Stop at an operator prompt after prime-numbered turns.
    pub prime_pause: bool,
    /// Where to write the JSON match log, if anywhere.
    pub log_path: Option<PathBuf>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_turns: 10_000,
            prime_pause: false,
            log_path: None,
        }
    }
}

impl MatchOptions {
    /// Default options: 10 000 turns, no pause, no log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hard ply cap.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Enables the operator pause after prime-numbered turns.
    #[must_use]
    pub fn with_prime_pause(mut self, prime_pause: bool) -> Self {
        self.prime_pause = prime_pause;
        self
    }

    /// Writes the match log to `path` on every terminating path.
    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }
}

/// Runs one alternating-turn match to completion.
///
/// Seat 0 moves first; seats alternate strictly. Each turn the engine asks
/// the rules for a verdict, gathers the legal moves, times the agent's
/// decision against the wall clock, validates the returned move by structural
/// equality against the legal list, and applies it. Any agent failure
/// forfeits the match to the opponent with the matching verdict.
///
/// `turns` in the result counts the records in `move_history`: a rules
/// verdict or a `no_legal_moves` forfeit does not produce a record for the
/// turn that detected it, an agent-caused forfeit does.
///
/// # Errors
/// Agent failures are never errors. An error is returned only when the
/// configured log cannot be written, or when the rule set rejects a move it
/// itself listed as legal.
#[instrument(skip_all, fields(game = game.name(), p0 = agent0.name(), p1 = agent1.name()))]
pub fn play_match(
    game: &dyn Game,
    agent0: &mut dyn Agent,
    agent1: &mut dyn Agent,
    options: &MatchOptions,
) -> anyhow::Result<MatchResult> {
    trace!("match started");
    let mut state = game.initial_state();
    let mut history: Vec<MoveRecord> = Vec::new();
    let mut player: PlayerId = 0;

    for turn in 1..=options.max_turns {
        let verdict = game.terminal(&state);
        if verdict.is_terminal {
            let result = MatchResult {
                game: game.name().to_owned(),
                winner: verdict.winner,
                reason: verdict.reason,
                turns: turn - 1,
                move_history: history,
            };
            return finish(game, result, &state, options);
        }

        let legal = game.legal_moves(&state, player);
        if legal.is_empty() {
            info!("player {player} has no legal moves");
            let result = MatchResult {
                game: game.name().to_owned(),
                winner: Some(1 - player),
                reason: "no_legal_moves".to_owned(),
                turns: turn - 1,
                move_history: history,
            };
            return finish(game, result, &state, options);
        }

        let agent: &mut dyn Agent = if player == 0 { &mut *agent0 } else { &mut *agent1 };
        let started = Instant::now();
        let picked = agent.select_move(game, &state, player, &legal);
        let ms = started.elapsed().as_secs_f64() * 1000.0;
        let pause_allowed = agent.allows_operator_pause();

        let mv = match picked {
            Ok(mv) => mv,
            Err(err) => {
                let reason = match &err {
                    AgentError::Timeout(_) => "timeout",
                    AgentError::Failed(_) => "agent_error",
                };
                warn!("player {player} forfeits ({reason}): {err}");
                history.push(MoveRecord {
                    turn,
                    player,
                    mv: Value::Null,
                    ms: Some(ms),
                    note: Some(reason.to_owned()),
                });
                let result = MatchResult {
                    game: game.name().to_owned(),
                    winner: Some(1 - player),
                    reason: reason.to_owned(),
                    turns: turn,
                    move_history: history,
                };
                return finish(game, result, &state, options);
            }
        };

        if !legal.contains(&mv) {
            warn!("player {player} played an illegal move");
            history.push(MoveRecord {
                turn,
                player,
                mv,
                ms: Some(ms),
                note: Some("illegal_move".to_owned()),
            });
            let result = MatchResult {
                game: game.name().to_owned(),
                winner: Some(1 - player),
                reason: "illegal_move".to_owned(),
                turns: turn,
                move_history: history,
            };
            return finish(game, result, &state, options);
        }

        state = game
            .apply_move(&state, player, &mv)
            .context("rule set rejected a move it listed as legal")?;
        history.push(MoveRecord {
            turn,
            player,
            mv,
            ms: Some(ms),
            note: None,
        });

        if options.prime_pause && pause_allowed && is_prime(turn) {
            wait_for_operator(turn);
        }

        player = 1 - player;
    }

    let result = MatchResult {
        game: game.name().to_owned(),
        winner: None,
        reason: "max_turns".to_owned(),
        turns: options.max_turns,
        move_history: history,
    };
    finish(game, result, &state, options)
}

fn finish(
    game: &dyn Game,
    result: MatchResult,
    final_state: &Value,
    options: &MatchOptions,
) -> anyhow::Result<MatchResult> {
    info!(
        winner = ?result.winner,
        reason = %result.reason,
        turns = result.turns,
        "match over"
    );
    if let Some(path) = &options.log_path {
        write_match_log(path, game, &result, final_state)?;
    }
    Ok(result)
}

/// Serializes the match log and writes it atomically.
///
/// The document carries the rule-set name, the full result, the final state,
/// and its rendering. Keys are serialized in sorted order, the move history
/// keeps insertion order, and the file ends with a newline. The write goes
/// through a temporary file in the destination directory so a partial log
/// can never be observed; parent directories are created on demand.
///
/// # Errors
/// Returned when the directory cannot be created or the file cannot be
/// written or renamed into place.
pub fn write_match_log(
    path: &Path,
    game: &dyn Game,
    result: &MatchResult,
    final_state: &Value,
) -> anyhow::Result<()> {
    let payload = json!({
        "game": game.name(),
        "result": serde_json::to_value(result).context("serializing match result")?,
        "final_state": final_state,
        "final_render": game.render(final_state),
    });
    let mut text = serde_json::to_string_pretty(&payload).context("serializing match log")?;
    text.push('\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(&dir).context("creating temporary log file")?;
    file.write_all(text.as_bytes()).context("writing match log")?;
    file.persist(path)
        .with_context(|| format!("moving match log into {}", path.display()))?;
    trace!("match log written to {}", path.display());
    Ok(())
}

fn is_prime(n: u32) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

fn wait_for_operator(turn: u32) {
    println!("[prime turn {turn}] paused; press Enter to continue...");
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
}
