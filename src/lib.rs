//! # Ai Arena
//!
//! A deterministic, two-player, turn-based game arena: a match engine that
//! alternates play between two pluggable agents over a pluggable rule set,
//! plus a round-robin tournament scheduler that fans matches out across
//! competitors and home/neutral rule-set scenarios.
//!
//! It provides:
//! - Match execution with per-move timing, deadlines, and forfeit policy ([`match_runner`])
//! - A line-delimited JSON transport for long-running external bots ([`agents::SubprocessAgent`])
//! - Round-robin tournaments with home/away/neutral contexts ([`tournament`])
//! - Pure replay of a recorded match ([`replay`])
//! - Spec-string resolution of games and agents ([`registry::Registry`])
//!
//! Rule sets live behind the [`Game`](game_interface::Game) trait: state and
//! moves are opaque JSON values, the arena compares moves structurally and
//! never mutates a state in place. Agents are resources behind the
//! [`Agent`](agent::Agent) trait, acquired per match seat and closed on every
//! exit path, including forfeits and errors.
//!
//! # Documentation Overview
//!
//! - For the turn loop, forfeit taxonomy, and the match-log format, see [`match_runner`].
//! - For the bot wire protocol and its lifecycle, see [`agents::SubprocessAgent`].
//! - For tournament pairing, scenarios, and scoring, see [`tournament_scheduler`] and [`tournament`].
//! - For implementing custom games and agents, check out the [`Game`](game_interface::Game)
//!   and [`Agent`](agent::Agent) traits and the [`registry`] registration API.
//!
//! # Usage Example
//!
//! Below is a minimal example playing one match between two built-in agents:
//!
//! ```no_run
//! use ai_arena::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let registry = Registry::with_builtins();
//!     let game = registry.game("tictactoe")?;
//!     let mut agent0 = registry.agent("random")?;
//!     let mut agent1 = registry.agent("first-legal")?;
//!
//!     let result = play_match(
//!         game.as_ref(),
//!         agent0.as_mut(),
//!         agent1.as_mut(),
//!         &MatchOptions::new(),
//!     );
//!     agent0.close();
//!     agent1.close();
//!
//!     let result = result?;
//!     println!("{}: {:?} ({})", result.game, result.winner, result.reason);
//!     Ok(())
//! }
//! ```
//!
//! # Example Bot
//!
//! An external bot is a long-running process that reads one JSON object per
//! line from stdin and writes one per line to stdout. Each turn the arena
//! sends:
//!
//! ```json
//! {"type":"turn","game":"tictactoe","player":0,"state":{"board":[0,0,0,0,0,0,0,0,0]},"legal_moves":[0,1,2,3,4,5,6,7,8],"ts_ms":1712000000000}
//! ```
//!
//! and the bot answers with either of:
//!
//! ```json
//! {"type":"move","move":4}
//! {"type":"error","error":"description of what went wrong"}
//! ```
//!
//! Anything else on stdout is ignored, so bots may print debug lines freely;
//! stderr is passed through untouched. A bot has up to the configured per-turn
//! deadline (an hour by default) to answer, and should exit when its stdin
//! closes.
#![warn(missing_docs)]

pub use anyhow;

pub mod agent;
pub mod agents;
pub mod configuration;
pub mod game_interface;
pub mod games;
pub mod logger;
pub mod match_runner;
pub mod registry;
pub mod replay;
pub mod tournament;
pub mod tournament_scheduler;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use ai_arena::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::{Agent, AgentError};
    pub use crate::agents::{FirstLegalAgent, HumanAgent, RandomAgent, SubprocessAgent};
    pub use crate::configuration::{Competitor, TournamentConfig};
    pub use crate::game_interface::{Game, PlayerId, Terminal};
    pub use crate::match_runner::{play_match, MatchOptions, MatchResult, MoveRecord};
    pub use crate::registry::Registry;
    pub use crate::replay::{load_match_log, replay_from_log_payload, replay_from_move_history, Replay};
    pub use crate::tournament::{run_tournament, MatchSummary, TournamentResult};
}
