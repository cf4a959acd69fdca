//! Config for a tournament run, programmatic or loaded from a TOML table
//!
//! A config file looks like:
//!
//! ```toml
//! neutral_game = "tictactoe"
//! rounds = 2
//! swap_starts = true
//! log_dir = "logs"
//!
//! [[competitors]]
//! id = "alpha"
//! home_game = "tictactoe"
//! agent = "random"
//!
//! [[competitors]]
//! id = "beta"
//! agent = "subprocess:python3 -u bot.py"
//! ```
//!
//! Recognized keys:
//! - `competitors` — required, at least one entry; `id` must be unique.
//!   `home_game` defaults to `"tictactoe"`, `agent` to `"random"`.
//! - `neutral_game` — game spec for the neutral scenario (default `"tictactoe"`).
//! - `rounds` — matches per scenario, ≥ 1 (default `1`).
//! - `swap_starts` — also play each match with seats exchanged (default `false`).
//! - `prime_pause` — operator pause after prime-numbered turns (default `false`).
//! - `log_dir` — per-match JSON logs are written under this directory when set.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

fn default_game() -> String {
    "tictactoe".to_owned()
}

fn default_agent() -> String {
    "random".to_owned()
}

fn default_rounds() -> u32 {
    1
}

/// One entrant: a unique id, its home rule set, and its agent factory spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    /// Unique identifier used in pairings, logs, and the scoreboard.
    pub id: String,
    /// Game spec played in this competitor's home scenario.
    #[serde(default = "default_game")]
    pub home_game: String,
    /// Agent spec; a fresh instance is built for every match.
    #[serde(default = "default_agent")]
    pub agent: String,
}

impl Competitor {
    /// Creates a competitor from its three spec strings.
    pub fn new(
        id: impl Into<String>,
        home_game: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            home_game: home_game.into(),
            agent: agent.into(),
        }
    }
}

/// Everything the round-robin driver needs for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct TournamentConfig {
    /// The entrants, in pairing-enumeration order.
    pub competitors: Vec<Competitor>,
    /// Game spec for the neutral scenario.
    #[serde(default = "default_game")]
    pub neutral_game: String,
    /// Matches per scenario.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Also play each match with seats exchanged.
    #[serde(default)]
    pub swap_starts: bool,
    /// Operator pause after prime-numbered turns.
    #[serde(default)]
    pub prime_pause: bool,
    /// Directory for per-match JSON logs, if any.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl TournamentConfig {
    /// Config with defaults for everything but the competitor list.
    pub fn new(competitors: Vec<Competitor>) -> Self {
        Self {
            competitors,
            neutral_game: default_game(),
            rounds: default_rounds(),
            swap_starts: false,
            prime_pause: false,
            log_dir: None,
        }
    }

    /// Sets the neutral-scenario game spec.
    #[must_use]
    pub fn with_neutral_game(mut self, spec: impl Into<String>) -> Self {
        self.neutral_game = spec.into();
        self
    }

    /// Sets the number of matches per scenario.
    #[must_use]
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Enables or disables the seat-exchanged second match.
    #[must_use]
    pub fn with_swap_starts(mut self, value: bool) -> Self {
        self.swap_starts = value;
        self
    }

    /// Enables or disables the operator pause after prime-numbered turns.
    #[must_use]
    pub fn with_prime_pause(mut self, value: bool) -> Self {
        self.prime_pause = value;
        self
    }

    /// Writes per-match JSON logs under `dir`.
    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Reads and validates a TOML config file.
    ///
    /// # Errors
    /// Returned when the file cannot be read, is not valid TOML, or fails
    /// validation.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the driver relies on.
    ///
    /// # Errors
    /// Returned for an empty competitor list, an empty or duplicate id, or
    /// `rounds` of zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.competitors.is_empty() {
            bail!("config needs at least one [[competitors]] entry");
        }
        if self.rounds < 1 {
            bail!("rounds must be >= 1");
        }
        let mut seen = BTreeSet::new();
        for competitor in &self.competitors {
            if competitor.id.is_empty() {
                bail!("competitor id must not be empty");
            }
            if !seen.insert(&competitor.id) {
                bail!("duplicate competitor id {:?}", competitor.id);
            }
        }
        Ok(())
    }
}
