//! Round-robin driver: plays the schedule and accumulates the result
//!
//! Matches run strictly sequentially in schedule order, because competitors
//! name agent *specifications*: a subprocess agent binds one child process
//! and must never be shared between concurrent matches. A fresh agent pair
//! is built for every match and closed on every exit path, so no child ever
//! leaks across matches.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use serde::Serialize;
use tracing::{info, instrument, trace};

use crate::agent::Agent as _;
use crate::configuration::TournamentConfig;
use crate::match_runner::{play_match, MatchOptions};
use crate::registry::Registry;
use crate::tournament_scheduler::{build_schedule, ScheduledMatch, Scoreboard};

/// Outcome of one scheduled match, with seats resolved to competitor ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    /// `"home:<id>"` or `"neutral"`.
    pub context: String,
    /// Name of the rule set that was played.
    pub game: String,
    /// Competitor that held seat 0.
    pub p0: String,
    /// Competitor that held seat 1.
    pub p1: String,
    /// Winning competitor, or `None` for a draw.
    pub winner: Option<String>,
    /// Verdict or forfeit tag from the engine.
    pub reason: String,
    /// Move records the match produced.
    pub turns: u32,
}

/// Everything a finished tournament produced.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentResult {
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub started_ts_ms: u64,
    /// Wall-clock duration of the whole run, milliseconds.
    pub duration_ms: u64,
    /// One summary per match, in playing order.
    pub matches: Vec<MatchSummary>,
    /// Final tallies.
    pub scoreboard: Scoreboard,
}

/// Plays the full round robin described by `config`.
///
/// A forfeit inside a match is an ordinary result and never stops the run;
/// only scheduler-level failures abort it: an invalid config, a spec that
/// does not resolve, or a log that cannot be written.
///
/// # Errors
/// Returned on those scheduler-level failures.
#[instrument(skip_all, fields(competitors = config.competitors.len()))]
pub fn run_tournament(
    config: &TournamentConfig,
    registry: &Registry,
) -> anyhow::Result<TournamentResult> {
    config.validate()?;

    let clock = Instant::now();
    let started_ts_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let schedule = build_schedule(
        &config.competitors,
        &config.neutral_game,
        config.rounds,
        config.swap_starts,
    );
    info!(matches = schedule.len(), "tournament starting");

    let mut scoreboard = Scoreboard::new(config.competitors.iter().map(|c| c.id.clone()));
    let mut matches = Vec::with_capacity(schedule.len());

    for scheduled in &schedule {
        matches.push(run_scheduled_match(config, registry, scheduled, &mut scoreboard)?);
    }

    Ok(TournamentResult {
        started_ts_ms,
        duration_ms: clock.elapsed().as_millis() as u64,
        matches,
        scoreboard,
    })
}

fn run_scheduled_match(
    config: &TournamentConfig,
    registry: &Registry,
    scheduled: &ScheduledMatch,
    scoreboard: &mut Scoreboard,
) -> anyhow::Result<MatchSummary> {
    trace!(
        context = %scheduled.context,
        p0 = %scheduled.p0,
        p1 = %scheduled.p1,
        "next match"
    );
    let game = registry
        .game(&scheduled.game)
        .with_context(|| format!("building game {:?}", scheduled.game))?;

    let mut agent0 = registry
        .agent(agent_spec(config, &scheduled.p0)?)
        .with_context(|| format!("building agent for {:?}", scheduled.p0))?;
    let mut agent1 = match registry
        .agent(agent_spec(config, &scheduled.p1)?)
        .with_context(|| format!("building agent for {:?}", scheduled.p1))
    {
        Ok(agent) => agent,
        Err(err) => {
            agent0.close();
            return Err(err);
        }
    };

    let mut options = MatchOptions::new().with_prime_pause(config.prime_pause);
    if let Some(log_dir) = &config.log_dir {
        let file = format!(
            "{}_r{}_{}_starts.json",
            scheduled.context.replace(':', "_"),
            scheduled.round,
            scheduled.p0
        );
        options = options.with_log_path(
            log_dir
                .join(format!("{}_vs_{}", scheduled.pair_a, scheduled.pair_b))
                .join(file),
        );
    }

    let outcome = play_match(game.as_ref(), agent0.as_mut(), agent1.as_mut(), &options);
    agent0.close();
    agent1.close();
    let result = outcome?;

    let winner = result
        .winner
        .map(|w| if w == 0 { scheduled.p0.clone() } else { scheduled.p1.clone() });
    scoreboard.record(&scheduled.p0, &scheduled.p1, winner.as_deref());

    Ok(MatchSummary {
        context: scheduled.context.clone(),
        game: result.game,
        p0: scheduled.p0.clone(),
        p1: scheduled.p1.clone(),
        winner,
        reason: result.reason,
        turns: result.turns,
    })
}

fn agent_spec<'a>(config: &'a TournamentConfig, id: &str) -> anyhow::Result<&'a str> {
    config
        .competitors
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.agent.as_str())
        .with_context(|| format!("unknown competitor {id:?}"))
}
