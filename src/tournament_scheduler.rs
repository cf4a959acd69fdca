//! Deterministic round-robin enumeration and the scoreboard
//!
//! [`build_schedule`] is a pure function from a competitor list to the full
//! ordered match list; the driver in [`tournament`](crate::tournament) plays
//! it one entry at a time. Keeping the enumeration separate makes the order
//! testable without running a single match.
//!
//! For every unordered pair `(a, b)` (in configured order, `a` first) three
//! scenarios are played: on `a`'s home game, on `b`'s home game, and on the
//! tournament-wide neutral game. The home competitor takes seat 0 in its own
//! scenario; on neutral ground the lexicographically smaller id starts. Each
//! scenario runs `rounds` times, and `swap_starts` appends a seat-exchanged
//! twin of every match.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::configuration::Competitor;

/// One match the scheduler decided to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledMatch {
    /// `"home:<id>"` or `"neutral"`.
    pub context: String,
    /// Game spec to play.
    pub game: String,
    /// 0-based round inside the scenario.
    pub round: u32,
    /// Competitor taking seat 0.
    pub p0: String,
    /// Competitor taking seat 1.
    pub p1: String,
    /// Lower-indexed competitor of the pairing; names the log directory.
    pub pair_a: String,
    /// Higher-indexed competitor of the pairing.
    pub pair_b: String,
}

/// Enumerates every match of the round robin, in playing order.
pub fn build_schedule(
    competitors: &[Competitor],
    neutral_game: &str,
    rounds: u32,
    swap_starts: bool,
) -> Vec<ScheduledMatch> {
    let mut schedule = Vec::new();

    for i in 0..competitors.len() {
        for j in (i + 1)..competitors.len() {
            let (a, b) = (&competitors[i], &competitors[j]);
            let neutral_starter = if a.id <= b.id { &a.id } else { &b.id };
            let scenarios = [
                (format!("home:{}", a.id), a.home_game.as_str(), &a.id),
                (format!("home:{}", b.id), b.home_game.as_str(), &b.id),
                ("neutral".to_owned(), neutral_game, neutral_starter),
            ];

            for (context, game, starter) in scenarios {
                let other = if *starter == a.id { &b.id } else { &a.id };
                for round in 0..rounds {
                    let mut seats = vec![(starter.clone(), other.clone())];
                    if swap_starts {
                        seats.push((other.clone(), starter.clone()));
                    }
                    for (p0, p1) in seats {
                        schedule.push(ScheduledMatch {
                            context: context.clone(),
                            game: game.to_owned(),
                            round,
                            p0,
                            p1,
                            pair_a: a.id.clone(),
                            pair_b: b.id.clone(),
                        });
                    }
                }
            }
        }
    }

    schedule
}

/// Per-competitor tally. A win pays 3 points, a draw 1, a loss 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreRow {
    /// Matches won.
    pub wins: u32,
    /// Matches lost.
    pub losses: u32,
    /// Matches drawn.
    pub draws: u32,
    /// 3 × wins + draws.
    pub points: u32,
}

/// Tallies keyed by competitor id. Order-independent: the same set of
/// results yields the same board whatever order they arrive in.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Scoreboard(BTreeMap<String, ScoreRow>);

impl Scoreboard {
    /// A board with a zero row for every id, so shut-out competitors still
    /// appear in the output.
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        Self(ids.into_iter().map(|id| (id, ScoreRow::default())).collect())
    }

    /// Applies one match outcome. `winner` of `None` records a draw.
    pub fn record(&mut self, p0: &str, p1: &str, winner: Option<&str>) {
        match winner {
            None => {
                for id in [p0, p1] {
                    let row = self.0.entry(id.to_owned()).or_default();
                    row.draws += 1;
                    row.points += 1;
                }
            }
            Some(winner) => {
                let loser = if winner == p0 { p1 } else { p0 };
                let row = self.0.entry(winner.to_owned()).or_default();
                row.wins += 1;
                row.points += 3;
                self.0.entry(loser.to_owned()).or_default().losses += 1;
            }
        }
    }

    /// The row for `id`, if it ever appeared.
    pub fn get(&self, id: &str) -> Option<&ScoreRow> {
        self.0.get(id)
    }

    /// All rows, keyed by id in id order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &ScoreRow)> {
        self.0.iter().map(|(id, row)| (id.as_str(), row))
    }

    /// Rows ranked best first: points descending, then id ascending.
    pub fn standings(&self) -> Vec<(&str, &ScoreRow)> {
        let mut rows: Vec<_> = self.rows().collect();
        rows.sort_by(|(id_a, row_a), (id_b, row_b)| {
            row_b.points.cmp(&row_a.points).then(id_a.cmp(id_b))
        });
        rows
    }
}
