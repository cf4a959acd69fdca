use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;

use ai_arena::agent::{Agent, AgentError};
use ai_arena::agents::FirstLegalAgent;
use ai_arena::configuration::{Competitor, TournamentConfig};
use ai_arena::game_interface::{Game, PlayerId};
use ai_arena::registry::Registry;
use ai_arena::tournament::run_tournament;

mod common;

fn first_legal_competitors(ids: &[&str]) -> Vec<Competitor> {
    ids.iter()
        .map(|id| Competitor::new(*id, "tictactoe", "first-legal"))
        .collect()
}

#[test]
fn test_three_way_round_robin_plays_nine_matches() {
    common::init_test_logger();
    let config = TournamentConfig::new(first_legal_competitors(&["alpha", "beta", "gamma"]));
    let registry = Registry::with_builtins();

    let result = run_tournament(&config, &registry).unwrap();

    assert_eq!(result.matches.len(), 9);
    // Deterministic agents on tictactoe: seat 0 always wins in 7 turns.
    for summary in &result.matches {
        assert_eq!(summary.reason, "win");
        assert_eq!(summary.turns, 7);
        assert_eq!(summary.winner.as_deref(), Some(summary.p0.as_str()));
    }

    // Seat 0 goes to the home side twice per pairing and to the smaller id on
    // neutral ground: alpha starts 4 times, beta 3, gamma 2.
    let wins = |id: &str| result.scoreboard.get(id).unwrap().wins;
    assert_eq!(wins("alpha"), 4);
    assert_eq!(wins("beta"), 3);
    assert_eq!(wins("gamma"), 2);

    let board = &result.scoreboard;
    let played: u32 = board.rows().map(|(_, r)| r.wins + r.losses + r.draws).sum();
    assert_eq!(played, 2 * 9);
    let points: u32 = board.rows().map(|(_, r)| r.points).sum();
    assert_eq!(points, 9 * 3);
}

#[test]
fn test_swap_starts_and_rounds_multiply_matches() {
    let config = TournamentConfig::new(first_legal_competitors(&["east", "west"]))
        .with_rounds(2)
        .with_swap_starts(true);
    let registry = Registry::with_builtins();

    let result = run_tournament(&config, &registry).unwrap();

    // 1 pairing × 3 scenarios × 2 rounds × 2 seat orders.
    assert_eq!(result.matches.len(), 12);
    // With swapped seats each competitor starts half the matches.
    assert_eq!(result.scoreboard.get("east").unwrap().wins, 6);
    assert_eq!(result.scoreboard.get("west").unwrap().wins, 6);
}

#[test]
fn test_match_logs_land_in_pair_directories() {
    let dir = tempfile::tempdir().unwrap();
    let config = TournamentConfig::new(first_legal_competitors(&["ada", "bob"]))
        .with_log_dir(dir.path());
    let registry = Registry::with_builtins();

    run_tournament(&config, &registry).unwrap();

    for name in [
        "home_ada_r0_ada_starts.json",
        "home_bob_r0_bob_starts.json",
        "neutral_r0_ada_starts.json",
    ] {
        let path = dir.path().join("ada_vs_bob").join(name);
        assert!(path.is_file(), "missing log {}", path.display());
        let payload: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(payload["game"], Value::String("tictactoe".to_owned()));
    }
}

#[test]
fn test_config_file_drives_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("arena.toml");
    std::fs::write(
        &config_path,
        r#"
        neutral_game = "tictactoe"
        rounds = 1

        [[competitors]]
        id = "north"
        agent = "first-legal"

        [[competitors]]
        id = "south"
        agent = "first-legal"
        "#,
    )
    .unwrap();

    let config = TournamentConfig::from_path(&config_path).unwrap();
    let registry = Registry::with_builtins();
    let result = run_tournament(&config, &registry).unwrap();

    assert_eq!(result.matches.len(), 3);
    let ranked: Vec<&str> = result.scoreboard.standings().iter().map(|(id, _)| *id).collect();
    // north starts home:north and neutral, south starts home:south.
    assert_eq!(ranked, vec!["north", "south"]);
}

/// First-legal agent that counts how often it was closed.
struct CountingAgent {
    closes: Arc<AtomicUsize>,
    inner: FirstLegalAgent,
}

impl Agent for CountingAgent {
    fn name(&self) -> &str {
        "counting"
    }

    fn select_move(
        &mut self,
        game: &dyn Game,
        state: &Value,
        player: PlayerId,
        legal_moves: &[Value],
    ) -> Result<Value, AgentError> {
        self.inner.select_move(game, state, player, legal_moves)
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_every_seat_is_closed_once_per_match() {
    let closes = Arc::new(AtomicUsize::new(0));

    let mut registry = Registry::with_builtins();
    let counter = closes.clone();
    registry.register_agent("counting", move || {
        Ok(Box::new(CountingAgent {
            closes: counter.clone(),
            inner: FirstLegalAgent::new(),
        }))
    });

    let competitors = vec![
        Competitor::new("one", "tictactoe", "counting"),
        Competitor::new("two", "tictactoe", "counting"),
    ];
    let result = run_tournament(&TournamentConfig::new(competitors), &registry).unwrap();

    assert_eq!(result.matches.len(), 3);
    assert_eq!(closes.load(Ordering::Relaxed), 2 * 3);
}

#[test]
fn test_forfeits_do_not_stop_the_tournament() {
    let mut registry = Registry::with_builtins();
    registry.register_agent("explosive", || Ok(Box::new(common::ExplodingAgent)));

    let competitors = vec![
        Competitor::new("calm", "tictactoe", "first-legal"),
        Competitor::new("wild", "tictactoe", "explosive"),
    ];
    let result = run_tournament(&TournamentConfig::new(competitors), &registry).unwrap();

    assert_eq!(result.matches.len(), 3);
    assert!(result
        .matches
        .iter()
        .all(|m| m.reason == "agent_error" && m.winner.as_deref() == Some("calm")));
    assert_eq!(result.scoreboard.get("calm").unwrap().points, 9);
    assert_eq!(result.scoreboard.get("wild").unwrap().points, 0);
}

#[test]
fn test_unresolvable_agent_spec_aborts() {
    let registry = Registry::with_builtins();
    let competitors = vec![
        Competitor::new("ok", "tictactoe", "first-legal"),
        Competitor::new("missing", "tictactoe", "no/such/file.rs:Nothing"),
    ];
    assert!(run_tournament(&TournamentConfig::new(competitors), &registry).is_err());
}
