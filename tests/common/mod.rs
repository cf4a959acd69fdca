//! Shared fixtures for the integration tests
#![allow(dead_code)]

use anyhow::anyhow;
use serde_json::{json, Value};
use tracing_subscriber::{fmt, layer::SubscriberExt, Registry};

use ai_arena::agent::{Agent, AgentError};
use ai_arena::game_interface::{Game, PlayerId, Terminal};

pub fn init_test_logger() {
    let format = fmt::format()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_target(false);

    let registry = Registry::default().with(fmt::layer().event_format(format));
    let _ = tracing::subscriber::set_global_default(registry);
}

/// A game that never ends: the state is a counter, moves are 0 or 1.
pub struct EndlessGame;

impl Game for EndlessGame {
    fn name(&self) -> &str {
        "endless"
    }

    fn initial_state(&self) -> Value {
        json!({ "n": 0 })
    }

    fn legal_moves(&self, _state: &Value, _player: PlayerId) -> Vec<Value> {
        vec![json!(0), json!(1)]
    }

    fn apply_move(&self, state: &Value, _player: PlayerId, _mv: &Value) -> anyhow::Result<Value> {
        let n = state.get("n").and_then(Value::as_i64).unwrap_or(0);
        Ok(json!({ "n": n + 1 }))
    }

    fn terminal(&self, _state: &Value) -> Terminal {
        Terminal::ongoing()
    }

    fn render(&self, state: &Value) -> String {
        state.to_string()
    }
}

/// Non-terminal for the rules, but player 0 never has a move.
pub struct StuckGame;

impl Game for StuckGame {
    fn name(&self) -> &str {
        "stuck"
    }

    fn initial_state(&self) -> Value {
        json!({})
    }

    fn legal_moves(&self, _state: &Value, player: PlayerId) -> Vec<Value> {
        if player == 0 {
            Vec::new()
        } else {
            vec![json!(0)]
        }
    }

    fn apply_move(&self, state: &Value, _player: PlayerId, _mv: &Value) -> anyhow::Result<Value> {
        Ok(state.clone())
    }

    fn terminal(&self, _state: &Value) -> Terminal {
        Terminal::ongoing()
    }

    fn render(&self, _state: &Value) -> String {
        String::new()
    }
}

/// Always answers with a move that is never legal.
pub struct IllegalAgent;

impl Agent for IllegalAgent {
    fn name(&self) -> &str {
        "illegal"
    }

    fn select_move(
        &mut self,
        _game: &dyn Game,
        _state: &Value,
        _player: PlayerId,
        _legal_moves: &[Value],
    ) -> Result<Value, AgentError> {
        Ok(json!(999))
    }
}

/// Fails on every call.
pub struct ExplodingAgent;

impl Agent for ExplodingAgent {
    fn name(&self) -> &str {
        "boom"
    }

    fn select_move(
        &mut self,
        _game: &dyn Game,
        _state: &Value,
        _player: PlayerId,
        _legal_moves: &[Value],
    ) -> Result<Value, AgentError> {
        Err(AgentError::Failed(anyhow!("kaboom")))
    }
}
