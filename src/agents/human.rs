use std::io::{self, Write};

use anyhow::{anyhow, Context};
use serde_json::Value;

use crate::agent::{Agent, AgentError};
use crate::game_interface::{Game, PlayerId};

/// Interactive seat: renders the position on stdout and reads a move index
/// from stdin. Re-prompts until the input is a valid index.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanAgent;

impl HumanAgent {
    /// Creates a human agent.
    pub fn new() -> Self {
        Self
    }
}

impl Agent for HumanAgent {
    fn name(&self) -> &str {
        "human"
    }

    fn select_move(
        &mut self,
        game: &dyn Game,
        state: &Value,
        player: PlayerId,
        legal_moves: &[Value],
    ) -> Result<Value, AgentError> {
        println!("{}", game.render(state));
        println!("player: {player}");
        println!("legal moves:");
        for (i, mv) in legal_moves.iter().enumerate() {
            println!("  [{i}] {mv}");
        }

        loop {
            print!("choose move index> ");
            io::stdout().flush().context("flushing prompt")?;

            let mut line = String::new();
            let read = io::stdin()
                .read_line(&mut line)
                .context("reading move index")?;
            if read == 0 {
                return Err(AgentError::Failed(anyhow!("stdin closed")));
            }

            let Ok(idx) = line.trim().parse::<usize>() else {
                println!("enter a number");
                continue;
            };
            match legal_moves.get(idx) {
                Some(mv) => return Ok(mv.clone()),
                None => println!("out of range"),
            }
        }
    }
}
