//! Command line for the arena: list built-in games, play one match, or run a
//! round-robin tournament from a TOML config.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};

use ai_arena::agent::Agent as _;
use ai_arena::configuration::TournamentConfig;
use ai_arena::logger::init_logger;
use ai_arena::match_runner::{play_match, MatchOptions};
use ai_arena::registry::Registry;
use ai_arena::tournament::run_tournament;

/// Deterministic two-player game arena and round-robin tournaments.
#[derive(Parser, Debug)]
#[command(name = "ai-arena")]
#[command(about = "Deterministic two-player game arena and round-robin tournaments")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List built-in games, one per line.
    ListGames,

    /// Play one match.
    Play {
        /// Built-in name (e.g. tictactoe) or '<file>:<symbol>'.
        game: String,

        /// Agent0: human|random|first-legal|subprocess:<cmd>|<file>:<symbol>.
        #[arg(long, default_value = "human")]
        p0: String,

        /// Agent1: same grammar as --p0.
        #[arg(long, default_value = "random")]
        p1: String,

        /// Pause for the operator after prime-numbered turns.
        #[arg(long)]
        prime_pause: bool,

        /// Write the JSON match log to this path.
        #[arg(long)]
        log: Option<PathBuf>,

        /// Hard cap on turns.
        #[arg(long, default_value_t = 10_000)]
        max_turns: u32,
    },

    /// Run the round robin described by a TOML config.
    Tournament {
        /// Path to the config file.
        #[arg(long, default_value = "arena.toml")]
        config: PathBuf,

        /// Write the full JSON result to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let registry = Registry::with_builtins();
    match cli.command {
        Commands::ListGames => {
            for name in registry.game_names() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Play {
            game,
            p0,
            p1,
            prime_pause,
            log,
            max_turns,
        } => cmd_play(&registry, &game, &p0, &p1, prime_pause, log, max_turns),
        Commands::Tournament { config, out } => {
            cmd_tournament(&registry, &config, out.as_deref())
        }
    }
}

fn cmd_play(
    registry: &Registry,
    game_spec: &str,
    p0: &str,
    p1: &str,
    prime_pause: bool,
    log: Option<PathBuf>,
    max_turns: u32,
) -> anyhow::Result<()> {
    let game = registry.game(game_spec)?;
    let mut agent0 = registry.agent(p0)?;
    let mut agent1 = match registry.agent(p1) {
        Ok(agent) => agent,
        Err(err) => {
            agent0.close();
            return Err(err);
        }
    };

    let mut options = MatchOptions::new()
        .with_max_turns(max_turns)
        .with_prime_pause(prime_pause);
    if let Some(path) = &log {
        options = options.with_log_path(path.clone());
    }

    let outcome = play_match(game.as_ref(), agent0.as_mut(), agent1.as_mut(), &options);
    agent0.close();
    agent1.close();
    let result = outcome?;

    println!("game: {}", result.game);
    match result.winner {
        Some(winner) => println!("winner: {winner}"),
        None => println!("winner: none"),
    }
    println!("reason: {}", result.reason);
    println!("turns: {}", result.turns);
    if let Some(path) = &log {
        println!("log: {}", path.display());
    }
    Ok(())
}

fn cmd_tournament(registry: &Registry, config_path: &Path, out: Option<&Path>) -> anyhow::Result<()> {
    let config = TournamentConfig::from_path(config_path)?;
    let result = run_tournament(&config, registry)?;

    println!("scoreboard:");
    for (id, row) in result.scoreboard.standings() {
        println!(
            "  {id}: wins={} losses={} draws={} points={}",
            row.wins, row.losses, row.draws, row.points
        );
    }

    if let Some(out) = out {
        let value = serde_json::to_value(&result).context("serializing tournament result")?;
        let mut text = serde_json::to_string_pretty(&value)?;
        text.push('\n');
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(out, text).with_context(|| format!("writing {}", out.display()))?;
        println!("out: {}", out.display());
    }
    Ok(())
}
