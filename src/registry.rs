//! Resolution of game and agent spec strings into live instances
//!
//! Spec grammars:
//! - game: `<built-in-name>` | `<file>:<symbol>`
//! - agent: `human` | `random` | `first-legal` | `subprocess:<shell-tokens>` | `<file>:<symbol>`
//!
//! There is no runtime module loading here: a `<file>:<symbol>` spec is
//! validated on disk, then its symbol is resolved against the factories
//! registered in the [`Registry`]. Embedders extend the table with
//! [`register_game`](Registry::register_game) and
//! [`register_agent`](Registry::register_agent) before parsing specs.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use tracing::debug;

use crate::agent::Agent;
use crate::agents::{FirstLegalAgent, HumanAgent, RandomAgent, SubprocessAgent};
use crate::game_interface::Game;
use crate::games::TicTacToe;

/// Zero-argument constructor of one rule-set instance.
pub type GameFactory = Box<dyn Fn() -> Box<dyn Game>>;

/// Zero-argument constructor of one agent seat.
pub type AgentFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn Agent>>>;

/// Factory tables mapping spec strings to games and agents.
pub struct Registry {
    games: BTreeMap<String, GameFactory>,
    agents: BTreeMap<String, AgentFactory>,
}

impl Registry {
    /// An empty registry with no factories at all.
    pub fn new() -> Self {
        Self {
            games: BTreeMap::new(),
            agents: BTreeMap::new(),
        }
    }

    /// A registry seeded with the built-in games and agents.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_game("tictactoe", || Box::new(TicTacToe::new()));
        registry.register_agent("human", || Ok(Box::new(HumanAgent::new())));
        registry.register_agent("random", || Ok(Box::new(RandomAgent::new())));
        registry.register_agent("first-legal", || Ok(Box::new(FirstLegalAgent::new())));
        registry
    }

    /// Registers a game factory under `name` (a built-in name or a
    /// `<file>:<symbol>` symbol).
    pub fn register_game(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn Game> + 'static,
    ) {
        self.games.insert(name.into(), Box::new(factory));
    }

    /// Registers an agent factory under `name`.
    pub fn register_agent(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> anyhow::Result<Box<dyn Agent>> + 'static,
    ) {
        self.agents.insert(name.into(), Box::new(factory));
    }

    /// Names of the registered games, sorted.
    pub fn game_names(&self) -> Vec<&str> {
        self.games.keys().map(String::as_str).collect()
    }

    /// Builds a fresh game instance from its spec string.
    ///
    /// # Errors
    /// Returned for an unknown name, a missing file, or an unregistered
    /// symbol.
    pub fn game(&self, spec: &str) -> anyhow::Result<Box<dyn Game>> {
        if let Some(factory) = self.games.get(spec) {
            return Ok(factory());
        }
        let load = LoadSpec::parse(spec)?;
        debug!(path = %load.path.display(), symbol = %load.symbol, "resolving game symbol");
        let factory = self.games.get(&load.symbol).ok_or_else(|| {
            anyhow!("no game factory registered for symbol {:?} (from {spec:?})", load.symbol)
        })?;
        Ok(factory())
    }

    /// Builds a fresh agent instance from its spec string.
    ///
    /// # Errors
    /// Returned for an unknown name, an empty subprocess command, a spawn
    /// failure, a missing file, or an unregistered symbol.
    pub fn agent(&self, spec: &str) -> anyhow::Result<Box<dyn Agent>> {
        if let Some(factory) = self.agents.get(spec) {
            return factory();
        }
        if let Some(rest) = spec.strip_prefix("subprocess:") {
            let command = split_command(rest)?;
            if command.is_empty() {
                bail!("subprocess agent needs a command, e.g. subprocess:python3 -u bot.py");
            }
            let name = format!("subprocess:{}", command[0]);
            return Ok(Box::new(SubprocessAgent::new(&command)?.with_name(name)));
        }
        let load = LoadSpec::parse(spec)?;
        debug!(path = %load.path.display(), symbol = %load.symbol, "resolving agent symbol");
        let factory = self.agents.get(&load.symbol).ok_or_else(|| {
            anyhow!("no agent factory registered for symbol {:?} (from {spec:?})", load.symbol)
        })?;
        factory()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Parsed `<file>:<symbol>` spec.
///
/// The file must exist even though resolution goes through the registry, so
/// a typo in the path fails loudly instead of resolving to something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSpec {
    /// The file named on the left of the last colon.
    pub path: PathBuf,
    /// The symbol named on the right of the last colon.
    pub symbol: String,
}

impl LoadSpec {
    /// Splits `spec` at its last colon and validates both halves.
    ///
    /// # Errors
    /// Returned when there is no colon, the symbol is empty, or the file
    /// does not exist.
    pub fn parse(spec: &str) -> anyhow::Result<Self> {
        let Some((path_str, symbol)) = spec.rsplit_once(':') else {
            bail!("expected '<file>:<symbol>', got {spec:?}");
        };
        if symbol.is_empty() {
            bail!("missing symbol in spec {spec:?}");
        }
        let path = PathBuf::from(path_str);
        if !path.exists() {
            bail!("no such file: {}", path.display());
        }
        Ok(Self {
            path,
            symbol: symbol.to_owned(),
        })
    }
}

/// Splits a command string into tokens, honoring single and double quotes.
pub(crate) fn split_command(input: &str) -> anyhow::Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quote.is_some() {
        bail!("unterminated quote in command {input:?}");
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod registry_tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn test_builtin_game_and_agents_resolve() {
        let registry = Registry::with_builtins();
        assert_eq!(registry.game_names(), vec!["tictactoe"]);
        assert_eq!(registry.game("tictactoe").unwrap().name(), "tictactoe");
        assert_eq!(registry.agent("random").unwrap().name(), "random");
        assert_eq!(registry.agent("first-legal").unwrap().name(), "first-legal");
    }

    #[test]
    fn test_unknown_game_is_an_error() {
        let registry = Registry::with_builtins();
        assert!(registry.game("chess").is_err());
    }

    #[test]
    fn test_symbol_spec_resolves_against_the_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "placeholder").unwrap();
        let spec = format!("{}:TicTacToe", file.path().display());

        let mut registry = Registry::new();
        registry.register_game("TicTacToe", || Box::new(TicTacToe::new()));
        assert_eq!(registry.game(&spec).unwrap().name(), "tictactoe");

        // Same spec against an empty table: the symbol is unknown.
        let empty = Registry::new();
        assert!(empty.game(&spec).is_err());
    }

    #[test]
    fn test_load_spec_validation() {
        assert!(LoadSpec::parse("no-colon-here").is_err());

        let file = tempfile::NamedTempFile::new().unwrap();
        let missing_symbol = format!("{}:", file.path().display());
        assert!(LoadSpec::parse(&missing_symbol).is_err());

        assert!(LoadSpec::parse("/definitely/not/there.rs:Symbol").is_err());

        let ok = LoadSpec::parse(&format!("{}:Symbol", file.path().display())).unwrap();
        assert_eq!(ok.symbol, "Symbol");
    }

    #[test]
    fn test_split_command() {
        assert_eq!(
            split_command("python3 -u bot.py").unwrap(),
            vec!["python3", "-u", "bot.py"]
        );
        assert_eq!(
            split_command("sh -c 'echo hi'").unwrap(),
            vec!["sh", "-c", "echo hi"]
        );
        assert_eq!(
            split_command(r#"bot --name "deep thought""#).unwrap(),
            vec!["bot", "--name", "deep thought"]
        );
        assert_eq!(split_command("   ").unwrap(), Vec::<String>::new());
        assert!(split_command("sh -c 'unterminated").is_err());
    }

    #[test]
    fn test_empty_subprocess_command_is_an_error() {
        let registry = Registry::with_builtins();
        assert!(registry.agent("subprocess:").is_err());
        assert!(registry.agent("subprocess:   ").is_err());
    }
}
