use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context};
use serde_json::{json, Value};
use tracing::{debug, trace, warn};

use crate::agent::{Agent, AgentError};
use crate::game_interface::{Game, PlayerId};

/// Granularity of the bounded wait on the bot's stdout.
const POLL_QUANTUM: Duration = Duration::from_millis(250);

/// How long `close` lets a bot exit on its own after stdin is closed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// A long-running external bot spoken to over line-delimited JSON.
///
/// The child is spawned once and serves every turn of one match; it is never
/// shared across matches. Requests and replies are strictly paired: a new
/// `turn` message is only written after the previous one resolved (move,
/// error, or timeout), because any failure forfeits the match.
///
/// Protocol per line, both directions UTF-8 JSON objects:
/// - arena → bot: `{"type":"turn","game":…,"player":…,"state":…,"legal_moves":…,"ts_ms":…}`
/// - bot → arena: `{"type":"move","move":…}` or `{"type":"error","error":…}`
///
/// Non-JSON lines, blank lines, and objects of unknown `type` are ignored, so
/// bots may log to stdout. stderr is inherited by the arena process and never
/// parsed.
///
/// On a timeout the child is left running; [`close`](Agent::close) is what
/// tears it down (stdin EOF first, kill after a short grace period) and is
/// safe to call any number of times.
pub struct SubprocessAgent {
    name: String,
    turn_timeout: Duration,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
    reader: Option<JoinHandle<()>>,
}

impl SubprocessAgent {
    /// Spawns `command` with piped stdin/stdout and inherited stderr, and
    /// starts forwarding its stdout lines to the arena thread.
    ///
    /// # Errors
    /// Returned when the command is empty or the process cannot be spawned.
    pub fn new(command: &[String]) -> anyhow::Result<Self> {
        let (program, args) = command.split_first().context("empty bot command")?;
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("spawning bot {program:?}"))?;
        debug!(pid = child.id(), "bot spawned");

        let stdin = child.stdin.take().context("bot stdin not piped")?;
        let stdout = child.stdout.take().context("bot stdout not piped")?;

        let (tx, rx) = mpsc::channel();
        let reader = thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
            // Dropping the sender signals EOF to the arena side.
        });

        Ok(Self {
            name: "subprocess".to_owned(),
            turn_timeout: Duration::from_secs(3600),
            child: Some(child),
            stdin: Some(stdin),
            lines: rx,
            reader: Some(reader),
        })
    }

    /// Replaces the default hour-long per-turn deadline.
    #[must_use]
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Replaces the default `"subprocess"` display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn write_turn(&mut self, msg: &Value) -> anyhow::Result<()> {
        let stdin = self.stdin.as_mut().context("bot already closed")?;
        let mut line = serde_json::to_string(msg).context("encoding turn message")?;
        line.push('\n');
        stdin
            .write_all(line.as_bytes())
            .context("writing turn to bot stdin")?;
        stdin.flush().context("flushing bot stdin")
    }

    /// Classifies one stdout line. `None` means the line is not part of the
    /// protocol and the wait continues.
    fn parse_reply(line: &str) -> Option<Result<Value, AgentError>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Ok(Value::Object(reply)) = serde_json::from_str::<Value>(line) else {
            trace!("ignoring non-protocol line from bot");
            return None;
        };
        match reply.get("type").and_then(Value::as_str) {
            Some("move") => Some(match reply.get("move") {
                Some(mv) => Ok(mv.clone()),
                None => Err(AgentError::Failed(anyhow!("bot move message missing 'move'"))),
            }),
            Some("error") => {
                let msg = reply
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unspecified bot error");
                Some(Err(AgentError::Failed(anyhow!("bot reported: {msg}"))))
            }
            // Unknown types stay ignorable so the protocol can grow.
            _ => None,
        }
    }

    fn stdout_closed_failure(&mut self) -> AgentError {
        let status = self
            .child
            .as_mut()
            .and_then(|child| child.try_wait().ok().flatten());
        match status {
            Some(status) => AgentError::Failed(anyhow!("bot process exited with {status}")),
            None => AgentError::Failed(anyhow!("bot stdout closed")),
        }
    }
}

impl Agent for SubprocessAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_move(
        &mut self,
        game: &dyn Game,
        state: &Value,
        player: PlayerId,
        legal_moves: &[Value],
    ) -> Result<Value, AgentError> {
        match self.child.as_mut() {
            None => return Err(AgentError::Failed(anyhow!("bot already closed"))),
            Some(child) => {
                if let Ok(Some(status)) = child.try_wait() {
                    return Err(AgentError::Failed(anyhow!(
                        "bot process exited with {status}"
                    )));
                }
            }
        }

        let ts_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let msg = json!({
            "type": "turn",
            "game": game.name(),
            "player": player,
            "state": state,
            "legal_moves": legal_moves,
            "ts_ms": ts_ms,
        });
        self.write_turn(&msg).map_err(AgentError::Failed)?;

        let deadline = Instant::now() + self.turn_timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(AgentError::Timeout(self.turn_timeout));
            }
            // Wake at least every quantum so the remaining wait is recomputed
            // and the deadline is never overslept.
            let wait = POLL_QUANTUM.min(deadline - now);
            match self.lines.recv_timeout(wait) {
                Ok(line) => {
                    if let Some(reply) = Self::parse_reply(&line) {
                        return reply;
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(self.stdout_closed_failure()),
            }
        }
    }

    fn close(&mut self) {
        // EOF on stdin is the shutdown signal a well-behaved bot honors.
        drop(self.stdin.take());

        if let Some(mut child) = self.child.take() {
            let deadline = Instant::now() + SHUTDOWN_GRACE;
            let exited = loop {
                match child.try_wait() {
                    Ok(Some(status)) => {
                        debug!(%status, "bot exited");
                        break true;
                    }
                    Ok(None) if Instant::now() < deadline => {
                        thread::sleep(Duration::from_millis(50))
                    }
                    Ok(None) => break false,
                    Err(err) => {
                        warn!("could not poll bot process: {err}");
                        break false;
                    }
                }
            };
            if !exited {
                debug!("bot ignored shutdown, killing");
                if let Err(err) = child.kill() {
                    warn!("could not kill bot process: {err}");
                }
                let _ = child.wait();
            }
        }

        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }

    fn allows_operator_pause(&self) -> bool {
        false
    }
}

impl Drop for SubprocessAgent {
    fn drop(&mut self) {
        self.close();
    }
}
