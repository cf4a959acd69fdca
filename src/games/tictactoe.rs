use anyhow::{bail, Context};
use serde_json::{json, Value};

use crate::game_interface::{Game, PlayerId, Terminal};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Classic 3×3 board.
///
/// State is `{"board": [nine cells]}` where a cell is 0 (empty), 1 (X,
/// player 0) or 2 (O, player 1); a move is a cell index 0–8.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    /// Creates the rule set.
    pub fn new() -> Self {
        Self
    }

    fn board(state: &Value) -> anyhow::Result<Vec<u8>> {
        let cells = state
            .get("board")
            .and_then(Value::as_array)
            .context("state has no 'board' list")?;
        if cells.len() != 9 {
            bail!("board must have 9 cells, got {}", cells.len());
        }
        cells
            .iter()
            .map(|cell| {
                cell.as_u64()
                    .and_then(|v| u8::try_from(v).ok())
                    .filter(|v| *v <= 2)
                    .context("board cells must be 0, 1, or 2")
            })
            .collect()
    }

    fn line_winner(board: &[u8]) -> Option<PlayerId> {
        for [a, b, c] in LINES {
            let v = board[a];
            if v != 0 && v == board[b] && v == board[c] {
                return Some(v - 1);
            }
        }
        None
    }
}

impl Game for TicTacToe {
    fn name(&self) -> &str {
        "tictactoe"
    }

    fn initial_state(&self) -> Value {
        json!({ "board": vec![0; 9] })
    }

    fn legal_moves(&self, state: &Value, _player: PlayerId) -> Vec<Value> {
        match Self::board(state) {
            Ok(board) => board
                .iter()
                .enumerate()
                .filter(|(_, v)| **v == 0)
                .map(|(i, _)| Value::from(i))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn apply_move(&self, state: &Value, player: PlayerId, mv: &Value) -> anyhow::Result<Value> {
        let cell = mv
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .with_context(|| format!("move must be a cell index, got {mv}"))?;
        let mut board = Self::board(state)?;
        if cell >= 9 || board[cell] != 0 {
            bail!("cell {cell} is not playable");
        }
        board[cell] = player + 1;
        Ok(json!({ "board": board }))
    }

    fn terminal(&self, state: &Value) -> Terminal {
        let Ok(board) = Self::board(state) else {
            return Terminal::ongoing();
        };
        if let Some(winner) = Self::line_winner(&board) {
            return Terminal::won_by(winner, "win");
        }
        if board.iter().all(|v| *v != 0) {
            return Terminal::draw("draw");
        }
        Terminal::ongoing()
    }

    fn render(&self, state: &Value) -> String {
        let board = Self::board(state).unwrap_or_else(|_| vec![0; 9]);
        let glyph = |v: u8| match v {
            1 => 'X',
            2 => 'O',
            _ => '.',
        };
        (0..3usize)
            .map(|r| {
                (0..3usize)
                    .map(|c| glyph(board[3 * r + c]).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
