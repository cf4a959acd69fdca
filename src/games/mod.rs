//! Built-in rule sets

mod tictactoe;

pub use tictactoe::TicTacToe;
