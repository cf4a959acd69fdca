use serde_json::{json, Value};

use ai_arena::game_interface::Game;
use ai_arena::games::TicTacToe;
use ai_arena::match_runner::MoveRecord;
use ai_arena::replay::{load_match_log, replay_from_log_payload, replay_from_move_history};

fn clean_record(turn: u32, player: u8, mv: Value) -> MoveRecord {
    MoveRecord {
        turn,
        player,
        mv,
        ms: Some(0.0),
        note: None,
    }
}

#[test]
fn test_replay_reconstructs_states_and_terminal() {
    let game = TicTacToe::new();
    // X (player 0) wins on the top row: 0, 1, 2.
    let history = vec![
        clean_record(1, 0, json!(0)),
        clean_record(2, 1, json!(3)),
        clean_record(3, 0, json!(1)),
        clean_record(4, 1, json!(4)),
        clean_record(5, 0, json!(2)),
    ];

    let replay = replay_from_move_history(&game, &history).unwrap();

    assert_eq!(replay.states.len(), history.len() + 1);
    assert_eq!(replay.states[0], game.initial_state());
    assert!(replay.terminal.is_terminal);
    assert_eq!(replay.terminal.winner, Some(0));
    assert_eq!(replay.terminal.reason, "win");
}

#[test]
fn test_replay_keeps_forfeit_frame_and_engine_verdict() {
    let game = TicTacToe::new();
    let payload = json!({
        "game": "tictactoe",
        "result": {
            "game": "tictactoe",
            "winner": 0,
            "reason": "illegal_move",
            "turns": 2,
            "move_history": [
                { "turn": 1, "player": 0, "move": 0, "ms": 0.0, "note": null },
                { "turn": 2, "player": 1, "move": 999, "ms": 0.0, "note": "illegal_move" },
            ],
        },
    });

    let replay = replay_from_log_payload(&game, &payload).unwrap();

    // Initial state, one applied move, one unchanged forfeit frame.
    assert_eq!(replay.states.len(), 3);
    assert_eq!(replay.states[1], replay.states[2]);
    assert!(replay.terminal.is_terminal);
    assert_eq!(replay.terminal.winner, Some(0));
    assert_eq!(replay.terminal.reason, "illegal_move");
}

#[test]
fn test_forfeit_record_stops_the_walk() {
    let game = TicTacToe::new();
    // Records after the noted one must be ignored, whatever they contain.
    let history = vec![
        clean_record(1, 0, json!(4)),
        MoveRecord {
            turn: 2,
            player: 1,
            mv: Value::Null,
            ms: Some(12.5),
            note: Some("agent_error".to_owned()),
        },
        clean_record(3, 0, json!(4)),
    ];

    let replay = replay_from_move_history(&game, &history).unwrap();
    assert_eq!(replay.states.len(), 3);
    assert_eq!(replay.states[1], replay.states[2]);
    assert!(!replay.terminal.is_terminal);
}

#[test]
fn test_rules_verdict_beats_payload_reason() {
    let game = TicTacToe::new();
    // The board is a genuine win; the payload reason must not override it.
    let payload = json!({
        "result": {
            "winner": null,
            "reason": "timeout",
            "move_history": [
                { "turn": 1, "player": 0, "move": 0, "ms": 0.0, "note": null },
                { "turn": 2, "player": 1, "move": 3, "ms": 0.0, "note": null },
                { "turn": 3, "player": 0, "move": 1, "ms": 0.0, "note": null },
                { "turn": 4, "player": 1, "move": 4, "ms": 0.0, "note": null },
                { "turn": 5, "player": 0, "move": 2, "ms": 0.0, "note": null },
            ],
        },
    });

    let replay = replay_from_log_payload(&game, &payload).unwrap();
    assert_eq!(replay.terminal.reason, "win");
    assert_eq!(replay.terminal.winner, Some(0));
}

#[test]
fn test_load_match_log_round_trip() {
    use ai_arena::agents::FirstLegalAgent;
    use ai_arena::match_runner::{play_match, MatchOptions};

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("match.json");

    let game = TicTacToe::new();
    let mut agent0 = FirstLegalAgent::new();
    let mut agent1 = FirstLegalAgent::new();
    let options = MatchOptions::new().with_log_path(log_path.clone());
    let result = play_match(&game, &mut agent0, &mut agent1, &options).unwrap();

    let payload = load_match_log(&log_path).unwrap();
    let replay = replay_from_log_payload(&game, &payload).unwrap();

    assert_eq!(replay.states.len() as u32, result.turns + 1);
    assert_eq!(replay.terminal.reason, result.reason);
    assert_eq!(replay.states.last().unwrap(), &payload["final_state"]);
}

#[test]
fn test_malformed_payload_is_an_error() {
    let game = TicTacToe::new();
    assert!(replay_from_log_payload(&game, &json!({})).is_err());
    assert!(replay_from_log_payload(&game, &json!({ "result": { "move_history": 7 } })).is_err());
}
