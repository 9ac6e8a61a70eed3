//! Loading stored boards, including legacy line shapes

use ponens_engine::{Dealer, Game, GameSettings, LineKind, ValidationMode, analyze, enforce_board};
use ponens_types::{LineShapeError, RawLine};
use serde_json::{Value, json};

fn stored(value: Value) -> Vec<RawLine> {
    serde_json::from_value(value).unwrap()
}

fn legacy_board() -> Vec<RawLine> {
    stored(json!([
        { "id": "i1", "kind": "imp", "a": "A", "b": "B" },
        { "id": "i2", "kind": "ante", "a": "A" },
        { "id": "i3", "kind": "imp", "text": "C -> D" },
        { "id": "i4", "kind": "ante", "text": "C" },
        { "id": "i5", "kind": "derived", "expr": { "kind": "atom", "sym": "E" } },
        { "id": "i6", "kind": "conj", "text": "F & G" },
    ]))
}

#[test]
fn legacy_board_migrates_in_both_modes() {
    for mode in [ValidationMode::Strict, ValidationMode::Lenient] {
        let mut dealer = Dealer::seeded(1);
        let board = enforce_board(legacy_board(), mode, &mut dealer).unwrap();
        assert_eq!(
            board.display_texts(),
            vec!["A → B", "A", "C → D", "C", "E", "F ∧ G"]
        );
        assert_eq!(board.lines()[4].kind(), LineKind::Derived);
        assert_eq!(analyze(&board).pair_count(), 2);
    }
}

#[test]
fn migrated_lines_serialize_canonically() {
    let mut dealer = Dealer::seeded(1);
    let board = enforce_board(legacy_board(), ValidationMode::Strict, &mut dealer).unwrap();
    let value = serde_json::to_value(&board.lines()[0]).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "i1",
            "kind": "imp",
            "left": { "kind": "atom", "sym": "A" },
            "right": { "kind": "atom", "sym": "B" },
        })
    );
}

#[test]
fn strict_mode_rejects_broken_lines() {
    let raws = stored(json!([
        { "id": "i1", "kind": "ante", "a": "A" },
        { "id": "i2", "kind": "imp", "a": "A" },
    ]));
    let mut dealer = Dealer::seeded(1);
    let err = enforce_board(raws, ValidationMode::Strict, &mut dealer).unwrap_err();
    assert_eq!(err.index, 1);
    assert!(matches!(err.source, LineShapeError::MissingExpression(_)));
}

#[test]
fn lenient_load_repairs_then_replenishes() {
    let raws = stored(json!([
        { "id": "i1", "kind": "imp", "a": "A", "b": "B" },
        { "id": "i2", "kind": "ante", "a": "A" },
        { "id": "i3", "kind": "conj", "text": "F & G & H" },
        { "kind": "ante", "a": "C" },
    ]));
    let mut game = Game::new(GameSettings::default());
    let outcome = game.load_board(raws).unwrap().clone();

    let board = game.board();
    assert_eq!(outcome.len, board.len());
    assert_eq!(board.lines()[0].display_text(), "A → B");
    assert!(board.lines()[2].kind().is_fact());
    assert!(board.lines()[3].kind().is_fact());
    if outcome.is_complete() {
        assert!(outcome.matchable >= 2);
        assert_eq!(board.len(), 8);
    }
}

#[test]
fn strict_load_leaves_the_board_alone() {
    let settings = GameSettings {
        validation: ValidationMode::Strict,
        ..GameSettings::default()
    };
    let mut game = Game::new(settings);
    let before = game.board().clone();
    let raws = stored(json!([{ "id": "i1", "kind": "riddle" }]));
    assert!(game.load_board(raws).is_err());
    assert_eq!(game.board(), &before);
}
