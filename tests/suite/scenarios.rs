//! End-to-end game scenarios

use std::time::{Duration, Instant};

use ponens_engine::{
    Board, Dealer, Game, GameSettings, LineKind, MatchResult, analyze, ensure_minimum_pairs,
    start_board,
};
use ponens_types::{DifficultyProfile, LineContent, Mode};

use crate::common::{id, pairs_held, size_held};

#[test]
fn atoms_only_board_of_six() {
    let profile = DifficultyProfile::new(6, false, 0).unwrap();
    let settings = GameSettings {
        profile,
        ..GameSettings::default()
    };
    for seed in [1, 12_345, 99, 2024, u32::MAX] {
        let mut dealer = Dealer::seeded(seed);
        let (board, outcome) = start_board(&settings, &mut dealer);

        assert_eq!(outcome.matchable, analyze(&board).pair_count());
        if outcome.is_complete() {
            assert!(outcome.matchable >= 2, "seed {seed}");
            assert_eq!(board.len(), 6, "seed {seed}");
        }
        for line in &board {
            let operands: Vec<_> = match line.content() {
                LineContent::Antecedent(e) | LineContent::Derived(e) => vec![e],
                LineContent::Implication { left, right }
                | LineContent::Conjunction { left, right } => vec![left, right],
            };
            assert!(operands.iter().all(|e| e.is_atom()), "seed {seed}: {line}");
        }
    }
}

#[test]
fn matching_key_a_on_reference_board() {
    let settings = GameSettings::for_mode(Mode::Hard);
    let target = settings.profile.target_size();
    let mut game = Game::safe_start(settings);
    let now = Instant::now();

    assert_eq!(game.select(&id("i1"), now).result, MatchResult::Pending);
    let outcome = game.select(&id("i2"), now);
    assert_eq!(outcome.result, MatchResult::Valid);

    let resolution = outcome.resolution.unwrap();
    assert_eq!(resolution.retired_implication.display_text(), "A → B");
    assert_eq!(resolution.retired_fact.display_text(), "A");

    let board = game.board();
    assert!(!board.contains(&id("i1")));
    assert!(!board.contains(&id("i2")));
    let derived = board.get(&resolution.derived).unwrap();
    assert_eq!(derived.kind(), LineKind::Derived);
    assert_eq!(derived.display_text(), "B");

    if resolution.replenish.is_complete() {
        assert_eq!(board.len(), target);
        assert!(analyze(board).pair_count() >= 2);
    }
}

#[test]
fn fact_and_conjunction_never_match() {
    let mut game = Game::safe_start(GameSettings::default());
    let now = Instant::now();
    let before = game.board().clone();

    game.select(&id("i5"), now);
    let outcome = game.select(&id("i6"), now);

    assert_eq!(outcome.result, MatchResult::Invalid);
    assert!(outcome.resolution.is_none());
    assert_eq!(game.board(), &before);
    assert_eq!(game.streak(), 0);
}

/// Plays the first listed pair up to `moves` times, checking the board after
/// every resolution.
fn play_first_pairs(settings: GameSettings, moves: usize) -> Game {
    let target = settings.profile.target_size();
    let mut game = Game::new(settings);
    let mut clock = Instant::now();

    for step in 0..moves {
        let Some(pair) = game
            .pairs()
            .first()
            .map(|p| (p.fact.id().clone(), p.implication.id().clone()))
        else {
            break;
        };
        clock += Duration::from_millis(250);
        game.select(&pair.0, clock);
        let outcome = game.select(&pair.1, clock);
        assert_eq!(outcome.result, MatchResult::Valid, "move {step}");

        let resolution = outcome.resolution.unwrap();
        assert_eq!(resolution.retired_fact.id(), &pair.0);
        assert_eq!(resolution.retired_implication.id(), &pair.1);
        assert!(game.board().contains(&resolution.derived), "move {step}");
        assert_eq!(resolution.replenish.len, game.board().len());
        if size_held(&resolution.replenish) {
            assert_eq!(game.board().len(), target, "move {step}");
        }
        if pairs_held(&resolution.replenish) {
            assert!(analyze(game.board()).pair_count() >= 2, "move {step}");
        }
    }
    game
}

#[test]
fn each_match_restores_target_size() {
    let game = play_first_pairs(GameSettings::for_mode(Mode::Medium), 15);
    assert!(game.score() > 0);
}

#[test]
fn long_easy_game_stays_at_target_size() {
    let settings = GameSettings {
        seed: 134,
        ..GameSettings::for_mode(Mode::Easy)
    };
    let game = play_first_pairs(settings, 40);
    assert!(game.score() > 0);
    assert!(game.board().len() <= 8);
}

#[test]
fn replenish_from_empty_respects_budget_defaults() {
    let mut board = Board::default();
    let mut dealer = Dealer::seeded(3);
    let profile = Mode::Hard.profile();
    let outcome = ensure_minimum_pairs(&mut board, 2, &profile, &mut dealer);
    assert_eq!(outcome.len, board.len());
    assert_eq!(outcome.matchable, analyze(&board).pair_count());
}
