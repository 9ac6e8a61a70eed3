//! Property tests over generated expressions and boards

use proptest::prelude::*;

use ponens_engine::{Dealer, Replenisher, analyze, is_valid_pair};
use ponens_types::{DifficultyProfile, Mode};

use crate::common::{arb_board, arb_expr, size_held};

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop::sample::select(Mode::ALL.to_vec())
}

proptest! {
    #[test]
    fn clones_are_equal(expr in arb_expr()) {
        prop_assert_eq!(expr.clone(), expr);
    }

    #[test]
    fn equality_is_key_equality(a in arb_expr(), b in arb_expr()) {
        prop_assert_eq!(a == b, a.key() == b.key());
    }

    #[test]
    fn valid_pair_is_symmetric(board in arb_board()) {
        for a in &board {
            for b in &board {
                prop_assert_eq!(is_valid_pair(a, b), is_valid_pair(b, a));
            }
        }
    }

    #[test]
    fn replenish_restores_invariants(
        board in arb_board(),
        mode in arb_mode(),
        seed in any::<u32>()
    ) {
        let mut board = board;
        let profile: DifficultyProfile = mode.profile();
        let mut dealer = Dealer::seeded(seed);
        for line in &board {
            dealer.observe(line.id());
        }
        let before = board.len();
        let outcome = Replenisher::new(2).run(&mut board, &profile, &mut dealer);

        prop_assert_eq!(outcome.len, board.len());
        prop_assert_eq!(outcome.matchable, analyze(&board).pair_count());
        if outcome.is_complete() {
            prop_assert!(outcome.matchable >= 2);
        }
        if size_held(&outcome) {
            prop_assert_eq!(board.len(), profile.target_size());
        }
        if before < profile.target_size() {
            prop_assert!(board.len() >= before);
        }

        let mut ids: Vec<&str> = board.iter().map(|line| line.id().as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), board.len());
    }
}
