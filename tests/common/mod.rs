//! Shared test utilities and fixtures
//!
//! Board builders and proptest strategies used across the suite.

#![allow(dead_code)]

use proptest::prelude::*;

use ponens_engine::{
    Board, Dealer, GenerationExhausted, Line, LineId, RandomSource, ReplenishOutcome, ScriptedRng,
};
use ponens_types::{Alphabet, Expr, REFERENCE_SYMBOLS, Symbol};

pub fn sym(s: &str) -> Symbol {
    Symbol::new(s).unwrap()
}

pub fn atom(s: &str) -> Expr {
    Expr::atom(sym(s))
}

pub fn id(s: &str) -> LineId {
    LineId::parse(s).unwrap()
}

/// `[A → B, A, C → D, C, E, F ∧ G]` with ids `t1`..`t6`.
pub fn reference_board() -> Board {
    Board::new(vec![
        Line::implication(id("t1"), atom("A"), atom("B")),
        Line::antecedent(id("t2"), atom("A")),
        Line::implication(id("t3"), atom("C"), atom("D")),
        Line::antecedent(id("t4"), atom("C")),
        Line::antecedent(id("t5"), atom("E")),
        Line::conjunction(id("t6"), atom("F"), atom("G")),
    ])
}

pub fn scripted(values: &[f64]) -> Dealer<ScriptedRng> {
    Dealer::new(ScriptedRng::new(values.to_vec()), Alphabet::reference())
}

/// Draw `n` fractions from a source, for comparing streams.
pub fn draws(rng: &mut impl RandomSource, n: usize) -> Vec<u64> {
    (0..n).map(|_| rng.next_fraction().to_bits()).collect()
}

/// Padding and trimming both finished, so the board sits at its target size.
pub fn size_held(outcome: &ReplenishOutcome) -> bool {
    !outcome.exhausted.iter().any(|stop| {
        matches!(
            stop,
            GenerationExhausted::Padding { .. } | GenerationExhausted::Oversize { .. }
        )
    })
}

/// Pair completion reached the minimum number of matchable keys.
pub fn pairs_held(outcome: &ReplenishOutcome) -> bool {
    !outcome
        .exhausted
        .iter()
        .any(|stop| matches!(stop, GenerationExhausted::Pairs { .. }))
}

// ── Strategies ───────────────────────────────────────────────

pub fn arb_symbol() -> impl Strategy<Value = Symbol> {
    prop::sample::select(REFERENCE_SYMBOLS.to_vec()).prop_map(sym)
}

pub fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = arb_symbol().prop_map(Expr::atom);
    leaf.prop_recursive(
        3,  // levels deep
        16, // max size
        2,  // items per collection
        |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::conj(l, r)),
                (inner.clone(), inner).prop_map(|(l, r)| Expr::imp(l, r)),
            ]
        },
    )
}

/// Lines with ids `p0`, `p1`, ... so a board never repeats an id.
pub fn arb_board() -> impl Strategy<Value = Board> {
    let line = (0u8..4, arb_expr(), arb_expr());
    prop::collection::vec(line, 0..10).prop_map(|specs| {
        let lines = specs
            .into_iter()
            .enumerate()
            .map(|(idx, (kind, left, right))| {
                let id = id(&format!("p{idx}"));
                match kind {
                    0 => Line::antecedent(id, left),
                    1 => Line::derived(id, left),
                    2 => Line::implication(id, left, right),
                    _ => Line::conjunction(id, left, right),
                }
            })
            .collect();
        Board::new(lines)
    })
}
