//! Difficulty-aware expression generation and decoy lines.
//!
//! The thresholds below are fixed design constants. Seeded replays depend on
//! both their values and the order in which symbols are drawn.

use std::collections::HashSet;

use ponens_types::{DifficultyProfile, Expr, ExprKey, Line, LineKey};

use crate::analysis::BoardAnalysis;
use crate::dealer::Dealer;
use crate::rng::RandomSource;

/// `r < 0.3` yields a conjunction when conjunctions are enabled.
pub const CONJUNCTION_CUTOFF: f64 = 0.3;
/// `r < 0.6` yields an implication when conditionals are allowed.
pub const IMPLICATION_CUTOFF: f64 = 0.6;

/// `r < 0.4` yields a fact decoy.
pub const DECOY_FACT_CUTOFF: f64 = 0.4;
/// `0.4 <= r < 0.75` yields an implication decoy; the rest are conjunctions.
pub const DECOY_IMPLICATION_CUTOFF: f64 = 0.75;

/// Draw an expression for the profile.
///
/// Atoms-only profiles consume a single symbol draw. Otherwise one fraction
/// `r` picks the shape: conjunction below 0.3 (if enabled), implication below
/// 0.6 (if allowed), atom otherwise. Compound shapes always take two
/// independently drawn atoms.
pub fn generate_expr<R: RandomSource>(profile: &DifficultyProfile, dealer: &mut Dealer<R>) -> Expr {
    if profile.atoms_only() {
        return dealer.atom();
    }
    let r = dealer.fraction();
    if profile.conjunctions_enabled() && r < CONJUNCTION_CUTOFF {
        let left = dealer.atom();
        let right = dealer.atom();
        return Expr::conj(left, right);
    }
    if profile.allow_conditional() && r < IMPLICATION_CUTOFF {
        let left = dealer.atom();
        let right = dealer.atom();
        return Expr::imp(left, right);
    }
    dealer.atom()
}

/// One decoy candidate over fresh atoms.
///
/// The fact symbol, or the left symbol of a two-atom decoy, is redrawn once
/// if it equals `forbidden`. Two-atom decoys always use distinct symbols.
/// Whether the candidate is actually harmless is checked by [`find_decoy`].
pub fn decoy<R: RandomSource>(forbidden: Option<&ExprKey>, dealer: &mut Dealer<R>) -> Line {
    let is_forbidden = |expr: &Expr| forbidden.is_some_and(|key| expr.key() == *key);

    let r = dealer.fraction();
    if r < DECOY_FACT_CUTOFF {
        let mut symbol = dealer.pick_symbol(&[]);
        if is_forbidden(&Expr::atom(symbol.clone())) {
            symbol = dealer.pick_symbol(&[&symbol]);
        }
        return dealer.antecedent(Expr::atom(symbol));
    }

    let mut first = dealer.pick_symbol(&[]);
    let second = dealer.pick_symbol(&[&first]);
    if is_forbidden(&Expr::atom(first.clone())) {
        first = dealer.pick_symbol(&[&first, &second]);
    }
    let (left, right) = (Expr::atom(first), Expr::atom(second));
    if r < DECOY_IMPLICATION_CUTOFF {
        dealer.implication(left, right)
    } else {
        dealer.conjunction(left, right)
    }
}

/// Try up to `tries` decoy candidates, returning the first that neither
/// duplicates an existing line nor adds a matchable key.
///
/// `None` means the budget ran out; the caller leaves the slot empty.
pub fn find_decoy<R: RandomSource>(
    analysis: &BoardAnalysis<'_>,
    line_keys: &HashSet<LineKey>,
    forbidden: Option<&ExprKey>,
    tries: u32,
    dealer: &mut Dealer<R>,
) -> Option<Line> {
    for _ in 0..tries {
        let candidate = decoy(forbidden, dealer);
        if line_keys.contains(&candidate.line_key()) || analysis.gains_pair(&candidate) {
            continue;
        }
        return Some(candidate);
    }
    tracing::warn!(tries, "find_decoy: no acceptable decoy within budget");
    None
}
