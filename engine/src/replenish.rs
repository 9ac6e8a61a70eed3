//! Board replenishment: restore the minimum-pair and target-size invariants.
//!
//! Runs in three phases:
//! 1. **Pair completion**: while fewer than `K` keys are matchable, add lines
//!    by priority. First a fact for an implication whose condition has none,
//!    then an implication for a fact that has none, then a fresh pair.
//! 2. **Trim**: if completion overshot the target size, drop lines from the
//!    end. Lines outside every pair go first, then duplicates of a key that
//!    another fact and implication already cover. One fact and one
//!    implication per matchable key always stay, as does a kept line.
//! 3. **Padding**: fill up to the target size with decoys that neither
//!    duplicate a line nor add a matchable key.
//!
//! Every loop is bounded by [`ReplenishBudget`]. Running out is reported in
//! [`ReplenishOutcome::exhausted`] and logged, never raised.
//!
//! Lines on a [`Board`] are canonical by construction, so legacy repair
//! happens earlier, in [`crate::validate::enforce_board`].

use std::collections::HashSet;
use std::fmt;

use ponens_types::{DifficultyProfile, ExprKey, Line, LineId, LineKey};

use crate::analysis::analyze;
use crate::board::Board;
use crate::dealer::Dealer;
use crate::generator::{find_decoy, generate_expr};
use crate::rng::RandomSource;

// ── Budget ───────────────────────────────────────────────────

/// Retry limits for every generation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplenishBudget {
    /// Pair-completion iterations.
    pub pair_attempts: u32,
    /// Padding iterations.
    pub padding_attempts: u32,
    /// Candidates drawn per decoy slot.
    pub decoy_tries: u32,
}

impl ReplenishBudget {
    pub const DEFAULT_PAIR_ATTEMPTS: u32 = 100;
    pub const DEFAULT_PADDING_ATTEMPTS: u32 = 50;
    pub const DEFAULT_DECOY_TRIES: u32 = 60;
}

impl Default for ReplenishBudget {
    fn default() -> Self {
        Self {
            pair_attempts: Self::DEFAULT_PAIR_ATTEMPTS,
            padding_attempts: Self::DEFAULT_PADDING_ATTEMPTS,
            decoy_tries: Self::DEFAULT_DECOY_TRIES,
        }
    }
}

// ── Outcome ──────────────────────────────────────────────────

/// A generation loop ran out of budget. Not an error: the board is still
/// valid, just short of pairs or lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationExhausted {
    Pairs { found: usize, wanted: usize },
    Padding { len: usize, target: usize },
    /// Every remaining line is needed to keep its key matchable.
    Oversize { len: usize, target: usize },
}

impl fmt::Display for GenerationExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pairs { found, wanted } => {
                write!(f, "pair completion stopped at {found}/{wanted} matchable keys")
            }
            Self::Padding { len, target } => {
                write!(f, "padding stopped at {len}/{target} lines")
            }
            Self::Oversize { len, target } => {
                write!(f, "trim stopped at {len}/{target} lines")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplenishOutcome {
    /// Distinct matchable keys after the run.
    pub matchable: usize,
    /// Board length after the run.
    pub len: usize,
    pub exhausted: Vec<GenerationExhausted>,
}

impl ReplenishOutcome {
    /// Both invariants hold: at least `K` matchable keys and exactly the
    /// target size.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.exhausted.is_empty()
    }
}

// ── Replenisher ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    CompleteImplication,
    CompleteFact,
    FreshPair,
}

impl Strategy {
    const fn as_str(self) -> &'static str {
        match self {
            Self::CompleteImplication => "complete_implication",
            Self::CompleteFact => "complete_fact",
            Self::FreshPair => "fresh_pair",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replenisher {
    min_pairs: usize,
    budget: ReplenishBudget,
    forbidden: Option<ExprKey>,
    kept: Option<LineId>,
}

impl Replenisher {
    #[must_use]
    pub fn new(min_pairs: usize) -> Self {
        Self {
            min_pairs,
            budget: ReplenishBudget::default(),
            forbidden: None,
            kept: None,
        }
    }

    #[must_use]
    pub fn with_budget(mut self, budget: ReplenishBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Decoys avoid offering `key` as a fact or condition where they can.
    #[must_use]
    pub fn avoiding(mut self, key: ExprKey) -> Self {
        self.forbidden = Some(key);
        self
    }

    /// The trim never removes the line with this id.
    #[must_use]
    pub fn keeping(mut self, id: LineId) -> Self {
        self.kept = Some(id);
        self
    }

    pub fn run<R: RandomSource>(
        &self,
        board: &mut Board,
        profile: &DifficultyProfile,
        dealer: &mut Dealer<R>,
    ) -> ReplenishOutcome {
        let mut line_keys = board.line_keys();
        let mut exhausted = Vec::new();

        if let Some(stop) = self.complete_pairs(board, &mut line_keys, profile, dealer) {
            exhausted.push(stop);
        }
        if let Some(stop) = trim_oversize(board, profile.target_size(), self.kept.as_ref()) {
            exhausted.push(stop);
        }
        if let Some(stop) = self.pad(board, &mut line_keys, profile.target_size(), dealer) {
            exhausted.push(stop);
        }

        ReplenishOutcome {
            matchable: analyze(board).pair_count(),
            len: board.len(),
            exhausted,
        }
    }

    fn complete_pairs<R: RandomSource>(
        &self,
        board: &mut Board,
        line_keys: &mut HashSet<LineKey>,
        profile: &DifficultyProfile,
        dealer: &mut Dealer<R>,
    ) -> Option<GenerationExhausted> {
        let mut attempts = 0;
        loop {
            let found = analyze(board).pair_count();
            if found >= self.min_pairs {
                return None;
            }
            if attempts >= self.budget.pair_attempts {
                let stop = GenerationExhausted::Pairs {
                    found,
                    wanted: self.min_pairs,
                };
                tracing::warn!(attempts, "{stop}");
                return Some(stop);
            }
            attempts += 1;

            let (strategy, candidates) = synthesize(board, profile, dealer);
            for line in candidates {
                let key = line.line_key();
                if line_keys.contains(&key) {
                    tracing::debug!(strategy = strategy.as_str(), key = %key, "discarding duplicate line");
                    continue;
                }
                tracing::debug!(strategy = strategy.as_str(), id = %line.id(), text = %line, "synthesized line");
                line_keys.insert(key);
                board.push(line);
            }
        }
    }

    fn pad<R: RandomSource>(
        &self,
        board: &mut Board,
        line_keys: &mut HashSet<LineKey>,
        target: usize,
        dealer: &mut Dealer<R>,
    ) -> Option<GenerationExhausted> {
        let mut attempts = 0;
        while board.len() < target {
            let stop = GenerationExhausted::Padding {
                len: board.len(),
                target,
            };
            if attempts >= self.budget.padding_attempts {
                tracing::warn!(attempts, "{stop}");
                return Some(stop);
            }
            attempts += 1;

            let decoy = {
                let analysis = analyze(board);
                find_decoy(
                    &analysis,
                    line_keys,
                    self.forbidden.as_ref(),
                    self.budget.decoy_tries,
                    dealer,
                )
            };
            let Some(decoy) = decoy else {
                tracing::warn!("{stop}");
                return Some(stop);
            };
            tracing::debug!(id = %decoy.id(), text = %decoy, "padding decoy");
            line_keys.insert(decoy.line_key());
            board.push(decoy);
        }
        None
    }
}

/// Pick the cheapest way to add one matchable key, scanning in board order.
fn synthesize<R: RandomSource>(
    board: &Board,
    profile: &DifficultyProfile,
    dealer: &mut Dealer<R>,
) -> (Strategy, Vec<Line>) {
    let analysis = analyze(board);

    let unmet_condition = board
        .iter()
        .filter_map(Line::implication_parts)
        .map(|(left, _)| left)
        .find(|left| !analysis.has_fact(&left.key()));
    if let Some(left) = unmet_condition {
        return (
            Strategy::CompleteImplication,
            vec![dealer.antecedent(left.clone())],
        );
    }

    let unused_fact = board
        .iter()
        .filter_map(Line::fact)
        .find(|expr| !analysis.has_implication(&expr.key()));
    if let Some(expr) = unused_fact {
        let right = generate_expr(profile, dealer);
        return (
            Strategy::CompleteFact,
            vec![dealer.implication(expr.clone(), right)],
        );
    }

    let left = dealer.atom();
    let right = generate_expr(profile, dealer);
    let implication = dealer.implication(left.clone(), right);
    let fact = dealer.antecedent(left);
    (Strategy::FreshPair, vec![implication, fact])
}

/// Remove lines from the end until the board fits, keeping every matchable
/// key matchable and never touching `kept`.
fn trim_oversize(
    board: &mut Board,
    target: usize,
    kept: Option<&LineId>,
) -> Option<GenerationExhausted> {
    let excess = board.len().saturating_sub(target);
    if excess == 0 {
        return None;
    }
    let analysis = analyze(board);
    let is_kept = |line: &Line| kept.is_some_and(|id| line.id() == id);

    let mut essential: HashSet<&LineId> = board
        .iter()
        .filter(|line| is_kept(line))
        .map(Line::id)
        .collect();
    for key in analysis.matchable_keys() {
        let facts = analysis.facts_for(key);
        let fact = facts
            .iter()
            .copied()
            .find(|line| is_kept(line))
            .or_else(|| facts.first().copied());
        let implication = analysis.implications_for(key).first().copied();
        essential.extend(fact.into_iter().chain(implication).map(Line::id));
    }

    let (loose, redundant): (Vec<_>, Vec<_>) = board
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, line)| !essential.contains(line.id()))
        .partition(|(_, line)| !analysis.participates(line));
    let mut removable: Vec<usize> = loose
        .into_iter()
        .chain(redundant)
        .map(|(idx, _)| idx)
        .take(excess)
        .collect();
    removable.sort_unstable_by(|a, b| b.cmp(a));

    for idx in removable {
        let line = board.remove(idx);
        tracing::debug!(id = %line.id(), text = %line, "trimmed oversize line");
    }
    if board.len() > target {
        let stop = GenerationExhausted::Oversize {
            len: board.len(),
            target,
        };
        tracing::warn!("{stop}");
        return Some(stop);
    }
    None
}

/// Bring `board` up to `min_pairs` matchable keys and the profile's size
/// with the default budget.
pub fn ensure_minimum_pairs<R: RandomSource>(
    board: &mut Board,
    min_pairs: usize,
    profile: &DifficultyProfile,
    dealer: &mut Dealer<R>,
) -> ReplenishOutcome {
    Replenisher::new(min_pairs).run(board, profile, dealer)
}
