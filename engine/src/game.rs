//! Game sessions: fresh boards, match resolution, and score keeping.

use std::mem;
use std::time::Instant;

use thiserror::Error;

use ponens_types::{
    Alphabet, DifficultyProfile, Expr, Line, LineId, MIN_PAIRS, Mode, REFERENCE_SYMBOLS, RawLine,
};

use crate::analysis::{Pair, analyze};
use crate::board::Board;
use crate::dealer::Dealer;
use crate::replenish::{ReplenishBudget, ReplenishOutcome, Replenisher};
use crate::rng::{Lcg, RandomSource};
use crate::selection::{LatchTiming, MatchResult, Selection, is_valid_pair, select_line};
use crate::validate::{StructuralError, ValidationMode, enforce_board};

// ── Settings ─────────────────────────────────────────────────

/// Everything a game needs besides its random stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub profile: DifficultyProfile,
    /// `K`: matchable keys the board keeps after every move.
    pub min_pairs: usize,
    pub budget: ReplenishBudget,
    pub timing: LatchTiming,
    pub validation: ValidationMode,
    pub alphabet: Alphabet,
    pub seed: u32,
}

impl GameSettings {
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            profile: mode.profile(),
            ..Self::default()
        }
    }

    fn replenisher(&self) -> Replenisher {
        Replenisher::new(self.min_pairs).with_budget(self.budget)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            profile: DifficultyProfile::default(),
            min_pairs: MIN_PAIRS,
            budget: ReplenishBudget::default(),
            timing: LatchTiming::default(),
            validation: ValidationMode::default(),
            alphabet: Alphabet::reference(),
            seed: Lcg::DEFAULT_SEED,
        }
    }
}

// ── Free operations ──────────────────────────────────────────

/// A fresh board meeting the minimum-pair and size invariants, modulo
/// reported exhaustion.
pub fn start_board<R: RandomSource>(
    settings: &GameSettings,
    dealer: &mut Dealer<R>,
) -> (Board, ReplenishOutcome) {
    let mut board = Board::default();
    let outcome = settings
        .replenisher()
        .run(&mut board, &settings.profile, dealer);
    tracing::info!(
        pairs = outcome.matchable,
        lines = outcome.len,
        target = settings.profile.target_size(),
        "started board"
    );
    (board, outcome)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("line {0} is not on the board")]
    UnknownLine(LineId),
    #[error("lines {first} and {second} are not a matching pair")]
    NotAPair { first: LineId, second: LineId },
}

/// What a resolved match changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Id of the new derived fact, sitting in the implication's old slot.
    pub derived: LineId,
    pub retired_fact: Line,
    pub retired_implication: Line,
    pub replenish: ReplenishOutcome,
}

/// Retire a valid pair, derive its consequence, and replenish.
///
/// The derived fact takes the implication's slot and the fact's slot is
/// removed. Decoys added afterwards avoid the matched condition, and the
/// derived fact survives any trim.
pub fn resolve_match<R: RandomSource>(
    board: &mut Board,
    pair: (&LineId, &LineId),
    settings: &GameSettings,
    dealer: &mut Dealer<R>,
) -> Result<Resolution, MatchError> {
    let (first, second) = pair;
    let first_idx = board
        .position(first)
        .ok_or_else(|| MatchError::UnknownLine(first.clone()))?;
    let second_idx = board
        .position(second)
        .ok_or_else(|| MatchError::UnknownLine(second.clone()))?;

    let lines = board.lines();
    if !is_valid_pair(&lines[first_idx], &lines[second_idx]) {
        return Err(MatchError::NotAPair {
            first: first.clone(),
            second: second.clone(),
        });
    }
    let (fact_idx, imp_idx) = if lines[first_idx].fact().is_some() {
        (first_idx, second_idx)
    } else {
        (second_idx, first_idx)
    };
    let Some((left, right)) = lines[imp_idx].implication_parts() else {
        return Err(MatchError::NotAPair {
            first: first.clone(),
            second: second.clone(),
        });
    };
    let forbidden = left.key();
    let derived = dealer.derived(right.clone());
    let derived_id = derived.id().clone();

    let retired_implication = board.replace(imp_idx, derived);
    let retired_fact = board.remove(fact_idx);
    let replenish = settings
        .replenisher()
        .avoiding(forbidden)
        .keeping(derived_id.clone())
        .run(board, &settings.profile, dealer);

    tracing::debug!(
        fact = %retired_fact,
        implication = %retired_implication,
        derived = %derived_id,
        pairs = replenish.matchable,
        lines = replenish.len,
        "resolved match"
    );
    Ok(Resolution {
        derived: derived_id,
        retired_fact,
        retired_implication,
        replenish,
    })
}

/// `[A → B, A, C → D, C, E, F ∧ G]`: two pairs and two decoys, no randomness.
///
/// Symbols are the first seven of the dealer's alphabet. Alphabets with
/// fewer symbols fall back to the reference `A`..`G`.
pub fn safe_board<R: RandomSource>(dealer: &mut Dealer<R>) -> Board {
    let alphabet = if dealer.alphabet().len() >= REFERENCE_SYMBOLS.len() {
        dealer.alphabet().clone()
    } else {
        Alphabet::reference()
    };
    let sym = |idx: usize| Expr::atom(alphabet.symbols()[idx].clone());
    Board::new(vec![
        dealer.implication(sym(0), sym(1)),
        dealer.antecedent(sym(0)),
        dealer.implication(sym(2), sym(3)),
        dealer.antecedent(sym(2)),
        dealer.antecedent(sym(4)),
        dealer.conjunction(sym(5), sym(6)),
    ])
}

// ── Session ──────────────────────────────────────────────────

/// Result of [`Game::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOutcome {
    pub result: MatchResult,
    /// Set when `result` is [`MatchResult::Valid`].
    pub resolution: Option<Resolution>,
}

/// One player's game: board, latch, score and streak over a single random
/// stream.
#[derive(Debug, Clone)]
pub struct Game<R = Lcg> {
    settings: GameSettings,
    dealer: Dealer<R>,
    board: Board,
    selection: Selection,
    score: u32,
    streak: u32,
    last_replenish: ReplenishOutcome,
}

impl Game<Lcg> {
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        let rng = Lcg::new(settings.seed);
        Self::with_rng(rng, settings)
    }

    /// The fixed diagnostic board, without replenishment.
    #[must_use]
    pub fn safe_start(settings: GameSettings) -> Self {
        let mut dealer = Dealer::new(Lcg::new(settings.seed), settings.alphabet.clone());
        let board = safe_board(&mut dealer);
        let outcome = ReplenishOutcome {
            matchable: analyze(&board).pair_count(),
            len: board.len(),
            exhausted: Vec::new(),
        };
        tracing::info!(pairs = outcome.matchable, lines = outcome.len, "started safe board");
        Self::assemble(settings, dealer, board, outcome)
    }
}

impl<R: RandomSource> Game<R> {
    pub fn with_rng(rng: R, settings: GameSettings) -> Self {
        let mut dealer = Dealer::new(rng, settings.alphabet.clone());
        let (board, outcome) = start_board(&settings, &mut dealer);
        Self::assemble(settings, dealer, board, outcome)
    }

    fn assemble(
        settings: GameSettings,
        dealer: Dealer<R>,
        board: Board,
        last_replenish: ReplenishOutcome,
    ) -> Self {
        Self {
            settings,
            dealer,
            board,
            selection: Selection::Idle,
            score: 0,
            streak: 0,
            last_replenish,
        }
    }

    /// New board from the same random stream; score, streak and selection
    /// reset. Line ids keep counting.
    pub fn restart(&mut self) {
        let (board, outcome) = start_board(&self.settings, &mut self.dealer);
        self.board = board;
        self.last_replenish = outcome;
        self.selection = Selection::Idle;
        self.score = 0;
        self.streak = 0;
    }

    /// Replace the board with a stored one, then replenish it.
    pub fn load_board(&mut self, raws: Vec<RawLine>) -> Result<&ReplenishOutcome, StructuralError> {
        let mut board = enforce_board(raws, self.settings.validation, &mut self.dealer)?;
        self.last_replenish =
            self.settings
                .replenisher()
                .run(&mut board, &self.settings.profile, &mut self.dealer);
        self.board = board;
        self.selection = Selection::Idle;
        Ok(&self.last_replenish)
    }

    /// Select a line at `now`. A valid pair is resolved on the spot.
    pub fn select(&mut self, id: &LineId, now: Instant) -> SelectOutcome {
        let (selection, result) =
            select_line(&self.board, &self.selection, id, now, self.settings.timing);
        self.selection = selection;

        let resolution = match result {
            MatchResult::Valid => {
                self.score += 1;
                self.streak += 1;
                self.resolve_locked()
            }
            MatchResult::Invalid => {
                self.streak = 0;
                None
            }
            MatchResult::None | MatchResult::Pending => None,
        };
        SelectOutcome { result, resolution }
    }

    fn resolve_locked(&mut self) -> Option<Resolution> {
        let Selection::Locked { first, second, .. } = &self.selection else {
            return None;
        };
        let pair = (first.clone(), second.clone());
        match resolve_match(
            &mut self.board,
            (&pair.0, &pair.1),
            &self.settings,
            &mut self.dealer,
        ) {
            Ok(resolution) => {
                self.last_replenish = resolution.replenish.clone();
                Some(resolution)
            }
            Err(error) => {
                tracing::warn!(%error, "validated pair failed to resolve");
                None
            }
        }
    }

    /// Release the latch if its hold has elapsed.
    pub fn settle(&mut self, now: Instant) {
        self.selection = mem::take(&mut self.selection).settle(now);
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn selected_ids(&self, now: Instant) -> Vec<&LineId> {
        self.selection.selected_ids(now)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn dealer(&self) -> &Dealer<R> {
        &self.dealer
    }

    /// Outcome of the most recent replenishment.
    #[must_use]
    pub fn last_replenish(&self) -> &ReplenishOutcome {
        &self.last_replenish
    }

    #[must_use]
    pub fn has_moves(&self) -> bool {
        self.board.has_moves()
    }

    /// One representative pair per matchable key.
    #[must_use]
    pub fn pairs(&self) -> Vec<Pair<'_>> {
        analyze(&self.board).pairs()
    }
}
