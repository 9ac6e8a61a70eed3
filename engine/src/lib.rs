//! Board engine for Ponens.
//!
//! Generation, replenishment, validation and match resolution over the
//! domain types in `ponens-types`. No IO: randomness comes from an explicit
//! [`RandomSource`] and time from caller-supplied [`std::time::Instant`]s.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)] // fraction * len over small alphabets
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

mod analysis;
mod board;
mod dealer;
mod game;
mod generator;
mod replenish;
mod rng;
mod selection;
mod validate;

pub use ponens_types::{self, Line, LineId, LineKind};

pub use analysis::{BoardAnalysis, Pair, analyze, distinct_matchable_keys};
pub use board::Board;
pub use dealer::Dealer;
pub use game::{
    Game, GameSettings, MatchError, Resolution, SelectOutcome, resolve_match, safe_board,
    start_board,
};
pub use generator::{
    CONJUNCTION_CUTOFF, DECOY_FACT_CUTOFF, DECOY_IMPLICATION_CUTOFF, IMPLICATION_CUTOFF, decoy,
    find_decoy, generate_expr,
};
pub use replenish::{
    GenerationExhausted, ReplenishBudget, ReplenishOutcome, Replenisher, ensure_minimum_pairs,
};
pub use rng::{Lcg, RandomSource, ScriptedRng};
pub use selection::{LatchTiming, MatchResult, Selection, is_valid_pair, select_line};
pub use validate::{
    StructuralError, ValidationMode, enforce_board, is_well_formed, normalize, safe_line,
};
