//! Core domain types for Ponens.
//!
//! This crate contains pure domain types with no IO, no randomness, and
//! minimal dependencies: symbols, expressions, board lines, and difficulty
//! profiles. Generation and board maintenance live in `ponens-engine`.

#![allow(clippy::missing_errors_doc)]

mod expr;
mod ids;
mod line;
mod profile;
mod symbol;

pub use expr::{
    CONJUNCTION_GLYPH, Expr, ExprKey, ExprShapeError, IMPLICATION_GLYPH, RawExpr, RawNode,
};
pub use ids::{LineId, LineIdAllocator, LineIdError};
pub use line::{ExprRole, Line, LineContent, LineKey, LineKind, LineShapeError, RawLine};
pub use profile::{DifficultyProfile, MIN_PAIRS, Mode, ProfileError};
pub use symbol::{Alphabet, AlphabetError, REFERENCE_SYMBOLS, Symbol, SymbolError};
