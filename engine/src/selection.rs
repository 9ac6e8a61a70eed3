//! Match selection: the `idle → one-selected → locked → idle` latch.
//!
//! Time is an input. Callers pass `now` on every call, so the state machine
//! is deterministic and needs no timers or threads.

use std::time::{Duration, Instant};

use ponens_types::{Line, LineId};

use crate::board::Board;

/// Result of feeding one selection into the latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Nothing happened: deselection, unknown line, or latch held.
    None,
    /// First line selected, waiting for a partner.
    Pending,
    Valid,
    Invalid,
}

/// How long the latch holds after a second selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatchTiming {
    /// Further selections are ignored for this long after any pair.
    pub lock: Duration,
    /// An invalid pair stays selected for this long.
    pub reject: Duration,
}

impl LatchTiming {
    pub const DEFAULT_LOCK: Duration = Duration::from_millis(200);
    pub const DEFAULT_REJECT: Duration = Duration::from_millis(180);

    #[must_use]
    pub const fn from_millis(lock_ms: u64, reject_ms: u64) -> Self {
        Self {
            lock: Duration::from_millis(lock_ms),
            reject: Duration::from_millis(reject_ms),
        }
    }
}

impl Default for LatchTiming {
    fn default() -> Self {
        Self {
            lock: Self::DEFAULT_LOCK,
            reject: Self::DEFAULT_REJECT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    OneSelected(LineId),
    Locked {
        first: LineId,
        second: LineId,
        verdict: MatchResult,
        locked_until: Instant,
        clear_at: Instant,
    },
}

impl Selection {
    /// Release the latch once its hold has elapsed.
    #[must_use]
    pub fn settle(self, now: Instant) -> Self {
        match self {
            Self::Locked { locked_until, .. } if now >= locked_until => Self::Idle,
            other => other,
        }
    }

    #[must_use]
    pub fn is_locked(&self, now: Instant) -> bool {
        matches!(self, Self::Locked { locked_until, .. } if now < *locked_until)
    }

    /// Lines to highlight at `now`. A valid pair is retired immediately, so
    /// only an invalid pair stays visible, and only until `clear_at`.
    #[must_use]
    pub fn selected_ids(&self, now: Instant) -> Vec<&LineId> {
        match self {
            Self::Idle => Vec::new(),
            Self::OneSelected(id) => vec![id],
            Self::Locked {
                first,
                second,
                verdict: MatchResult::Invalid,
                clear_at,
                ..
            } if now < *clear_at => vec![first, second],
            Self::Locked { .. } => Vec::new(),
        }
    }
}

/// Exactly one line is an implication, the other a fact, and the fact's
/// expression equals the implication's condition. Symmetric.
#[must_use]
pub fn is_valid_pair(a: &Line, b: &Line) -> bool {
    fn completes(fact: &Line, implication: &Line) -> bool {
        match (fact.fact(), implication.implication_parts()) {
            (Some(expr), Some((left, _))) => expr == left,
            _ => false,
        }
    }
    completes(a, b) || completes(b, a)
}

/// Feed one selection into the latch.
///
/// Selecting the already-selected line deselects it. Ids not on the board
/// and selections while the latch holds yield [`MatchResult::None`] with the
/// state unchanged.
#[must_use]
pub fn select_line(
    board: &Board,
    current: &Selection,
    id: &LineId,
    now: Instant,
    timing: LatchTiming,
) -> (Selection, MatchResult) {
    let state = current.clone().settle(now);
    if matches!(state, Selection::Locked { .. }) || !board.contains(id) {
        return (state, MatchResult::None);
    }
    match state {
        Selection::OneSelected(first) if first == *id => (Selection::Idle, MatchResult::None),
        Selection::OneSelected(first) => {
            let valid = board
                .get(&first)
                .zip(board.get(id))
                .is_some_and(|(a, b)| is_valid_pair(a, b));
            let verdict = if valid {
                MatchResult::Valid
            } else {
                MatchResult::Invalid
            };
            let clear_at = if valid { now } else { now + timing.reject };
            let next = Selection::Locked {
                first,
                second: id.clone(),
                verdict,
                locked_until: now + timing.lock,
                clear_at,
            };
            (next, verdict)
        }
        Selection::Idle | Selection::Locked { .. } => {
            (Selection::OneSelected(id.clone()), MatchResult::Pending)
        }
    }
}
