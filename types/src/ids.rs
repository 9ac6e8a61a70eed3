use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const GENERATED_PREFIX: char = 'i';

/// Stable identity of a board line, used by collaborators to correlate
/// rendered rows with engine state.
///
/// Generated ids read `i<n>`. Ids ingested from stored boards keep whatever
/// non-empty text they carried (`t7`, `42`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line id must not be empty")]
pub struct LineIdError;

impl LineId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, LineIdError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LineIdError);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of a generated-style id (`i12` → 12).
    fn generated_seq(&self) -> Option<u64> {
        self.0.strip_prefix(GENERATED_PREFIX)?.parse().ok()
    }
}

impl TryFrom<String> for LineId {
    type Error = LineIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<LineId> for String {
    fn from(value: LineId) -> Self {
        value.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic id source owned by one game.
///
/// Replays from the same seed yield the same ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIdAllocator {
    next: u64,
}

impl LineIdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> LineId {
        let id = LineId(format!("{GENERATED_PREFIX}{}", self.next));
        self.next += 1;
        id
    }

    /// Advance past an id that entered the board from outside, so later
    /// generated ids cannot collide with it.
    pub fn observe(&mut self, id: &LineId) {
        if let Some(seq) = id.generated_seq() {
            self.next = self.next.max(seq.saturating_add(1));
        }
    }
}

impl Default for LineIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
