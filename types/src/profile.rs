//! Difficulty profiles.
//!
//! Raw deserialization structs stay private; the public type is only
//! constructible through validation, so holding a `DifficultyProfile` proves
//! its target size can host the minimum number of pairs.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Matchable keys the board must offer after every move.
pub const MIN_PAIRS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("target size {size} cannot hold {pairs} pairs (needs at least {needed} lines)")]
    TooSmall {
        size: usize,
        pairs: usize,
        needed: usize,
    },
}

#[derive(Deserialize)]
struct RawProfile {
    n: usize,
    #[serde(default)]
    allow_conditional: bool,
    #[serde(default)]
    max_depth_conj: u8,
}

/// Generation settings for one game.
///
/// - `target_size` (`N`): lines on the board after every move.
/// - `allow_conditional`: the generator may produce implication-valued
///   expressions.
/// - `max_depth_conj`: 0 disables conjunction generation; any positive value
///   enables one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct DifficultyProfile {
    target_size: usize,
    allow_conditional: bool,
    max_depth_conj: u8,
}

impl DifficultyProfile {
    pub fn new(
        target_size: usize,
        allow_conditional: bool,
        max_depth_conj: u8,
    ) -> Result<Self, ProfileError> {
        Self::check_capacity(target_size, MIN_PAIRS)?;
        Ok(Self {
            target_size,
            allow_conditional,
            max_depth_conj,
        })
    }

    /// Each distinct pair needs one fact and one implication line.
    pub fn check_capacity(target_size: usize, pairs: usize) -> Result<(), ProfileError> {
        let needed = pairs.saturating_mul(2);
        if target_size < needed {
            return Err(ProfileError::TooSmall {
                size: target_size,
                pairs,
                needed,
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn target_size(&self) -> usize {
        self.target_size
    }

    #[must_use]
    pub const fn allow_conditional(&self) -> bool {
        self.allow_conditional
    }

    #[must_use]
    pub const fn max_depth_conj(&self) -> u8 {
        self.max_depth_conj
    }

    #[must_use]
    pub const fn conjunctions_enabled(&self) -> bool {
        self.max_depth_conj > 0
    }

    /// Neither implications nor conjunctions may be generated.
    #[must_use]
    pub const fn atoms_only(&self) -> bool {
        !self.allow_conditional && !self.conjunctions_enabled()
    }
}

impl TryFrom<RawProfile> for DifficultyProfile {
    type Error = ProfileError;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        Self::new(raw.n, raw.allow_conditional, raw.max_depth_conj)
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Mode::default().profile()
    }
}

/// Built-in difficulty presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Easy, Mode::Medium, Mode::Hard];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Easy => "easy",
            Mode::Medium => "medium",
            Mode::Hard => "hard",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Mode::Easy),
            "medium" => Some(Mode::Medium),
            "hard" => Some(Mode::Hard),
            _ => None,
        }
    }

    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        let (allow_conditional, max_depth_conj) = match self {
            Mode::Easy => (false, 0),
            Mode::Medium => (false, 2),
            Mode::Hard => (true, 2),
        };
        DifficultyProfile {
            target_size: 8,
            allow_conditional,
            max_depth_conj,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_reference_modes() {
        let easy = Mode::Easy.profile();
        assert_eq!(easy.target_size(), 8);
        assert!(easy.atoms_only());

        let medium = Mode::Medium.profile();
        assert!(!medium.allow_conditional());
        assert!(medium.conjunctions_enabled());

        let hard = Mode::Hard.profile();
        assert!(hard.allow_conditional());
        assert_eq!(hard.max_depth_conj(), 2);
    }

    #[test]
    fn profile_rejects_sizes_below_pair_capacity() {
        assert_eq!(
            DifficultyProfile::new(3, true, 1),
            Err(ProfileError::TooSmall {
                size: 3,
                pairs: 2,
                needed: 4
            })
        );
        assert!(DifficultyProfile::new(4, false, 0).is_ok());
    }

    #[test]
    fn profile_deserializes_with_defaults() {
        let profile: DifficultyProfile = serde_json::from_str(r#"{"n": 6}"#).unwrap();
        assert_eq!(profile.target_size(), 6);
        assert!(profile.atoms_only());
        assert!(serde_json::from_str::<DifficultyProfile>(r#"{"n": 1}"#).is_err());
    }

    #[test]
    fn mode_parse_is_case_insensitive() {
        assert_eq!(Mode::parse(" Hard "), Some(Mode::Hard));
        assert_eq!(Mode::parse("nightmare"), None);
    }
}
