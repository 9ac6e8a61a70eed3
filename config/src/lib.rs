//! Configuration for Ponens.
//!
//! Read from `~/.ponens/config.toml`. Every section is optional:
//!
//! ```toml
//! [game]
//! mode = "hard"      # easy | medium | hard | custom
//! seed = 12345      # or "random"
//! strict = false
//! min_pairs = 2
//!
//! [custom]
//! n = 8
//! allow_conditional = true
//! max_depth_conj = 1
//! alphabet = ["A", "B", "C", "D", "E", "F", "G"]
//!
//! [budget]
//! pair_attempts = 100
//! padding_attempts = 50
//! decoy_tries = 60
//!
//! [timing]
//! lock_ms = 200
//! reject_ms = 180
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;
use toml::de;

use ponens_engine::{GameSettings, LatchTiming, Lcg, ReplenishBudget, ValidationMode};
use ponens_types::{Alphabet, AlphabetError, DifficultyProfile, MIN_PAIRS, Mode, ProfileError};

const CUSTOM_MODE: &str = "custom";
const RANDOM_SEED: &str = "random";
const DEFAULT_CUSTOM_SIZE: usize = 8;

#[derive(Debug, Default, Deserialize)]
pub struct PonensConfig {
    pub game: Option<GameConfig>,
    pub custom: Option<CustomConfig>,
    pub budget: Option<BudgetConfig>,
    pub timing: Option<TimingConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GameConfig {
    pub mode: Option<String>,
    pub seed: Option<SeedSetting>,
    #[serde(default)]
    pub strict: bool,
    pub min_pairs: Option<usize>,
}

/// Profile used when `game.mode = "custom"`. The alphabet applies to every
/// mode.
#[derive(Debug, Default, Deserialize)]
pub struct CustomConfig {
    pub n: Option<usize>,
    #[serde(default)]
    pub allow_conditional: bool,
    #[serde(default)]
    pub max_depth_conj: u8,
    pub alphabet: Option<Vec<String>>,
}

/// A fixed seed, or `"random"` for a fresh one on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSeed")]
pub enum SeedSetting {
    Fixed(u32),
    Random,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeed {
    Number(u32),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("seed must be a number or \"random\", got {0:?}")]
pub struct SeedError(String);

impl SeedSetting {
    /// The concrete seed. `Random` draws one and logs it so the run can be
    /// replayed.
    #[must_use]
    pub fn resolve(self) -> u32 {
        match self {
            Self::Fixed(seed) => seed,
            Self::Random => {
                let seed = Lcg::entropy_seed();
                tracing::info!(seed, "drew random seed");
                seed
            }
        }
    }
}

impl FromStr for SeedSetting {
    type Err = SeedError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(RANDOM_SEED) {
            return Ok(Self::Random);
        }
        trimmed
            .parse()
            .map(Self::Fixed)
            .map_err(|_| SeedError(trimmed.to_owned()))
    }
}

impl TryFrom<RawSeed> for SeedSetting {
    type Error = SeedError;

    fn try_from(raw: RawSeed) -> Result<Self, Self::Error> {
        match raw {
            RawSeed::Number(seed) => Ok(Self::Fixed(seed)),
            RawSeed::Text(text) => text.parse(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BudgetConfig {
    pub pair_attempts: Option<u32>,
    pub padding_attempts: Option<u32>,
    pub decoy_tries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimingConfig {
    pub lock_ms: Option<u64>,
    pub reject_ms: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: de::Error,
    },
    #[error("invalid difficulty profile: {0}")]
    Profile(#[from] ProfileError),
    #[error("invalid alphabet: {0}")]
    Alphabet(#[from] AlphabetError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Profile(_) | ConfigError::Alphabet(_) => None,
        }
    }
}

/// Values that take precedence over the file, usually from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub mode: Option<String>,
    pub seed: Option<SeedSetting>,
    pub strict: Option<bool>,
}

impl Overrides {
    pub const MODE_VAR: &'static str = "PONENS_MODE";
    pub const SEED_VAR: &'static str = "PONENS_SEED";
    pub const STRICT_VAR: &'static str = "PONENS_STRICT";

    /// `PONENS_MODE`, `PONENS_SEED` and `PONENS_STRICT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unparseable seeds and strict flags are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mode = lookup(Self::MODE_VAR).filter(|value| !value.trim().is_empty());
        let seed = lookup(Self::SEED_VAR).and_then(|raw| match raw.parse() {
            Ok(seed) => Some(seed),
            Err(err) => {
                tracing::warn!("Ignoring {}: {err}", Self::SEED_VAR);
                None
            }
        });
        let strict = lookup(Self::STRICT_VAR).and_then(|raw| parse_flag(&raw));
        Self { mode, seed, strict }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        other => {
            tracing::warn!("Ignoring unrecognized {}: {other}", Overrides::STRICT_VAR);
            None
        }
    }
}

impl PonensConfig {
    /// `Ok(None)` when there is no home directory or no config file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Effective mode name: override, then `[game] mode`.
    #[must_use]
    pub fn mode_name<'a>(&'a self, overrides: &'a Overrides) -> Option<&'a str> {
        overrides
            .mode
            .as_deref()
            .or_else(|| self.game.as_ref()?.mode.as_deref())
            .map(str::trim)
    }

    /// Merge file values, overrides and defaults into game settings.
    ///
    /// Unknown mode names fall back to easy with a warning. An invalid custom
    /// profile or alphabet is an error.
    pub fn resolve(&self, overrides: &Overrides) -> Result<GameSettings, ConfigError> {
        let defaults = GameSettings::default();
        let game = self.game.as_ref();

        let profile = match self.mode_name(overrides) {
            None => defaults.profile,
            Some(name) if name.eq_ignore_ascii_case(CUSTOM_MODE) => self.custom_profile()?,
            Some(name) => Mode::parse(name)
                .unwrap_or_else(|| {
                    tracing::warn!("Unknown game mode: {}", name);
                    Mode::default()
                })
                .profile(),
        };

        let min_pairs = game.and_then(|g| g.min_pairs).unwrap_or(MIN_PAIRS);
        DifficultyProfile::check_capacity(profile.target_size(), min_pairs)?;

        let alphabet = match self.custom.as_ref().and_then(|c| c.alphabet.clone()) {
            Some(symbols) => Alphabet::try_from(symbols)?,
            None => defaults.alphabet,
        };

        let strict = overrides
            .strict
            .unwrap_or_else(|| game.is_some_and(|g| g.strict));

        Ok(GameSettings {
            profile,
            min_pairs,
            budget: self.budget(),
            timing: self.timing(),
            validation: ValidationMode::from_strict(strict),
            alphabet,
            seed: overrides
                .seed
                .or_else(|| game?.seed)
                .map_or(Lcg::DEFAULT_SEED, SeedSetting::resolve),
        })
    }

    fn custom_profile(&self) -> Result<DifficultyProfile, ProfileError> {
        let custom = self.custom.as_ref();
        DifficultyProfile::new(
            custom.and_then(|c| c.n).unwrap_or(DEFAULT_CUSTOM_SIZE),
            custom.is_some_and(|c| c.allow_conditional),
            custom.map_or(0, |c| c.max_depth_conj),
        )
    }

    fn budget(&self) -> ReplenishBudget {
        let defaults = ReplenishBudget::default();
        let Some(budget) = self.budget.as_ref() else {
            return defaults;
        };
        ReplenishBudget {
            pair_attempts: budget.pair_attempts.unwrap_or(defaults.pair_attempts),
            padding_attempts: budget.padding_attempts.unwrap_or(defaults.padding_attempts),
            decoy_tries: budget.decoy_tries.unwrap_or(defaults.decoy_tries),
        }
    }

    fn timing(&self) -> LatchTiming {
        let defaults = LatchTiming::default();
        let Some(timing) = self.timing.as_ref() else {
            return defaults;
        };
        LatchTiming {
            lock: timing.lock_ms.map_or(defaults.lock, Duration::from_millis),
            reject: timing.reject_ms.map_or(defaults.reject, Duration::from_millis),
        }
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ponens").join("config.toml"))
}
