//! Atom symbols and the alphabet they are drawn from.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Glyphs that carry meaning in canonical keys, display text and legacy
/// `text` encodings.
const RESERVED: &[char] = &['∧', '→', '&', '(', ')'];

/// Symbols of the reference alphabet.
pub const REFERENCE_SYMBOLS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("atom symbol must not be empty")]
    Empty,
    #[error("atom symbol {0:?} contains a reserved glyph or whitespace")]
    Reserved(String),
}

/// A single proposition symbol.
///
/// Invariant: non-empty, no whitespace, none of the reserved glyphs
/// (`∧`, `→`, `&`, parentheses) and no ASCII arrow `->`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> Result<Self, SymbolError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SymbolError::Empty);
        }
        if value.chars().any(|c| c.is_whitespace() || RESERVED.contains(&c)) || value.contains("->")
        {
            return Err(SymbolError::Reserved(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = SymbolError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    #[error("alphabet must contain at least one symbol")]
    Empty,
    #[error("alphabet lists symbol {0} more than once")]
    Duplicate(String),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// The finite, ordered set of symbols atoms are drawn from.
///
/// Order matters: random picks index into it, so two alphabets with the same
/// symbols in a different order produce different boards from the same seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Alphabet(Vec<Symbol>);

impl Alphabet {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, AlphabetError> {
        if symbols.is_empty() {
            return Err(AlphabetError::Empty);
        }
        for (idx, symbol) in symbols.iter().enumerate() {
            if symbols[..idx].contains(symbol) {
                return Err(AlphabetError::Duplicate(symbol.to_string()));
            }
        }
        Ok(Self(symbols))
    }

    /// The seven-symbol alphabet `A`..`G`.
    #[must_use]
    pub fn reference() -> Self {
        Self(
            REFERENCE_SYMBOLS
                .iter()
                .map(|s| Symbol((*s).to_owned()))
                .collect(),
        )
    }

    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fallback pick when every symbol has been excluded.
    #[must_use]
    pub fn first(&self) -> &Symbol {
        &self.0[0]
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::reference()
    }
}

impl TryFrom<Vec<String>> for Alphabet {
    type Error = AlphabetError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        let symbols = value
            .into_iter()
            .map(Symbol::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(symbols)
    }
}

impl From<Alphabet> for Vec<String> {
    fn from(value: Alphabet) -> Self {
        value.0.into_iter().map(String::from).collect()
    }
}
