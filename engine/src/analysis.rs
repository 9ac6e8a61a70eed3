//! Board analysis: which propositions can currently be matched.
//!
//! A key is *matchable* when some fact line carries it as its expression and
//! some implication line carries it as its left side. Counting is per key,
//! not per line: three facts `A` and two implications `A → _` still make one
//! matchable key.

use std::collections::{BTreeSet, HashMap};

use ponens_types::{ExprKey, Line, LineContent};

use crate::board::Board;

/// One-pass index of a board's facts and implications by key.
#[derive(Debug, Clone, Default)]
pub struct BoardAnalysis<'a> {
    facts_by_key: HashMap<ExprKey, Vec<&'a Line>>,
    implications_by_key: HashMap<ExprKey, Vec<&'a Line>>,
    matchable: BTreeSet<ExprKey>,
}

/// A matchable key with the first fact and first implication carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair<'a> {
    pub key: ExprKey,
    pub fact: &'a Line,
    pub implication: &'a Line,
}

#[must_use]
pub fn analyze(board: &Board) -> BoardAnalysis<'_> {
    let mut analysis = BoardAnalysis::default();
    for line in board {
        match line.content() {
            LineContent::Antecedent(expr) | LineContent::Derived(expr) => {
                let key = expr.key();
                if analysis.implications_by_key.contains_key(&key) {
                    analysis.matchable.insert(key.clone());
                }
                analysis.facts_by_key.entry(key).or_default().push(line);
            }
            LineContent::Implication { left, .. } => {
                let key = left.key();
                if analysis.facts_by_key.contains_key(&key) {
                    analysis.matchable.insert(key.clone());
                }
                analysis.implications_by_key.entry(key).or_default().push(line);
            }
            LineContent::Conjunction { .. } => {}
        }
    }
    analysis
}

#[must_use]
pub fn distinct_matchable_keys(board: &Board) -> BTreeSet<ExprKey> {
    analyze(board).matchable
}

impl<'a> BoardAnalysis<'a> {
    #[must_use]
    pub fn matchable_keys(&self) -> &BTreeSet<ExprKey> {
        &self.matchable
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.matchable.len()
    }

    #[must_use]
    pub fn is_matchable(&self, key: &ExprKey) -> bool {
        self.matchable.contains(key)
    }

    #[must_use]
    pub fn has_fact(&self, key: &ExprKey) -> bool {
        self.facts_by_key.contains_key(key)
    }

    #[must_use]
    pub fn has_implication(&self, key: &ExprKey) -> bool {
        self.implications_by_key.contains_key(key)
    }

    #[must_use]
    pub fn facts_for(&self, key: &ExprKey) -> &[&'a Line] {
        self.facts_by_key.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn implications_for(&self, key: &ExprKey) -> &[&'a Line] {
        self.implications_by_key.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn facts_by_key(&self) -> &HashMap<ExprKey, Vec<&'a Line>> {
        &self.facts_by_key
    }

    #[must_use]
    pub fn implications_by_key(&self) -> &HashMap<ExprKey, Vec<&'a Line>> {
        &self.implications_by_key
    }

    /// Whether adding `line` would create a new matchable key.
    #[must_use]
    pub fn gains_pair(&self, line: &Line) -> bool {
        match line.content() {
            LineContent::Antecedent(expr) | LineContent::Derived(expr) => {
                let key = expr.key();
                self.has_implication(&key) && !self.is_matchable(&key)
            }
            LineContent::Implication { left, .. } => {
                let key = left.key();
                self.has_fact(&key) && !self.is_matchable(&key)
            }
            LineContent::Conjunction { .. } => false,
        }
    }

    /// Whether `line` takes part in some matchable key.
    #[must_use]
    pub fn participates(&self, line: &Line) -> bool {
        line.match_key().is_some_and(|key| self.is_matchable(&key))
    }

    /// One representative pair per matchable key, in key order.
    #[must_use]
    pub fn pairs(&self) -> Vec<Pair<'a>> {
        self.matchable
            .iter()
            .filter_map(|key| {
                let fact = *self.facts_for(key).first()?;
                let implication = *self.implications_for(key).first()?;
                Some(Pair {
                    key: key.clone(),
                    fact,
                    implication,
                })
            })
            .collect()
    }
}
