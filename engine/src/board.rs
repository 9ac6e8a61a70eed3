//! The ordered collection of active lines.

use std::collections::HashSet;
use std::{mem, slice};

use serde::Serialize;

use ponens_types::{Line, LineId, LineKey};

use crate::analysis::analyze;

/// Active lines in display order. Matching needs no adjacency; order only
/// matters to the rendering collaborator.
///
/// Every line is structurally valid by construction. Boards from stored data
/// enter through [`crate::validate::enforce_board`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    lines: Vec<Line>,
}

impl Board {
    #[must_use]
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn iter(&self) -> slice::Iter<'_, Line> {
        self.lines.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &LineId) -> Option<&Line> {
        self.lines.iter().find(|line| line.id() == id)
    }

    #[must_use]
    pub fn position(&self, id: &LineId) -> Option<usize> {
        self.lines.iter().position(|line| line.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &LineId) -> bool {
        self.position(id).is_some()
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Swap the line at `index` for `line`, returning the old one.
    pub fn replace(&mut self, index: usize, line: Line) -> Line {
        mem::replace(&mut self.lines[index], line)
    }

    pub fn remove(&mut self, index: usize) -> Line {
        self.lines.remove(index)
    }

    /// Kind-prefixed keys of every line, for duplicate detection.
    #[must_use]
    pub fn line_keys(&self) -> HashSet<LineKey> {
        self.lines.iter().map(Line::line_key).collect()
    }

    /// At least one valid match exists.
    #[must_use]
    pub fn has_moves(&self) -> bool {
        analyze(self).pair_count() > 0
    }

    #[must_use]
    pub fn display_texts(&self) -> Vec<String> {
        self.lines.iter().map(Line::display_text).collect()
    }
}

impl From<Vec<Line>> for Board {
    fn from(lines: Vec<Line>) -> Self {
        Self::new(lines)
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = &'a Line;
    type IntoIter = slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ponens_types::{Expr, Symbol};

    fn atom(s: &str) -> Expr {
        Expr::atom(Symbol::new(s).unwrap())
    }

    fn id(s: &str) -> LineId {
        LineId::parse(s).unwrap()
    }

    #[test]
    fn lookup_by_id() {
        let board = Board::new(vec![
            Line::antecedent(id("i1"), atom("A")),
            Line::implication(id("i2"), atom("A"), atom("B")),
        ]);
        assert_eq!(board.position(&id("i2")), Some(1));
        assert!(board.get(&id("i9")).is_none());
        assert!(board.has_moves());
    }

    #[test]
    fn replace_keeps_slot() {
        let mut board = Board::new(vec![
            Line::antecedent(id("i1"), atom("A")),
            Line::antecedent(id("i2"), atom("B")),
        ]);
        let old = board.replace(0, Line::derived(id("i3"), atom("C")));
        assert_eq!(old.id(), &id("i1"));
        assert_eq!(board.display_texts(), vec!["C", "B"]);
        assert!(!board.has_moves());
    }

    #[test]
    fn line_keys_collapse_identical_content() {
        let board = Board::new(vec![
            Line::antecedent(id("i1"), atom("A")),
            Line::derived(id("i2"), atom("A")),
            Line::implication(id("i3"), atom("A"), atom("B")),
        ]);
        assert_eq!(board.line_keys().len(), 2);
    }
}
