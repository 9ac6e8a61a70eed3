//! The generation context: random stream, id allocator and alphabet.

use ponens_types::{Alphabet, Expr, Line, LineId, LineIdAllocator, Symbol};

use crate::rng::{Lcg, RandomSource};

/// Everything that mints new material for a board.
///
/// Threaded by `&mut` through every operation that needs randomness or new
/// line ids; there is no global generator.
#[derive(Debug, Clone)]
pub struct Dealer<R = Lcg> {
    rng: R,
    ids: LineIdAllocator,
    alphabet: Alphabet,
}

impl Dealer<Lcg> {
    #[must_use]
    pub fn seeded(seed: u32) -> Self {
        Self::new(Lcg::new(seed), Alphabet::reference())
    }
}

impl<R: RandomSource> Dealer<R> {
    #[must_use]
    pub fn new(rng: R, alphabet: Alphabet) -> Self {
        Self {
            rng,
            ids: LineIdAllocator::new(),
            alphabet,
        }
    }

    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[must_use]
    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn fraction(&mut self) -> f64 {
        self.rng.next_fraction()
    }

    /// Uniform pick among the alphabet symbols not in `exclude`.
    ///
    /// Falls back to the first symbol when everything is excluded.
    pub fn pick_symbol(&mut self, exclude: &[&Symbol]) -> Symbol {
        let choices: Vec<&Symbol> = self
            .alphabet
            .symbols()
            .iter()
            .filter(|s| !exclude.contains(s))
            .collect();
        if choices.is_empty() {
            tracing::warn!("pick_symbol: every symbol excluded, using fallback");
            return self.alphabet.first().clone();
        }
        let idx = self.rng.next_index(choices.len());
        choices[idx].clone()
    }

    pub fn atom(&mut self) -> Expr {
        Expr::atom(self.pick_symbol(&[]))
    }

    pub fn next_id(&mut self) -> LineId {
        self.ids.next_id()
    }

    pub fn antecedent(&mut self, expr: Expr) -> Line {
        Line::antecedent(self.next_id(), expr)
    }

    pub fn derived(&mut self, expr: Expr) -> Line {
        Line::derived(self.next_id(), expr)
    }

    pub fn implication(&mut self, left: Expr, right: Expr) -> Line {
        Line::implication(self.next_id(), left, right)
    }

    pub fn conjunction(&mut self, left: Expr, right: Expr) -> Line {
        Line::conjunction(self.next_id(), left, right)
    }

    /// Record an id that entered from outside so fresh ids never collide.
    pub fn observe(&mut self, id: &LineId) {
        self.ids.observe(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    #[test]
    fn pick_symbol_indexes_remaining_choices() {
        // 7 symbols: 0.5 → index 3 → "D"
        let mut dealer = Dealer::new(ScriptedRng::new([0.5]), Alphabet::reference());
        assert_eq!(dealer.pick_symbol(&[]).as_str(), "D");

        // Excluding A..C leaves D,E,F,G: 0.5 → index 2 → "F"
        let (a, b, c) = (sym("A"), sym("B"), sym("C"));
        assert_eq!(dealer.pick_symbol(&[&a, &b, &c]).as_str(), "F");
    }

    #[test]
    fn pick_symbol_falls_back_when_all_excluded() {
        let alphabet = Alphabet::try_from(vec!["P".to_owned()]).unwrap();
        let mut dealer = Dealer::new(ScriptedRng::new([0.9]), alphabet);
        let p = sym("P");
        assert_eq!(dealer.pick_symbol(&[&p]).as_str(), "P");
        assert_eq!(dealer.rng().draws(), 0);
    }

    #[test]
    fn lines_get_sequential_ids() {
        let mut dealer = Dealer::seeded(1);
        let a = dealer.atom();
        let first = dealer.antecedent(a.clone());
        let second = dealer.implication(a.clone(), a);
        assert_eq!(first.id().as_str(), "i1");
        assert_eq!(second.id().as_str(), "i2");
    }

    #[test]
    fn observed_ids_are_skipped() {
        let mut dealer = Dealer::seeded(1);
        dealer.observe(&LineId::parse("i7").unwrap());
        dealer.observe(&LineId::parse("t40").unwrap());
        assert_eq!(dealer.next_id().as_str(), "i8");
    }
}
