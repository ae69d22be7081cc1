use super::kind::{Meld, all_melds};
use crate::model::card_set::CardSet;

/// Total deadwood points of `cards` with nothing melded.
pub fn deadwood_points(cards: CardSet) -> u32 {
    cards
        .iter()
        .map(|card| u32::from(card.deadwood_points()))
        .sum()
}

/// Deadwood left in `cards` once every card of `melds` is set aside.
pub fn deadwood_after(cards: CardSet, melds: &[Meld]) -> u32 {
    let melded = melds
        .iter()
        .fold(CardSet::EMPTY, |acc, meld| acc.union(meld.cards()));
    deadwood_points(cards.difference(melded))
}

/// All maximal groupings of disjoint melds that leave the least deadwood.
///
/// A grouping is maximal when no further meld from `cards` fits beside it.
/// Returns an empty list when `cards` contain no meld at all.
pub fn best_meld_sets(cards: CardSet) -> Vec<Vec<Meld>> {
    let candidates = all_melds(cards);
    let mut search = Search {
        cards,
        candidates: &candidates,
        chosen: Vec::new(),
        best_deadwood: u32::MAX,
        best: Vec::new(),
    };
    for index in 0..candidates.len() {
        search.descend(index, CardSet::EMPTY);
    }
    search.best
}

struct Search<'a> {
    cards: CardSet,
    candidates: &'a [Meld],
    chosen: Vec<Meld>,
    best_deadwood: u32,
    best: Vec<Vec<Meld>>,
}

impl Search<'_> {
    // Indices only ever increase along a branch, so each grouping is visited once.
    fn descend(&mut self, index: usize, used: CardSet) {
        let meld = self.candidates[index];
        if !meld.cards().is_disjoint(used) {
            return;
        }
        let used = used.union(meld.cards());
        self.chosen.push(meld);

        let maximal = self
            .candidates
            .iter()
            .all(|other| !other.cards().is_disjoint(used));
        if maximal {
            self.record(used);
        } else {
            for next in index + 1..self.candidates.len() {
                self.descend(next, used);
            }
        }

        self.chosen.pop();
    }

    fn record(&mut self, used: CardSet) {
        let deadwood = deadwood_points(self.cards.difference(used));
        if deadwood < self.best_deadwood {
            self.best_deadwood = deadwood;
            self.best.clear();
        }
        if deadwood == self.best_deadwood {
            self.best.push(self.chosen.clone());
        }
    }
}
