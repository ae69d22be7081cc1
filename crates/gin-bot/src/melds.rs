//! Thin helpers over [`gin_core::meld`] for agents deciding when to knock.

use gin_core::meld::{Meld, best_meld_sets};
use gin_core::model::card_set::CardSet;
use gin_core::model::deck::HAND_SIZE;

/// One of the minimal-deadwood meld groupings for `cards`, or none at all.
pub fn best_melds(cards: CardSet) -> Vec<Meld> {
    best_meld_sets(cards).into_iter().next().unwrap_or_default()
}

pub fn cards_in_melds(melds: &[Meld]) -> usize {
    melds.iter().map(Meld::len).sum()
}

/// True when the melds of `hand` account for a full hand of cards.
pub fn is_gin(hand: CardSet) -> bool {
    cards_in_melds(&best_melds(hand)) == HAND_SIZE
}
