use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cards in the universe.
pub const NUM_CARDS: usize = 52;

const RANKS_PER_SUIT: usize = 13;

const ALL_CARDS: [Card; NUM_CARDS] = build_universe();

const fn build_universe() -> [Card; NUM_CARDS] {
    let mut cards = [Card::new(Rank::Ace, Suit::Clubs); NUM_CARDS];
    let mut id = 0;
    while id < NUM_CARDS {
        cards[id] = Card::new(Rank::ORDERED[id % RANKS_PER_SUIT], Suit::ALL[id / RANKS_PER_SUIT]);
        id += 1;
    }
    cards
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Every card of the universe, ordered by id.
    pub fn all() -> &'static [Card; NUM_CARDS] {
        &ALL_CARDS
    }

    /// Stable id in `0..NUM_CARDS`, suit-major.
    pub const fn to_id(self) -> u8 {
        (self.suit.index() * RANKS_PER_SUIT + self.rank.index()) as u8
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        if (id as usize) < NUM_CARDS {
            Some(ALL_CARDS[id as usize])
        } else {
            None
        }
    }

    pub const fn deadwood_points(self) -> u8 {
        self.rank.deadwood_points()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("card text {0:?} must be exactly two characters")]
    Length(String),
    #[error("unknown rank symbol {0:?}")]
    Rank(char),
    #[error("unknown suit symbol {0:?}")]
    Suit(char),
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut chars = text.trim().chars();
        let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(CardParseError::Length(text.to_string()));
        };
        let rank = Rank::from_symbol(rank).ok_or(CardParseError::Rank(rank))?;
        let suit = Suit::from_symbol(suit).ok_or(CardParseError::Suit(suit))?;
        Ok(Card::new(rank, suit))
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, CardParseError, NUM_CARDS, Rank, Suit};
    use std::collections::HashSet;

    #[test]
    fn ids_roundtrip_across_universe() {
        for (id, card) in Card::all().iter().enumerate() {
            assert_eq!(card.to_id() as usize, id);
            assert_eq!(Card::from_id(id as u8), Some(*card));
        }
        assert_eq!(Card::from_id(NUM_CARDS as u8), None);
    }

    #[test]
    fn universe_is_unique() {
        let unique: HashSet<Card> = Card::all().iter().copied().collect();
        assert_eq!(unique.len(), NUM_CARDS);
    }

    #[test]
    fn display_and_parse_agree() {
        let card = Card::new(Rank::Ten, Suit::Diamonds);
        assert_eq!(card.to_string(), "TD");
        assert_eq!("td".parse::<Card>(), Ok(card));
        assert_eq!("AC".parse::<Card>(), Ok(Card::new(Rank::Ace, Suit::Clubs)));
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert!(matches!("10H".parse::<Card>(), Err(CardParseError::Length(_))));
        assert_eq!("ZH".parse::<Card>(), Err(CardParseError::Rank('Z')));
        assert_eq!("AX".parse::<Card>(), Err(CardParseError::Suit('X')));
    }

    #[test]
    fn serializes_as_text() {
        let card = Card::new(Rank::Queen, Suit::Spades);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"QS\"");
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }
}
