use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::player::Player;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Cards dealt to each player at the start of a hand.
pub const HAND_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Deals alternately from the front of the deck, then turns the next card
    /// face up. The remaining cards form the draw pile, top last.
    pub fn deal(&self) -> Deal {
        let mut hands = [CardSet::EMPTY; 2];
        let mut cards = self.cards.iter().copied();
        for index in 0..HAND_SIZE * 2 {
            if let Some(card) = cards.next() {
                hands[index % 2].insert(card);
            }
        }
        let face_up = cards.next();
        let mut stock: Vec<Card> = cards.collect();
        stock.reverse();
        Deal {
            hands,
            face_up,
            stock,
        }
    }
}

/// The table immediately after dealing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    hands: [CardSet; 2],
    face_up: Option<Card>,
    stock: Vec<Card>,
}

impl Deal {
    pub fn hand(&self, player: Player) -> CardSet {
        self.hands[player.index()]
    }

    pub fn face_up(&self) -> Option<Card> {
        self.face_up
    }

    /// Face-down draw pile; the next card drawn is the last element.
    pub fn stock(&self) -> &[Card] {
        &self.stock
    }

    pub fn into_parts(self) -> ([CardSet; 2], Option<Card>, Vec<Card>) {
        (self.hands, self.face_up, self.stock)
    }
}
