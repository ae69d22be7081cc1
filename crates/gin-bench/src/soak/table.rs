//! Ground truth for one deal, with a counter per seat fed only what that
//! seat is allowed to see.

use gin_bot::counter::{AuditError, CardCounter, CounterError};
use gin_core::model::card::{Card, NUM_CARDS};
use gin_core::model::card_set::CardSet;
use gin_core::model::deck::Deck;
use gin_core::model::player::Player;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    FaceUp,
    Blind,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("counter rejected the event: {0}")]
    Counter(#[from] CounterError),
    #[error("deck ran out before the face-up card was turned")]
    MissingFaceUp,
    #[error("{player} tried to draw from an empty draw pile")]
    EmptyStock { player: Player },
    #[error("{player} tried to take from an empty discard pile")]
    EmptyDiscardPile { player: Player },
    #[error("{player} does not hold {card}")]
    CardNotHeld { player: Player, card: Card },
}

/// A way a counter disagrees with what actually happened at the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroundTruthError {
    #[error("audit failed: {0}")]
    Audit(#[from] AuditError),
    #[error("counter hand {counted} differs from actual hand {actual}")]
    HandMismatch { counted: CardSet, actual: CardSet },
    #[error("counter discard pile has {counted} cards, table has {actual}")]
    DiscardPileMismatch { counted: usize, actual: usize },
    #[error("counter draw pile size {counted} differs from actual {actual}")]
    DrawPileMismatch { counted: usize, actual: usize },
    #[error("{card} is credited to the opponent but the opponent does not hold it")]
    OpponentCardNotHeld { card: Card },
    #[error("{card} has never been seen but is missing from the unseen set")]
    HiddenCardNotUnseen { card: Card },
    #[error("cards do not add up: {total} accounted for")]
    Conservation { total: usize },
    #[error("{view} lost {card} between events")]
    RejectsShrank { view: &'static str, card: Card },
}

pub struct Table {
    hands: [CardSet; 2],
    stock: Vec<Card>,
    discard_pile: Vec<Card>,
    counters: [CardCounter; 2],
}

impl Table {
    /// Deals `deck`, turns the face-up card and reports it to both seats.
    pub fn deal(deck: &Deck, counter_details: bool) -> Result<Self, TableError> {
        let (hands, face_up, stock) = deck.deal().into_parts();
        let face_up = face_up.ok_or(TableError::MissingFaceUp)?;
        let mut counters = Player::BOTH.map(|player| CardCounter::new(player, hands[player.index()]));
        for counter in &mut counters {
            if counter_details {
                counter.set_event_logging(true);
            }
            counter.report_first_face_up_card(face_up)?;
        }
        Ok(Self {
            hands,
            stock,
            discard_pile: vec![face_up],
            counters,
        })
    }

    pub fn hand(&self, player: Player) -> CardSet {
        self.hands[player.index()]
    }

    pub fn stock_len(&self) -> usize {
        self.stock.len()
    }

    pub fn counters(&self) -> &[CardCounter; 2] {
        &self.counters
    }

    /// Moves a card into `player`'s hand. Blind draws stay hidden from the
    /// other seat.
    pub fn draw(&mut self, player: Player, source: DrawSource) -> Result<Card, TableError> {
        let card = match source {
            DrawSource::FaceUp => self
                .discard_pile
                .pop()
                .ok_or(TableError::EmptyDiscardPile { player })?,
            DrawSource::Blind => self.stock.pop().ok_or(TableError::EmptyStock { player })?,
        };
        self.hands[player.index()].insert(card);
        for counter in &mut self.counters {
            let visible = source == DrawSource::FaceUp || counter.me() == player;
            counter.report_draw(player, visible.then_some(card))?;
        }
        Ok(card)
    }

    pub fn discard(&mut self, player: Player, card: Card) -> Result<(), TableError> {
        if !self.hands[player.index()].remove(card) {
            return Err(TableError::CardNotHeld { player, card });
        }
        self.discard_pile.push(card);
        for counter in &mut self.counters {
            counter.report_discard(player, card);
        }
        Ok(())
    }

    /// Compares the counter of `seat` with the table, and with the same
    /// counter as it was before the last event.
    pub fn verify(&self, seat: Player, previous: &CardCounter) -> Result<(), GroundTruthError> {
        let counter = &self.counters[seat.index()];
        counter.audit()?;

        let actual = self.hands[seat.index()];
        if counter.my_hand() != actual {
            return Err(GroundTruthError::HandMismatch {
                counted: counter.my_hand(),
                actual,
            });
        }
        if counter.discard_pile() != self.discard_pile.as_slice() {
            return Err(GroundTruthError::DiscardPileMismatch {
                counted: counter.discard_pile().len(),
                actual: self.discard_pile.len(),
            });
        }
        if counter.draw_pile_size() != self.stock.len() {
            return Err(GroundTruthError::DrawPileMismatch {
                counted: counter.draw_pile_size(),
                actual: self.stock.len(),
            });
        }

        let opponent_hand = self.hands[seat.opponent().index()];
        if let Some(card) = counter.op_known_hand().difference(opponent_hand).iter().next() {
            return Err(GroundTruthError::OpponentCardNotHeld { card });
        }
        let hidden = opponent_hand.difference(counter.op_known_hand());
        let never_seen = hidden.union(self.stock.iter().copied().collect());
        if let Some(card) = never_seen.difference(counter.unseen_cards()).iter().next() {
            return Err(GroundTruthError::HiddenCardNotUnseen { card });
        }

        let total = counter.my_hand().len()
            + counter.discard_pile().len()
            + counter.draw_pile_size()
            + opponent_hand.len();
        if total != NUM_CARDS {
            return Err(GroundTruthError::Conservation { total });
        }

        for (view, before, after) in [
            ("my rejects", previous.my_rejects(), counter.my_rejects()),
            ("opponent rejects", previous.op_rejects(), counter.op_rejects()),
        ] {
            if let Some(card) = before.difference(after).iter().next() {
                return Err(GroundTruthError::RejectsShrank { view, card });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawSource, GroundTruthError, Table, TableError};
    use gin_core::model::deck::Deck;
    use gin_core::model::player::Player;

    #[test]
    fn fresh_table_matches_both_counters() {
        let table = Table::deal(&Deck::shuffled_with_seed(5), false).unwrap();
        for seat in Player::BOTH {
            let previous = table.counters()[seat.index()].clone();
            assert_eq!(table.verify(seat, &previous), Ok(()));
        }
        assert_eq!(table.stock_len(), 31);
    }

    #[test]
    fn blind_draw_is_hidden_from_the_other_seat() {
        let mut table = Table::deal(&Deck::shuffled_with_seed(5), false).unwrap();
        let card = table.draw(Player::First, DrawSource::Blind).unwrap();
        let [first, second] = table.counters();
        assert!(first.my_hand().contains(card));
        assert!(second.unseen_cards().contains(card));
        assert!(second.op_known_hand().is_empty());
    }

    #[test]
    fn discarding_an_unheld_card_fails() {
        let mut table = Table::deal(&Deck::shuffled_with_seed(5), false).unwrap();
        let foreign = table.hand(Player::Second).iter().next().unwrap();
        let err = table.discard(Player::First, foreign).unwrap_err();
        assert!(matches!(err, TableError::CardNotHeld { .. }));
    }

    #[test]
    fn shrinking_rejects_are_reported() {
        let mut table = Table::deal(&Deck::shuffled_with_seed(9), false).unwrap();
        table.draw(Player::First, DrawSource::Blind).unwrap();
        let with_reject = table.counters()[0].clone();
        let fresh = Table::deal(&Deck::shuffled_with_seed(9), false).unwrap();
        let err = fresh.verify(Player::First, &with_reject).unwrap_err();
        assert!(matches!(err, GroundTruthError::RejectsShrank { view: "my rejects", .. }));
    }
}
