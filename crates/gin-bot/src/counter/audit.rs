use super::CardCounter;
use gin_core::model::card::Card;
use gin_core::model::card_set::CardSet;
use gin_core::model::deck::HAND_SIZE;
use thiserror::Error;

/// An invariant the counter's views failed to uphold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("discard pile holds {card} more than once")]
    DuplicateDiscard { card: Card },
    #[error("{card} is both in hand and on the discard pile")]
    HandOnDiscardPile { card: Card },
    #[error("{card} is in hand but still counted as unseen")]
    HandCardUnseen { card: Card },
    #[error("{card} has been face up but is still counted as unseen")]
    FaceUpCardUnseen { card: Card },
    #[error("{card} is marked known to the opponent but is not in hand")]
    KnownCardNotInHand { card: Card },
    #[error("{card} is credited to the opponent's hand but is visible elsewhere")]
    OpponentCardMisplaced { card: Card },
    #[error("hand holds {held} cards, more than {limit}")]
    HandOverflow { held: usize, limit: usize },
    #[error("draw pile claims {draw_pile} cards but only {unseen} are unseen")]
    DrawPileExceedsUnseen { draw_pile: usize, unseen: usize },
}

impl CardCounter {
    /// Checks the invariants that follow from the views alone, returning the
    /// first violation found.
    pub fn audit(&self) -> Result<(), AuditError> {
        let mut pile = CardSet::EMPTY;
        for &card in &self.discard_pile {
            if !pile.insert(card) {
                return Err(AuditError::DuplicateDiscard { card });
            }
        }

        if let Some(card) = first(self.my_hand.intersection(pile)) {
            return Err(AuditError::HandOnDiscardPile { card });
        }
        if let Some(card) = first(self.my_hand.intersection(self.unseen)) {
            return Err(AuditError::HandCardUnseen { card });
        }

        let face_up = pile.union(self.my_rejects).union(self.op_rejects);
        if let Some(card) = first(face_up.intersection(self.unseen)) {
            return Err(AuditError::FaceUpCardUnseen { card });
        }
        if let Some(card) = first(self.my_known_hand.difference(self.my_hand)) {
            return Err(AuditError::KnownCardNotInHand { card });
        }
        if let Some(card) = first(self.op_known_hand.intersection(self.my_hand.union(pile))) {
            return Err(AuditError::OpponentCardMisplaced { card });
        }

        let limit = HAND_SIZE + 1;
        if self.my_hand.len() > limit {
            return Err(AuditError::HandOverflow {
                held: self.my_hand.len(),
                limit,
            });
        }
        if self.draw_pile_size > self.unseen.len() {
            return Err(AuditError::DrawPileExceedsUnseen {
                draw_pile: self.draw_pile_size,
                unseen: self.unseen.len(),
            });
        }
        Ok(())
    }
}

fn first(set: CardSet) -> Option<Card> {
    set.iter().next()
}
