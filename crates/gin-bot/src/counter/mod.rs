//! Card counting over the public event stream of a two-player deal.
//!
//! This module is composed of:
//! - `audit`: consistency checks the counter can run against its own views.
//! - `snapshot`: serializable capture of every view for logs and fixtures.

mod audit;
mod snapshot;

pub use audit::AuditError;
pub use snapshot::CounterSnapshot;

use core::fmt;
use gin_core::model::card::{Card, NUM_CARDS};
use gin_core::model::card_set::CardSet;
use gin_core::model::deck::HAND_SIZE;
use gin_core::model::player::Player;
use thiserror::Error;
use tracing::{Level, event};

/// Cards left face down once both hands are dealt.
pub const INITIAL_DRAW_PILE: usize = NUM_CARDS - 2 * HAND_SIZE;

/// Protocol misuse by the caller feeding events to a [`CardCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("{card} is not the first face-up card: the discard pile already holds {pile_len}")]
    FirstFaceUpAlreadyReported { card: Card, pile_len: usize },
    #[error("{player} drew a card without revealing it to its own counter")]
    HiddenOwnDraw { player: Player },
}

/// Tracks where every card of the deck can be, from one player's point of view.
///
/// State changes only through [`reset`](Self::reset) and the three `report_*`
/// operations. Each accessor hands out a copy or a shared slice, so callers
/// can never reach the views mutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCounter {
    me: Player,
    opponent: Player,
    my_hand: CardSet,
    // Cards in my hand the opponent watched me take from the discard pile.
    my_known_hand: CardSet,
    my_rejects: CardSet,
    op_known_hand: CardSet,
    op_rejects: CardSet,
    discard_pile: Vec<Card>,
    draw_pile_size: usize,
    unseen: CardSet,
    details: bool,
}

impl CardCounter {
    /// Creates a counter already reset for a fresh deal.
    pub fn new(me: Player, hand: CardSet) -> Self {
        let mut counter = Self {
            me,
            opponent: me.opponent(),
            my_hand: CardSet::EMPTY,
            my_known_hand: CardSet::EMPTY,
            my_rejects: CardSet::EMPTY,
            op_known_hand: CardSet::EMPTY,
            op_rejects: CardSet::EMPTY,
            discard_pile: Vec::with_capacity(NUM_CARDS),
            draw_pile_size: INITIAL_DRAW_PILE,
            unseen: CardSet::FULL,
            details: counter_logging_enabled(),
        };
        counter.reset(me, hand);
        counter
    }

    /// Discards everything learned so far and starts a new deal holding `hand`.
    pub fn reset(&mut self, me: Player, hand: CardSet) {
        if hand.len() != HAND_SIZE {
            tracing::warn!(
                target: "gin_bot::counter",
                player = %me,
                held = hand.len(),
                expected = HAND_SIZE,
                message = "reset with an unexpected hand size"
            );
        }
        self.me = me;
        self.opponent = me.opponent();
        self.my_hand = hand;
        self.my_known_hand = CardSet::EMPTY;
        self.my_rejects = CardSet::EMPTY;
        self.op_known_hand = CardSet::EMPTY;
        self.op_rejects = CardSet::EMPTY;
        self.discard_pile.clear();
        self.draw_pile_size = INITIAL_DRAW_PILE;
        self.unseen = hand.complement();
        self.log_event("reset", me, None);
    }

    /// Records the card turned up from the draw pile to start the discard pile.
    pub fn report_first_face_up_card(&mut self, card: Card) -> Result<(), CounterError> {
        if !self.discard_pile.is_empty() {
            return Err(CounterError::FirstFaceUpAlreadyReported {
                card,
                pile_len: self.discard_pile.len(),
            });
        }
        self.take_from_draw_pile(self.me);
        self.discard_pile.push(card);
        self.unseen.remove(card);
        self.log_event("first_face_up", self.me, Some(card));
        Ok(())
    }

    /// Records a draw by `player`. `drawn` is `None` when the opponent drew
    /// blind and the card stayed hidden; a draw by this counter's own player
    /// must always name the card.
    pub fn report_draw(&mut self, player: Player, drawn: Option<Card>) -> Result<(), CounterError> {
        if self.is_me(player) && drawn.is_none() {
            return Err(CounterError::HiddenOwnDraw { player });
        }

        if let Some(card) = drawn {
            self.unseen.remove(card);
        }

        let from_discard = drawn.is_some() && drawn == self.top_of_discard();
        if from_discard {
            self.discard_pile.pop();
        } else {
            self.take_from_draw_pile(player);
            if let Some(passed_over) = self.top_of_discard() {
                self.rejects_mut(player).insert(passed_over);
            }
        }

        match drawn {
            Some(card) if self.is_me(player) => {
                self.my_hand.insert(card);
                if from_discard {
                    self.my_known_hand.insert(card);
                }
            }
            Some(card) => {
                self.op_known_hand.insert(card);
            }
            None => {}
        }

        self.log_event(if from_discard { "draw_face_up" } else { "draw_blind" }, player, drawn);
        Ok(())
    }

    /// Records `card` going face up onto the discard pile from `player`'s hand.
    pub fn report_discard(&mut self, player: Player, card: Card) {
        self.discard_pile.push(card);
        if self.is_me(player) {
            if !self.my_hand.remove(card) {
                tracing::warn!(
                    target: "gin_bot::counter",
                    player = %player,
                    card = %card,
                    message = "discarded card was not in hand"
                );
            }
            self.my_known_hand.remove(card);
            self.my_rejects.insert(card);
        } else {
            self.op_known_hand.remove(card);
            self.op_rejects.insert(card);
            self.unseen.remove(card);
        }
        self.log_event("discard", player, Some(card));
    }

    pub fn me(&self) -> Player {
        self.me
    }

    pub fn opponent(&self) -> Player {
        self.opponent
    }

    pub fn my_hand(&self) -> CardSet {
        self.my_hand
    }

    pub fn my_known_hand(&self) -> CardSet {
        self.my_known_hand
    }

    pub fn my_rejects(&self) -> CardSet {
        self.my_rejects
    }

    pub fn op_known_hand(&self) -> CardSet {
        self.op_known_hand
    }

    pub fn op_rejects(&self) -> CardSet {
        self.op_rejects
    }

    /// Discard pile from bottom to top.
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn top_of_discard(&self) -> Option<Card> {
        self.discard_pile.last().copied()
    }

    pub fn draw_pile_size(&self) -> usize {
        self.draw_pile_size
    }

    /// Cards whose location this player cannot pin down.
    pub fn unseen_cards(&self) -> CardSet {
        self.unseen
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot::capture(self)
    }

    /// Forces per-event logging at INFO instead of TRACE.
    pub fn set_event_logging(&mut self, enabled: bool) {
        self.details = enabled;
    }

    pub fn event_logging(&self) -> bool {
        self.details
    }

    fn is_me(&self, player: Player) -> bool {
        self.me == player
    }

    fn rejects_mut(&mut self, player: Player) -> &mut CardSet {
        if self.is_me(player) {
            &mut self.my_rejects
        } else {
            &mut self.op_rejects
        }
    }

    fn take_from_draw_pile(&mut self, player: Player) {
        match self.draw_pile_size.checked_sub(1) {
            Some(remaining) => self.draw_pile_size = remaining,
            None => tracing::warn!(
                target: "gin_bot::counter",
                player = %player,
                message = "draw reported against an empty draw pile"
            ),
        }
    }

    fn log_event(&self, kind: &'static str, player: Player, card: Option<Card>) {
        if self.details {
            if !tracing::enabled!(target: "gin_bot::counter", Level::INFO) {
                return;
            }
            event!(
                target: "gin_bot::counter",
                Level::INFO,
                kind,
                me = %self.me,
                player = %player,
                card = %card_label(card),
                hand = self.my_hand.len(),
                discard_pile = self.discard_pile.len(),
                draw_pile = self.draw_pile_size,
                unseen = self.unseen.len()
            );
        } else if tracing::enabled!(target: "gin_bot::counter", Level::TRACE) {
            event!(
                target: "gin_bot::counter",
                Level::TRACE,
                kind,
                me = %self.me,
                player = %player,
                card = %card_label(card),
                draw_pile = self.draw_pile_size,
                unseen = self.unseen.len()
            );
        }
    }
}

/// Text form of a logged card; hidden draws show as `-`.
fn card_label(card: Option<Card>) -> String {
    card.map_or_else(|| "-".to_string(), |card| card.to_string())
}

impl fmt::Display for CardCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CardCounter ({} vs {})", self.me, self.opponent)?;
        writeln!(f, "  my hand:        {}", self.my_hand)?;
        writeln!(f, "  my known hand:  {}", self.my_known_hand)?;
        writeln!(f, "  my rejects:     {}", self.my_rejects)?;
        writeln!(f, "  op known hand:  {}", self.op_known_hand)?;
        writeln!(f, "  op rejects:     {}", self.op_rejects)?;
        let pile: Vec<String> = self.discard_pile.iter().map(Card::to_string).collect();
        writeln!(f, "  discard pile:   [{}]", pile.join(", "))?;
        writeln!(f, "  draw pile size: {}", self.draw_pile_size)?;
        write!(f, "  unseen:         {}", self.unseen)
    }
}

fn counter_logging_enabled() -> bool {
    std::env::var("GIN_COUNTER_DETAILS")
        .map(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{CardCounter, CounterError, INITIAL_DRAW_PILE, card_label};
    use gin_core::model::card::Card;
    use gin_core::model::card_set::CardSet;
    use gin_core::model::player::Player;
    use std::sync::Mutex;

    static COUNTER_ENV_GUARD: Mutex<()> = Mutex::new(());

    fn card(text: &str) -> Card {
        text.parse().expect("valid card")
    }

    fn hand() -> CardSet {
        ["AC", "2C", "3C", "7H", "8H", "9S", "TS", "JD", "QD", "KD"]
            .iter()
            .map(|t| card(t))
            .collect()
    }

    #[test]
    fn reset_seeds_unseen_with_everything_but_my_hand() {
        let counter = CardCounter::new(Player::First, hand());
        assert_eq!(counter.opponent(), Player::Second);
        assert_eq!(counter.draw_pile_size(), INITIAL_DRAW_PILE);
        assert_eq!(counter.unseen_cards().len(), 42);
        assert!(counter.unseen_cards().is_disjoint(hand()));
        assert!(counter.discard_pile().is_empty());
    }

    #[test]
    fn second_face_up_card_is_rejected_without_side_effects() {
        let mut counter = CardCounter::new(Player::First, hand());
        counter.report_first_face_up_card(card("5D")).unwrap();
        let before = counter.clone();
        let err = counter.report_first_face_up_card(card("6D")).unwrap_err();
        assert_eq!(
            err,
            CounterError::FirstFaceUpAlreadyReported {
                card: card("6D"),
                pile_len: 1
            }
        );
        assert_eq!(counter, before);
    }

    #[test]
    fn hidden_own_draw_is_rejected_without_side_effects() {
        let mut counter = CardCounter::new(Player::Second, hand());
        counter.report_first_face_up_card(card("5D")).unwrap();
        let before = counter.clone();
        let err = counter.report_draw(Player::Second, None).unwrap_err();
        assert_eq!(err, CounterError::HiddenOwnDraw { player: Player::Second });
        assert_eq!(counter, before);
    }

    #[test]
    fn taking_the_face_up_card_marks_it_known_to_opponent() {
        let mut counter = CardCounter::new(Player::First, hand());
        counter.report_first_face_up_card(card("5D")).unwrap();
        counter.report_draw(Player::First, Some(card("5D"))).unwrap();
        assert!(counter.my_known_hand().contains(card("5D")));
        assert!(counter.my_rejects().is_empty());

        counter.report_discard(Player::First, card("5D"));
        assert!(counter.my_known_hand().is_empty());
        assert!(counter.my_rejects().contains(card("5D")));
    }

    #[test]
    fn draw_pile_size_saturates_at_zero() {
        let mut counter = CardCounter::new(Player::First, hand());
        for _ in 0..INITIAL_DRAW_PILE + 3 {
            counter.report_draw(Player::Second, None).unwrap();
        }
        assert_eq!(counter.draw_pile_size(), 0);
        assert!(counter.op_rejects().is_empty());
        assert!(counter.my_rejects().is_empty());
    }

    #[test]
    fn logged_card_label_marks_hidden_draws() {
        assert_eq!(card_label(Some(card("TD"))), "TD");
        assert_eq!(card_label(None), "-");
    }

    #[test]
    fn display_lists_every_view() {
        let mut counter = CardCounter::new(Player::First, hand());
        counter.report_first_face_up_card(card("5D")).unwrap();
        let text = counter.to_string();
        assert!(text.starts_with("CardCounter (player 0 vs player 1)"));
        assert!(text.contains("discard pile:   [5D]"));
        assert!(text.contains("draw pile size: 31"));
    }

    #[test]
    fn event_logging_follows_env_flag() {
        let _guard = COUNTER_ENV_GUARD.lock().unwrap();
        unsafe {
            std::env::set_var("GIN_COUNTER_DETAILS", "on");
        }
        let mut counter = CardCounter::new(Player::First, hand());
        assert!(counter.event_logging());
        unsafe {
            std::env::remove_var("GIN_COUNTER_DETAILS");
        }
        counter.reset(Player::Second, hand());
        assert!(counter.event_logging());
        counter.set_event_logging(false);
        assert!(!CardCounter::new(Player::First, hand()).event_logging());
    }
}
