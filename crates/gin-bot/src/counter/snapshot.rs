use super::CardCounter;
use gin_core::model::card::Card;
use gin_core::model::player::Player;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub me: Player,
    pub opponent: Player,
    pub my_hand: Vec<Card>,
    pub my_known_hand: Vec<Card>,
    pub my_rejects: Vec<Card>,
    pub op_known_hand: Vec<Card>,
    pub op_rejects: Vec<Card>,
    /// Bottom to top.
    pub discard_pile: Vec<Card>,
    pub draw_pile_size: usize,
    pub unseen: Vec<Card>,
}

impl CounterSnapshot {
    pub fn capture(counter: &CardCounter) -> Self {
        CounterSnapshot {
            me: counter.me,
            opponent: counter.opponent,
            my_hand: counter.my_hand.to_vec(),
            my_known_hand: counter.my_known_hand.to_vec(),
            my_rejects: counter.my_rejects.to_vec(),
            op_known_hand: counter.op_known_hand.to_vec(),
            op_rejects: counter.op_rejects.to_vec(),
            discard_pile: counter.discard_pile.clone(),
            draw_pile_size: counter.draw_pile_size,
            unseen: counter.unseen.to_vec(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::CounterSnapshot;
    use crate::counter::CardCounter;
    use gin_core::model::card::Card;
    use gin_core::model::card_set::CardSet;
    use gin_core::model::player::Player;

    fn card(text: &str) -> Card {
        text.parse().expect("valid card")
    }

    fn counter() -> CardCounter {
        let hand: CardSet = ["AC", "2C", "3C", "7H", "8H", "9S", "TS", "JD", "QD", "KD"]
            .iter()
            .map(|t| card(t))
            .collect();
        let mut counter = CardCounter::new(Player::Second, hand);
        counter.report_first_face_up_card(card("5D")).unwrap();
        counter.report_draw(Player::First, Some(card("5D"))).unwrap();
        counter.report_discard(Player::First, card("6S"));
        counter
    }

    #[test]
    fn snapshot_serializes_cards_as_text() {
        let json = counter().snapshot().to_json().unwrap();
        assert!(json.contains("\"me\": \"Second\""));
        assert!(json.contains("\"discard_pile\": [\n    \"6S\"\n  ]"));
        assert!(json.contains("\"draw_pile_size\": 31"));
    }

    #[test]
    fn snapshot_reads_back_from_json() {
        let counter = counter();
        let json = counter.snapshot().to_json().unwrap();
        let snapshot = CounterSnapshot::from_json(&json).unwrap();
        assert_eq!(snapshot, counter.snapshot());
        assert_eq!(snapshot.to_json().unwrap(), json);
        assert_eq!(snapshot.op_rejects, vec![card("6S")]);
        assert_eq!(snapshot.op_known_hand, vec![card("5D")]);
    }
}
