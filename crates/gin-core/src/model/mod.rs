pub mod card;
pub mod card_set;
pub mod deck;
pub mod player;
pub mod rank;
pub mod suit;
