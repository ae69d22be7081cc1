use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the two seats at a Gin Rummy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    First = 0,
    Second = 1,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::First, Player::Second];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::Player;

    #[test]
    fn opponent_is_the_other_seat() {
        assert_eq!(Player::First.opponent(), Player::Second);
        assert_eq!(Player::Second.opponent(), Player::First);
    }

    #[test]
    fn index_roundtrip() {
        for (i, player) in Player::BOTH.iter().enumerate() {
            assert_eq!(Player::from_index(i), Some(*player));
            assert_eq!(player.index(), i);
        }
        assert_eq!(Player::from_index(2), None);
    }
}
