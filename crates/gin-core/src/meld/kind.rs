use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

/// Smallest number of cards that forms a meld.
pub const MIN_MELD_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeldKind {
    /// Three or more consecutive ranks of one suit.
    Run,
    /// Three or four cards of one rank.
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Meld {
    kind: MeldKind,
    cards: CardSet,
}

impl Meld {
    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    pub fn cards(&self) -> CardSet {
        self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn deadwood_points(&self) -> u32 {
        self.cards
            .iter()
            .map(|card| u32::from(card.deadwood_points()))
            .sum()
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            MeldKind::Run => "run",
            MeldKind::Set => "set",
        };
        write!(f, "{label}{}", self.cards)
    }
}

/// Every run and set that can be formed from `cards`, overlapping melds
/// included. Runs come first, grouped by suit; sets follow in rank order.
pub fn all_melds(cards: CardSet) -> Vec<Meld> {
    let mut melds = Vec::new();
    for suit in Suit::ALL {
        collect_runs(cards, suit, &mut melds);
    }
    for rank in Rank::ORDERED {
        collect_sets(cards, rank, &mut melds);
    }
    melds
}

fn collect_runs(cards: CardSet, suit: Suit, melds: &mut Vec<Meld>) {
    for start in Rank::ORDERED {
        let mut run = CardSet::EMPTY;
        let mut rank = Some(start);
        while let Some(current) = rank {
            let card = Card::new(current, suit);
            if !cards.contains(card) {
                break;
            }
            run.insert(card);
            if run.len() >= MIN_MELD_LEN {
                melds.push(Meld {
                    kind: MeldKind::Run,
                    cards: run,
                });
            }
            rank = current.next();
        }
    }
}

fn collect_sets(cards: CardSet, rank: Rank, melds: &mut Vec<Meld>) {
    let same_rank: CardSet = Suit::ALL
        .into_iter()
        .map(|suit| Card::new(rank, suit))
        .filter(|card| cards.contains(*card))
        .collect();
    if same_rank.len() < MIN_MELD_LEN {
        return;
    }
    melds.push(Meld {
        kind: MeldKind::Set,
        cards: same_rank,
    });
    if same_rank.len() > MIN_MELD_LEN {
        for left_out in same_rank {
            let mut subset = same_rank;
            subset.remove(left_out);
            melds.push(Meld {
                kind: MeldKind::Set,
                cards: subset,
            });
        }
    }
}
