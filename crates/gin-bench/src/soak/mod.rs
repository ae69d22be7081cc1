mod table;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gin_bot::counter::CardCounter;
use gin_bot::melds::is_gin;
use gin_core::model::card::Card;
use gin_core::model::card_set::CardSet;
use gin_core::model::deck::Deck;
use gin_core::model::player::Player;
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event, warn};

use crate::config::{ResolvedOutputs, SoakConfig};

pub use table::{DrawSource, GroundTruthError, Table, TableError};

/// The deal ends once the draw pile is down to this many cards.
const WALL: usize = 2;

/// Plays seeded random deals and checks both seats' counters after every event.
pub struct SoakRunner {
    config: SoakConfig,
    outputs: ResolvedOutputs,
}

/// Totals returned after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoakSummary {
    pub deals_played: usize,
    pub events_checked: usize,
    pub gins: usize,
    pub walls: usize,
    pub turn_caps: usize,
    pub violations: usize,
    pub jsonl_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DealOutcome {
    Gin,
    Wall,
    TurnCap,
}

/// One JSONL line per deal.
#[derive(Debug, Clone, Serialize)]
pub struct DealRow {
    pub run_id: String,
    pub deal_index: usize,
    pub deal_seed: u64,
    pub first_player: Player,
    pub outcome: DealOutcome,
    pub gin_player: Option<Player>,
    pub turns: usize,
    pub events: usize,
    pub face_up_draws: usize,
    pub blind_draws: usize,
    pub draw_pile_left: usize,
    pub unseen: [usize; 2],
    pub op_known: [usize; 2],
    pub violations: usize,
}

impl SoakRunner {
    pub fn new(config: SoakConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Execute every deal, streaming one row per deal to the JSONL output.
    pub fn run(&self) -> Result<SoakSummary, SoakError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut summary = SoakSummary {
            deals_played: 0,
            events_checked: 0,
            gins: 0,
            walls: 0,
            turn_caps: 0,
            violations: 0,
            jsonl_path: self.outputs.jsonl.clone(),
        };

        for deal_index in 0..self.config.deals.count {
            let deal_seed = rng.next_u64();
            let row = self.play_deal(deal_index, deal_seed)?;

            summary.deals_played += 1;
            summary.events_checked += row.events;
            summary.violations += row.violations;
            match row.outcome {
                DealOutcome::Gin => summary.gins += 1,
                DealOutcome::Wall => summary.walls += 1,
                DealOutcome::TurnCap => summary.turn_caps += 1,
            }

            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
        }

        writer.flush()?;

        event!(
            target: "gin_bench::soak",
            Level::INFO,
            run_id = %self.config.run_id,
            deals = summary.deals_played,
            events = summary.events_checked,
            gins = summary.gins,
            walls = summary.walls,
            turn_caps = summary.turn_caps,
            violations = summary.violations,
            message = "soak run complete"
        );

        Ok(summary)
    }

    fn play_deal(&self, deal_index: usize, deal_seed: u64) -> Result<DealRow, SoakError> {
        let deck = Deck::shuffled_with_seed(deal_seed);
        let mut table = Table::deal(&deck, self.config.logging.counter_details)?;
        let mut rng = StdRng::seed_from_u64(deal_seed.rotate_left(17));
        let first_player = if deal_index % 2 == 0 {
            Player::First
        } else {
            Player::Second
        };

        let mut row = DealRow {
            run_id: self.config.run_id.clone(),
            deal_index,
            deal_seed,
            first_player,
            outcome: DealOutcome::TurnCap,
            gin_player: None,
            turns: 0,
            events: 1,
            face_up_draws: 0,
            blind_draws: 0,
            draw_pile_left: table.stock_len(),
            unseen: [0; 2],
            op_known: [0; 2],
            violations: 0,
        };
        let initial = table.counters().clone();
        check_table(&table, &initial, deal_index, "face_up", &mut row);

        let mut player = first_player;
        loop {
            if row.turns >= self.config.play.max_turns {
                row.outcome = DealOutcome::TurnCap;
                break;
            }
            row.turns += 1;

            let source = if rng.gen_range(0..100u8) < self.config.play.take_face_up_percent {
                row.face_up_draws += 1;
                DrawSource::FaceUp
            } else {
                row.blind_draws += 1;
                DrawSource::Blind
            };
            let previous = table.counters().clone();
            let drawn = table.draw(player, source)?;
            row.events += 1;
            check_table(&table, &previous, deal_index, "draw", &mut row);

            let taken = (source == DrawSource::FaceUp).then_some(drawn);
            let discard = choose_discard(table.hand(player), taken, &mut rng)
                .ok_or(TableError::CardNotHeld { player, card: drawn })?;
            let previous = table.counters().clone();
            table.discard(player, discard)?;
            row.events += 1;
            check_table(&table, &previous, deal_index, "discard", &mut row);

            if is_gin(table.hand(player)) {
                row.outcome = DealOutcome::Gin;
                row.gin_player = Some(player);
                break;
            }
            if table.stock_len() <= WALL {
                row.outcome = DealOutcome::Wall;
                break;
            }
            player = player.opponent();
        }

        row.draw_pile_left = table.stock_len();
        for counter in table.counters() {
            let seat = counter.me().index();
            row.unseen[seat] = counter.unseen_cards().len();
            row.op_known[seat] = counter.op_known_hand().len();
        }

        event!(
            target: "gin_bench::soak",
            Level::DEBUG,
            deal_index,
            deal_seed,
            outcome = ?row.outcome,
            turns = row.turns,
            violations = row.violations,
            message = "deal finished"
        );

        Ok(row)
    }
}

/// Checks both seats, counting and logging every divergence.
fn check_table(
    table: &Table,
    previous: &[CardCounter; 2],
    deal_index: usize,
    event_kind: &'static str,
    row: &mut DealRow,
) {
    for seat in Player::BOTH {
        if let Err(err) = table.verify(seat, &previous[seat.index()]) {
            row.violations += 1;
            warn!(
                target: "gin_bench::soak",
                deal_index,
                seat = %seat,
                event = event_kind,
                error = %err,
                message = "counter diverged from the table"
            );
        }
    }
}

/// Picks a random card to throw, never the face-up card just taken.
fn choose_discard(hand: CardSet, taken: Option<Card>, rng: &mut StdRng) -> Option<Card> {
    let mut candidates = hand;
    if let Some(card) = taken {
        candidates.remove(card);
    }
    if candidates.is_empty() {
        return None;
    }
    candidates.iter().nth(rng.gen_range(0..candidates.len()))
}

fn ensure_parent(path: Option<&Path>) -> Result<(), SoakError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum SoakError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize deal row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("table error: {0}")]
    Table(#[from] TableError),
}
