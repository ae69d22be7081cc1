//! Meld detection and deadwood evaluation.
//!
//! This module is composed of:
//! - `kind`: the `Meld` value type and enumeration of every meld in a hand.
//! - `search`: selection of the meld groupings that leave the least deadwood.

mod kind;
mod search;

pub use kind::{Meld, MeldKind, all_melds};
pub use search::{best_meld_sets, deadwood_after, deadwood_points};
