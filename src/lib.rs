//! Rule-evaluation core for four-player riichi mahjong.
//!
//! Every analyzer in [`algo`] is a pure function over an immutable hand
//! snapshot: winning-shape detection, shanten, tenpai waits, yaku, fu and
//! points. Nothing here keeps state between calls.

#[macro_use]
mod macros;

pub mod algo;
pub mod context;
pub mod hand;
pub mod meld;
pub mod rule;
pub mod tile;

pub use algo::agari::{Agari, AgariCalculator, AgariResult, should_win};
pub use algo::decompose::is_winning_hand;
pub use algo::point::calculate_score;
pub use algo::shanten::shanten;
pub use algo::wait::analyze_waits;
pub use algo::yaku::detect_yaku;
pub use context::ScoringContext;
pub use hand::Hand;
pub use meld::{Meld, MeldKind};
pub use rule::Rule;
pub use tile::{Tile, TileKind};
