//! Tenpai waits and useful draws.
use super::decompose::{Shape, shapes};
use super::len_div3;
use super::shanten::{self, SHANTEN_MAX};
use crate::hand::count_kinds;
use crate::meld::Meld;
use crate::tile::{KIND_COUNT, Tile, TileKind};

use serde::Serialize;
use tinyvec::ArrayVec;

/// Structural position of the winning tile in its group.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum WaitShape {
    /// Single wait on the pair.
    #[default]
    Tanki,
    Ryanmen,
    Kanchan,
    Penchan,
    /// Dual pair, one of which becomes the triplet.
    Shanpon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WaitType {
    Simple(WaitShape),
    /// Waits of more than one shape, e.g. ryanmen and tanki on 2345m.
    Complex,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Wait {
    pub tile: TileKind,
    /// Every shape this tile completes, across all readings of the hand.
    pub shapes: ArrayVec<[WaitShape; 5]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitAnalysis {
    pub shanten: u8,
    /// At least one wait exists. A hand at shanten 0 whose only waits are
    /// kinds it already holds four of is not tenpai.
    pub tenpai: bool,
    pub waits: Vec<Wait>,
    /// `None` iff `waits` is empty.
    pub wait_type: Option<WaitType>,
    /// Kinds whose draw lowers shanten, only filled when not tenpai.
    pub useful_tiles: Vec<TileKind>,
}

impl WaitShape {
    /// Shape of the run starting at `s` when it is completed by `w`.
    ///
    /// `w` must lie within `s..=s + 2`.
    #[must_use]
    pub const fn of_shuntsu(s: TileKind, w: TileKind) -> Self {
        let (s, w) = (s.as_u8(), w.as_u8());
        if w == s + 1 {
            Self::Kanchan
        } else if w == s && s % 9 == 6 || w == s + 2 && s % 9 == 0 {
            Self::Penchan
        } else {
            Self::Ryanmen
        }
    }

    /// Wait fu of this shape.
    #[inline]
    #[must_use]
    pub const fn fu(self) -> u8 {
        match self {
            Self::Tanki | Self::Kanchan | Self::Penchan => 2,
            Self::Ryanmen | Self::Shanpon => 0,
        }
    }
}

impl WaitAnalysis {
    const fn sentinel() -> Self {
        Self {
            shanten: SHANTEN_MAX,
            tenpai: false,
            waits: vec![],
            wait_type: None,
            useful_tiles: vec![],
        }
    }

    pub fn wait_tiles(&self) -> impl Iterator<Item = TileKind> + '_ {
        self.waits.iter().map(|w| w.tile)
    }
}

/// Analyzes a 3n+1 hand. Malformed lengths give shanten [`SHANTEN_MAX`]
/// and nothing else. Copies locked in melds count against the four of each
/// kind.
#[must_use]
pub fn analyze_waits(tiles: &[Tile], melds: &[Meld]) -> WaitAnalysis {
    let Some(len_div3) = len_div3(melds) else {
        return WaitAnalysis::sentinel();
    };
    if tiles.len() != len_div3 as usize * 3 + 1 {
        log::trace!("no waits for {} concealed tiles and {} melds", tiles.len(), melds.len());
        return WaitAnalysis::sentinel();
    }
    let counts = count_kinds(tiles);
    let mut held = counts;
    for t in melds.iter().flat_map(|m| m.tiles()) {
        held[t.kind().as_usize()] += 1;
    }
    analyze_held(&counts, &held, len_div3)
}

/// Same as [`analyze_waits`] over raw counts of a 3n+1 hand without melds
/// to account for.
#[must_use]
pub fn analyze_counts(counts: &[u8; KIND_COUNT], len_div3: u8) -> WaitAnalysis {
    analyze_held(counts, counts, len_div3)
}

/// `held` is `counts` plus the meld tiles.
fn analyze_held(counts: &[u8; KIND_COUNT], held: &[u8; KIND_COUNT], len_div3: u8) -> WaitAnalysis {
    let shanten = shanten::calc_all(counts, len_div3);
    if shanten > 0 {
        return WaitAnalysis {
            shanten: shanten as u8,
            tenpai: false,
            waits: vec![],
            wait_type: None,
            useful_tiles: useful_tiles(counts, held, len_div3, shanten),
        };
    }

    let waits: Vec<_> = (0..KIND_COUNT)
        .filter(|&k| held[k] < 4)
        .filter_map(|k| {
            let mut c = *counts;
            c[k] += 1;
            let tile = must_tile!(k);
            let mut found = ArrayVec::new();
            for shape in shapes(&c, len_div3) {
                collect_shapes(&shape, tile, &mut found);
            }
            if found.is_empty() {
                return None;
            }
            found.sort_unstable();
            Some(Wait { tile, shapes: found })
        })
        .collect();

    let wait_type = waits.first().map(|first| {
        let single = first.shapes.len() == 1
            && waits.iter().all(|w| w.shapes.as_slice() == first.shapes.as_slice());
        if single { WaitType::Simple(first.shapes[0]) } else { WaitType::Complex }
    });

    WaitAnalysis {
        shanten: 0,
        tenpai: !waits.is_empty(),
        waits,
        wait_type,
        useful_tiles: vec![],
    }
}

fn collect_shapes(shape: &Shape, w: TileKind, found: &mut ArrayVec<[WaitShape; 5]>) {
    let mut push = |s: WaitShape| {
        if !found.contains(&s) {
            found.push(s);
        }
    };
    match shape {
        Shape::Chitoitsu(_) | Shape::Kokushi { .. } => push(WaitShape::Tanki),
        Shape::Standard(div) => {
            if div.pair == w {
                push(WaitShape::Tanki);
            }
            if div.kotsu.contains(&w) {
                push(WaitShape::Shanpon);
            }
            for &s in &div.shuntsu {
                if (s.as_u8()..=s.as_u8() + 2).contains(&w.as_u8()) {
                    push(WaitShape::of_shuntsu(s, w));
                }
            }
        }
    }
}

fn useful_tiles(
    counts: &[u8; KIND_COUNT],
    held: &[u8; KIND_COUNT],
    len_div3: u8,
    shanten: i8,
) -> Vec<TileKind> {
    (0..KIND_COUNT)
        .filter(|&k| held[k] < 4)
        .filter(|&k| {
            let mut c = *counts;
            c[k] += 1;
            shanten::calc_all(&c, len_div3) < shanten
        })
        .map(|k| must_tile!(k))
        .collect()
}
