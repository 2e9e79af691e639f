//! Fu of a standard reading.
use super::decompose::Div;
use super::wait::WaitShape;
use crate::context::ScoringContext;
use crate::meld::{Meld, MeldKind};
use crate::tile::TileKind;

use tinyvec::ArrayVec;

/// Fixed fu of chiitoitsu.
pub const CHIITOITSU_FU: u8 = 25;

/// The group of a [`Div`] the winning tile is taken to have completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    #[default]
    Pair,
    Kotsu(TileKind),
    /// Run starting at the given kind.
    Shuntsu(TileKind),
}

impl Placement {
    /// Every group of `div` that contains `win`, runs deduplicated.
    #[must_use]
    pub fn candidates(div: &Div, win: TileKind) -> ArrayVec<[Self; 6]> {
        let mut ret = ArrayVec::new();
        if div.pair == win {
            ret.push(Self::Pair);
        }
        if div.kotsu.contains(&win) {
            ret.push(Self::Kotsu(win));
        }
        for &s in &div.shuntsu {
            let p = Self::Shuntsu(s);
            if (s.as_u8()..=s.as_u8() + 2).contains(&win.as_u8()) && !ret.contains(&p) {
                ret.push(p);
            }
        }
        ret
    }

    #[must_use]
    pub const fn wait_shape(self, win: TileKind) -> WaitShape {
        match self {
            Self::Pair => WaitShape::Tanki,
            Self::Kotsu(_) => WaitShape::Shanpon,
            Self::Shuntsu(s) => WaitShape::of_shuntsu(s, win),
        }
    }
}

const fn kotsu_fu(kind: TileKind, concealed: bool) -> u8 {
    let fu = if concealed { 4 } else { 2 };
    if kind.is_yaokyuu() { fu * 2 } else { fu }
}

fn meld_fu(meld: &Meld) -> u8 {
    let base = meld.base();
    match meld.kind() {
        MeldKind::Chi => 0,
        MeldKind::Pon => kotsu_fu(base, false),
        MeldKind::Minkan => kotsu_fu(base, false) * 4,
        MeldKind::Ankan => kotsu_fu(base, true) * 4,
    }
}

/// Fu of the pair alone. Only value pairs score: 2 per matching wind or
/// dragon, so a double-wind pair gives 4. Terminal pairs score nothing.
#[must_use]
pub fn pair_fu(pair: TileKind, ctx: &ScoringContext) -> u8 {
    if pair.is_dragon() {
        return 2;
    }
    let mut fu = 0;
    if pair == ctx.bakaze.kind() {
        fu += 2;
    }
    if pair == ctx.jikaze.kind() {
        fu += 2;
    }
    fu
}

/// Fu of a standard reading, rounded up to a multiple of 10.
///
/// A triplet completed by ron counts as open. An open hand is never below
/// 30.
#[must_use]
pub fn calc_fu(
    div: &Div,
    melds: &[Meld],
    placement: Placement,
    win: TileKind,
    ctx: &ScoringContext,
    has_pinfu: bool,
) -> u8 {
    if has_pinfu {
        return if ctx.is_tsumo { 20 } else { 30 };
    }
    let is_menzen = melds.iter().all(|m| !m.is_open());

    let mut fu = 20;
    fu += div
        .kotsu
        .iter()
        .map(|&k| {
            let is_minkou = ctx.is_ron() && placement == Placement::Kotsu(k);
            kotsu_fu(k, !is_minkou)
        })
        .sum::<u8>();
    fu += melds.iter().map(meld_fu).sum::<u8>();
    fu += pair_fu(div.pair, ctx);
    fu += placement.wait_shape(win).fu();

    if ctx.is_tsumo {
        fu += 2;
    } else if is_menzen {
        fu += 10;
    }

    let fu = fu.div_ceil(10) * 10;
    if !is_menzen && fu == 20 { 30 } else { fu }
}
