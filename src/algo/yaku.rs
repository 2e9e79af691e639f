//! Yaku detection.
//!
//! A complete hand can often be read in more than one way, and the winning
//! tile can sit in more than one of its groups. Every reading is scored and
//! the highest one by [`Agari`] ordering wins.
use super::agari::Agari;
use super::decompose::{Div, Shape, shapes};
use super::fu::{CHIITOITSU_FU, Placement, calc_fu, pair_fu};
use super::len_div3;
use super::wait::WaitShape;
use crate::context::ScoringContext;
use crate::hand::count_kinds;
use crate::meld::{Meld, MeldKind};
use crate::rule::Rule;
use crate::tile::{KIND_COUNT, Tile, TileKind};
use std::fmt;
use std::iter;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Yaku {
    Riichi,
    DoubleRiichi,
    Ippatsu,
    MenzenTsumo,
    Rinshan,
    Haitei,
    Houtei,
    Chankan,

    Pinfu,
    Tanyao,
    Iipeikou,
    Bakaze,
    Jikaze,
    Haku,
    Hatsu,
    Chun,
    Chiitoitsu,
    Ittsuu,
    SanshokuDoujun,
    SanshokuDoukou,
    Toitoi,
    Sanankou,
    Sankantsu,
    Chanta,
    Shousangen,
    Honroutou,
    Ryanpeikou,
    Junchan,
    Honitsu,
    Chinitsu,

    KokushiMusou,
    Suuankou,
    Daisangen,
    Tsuuiisou,
    Shousuushii,
    Daisuushii,
    Ryuuiisou,
    Chinroutou,
    Suukantsu,
    ChuurenPoutou,
}

/// A satisfied yaku and its han. Yakuman are listed at 13 han per multiple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YakuEntry {
    pub yaku: Yaku,
    pub han: u8,
}

impl Yaku {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Riichi => "Riichi",
            Self::DoubleRiichi => "Double Riichi",
            Self::Ippatsu => "Ippatsu",
            Self::MenzenTsumo => "Menzen Tsumo",
            Self::Rinshan => "Rinshan Kaihou",
            Self::Haitei => "Haitei Raoyue",
            Self::Houtei => "Houtei Raoyui",
            Self::Chankan => "Chankan",
            Self::Pinfu => "Pinfu",
            Self::Tanyao => "Tanyao",
            Self::Iipeikou => "Iipeikou",
            Self::Bakaze => "Bakaze",
            Self::Jikaze => "Jikaze",
            Self::Haku => "Haku",
            Self::Hatsu => "Hatsu",
            Self::Chun => "Chun",
            Self::Chiitoitsu => "Chiitoitsu",
            Self::Ittsuu => "Ittsuu",
            Self::SanshokuDoujun => "Sanshoku Doujun",
            Self::SanshokuDoukou => "Sanshoku Doukou",
            Self::Toitoi => "Toitoi",
            Self::Sanankou => "Sanankou",
            Self::Sankantsu => "Sankantsu",
            Self::Chanta => "Chanta",
            Self::Shousangen => "Shousangen",
            Self::Honroutou => "Honroutou",
            Self::Ryanpeikou => "Ryanpeikou",
            Self::Junchan => "Junchan",
            Self::Honitsu => "Honitsu",
            Self::Chinitsu => "Chinitsu",
            Self::KokushiMusou => "Kokushi Musou",
            Self::Suuankou => "Suuankou",
            Self::Daisangen => "Daisangen",
            Self::Tsuuiisou => "Tsuuiisou",
            Self::Shousuushii => "Shousuushii",
            Self::Daisuushii => "Daisuushii",
            Self::Ryuuiisou => "Ryuuiisou",
            Self::Chinroutou => "Chinroutou",
            Self::Suukantsu => "Suukantsu",
            Self::ChuurenPoutou => "Chuuren Poutou",
        }
    }

    #[must_use]
    pub const fn is_yakuman(self) -> bool {
        matches!(
            self,
            Self::KokushiMusou
                | Self::Suuankou
                | Self::Daisangen
                | Self::Tsuuiisou
                | Self::Shousuushii
                | Self::Daisuushii
                | Self::Ryuuiisou
                | Self::Chinroutou
                | Self::Suukantsu
                | Self::ChuurenPoutou
        )
    }
}

impl fmt::Display for Yaku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Yaku of a complete hand under the default rule. Empty if the hand does
/// not win or has no yaku.
#[must_use]
pub fn detect_yaku(tiles: &[Tile], melds: &[Meld], ctx: &ScoringContext) -> Vec<YakuEntry> {
    detect_yaku_with_rule(tiles, melds, ctx, &Rule::default())
}

#[must_use]
pub fn detect_yaku_with_rule(
    tiles: &[Tile],
    melds: &[Meld],
    ctx: &ScoringContext,
    rule: &Rule,
) -> Vec<YakuEntry> {
    Evaluator::new(tiles, melds, ctx, rule)
        .and_then(|e| e.best())
        .map(|(_, yaku)| yaku)
        .unwrap_or_default()
}

#[derive(Default)]
struct Tally {
    han: u8,
    yakuman: u8,
    entries: Vec<YakuEntry>,
}

impl Tally {
    fn add(&mut self, yaku: Yaku, han: u8) {
        self.han += han;
        self.entries.push(YakuEntry { yaku, han });
    }

    fn add_yakuman(&mut self, yaku: Yaku, double: bool) {
        let n = if double { 2 } else { 1 };
        self.yakuman += n;
        self.entries.push(YakuEntry { yaku, han: 13 * n });
    }

    /// Any yakuman drops every other yaku, and suuankou is scored alone.
    fn finish(mut self, fu: impl FnOnce() -> u8) -> Option<(Agari, Vec<YakuEntry>)> {
        if let Some(&suuankou) = self.entries.iter().find(|e| e.yaku == Yaku::Suuankou) {
            return Some((Agari::Yakuman(suuankou.han / 13), vec![suuankou]));
        }
        if self.yakuman > 0 {
            self.entries.retain(|e| e.yaku.is_yakuman());
            Some((Agari::Yakuman(self.yakuman), self.entries))
        } else if self.han > 0 {
            Some((Agari::Normal { fu: fu(), han: self.han }, self.entries))
        } else {
            None
        }
    }
}

/// A complete hand ready to be read.
pub(crate) struct Evaluator<'a> {
    counts: [u8; KIND_COUNT],
    len_div3: u8,
    melds: &'a [Meld],
    ctx: &'a ScoringContext,
    rule: &'a Rule,
    win: TileKind,
    is_menzen: bool,
}

impl<'a> Evaluator<'a> {
    /// `None` if the tile count does not fit the melds or the winning tile
    /// is not among `tiles`.
    pub(crate) fn new(
        tiles: &[Tile],
        melds: &'a [Meld],
        ctx: &'a ScoringContext,
        rule: &'a Rule,
    ) -> Option<Self> {
        let len_div3 = len_div3(melds)?;
        if tiles.len() != len_div3 as usize * 3 + 2 {
            log::debug!("{} concealed tiles cannot win with {} melds", tiles.len(), melds.len());
            return None;
        }
        let counts = count_kinds(tiles);
        let win = match ctx.winning_tile {
            Some(w) => w,
            None => tiles.last()?.kind(),
        };
        if counts[win.as_usize()] == 0 {
            log::debug!("winning tile {win} is not in the hand");
            return None;
        }
        Some(Self {
            counts,
            len_div3,
            melds,
            ctx,
            rule,
            win,
            is_menzen: melds.iter().all(|m| !m.is_open()),
        })
    }

    /// The highest scoring reading, or `None` if the hand does not win or
    /// no reading has a yaku. Dora is not included.
    pub(crate) fn best(&self) -> Option<(Agari, Vec<YakuEntry>)> {
        let mut best: Option<(Agari, Vec<YakuEntry>)> = None;
        let mut consider = |cand: Option<(Agari, Vec<YakuEntry>)>| {
            if let Some(cand) = cand {
                if best.as_ref().is_none_or(|(agari, _)| cand.0 > *agari) {
                    best = Some(cand);
                }
            }
        };
        for shape in shapes(&self.counts, self.len_div3) {
            match shape {
                Shape::Kokushi { .. } => consider(self.kokushi()),
                Shape::Chitoitsu(pairs) => consider(self.chitoitsu(&pairs)),
                Shape::Standard(div) => {
                    for placement in Placement::candidates(&div, self.win) {
                        let reading = Reading {
                            ev: self,
                            div: &div,
                            placement,
                        };
                        consider(reading.search());
                    }
                }
            }
        }
        best
    }

    fn situational(&self, t: &mut Tally) {
        let ctx = self.ctx;
        if self.is_menzen {
            if ctx.double_riichi {
                t.add(Yaku::DoubleRiichi, 2);
            } else if ctx.riichi {
                t.add(Yaku::Riichi, 1);
            }
            if ctx.is_riichi() && ctx.ippatsu {
                t.add(Yaku::Ippatsu, 1);
            }
            if ctx.is_tsumo {
                t.add(Yaku::MenzenTsumo, 1);
            }
        }
        if ctx.is_tsumo {
            if ctx.rinshan {
                t.add(Yaku::Rinshan, 1);
            } else if ctx.is_last_tile {
                t.add(Yaku::Haitei, 1);
            }
        } else {
            if ctx.is_last_tile {
                t.add(Yaku::Houtei, 1);
            }
            if ctx.chankan {
                t.add(Yaku::Chankan, 1);
            }
        }
    }

    /// One han less when open.
    const fn kuisagari(&self, han: u8) -> u8 {
        if self.is_menzen { han } else { han - 1 }
    }

    fn flush(&self, t: &mut Tally, kinds: impl Iterator<Item = TileKind>) {
        let mut suits = 0_u8;
        let mut has_jihai = false;
        for k in kinds {
            if k.is_jihai() {
                has_jihai = true;
            } else {
                suits |= 1 << (k.as_u8() / 9);
            }
        }
        match (suits.count_ones(), has_jihai) {
            (0, _) => t.add_yakuman(Yaku::Tsuuiisou, false),
            (1, true) => t.add(Yaku::Honitsu, self.kuisagari(3)),
            (1, false) => t.add(Yaku::Chinitsu, self.kuisagari(6)),
            _ => {}
        }
    }

    /// `Some(junsei)` for nine gates.
    fn chuuren(&self) -> Option<bool> {
        if !self.melds.is_empty() || self.win.is_jihai() {
            return None;
        }
        let start = self.win.as_usize() / 9 * 9;
        let suit = &self.counts[start..start + 9];
        if suit.iter().sum::<u8>() != 14 {
            return None;
        }
        let need = [3, 1, 1, 1, 1, 1, 1, 1, 3];
        if suit.iter().zip(need).all(|(&c, n)| c >= n) {
            Some(matches!(self.counts[self.win.as_usize()], 2 | 4))
        } else {
            None
        }
    }

    fn kokushi(&self) -> Option<(Agari, Vec<YakuEntry>)> {
        let mut t = Tally::default();
        let juusanmen = self.counts[self.win.as_usize()] == 2;
        t.add_yakuman(
            Yaku::KokushiMusou,
            juusanmen && self.rule.is_kokushi_musou_13machi_double,
        );
        t.finish(|| 0)
    }

    fn chitoitsu(&self, pairs: &[TileKind; 7]) -> Option<(Agari, Vec<YakuEntry>)> {
        let mut t = Tally::default();
        self.situational(&mut t);
        t.add(Yaku::Chiitoitsu, 2);
        if pairs.iter().all(|k| !k.is_yaokyuu()) {
            t.add(Yaku::Tanyao, 1);
        }
        if pairs.iter().all(|k| k.is_yaokyuu())
            && pairs.iter().any(|k| k.is_jihai())
            && pairs.iter().any(|k| k.is_terminal())
        {
            t.add(Yaku::Honroutou, 2);
        }
        self.flush(&mut t, pairs.iter().copied());
        t.finish(|| CHIITOITSU_FU)
    }
}

/// One standard reading with the winning tile fixed to one group.
struct Reading<'a> {
    ev: &'a Evaluator<'a>,
    div: &'a Div,
    placement: Placement,
}

impl Reading<'_> {
    fn all_kotsu(&self) -> impl Iterator<Item = TileKind> + '_ {
        self.div
            .kotsu
            .iter()
            .copied()
            .chain(self.ev.melds.iter().filter(|m| !m.is_chi()).map(Meld::base))
    }

    fn all_shuntsu(&self) -> impl Iterator<Item = TileKind> + '_ {
        self.div
            .shuntsu
            .iter()
            .copied()
            .chain(self.ev.melds.iter().filter(|m| m.is_chi()).map(Meld::base))
    }

    fn kotsu_and_pair(&self) -> impl Iterator<Item = TileKind> + '_ {
        self.all_kotsu().chain(iter::once(self.div.pair))
    }

    /// Pairs of identical concealed runs.
    fn peikou(&self) -> usize {
        let s = &self.div.shuntsu;
        let mut count = 0;
        let mut i = 0;
        while i + 1 < s.len() {
            if s[i] == s[i + 1] {
                count += 1;
                i += 2;
            } else {
                i += 1;
            }
        }
        count
    }

    fn ankou(&self) -> usize {
        let minkou = self.ev.ctx.is_ron() && matches!(self.placement, Placement::Kotsu(_));
        let ankans = self
            .ev
            .melds
            .iter()
            .filter(|m| m.kind() == MeldKind::Ankan)
            .count();
        self.div.kotsu.len() - minkou as usize + ankans
    }

    fn search(&self) -> Option<(Agari, Vec<YakuEntry>)> {
        let ev = self.ev;
        let ctx = ev.ctx;
        let pair = self.div.pair;
        let mut t = Tally::default();
        ev.situational(&mut t);

        let has_pinfu = self.div.shuntsu.len() == 4
            && pair_fu(pair, ctx) == 0
            && self.placement.wait_shape(ev.win) == WaitShape::Ryanmen;
        if has_pinfu {
            t.add(Yaku::Pinfu, 1);
        }

        let has_shuntsu = self.all_shuntsu().next().is_some();
        let has_tanyao = self.kotsu_and_pair().all(|k| !k.is_yaokyuu())
            && self.all_shuntsu().all(|s| matches!(s.as_u8() % 9, 1..=5));
        if has_tanyao && (ev.is_menzen || ev.rule.kuitan) {
            t.add(Yaku::Tanyao, 1);
        }

        if ev.is_menzen {
            match self.peikou() {
                2 => t.add(Yaku::Ryanpeikou, 3),
                1 => t.add(Yaku::Iipeikou, 1),
                _ => {}
            }
        }

        let mut jihai = [false; 7];
        for k in self.all_kotsu().filter(|k| k.is_jihai()) {
            jihai[k.as_usize() - 3 * 9] = true;
        }
        if jihai[ctx.bakaze.kind().as_usize() - 3 * 9] {
            t.add(Yaku::Bakaze, 1);
        }
        if jihai[ctx.jikaze.kind().as_usize() - 3 * 9] {
            t.add(Yaku::Jikaze, 1);
        }
        for (i, yaku) in [(4, Yaku::Haku), (5, Yaku::Hatsu), (6, Yaku::Chun)] {
            if jihai[i] {
                t.add(yaku, 1);
            }
        }
        let sangen = jihai[4..].iter().filter(|&&b| b).count();
        if sangen == 3 {
            t.add_yakuman(Yaku::Daisangen, false);
        } else if sangen == 2 && pair.is_dragon() {
            t.add(Yaku::Shousangen, 2);
        }
        let winds = jihai[..4].iter().filter(|&&b| b).count();
        if winds == 4 {
            t.add_yakuman(Yaku::Daisuushii, ev.rule.is_daisuushii_double);
        } else if winds == 3 && pair.is_wind() {
            t.add_yakuman(Yaku::Shousuushii, false);
        }

        let mut runs = [[false; 9]; 3];
        for s in self.all_shuntsu() {
            runs[s.as_usize() / 9][s.as_usize() % 9] = true;
        }
        if runs.iter().any(|r| r[0] && r[3] && r[6]) {
            t.add(Yaku::Ittsuu, ev.kuisagari(2));
        }
        if (0..7).any(|n| runs.iter().all(|r| r[n])) {
            t.add(Yaku::SanshokuDoujun, ev.kuisagari(2));
        }
        let mut sets = [[false; 9]; 3];
        for k in self.all_kotsu().filter(|k| !k.is_jihai()) {
            sets[k.as_usize() / 9][k.as_usize() % 9] = true;
        }
        if (0..9).any(|n| sets.iter().all(|s| s[n])) {
            t.add(Yaku::SanshokuDoukou, 2);
        }

        if !has_shuntsu {
            t.add(Yaku::Toitoi, 2);
        }
        match self.ankou() {
            4 => t.add_yakuman(
                Yaku::Suuankou,
                self.placement == Placement::Pair && ev.rule.is_suuankou_tanki_double,
            ),
            3 => t.add(Yaku::Sanankou, 2),
            _ => {}
        }
        match ev.melds.iter().filter(|m| m.is_quad()).count() {
            4 => t.add_yakuman(Yaku::Suukantsu, false),
            3 => t.add(Yaku::Sankantsu, 2),
            _ => {}
        }

        let is_outside = self.kotsu_and_pair().all(TileKind::is_yaokyuu)
            && self.all_shuntsu().all(|s| matches!(s.as_u8() % 9, 0 | 6));
        if is_outside {
            let has_jihai = self.kotsu_and_pair().any(TileKind::is_jihai);
            let has_terminal = self.kotsu_and_pair().any(TileKind::is_terminal);
            if has_shuntsu {
                if has_jihai {
                    t.add(Yaku::Chanta, ev.kuisagari(2));
                } else {
                    t.add(Yaku::Junchan, ev.kuisagari(3));
                }
            } else if !has_jihai {
                t.add_yakuman(Yaku::Chinroutou, false);
            } else if has_terminal {
                t.add(Yaku::Honroutou, 2);
            }
        }
        ev.flush(&mut t, self.kotsu_and_pair().chain(self.all_shuntsu()));

        let is_green = |k: TileKind| matches_tu8!(k.as_u8(), 2s | 3s | 4s | 6s | 8s | F);
        if self.kotsu_and_pair().all(is_green) && self.all_shuntsu().all(|s| s == t!(2s)) {
            t.add_yakuman(Yaku::Ryuuiisou, false);
        }
        if let Some(junsei) = ev.chuuren() {
            t.add_yakuman(
                Yaku::ChuurenPoutou,
                junsei && ev.rule.is_junsei_chuurenpoutou_double,
            );
        }

        t.finish(|| calc_fu(self.div, ev.melds, self.placement, ev.win, ctx, has_pinfu))
    }
}
