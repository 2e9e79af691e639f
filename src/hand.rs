//! Hand strings and the hand snapshot.
//!
//! Hand strings use the usual compact notation: digits followed by a suit
//! letter (`123m 456p 789s`), `z` for honors in order E S W N P F C
//! (`1z`..`7z`), or the honor letters themselves. `0` stands for a red five.

use crate::algo::agari::{AgariCalculator, AgariResult};
use crate::algo::wait::{self, WaitAnalysis};
use crate::algo::{decompose, shanten};
use crate::context::ScoringContext;
use crate::meld::Meld;
use crate::rule::Rule;
use crate::tile::{KIND_COUNT, Tile, TileKind};
use std::fmt::Write as _;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Deserializer, Serialize, de};
use tinyvec::ArrayVec;

/// The unit of input to every analyzer.
///
/// `tehai` holds 3n+1 tiles between turns and 3n+2 once a winning
/// candidate is added, where n = 4 - number of melds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    pub tehai: Vec<Tile>,
    pub melds: ArrayVec<[Meld; 4]>,
    pub riichi: bool,
    /// The discard that declared riichi.
    pub riichi_tile: Option<Tile>,
}

#[derive(Deserialize)]
struct RawHand {
    tehai: Vec<Tile>,
    #[serde(default)]
    melds: Vec<Meld>,
    #[serde(default)]
    riichi: bool,
    #[serde(default)]
    riichi_tile: Option<Tile>,
}

/// Parses a hand string into per-kind counts.
pub fn hand(s: &str) -> Result<[u8; KIND_COUNT]> {
    let mut counts = [0; KIND_COUNT];
    for (kind, _) in parse_raw(s)? {
        let c = &mut counts[kind.as_usize()];
        *c += 1;
        ensure!(*c <= 4, "more than 4 copies of {kind} in {s:?}");
    }
    Ok(counts)
}

/// Parses a hand string into physical tiles, giving every copy of a kind a
/// distinct id.
pub fn parse_tiles(s: &str) -> Result<Vec<Tile>> {
    let mut used = [0_u8; KIND_COUNT];
    let mut red_used = [false; 3];
    parse_raw(s)?
        .into_iter()
        .map(|(kind, red)| {
            let n = &mut used[kind.as_usize()];
            ensure!(*n < 4, "more than 4 copies of {kind} in {s:?}");
            if red {
                let slot = &mut red_used[kind.as_usize() / 9];
                ensure!(!*slot, "more than one red {kind} in {s:?}");
                *slot = true;
            }
            let tile = Tile::new(kind.as_u8() * 4 + *n, red)?;
            *n += 1;
            Ok(tile)
        })
        .collect()
}

fn parse_raw(s: &str) -> Result<Vec<(TileKind, bool)>> {
    let mut ret = vec![];
    let mut pending: Vec<u8> = vec![];
    for c in s.chars() {
        match c {
            '0'..='9' => pending.push(c as u8 - b'0'),
            'm' | 'p' | 's' | 'z' => {
                ensure!(!pending.is_empty(), "suit {c:?} without numbers in {s:?}");
                for n in pending.drain(..) {
                    let (kind, red) = match (c, n) {
                        ('z', 1..=7) => (27 + n - 1, false),
                        ('z', _) => bail!("invalid honor {n}z in {s:?}"),
                        (_, 0) => (suit_offset(c) + 4, true),
                        _ => (suit_offset(c) + n - 1, false),
                    };
                    ret.push((must_tile!(kind), red));
                }
            }
            'E' | 'S' | 'W' | 'N' | 'P' | 'F' | 'C' => {
                ensure!(pending.is_empty(), "dangling numbers before {c:?} in {s:?}");
                let kind: TileKind = c.to_string().parse()?;
                ret.push((kind, false));
            }
            _ if c.is_whitespace() => {}
            _ => bail!("unexpected character {c:?} in {s:?}"),
        }
    }
    ensure!(pending.is_empty(), "numbers without a suit at the end of {s:?}");
    Ok(ret)
}

const fn suit_offset(c: char) -> u8 {
    match c {
        'm' => 0,
        'p' => 9,
        _ => 18,
    }
}

/// Per-kind counts of concealed tiles.
#[must_use]
pub fn count_kinds(tiles: &[Tile]) -> [u8; KIND_COUNT] {
    let mut counts = [0; KIND_COUNT];
    for t in tiles {
        counts[t.kind().as_usize()] += 1;
    }
    counts
}

/// Renders tiles in the compact notation, grouped by suit.
#[must_use]
pub fn tiles_to_string(tiles: &[Tile]) -> String {
    let mut sorted: Vec<_> = tiles.to_vec();
    sorted.sort_unstable_by_key(|t| t.id());

    let mut out = String::new();
    for (suit, range) in [('m', 0..9), ('p', 9..18), ('s', 18..27)] {
        let digits: String = sorted
            .iter()
            .filter(|t| range.contains(&t.kind().as_u8()))
            .map(|t| if t.is_red() { '0' } else { (b'1' + t.kind().as_u8() % 9) as char })
            .collect();
        if !digits.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "{digits}{suit}");
        }
    }
    let honors: String = sorted
        .iter()
        .filter(|t| t.kind().is_jihai())
        .map(|t| t.kind().to_string())
        .collect();
    if !honors.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&honors);
    }
    out
}

impl Hand {
    pub fn new(tehai: Vec<Tile>, melds: &[Meld]) -> Result<Self> {
        ensure!(melds.len() <= 4, "at most 4 melds, got {}", melds.len());
        let len_div3 = 4 - melds.len();
        ensure!(
            matches!(tehai.len().checked_sub(3 * len_div3), Some(1 | 2)),
            "{} concealed tiles do not fit {} melds",
            tehai.len(),
            melds.len(),
        );

        let mut seen = [false; crate::tile::TILE_COUNT];
        for t in tehai.iter().chain(melds.iter().flat_map(|m| m.tiles())) {
            let slot = &mut seen[t.id() as usize];
            ensure!(!*slot, "tile id {} appears twice", t.id());
            *slot = true;
        }

        Ok(Self {
            tehai,
            melds: melds.iter().copied().collect(),
            riichi: false,
            riichi_tile: None,
        })
    }

    /// Builds a hand from a hand string and melds.
    pub fn parse(s: &str, melds: &[Meld]) -> Result<Self> {
        let tehai = parse_tiles(s).with_context(|| format!("parsing hand {s:?}"))?;
        Self::new(tehai, melds)
    }

    #[must_use]
    pub fn with_riichi(mut self, riichi_tile: Option<Tile>) -> Self {
        self.riichi = true;
        self.riichi_tile = riichi_tile;
        self
    }

    #[inline]
    #[must_use]
    pub fn counts(&self) -> [u8; KIND_COUNT] {
        count_kinds(&self.tehai)
    }

    #[inline]
    #[must_use]
    pub fn is_menzen(&self) -> bool {
        self.melds.iter().all(|m| !m.is_open())
    }

    #[must_use]
    pub fn is_agari(&self) -> bool {
        decompose::is_winning_hand(&self.tehai, &self.melds)
    }

    #[must_use]
    pub fn shanten(&self) -> u8 {
        shanten::shanten(&self.tehai, &self.melds)
    }

    #[must_use]
    pub fn analyze_waits(&self) -> WaitAnalysis {
        wait::analyze_waits(&self.tehai, &self.melds)
    }

    /// Scores the hand as a win. The hand's own riichi flag is merged into
    /// `ctx`.
    #[must_use]
    pub fn agari(&self, ctx: &ScoringContext, rule: &Rule) -> Option<AgariResult> {
        let ctx = ScoringContext {
            riichi: ctx.riichi || self.riichi,
            ..*ctx
        };
        AgariCalculator {
            tehai: &self.tehai,
            melds: &self.melds,
            ctx: &ctx,
            rule,
        }
        .agari()
    }
}

impl<'de> Deserialize<'de> for Hand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawHand::deserialize(deserializer)?;
        let mut hand = Self::new(raw.tehai, &raw.melds).map_err(de::Error::custom)?;
        hand.riichi = raw.riichi;
        hand.riichi_tile = raw.riichi_tile;
        Ok(hand)
    }
}
