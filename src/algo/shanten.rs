//! Shanten: the number of tile exchanges away from a complete hand.
//!
//! The standard form uses the textbook `2 * (n - mentsu) - taatsu - pair`
//! count, with blocks capped at the number of groups the hand still needs.
//! All raw `calc_*` functions return -1 for a complete 3n+2 hand and give
//! the best-discard value for any 3n+2 input.
use super::decompose::can_shuntsu;
use super::len_div3;
use crate::hand::count_kinds;
use crate::meld::Meld;
use crate::tile::{KIND_COUNT, Tile};

/// Returned by [`shanten`] for malformed input.
pub const SHANTEN_MAX: u8 = 8;

/// Shanten of a 3n+1 hand, or of a 3n+2 hand after its best discard, with
/// n = 4 - melds. 0 means tenpai, or complete for a 3n+2 hand.
#[must_use]
pub fn shanten(tiles: &[Tile], melds: &[Meld]) -> u8 {
    let Some(len_div3) = len_div3(melds) else {
        log::trace!("{} melds cannot form a hand", melds.len());
        return SHANTEN_MAX;
    };
    let n = len_div3 as usize * 3;
    if !(n + 1..=n + 2).contains(&tiles.len()) {
        log::trace!(
            "{} concealed tiles do not fit {} melds",
            tiles.len(),
            melds.len(),
        );
        return SHANTEN_MAX;
    }
    calc_all(&count_kinds(tiles), len_div3).max(0) as u8
}

/// Best of standard, seven pairs and thirteen orphans. The last two only
/// apply to a closed hand (`len_div3 == 4`).
#[must_use]
pub fn calc_all(tiles: &[u8; KIND_COUNT], len_div3: u8) -> i8 {
    let mut shanten = calc_normal(tiles, len_div3);
    if shanten <= 0 || len_div3 < 4 {
        return shanten;
    }
    shanten = shanten.min(calc_chitoi(tiles));
    if shanten > 0 { shanten.min(calc_kokushi(tiles)) } else { shanten }
}

/// `len_div3` must be within [0, 4].
#[must_use]
pub fn calc_normal(tiles: &[u8; KIND_COUNT], len_div3: u8) -> i8 {
    let n = len_div3 as i8;
    let mut c = *tiles;
    let mut search = Search { n, best: 2 * n };
    search.dfs(&mut c, 0, 0, 0, false);
    for pair in 0..KIND_COUNT {
        if c[pair] >= 2 {
            c[pair] -= 2;
            search.dfs(&mut c, 0, 0, 0, true);
            c[pair] += 2;
        }
    }
    search.best
}

struct Search {
    n: i8,
    best: i8,
}

impl Search {
    fn dfs(&mut self, c: &mut [u8; KIND_COUNT], from: usize, mentsu: i8, taatsu: i8, pair: bool) {
        let Some(i) = (from..KIND_COUNT).find(|&i| c[i] > 0) else {
            let taatsu = taatsu.min(self.n - mentsu);
            self.best = self.best.min(2 * (self.n - mentsu) - taatsu - pair as i8);
            return;
        };

        if c[i] >= 3 {
            c[i] -= 3;
            self.dfs(c, i, mentsu + 1, taatsu, pair);
            c[i] += 3;
        }
        if can_shuntsu(c, i) {
            for k in i..i + 3 {
                c[k] -= 1;
            }
            self.dfs(c, i, mentsu + 1, taatsu, pair);
            for k in i..i + 3 {
                c[k] += 1;
            }
        }

        if mentsu + taatsu < self.n {
            if c[i] >= 2 {
                c[i] -= 2;
                self.dfs(c, i, mentsu, taatsu + 1, pair);
                c[i] += 2;
            }
            let is_suhai = i < 3 * 9;
            for gap in [1, 2] {
                if is_suhai && i % 9 + gap <= 8 && c[i + gap] > 0 {
                    c[i] -= 1;
                    c[i + gap] -= 1;
                    self.dfs(c, i, mentsu, taatsu + 1, pair);
                    c[i] += 1;
                    c[i + gap] += 1;
                }
            }
        }

        // leave one copy isolated
        c[i] -= 1;
        self.dfs(c, i, mentsu, taatsu, pair);
        c[i] += 1;
    }
}

#[must_use]
pub fn calc_chitoi(tiles: &[u8; KIND_COUNT]) -> i8 {
    let mut pairs = 0;
    let mut kinds = 0;
    for &c in tiles {
        if c > 0 {
            kinds += 1;
            if c >= 2 {
                pairs += 1;
            }
        }
    }
    let redunct = 7_i8.saturating_sub(kinds).max(0);
    6 - pairs + redunct
}

#[must_use]
pub fn calc_kokushi(tiles: &[u8; KIND_COUNT]) -> i8 {
    let mut kinds = 0;
    let mut has_pair = false;
    for k in tuz![1m, 9m, 1p, 9p, 1s, 9s, E, S, W, N, P, F, C] {
        if tiles[k] > 0 {
            kinds += 1;
            has_pair |= tiles[k] >= 2;
        }
    }
    13 - kinds - has_pair as i8
}
