//! Partitioning of concealed tiles into a pair plus groups.
//!
//! All searches run over `[u8; 34]` count arrays and always branch on the
//! lowest remaining kind, trying a triplet before a run. Fixing the lowest
//! kind means every partition is visited exactly once.
use super::len_div3;
use crate::hand::count_kinds;
use crate::meld::Meld;
use crate::tile::{KIND_COUNT, Tile, TileKind};

use serde::Serialize;
use tinyvec::ArrayVec;

const YAOKYUU: [usize; 13] = tuz![1m, 9m, 1p, 9p, 1s, 9s, E, S, W, N, P, F, C];

/// One standard partition of the concealed tiles. Melds are not included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Div {
    pub pair: TileKind,
    pub kotsu: ArrayVec<[TileKind; 4]>,
    /// Lowest tile of each run.
    pub shuntsu: ArrayVec<[TileKind; 4]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    Standard(Div),
    Chitoitsu([TileKind; 7]),
    Kokushi { pair: TileKind },
}

/// Whether the concealed tiles plus melds form a complete hand.
///
/// Any length other than `14 - 3 * melds.len()` gives `false`.
#[must_use]
pub fn is_winning_hand(tiles: &[Tile], melds: &[Meld]) -> bool {
    let Some(len_div3) = len_div3(melds) else {
        log::trace!("{} melds cannot form a hand", melds.len());
        return false;
    };
    if tiles.len() != len_div3 as usize * 3 + 2 {
        log::trace!("{} concealed tiles do not fit {} melds", tiles.len(), melds.len());
        return false;
    }
    is_agari(&count_kinds(tiles), len_div3)
}

/// `counts` must sum to `3 * len_div3 + 2`.
#[must_use]
pub fn is_agari(counts: &[u8; KIND_COUNT], len_div3: u8) -> bool {
    if len_div3 == 4 && (is_kokushi(counts) || is_chitoitsu(counts)) {
        return true;
    }
    let mut c = *counts;
    (0..KIND_COUNT).any(|pair| {
        if c[pair] < 2 {
            return false;
        }
        c[pair] -= 2;
        let ok = exhaust(&mut c, 0);
        c[pair] += 2;
        ok
    })
}

/// Thirteen orphans: all 13 terminal and honor kinds with one doubled, and
/// nothing else.
#[must_use]
pub fn is_kokushi(counts: &[u8; KIND_COUNT]) -> bool {
    let mut pairs = 0;
    for &k in &YAOKYUU {
        match counts[k] {
            1 => {}
            2 => pairs += 1,
            _ => return false,
        }
    }
    pairs == 1 && counts.iter().sum::<u8>() == 14
}

/// Seven distinct kinds, each held exactly twice.
#[must_use]
pub fn is_chitoitsu(counts: &[u8; KIND_COUNT]) -> bool {
    let mut pairs = 0;
    for &c in counts {
        match c {
            0 => {}
            2 => pairs += 1,
            _ => return false,
        }
    }
    pairs == 7
}

fn exhaust(c: &mut [u8; KIND_COUNT], from: usize) -> bool {
    let Some(i) = (from..KIND_COUNT).find(|&i| c[i] > 0) else {
        return true;
    };
    if c[i] >= 3 {
        c[i] -= 3;
        let ok = exhaust(c, i);
        c[i] += 3;
        if ok {
            return true;
        }
    }
    if can_shuntsu(c, i) {
        take_shuntsu(c, i);
        let ok = exhaust(c, i);
        put_shuntsu(c, i);
        if ok {
            return true;
        }
    }
    false
}

#[inline]
pub(crate) fn can_shuntsu(c: &[u8; KIND_COUNT], i: usize) -> bool {
    i < 3 * 9 && i % 9 <= 6 && c[i] > 0 && c[i + 1] > 0 && c[i + 2] > 0
}

#[inline]
fn take_shuntsu(c: &mut [u8; KIND_COUNT], i: usize) {
    c[i] -= 1;
    c[i + 1] -= 1;
    c[i + 2] -= 1;
}

#[inline]
fn put_shuntsu(c: &mut [u8; KIND_COUNT], i: usize) {
    c[i] += 1;
    c[i + 1] += 1;
    c[i + 2] += 1;
}

/// Every way to read `counts` as a complete hand.
///
/// Seven pairs and thirteen orphans are only considered when
/// `len_div3 == 4`. An empty result means the tiles do not win.
#[must_use]
pub fn shapes(counts: &[u8; KIND_COUNT], len_div3: u8) -> Vec<Shape> {
    let mut ret = vec![];
    if len_div3 == 4 {
        if is_kokushi(counts) {
            if let Some(pair) = YAOKYUU.iter().find(|&&k| counts[k] == 2) {
                ret.push(Shape::Kokushi { pair: must_tile!(*pair) });
            }
            return ret;
        }
        if is_chitoitsu(counts) {
            let mut pairs = [TileKind::default(); 7];
            let kinds = (0..KIND_COUNT).filter(|&k| counts[k] == 2);
            for (slot, k) in pairs.iter_mut().zip(kinds) {
                *slot = must_tile!(k);
            }
            ret.push(Shape::Chitoitsu(pairs));
        }
    }

    let mut c = *counts;
    for pair in 0..KIND_COUNT {
        if c[pair] < 2 {
            continue;
        }
        c[pair] -= 2;
        let mut div = Div {
            pair: must_tile!(pair),
            ..Div::default()
        };
        collect_divs(&mut c, 0, &mut div, &mut ret);
        c[pair] += 2;
    }
    ret
}

fn collect_divs(c: &mut [u8; KIND_COUNT], from: usize, div: &mut Div, out: &mut Vec<Shape>) {
    let Some(i) = (from..KIND_COUNT).find(|&i| c[i] > 0) else {
        out.push(Shape::Standard(*div));
        return;
    };
    if div.kotsu.len() + div.shuntsu.len() == 4 {
        return;
    }
    if c[i] >= 3 {
        c[i] -= 3;
        div.kotsu.push(must_tile!(i));
        collect_divs(c, i, div, out);
        div.kotsu.pop();
        c[i] += 3;
    }
    if can_shuntsu(c, i) {
        take_shuntsu(c, i);
        div.shuntsu.push(must_tile!(i));
        collect_divs(c, i, div, out);
        div.shuntsu.pop();
        put_shuntsu(c, i);
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::hand::{hand, parse_tiles};
    use crate::meld::MeldKind;

    fn standard(counts: &[u8; KIND_COUNT], len_div3: u8) -> Vec<Div> {
        shapes(counts, len_div3)
            .into_iter()
            .filter_map(|s| match s {
                Shape::Standard(div) => Some(div),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn winning_shapes() {
        let yes = [
            "123m 456p 789s 234m 55p",
            "111222333m 789s 11z",
            "1112345678999m 5m",
            "11223344556677z",
            "119m 19p 19s 1234567z",
            "22334455m 667788p",
        ];
        for s in yes {
            let tiles = parse_tiles(s).unwrap();
            assert!(is_winning_hand(&tiles, &[]), "{s}");
        }
        let no = [
            "123m 456p 789s 234m 56p",
            "1133557m 2244668p",
            "159m 19p 19s 1234566z",
            "1112345678999m 1p",
        ];
        for s in no {
            let tiles = parse_tiles(s).unwrap();
            assert!(!is_winning_hand(&tiles, &[]), "{s}");
        }
    }

    #[test]
    fn chitoitsu_needs_distinct_pairs() {
        // four of a kind never makes two pairs
        let c = hand("1111m 2233p 4455s 66z").unwrap();
        assert!(!is_chitoitsu(&c));
        assert!(!is_agari(&c, 4));
        let c = hand("111m 2233p 4455s 667z").unwrap();
        assert!(!is_chitoitsu(&c));
    }

    #[test]
    fn with_melds() {
        let pon = Meld::new(MeldKind::Pon, &parse_tiles("CCC").unwrap(), 2).unwrap();
        let chi = Meld::new(MeldKind::Chi, &parse_tiles("789p").unwrap(), 3).unwrap();
        let tiles = parse_tiles("234m 55s 678s").unwrap();
        assert!(is_winning_hand(&tiles, &[pon, chi]));
        assert!(!is_winning_hand(&tiles, &[pon]));
        assert!(!is_winning_hand(&tiles[..7], &[pon, chi]));

        // one tile plus four melds is never complete
        let quads = [Meld::ankan(t!(1m)).unwrap(); 4];
        assert!(!is_winning_hand(&parse_tiles("E").unwrap(), &quads));
        let five = [pon; 5];
        assert!(!is_winning_hand(&[], &five));
    }

    #[test]
    fn enumerates_every_partition() {
        // 111222333m reads as three triplets or three identical runs
        let c = hand("111222333m 789s 11z").unwrap();
        let divs = standard(&c, 4);
        assert_eq!(divs.len(), 2);
        assert!(divs.iter().any(|d| d.kotsu.len() == 3));
        assert!(divs.iter().any(|d| d.shuntsu.len() == 4));

        // ryanpeikou also reads as seven pairs
        let c = hand("223344m 667788p 55s").unwrap();
        let all = shapes(&c, 4);
        assert!(all.iter().any(|s| matches!(s, Shape::Chitoitsu(_))));
        assert_eq!(standard(&c, 4).len(), 1);

        let c = hand("1112345678999m 5m").unwrap();
        assert_eq!(standard(&c, 4).len(), 1);

        let c = hand("159m 19p 19s 1234566z").unwrap();
        assert!(shapes(&c, 4).is_empty());
        let c = hand("19m 19p 19s 1234567z 1m").unwrap();
        assert_eq!(shapes(&c, 4), vec![Shape::Kokushi { pair: t!(1m) }]);
    }

    #[test]
    fn by_construction() {
        // every hand made of four groups plus a pair wins
        let groups = tuz![1m, 5m, 7p, 2s, 6s];
        for &a in &groups {
            for &b in &groups {
                for pair in tuz![E, 9p] {
                    let mut c = [0; KIND_COUNT];
                    for s in [a, b] {
                        c[s] += 1;
                        c[s + 1] += 1;
                        c[s + 2] += 1;
                    }
                    c[tuz!(P)] += 3;
                    c[tuz!(3p)] += 3;
                    c[pair] += 2;
                    assert!(is_agari(&c, 4), "{c:?}");
                    // a lone honor can never be grouped
                    c[pair] -= 1;
                    c[tuz!(N)] += 1;
                    assert!(!is_agari(&c, 4), "{c:?}");
                }
            }
        }
    }
}
