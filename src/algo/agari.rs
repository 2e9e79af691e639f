//! Winning hand evaluation: shape, yaku, fu, dora and points together.
use super::decompose::is_winning_hand;
use super::point::{Limit, Point};
use super::yaku::{Evaluator, YakuEntry};
use crate::context::ScoringContext;
use crate::meld::Meld;
use crate::rule::Rule;
use crate::tile::Tile;
use std::cmp::Ordering;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Eq, Serialize)]
pub enum Agari {
    /// `fu` is irrelevant from 5 han up but is still reported.
    Normal { fu: u8, han: u8 },
    /// Number of stacked yakuman.
    Yakuman(u8),
}

/// A scored win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgariResult {
    pub agari: Agari,
    pub yaku: Vec<YakuEntry>,
    /// Dora han included in `agari`. Always 0 for yakuman.
    pub dora: u8,
    pub point: Point,
    pub limit: Option<Limit>,
}

#[derive(Debug, Clone, Copy)]
pub struct AgariCalculator<'a> {
    /// Concealed tiles including the winning tile, 3n+2.
    pub tehai: &'a [Tile],
    pub melds: &'a [Meld],
    pub ctx: &'a ScoringContext,
    pub rule: &'a Rule,
}

impl PartialEq for Agari {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Agari {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Agari {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Yakuman(l), Self::Yakuman(r)) => l.cmp(r),
            (Self::Yakuman(_), Self::Normal { .. }) => Ordering::Greater,
            (Self::Normal { .. }, Self::Yakuman(_)) => Ordering::Less,
            (Self::Normal { fu: lf, han: lh }, Self::Normal { fu: rf, han: rh }) => {
                lh.cmp(rh).then(lf.cmp(rf))
            }
        }
    }
}

impl Agari {
    /// Under the default rule.
    #[must_use]
    pub fn point(self, is_oya: bool) -> Point {
        self.point_with_rule(is_oya, &Rule::default())
    }

    #[must_use]
    pub fn point_with_rule(self, is_oya: bool, rule: &Rule) -> Point {
        match self {
            Self::Normal { fu, han } => Point::calc_with_rule(is_oya, fu, han, rule),
            Self::Yakuman(n) => Point::yakuman(is_oya, n as i32),
        }
    }

    #[must_use]
    pub fn limit(self, rule: &Rule) -> Option<Limit> {
        match self {
            Self::Normal { fu, han } => Limit::of(han, fu, rule),
            Self::Yakuman(_) => Some(Limit::Yakuman),
        }
    }
}

impl AgariCalculator<'_> {
    #[inline]
    #[must_use]
    pub fn has_yaku(&self) -> bool {
        self.search_yakus().is_some()
    }

    /// Best reading without dora. `None` if the hand does not win or has no
    /// yaku.
    #[must_use]
    pub fn search_yakus(&self) -> Option<Agari> {
        self.search_yakus_with_names().map(|(agari, _)| agari)
    }

    #[must_use]
    pub fn search_yakus_with_names(&self) -> Option<(Agari, Vec<YakuEntry>)> {
        Evaluator::new(self.tehai, self.melds, self.ctx, self.rule)?.best()
    }

    /// Full evaluation. Dora from the context is added only when a yaku
    /// holds, and never to yakuman.
    #[must_use]
    pub fn agari(&self) -> Option<AgariResult> {
        let Some((agari, yaku)) = self.search_yakus_with_names() else {
            log::debug!("no yaku in {} concealed tiles", self.tehai.len());
            return None;
        };
        let (agari, dora) = match agari {
            Agari::Normal { fu, han } => {
                let dora = self.ctx.dora_count;
                (Agari::Normal { fu, han: han.saturating_add(dora) }, dora)
            }
            Agari::Yakuman(_) => (agari, 0),
        };
        Some(AgariResult {
            agari,
            yaku,
            dora,
            point: agari.point_with_rule(self.ctx.is_oya, self.rule),
            limit: agari.limit(self.rule),
        })
    }
}

/// Whether the hand may be declared as a win: a complete shape and at least
/// one yaku under the default rule. Dora alone is not enough.
#[must_use]
pub fn should_win(tiles: &[Tile], melds: &[Meld], ctx: &ScoringContext) -> bool {
    if !is_winning_hand(tiles, melds) {
        log::debug!("not a winning shape");
        return false;
    }
    let rule = Rule::default();
    let calc = AgariCalculator {
        tehai: tiles,
        melds,
        ctx,
        rule: &rule,
    };
    if !calc.has_yaku() {
        log::debug!("winning shape without yaku");
        return false;
    }
    true
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::algo::point::calculate_score;
    use crate::algo::yaku::Yaku;
    use crate::hand::{Hand, parse_tiles};
    use crate::meld::MeldKind;
    use crate::tile::Wind::{self, East as E, North as N, South as S};
    use std::thread;

    fn search(s: &str, melds: &[Meld], ctx: ScoringContext) -> Option<Agari> {
        let tiles = parse_tiles(s).unwrap();
        let rule = Rule::default();
        AgariCalculator {
            tehai: &tiles,
            melds,
            ctx: &ctx,
            rule: &rule,
        }
        .search_yakus()
    }

    fn han(s: &str, melds: &[Meld], ctx: ScoringContext) -> u8 {
        match search(s, melds, ctx) {
            Some(Agari::Normal { han, .. }) => han,
            other => panic!("{s}: {other:?}"),
        }
    }

    fn meld(kind: MeldKind, s: &str) -> Meld {
        Meld::new(kind, &parse_tiles(s).unwrap(), 1).unwrap()
    }

    const fn normal(fu: u8, han: u8) -> Option<Agari> {
        Some(Agari::Normal { fu, han })
    }

    #[test]
    fn ordering() {
        let mut v = vec![
            Agari::Normal { fu: 40, han: 3 },
            Agari::Yakuman(1),
            Agari::Normal { fu: 110, han: 2 },
            Agari::Normal { fu: 30, han: 3 },
            Agari::Yakuman(2),
        ];
        v.sort();
        assert_eq!(v, [
            Agari::Normal { fu: 110, han: 2 },
            Agari::Normal { fu: 30, han: 3 },
            Agari::Normal { fu: 40, han: 3 },
            Agari::Yakuman(1),
            Agari::Yakuman(2),
        ]);
    }

    #[test]
    fn agari_calc() {
        assert_eq!(search("2234455m 234p 234s 3m", &[], ScoringContext::ron(E, S)), normal(40, 4));
        assert_eq!(search("2255m 445p 667788s 5p", &[], ScoringContext::ron(E, S)), normal(25, 3));
        assert_eq!(normal(25, 3).unwrap().point(false).ron, 3200);

        let chis = [meld(MeldKind::Chi, "234s"), meld(MeldKind::Chi, "234s")];
        assert_eq!(search("22334m 33p 4m", &chis, ScoringContext::ron(E, S)), normal(30, 1));

        // menzen tsumo on top of tanyao and ryanpeikou
        let tsumo = ScoringContext::tsumo(S, N);
        assert_eq!(search("223344p 667788s 3m 3m", &[], tsumo), normal(30, 5));
        assert_eq!(search("234678m 1123488p 8p", &[], ScoringContext::ron(E, E)), None);
        assert_eq!(search("223344999m 1188p 8p", &[], ScoringContext::ron(E, E)), normal(40, 1));

        let ankan = [Meld::ankan(t!(9m)).unwrap()];
        assert_eq!(search("223344m 1188p 8p", &ankan, ScoringContext::ron(E, E)), normal(70, 1));

        // suuankou on tsumo, sanankou toitoi when the ron breaks a triplet
        let ankan = [Meld::ankan(t!(9s)).unwrap()];
        assert_eq!(
            search("55566677m 11p 7m", &ankan, ScoringContext::tsumo(E, E)),
            Some(Agari::Yakuman(1))
        );
        assert_eq!(search("55566677m 11p 7m", &ankan, ScoringContext::ron(E, E)), normal(80, 4));

        let ctx = ScoringContext::ron(E, E).with_winning_tile(t!(8m));
        assert_eq!(search("666677778888m 99p", &[], ctx), normal(30, 4));
        let ctx = ScoringContext::ron(E, E).with_winning_tile(t!(7m));
        assert_eq!(search("666677778888m 99p", &[], ctx), normal(40, 3));

        let ankan = [Meld::ankan(t!(9p)).unwrap()];
        assert_eq!(search("12345678m 11p 9m", &ankan, ScoringContext::ron(E, E)), normal(70, 2));
        let pon = [meld(MeldKind::Pon, "999p")];
        assert_eq!(search("12345678m 11p 9m", &pon, ScoringContext::ron(E, E)), normal(30, 1));

        let tsumo = ScoringContext::tsumo(E, E);
        assert_eq!(search("111222333m 67p 88s 8p", &[], tsumo), normal(40, 3));
        // suuankou stands alone even with daisuushii and tsuuiisou
        assert_eq!(
            search("1112223334447z 7z", &[], ScoringContext::ron(E, E)),
            Some(Agari::Yakuman(1))
        );

        let chis = [meld(MeldKind::Chi, "789m"), meld(MeldKind::Chi, "123s")];
        assert_eq!(search("1m 789p 789s 1m", &chis, ScoringContext::tsumo(E, E)), normal(30, 3));
        assert_eq!(search("111444m 45556s 22z 5s", &[], ScoringContext::ron(S, S)), normal(60, 2));

        let melds = [meld(MeldKind::Chi, "123p"), meld(MeldKind::Pon, "NNN")];
        assert_eq!(search("999s 1777z 1z", &melds, ScoringContext::ron(S, S)), normal(50, 2));

        let melds = [
            meld(MeldKind::Pon, "SSS"),
            meld(MeldKind::Pon, "CCC"),
            Meld::ankan(t!(N)).unwrap(),
        ];
        assert_eq!(search("1119m 9m", &melds, ScoringContext::ron(S, N)), normal(70, 9));

        assert_eq!(han("1233334567888m 9m", &[], ScoringContext::ron(E, E)), 8);
        assert_eq!(han("2344445666678p 5p", &[], ScoringContext::ron(E, E)), 7);
        let chi = [meld(MeldKind::Chi, "789s")];
        assert_eq!(han("2223445566s 1s", &chi, ScoringContext::ron(E, E)), 6);

        assert_eq!(search("1123444m 111p 111s 1m", &[], ScoringContext::ron(E, E)), normal(60, 2));
        // a terminal pair does not break pinfu
        let ctx = ScoringContext {
            riichi: true,
            ..ScoringContext::tsumo(E, S)
        };
        assert_eq!(search("123m 456p 789s 23s 99m 4s", &[], ctx), normal(20, 3));
        assert_eq!(han("111s 2225556677z 7z", &[], ScoringContext::ron(S, S)), 15);
    }

    #[test]
    fn full_result() {
        let rule = Rule::default();
        let tiles = parse_tiles("12334m 345p 22s 777z 2m").unwrap();
        let ctx = ScoringContext {
            riichi: true,
            ..ScoringContext::tsumo(E, E).with_winning_tile(t!(3m))
        };
        let calc = AgariCalculator {
            tehai: &tiles,
            melds: &[],
            ctx: &ctx,
            rule: &rule,
        };
        let res = calc.agari().unwrap();
        assert_eq!(res.agari, Agari::Normal { fu: 40, han: 3 });
        assert_eq!(res.point, Point { ron: 7700, tsumo_oya: 0, tsumo_ko: 2600 });
        assert_eq!(res.limit, None);

        // riichi tsumo tanyao, 40 fu, then with two dora
        let tiles = parse_tiles("222m 345m 678p 888s 55p").unwrap();
        let ctx = ScoringContext {
            riichi: true,
            ..ScoringContext::tsumo(E, S).with_winning_tile(t!(4m))
        };
        let calc = AgariCalculator {
            tehai: &tiles,
            melds: &[],
            ctx: &ctx,
            rule: &rule,
        };
        let res = calc.agari().unwrap();
        assert_eq!(res.agari, Agari::Normal { fu: 40, han: 3 });
        let names: Vec<_> = res.yaku.iter().map(|e| e.yaku).collect();
        assert_eq!(names, [Yaku::Riichi, Yaku::MenzenTsumo, Yaku::Tanyao]);
        assert_eq!(res.point.tsumo_ko, calculate_score(3, 40, false, true));
        assert_eq!(res.point.tsumo_ko, 1300);
        assert_eq!(res.point.tsumo_oya, 2600);

        let with_dora = ScoringContext { dora_count: 2, ..ctx };
        let calc = AgariCalculator { ctx: &with_dora, ..calc };
        let res = calc.agari().unwrap();
        assert_eq!(res.agari, Agari::Normal { fu: 40, han: 5 });
        assert_eq!(res.dora, 2);
        assert_eq!(res.limit, Some(Limit::Mangan));
        assert_eq!(res.point.tsumo_total(false), 8000);

        // kazoe yakuman
        let tiles = parse_tiles("111s 2225556677z 7z").unwrap();
        let ctx = ScoringContext::ron(S, S);
        let calc = AgariCalculator {
            tehai: &tiles,
            melds: &[],
            ctx: &ctx,
            rule: &rule,
        };
        let res = calc.agari().unwrap();
        assert_eq!(res.limit, Some(Limit::KazoeYakuman));
        assert_eq!(res.point.ron, 32000);
        let no_kazoe = Rule {
            kazoe_yakuman: false,
            ..rule
        };
        let res = AgariCalculator { rule: &no_kazoe, ..calc }.agari().unwrap();
        assert_eq!(res.limit, Some(Limit::Sanbaiman));
        assert_eq!(res.point.ron, 24000);

        // yakuman ignores dora and stack when suuankou is absent
        let tiles = parse_tiles("PPP FFF CCC SS").unwrap();
        let pon = [meld(MeldKind::Pon, "EEE")];
        let ctx = ScoringContext {
            dora_count: 3,
            ..ScoringContext::ron(E, E)
        };
        let calc = AgariCalculator {
            tehai: &tiles,
            melds: &pon,
            ctx: &ctx,
            rule: &rule,
        };
        let res = calc.agari().unwrap();
        assert_eq!(res.agari, Agari::Yakuman(2));
        let names: Vec<_> = res.yaku.iter().map(|e| e.yaku).collect();
        assert_eq!(names, [Yaku::Daisangen, Yaku::Tsuuiisou]);
        assert_eq!(res.dora, 0);
        assert_eq!(res.limit, Some(Limit::Yakuman));
        assert_eq!(res.point.ron, 96_000);
    }

    #[test]
    fn dora_saturates() {
        let rule = Rule::default();
        let tiles = parse_tiles("123m 456p 789s 234m 55p").unwrap();
        let ctx = ScoringContext {
            riichi: true,
            dora_count: u8::MAX,
            ..ScoringContext::ron(E, S)
        };
        let res = AgariCalculator {
            tehai: &tiles,
            melds: &[],
            ctx: &ctx,
            rule: &rule,
        }
        .agari()
        .unwrap();
        assert_eq!(res.agari, Agari::Normal { fu: 40, han: u8::MAX });
        assert_eq!(res.limit, Some(Limit::KazoeYakuman));
        assert_eq!(res.point.ron, 32000);
    }

    #[test]
    fn should_win_needs_yaku() {
        let tiles = parse_tiles("123m 456p 789s 234m 55p").unwrap();
        let ctx = ScoringContext::ron(E, S);
        assert!(is_winning_hand(&tiles, &[]));
        assert!(!should_win(&tiles, &[], &ctx));

        let dora_only = ScoringContext { dora_count: 4, ..ctx };
        assert!(!should_win(&tiles, &[], &dora_only));

        let riichi = ScoringContext { riichi: true, ..ctx };
        assert!(should_win(&tiles, &[], &riichi));

        assert!(!should_win(&tiles[..13], &[], &riichi));
    }

    #[test]
    fn hand_snapshot() {
        // ids clear of the 9m pair in the concealed part
        let tiles = [27, 31, 35].map(|id| Tile::new(id, false).unwrap());
        let chi = Meld::new(MeldKind::Chi, &tiles, 3).unwrap();
        let hand = Hand::parse("123m 456m EEE 99m", &[chi]).unwrap();
        assert!(hand.is_agari());
        assert!(!hand.is_menzen());
        let res = hand.agari(&ScoringContext::ron(E, S), &Rule::default()).unwrap();
        // bakaze, ittsuu and honitsu; EEE 8 + tanki 2
        assert_eq!(res.agari, Agari::Normal { fu: 30, han: 4 });

        // a hand's own riichi flag counts as riichi
        let hand = Hand::parse("123m 456p 789s 234m 55p", &[]).unwrap().with_riichi(None);
        let res = hand.agari(&ScoringContext::ron(E, S), &Rule::default()).unwrap();
        assert_eq!(res.yaku[0].yaku, Yaku::Riichi);
    }

    #[test]
    fn concurrent_evaluation() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Hand>();
        assert_send_sync::<ScoringContext>();
        assert_send_sync::<Rule>();
        assert_send_sync::<AgariResult>();

        let tiles = parse_tiles("2234455m 234p 234s 3m").unwrap();
        let ctx = ScoringContext::ron(Wind::East, Wind::South);
        let rule = Rule::default();
        let calc = AgariCalculator {
            tehai: &tiles,
            melds: &[],
            ctx: &ctx,
            rule: &rule,
        };
        let expected = calc.agari();
        thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| calc.agari())).collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }
}
