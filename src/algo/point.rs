//! Base points and the final point transfer.
use crate::rule::Rule;

use serde::Serialize;

/// Base points of mangan.
pub const MANGAN_BASE: i32 = 2000;

/// Point transfer of a win.
///
/// For a dealer win `tsumo_oya` is 0 and `tsumo_ko` is paid by each of the
/// three other players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Point {
    pub ron: i32,
    pub tsumo_oya: i32,
    pub tsumo_ko: i32,
}

/// Named limit tiers, each with a fixed base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Limit {
    Mangan,
    Haneman,
    Baiman,
    Sanbaiman,
    /// 13 han or more without a yakuman, when the rule counts it as one.
    KazoeYakuman,
    Yakuman,
}

impl Limit {
    /// Tier reached by a normal hand, if any.
    #[must_use]
    pub fn of(han: u8, fu: u8, rule: &Rule) -> Option<Self> {
        let tier = match han {
            13.. if rule.kazoe_yakuman => Self::KazoeYakuman,
            11.. => Self::Sanbaiman,
            8..=10 => Self::Baiman,
            6..=7 => Self::Haneman,
            5 => Self::Mangan,
            _ => {
                let base = fu_base(han, fu);
                if base >= MANGAN_BASE || rule.kiriage_mangan && base >= 1920 {
                    Self::Mangan
                } else {
                    return None;
                }
            }
        };
        Some(tier)
    }

    #[must_use]
    pub const fn base(self) -> i32 {
        match self {
            Self::Mangan => MANGAN_BASE,
            Self::Haneman => 3000,
            Self::Baiman => 4000,
            Self::Sanbaiman => 6000,
            Self::KazoeYakuman | Self::Yakuman => 8000,
        }
    }
}

#[inline]
const fn fu_base(han: u8, fu: u8) -> i32 {
    (fu as i32) << (han + 2)
}

#[inline]
const fn ceil100(v: i32) -> i32 {
    (v + 99) / 100 * 100
}

/// Base points of a normal hand under `rule`.
#[must_use]
pub fn base_points(han: u8, fu: u8, rule: &Rule) -> i32 {
    match Limit::of(han, fu, rule) {
        Some(limit) => limit.base(),
        None => fu_base(han, fu),
    }
}

/// Points of a single payment: the ron payment, or on a tsumo the amount
/// each non-dealer pays. A non-dealer tsumo costs the dealer twice this.
///
/// ```
/// use tenpai::calculate_score;
/// assert_eq!(calculate_score(3, 40, false, true), 1300);
/// assert_eq!(calculate_score(3, 40, true, false), 7700);
/// assert_eq!(calculate_score(5, 0, false, false), 8000);
/// ```
#[must_use]
pub fn calculate_score(han: u8, fu: u8, is_dealer: bool, is_tsumo: bool) -> i32 {
    let base = base_points(han, fu, &Rule::default());
    let factor = match (is_dealer, is_tsumo) {
        (true, true) => 2,
        (true, false) => 6,
        (false, true) => 1,
        (false, false) => 4,
    };
    ceil100(base * factor)
}

impl Point {
    /// Under the default rule.
    #[must_use]
    pub fn calc(is_oya: bool, fu: u8, han: u8) -> Self {
        Self::calc_with_rule(is_oya, fu, han, &Rule::default())
    }

    #[must_use]
    pub fn calc_with_rule(is_oya: bool, fu: u8, han: u8, rule: &Rule) -> Self {
        Self::from_base(is_oya, base_points(han, fu, rule))
    }

    /// `n` stacked yakuman.
    #[must_use]
    pub const fn yakuman(is_oya: bool, n: i32) -> Self {
        Self::from_base(is_oya, 8000 * n)
    }

    const fn from_base(is_oya: bool, base: i32) -> Self {
        if is_oya {
            Self {
                ron: ceil100(base * 6),
                tsumo_oya: 0,
                tsumo_ko: ceil100(base * 2),
            }
        } else {
            Self {
                ron: ceil100(base * 4),
                tsumo_oya: ceil100(base * 2),
                tsumo_ko: ceil100(base),
            }
        }
    }

    /// Everything the winner collects on a tsumo.
    #[must_use]
    pub const fn tsumo_total(&self, is_oya: bool) -> i32 {
        if is_oya {
            self.tsumo_ko * 3
        } else {
            self.tsumo_oya + self.tsumo_ko * 2
        }
    }
}
