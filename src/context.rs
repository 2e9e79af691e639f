use crate::tile::{TileKind, Wind};

use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// Situational facts about a win, built fresh by the caller for every
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct ScoringContext {
    pub bakaze: Wind,
    pub jikaze: Wind,
    #[derivative(Default(value = "true"))]
    pub is_oya: bool,
    pub is_tsumo: bool,

    pub riichi: bool,
    /// Implies `riichi`.
    pub double_riichi: bool,
    pub ippatsu: bool,
    /// Win on the replacement draw after a kan.
    pub rinshan: bool,
    /// The wall is exhausted: haitei on tsumo, houtei on ron.
    pub is_last_tile: bool,
    /// Ron on a tile added to a pon.
    pub chankan: bool,

    /// Dora, ura dora and red fives, counted by the caller. Only added when
    /// the hand has a yaku.
    pub dora_count: u8,
    /// Falls back to the last concealed tile when `None`.
    pub winning_tile: Option<TileKind>,
}

impl ScoringContext {
    /// Ron by the player sitting at `jikaze`; East is the dealer.
    #[must_use]
    pub fn ron(bakaze: Wind, jikaze: Wind) -> Self {
        Self {
            bakaze,
            jikaze,
            is_oya: jikaze == Wind::East,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tsumo(bakaze: Wind, jikaze: Wind) -> Self {
        Self {
            is_tsumo: true,
            ..Self::ron(bakaze, jikaze)
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_ron(&self) -> bool {
        !self.is_tsumo
    }

    #[inline]
    #[must_use]
    pub const fn is_riichi(&self) -> bool {
        self.riichi || self.double_riichi
    }

    #[must_use]
    pub const fn with_winning_tile(mut self, tile: TileKind) -> Self {
        self.winning_tile = Some(tile);
        self
    }
}
