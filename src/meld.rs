use crate::tile::{Tile, TileKind};

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Deserializer, Serialize, de};
use tinyvec::ArrayVec;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    #[default]
    Chi,
    Pon,
    /// Open quad, either called from a discard or added to a pon.
    Minkan,
    Ankan,
}

/// A declared group.
///
/// `target` is the relative seat the tile was called from (1 = kamicha,
/// 2 = toimen, 3 = shimocha) and is 0 for an ankan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Meld {
    kind: MeldKind,
    tiles: ArrayVec<[Tile; 4]>,
    target: u8,
}

#[derive(Deserialize)]
struct RawMeld {
    kind: MeldKind,
    tiles: Vec<Tile>,
    #[serde(default)]
    target: u8,
}

impl MeldKind {
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Ankan)
    }

    #[inline]
    #[must_use]
    pub const fn is_quad(self) -> bool {
        matches!(self, Self::Minkan | Self::Ankan)
    }
}

impl Meld {
    pub fn new(kind: MeldKind, tiles: &[Tile], target: u8) -> Result<Self> {
        let need = if kind.is_quad() { 4 } else { 3 };
        ensure!(tiles.len() == need, "{kind:?} needs {need} tiles, got {}", tiles.len());
        match kind {
            MeldKind::Ankan => ensure!(target == 0, "ankan has no source seat"),
            _ => ensure!((1..=3).contains(&target), "invalid source seat {target} for {kind:?}"),
        }

        let mut sorted: ArrayVec<[Tile; 4]> = tiles.iter().copied().collect();
        sorted.sort_unstable_by_key(|t| t.id());
        for w in sorted.windows(2) {
            ensure!(w[0].id() != w[1].id(), "duplicate tile {} in meld", w[0]);
        }

        let first = sorted[0].kind();
        match kind {
            MeldKind::Chi => {
                if first.is_jihai() {
                    bail!("chi cannot contain honors");
                }
                let consecutive = sorted
                    .iter()
                    .enumerate()
                    .all(|(i, t)| t.kind().as_usize() == first.as_usize() + i);
                ensure!(
                    consecutive && first.as_usize() % 9 <= 6,
                    "chi must be three consecutive tiles of one suit"
                );
            }
            _ => ensure!(
                sorted.iter().all(|t| t.kind() == first),
                "{kind:?} must be tiles of a single kind"
            ),
        }

        Ok(Self { kind, tiles: sorted, target })
    }

    /// Concealed quad made from `kind`, red five included where applicable.
    pub fn ankan(kind: TileKind) -> Result<Self> {
        let tiles: Vec<_> = (0..4)
            .map(|i| Tile::new(kind.as_u8() * 4 + i, i == 0 && kind.rank() == Some(5)))
            .collect::<Result<_>>()?;
        Self::new(MeldKind::Ankan, &tiles, 0)
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> MeldKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.kind.is_open()
    }

    #[inline]
    #[must_use]
    pub const fn is_quad(&self) -> bool {
        self.kind.is_quad()
    }

    /// Lowest kind in the meld. For pon and kan this is the only kind.
    #[inline]
    #[must_use]
    pub fn base(&self) -> TileKind {
        self.tiles[0].kind()
    }

    #[inline]
    #[must_use]
    pub fn is_chi(&self) -> bool {
        self.kind == MeldKind::Chi
    }
}

impl<'de> Deserialize<'de> for Meld {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawMeld::deserialize(deserializer)?;
        Self::new(raw.kind, &raw.tiles, raw.target).map_err(de::Error::custom)
    }
}
