use crate::meld::Meld;
use crate::tile::{Tile, TileKind};

/// The dora pointed to by an indicator: 9 wraps to 1 within a suit, winds
/// cycle E→S→W→N→E and dragons P→F→C→P.
#[inline]
#[must_use]
pub const fn indicator_to_dora(indicator: TileKind) -> TileKind {
    indicator.next()
}

fn all_tiles<'a>(tiles: &'a [Tile], melds: &'a [Meld]) -> impl Iterator<Item = Tile> + 'a {
    tiles
        .iter()
        .copied()
        .chain(melds.iter().flat_map(|m| m.tiles().iter().copied()))
}

/// Dora from `indicators` held across the concealed tiles and melds. An
/// indicator listed twice counts twice.
#[must_use]
pub fn count_dora(tiles: &[Tile], melds: &[Meld], indicators: &[TileKind]) -> u8 {
    indicators
        .iter()
        .map(|&ind| {
            let dora = indicator_to_dora(ind);
            all_tiles(tiles, melds).filter(|t| t.kind() == dora).count() as u8
        })
        .sum()
}

/// Red fives held across the concealed tiles and melds.
#[must_use]
pub fn count_aka(tiles: &[Tile], melds: &[Meld]) -> u8 {
    all_tiles(tiles, melds).filter(|t| t.is_red()).count() as u8
}
