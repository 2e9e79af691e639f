use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Error, Result, bail, ensure};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// Number of distinct tile kinds.
pub const KIND_COUNT: usize = 34;
/// Number of physical tiles in a full set.
pub const TILE_COUNT: usize = 136;

const SUIT_CHARS: [char; 3] = ['m', 'p', 's'];
const HONOR_CHARS: [char; 7] = ['E', 'S', 'W', 'N', 'P', 'F', 'C'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Man,
    Pin,
    Sou,
    Honor,
}

/// Honor classes, in dora order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Honor {
    East,
    South,
    West,
    North,
    White,
    Green,
    Red,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wind {
    #[default]
    East,
    South,
    West,
    North,
}

/// A tile type, used for counting and matching.
///
/// Red fives share their kind with the plain five of the same suit.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct TileKind(u8);

/// One physical tile.
///
/// `id` is the global numbering in 0..136, four consecutive ids per kind.
/// Label and glyph are derived from the kind and the red flag.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    id: u8,
    red: bool,
}

/// Unchecked wire form of [`Tile`].
#[derive(Deserialize)]
struct RawTile {
    id: u8,
    #[serde(default)]
    red: bool,
}

impl Suit {
    #[inline]
    #[must_use]
    pub const fn is_numbered(self) -> bool {
        !matches!(self, Self::Honor)
    }
}

impl Honor {
    #[inline]
    #[must_use]
    pub const fn is_wind(self) -> bool {
        matches!(self, Self::East | Self::South | Self::West | Self::North)
    }

    #[inline]
    #[must_use]
    pub const fn is_dragon(self) -> bool {
        !self.is_wind()
    }
}

impl Wind {
    #[inline]
    #[must_use]
    pub const fn kind(self) -> TileKind {
        TileKind(tu8!(E) + self as u8)
    }
}

impl TileKind {
    /// The caller must make sure `id < 34`.
    #[inline]
    #[must_use]
    pub const fn new_unchecked(id: u8) -> Self {
        debug_assert!((id as usize) < KIND_COUNT);
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..KIND_COUNT as u8).map(Self)
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        match self.0 / 9 {
            0 => Suit::Man,
            1 => Suit::Pin,
            2 => Suit::Sou,
            _ => Suit::Honor,
        }
    }

    /// 1..=9 for numbered tiles.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        if self.is_jihai() { None } else { Some(self.0 % 9 + 1) }
    }

    #[must_use]
    pub const fn honor(self) -> Option<Honor> {
        Some(match self.0 {
            27 => Honor::East,
            28 => Honor::South,
            29 => Honor::West,
            30 => Honor::North,
            31 => Honor::White,
            32 => Honor::Green,
            33 => Honor::Red,
            _ => return None,
        })
    }

    #[inline]
    #[must_use]
    pub const fn is_jihai(self) -> bool {
        self.0 >= 3 * 9
    }

    #[inline]
    #[must_use]
    pub const fn is_wind(self) -> bool {
        matches_tu8!(self.0, E | S | W | N)
    }

    #[inline]
    #[must_use]
    pub const fn is_dragon(self) -> bool {
        matches_tu8!(self.0, P | F | C)
    }

    /// 1 or 9 of a numbered suit.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_jihai() && matches!(self.0 % 9, 0 | 8)
    }

    /// Terminal or honor.
    #[inline]
    #[must_use]
    pub const fn is_yaokyuu(self) -> bool {
        self.is_jihai() || self.is_terminal()
    }

    /// Dora successor: 9 wraps to 1 within a suit, winds cycle E S W N and
    /// dragons cycle P F C.
    #[must_use]
    pub const fn next(self) -> Self {
        let id = self.0;
        Self(match id {
            tu8!(N) => tu8!(E),
            tu8!(C) => tu8!(P),
            _ if id < 3 * 9 && id % 9 == 8 => id - 8,
            _ => id + 1,
        })
    }

    /// Inverse of [`next`](Self::next).
    #[must_use]
    pub const fn prev(self) -> Self {
        let id = self.0;
        Self(match id {
            tu8!(E) => tu8!(N),
            tu8!(P) => tu8!(C),
            _ if id < 3 * 9 && id % 9 == 0 => id + 8,
            _ => id - 1,
        })
    }

    /// Glyph from the Unicode Mahjong Tiles block.
    #[must_use]
    pub fn glyph(self) -> char {
        let code = match self.0 {
            0..=8 => 0x1F007 + self.0 as u32,
            9..=17 => 0x1F019 + (self.0 - 9) as u32,
            18..=26 => 0x1F010 + (self.0 - 18) as u32,
            tu8!(P) => 0x1F006,
            tu8!(F) => 0x1F005,
            tu8!(C) => 0x1F004,
            _ => 0x1F000 + (self.0 - tu8!(E)) as u32,
        };
        char::from_u32(code).unwrap_or('?')
    }
}

impl From<Honor> for TileKind {
    fn from(h: Honor) -> Self {
        Self(tu8!(E) + h as u8)
    }
}

impl From<Wind> for TileKind {
    fn from(w: Wind) -> Self {
        w.kind()
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_jihai() {
            write!(f, "{}", HONOR_CHARS[self.as_usize() - 3 * 9])
        } else {
            write!(f, "{}{}", self.0 % 9 + 1, SUIT_CHARS[self.as_usize() / 9])
        }
    }
}

impl FromStr for TileKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        match bytes {
            [c] => HONOR_CHARS
                .iter()
                .position(|&h| h as u8 == *c)
                .map(|i| Self(tu8!(E) + i as u8))
                .with_context(|| format!("unknown tile {s:?}")),
            [n @ b'1'..=b'9', suit] => {
                let num = n - b'1';
                Ok(Self(match suit {
                    b'm' => num,
                    b'p' => 9 + num,
                    b's' => 18 + num,
                    b'z' if num < 7 => 27 + num,
                    _ => bail!("unknown tile {s:?}"),
                }))
            }
            _ => bail!("unknown tile {s:?}"),
        }
    }
}

impl Tile {
    pub fn new(id: u8, red: bool) -> Result<Self> {
        ensure!((id as usize) < TILE_COUNT, "tile id {id} is out of range");
        let tile = Self { id, red };
        ensure!(!red || tile.rank() == Some(5), "only fives can be red, got id {id}");
        Ok(tile)
    }

    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self.id
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> TileKind {
        TileKind(self.id / 4)
    }

    #[inline]
    #[must_use]
    pub const fn is_red(self) -> bool {
        self.red
    }

    #[inline]
    #[must_use]
    pub const fn suit(self) -> Suit {
        self.kind().suit()
    }

    #[inline]
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        self.kind().rank()
    }

    #[inline]
    #[must_use]
    pub const fn honor(self) -> Option<Honor> {
        self.kind().honor()
    }

    /// `"5m"`, `"E"`, and `"5mr"` for a red five.
    #[must_use]
    pub fn label(self) -> String {
        if self.red { format!("{}r", self.kind()) } else { self.kind().to_string() }
    }

    #[inline]
    #[must_use]
    pub fn glyph(self) -> char {
        self.kind().glyph()
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTile::deserialize(deserializer)?;
        Self::new(raw.id, raw.red).map_err(de::Error::custom)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
