pub mod agari;
pub mod decompose;
pub mod dora;
pub mod fu;
pub mod point;
pub mod shanten;
pub mod wait;
pub mod yaku;

use crate::meld::Meld;

/// Number of groups the concealed part must provide, or `None` if the
/// meld count alone is impossible.
#[inline]
pub(crate) fn len_div3(melds: &[Meld]) -> Option<u8> {
    4_usize.checked_sub(melds.len()).map(|n| n as u8)
}
