//! Shared constants: the reserved FNC placeholder code points, the named
//! codeword values, and the CODE128 module-width pattern table.
//!
//! The pattern table below is the standard ISO/IEC 15417 Code 128 symbol
//! character table: 107 module-width strings, indices `0..=102` for the
//! data/function codewords, `103..=105` for Start A/B/C, and `106` for the
//! combined stop-and-termination pattern (the only seven-digit entry).

use crate::error::{EncodeError, Result};

/// FNC1, chosen so it cannot collide with an ISO 8859-1 byte value (0..255).
pub const FNC1: u16 = 0x0101;
/// FNC2, chosen so it cannot collide with an ISO 8859-1 byte value (0..255).
pub const FNC2: u16 = 0x0113;
/// FNC3, chosen so it cannot collide with an ISO 8859-1 byte value (0..255).
pub const FNC3: u16 = 0x012B;
/// FNC4, chosen so it cannot collide with an ISO 8859-1 byte value (0..255).
pub const FNC4: u16 = 0x014D;

/// Whether `cp` is one of the four reserved FNC placeholders.
#[must_use]
pub const fn is_fnc(cp: u16) -> bool {
    matches!(cp, FNC1 | FNC2 | FNC3 | FNC4)
}

// Codeword values with fixed meanings (ISO/IEC 15417 Table 1 / §4.4).
pub const CODE_SHIFT: u8 = 98;
pub const CODE_C: u8 = 99;
pub const CODE_B: u8 = 100;
pub const CODE_A: u8 = 101;
pub const CODE_FNC1: u8 = 102;
pub const CODE_FNC2: u8 = 97;
pub const CODE_FNC3: u8 = 96;
pub const START_A: u8 = 103;
pub const START_B: u8 = 104;
pub const START_C: u8 = 105;
pub const STOP: u8 = 106;

/// The module-width pattern for each codeword, `0..=106`.
pub const CODE128_WIDTHS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232", "2331112",
];

/// Looks up the module-width pattern for `codeword`.
///
/// # Errors
///
/// Returns [`EncodeError::InternalInvariantViolation`] if `codeword` is
/// outside `0..=106` (every codeword the emitter produces is checked
/// against this range before it reaches framing, so reaching this error
/// indicates an encoder bug).
pub fn pattern_for(codeword: u8) -> Result<&'static str> {
    CODE128_WIDTHS
        .get(codeword as usize)
        .copied()
        .ok_or(EncodeError::InternalInvariantViolation(
            "codeword out of the 0..=106 table range",
        ))
}
