//! Stage 2: the extended-set (FNC4) planner.
//!
//! Code 128 subsets A and B natively address code points `0..128`; values
//! `128..256` require doubled FNC4 codewords to enter/leave an "extended"
//! regime (or a single FNC4 shift for one character). This stage decides,
//! per input position, whether that position is latched or shifted into
//! the extended regime.

use crate::code128::tables::is_fnc;
use crate::vec_ext::Vec;

/// Per-position FNC4 regime tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FState {
    /// Ordinary (non-extended) subset A/B interpretation, latched.
    LatchNormal,
    /// Ordinary (non-extended) subset A/B interpretation for exactly this
    /// position; the surrounding regime is [`FState::LatchExt`].
    ShiftNormal,
    /// Extended (+128) subset A/B interpretation, latched.
    LatchExt,
    /// Extended (+128) subset A/B interpretation for exactly this
    /// position; the surrounding regime is [`FState::LatchNormal`].
    ShiftExt,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Raw {
    ExtLatch,
    ExtShift,
    Normal,
}

/// Plans the FNC4 regime for every position in `code_points`.
#[must_use]
pub fn plan_extended(code_points: &[u16]) -> Vec<FState> {
    let n = code_points.len();
    let mut is_ext: Vec<bool> = (0..n).map(|_| false).collect();
    for (i, &cp) in code_points.iter().enumerate() {
        is_ext[i] = !is_fnc(cp) && (128..=255).contains(&cp);
    }

    let mut raw: Vec<Raw> = (0..n).map(|_| Raw::Normal).collect();

    // Runs >= 5 of extended positions latch; a tail run >= 3 that touches
    // end-of-input also latches (ISO/IEC 15417 Annex E notes 2-3).
    let mut i = 0;
    while i < n {
        if is_ext[i] {
            let start = i;
            while i < n && is_ext[i] {
                i += 1;
            }
            let len = i - start;
            let touches_end = i == n;
            let becomes_latch = len >= 5 || (touches_end && len >= 3);
            let tag = if becomes_latch {
                Raw::ExtLatch
            } else {
                Raw::ExtShift
            };
            for slot in &mut raw[start..i] {
                *slot = tag;
            }
        } else {
            i += 1;
        }
    }

    let mut states: Vec<FState> = raw
        .iter()
        .map(|r| match r {
            Raw::ExtLatch => FState::LatchExt,
            Raw::ExtShift => FState::ShiftExt,
            Raw::Normal => FState::LatchNormal,
        })
        .collect();

    // A short return to normal immediately after a latched extended run is
    // demoted to a per-character shift rather than a latch-out-and-back
    // (ISO/IEC 15417 Annex E note 4).
    let mut i = 0;
    while i < n {
        if raw[i] == Raw::Normal {
            let start = i;
            while i < n && raw[i] == Raw::Normal {
                i += 1;
            }
            let len = i - start;
            let touches_end = i == n;
            let preceded_by_latch = start > 0 && raw[start - 1] == Raw::ExtLatch;
            if preceded_by_latch {
                let threshold = if touches_end { 3 } else { 5 };
                if len < threshold {
                    for slot in &mut states[start..i] {
                        *slot = FState::ShiftNormal;
                    }
                }
            }
        } else {
            i += 1;
        }
    }

    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec_ext::vec;

    #[test]
    fn short_run_stays_shifted() {
        let cps: Vec<u16> = vec![b'A' as u16, 0xC1, 0xC2, b'B' as u16];
        let states = plan_extended(&cps);
        assert_eq!(
            states,
            vec![
                FState::LatchNormal,
                FState::ShiftExt,
                FState::ShiftExt,
                FState::LatchNormal,
            ]
        );
    }

    #[test]
    fn five_run_latches() {
        let mut cps = vec![b'A' as u16];
        cps.extend(core::iter::repeat(0xC1u16).take(5));
        cps.push(b'B' as u16);
        let states = plan_extended(&cps);
        assert_eq!(states[0], FState::LatchNormal);
        for s in &states[1..6] {
            assert_eq!(*s, FState::LatchExt);
        }
        assert_eq!(states[6], FState::LatchNormal);
    }

    #[test]
    fn tail_run_of_three_latches() {
        let mut cps = vec![b'A' as u16, b'B' as u16];
        cps.extend(core::iter::repeat(0xC1u16).take(3));
        let states = plan_extended(&cps);
        assert_eq!(states[2], FState::LatchExt);
        assert_eq!(states[3], FState::LatchExt);
        assert_eq!(states[4], FState::LatchExt);
    }

    #[test]
    fn short_normal_gap_after_latch_is_shifted_out() {
        // Five extended chars, then two normal, then five more extended:
        // the middle gap is shorter than 5 and not at end-of-input, so it
        // is demoted to per-character shifts rather than a full latch out.
        let mut cps = Vec::new();
        cps.extend(core::iter::repeat(0xC1u16).take(5));
        cps.push(b'X' as u16);
        cps.push(b'Y' as u16);
        cps.extend(core::iter::repeat(0xC2u16).take(5));
        let states = plan_extended(&cps);
        for s in &states[0..5] {
            assert_eq!(*s, FState::LatchExt);
        }
        assert_eq!(states[5], FState::ShiftNormal);
        assert_eq!(states[6], FState::ShiftNormal);
        for s in &states[7..12] {
            assert_eq!(*s, FState::LatchExt);
        }
    }
}
