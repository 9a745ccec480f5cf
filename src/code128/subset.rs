//! Stage 3: the subset planner.
//!
//! Classifies each input position into a candidate subset, runs the
//! ISO 15417 Annex E reduction rules, resolves odd-length subset-C blocks,
//! and collapses adjacent same-subset runs into the final per-position
//! [`Subset`] assignment the emitter consumes.
//!
//! The planner's ambiguous candidate tags (`Candidate`) and the emitter's
//! unambiguous final tags (`Subset`) are kept as two distinct types rather
//! than one flat enum, since a position's candidacy and its final
//! resolution are genuinely different things to reason about.

use crate::code128::extended::FState;
use crate::code128::tables::{is_fnc, FNC1};
use crate::error::{EncodeError, Result};
use crate::vec_ext::Vec;

/// A position's intrinsic subset candidacy, before Annex E reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Candidate {
    ShiftA,
    ShiftB,
    AOrB,
    AOrBOrC,
}

/// A position's final, unambiguous subset assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subset {
    /// Subset A for exactly this position (the surrounding latch is B).
    ShiftA,
    /// Subset A, latched.
    LatchA,
    /// Subset B for exactly this position (the surrounding latch is A).
    ShiftB,
    /// Subset B, latched.
    LatchB,
    /// Subset C, latched.
    LatchC,
}

fn classify(cp: u16, mode_c_suppression: bool) -> Candidate {
    if is_fnc(cp) {
        return if cp == FNC1 {
            if mode_c_suppression {
                Candidate::AOrB
            } else {
                Candidate::AOrBOrC
            }
        } else {
            Candidate::AOrB
        };
    }
    match cp {
        0..=31 => Candidate::ShiftA,
        48..=57 => {
            if mode_c_suppression {
                Candidate::AOrB
            } else {
                Candidate::AOrBOrC
            }
        }
        32..=95 => Candidate::AOrB,
        96..=127 => Candidate::ShiftB,
        128..=159 => Candidate::ShiftA,
        160..=223 => Candidate::AOrB,
        224..=255 => Candidate::ShiftB,
        _ => Candidate::AOrB,
    }
}

fn compress_runs(candidates: &[Candidate]) -> Vec<(Candidate, usize)> {
    let mut runs: Vec<(Candidate, usize)> = Vec::new();
    for &c in candidates {
        if let Some(last) = runs.last_mut() {
            if last.0 == c {
                last.1 += 1;
                continue;
            }
        }
        runs.push((c, 1));
    }
    runs
}

/// Resolves an `AOrB` candidate given the previously-resolved neighbour and
/// the next run's raw candidate (ISO/IEC 15417 Annex E).
fn resolve_aorb(is_first: bool, prev: Option<Subset>, next: Option<Candidate>) -> Subset {
    if is_first {
        return if next == Some(Candidate::ShiftA) {
            Subset::LatchA
        } else {
            Subset::LatchB
        };
    }
    match prev {
        Some(Subset::LatchA) => Subset::LatchA,
        Some(Subset::LatchB) => Subset::LatchB,
        _ => match next {
            Some(Candidate::ShiftA) => Subset::LatchA,
            Some(Candidate::ShiftB) => Subset::LatchB,
            _ => Subset::LatchB,
        },
    }
}

/// Step C: reduces the compressed run list into one resolved [`Subset`] per
/// run. Runs left to right in two passes: first every `AOrBOrC`/`AOrB` run
/// (which only depends on already-resolved predecessors and the raw
/// candidate of the following run), then every remaining `ShiftA`/`ShiftB`
/// run (which may now also see fully-resolved neighbours on both sides).
fn reduce_runs(runs: &[(Candidate, usize)]) -> Vec<Option<Subset>> {
    let n = runs.len();
    let mut resolved: Vec<Option<Subset>> = (0..n).map(|_| None).collect();

    for i in 0..n {
        let (candidate, len) = runs[i];
        let is_first = i == 0;
        let next = runs.get(i + 1).map(|r| r.0);

        match candidate {
            Candidate::AOrBOrC => {
                let solo_pair = is_first && n == 1 && len == 2;
                if solo_pair || len >= 4 {
                    resolved[i] = Some(Subset::LatchC);
                } else {
                    let prev = if i > 0 { resolved[i - 1] } else { None };
                    resolved[i] = Some(resolve_aorb(is_first, prev, next));
                }
            }
            Candidate::AOrB => {
                let prev = if i > 0 { resolved[i - 1] } else { None };
                resolved[i] = Some(resolve_aorb(is_first, prev, next));
            }
            Candidate::ShiftA | Candidate::ShiftB => {
                // Resolved in the second pass below.
            }
        }
    }

    for i in 0..n {
        let (candidate, len) = runs[i];
        let is_first = i == 0;
        let prev = if i > 0 { resolved[i - 1] } else { None };
        let next = if i + 1 < n { resolved[i + 1] } else { None };

        let latch_of = |c: Candidate| match c {
            Candidate::ShiftA => Subset::LatchA,
            _ => Subset::LatchB,
        };

        match candidate {
            Candidate::ShiftA | Candidate::ShiftB => {
                let own_latch = latch_of(candidate);
                let matches_latch = |s: Option<Subset>| match (candidate, s) {
                    (Candidate::ShiftA, Some(Subset::LatchA)) => true,
                    (Candidate::ShiftB, Some(Subset::LatchB)) => true,
                    _ => false,
                };

                resolved[i] = Some(if is_first {
                    // The very first run: only ShiftA is promoted
                    // unconditionally here; a lone leading ShiftB is left
                    // for Step F's start-code canonicalization.
                    if candidate == Candidate::ShiftA {
                        Subset::LatchA
                    } else if len > 1 {
                        own_latch
                    } else if matches_latch(next) {
                        own_latch
                    } else if prev == Some(Subset::LatchC) {
                        own_latch
                    } else {
                        candidate_as_shift(candidate)
                    }
                } else if len > 1 {
                    own_latch
                } else if matches_latch(prev) && matches_latch(next) {
                    own_latch
                } else if matches_latch(prev) || matches_latch(next) {
                    own_latch
                } else if prev == Some(Subset::LatchC) {
                    own_latch
                } else {
                    candidate_as_shift(candidate)
                });
            }
            Candidate::AOrB | Candidate::AOrBOrC => {}
        }
    }

    resolved
}

const fn candidate_as_shift(c: Candidate) -> Subset {
    match c {
        Candidate::ShiftA => Subset::ShiftA,
        _ => Subset::ShiftB,
    }
}

/// Step D: expands the resolved run list into a per-position array.
fn expand(runs: &[(Candidate, usize)], resolved: &[Option<Subset>]) -> Result<Vec<Subset>> {
    let mut out = Vec::new();
    for (i, &(_, len)) in runs.iter().enumerate() {
        let tag = resolved[i].ok_or(EncodeError::InternalInvariantViolation(
            "subset run left unresolved after Annex E reduction",
        ))?;
        for _ in 0..len {
            out.push(tag);
        }
    }
    Ok(out)
}

fn is_digit(cp: u16) -> bool {
    (48..=57).contains(&cp)
}

/// Step E: resolves odd-length subset-C blocks by moving a single digit out
/// of the block into the neighbouring subset.
///
/// The emitter pairs digits two at a time but consumes an FNC1 on its own,
/// so parity has to hold on each side of an embedded FNC1 independently: a
/// block with an even digit total but an odd count before an interior FNC1
/// would still leave the emitter trying to pair a digit with that FNC1.
/// This walks each maximal `LatchC` block and checks every FNC1-delimited
/// segment within it separately.
fn resolve_odd_digit_blocks(subsets: &mut [Subset], code_points: &[u16]) {
    let n = subsets.len();
    let mut block_index = 0usize;
    let mut i = 0;
    while i < n {
        if matches!(subsets[i], Subset::LatchC) {
            let start = i;
            while i < n && matches!(subsets[i], Subset::LatchC) {
                i += 1;
            }
            let end = i; // exclusive
            resolve_block_segments(subsets, code_points, start, end, block_index);
            block_index += 1;
        } else {
            i += 1;
        }
    }
}

/// Fixes digit parity segment by segment within one maximal `LatchC` block,
/// where `start..end` is the block's position range and an embedded FNC1
/// splits it into independently-paired segments.
fn resolve_block_segments(
    subsets: &mut [Subset],
    code_points: &[u16],
    start: usize,
    end: usize,
    block_index: usize,
) {
    let n = subsets.len();
    let mut seg_start = start;
    let mut first_segment = true;
    let mut pos = start;

    while pos <= end {
        if pos == end || is_fnc(code_points[pos]) {
            let seg_end = pos; // exclusive
            let digit_count = code_points[seg_start..seg_end]
                .iter()
                .filter(|&&c| is_digit(c))
                .count();

            if digit_count % 2 == 1 {
                if block_index == 0 && first_segment {
                    // The very first segment of the very first block: move
                    // the last digit out.
                    if let Some(p) = (seg_start..seg_end).rev().find(|&p| is_digit(code_points[p])) {
                        subsets[p] = if seg_end < n && !matches!(subsets[seg_end], Subset::LatchC) {
                            subsets[seg_end]
                        } else {
                            Subset::LatchB
                        };
                    }
                } else {
                    // Every other segment: move the first digit out.
                    if let Some(p) = (seg_start..seg_end).find(|&p| is_digit(code_points[p])) {
                        subsets[p] = if seg_start > 0 && !matches!(subsets[seg_start - 1], Subset::LatchC) {
                            subsets[seg_start - 1]
                        } else {
                            Subset::LatchB
                        };
                    }
                }
            }

            first_segment = false;
            seg_start = pos + 1;
        }
        pos += 1;
    }
}

/// Step F: promotes a leading shift (and any identical shifts immediately
/// following it) to the corresponding latch, so position 0 always carries a
/// valid start symbol.
fn canonicalize_start(subsets: &mut [Subset]) {
    if subsets.is_empty() {
        return;
    }
    let (shift, latch): (Subset, Subset) = match subsets[0] {
        Subset::ShiftA => (Subset::ShiftA, Subset::LatchA),
        Subset::ShiftB => (Subset::ShiftB, Subset::LatchB),
        _ => return,
    };
    for slot in subsets.iter_mut() {
        if matches!(
            (shift, *slot),
            (Subset::ShiftA, Subset::ShiftA) | (Subset::ShiftB, Subset::ShiftB)
        ) {
            *slot = latch;
        } else {
            break;
        }
    }
}

/// Step G: the projected codeword count, used to enforce the 80-symbol
/// bound (exclusive of check and stop) before anything is emitted.
fn projected_codeword_count(subsets: &[Subset], fstates: &[FState], code_points: &[u16]) -> f64 {
    let mut total = 0.0_f64;
    let mut current: Option<Subset> = None;
    let mut in_ext = false;

    for (i, &subset) in subsets.iter().enumerate() {
        match subset {
            Subset::ShiftA | Subset::ShiftB => total += 1.0,
            Subset::LatchA | Subset::LatchB | Subset::LatchC => {
                match current {
                    // The very first latch is the start codeword itself;
                    // it doesn't cost an extra latch-change codeword.
                    None => {}
                    Some(c) if c != subset => total += 1.0,
                    Some(_) => {}
                }
                current = Some(subset);
            }
        }

        match fstates[i] {
            FState::ShiftNormal | FState::ShiftExt => total += 1.0,
            FState::LatchExt => {
                if !in_ext {
                    total += 2.0;
                    in_ext = true;
                }
            }
            FState::LatchNormal => {
                if in_ext {
                    total += 2.0;
                    in_ext = false;
                }
            }
        }

        let cp = code_points[i];
        let is_c = matches!(subset, Subset::LatchC);
        if is_c {
            total += if cp == FNC1 { 1.0 } else { 0.5 };
        } else {
            total += 1.0;
        }
    }

    total
}

/// Runs the full subset-planning pipeline: classify, compress into runs,
/// reduce ambiguity, expand, resolve odd digit blocks, canonicalize the
/// start, then check the projected length bound.
///
/// # Errors
///
/// Returns [`EncodeError::TooLong`] if the projected codeword count exceeds
/// 80.0, and [`EncodeError::InternalInvariantViolation`] if Annex E
/// reduction leaves a run unresolved.
pub fn plan_subsets(
    code_points: &[u16],
    fstates: &[FState],
    mode_c_suppression: bool,
) -> Result<Vec<Subset>> {
    let candidates: Vec<Candidate> = code_points
        .iter()
        .map(|&cp| classify(cp, mode_c_suppression))
        .collect();

    let runs = compress_runs(&candidates);
    let resolved = reduce_runs(&runs);
    let mut subsets = expand(&runs, &resolved)?;

    resolve_odd_digit_blocks(&mut subsets, code_points);
    canonicalize_start(&mut subsets);

    if projected_codeword_count(&subsets, fstates, code_points) > 80.0 {
        return Err(EncodeError::TooLong);
    }

    Ok(subsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec_ext::vec;

    fn ascii_points(s: &str) -> Vec<u16> {
        s.bytes().map(u16::from).collect()
    }

    fn all_normal(n: usize) -> Vec<FState> {
        (0..n).map(|_| FState::LatchNormal).collect()
    }

    #[test]
    fn simple_letters_latch_b() {
        let cps = ascii_points("AIM");
        let fstates = all_normal(cps.len());
        let subsets = plan_subsets(&cps, &fstates, false).expect("should plan");
        assert!(subsets.iter().all(|s| matches!(s, Subset::LatchB)));
    }

    #[test]
    fn four_digit_run_latches_c() {
        let cps = ascii_points("1234");
        let fstates = all_normal(cps.len());
        let subsets = plan_subsets(&cps, &fstates, false).expect("should plan");
        assert!(subsets.iter().all(|s| matches!(s, Subset::LatchC)));
    }

    #[test]
    fn two_digit_sole_run_latches_c() {
        let cps = ascii_points("42");
        let fstates = all_normal(cps.len());
        let subsets = plan_subsets(&cps, &fstates, false).expect("should plan");
        assert!(subsets.iter().all(|s| matches!(s, Subset::LatchC)));
    }

    #[test]
    fn single_digit_latches_b() {
        let cps = ascii_points("5");
        let fstates = all_normal(cps.len());
        let subsets = plan_subsets(&cps, &fstates, false).expect("should plan");
        assert_eq!(subsets.len(), 1);
        assert!(matches!(subsets[0], Subset::LatchB));
    }

    #[test]
    fn odd_digit_run_moves_last_digit_to_b() {
        let cps = ascii_points("12345");
        let fstates = all_normal(cps.len());
        let subsets = plan_subsets(&cps, &fstates, false).expect("should plan");
        assert!(matches!(subsets[0], Subset::LatchC));
        assert!(matches!(subsets[1], Subset::LatchC));
        assert!(matches!(subsets[2], Subset::LatchC));
        assert!(matches!(subsets[3], Subset::LatchC));
        assert!(matches!(subsets[4], Subset::LatchB));
    }

    #[test]
    fn mode_c_suppression_forces_subset_b() {
        let cps = ascii_points("123456");
        let fstates = all_normal(cps.len());
        let subsets = plan_subsets(&cps, &fstates, true).expect("should plan");
        assert!(subsets.iter().all(|s| matches!(s, Subset::LatchB)));
    }

    #[test]
    fn too_long_input_is_rejected() {
        let cps: Vec<u16> = vec![b'1' as u16; 170];
        let fstates = all_normal(cps.len());
        // 170 digits is well within the 80-codeword bound under subset C
        // (85 codewords of data is actually over budget: 170/2 = 85 > 80).
        let err = plan_subsets(&cps, &fstates, false).expect_err("should be too long");
        assert_eq!(err, EncodeError::TooLong);
    }

    #[test]
    fn interior_fnc1_splits_digit_parity_independently() {
        // "123" FNC1 "45": the block's total digit count is 5 (odd), so
        // the whole-block rule alone would move the trailing '5' out,
        // leaving "123" FNC1 "4" (an even total of 4, but an odd run of
        // three digits ahead of the FNC1, which the emitter cannot pair.
        // Parity has to be checked on each side of the FNC1 independently.
        let mut cps = ascii_points("123");
        cps.push(FNC1);
        cps.extend(ascii_points("45"));
        let fstates = all_normal(cps.len());
        let subsets = plan_subsets(&cps, &fstates, false).expect("should plan");

        assert!(matches!(subsets[0], Subset::LatchC));
        assert!(matches!(subsets[1], Subset::LatchC));
        assert!(matches!(subsets[2], Subset::LatchB));
        assert!(matches!(subsets[3], Subset::LatchC));
        assert!(matches!(subsets[4], Subset::LatchC));
        assert!(matches!(subsets[5], Subset::LatchC));
    }
}
