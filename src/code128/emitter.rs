//! Stage 4: the emitter.
//!
//! Walks the annotated input once, emitting the start code, latch/shift/
//! function codewords, and data codewords; tracks the FNC4 state machine;
//! and appends the composite linkage flag if applicable.
//!
//! Codewords 100 and 101 carry dual meanings ("latch to set B/A" in one
//! context, "FNC4" in another), depending on the current subset and
//! position. Rather than a single `emit(100)` call site, the two meanings
//! are emitted from distinct call sites below so the intent at each site
//! stays legible.

use crate::code128::extended::FState;
use crate::code128::subset::Subset;
use crate::code128::tables::{
    is_fnc, CODE_A, CODE_B, CODE_C, CODE_FNC1, CODE_FNC2, CODE_FNC3, CODE_SHIFT, FNC1, FNC2,
    FNC3, FNC4, START_A, START_B, START_C,
};
use crate::error::{EncodeError, Result};
use crate::options::{CompositeMode, DataType, EncodeOptions};
use crate::vec_ext::{format, String, Vec};

/// The effective subset (A, B, or C) a single codeword is emitted under,
/// collapsing away the shift/latch distinction that only matters for
/// deciding *whether* to emit a change codeword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EffSet {
    A,
    B,
    C,
}

const fn effective_set(subset: Subset) -> EffSet {
    match subset {
        Subset::ShiftA | Subset::LatchA => EffSet::A,
        Subset::ShiftB | Subset::LatchB => EffSet::B,
        Subset::LatchC => EffSet::C,
    }
}

const fn latch_codeword(set: EffSet) -> u8 {
    match set {
        EffSet::A => CODE_A,
        EffSet::B => CODE_B,
        EffSet::C => CODE_C,
    }
}

struct Trace {
    codewords: Vec<u8>,
    labels: String,
}

impl Trace {
    fn new() -> Self {
        Self {
            codewords: Vec::new(),
            labels: String::new(),
        }
    }

    fn push(&mut self, codeword: u8, label: &str) {
        if !self.labels.is_empty() {
            self.labels.push(' ');
        }
        self.labels.push_str(label);
        self.codewords.push(codeword);
    }

    fn push_numeric(&mut self, codeword: u8) {
        let label = format!("{codeword}");
        self.push(codeword, &label);
    }
}

fn push_double_fnc4(trace: &mut Trace, current_set: EffSet) {
    match current_set {
        EffSet::A => {
            trace.push(CODE_A, "FNC4");
            trace.push(CODE_A, "FNC4");
        }
        EffSet::B | EffSet::C => {
            trace.push(CODE_B, "FNC4");
            trace.push(CODE_B, "FNC4");
        }
    }
}

/// Emits the data codeword for `cp` under `set`.
fn emit_data(trace: &mut Trace, set: EffSet, cp: u16) -> Result<()> {
    match set {
        EffSet::A => {
            let cw = match cp {
                FNC1 => CODE_FNC1,
                FNC2 => CODE_FNC2,
                FNC3 => CODE_FNC3,
                FNC4 => CODE_A,
                0..=31 => (cp + 64) as u8,
                32..=95 => (cp - 32) as u8,
                128..=159 => ((cp - 128) + 64) as u8,
                160..=255 => (cp - 160) as u8,
                _ => {
                    return Err(EncodeError::InternalInvariantViolation(
                        "code point unreachable under subset A",
                    ))
                }
            };
            trace.push_numeric(cw);
        }
        EffSet::B => {
            let cw = match cp {
                FNC1 => CODE_FNC1,
                FNC2 => CODE_FNC2,
                FNC3 => CODE_FNC3,
                FNC4 => CODE_B,
                32..=127 => (cp - 32) as u8,
                160..=255 => (cp - 32 - 128) as u8,
                _ => {
                    return Err(EncodeError::InternalInvariantViolation(
                        "code point unreachable under subset B",
                    ))
                }
            };
            trace.push_numeric(cw);
        }
        EffSet::C => unreachable!("subset C data is emitted by the caller, two digits at a time"),
    }
    Ok(())
}

fn linkage_codeword(mode: CompositeMode, ends_in: EffSet) -> u8 {
    match (mode, ends_in) {
        (CompositeMode::Cca | CompositeMode::Ccb, EffSet::A)
        | (CompositeMode::Ccc, EffSet::B) => CODE_B,
        (CompositeMode::Cca | CompositeMode::Ccb, EffSet::B)
        | (CompositeMode::Ccc, EffSet::C) => CODE_C,
        (CompositeMode::Cca | CompositeMode::Ccb, EffSet::C)
        | (CompositeMode::Ccc, EffSet::A) => CODE_A,
        (CompositeMode::Off, _) => unreachable!("caller checks is_linked() first"),
    }
}

/// Runs the emitter over a fully-planned symbol, returning the codeword
/// sequence (not including check/stop, see [`crate::code128::checksum`])
/// and a human-readable trace of what was emitted.
///
/// # Errors
///
/// Returns [`EncodeError::InternalInvariantViolation`] if `subsets[0]` is
/// not a latch variant (a bug earlier in planning), or if subset-C data
/// does not pair up evenly.
pub fn emit(
    code_points: &[u16],
    fstates: &[FState],
    subsets: &[Subset],
    options: &EncodeOptions,
) -> Result<(Vec<u8>, String)> {
    let mut trace = Trace::new();
    let n = code_points.len();

    let start_subset = subsets.first().copied();
    let mut current_set = match start_subset {
        None => EffSet::B,
        Some(Subset::LatchA) => EffSet::A,
        Some(Subset::LatchB) => EffSet::B,
        Some(Subset::LatchC) => EffSet::C,
        Some(_) => {
            return Err(EncodeError::InternalInvariantViolation(
                "start position is not a latch variant",
            ))
        }
    };

    match current_set {
        EffSet::A if start_subset.is_some() => trace.push(START_A, "STARTA"),
        EffSet::C if start_subset.is_some() && !options.reader_init => {
            trace.push(START_C, "STARTC");
        }
        EffSet::C if start_subset.is_some() && options.reader_init => {
            // See the design note on reader-init Start C: the module
            // pattern and checksum-contributing value are Start B here,
            // followed by an explicit FNC3 / Code C transition.
            trace.push(START_B, "STARTB");
            trace.push(CODE_FNC3, "FNC3");
            trace.push(CODE_C, "CODEC");
        }
        _ => trace.push(START_B, "STARTB"),
    }

    if options.reader_init && !matches!(current_set, EffSet::C) {
        trace.push(CODE_FNC3, "FNC3");
    }

    if options.data_type == DataType::Gs1 {
        trace.push(CODE_FNC1, "FNC1");
    }

    let mut in_ext = false;
    if n > 0 && fstates[0] == FState::LatchExt {
        push_double_fnc4(&mut trace, current_set);
        in_ext = true;
    }

    let mut last_effective_set = current_set;
    let mut i = 0;
    while i < n {
        let subset = subsets[i];

        if i > 0 {
            if let Subset::LatchA | Subset::LatchB | Subset::LatchC = subset {
                let target = effective_set(subset);
                if target != current_set {
                    let label = match target {
                        EffSet::A => "CODEA",
                        EffSet::B => "CODEB",
                        EffSet::C => "CODEC",
                    };
                    trace.push(latch_codeword(target), label);
                    current_set = target;
                }
            }

            match (fstates[i], in_ext) {
                (FState::LatchExt, false) => {
                    push_double_fnc4(&mut trace, current_set);
                    in_ext = true;
                }
                (FState::LatchNormal, true) => {
                    push_double_fnc4(&mut trace, current_set);
                    in_ext = false;
                }
                _ => {}
            }
        }

        if matches!(fstates[i], FState::ShiftNormal | FState::ShiftExt) {
            let cw = match current_set {
                EffSet::A => CODE_A,
                _ => CODE_B,
            };
            trace.push(cw, "FNC4");
        }

        if matches!(subset, Subset::ShiftA | Subset::ShiftB) {
            trace.push(CODE_SHIFT, "SHFT");
        }

        let eff = effective_set(subset);
        last_effective_set = eff;

        match eff {
            EffSet::A | EffSet::B => {
                emit_data(&mut trace, eff, code_points[i])?;
                i += 1;
            }
            EffSet::C => {
                let cp = code_points[i];
                if is_fnc(cp) {
                    trace.push(CODE_FNC1, "FNC1");
                    i += 1;
                } else {
                    let next = *code_points.get(i + 1).ok_or(
                        EncodeError::InternalInvariantViolation(
                            "subset C run has an odd digit left unpaired",
                        ),
                    )?;
                    let (d0, d1) = (digit_value(cp)?, digit_value(next)?);
                    trace.push_numeric(d0 * 10 + d1);
                    i += 2;
                }
            }
        }
    }

    if options.composite_mode.is_linked() {
        trace.push(linkage_codeword(options.composite_mode, last_effective_set), "LINK");
    }

    Ok((trace.codewords, trace.labels))
}

fn digit_value(cp: u16) -> Result<u8> {
    if (48..=57).contains(&cp) {
        Ok((cp - 48) as u8)
    } else {
        Err(EncodeError::InternalInvariantViolation(
            "subset C position does not hold a digit",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code128::{extended::plan_extended, normalize::normalize, subset::plan_subsets};

    fn plan(content: &str, options: &EncodeOptions) -> (Vec<u16>, Vec<FState>, Vec<Subset>) {
        let cps = normalize(content, options.data_type).expect("normalize");
        let fstates = plan_extended(&cps);
        let subsets =
            plan_subsets(&cps, &fstates, options.mode_c_suppression).expect("plan subsets");
        (cps, fstates, subsets)
    }

    #[test]
    fn simple_subset_b() {
        let options = EncodeOptions::new(DataType::Generic);
        let (cps, fstates, subsets) = plan("AIM", &options);
        let (codewords, _) = emit(&cps, &fstates, &subsets, &options).expect("emit");
        assert_eq!(codewords, vec![START_B, 33, 41, 45]);
    }

    #[test]
    fn subset_c_pair() {
        let options = EncodeOptions::new(DataType::Generic);
        let (cps, fstates, subsets) = plan("1234", &options);
        let (codewords, _) = emit(&cps, &fstates, &subsets, &options).expect("emit");
        assert_eq!(codewords, vec![START_C, 12, 34]);
    }

    #[test]
    fn odd_digit_falls_back_to_b() {
        let options = EncodeOptions::new(DataType::Generic);
        let (cps, fstates, subsets) = plan("12345", &options);
        let (codewords, _) = emit(&cps, &fstates, &subsets, &options).expect("emit");
        assert_eq!(codewords, vec![START_C, 12, 34, CODE_B, 21]);
    }

    #[test]
    fn reader_init_b_start() {
        let mut options = EncodeOptions::new(DataType::Generic);
        options.reader_init = true;
        let (cps, fstates, subsets) = plan("AB", &options);
        let (codewords, _) = emit(&cps, &fstates, &subsets, &options).expect("emit");
        assert_eq!(codewords, vec![START_B, CODE_FNC3, 33, 34]);
    }

    #[test]
    fn empty_content_emits_bare_start_b() {
        let options = EncodeOptions::new(DataType::Generic);
        let (cps, fstates, subsets) = plan("", &options);
        let (codewords, _) = emit(&cps, &fstates, &subsets, &options).expect("emit");
        assert_eq!(codewords, vec![START_B]);
    }

    #[test]
    fn composite_linkage_flag_is_appended() {
        let mut options = EncodeOptions::new(DataType::Generic);
        options.composite_mode = CompositeMode::Cca;
        let (cps, fstates, subsets) = plan("AIM", &options);
        let (codewords, _) = emit(&cps, &fstates, &subsets, &options).expect("emit");
        assert_eq!(codewords, vec![START_B, 33, 41, 45, CODE_C]);
    }
}
