//! Stage 5: checksum and framing.
//!
//! Computes the weighted modulo-103 check codeword, appends the stop
//! codeword, and materializes the module-width pattern row(s) the renderer
//! consumes.

use crate::code128::tables::{pattern_for, FNC1, FNC2, FNC3, FNC4, STOP};
use crate::error::{EncodeError, Result};
use crate::options::{CompositeMode, DataType};
use crate::vec_ext::{String, Vec};

/// Computes `(v[0] + sum(i * v[i] for i >= 1)) mod 103` over the codewords
/// emitted so far (start through the linkage flag, exclusive of check and
/// stop).
///
/// # Errors
///
/// Returns [`EncodeError::InternalInvariantViolation`] if `codewords` is
/// empty (the emitter always produces at least a start codeword).
pub fn checksum(codewords: &[u8]) -> Result<u8> {
    let &start = codewords
        .first()
        .ok_or(EncodeError::InternalInvariantViolation(
            "checksum computed over an empty codeword sequence",
        ))?;

    let mut sum: u32 = u32::from(start);
    for (i, &cw) in codewords.iter().enumerate().skip(1) {
        sum += (i as u32) * u32::from(cw);
    }

    Ok((sum % 103) as u8)
}

/// Appends the check codeword and the stop codeword to `codewords`.
///
/// # Errors
///
/// Propagates [`checksum`]'s error.
pub fn finalize(codewords: &[u8]) -> Result<Vec<u8>> {
    let check = checksum(codewords)?;
    let mut out = Vec::with_capacity(codewords.len() + 2);
    out.extend_from_slice(codewords);
    out.push(check);
    out.push(STOP);
    Ok(out)
}

/// Looks up and concatenates the module-width pattern for every codeword in
/// `framed` (the full sequence including check and stop), then lays the
/// result out as one or two pattern rows depending on `composite_mode`.
///
/// # Errors
///
/// Propagates [`pattern_for`]'s error for any out-of-range codeword.
pub fn build_patterns(framed: &[u8], composite_mode: CompositeMode) -> Result<(Vec<String>, Vec<i32>)> {
    let mut pattern = String::new();
    for &cw in framed {
        pattern.push_str(pattern_for(cw)?);
    }

    if composite_mode == CompositeMode::Off {
        Ok((vec_of(pattern), vec_of(-1)))
    } else {
        let mut separator = String::from("0");
        separator.push_str(&pattern);
        Ok((
            {
                let mut rows = Vec::with_capacity(2);
                rows.push(separator);
                rows.push(pattern);
                rows
            },
            {
                let mut heights = Vec::with_capacity(2);
                heights.push(1);
                heights.push(-1);
                heights
            },
        ))
    }
}

fn vec_of<T>(item: T) -> Vec<T> {
    let mut v = Vec::with_capacity(1);
    v.push(item);
    v
}

/// Builds the human-readable text line: FNC placeholders stripped from the
/// original content, empty for GS1, `*`-wrapped for HIBC.
#[must_use]
pub fn readable_text(content: &str, data_type: DataType) -> String {
    if data_type == DataType::Gs1 {
        return String::new();
    }

    let stripped: String = content
        .chars()
        .filter(|&c| !is_fnc_char(c))
        .collect();

    if data_type == DataType::Hibc {
        let mut wrapped = String::from("*");
        wrapped.push_str(&stripped);
        wrapped.push('*');
        wrapped
    } else {
        stripped
    }
}

fn is_fnc_char(c: char) -> bool {
    let cp = u32::from(c);
    cp == u32::from(FNC1) || cp == u32::from(FNC2) || cp == u32::from(FNC3) || cp == u32::from(FNC4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec_ext::vec;

    #[test]
    fn simple_b_checksum_matches_worked_example() {
        // Start-B, 'A'=33, 'I'=41, 'M'=45.
        let check = checksum(&[104, 33, 41, 45]).expect("checksum");
        assert_eq!(check, 45);
    }

    #[test]
    fn subset_c_pair_checksum_matches_worked_example() {
        let check = checksum(&[105, 12, 34]).expect("checksum");
        assert_eq!(check, 82);
    }

    #[test]
    fn finalize_appends_check_and_stop() {
        let framed = finalize(&[104, 33, 41, 45]).expect("finalize");
        assert_eq!(framed, vec![104, 33, 41, 45, 45, STOP]);
    }

    #[test]
    fn patterns_single_row_without_composite() {
        let framed = finalize(&[104, 33, 41, 45]).expect("finalize");
        let (patterns, heights) = build_patterns(&framed, CompositeMode::Off).expect("patterns");
        assert_eq!(patterns.len(), 1);
        assert_eq!(heights, vec![-1]);
    }

    #[test]
    fn patterns_two_rows_with_composite() {
        let framed = finalize(&[104, 33, 41, 45]).expect("finalize");
        let (patterns, heights) = build_patterns(&framed, CompositeMode::Cca).expect("patterns");
        assert_eq!(patterns.len(), 2);
        assert_eq!(heights, vec![1, -1]);
        assert!(patterns[0].starts_with('0'));
        assert_eq!(&patterns[0][1..], patterns[1].as_str());
    }

    #[test]
    fn readable_strips_fnc_placeholders() {
        let fnc1 = char::from_u32(u32::from(FNC1)).expect("valid char");
        let content: String = core::iter::once(fnc1).chain("0112345".chars()).collect();
        let readable = readable_text(&content, DataType::Generic);
        assert_eq!(readable, "0112345");
    }

    #[test]
    fn readable_is_empty_for_gs1() {
        let readable = readable_text("[01]12345", DataType::Gs1);
        assert_eq!(readable, "");
    }

    #[test]
    fn readable_is_wrapped_for_hibc() {
        let readable = readable_text("A123", DataType::Hibc);
        assert_eq!(readable, "*A123*");
    }
}
