//! Code 128 (ISO/IEC 15417) encoding pipeline.
//!
//! [`encode`] drives the five-stage pipeline described by the submodules in
//! order: [`normalize`], [`extended`], [`subset`], [`emitter`], and
//! [`checksum`]. Each stage depends only on the previous stage's output.

pub mod checksum;
pub mod emitter;
pub mod extended;
pub mod normalize;
pub mod subset;
pub mod tables;

use crate::error::Result;
use crate::options::EncodeOptions;
use crate::vec_ext::{format, String, Vec};

/// The fully-encoded Code 128 symbol: module-width patterns, row metadata,
/// the human-readable text line, and a diagnostic trace.
#[derive(Clone, Debug)]
pub struct EncodedSymbol {
    /// One row (linear) or two rows (composite: separator + linear).
    pub patterns: Vec<String>,
    /// Parallel to `patterns`; `-1` means "renderer default height".
    pub row_heights: Vec<i32>,
    /// Equal to `patterns.len()`.
    pub row_count: usize,
    /// The human-readable text line, or empty for `DataType::Gs1`.
    pub readable: String,
    /// An opaque trace of the emitted symbol names, for debugging only.
    pub encode_info: String,
}

/// Encodes `content` as a Code 128 symbol under `options`.
///
/// # Errors
///
/// Returns [`crate::EncodeError::InvalidCharacter`] if `content` contains a
/// character outside ISO 8859-1 and the reserved FNC placeholders,
/// [`crate::EncodeError::TooLong`] if the input or the projected codeword
/// count exceeds their respective bounds, and
/// [`crate::EncodeError::InternalInvariantViolation`] if an earlier stage
/// produced output a later stage cannot interpret (an encoder bug).
pub fn encode(content: &str, options: &EncodeOptions) -> Result<EncodedSymbol> {
    let code_points = normalize::normalize(content, options.data_type)?;
    let fstates = extended::plan_extended(&code_points);
    let subsets = subset::plan_subsets(&code_points, &fstates, options.mode_c_suppression)?;
    let (codewords, mut trace) = emitter::emit(&code_points, &fstates, &subsets, options)?;

    let data_codeword_count = codewords.len();
    let framed = checksum::finalize(&codewords)?;
    let check = *framed.get(framed.len() - 2).unwrap_or(&0);

    trace.push(' ');
    trace.push_str(&format!("N={data_codeword_count} CHK={check}"));

    let (patterns, row_heights) = checksum::build_patterns(&framed, options.composite_mode)?;
    let row_count = patterns.len();
    let readable = checksum::readable_text(content, options.data_type);

    Ok(EncodedSymbol {
        patterns,
        row_heights,
        row_count,
        readable,
        encode_info: trace,
    })
}
