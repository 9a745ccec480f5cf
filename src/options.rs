//! Caller-facing configuration for [`crate::code128::encode`].

/// How the input content should be interpreted before normalization.
///
/// See [module docs][crate::code128] for the effect each variant has on
/// bracket translation, the leading FNC1 preamble, and the human-readable
/// text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// Plain Code 128 data; no bracket translation, no leading FNC1.
    Generic,
    /// GS1-128. `[` is translated to FNC1 and a leading FNC1 is emitted
    /// after the start code. The readable text is left empty.
    Gs1,
    /// HIBC. The readable text is wrapped in `*` delimiters.
    Hibc,
}

/// Which composite-symbol linkage flag (if any) to append after the data
/// codewords, per ISO/IEC 24723.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeMode {
    /// No composite component; no linkage flag is emitted.
    Off,
    /// Linear component of a CC-A composite symbol.
    Cca,
    /// Linear component of a CC-B composite symbol.
    Ccb,
    /// Linear component of a CC-C composite symbol.
    Ccc,
}

impl CompositeMode {
    /// Whether a linkage flag should be appended after the last data
    /// codeword.
    #[must_use]
    pub const fn is_linked(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Encoding options accepted by [`crate::code128::encode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// How the input content is interpreted (see [`DataType`]).
    pub data_type: DataType,
    /// When `true`, a FNC3 is emitted immediately after the start code
    /// (reader-programming mode).
    pub reader_init: bool,
    /// Composite-symbol linkage mode (see [`CompositeMode`]).
    pub composite_mode: CompositeMode,
    /// When `true`, subset C is never used; all digits are encoded via
    /// subset B.
    pub mode_c_suppression: bool,
}

impl EncodeOptions {
    /// Returns the default options for `data_type`: no reader
    /// initialization, no composite linkage, and subset C allowed.
    #[must_use]
    pub const fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            reader_init: false,
            composite_mode: CompositeMode::Off,
            mode_c_suppression: false,
        }
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::new(DataType::Generic)
    }
}
