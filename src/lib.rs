//! # code128-core
//!
//! A Code 128 ([ISO/IEC 15417:2007]) barcode encoder core, with support for
//! GS1-128 ([ISO/IEC 24723]) mode and composite-symbol linkage.
//!
//! Given an input sequence of characters in the ISO 8859-1 (Latin-1) range
//! plus four reserved "function" placeholders ([`FNC1`][code128::tables::FNC1]–
//! [`FNC4`][code128::tables::FNC4]), [`code128::encode`] produces the sequence of
//! Code 128 codeword values and the concrete module-width pattern that a
//! downstream renderer paints as black and white bars.
//!
//! The hard part is the subset-selection optimizer: Code 128 has three
//! character subsets (A, B, C), each with its own shift/latch/function
//! codes, and the shortest encoding depends on analyzing the whole input and
//! applying the heuristic rules in ISO 15417 Annex E to decide where to
//! latch, where to shift, and where numeric pairs may be compressed into
//! subset C. A secondary hard part is extended-ASCII (FNC4) planning, which
//! is overlaid on subset selection and has its own latch/shift economy.
//!
//! ## Out of scope
//!
//! This crate paints no bars, lays out no human-readable line beyond the
//! plain readable string it already computes, and decodes nothing. It does
//! not generate 2D composite payloads (only the linear linkage flag); it
//! does not implement any symbology other than Code 128. Those concerns
//! belong to a downstream renderer, consuming [`code128::EncodedSymbol`].
//!
//! [ISO/IEC 15417:2007]: https://www.iso.org/standard/43896.html
//! [ISO/IEC 24723]: https://www.iso.org/standard/38602.html

// Be a perfectionist, no code is good enough!
#![deny(
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery
)]
// Unwraps are a bad practice and do not provide useful error messages/handling.
#![warn(clippy::unwrap_used)]
// This lint happens regardless and is out of our control.
#![allow(clippy::multiple_crate_versions)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod code128;
pub mod error;
pub mod options;
mod vec_ext;

pub use error::EncodeError;
pub use options::{CompositeMode, DataType, EncodeOptions};
