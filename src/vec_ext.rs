//! `no_std`/`alloc` compatibility glue.
//!
//! Every intermediate array the pipeline builds (`CodePoint[]`, `FState[]`,
//! `RunList`, `Subset[]`, `Codeword[]`) is a plain owned, growable sequence.
//! This module re-exports the right `Vec`/`String`/`vec!`/`format!` for
//! whichever allocator is in scope.

#[cfg(feature = "std")]
pub use std::{format, string::String, vec, vec::Vec};

#[cfg(not(feature = "std"))]
pub use alloc::{format, string::String, vec, vec::Vec};
