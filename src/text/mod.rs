//! Label text processing, from raw text to deduplicated ingredient names.
//!
//! - [`repair`]: header trim and garble fixes for recognized (image) text.
//! - [`normalizer`]: lowercase, strip boilerplate/amounts/symbols, comma-separate.
//! - [`gibberish`]: reject recognized text with no plausible words.
//! - [`segmenter`]: split into candidates, filter junk, deduplicate.
//! - [`postprocess`]: image-path cleanup: warnings, corrections, compounds.

pub mod gibberish;
pub mod normalizer;
pub mod postprocess;
pub mod repair;
pub mod segmenter;
