//! Report renderers for ingredient analyses.
//!
//! - [`terminal`]: colored summary box and per-label tables; respects `--verbose` / `--quiet`.
//! - [`pdf`]: cover page with stat cards and a paginated ingredient table.
//!
//! JSON output is `serde_json` over [`crate::models::AnalysisReport`] directly.

pub mod pdf;
pub mod terminal;
