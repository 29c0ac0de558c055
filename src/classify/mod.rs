//! Per-ingredient safety classification.
//!
//! - [`tables`]: built-in and user-supplied rule tables.
//! - [`rules`]: ordered substring decision lists.
//! - [`model`]: optional statistical fallback.
//! - [`cascade`]: the priority cascade tying them together.

pub mod cascade;
pub mod model;
pub mod rules;
pub mod tables;

pub use cascade::IngredientClassifier;
