//! Board-facing building blocks for the coaching pipeline: position
//! normalization, score handling, move annotation and answer rendering.
//! Everything here is pure; engine I/O lives in the `coach` crate.

pub use shakmaty;

pub mod analysis;
pub mod annotate;
pub mod explain;
pub mod position;
pub mod score;
