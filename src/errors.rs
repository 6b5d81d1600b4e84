//! Error taxonomy for the packing pipeline.

use thiserror::Error;

/// Errors surfaced to the caller. The packer never produces partial
/// placements on failure — `pack_wall` either returns `Ok(PackPlan)` in
/// full or `Err` before emitting anything.
///
/// A wall whose area is below `AREA_EPS` is *not* one of these: per the
/// spec it is a degenerate-but-not-erroneous input, and `pack_wall`
/// returns an empty `PackPlan` rather than an error for it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackingError {
    /// The wall or an aperture polygon could not be repaired into a
    /// valid simple polygon.
    #[error("invalid geometry: {detail}")]
    InvalidGeometry { detail: String },

    /// `PackerConfig` failed validation (empty `widths`, non-positive
    /// `course_height`, negative `min_adaptive_height`, or non-positive
    /// `split_max_width`).
    #[error("invalid configuration: {detail}")]
    ConfigError { detail: String },
}
