//! The scalar type used throughout the packer, and the handful of
//! numeric tolerances that are geometry-library artifacts rather than
//! packer policy (the packer's own tunable tolerances — `AREA_EPS`,
//! `COORD_EPS`, `SNAP`, and friends — live in [`crate::config`]).

/// Coordinate and area scalar. Unlike the CAD mesh library this crate
/// is descended from, there is no f32 variant: wall geometry is always
/// authored and fabricated in millimeters at f64 precision.
pub type Real = f64;

/// Smallest coordinate delta treated as "the same point" when walking
/// polygon rings (closing-point checks, degenerate-ring detection).
pub const EPSILON: Real = 1e-9;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Unit conversion (wall coordinates are millimeters by convention)
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
pub const MM: Real = 1.0;
pub const CM: Real = 10.0;
pub const METER: Real = 1000.0;
