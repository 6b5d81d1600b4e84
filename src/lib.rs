//! A deterministic **masonry block-packing engine**: turns a wall
//! outline, a set of apertures (doors, windows, other keep-outs), and a
//! library of standard block widths into a construction plan —
//! standard-block placements plus the custom-cut pieces needed to fill
//! whatever the standard blocks can't cover.
//!
//! # Pipeline
//! [`pack_wall`] runs five stages, each in its own module:
//! 1. [`geometry::sanitize`] repairs the wall outline; degenerate input
//!    (area below `config.area_eps`) short-circuits to an empty
//!    [`types::PackPlan`] rather than an error.
//! 2. [`aperture::build_keep_out`] filters implausible apertures and
//!    unions the survivors with the wall's own holes into one keep-out
//!    mask.
//! 3. [`stripe::build_courses`] slices the wall into horizontal courses
//!    (plus one adaptive final course, if the leftover height warrants
//!    it) and subtracts the keep-out mask from each.
//! 4. [`packer`] packs each course's components with standard blocks,
//!    trying multiple width orders and a running-bond offset on odd
//!    courses, with a tail-backtrack pass to shrink unplaceable
//!    remainders.
//! 5. [`custom::extract_customs`] coalesces each course's leftover
//!    geometry, classifies it, and splits anything too wide to cut as
//!    one piece.
//!
//! The whole pipeline is pure: no I/O, no global mutable state, and
//! identical input (wall, apertures, config) always produces a
//! byte-identical [`types::PackPlan`].

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aperture;
pub mod config;
pub mod custom;
pub mod errors;
pub mod float_types;
pub mod geometry;
pub mod packer;
pub mod stripe;
pub mod types;

use geo::{Area, Polygon};
use tracing::info;

pub use config::PackerConfig;
pub use errors::PackingError;
pub use float_types::Real;
pub use types::{Ctype, CustomPiece, PackPlan, StandardPlacement};

use types::LabelCounters;

/// Packs `wall` (with `apertures` cut out of it) using `config`.
///
/// Returns `Ok(PackPlan::empty())` for a wall whose area is below
/// `config.area_eps` — that's a degenerate input, not an error.
/// Returns `Err` for geometry that can't be repaired into a valid
/// polygon, or for a `config` that fails [`PackerConfig::validate`].
pub fn pack_wall(
    wall: &Polygon<Real>,
    apertures: &[Polygon<Real>],
    config: &PackerConfig,
) -> Result<PackPlan, PackingError> {
    config.validate()?;

    let wall = geometry::sanitize(wall)?;
    if wall.unsigned_area() < config.area_eps {
        return Ok(PackPlan::empty());
    }

    let keep_out = aperture::build_keep_out(&wall, apertures, config)?;
    let courses = stripe::build_courses(&wall, keep_out.as_ref(), config);
    let course_results = packer::pack_courses(&courses, config);

    let mut counters = LabelCounters::default();
    let mut placed = Vec::new();
    for course in &course_results {
        for component in &course.components {
            for &(x, width) in &component.outcome.placements {
                let letter = config.letter_for_width(width);
                let label = counters.next_standard(letter);
                placed.push(StandardPlacement::new(
                    label,
                    geometry::snap(width, config.snap),
                    geometry::snap(course.height, config.snap),
                    geometry::snap(x, config.snap),
                    geometry::snap(course.y, config.snap),
                ));
            }
        }
    }

    let customs = custom::extract_customs(&course_results, config, &mut counters);

    let mut plan = PackPlan { units: "mm", placed, customs, summary: Default::default() };
    plan.recompute_summary();

    info!(
        courses = course_results.len(),
        standard = plan.placed.len(),
        custom = plan.customs.len(),
        "wall packed"
    );

    Ok(opt_pass(plan))
}

/// A seam for a post-pack optimization pass (block-substitution,
/// waste-minimizing re-cuts, and similar global rearrangements). The
/// packing pipeline commits to placements course by course and never
/// revisits them once emitted, so any such pass would run here, over
/// the finished plan, rather than inside the packer itself. No such
/// pass exists yet; this is the identity function.
fn opt_pass(plan: PackPlan) -> PackPlan {
    plan
}
