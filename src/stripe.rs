//! Row stripe engine: slices the wall into horizontal courses and, for
//! each course, yields the connected packable components after
//! subtracting the keep-out mask (spec §4.3).

use geo::{Area, BooleanOps, BoundingRect, MultiPolygon, Polygon};
use tracing::debug;

use crate::config::PackerConfig;
use crate::geometry::{as_multi, components, rect, snap};
use crate::float_types::Real;

/// One horizontal course: a y-band of height `top - y`, plus the
/// disjoint sub-polygons within it that survived keep-out subtraction.
#[derive(Debug, Clone)]
pub struct Course {
    pub index: usize,
    pub y: Real,
    pub top: Real,
    pub components: Vec<Polygon<Real>>,
    /// True for the single, reduced-height course packed from leftover
    /// vertical space after all full courses (spec §4.3, §4.6).
    pub adaptive: bool,
}

/// Builds every full course plus, if warranted, one trailing adaptive
/// course, per spec §4.3: `full_courses = floor(height / course_height)`,
/// and an adaptive course of `min(residual, course_height)` runs only
/// when the residual is at least `config.min_adaptive_height`.
pub fn build_courses(
    wall: &Polygon<Real>,
    keep_out: Option<&MultiPolygon<Real>>,
    config: &PackerConfig,
) -> Vec<Course> {
    let bbox = match wall.bounding_rect() {
        Some(b) => b,
        None => return Vec::new(),
    };
    let minx = bbox.min().x;
    let miny = bbox.min().y;
    let maxx = bbox.max().x;
    let maxy = bbox.max().y;

    let total_height = maxy - miny;
    let full_courses = (total_height / config.course_height).floor().max(0.0) as usize;
    let residual = total_height - (full_courses as Real) * config.course_height;

    let wall_mp = as_multi(wall);
    let mut courses = Vec::with_capacity(full_courses + 1);
    let mut y = miny;

    for k in 0..full_courses {
        let top = y + config.course_height;
        let comps = stripe_components(&wall_mp, keep_out, minx, y, maxx, top, config);
        debug!(course = k, y, top, components = comps.len(), "course stripe built");
        courses.push(Course {
            index: k,
            y: snap(y, config.snap),
            top: snap(top, config.snap),
            components: comps,
            adaptive: false,
        });
        y = snap(top, config.snap);
    }

    if residual >= config.min_adaptive_height {
        let height = residual.min(config.course_height);
        let top = y + height;
        let comps = stripe_components(&wall_mp, keep_out, minx, y, maxx, top, config);
        debug!(
            course = full_courses,
            y,
            top,
            components = comps.len(),
            "adaptive final course stripe built"
        );
        courses.push(Course {
            index: full_courses,
            y: snap(y, config.snap),
            top: snap(top, config.snap),
            components: comps,
            adaptive: true,
        });
    } else if residual > 0.0 {
        debug!(residual, "skipping adaptive course: below min_adaptive_height");
    }

    courses
}

fn stripe_components(
    wall_mp: &MultiPolygon<Real>,
    keep_out: Option<&MultiPolygon<Real>>,
    minx: Real,
    y: Real,
    maxx: Real,
    top: Real,
    config: &PackerConfig,
) -> Vec<Polygon<Real>> {
    let stripe = as_multi(&rect(minx, y, maxx, top));
    let mut cell = wall_mp.intersection(&stripe);
    if let Some(ko) = keep_out {
        cell = cell.difference(ko);
    }
    components(&cell)
        .into_iter()
        .filter(|c| c.unsigned_area() >= config.area_eps)
        .collect()
}
