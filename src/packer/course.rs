//! Course-level offset selection (spec §4.6): even courses place every
//! component's first block flush with its left edge. Odd courses try
//! two candidate offsets — the configured running-bond `row_offset`
//! and the narrowest standard width — and keep whichever scores lower
//! across the whole course, producing the staggered-joint brick
//! pattern.

use geo::{BoundingRect, Polygon};
use tracing::debug;

use crate::config::PackerConfig;
use crate::float_types::Real;
use crate::packer::orders::pack_best_order;
use crate::packer::segment::{self, SegmentOutcome};
use crate::stripe::Course;

/// One packed component: its source polygon (for downstream leftover
/// and coalescing math) paired with the segment packer's outcome.
pub struct PackedComponent {
    pub polygon: Polygon<Real>,
    pub outcome: SegmentOutcome,
}

/// A fully packed course: the offset that was actually used, and every
/// component's packed outcome in the course's original order.
pub struct CourseResult {
    pub index: usize,
    pub y: Real,
    pub height: Real,
    pub offset_used: Real,
    pub components: Vec<PackedComponent>,
}

fn pack_at_offset(course: &Course, offset: Real, config: &PackerConfig) -> (Vec<SegmentOutcome>, usize, Real) {
    let height = course.top - course.y;
    let mut total_count = 0usize;
    let mut total_area = 0.0;
    let mut outcomes = Vec::with_capacity(course.components.len());

    for component in &course.components {
        let x0 = component.bounding_rect().map(|b| b.min().x).unwrap_or(0.0);
        let outcome = pack_best_order(component, course.y, height, x0, offset, config);
        total_count += outcome.custom_count;
        total_area += outcome.custom_area;
        outcomes.push(outcome);
    }

    (outcomes, total_count, total_area)
}

/// Packs every component of `course`, choosing the course-wide offset
/// per spec §4.6. On even courses the offset is always `0.0`; on odd
/// courses, `config.row_offset` and `config.min_width()` are both
/// tried and the one with lower total [`segment::cost`] wins.
pub fn pack_course(course: &Course, config: &PackerConfig) -> CourseResult {
    let (offset_used, outcomes) = if course.index % 2 == 1 {
        let row = pack_at_offset(course, config.row_offset, config);
        let narrow = pack_at_offset(course, config.min_width(), config);
        let row_cost = (row.1, (row.2 * 1000.0).round() as i64);
        let narrow_cost = (narrow.1, (narrow.2 * 1000.0).round() as i64);

        if row_cost <= narrow_cost {
            debug!(course = course.index, offset = config.row_offset, "odd course keeps row_offset");
            (config.row_offset, row.0)
        } else {
            debug!(course = course.index, offset = config.min_width(), "odd course adopts min_width offset");
            (config.min_width(), narrow.0)
        }
    } else {
        let (outcomes, _, _) = pack_at_offset(course, 0.0, config);
        (0.0, outcomes)
    };

    let components = course
        .components
        .iter()
        .cloned()
        .zip(outcomes)
        .map(|(polygon, outcome)| PackedComponent { polygon, outcome })
        .collect();

    CourseResult { index: course.index, y: course.y, height: course.top - course.y, offset_used, components }
}
