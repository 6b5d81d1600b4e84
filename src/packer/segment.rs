//! Greedy segment packer with tail backtracking (spec §4.4-§4.5).
//!
//! A "segment" here is one connected course component together with a
//! starting cursor and offset; the packer commits to the first width
//! (in the given order) whose candidate rectangle actually overlaps
//! the component, placing it as a standard block when the overlap
//! covers the candidate almost entirely, or leaving it as an implicit
//! custom cut otherwise — the custom geometry itself is never built
//! here, it falls out later from `component \ union(standard rects)`
//! in [`crate::custom`].

use geo::{Area, BooleanOps, BoundingRect, Polygon};
use tracing::debug;

use crate::config::PackerConfig;
use crate::float_types::Real;
use crate::geometry::{as_multi, rect};

/// A candidate rectangle counts as a standard fit when at least this
/// fraction of its area lies inside the component — lets a slanted
/// wall edge (a trapezoid course) accept a block whose far corner
/// just grazes outside the true boundary.
const FIT_RATIO: Real = 0.95;

/// The outcome of packing one segment: left-to-right `(x, width)`
/// standard placements, plus a cost proxy (`custom_count`,
/// `custom_area`) used to compare backtrack/order/offset trials
/// against each other. The proxy never reaches the output plan —
/// actual custom geometry is derived independently in `custom.rs`.
#[derive(Debug, Clone)]
pub struct SegmentOutcome {
    pub placements: Vec<(Real, Real)>,
    pub custom_count: usize,
    pub custom_area: Real,
}

impl SegmentOutcome {
    fn empty() -> Self {
        SegmentOutcome { placements: Vec::new(), custom_count: 0, custom_area: 0.0 }
    }
}

/// Lexicographic cost: fewer custom pieces wins; ties broken by
/// smaller total custom area (spec §4.5, §4.9 "Scoring").
pub fn cost(outcome: &SegmentOutcome) -> (usize, i64) {
    (outcome.custom_count, (outcome.custom_area * 1000.0).round() as i64)
}

#[derive(Clone, Copy)]
enum Step {
    Standard { x: Real, width: Real },
    Custom { x: Real, width: Real, area: Real },
}

impl Step {
    fn x(&self) -> Real {
        match *self {
            Step::Standard { x, .. } => x,
            Step::Custom { x, .. } => x,
        }
    }
}

fn overlap_area(component: &Polygon<Real>, x: Real, y: Real, w: Real, h: Real) -> Real {
    if w <= 0.0 || h <= 0.0 {
        return 0.0;
    }
    let candidate = as_multi(&rect(x, y, x + w, y + h));
    candidate.intersection(&as_multi(component)).unsigned_area()
}

/// Runs the main greedy loop from `start_x` to `x1`: at each cursor
/// position, commits to the first width in `order` whose candidate
/// rectangle overlaps the component at all, placing it as standard
/// when the overlap ratio clears [`FIT_RATIO`] and as an (implicit)
/// custom step otherwise. Stops when no candidate width both fits
/// within `x1` and overlaps the component.
fn greedy_steps(
    component: &Polygon<Real>,
    y: Real,
    height: Real,
    start_x: Real,
    x1: Real,
    order: &[Real],
    config: &PackerConfig,
) -> (Vec<Step>, Real) {
    let mut cursor = start_x;
    let mut steps = Vec::new();

    loop {
        if cursor >= x1 - config.coord_eps {
            break;
        }

        let mut advanced = false;
        for &w in order {
            if cursor + w > x1 + config.coord_eps {
                continue;
            }
            let overlap = overlap_area(component, cursor, y, w, height);
            if overlap < config.area_eps {
                continue;
            }
            let full = w * height;
            if full > 0.0 && overlap / full >= FIT_RATIO {
                steps.push(Step::Standard { x: cursor, width: w });
            } else {
                steps.push(Step::Custom { x: cursor, width: w, area: overlap });
            }
            cursor += w;
            advanced = true;
            break;
        }

        if !advanced {
            break;
        }
    }

    (steps, cursor)
}

fn tail_overlap(component: &Polygon<Real>, y: Real, height: Real, cursor: Real, x1: Real, config: &PackerConfig) -> Real {
    let width = x1 - cursor;
    if width <= config.coord_eps {
        0.0
    } else {
        overlap_area(component, cursor, y, width, height)
    }
}

fn score(steps: &[Step], tail: Real, config: &PackerConfig) -> (usize, Real) {
    let mut count = 0usize;
    let mut area = 0.0;
    for s in steps {
        if let Step::Custom { area: a, .. } = s {
            count += 1;
            area += a;
        }
    }
    if tail > config.area_eps {
        count += 1;
        area += tail;
    }
    (count, area)
}

fn finalize(steps: Vec<Step>) -> (Vec<(Real, Real)>, usize, Real) {
    let mut placements = Vec::new();
    let mut custom_count = 0;
    let mut custom_area = 0.0;
    for s in steps {
        match s {
            Step::Standard { x, width } => placements.push((x, width)),
            Step::Custom { area, .. } => {
                custom_count += 1;
                custom_area += area;
            }
        }
    }
    (placements, custom_count, custom_area)
}

/// Packs one component starting at `x0` with course-offset `offset`
/// (spec §4.4's "offset slot"): if the offset is positive and fits
/// within the component's bounding box, it is tried as its own
/// candidate width first — standard if it clears [`FIT_RATIO`],
/// custom otherwise — and the cursor always advances past it. The
/// main loop then proceeds from there with `order`.
///
/// If the segment ends with a residual narrower than
/// `config.micro_rest`, the last committed step is reverted and the
/// tail is retried with the reversed (smallest-first) order; whichever
/// of the two tails scores lower by [`cost`] is kept.
pub fn pack_segment(
    component: &Polygon<Real>,
    y: Real,
    height: Real,
    x0: Real,
    offset: Real,
    order: &[Real],
    config: &PackerConfig,
) -> SegmentOutcome {
    let bbox = match component.bounding_rect() {
        Some(b) => b,
        None => return SegmentOutcome::empty(),
    };
    let x1 = bbox.max().x;

    let mut cursor = x0;
    let mut steps = Vec::new();

    if offset > config.coord_eps && cursor + offset <= x1 + config.coord_eps {
        let overlap = overlap_area(component, cursor, y, offset, height);
        if overlap >= config.area_eps {
            let full = offset * height;
            if full > 0.0 && overlap / full >= FIT_RATIO {
                steps.push(Step::Standard { x: cursor, width: offset });
            } else {
                steps.push(Step::Custom { x: cursor, width: offset, area: overlap });
            }
        }
        cursor += offset;
    }

    let (mut rest, final_cursor) = greedy_steps(component, y, height, cursor, x1, order, config);
    steps.append(&mut rest);

    let tail = tail_overlap(component, y, height, final_cursor, x1, config);
    let rem = (x1 - final_cursor).max(0.0);

    if rem > config.coord_eps && rem < config.micro_rest && !steps.is_empty() {
        let forward_score = score(&steps, tail, config);

        let mut prefix = steps.clone();
        let last = prefix.pop().expect("steps is non-empty");
        let checkpoint_x = last.x();

        let reversed_order: Vec<Real> = order.iter().rev().cloned().collect();
        let (mut retry_rest, retry_cursor) =
            greedy_steps(component, y, height, checkpoint_x, x1, &reversed_order, config);
        let retry_tail = tail_overlap(component, y, height, retry_cursor, x1, config);

        let mut alt_steps = prefix;
        alt_steps.append(&mut retry_rest);
        let alt_score = score(&alt_steps, retry_tail, config);

        if alt_score < forward_score {
            debug!(
                checkpoint_x,
                forward_custom = forward_score.0,
                alt_custom = alt_score.0,
                "tail backtrack improved segment"
            );
            let (placements, custom_count, custom_area) = finalize(alt_steps);
            return SegmentOutcome {
                placements,
                custom_count: custom_count + if retry_tail > config.area_eps { 1 } else { 0 },
                custom_area: custom_area + retry_tail,
            };
        }
    }

    let (placements, custom_count, custom_area) = finalize(steps);
    SegmentOutcome {
        placements,
        custom_count: custom_count + if tail > config.area_eps { 1 } else { 0 },
        custom_area: custom_area + tail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect as mk_rect;

    #[test]
    fn packs_two_widest_blocks_exactly() {
        let comp = mk_rect(0.0, 0.0, 2478.0, 495.0); // 2 * 1239
        let order = vec![1239.0, 826.0, 413.0];
        let cfg = PackerConfig::default();
        let outcome = pack_segment(&comp, 0.0, 495.0, 0.0, 0.0, &order, &cfg);
        assert_eq!(outcome.placements.len(), 2);
        assert_eq!(outcome.custom_count, 0);
    }

    #[test]
    fn leaves_custom_tail_when_nothing_fits() {
        let comp = mk_rect(0.0, 0.0, 300.0, 495.0); // narrower than the smallest block
        let order = vec![1239.0, 826.0, 413.0];
        let cfg = PackerConfig::default();
        let outcome = pack_segment(&comp, 0.0, 495.0, 0.0, 0.0, &order, &cfg);
        assert!(outcome.placements.is_empty());
        assert_eq!(outcome.custom_count, 1);
        assert!((outcome.custom_area - 300.0 * 495.0).abs() < 1.0);
    }

    #[test]
    fn backtrack_can_eliminate_a_micro_rest_tail() {
        // 821 and 413 share no common factor (unlike the default
        // {1239, 826, 413}, all multiples of 413, which makes the
        // leftover remainder invariant to ordering). Widest-first on an
        // 826mm segment places one 821mm block and is left with an
        // unplaceable 5mm sliver (below MICRO_REST=15); reverting that
        // block and retrying smallest-first exactly tiles the segment
        // as two 413mm blocks instead.
        let comp = mk_rect(0.0, 0.0, 826.0, 495.0);
        let order = vec![821.0, 413.0];
        let cfg = PackerConfig::default();
        let outcome = pack_segment(&comp, 0.0, 495.0, 0.0, 0.0, &order, &cfg);
        assert_eq!(outcome.custom_count, 0);
    }

    #[test]
    fn offset_slot_is_placed_as_standard_when_it_fits() {
        let comp = mk_rect(0.0, 0.0, 826.0 + 1239.0, 495.0);
        let order = vec![1239.0, 826.0, 413.0];
        let cfg = PackerConfig::default();
        let outcome = pack_segment(&comp, 0.0, 495.0, 0.0, 826.0, &order, &cfg);
        assert_eq!(outcome.placements.len(), 2);
        assert_eq!(outcome.placements[0], (0.0, 826.0));
    }
}
