//! Custom-piece extraction: row-aware coalescing of leftover geometry,
//! classification, and out-of-spec splitting (spec §4.7).

use std::collections::BTreeMap;

use geo::{Area, BooleanOps, BoundingRect, MultiPolygon, Polygon};
use itertools::Itertools;

use crate::config::PackerConfig;
use crate::float_types::Real;
use crate::geometry::{as_multi, components, rect, snap};
use crate::packer::{CourseResult, PackedComponent};
use crate::types::{Ctype, CustomPiece, LabelCounters};

/// Classifies a bounding-box width/height against the standard-block
/// library. Always compares height against the *nominal*
/// `config.course_height`, not the possibly-reduced height of the
/// course a piece came from — a custom cut from the adaptive final
/// course is non-standard-height by construction, even though its
/// height exactly fills that course's own band.
fn classify(width: Real, height: Real, config: &PackerConfig) -> Ctype {
    if width > config.max_std_width() + config.custom_tol || height > config.course_height + config.custom_tol {
        return Ctype::OutOfSpec;
    }
    if (height - config.course_height).abs() <= config.custom_tol {
        Ctype::One
    } else {
        Ctype::Two
    }
}

/// Whether a piece needs slicing before it can be cut from a single
/// source block, per the *splitting* threshold — `config.split_max_width`
/// and `config.course_height`, independent of [`classify`]'s
/// `MAX_STD_WIDTH` threshold. A wall with `split_max_width` narrower
/// than `config.max_std_width()` routes pieces through
/// [`split_out_of_spec`] well before they'd ever be classified
/// [`Ctype::OutOfSpec`]; a wall with it wider never splits at all, and
/// classification alone decides `OutOfSpec`.
fn needs_split(width: Real, height: Real, config: &PackerConfig) -> bool {
    width > config.split_max_width + config.custom_tol || height > config.course_height + config.custom_tol
}

/// Advisory: the narrowest standard width that still covers `width`,
/// paired with the resulting waste. Falls back to the widest standard
/// block if none is wide enough (never affects placement, only the
/// cut-planning hint carried on [`CustomPiece`]).
fn choose_source_block(width: Real, config: &PackerConfig) -> (Real, Real) {
    let mut covering: Vec<Real> = config
        .widths
        .iter()
        .cloned()
        .filter(|&w| w + config.coord_eps >= width)
        .collect();
    covering.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let source = covering.first().copied().unwrap_or_else(|| config.max_std_width());
    (source, (source - width).max(0.0))
}

/// Slices a piece wider than `strip_width` into vertical strips no
/// wider than `strip_width`, left to right (spec §4.7 "out-of-spec
/// splitting").
fn split_out_of_spec(piece: &Polygon<Real>, strip_width: Real, config: &PackerConfig) -> Vec<Polygon<Real>> {
    let bbox = match piece.bounding_rect() {
        Some(b) => b,
        None => return Vec::new(),
    };
    let (minx, maxx) = (bbox.min().x, bbox.max().x);
    let (miny, maxy) = (bbox.min().y, bbox.max().y);
    let piece_mp = as_multi(piece);

    let mut strips = Vec::new();
    let mut x = minx;
    while x < maxx - config.coord_eps {
        let x_end = (x + strip_width).min(maxx);
        let band = as_multi(&rect(x, miny, x_end, maxy));
        let cut = piece_mp.intersection(&band);
        strips.extend(
            components(&cut)
                .into_iter()
                .filter(|p| p.unsigned_area() >= config.area_eps),
        );
        x = x_end;
    }
    strips
}

/// The geometry of one component not covered by its own placed
/// standard blocks.
fn leftover_for_component(pc: &PackedComponent, y: Real, height: Real) -> MultiPolygon<Real> {
    if pc.outcome.placements.is_empty() {
        return as_multi(&pc.polygon);
    }
    let mut placed = as_multi(&rect(
        pc.outcome.placements[0].0,
        y,
        pc.outcome.placements[0].0 + pc.outcome.placements[0].1,
        y + height,
    ));
    for &(x, w) in &pc.outcome.placements[1..] {
        placed = placed.union(&as_multi(&rect(x, y, x + w, y + height)));
    }
    as_multi(&pc.polygon).difference(&placed)
}

fn emit(piece: Polygon<Real>, config: &PackerConfig, counters: &mut LabelCounters) -> CustomPiece {
    let bbox = piece
        .bounding_rect()
        .expect("custom piece has non-empty bounding box");
    let width = bbox.max().x - bbox.min().x;
    let height = bbox.max().y - bbox.min().y;
    let ctype = classify(width, height, config);
    let (source_block_width, waste) = choose_source_block(width, config);
    let label = counters.next_custom(ctype);

    // The piece's own geometry is kept exact (it's the residual to be
    // cut, not a placement); only the bounding-box summary fields are
    // snapped onto the grid, per spec §3's "Width and height are the
    // polygon's axis-aligned bounding-box dimensions, snapped."
    CustomPiece {
        label,
        width: snap(width, config.snap),
        height: snap(height, config.snap),
        x: snap(bbox.min().x, config.snap),
        y: snap(bbox.min().y, config.snap),
        geometry: piece,
        ctype,
        source_block_width,
        waste,
    }
}

/// Extracts every custom piece from a packed wall, course by course.
/// Within a course, every component's leftover geometry is unioned
/// before re-splitting into pieces (spec's row-aware coalescing) so
/// that, say, a running-bond offset gap on one component and a
/// backtrack remainder on its neighbor merge into one larger custom
/// cut instead of two slivers.
pub fn extract_customs(
    courses: &[CourseResult],
    config: &PackerConfig,
    counters: &mut LabelCounters,
) -> Vec<CustomPiece> {
    // Tag every leftover piece with its row id (`round(y / course_height)`,
    // per spec §4.7) rather than trusting course order, so coalescing
    // groups strictly by y-band even if a future caller ever hands
    // courses in to this function out of order.
    let mut tagged: Vec<(i64, Polygon<Real>)> = Vec::new();
    for course in courses {
        let row_id = (course.y / config.course_height).round() as i64;
        for pc in &course.components {
            let lo = leftover_for_component(pc, course.y, course.height);
            tagged.extend(
                components(&lo)
                    .into_iter()
                    .filter(|p| p.unsigned_area() >= config.area_eps)
                    .map(|p| (row_id, p)),
            );
        }
    }

    if tagged.is_empty() {
        return Vec::new();
    }

    let by_row: BTreeMap<i64, Vec<Polygon<Real>>> = tagged.into_iter().into_group_map().into_iter().collect();

    let mut out = Vec::new();
    for (_row_id, leftovers) in by_row {
        let mut merged = as_multi(&leftovers[0]);
        for p in &leftovers[1..] {
            merged = merged.union(&as_multi(p));
        }

        let pieces: Vec<Polygon<Real>> = components(&merged)
            .into_iter()
            .filter(|p| p.unsigned_area() >= config.area_eps)
            .collect();

        for piece in pieces {
            let bbox = match piece.bounding_rect() {
                Some(b) => b,
                None => continue,
            };
            let width = bbox.max().x - bbox.min().x;
            let height = bbox.max().y - bbox.min().y;

            if needs_split(width, height, config) {
                for strip in split_out_of_spec(&piece, config.split_max_width, config) {
                    out.push(emit(strip, config, counters));
                }
            } else {
                out.push(emit(piece, config, counters));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_standard_height_and_width_is_one() {
        let cfg = PackerConfig::default();
        assert_eq!(classify(300.0, 495.0, &cfg), Ctype::One);
    }

    #[test]
    fn classify_nonstandard_height_is_two() {
        let cfg = PackerConfig::default();
        assert_eq!(classify(300.0, 210.0, &cfg), Ctype::Two);
    }

    #[test]
    fn classify_wider_than_max_std_width_is_out_of_spec() {
        let cfg = PackerConfig::default();
        // 900mm is wider than SPLIT_MAX_WIDTH (413) but narrower than
        // MAX_STD_WIDTH (1239) — classification must use the latter.
        assert_eq!(classify(900.0, 495.0, &cfg), Ctype::Two);
        assert_eq!(classify(1300.0, 495.0, &cfg), Ctype::OutOfSpec);
    }

    #[test]
    fn classify_taller_than_course_height_is_out_of_spec() {
        let cfg = PackerConfig::default();
        assert_eq!(classify(300.0, 520.0, &cfg), Ctype::OutOfSpec);
    }

    #[test]
    fn needs_split_and_classify_use_independent_thresholds() {
        let cfg = PackerConfig::default();
        // Wide enough to need splitting (> SPLIT_MAX_WIDTH) but not wide
        // enough to ever classify as out-of-spec on its own.
        assert!(needs_split(900.0, 495.0, &cfg));
        assert_eq!(classify(900.0, 495.0, &cfg), Ctype::Two);
    }

    #[test]
    fn source_block_picks_narrowest_covering_width() {
        let cfg = PackerConfig::default();
        let (source, waste) = choose_source_block(300.0, &cfg);
        assert_eq!(source, 413.0);
        assert!((waste - 113.0).abs() < 1e-6);
    }

    #[test]
    fn split_out_of_spec_bounds_every_strip_width() {
        let piece = rect(0.0, 0.0, 1000.0, 495.0);
        let cfg = PackerConfig::default();
        let strips = split_out_of_spec(&piece, cfg.split_max_width, &cfg);
        assert!(strips.len() >= 3);
        for s in &strips {
            let bbox = s.bounding_rect().unwrap();
            assert!(bbox.max().x - bbox.min().x <= cfg.split_max_width + cfg.coord_eps);
        }
    }
}
