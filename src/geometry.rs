//! Polygon primitives shared by every pipeline stage: validity repair,
//! coordinate snapping, hole extraction, and normalizing boolean-op
//! results into a flat sequence of components.
//!
//! Boolean operations themselves (union/intersection/difference) are
//! not reimplemented here — they're `geo`'s [`geo::BooleanOps`], used
//! directly at the call site the way `csgrs` uses them on its own
//! `Sketch` geometry collections.

use geo::algorithm::map_coords::MapCoords;
use geo::{Area, Coord, HasDimensions, LineString, MultiPolygon, Polygon};

use crate::errors::PackingError;
use crate::float_types::Real;

/// Rounds `v` to the nearest multiple of `grid`. `grid <= 0.0` disables
/// snapping (returns `v` unchanged) — used when a caller wants exact
/// arithmetic, e.g. in tests.
pub fn snap(v: Real, grid: Real) -> Real {
    if grid <= 0.0 {
        v
    } else {
        (v / grid).round() * grid
    }
}

/// Snaps every coordinate of a polygon onto the grid.
pub fn snap_polygon(p: &Polygon<Real>, grid: Real) -> Polygon<Real> {
    p.map_coords(|c| Coord {
        x: snap(c.x, grid),
        y: snap(c.y, grid),
    })
}

/// Builds an axis-aligned rectangle `[minx, maxx] x [miny, maxy]`.
/// Never produces a degenerate (zero-area) ring for well-ordered
/// bounds; callers are responsible for ensuring `minx < maxx` and
/// `miny < maxy`.
pub fn rect(minx: Real, miny: Real, maxx: Real, maxy: Real) -> Polygon<Real> {
    Polygon::new(
        LineString::from(vec![
            (minx, miny),
            (maxx, miny),
            (maxx, maxy),
            (minx, maxy),
            (minx, miny),
        ]),
        vec![],
    )
}

/// Wraps a single polygon as a one-element `MultiPolygon`, the shape
/// `geo::BooleanOps` operates on.
pub fn as_multi(p: &Polygon<Real>) -> MultiPolygon<Real> {
    MultiPolygon(vec![p.clone()])
}

/// Repairs a polygon that may self-intersect or otherwise be invalid
/// by running it through a zero-distance buffer — the same
/// close-and-reopen trick `shapely`'s `buffer(0)` performs, implemented
/// here via `geo-buf`'s offsetting routine at `distance = 0.0`. Applied
/// unconditionally (it's a no-op on an already-valid polygon) since
/// this crate's geometry stack has no cheaper standalone validity
/// predicate to gate it behind.
///
/// Fails with [`PackingError::InvalidGeometry`] if the repair collapses
/// the polygon to nothing.
pub fn sanitize(p: &Polygon<Real>) -> Result<Polygon<Real>, PackingError> {
    let repaired = geo_buf::buffer_polygon(p, 0.0);
    let mut pieces: Vec<Polygon<Real>> = repaired
        .0
        .into_iter()
        .filter(|poly| !poly.is_empty() && poly.unsigned_area() > 0.0)
        .collect();

    if pieces.is_empty() {
        return Err(PackingError::InvalidGeometry {
            detail: "polygon repair (zero-width buffer) yielded empty geometry".into(),
        });
    }

    // A single closed outline should repair to a single ring; if the
    // repair split it into several (e.g. a bowtie self-intersection),
    // keep the largest as the wall and drop the slivers.
    pieces.sort_by(|a, b| b.unsigned_area().partial_cmp(&a.unsigned_area()).unwrap());
    Ok(pieces.remove(0))
}

/// Returns the interior rings of `p` as standalone polygons, dropping
/// any ring with fewer than 3 distinct vertices (a closed ring's first
/// and last coordinate are identical, so the distinct count is
/// `coords.len() - 1`).
pub fn holes(p: &Polygon<Real>) -> Vec<Polygon<Real>> {
    p.interiors()
        .iter()
        .filter(|ring| ring.0.len().saturating_sub(1) >= 3)
        .map(|ring| Polygon::new(ring.clone(), vec![]))
        .collect()
}

/// Flattens a `MultiPolygon` into its constituent polygons, dropping
/// empty pieces. Does not apply an area threshold — callers compare
/// against their own `AREA_EPS`.
pub fn components(mp: &MultiPolygon<Real>) -> Vec<Polygon<Real>> {
    mp.0.iter().filter(|p| !p.is_empty()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_grid() {
        assert_eq!(snap(1.4, 1.0), 1.0);
        assert_eq!(snap(1.5, 1.0), 2.0);
        assert_eq!(snap(1234.6, 1.0), 1235.0);
        assert_eq!(snap(7.0, 0.0), 7.0);
    }

    #[test]
    fn holes_extracts_interior_rings() {
        let outer = LineString::from(vec![
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]);
        let hole = LineString::from(vec![
            (2.0, 2.0),
            (4.0, 2.0),
            (4.0, 4.0),
            (2.0, 4.0),
            (2.0, 2.0),
        ]);
        let poly = Polygon::new(outer, vec![hole]);
        let hs = holes(&poly);
        assert_eq!(hs.len(), 1);
        assert!((hs[0].unsigned_area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn sanitize_is_noop_on_valid_rectangle() {
        let r = rect(0.0, 0.0, 100.0, 50.0);
        let fixed = sanitize(&r).unwrap();
        assert!((fixed.unsigned_area() - 5000.0).abs() < 1e-6);
    }

    #[test]
    fn components_flattens_and_drops_empty() {
        let mp = MultiPolygon(vec![
            rect(0.0, 0.0, 10.0, 10.0),
            rect(20.0, 0.0, 30.0, 10.0),
        ]);
        assert_eq!(components(&mp).len(), 2);
    }
}
