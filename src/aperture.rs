//! Aperture filtering and keep-out mask construction (spec §4.2).
//!
//! Apertures are supplied by the caller and never mutated after
//! filtering; rejections are reported as side-band `tracing`
//! diagnostics and never affect the returned plan (spec §7).

use geo::{Area, BooleanOps, MultiPolygon, Polygon};
use tracing::warn;

use crate::config::PackerConfig;
use crate::errors::PackingError;
use crate::float_types::Real;
use crate::geometry::{as_multi, holes, sanitize};

/// Minimum aperture area (area-units²) below which an opening is
/// treated as input noise rather than a real door/window.
const MIN_APERTURE_AREA: Real = 1000.0;

/// Above this fraction of the wall's area, an aperture is assumed to
/// be a mistaken re-submission of the wall itself.
const MAX_APERTURE_WALL_RATIO: Real = 0.80;

/// Filters implausible apertures, unions the survivors with the wall's
/// own holes, and optionally buffers the result outward by
/// `config.keep_out`. Returns `None` when there is nothing to keep out.
pub fn build_keep_out(
    wall: &Polygon<Real>,
    apertures: &[Polygon<Real>],
    config: &PackerConfig,
) -> Result<Option<MultiPolygon<Real>>, PackingError> {
    let wall_area = wall.unsigned_area();
    let mut union_pieces: Vec<Polygon<Real>> = holes(wall);

    for (index, raw) in apertures.iter().enumerate() {
        let aperture = sanitize(raw)?;
        let area = aperture.unsigned_area();

        if area < MIN_APERTURE_AREA {
            warn!(index, area, "aperture rejected: below minimum area (micro-opening)");
            continue;
        }

        let ratio = if wall_area > 0.0 { area / wall_area } else { Real::INFINITY };
        if ratio > MAX_APERTURE_WALL_RATIO {
            warn!(index, area, ratio, "aperture rejected: exceeds 80% of wall area");
            continue;
        }

        union_pieces.push(aperture);
    }

    if union_pieces.is_empty() {
        return Ok(None);
    }

    let mut mask = as_multi(&union_pieces[0]);
    for piece in &union_pieces[1..] {
        mask = mask.union(&as_multi(piece));
    }

    if config.keep_out > 0.0 {
        mask = geo_buf::buffer_multi_polygon(&mask, config.keep_out);
    }

    if mask.0.is_empty() {
        Ok(None)
    } else {
        Ok(Some(mask))
    }
}
