//! Width-order trials (spec §4.5): a segment is packed once per
//! candidate ordering in [`PackerConfig::orders`], and the ordering
//! that scores lowest by [`segment::cost`] wins.

use geo::Polygon;

use crate::config::PackerConfig;
use crate::float_types::Real;
use crate::packer::segment::{self, pack_segment, SegmentOutcome};

/// Packs `component` once per order in `config.orders`, returning the
/// best (lowest-cost) outcome. `config.orders` is guaranteed non-empty
/// by [`PackerConfig::validate`].
pub fn pack_best_order(
    component: &Polygon<Real>,
    y: Real,
    height: Real,
    x0: Real,
    offset: Real,
    config: &PackerConfig,
) -> SegmentOutcome {
    config
        .orders
        .iter()
        .map(|order| pack_segment(component, y, height, x0, offset, order, config))
        .min_by(|a, b| segment::cost(a).cmp(&segment::cost(b)))
        .unwrap_or(SegmentOutcome { placements: Vec::new(), custom_count: 0, custom_area: 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect;

    #[test]
    fn picks_the_order_with_least_waste() {
        let comp = rect(0.0, 0.0, 1652.0, 495.0); // 826 * 2
        let mut cfg = PackerConfig::default();
        cfg.orders = vec![vec![1239.0, 826.0, 413.0], vec![826.0, 413.0, 1239.0]];
        let outcome = pack_best_order(&comp, 0.0, 495.0, 0.0, 0.0, &cfg);
        assert_eq!(outcome.custom_count, 0);
    }
}
