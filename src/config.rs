//! Explicit, plain-struct packer configuration.
//!
//! Every numeric knob named in the specification's configuration table
//! lives here. There is no global mutable state and no process-wide
//! constant table — a caller packing two walls concurrently with
//! different block libraries just builds two `PackerConfig`s.

use std::collections::BTreeMap;

use crate::errors::PackingError;
use crate::float_types::Real;

/// Tunable knobs for [`crate::pack_wall`]. See the crate's spec for the
/// meaning of each field; defaults match the spec's configuration
/// table exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct PackerConfig {
    /// Standard block widths, any order (the packer sorts as needed).
    pub widths: Vec<Real>,
    /// Height of one standard course.
    pub course_height: Real,
    /// Starting offset tried for odd-indexed courses (running bond).
    pub row_offset: Real,
    /// Coordinate snap grid. `0.0` disables snapping.
    pub snap: Real,
    /// Outward buffer applied to the aperture/hole union to form the
    /// keep-out mask. `0.0` disables buffering (mask = raw union).
    pub keep_out: Real,
    /// Minimum area treated as non-empty geometry.
    pub area_eps: Real,
    /// Coordinate comparison tolerance.
    pub coord_eps: Real,
    /// A segment tail below this width triggers the backtrack pass.
    pub micro_rest: Real,
    /// Width/height tolerance used by classification and the in-spec test.
    pub custom_tol: Real,
    /// Maximum width for an in-spec custom piece; also the strip width
    /// used to slice a too-wide piece. Independent of `max_std_width()`
    /// — the threshold [`PackerConfig::validate`] checks is only that
    /// this is positive, not that it relates to the block widths any
    /// particular way. Must be positive.
    pub split_max_width: Real,
    /// Minimum leftover vertical space required to run an adaptive
    /// final course.
    pub min_adaptive_height: Real,
    /// Width (rounded to the nearest mm) -> label letter. Widths with
    /// no exact entry fall back to the nearest key; an empty map
    /// degrades every label to `X`.
    pub size_to_letter: BTreeMap<i64, char>,
    /// Candidate width orderings tried per segment/offset (spec §4.5).
    /// Must be non-empty; each order should be a permutation of `widths`.
    pub orders: Vec<Vec<Real>>,
}

impl Default for PackerConfig {
    fn default() -> Self {
        let widths = vec![1239.0, 826.0, 413.0];
        let size_to_letter = BTreeMap::from([(1239, 'A'), (826, 'B'), (413, 'C')]);
        let orders = vec![
            vec![1239.0, 826.0, 413.0],
            vec![826.0, 1239.0, 413.0],
        ];

        PackerConfig {
            widths,
            course_height: 495.0,
            row_offset: 826.0,
            snap: 1.0,
            keep_out: 2.0,
            area_eps: 1e-3,
            coord_eps: 1e-6,
            micro_rest: 15.0,
            custom_tol: 5.0,
            split_max_width: 413.0,
            min_adaptive_height: 150.0,
            size_to_letter,
            orders,
        }
    }
}

impl PackerConfig {
    /// Rejects configurations the spec's error taxonomy names as
    /// `ConfigError`: an empty width library, a non-positive course
    /// height, a negative adaptive-course threshold, an empty `orders`
    /// list, or a non-positive `split_max_width` (which would otherwise
    /// never advance the strip-slicing cursor in `split_out_of_spec`).
    pub fn validate(&self) -> Result<(), PackingError> {
        if self.widths.is_empty() {
            return Err(PackingError::ConfigError {
                detail: "widths must contain at least one block width".into(),
            });
        }
        if self.course_height <= 0.0 {
            return Err(PackingError::ConfigError {
                detail: format!("course_height must be positive, got {}", self.course_height),
            });
        }
        if self.min_adaptive_height < 0.0 {
            return Err(PackingError::ConfigError {
                detail: format!(
                    "min_adaptive_height must be non-negative, got {}",
                    self.min_adaptive_height
                ),
            });
        }
        if self.orders.is_empty() {
            return Err(PackingError::ConfigError {
                detail: "orders must contain at least one width ordering".into(),
            });
        }
        if self.split_max_width <= 0.0 {
            return Err(PackingError::ConfigError {
                detail: format!("split_max_width must be positive, got {}", self.split_max_width),
            });
        }
        Ok(())
    }

    /// Widest standard block in the library (`MAX_STD_WIDTH` in the
    /// classification rules of §4.7).
    pub fn max_std_width(&self) -> Real {
        self.widths.iter().cloned().fold(Real::MIN, Real::max)
    }

    /// Narrowest standard block in the library, used as the fallback
    /// odd-course offset when `row_offset` is unset and as the tail
    /// backtrack's smallest-first increment.
    pub fn min_width(&self) -> Real {
        self.widths.iter().cloned().fold(Real::MAX, Real::min)
    }

    /// Widths sorted descending (the default greedy order).
    pub fn widths_desc(&self) -> Vec<Real> {
        let mut w = self.widths.clone();
        w.sort_by(|a, b| b.partial_cmp(a).unwrap());
        w
    }

    /// Label letter for a standard block of the given width: an exact
    /// match in `size_to_letter`, else the nearest key, else `'X'`.
    pub fn letter_for_width(&self, width: Real) -> char {
        let rounded = width.round() as i64;
        if let Some(&letter) = self.size_to_letter.get(&rounded) {
            return letter;
        }
        self.size_to_letter
            .keys()
            .min_by_key(|&&k| (k - rounded).abs())
            .map(|k| self.size_to_letter[k])
            .unwrap_or('X')
    }
}
