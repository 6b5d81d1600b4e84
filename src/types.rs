//! Output data model: standard placements, custom pieces, and the
//! overall construction plan. Mirrors the spec's §3 Data Model and §6
//! JSON-equivalent output schema one-for-one.

use std::collections::BTreeMap;

use geo::Polygon;
use serde::{Deserialize, Serialize};

use crate::float_types::Real;

/// One standard block, already snapped and positioned.
///
/// Invariant upheld by the packer (never checked here, just carried):
/// the rectangle `[x, x+width] x [y, y+height]` lies entirely inside
/// the wall and does not intersect the keep-out mask, to within
/// `AREA_EPS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardPlacement {
    pub label: String,
    pub kind_tag: String,
    pub width: Real,
    pub height: Real,
    pub x: Real,
    pub y: Real,
}

impl StandardPlacement {
    pub fn new(label: String, width: Real, height: Real, x: Real, y: Real) -> Self {
        StandardPlacement {
            label,
            kind_tag: format!("std_{}x{}", width.round() as i64, height.round() as i64),
            width,
            height,
            x,
            y,
        }
    }
}

/// The classification assigned to a custom piece at emission time
/// (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ctype {
    /// Width-only cut from a standard-height source block.
    One,
    /// Flexible cut with non-standard height.
    Two,
    /// Exceeds `MAX_STD_WIDTH` or `COURSE_HEIGHT` and was sliced into
    /// bounded-width strips.
    OutOfSpec,
}

impl Ctype {
    /// The code used in labels: `CU1`, `CU2`, `CUX`.
    pub fn code(self) -> &'static str {
        match self {
            Ctype::One => "1",
            Ctype::Two => "2",
            Ctype::OutOfSpec => "X",
        }
    }
}

/// A residual polygon no standard block can cover, emitted verbatim as
/// geometry alongside its bounding-box dimensions and advisory
/// cut-planning fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPiece {
    pub label: String,
    pub width: Real,
    pub height: Real,
    pub x: Real,
    pub y: Real,
    pub geometry: Polygon<Real>,
    pub ctype: Ctype,
    /// Advisory: the standard width this piece would most efficiently
    /// be cut from. Never used to alter placement decisions.
    pub source_block_width: Real,
    /// Advisory: `source_block_width - width`.
    pub waste: Real,
}

/// The full construction plan returned by [`crate::pack_wall`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackPlan {
    pub units: &'static str,
    pub placed: Vec<StandardPlacement>,
    pub customs: Vec<CustomPiece>,
    pub summary: BTreeMap<String, usize>,
}

impl PackPlan {
    pub fn empty() -> Self {
        PackPlan {
            units: "mm",
            placed: Vec::new(),
            customs: Vec::new(),
            summary: BTreeMap::new(),
        }
    }

    /// Recomputes `summary` (kind-tag -> count) from `placed`. Called
    /// once, after all courses are packed.
    pub fn recompute_summary(&mut self) {
        self.summary.clear();
        for p in &self.placed {
            *self.summary.entry(p.kind_tag.clone()).or_insert(0) += 1;
        }
    }
}

/// Per-call, local label counters (never shared across `pack_wall`
/// invocations — see spec §9 "Emission-order counters for labels").
#[derive(Debug, Default)]
pub struct LabelCounters {
    per_letter: BTreeMap<char, usize>,
    per_ctype: BTreeMap<&'static str, usize>,
}

impl LabelCounters {
    pub fn next_standard(&mut self, letter: char) -> String {
        let n = self.per_letter.entry(letter).or_insert(0);
        *n += 1;
        format!("{letter}{n}")
    }

    pub fn next_custom(&mut self, ctype: Ctype) -> String {
        let code = ctype.code();
        let n = self.per_ctype.entry(code).or_insert(0);
        *n += 1;
        format!("CU{code}({n})")
    }
}
