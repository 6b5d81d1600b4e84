//! The standard-block packer: segment placement, width-order trials,
//! and course-level offset selection (spec §4.4-§4.6).

pub mod course;
pub mod orders;
pub mod segment;

use crate::config::PackerConfig;
use crate::stripe::Course;

pub use course::{CourseResult, PackedComponent};

/// Packs every course independently; course order has no bearing on
/// any other course's placements (spec's determinism and independence
/// invariants).
pub fn pack_courses(courses: &[Course], config: &PackerConfig) -> Vec<CourseResult> {
    courses.iter().map(|c| course::pack_course(c, config)).collect()
}
