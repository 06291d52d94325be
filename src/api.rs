use glam::Vec2;

use crate::types::{Axis, ShapeKind};

/// Queries every bounds shape answers on its own.
pub trait Shape {
    fn kind(&self) -> ShapeKind;

    fn center(&self) -> Vec2;

    /// Minimum corner of the axis-aligned extent.
    fn min_corner(&self) -> Vec2;

    /// Maximum corner of the axis-aligned extent.
    fn max_corner(&self) -> Vec2;

    /// Closest point of the shape (boundary or interior) to `p`.
    fn closest_point(&self, p: Vec2) -> Vec2;

    fn translate(&mut self, delta: Vec2);

    /// Width/height of the axis-aligned extent.
    fn extent(&self) -> Vec2 {
        self.max_corner() - self.min_corner()
    }
}

/// Primitive analytic tests the bounds dispatch is built from.
pub trait NarrowphaseApi {
    // Overlaps --------------------------------------------------------------

    /// Strict AABB test on centers and full sizes (touching is not overlapping).
    fn overlap_box_box(c0: Vec2, s0: Vec2, c1: Vec2, s1: Vec2) -> bool;
    fn overlap_circle_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> bool;
    fn overlap_box_circle(box_min: Vec2, box_max: Vec2, c: Vec2, r: f32) -> bool;

    // Closest points --------------------------------------------------------

    fn closest_point_on_box(p: Vec2, box_min: Vec2, box_max: Vec2) -> Vec2;
    fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2;

    // 1D helpers for axis-separated push-out ---------------------------------

    /// Overlap length of two intervals; negative when separated.
    fn interval_overlap(min0: f32, max0: f32, min1: f32, max1: f32) -> f32;

    /// Translation of interval 0 that leaves it touching interval 1.
    fn box_separation(min0: f32, max0: f32, c0: f32, min1: f32, max1: f32, c1: f32) -> f32;

    // Sweeps ----------------------------------------------------------------

    /// Box 0 moving by `motion` against a resting box 1: the fraction of the
    /// motion at which they first strictly overlap, and the axis it enters
    /// across. `None` when the motion never brings them into overlap.
    fn sweep_box_box(min0: Vec2, max0: Vec2, motion: Vec2, min1: Vec2, max1: Vec2) -> Option<(f32, Axis)>;

    /// Half-width of the chord of a circle of radius `r` at distance `d` from its center.
    fn chord_half_width(r: f32, d: f32) -> Option<f32>;
}
