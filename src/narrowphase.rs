use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::types::Axis;

/// Narrowphase primitive tests.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn overlap_box_box(c0: Vec2, s0: Vec2, c1: Vec2, s1: Vec2) -> bool {
        // Separating axis on an AABB pair, in doubled units to skip the halving
        let d = (c0 - c1).abs() * 2.0;
        let s = s0 + s1;
        d.x < s.x && d.y < s.y
    }

    fn overlap_circle_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> bool {
        let rsum = r0 + r1;
        c0.distance_squared(c1) < rsum * rsum
    }

    fn overlap_box_circle(box_min: Vec2, box_max: Vec2, c: Vec2, r: f32) -> bool {
        let closest = Self::closest_point_on_box(c, box_min, box_max);
        (closest - c).length_squared() < r * r
    }

    fn closest_point_on_box(p: Vec2, box_min: Vec2, box_max: Vec2) -> Vec2 {
        p.clamp(box_min, box_max.max(box_min))
    }

    fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
        let d = b - a;
        let len2 = d.length_squared();
        if len2 <= f32::EPSILON {
            return a;
        }
        let t = ((p - a).dot(d) / len2).clamp(0.0, 1.0);
        a + d * t
    }

    fn interval_overlap(min0: f32, max0: f32, min1: f32, max1: f32) -> f32 {
        max0.min(max1) - min0.max(min1)
    }

    fn box_separation(min0: f32, max0: f32, c0: f32, min1: f32, max1: f32, c1: f32) -> f32 {
        if min0 > min1 {
            max1 - min0
        } else if max0 < max1 {
            min1 - max0
        } else if c0 >= c1 {
            // Interval 0 contains interval 1: leave through the nearer edge
            max1 - min0
        } else {
            min1 - max0
        }
    }

    fn sweep_box_box(min0: Vec2, max0: Vec2, motion: Vec2, min1: Vec2, max1: Vec2) -> Option<(f32, Axis)> {
        // Slab method per axis, strict like the overlap tests
        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;
        let mut entry_axis = Axis::Vertical;
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let (lo0, hi0, m) = (axis.pick(min0), axis.pick(max0), axis.pick(motion));
            let (lo1, hi1) = (axis.pick(min1), axis.pick(max1));
            if m.abs() < f32::EPSILON {
                if hi0 <= lo1 || lo0 >= hi1 {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / m;
            let mut t1 = (lo1 - hi0) * inv;
            let mut t2 = (hi1 - lo0) * inv;
            if t1 > t2 {
                core::mem::swap(&mut t1, &mut t2);
            }
            if t1 > enter {
                enter = t1;
                entry_axis = axis;
            }
            exit = exit.min(t2);
        }
        if enter >= exit || enter >= 1.0 || exit <= 0.0 {
            return None;
        }
        Some((enter.max(0.0), entry_axis))
    }

    fn chord_half_width(r: f32, d: f32) -> Option<f32> {
        let d = d.abs();
        if d >= r {
            return None;
        }
        Some((r * r - d * d).sqrt())
    }
}
