//! Bounds shapes and pairwise geometry.
//!
//! The shape set is closed: [`Bounds`] is a tagged variant and every pairwise
//! query matches on the pair of tags. Pairs without a routine fail with
//! [`PhysicsError::UnsupportedShapePair`] instead of reporting "no overlap".
//!
//! Separation offsets are the translation to apply to `self` so that it ends
//! up touching `other` along one axis.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::{NarrowphaseApi, Shape};
use crate::error::{PhysicsError, Result};
use crate::narrowphase::Narrowphase;
use crate::types::{Axis, ShapeKind};

/// Axis-aligned box stored as center + full size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxBounds {
    center: Vec2,
    size: Vec2,
}

impl BoxBounds {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x >= 0.0 && size.y >= 0.0, "negative box size {size}");
        Self {
            center,
            size: size.max(Vec2::ZERO),
        }
    }

    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y, "inverted box corners {min} / {max}");
        let max = max.max(min);
        Self::new((min + max) * 0.5, max - min)
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }
}

impl Shape for BoxBounds {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Box
    }

    fn center(&self) -> Vec2 {
        self.center
    }

    fn min_corner(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    fn max_corner(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    fn closest_point(&self, p: Vec2) -> Vec2 {
        Narrowphase::closest_point_on_box(p, self.min_corner(), self.max_corner())
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CircleBounds {
    center: Vec2,
    radius: f32,
}

impl CircleBounds {
    pub fn new(center: Vec2, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "negative circle radius {radius}");
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for CircleBounds {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn center(&self) -> Vec2 {
        self.center
    }

    fn min_corner(&self) -> Vec2 {
        self.center - Vec2::splat(self.radius)
    }

    fn max_corner(&self) -> Vec2 {
        self.center + Vec2::splat(self.radius)
    }

    fn closest_point(&self, p: Vec2) -> Vec2 {
        let d = p - self.center;
        if d.length_squared() <= self.radius * self.radius {
            p
        } else {
            self.center + d.normalize() * self.radius
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}

/// Orientation of a capsule's core segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapsuleDirection {
    #[default]
    Vertical,
    Horizontal,
}

impl CapsuleDirection {
    fn axis(self) -> Axis {
        match self {
            CapsuleDirection::Vertical => Axis::Vertical,
            CapsuleDirection::Horizontal => Axis::Horizontal,
        }
    }
}

/// Rectangle with a circle capping each end, all sharing one radius.
///
/// The radius is half the smaller side of `size`; the rectangle spans the
/// rest of the long side. A capsule whose long side is across `direction`
/// degenerates into a circle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CapsuleBounds {
    center: Vec2,
    size: Vec2,
    direction: CapsuleDirection,
}

impl CapsuleBounds {
    pub fn new(center: Vec2, size: Vec2, direction: CapsuleDirection) -> Self {
        debug_assert!(size.x >= 0.0 && size.y >= 0.0, "negative capsule size {size}");
        Self {
            center,
            size: size.max(Vec2::ZERO),
            direction,
        }
    }

    pub fn direction(&self) -> CapsuleDirection {
        self.direction
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn radius(&self) -> f32 {
        self.size.min_element() * 0.5
    }

    fn half_length(&self) -> f32 {
        let along = self.direction.axis().pick(self.size);
        (along * 0.5 - self.radius()).max(0.0)
    }

    /// End points of the core segment.
    pub fn segment(&self) -> (Vec2, Vec2) {
        let h = self.direction.axis().unit() * self.half_length();
        (self.center - h, self.center + h)
    }

    /// Core rectangle between the two end circles.
    pub fn rect(&self) -> BoxBounds {
        let axis = self.direction.axis();
        let size = axis.with(Vec2::splat(self.radius() * 2.0), self.half_length() * 2.0);
        BoxBounds::new(self.center, size)
    }

    pub fn end_circles(&self) -> [CircleBounds; 2] {
        let (a, b) = self.segment();
        [CircleBounds::new(a, self.radius()), CircleBounds::new(b, self.radius())]
    }

    /// Rectangle and end circles, the decomposition every capsule test runs on.
    pub fn parts(&self) -> [Bounds; 3] {
        let [c0, c1] = self.end_circles();
        [Bounds::Box(self.rect()), Bounds::Circle(c0), Bounds::Circle(c1)]
    }

    fn half_extents(&self) -> Vec2 {
        let r = self.radius();
        Vec2::splat(r) + self.direction.axis().unit() * self.half_length()
    }
}

impl Shape for CapsuleBounds {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Capsule
    }

    fn center(&self) -> Vec2 {
        self.center
    }

    fn min_corner(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    fn max_corner(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    fn closest_point(&self, p: Vec2) -> Vec2 {
        let (a, b) = self.segment();
        let q = Narrowphase::closest_point_on_segment(p, a, b);
        let d = p - q;
        let r = self.radius();
        if d.length_squared() <= r * r {
            p
        } else {
            q + d.normalize() * r
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}

/// Geometric region of a collider or hitbox.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Bounds {
    Box(BoxBounds),
    Circle(CircleBounds),
    Capsule(CapsuleBounds),
}

impl Shape for Bounds {
    fn kind(&self) -> ShapeKind {
        match self {
            Bounds::Box(b) => b.kind(),
            Bounds::Circle(c) => c.kind(),
            Bounds::Capsule(k) => k.kind(),
        }
    }

    fn center(&self) -> Vec2 {
        match self {
            Bounds::Box(b) => b.center(),
            Bounds::Circle(c) => c.center(),
            Bounds::Capsule(k) => k.center(),
        }
    }

    fn min_corner(&self) -> Vec2 {
        match self {
            Bounds::Box(b) => b.min_corner(),
            Bounds::Circle(c) => c.min_corner(),
            Bounds::Capsule(k) => k.min_corner(),
        }
    }

    fn max_corner(&self) -> Vec2 {
        match self {
            Bounds::Box(b) => b.max_corner(),
            Bounds::Circle(c) => c.max_corner(),
            Bounds::Capsule(k) => k.max_corner(),
        }
    }

    fn closest_point(&self, p: Vec2) -> Vec2 {
        match self {
            Bounds::Box(b) => b.closest_point(p),
            Bounds::Circle(c) => c.closest_point(p),
            Bounds::Capsule(k) => k.closest_point(p),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        match self {
            Bounds::Box(b) => b.translate(delta),
            Bounds::Circle(c) => c.translate(delta),
            Bounds::Capsule(k) => k.translate(delta),
        }
    }
}

impl From<BoxBounds> for Bounds {
    fn from(b: BoxBounds) -> Self {
        Bounds::Box(b)
    }
}

impl From<CircleBounds> for Bounds {
    fn from(c: CircleBounds) -> Self {
        Bounds::Circle(c)
    }
}

impl From<CapsuleBounds> for Bounds {
    fn from(k: CapsuleBounds) -> Self {
        Bounds::Capsule(k)
    }
}

impl Bounds {
    /// Axis-aligned extent as a box.
    pub fn aabb(&self) -> BoxBounds {
        match self {
            Bounds::Box(b) => *b,
            _ => BoxBounds::from_corners(self.min_corner(), self.max_corner()),
        }
    }

    fn unsupported(&self, other: &Bounds) -> PhysicsError {
        PhysicsError::UnsupportedShapePair {
            a: self.kind(),
            b: other.kind(),
        }
    }

    pub fn overlaps(&self, other: &Bounds) -> Result<bool> {
        match (self, other) {
            (Bounds::Box(a), Bounds::Box(b)) => {
                Ok(Narrowphase::overlap_box_box(a.center, a.size, b.center, b.size))
            }
            (Bounds::Circle(a), Bounds::Circle(b)) => {
                Ok(Narrowphase::overlap_circle_circle(a.center, a.radius, b.center, b.radius))
            }
            (Bounds::Box(b), Bounds::Circle(c)) | (Bounds::Circle(c), Bounds::Box(b)) => Ok(
                Narrowphase::overlap_box_circle(b.min_corner(), b.max_corner(), c.center, c.radius),
            ),
            (Bounds::Capsule(k), Bounds::Box(b)) | (Bounds::Box(b), Bounds::Capsule(k)) => {
                let target = Bounds::Box(*b);
                let mut hit = false;
                for part in k.parts() {
                    hit |= part.overlaps(&target)?;
                }
                Ok(hit)
            }
            _ => Err(self.unsupported(other)),
        }
    }

    pub fn closest_horizontal_separation_offset(&self, other: &Bounds) -> Result<Vec2> {
        self.separation_offset(other, Axis::Horizontal)
    }

    pub fn closest_vertical_separation_offset(&self, other: &Bounds) -> Result<Vec2> {
        self.separation_offset(other, Axis::Vertical)
    }

    /// Translation along `axis` that moves `self` to touch `other`.
    ///
    /// Box/box pairs apply the edge rule unconditionally, so separated boxes
    /// are pulled into contact. Pairs with a curved shape report zero unless
    /// they overlap.
    pub fn separation_offset(&self, other: &Bounds, axis: Axis) -> Result<Vec2> {
        let amount = match (self, other) {
            (Bounds::Box(a), Bounds::Box(b)) => box_box_separation(a, b, axis),
            (Bounds::Capsule(_), Bounds::Capsule(_))
            | (Bounds::Capsule(_), Bounds::Circle(_))
            | (Bounds::Circle(_), Bounds::Capsule(_)) => return Err(self.unsupported(other)),
            (Bounds::Capsule(k), _) => {
                let dir = push_direction(self, other, axis);
                let mut amount = 0.0_f32;
                for part in k.parts() {
                    amount = furthest(amount, curved_push(&part, other, axis, dir)?, dir);
                }
                amount
            }
            (_, Bounds::Capsule(k)) => {
                let dir = push_direction(self, other, axis);
                let mut amount = 0.0_f32;
                for part in k.parts() {
                    amount = furthest(amount, curved_push(self, &part, axis, dir)?, dir);
                }
                amount
            }
            _ => curved_push(self, other, axis, push_direction(self, other, axis))?,
        };
        Ok(axis.unit() * amount)
    }
}

fn box_box_separation(a: &BoxBounds, b: &BoxBounds, axis: Axis) -> f32 {
    let (amin, amax) = (a.min_corner(), a.max_corner());
    let (bmin, bmax) = (b.min_corner(), b.max_corner());
    Narrowphase::box_separation(
        axis.pick(amin),
        axis.pick(amax),
        axis.pick(a.center),
        axis.pick(bmin),
        axis.pick(bmax),
        axis.pick(b.center),
    )
}

/// Sign of the push for `a` out of `b`, from the box rule on their extents.
fn push_direction(a: &Bounds, b: &Bounds, axis: Axis) -> f32 {
    let rule = box_box_separation(&a.aabb(), &b.aabb(), axis);
    if rule > 0.0 {
        1.0
    } else if rule < 0.0 {
        -1.0
    } else if axis.pick(a.center()) >= axis.pick(b.center()) {
        1.0
    } else {
        -1.0
    }
}

fn furthest(current: f32, candidate: f32, dir: f32) -> f32 {
    if dir > 0.0 { current.max(candidate) } else { current.min(candidate) }
}

/// Distance from `v` to the interval `[lo, hi]`.
fn interval_distance(v: f32, lo: f32, hi: f32) -> f32 {
    (lo - v).max(v - hi).max(0.0)
}

/// Push of `a` along `dir` (±1 on `axis`) until it touches `b`; zero if the pair is apart.
fn curved_push(a: &Bounds, b: &Bounds, axis: Axis, dir: f32) -> Result<f32> {
    if !a.overlaps(b)? {
        return Ok(0.0);
    }
    let cross = axis.cross();
    let amount = match (a, b) {
        (Bounds::Box(a), Bounds::Box(b)) => {
            if dir > 0.0 {
                axis.pick(b.max_corner()) - axis.pick(a.min_corner())
            } else {
                axis.pick(b.min_corner()) - axis.pick(a.max_corner())
            }
        }
        (Bounds::Circle(c), Bounds::Box(b)) => {
            let d = interval_distance(
                cross.pick(c.center),
                cross.pick(b.min_corner()),
                cross.pick(b.max_corner()),
            );
            let Some(w) = Narrowphase::chord_half_width(c.radius, d) else {
                return Ok(0.0);
            };
            let target = if dir > 0.0 {
                axis.pick(b.max_corner()) + w
            } else {
                axis.pick(b.min_corner()) - w
            };
            target - axis.pick(c.center)
        }
        (Bounds::Box(b), Bounds::Circle(c)) => {
            let d = interval_distance(
                cross.pick(c.center),
                cross.pick(b.min_corner()),
                cross.pick(b.max_corner()),
            );
            let Some(w) = Narrowphase::chord_half_width(c.radius, d) else {
                return Ok(0.0);
            };
            if dir > 0.0 {
                axis.pick(c.center) + w - axis.pick(b.min_corner())
            } else {
                axis.pick(c.center) - w - axis.pick(b.max_corner())
            }
        }
        (Bounds::Circle(a), Bounds::Circle(b)) => {
            let d = cross.pick(a.center) - cross.pick(b.center);
            let Some(w) = Narrowphase::chord_half_width(a.radius + b.radius, d) else {
                return Ok(0.0);
            };
            axis.pick(b.center) + dir * w - axis.pick(a.center)
        }
        _ => return Err(a.unsupported(b)),
    };
    // An overlapping pair never needs a push against `dir`
    Ok(if dir > 0.0 { amount.max(0.0) } else { amount.min(0.0) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn bx(cx: f32, cy: f32, w: f32, h: f32) -> Bounds {
        Bounds::Box(BoxBounds::new(Vec2::new(cx, cy), Vec2::new(w, h)))
    }

    fn circle(cx: f32, cy: f32, r: f32) -> Bounds {
        Bounds::Circle(CircleBounds::new(Vec2::new(cx, cy), r))
    }

    fn capsule(cx: f32, cy: f32, w: f32, h: f32) -> Bounds {
        Bounds::Capsule(CapsuleBounds::new(
            Vec2::new(cx, cy),
            Vec2::new(w, h),
            CapsuleDirection::Vertical,
        ))
    }

    #[test]
    fn test_box_corners_and_center() {
        let b = bx(1.0, 2.0, 4.0, 2.0);
        assert_eq!(b.center(), Vec2::new(1.0, 2.0));
        assert_eq!(b.min_corner(), Vec2::new(-1.0, 1.0));
        assert_eq!(b.max_corner(), Vec2::new(3.0, 3.0));
        assert_eq!(b.extent(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_box_from_corners_roundtrip() {
        let b = BoxBounds::from_corners(Vec2::new(-1.0, 0.0), Vec2::new(3.0, 2.0));
        assert_eq!(b.center(), Vec2::new(1.0, 1.0));
        assert_eq!(b.size(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_box_overlap_scenario_penetration_on_x() {
        let a = bx(0.0, 0.0, 2.0, 2.0);
        let mut b = bx(1.9, 0.0, 2.0, 2.0);
        assert!(a.overlaps(&b).unwrap());

        let off = a.closest_horizontal_separation_offset(&b).unwrap();
        assert_abs_diff_eq!(off, Vec2::new(-0.1, 0.0), epsilon = 1e-5);

        // Seen from A, B leaves by the opposite translation and lands on the boundary
        b.translate(-off);
        assert_abs_diff_eq!(b.center(), Vec2::new(2.0, 0.0), epsilon = 1e-5);
        assert!(!a.overlaps(&b).unwrap());
    }

    #[test]
    fn test_box_separation_converges() {
        let mut a = bx(0.25, 0.25, 2.0, 1.0);
        let b = bx(1.0, 0.0, 1.5, 3.0);
        let off = a.closest_horizontal_separation_offset(&b).unwrap();
        assert_eq!(off, Vec2::new(-1.0, 0.0));
        a.translate(off);
        assert!(!a.overlaps(&b).unwrap());
        let again = a.closest_horizontal_separation_offset(&b).unwrap();
        assert_abs_diff_eq!(again, Vec2::ZERO);

        let mut a = bx(0.0, 0.75, 2.0, 2.0);
        let off = a.closest_vertical_separation_offset(&b).unwrap();
        assert_eq!(off, Vec2::new(0.0, 1.75));
        a.translate(off);
        assert!(!a.overlaps(&b).unwrap());
        let again = a.closest_vertical_separation_offset(&b).unwrap();
        assert_abs_diff_eq!(again, Vec2::ZERO);
    }

    #[test]
    fn test_box_separation_snaps_separated_boxes_into_contact() {
        let mut a = bx(-5.0, 0.0, 2.0, 2.0);
        let b = bx(0.0, 0.0, 2.0, 2.0);
        let off = a.closest_horizontal_separation_offset(&b).unwrap();
        a.translate(off);
        assert_abs_diff_eq!(a.max_corner().x, b.min_corner().x, epsilon = 1e-5);
    }

    #[test]
    fn test_box_overlap_symmetry() {
        let shapes = [
            bx(0.0, 0.0, 2.0, 2.0),
            bx(1.9, 0.0, 2.0, 2.0),
            bx(2.0, 0.0, 2.0, 2.0),
            bx(0.5, 1.5, 1.0, 1.0),
            bx(-3.0, -3.0, 0.5, 8.0),
            bx(0.0, 0.0, 0.0, 0.0),
        ];
        for a in &shapes {
            for b in &shapes {
                assert_eq!(a.overlaps(b).unwrap(), b.overlaps(a).unwrap());
            }
        }
    }

    #[test]
    fn test_mixed_overlap_symmetry() {
        let shapes = [
            bx(0.0, 0.0, 2.0, 2.0),
            circle(1.5, 1.5, 0.75),
            circle(3.0, 0.0, 1.0),
            capsule(0.0, 2.5, 1.0, 3.0),
        ];
        for a in &shapes {
            for b in &shapes {
                match (a.overlaps(b), b.overlaps(a)) {
                    (Ok(x), Ok(y)) => assert_eq!(x, y),
                    (Err(e1), Err(_)) => {
                        assert!(matches!(e1, PhysicsError::UnsupportedShapePair { .. }))
                    }
                    other => panic!("asymmetric result {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_circle_box_and_circle_circle() {
        let b = bx(0.0, 0.0, 2.0, 2.0);
        assert!(circle(1.5, 1.5, 0.75).overlaps(&b).unwrap());
        assert!(!circle(1.5, 1.5, 0.7).overlaps(&b).unwrap());
        assert!(circle(0.0, 0.0, 1.0).overlaps(&circle(1.5, 0.0, 1.0)).unwrap());
        assert!(!circle(0.0, 0.0, 1.0).overlaps(&circle(2.0, 0.0, 1.0)).unwrap());
    }

    #[test]
    fn test_capsule_parts() {
        let k = CapsuleBounds::new(Vec2::ZERO, Vec2::new(1.0, 3.0), CapsuleDirection::Vertical);
        assert_abs_diff_eq!(k.radius(), 0.5);
        let (a, b) = k.segment();
        assert_abs_diff_eq!(a, Vec2::new(0.0, -1.0));
        assert_abs_diff_eq!(b, Vec2::new(0.0, 1.0));
        assert_eq!(k.rect().size(), Vec2::new(1.0, 2.0));
        assert_eq!(k.min_corner(), Vec2::new(-0.5, -1.5));
        assert_eq!(k.max_corner(), Vec2::new(0.5, 1.5));

        let h = CapsuleBounds::new(Vec2::ZERO, Vec2::new(4.0, 2.0), CapsuleDirection::Horizontal);
        assert_eq!(h.rect().size(), Vec2::new(2.0, 2.0));
        assert_abs_diff_eq!(h.segment().1, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_capsule_closest_point() {
        let k = CapsuleBounds::new(Vec2::ZERO, Vec2::new(1.0, 3.0), CapsuleDirection::Vertical);
        assert_abs_diff_eq!(k.closest_point(Vec2::new(3.0, 0.0)), Vec2::new(0.5, 0.0));
        assert_abs_diff_eq!(k.closest_point(Vec2::new(0.0, 5.0)), Vec2::new(0.0, 1.5));
        assert_eq!(k.closest_point(Vec2::new(0.1, 0.1)), Vec2::new(0.1, 0.1));
    }

    #[test]
    fn test_capsule_box_overlap_uses_rounded_ends() {
        // Box tucked into the corner of the capsule's extent misses the rounded cap
        let k = capsule(0.0, 0.0, 1.0, 3.0);
        assert!(!k.overlaps(&bx(0.55, 1.55, 0.2, 0.2)).unwrap());
        assert!(k.overlaps(&bx(0.0, 1.6, 0.4, 0.4)).unwrap());
        assert!(bx(0.0, 1.6, 0.4, 0.4).overlaps(&k).unwrap());
        assert!(k.overlaps(&bx(0.6, 0.0, 0.4, 0.4)).unwrap());
    }

    #[test]
    fn test_unsupported_pairs_fail_loudly() {
        let k = capsule(0.0, 0.0, 1.0, 3.0);
        let c = circle(0.0, 0.0, 1.0);
        for (a, b) in [(k, c), (c, k), (k, k)] {
            let err = a.overlaps(&b).unwrap_err();
            assert_eq!(
                err,
                PhysicsError::UnsupportedShapePair {
                    a: a.kind(),
                    b: b.kind()
                }
            );
            assert!(a.closest_vertical_separation_offset(&b).is_err());
        }
    }

    #[test]
    fn test_circle_on_box_vertical_push() {
        let ground = bx(0.0, -1.0, 10.0, 2.0);
        let mut ball = circle(0.0, 0.4, 0.5);
        let off = ball.closest_vertical_separation_offset(&ground).unwrap();
        assert_abs_diff_eq!(off, Vec2::new(0.0, 0.1), epsilon = 1e-5);
        ball.translate(off);
        assert!(!ball.overlaps(&ground).unwrap());
    }

    #[test]
    fn test_circle_off_corner_uses_chord() {
        let block = bx(0.0, 0.0, 2.0, 2.0);
        // Center 0.75 above the top edge: horizontal chord half width 1.0 for r = 1.25
        let mut ball = circle(1.5, 1.75, 1.25);
        let off = ball.closest_horizontal_separation_offset(&block).unwrap();
        assert_abs_diff_eq!(off, Vec2::new(0.5, 0.0));
        ball.translate(off);
        assert!(!ball.overlaps(&block).unwrap());
    }

    #[test]
    fn test_box_against_circle_push() {
        let ball = circle(0.0, 0.0, 1.0);
        let mut b = bx(1.25, 0.0, 1.0, 1.0);
        let off = b.closest_horizontal_separation_offset(&ball).unwrap();
        assert_abs_diff_eq!(off, Vec2::new(0.25, 0.0));
        b.translate(off);
        assert!(!b.overlaps(&ball).unwrap());
    }

    #[test]
    fn test_circle_circle_push() {
        let a = circle(0.0, 0.0, 1.0);
        let mut b = circle(1.0, 0.0, 1.0);
        let off = b.closest_horizontal_separation_offset(&a).unwrap();
        assert_abs_diff_eq!(off, Vec2::new(1.0, 0.0), epsilon = 1e-5);
        b.translate(off);
        assert!(!b.overlaps(&a).unwrap());
    }

    #[test]
    fn test_curved_separation_is_zero_when_apart() {
        let a = circle(0.0, 0.0, 1.0);
        let b = circle(5.0, 0.0, 1.0);
        assert_eq!(a.closest_horizontal_separation_offset(&b).unwrap(), Vec2::ZERO);
    }

    #[test]
    fn test_capsule_standing_on_box() {
        let ground = bx(0.0, -1.0, 10.0, 2.0);
        let mut body = capsule(0.0, 1.25, 1.0, 3.0);
        let off = body.closest_vertical_separation_offset(&ground).unwrap();
        assert_abs_diff_eq!(off, Vec2::new(0.0, 0.25));
        body.translate(off);
        assert!(!body.overlaps(&ground).unwrap());

        // Seen from the ground, the push goes the other way
        let mut ground = ground;
        let body = capsule(0.0, 1.25, 1.0, 3.0);
        let off = ground.closest_vertical_separation_offset(&body).unwrap();
        assert_abs_diff_eq!(off, Vec2::new(0.0, -0.25));
        ground.translate(off);
        assert!(!ground.overlaps(&body).unwrap());
    }

    #[test]
    fn test_aabb_of_each_shape() {
        assert_eq!(circle(1.0, 1.0, 0.5).aabb().size(), Vec2::splat(1.0));
        assert_eq!(capsule(0.0, 0.0, 1.0, 3.0).aabb().size(), Vec2::new(1.0, 3.0));
    }
}
