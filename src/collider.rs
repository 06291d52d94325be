use glam::Vec2;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::api::{NarrowphaseApi, Shape};
use crate::bounds::{Bounds, BoxBounds, CapsuleBounds, CapsuleDirection, CircleBounds};
use crate::config::DEFAULT_BUFFER;
use crate::error::Result;
use crate::narrowphase::Narrowphase;
use crate::types::{Axis, BodyId, CollisionCategory, EntityId, LayerId, MAX_LAYERS, Transform};

/// Motion below this length does not widen the swept bounds.
const SWEEP_EPSILON: f32 = 1e-6;

/// Unscaled shape description; bounds are rebuilt from it every tick.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Box { size: Vec2 },
    Circle { radius: f32 },
    Capsule { size: Vec2, direction: CapsuleDirection },
}

impl ColliderShape {
    /// Bounds centered on `center` with `scale` applied (sign ignored).
    pub fn bounds(&self, center: Vec2, scale: Vec2) -> Bounds {
        let scale = scale.abs();
        match *self {
            ColliderShape::Box { size } => BoxBounds::new(center, size * scale).into(),
            ColliderShape::Circle { radius } => {
                CircleBounds::new(center, radius * scale.max_element()).into()
            }
            ColliderShape::Capsule { size, direction } => {
                CapsuleBounds::new(center, size * scale, direction).into()
            }
        }
    }
}

/// Where the entity position sits on the collider.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    Center,
    /// Position is the bottom-center of the shape.
    Feet,
}

/// Result of [`Collider::push_out_offset`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PushOut {
    /// Translation moving the other collider out, per pushed axis.
    pub offset: Vec2,
    pub push_vertically: bool,
    pub push_horizontally: bool,
}

/// Bounds plus collision metadata for one entity.
///
/// Keeps a current/previous double buffer: `update_bounds` moves the live
/// bounds into `previous` before rebuilding them, so push-out can tell new
/// penetration from contact that already existed last tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Collider {
    entity: EntityId,
    body: Option<BodyId>,
    category: CollisionCategory,
    layer: LayerId,
    shape: ColliderShape,
    offset: Vec2,
    buffer: Option<f32>,
    anchor: Anchor,
    bounds: Bounds,
    previous: Bounds,
    swept: Option<Bounds>,
    motion: Vec2,
    primed: bool,
}

impl Collider {
    pub fn new(entity: EntityId, category: CollisionCategory, shape: ColliderShape) -> Self {
        let bounds = shape.bounds(Vec2::ZERO, Vec2::ONE);
        Self {
            entity,
            body: None,
            category,
            layer: 0,
            shape,
            offset: Vec2::ZERO,
            buffer: None,
            anchor: Anchor::Center,
            bounds,
            previous: bounds,
            swept: None,
            motion: Vec2::ZERO,
            primed: false,
        }
    }

    pub fn with_body(mut self, body: BodyId) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_layer(mut self, layer: LayerId) -> Self {
        if (layer as usize) < MAX_LAYERS {
            self.layer = layer;
        } else {
            warn!("layer {layer} out of range for {:?}; keeping {}", self.entity, self.layer);
        }
        self
    }

    pub fn with_buffer(mut self, buffer: f32) -> Self {
        if self.category != CollisionCategory::Physics {
            warn!("buffer set on a {:?} collider has no effect", self.category);
        }
        debug_assert!(buffer >= 0.0, "negative collider buffer {buffer}");
        self.buffer = Some(buffer.max(0.0));
        self
    }

    pub(crate) fn fill_default_buffer(&mut self, buffer: f32) {
        if self.buffer.is_none() {
            self.buffer = Some(buffer);
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn body(&self) -> Option<BodyId> {
        self.body
    }

    pub fn category(&self) -> CollisionCategory {
        self.category
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn buffer(&self) -> f32 {
        self.buffer.unwrap_or(DEFAULT_BUFFER)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn previous_bounds(&self) -> &Bounds {
        &self.previous
    }

    pub fn swept_bounds(&self) -> Option<&Bounds> {
        self.swept.as_ref()
    }

    /// Rebuild the live bounds from the transform, keeping last tick's in `previous`.
    pub fn update_bounds(&mut self, transform: &Transform) {
        let mut center = transform.position + self.offset * transform.scale;
        let mut bounds = self.shape.bounds(center, transform.scale);
        if self.anchor == Anchor::Feet {
            center.y += bounds.extent().y * 0.5;
            bounds = self.shape.bounds(center, transform.scale);
        }
        // First update has no history: treat it as having been here already
        self.previous = if self.primed { self.bounds } else { bounds };
        self.bounds = bounds;
        self.primed = true;
    }

    /// Move the live bounds (and swept bounds) after a push-out.
    pub fn translate(&mut self, delta: Vec2) {
        self.bounds.translate(delta);
        if let Some(swept) = self.swept.as_mut() {
            swept.translate(delta);
        }
    }

    /// Swept bounds covering this tick's motion, for physics colliders only.
    pub fn update_swept_bounds(&mut self, velocity: Vec2, dt: f32) {
        if self.category != CollisionCategory::Physics {
            warn!("swept bounds requested for a {:?} collider", self.category);
            self.swept = None;
            self.motion = Vec2::ZERO;
            return;
        }
        let motion = velocity * dt;
        if motion.length() <= SWEEP_EPSILON {
            self.motion = Vec2::ZERO;
            self.swept = Some(self.bounds);
            return;
        }
        self.motion = motion;
        let aabb = self.bounds.aabb();
        let swept = BoxBounds::new(aabb.center() + motion * 0.5, aabb.size() + motion.abs());
        self.swept = Some(swept.into());
    }

    pub fn is_overlapping(&self, other: &Collider) -> Result<bool> {
        self.bounds.overlaps(&other.bounds)
    }

    /// Live bounds against the other's swept bounds (live when it has none).
    pub fn is_physics_overlapping(&self, other: &Collider) -> Result<bool> {
        let target = other.swept.as_ref().unwrap_or(&other.bounds);
        self.bounds.overlaps(target)
    }

    /// Overlap of `other`'s live extent with ours along `axis`; negative when apart.
    pub fn overlap_depth(&self, other: &Collider, axis: Axis) -> f32 {
        Narrowphase::interval_overlap(
            axis.pick(other.bounds.min_corner()),
            axis.pick(other.bounds.max_corner()),
            axis.pick(self.bounds.min_corner()),
            axis.pick(self.bounds.max_corner()),
        )
    }

    /// Where `other`'s motion for this tick first reaches us: the fraction of
    /// the motion and the axis it enters across.
    ///
    /// Works on the axis-aligned extents. `None` when the motion misses us,
    /// including the corners of the swept box it never passes through, or
    /// when at entry it overlaps us across the other axis by no more than
    /// `other`'s buffer (sliding over a seam between flush tiles).
    pub fn sweep_entry(&self, other: &Collider) -> Option<(f32, Axis)> {
        let (min, max) = (self.bounds.min_corner(), self.bounds.max_corner());
        let (omin, omax) = (other.bounds.min_corner(), other.bounds.max_corner());
        let (t, axis) = Narrowphase::sweep_box_box(omin, omax, other.motion, min, max)?;
        let across = axis.cross();
        let shift = across.pick(other.motion) * t;
        let depth = Narrowphase::interval_overlap(
            across.pick(omin) + shift,
            across.pick(omax) + shift,
            across.pick(min),
            across.pick(max),
        );
        (depth > other.buffer()).then_some((t, axis))
    }

    /// Translation along `axis` moving `other` out of this collider.
    pub fn axis_push_offset(&self, other: &Collider, axis: Axis) -> Result<Vec2> {
        other.bounds.separation_offset(&self.bounds, axis)
    }

    /// Decide which axes push `other` out, from where it was last tick.
    ///
    /// An axis is pushed when `other`'s previous bounds overlapped ours on it
    /// by no more than `other`'s buffer: the penetration on that axis is new.
    /// Axes it already overlapped last tick are left alone, so resting contact
    /// on a floor never turns into a sideways shove. When both axes were
    /// already deep and the pair still overlaps, the shallower axis is pushed.
    pub fn push_out_offset(&self, other: &Collider) -> Result<PushOut> {
        let (min, max) = (self.bounds.min_corner(), self.bounds.max_corner());
        let (pmin, pmax) = (other.previous.min_corner(), other.previous.max_corner());
        let depth = |axis: Axis| {
            Narrowphase::interval_overlap(
                axis.pick(pmin),
                axis.pick(pmax),
                axis.pick(min),
                axis.pick(max),
            )
        };
        let buffer = other.buffer();
        let mut out = PushOut {
            offset: Vec2::ZERO,
            push_vertically: depth(Axis::Vertical) <= buffer,
            push_horizontally: depth(Axis::Horizontal) <= buffer,
        };

        if !out.push_vertically && !out.push_horizontally {
            if !self.bounds.overlaps(&other.bounds)? {
                return Ok(out);
            }
            // Stuck inside: leave along the cheaper axis
            let v = self.axis_push_offset(other, Axis::Vertical)?;
            let h = self.axis_push_offset(other, Axis::Horizontal)?;
            if v.y.abs() <= h.x.abs() {
                out.push_vertically = true;
                out.offset = v;
            } else {
                out.push_horizontally = true;
                out.offset = h;
            }
            return Ok(out);
        }

        if out.push_vertically {
            out.offset.y = self.axis_push_offset(other, Axis::Vertical)?.y;
        }
        if out.push_horizontally {
            out.offset.x = self.axis_push_offset(other, Axis::Horizontal)?.x;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use slotmap::KeyData;

    fn entity() -> EntityId {
        EntityId::from(KeyData::from_ffi(1))
    }

    fn boxed(category: CollisionCategory, w: f32, h: f32) -> Collider {
        Collider::new(entity(), category, ColliderShape::Box { size: Vec2::new(w, h) })
    }

    fn at(x: f32, y: f32) -> Transform {
        Transform::new(Vec2::new(x, y))
    }

    #[test]
    fn test_update_bounds_applies_offset_and_scale() {
        let mut c = boxed(CollisionCategory::Static, 2.0, 1.0).with_offset(Vec2::new(1.0, 0.5));
        c.update_bounds(&at(3.0, 3.0).with_scale(Vec2::new(-2.0, 1.0)));
        // Negative scale mirrors the offset but not the size
        assert_eq!(c.bounds().center(), Vec2::new(1.0, 3.5));
        assert_eq!(c.bounds().extent(), Vec2::new(4.0, 1.0));
    }

    #[test]
    fn test_circle_radius_uses_largest_scale() {
        let mut c = Collider::new(
            entity(),
            CollisionCategory::Trigger,
            ColliderShape::Circle { radius: 0.5 },
        );
        c.update_bounds(&at(0.0, 0.0).with_scale(Vec2::new(1.0, -3.0)));
        assert_eq!(c.bounds().extent(), Vec2::splat(3.0));
    }

    #[test]
    fn test_feet_anchor_raises_center() {
        let mut c = boxed(CollisionCategory::Physics, 1.0, 2.0).with_anchor(Anchor::Feet);
        c.update_bounds(&at(0.0, 0.0));
        assert_eq!(c.bounds().min_corner(), Vec2::new(-0.5, 0.0));
        assert_eq!(c.bounds().center(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_previous_bounds_double_buffer() {
        let mut c = boxed(CollisionCategory::Physics, 1.0, 1.0);
        c.update_bounds(&at(0.0, 0.0));
        assert_eq!(c.previous_bounds(), c.bounds());
        c.update_bounds(&at(2.0, 0.0));
        assert_eq!(c.previous_bounds().center(), Vec2::ZERO);
        assert_eq!(c.bounds().center(), Vec2::new(2.0, 0.0));
        // Translation touches live bounds only
        c.translate(Vec2::new(0.0, 1.0));
        assert_eq!(c.previous_bounds().center(), Vec2::ZERO);
        assert_eq!(c.bounds().center(), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_swept_bounds_cover_motion() {
        let mut c = boxed(CollisionCategory::Physics, 1.0, 1.0);
        c.update_bounds(&at(0.0, 0.0));
        c.update_swept_bounds(Vec2::new(0.0, -60.0), 1.0 / 60.0);
        let swept = c.swept_bounds().unwrap();
        assert_abs_diff_eq!(swept.min_corner(), Vec2::new(-0.5, -1.5), epsilon = 1e-5);
        assert_abs_diff_eq!(swept.max_corner(), Vec2::new(0.5, 0.5), epsilon = 1e-5);

        c.update_swept_bounds(Vec2::ZERO, 1.0 / 60.0);
        assert_eq!(c.swept_bounds(), Some(c.bounds()));
    }

    #[test]
    fn test_swept_bounds_only_for_physics() {
        let mut c = boxed(CollisionCategory::Static, 1.0, 1.0);
        c.update_bounds(&at(0.0, 0.0));
        c.update_swept_bounds(Vec2::new(5.0, 0.0), 1.0);
        assert!(c.swept_bounds().is_none());
    }

    #[test]
    fn test_physics_overlap_uses_swept_bounds() {
        let mut floor = boxed(CollisionCategory::Static, 10.0, 1.0);
        floor.update_bounds(&at(0.0, -0.5));
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0);
        body.update_bounds(&at(0.0, 1.0));
        assert!(!floor.is_overlapping(&body).unwrap());
        assert!(!floor.is_physics_overlapping(&body).unwrap());

        body.update_swept_bounds(Vec2::new(0.0, -60.0), 1.0 / 60.0);
        assert!(!floor.is_overlapping(&body).unwrap());
        assert!(floor.is_physics_overlapping(&body).unwrap());
    }

    #[test]
    fn test_sweep_entry_axis() {
        let mut floor = boxed(CollisionCategory::Static, 10.0, 1.0);
        floor.update_bounds(&at(0.0, -0.5));
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0);
        body.update_bounds(&at(0.0, 1.0));
        body.update_swept_bounds(Vec2::new(0.0, -1.0), 1.0);
        let (t, axis) = floor.sweep_entry(&body).unwrap();
        assert_abs_diff_eq!(t, 0.5);
        assert_eq!(axis, Axis::Vertical);

        let mut wall = boxed(CollisionCategory::Static, 1.0, 10.0);
        wall.update_bounds(&at(1.25, 5.0));
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0);
        body.update_bounds(&at(0.0, 0.5));
        body.update_swept_bounds(Vec2::new(0.5, 0.0), 1.0);
        assert_eq!(wall.sweep_entry(&body), Some((0.5, Axis::Horizontal)));
    }

    #[test]
    fn test_sweep_entry_ignores_swept_box_corner() {
        let mut post = boxed(CollisionCategory::Static, 0.2, 0.2);
        post.update_bounds(&at(2.4, 0.6));
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0);
        body.update_bounds(&at(1.0, 1.0));
        body.update_swept_bounds(Vec2::new(60.0, 60.0), 1.0 / 60.0);

        assert!(post.is_physics_overlapping(&body).unwrap());
        assert!(post.sweep_entry(&body).is_none());
    }

    #[test]
    fn test_sweep_entry_slides_over_flush_tile() {
        // Resting on the tile to the left, about to cross onto this one
        let mut tile = boxed(CollisionCategory::Static, 1.0, 1.0);
        tile.update_bounds(&at(2.0, -0.5));
        let mut body = boxed(CollisionCategory::Physics, 0.5, 1.0);
        body.update_bounds(&at(1.25, 0.5));
        body.update_swept_bounds(Vec2::new(1.7, -0.16), 1.0 / 60.0);

        assert!(tile.is_physics_overlapping(&body).unwrap());
        assert!(tile.sweep_entry(&body).is_none());
    }

    #[test]
    fn test_overlap_depth() {
        let mut floor = boxed(CollisionCategory::Static, 10.0, 1.0);
        floor.update_bounds(&at(0.0, -0.5));
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0);
        body.update_bounds(&at(0.0, 0.25));
        assert_abs_diff_eq!(floor.overlap_depth(&body, Axis::Vertical), 0.25);
        assert_abs_diff_eq!(floor.overlap_depth(&body, Axis::Horizontal), 1.0);
        body.update_bounds(&at(0.0, 2.0));
        assert!(floor.overlap_depth(&body, Axis::Vertical) < 0.0);
    }

    #[test]
    fn test_push_out_landing_is_vertical_only() {
        let mut floor = boxed(CollisionCategory::Static, 10.0, 1.0);
        floor.update_bounds(&at(0.0, -0.5));
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0);
        body.update_bounds(&at(0.0, 0.75));
        body.update_bounds(&at(0.0, 0.25));

        let push = floor.push_out_offset(&body).unwrap();
        assert!(push.push_vertically);
        assert!(!push.push_horizontally);
        assert_eq!(push.offset, Vec2::new(0.0, 0.25));
    }

    #[test]
    fn test_push_out_wall_is_horizontal_only() {
        let mut wall = boxed(CollisionCategory::Static, 1.0, 10.0);
        wall.update_bounds(&at(2.0, 0.0));
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0);
        body.update_bounds(&at(0.75, 0.0));
        body.update_bounds(&at(1.25, 0.0));

        let push = wall.push_out_offset(&body).unwrap();
        assert!(push.push_horizontally);
        assert!(!push.push_vertically);
        assert_eq!(push.offset, Vec2::new(-0.25, 0.0));
    }

    #[test]
    fn test_push_out_buffer_widens_new_penetration_window() {
        let mut floor = boxed(CollisionCategory::Static, 10.0, 1.0);
        floor.update_bounds(&at(0.0, -0.5));
        // Previous tick sank 0.25 into the floor, live bounds are clear of it
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0).with_buffer(0.0);
        body.update_bounds(&at(0.0, 0.25));
        body.update_bounds(&at(0.0, 0.25));
        body.translate(Vec2::new(0.0, 1.0));
        assert!(!floor.push_out_offset(&body).unwrap().push_vertically);

        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0).with_buffer(0.5);
        body.update_bounds(&at(0.0, 0.25));
        body.update_bounds(&at(0.0, 0.25));
        body.translate(Vec2::new(0.0, 1.0));
        let push = floor.push_out_offset(&body).unwrap();
        assert!(push.push_vertically);
        assert!(!push.push_horizontally);
    }

    #[test]
    fn test_push_out_unsticks_along_shallower_axis() {
        let mut block = boxed(CollisionCategory::Static, 4.0, 4.0);
        block.update_bounds(&at(0.0, 0.0));
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0).with_buffer(0.0);
        body.update_bounds(&at(1.75, 0.0));
        body.update_bounds(&at(1.75, 0.0));

        let push = block.push_out_offset(&body).unwrap();
        assert!(push.push_horizontally);
        assert!(!push.push_vertically);
        assert_eq!(push.offset, Vec2::new(0.75, 0.0));
    }

    #[test]
    fn test_push_out_nothing_when_apart_and_settled() {
        let mut a = boxed(CollisionCategory::Static, 4.0, 4.0);
        a.update_bounds(&at(0.0, 0.0));
        // Overlapping both axes last tick but apart now
        let mut body = boxed(CollisionCategory::Physics, 1.0, 1.0).with_buffer(0.0);
        body.update_bounds(&at(0.0, 0.0));
        body.update_bounds(&at(0.0, 0.0));
        body.translate(Vec2::new(10.0, 0.0));
        assert_eq!(a.push_out_offset(&body).unwrap(), PushOut::default());
    }

    #[test]
    fn test_layer_out_of_range_is_ignored() {
        let c = boxed(CollisionCategory::Static, 1.0, 1.0).with_layer(3).with_layer(40);
        assert_eq!(c.layer(), 3);
    }

    #[test]
    fn test_shape_from_level_data() {
        let shape: ColliderShape = ron::from_str("Capsule(size: (1.0, 3.0), direction: Horizontal)").unwrap();
        assert_eq!(
            shape,
            ColliderShape::Capsule {
                size: Vec2::new(1.0, 3.0),
                direction: CapsuleDirection::Horizontal
            }
        );
    }

    #[test]
    fn test_default_buffer() {
        let mut c = boxed(CollisionCategory::Physics, 1.0, 1.0);
        assert_eq!(c.buffer(), DEFAULT_BUFFER);
        c.fill_default_buffer(0.1);
        assert_eq!(c.buffer(), 0.1);
        c.fill_default_buffer(0.3);
        assert_eq!(c.buffer(), 0.1);
    }
}
