use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Game entity owning a transform; colliders, bodies and hitboxes hang off it.
    pub struct EntityId;
    /// Collider registered with a [`crate::PhysicsManager`].
    pub struct ColliderId;
    /// Physics body registered with a [`crate::PhysicsManager`].
    pub struct BodyId;
    /// Hitbox or hurtbox registered with a [`crate::HitboxManager`].
    pub struct HitboxId;
}

/// Collision layer index, `0..MAX_LAYERS`.
pub type LayerId = u8;

/// Number of distinct collision layers.
pub const MAX_LAYERS: usize = 32;

/// World placement of an entity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Negative components mirror offsets (facing); sizes use the absolute value.
    pub scale: Vec2,
    /// Inactive entities are skipped by integration, resolution and hit tests.
    pub active: bool,
}

impl Transform {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            scale: Vec2::ONE,
            active: true,
        }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

/// Transform storage shared by both managers for the duration of a tick.
pub type Transforms = SlotMap<EntityId, Transform>;

/// Collision category of a collider. Fixed at creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionCategory {
    /// Environment geometry that pushes physics colliders out.
    Static,
    /// Kinematic geometry moved by gameplay code; seen by triggers only.
    Movable,
    /// Collider driven by a [`crate::PhysicsBody`]; resolved against statics.
    Physics,
    /// Overlap-only volume reporting enter/stay/exit.
    Trigger,
}

impl CollisionCategory {
    pub const ALL: [CollisionCategory; 4] = [
        CollisionCategory::Static,
        CollisionCategory::Movable,
        CollisionCategory::Physics,
        CollisionCategory::Trigger,
    ];

    pub(crate) const fn index(self) -> usize {
        match self {
            CollisionCategory::Static => 0,
            CollisionCategory::Movable => 1,
            CollisionCategory::Physics => 2,
            CollisionCategory::Trigger => 3,
        }
    }
}

/// Shape discriminator, used in errors and diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Circle,
    Capsule,
}

/// World axis used by the axis-separated push-out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const fn unit(self) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::X,
            Axis::Vertical => Vec2::Y,
        }
    }

    /// The perpendicular axis.
    pub const fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    pub fn pick(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    /// `v` with this axis' component replaced by `value`.
    pub fn with(self, v: Vec2, value: f32) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(value, v.y),
            Axis::Vertical => Vec2::new(v.x, value),
        }
    }
}

/// Phase of a pairwise overlap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OverlapPhase {
    Enter,
    Stay,
    Exit,
}

/// Edge-triggered body state change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BodyEvent {
    Grounded,
    Airborne,
}

/// Event emitted by the physics tick and drained by gameplay code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PhysicsEvent {
    Body {
        body: BodyId,
        event: BodyEvent,
    },
    Trigger {
        phase: OverlapPhase,
        trigger: ColliderId,
        other: ColliderId,
    },
}

/// Debug/performance counters for the last physics tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub bodies_integrated: usize,
    pub colliders_updated: usize,
    /// (Physics, Static) pairs that passed layer filtering.
    pub pairs_tested: usize,
    /// (Physics, Static) pairs skipped by the layer matrix.
    pub pairs_ignored: usize,
    pub vertical_pushes: usize,
    pub horizontal_pushes: usize,
    pub events_emitted: usize,
    /// Events dropped because the buffer hit `max_events`.
    pub events_dropped: usize,
}
