//! kinebonk: kinematic 2D platformer physics with axis-separated push-out, triggers and hitboxes

pub mod types;
pub mod api;
pub mod error;
pub mod config;
pub mod narrowphase;
pub mod bounds;
pub mod collider;
pub mod body;
pub mod world;
pub mod hitbox;
pub mod timer;
pub mod simulation;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::PhysicsError;
pub use crate::config::{ConfigError, ConfigFile, LayerMatrix, PhysicsConfig};
pub use crate::bounds::{Bounds, BoxBounds, CapsuleBounds, CapsuleDirection, CircleBounds};
pub use crate::collider::{Anchor, Collider, ColliderShape, PushOut};
pub use crate::body::PhysicsBody;
pub use crate::world::PhysicsManager;
pub use crate::hitbox::{
    Hitbox, HitboxContact, HitboxEvent, HitboxKind, HitboxListener, HitboxManager, HitboxShape, Interaction,
};
pub use crate::timer::Countdown;
pub use crate::simulation::Simulation;
