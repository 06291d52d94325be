use glam::Vec2;
use log::warn;

use crate::types::{BodyEvent, EntityId};

/// Velocity along gravity below this counts as resting.
pub const RESTING_EPSILON: f32 = 1e-4;

/// Kinematic velocity/gravity integrator attached to an entity.
///
/// Velocity is set directly by gameplay code; the body only adds gravity,
/// clamps to terminal velocity and reports grounded/airborne transitions.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsBody {
    entity: EntityId,
    velocity: Vec2,
    gravity: Vec2,
    pub gravity_scale: f32,
    /// Cap on the speed along gravity; exceeded by at most one tick of acceleration.
    pub terminal_velocity: f32,
    pub use_gravity: bool,
    root_motion: Option<Vec2>,
    grounded: bool,
}

impl PhysicsBody {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            velocity: Vec2::ZERO,
            gravity: Vec2::NEG_Y,
            gravity_scale: 1.0,
            terminal_velocity: 20.0,
            use_gravity: true,
            root_motion: None,
            grounded: false,
        }
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_terminal_velocity(mut self, terminal_velocity: f32) -> Self {
        self.terminal_velocity = terminal_velocity;
        self
    }

    pub fn with_gravity_vector(mut self, gravity: Vec2) -> Self {
        self.set_gravity_vector(gravity);
        self
    }

    pub fn without_gravity(mut self) -> Self {
        self.use_gravity = false;
        self
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Velocity the position integrates with this tick.
    pub fn effective_velocity(&self) -> Vec2 {
        self.root_motion.unwrap_or(self.velocity)
    }

    pub fn gravity_vector(&self) -> Vec2 {
        self.gravity
    }

    /// Stored normalized; a zero or non-finite vector is rejected.
    pub fn set_gravity_vector(&mut self, gravity: Vec2) {
        match gravity.try_normalize() {
            Some(g) => self.gravity = g,
            None => warn!(
                "rejecting gravity vector {gravity} for {:?}; keeping {}",
                self.entity, self.gravity
            ),
        }
    }

    pub fn root_motion(&self) -> Option<Vec2> {
        self.root_motion
    }

    /// Animator-driven override velocity; suspends gravity while set.
    pub fn set_root_motion(&mut self, velocity: Option<Vec2>) {
        self.root_motion = velocity;
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_in_air(&self) -> bool {
        !self.grounded
    }

    pub fn integrate_gravity(&mut self, dt: f32, gravity: f32) {
        if self.root_motion.is_some() || !self.use_gravity {
            return;
        }
        let g = self.gravity;
        let perp = g.perp();
        let along = self.velocity.dot(g);
        if along > self.terminal_velocity {
            self.velocity = perp * self.velocity.dot(perp) + g * self.terminal_velocity;
        }
        // Applied after the clamp: one tick of overshoot is allowed
        self.velocity += g * (self.gravity_scale * gravity * dt);
    }

    /// Translation for this tick.
    pub fn integrate_position(&self, dt: f32) -> Vec2 {
        self.effective_velocity() * dt
    }

    /// Edge-triggered grounded/airborne detection, run once per tick after resolution.
    pub fn update_grounded(&mut self) -> Option<BodyEvent> {
        let resting = self.effective_velocity().dot(self.gravity).abs() <= RESTING_EPSILON;
        match (self.grounded, resting) {
            (false, true) => {
                self.grounded = true;
                Some(BodyEvent::Grounded)
            }
            (true, false) => {
                self.grounded = false;
                Some(BodyEvent::Airborne)
            }
            _ => None,
        }
    }
}
