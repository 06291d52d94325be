use glam::Vec2;
use log::trace;

use crate::config::{ConfigError, PhysicsConfig};
use crate::error::Result;
use crate::hitbox::HitboxManager;
use crate::types::{EntityId, Transform, Transforms};
use crate::world::PhysicsManager;

/// One game session: the entity transforms plus both managers.
///
/// Passed explicitly to whoever needs it; nothing here is global.
pub struct Simulation {
    cfg: PhysicsConfig,
    transforms: Transforms,
    pub physics: PhysicsManager,
    pub hitboxes: HitboxManager,
    frame: u64,
}

impl Simulation {
    pub fn new(cfg: PhysicsConfig) -> std::result::Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            transforms: Transforms::with_key(),
            physics: PhysicsManager::new(cfg.clone()),
            hitboxes: HitboxManager::new(cfg.max_events),
            cfg,
            frame: 0,
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.cfg
    }

    /// Completed steps.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn spawn_entity(&mut self, position: Vec2) -> EntityId {
        self.transforms.insert(Transform::new(position))
    }

    /// Destroy the entity's hitboxes, colliders and bodies (firing their exits), then the entity.
    pub fn despawn_entity(&mut self, entity: EntityId) -> Option<Transform> {
        self.hitboxes.destroy_owned_by(entity);
        self.physics.destroy_entity(entity);
        self.transforms.remove(entity)
    }

    pub fn transform(&self, entity: EntityId) -> Option<&Transform> {
        self.transforms.get(entity)
    }

    pub fn transform_mut(&mut self, entity: EntityId) -> Option<&mut Transform> {
        self.transforms.get_mut(entity)
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    /// Hitbox tick on last step's positions, then the physics tick.
    pub fn step(&mut self) -> Result<()> {
        let dt = self.cfg.fixed_dt;
        self.hitboxes.tick(&self.transforms, dt)?;
        self.physics.tick(&mut self.transforms)?;
        self.frame += 1;
        trace!("frame {} done", self.frame);
        Ok(())
    }
}
