use glam::Vec2;
use log::{debug, trace, warn};
use slotmap::SlotMap;

use std::collections::HashSet;

use crate::api::Shape;
use crate::body::PhysicsBody;
use crate::collider::Collider;
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::types::*;

/// Owns colliders and bodies and runs the fixed-order physics tick.
///
/// Registration takes `&mut self`, so nothing can be added or removed while a
/// tick iterates; events are queued and drained after the tick.
pub struct PhysicsManager {
    pub cfg: PhysicsConfig,

    bodies: SlotMap<BodyId, PhysicsBody>,
    colliders: SlotMap<ColliderId, Collider>,

    // Registration order is iteration order
    registered_bodies: Vec<BodyId>,
    categories: [Vec<ColliderId>; 4],

    // (trigger, other) pairs overlapping at the end of the last tick
    trigger_pairs: Vec<(ColliderId, ColliderId)>,

    events: Vec<PhysicsEvent>,
    last_stats: TickStats,
}

impl PhysicsManager {
    pub fn new(cfg: PhysicsConfig) -> Self {
        Self {
            cfg,
            bodies: SlotMap::with_key(),
            colliders: SlotMap::with_key(),
            registered_bodies: Vec::new(),
            categories: Default::default(),
            trigger_pairs: Vec::new(),
            events: Vec::new(),
            last_stats: TickStats::default(),
        }
    }

    // Bodies ------------------------------------------------------------------

    /// Store and register a body.
    pub fn spawn_body(&mut self, body: PhysicsBody) -> BodyId {
        let id = self.bodies.insert(body);
        self.add_body(id);
        id
    }

    pub fn add_body(&mut self, id: BodyId) {
        if !self.bodies.contains_key(id) {
            warn!("add_body: unknown body {id:?}");
            return;
        }
        if self.registered_bodies.contains(&id) {
            warn!("add_body: {id:?} already registered");
            return;
        }
        self.registered_bodies.push(id);
    }

    pub fn remove_body(&mut self, id: BodyId) {
        match self.registered_bodies.iter().position(|b| *b == id) {
            Some(i) => {
                self.registered_bodies.remove(i);
            }
            None => warn!("remove_body: {id:?} is not registered"),
        }
    }

    /// Deregister and free a body.
    pub fn destroy_body(&mut self, id: BodyId) -> Option<PhysicsBody> {
        self.registered_bodies.retain(|b| *b != id);
        self.bodies.remove(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(id)
    }

    pub fn registered_bodies(&self) -> &[BodyId] {
        &self.registered_bodies
    }

    pub fn velocity(&self, id: BodyId) -> Result<Vec2> {
        self.bodies.get(id).map(|b| b.velocity()).ok_or(PhysicsError::UnknownBody(id))
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) -> Result<()> {
        let body = self.bodies.get_mut(id).ok_or(PhysicsError::UnknownBody(id))?;
        body.set_velocity(velocity);
        Ok(())
    }

    pub fn set_gravity_vector(&mut self, id: BodyId, gravity: Vec2) -> Result<()> {
        let body = self.bodies.get_mut(id).ok_or(PhysicsError::UnknownBody(id))?;
        body.set_gravity_vector(gravity);
        Ok(())
    }

    pub fn is_in_air(&self, id: BodyId) -> Result<bool> {
        self.bodies.get(id).map(|b| b.is_in_air()).ok_or(PhysicsError::UnknownBody(id))
    }

    // Colliders ---------------------------------------------------------------

    /// Store and register a collider under its own category.
    pub fn spawn_collider(&mut self, mut collider: Collider) -> ColliderId {
        if collider.category() == CollisionCategory::Physics {
            if collider.body().is_none() {
                warn!("physics collider on {:?} has no body; it will never move", collider.entity());
            }
            collider.fill_default_buffer(self.cfg.default_buffer);
        }
        let category = collider.category();
        let id = self.colliders.insert(collider);
        self.add_collider(id, category);
        id
    }

    pub fn add_collider(&mut self, id: ColliderId, category: CollisionCategory) {
        let Some(collider) = self.colliders.get(id) else {
            warn!("add_collider: unknown collider {id:?}");
            return;
        };
        if collider.category() != category {
            warn!(
                "add_collider: {id:?} is {:?}, refusing to register as {category:?}",
                collider.category()
            );
            return;
        }
        let list = &mut self.categories[category.index()];
        if list.contains(&id) {
            warn!("add_collider: {id:?} already registered as {category:?}");
            return;
        }
        list.push(id);
    }

    pub fn remove_collider(&mut self, id: ColliderId, category: CollisionCategory) {
        let list = &mut self.categories[category.index()];
        match list.iter().position(|c| *c == id) {
            Some(i) => {
                list.remove(i);
                self.release_trigger_pairs(id);
            }
            None => warn!("remove_collider: {id:?} is not registered as {category:?}"),
        }
    }

    /// Deregister and free a collider, closing its trigger overlaps.
    pub fn destroy_collider(&mut self, id: ColliderId) -> Option<Collider> {
        let category = self.colliders.get(id)?.category();
        self.categories[category.index()].retain(|c| *c != id);
        self.release_trigger_pairs(id);
        self.colliders.remove(id)
    }

    /// Destroy every collider and body attached to `entity`.
    pub fn destroy_entity(&mut self, entity: EntityId) {
        let colliders: Vec<ColliderId> = self
            .colliders
            .iter()
            .filter(|(_, c)| c.entity() == entity)
            .map(|(id, _)| id)
            .collect();
        for id in colliders {
            self.destroy_collider(id);
        }
        let bodies: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.entity() == entity)
            .map(|(id, _)| id)
            .collect();
        for id in bodies {
            self.destroy_body(id);
        }
    }

    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    /// Registered colliders of one category, in registration order.
    pub fn colliders_in(&self, category: CollisionCategory) -> &[ColliderId] {
        &self.categories[category.index()]
    }

    /// Trigger pairs overlapping as of the last tick.
    pub fn trigger_overlaps(&self) -> &[(ColliderId, ColliderId)] {
        &self.trigger_pairs
    }

    // Events ------------------------------------------------------------------

    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        let out = self.events.clone();
        self.events.clear();
        out
    }

    /// Counters for the last tick.
    pub fn stats(&self) -> TickStats {
        self.last_stats
    }

    // Tick --------------------------------------------------------------------

    /// One fixed step: integrate, rebuild bounds, resolve, track triggers, update grounded.
    pub fn tick(&mut self, transforms: &mut Transforms) -> Result<()> {
        let dt = self.cfg.fixed_dt;
        let mut stats = TickStats::default();

        for &id in &self.registered_bodies {
            let Some(body) = self.bodies.get_mut(id) else { continue };
            let Some(t) = transforms.get_mut(body.entity()) else { continue };
            if !t.active {
                continue;
            }
            body.integrate_gravity(dt, self.cfg.gravity);
            t.position += body.integrate_position(dt);
            stats.bodies_integrated += 1;
        }

        for list in &self.categories {
            for &id in list {
                let Some(c) = self.colliders.get_mut(id) else { continue };
                let Some(t) = transforms.get(c.entity()) else { continue };
                c.update_bounds(t);
                stats.colliders_updated += 1;
            }
        }

        for &id in &self.categories[CollisionCategory::Physics.index()] {
            let Some(c) = self.colliders.get_mut(id) else { continue };
            let velocity = c
                .body()
                .and_then(|b| self.bodies.get(b))
                .map_or(Vec2::ZERO, |b| b.effective_velocity());
            c.update_swept_bounds(velocity, dt);
        }

        let physics = self.categories[CollisionCategory::Physics.index()].clone();
        let statics = self.categories[CollisionCategory::Static.index()].clone();
        for &pid in &physics {
            for &sid in &statics {
                self.resolve_pair(sid, pid, transforms, &mut stats)?;
            }
        }

        self.track_triggers(transforms, &mut stats)?;

        for &id in &self.registered_bodies {
            let Some(body) = self.bodies.get_mut(id) else { continue };
            if !is_active(transforms, body.entity()) {
                continue;
            }
            if let Some(event) = body.update_grounded() {
                push_event(
                    &mut self.events,
                    self.cfg.max_events,
                    &mut stats,
                    PhysicsEvent::Body { body: id, event },
                );
            }
        }

        debug!(
            "physics tick: {} bodies, {} colliders, {} pairs ({} ignored), {}v/{}h pushes, {} events",
            stats.bodies_integrated,
            stats.colliders_updated,
            stats.pairs_tested,
            stats.pairs_ignored,
            stats.vertical_pushes,
            stats.horizontal_pushes,
            stats.events_emitted
        );
        self.last_stats = stats;
        Ok(())
    }

    /// Static `sid` pushes physics collider `pid` out: vertical first, then horizontal.
    ///
    /// A pair only touching through the swept bounds is snapped into contact
    /// along the axis the motion enters across, if it enters at all.
    fn resolve_pair(
        &mut self,
        sid: ColliderId,
        pid: ColliderId,
        transforms: &mut Transforms,
        stats: &mut TickStats,
    ) -> Result<()> {
        let (Some(s), Some(p)) = (self.colliders.get(sid), self.colliders.get(pid)) else {
            return Ok(());
        };
        if s.entity() == p.entity() || !is_active(transforms, s.entity()) || !is_active(transforms, p.entity()) {
            return Ok(());
        }
        if self.cfg.layers.ignores(s.layer(), p.layer()) {
            stats.pairs_ignored += 1;
            return Ok(());
        }
        stats.pairs_tested += 1;
        if !s.is_physics_overlapping(p)? {
            return Ok(());
        }

        if !s.is_overlapping(p)? {
            // Reached only through the sweep: snap into contact across the entry axis
            let Some((_, axis)) = s.sweep_entry(p) else {
                return Ok(());
            };
            let offset = s.axis_push_offset(p, axis)?;
            if axis.pick(offset) != 0.0 {
                self.apply_push(sid, pid, offset, axis, transforms);
                match axis {
                    Axis::Vertical => stats.vertical_pushes += 1,
                    Axis::Horizontal => stats.horizontal_pushes += 1,
                }
            }
            return Ok(());
        }

        let push = s.push_out_offset(p)?;
        if push.push_vertically && push.offset.y != 0.0 {
            self.apply_push(sid, pid, Vec2::new(0.0, push.offset.y), Axis::Vertical, transforms);
            stats.vertical_pushes += 1;
        }
        if !push.push_horizontally {
            return Ok(());
        }

        let (Some(s), Some(p)) = (self.colliders.get(sid), self.colliders.get(pid)) else {
            return Ok(());
        };
        // Still in after the vertical push, and not just skimming its top or bottom
        let blocked = if s.is_overlapping(p)? {
            s.overlap_depth(p, Axis::Vertical) > p.buffer()
        } else {
            matches!(s.sweep_entry(p), Some((_, Axis::Horizontal)))
        };
        if !blocked {
            return Ok(());
        }
        let offset = s.axis_push_offset(p, Axis::Horizontal)?;
        if offset.x != 0.0 {
            self.apply_push(sid, pid, offset, Axis::Horizontal, transforms);
            stats.horizontal_pushes += 1;
        }
        Ok(())
    }

    /// Translate the physics collider and its entity, stop velocity into the static.
    fn apply_push(&mut self, sid: ColliderId, pid: ColliderId, delta: Vec2, axis: Axis, transforms: &mut Transforms) {
        let Some(static_center) = self.colliders.get(sid).map(|s| s.bounds().center()) else {
            return;
        };
        let Some(c) = self.colliders.get_mut(pid) else { return };
        trace!("push {:?} by {delta} off {sid:?}", c.entity());
        if let Some(t) = transforms.get_mut(c.entity()) {
            t.position += delta;
        }
        c.translate(delta);

        let outward = axis.pick(c.bounds().center() - static_center);
        let mut velocity = Vec2::ZERO;
        if let Some(body) = c.body().and_then(|b| self.bodies.get_mut(b)) {
            let v = body.velocity();
            if axis.pick(v) * outward < 0.0 {
                body.set_velocity(axis.with(v, 0.0));
            }
            velocity = body.effective_velocity();
        }
        c.update_swept_bounds(velocity, self.cfg.fixed_dt);
    }

    fn track_triggers(&mut self, transforms: &Transforms, stats: &mut TickStats) -> Result<()> {
        let mut current = Vec::new();
        for &tid in &self.categories[CollisionCategory::Trigger.index()] {
            let Some(t) = self.colliders.get(tid) else { continue };
            if !is_active(transforms, t.entity()) {
                continue;
            }
            for category in [CollisionCategory::Physics, CollisionCategory::Movable] {
                for &oid in &self.categories[category.index()] {
                    let Some(o) = self.colliders.get(oid) else { continue };
                    if o.entity() == t.entity() || !is_active(transforms, o.entity()) {
                        continue;
                    }
                    if self.cfg.layers.ignores(t.layer(), o.layer()) {
                        continue;
                    }
                    if t.is_overlapping(o)? {
                        current.push((tid, oid));
                    }
                }
            }
        }

        let previous = std::mem::replace(&mut self.trigger_pairs, current);
        let previous_set: HashSet<(ColliderId, ColliderId)> = previous.iter().copied().collect();
        let current_set: HashSet<(ColliderId, ColliderId)> = self.trigger_pairs.iter().copied().collect();
        let max = self.cfg.max_events;

        for &(trigger, other) in &previous {
            if !current_set.contains(&(trigger, other)) {
                let ev = PhysicsEvent::Trigger { phase: OverlapPhase::Exit, trigger, other };
                push_event(&mut self.events, max, stats, ev);
            }
        }
        for &(trigger, other) in &self.trigger_pairs {
            if !previous_set.contains(&(trigger, other)) {
                let ev = PhysicsEvent::Trigger { phase: OverlapPhase::Enter, trigger, other };
                push_event(&mut self.events, max, stats, ev);
            }
            let ev = PhysicsEvent::Trigger { phase: OverlapPhase::Stay, trigger, other };
            push_event(&mut self.events, max, stats, ev);
        }
        Ok(())
    }

    /// Drop every trigger pair involving `id`, emitting their exits.
    fn release_trigger_pairs(&mut self, id: ColliderId) {
        let max = self.cfg.max_events;
        let stats = &mut self.last_stats;
        let events = &mut self.events;
        self.trigger_pairs.retain(|&(trigger, other)| {
            if trigger != id && other != id {
                return true;
            }
            let ev = PhysicsEvent::Trigger { phase: OverlapPhase::Exit, trigger, other };
            push_event(events, max, stats, ev);
            false
        });
    }
}

fn is_active(transforms: &Transforms, entity: EntityId) -> bool {
    transforms.get(entity).is_some_and(|t| t.active)
}

fn push_event(buf: &mut Vec<PhysicsEvent>, max: usize, stats: &mut TickStats, ev: PhysicsEvent) {
    if buf.len() < max {
        buf.push(ev);
        stats.events_emitted += 1;
    } else {
        if stats.events_dropped == 0 {
            warn!("physics event buffer full ({max}); dropping events until drained");
        }
        stats.events_dropped += 1;
    }
}
