//! Attack hitboxes and damageable hurtboxes.
//!
//! Pairs are tracked across ticks so every overlap produces one `Enter`, a
//! `Stay` per tick (including the first) and one `Exit`. Events queue on the
//! manager and reach gameplay code through [`HitboxManager::dispatch`].

use glam::Vec2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use std::collections::HashSet;

use crate::bounds::{Bounds, BoxBounds, CircleBounds};
use crate::error::{PhysicsError, Result};
use crate::timer::Countdown;
use crate::types::{EntityId, HitboxId, OverlapPhase, Transform, Transforms};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitboxKind {
    /// Deals damage.
    Hitbox,
    /// Receives damage. Two hurtboxes never interact.
    Hurtbox,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum HitboxShape {
    Box { size: Vec2 },
    Circle { radius: f32 },
}

#[derive(Clone, Debug)]
pub struct Hitbox {
    kind: HitboxKind,
    shape: HitboxShape,
    offset: Vec2,
    owner: EntityId,
    enabled: bool,
    lifetime: Option<Countdown>,
    bounds: Bounds,
    overlaps: HashSet<HitboxId>,
}

impl Hitbox {
    pub fn new(owner: EntityId, kind: HitboxKind, shape: HitboxShape) -> Self {
        let mut hitbox = Self {
            kind,
            shape,
            offset: Vec2::ZERO,
            owner,
            enabled: true,
            lifetime: None,
            bounds: BoxBounds::new(Vec2::ZERO, Vec2::ZERO).into(),
            overlaps: HashSet::new(),
        };
        hitbox.update_bounds(&Transform::default());
        hitbox
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Disable automatically after `seconds` of enabled ticks.
    pub fn with_lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = Some(Countdown::started(seconds));
        self
    }

    pub fn spawn_disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn kind(&self) -> HitboxKind {
        self.kind
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn lifetime(&self) -> Option<&Countdown> {
        self.lifetime.as_ref()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Peers currently overlapping this hitbox.
    pub fn overlaps(&self) -> &HashSet<HitboxId> {
        &self.overlaps
    }

    pub fn update_bounds(&mut self, transform: &Transform) {
        let center = transform.position + self.offset * transform.scale;
        let scale = transform.scale.abs();
        self.bounds = match self.shape {
            HitboxShape::Box { size } => BoxBounds::new(center, size * scale).into(),
            HitboxShape::Circle { radius } => CircleBounds::new(center, radius * scale.max_element()).into(),
        };
    }

    /// Different owners, and not two hurtboxes.
    pub fn can_pair_with(&self, other: &Hitbox) -> bool {
        self.owner != other.owner
            && !(self.kind == HitboxKind::Hurtbox && other.kind == HitboxKind::Hurtbox)
    }

    fn contact(&self, id: HitboxId) -> HitboxContact {
        HitboxContact {
            id,
            owner: self.owner,
            kind: self.kind,
        }
    }
}

/// Handle to one side of a hitbox interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HitboxContact {
    pub id: HitboxId,
    pub owner: EntityId,
    pub kind: HitboxKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Hitbox against hurtbox.
    Hit,
    /// Hitbox against hitbox (attack trade).
    Clash,
}

/// One pair, one phase. For [`Interaction::Hit`], `a` is the hitbox side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HitboxEvent {
    pub phase: OverlapPhase,
    pub interaction: Interaction,
    pub a: HitboxContact,
    pub b: HitboxContact,
}

/// Gameplay-side receiver of hitbox events. Every callback defaults to a no-op.
pub trait HitboxListener {
    /// `hitbox` (ours) touches `hurtbox` (theirs).
    fn on_hit_enemy(&mut self, _phase: OverlapPhase, _hitbox: HitboxContact, _hurtbox: HitboxContact) {}

    /// `hurtbox` (ours) is touched by `hitbox` (theirs).
    fn on_hit_by_enemy(&mut self, _phase: OverlapPhase, _hurtbox: HitboxContact, _hitbox: HitboxContact) {}

    fn on_clash_with_enemy(&mut self, _phase: OverlapPhase, _ours: HitboxContact, _theirs: HitboxContact) {}
}

pub struct HitboxManager {
    /// Cap on undrained `Stay` events; `Enter`/`Exit` are never dropped.
    pub max_events: usize,
    hitboxes: SlotMap<HitboxId, Hitbox>,
    // Spawn order; pair checks and exits follow it
    order: Vec<HitboxId>,
    events: Vec<HitboxEvent>,
    dropped: usize,
}

impl HitboxManager {
    pub fn new(max_events: usize) -> Self {
        Self {
            max_events,
            hitboxes: SlotMap::with_key(),
            order: Vec::new(),
            events: Vec::new(),
            dropped: 0,
        }
    }

    pub fn spawn(&mut self, hitbox: Hitbox) -> HitboxId {
        let id = self.hitboxes.insert(hitbox);
        self.order.push(id);
        id
    }

    pub fn hitbox(&self, id: HitboxId) -> Option<&Hitbox> {
        self.hitboxes.get(id)
    }

    pub fn hitbox_mut(&mut self, id: HitboxId) -> Option<&mut Hitbox> {
        self.hitboxes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.hitboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hitboxes.is_empty()
    }

    /// Disabling exits every current overlap; enabling restarts the lifetime.
    pub fn set_enabled(&mut self, id: HitboxId, enabled: bool) -> Result<()> {
        let hitbox = self.hitboxes.get_mut(id).ok_or(PhysicsError::UnknownHitbox(id))?;
        if hitbox.enabled == enabled {
            return Ok(());
        }
        hitbox.enabled = enabled;
        if enabled {
            if let Some(lifetime) = hitbox.lifetime.as_mut() {
                lifetime.start();
            }
        } else {
            self.clear_overlaps(id);
        }
        Ok(())
    }

    pub fn destroy(&mut self, id: HitboxId) -> Option<Hitbox> {
        if !self.hitboxes.contains_key(id) {
            return None;
        }
        self.clear_overlaps(id);
        self.order.retain(|h| *h != id);
        self.hitboxes.remove(id)
    }

    pub fn destroy_owned_by(&mut self, owner: EntityId) {
        let owned: Vec<HitboxId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.hitboxes.get(*id).is_some_and(|h| h.owner == owner))
            .collect();
        for id in owned {
            self.destroy(id);
        }
    }

    /// `Stay` events dropped since the last drain because the buffer was full.
    pub fn events_dropped(&self) -> usize {
        self.dropped
    }

    pub fn drain_events(&mut self) -> Vec<HitboxEvent> {
        self.dropped = 0;
        std::mem::take(&mut self.events)
    }

    /// Drain queued events into `listener`, calling back once per side.
    pub fn dispatch<L: HitboxListener>(&mut self, listener: &mut L) {
        for ev in self.drain_events() {
            match ev.interaction {
                Interaction::Hit => {
                    listener.on_hit_enemy(ev.phase, ev.a, ev.b);
                    listener.on_hit_by_enemy(ev.phase, ev.b, ev.a);
                }
                Interaction::Clash => {
                    listener.on_clash_with_enemy(ev.phase, ev.a, ev.b);
                    listener.on_clash_with_enemy(ev.phase, ev.b, ev.a);
                }
            }
        }
    }

    pub fn tick(&mut self, transforms: &Transforms, dt: f32) -> Result<()> {
        let mut expired = Vec::new();
        for &id in &self.order {
            let Some(h) = self.hitboxes.get_mut(id) else { continue };
            if !h.enabled {
                continue;
            }
            if let Some(lifetime) = h.lifetime.as_mut() {
                if lifetime.tick(dt) {
                    expired.push(id);
                }
            }
        }
        for id in expired {
            debug!("hitbox {id:?} lifetime expired");
            self.set_enabled(id, false)?;
        }

        // Enabled hitboxes; the flag marks a live owner whose bounds were rebuilt
        let mut candidates: Vec<(HitboxId, bool)> = Vec::new();
        for &id in &self.order {
            let Some(h) = self.hitboxes.get_mut(id) else { continue };
            if !h.enabled {
                continue;
            }
            let live = match transforms.get(h.owner) {
                Some(t) if t.active => {
                    h.update_bounds(t);
                    true
                }
                _ => false,
            };
            candidates.push((id, live));
        }

        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let (a, live_a) = candidates[i];
                let (b, live_b) = candidates[j];
                let (Some(ha), Some(hb)) = (self.hitboxes.get(a), self.hitboxes.get(b)) else {
                    continue;
                };
                if !ha.can_pair_with(hb) {
                    continue;
                }
                let overlapping = live_a && live_b && ha.bounds.overlaps(&hb.bounds)?;
                if overlapping {
                    if self.link(a, b) {
                        self.emit(OverlapPhase::Enter, a, b);
                    }
                    self.emit(OverlapPhase::Stay, a, b);
                } else if self.unlink(a, b) {
                    self.emit(OverlapPhase::Exit, a, b);
                }
            }
        }
        Ok(())
    }

    /// Record the pair in both sets; true if it is new.
    fn link(&mut self, a: HitboxId, b: HitboxId) -> bool {
        let mut fresh = false;
        if let Some(h) = self.hitboxes.get_mut(a) {
            fresh |= h.overlaps.insert(b);
        }
        if let Some(h) = self.hitboxes.get_mut(b) {
            fresh |= h.overlaps.insert(a);
        }
        fresh
    }

    /// Drop the pair from both sets; true if it was present.
    fn unlink(&mut self, a: HitboxId, b: HitboxId) -> bool {
        let mut present = false;
        if let Some(h) = self.hitboxes.get_mut(a) {
            present |= h.overlaps.remove(&b);
        }
        if let Some(h) = self.hitboxes.get_mut(b) {
            present |= h.overlaps.remove(&a);
        }
        present
    }

    /// Empty `id`'s overlap set, exiting each peer in spawn order.
    fn clear_overlaps(&mut self, id: HitboxId) {
        let Some(h) = self.hitboxes.get_mut(id) else { return };
        let peers = std::mem::take(&mut h.overlaps);
        if peers.is_empty() {
            return;
        }
        let ordered: Vec<HitboxId> = self.order.iter().copied().filter(|p| peers.contains(p)).collect();
        for peer in ordered {
            if let Some(p) = self.hitboxes.get_mut(peer) {
                p.overlaps.remove(&id);
            }
            self.emit(OverlapPhase::Exit, id, peer);
        }
    }

    fn emit(&mut self, phase: OverlapPhase, a: HitboxId, b: HitboxId) {
        let (Some(ha), Some(hb)) = (self.hitboxes.get(a), self.hitboxes.get(b)) else {
            return;
        };
        let (interaction, a, b) = match (ha.kind, hb.kind) {
            (HitboxKind::Hitbox, HitboxKind::Hitbox) => (Interaction::Clash, ha.contact(a), hb.contact(b)),
            (HitboxKind::Hurtbox, HitboxKind::Hitbox) => (Interaction::Hit, hb.contact(b), ha.contact(a)),
            _ => (Interaction::Hit, ha.contact(a), hb.contact(b)),
        };
        // Transitions always queue so every Enter is matched by its Exit
        if phase != OverlapPhase::Stay || self.events.len() < self.max_events {
            self.events.push(HitboxEvent { phase, interaction, a, b });
        } else {
            if self.dropped == 0 {
                warn!("hitbox event buffer full ({}); dropping Stay events until drained", self.max_events);
            }
            self.dropped += 1;
        }
    }
}
