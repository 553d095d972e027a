//! Target registry: the engine's view of damageable entities.
//!
//! The world layer owns targets. The engine only enumerates live targets,
//! reads their bounds, and calls `apply_damage`. `TargetWorld` is the
//! hecs-backed registry used by the tools and tests.

use glam::DVec2;
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use hitline_core::components::{Health, Hitbox, LastHit, Permeable, Target};
use hitline_core::types::{PlayerId, Rect, TargetId, WeaponId};

/// Everything a target needs to know about one hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub value: f64,
    /// Knockback vector.
    pub force: DVec2,
    pub impact: DVec2,
    /// Compute the outcome without mutating the target.
    pub simulate: bool,
    pub source: PlayerId,
    pub weapon_id: WeaponId,
    pub distance: Option<f64>,
    /// Position within the hit group (0 = first target on the path).
    pub hit_index: usize,
}

/// Result of applying (or previewing) one hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub health: f64,
    pub died: bool,
    /// The projectile continues to the next target in its group.
    pub penetrated: bool,
}

/// Read-mostly access to the damageable entities of the world.
pub trait TargetRegistry {
    /// Visit every live target with its current bounds.
    fn for_each_live_target(&self, f: &mut dyn FnMut(TargetId, Rect));

    /// Current bounds of a target, `None` if it no longer exists.
    fn bounds(&self, target: TargetId) -> Option<Rect>;

    /// Dead or missing targets both report `true`.
    fn is_dead(&self, target: TargetId) -> bool;

    /// Apply a hit. Returns `None` when the target is gone or already dead.
    fn apply_damage(&mut self, target: TargetId, request: &DamageRequest)
        -> Option<DamageOutcome>;
}

/// Spawn parameters for a target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetSpec {
    pub bounds: Rect,
    pub health: f64,
    #[serde(default)]
    pub permeable: bool,
}

/// hecs-backed target registry.
#[derive(Default)]
pub struct TargetWorld {
    world: World,
}

fn entity_of(target: TargetId) -> Option<Entity> {
    Entity::from_bits(target.0)
}

fn target_of(entity: Entity) -> TargetId {
    TargetId(entity.to_bits().get())
}

impl TargetWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_target(&mut self, spec: TargetSpec) -> TargetId {
        let entity = self.world.spawn((
            Target,
            Hitbox { rect: spec.bounds },
            Health {
                current: spec.health,
                max: spec.health,
            },
        ));
        if spec.permeable {
            let _ = self.world.insert_one(entity, Permeable);
        }
        target_of(entity)
    }

    /// Remove a target entirely. Only the world layer does this, between updates.
    pub fn despawn_target(&mut self, target: TargetId) -> bool {
        entity_of(target).is_some_and(|e| self.world.despawn(e).is_ok())
    }

    /// Move a target's hitbox (the world layer animates targets).
    pub fn set_bounds(&mut self, target: TargetId, rect: Rect) -> bool {
        let Some(entity) = entity_of(target) else {
            return false;
        };
        match self.world.get::<&mut Hitbox>(entity) {
            Ok(mut hitbox) => {
                hitbox.rect = rect;
                true
            }
            Err(_) => false,
        }
    }

    pub fn health(&self, target: TargetId) -> Option<f64> {
        let entity = entity_of(target)?;
        self.world.get::<&Health>(entity).ok().map(|h| h.current)
    }

    pub fn last_hit(&self, target: TargetId) -> Option<LastHit> {
        let entity = entity_of(target)?;
        self.world.get::<&LastHit>(entity).ok().map(|h| *h)
    }

    pub fn live_count(&self) -> usize {
        let mut count = 0;
        self.for_each_live_target(&mut |_, _| count += 1);
        count
    }

    /// Read-only access to the underlying ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }
}

impl TargetRegistry for TargetWorld {
    fn for_each_live_target(&self, f: &mut dyn FnMut(TargetId, Rect)) {
        let mut query = self.world.query::<(&Target, &Hitbox, &Health)>();
        for (entity, (_target, hitbox, health)) in query.iter() {
            if health.current > 0.0 {
                f(target_of(entity), hitbox.rect);
            }
        }
    }

    fn bounds(&self, target: TargetId) -> Option<Rect> {
        let entity = entity_of(target)?;
        self.world.get::<&Hitbox>(entity).ok().map(|h| h.rect)
    }

    fn is_dead(&self, target: TargetId) -> bool {
        self.health(target).map_or(true, |h| h <= 0.0)
    }

    fn apply_damage(
        &mut self,
        target: TargetId,
        request: &DamageRequest,
    ) -> Option<DamageOutcome> {
        let entity = entity_of(target)?;
        let permeable = self.world.get::<&Permeable>(entity).is_ok();

        let outcome = {
            let mut health = self.world.get::<&mut Health>(entity).ok()?;
            if health.current <= 0.0 {
                return None;
            }
            let remaining = (health.current - request.value).max(0.0);
            if !request.simulate {
                health.current = remaining;
            }
            let died = remaining <= 0.0;
            DamageOutcome {
                health: remaining,
                died,
                // A kill always opens the path for the remaining energy.
                penetrated: permeable || died,
            }
        };

        if !request.simulate {
            let last_hit = LastHit {
                player: request.source,
                weapon_id: request.weapon_id,
                hit_index: request.hit_index,
                distance: request.distance,
                value: request.value,
            };
            let _ = self.world.insert_one(entity, last_hit);
        }
        Some(outcome)
    }
}
