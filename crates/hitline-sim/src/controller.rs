//! Projectile controller: the engine's per-tick orchestration.
//!
//! `ProjectileController` owns every projectile and the resolution queue.
//! The target registry belongs to the world layer and is lent to `update`.
//! Completely headless and single-threaded, enabling deterministic testing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use hitline_core::constants::{PENETRATION_FALLOFF, RADIUS_LINGER_MS, WORLD_MIN, WORLD_SIZE};
use hitline_core::enums::{ActivationTrigger, DestroyReason};
use hitline_core::events::CombatEvent;
use hitline_core::types::{ProjectileId, Rect, SimTime};

use crate::predictor;
use crate::projectile::{Launch, Projectile};
use crate::queue::ResolutionQueue;
use crate::registry::TargetRegistry;
use crate::resolver;

/// Runtime tuning for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Ray projectiles leaving this rectangle are destroyed.
    pub world_bounds: Rect,
    /// How long a detonated radius projectile stays alive.
    pub radius_linger_ms: f64,
    /// Damage multiplier per penetrated target.
    pub penetration_falloff: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            world_bounds: Rect::new(WORLD_MIN, WORLD_MIN, WORLD_SIZE, WORLD_SIZE),
            radius_linger_ms: RADIUS_LINGER_MS,
            penetration_falloff: PENETRATION_FALLOFF,
        }
    }
}

/// Which projectiles an activation pass looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivationPass {
    /// Timers, immediate activation and proximity.
    All,
    /// Proximity only, for mines whose trigger radius differs from their burst.
    Proximity,
}

/// Tracks projectiles from creation to destruction and resolves their hits.
pub struct ProjectileController {
    config: ControllerConfig,
    time: SimTime,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    not_activated: Vec<ProjectileId>,
    queue: ResolutionQueue,
    next_projectile_id: u32,
    events: Vec<CombatEvent>,
}

impl Default for ProjectileController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl ProjectileController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            time: SimTime::default(),
            projectiles: BTreeMap::new(),
            not_activated: Vec::new(),
            queue: ResolutionQueue::new(),
            next_projectile_id: 0,
            events: Vec::new(),
        }
    }

    /// Register a projectile. It waits for activation until the next update.
    ///
    /// Without `Launch::fired_at_ms` the fire time is the `now_ms` of the
    /// last update, not the caller's current clock.
    pub fn create_projectile(&mut self, launch: Launch) -> ProjectileId {
        let id = ProjectileId(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);

        let projectile = Projectile::new(id, launch, self.time.now_ms);
        debug!(
            projectile = %id,
            kind = ?projectile.kind(),
            weapon_id = projectile.payload().weapon_id,
            "projectile created"
        );
        self.projectiles.insert(id, projectile);
        self.not_activated.push(id);
        id
    }

    /// Advance the engine by one tick and return the events it produced.
    pub fn update<R: TargetRegistry + ?Sized>(
        &mut self,
        now_ms: f64,
        delta_ms: f64,
        targets: &mut R,
    ) -> Vec<CombatEvent> {
        self.time.advance_to(now_ms);
        let now = self.time.now_ms;

        // 1. Activation (timers, fire moment, proximity)
        self.activate_pending(now, &*targets, ActivationPass::All);
        // 2. Release and resolve due hit groups
        self.resolve_due(now, targets);
        // 3. Projectile motion and expiry
        self.advance_projectiles(now, delta_ms);
        // 4. Mine triggers against post-movement positions
        self.activate_pending(now, &*targets, ActivationPass::Proximity);

        std::mem::take(&mut self.events)
    }

    /// Destroy a projectile early (direct hit). It is removed on the next update.
    pub fn on_hit(&mut self, id: ProjectileId) -> bool {
        match self.projectiles.get_mut(&id) {
            Some(projectile) if !projectile.is_destroyed() => {
                projectile.destroy(DestroyReason::Hit);
                true
            }
            _ => false,
        }
    }

    /// Tear down: drop all projectiles and everything still scheduled.
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.not_activated.clear();
        self.queue.clear();
        self.events.clear();
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.values()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_pending_activation(&self, id: ProjectileId) -> bool {
        self.not_activated.contains(&id)
    }

    pub fn queue(&self) -> &ResolutionQueue {
        &self.queue
    }

    fn activate_pending<R: TargetRegistry + ?Sized>(
        &mut self,
        now: f64,
        targets: &R,
        pass: ActivationPass,
    ) {
        let mut waiting = Vec::with_capacity(self.not_activated.len());

        for id in std::mem::take(&mut self.not_activated) {
            let Some(projectile) = self.projectiles.get_mut(&id) else {
                continue;
            };
            if projectile.is_destroyed() {
                continue;
            }

            let due = match pass {
                ActivationPass::All => projectile.activation_due(now, targets),
                ActivationPass::Proximity => (projectile.has_distinct_trigger_radius()
                    && projectile.proximity_triggered(targets))
                .then_some((now, ActivationTrigger::Proximity)),
            };
            let Some((at_ms, trigger)) = due else {
                waiting.push(id);
                continue;
            };

            projectile.activate(at_ms, self.config.radius_linger_ms);
            projectile.mark_predicted();
            let group = predictor::predict(projectile, targets, at_ms);
            let hits = group.as_ref().map_or(0, |g| g.len());
            debug!(
                projectile = %id,
                ?trigger,
                at_ms,
                hits,
                due_ms = ?group.as_ref().map(|g| g.time_ms()),
                "projectile activated"
            );

            self.events.push(CombatEvent::ProjectileActivated {
                projectile: id,
                kind: projectile.kind(),
                trigger,
                at_ms,
                hits,
            });
            if let Some(group) = group {
                self.queue.push(group);
            }
        }

        self.not_activated = waiting;
    }

    fn resolve_due<R: TargetRegistry + ?Sized>(&mut self, now: f64, targets: &mut R) {
        let due = self.queue.slice_current_hits(now);
        if due.is_empty() {
            return;
        }
        resolver::resolve_groups(
            &due,
            targets,
            self.config.penetration_falloff,
            &mut self.events,
        );
    }

    fn advance_projectiles(&mut self, now: f64, delta_ms: f64) {
        let bounds = self.config.world_bounds;
        for projectile in self.projectiles.values_mut() {
            projectile.advance(now, delta_ms, &bounds);
        }

        let events = &mut self.events;
        self.projectiles.retain(|&id, projectile| {
            if !projectile.is_destroyed() {
                return true;
            }
            let reason = projectile.destroy_reason().unwrap_or(DestroyReason::Expired);
            debug!(projectile = %id, ?reason, "projectile destroyed");
            events.push(CombatEvent::ProjectileDestroyed {
                projectile: id,
                reason,
                position: projectile.position(),
            });
            false
        });

        let projectiles = &self.projectiles;
        self.not_activated.retain(|id| projectiles.contains_key(id));
    }
}
