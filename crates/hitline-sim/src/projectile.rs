//! Projectile record and lifecycle.
//!
//! A projectile moves `NotActivated -> Activated -> Destroyed`. Activation
//! happens once and is what triggers hit prediction; timers are plain
//! deadline fields compared against the simulation clock.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use hitline_core::constants::{GRENADE_DAMPING, GRENADE_REST_SPEED, MS_PER_SEC};
use hitline_core::enums::{ActivationTrigger, DestroyReason, ProjectileKind, ProjectilePhase};
use hitline_core::geometry::direction;
use hitline_core::types::{PlayerId, ProjectileId, Rect, WeaponId};

use crate::registry::TargetRegistry;

/// Kind-specific delivery parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Shape {
    Ray,
    Radius {
        /// Proximity trigger distance, independent from the damage radius.
        #[serde(default)]
        activation_radius: Option<f64>,
    },
}

impl Shape {
    pub fn kind(&self) -> ProjectileKind {
        match self {
            Shape::Ray => ProjectileKind::Ray,
            Shape::Radius { .. } => ProjectileKind::Radius,
        }
    }
}

/// Damage dealt by a payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageProfile {
    pub base: f64,
    /// Scale damage down linearly with distance inside `radius`.
    #[serde(default)]
    pub use_radius_damage: bool,
    /// Effect radius. For radius projectiles this is also the burst area.
    #[serde(default)]
    pub radius: f64,
}

impl DamageProfile {
    /// Damage at `distance` from the ray origin or burst center.
    pub fn at(&self, distance: Option<f64>) -> f64 {
        match distance {
            Some(d) if self.use_radius_damage && self.radius > 0.0 => {
                (self.base * (1.0 - d / self.radius).max(0.0)).ceil()
            }
            _ => self.base,
        }
    }
}

/// Weapon payload attached to a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub shape: Shape,
    pub weapon_id: WeaponId,
    pub damage: DamageProfile,
    /// Units per second.
    pub speed: f64,
    #[serde(default)]
    pub knockback: f64,
    /// Defer activation by this long, whatever the kind.
    #[serde(default)]
    pub activate_delay_ms: Option<f64>,
}

/// Launch parameters supplied by the game layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub owner: PlayerId,
    pub origin: DVec2,
    /// Point that defines the direction; not necessarily where it ends up.
    pub aim: DVec2,
    /// Fire moment. When unset, the controller uses the `now_ms` of its
    /// last `update` (0 before the first one), which can be up to a tick
    /// earlier than the caller's clock. Set it when that matters.
    #[serde(default)]
    pub fired_at_ms: Option<f64>,
    pub payload: Payload,
}

/// Per-projectile state owned by the controller.
#[derive(Debug, Clone)]
pub struct Projectile {
    id: ProjectileId,
    owner: PlayerId,
    payload: Payload,
    origin: DVec2,
    aim: DVec2,
    direction: DVec2,
    position: DVec2,
    velocity: DVec2,
    phase: ProjectilePhase,
    created_at_ms: f64,
    activate_at_ms: Option<f64>,
    activated_at_ms: Option<f64>,
    destroy_at_ms: Option<f64>,
    destroy_reason: Option<DestroyReason>,
    predicted: bool,
}

impl Projectile {
    pub fn new(id: ProjectileId, launch: Launch, now_ms: f64) -> Self {
        let created_at_ms = launch.fired_at_ms.unwrap_or(now_ms);
        let direction = direction(launch.origin, launch.aim);
        Self {
            id,
            owner: launch.owner,
            payload: launch.payload,
            origin: launch.origin,
            aim: launch.aim,
            direction,
            position: launch.origin,
            velocity: direction * launch.payload.speed,
            phase: ProjectilePhase::NotActivated,
            created_at_ms,
            activate_at_ms: launch.payload.activate_delay_ms.map(|d| created_at_ms + d),
            activated_at_ms: None,
            destroy_at_ms: None,
            destroy_reason: None,
            predicted: false,
        }
    }

    pub fn id(&self) -> ProjectileId {
        self.id
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn kind(&self) -> ProjectileKind {
        self.payload.shape.kind()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Unit launch direction (zero when origin and aim coincide).
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Launch speed vector. Ray time of flight uses its magnitude.
    pub fn speed_vector(&self) -> DVec2 {
        self.direction * self.payload.speed
    }

    pub fn phase(&self) -> ProjectilePhase {
        self.phase
    }

    pub fn is_destroyed(&self) -> bool {
        self.phase == ProjectilePhase::Destroyed
    }

    pub fn created_at_ms(&self) -> f64 {
        self.created_at_ms
    }

    pub fn activate_at_ms(&self) -> Option<f64> {
        self.activate_at_ms
    }

    pub fn activated_at_ms(&self) -> Option<f64> {
        self.activated_at_ms
    }

    pub fn destroy_at_ms(&self) -> Option<f64> {
        self.destroy_at_ms
    }

    pub fn destroy_reason(&self) -> Option<DestroyReason> {
        self.destroy_reason
    }

    pub fn activation_radius(&self) -> Option<f64> {
        match self.payload.shape {
            Shape::Radius { activation_radius } => activation_radius,
            Shape::Ray => None,
        }
    }

    /// True for mines: a trigger radius that differs from the burst radius.
    pub fn has_distinct_trigger_radius(&self) -> bool {
        self.activation_radius()
            .is_some_and(|r| r != self.payload.damage.radius)
    }

    pub fn damage_at(&self, distance: Option<f64>) -> f64 {
        self.payload.damage.at(distance)
    }

    /// Logical activation instant and trigger, if the projectile should
    /// activate on this tick.
    ///
    /// Immediate activation reports the fire time and timed activation its
    /// deadline, so hit times do not depend on tick alignment.
    pub fn activation_due<R: TargetRegistry + ?Sized>(
        &self,
        now_ms: f64,
        targets: &R,
    ) -> Option<(f64, ActivationTrigger)> {
        if self.phase != ProjectilePhase::NotActivated {
            return None;
        }
        if let Some(at) = self.activate_at_ms {
            if now_ms >= at {
                return Some((at, ActivationTrigger::Timer));
            }
        }
        match self.payload.shape {
            Shape::Ray if self.activate_at_ms.is_none() => {
                Some((self.created_at_ms, ActivationTrigger::Immediate))
            }
            Shape::Ray => None,
            Shape::Radius {
                activation_radius: Some(_),
            } => self
                .proximity_triggered(targets)
                .then_some((now_ms, ActivationTrigger::Proximity)),
            Shape::Radius {
                activation_radius: None,
            } if self.activate_at_ms.is_none() => {
                Some((self.created_at_ms, ActivationTrigger::Immediate))
            }
            Shape::Radius { .. } => None,
        }
    }

    /// Any live target center within the activation radius of the current position.
    pub fn proximity_triggered<R: TargetRegistry + ?Sized>(&self, targets: &R) -> bool {
        let Some(radius) = self.activation_radius() else {
            return false;
        };
        let mut triggered = false;
        targets.for_each_live_target(&mut |_, rect| {
            triggered |= rect.center().distance(self.position) <= radius;
        });
        triggered
    }

    /// Transition to `Activated`. Radius projectiles stop and schedule
    /// their own removal once the burst has played.
    pub fn activate(&mut self, at_ms: f64, linger_ms: f64) {
        debug_assert_eq!(self.phase, ProjectilePhase::NotActivated);
        self.phase = ProjectilePhase::Activated;
        self.activated_at_ms = Some(at_ms);
        if self.kind() == ProjectileKind::Radius {
            self.velocity = DVec2::ZERO;
            self.destroy_at_ms = Some(at_ms + linger_ms);
        }
    }

    /// Record that hits were predicted. A projectile predicts once.
    pub fn mark_predicted(&mut self) {
        debug_assert!(!self.predicted, "projectile {} predicted twice", self.id);
        self.predicted = true;
    }

    pub fn destroy(&mut self, reason: DestroyReason) {
        if self.phase != ProjectilePhase::Destroyed {
            self.phase = ProjectilePhase::Destroyed;
            self.destroy_reason = Some(reason);
        }
    }

    /// Per-frame motion and expiry. Returns the reason when this call
    /// destroyed the projectile.
    pub fn advance(&mut self, now_ms: f64, delta_ms: f64, world_bounds: &Rect) -> Option<DestroyReason> {
        if self.is_destroyed() {
            return None;
        }
        let dt = delta_ms.max(0.0) / MS_PER_SEC;

        match self.kind() {
            // A ray that cannot move would never leave the world.
            ProjectileKind::Ray
                if self.phase == ProjectilePhase::Activated && self.velocity == DVec2::ZERO =>
            {
                self.destroy(DestroyReason::Expired);
                return Some(DestroyReason::Expired);
            }
            ProjectileKind::Ray => {
                self.position += self.velocity * dt;
            }
            ProjectileKind::Radius => self.advance_thrown(dt),
        }

        let reason = if !world_bounds.contains(self.position) {
            Some(DestroyReason::OutOfBounds)
        } else if self.destroy_at_ms.is_some_and(|at| now_ms >= at) {
            Some(DestroyReason::Expired)
        } else {
            None
        };
        if let Some(reason) = reason {
            self.destroy(reason);
        }
        reason
    }

    /// Thrown radius projectiles slow down and come to rest at the aim point.
    fn advance_thrown(&mut self, dt: f64) {
        if self.velocity == DVec2::ZERO {
            return;
        }
        self.position += self.velocity * dt;
        self.velocity *= (-GRENADE_DAMPING * dt).exp();

        let overshot = (self.aim - self.position).dot(self.direction) <= 0.0;
        if overshot {
            self.position = self.aim;
            self.velocity = DVec2::ZERO;
        } else if self.velocity.length() < GRENADE_REST_SPEED {
            self.velocity = DVec2::ZERO;
        }
    }
}
