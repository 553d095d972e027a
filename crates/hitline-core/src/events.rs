//! Notifications emitted by the engine for the surrounding game layer.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{PlayerId, ProjectileId, TargetId, WeaponId};

/// Outbound combat events, drained from the controller every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// A projectile activated and predicted its hits.
    ProjectileActivated {
        projectile: ProjectileId,
        kind: ProjectileKind,
        trigger: ActivationTrigger,
        at_ms: f64,
        /// Number of hits scheduled (0 = nothing in reach).
        hits: usize,
    },
    /// Damage was applied to a target.
    DamageApplied {
        projectile: ProjectileId,
        target: TargetId,
        value: f64,
        health: f64,
        died: bool,
        penetrated: bool,
        hit_index: usize,
    },
    /// A target died from a hit.
    TargetKilled {
        target: TargetId,
        killer: PlayerId,
        weapon_id: WeaponId,
    },
    /// One hit group killed several targets.
    MultiKill {
        weapon_id: WeaponId,
        kind: ProjectileKind,
        tier: MultiKillTier,
        kills: u32,
    },
    /// A projectile left tracking; visuals can be cleaned up.
    ProjectileDestroyed {
        projectile: ProjectileId,
        reason: DestroyReason,
        position: DVec2,
    },
}
