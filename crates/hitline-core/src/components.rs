//! ECS components for damageable target entities.
//!
//! Components are plain data structs with no methods.
//! Damage logic lives in the registry and resolver, not here.

use serde::{Deserialize, Serialize};

use crate::types::{PlayerId, Rect, WeaponId};

/// Marks an entity as something projectiles can hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target;

/// Axis-aligned bounds used for hit tests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitbox {
    pub rect: Rect,
}

/// Hit points. A target with `current <= 0` is dead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

/// Bullets continue through this target after a non-lethal hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Permeable;

/// Last damage received, kept for kill attribution and scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LastHit {
    pub player: PlayerId,
    pub weapon_id: WeaponId,
    /// Position of the hit within its group (0 = first target on the path).
    pub hit_index: usize,
    pub distance: Option<f64>,
    pub value: f64,
}
