//! Hit candidates and the groups they are scheduled in.

use glam::DVec2;

use hitline_core::enums::ProjectileKind;
use hitline_core::types::{PlayerId, ProjectileId, TargetId, WeaponId};

use crate::projectile::{DamageProfile, Projectile};

/// Snapshot of the projectile a group came from.
///
/// Groups can outlive their projectile (a bullet leaves the world before
/// its far hits are due), so the resolver reads this instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitSource {
    pub projectile: ProjectileId,
    pub owner: PlayerId,
    pub weapon_id: WeaponId,
    pub kind: ProjectileKind,
    pub damage: DamageProfile,
}

impl HitSource {
    pub fn of(projectile: &Projectile) -> Self {
        Self {
            projectile: projectile.id(),
            owner: projectile.owner(),
            weapon_id: projectile.payload().weapon_id,
            kind: projectile.kind(),
            damage: projectile.payload().damage,
        }
    }
}

/// One projectile-to-target interaction candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub projectile: ProjectileId,
    pub target: TargetId,
    pub point: DVec2,
    /// Knockback vector handed to the target.
    pub force: DVec2,
    /// Distance from the ray origin or burst center.
    pub distance: Option<f64>,
    /// Absolute simulated time at which the hit becomes observable.
    pub time_ms: f64,
}

/// All hits of one activation, released together.
#[derive(Debug, Clone, PartialEq)]
pub struct HitGroup {
    source: HitSource,
    hits: Vec<Hit>,
    time_ms: f64,
}

impl HitGroup {
    /// Build a group from hits already in resolution order.
    /// Returns `None` for an empty candidate list.
    pub fn new(source: HitSource, hits: Vec<Hit>) -> Option<Self> {
        debug_assert!(
            hits.windows(2).all(|w| w[0].time_ms <= w[1].time_ms),
            "hits must be ordered by time"
        );
        let time_ms = hits.first()?.time_ms;
        Some(Self {
            source,
            hits,
            time_ms,
        })
    }

    pub fn source(&self) -> &HitSource {
        &self.source
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// Trigger time: the earliest member time.
    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    pub fn kind(&self) -> ProjectileKind {
        self.source.kind
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        self.time_ms <= now_ms
    }
}
