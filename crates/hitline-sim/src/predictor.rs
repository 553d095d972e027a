//! Hit predictor: runs once per projectile, at activation.
//!
//! Ray projectiles intersect their launch ray with every live target and
//! schedule each hit at its time of flight. Radius projectiles collect every
//! target whose center lies inside the burst and schedule them all at the
//! activation instant.

use glam::DVec2;
use tracing::trace;

use hitline_core::constants::MS_PER_SEC;
use hitline_core::enums::ProjectileKind;
use hitline_core::geometry::{clip_to_radius, direction, ray_rect_intersection};

use crate::hit::{Hit, HitGroup, HitSource};
use crate::projectile::Projectile;
use crate::registry::TargetRegistry;

/// Predict hits for an activated projectile. `at_ms` is the activation instant.
pub fn predict<R: TargetRegistry + ?Sized>(
    projectile: &Projectile,
    targets: &R,
    at_ms: f64,
) -> Option<HitGroup> {
    match projectile.kind() {
        ProjectileKind::Ray => predict_ray_hits(projectile, targets, at_ms),
        ProjectileKind::Radius => predict_radius_hits(projectile, targets, at_ms),
    }
}

/// Hits along the launch ray, ordered by arrival time.
pub fn predict_ray_hits<R: TargetRegistry + ?Sized>(
    projectile: &Projectile,
    targets: &R,
    at_ms: f64,
) -> Option<HitGroup> {
    let origin = projectile.origin();
    let dir = projectile.direction();
    if dir == DVec2::ZERO {
        trace!(projectile = %projectile.id(), "ray has no direction");
        return None;
    }
    let speed = projectile.speed_vector().length();
    let force = dir * projectile.payload().knockback;

    let mut hits = Vec::new();
    targets.for_each_live_target(&mut |target, rect| {
        let Some(entry) = ray_rect_intersection(origin, dir, &rect) else {
            return;
        };
        let travel_ms = if speed > 0.0 {
            entry.distance * MS_PER_SEC / speed
        } else {
            0.0
        };
        hits.push(Hit {
            projectile: projectile.id(),
            target,
            point: entry.point,
            force,
            distance: Some(entry.distance),
            time_ms: at_ms + travel_ms,
        });
    });

    // Stable: equal arrival times keep registry order.
    hits.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
    HitGroup::new(HitSource::of(projectile), hits)
}

/// Every target whose center lies within the damage radius, all at `at_ms`.
pub fn predict_radius_hits<R: TargetRegistry + ?Sized>(
    projectile: &Projectile,
    targets: &R,
    at_ms: f64,
) -> Option<HitGroup> {
    let center = projectile.position();
    let radius = projectile.payload().damage.radius;
    let knockback = projectile.payload().knockback;

    let mut hits = Vec::new();
    targets.for_each_live_target(&mut |target, rect| {
        let target_center = rect.center();
        let distance = center.distance(target_center);
        if distance > radius {
            return;
        }
        hits.push(Hit {
            projectile: projectile.id(),
            target,
            point: clip_to_radius(center, target_center, radius),
            force: direction(center, target_center) * knockback,
            distance: Some(distance),
            time_ms: at_ms,
        });
    });

    HitGroup::new(HitSource::of(projectile), hits)
}
