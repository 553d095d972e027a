//! Geometry kernel: ray/rectangle and point/rectangle tests.
//!
//! All functions are pure and total over finite inputs. A miss is an
//! ordinary `None`, not an error.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{PARALLEL_EPSILON, UNIT_DIRECTION_EPSILON};
use crate::types::Rect;

/// Entry point of a ray into a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub point: DVec2,
    /// Distance from the ray origin to `point` along the ray.
    pub distance: f64,
}

/// Inclusive bounds test: points on the edge count as inside.
pub fn point_in_rect(point: DVec2, rect: &Rect) -> bool {
    point.x >= rect.x
        && point.x <= rect.x + rect.width
        && point.y >= rect.y
        && point.y <= rect.y + rect.height
}

/// Slab-method intersection of the half-line `origin + t * dir` (`t >= 0`)
/// with `rect`.
///
/// `dir` must be a unit vector. An origin inside the rectangle hits at
/// distance 0 on the origin itself, so point-blank shots register.
pub fn ray_rect_intersection(origin: DVec2, dir: DVec2, rect: &Rect) -> Option<RayHit> {
    debug_assert!(
        (dir.length() - 1.0).abs() < UNIT_DIRECTION_EPSILON,
        "ray direction must be normalized, got {dir:?}"
    );

    if point_in_rect(origin, rect) {
        return Some(RayHit {
            point: origin,
            distance: 0.0,
        });
    }

    let min = rect.min();
    let max = rect.max();
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;

    for (o, d, lo, hi) in [(origin.x, dir.x, min.x, max.x), (origin.y, dir.y, min.y, max.y)] {
        if d.abs() < PARALLEL_EPSILON {
            // Parallel to this slab: either always inside it or never.
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_enter > t_exit || t_exit < 0.0 {
        return None;
    }

    // Origin is outside, so a valid entry lies ahead of it.
    let t = t_enter.max(0.0);
    Some(RayHit {
        point: origin + dir * t,
        distance: t,
    })
}

/// Point on the segment `center -> target`, at most `radius` away from `center`.
pub fn clip_to_radius(center: DVec2, target: DVec2, radius: f64) -> DVec2 {
    center + (target - center).clamp_length_max(radius.max(0.0))
}

/// Unit vector from `from` to `to`, or zero when the points coincide.
pub fn direction(from: DVec2, to: DVec2) -> DVec2 {
    (to - from).normalize_or_zero()
}
