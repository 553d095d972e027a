//! Target placement helpers for tools and tests.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use hitline_core::types::{Rect, TargetId};

use crate::registry::{TargetSpec, TargetWorld};

/// Default character hitbox size (width, height).
pub const TARGET_SIZE: (f64, f64) = (20.0, 40.0);

/// Default character health.
pub const TARGET_HEALTH: f64 = 100.0;

/// Spawn a standard-sized target centred on `center`.
pub fn spawn_target_at(
    world: &mut TargetWorld,
    center: DVec2,
    health: f64,
    permeable: bool,
) -> TargetId {
    world.spawn_target(TargetSpec {
        bounds: Rect::from_center(center, TARGET_SIZE.0, TARGET_SIZE.1),
        health,
        permeable,
    })
}

/// Spawn `count` targets in a row starting at `start`, `spacing` apart.
pub fn spawn_row(
    world: &mut TargetWorld,
    start: DVec2,
    spacing: DVec2,
    count: usize,
    health: f64,
    permeable: bool,
) -> Vec<TargetId> {
    (0..count)
        .map(|i| spawn_target_at(world, start + spacing * i as f64, health, permeable))
        .collect()
}

/// Scatter `count` targets uniformly inside `area`. Same seed, same field.
pub fn spawn_target_field(
    world: &mut TargetWorld,
    rng: &mut ChaCha8Rng,
    area: Rect,
    count: usize,
) -> Vec<TargetId> {
    (0..count)
        .map(|_| {
            let center = DVec2::new(
                rng.gen_range(area.x..=area.x + area.width),
                rng.gen_range(area.y..=area.y + area.height),
            );
            let permeable = rng.gen_bool(0.25);
            spawn_target_at(world, center, TARGET_HEALTH, permeable)
        })
        .collect()
}
