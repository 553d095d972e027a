//! Damage resolver: applies released hit groups to the target registry.
//!
//! Ray groups form a penetration chain: the first hit takes the payload's
//! damage at its distance, every following hit takes the previous value
//! scaled by the falloff and rounded up, and the chain ends at the first
//! target that stops the bullet. Radius groups have no chain; each hit is
//! computed from its own distance to the burst center.

use tracing::{debug, trace};

use hitline_core::constants::{DOUBLE_KILL_THRESHOLD, TRIPLE_KILL_THRESHOLD};
use hitline_core::enums::{MultiKillTier, ProjectileKind};
use hitline_core::events::CombatEvent;
use hitline_core::types::TargetId;

use crate::hit::HitGroup;
use crate::registry::{DamageOutcome, DamageRequest, TargetRegistry};

/// What one group did when resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupOutcome {
    pub applied: usize,
    pub deaths: u32,
}

/// Resolve groups in the order given. Kills are counted per group.
pub fn resolve_groups<R: TargetRegistry + ?Sized>(
    groups: &[HitGroup],
    targets: &mut R,
    penetration_falloff: f64,
    events: &mut Vec<CombatEvent>,
) -> Vec<GroupOutcome> {
    groups
        .iter()
        .map(|group| resolve_group(group, targets, penetration_falloff, events))
        .collect()
}

/// Walk a group's hits in stored order and apply them.
pub fn resolve_group<R: TargetRegistry + ?Sized>(
    group: &HitGroup,
    targets: &mut R,
    penetration_falloff: f64,
    events: &mut Vec<CombatEvent>,
) -> GroupOutcome {
    let source = group.source();
    let mut outcome = GroupOutcome::default();
    let mut chained_damage: Option<f64> = None;

    for (hit_index, hit) in group.hits().iter().enumerate() {
        // Killed by something else since prediction: nothing left to do.
        if targets.is_dead(hit.target) {
            trace!(projectile = %source.projectile, target = %hit.target, "target already dead");
            break;
        }

        let value = match (source.kind, chained_damage) {
            (ProjectileKind::Ray, Some(previous)) => (previous * penetration_falloff).ceil(),
            _ => source.damage.at(hit.distance),
        };
        chained_damage = Some(value);

        let request = DamageRequest {
            value,
            force: hit.force,
            impact: hit.point,
            simulate: false,
            source: source.owner,
            weapon_id: source.weapon_id,
            distance: hit.distance,
            hit_index,
        };
        let Some(result) = targets.apply_damage(hit.target, &request) else {
            break;
        };
        outcome.applied += 1;

        events.push(CombatEvent::DamageApplied {
            projectile: source.projectile,
            target: hit.target,
            value,
            health: result.health,
            died: result.died,
            penetrated: result.penetrated,
            hit_index,
        });
        if result.died {
            outcome.deaths += 1;
            events.push(CombatEvent::TargetKilled {
                target: hit.target,
                killer: source.owner,
                weapon_id: source.weapon_id,
            });
        }

        if source.kind == ProjectileKind::Ray && !result.penetrated {
            break;
        }
    }

    emit_multi_kills(group, outcome.deaths, events);
    debug!(
        projectile = %source.projectile,
        applied = outcome.applied,
        deaths = outcome.deaths,
        "resolved hit group"
    );
    outcome
}

/// Double and triple kills are cumulative: a 3-kill group reports both.
fn emit_multi_kills(group: &HitGroup, deaths: u32, events: &mut Vec<CombatEvent>) {
    let source = group.source();
    for (threshold, tier) in [
        (DOUBLE_KILL_THRESHOLD, MultiKillTier::Double),
        (TRIPLE_KILL_THRESHOLD, MultiKillTier::Triple),
    ] {
        if deaths >= threshold {
            debug!(weapon_id = source.weapon_id, ?tier, deaths, "multi-kill");
            events.push(CombatEvent::MultiKill {
                weapon_id: source.weapon_id,
                kind: source.kind,
                tier,
                kills: deaths,
            });
        }
    }
}

/// Outcome a hit would have, without touching the target.
pub fn preview_damage<R: TargetRegistry + ?Sized>(
    targets: &mut R,
    target: TargetId,
    request: DamageRequest,
) -> Option<DamageOutcome> {
    targets.apply_damage(
        target,
        &DamageRequest {
            simulate: true,
            ..request
        },
    )
}
