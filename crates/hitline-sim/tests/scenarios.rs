use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hitline_sim::core::constants::{RADIUS_LINGER_MS, TICK_MS};
use hitline_sim::core::enums::*;
use hitline_sim::core::events::CombatEvent;
use hitline_sim::core::types::{PlayerId, Rect};
use hitline_sim::projectile::{DamageProfile, Launch, Payload, Shape};
use hitline_sim::registry::{TargetRegistry, TargetSpec};
use hitline_sim::world_setup;
use hitline_sim::{ProjectileController, TargetWorld};

fn rifle(origin: DVec2, aim: DVec2, base: f64) -> Launch {
    Launch {
        owner: PlayerId(1),
        origin,
        aim,
        fired_at_ms: None,
        payload: Payload {
            shape: Shape::Ray,
            weapon_id: 1,
            damage: DamageProfile {
                base,
                use_radius_damage: false,
                radius: 0.0,
            },
            speed: 1000.0,
            knockback: 1.0,
            activate_delay_ms: None,
        },
    }
}

fn mine(at: DVec2, trigger_radius: f64, damage_radius: f64) -> Launch {
    Launch {
        owner: PlayerId(2),
        origin: at,
        aim: at,
        fired_at_ms: None,
        payload: Payload {
            shape: Shape::Radius {
                activation_radius: Some(trigger_radius),
            },
            weapon_id: 20,
            damage: DamageProfile {
                base: 60.0,
                use_radius_damage: false,
                radius: damage_radius,
            },
            speed: 0.0,
            knockback: 10.0,
            activate_delay_ms: None,
        },
    }
}

fn damage_count(events: &[CombatEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, CombatEvent::DamageApplied { .. }))
        .count()
}

/// Run fixed ticks until `end_ms`, collecting every event.
fn run_until(
    controller: &mut ProjectileController,
    targets: &mut TargetWorld,
    start_ms: f64,
    end_ms: f64,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    let mut now = start_ms;
    while now < end_ms {
        now = (now + TICK_MS).min(end_ms);
        events.extend(controller.update(now, TICK_MS, targets));
    }
    events
}

// --- Time-delayed ray resolution ---

#[test]
fn bullet_hit_waits_for_time_of_flight() {
    let mut targets = TargetWorld::new();
    let target = targets.spawn_target(TargetSpec {
        bounds: Rect::new(90.0, -5.0, 20.0, 10.0),
        health: 100.0,
        permeable: false,
    });
    let mut controller = ProjectileController::default();
    let id = controller.create_projectile(rifle(DVec2::ZERO, DVec2::new(100.0, 0.0), 30.0));

    let events = controller.update(89.0, 89.0, &mut targets);
    assert!(events.contains(&CombatEvent::ProjectileActivated {
        projectile: id,
        kind: ProjectileKind::Ray,
        trigger: ActivationTrigger::Immediate,
        at_ms: 0.0,
        hits: 1,
    }));
    assert_eq!(damage_count(&events), 0);
    assert_eq!(controller.queue().next_due_ms(), Some(90.0));
    assert_eq!(targets.health(target), Some(100.0));

    let events = controller.update(90.0, 1.0, &mut targets);
    assert_eq!(damage_count(&events), 1);
    assert_eq!(targets.health(target), Some(70.0));

    let events = controller.update(200.0, 110.0, &mut targets);
    assert_eq!(damage_count(&events), 0);
    assert_eq!(targets.health(target), Some(70.0));
    assert!(controller.queue().is_empty());
}

#[test]
fn bullet_through_a_row_halves_damage_and_reports_double_kill() {
    let mut targets = TargetWorld::new();
    let row = world_setup::spawn_row(
        &mut targets,
        DVec2::new(100.0, 0.0),
        DVec2::new(50.0, 0.0),
        3,
        40.0,
        false,
    );
    let mut controller = ProjectileController::default();
    controller.create_projectile(rifle(DVec2::ZERO, DVec2::new(1.0, 0.0), 100.0));

    let events = run_until(&mut controller, &mut targets, 0.0, 500.0);

    assert!(targets.is_dead(row[0]));
    assert!(targets.is_dead(row[1]));
    assert_eq!(targets.health(row[2]), Some(15.0));
    let tiers: Vec<MultiKillTier> = events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::MultiKill { tier, .. } => Some(*tier),
            _ => None,
        })
        .collect();
    assert_eq!(tiers, vec![MultiKillTier::Double]);
}

#[test]
fn group_outlives_its_bullet() {
    let mut targets = TargetWorld::new();
    let far = world_setup::spawn_target_at(&mut targets, DVec2::new(900.0, 0.0), 50.0, false);
    let mut controller = ProjectileController::new(hitline_sim::ControllerConfig {
        world_bounds: Rect::new(-100.0, -100.0, 200.0, 200.0),
        ..Default::default()
    });
    let id = controller.create_projectile(rifle(DVec2::ZERO, DVec2::new(1.0, 0.0), 20.0));

    let events = run_until(&mut controller, &mut targets, 0.0, 1000.0);

    let destroyed_at = events
        .iter()
        .position(|e| matches!(e, CombatEvent::ProjectileDestroyed { projectile, reason: DestroyReason::OutOfBounds, .. } if *projectile == id))
        .expect("bullet should leave the world");
    let damaged_at = events
        .iter()
        .position(|e| matches!(e, CombatEvent::DamageApplied { .. }))
        .expect("hit should still resolve");
    assert!(destroyed_at < damaged_at);
    assert_eq!(targets.health(far), Some(30.0));
    assert!(controller.projectile(id).is_none());
}

#[test]
fn target_killed_before_resolution_is_skipped() {
    let mut targets = TargetWorld::new();
    let victim = world_setup::spawn_target_at(&mut targets, DVec2::new(400.0, 0.0), 50.0, false);
    let mut controller = ProjectileController::default();
    controller.create_projectile(rifle(DVec2::ZERO, DVec2::new(1.0, 0.0), 30.0));

    let mut grenade = mine(DVec2::new(400.0, 0.0), 0.0, 50.0);
    grenade.payload.shape = Shape::Radius {
        activation_radius: None,
    };
    grenade.payload.damage.base = 200.0;
    controller.create_projectile(grenade);

    let events = run_until(&mut controller, &mut targets, 0.0, 600.0);

    assert!(targets.is_dead(victim));
    let bullet_hits = events
        .iter()
        .filter(|e| matches!(e, CombatEvent::DamageApplied { value, .. } if *value == 30.0))
        .count();
    assert_eq!(bullet_hits, 0);
    assert_eq!(targets.last_hit(victim).unwrap().player, PlayerId(2));
}

// --- Mines and timers ---

#[test]
fn mine_waits_for_trigger_radius_not_damage_radius() {
    let mut targets = TargetWorld::new();
    let walker = world_setup::spawn_target_at(&mut targets, DVec2::new(560.0, 500.0), 100.0, false);
    let bystander =
        world_setup::spawn_target_at(&mut targets, DVec2::new(900.0, 900.0), 100.0, false);
    let mut controller = ProjectileController::default();
    let id = controller.create_projectile(mine(DVec2::new(500.0, 500.0), 30.0, 80.0));

    // Walker is inside the damage radius but outside the trigger radius.
    let events = run_until(&mut controller, &mut targets, 0.0, 1000.0);
    assert!(events.is_empty());
    assert!(controller.is_pending_activation(id));
    assert_eq!(
        controller.projectile(id).unwrap().phase(),
        ProjectilePhase::NotActivated
    );
    assert!(controller.queue().is_empty());

    targets.set_bounds(walker, Rect::from_center(DVec2::new(525.0, 500.0), 20.0, 40.0));
    let events = controller.update(1016.0, 16.0, &mut targets);
    assert!(events.iter().any(|e| matches!(
        e,
        CombatEvent::ProjectileActivated {
            trigger: ActivationTrigger::Proximity,
            hits: 1,
            ..
        }
    )));
    assert!(!controller.is_pending_activation(id));
    // A burst has no travel time: resolved in the tick it was predicted.
    assert!(controller.queue().is_empty());
    assert_eq!(targets.health(walker), Some(40.0));
    assert_eq!(targets.health(bystander), Some(100.0));
    assert_eq!(
        controller.projectile(id).unwrap().phase(),
        ProjectilePhase::Activated
    );
}

#[test]
fn timed_grenade_detonates_at_deadline_and_lingers() {
    let mut targets = TargetWorld::new();
    let victim = world_setup::spawn_target_at(&mut targets, DVec2::new(200.0, 0.0), 100.0, false);
    let mut controller = ProjectileController::default();

    let mut grenade = mine(DVec2::ZERO, 0.0, 60.0);
    grenade.aim = DVec2::new(200.0, 0.0);
    grenade.payload.speed = 800.0;
    grenade.payload.activate_delay_ms = Some(1500.0);
    grenade.payload.shape = Shape::Radius {
        activation_radius: None,
    };
    let id = controller.create_projectile(grenade);

    let before = run_until(&mut controller, &mut targets, 0.0, 1490.0);
    assert!(before.is_empty());
    assert_eq!(targets.health(victim), Some(100.0));

    let events = run_until(&mut controller, &mut targets, 1490.0, 1520.0);
    assert!(events.iter().any(|e| matches!(
        e,
        CombatEvent::ProjectileActivated {
            trigger: ActivationTrigger::Timer,
            at_ms,
            ..
        } if *at_ms == 1500.0
    )));
    assert_eq!(targets.health(victim), Some(40.0));
    assert!(controller.projectile(id).is_some());

    let events = run_until(&mut controller, &mut targets, 1520.0, 1500.0 + RADIUS_LINGER_MS + 20.0);
    assert!(events.contains(&CombatEvent::ProjectileDestroyed {
        projectile: id,
        reason: DestroyReason::Expired,
        position: DVec2::new(200.0, 0.0),
    }));
    assert_eq!(controller.projectile_count(), 0);
}

#[test]
fn delayed_bullet_times_hits_from_its_deadline() {
    let mut targets = TargetWorld::new();
    targets.spawn_target(TargetSpec {
        bounds: Rect::new(90.0, -5.0, 20.0, 10.0),
        health: 100.0,
        permeable: false,
    });
    let mut controller = ProjectileController::default();
    let mut launch = rifle(DVec2::ZERO, DVec2::new(1.0, 0.0), 10.0);
    launch.payload.activate_delay_ms = Some(200.0);
    controller.create_projectile(launch);

    run_until(&mut controller, &mut targets, 0.0, 199.0);
    assert!(controller.queue().is_empty());
    controller.update(210.0, 11.0, &mut targets);
    assert_eq!(controller.queue().next_due_ms(), Some(290.0));
}

fn activations(events: &[CombatEvent]) -> Vec<(ActivationTrigger, f64)> {
    events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::ProjectileActivated { trigger, at_ms, .. } => Some((*trigger, *at_ms)),
            _ => None,
        })
        .collect()
}

#[test]
fn thrown_mine_triggers_in_flight_after_moving() {
    let mut targets = TargetWorld::new();
    let walker = world_setup::spawn_target_at(&mut targets, DVec2::new(300.0, 0.0), 100.0, false);
    let mut controller = ProjectileController::default();

    let mut thrown = mine(DVec2::ZERO, 30.0, 80.0);
    thrown.aim = DVec2::new(600.0, 0.0);
    thrown.payload.speed = 2000.0;
    let id = controller.create_projectile(thrown);

    // Out of reach at the throw point, so activation comes from the pass
    // that runs after motion on some later tick.
    let first = controller.update(TICK_MS, TICK_MS, &mut targets);
    assert!(activations(&first).is_empty());

    // Ends before the burst stops lingering.
    let events = run_until(&mut controller, &mut targets, TICK_MS, 400.0);
    let fired = activations(&events);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].0, ActivationTrigger::Proximity);
    assert!(fired[0].1 > TICK_MS && fired[0].1 < 400.0);

    // Stopped where it triggered, well short of the aim point.
    let rest = controller.projectile(id).unwrap().position();
    assert!(rest.distance(DVec2::new(300.0, 0.0)) <= 30.0);
    assert_eq!(targets.health(walker), Some(40.0));
}

#[test]
fn timed_mine_with_nobody_near_fires_on_its_timer() {
    let mut targets = TargetWorld::new();
    let far = world_setup::spawn_target_at(&mut targets, DVec2::new(900.0, 900.0), 100.0, false);
    let mut controller = ProjectileController::default();
    let mut timed = mine(DVec2::new(500.0, 500.0), 30.0, 80.0);
    timed.payload.activate_delay_ms = Some(100.0);
    let id = controller.create_projectile(timed);

    let events = run_until(&mut controller, &mut targets, 0.0, 300.0);
    assert!(events.contains(&CombatEvent::ProjectileActivated {
        projectile: id,
        kind: ProjectileKind::Radius,
        trigger: ActivationTrigger::Timer,
        at_ms: 100.0,
        hits: 0,
    }));
    assert_eq!(activations(&events).len(), 1);
    assert_eq!(damage_count(&events), 0);
    assert_eq!(targets.health(far), Some(100.0));
}

#[test]
fn timed_mine_fires_early_when_someone_steps_close() {
    let mut targets = TargetWorld::new();
    let walker = world_setup::spawn_target_at(&mut targets, DVec2::new(900.0, 900.0), 100.0, false);
    let mut controller = ProjectileController::default();
    let mut timed = mine(DVec2::new(500.0, 500.0), 30.0, 80.0);
    timed.payload.activate_delay_ms = Some(1000.0);
    let id = controller.create_projectile(timed);

    let waiting = run_until(&mut controller, &mut targets, 0.0, 400.0);
    assert!(waiting.is_empty());
    assert!(controller.is_pending_activation(id));

    targets.set_bounds(walker, Rect::from_center(DVec2::new(510.0, 500.0), 20.0, 40.0));
    let events = run_until(&mut controller, &mut targets, 400.0, 1200.0);
    assert_eq!(
        activations(&events),
        vec![(ActivationTrigger::Proximity, 400.0 + TICK_MS)]
    );
    assert_eq!(targets.health(walker), Some(40.0));
}

#[test]
fn unset_fire_time_falls_back_to_last_update() {
    let mut targets = TargetWorld::new();
    let mut controller = ProjectileController::default();

    let early = controller.create_projectile(mine(DVec2::ZERO, 30.0, 80.0));
    assert_eq!(controller.projectile(early).unwrap().created_at_ms(), 0.0);

    controller.update(100.0, 100.0, &mut targets);
    let late = controller.create_projectile(mine(DVec2::ZERO, 30.0, 80.0));
    assert_eq!(controller.projectile(late).unwrap().created_at_ms(), 100.0);

    let mut stamped = mine(DVec2::ZERO, 30.0, 80.0);
    stamped.fired_at_ms = Some(110.0);
    let stamped = controller.create_projectile(stamped);
    assert_eq!(controller.projectile(stamped).unwrap().created_at_ms(), 110.0);
}

#[test]
fn stationary_bullet_is_cleaned_up_after_activating() {
    let mut targets = TargetWorld::new();
    let mut controller = ProjectileController::default();
    let mut dud = rifle(DVec2::ZERO, DVec2::new(1.0, 0.0), 30.0);
    dud.payload.speed = 0.0;
    let id = controller.create_projectile(dud);

    let events = controller.update(TICK_MS, TICK_MS, &mut targets);
    assert!(events.contains(&CombatEvent::ProjectileDestroyed {
        projectile: id,
        reason: DestroyReason::Expired,
        position: DVec2::ZERO,
    }));
    assert_eq!(controller.projectile_count(), 0);
}

// --- Lifecycle ---

#[test]
fn on_hit_removes_projectile_before_activation() {
    let mut targets = TargetWorld::new();
    world_setup::spawn_target_at(&mut targets, DVec2::new(500.0, 500.0), 100.0, false);
    let mut controller = ProjectileController::default();
    let id = controller.create_projectile(mine(DVec2::ZERO, 30.0, 80.0));

    assert!(controller.on_hit(id));
    assert!(!controller.on_hit(id));
    let events = controller.update(16.0, 16.0, &mut targets);
    assert_eq!(
        events,
        vec![CombatEvent::ProjectileDestroyed {
            projectile: id,
            reason: DestroyReason::Hit,
            position: DVec2::ZERO,
        }]
    );
    assert!(!controller.is_pending_activation(id));
    assert_eq!(controller.projectile_count(), 0);
}

#[test]
fn clear_drops_scheduled_groups() {
    let mut targets = TargetWorld::new();
    let t = world_setup::spawn_target_at(&mut targets, DVec2::new(800.0, 0.0), 100.0, false);
    let mut controller = ProjectileController::default();
    controller.create_projectile(rifle(DVec2::ZERO, DVec2::new(1.0, 0.0), 30.0));
    controller.update(16.0, 16.0, &mut targets);
    assert_eq!(controller.queue().len(), 1);

    controller.clear();
    run_until(&mut controller, &mut targets, 16.0, 2000.0);
    assert_eq!(targets.health(t), Some(100.0));
}

// --- Determinism ---

fn skirmish(seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut targets = TargetWorld::new();
    world_setup::spawn_target_field(
        &mut targets,
        &mut rng,
        Rect::new(-600.0, -600.0, 1200.0, 1200.0),
        40,
    );
    let mut controller = ProjectileController::default();
    for i in 0..12 {
        let angle = i as f64 * std::f64::consts::TAU / 12.0;
        controller.create_projectile(rifle(
            DVec2::ZERO,
            DVec2::new(angle.cos(), angle.sin()),
            60.0,
        ));
    }
    let mut grenade = mine(DVec2::new(150.0, 150.0), 40.0, 120.0);
    grenade.payload.activate_delay_ms = Some(300.0);
    controller.create_projectile(grenade);

    let events = run_until(&mut controller, &mut targets, 0.0, 2000.0);
    serde_json::to_string(&events).unwrap()
}

#[test]
fn same_seed_same_events() {
    assert_eq!(skirmish(7), skirmish(7));
}
