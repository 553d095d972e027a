//! Replay scenario format and runner.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use hitline_core::constants::TICK_MS;
use hitline_core::events::CombatEvent;
use hitline_core::types::Rect;
use hitline_sim::projectile::Launch;
use hitline_sim::registry::TargetSpec;
use hitline_sim::world_setup;
use hitline_sim::{ControllerConfig, ProjectileController, TargetWorld};

/// Seeded random target field added on top of the listed targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomTargets {
    pub seed: u64,
    pub area: Rect,
    pub count: usize,
}

/// A scripted engagement: targets, timed launches, and how long to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: ControllerConfig,
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    #[serde(default)]
    pub random_targets: Option<RandomTargets>,
    /// Launches are created on the first tick at or after their fire time.
    #[serde(default)]
    pub launches: Vec<Launch>,
    pub duration_ms: f64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: f64,
}

fn default_tick_ms() -> f64 {
    TICK_MS
}

/// Totals printed after a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub ticks: u64,
    pub projectiles: usize,
    pub hits: usize,
    pub kills: usize,
    pub multi_kills: usize,
    pub targets_alive: usize,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, String> {
        let scenario: Scenario =
            serde_json::from_str(text).map_err(|e| format!("invalid scenario: {e}"))?;
        if !(scenario.tick_ms > 0.0) {
            return Err(format!("tick_ms must be positive, got {}", scenario.tick_ms));
        }
        if !(scenario.duration_ms >= 0.0) {
            return Err(format!(
                "duration_ms must not be negative, got {}",
                scenario.duration_ms
            ));
        }
        Ok(scenario)
    }

    /// Run to completion, handing every event to `on_event`.
    pub fn run(&self, mut on_event: impl FnMut(f64, &CombatEvent)) -> Summary {
        let mut targets = TargetWorld::new();
        for spec in &self.targets {
            targets.spawn_target(*spec);
        }
        if let Some(field) = &self.random_targets {
            let mut rng = ChaCha8Rng::seed_from_u64(field.seed);
            world_setup::spawn_target_field(&mut targets, &mut rng, field.area, field.count);
        }
        info!(targets = targets.live_count(), launches = self.launches.len(), "scenario loaded");

        let mut launches = self.launches.clone();
        launches.sort_by(|a, b| {
            a.fired_at_ms
                .unwrap_or(0.0)
                .total_cmp(&b.fired_at_ms.unwrap_or(0.0))
        });
        let mut launches = launches.into_iter().peekable();

        let mut controller = ProjectileController::new(self.config);
        let mut summary = Summary::default();
        let mut now = 0.0;

        loop {
            while let Some(launch) =
                launches.next_if(|l| l.fired_at_ms.unwrap_or(0.0) <= now)
            {
                controller.create_projectile(launch);
                summary.projectiles += 1;
            }

            for event in controller.update(now, self.tick_ms, &mut targets) {
                match event {
                    CombatEvent::DamageApplied { .. } => summary.hits += 1,
                    CombatEvent::TargetKilled { .. } => summary.kills += 1,
                    CombatEvent::MultiKill { .. } => summary.multi_kills += 1,
                    _ => {}
                }
                on_event(now, &event);
            }
            summary.ticks += 1;

            if now >= self.duration_ms {
                break;
            }
            now = (now + self.tick_ms).min(self.duration_ms);
        }

        summary.targets_alive = targets.live_count();
        info!(?summary, "scenario finished");
        summary
    }
}

/// Built-in demo: a bullet through a crowd and a mine someone walks onto.
pub fn demo() -> Result<Scenario, String> {
    let json = r#"{
        "targets": [
            { "bounds": { "x": 90.0, "y": -20.0, "width": 20.0, "height": 40.0 }, "health": 40.0 },
            { "bounds": { "x": 140.0, "y": -20.0, "width": 20.0, "height": 40.0 }, "health": 40.0, "permeable": true },
            { "bounds": { "x": 190.0, "y": -20.0, "width": 20.0, "height": 40.0 }, "health": 100.0 },
            { "bounds": { "x": 510.0, "y": 480.0, "width": 20.0, "height": 40.0 }, "health": 100.0 }
        ],
        "launches": [
            {
                "owner": 1,
                "origin": [0.0, 0.0],
                "aim": [100.0, 0.0],
                "fired_at_ms": 0.0,
                "payload": {
                    "shape": { "kind": "Ray" },
                    "weapon_id": 1,
                    "damage": { "base": 100.0 },
                    "speed": 1000.0,
                    "knockback": 1.0
                }
            },
            {
                "owner": 2,
                "origin": [500.0, 500.0],
                "aim": [500.0, 500.0],
                "fired_at_ms": 100.0,
                "payload": {
                    "shape": { "kind": "Radius", "activation_radius": 30.0 },
                    "weapon_id": 20,
                    "damage": { "base": 80.0, "use_radius_damage": true, "radius": 80.0 },
                    "speed": 0.0,
                    "knockback": 10.0
                }
            }
        ],
        "duration_ms": 1000.0
    }"#;
    Scenario::from_json(json)
}
