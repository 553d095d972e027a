//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// How a projectile finds its targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Hit-scan along a line, delayed by time of flight (bullets).
    #[default]
    Ray,
    /// Area burst around the projectile position (grenades, mines).
    Radius,
}

/// Projectile lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectilePhase {
    /// Created, waiting for its activation condition.
    #[default]
    NotActivated,
    /// Hits have been predicted; the projectile only plays out its motion.
    Activated,
    /// Removed from tracking.
    Destroyed,
}

/// What caused a projectile to activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationTrigger {
    /// Activated at the fire moment.
    Immediate,
    /// Its activation delay elapsed.
    Timer,
    /// A live target entered its activation radius.
    Proximity,
}

/// Multi-kill tier reached by a single hit group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiKillTier {
    Double,
    Triple,
}

/// Why a projectile left tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyReason {
    /// Left the world bounds.
    OutOfBounds,
    /// Its post-detonation linger time ran out.
    Expired,
    /// Destroyed on request (direct hit).
    Hit,
}
