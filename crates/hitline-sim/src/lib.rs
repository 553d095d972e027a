//! Projectile hit-prediction and time-delayed resolution engine.
//!
//! Projectiles predict their hits once, at activation, and the resulting
//! hit groups are applied later when the simulation clock reaches their
//! trigger time. Visual motion is advanced separately and never decides
//! damage.

pub mod controller;
pub mod hit;
pub mod predictor;
pub mod projectile;
pub mod queue;
pub mod registry;
pub mod resolver;
pub mod world_setup;

pub use controller::{ControllerConfig, ProjectileController};
pub use hitline_core as core;
pub use registry::{TargetRegistry, TargetWorld};
