//! Core types and definitions for the HITLINE combat engine.
//!
//! This crate defines the vocabulary shared by the engine and its tools:
//! geometry, identifiers, components, events, and tuning constants.
//! It has no dependency on the ECS or on any runtime framework.

pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod geometry;
pub mod types;

pub use glam::DVec2;
