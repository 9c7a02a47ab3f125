//! # Steering Module
//!
//! Stick-to-angle mapping and the runtime trim offset.
//!
//! This module handles:
//! - Deadzone detection around the stick midpoint
//! - Proportional scaling of stick deflection to a steering angle
//! - The bounded trim accumulator driven by the D-pad

pub mod normalizer;
pub mod trim;

pub use normalizer::{is_stick_centered, SteeringNormalizer};
pub use trim::{TrimDirection, TrimState};
