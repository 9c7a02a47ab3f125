//! # Actuator Module
//!
//! Motor capability used by the dispatcher, plus the ev3dev sysfs implementation.
//!
//! The vehicle has two independent drive outputs (left/right) and one
//! position-controlled steering motor. Commands are fire-and-forget: they
//! return once the motor driver accepted them, not when motion completes.

pub mod ev3dev;

pub use ev3dev::{Ev3Vehicle, TachoMotor};

use crate::error::Result;

/// Behaviour of a motor once it stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopAction {
    /// Remove power, the motor can be back-driven freely
    Coast,
    /// Short the windings, resisting motion
    Brake,
}

impl StopAction {
    /// Name used by the ev3dev `stop_action` attribute
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coast => "coast",
            Self::Brake => "brake",
        }
    }
}

/// Motor capability for a steered differential-drive vehicle
pub trait Actuator {
    /// Run both drive outputs at the given speed percentages (-100 to 100)
    fn drive(&mut self, left_speed: i32, right_speed: i32) -> Result<()>;

    /// Stop both drive outputs, braking if `brake` is set
    fn drive_stop(&mut self, brake: bool) -> Result<()>;

    /// Move the steering motor to an absolute position in degrees
    fn steer_to(&mut self, position: i32, speed: i32, stop_action: StopAction) -> Result<()>;

    /// Current steering motor position in degrees
    fn steer_position(&mut self) -> Result<i32>;

    /// Set the steering stop behaviour, then power the steering motor off
    fn steer_stop(&mut self, stop_action: StopAction) -> Result<()>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_action_names() {
        assert_eq!(StopAction::Coast.as_str(), "coast");
        assert_eq!(StopAction::Brake.as_str(), "brake");
    }
}
