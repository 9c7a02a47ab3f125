//! # Steering Trim
//!
//! Bounded center-point correction, adjusted one step at a time from the D-pad.

use crate::config::SteeringConfig;

/// D-Pad pressed negative direction (left).
pub const DPAD_NEGATIVE: i32 = -1;
/// D-Pad pressed positive direction (right).
pub const DPAD_POSITIVE: i32 = 1;

/// Direction of a single trim adjustment.
///
/// There is no neutral variant: a released D-pad is not an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimDirection {
    /// D-pad left, trim toward negative angles.
    Left,
    /// D-pad right, trim toward positive angles.
    Right,
}

impl TrimDirection {
    /// Converts a raw D-pad value into a direction.
    ///
    /// Returns `None` for the released value (0) and for anything outside -1/0/1.
    ///
    /// # Examples
    ///
    /// ```
    /// use teleop_drive::steering::trim::TrimDirection;
    ///
    /// assert_eq!(TrimDirection::from_value(-1), Some(TrimDirection::Left));
    /// assert_eq!(TrimDirection::from_value(0), None);
    /// ```
    #[must_use]
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            DPAD_NEGATIVE => Some(Self::Left),
            DPAD_POSITIVE => Some(Self::Right),
            _ => None,
        }
    }

    /// Sign of the adjustment (-1 or +1).
    #[must_use]
    pub fn signum(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Current steering trim in degrees, always within `[-max_trim, max_trim]`.
///
/// Starts at zero and lives only as long as the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimState {
    degrees: i32,
    max_trim: i32,
    step: i32,
}

impl Default for TrimState {
    fn default() -> Self {
        Self::new(45, 1)
    }
}

impl TrimState {
    /// Creates a zeroed trim with the given bound and step size.
    #[must_use]
    pub fn new(max_trim: i32, step: i32) -> Self {
        Self {
            degrees: 0,
            max_trim: max_trim.abs(),
            step: step.max(1),
        }
    }

    /// Creates a zeroed trim from the `[steering]` configuration section.
    #[must_use]
    pub fn from_config(config: &SteeringConfig) -> Self {
        Self::new(config.max_trim, config.trim_step)
    }

    /// Current trim in degrees.
    #[must_use]
    pub fn degrees(&self) -> i32 {
        self.degrees
    }

    /// Upper bound on the trim magnitude.
    #[must_use]
    pub fn max_trim(&self) -> i32 {
        self.max_trim
    }

    /// Moves the trim one step in `direction` and clamps it to the bound.
    ///
    /// Returns the new trim. At the bound the value stays put.
    ///
    /// # Examples
    ///
    /// ```
    /// use teleop_drive::steering::trim::{TrimDirection, TrimState};
    ///
    /// let mut trim = TrimState::new(2, 1);
    /// assert_eq!(trim.adjust(TrimDirection::Right), 1);
    /// assert_eq!(trim.adjust(TrimDirection::Right), 2);
    /// assert_eq!(trim.adjust(TrimDirection::Right), 2);
    /// ```
    pub fn adjust(&mut self, direction: TrimDirection) -> i32 {
        let next = self.degrees + direction.signum() * self.step;
        self.degrees = next.clamp(-self.max_trim, self.max_trim);
        self.degrees
    }
}
