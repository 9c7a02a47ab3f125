//! # Steering Normalizer
//!
//! Maps a raw stick sample to an absolute steering angle.
//!
//! ## Deadzone
//!
//! Samples within `deadzone` raw units of the stick midpoint (128) count as a
//! centered stick. A centered stick steers to the trim angle, not to zero.
//!
//! ## Proportional range
//!
//! Outside the deadzone the offset from the midpoint is scaled linearly so that
//! 255 maps to `+max_angle` and 0 maps to `-max_angle`, the trim is added, and
//! the sum is truncated toward zero.
//!
//! ## Usage
//!
//! ```
//! use teleop_drive::steering::normalizer::SteeringNormalizer;
//!
//! let normalizer = SteeringNormalizer::default(); // 10 unit deadzone, 90 degrees
//!
//! assert_eq!(normalizer.normalize(128, 5), 5);
//! assert_eq!(normalizer.normalize(255, 0), 90);
//! assert_eq!(normalizer.normalize(0, 0), -90);
//! ```

use crate::config::SteeringConfig;

/// Raw axis value range from the controller.
pub const AXIS_MIN: i32 = 0;
/// Raw axis value range from the controller.
pub const AXIS_MAX: i32 = 255;
/// Raw axis center value.
pub const AXIS_CENTER: i32 = 128;

/// Returns true when a raw stick sample lies inside the centered band.
///
/// This looks at raw stick position only. The trimmed target angle plays no
/// part, so a nonzero trim never moves the band.
#[inline]
#[must_use]
pub fn is_stick_centered(raw_value: i32, deadzone: i32) -> bool {
    u32::try_from(deadzone).is_ok_and(|deadzone| raw_value.abs_diff(AXIS_CENTER) <= deadzone)
}

/// Converts raw steering stick samples into target angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SteeringNormalizer {
    /// Deadzone half-width in raw units (0 to 127).
    deadzone: i32,
    /// Angle at full deflection in degrees.
    max_angle: i32,
}

impl Default for SteeringNormalizer {
    fn default() -> Self {
        Self {
            deadzone: 10,
            max_angle: 90,
        }
    }
}

impl SteeringNormalizer {
    /// Creates a normalizer with the given deadzone and full-deflection angle.
    ///
    /// # Arguments
    ///
    /// * `deadzone` - Half-width of the centered band (0 to 127). Values outside this range are clamped.
    /// * `max_angle` - Angle at full deflection (1 to 180 degrees). Values outside this range are clamped.
    #[must_use]
    pub fn new(deadzone: i32, max_angle: i32) -> Self {
        Self {
            deadzone: deadzone.clamp(0, AXIS_MAX - AXIS_CENTER),
            max_angle: max_angle.clamp(1, 180),
        }
    }

    /// Creates a normalizer from the `[steering]` configuration section.
    #[must_use]
    pub fn from_config(config: &SteeringConfig) -> Self {
        Self::new(config.deadzone, config.max_angle)
    }

    /// Returns the configured deadzone.
    #[must_use]
    pub fn deadzone(&self) -> i32 {
        self.deadzone
    }

    /// Returns the configured full-deflection angle.
    #[must_use]
    pub fn max_angle(&self) -> i32 {
        self.max_angle
    }

    /// Returns true when `raw_value` is inside this normalizer's deadzone.
    #[must_use]
    pub fn is_centered(&self, raw_value: i32) -> bool {
        is_stick_centered(raw_value, self.deadzone)
    }

    /// Computes the target steering angle for a raw stick sample.
    ///
    /// # Arguments
    ///
    /// * `raw_value` - Raw axis sample (0 to 255). Samples outside the range
    ///   are clamped, so they steer no further than full deflection.
    /// * `trim` - Current trim offset in degrees
    ///
    /// # Examples
    ///
    /// ```
    /// use teleop_drive::steering::normalizer::SteeringNormalizer;
    ///
    /// let normalizer = SteeringNormalizer::default();
    ///
    /// // Centered stick steers to the trim
    /// assert_eq!(normalizer.normalize(133, -12), -12);
    ///
    /// // Deflected stick adds the trim to the proportional angle
    /// assert_eq!(normalizer.normalize(255, 10), 100);
    /// ```
    #[must_use]
    pub fn normalize(&self, raw_value: i32, trim: i32) -> i32 {
        if self.is_centered(raw_value) {
            return trim;
        }

        let offset = f64::from(raw_value.clamp(AXIS_MIN, AXIS_MAX) - AXIS_CENTER);
        let half_range = f64::from(AXIS_MAX - AXIS_CENTER);
        let angle = offset / half_range * f64::from(self.max_angle);

        // `as` truncates toward zero
        (angle + f64::from(trim)) as i32
    }
}
