//! # ev3dev Tacho Motors
//!
//! Drives LEGO tacho motors through the ev3dev sysfs interface.
//!
//! Each motor is a directory under `/sys/class/tacho-motor/` (`motor0`,
//! `motor1`, ...). The output port it is plugged into is read from its
//! `address` attribute (e.g. `ev3-ports:outA`). Commands are issued by writing
//! plain-text attributes:
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `speed_sp` | Target speed in tacho counts per second |
//! | `position_sp` | Target absolute position in tacho counts (degrees) |
//! | `stop_action` | `coast`, `brake` or `hold` |
//! | `command` | `run-forever`, `run-to-abs-pos`, `stop`, `reset` |
//! | `position` | Current position (read-only) |
//! | `max_speed` | Speed at 100% (read-only) |

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{Actuator, StopAction};
use crate::config::MotorsConfig;
use crate::error::{Result, TeleopError};

/// Used when a motor does not report `max_speed` (EV3 large motor value)
const FALLBACK_MAX_SPEED: i32 = 1050;

/// One tacho motor in sysfs
#[derive(Debug, Clone)]
pub struct TachoMotor {
    path: PathBuf,
    port: String,
    max_speed: i32,
}

impl TachoMotor {
    /// Locate the motor plugged into `port` (e.g. `outA`)
    ///
    /// Motor directories are scanned in sorted order and the first one whose
    /// `address` equals `port` or ends in `:<port>` wins.
    ///
    /// # Errors
    ///
    /// Returns `MotorNotFound` if the class directory is missing or no motor
    /// reports the requested port.
    pub fn find<P: AsRef<Path>>(sysfs_root: P, port: &str) -> Result<Self> {
        let sysfs_root = sysfs_root.as_ref();

        let mut entries: Vec<_> = match fs::read_dir(sysfs_root) {
            Ok(dir) => dir.filter_map(|entry| entry.ok()).map(|entry| entry.path()).collect(),
            Err(e) => {
                debug!("Could not read {}: {}", sysfs_root.display(), e);
                return Err(TeleopError::MotorNotFound(port.to_string()));
            }
        };

        // Deterministic choice when two motors claim the same port
        entries.sort();

        let suffix = format!(":{}", port);
        for path in entries {
            let address = match fs::read_to_string(path.join("address")) {
                Ok(address) => address.trim().to_string(),
                Err(_) => continue,
            };

            if address == port || address.ends_with(&suffix) {
                let max_speed = fs::read_to_string(path.join("max_speed"))
                    .ok()
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(FALLBACK_MAX_SPEED);

                info!("Found tacho motor on {} at {}", port, path.display());
                return Ok(Self {
                    path,
                    port: port.to_string(),
                    max_speed,
                });
            }
        }

        Err(TeleopError::MotorNotFound(port.to_string()))
    }

    /// Output port this motor is attached to
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Speed reported for 100% duty
    pub fn max_speed(&self) -> i32 {
        self.max_speed
    }

    /// Reset all attributes and zero the position counter
    pub fn reset(&self) -> Result<()> {
        self.write_attr("command", "reset")
    }

    pub fn set_stop_action(&self, stop_action: StopAction) -> Result<()> {
        self.write_attr("stop_action", stop_action.as_str())
    }

    /// Run continuously at a percentage of `max_speed` (-100 to 100)
    pub fn run_forever(&self, speed_percent: i32) -> Result<()> {
        let speed_sp = speed_percent.clamp(-100, 100) * self.max_speed / 100;
        self.write_attr("speed_sp", speed_sp)?;
        self.write_attr("command", "run-forever")
    }

    /// Move to an absolute position at `speed` counts per second
    pub fn run_to_abs_pos(&self, position: i32, speed: i32, stop_action: StopAction) -> Result<()> {
        self.write_attr("position_sp", position)?;
        self.write_attr("speed_sp", speed.clamp(0, self.max_speed))?;
        self.set_stop_action(stop_action)?;
        self.write_attr("command", "run-to-abs-pos")
    }

    /// Apply `stop_action` and stop
    ///
    /// `command=stop` is written even when the stop action cannot be set, so
    /// the motor is never left running by a partial failure.
    pub fn stop(&self, stop_action: StopAction) -> Result<()> {
        let action = self.set_stop_action(stop_action);
        let stopped = self.write_attr("command", "stop");
        stopped.and(action)
    }

    /// Current position in tacho counts
    pub fn position(&self) -> Result<i32> {
        let raw = self.read_attr("position")?;
        raw.parse().map_err(|e| {
            TeleopError::Actuator(format!("Invalid position {:?} on {}: {}", raw, self.port, e))
        })
    }

    fn write_attr(&self, name: &str, value: impl Display) -> Result<()> {
        fs::write(self.path.join(name), value.to_string()).map_err(|e| {
            TeleopError::Actuator(format!("Failed to write {} on {}: {}", name, self.port, e))
        })
    }

    fn read_attr(&self, name: &str) -> Result<String> {
        fs::read_to_string(self.path.join(name))
            .map(|s| s.trim().to_string())
            .map_err(|e| TeleopError::Actuator(format!("Failed to read {} on {}: {}", name, self.port, e)))
    }
}

/// Tank-drive vehicle with a steering motor, built from three tacho motors
#[derive(Debug)]
pub struct Ev3Vehicle {
    left: TachoMotor,
    right: TachoMotor,
    steering: TachoMotor,
}

impl Ev3Vehicle {
    /// Locate all three motors and prepare the steering motor
    ///
    /// The steering motor is reset, which makes its current position the zero
    /// angle, and left in coast so it can be back-driven at rest.
    ///
    /// # Errors
    ///
    /// Returns `MotorNotFound` for the first missing port, or `Actuator` if the
    /// steering motor cannot be reset.
    pub fn open(config: &MotorsConfig) -> Result<Self> {
        let left = TachoMotor::find(&config.sysfs_root, &config.left_port)?;
        let right = TachoMotor::find(&config.sysfs_root, &config.right_port)?;
        let steering = TachoMotor::find(&config.sysfs_root, &config.steering_port)?;

        steering.reset()?;
        steering.set_stop_action(StopAction::Coast)?;

        Ok(Self { left, right, steering })
    }
}

impl Actuator for Ev3Vehicle {
    fn drive(&mut self, left_speed: i32, right_speed: i32) -> Result<()> {
        self.left.run_forever(left_speed)?;
        self.right.run_forever(right_speed)
    }

    fn drive_stop(&mut self, brake: bool) -> Result<()> {
        let stop_action = if brake { StopAction::Brake } else { StopAction::Coast };
        // Both sides are always attempted; the first error is reported
        let left = self.left.stop(stop_action);
        let right = self.right.stop(stop_action);
        left.and(right)
    }

    fn steer_to(&mut self, position: i32, speed: i32, stop_action: StopAction) -> Result<()> {
        self.steering.run_to_abs_pos(position, speed, stop_action)
    }

    fn steer_position(&mut self) -> Result<i32> {
        self.steering.position()
    }

    fn steer_stop(&mut self, stop_action: StopAction) -> Result<()> {
        self.steering.stop(stop_action)
    }
}
