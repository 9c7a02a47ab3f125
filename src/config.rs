//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a built-in default, so the controller runs without any file.
//! A file is only read when [`CONFIG_ENV_VAR`] names one.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, TeleopError};

/// Environment variable holding an optional configuration file path
pub const CONFIG_ENV_VAR: &str = "TELEOP_DRIVE_CONFIG";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub steering: SteeringConfig,
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub motors: MotorsConfig,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    #[serde(default = "default_device_path")]
    pub device_path: String,
}

/// Steering configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SteeringConfig {
    /// Half-width of the centered band around the stick midpoint, in raw units
    #[serde(default = "default_deadzone")]
    pub deadzone: i32,

    /// Angle commanded at full stick deflection, in degrees
    #[serde(default = "default_max_angle")]
    pub max_angle: i32,

    /// Transit speed for absolute-position moves (tacho counts per second)
    #[serde(default = "default_steering_speed")]
    pub speed: i32,

    #[serde(default = "default_max_trim")]
    pub max_trim: i32,

    #[serde(default = "default_trim_step")]
    pub trim_step: i32,
}

/// Drive configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DriveConfig {
    /// Speed percentage used for forward and reverse
    #[serde(default = "default_full_speed")]
    pub full_speed: i32,
}

/// Motor port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MotorsConfig {
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: String,

    #[serde(default = "default_steering_port")]
    pub steering_port: String,

    #[serde(default = "default_left_port")]
    pub left_port: String,

    #[serde(default = "default_right_port")]
    pub right_port: String,
}

/// Sound configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SoundConfig {
    #[serde(default = "default_horn_file")]
    pub horn_file: String,

    #[serde(default = "default_horn2_file")]
    pub horn2_file: String,

    /// Program used to play WAV files
    #[serde(default = "default_player")]
    pub player: String,

    /// Text-to-speech program, must support `--stdout`
    #[serde(default = "default_speech")]
    pub speech: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Directory for rolling log files. Empty disables file logging.
    #[serde(default)]
    pub dir: String,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

// Default value functions
fn default_device_path() -> String { "/dev/input/event2".to_string() }

fn default_deadzone() -> i32 { 10 }
fn default_max_angle() -> i32 { 90 }
fn default_steering_speed() -> i32 { 720 }
fn default_max_trim() -> i32 { 45 }
fn default_trim_step() -> i32 { 1 }

fn default_full_speed() -> i32 { 100 }

fn default_sysfs_root() -> String { "/sys/class/tacho-motor".to_string() }
fn default_steering_port() -> String { "outA".to_string() }
fn default_left_port() -> String { "outB".to_string() }
fn default_right_port() -> String { "outC".to_string() }

fn default_horn_file() -> String { "/home/robot/VSCODE/Horn.wav".to_string() }
fn default_horn2_file() -> String { "/home/robot/VSCODE/Horn2.wav".to_string() }
fn default_player() -> String { "aplay".to_string() }
fn default_speech() -> String { "espeak".to_string() }

fn default_file_prefix() -> String { "teleop-drive.log".to_string() }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { device_path: default_device_path() }
    }
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            max_angle: default_max_angle(),
            speed: default_steering_speed(),
            max_trim: default_max_trim(),
            trim_step: default_trim_step(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self { full_speed: default_full_speed() }
    }
}

impl Default for MotorsConfig {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            steering_port: default_steering_port(),
            left_port: default_left_port(),
            right_port: default_right_port(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            horn_file: default_horn_file(),
            horn2_file: default_horn2_file(),
            player: default_player(),
            speech: default_speech(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            file_prefix: default_file_prefix(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use teleop_drive::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file named by [`CONFIG_ENV_VAR`], or fall back to built-in defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.controller.device_path.is_empty() {
            return Err(invalid("controller device_path cannot be empty"));
        }

        // Raw axis half-range is 127, a wider deadzone would swallow the whole stick
        if self.steering.deadzone < 0 || self.steering.deadzone > 127 {
            return Err(invalid("steering deadzone must be between 0 and 127"));
        }

        if self.steering.max_angle <= 0 || self.steering.max_angle > 180 {
            return Err(invalid("steering max_angle must be between 1 and 180"));
        }

        if self.steering.speed <= 0 {
            return Err(invalid("steering speed must be greater than 0"));
        }

        if self.steering.max_trim < 0 || self.steering.max_trim > 90 {
            return Err(invalid("steering max_trim must be between 0 and 90"));
        }

        if self.steering.trim_step < 1 {
            return Err(invalid("steering trim_step must be at least 1"));
        }

        if self.drive.full_speed <= 0 || self.drive.full_speed > 100 {
            return Err(invalid("drive full_speed must be between 1 and 100"));
        }

        for (name, value) in [
            ("sysfs_root", &self.motors.sysfs_root),
            ("steering_port", &self.motors.steering_port),
            ("left_port", &self.motors.left_port),
            ("right_port", &self.motors.right_port),
        ] {
            if value.is_empty() {
                return Err(invalid(format!("motors {} cannot be empty", name)));
            }
        }

        let ports = [
            &self.motors.steering_port,
            &self.motors.left_port,
            &self.motors.right_port,
        ];
        if ports[0] == ports[1] || ports[0] == ports[2] || ports[1] == ports[2] {
            return Err(invalid("motor ports must be distinct"));
        }

        if self.sound.player.is_empty() || self.sound.speech.is_empty() {
            return Err(invalid("sound player and speech programs cannot be empty"));
        }

        if !self.logging.dir.is_empty() && self.logging.file_prefix.is_empty() {
            return Err(invalid("logging file_prefix cannot be empty when dir is set"));
        }

        Ok(())
    }
}

fn invalid(msg: impl std::fmt::Display) -> TeleopError {
    TeleopError::Config(toml::de::Error::custom(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.controller.device_path, "/dev/input/event2");
        assert_eq!(config.steering.deadzone, 10);
        assert_eq!(config.steering.max_angle, 90);
        assert_eq!(config.steering.speed, 720);
        assert_eq!(config.steering.max_trim, 45);
        assert_eq!(config.steering.trim_step, 1);
        assert_eq!(config.drive.full_speed, 100);
        assert_eq!(config.motors.steering_port, "outA");
        assert_eq!(config.motors.left_port, "outB");
        assert_eq!(config.motors.right_port, "outC");
        assert!(config.logging.dir.is_empty());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let file = write_config("");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.steering.max_trim, 45);
        assert_eq!(config.sound.player, "aplay");
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
        let config = Config::load(path).unwrap();
        let defaults = Config::default();

        assert_eq!(config.controller.device_path, defaults.controller.device_path);
        assert_eq!(config.steering.deadzone, defaults.steering.deadzone);
        assert_eq!(config.steering.speed, defaults.steering.speed);
        assert_eq!(config.steering.max_trim, defaults.steering.max_trim);
        assert_eq!(config.drive.full_speed, defaults.drive.full_speed);
        assert_eq!(config.motors.steering_port, defaults.motors.steering_port);
        assert_eq!(config.sound.horn_file, defaults.sound.horn_file);
        assert_eq!(config.logging.dir, defaults.logging.dir);
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"
[controller]
device_path = "/dev/input/event5"

[steering]
deadzone = 12
"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.controller.device_path, "/dev/input/event5");
        assert_eq!(config.steering.deadzone, 12);
        assert_eq!(config.steering.max_angle, 90);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = write_config("[drive]\nfull_speed = 150\n");
        let result = Config::load(file.path());
        assert!(matches!(result, Err(TeleopError::Config(_))));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let file = write_config("[steering\ndeadzone = ");
        assert!(matches!(Config::load(file.path()), Err(TeleopError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/teleop-drive.toml");
        assert!(matches!(result, Err(TeleopError::Io(_))));
    }

    #[test]
    fn test_empty_device_path() {
        let mut config = Config::default();
        config.controller.device_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_bounds() {
        let mut config = Config::default();
        config.steering.deadzone = -1;
        assert!(config.validate().is_err());
        config.steering.deadzone = 128;
        assert!(config.validate().is_err());
        config.steering.deadzone = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_angle_zero() {
        let mut config = Config::default();
        config.steering.max_angle = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_steering_speed_zero() {
        let mut config = Config::default();
        config.steering.speed = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_trim_too_high() {
        let mut config = Config::default();
        config.steering.max_trim = 91;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trim_step_zero() {
        let mut config = Config::default();
        config.steering.trim_step = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_motor_ports() {
        let mut config = Config::default();
        config.motors.left_port = "outA".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_motor_port() {
        let mut config = Config::default();
        config.motors.right_port = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_player() {
        let mut config = Config::default();
        config.sound.player = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_dir_requires_prefix() {
        let mut config = Config::default();
        config.logging.dir = "./logs".to_string();
        config.logging.file_prefix = String::new();
        assert!(config.validate().is_err());

        config.logging.file_prefix = default_file_prefix();
        assert!(config.validate().is_ok());
    }
}
