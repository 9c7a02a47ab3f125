//! # Gamepad Input Device
//!
//! Opens the controller's evdev node at a fixed path and streams its events.
//!
//! Unlike auto-detecting by vendor ID, the device path comes from configuration
//! (`/dev/input/event2` by default). Open failures are split into
//! "not found" and "permission denied" so the operator gets a specific hint.

use evdev::{Device, EventStream};
use std::io;
use tracing::{debug, info};

use super::event::RawEvent;
use super::EventSource;
use crate::error::{Result, TeleopError};

/// Gamepad handle
///
/// Owns the async event stream of an opened evdev device. Single consumer:
/// events are read in delivery order and cannot be rewound. After a read
/// failure the only way back is to open the device again.
pub struct Gamepad {
    stream: EventStream,
    device_path: String,
    name: String,
}

impl std::fmt::Debug for Gamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gamepad")
            .field("device_path", &self.device_path)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Gamepad {
    /// Open the controller at `path`
    ///
    /// Must be called from within a tokio runtime, the event stream registers
    /// the device file descriptor with the reactor.
    ///
    /// # Errors
    ///
    /// - `DeviceNotFound`: nothing exists at `path`
    /// - `PermissionDenied`: the node exists but this user cannot read it
    /// - `Device`: any other open or stream setup failure
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use teleop_drive::controller::gamepad::Gamepad;
    ///
    /// # async fn run() -> teleop_drive::error::Result<()> {
    /// let gamepad = Gamepad::open("/dev/input/event2")?;
    /// println!("Connected to: {}", gamepad.name());
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: &str) -> Result<Self> {
        debug!("Opening controller at {}", path);

        let device = Device::open(path).map_err(|e| open_error(path, e))?;
        let name = device.name().unwrap_or("unknown device").to_string();

        let stream = device
            .into_event_stream()
            .map_err(|e| TeleopError::Device(format!("Failed to stream events from {}: {}", path, e)))?;

        info!("Successfully connected to: {} ({})", name, path);

        Ok(Self {
            stream,
            device_path: path.to_string(),
            name,
        })
    }

    /// Get the device path this controller was opened from
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Get controller name reported by evdev
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl EventSource for Gamepad {
    async fn next_event(&mut self) -> Result<RawEvent> {
        let event = self
            .stream
            .next_event()
            .await
            .map_err(|e| TeleopError::Device(format!("Failed to read event: {}", e)))?;

        Ok(RawEvent::from(&event))
    }
}

/// Maps an open failure onto the setup error taxonomy.
fn open_error(path: &str, err: io::Error) -> TeleopError {
    match err.kind() {
        io::ErrorKind::NotFound => TeleopError::DeviceNotFound(path.to_string()),
        io::ErrorKind::PermissionDenied => TeleopError::PermissionDenied(path.to_string()),
        _ => TeleopError::Device(format!("Failed to open {}: {}", path, err)),
    }
}
