//! # Teleop Drive
//!
//! Drive a steered differential-drive rover from a USB gamepad.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Load configuration (built-in defaults unless `TELEOP_DRIVE_CONFIG` names a file)
//!    - Set up logging with tracing subscriber
//!    - Open the controller, then the motors
//!
//! 2. **Main Loop**
//!    - Read controller events one at a time
//!    - Steer, trim, drive and play sounds
//!
//! 3. **Graceful Shutdown**
//!    - On Ctrl+C or controller loss: coast the drive motors to a stop,
//!      brake and power off the steering motor
//!
//! # Examples
//!
//! ```bash
//! sudo teleop-drive
//! ```
//!
//! Expected output:
//! ```text
//! INFO teleop_drive: Teleop Drive v0.1.0 starting...
//! INFO teleop_drive: Attempting to open controller at /dev/input/event2...
//! INFO teleop_drive::controller::gamepad: Successfully connected to: NeoGlow Controller (/dev/input/event2)
//! INFO teleop_drive: Controller ready. ZR/Select for Drive. ZL for Brake. ...
//! INFO teleop_drive::dispatcher: Steering trim updated: 1 degrees
//! ```

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use teleop_drive::actuator::Ev3Vehicle;
use teleop_drive::audio::SystemAudio;
use teleop_drive::config::{Config, LoggingConfig};
use teleop_drive::controller::gamepad::Gamepad;
use teleop_drive::dispatcher::MotionDispatcher;
use teleop_drive::lifecycle;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&config.logging);

    info!("Teleop Drive v{} starting...", env!("CARGO_PKG_VERSION"));

    let device_path = &config.controller.device_path;
    info!("Attempting to open controller at {}...", device_path);
    let mut gamepad = Gamepad::open(device_path).map_err(|e| {
        error!("{}", e);
        e
    })?;
    info!("Reading {} from {}", gamepad.name(), gamepad.device_path());

    let vehicle = Ev3Vehicle::open(&config.motors).context("Failed to initialize motors")?;
    let audio = SystemAudio::new(&config.sound);
    let mut dispatcher = MotionDispatcher::new(vehicle, audio, &config);

    info!(
        "Controller ready. ZR/Select for Drive. ZL for Brake. D-Pad Left/Right for Trim. \
         A for Horn, B for Horn 2, X to Stop Sound."
    );
    info!("Press Ctrl+C to exit");

    lifecycle::run(&mut gamepad, &mut dispatcher, interrupted()).await?;

    info!("Motors stopped, exiting");
    Ok(())
}

/// Resolves on Ctrl+C
///
/// If the signal handler cannot be installed this never resolves, so the loop
/// keeps running until the controller goes away.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Initialize logging to stdout, plus a daily rolling file when configured
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.dir.is_empty() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&config.dir, &config.file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Some(guard)
}
