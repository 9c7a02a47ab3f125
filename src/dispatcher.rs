//! # Motion Dispatcher
//!
//! Turns classified controller events into motor and sound commands.
//!
//! ## Steering
//!
//! Every stick sample is normalized against the current trim. While the stick
//! is deflected the target is always sent, so steering tracks the stick
//! continuously. While the stick is centered the target is only sent when the
//! motor sits more than one degree away from it; re-sending the same position
//! to a servo at rest makes it jitter.
//!
//! ## Trim
//!
//! A D-pad press moves the trim one step, announces the new value and drives
//! the steering motor straight to it, whatever the stick is doing.
//!
//! ## Drive
//!
//! | Control | Pressed | Released |
//! |---------|---------|----------|
//! | Forward | both outputs `+full_speed` | coast to stop |
//! | Reverse | both outputs `-full_speed` | coast to stop |
//! | Brake | brake to stop | coast to stop |
//!
//! Commands follow event order. Holding several drive buttons at once is not
//! arbitrated: the last edge wins.

use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::actuator::{Actuator, StopAction};
use crate::audio::Audio;
use crate::config::Config;
use crate::controller::event::{classify, ControlEvent, DriveControl, KeyState, RawEvent, SoundAction};
use crate::error::Result;
use crate::steering::{is_stick_centered, SteeringNormalizer, TrimDirection, TrimState};

/// Largest position error (degrees) tolerated before a centered stick re-sends its target
pub const STUTTER_TOLERANCE: i32 = 1;

/// Stop behaviour for every steering move
pub const STEERING_STOP_ACTION: StopAction = StopAction::Coast;

/// Held state of the drive buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveControls {
    pub forward: bool,
    pub reverse: bool,
    pub brake: bool,
}

impl DriveControls {
    fn set(&mut self, control: DriveControl, held: bool) {
        match control {
            DriveControl::Forward => self.forward = held,
            DriveControl::Reverse => self.reverse = held,
            DriveControl::Brake => self.brake = held,
        }
    }

    /// Whether `control` is currently held down
    #[must_use]
    pub fn is_held(&self, control: DriveControl) -> bool {
        match control {
            DriveControl::Forward => self.forward,
            DriveControl::Reverse => self.reverse,
            DriveControl::Brake => self.brake,
        }
    }
}

/// Owns the vehicle, the audio output and the trim.
///
/// Single-threaded: all trim mutation happens through `&mut self`.
///
/// Dropping a dispatcher that was not shut down runs the shutdown sequence,
/// so the motors are released even when the run loop unwinds.
pub struct MotionDispatcher<A: Actuator, S: Audio> {
    actuator: A,
    audio: S,
    normalizer: SteeringNormalizer,
    trim: TrimState,
    steering_speed: i32,
    full_speed: i32,
    horn_file: PathBuf,
    horn2_file: PathBuf,
    held: DriveControls,
    shut_down: bool,
}

impl<A: Actuator, S: Audio> MotionDispatcher<A, S> {
    /// Creates a dispatcher with zero trim
    pub fn new(actuator: A, audio: S, config: &Config) -> Self {
        Self {
            actuator,
            audio,
            normalizer: SteeringNormalizer::from_config(&config.steering),
            trim: TrimState::from_config(&config.steering),
            steering_speed: config.steering.speed,
            full_speed: config.drive.full_speed,
            horn_file: PathBuf::from(&config.sound.horn_file),
            horn2_file: PathBuf::from(&config.sound.horn2_file),
            held: DriveControls::default(),
            shut_down: false,
        }
    }

    /// Current trim in degrees
    pub fn trim(&self) -> i32 {
        self.trim.degrees()
    }

    /// Held state of the drive buttons
    pub fn drive_controls(&self) -> DriveControls {
        self.held
    }

    /// Classifies a raw event and handles it. Unrecognized events are a no-op.
    pub fn dispatch(&mut self, event: &RawEvent) -> Result<()> {
        match classify(event) {
            Some(control) => self.handle(control),
            None => Ok(()),
        }
    }

    /// Handles one classified event
    pub fn handle(&mut self, event: ControlEvent) -> Result<()> {
        match event {
            ControlEvent::Steering(raw_value) => self.steer(raw_value),
            ControlEvent::Trim(direction) => self.adjust_trim(direction),
            ControlEvent::Drive(control, state) => self.drive(control, state),
            ControlEvent::Sound(action, state) => self.sound(action, state),
        }
    }

    fn steer(&mut self, raw_value: i32) -> Result<()> {
        let target = self.normalizer.normalize(raw_value, self.trim.degrees());

        // Raw-space check, independent of where the trim put the target
        if is_stick_centered(raw_value, self.normalizer.deadzone()) {
            let current = self.actuator.steer_position()?;
            if (current - target).abs() <= STUTTER_TOLERANCE {
                return Ok(());
            }
            debug!("Stick centered, steering {} -> {}", current, target);
        }

        self.steer_to(target)
    }

    fn adjust_trim(&mut self, direction: TrimDirection) -> Result<()> {
        let trim = self.trim.adjust(direction);
        info!("Steering trim updated: {} degrees", trim);

        // A failed announcement must not keep the motor off the new center
        let announced = self.audio.speak(&format!("Trim {} degrees", trim));
        self.steer_to(trim)?;
        announced
    }

    fn steer_to(&mut self, target: i32) -> Result<()> {
        self.actuator
            .steer_to(target, self.steering_speed, STEERING_STOP_ACTION)
    }

    fn drive(&mut self, control: DriveControl, state: KeyState) -> Result<()> {
        self.held.set(control, state == KeyState::Pressed);
        debug!("{:?} {:?}, held: {:?}", control, state, self.held);

        match (control, state) {
            (DriveControl::Forward, KeyState::Pressed) => {
                self.actuator.drive(self.full_speed, self.full_speed)
            }
            (DriveControl::Reverse, KeyState::Pressed) => {
                self.actuator.drive(-self.full_speed, -self.full_speed)
            }
            (DriveControl::Brake, KeyState::Pressed) => self.actuator.drive_stop(true),
            (_, KeyState::Released) => self.actuator.drive_stop(false),
        }
    }

    fn sound(&mut self, action: SoundAction, state: KeyState) -> Result<()> {
        if state != KeyState::Pressed {
            return Ok(());
        }

        match action {
            SoundAction::Horn => self.audio.play(&self.horn_file),
            SoundAction::Horn2 => self.audio.play(&self.horn2_file),
            SoundAction::Stop => self.audio.stop(),
        }
    }

    /// Leaves the vehicle safe: drive coasts to a stop, steering brakes and powers off.
    ///
    /// Runs at most once. Both steps are attempted even if the first fails.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;

        info!("Stopping motors");
        let drive = self.actuator.drive_stop(false);
        let steering = self.actuator.steer_stop(StopAction::Brake);
        drive.and(steering)
    }
}

impl<A: Actuator, S: Audio> Drop for MotionDispatcher<A, S> {
    fn drop(&mut self) {
        if !self.shut_down {
            if let Err(e) = self.shutdown() {
                error!("Failed to stop motors: {}", e);
            }
        }
    }
}
